//! SQLite backend for the ThreadIQ wardrobe.
//!
//! Wraps [`tokio_rusqlite`] so all database access runs on a dedicated thread
//! without blocking the async runtime. Each [`WriteBatch`] is committed in a
//! single transaction.
//!
//! [`WriteBatch`]: threadiq_core::store::WriteBatch

mod encode;
mod schema;
mod store;

pub mod error;

pub use error::{Error, Result};
pub use store::SqliteStore;
