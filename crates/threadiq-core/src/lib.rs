//! Core types, derivations and the state container for the ThreadIQ
//! wardrobe.
//!
//! This crate is free of database and UI dependencies. Callers drive a
//! [`state::WardrobeState`] with [`action::Action`]s, usually through a
//! [`dispatch::Dispatcher`] backed by some [`store::WardrobeStore`], and read
//! it through its selectors.

// We intentionally use native `async fn` in traits (stabilised in Rust 1.75).
// Suppress the advisory lint about `Send` bounds on the returned futures.
#![allow(async_fn_in_trait)]

pub mod action;
pub mod care;
pub mod dispatch;
pub mod error;
pub mod insights;
pub mod item;
pub mod memory;
pub mod outfit;
pub mod state;
pub mod store;
pub mod taxonomy;
pub mod view;

pub use error::{Error, Result};

#[cfg(test)]
mod tests;
