//! The `WardrobeStore` trait and the write batches it commits.
//!
//! The trait is implemented by persistence backends (the in-memory
//! [`crate::memory::MemoryStore`], `threadiq-store-sqlite`). The
//! [`crate::dispatch::Dispatcher`] depends on this abstraction, not on any
//! concrete backend.

use std::future::Future;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::{item::WardrobeItem, outfit::Outfit};

// ─── Write batch ─────────────────────────────────────────────────────────────

/// A single record-level write.
#[derive(Debug, Clone)]
pub enum WriteOp {
  InsertItem(WardrobeItem),
  /// Overwrite an item. Rejected as stale unless the stored copy still has
  /// `expected_updated_at`.
  UpdateItem {
    item:                WardrobeItem,
    expected_updated_at: DateTime<Utc>,
  },
  /// Remove an item and prune it from every outfit. Absent ids are ignored.
  DeleteItem(Uuid),
  InsertOutfit(Outfit),
  UpdateOutfit(Outfit),
  DeleteOutfit(Uuid),
}

/// The writes produced by one intent. Backends apply a batch all-or-nothing.
#[derive(Debug, Clone, Default)]
pub struct WriteBatch {
  pub ops: Vec<WriteOp>,
}

impl WriteBatch {
  pub fn push(&mut self, op: WriteOp) { self.ops.push(op); }

  pub fn is_empty(&self) -> bool { self.ops.is_empty() }
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a wardrobe persistence backend.
///
/// All methods return `Send` futures so the trait can be used from
/// multi-threaded async runtimes.
pub trait WardrobeStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  /// All items, most recent first.
  fn load_items(
    &self,
  ) -> impl Future<Output = Result<Vec<WardrobeItem>, Self::Error>> + Send + '_;

  /// All outfits in the order they were saved, with item references already
  /// pruned of deleted items.
  fn load_outfits(
    &self,
  ) -> impl Future<Output = Result<Vec<Outfit>, Self::Error>> + Send + '_;

  /// Apply every op in `batch`, or none of them.
  fn commit(
    &self,
    batch: WriteBatch,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
