//! [`MemoryStore`] — a process-local [`WardrobeStore`].
//!
//! Keeps committed records in memory. Latency and one-shot failures can be
//! injected to exercise the asynchronous and failure paths of the dispatcher
//! without a database.

use std::{sync::Arc, time::Duration};

use thiserror::Error;
use tokio::sync::Mutex;
use uuid::Uuid;

use crate::{
  item::WardrobeItem,
  outfit::Outfit,
  store::{WardrobeStore, WriteBatch, WriteOp},
};

#[derive(Debug, Error)]
pub enum MemoryStoreError {
  #[error("simulated failure: {0}")]
  Simulated(String),

  #[error("stale write to item {0}")]
  StaleWrite(Uuid),

  #[error("item {0} already exists")]
  DuplicateItem(Uuid),

  #[error("outfit {0} already exists")]
  DuplicateOutfit(Uuid),

  #[error("outfit not found: {0}")]
  OutfitNotFound(Uuid),
}

#[derive(Debug, Default)]
struct Inner {
  items:     Vec<WardrobeItem>,
  outfits:   Vec<Outfit>,
  fail_next: Option<String>,
  commits:   usize,
}

/// An in-memory wardrobe backend.
///
/// Cloning is cheap and clones share the same records.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
  inner:   Arc<Mutex<Inner>>,
  latency: Duration,
}

impl MemoryStore {
  pub fn new() -> Self { Self::default() }

  /// Delay every call by `latency`, standing in for a network round trip.
  pub fn with_latency(mut self, latency: Duration) -> Self {
    self.latency = latency;
    self
  }

  /// Make the next commit fail with `message`.
  pub async fn fail_next(&self, message: impl Into<String>) {
    self.inner.lock().await.fail_next = Some(message.into());
  }

  /// Number of batches committed successfully.
  pub async fn commits(&self) -> usize { self.inner.lock().await.commits }

  async fn pause(&self) {
    if !self.latency.is_zero() {
      tokio::time::sleep(self.latency).await;
    }
  }
}

impl WardrobeStore for MemoryStore {
  type Error = MemoryStoreError;

  async fn load_items(&self) -> Result<Vec<WardrobeItem>, MemoryStoreError> {
    self.pause().await;
    Ok(self.inner.lock().await.items.clone())
  }

  async fn load_outfits(&self) -> Result<Vec<Outfit>, MemoryStoreError> {
    self.pause().await;
    Ok(self.inner.lock().await.outfits.clone())
  }

  async fn commit(&self, batch: WriteBatch) -> Result<(), MemoryStoreError> {
    self.pause().await;
    let mut inner = self.inner.lock().await;
    if let Some(message) = inner.fail_next.take() {
      return Err(MemoryStoreError::Simulated(message));
    }

    // Work on copies so a rejected op leaves nothing behind.
    let mut items = inner.items.clone();
    let mut outfits = inner.outfits.clone();
    for op in batch.ops {
      apply_op(&mut items, &mut outfits, op)?;
    }
    inner.items = items;
    inner.outfits = outfits;
    inner.commits += 1;
    Ok(())
  }
}

fn apply_op(
  items: &mut Vec<WardrobeItem>,
  outfits: &mut Vec<Outfit>,
  op: WriteOp,
) -> Result<(), MemoryStoreError> {
  match op {
    WriteOp::InsertItem(item) => {
      if items.iter().any(|i| i.item_id == item.item_id) {
        return Err(MemoryStoreError::DuplicateItem(item.item_id));
      }
      items.insert(0, item);
    }
    WriteOp::UpdateItem { item, expected_updated_at } => {
      let stored = items
        .iter_mut()
        .find(|i| i.item_id == item.item_id)
        .filter(|i| i.updated_at == expected_updated_at)
        .ok_or(MemoryStoreError::StaleWrite(item.item_id))?;
      *stored = item;
    }
    WriteOp::DeleteItem(item_id) => {
      items.retain(|i| i.item_id != item_id);
      for outfit in outfits.iter_mut() {
        outfit.item_ids.retain(|id| *id != item_id);
      }
    }
    WriteOp::InsertOutfit(outfit) => {
      if outfits.iter().any(|o| o.outfit_id == outfit.outfit_id) {
        return Err(MemoryStoreError::DuplicateOutfit(outfit.outfit_id));
      }
      outfits.push(outfit);
    }
    WriteOp::UpdateOutfit(outfit) => {
      let stored = outfits
        .iter_mut()
        .find(|o| o.outfit_id == outfit.outfit_id)
        .ok_or(MemoryStoreError::OutfitNotFound(outfit.outfit_id))?;
      *stored = outfit;
    }
    WriteOp::DeleteOutfit(outfit_id) => {
      outfits.retain(|o| o.outfit_id != outfit_id);
    }
  }
  Ok(())
}
