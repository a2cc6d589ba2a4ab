//! [`Dispatcher`] — applies intents to a [`WardrobeState`] and persists the
//! records they touch.
//!
//! Each intent is applied to a working copy of the state. The copy replaces
//! the live state only after the backend has committed the resulting writes,
//! so readers never see an intent half-applied and a failed commit leaves the
//! state exactly as it was. `dispatch` takes `&mut self`: one intent is in
//! flight at a time.

use chrono::Utc;

use crate::{
  Error, Result,
  action::{Action, Change, Outcome},
  state::WardrobeState,
  store::{WardrobeStore, WriteBatch, WriteOp},
};

pub struct Dispatcher<S> {
  state: WardrobeState,
  store: S,
}

impl<S: WardrobeStore> Dispatcher<S> {
  /// A dispatcher over an empty wardrobe.
  pub fn new(store: S) -> Self {
    Self { state: WardrobeState::new(), store }
  }

  /// Load every item and outfit from `store` and wrap them.
  pub async fn hydrate(store: S) -> Result<Self> {
    let items = store.load_items().await.map_err(transient)?;
    let outfits = store.load_outfits().await.map_err(transient)?;
    let mut state = WardrobeState::new();
    state.load(items, outfits);
    Ok(Self { state, store })
  }

  pub fn state(&self) -> &WardrobeState { &self.state }

  pub fn store(&self) -> &S { &self.store }

  /// Apply `action` and persist what it changed.
  pub async fn dispatch(&mut self, action: Action) -> Result<Outcome> {
    let now = Utc::now();
    let mut next = self.state.clone();

    let outcome = match next.apply(action, now) {
      Ok(outcome) => outcome,
      Err(e) => {
        // Only `last_error` differs between `next` and the live state.
        self.state = next;
        return Err(e);
      }
    };

    let batch = self.write_batch(&next, &outcome);
    if !batch.is_empty()
      && let Err(e) = self.store.commit(batch).await
    {
      let err = transient(e);
      tracing::warn!(error = %err, "commit failed; state left unchanged");
      self.state.record_error(err.to_string());
      return Err(err);
    }

    self.state = next;
    Ok(outcome)
  }

  /// Translate `outcome` into backend writes, reading records from `next`
  /// and the optimistic-concurrency token from the live state.
  fn write_batch(&self, next: &WardrobeState, outcome: &Outcome) -> WriteBatch {
    let mut batch = WriteBatch::default();
    for change in &outcome.changes {
      match *change {
        Change::ItemInserted(id) => {
          if let Some(item) = next.item(id) {
            batch.push(WriteOp::InsertItem(item.clone()));
          }
        }
        Change::ItemUpdated(id) => {
          if let (Some(item), Some(before)) = (next.item(id), self.state.item(id)) {
            batch.push(WriteOp::UpdateItem {
              item:                item.clone(),
              expected_updated_at: before.updated_at,
            });
          }
        }
        Change::ItemRemoved(id) => batch.push(WriteOp::DeleteItem(id)),
        Change::OutfitInserted(id) => {
          if let Some(outfit) = next.outfit(id) {
            batch.push(WriteOp::InsertOutfit(outfit.clone()));
          }
        }
        Change::OutfitUpdated(id) => {
          if let Some(outfit) = next.outfit(id) {
            batch.push(WriteOp::UpdateOutfit(outfit.clone()));
          }
        }
        Change::OutfitRemoved(id) => batch.push(WriteOp::DeleteOutfit(id)),
      }
    }
    batch
  }
}

fn transient(e: impl std::error::Error) -> Error { Error::Transient(e.to_string()) }
