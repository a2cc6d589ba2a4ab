//! [`WardrobeState`] — the in-memory state container.
//!
//! Holds the item collection (most recent first), the outfit collection
//! (insertion order), and the filter and view settings. Every intent either
//! applies completely or returns an error without touching items or outfits.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  action::{Action, Change, Outcome},
  care::{CareState, InventoryState},
  insights::{WardrobeInsights, wardrobe_insights},
  item::{ItemUpdate, NewItem, WardrobeItem, dedup},
  outfit::Outfit,
  taxonomy::Category,
  view::{ActiveFilters, SortBy, ViewMode, derive_view},
};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WardrobeState {
  items:      Vec<WardrobeItem>,
  outfits:    Vec<Outfit>,
  last_error: Option<String>,
  filters:    ActiveFilters,
  view_mode:  ViewMode,
  sort_by:    SortBy,
}

impl WardrobeState {
  pub fn new() -> Self { Self::default() }

  /// Replace both collections wholesale, e.g. when hydrating from a backend.
  /// Items are expected most recent first.
  pub fn load(&mut self, items: Vec<WardrobeItem>, outfits: Vec<Outfit>) {
    tracing::debug!(items = items.len(), outfits = outfits.len(), "loading wardrobe");
    self.items = items;
    self.outfits = outfits;
  }

  // ── Dispatch ──────────────────────────────────────────────────────────────

  /// Apply one intent at `now`.
  ///
  /// On failure the error message is recorded in [`Self::last_error`] and
  /// nothing else changes.
  pub fn apply(&mut self, action: Action, now: DateTime<Utc>) -> Result<Outcome> {
    let name = action.name();
    if action.clears_error() {
      self.last_error = None;
    }
    let result = self.reduce(action, now);
    match &result {
      Ok(outcome) => {
        let changes = outcome.changes.len();
        tracing::debug!(action = name, changes, "applied");
      }
      Err(e) => {
        tracing::debug!(action = name, error = %e, "rejected");
        self.last_error = Some(e.to_string());
      }
    }
    result
  }

  fn reduce(&mut self, action: Action, now: DateTime<Utc>) -> Result<Outcome> {
    let outcome = match action {
      Action::AddItem(input) => {
        Outcome::single(Change::ItemInserted(self.add_item(input, now)?))
      }
      Action::UpdateItem { item_id, updates } => {
        self.update_item(item_id, updates, now)?;
        Outcome::single(Change::ItemUpdated(item_id))
      }
      Action::LogWear { item_id, outfit_id, date } => {
        let outfit = self.log_wear(item_id, outfit_id, date, now)?;
        let mut outcome = Outcome::single(Change::ItemUpdated(item_id));
        outcome.changes.extend(outfit.map(Change::OutfitUpdated));
        outcome
      }
      Action::SetInventoryState { item_id, state } => {
        self.set_inventory_state(item_id, state, now)?;
        Outcome::single(Change::ItemUpdated(item_id))
      }
      Action::MarkCareComplete(item_id) => {
        self.mark_care_complete(item_id, now)?;
        Outcome::single(Change::ItemUpdated(item_id))
      }
      Action::ToggleFavorite(item_id) => {
        self.toggle_favorite(item_id, now)?;
        Outcome::single(Change::ItemUpdated(item_id))
      }
      Action::DeleteItem(item_id) => {
        if self.delete_item(item_id) {
          Outcome::single(Change::ItemRemoved(item_id))
        } else {
          Outcome::none()
        }
      }
      Action::SaveOutfit(outfit) => {
        Outcome::single(Change::OutfitInserted(self.save_outfit(outfit)?))
      }
      Action::DeleteOutfit(outfit_id) => {
        if self.delete_outfit(outfit_id) {
          Outcome::single(Change::OutfitRemoved(outfit_id))
        } else {
          Outcome::none()
        }
      }
      Action::ToggleOutfitFavorite(outfit_id) => {
        self.toggle_outfit_favorite(outfit_id, now)?;
        Outcome::single(Change::OutfitUpdated(outfit_id))
      }
      Action::SetFilters(patch) => {
        self.filters.apply(patch);
        Outcome::none()
      }
      Action::ClearFilters => {
        self.filters.clear();
        Outcome::none()
      }
      Action::ToggleCategoryFilter(c) => {
        self.filters.toggle_category(c);
        Outcome::none()
      }
      Action::ToggleColorFilter(c) => {
        self.filters.toggle_color(c);
        Outcome::none()
      }
      Action::ToggleSeasonFilter(s) => {
        self.filters.toggle_season(s);
        Outcome::none()
      }
      Action::ToggleInventoryStateFilter(s) => {
        self.filters.toggle_inventory_state(s);
        Outcome::none()
      }
      Action::ToggleCareStateFilter(s) => {
        self.filters.toggle_care_state(s);
        Outcome::none()
      }
      Action::SetViewMode(mode) => {
        self.view_mode = mode;
        Outcome::none()
      }
      Action::SetSortBy(sort_by) => {
        self.sort_by = sort_by;
        Outcome::none()
      }
      Action::ClearError => Outcome::none(),
    };
    Ok(outcome)
  }

  // ── Items ─────────────────────────────────────────────────────────────────

  /// Validate `input` and insert the new item at the front.
  pub fn add_item(&mut self, input: NewItem, now: DateTime<Utc>) -> Result<Uuid> {
    let item = WardrobeItem::create(input, now)?;
    let id = item.item_id;
    tracing::info!(item_id = %id, category = %item.category, "item added");
    self.items.insert(0, item);
    Ok(id)
  }

  pub fn update_item(
    &mut self,
    item_id: Uuid,
    updates: ItemUpdate,
    now: DateTime<Utc>,
  ) -> Result<()> {
    let item = self.item_mut(item_id)?;
    *item = item.merged(updates, now)?;
    Ok(())
  }

  /// Count one wear of an item, and of `outfit_id` when given.
  ///
  /// Returns the outfit id if an outfit was updated. An outfit id that
  /// matches no outfit is ignored.
  pub fn log_wear(
    &mut self,
    item_id: Uuid,
    outfit_id: Option<Uuid>,
    date: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
  ) -> Result<Option<Uuid>> {
    let worn_at = date.unwrap_or(now);

    let item = self.item_mut(item_id)?;
    item.wear_count = item.wear_count.saturating_add(1);
    item.last_worn_at = Some(worn_at);
    item.refresh_care_state();
    item.touch(now);

    let Some(outfit_id) = outfit_id else {
      return Ok(None);
    };
    match self.outfits.iter_mut().find(|o| o.outfit_id == outfit_id) {
      Some(outfit) => {
        outfit.record_wear(worn_at, now);
        Ok(Some(outfit_id))
      }
      None => {
        tracing::warn!(
          %item_id,
          %outfit_id,
          "wear logged against unknown outfit; ignoring outfit"
        );
        Ok(None)
      }
    }
  }

  /// Move an item to `state`.
  ///
  /// Laundry and dry cleaning put the item in care. Returning to
  /// `Available` counts as a completed care cycle. Any other state keeps
  /// the current care label.
  pub fn set_inventory_state(
    &mut self,
    item_id: Uuid,
    state: InventoryState,
    now: DateTime<Utc>,
  ) -> Result<()> {
    let item = self.item_mut(item_id)?;
    item.inventory_state = state;
    if state.is_being_cared_for() {
      item.care_state = CareState::InCare;
    } else if state == InventoryState::Available {
      item.care_profile.last_cared_at = Some(now);
      item.care_state = CareState::Clean;
    }
    item.touch(now);
    Ok(())
  }

  pub fn mark_care_complete(&mut self, item_id: Uuid, now: DateTime<Utc>) -> Result<()> {
    let item = self.item_mut(item_id)?;
    item.care_profile.last_cared_at = Some(now);
    item.care_state = CareState::Clean;
    item.inventory_state = InventoryState::Available;
    item.touch(now);
    Ok(())
  }

  pub fn toggle_favorite(&mut self, item_id: Uuid, now: DateTime<Utc>) -> Result<()> {
    let item = self.item_mut(item_id)?;
    item.is_favorite = !item.is_favorite;
    item.touch(now);
    Ok(())
  }

  /// Remove an item and prune it from every outfit. Returns whether the item
  /// existed; deleting an absent id is not an error.
  pub fn delete_item(&mut self, item_id: Uuid) -> bool {
    let Some(pos) = self.items.iter().position(|i| i.item_id == item_id) else {
      return false;
    };
    self.items.remove(pos);
    let pruned = self
      .outfits
      .iter_mut()
      .map(|o| o.remove_item(item_id))
      .filter(|removed| *removed)
      .count();
    tracing::info!(%item_id, outfits_pruned = pruned, "item deleted");
    true
  }

  fn item_mut(&mut self, item_id: Uuid) -> Result<&mut WardrobeItem> {
    self
      .items
      .iter_mut()
      .find(|i| i.item_id == item_id)
      .ok_or(Error::ItemNotFound(item_id))
  }

  // ── Outfits ───────────────────────────────────────────────────────────────

  /// Append a fully-formed outfit. Its id must be new and every referenced
  /// item must exist.
  pub fn save_outfit(&mut self, mut outfit: Outfit) -> Result<Uuid> {
    if self.outfit(outfit.outfit_id).is_some() {
      return Err(Error::validation(format!(
        "outfit {} already exists",
        outfit.outfit_id
      )));
    }
    outfit.item_ids = dedup(outfit.item_ids);
    if let Some(missing) = outfit.item_ids.iter().find(|id| self.item(**id).is_none()) {
      return Err(Error::validation(format!(
        "outfit references unknown item {missing}"
      )));
    }
    outfit.updated_at = outfit.updated_at.max(outfit.created_at);
    let id = outfit.outfit_id;
    tracing::info!(outfit_id = %id, items = outfit.item_ids.len(), "outfit saved");
    self.outfits.push(outfit);
    Ok(id)
  }

  /// Remove an outfit. Returns whether it existed.
  pub fn delete_outfit(&mut self, outfit_id: Uuid) -> bool {
    let before = self.outfits.len();
    self.outfits.retain(|o| o.outfit_id != outfit_id);
    let removed = self.outfits.len() != before;
    if removed {
      tracing::info!(%outfit_id, "outfit deleted");
    }
    removed
  }

  pub fn toggle_outfit_favorite(
    &mut self,
    outfit_id: Uuid,
    now: DateTime<Utc>,
  ) -> Result<()> {
    let outfit = self
      .outfits
      .iter_mut()
      .find(|o| o.outfit_id == outfit_id)
      .ok_or(Error::OutfitNotFound(outfit_id))?;
    outfit.is_favorite = !outfit.is_favorite;
    outfit.touch(now);
    Ok(())
  }

  // ── Selectors ─────────────────────────────────────────────────────────────

  /// All items, most recent first.
  pub fn items(&self) -> &[WardrobeItem] { &self.items }

  pub fn outfits(&self) -> &[Outfit] { &self.outfits }

  pub fn item(&self, item_id: Uuid) -> Option<&WardrobeItem> {
    self.items.iter().find(|i| i.item_id == item_id)
  }

  pub fn outfit(&self, outfit_id: Uuid) -> Option<&Outfit> {
    self.outfits.iter().find(|o| o.outfit_id == outfit_id)
  }

  /// The items an outfit references, in outfit order. `None` if the outfit
  /// does not exist.
  pub fn outfit_items(&self, outfit_id: Uuid) -> Option<Vec<&WardrobeItem>> {
    let outfit = self.outfit(outfit_id)?;
    Some(outfit.item_ids.iter().filter_map(|id| self.item(*id)).collect())
  }

  /// The visible list: current filters applied, current sort order.
  pub fn filtered_items(&self) -> Vec<&WardrobeItem> {
    derive_view(&self.items, &self.filters, self.sort_by)
  }

  pub fn available_items(&self) -> Vec<&WardrobeItem> {
    self.items.iter().filter(|i| i.is_available()).collect()
  }

  /// Available items in `category`.
  pub fn items_by_category(&self, category: Category) -> Vec<&WardrobeItem> {
    self
      .items
      .iter()
      .filter(|i| i.category == category && i.is_available())
      .collect()
  }

  /// Items that are due soon or overdue for care.
  pub fn care_alerts(&self) -> Vec<&WardrobeItem> {
    self
      .items
      .iter()
      .filter(|i| i.care_state.needs_attention())
      .collect()
  }

  pub fn insights(&self, now: DateTime<Utc>) -> WardrobeInsights {
    wardrobe_insights(&self.items, now)
  }

  pub fn filters(&self) -> &ActiveFilters { &self.filters }

  pub fn view_mode(&self) -> ViewMode { self.view_mode }

  pub fn sort_by(&self) -> SortBy { self.sort_by }

  /// Message of the last rejected intent, if not cleared since.
  pub fn last_error(&self) -> Option<&str> { self.last_error.as_deref() }

  pub(crate) fn record_error(&mut self, message: String) {
    self.last_error = Some(message);
  }
}
