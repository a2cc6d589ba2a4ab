//! Intents accepted by the state container, and the record of what applying
//! one changed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Result,
  care::{CareState, InventoryState},
  item::{ItemUpdate, NewItem},
  outfit::Outfit,
  taxonomy::{Category, Color, Season},
  view::{FilterPatch, SortBy, ViewMode},
};

// ─── Action ──────────────────────────────────────────────────────────────────

/// Every mutation of a [`crate::state::WardrobeState`] is one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "snake_case")]
pub enum Action {
  // ── Items ───────────────────────────────────────────────────────────────
  AddItem(NewItem),
  UpdateItem {
    item_id: Uuid,
    updates: ItemUpdate,
  },
  LogWear {
    item_id:   Uuid,
    #[serde(default)]
    outfit_id: Option<Uuid>,
    /// When the wear happened; defaults to now.
    #[serde(default)]
    date:      Option<DateTime<Utc>>,
  },
  SetInventoryState {
    item_id: Uuid,
    state:   InventoryState,
  },
  MarkCareComplete(Uuid),
  ToggleFavorite(Uuid),
  DeleteItem(Uuid),

  // ── Outfits ─────────────────────────────────────────────────────────────
  SaveOutfit(Outfit),
  DeleteOutfit(Uuid),
  ToggleOutfitFavorite(Uuid),

  // ── Filters & view ──────────────────────────────────────────────────────
  SetFilters(FilterPatch),
  ClearFilters,
  ToggleCategoryFilter(Category),
  ToggleColorFilter(Color),
  ToggleSeasonFilter(Season),
  ToggleInventoryStateFilter(InventoryState),
  ToggleCareStateFilter(CareState),
  SetViewMode(ViewMode),
  SetSortBy(SortBy),
  ClearError,
}

impl Action {
  /// Stable name used in logs. Matches the serde `type` tag.
  pub fn name(&self) -> &'static str {
    match self {
      Self::AddItem(_) => "add_item",
      Self::UpdateItem { .. } => "update_item",
      Self::LogWear { .. } => "log_wear",
      Self::SetInventoryState { .. } => "set_inventory_state",
      Self::MarkCareComplete(_) => "mark_care_complete",
      Self::ToggleFavorite(_) => "toggle_favorite",
      Self::DeleteItem(_) => "delete_item",
      Self::SaveOutfit(_) => "save_outfit",
      Self::DeleteOutfit(_) => "delete_outfit",
      Self::ToggleOutfitFavorite(_) => "toggle_outfit_favorite",
      Self::SetFilters(_) => "set_filters",
      Self::ClearFilters => "clear_filters",
      Self::ToggleCategoryFilter(_) => "toggle_category_filter",
      Self::ToggleColorFilter(_) => "toggle_color_filter",
      Self::ToggleSeasonFilter(_) => "toggle_season_filter",
      Self::ToggleInventoryStateFilter(_) => "toggle_inventory_state_filter",
      Self::ToggleCareStateFilter(_) => "toggle_care_state_filter",
      Self::SetViewMode(_) => "set_view_mode",
      Self::SetSortBy(_) => "set_sort_by",
      Self::ClearError => "clear_error",
    }
  }

  /// Intents that start a fresh request reset the recorded error, as does
  /// an explicit [`Action::ClearError`].
  pub(crate) fn clears_error(&self) -> bool {
    matches!(
      self,
      Self::AddItem(_)
        | Self::UpdateItem { .. }
        | Self::LogWear { .. }
        | Self::DeleteItem(_)
        | Self::ClearError
    )
  }

  /// Parse an intent from its JSON form, e.g.
  /// `{"type":"toggle_favorite","data":"<uuid>"}`.
  pub fn from_json(s: &str) -> Result<Self> { Ok(serde_json::from_str(s)?) }
}

// ─── Outcome ─────────────────────────────────────────────────────────────────

/// One record touched by an intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum Change {
  ItemInserted(Uuid),
  ItemUpdated(Uuid),
  /// Removal also prunes the id from every outfit.
  ItemRemoved(Uuid),
  OutfitInserted(Uuid),
  OutfitUpdated(Uuid),
  OutfitRemoved(Uuid),
}

/// What applying an intent changed. Filter and view intents, and deletes of
/// absent ids, change no records.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Outcome {
  pub changes: Vec<Change>,
}

impl Outcome {
  pub fn none() -> Self { Self::default() }

  pub fn single(change: Change) -> Self { Self { changes: vec![change] } }

  pub fn is_noop(&self) -> bool { self.changes.is_empty() }

  /// The id of the item created by an `AddItem` intent.
  pub fn inserted_item(&self) -> Option<Uuid> {
    self.changes.iter().find_map(|c| match c {
      Change::ItemInserted(id) => Some(*id),
      _ => None,
    })
  }
}
