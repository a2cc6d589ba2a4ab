//! Outfits — compositions of wardrobe items referenced by id.
//!
//! An outfit never owns its items. Deleting an item prunes its id from every
//! outfit; the outfit itself survives, possibly empty.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};
use uuid::Uuid;

use crate::{
  item::dedup,
  taxonomy::{Occasion, Season},
};

/// Where an outfit is in its lifecycle. Transitions are caller-driven except
/// `Worn`, which is set by logging a wear against the outfit.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum OutfitState {
  Suggested,
  #[default]
  Saved,
  Worn,
  Archived,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Outfit {
  pub outfit_id:       Uuid,
  pub name:            Option<String>,
  /// Ordered, duplicate-free references into the item collection.
  pub item_ids:        Vec<Uuid>,
  pub occasion:        Occasion,
  pub seasons:         Vec<Season>,
  pub state:           OutfitState,
  pub worn_count:      u32,
  pub last_worn_at:    Option<DateTime<Utc>>,
  pub is_ai_generated: bool,
  /// Free-text explanation attached to a generated outfit.
  pub ai_reasoning:    Option<String>,
  pub notes:           Option<String>,
  pub is_favorite:     bool,
  pub created_at:      DateTime<Utc>,
  pub updated_at:      DateTime<Utc>,
}

impl Outfit {
  /// A saved, never-worn outfit with a fresh id and timestamps set to now.
  pub fn new(item_ids: Vec<Uuid>, occasion: Occasion) -> Self {
    let now = Utc::now();
    Self {
      outfit_id: Uuid::new_v4(),
      name: None,
      item_ids: dedup(item_ids),
      occasion,
      seasons: vec![Season::AllSeason],
      state: OutfitState::Saved,
      worn_count: 0,
      last_worn_at: None,
      is_ai_generated: false,
      ai_reasoning: None,
      notes: None,
      is_favorite: false,
      created_at: now,
      updated_at: now,
    }
  }

  pub fn with_name(mut self, name: impl Into<String>) -> Self {
    self.name = Some(name.into());
    self
  }

  /// Count a wear of the whole outfit at `worn_at`.
  pub(crate) fn record_wear(&mut self, worn_at: DateTime<Utc>, now: DateTime<Utc>) {
    self.worn_count = self.worn_count.saturating_add(1);
    self.last_worn_at = Some(worn_at);
    self.state = OutfitState::Worn;
    self.touch(now);
  }

  /// Drop `item_id` from the composition. Returns whether it was present.
  pub(crate) fn remove_item(&mut self, item_id: Uuid) -> bool {
    let before = self.item_ids.len();
    self.item_ids.retain(|id| *id != item_id);
    self.item_ids.len() != before
  }

  pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
    self.updated_at = now.max(self.created_at);
  }
}
