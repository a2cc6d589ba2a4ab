//! Wardrobe items — the core entity — and the payloads that create and
//! modify them.
//!
//! Payloads ([`NewItem`], [`ItemUpdate`]) carry optional fields. They are
//! validated into a fully-populated [`WardrobeItem`] before anything is
//! written to the state container, so a rejected payload never leaves a
//! half-applied item behind.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  care::{CareProfile, CareState, CareType, InventoryState, derive_care_state},
  taxonomy::{
    Category, Color, Condition, Fit, Formality, Material, Pattern, Season, Subcategory,
  },
};

// ─── WardrobeItem ────────────────────────────────────────────────────────────

/// A single garment or accessory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WardrobeItem {
  pub item_id:           Uuid,

  // ── Classification ──────────────────────────────────────────────────────
  pub category:          Category,
  pub subcategory:       Subcategory,

  // ── Appearance ──────────────────────────────────────────────────────────
  /// Never empty; no duplicates.
  pub colors:            Vec<Color>,
  pub pattern:           Pattern,
  pub material:          Material,

  // ── Context ─────────────────────────────────────────────────────────────
  pub seasons:           Vec<Season>,
  pub formality:         Formality,

  // ── Details ─────────────────────────────────────────────────────────────
  pub brand:             Option<String>,
  pub size:              Option<String>,
  pub fit:               Option<Fit>,
  pub purchase_date:     Option<NaiveDate>,
  pub purchase_price:    Option<f64>,
  pub purchase_location: Option<String>,

  // ── Condition & state ───────────────────────────────────────────────────
  pub condition:         Condition,
  pub inventory_state:   InventoryState,

  // ── Images ──────────────────────────────────────────────────────────────
  /// Opaque local or remote URI; never resolved by this crate.
  pub image_uri:         String,
  pub thumbnail_uri:     Option<String>,

  // ── Care ────────────────────────────────────────────────────────────────
  pub care_profile:      CareProfile,
  pub care_state:        CareState,

  // ── Usage ───────────────────────────────────────────────────────────────
  pub wear_count:        u32,
  pub last_worn_at:      Option<DateTime<Utc>>,

  // ── Metadata ────────────────────────────────────────────────────────────
  pub notes:             Option<String>,
  pub tags:              Vec<String>,
  pub is_favorite:       bool,
  pub created_at:        DateTime<Utc>,
  /// Always `>= created_at`.
  pub updated_at:        DateTime<Utc>,
}

impl WardrobeItem {
  /// Validate `input` and build a fresh item: available, clean, never worn.
  pub fn create(input: NewItem, now: DateTime<Utc>) -> Result<Self> {
    let image_uri = input
      .image_uri
      .filter(|uri| !uri.trim().is_empty())
      .ok_or_else(|| Error::validation("image_uri is required"))?;
    let category = input
      .category
      .ok_or_else(|| Error::validation("category is required"))?;
    let subcategory = input
      .subcategory
      .ok_or_else(|| Error::validation("subcategory is required"))?;
    check_subcategory(category, subcategory)?;
    let colors = dedup(input.colors);
    if colors.is_empty() {
      return Err(Error::validation("at least one color is required"));
    }
    let seasons = match input.seasons {
      Some(seasons) if !seasons.is_empty() => dedup(seasons),
      _ => vec![Season::AllSeason],
    };
    let formality = input.formality.map(Formality::try_from).transpose()?;
    let purchase_price = input.purchase_price.map(check_price).transpose()?;

    let notes = non_blank(input.notes);
    let mut care_profile = CareProfile::new(input.care_type.unwrap_or_default());
    care_profile.notes = notes.clone();

    Ok(Self {
      item_id: Uuid::new_v4(),
      category,
      subcategory,
      colors,
      pattern: input.pattern.unwrap_or_default(),
      material: input.material.unwrap_or_default(),
      seasons,
      formality: formality.unwrap_or_default(),
      brand: non_blank(input.brand),
      size: non_blank(input.size),
      fit: input.fit,
      purchase_date: input.purchase_date,
      purchase_price,
      purchase_location: non_blank(input.purchase_location),
      condition: Condition::New,
      inventory_state: InventoryState::Available,
      image_uri,
      thumbnail_uri: None,
      care_profile,
      care_state: CareState::Clean,
      wear_count: 0,
      last_worn_at: None,
      notes,
      tags: input.tags,
      is_favorite: false,
      created_at: now,
      updated_at: now,
    })
  }

  /// Return a copy of this item with `update` merged in. `self` is untouched,
  /// so a validation failure has no effect.
  ///
  /// The care state is re-derived only when the care type or threshold
  /// changes; other edits keep the current label.
  pub fn merged(&self, update: ItemUpdate, now: DateTime<Utc>) -> Result<Self> {
    let mut next = self.clone();

    if let Some(category) = update.category {
      next.category = category;
    }
    if let Some(subcategory) = update.subcategory {
      next.subcategory = subcategory;
    }
    check_subcategory(next.category, next.subcategory)?;

    if let Some(colors) = update.colors {
      let colors = dedup(colors);
      if colors.is_empty() {
        return Err(Error::validation("colors cannot be emptied"));
      }
      next.colors = colors;
    }
    if let Some(pattern) = update.pattern {
      next.pattern = pattern;
    }
    if let Some(material) = update.material {
      next.material = material;
    }
    if let Some(seasons) = update.seasons {
      next.seasons = if seasons.is_empty() {
        vec![Season::AllSeason]
      } else {
        dedup(seasons)
      };
    }
    if let Some(formality) = update.formality {
      next.formality = Formality::try_from(formality)?;
    }

    merge_text(&mut next.brand, update.brand);
    merge_text(&mut next.size, update.size);
    if let Some(fit) = update.fit {
      next.fit = Some(fit);
    }
    if let Some(date) = update.purchase_date {
      next.purchase_date = Some(date);
    }
    if let Some(price) = update.purchase_price {
      next.purchase_price = Some(check_price(price)?);
    }
    merge_text(&mut next.purchase_location, update.purchase_location);

    if let Some(condition) = update.condition {
      next.condition = condition;
    }
    if let Some(uri) = update.image_uri {
      if uri.trim().is_empty() {
        return Err(Error::validation("image_uri cannot be blank"));
      }
      next.image_uri = uri;
    }
    merge_text(&mut next.thumbnail_uri, update.thumbnail_uri);

    let care_before = (
      next.care_profile.care_type,
      next.care_profile.wears_before_care,
    );
    // Changing the care type re-defaults the threshold unless one is given.
    if let Some(care_type) = update.care_type
      && care_type != next.care_profile.care_type
    {
      next.care_profile.care_type = care_type;
      next.care_profile.wears_before_care = care_type.default_wears_before_care();
    }
    if let Some(threshold) = update.wears_before_care {
      if threshold == 0 {
        return Err(Error::validation("wears_before_care must be positive"));
      }
      next.care_profile.wears_before_care = threshold;
    }
    merge_text(&mut next.care_profile.notes, update.care_notes);

    merge_text(&mut next.notes, update.notes);
    if let Some(tags) = update.tags {
      next.tags = tags;
    }
    if let Some(favorite) = update.is_favorite {
      next.is_favorite = favorite;
    }

    let care_after = (
      next.care_profile.care_type,
      next.care_profile.wears_before_care,
    );
    if care_after != care_before {
      next.refresh_care_state();
    }
    next.touch(now);
    Ok(next)
  }

  /// Recompute `care_state` from the current wear count, profile and
  /// inventory state.
  pub fn refresh_care_state(&mut self) {
    self.care_state =
      derive_care_state(self.wear_count, &self.care_profile, self.inventory_state);
  }

  /// Record a mutation. `updated_at` never falls behind `created_at`.
  pub(crate) fn touch(&mut self, now: DateTime<Utc>) {
    self.updated_at = now.max(self.created_at);
  }

  /// Whether the item can be picked for an outfit right now.
  pub fn is_available(&self) -> bool {
    self.inventory_state == InventoryState::Available
  }
}

// ─── NewItem ─────────────────────────────────────────────────────────────────

/// Input to [`crate::state::WardrobeState::add_item`].
///
/// `image_uri`, `category`, `subcategory` and a non-empty `colors` list are
/// required; every other field falls back to a default when absent.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NewItem {
  pub image_uri:         Option<String>,
  pub category:          Option<Category>,
  pub subcategory:       Option<Subcategory>,
  pub colors:            Vec<Color>,
  pub pattern:           Option<Pattern>,
  pub material:          Option<Material>,
  pub seasons:           Option<Vec<Season>>,
  /// 1–5; defaults to 3.
  pub formality:         Option<u8>,
  pub brand:             Option<String>,
  pub size:              Option<String>,
  pub fit:               Option<Fit>,
  pub purchase_date:     Option<NaiveDate>,
  pub purchase_price:    Option<f64>,
  pub purchase_location: Option<String>,
  pub care_type:         Option<CareType>,
  pub notes:             Option<String>,
  pub tags:              Vec<String>,
}

impl NewItem {
  /// Convenience constructor with every optional field left unset.
  pub fn new(
    image_uri: impl Into<String>,
    category: Category,
    subcategory: Subcategory,
    colors: Vec<Color>,
  ) -> Self {
    Self {
      image_uri: Some(image_uri.into()),
      category: Some(category),
      subcategory: Some(subcategory),
      colors,
      ..Self::default()
    }
  }
}

// ─── ItemUpdate ──────────────────────────────────────────────────────────────

/// A partial update merged into an existing item.
///
/// `None` leaves a field alone. For optional text fields an empty string
/// clears the value. Identity, creation time, wear tracking, care state and
/// inventory state are not part of this payload; they change only through
/// their dedicated intents.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemUpdate {
  pub category:          Option<Category>,
  pub subcategory:       Option<Subcategory>,
  pub colors:            Option<Vec<Color>>,
  pub pattern:           Option<Pattern>,
  pub material:          Option<Material>,
  pub seasons:           Option<Vec<Season>>,
  pub formality:         Option<u8>,
  pub brand:             Option<String>,
  pub size:              Option<String>,
  pub fit:               Option<Fit>,
  pub purchase_date:     Option<NaiveDate>,
  pub purchase_price:    Option<f64>,
  pub purchase_location: Option<String>,
  pub condition:         Option<Condition>,
  pub image_uri:         Option<String>,
  pub thumbnail_uri:     Option<String>,
  pub care_type:         Option<CareType>,
  pub wears_before_care: Option<u32>,
  pub care_notes:        Option<String>,
  pub notes:             Option<String>,
  pub tags:              Option<Vec<String>>,
  pub is_favorite:       Option<bool>,
}

// ─── Helpers ─────────────────────────────────────────────────────────────────

fn check_subcategory(category: Category, subcategory: Subcategory) -> Result<()> {
  if subcategory.category() == category {
    Ok(())
  } else {
    Err(Error::validation(format!(
      "subcategory {subcategory} does not belong to category {category}"
    )))
  }
}

fn check_price(price: f64) -> Result<f64> {
  if price.is_finite() && price >= 0.0 {
    Ok(price)
  } else {
    Err(Error::validation(format!(
      "purchase_price must be a non-negative amount, got {price}"
    )))
  }
}

/// Remove repeated values, keeping the first occurrence of each.
pub(crate) fn dedup<T: PartialEq>(values: Vec<T>) -> Vec<T> {
  let mut out: Vec<T> = Vec::with_capacity(values.len());
  for v in values {
    if !out.contains(&v) {
      out.push(v);
    }
  }
  out
}

fn non_blank(value: Option<String>) -> Option<String> {
  value.filter(|s| !s.trim().is_empty())
}

fn merge_text(field: &mut Option<String>, update: Option<String>) {
  if let Some(value) = update {
    *field = non_blank(Some(value));
  }
}
