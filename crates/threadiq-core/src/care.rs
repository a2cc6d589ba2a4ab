//! Care profiles, inventory and care states, and the care-state deriver.
//!
//! The care state of an item is never stored on its own terms: it is always
//! recomputed from the wear count, the care profile and the inventory state
//! by [`derive_care_state`].

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

/// Fraction of the care threshold at which an item becomes due soon.
pub const DUE_SOON_FRACTION: f64 = 0.8;

/// Wears before care for everything except dry-clean garments.
pub const DEFAULT_WEARS_BEFORE_CARE: u32 = 3;

/// Wears before care for dry-clean garments.
pub const DRY_CLEAN_WEARS_BEFORE_CARE: u32 = 5;

// ─── Care type ───────────────────────────────────────────────────────────────

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
pub enum CareType {
  #[default]
  MachineWash,
  HandWash,
  DryClean,
  SpotClean,
  AirOnly,
  LeatherCare,
}

impl CareType {
  /// Default number of wears between two cleanings.
  pub fn default_wears_before_care(self) -> u32 {
    match self {
      Self::DryClean => DRY_CLEAN_WEARS_BEFORE_CARE,
      _ => DEFAULT_WEARS_BEFORE_CARE,
    }
  }
}

/// How an item is cleaned and how often. Embedded in every item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CareProfile {
  pub care_type:         CareType,
  /// Wears allowed before the item needs care; always positive.
  pub wears_before_care: u32,
  pub last_cared_at:     Option<DateTime<Utc>>,
  pub notes:             Option<String>,
}

impl CareProfile {
  /// A never-cared-for profile with the threshold defaulted by care type.
  pub fn new(care_type: CareType) -> Self {
    Self {
      care_type,
      wears_before_care: care_type.default_wears_before_care(),
      last_cared_at: None,
      notes: None,
    }
  }
}

impl Default for CareProfile {
  fn default() -> Self { Self::new(CareType::default()) }
}

// ─── Inventory state ─────────────────────────────────────────────────────────

/// Where an item currently is.
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
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum InventoryState {
  #[default]
  Available,
  InLaundry,
  InDryCleaning,
  InRepair,
  Archived,
  Donated,
  Sold,
}

impl InventoryState {
  /// Whether the item is currently being laundered or dry-cleaned.
  pub fn is_being_cared_for(self) -> bool {
    matches!(self, Self::InLaundry | Self::InDryCleaning)
  }
}

// ─── Care state ──────────────────────────────────────────────────────────────

/// Laundering urgency, derived from wear count, profile and inventory state.
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
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum CareState {
  #[default]
  Clean,
  DueSoon,
  Overdue,
  InCare,
}

impl CareState {
  /// Due soon or overdue.
  pub fn needs_attention(self) -> bool {
    matches!(self, Self::DueSoon | Self::Overdue)
  }
}

// ─── Deriver ─────────────────────────────────────────────────────────────────

/// Compute the care state of an item.
///
/// Items in the laundry or at the dry cleaner are always `InCare`. An item
/// that has never been cared for compares its total wear count against the
/// threshold. Once cared for, the wear count is taken modulo the threshold,
/// an approximation of wears since the last care that cycles rather than
/// tracking the true count.
pub fn derive_care_state(
  wear_count: u32,
  profile: &CareProfile,
  inventory_state: InventoryState,
) -> CareState {
  if inventory_state.is_being_cared_for() {
    return CareState::InCare;
  }

  let threshold = profile.wears_before_care.max(1);
  let wears = match profile.last_cared_at {
    None => wear_count,
    Some(_) => wear_count % threshold,
  };

  if wears >= threshold {
    CareState::Overdue
  } else if wears >= due_soon_at(threshold) {
    CareState::DueSoon
  } else {
    CareState::Clean
  }
}

/// First whole wear count that counts as due soon for `threshold`.
fn due_soon_at(threshold: u32) -> u32 {
  // Wears are whole numbers, so the fractional boundary rounds down.
  let at = (f64::from(threshold) * DUE_SOON_FRACTION).floor() as u32;
  at.max(1)
}
