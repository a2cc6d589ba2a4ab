//! Classification vocabulary for wardrobe items and outfits.
//!
//! Every enumeration here is closed. Serde and strum share the same
//! kebab-case spelling, so `Subcategory::TShirt` is `"t-shirt"` on the wire,
//! in the database and on the command line.

use std::fmt;

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString};

use crate::{Error, Result};

// ─── Category ────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Category {
  Tops,
  Bottoms,
  Outerwear,
  Suits,
  Shoes,
  Accessories,
}

/// A garment type. Each subcategory belongs to exactly one [`Category`].
#[derive(
  Debug,
  Clone,
  Copy,
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
pub enum Subcategory {
  // ── Tops ────────────────────────────────────────────────────────────────
  TShirt,
  Shirt,
  Polo,
  Sweater,
  Hoodie,
  Tank,
  Blouse,

  // ── Bottoms ─────────────────────────────────────────────────────────────
  Jeans,
  Chinos,
  Trousers,
  Shorts,
  Skirt,

  // ── Outerwear ───────────────────────────────────────────────────────────
  Jacket,
  Blazer,
  Coat,
  Vest,
  Cardigan,

  // ── Suits ───────────────────────────────────────────────────────────────
  SuitJacket,
  SuitPants,
  FullSuit,

  // ── Shoes ───────────────────────────────────────────────────────────────
  Sneakers,
  DressShoes,
  Boots,
  Loafers,
  Sandals,
  ChelseaBoots,

  // ── Accessories ─────────────────────────────────────────────────────────
  Belt,
  Watch,
  Tie,
  Scarf,
  Hat,
  Bag,
  Sunglasses,
  Jewelry,
}

impl Subcategory {
  /// The category this subcategory is scoped to.
  pub fn category(self) -> Category {
    match self {
      Self::TShirt
      | Self::Shirt
      | Self::Polo
      | Self::Sweater
      | Self::Hoodie
      | Self::Tank
      | Self::Blouse => Category::Tops,
      Self::Jeans | Self::Chinos | Self::Trousers | Self::Shorts | Self::Skirt => {
        Category::Bottoms
      }
      Self::Jacket | Self::Blazer | Self::Coat | Self::Vest | Self::Cardigan => {
        Category::Outerwear
      }
      Self::SuitJacket | Self::SuitPants | Self::FullSuit => Category::Suits,
      Self::Sneakers
      | Self::DressShoes
      | Self::Boots
      | Self::Loafers
      | Self::Sandals
      | Self::ChelseaBoots => Category::Shoes,
      Self::Belt
      | Self::Watch
      | Self::Tie
      | Self::Scarf
      | Self::Hat
      | Self::Bag
      | Self::Sunglasses
      | Self::Jewelry => Category::Accessories,
    }
  }
}

// ─── Appearance ──────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Color {
  Black,
  White,
  Navy,
  Grey,
  Charcoal,
  Brown,
  Tan,
  Beige,
  Cream,
  Blue,
  LightBlue,
  Red,
  Burgundy,
  Green,
  Olive,
  Pink,
  Purple,
  Orange,
  Yellow,
  Multi,
}

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
pub enum Pattern {
  #[default]
  Solid,
  Striped,
  Checked,
  Plaid,
  Floral,
  Printed,
  Textured,
  Herringbone,
  Houndstooth,
}

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
pub enum Material {
  #[default]
  Cotton,
  Wool,
  Linen,
  Silk,
  Leather,
  Suede,
  Denim,
  Polyester,
  Nylon,
  Cashmere,
  Velvet,
  Synthetic,
  Blend,
}

// ─── Context ─────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Hash,
  PartialOrd,
  Ord,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumIter,
  EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Season {
  Spring,
  Summer,
  Autumn,
  Winter,
  AllSeason,
}

/// How dressy an item is: 1 is very casual, 5 is very formal.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(try_from = "u8", into = "u8")]
pub struct Formality(u8);

impl Formality {
  pub const MIN: u8 = 1;
  pub const MAX: u8 = 5;

  pub fn get(self) -> u8 { self.0 }
}

impl Default for Formality {
  fn default() -> Self { Self(3) }
}

impl TryFrom<u8> for Formality {
  type Error = Error;

  fn try_from(value: u8) -> Result<Self> {
    if (Self::MIN..=Self::MAX).contains(&value) {
      Ok(Self(value))
    } else {
      Err(Error::validation(format!(
        "formality must be between {} and {}, got {value}",
        Self::MIN,
        Self::MAX
      )))
    }
  }
}

impl From<Formality> for u8 {
  fn from(f: Formality) -> Self { f.0 }
}

impl fmt::Display for Formality {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

// ─── Details ─────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Fit {
  Slim,
  Regular,
  Relaxed,
  Oversized,
}

/// Physical condition of a garment.
#[derive(
  Debug,
  Clone,
  Copy,
  Default,
  PartialEq,
  Eq,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Condition {
  #[default]
  New,
  Excellent,
  Good,
  Fair,
  Worn,
}

// ─── Outfits ─────────────────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
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
pub enum Occasion {
  Work,
  Casual,
  Formal,
  Date,
  Workout,
  Outdoor,
  Travel,
  Event,
}
