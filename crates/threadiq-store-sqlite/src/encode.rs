//! Encoding and decoding helpers between domain records and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings with nanosecond precision, so an
//! `updated_at` written by one commit compares equal when the next commit
//! checks it. Records are stored as compact JSON. UUIDs are stored as
//! hyphenated lowercase strings.

use chrono::{DateTime, SecondsFormat, Utc};
use threadiq_core::{item::WardrobeItem, outfit::Outfit, store::WriteOp};
use uuid::Uuid;

use crate::Result;

// ─── Uuid ────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

// ─── Rows to write ───────────────────────────────────────────────────────────

/// Column values for one `items` row.
pub struct ItemRow {
  pub item_id:         String,
  pub category:        String,
  pub inventory_state: String,
  pub care_state:      String,
  pub wear_count:      i64,
  pub created_at:      String,
  pub updated_at:      String,
  pub body_json:       String,
}

impl ItemRow {
  pub fn encode(item: &WardrobeItem) -> Result<Self> {
    Ok(Self {
      item_id:         encode_uuid(item.item_id),
      category:        item.category.as_ref().to_owned(),
      inventory_state: item.inventory_state.as_ref().to_owned(),
      care_state:      item.care_state.as_ref().to_owned(),
      wear_count:      i64::from(item.wear_count),
      created_at:      encode_dt(item.created_at),
      updated_at:      encode_dt(item.updated_at),
      body_json:       serde_json::to_string(item)?,
    })
  }
}

/// Column values for one `outfits` row plus its ordered membership.
pub struct OutfitRow {
  pub outfit_id:  String,
  pub state:      String,
  pub created_at: String,
  pub updated_at: String,
  pub body_json:  String,
  pub item_ids:   Vec<String>,
}

impl OutfitRow {
  pub fn encode(outfit: &Outfit) -> Result<Self> {
    let item_ids = outfit.item_ids.iter().copied().map(encode_uuid).collect();
    let body = Outfit { item_ids: Vec::new(), ..outfit.clone() };
    Ok(Self {
      outfit_id: encode_uuid(outfit.outfit_id),
      state: outfit.state.as_ref().to_owned(),
      created_at: encode_dt(outfit.created_at),
      updated_at: encode_dt(outfit.updated_at),
      body_json: serde_json::to_string(&body)?,
      item_ids,
    })
  }
}

/// A [`WriteOp`] with every value already encoded, ready to move onto the
/// database thread.
pub enum EncodedOp {
  InsertItem(ItemRow),
  UpdateItem { row: ItemRow, expected_updated_at: String },
  DeleteItem(String),
  InsertOutfit(OutfitRow),
  UpdateOutfit(OutfitRow),
  DeleteOutfit(String),
}

impl EncodedOp {
  pub fn encode(op: &WriteOp) -> Result<Self> {
    Ok(match op {
      WriteOp::InsertItem(item) => Self::InsertItem(ItemRow::encode(item)?),
      WriteOp::UpdateItem { item, expected_updated_at } => Self::UpdateItem {
        row:                 ItemRow::encode(item)?,
        expected_updated_at: encode_dt(*expected_updated_at),
      },
      WriteOp::DeleteItem(id) => Self::DeleteItem(encode_uuid(*id)),
      WriteOp::InsertOutfit(outfit) => Self::InsertOutfit(OutfitRow::encode(outfit)?),
      WriteOp::UpdateOutfit(outfit) => Self::UpdateOutfit(OutfitRow::encode(outfit)?),
      WriteOp::DeleteOutfit(id) => Self::DeleteOutfit(encode_uuid(*id)),
    })
  }
}

// ─── Rows read back ──────────────────────────────────────────────────────────

/// Raw strings read directly from an `outfits` row and its membership rows.
pub struct RawOutfit {
  pub body_json: String,
  pub item_ids:  Vec<String>,
}

impl RawOutfit {
  pub fn into_outfit(self) -> Result<Outfit> {
    let mut outfit: Outfit = serde_json::from_str(&self.body_json)?;
    outfit.item_ids = self
      .item_ids
      .iter()
      .map(|s| decode_uuid(s))
      .collect::<Result<_>>()?;
    Ok(outfit)
  }
}

pub fn decode_item(body_json: &str) -> Result<WardrobeItem> {
  Ok(serde_json::from_str(body_json)?)
}
