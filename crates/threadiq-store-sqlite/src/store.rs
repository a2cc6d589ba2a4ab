//! [`SqliteStore`] — the SQLite implementation of [`WardrobeStore`].

use std::{collections::HashMap, path::Path};

use rusqlite::Transaction;
use threadiq_core::{
  item::WardrobeItem,
  outfit::Outfit,
  store::{WardrobeStore, WriteBatch},
};

use crate::{
  Error, Result,
  encode::{EncodedOp, ItemRow, OutfitRow, RawOutfit, decode_item, decode_uuid},
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A ThreadIQ wardrobe store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

/// Why a transaction was rolled back without a database error.
enum Rejection {
  StaleItem(String),
  MissingOutfit(String),
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── Writes ──────────────────────────────────────────────────────────────────

fn insert_item(tx: &Transaction<'_>, row: &ItemRow) -> rusqlite::Result<()> {
  tx.execute(
    "INSERT INTO items (
       item_id, category, inventory_state, care_state,
       wear_count, created_at, updated_at, body_json
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
    rusqlite::params![
      row.item_id,
      row.category,
      row.inventory_state,
      row.care_state,
      row.wear_count,
      row.created_at,
      row.updated_at,
      row.body_json,
    ],
  )?;
  Ok(())
}

fn update_item(
  tx: &Transaction<'_>,
  row: &ItemRow,
  expected_updated_at: &str,
) -> rusqlite::Result<bool> {
  let n = tx.execute(
    "UPDATE items
        SET category = ?2, inventory_state = ?3, care_state = ?4,
            wear_count = ?5, updated_at = ?6, body_json = ?7
      WHERE item_id = ?1 AND updated_at = ?8",
    rusqlite::params![
      row.item_id,
      row.category,
      row.inventory_state,
      row.care_state,
      row.wear_count,
      row.updated_at,
      row.body_json,
      expected_updated_at,
    ],
  )?;
  Ok(n == 1)
}

fn write_members(tx: &Transaction<'_>, row: &OutfitRow) -> rusqlite::Result<()> {
  tx.execute(
    "DELETE FROM outfit_items WHERE outfit_id = ?1",
    rusqlite::params![row.outfit_id],
  )?;
  let mut stmt = tx.prepare(
    "INSERT INTO outfit_items (outfit_id, item_id, position) VALUES (?1, ?2, ?3)",
  )?;
  for (position, item_id) in row.item_ids.iter().enumerate() {
    stmt.execute(rusqlite::params![row.outfit_id, item_id, position as i64])?;
  }
  Ok(())
}

fn insert_outfit(tx: &Transaction<'_>, row: &OutfitRow) -> rusqlite::Result<()> {
  tx.execute(
    "INSERT INTO outfits (outfit_id, state, created_at, updated_at, body_json)
     VALUES (?1, ?2, ?3, ?4, ?5)",
    rusqlite::params![
      row.outfit_id,
      row.state,
      row.created_at,
      row.updated_at,
      row.body_json,
    ],
  )?;
  write_members(tx, row)
}

fn update_outfit(tx: &Transaction<'_>, row: &OutfitRow) -> rusqlite::Result<bool> {
  let n = tx.execute(
    "UPDATE outfits SET state = ?2, updated_at = ?3, body_json = ?4
      WHERE outfit_id = ?1",
    rusqlite::params![row.outfit_id, row.state, row.updated_at, row.body_json],
  )?;
  if n == 0 {
    return Ok(false);
  }
  write_members(tx, row)?;
  Ok(true)
}

/// Apply `ops` inside `tx`. Returns the first rejection, if any; the caller
/// must then drop `tx` uncommitted.
fn apply_ops(
  tx: &Transaction<'_>,
  ops: &[EncodedOp],
) -> rusqlite::Result<Option<Rejection>> {
  for op in ops {
    match op {
      EncodedOp::InsertItem(row) => insert_item(tx, row)?,
      EncodedOp::UpdateItem { row, expected_updated_at } => {
        if !update_item(tx, row, expected_updated_at)? {
          return Ok(Some(Rejection::StaleItem(row.item_id.clone())));
        }
      }
      EncodedOp::DeleteItem(id) => {
        // Membership rows go with it via ON DELETE CASCADE.
        tx.execute("DELETE FROM items WHERE item_id = ?1", rusqlite::params![id])?;
      }
      EncodedOp::InsertOutfit(row) => insert_outfit(tx, row)?,
      EncodedOp::UpdateOutfit(row) => {
        if !update_outfit(tx, row)? {
          return Ok(Some(Rejection::MissingOutfit(row.outfit_id.clone())));
        }
      }
      EncodedOp::DeleteOutfit(id) => {
        tx.execute(
          "DELETE FROM outfits WHERE outfit_id = ?1",
          rusqlite::params![id],
        )?;
      }
    }
  }
  Ok(None)
}

// ─── WardrobeStore impl ──────────────────────────────────────────────────────

impl WardrobeStore for SqliteStore {
  type Error = Error;

  async fn load_items(&self) -> Result<Vec<WardrobeItem>> {
    let bodies: Vec<String> = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare("SELECT body_json FROM items ORDER BY rowid DESC")?;
        let rows = stmt
          .query_map([], |row| row.get(0))?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    bodies.iter().map(|b| decode_item(b)).collect()
  }

  async fn load_outfits(&self) -> Result<Vec<Outfit>> {
    let raws: Vec<RawOutfit> = self
      .conn
      .call(|conn| {
        let mut members: HashMap<String, Vec<String>> = HashMap::new();
        {
          let mut stmt = conn.prepare(
            "SELECT outfit_id, item_id FROM outfit_items
              ORDER BY outfit_id, position",
          )?;
          let mut rows = stmt.query([])?;
          while let Some(row) = rows.next()? {
            let outfit_id: String = row.get(0)?;
            members.entry(outfit_id).or_default().push(row.get(1)?);
          }
        }

        let mut stmt = conn
          .prepare("SELECT outfit_id, body_json FROM outfits ORDER BY rowid ASC")?;
        let outfits = stmt
          .query_map([], |row| {
            let outfit_id: String = row.get(0)?;
            Ok(RawOutfit {
              body_json: row.get(1)?,
              item_ids:  members.remove(&outfit_id).unwrap_or_default(),
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(outfits)
      })
      .await?;

    raws.into_iter().map(RawOutfit::into_outfit).collect()
  }

  async fn commit(&self, batch: WriteBatch) -> Result<()> {
    let ops = batch
      .ops
      .iter()
      .map(EncodedOp::encode)
      .collect::<Result<Vec<_>>>()?;
    let op_count = ops.len();

    let rejection = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let rejection = apply_ops(&tx, &ops)?;
        if rejection.is_none() {
          tx.commit()?;
        }
        Ok(rejection)
      })
      .await?;

    match rejection {
      None => {
        tracing::debug!(ops = op_count, "batch committed");
        Ok(())
      }
      Some(Rejection::StaleItem(id)) => Err(Error::StaleWrite(decode_uuid(&id)?)),
      Some(Rejection::MissingOutfit(id)) => {
        Err(Error::OutfitNotFound(decode_uuid(&id)?))
      }
    }
  }
}
