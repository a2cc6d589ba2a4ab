//! SQL schema for the ThreadIQ SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE TABLE IF NOT EXISTS`.
///
/// Each record is stored whole in `body_json`. The other columns duplicate
/// the fields worth indexing and the `updated_at` used for stale-write
/// checks.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS items (
    item_id         TEXT PRIMARY KEY,
    category        TEXT NOT NULL,
    inventory_state TEXT NOT NULL,
    care_state      TEXT NOT NULL,
    wear_count      INTEGER NOT NULL DEFAULT 0,
    created_at      TEXT NOT NULL,   -- RFC 3339 UTC
    updated_at      TEXT NOT NULL,   -- RFC 3339 UTC, nanosecond precision
    body_json       TEXT NOT NULL
);

-- item_ids are kept out of body_json; membership lives in outfit_items.
CREATE TABLE IF NOT EXISTS outfits (
    outfit_id  TEXT PRIMARY KEY,
    state      TEXT NOT NULL,
    created_at TEXT NOT NULL,
    updated_at TEXT NOT NULL,
    body_json  TEXT NOT NULL
);

-- Deleting either side removes the membership row, which is what prunes
-- deleted items out of outfits.
CREATE TABLE IF NOT EXISTS outfit_items (
    outfit_id TEXT NOT NULL REFERENCES outfits(outfit_id) ON DELETE CASCADE,
    item_id   TEXT NOT NULL REFERENCES items(item_id)     ON DELETE CASCADE,
    position  INTEGER NOT NULL,
    PRIMARY KEY (outfit_id, item_id)
);

CREATE INDEX IF NOT EXISTS items_category_idx    ON items(category);
CREATE INDEX IF NOT EXISTS items_care_state_idx  ON items(care_state);
CREATE INDEX IF NOT EXISTS outfit_items_item_idx ON outfit_items(item_id);

PRAGMA user_version = 1;
";
