//! Error type for `threadiq-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  /// An update expected a version of the item that is no longer stored.
  #[error("stale write to item {0}")]
  StaleWrite(uuid::Uuid),

  #[error("outfit not found: {0}")]
  OutfitNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
