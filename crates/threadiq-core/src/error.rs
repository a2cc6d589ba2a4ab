//! Error types for `threadiq-core`.

use thiserror::Error;
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum Error {
  /// A creation or update payload is missing a required field or carries an
  /// out-of-range value. Nothing was applied.
  #[error("validation error: {0}")]
  Validation(String),

  #[error("item not found: {0}")]
  ItemNotFound(Uuid),

  #[error("outfit not found: {0}")]
  OutfitNotFound(Uuid),

  /// The persistence backend rejected or failed a write. The in-memory state
  /// is left as it was before the intent.
  #[error("transient failure: {0}")]
  Transient(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

impl Error {
  pub(crate) fn validation(msg: impl Into<String>) -> Self {
    Self::Validation(msg.into())
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
