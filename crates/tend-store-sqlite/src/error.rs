//! Error type for `tend-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] tend_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A check-in or echo referenced a relationship that does not exist.
  #[error("relationship not found: {0}")]
  RelationshipNotFound(uuid::Uuid),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
