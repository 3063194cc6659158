//! Error types for `tend-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("unknown {kind}: {value:?}")]
  UnknownVariant { kind: &'static str, value: String },

  #[error("relationship name must not be empty")]
  EmptyName,

  #[error("check-in note must not be blank")]
  EmptyNote,

  #[error("analytics metadata must be a JSON object")]
  MetadataNotObject,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
