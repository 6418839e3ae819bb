//! Error types for the feed parser.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("malformed XML: {0}")]
  Xml(String),

  #[error("document has no <records> element")]
  MissingRecords,
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
