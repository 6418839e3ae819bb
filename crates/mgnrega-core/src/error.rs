//! Error types for `mgnrega-core`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("district not found: {0:?}")]
  DistrictNotFound(String),

  #[error("measurement not found: {0}")]
  MeasurementNotFound(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
