//! Error types for `mgnrega-ingest`.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("upstream request failed: {0}")]
  Http(#[from] reqwest::Error),

  #[error("upstream returned HTTP {0}")]
  Status(u16),

  #[error("feed error: {0}")]
  Feed(#[from] mgnrega_feed::Error),

  #[error("cannot read {}: {source}", path.display())]
  Io {
    path:   PathBuf,
    #[source]
    source: std::io::Error,
  },

  #[error("store error: {0}")]
  Store(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Both paths of [`Ingestor::initialize`](crate::Ingestor::initialize) failed.
#[derive(Debug, Error)]
#[error("remote ingest failed ({remote}); local fallback failed ({local})")]
pub struct InitError {
  pub remote: Error,
  pub local:  Error,
}
