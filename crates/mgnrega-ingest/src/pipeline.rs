//! [`Ingestor`] drives the record parser over a document and writes the
//! results through the store.

use std::{
  path::{Path, PathBuf},
  sync::Arc,
};

use mgnrega_core::{
  measurement::{PeriodKey, UpsertOutcome},
  store::PerformanceStore,
};
use mgnrega_feed::FeedItem;

use crate::{Error, InitError, RecordSource, Result};

/// Counts from one ingestion run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IngestReport {
  /// Items read from the document.
  pub items:   usize,
  /// Measurements inserted.
  pub created: usize,
  /// Measurements overwritten in place.
  pub updated: usize,
}

/// Which path of [`Ingestor::initialize`] produced the data.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InitOutcome {
  Remote(IngestReport),
  LocalFile(IngestReport),
}

impl InitOutcome {
  pub fn report(&self) -> IngestReport {
    match self {
      Self::Remote(r) | Self::LocalFile(r) => *r,
    }
  }

  /// Human-readable summary, as returned by `GET /initialize/`.
  pub fn message(&self) -> &'static str {
    match self {
      Self::Remote(_) => "Data initialized successfully from live API",
      Self::LocalFile(_) => "Data initialized from local file",
    }
  }
}

// ─── Ingestor ─────────────────────────────────────────────────────────────────

/// Fetches feed documents and upserts their contents into a store.
pub struct Ingestor<S, R> {
  store:         Arc<S>,
  source:        R,
  fallback_path: PathBuf,
}

impl<S, R> Ingestor<S, R>
where
  S: PerformanceStore,
  R: RecordSource,
{
  /// `fallback_path` is the local document used by [`Self::initialize`] when
  /// the remote source fails.
  pub fn new(store: Arc<S>, source: R, fallback_path: impl Into<PathBuf>) -> Self {
    Self { store, source, fallback_path: fallback_path.into() }
  }

  pub fn store(&self) -> &Arc<S> { &self.store }

  /// Fetch from the remote source (optionally filtered to one district name)
  /// and upsert every item.
  pub async fn ingest_from_remote(&self, district_name: Option<&str>) -> Result<IngestReport> {
    let result = async {
      let body = self.source.fetch(district_name.map(str::to_owned)).await?;
      self.ingest_document(&body).await
    }
    .await;

    match &result {
      Ok(report) => tracing::info!(
        ?district_name,
        items = report.items,
        created = report.created,
        updated = report.updated,
        "remote ingest complete"
      ),
      Err(e) => tracing::warn!(?district_name, error = %e, "remote ingest failed"),
    }
    result
  }

  /// Read a local document with the upstream schema and upsert every item.
  pub async fn ingest_from_local_file(&self, path: impl AsRef<Path>) -> Result<IngestReport> {
    let path = path.as_ref();
    let result = async {
      let body = tokio::fs::read(path)
        .await
        .map_err(|source| Error::Io { path: path.to_path_buf(), source })?;
      self.ingest_document(&body).await
    }
    .await;

    match &result {
      Ok(report) => tracing::info!(
        path = %path.display(),
        items = report.items,
        created = report.created,
        updated = report.updated,
        "local file ingest complete"
      ),
      Err(e) => tracing::warn!(path = %path.display(), error = %e, "local file ingest failed"),
    }
    result
  }

  /// Try the remote source; on failure fall back to the local document.
  pub async fn initialize(&self) -> Result<InitOutcome, InitError> {
    let remote = match self.ingest_from_remote(None).await {
      Ok(report) => return Ok(InitOutcome::Remote(report)),
      Err(e) => e,
    };

    tracing::info!(path = %self.fallback_path.display(), "falling back to local file");
    match self.ingest_from_local_file(&self.fallback_path).await {
      Ok(report) => Ok(InitOutcome::LocalFile(report)),
      Err(local) => {
        tracing::error!(%remote, %local, "initialization failed on both paths");
        Err(InitError { remote, local })
      }
    }
  }

  /// Parse `xml` and upsert every item in document order.
  ///
  /// The whole document is parsed before anything is written, so malformed
  /// XML leaves the store untouched. A store failure stops the run; items
  /// already written stay committed.
  pub async fn ingest_document(&self, xml: &[u8]) -> Result<IngestReport> {
    let items = mgnrega_feed::parse_document(xml)?;
    let mut report = IngestReport { items: items.len(), ..Default::default() };

    for item in &items {
      match self.ingest_item(item).await? {
        UpsertOutcome::Created => report.created += 1,
        UpsertOutcome::Updated => report.updated += 1,
      }
    }
    Ok(report)
  }

  async fn ingest_item(&self, item: &FeedItem) -> Result<UpsertOutcome> {
    let candidate = item.district();
    let district = self
      .store
      .resolve_district(candidate.clone())
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;

    if district.differs_from(&candidate) {
      tracing::debug!(
        district_code = %district.district_code,
        stored = %district.district_name,
        upstream = %candidate.district_name,
        "upstream district attributes differ from stored; keeping stored"
      );
    }

    let (fin_year, month) = item.period();
    let key = PeriodKey { district_code: district.district_code, fin_year, month };

    let (_, outcome) = self
      .store
      .upsert_measurement(key, item.measurement_fields())
      .await
      .map_err(|e| Error::Store(Box::new(e)))?;
    Ok(outcome)
  }
}
