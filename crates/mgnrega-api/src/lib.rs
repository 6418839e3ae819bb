//! JSON read API for MGNREGA district performance.
//!
//! Exposes an axum [`Router`] backed by any
//! [`PerformanceStore`](mgnrega_core::store::PerformanceStore) and any
//! [`RecordSource`]. Reads of stale districts refresh from the source inline.
//!
//! # Mounting
//!
//! ```rust,ignore
//! let app = mgnrega_api::app(AppState::new(store, source, &config));
//! axum::serve(listener, app).await?;
//! ```

pub mod detect;
pub mod districts;
pub mod error;
pub mod initialize;
pub mod performance;

use std::{path::PathBuf, sync::Arc};

use axum::{Router, routing::get};
use mgnrega_core::{freshness::FreshnessGate, store::PerformanceStore};
use mgnrega_ingest::{Ingestor, RecordSource, UpstreamConfig};
use serde::Deserialize;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `MGNREGA_*` environment variables.
#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
  pub host:            String,
  pub port:            u16,
  pub store_path:      PathBuf,
  /// Local document with the upstream schema, used when the remote source
  /// fails during initialization.
  pub fallback_path:   PathBuf,
  /// Age at which a district's newest measurement is considered stale.
  pub freshness_hours: i64,
  pub upstream:        UpstreamConfig,
}

impl Default for ServerConfig {
  fn default() -> Self {
    Self {
      host:            "127.0.0.1".to_owned(),
      port:            8000,
      store_path:      PathBuf::from("mgnrega.sqlite3"),
      fallback_path:   PathBuf::from("Server response.txt"),
      freshness_hours: 24,
      upstream:        UpstreamConfig::default(),
    }
  }
}

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S, R> {
  pub store:     Arc<S>,
  pub ingestor:  Arc<Ingestor<S, R>>,
  pub freshness: FreshnessGate,
}

impl<S, R> Clone for AppState<S, R> {
  fn clone(&self) -> Self {
    Self {
      store:     Arc::clone(&self.store),
      ingestor:  Arc::clone(&self.ingestor),
      freshness: self.freshness,
    }
  }
}

impl<S, R> AppState<S, R>
where
  S: PerformanceStore,
  R: RecordSource,
{
  pub fn new(store: Arc<S>, source: R, config: &ServerConfig) -> Self {
    let ingestor = Ingestor::new(Arc::clone(&store), source, config.fallback_path.clone());
    Self {
      store,
      ingestor: Arc::new(ingestor),
      freshness: FreshnessGate::from_hours(config.freshness_hours),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the API routes for `state`, unprefixed.
pub fn router<S, R>(state: AppState<S, R>) -> Router
where
  S: PerformanceStore + 'static,
  R: RecordSource + 'static,
{
  Router::new()
    .route("/districts/",                     get(districts::list::<S, R>))
    .route("/performance/{district_name}/",   get(performance::get_one::<S, R>))
    .route("/initialize/",                    get(initialize::handler::<S, R>))
    .route("/detect-district/",               get(detect::handler))
    .with_state(state)
}

/// The full HTTP application: [`router`] nested under `/api`, with request
/// tracing and permissive CORS.
pub fn app<S, R>(state: AppState<S, R>) -> Router
where
  S: PerformanceStore + 'static,
  R: RecordSource + 'static,
{
  Router::new()
    .nest("/api", router(state))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
}
