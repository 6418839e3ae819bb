//! Handler for `GET /initialize/`.

use axum::{
  Json,
  extract::State,
  http::StatusCode,
  response::{IntoResponse, Response},
};
use mgnrega_core::store::PerformanceStore;
use mgnrega_ingest::RecordSource;
use serde::Serialize;

use crate::AppState;

#[derive(Debug, Serialize)]
struct InitStatus {
  status:  &'static str,
  message: &'static str,
}

/// `GET /initialize/`: populate the store from upstream, falling back to the
/// configured local document.
pub async fn handler<S, R>(State(state): State<AppState<S, R>>) -> Response
where
  S: PerformanceStore,
  R: RecordSource,
{
  match state.ingestor.initialize().await {
    Ok(outcome) => Json(InitStatus {
      status:  "success",
      message: outcome.message(),
    })
    .into_response(),
    Err(_) => (
      StatusCode::INTERNAL_SERVER_ERROR,
      Json(InitStatus {
        status:  "error",
        message: "Failed to initialize data",
      }),
    )
      .into_response(),
  }
}
