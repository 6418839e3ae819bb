//! Handler for `GET /districts/`.

use axum::{Json, extract::State};
use mgnrega_core::{district::District, store::PerformanceStore};
use mgnrega_ingest::RecordSource;

use crate::{AppState, error::ApiError};

/// `GET /districts/`: every known district, in storage order.
pub async fn list<S, R>(
  State(state): State<AppState<S, R>>,
) -> Result<Json<Vec<District>>, ApiError>
where
  S: PerformanceStore,
  R: RecordSource,
{
  let districts = state
    .store
    .list_districts()
    .await
    .map_err(ApiError::store)?;
  Ok(Json(districts))
}
