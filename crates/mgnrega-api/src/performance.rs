//! Handler for `GET /performance/{district_name}/`.
//!
//! Reads the stored measurements for a district and, when the newest one is
//! missing or older than the freshness window, refreshes that district from
//! upstream once before answering. A failed refresh still answers with
//! whatever is stored.

use axum::{
  Json,
  extract::{Path, State},
};
use chrono::{DateTime, Utc};
use mgnrega_core::{
  district::District,
  freshness::Freshness,
  measurement::{Measurement, MeasurementFields},
  store::PerformanceStore,
};
use mgnrega_ingest::RecordSource;
use serde::Serialize;

use crate::{AppState, error::ApiError};

/// One measurement as served to clients, denormalised with its district's
/// display names.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PerformanceRecord {
  pub id:            i64,
  /// District code.
  pub district:      String,
  pub fin_year:      String,
  pub month:         String,
  #[serde(flatten)]
  pub fields:        MeasurementFields,
  pub last_updated:  DateTime<Utc>,
  pub district_name: String,
  pub state_name:    String,
}

impl PerformanceRecord {
  fn new(m: Measurement, district: &District) -> Self {
    Self {
      id:            m.measurement_id,
      district:      m.key.district_code,
      fin_year:      m.key.fin_year,
      month:         m.key.month,
      fields:        m.fields,
      last_updated:  m.last_updated,
      district_name: district.district_name.clone(),
      state_name:    district.state_name.clone(),
    }
  }
}

/// `GET /performance/{district_name}/`
pub async fn get_one<S, R>(
  State(state): State<AppState<S, R>>,
  Path(district_name): Path<String>,
) -> Result<Json<Vec<PerformanceRecord>>, ApiError>
where
  S: PerformanceStore,
  R: RecordSource,
{
  let district = state
    .store
    .find_district_by_name(district_name.clone())
    .await
    .map_err(ApiError::store)?
    .ok_or_else(|| ApiError::NotFound("District not found".to_owned()))?;

  let mut measurements = state
    .store
    .measurements_for_district(district.district_code.clone())
    .await
    .map_err(ApiError::store)?;

  let latest = measurements.first().map(|m| m.last_updated);
  if let Freshness::Stale(reason) = state.freshness.assess(latest, Utc::now()) {
    tracing::info!(
      district_code = %district.district_code,
      ?reason,
      "stored performance data is stale; refreshing"
    );
    if state
      .ingestor
      .ingest_from_remote(Some(district_name.as_str()))
      .await
      .is_err()
    {
      tracing::info!(
        district_code = %district.district_code,
        stored = measurements.len(),
        "refresh failed; serving stored data"
      );
    }

    measurements = state
      .store
      .measurements_for_district(district.district_code.clone())
      .await
      .map_err(ApiError::store)?;
  }

  let records = measurements
    .into_iter()
    .map(|m| PerformanceRecord::new(m, &district))
    .collect();
  Ok(Json(records))
}
