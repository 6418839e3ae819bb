//! Handler for `GET /detect-district/`.
//!
//! There is no reverse geocoder behind this endpoint: it validates and echoes
//! the coordinates and always reports `district: null`.

use axum::{Json, extract::Query};
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

#[derive(Debug, Deserialize)]
pub struct DetectParams {
  pub lat: Option<String>,
  pub lon: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct DetectedLocation {
  pub message:   &'static str,
  pub latitude:  String,
  pub longitude: String,
  pub district:  Option<String>,
}

/// `GET /detect-district/?lat=<lat>&lon=<lon>`
pub async fn handler(
  Query(params): Query<DetectParams>,
) -> Result<Json<DetectedLocation>, ApiError> {
  let (Some(latitude), Some(longitude)) = (
    params.lat.filter(|s| !s.is_empty()),
    params.lon.filter(|s| !s.is_empty()),
  ) else {
    return Err(ApiError::BadRequest(
      "Latitude and longitude are required".to_owned(),
    ));
  };

  Ok(Json(DetectedLocation {
    message: "Geolocation detected successfully",
    latitude,
    longitude,
    district: None,
  }))
}
