//! The `PerformanceStore` trait.
//!
//! The trait is implemented by storage backends (e.g. `mgnrega-store-sqlite`).
//! The ingestion pipeline and the HTTP layer depend on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  district::District,
  measurement::{Measurement, MeasurementFields, PeriodKey, UpsertOutcome},
};

/// Abstraction over a relational store of districts and their measurements.
///
/// All methods return `Send` futures so the trait can be used in multi-threaded
/// async runtimes (e.g. tokio with `axum`).
pub trait PerformanceStore: Send + Sync {
  type Error: std::error::Error + Send + Sync + 'static;

  // ── Districts ─────────────────────────────────────────────────────────

  /// Get-or-create keyed by `candidate.district_code`.
  ///
  /// When the code is already known the stored district is returned as-is;
  /// the candidate's other attributes are ignored.
  fn resolve_district(
    &self,
    candidate: District,
  ) -> impl Future<Output = Result<District, Self::Error>> + Send + '_;

  /// Retrieve a district by code. Returns `None` if not found.
  fn get_district(
    &self,
    district_code: String,
  ) -> impl Future<Output = Result<Option<District>, Self::Error>> + Send + '_;

  /// Case-insensitive exact match on `district_name`. When several districts
  /// share a name, the first in storage order is returned.
  fn find_district_by_name(
    &self,
    name: String,
  ) -> impl Future<Output = Result<Option<District>, Self::Error>> + Send + '_;

  /// All districts in storage order.
  fn list_districts(
    &self,
  ) -> impl Future<Output = Result<Vec<District>, Self::Error>> + Send + '_;

  /// Delete a district together with all of its measurements.
  fn delete_district(
    &self,
    district_code: String,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;

  // ── Measurements ──────────────────────────────────────────────────────

  /// Overwrite the measurement stored under `key`, or create it.
  ///
  /// `last_updated` is set by the store. The referenced district must exist.
  fn upsert_measurement(
    &self,
    key: PeriodKey,
    fields: MeasurementFields,
  ) -> impl Future<Output = Result<(Measurement, UpsertOutcome), Self::Error>>
  + Send
  + '_;

  /// All measurements of a district, most recently refreshed first.
  fn measurements_for_district(
    &self,
    district_code: String,
  ) -> impl Future<Output = Result<Vec<Measurement>, Self::Error>> + Send + '_;

  /// Delete a single measurement; its district is left untouched.
  fn delete_measurement(
    &self,
    measurement_id: i64,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + '_;
}
