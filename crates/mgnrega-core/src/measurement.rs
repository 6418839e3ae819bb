//! Measurement: one district's scheme performance for one reporting month.
//!
//! A measurement is keyed by `(district_code, fin_year, month)`. Re-ingesting
//! the same key overwrites every field in place; no history is retained.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

// ─── Key ─────────────────────────────────────────────────────────────────────

/// The natural key of a [`Measurement`].
///
/// `fin_year` and `month` are free text exactly as the feed publishes them
/// (e.g. `"2023-2024"`, `"April"`); they are never parsed into dates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PeriodKey {
  pub district_code: String,
  pub fin_year:      String,
  pub month:         String,
}

impl PeriodKey {
  pub fn new(
    district_code: impl Into<String>,
    fin_year: impl Into<String>,
    month: impl Into<String>,
  ) -> Self {
    Self {
      district_code: district_code.into(),
      fin_year:      fin_year.into(),
      month:         month.into(),
    }
  }
}

// ─── Scalar fields ───────────────────────────────────────────────────────────

/// Every scalar value carried by a measurement.
///
/// Numeric fields are `None` when the feed omitted them or published text
/// that could not be read as a number.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MeasurementFields {
  // Employment
  pub approved_labour_budget:             Option<i64>,
  pub average_wage_rate:                  Option<f64>,
  pub average_days_employment:            Option<i64>,
  pub differently_abled_persons_worked:   Option<i64>,
  pub material_and_skilled_wages:         Option<f64>,
  pub number_of_completed_works:          Option<i64>,
  pub number_of_gps_with_nil_exp:         Option<i64>,
  pub number_of_ongoing_works:            Option<i64>,
  pub persondays_central_liability:       Option<i64>,

  // Social category
  pub sc_persondays:                      Option<i64>,
  pub sc_workers_against_active_workers:  Option<i64>,
  pub st_persondays:                      Option<i64>,
  pub st_workers_against_active_workers:  Option<i64>,

  // Expenditure
  pub total_adm_expenditure:              Option<f64>,
  pub total_exp:                          Option<f64>,
  pub wages:                              Option<f64>,

  // Households and workers
  pub total_households_worked:            Option<i64>,
  pub total_individuals_worked:           Option<i64>,
  pub total_active_job_cards:             Option<i64>,
  pub total_active_workers:               Option<i64>,
  pub total_hhs_completed_100_days:       Option<i64>,
  pub total_jobcards_issued:              Option<i64>,
  pub total_workers:                      Option<i64>,
  pub total_works_takenup:                Option<i64>,

  pub women_persondays:                   Option<i64>,

  // Percentages
  pub percent_category_b_works:           Option<i64>,
  pub percent_expenditure_agriculture:    Option<f64>,
  pub percent_nrm_expenditure:            Option<f64>,
  pub percentage_payments_within_15_days: Option<f64>,

  /// Free text; empty when the feed has no remarks.
  #[serde(default)]
  pub remarks:                            String,
}

// ─── Stored row ──────────────────────────────────────────────────────────────

/// A persisted measurement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Measurement {
  /// Store-assigned identifier.
  pub measurement_id: i64,
  #[serde(flatten)]
  pub key:            PeriodKey,
  #[serde(flatten)]
  pub fields:         MeasurementFields,
  /// Set by the store on every write.
  pub last_updated:   DateTime<Utc>,
}

/// Whether an upsert created a new row or overwrote an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
  Created,
  Updated,
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  #[test]
  fn default_fields_are_unknown() {
    let f = MeasurementFields::default();
    assert_eq!(f.total_workers, None);
    assert_eq!(f.wages, None);
    assert!(f.remarks.is_empty());
  }

  #[test]
  fn measurement_serializes_flat() {
    let m = Measurement {
      measurement_id: 7,
      key:            PeriodKey::new("27PUN", "2023-2024", "April"),
      fields:         MeasurementFields {
        total_workers: Some(1500),
        wages: Some(12.5),
        ..Default::default()
      },
      last_updated:   Utc.with_ymd_and_hms(2024, 6, 1, 0, 0, 0).unwrap(),
    };

    let json = serde_json::to_value(&m).unwrap();
    assert_eq!(json["district_code"], "27PUN");
    assert_eq!(json["fin_year"], "2023-2024");
    assert_eq!(json["total_workers"], 1500);
    assert_eq!(json["wages"], 12.5);
    assert!(json["sc_persondays"].is_null());
    assert!(json.get("key").is_none());
    assert!(json.get("fields").is_none());

    let back: Measurement = serde_json::from_value(json).unwrap();
    assert_eq!(back, m);
  }
}
