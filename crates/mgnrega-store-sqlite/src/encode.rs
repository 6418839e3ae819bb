//! Encoding and decoding helpers between Rust domain types and the column
//! representations stored in SQLite.
//!
//! Timestamps are stored as fixed-width RFC 3339 UTC strings (microsecond
//! precision, `Z` suffix) so that lexical order equals chronological order.
//! Measurement scalars map to nullable `INTEGER` / `REAL` columns.

use std::sync::LazyLock;

use chrono::{DateTime, NaiveDateTime, SecondsFormat, Utc};
use mgnrega_core::{
  district::District,
  measurement::{Measurement, MeasurementFields, PeriodKey},
};
use rusqlite::{Row, types::Value};

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String {
  dt.to_rfc3339_opts(SecondsFormat::Micros, true)
}

/// Decode a stored timestamp. Values without an offset are taken as UTC.
pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
    return Ok(dt.with_timezone(&Utc));
  }
  ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"]
    .iter()
    .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
    .map(|naive| naive.and_utc())
    .ok_or_else(|| Error::DateParse(format!("unrecognised timestamp: {s:?}")))
}

// ─── MeasurementFields ───────────────────────────────────────────────────────

/// Scalar columns of `measurements`, in the order used by [`encode_fields`]
/// and [`decode_fields`].
pub const FIELD_COLUMNS: [&str; 30] = [
  "approved_labour_budget",
  "average_wage_rate",
  "average_days_employment",
  "differently_abled_persons_worked",
  "material_and_skilled_wages",
  "number_of_completed_works",
  "number_of_gps_with_nil_exp",
  "number_of_ongoing_works",
  "persondays_central_liability",
  "sc_persondays",
  "sc_workers_against_active_workers",
  "st_persondays",
  "st_workers_against_active_workers",
  "total_adm_expenditure",
  "total_exp",
  "wages",
  "total_households_worked",
  "total_individuals_worked",
  "total_active_job_cards",
  "total_active_workers",
  "total_hhs_completed_100_days",
  "total_jobcards_issued",
  "total_workers",
  "total_works_takenup",
  "women_persondays",
  "percent_category_b_works",
  "percent_expenditure_agriculture",
  "percent_nrm_expenditure",
  "percentage_payments_within_15_days",
  "remarks",
];

fn int(v: Option<i64>) -> Value { v.map_or(Value::Null, Value::Integer) }

fn real(v: Option<f64>) -> Value { v.map_or(Value::Null, Value::Real) }

pub fn encode_fields(f: &MeasurementFields) -> Vec<Value> {
  vec![
    int(f.approved_labour_budget),
    real(f.average_wage_rate),
    int(f.average_days_employment),
    int(f.differently_abled_persons_worked),
    real(f.material_and_skilled_wages),
    int(f.number_of_completed_works),
    int(f.number_of_gps_with_nil_exp),
    int(f.number_of_ongoing_works),
    int(f.persondays_central_liability),
    int(f.sc_persondays),
    int(f.sc_workers_against_active_workers),
    int(f.st_persondays),
    int(f.st_workers_against_active_workers),
    real(f.total_adm_expenditure),
    real(f.total_exp),
    real(f.wages),
    int(f.total_households_worked),
    int(f.total_individuals_worked),
    int(f.total_active_job_cards),
    int(f.total_active_workers),
    int(f.total_hhs_completed_100_days),
    int(f.total_jobcards_issued),
    int(f.total_workers),
    int(f.total_works_takenup),
    int(f.women_persondays),
    int(f.percent_category_b_works),
    real(f.percent_expenditure_agriculture),
    real(f.percent_nrm_expenditure),
    real(f.percentage_payments_within_15_days),
    Value::Text(f.remarks.clone()),
  ]
}

/// Read the [`FIELD_COLUMNS`] starting at column index `at`.
pub fn decode_fields(row: &Row<'_>, at: usize) -> rusqlite::Result<MeasurementFields> {
  Ok(MeasurementFields {
    approved_labour_budget:             row.get(at)?,
    average_wage_rate:                  row.get(at + 1)?,
    average_days_employment:            row.get(at + 2)?,
    differently_abled_persons_worked:   row.get(at + 3)?,
    material_and_skilled_wages:         row.get(at + 4)?,
    number_of_completed_works:          row.get(at + 5)?,
    number_of_gps_with_nil_exp:         row.get(at + 6)?,
    number_of_ongoing_works:            row.get(at + 7)?,
    persondays_central_liability:       row.get(at + 8)?,
    sc_persondays:                      row.get(at + 9)?,
    sc_workers_against_active_workers:  row.get(at + 10)?,
    st_persondays:                      row.get(at + 11)?,
    st_workers_against_active_workers:  row.get(at + 12)?,
    total_adm_expenditure:              row.get(at + 13)?,
    total_exp:                          row.get(at + 14)?,
    wages:                              row.get(at + 15)?,
    total_households_worked:            row.get(at + 16)?,
    total_individuals_worked:           row.get(at + 17)?,
    total_active_job_cards:             row.get(at + 18)?,
    total_active_workers:               row.get(at + 19)?,
    total_hhs_completed_100_days:       row.get(at + 20)?,
    total_jobcards_issued:              row.get(at + 21)?,
    total_workers:                      row.get(at + 22)?,
    total_works_takenup:                row.get(at + 23)?,
    women_persondays:                   row.get(at + 24)?,
    percent_category_b_works:           row.get(at + 25)?,
    percent_expenditure_agriculture:    row.get(at + 26)?,
    percent_nrm_expenditure:            row.get(at + 27)?,
    percentage_payments_within_15_days: row.get(at + 28)?,
    remarks:                            row.get(at + 29)?,
  })
}

// ─── SQL fragments ───────────────────────────────────────────────────────────

/// `SELECT` prefix matching [`RawMeasurement::from_row`].
pub static SELECT_MEASUREMENT: LazyLock<String> = LazyLock::new(|| {
  format!(
    "SELECT measurement_id, district_code, fin_year, month, {}, last_updated
     FROM measurements",
    FIELD_COLUMNS.join(", ")
  )
});

/// `INSERT` with key columns `?1..?3`, the field columns, then `last_updated`.
pub static INSERT_MEASUREMENT: LazyLock<String> = LazyLock::new(|| {
  let placeholders = (1..=FIELD_COLUMNS.len() + 4)
    .map(|i| format!("?{i}"))
    .collect::<Vec<_>>()
    .join(", ");
  format!(
    "INSERT INTO measurements (district_code, fin_year, month, {}, last_updated)
     VALUES ({placeholders})",
    FIELD_COLUMNS.join(", ")
  )
});

/// `UPDATE` binding the field columns as `?1..`, then `last_updated`, then
/// the row id.
pub static UPDATE_MEASUREMENT: LazyLock<String> = LazyLock::new(|| {
  let n = FIELD_COLUMNS.len();
  let assignments = FIELD_COLUMNS
    .iter()
    .enumerate()
    .map(|(i, col)| format!("{col} = ?{}", i + 1))
    .collect::<Vec<_>>()
    .join(", ");
  format!(
    "UPDATE measurements SET {assignments}, last_updated = ?{}
     WHERE measurement_id = ?{}",
    n + 1,
    n + 2
  )
});

// ─── Row types ───────────────────────────────────────────────────────────────

/// A `measurements` row with its timestamp still in stored form.
pub struct RawMeasurement {
  pub measurement_id: i64,
  pub key:            PeriodKey,
  pub fields:         MeasurementFields,
  pub last_updated:   String,
}

impl RawMeasurement {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      measurement_id: row.get(0)?,
      key:            PeriodKey {
        district_code: row.get(1)?,
        fin_year:      row.get(2)?,
        month:         row.get(3)?,
      },
      fields:         decode_fields(row, 4)?,
      last_updated:   row.get(4 + FIELD_COLUMNS.len())?,
    })
  }

  pub fn into_measurement(self) -> Result<Measurement> {
    Ok(Measurement {
      measurement_id: self.measurement_id,
      key:            self.key,
      fields:         self.fields,
      last_updated:   decode_dt(&self.last_updated)?,
    })
  }
}

pub fn district_from_row(row: &Row<'_>) -> rusqlite::Result<District> {
  Ok(District {
    district_code: row.get(0)?,
    state_code:    row.get(1)?,
    state_name:    row.get(2)?,
    district_name: row.get(3)?,
  })
}

/// Column list matching [`district_from_row`].
pub const DISTRICT_COLUMNS: &str = "district_code, state_code, state_name, district_name";
