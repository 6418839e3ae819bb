//! [`SqliteStore`], the SQLite implementation of [`PerformanceStore`].

use std::path::Path;

use chrono::{SubsecRound as _, Utc};
use mgnrega_core::{
  district::District,
  measurement::{Measurement, MeasurementFields, PeriodKey, UpsertOutcome},
  store::PerformanceStore,
};
use rusqlite::OptionalExtension as _;

use crate::{
  Result,
  encode::{
    DISTRICT_COLUMNS, INSERT_MEASUREMENT, RawMeasurement, SELECT_MEASUREMENT,
    UPDATE_MEASUREMENT, district_from_row, encode_dt, encode_fields,
  },
  schema::SCHEMA,
};

// ─── Store ───────────────────────────────────────────────────────────────────

/// A performance store backed by a single SQLite file.
///
/// Cloning is cheap; the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store, for tests.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Number of stored measurements across all districts.
  pub async fn count_measurements(&self) -> Result<u64> {
    let n: i64 = self
      .conn
      .call(|conn| {
        Ok(conn.query_row("SELECT COUNT(*) FROM measurements", [], |r| r.get(0))?)
      })
      .await?;
    Ok(n as u64)
  }
}

// ─── PerformanceStore impl ───────────────────────────────────────────────────

impl PerformanceStore for SqliteStore {
  type Error = crate::Error;

  // ── Districts ─────────────────────────────────────────────────────────────

  async fn resolve_district(&self, candidate: District) -> Result<District> {
    let district = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        let existing = tx
          .query_row(
            &format!("SELECT {DISTRICT_COLUMNS} FROM districts WHERE district_code = ?1"),
            rusqlite::params![candidate.district_code],
            district_from_row,
          )
          .optional()?;

        let district = match existing {
          Some(d) => d,
          None => {
            tx.execute(
              "INSERT INTO districts (district_code, state_code, state_name, district_name)
               VALUES (?1, ?2, ?3, ?4)",
              rusqlite::params![
                candidate.district_code,
                candidate.state_code,
                candidate.state_name,
                candidate.district_name,
              ],
            )?;
            candidate
          }
        };
        tx.commit()?;
        Ok(district)
      })
      .await?;

    Ok(district)
  }

  async fn get_district(&self, district_code: String) -> Result<Option<District>> {
    let district = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {DISTRICT_COLUMNS} FROM districts WHERE district_code = ?1"),
              rusqlite::params![district_code],
              district_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(district)
  }

  async fn find_district_by_name(&self, name: String) -> Result<Option<District>> {
    let district = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {DISTRICT_COLUMNS} FROM districts
                 WHERE district_name = ?1 COLLATE NOCASE
                 ORDER BY rowid
                 LIMIT 1"
              ),
              rusqlite::params![name],
              district_from_row,
            )
            .optional()?,
        )
      })
      .await?;

    Ok(district)
  }

  async fn list_districts(&self) -> Result<Vec<District>> {
    let districts = self
      .conn
      .call(|conn| {
        let mut stmt =
          conn.prepare(&format!("SELECT {DISTRICT_COLUMNS} FROM districts ORDER BY rowid"))?;
        let rows = stmt
          .query_map([], district_from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    Ok(districts)
  }

  async fn delete_district(&self, district_code: String) -> Result<()> {
    let code = district_code.clone();
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM districts WHERE district_code = ?1",
          rusqlite::params![code],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(mgnrega_core::Error::DistrictNotFound(district_code).into());
    }
    Ok(())
  }

  // ── Measurements ──────────────────────────────────────────────────────────

  async fn upsert_measurement(
    &self,
    key:    PeriodKey,
    fields: MeasurementFields,
  ) -> Result<(Measurement, UpsertOutcome)> {
    // Stored with microsecond precision; keep the returned value identical.
    let last_updated = Utc::now().trunc_subsecs(6);
    let at_str       = encode_dt(last_updated);
    let values       = encode_fields(&fields);
    let k            = key.clone();

    // `None` means the district does not exist.
    let written: Option<(i64, UpsertOutcome)> = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;

        let district_known = tx
          .query_row(
            "SELECT 1 FROM districts WHERE district_code = ?1",
            rusqlite::params![k.district_code],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if !district_known {
          return Ok(None);
        }

        let existing: Option<i64> = tx
          .query_row(
            "SELECT measurement_id FROM measurements
             WHERE district_code = ?1 AND fin_year = ?2 AND month = ?3",
            rusqlite::params![k.district_code, k.fin_year, k.month],
            |r| r.get(0),
          )
          .optional()?;

        let written = match existing {
          Some(id) => {
            let params = values
              .into_iter()
              .chain([
                rusqlite::types::Value::Text(at_str),
                rusqlite::types::Value::Integer(id),
              ]);
            tx.execute(&UPDATE_MEASUREMENT, rusqlite::params_from_iter(params))?;
            (id, UpsertOutcome::Updated)
          }
          None => {
            let params = [
              rusqlite::types::Value::Text(k.district_code),
              rusqlite::types::Value::Text(k.fin_year),
              rusqlite::types::Value::Text(k.month),
            ]
            .into_iter()
            .chain(values)
            .chain([rusqlite::types::Value::Text(at_str)]);
            tx.execute(&INSERT_MEASUREMENT, rusqlite::params_from_iter(params))?;
            (tx.last_insert_rowid(), UpsertOutcome::Created)
          }
        };

        tx.commit()?;
        Ok(Some(written))
      })
      .await?;

    let (measurement_id, outcome) = written
      .ok_or_else(|| mgnrega_core::Error::DistrictNotFound(key.district_code.clone()))?;

    Ok((
      Measurement { measurement_id, key, fields, last_updated },
      outcome,
    ))
  }

  async fn measurements_for_district(&self, district_code: String) -> Result<Vec<Measurement>> {
    let raws: Vec<RawMeasurement> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "{} WHERE district_code = ?1
           ORDER BY last_updated DESC, measurement_id DESC",
          *SELECT_MEASUREMENT
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![district_code], RawMeasurement::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawMeasurement::into_measurement).collect()
  }

  async fn delete_measurement(&self, measurement_id: i64) -> Result<()> {
    let deleted = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM measurements WHERE measurement_id = ?1",
          rusqlite::params![measurement_id],
        )?)
      })
      .await?;

    if deleted == 0 {
      return Err(mgnrega_core::Error::MeasurementNotFound(measurement_id).into());
    }
    Ok(())
  }
}
