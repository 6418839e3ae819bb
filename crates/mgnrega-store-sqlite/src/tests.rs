//! Integration tests for `SqliteStore` against an in-memory database.

use mgnrega_core::{
  district::District,
  measurement::{MeasurementFields, PeriodKey, UpsertOutcome},
  store::PerformanceStore,
};

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn district(code: &str, name: &str) -> District {
  District {
    state_code:    "18".into(),
    state_name:    "MAHARASHTRA".into(),
    district_code: code.into(),
    district_name: name.into(),
  }
}

fn workers(n: i64) -> MeasurementFields {
  MeasurementFields {
    total_workers: Some(n),
    ..Default::default()
  }
}

// ─── Districts ───────────────────────────────────────────────────────────────

#[tokio::test]
async fn resolve_creates_district_once() {
  let s = store().await;

  let first = s.resolve_district(district("27PUN", "PUNE")).await.unwrap();
  assert_eq!(first.district_code, "27PUN");

  let second = s.resolve_district(district("27PUN", "PUNE")).await.unwrap();
  assert_eq!(second, first);
  assert_eq!(s.list_districts().await.unwrap().len(), 1);
}

#[tokio::test]
async fn resolve_never_rewrites_existing_attributes() {
  let s = store().await;
  s.resolve_district(district("27PUN", "PUNE")).await.unwrap();

  let mut renamed = district("27PUN", "Pune City");
  renamed.state_name = "Maharashtra".into();
  let resolved = s.resolve_district(renamed).await.unwrap();

  assert_eq!(resolved.district_name, "PUNE");
  assert_eq!(resolved.state_name, "MAHARASHTRA");
  let stored = s.get_district("27PUN".into()).await.unwrap().unwrap();
  assert_eq!(stored.district_name, "PUNE");
}

#[tokio::test]
async fn get_district_missing_returns_none() {
  let s = store().await;
  assert!(s.get_district("00XXX".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn find_by_name_is_case_insensitive_exact() {
  let s = store().await;
  s.resolve_district(district("27PUN", "PUNE")).await.unwrap();
  s.resolve_district(district("27PUR", "PUNE RURAL")).await.unwrap();

  let found = s.find_district_by_name("pune".into()).await.unwrap().unwrap();
  assert_eq!(found.district_code, "27PUN");

  let found = s.find_district_by_name("Pune Rural".into()).await.unwrap().unwrap();
  assert_eq!(found.district_code, "27PUR");

  assert!(s.find_district_by_name("pun".into()).await.unwrap().is_none());
  assert!(s.find_district_by_name("unknownplace".into()).await.unwrap().is_none());
}

#[tokio::test]
async fn find_by_name_prefers_first_stored() {
  let s = store().await;
  s.resolve_district(district("09AUR", "AURANGABAD")).await.unwrap();
  s.resolve_district(district("27AUR", "Aurangabad")).await.unwrap();

  let found = s.find_district_by_name("aurangabad".into()).await.unwrap().unwrap();
  assert_eq!(found.district_code, "09AUR");
}

#[tokio::test]
async fn list_districts_in_storage_order() {
  let s = store().await;
  s.resolve_district(district("27WAR", "WARDHA")).await.unwrap();
  s.resolve_district(district("27AKO", "AKOLA")).await.unwrap();
  s.resolve_district(district("27PUN", "PUNE")).await.unwrap();

  let codes: Vec<String> = s
    .list_districts()
    .await
    .unwrap()
    .into_iter()
    .map(|d| d.district_code)
    .collect();
  assert_eq!(codes, ["27WAR", "27AKO", "27PUN"]);
}

// ─── Measurements ────────────────────────────────────────────────────────────

#[tokio::test]
async fn upsert_creates_then_updates_in_place() {
  let s = store().await;
  s.resolve_district(district("27PUN", "PUNE")).await.unwrap();
  let key = PeriodKey::new("27PUN", "2023-2024", "April");

  let (created, outcome) = s.upsert_measurement(key.clone(), workers(1500)).await.unwrap();
  assert_eq!(outcome, UpsertOutcome::Created);
  assert_eq!(created.fields.total_workers, Some(1500));

  let (updated, outcome) = s.upsert_measurement(key.clone(), workers(1600)).await.unwrap();
  assert_eq!(outcome, UpsertOutcome::Updated);
  assert_eq!(updated.measurement_id, created.measurement_id);
  assert!(updated.last_updated >= created.last_updated);

  let stored = s.measurements_for_district("27PUN".into()).await.unwrap();
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0].fields.total_workers, Some(1600));
  assert_eq!(s.count_measurements().await.unwrap(), 1);
}

#[tokio::test]
async fn update_overwrites_every_field() {
  let s = store().await;
  s.resolve_district(district("27PUN", "PUNE")).await.unwrap();
  let key = PeriodKey::new("27PUN", "2023-2024", "April");

  let full = MeasurementFields {
    approved_labour_budget: Some(2_500_000),
    average_wage_rate: Some(274.57),
    wages: Some(1234.5),
    total_workers: Some(1500),
    remarks: "provisional".into(),
    ..Default::default()
  };
  s.upsert_measurement(key.clone(), full).await.unwrap();
  s.upsert_measurement(key, workers(1600)).await.unwrap();

  let stored = s.measurements_for_district("27PUN".into()).await.unwrap();
  assert_eq!(stored[0].fields, workers(1600));
}

#[tokio::test]
async fn returned_measurement_matches_stored_row() {
  let s = store().await;
  s.resolve_district(district("27PUN", "PUNE")).await.unwrap();

  let fields = MeasurementFields {
    average_wage_rate: Some(274.57),
    percent_category_b_works: Some(61),
    remarks: "ok".into(),
    ..Default::default()
  };
  let (m, _) = s
    .upsert_measurement(PeriodKey::new("27PUN", "2023-2024", "May"), fields)
    .await
    .unwrap();

  let stored = s.measurements_for_district("27PUN".into()).await.unwrap();
  assert_eq!(stored, vec![m]);
}

#[tokio::test]
async fn distinct_periods_are_distinct_rows() {
  let s = store().await;
  s.resolve_district(district("27PUN", "PUNE")).await.unwrap();

  for month in ["April", "May", "June"] {
    s.upsert_measurement(PeriodKey::new("27PUN", "2023-2024", month), workers(1))
      .await
      .unwrap();
  }
  s.upsert_measurement(PeriodKey::new("27PUN", "2024-2025", "April"), workers(1))
    .await
    .unwrap();

  assert_eq!(s.count_measurements().await.unwrap(), 4);
}

#[tokio::test]
async fn measurements_newest_first() {
  let s = store().await;
  s.resolve_district(district("27PUN", "PUNE")).await.unwrap();

  s.upsert_measurement(PeriodKey::new("27PUN", "2023-2024", "April"), workers(1))
    .await
    .unwrap();
  s.upsert_measurement(PeriodKey::new("27PUN", "2023-2024", "May"), workers(2))
    .await
    .unwrap();
  // Refreshing April makes it the newest again.
  s.upsert_measurement(PeriodKey::new("27PUN", "2023-2024", "April"), workers(3))
    .await
    .unwrap();

  let months: Vec<String> = s
    .measurements_for_district("27PUN".into())
    .await
    .unwrap()
    .into_iter()
    .map(|m| m.key.month)
    .collect();
  assert_eq!(months, ["April", "May"]);
}

#[tokio::test]
async fn measurements_are_scoped_to_district() {
  let s = store().await;
  s.resolve_district(district("27PUN", "PUNE")).await.unwrap();
  s.resolve_district(district("27NAS", "NASHIK")).await.unwrap();

  s.upsert_measurement(PeriodKey::new("27PUN", "2023-2024", "April"), workers(1))
    .await
    .unwrap();
  s.upsert_measurement(PeriodKey::new("27NAS", "2023-2024", "April"), workers(2))
    .await
    .unwrap();

  let pune = s.measurements_for_district("27PUN".into()).await.unwrap();
  assert_eq!(pune.len(), 1);
  assert_eq!(pune[0].fields.total_workers, Some(1));
  assert!(s.measurements_for_district("27XXX".into()).await.unwrap().is_empty());
}

#[tokio::test]
async fn upsert_for_unknown_district_fails() {
  let s = store().await;
  let err = s
    .upsert_measurement(PeriodKey::new("00XXX", "2023-2024", "April"), workers(1))
    .await
    .unwrap_err();
  assert!(matches!(
    err,
    Error::Core(mgnrega_core::Error::DistrictNotFound(ref code)) if code == "00XXX"
  ));
  assert_eq!(s.count_measurements().await.unwrap(), 0);
}

// ─── Deletion ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn deleting_district_cascades() {
  let s = store().await;
  s.resolve_district(district("27PUN", "PUNE")).await.unwrap();
  s.resolve_district(district("27NAS", "NASHIK")).await.unwrap();
  s.upsert_measurement(PeriodKey::new("27PUN", "2023-2024", "April"), workers(1))
    .await
    .unwrap();
  s.upsert_measurement(PeriodKey::new("27NAS", "2023-2024", "April"), workers(2))
    .await
    .unwrap();

  s.delete_district("27PUN".into()).await.unwrap();

  assert!(s.get_district("27PUN".into()).await.unwrap().is_none());
  assert_eq!(s.count_measurements().await.unwrap(), 1);
}

#[tokio::test]
async fn deleting_measurement_keeps_district() {
  let s = store().await;
  s.resolve_district(district("27PUN", "PUNE")).await.unwrap();
  let (m, _) = s
    .upsert_measurement(PeriodKey::new("27PUN", "2023-2024", "April"), workers(1))
    .await
    .unwrap();

  s.delete_measurement(m.measurement_id).await.unwrap();

  assert!(s.measurements_for_district("27PUN".into()).await.unwrap().is_empty());
  assert!(s.get_district("27PUN".into()).await.unwrap().is_some());
}

#[tokio::test]
async fn deleting_missing_rows_fails() {
  let s = store().await;
  assert!(matches!(
    s.delete_district("00XXX".into()).await.unwrap_err(),
    Error::Core(mgnrega_core::Error::DistrictNotFound(_))
  ));
  assert!(matches!(
    s.delete_measurement(42).await.unwrap_err(),
    Error::Core(mgnrega_core::Error::MeasurementNotFound(42))
  ));
}

// ─── Persistence ─────────────────────────────────────────────────────────────

#[tokio::test]
async fn file_store_survives_reopen() {
  let dir = tempfile::tempdir().unwrap();
  let path = dir.path().join("reopen.sqlite3");

  {
    let s = SqliteStore::open(&path).await.unwrap();
    s.resolve_district(district("27PUN", "PUNE")).await.unwrap();
    s.upsert_measurement(PeriodKey::new("27PUN", "2023-2024", "April"), workers(7))
      .await
      .unwrap();
  }

  let s = SqliteStore::open(&path).await.unwrap();
  let stored = s.measurements_for_district("27PUN".into()).await.unwrap();
  assert_eq!(stored.len(), 1);
  assert_eq!(stored[0].fields.total_workers, Some(7));
}
