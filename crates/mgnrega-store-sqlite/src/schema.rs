//! SQL schema for the MGNREGA SQLite store.
//!
//! Executed once at connection startup. Future migrations will be gated on
//! `PRAGMA user_version`.

/// Full schema DDL; idempotent thanks to `CREATE … IF NOT EXISTS`.
pub const SCHEMA: &str = "
PRAGMA journal_mode = WAL;
PRAGMA foreign_keys = ON;

CREATE TABLE IF NOT EXISTS districts (
    district_code TEXT PRIMARY KEY,
    state_code    TEXT NOT NULL,
    state_name    TEXT NOT NULL,
    district_name TEXT NOT NULL
);

-- One row per (district, fin_year, month); re-ingestion overwrites in place.
CREATE TABLE IF NOT EXISTS measurements (
    measurement_id INTEGER PRIMARY KEY AUTOINCREMENT,
    district_code  TEXT NOT NULL
                   REFERENCES districts(district_code) ON DELETE CASCADE,
    fin_year       TEXT NOT NULL,
    month          TEXT NOT NULL,

    approved_labour_budget             INTEGER,
    average_wage_rate                  REAL,
    average_days_employment            INTEGER,
    differently_abled_persons_worked   INTEGER,
    material_and_skilled_wages         REAL,
    number_of_completed_works          INTEGER,
    number_of_gps_with_nil_exp         INTEGER,
    number_of_ongoing_works            INTEGER,
    persondays_central_liability       INTEGER,
    sc_persondays                      INTEGER,
    sc_workers_against_active_workers  INTEGER,
    st_persondays                      INTEGER,
    st_workers_against_active_workers  INTEGER,
    total_adm_expenditure              REAL,
    total_exp                          REAL,
    wages                              REAL,
    total_households_worked            INTEGER,
    total_individuals_worked           INTEGER,
    total_active_job_cards             INTEGER,
    total_active_workers               INTEGER,
    total_hhs_completed_100_days       INTEGER,
    total_jobcards_issued              INTEGER,
    total_workers                      INTEGER,
    total_works_takenup                INTEGER,
    women_persondays                   INTEGER,
    percent_category_b_works           INTEGER,
    percent_expenditure_agriculture    REAL,
    percent_nrm_expenditure            REAL,
    percentage_payments_within_15_days REAL,
    remarks                            TEXT NOT NULL DEFAULT '',

    last_updated   TEXT NOT NULL,   -- RFC 3339 UTC, fixed-width; server-assigned
    UNIQUE (district_code, fin_year, month)
);

CREATE INDEX IF NOT EXISTS districts_name_idx
    ON districts(district_name COLLATE NOCASE);
CREATE INDEX IF NOT EXISTS measurements_refresh_idx
    ON measurements(district_code, last_updated);

PRAGMA user_version = 1;
";
