//! Mapping from feed elements onto domain types.
//!
//! The upstream feed is inconsistent about numeric formatting, so numeric
//! coercion never fails: anything that does not read as a number becomes
//! `None` and the rest of the item is still mapped.

use mgnrega_core::{district::District, measurement::MeasurementFields};

use crate::FeedItem;

/// Read `raw` as an integer. Surrounding whitespace is ignored; empty or
/// non-numeric text yields `None`.
pub fn coerce_int(raw: &str) -> Option<i64> { raw.trim().parse().ok() }

/// Read `raw` as a finite float. Surrounding whitespace is ignored; empty,
/// non-numeric or non-finite text yields `None`.
pub fn coerce_float(raw: &str) -> Option<f64> {
  raw.trim().parse::<f64>().ok().filter(|v| v.is_finite())
}

impl FeedItem {
  /// The district this item reports on.
  pub fn district(&self) -> District {
    District {
      state_code:    self.text("state_code").to_owned(),
      state_name:    self.text("state_name").to_owned(),
      district_code: self.text("district_code").to_owned(),
      district_name: self.text("district_name").to_owned(),
    }
  }

  /// `(fin_year, month)` of the reporting period.
  pub fn period(&self) -> (String, String) {
    (self.text("fin_year").to_owned(), self.text("month").to_owned())
  }

  /// All measurement values carried by this item.
  pub fn measurement_fields(&self) -> MeasurementFields {
    MeasurementFields {
      approved_labour_budget:             self.int("Approved_Labour_Budget"),
      average_wage_rate:                  self.float("Average_Wage_rate_per_day_per_person"),
      average_days_employment:            self.int("Average_days_of_employment_provided_per_Household"),
      differently_abled_persons_worked:   self.int("Differently_abled_persons_worked"),
      material_and_skilled_wages:         self.float("Material_and_skilled_Wages"),
      number_of_completed_works:          self.int("Number_of_Completed_Works"),
      number_of_gps_with_nil_exp:         self.int("Number_of_GPs_with_NIL_exp"),
      number_of_ongoing_works:            self.int("Number_of_Ongoing_Works"),
      persondays_central_liability:       self.int("Persondays_of_Central_Liability_so_far"),
      sc_persondays:                      self.int("SC_persondays"),
      sc_workers_against_active_workers:  self.int("SC_workers_against_active_workers"),
      st_persondays:                      self.int("ST_persondays"),
      st_workers_against_active_workers:  self.int("ST_workers_against_active_workers"),
      total_adm_expenditure:              self.float("Total_Adm_Expenditure"),
      total_exp:                          self.float("Total_Exp"),
      wages:                              self.float("Wages"),
      total_households_worked:            self.int("Total_Households_Worked"),
      total_individuals_worked:           self.int("Total_Individuals_Worked"),
      total_active_job_cards:             self.int("Total_No_of_Active_Job_Cards"),
      total_active_workers:               self.int("Total_No_of_Active_Workers"),
      total_hhs_completed_100_days:       self.int("Total_No_of_HHs_completed_100_Days_of_Wage_Employment"),
      total_jobcards_issued:              self.int("Total_No_of_JobCards_issued"),
      total_workers:                      self.int("Total_No_of_Workers"),
      total_works_takenup:                self.int("Total_No_of_Works_Takenup"),
      women_persondays:                   self.int("Women_Persondays"),
      percent_category_b_works:           self.int("percent_of_Category_B_Works"),
      percent_expenditure_agriculture:    self.float("percent_of_Expenditure_on_Agriculture_Allied_Works"),
      percent_nrm_expenditure:            self.float("percent_of_NRM_Expenditure"),
      // Upstream spelling.
      percentage_payments_within_15_days: self.float("percentage_payments_gererated_within_15_days"),
      remarks:                            self.text("Remarks").to_owned(),
    }
  }
}
