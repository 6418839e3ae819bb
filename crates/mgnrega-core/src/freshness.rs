//! Freshness gate. Decides whether a district's stored data must be
//! re-fetched before it is served.

use chrono::{DateTime, TimeDelta, Utc};

/// Outcome of [`FreshnessGate::assess`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Freshness {
  Fresh,
  Stale(StaleReason),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StaleReason {
  /// The district has no measurements at all.
  NoData,
  /// The newest measurement is at least one window old.
  Expired { age: TimeDelta },
}

impl Freshness {
  pub fn is_stale(&self) -> bool { matches!(self, Self::Stale(_)) }
}

/// Classifies the newest refresh timestamp of a district against a fixed
/// window (24 hours by default).
#[derive(Debug, Clone, Copy)]
pub struct FreshnessGate {
  window: TimeDelta,
}

impl Default for FreshnessGate {
  fn default() -> Self { Self { window: TimeDelta::hours(24) } }
}

impl FreshnessGate {
  pub fn new(window: TimeDelta) -> Self { Self { window } }

  /// Build a gate from a window expressed in whole hours. Out-of-range
  /// values saturate to the largest representable window.
  pub fn from_hours(hours: i64) -> Self {
    Self::new(TimeDelta::try_hours(hours).unwrap_or(TimeDelta::MAX))
  }

  pub fn window(&self) -> TimeDelta { self.window }

  /// Assess `latest` (the newest `last_updated` of the district, if any)
  /// relative to `now`.
  ///
  /// A timestamp exactly one window old is stale. Timestamps in the future
  /// are fresh.
  pub fn assess(
    &self,
    latest: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
  ) -> Freshness {
    let Some(latest) = latest else {
      return Freshness::Stale(StaleReason::NoData);
    };
    let age = now - latest;
    if age >= self.window {
      Freshness::Stale(StaleReason::Expired { age })
    } else {
      Freshness::Fresh
    }
  }
}

#[cfg(test)]
mod tests {
  use chrono::TimeZone;

  use super::*;

  fn now() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2024, 6, 2, 12, 0, 0).unwrap()
  }

  #[test]
  fn missing_data_is_stale() {
    let gate = FreshnessGate::default();
    assert_eq!(
      gate.assess(None, now()),
      Freshness::Stale(StaleReason::NoData)
    );
  }

  #[test]
  fn recent_refresh_is_fresh() {
    let gate = FreshnessGate::default();
    let latest = now() - TimeDelta::hours(3);
    assert_eq!(gate.assess(Some(latest), now()), Freshness::Fresh);
  }

  #[test]
  fn exactly_one_day_old_is_stale() {
    let gate = FreshnessGate::default();
    let latest = now() - TimeDelta::hours(24);
    assert_eq!(
      gate.assess(Some(latest), now()),
      Freshness::Stale(StaleReason::Expired { age: TimeDelta::hours(24) })
    );
  }

  #[test]
  fn just_under_one_day_is_fresh() {
    let gate = FreshnessGate::default();
    let latest = now() - TimeDelta::hours(24) + TimeDelta::seconds(1);
    assert!(!gate.assess(Some(latest), now()).is_stale());
  }

  #[test]
  fn future_timestamp_is_fresh() {
    let gate = FreshnessGate::default();
    let latest = now() + TimeDelta::minutes(5);
    assert_eq!(gate.assess(Some(latest), now()), Freshness::Fresh);
  }

  #[test]
  fn custom_window() {
    let gate = FreshnessGate::from_hours(1);
    assert_eq!(gate.window(), TimeDelta::hours(1));
    let latest = now() - TimeDelta::minutes(90);
    assert!(gate.assess(Some(latest), now()).is_stale());
  }
}
