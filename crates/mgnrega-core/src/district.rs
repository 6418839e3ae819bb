//! District: the administrative unit every measurement belongs to.

use serde::{Deserialize, Serialize};

/// A district as published by the upstream feed.
///
/// Identified by `district_code`. Created on first sighting and never
/// rewritten by later ingestions, even when the feed reports different names
/// for the same code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct District {
  pub state_code:    String,
  pub state_name:    String,
  pub district_code: String,
  pub district_name: String,
}

impl District {
  /// Whether `other` carries different descriptive attributes for the same
  /// district code.
  pub fn differs_from(&self, other: &District) -> bool {
    self.state_code != other.state_code
      || self.state_name != other.state_name
      || self.district_name != other.district_name
  }
}
