//! Reader for the data.gov.in MGNREGA XML feed.
//!
//! Turns a feed document into [`FeedItem`]s and maps each item onto
//! [`mgnrega_core`] types. Pure synchronous; no HTTP or database
//! dependencies.
//!
//! # Quick start
//!
//! ```no_run
//! let xml = b"<result><records><item><district_code>27PUN</district_code></item></records></result>";
//! let items = mgnrega_feed::parse_document(xml).unwrap();
//! println!("{} items, first district {}", items.len(), items[0].district().district_code);
//! ```

pub mod error;
mod fields;
mod parse;

use std::collections::BTreeMap;

pub use error::{Error, Result};
pub use fields::{coerce_float, coerce_int};
pub use parse::parse_document;

/// One `<item>` of the feed: element name → raw text of its direct children.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FeedItem {
  values: BTreeMap<String, String>,
}

impl FeedItem {
  /// Raw text of `name`, or `""` when the element is absent.
  pub fn text(&self, name: &str) -> &str {
    self.values.get(name).map(String::as_str).unwrap_or("")
  }

  /// `name` read as an integer; `None` when absent, empty or non-numeric.
  pub fn int(&self, name: &str) -> Option<i64> { coerce_int(self.text(name)) }

  /// `name` read as a float; `None` when absent, empty or non-numeric.
  pub fn float(&self, name: &str) -> Option<f64> {
    coerce_float(self.text(name))
  }

  pub fn contains(&self, name: &str) -> bool { self.values.contains_key(name) }

  pub fn is_empty(&self) -> bool { self.values.is_empty() }

  /// Record `name` unless the item already has it.
  pub(crate) fn insert(&mut self, name: String, text: String) {
    self.values.entry(name).or_insert(text);
  }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FeedItem {
  fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
    Self {
      values: iter
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect(),
    }
  }
}
