//! Derived view filters.
//!
//! Pure functions over cache snapshots: search, enum filters, grouping and
//! aggregate figures. Nothing here touches the caches or the store.

pub mod calls;
pub mod customers;
pub mod dashboard;
pub mod finance;
pub mod lawyers;
pub mod processes;

use std::cmp::Ordering;

use crate::model::parse_timestamp;

/// A filter that narrows a list of items.
///
/// Several filters may work on the same item type; a view combines them by
/// requiring every one to match.
pub trait ViewFilter<T> {
  /// Whether `item` passes this filter.
  fn matches(&self, item: &T) -> bool;

  /// Items passing the filter, in input order.
  fn apply<'a>(&self, items: &'a [T]) -> Vec<&'a T> {
    items.iter().filter(|item| self.matches(item)).collect()
  }
}

/// Case-insensitive substring match. An empty query matches everything.
pub fn contains_ci(haystack: &str, query: &str) -> bool {
  let query = query.trim();
  query.is_empty() || haystack.to_lowercase().contains(&query.to_lowercase())
}

/// Whether any of `fields` contains `query`, ignoring case.
pub fn any_field_matches<'f>(fields: impl IntoIterator<Item = &'f str>, query: &str) -> bool {
  let query = query.trim();
  query.is_empty() || fields.into_iter().any(|field| contains_ci(field, query))
}

/// Order by a timestamp field, newest first. Unparseable values go last;
/// ties keep their input order.
pub fn sort_newest_first<T>(items: &mut [&T], key: impl Fn(&T) -> &str) {
  items.sort_by(|a, b| match (parse_timestamp(key(*a)), parse_timestamp(key(*b))) {
    (Some(x), Some(y)) => y.cmp(&x),
    (Some(_), None) => Ordering::Less,
    (None, Some(_)) => Ordering::Greater,
    (None, None) => Ordering::Equal,
  });
}

/// `round(part / whole * 100)`, or 0 when `whole` is 0.
pub fn percentage(part: usize, whole: usize) -> u32 {
  if whole == 0 {
    return 0;
  }
  (part as f64 / whole as f64 * 100.0).round() as u32
}
