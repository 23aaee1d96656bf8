//! Remote store contract and its backends.
//!
//! Records cross this boundary as raw snake_case JSON objects; mapping to
//! domain types is the caller's business (see `model::records`).

mod postgrest;
mod sqlite;

pub use postgrest::PostgrestStore;
pub use sqlite::SqliteStore;

use async_trait::async_trait;
use serde_json::{Map, Value};
use std::cmp::Ordering;
use std::fmt;

use crate::error::StoreError;

/// A record as stored: snake_case field names to JSON values.
pub type RawRecord = Map<String, Value>;

/// One storage collection per entity type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Collection {
  CallRecords,
  Customers,
  LegalProcesses,
  FinancialTransactions,
}

/// Fetch ordering of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortOrder {
  pub column: &'static str,
  pub descending: bool,
}

impl Collection {
  pub fn table(&self) -> &'static str {
    match self {
      Collection::CallRecords => "call_records",
      Collection::Customers => "customers",
      Collection::LegalProcesses => "legal_processes",
      Collection::FinancialTransactions => "financial_transactions",
    }
  }

  /// Ordering applied by `fetch_all`. Legal processes come back in store order.
  pub fn sort_order(&self) -> Option<SortOrder> {
    match self {
      Collection::CallRecords => Some(SortOrder {
        column: "date_time",
        descending: true,
      }),
      Collection::Customers => Some(SortOrder {
        column: "name",
        descending: false,
      }),
      Collection::LegalProcesses => None,
      Collection::FinancialTransactions => Some(SortOrder {
        column: "due_date",
        descending: true,
      }),
    }
  }

  /// Whether the store fills `created_at` when an insert omits it.
  pub fn defaults_created_at(&self) -> bool {
    matches!(self, Collection::Customers | Collection::LegalProcesses)
  }
}

impl fmt::Display for Collection {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.table())
  }
}

/// Contract to the persisted store.
///
/// Every failure is reported as a [`StoreError`]; callers are expected to
/// treat them alike.
#[async_trait]
pub trait RemoteStore: Send + Sync {
  /// All records of a collection, in the collection's fetch order.
  async fn fetch_all(&self, collection: Collection) -> Result<Vec<RawRecord>, StoreError>;

  /// Persist a new record (without `id`) and return it as stored, id included.
  async fn insert(&self, collection: Collection, record: RawRecord)
    -> Result<RawRecord, StoreError>;

  /// Overwrite the given fields of the record with `id`.
  async fn update(
    &self,
    collection: Collection,
    id: &str,
    fields: RawRecord,
  ) -> Result<(), StoreError>;
}

/// Sort raw records the way the hosted store would for `order`.
///
/// Strings compare lexicographically, numbers numerically; nulls and missing
/// values go last in either direction. The sort is stable.
pub fn sort_records(records: &mut [RawRecord], order: SortOrder) {
  records.sort_by(|a, b| {
    let (a, b) = (a.get(order.column), b.get(order.column));
    match (is_present(a), is_present(b)) {
      (false, false) => Ordering::Equal,
      (false, true) => Ordering::Greater,
      (true, false) => Ordering::Less,
      (true, true) => {
        let ord = compare_values(a, b);
        if order.descending {
          ord.reverse()
        } else {
          ord
        }
      }
    }
  });
}

fn is_present(value: Option<&Value>) -> bool {
  !matches!(value, None | Some(Value::Null))
}

fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
  match (a, b) {
    (Some(Value::String(a)), Some(Value::String(b))) => a.cmp(b),
    (Some(Value::Number(a)), Some(Value::Number(b))) => {
      let (a, b) = (a.as_f64().unwrap_or(0.0), b.as_f64().unwrap_or(0.0));
      a.partial_cmp(&b).unwrap_or(Ordering::Equal)
    }
    (Some(a), Some(b)) => a.to_string().cmp(&b.to_string()),
    _ => Ordering::Equal,
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn record(value: Value) -> RawRecord {
    value.as_object().cloned().unwrap()
  }

  #[test]
  fn test_sort_descending_puts_nulls_last() {
    let mut records = vec![
      record(json!({"id": "a", "due_date": "2024-01-01"})),
      record(json!({"id": "b", "due_date": null})),
      record(json!({"id": "c", "due_date": "2024-03-01"})),
    ];
    sort_records(
      &mut records,
      Collection::FinancialTransactions.sort_order().unwrap(),
    );
    let ids: Vec<_> = records.iter().map(|r| r["id"].as_str().unwrap()).collect();
    assert_eq!(ids, vec!["c", "a", "b"]);
  }

  #[test]
  fn test_customers_sort_by_name_ascending() {
    let mut records = vec![
      record(json!({"id": "1", "name": "Maria"})),
      record(json!({"id": "2", "name": "Benedito"})),
    ];
    sort_records(&mut records, Collection::Customers.sort_order().unwrap());
    assert_eq!(records[0]["name"], "Benedito");
  }

  #[test]
  fn test_processes_have_no_fetch_order() {
    assert!(Collection::LegalProcesses.sort_order().is_none());
  }
}
