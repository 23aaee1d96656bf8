//! Domain model: entities, their stored shape, and the lawyer roster.

pub mod records;
pub mod roster;
pub mod types;

pub use roster::{Lawyer, Roster};
pub use types::{
  CallRecord, Customer, CustomerStatus, FinancialTransaction, LegalProcess, Priority, ProcessPhase,
  TransactionCategory, TransactionStatus, TransactionType,
};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

/// Current time in the format written to the store.
pub fn now_timestamp() -> String {
  Utc::now().to_rfc3339()
}

/// Parse a stored timestamp or date.
///
/// Accepts RFC 3339, a zone-less `YYYY-MM-DDTHH:MM:SS[.f]` (taken as UTC) and
/// a bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
  let value = value.trim();
  if let Ok(ts) = DateTime::parse_from_rfc3339(value) {
    return Some(ts.with_timezone(&Utc));
  }
  if let Ok(naive) = NaiveDateTime::parse_from_str(value, "%Y-%m-%dT%H:%M:%S%.f") {
    return Some(naive.and_utc());
  }
  NaiveDate::parse_from_str(value, "%Y-%m-%d")
    .ok()
    .and_then(|d| d.and_hms_opt(0, 0, 0))
    .map(|naive| naive.and_utc())
}
