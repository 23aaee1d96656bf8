//! Office-wide dashboard figures.

use chrono::{Days, NaiveDate};
use std::collections::HashMap;

use super::{finance::cash_totals, percentage};
use crate::model::{parse_timestamp, CallRecord, FinancialTransaction};

/// Days covered by the call trend.
pub const TREND_DAYS: u64 = 7;

/// Categories listed in the ranking.
pub const TOP_CATEGORIES: usize = 5;

#[derive(Debug, Clone, PartialEq)]
pub struct Dashboard {
  pub total_calls: usize,
  pub first_time_calls: usize,
  /// `round(first_time_calls / total_calls * 100)`; 0 without calls
  pub conversion_rate: u32,
  /// Paid income
  pub revenue: f64,
  /// Unpaid income
  pub pending_income: f64,
  /// Highest count first
  pub calls_per_lawyer: Vec<(String, usize)>,
  pub top_categories: Vec<(String, usize)>,
  /// Oldest day first, ending at the reference day
  pub trend: Vec<(NaiveDate, usize)>,
}

/// Compute the dashboard with the trend ending at `today` (UTC dates).
pub fn dashboard(
  calls: &[CallRecord],
  transactions: &[FinancialTransaction],
  today: NaiveDate,
) -> Dashboard {
  let total_calls = calls.len();
  let first_time_calls = calls.iter().filter(|c| c.is_first_time).count();
  let cash = cash_totals(transactions);

  let mut top_categories = ranked(calls.iter().map(|c| c.category.as_str()));
  top_categories.truncate(TOP_CATEGORIES);

  Dashboard {
    total_calls,
    first_time_calls,
    conversion_rate: percentage(first_time_calls, total_calls),
    revenue: cash.income,
    pending_income: cash.pending,
    calls_per_lawyer: ranked(calls.iter().map(|c| c.lawyer_name.as_str())),
    top_categories,
    trend: calls_per_day(calls, today),
  }
}

/// Occurrence counts, highest first; ties broken by name.
fn ranked<'a>(values: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
  let mut counts: HashMap<&str, usize> = HashMap::new();
  for value in values {
    *counts.entry(value).or_default() += 1;
  }
  let mut ranked: Vec<(String, usize)> = counts
    .into_iter()
    .map(|(name, count)| (name.to_string(), count))
    .collect();
  ranked.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
  ranked
}

/// Calls per day for the `TREND_DAYS` days ending at `today`.
///
/// Calls outside the window, or with an unparseable timestamp, are ignored.
pub fn calls_per_day(calls: &[CallRecord], today: NaiveDate) -> Vec<(NaiveDate, usize)> {
  let mut days: Vec<(NaiveDate, usize)> = (0..TREND_DAYS)
    .rev()
    .filter_map(|back| today.checked_sub_days(Days::new(back)))
    .map(|day| (day, 0))
    .collect();

  for call in calls {
    let Some(day) = parse_timestamp(&call.date_time).map(|ts| ts.date_naive()) else {
      continue;
    };
    if let Some(slot) = days.iter_mut().find(|(d, _)| *d == day) {
      slot.1 += 1;
    }
  }
  days
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::{Priority, TransactionCategory, TransactionStatus, TransactionType};

  fn call(lawyer: &str, category: &str, when: &str, first: bool) -> CallRecord {
    CallRecord {
      id: String::new(),
      caller_name: String::new(),
      information: String::new(),
      date_time: when.to_string(),
      lawyer_name: lawyer.to_string(),
      process_number: None,
      process_phase: None,
      is_first_time: first,
      call_count: 1,
      priority: Priority::Medium,
      category: category.to_string(),
    }
  }

  fn income(amount: f64, status: TransactionStatus) -> FinancialTransaction {
    FinancialTransaction {
      id: String::new(),
      customer_id: None,
      description: String::new(),
      amount,
      kind: TransactionType::Income,
      category: TransactionCategory::InitialFees,
      status,
      due_date: "2024-05-01".to_string(),
      payment_date: None,
    }
  }

  fn day(d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 5, d).unwrap()
  }

  #[test]
  fn test_headline_figures() {
    let calls = vec![
      call("A", "Previdenciário", "2024-05-10T10:00:00+00:00", true),
      call("A", "Previdenciário", "2024-05-10T11:00:00+00:00", false),
      call("B", "Trabalhista", "2024-05-09T11:00:00+00:00", true),
    ];
    let txs = vec![
      income(1000.0, TransactionStatus::Paid),
      income(250.0, TransactionStatus::Pending),
      income(50.0, TransactionStatus::Overdue),
    ];
    let d = dashboard(&calls, &txs, day(10));

    assert_eq!(d.total_calls, 3);
    assert_eq!(d.first_time_calls, 2);
    assert_eq!(d.conversion_rate, 67);
    assert_eq!(d.revenue, 1000.0);
    assert_eq!(d.pending_income, 300.0);
    assert_eq!(
      d.calls_per_lawyer,
      vec![("A".to_string(), 2), ("B".to_string(), 1)]
    );
  }

  #[test]
  fn test_empty_dashboard() {
    let d = dashboard(&[], &[], day(10));
    assert_eq!(d.conversion_rate, 0);
    assert!(d.calls_per_lawyer.is_empty());
    assert_eq!(d.trend.len(), 7);
    assert!(d.trend.iter().all(|(_, n)| *n == 0));
  }

  #[test]
  fn test_top_categories_capped_at_five() {
    let mut calls = Vec::new();
    for (i, category) in ["a", "b", "c", "d", "e", "f"].iter().enumerate() {
      for _ in 0..=i {
        calls.push(call("X", category, "2024-05-01T00:00:00Z", true));
      }
    }
    let d = dashboard(&calls, &[], day(10));
    let names: Vec<_> = d.top_categories.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, vec!["f", "e", "d", "c", "b"]);
  }

  #[test]
  fn test_trend_window_ends_today() {
    let calls = vec![
      call("A", "x", "2024-05-10T23:00:00+00:00", true),
      call("A", "x", "2024-05-04", true),
      call("A", "x", "2024-05-03T12:00:00+00:00", true),
      call("A", "x", "not a date", true),
    ];
    let trend = calls_per_day(&calls, day(10));
    assert_eq!(trend.first(), Some(&(day(4), 1)));
    assert_eq!(trend.last(), Some(&(day(10), 1)));
    assert_eq!(trend.iter().map(|(_, n)| n).sum::<usize>(), 2);
  }
}
