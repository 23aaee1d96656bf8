//! Per-lawyer productivity figures.

use std::collections::HashSet;

use super::percentage;
use crate::model::{CallRecord, Customer, LegalProcess, Lawyer, Roster};

#[derive(Debug, Clone, PartialEq)]
pub struct LawyerStats<'a> {
  pub lawyer: &'a Lawyer,
  pub processes: usize,
  pub calls: usize,
  /// `round(processes / calls * 100)`; 0 without calls
  pub conversion_rate: u32,
}

/// Figures for one lawyer. Records reference lawyers by exact name.
pub fn lawyer_stats<'a>(
  lawyer: &'a Lawyer,
  calls: &[CallRecord],
  processes: &[LegalProcess],
) -> LawyerStats<'a> {
  let process_count = processes
    .iter()
    .filter(|p| p.lawyer_name == lawyer.name)
    .count();
  let call_count = calls.iter().filter(|c| c.lawyer_name == lawyer.name).count();
  LawyerStats {
    lawyer,
    processes: process_count,
    calls: call_count,
    conversion_rate: percentage(process_count, call_count),
  }
}

/// Figures for every lawyer on the roster, in roster order.
pub fn roster_stats<'a>(
  roster: &'a Roster,
  calls: &[CallRecord],
  processes: &[LegalProcess],
) -> Vec<LawyerStats<'a>> {
  roster
    .lawyers()
    .iter()
    .map(|l| lawyer_stats(l, calls, processes))
    .collect()
}

/// Customers with at least one process handled by `lawyer_name`, in customer
/// order. Dangling customer references are skipped.
pub fn clients_of<'a>(
  lawyer_name: &str,
  processes: &[LegalProcess],
  customers: &'a [Customer],
) -> Vec<&'a Customer> {
  let ids: HashSet<&str> = processes
    .iter()
    .filter(|p| p.lawyer_name == lawyer_name)
    .map(|p| p.customer_id.as_str())
    .collect();
  customers
    .iter()
    .filter(|c| ids.contains(c.id.as_str()))
    .collect()
}
