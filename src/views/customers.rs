//! Customer view.

use super::{any_field_matches, ViewFilter};
use crate::model::{Customer, CustomerStatus, LegalProcess};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct CustomerFilter {
  pub search: String,
  /// Only customers with this status
  pub status: Option<CustomerStatus>,
}

impl CustomerFilter {
  pub fn leads() -> Self {
    Self {
      search: String::new(),
      status: Some(CustomerStatus::Lead),
    }
  }
}

impl ViewFilter<Customer> for CustomerFilter {
  fn matches(&self, customer: &Customer) -> bool {
    let fields = [
      customer.name.as_str(),
      customer.document.as_str(),
      customer.email.as_str(),
    ];
    any_field_matches(fields, &self.search) && self.status.map_or(true, |s| customer.status == s)
  }
}

/// Processes whose `customer_id` points at `customer_id`.
pub fn processes_of<'a>(processes: &'a [LegalProcess], customer_id: &str) -> Vec<&'a LegalProcess> {
  processes
    .iter()
    .filter(|p| p.customer_id == customer_id)
    .collect()
}

/// Active and archived process counts for one customer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CaseLoad {
  pub active: usize,
  pub archived: usize,
}

pub fn case_load(processes: &[LegalProcess], customer_id: &str) -> CaseLoad {
  processes_of(processes, customer_id)
    .into_iter()
    .fold(CaseLoad::default(), |mut load, p| {
      if p.is_archived() {
        load.archived += 1;
      } else {
        load.active += 1;
      }
      load
    })
}

/// Resolve a loose customer reference; `None` when it does not resolve.
pub fn find_customer<'a>(customers: &'a [Customer], id: &str) -> Option<&'a Customer> {
  customers.iter().find(|c| c.id == id)
}
