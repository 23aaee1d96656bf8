//! Legal process view: status filter, search and grouping by specialty.

use std::collections::BTreeMap;

use super::{any_field_matches, customers::find_customer};
use crate::model::{Customer, LegalProcess, Roster};

/// Shown when a process's customer reference does not resolve.
pub const UNKNOWN_CUSTOMER: &str = "Cliente Geral";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ProcessStatus {
  /// Not archived
  #[default]
  Active,
  Archived,
  All,
}

impl std::str::FromStr for ProcessStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "active" | "ativos" => Ok(ProcessStatus::Active),
      "archived" | "arquivados" => Ok(ProcessStatus::Archived),
      "all" | "todos" => Ok(ProcessStatus::All),
      other => Err(format!("unknown process status: {other}")),
    }
  }
}

impl ProcessStatus {
  fn admits(&self, process: &LegalProcess) -> bool {
    match self {
      ProcessStatus::Active => !process.is_archived(),
      ProcessStatus::Archived => process.is_archived(),
      ProcessStatus::All => true,
    }
  }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessFilter {
  pub search: String,
  pub status: ProcessStatus,
}

/// Customer name for a process, or the general-client label.
pub fn customer_name<'a>(customers: &'a [Customer], process: &LegalProcess) -> &'a str {
  find_customer(customers, &process.customer_id)
    .map(|c| c.name.as_str())
    .unwrap_or(UNKNOWN_CUSTOMER)
}

/// Processes passing `filter`, in input order.
///
/// Search covers title, process number and the resolved customer name, so it
/// needs the customer snapshot alongside.
pub fn filter_processes<'a>(
  processes: &'a [LegalProcess],
  customers: &[Customer],
  filter: &ProcessFilter,
) -> Vec<&'a LegalProcess> {
  processes
    .iter()
    .filter(|p| filter.status.admits(p))
    .filter(|p| {
      let fields = [
        p.title.as_str(),
        p.process_number.as_str(),
        customer_name(customers, p),
      ];
      any_field_matches(fields, &filter.search)
    })
    .collect()
}

/// Group processes by the specialty of their lawyer.
///
/// Lawyers missing from the roster fall into the roster's default bucket.
/// Groups are keyed alphabetically; each keeps input order.
pub fn group_by_specialty<'a>(
  processes: &[&'a LegalProcess],
  roster: &Roster,
) -> BTreeMap<String, Vec<&'a LegalProcess>> {
  let mut groups: BTreeMap<String, Vec<&'a LegalProcess>> = BTreeMap::new();
  for process in processes {
    groups
      .entry(roster.specialty_of(&process.lawyer_name).to_string())
      .or_default()
      .push(*process);
  }
  groups
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::model::roster::LawyerRole;
  use crate::model::{CustomerStatus, Lawyer, ProcessPhase};

  fn process(
    id: &str,
    title: &str,
    lawyer: &str,
    customer_id: &str,
    phase: ProcessPhase,
  ) -> LegalProcess {
    LegalProcess {
      id: id.to_string(),
      process_number: format!("5000{id}-11.2024"),
      title: title.to_string(),
      customer_id: customer_id.to_string(),
      lawyer_name: lawyer.to_string(),
      phase,
      description: String::new(),
      initial_petition: None,
      decisions: None,
      sentence: None,
      honorary_value: None,
      start_date: "2024-01-10".to_string(),
      created_at: None,
    }
  }

  fn customers() -> Vec<Customer> {
    vec![Customer {
      id: "c1".to_string(),
      name: "Joana Prado".to_string(),
      document: String::new(),
      phone: String::new(),
      email: String::new(),
      address: String::new(),
      status: CustomerStatus::Active,
      interview_notes: None,
      ai_interview_summary: None,
      created_at: String::new(),
    }]
  }

  fn sample() -> Vec<LegalProcess> {
    vec![
      process("1", "Aposentadoria Especial", "Dr. André", "c1", ProcessPhase::Hearing),
      process("2", "Revisão da Vida Toda", "Dra. Beatriz", "gone", ProcessPhase::Archived),
      process("3", "Pensão por Morte", "Dr. Desconhecido", "c1", ProcessPhase::Sentence),
    ]
  }

  fn roster() -> Roster {
    let lawyer = |name: &str, specialty: &str| Lawyer {
      name: name.to_string(),
      specialty: specialty.to_string(),
      oab: String::new(),
      email: String::new(),
      role: Some(LawyerRole::Associate),
      bio: None,
    };
    Roster::new(
      vec![
        lawyer("Dr. André", "Previdenciário"),
        lawyer("Dra. Beatriz", "Cível"),
      ],
      "Estratégico",
    )
  }

  fn ids(list: &[&LegalProcess]) -> Vec<String> {
    list.iter().map(|p| p.id.clone()).collect()
  }

  #[test]
  fn test_status_filter() {
    let (processes, customers) = (sample(), customers());
    let with = |status| {
      ids(&filter_processes(
        &processes,
        &customers,
        &ProcessFilter {
          search: String::new(),
          status,
        },
      ))
    };
    assert_eq!(with(ProcessStatus::Active), vec!["1", "3"]);
    assert_eq!(with(ProcessStatus::Archived), vec!["2"]);
    assert_eq!(with(ProcessStatus::All).len(), 3);
  }

  #[test]
  fn test_search_uses_resolved_customer_name_and_fallback() {
    let (processes, customers) = (sample(), customers());
    let search = |s: &str| {
      ids(&filter_processes(
        &processes,
        &customers,
        &ProcessFilter {
          search: s.to_string(),
          status: ProcessStatus::All,
        },
      ))
    };
    assert_eq!(search("joana"), vec!["1", "3"]);
    assert_eq!(search("cliente geral"), vec!["2"]);
    assert_eq!(search("5000"), vec!["1", "2", "3"]);
    assert_eq!(search("pensão"), vec!["3"]);
  }

  #[test]
  fn test_group_by_specialty_uses_default_bucket() {
    let processes = sample();
    let all: Vec<&LegalProcess> = processes.iter().collect();
    let groups = group_by_specialty(&all, &roster());

    let keys: Vec<&str> = groups.keys().map(String::as_str).collect();
    assert_eq!(keys, vec!["Cível", "Estratégico", "Previdenciário"]);
    assert_eq!(ids(&groups["Estratégico"]), vec!["3"]);
    assert_eq!(ids(&groups["Previdenciário"]), vec!["1"]);
  }

  #[test]
  fn test_customer_name_fallback() {
    let processes = sample();
    assert_eq!(customer_name(&customers(), &processes[1]), UNKNOWN_CUSTOMER);
  }
}
