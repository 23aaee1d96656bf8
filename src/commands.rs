//! Command-line subcommands.

use clap::{Args, Subcommand};

use crate::model::{Priority, ProcessPhase, TransactionCategory, TransactionStatus, TransactionType};
use crate::views::processes::ProcessStatus;

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
  /// Office-wide figures
  #[command(visible_alias = "d")]
  Dashboard,

  /// List logged calls, newest first
  #[command(visible_alias = "c")]
  Calls {
    /// Search caller, information, lawyer and process number
    #[arg(short, long, default_value = "")]
    search: String,
    /// Only this priority (alta, média, baixa)
    #[arg(short, long)]
    priority: Option<Priority>,
  },

  /// Log a new call; priority and category come from AI triage
  CallNew(CallNewArgs),

  /// Set or clear the process phase of a call
  CallPhase {
    id: String,
    /// Phase label, e.g. "Audiência"; omit to clear
    phase: Option<ProcessPhase>,
  },

  /// List customers
  #[command(visible_alias = "cu")]
  Customers {
    #[arg(short, long, default_value = "")]
    search: String,
    /// Only leads
    #[arg(long)]
    leads: bool,
  },

  /// Register a customer
  CustomerNew(CustomerNewArgs),

  /// AI summary of a customer's interview notes
  CustomerSummary { id: String },

  /// List processes grouped by specialty
  #[command(visible_alias = "p")]
  Processes {
    #[arg(short, long, default_value = "")]
    search: String,
    /// active, archived or all
    #[arg(long, default_value = "active")]
    status: ProcessStatus,
  },

  /// Open a legal process
  ProcessNew(ProcessNewArgs),

  /// AI strategic review of a process
  ProcessAnalysis { id: String },

  /// Transactions and cash totals
  #[command(visible_alias = "f")]
  Finance {
    /// Search descriptions
    #[arg(short, long, default_value = "")]
    search: String,
    /// income or expense
    #[arg(short, long)]
    kind: Option<TransactionType>,
  },

  /// Record a transaction
  TxNew(TxNewArgs),

  /// Change a transaction's status (paid, pending, overdue)
  TxStatus { id: String, status: TransactionStatus },

  /// Roster with productivity figures
  #[command(visible_alias = "l")]
  Lawyers,
}

#[derive(Args, Debug, Clone)]
pub struct CallNewArgs {
  #[arg(long)]
  pub caller: String,
  #[arg(long)]
  pub info: String,
  #[arg(long)]
  pub lawyer: String,
  #[arg(long)]
  pub process_number: Option<String>,
  #[arg(long)]
  pub phase: Option<ProcessPhase>,
}

#[derive(Args, Debug, Clone)]
pub struct CustomerNewArgs {
  #[arg(long)]
  pub name: String,
  /// CPF or CNPJ
  #[arg(long)]
  pub document: String,
  #[arg(long, default_value = "")]
  pub phone: String,
  #[arg(long, default_value = "")]
  pub email: String,
  #[arg(long, default_value = "")]
  pub address: String,
  /// Register as a lead instead of an active customer
  #[arg(long)]
  pub lead: bool,
  /// Interview notes
  #[arg(long)]
  pub notes: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct ProcessNewArgs {
  #[arg(long)]
  pub number: String,
  #[arg(long)]
  pub title: String,
  #[arg(long)]
  pub customer: String,
  #[arg(long)]
  pub lawyer: String,
  #[arg(long, default_value = "Petição Inicial")]
  pub phase: ProcessPhase,
  #[arg(long, default_value = "")]
  pub description: String,
  #[arg(long)]
  pub petition: Option<String>,
  #[arg(long)]
  pub fee: Option<f64>,
  /// YYYY-MM-DD; defaults to today
  #[arg(long)]
  pub start_date: Option<String>,
}

#[derive(Args, Debug, Clone)]
pub struct TxNewArgs {
  #[arg(long)]
  pub description: String,
  #[arg(long)]
  pub amount: f64,
  /// income or expense
  #[arg(long)]
  pub kind: TransactionType,
  /// initial-fees, success-fees, consulting, marketing, court-costs, other
  #[arg(long, default_value = "initial-fees")]
  pub category: TransactionCategory,
  #[arg(long, default_value = "pending")]
  pub status: TransactionStatus,
  /// YYYY-MM-DD; defaults to today
  #[arg(long)]
  pub due: Option<String>,
  #[arg(long)]
  pub customer: Option<String>,
}

impl Command {
  /// Whether the command writes to the store.
  pub fn is_write(&self) -> bool {
    matches!(
      self,
      Command::CallNew(_)
        | Command::CallPhase { .. }
        | Command::CustomerNew(_)
        | Command::ProcessNew(_)
        | Command::TxNew(_)
        | Command::TxStatus { .. }
    )
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use clap::Parser;

  #[derive(Parser, Debug)]
  struct Cli {
    #[command(subcommand)]
    command: Command,
  }

  fn parse(args: &[&str]) -> Command {
    Cli::try_parse_from(std::iter::once("juriscall").chain(args.iter().copied()))
      .unwrap()
      .command
  }

  #[test]
  fn test_calls_with_filters() {
    match parse(&["calls", "-s", "maria", "-p", "alta"]) {
      Command::Calls { search, priority } => {
        assert_eq!(search, "maria");
        assert_eq!(priority, Some(Priority::High));
      }
      other => panic!("unexpected {other:?}"),
    }
  }

  #[test]
  fn test_alias() {
    assert!(matches!(parse(&["d"]), Command::Dashboard));
    assert!(matches!(parse(&["l"]), Command::Lawyers));
  }

  #[test]
  fn test_call_phase_optional() {
    match parse(&["call-phase", "abc", "Audiência"]) {
      Command::CallPhase { id, phase } => {
        assert_eq!(id, "abc");
        assert_eq!(phase, Some(ProcessPhase::Hearing));
      }
      other => panic!("unexpected {other:?}"),
    }
    assert!(matches!(
      parse(&["call-phase", "abc"]),
      Command::CallPhase { phase: None, .. }
    ));
  }

  #[test]
  fn test_tx_new_defaults() {
    let args = [
      "tx-new",
      "--description",
      "Custas",
      "--amount",
      "120.5",
      "--kind",
      "expense",
    ];
    match parse(&args) {
      Command::TxNew(args) => {
        assert_eq!(args.kind, TransactionType::Expense);
        assert_eq!(args.category, TransactionCategory::InitialFees);
        assert_eq!(args.status, TransactionStatus::Pending);
        assert!(args.due.is_none());
      }
      other => panic!("unexpected {other:?}"),
    }
  }

  #[test]
  fn test_process_status_parses() {
    assert!(matches!(
      parse(&["processes", "--status", "archived"]),
      Command::Processes {
        status: ProcessStatus::Archived,
        ..
      }
    ));
  }

  #[test]
  fn test_bad_status_is_rejected() {
    let result = Cli::try_parse_from(["juriscall", "tx-status", "t1", "maybe"]);
    assert!(result.is_err());
  }

  #[test]
  fn test_is_write() {
    assert!(parse(&["tx-status", "t1", "paid"]).is_write());
    assert!(!parse(&["finance"]).is_write());
  }
}
