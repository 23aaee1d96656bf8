//! User-entered fields for new records.
//!
//! Drafts carry no id and no server-side or derived fields; the coordinator
//! fills those in when it creates the record.

use crate::model::{
  CustomerStatus, Priority, ProcessPhase, TransactionCategory, TransactionStatus, TransactionType,
};

#[derive(Debug, Clone)]
pub struct CallDraft {
  pub caller_name: String,
  pub information: String,
  pub lawyer_name: String,
  pub process_number: Option<String>,
  pub process_phase: Option<ProcessPhase>,
  pub priority: Priority,
  pub category: String,
}

#[derive(Debug, Clone)]
pub struct CustomerDraft {
  pub name: String,
  pub document: String,
  pub phone: String,
  pub email: String,
  pub address: String,
  pub status: CustomerStatus,
  pub interview_notes: Option<String>,
}

#[derive(Debug, Clone)]
pub struct ProcessDraft {
  pub process_number: String,
  pub title: String,
  pub customer_id: String,
  pub lawyer_name: String,
  pub phase: ProcessPhase,
  pub description: String,
  pub initial_petition: Option<String>,
  pub honorary_value: Option<f64>,
  pub start_date: String,
}

#[derive(Debug, Clone)]
pub struct TransactionDraft {
  pub customer_id: Option<String>,
  pub description: String,
  pub amount: f64,
  pub kind: TransactionType,
  pub category: TransactionCategory,
  pub status: TransactionStatus,
  pub due_date: String,
}
