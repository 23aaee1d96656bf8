//! Stored record shapes and the field mapper between them and domain types.
//!
//! Rows are kept separate from domain types so the snake_case storage naming
//! never leaks past this module.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::types::{
  CallRecord, Customer, CustomerStatus, FinancialTransaction, LegalProcess, Priority,
  ProcessPhase, TransactionCategory, TransactionStatus, TransactionType,
};
use crate::cache::Cacheable;
use crate::store::{Collection, RawRecord};

// ============================================================================
// Stored rows
// ============================================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallRow {
  #[serde(default)]
  pub id: String,
  pub caller_name: String,
  pub information: String,
  pub date_time: String,
  pub lawyer_name: String,
  #[serde(default)]
  pub process_number: Option<String>,
  #[serde(default)]
  pub process_phase: Option<ProcessPhase>,
  pub is_first_time: bool,
  pub call_count: u32,
  pub priority: Priority,
  pub category: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomerRow {
  #[serde(default)]
  pub id: String,
  pub name: String,
  pub document: String,
  pub phone: String,
  pub email: String,
  pub address: String,
  pub status: CustomerStatus,
  #[serde(default)]
  pub interview_notes: Option<String>,
  #[serde(default)]
  pub ai_interview_summary: Option<String>,
  #[serde(default)]
  pub created_at: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProcessRow {
  #[serde(default)]
  pub id: String,
  pub process_number: String,
  pub title: String,
  pub customer_id: String,
  pub lawyer_name: String,
  pub phase: ProcessPhase,
  pub description: String,
  #[serde(default)]
  pub initial_petition: Option<String>,
  #[serde(default)]
  pub decisions: Option<Vec<String>>,
  #[serde(default)]
  pub sentence: Option<String>,
  #[serde(default)]
  pub honorary_value: Option<f64>,
  pub start_date: String,
  #[serde(default)]
  pub created_at: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionRow {
  #[serde(default)]
  pub id: String,
  #[serde(default)]
  pub customer_id: Option<String>,
  pub description: String,
  pub amount: f64,
  #[serde(rename = "type")]
  pub kind: TransactionType,
  pub category: TransactionCategory,
  pub status: TransactionStatus,
  pub due_date: String,
  #[serde(default)]
  pub payment_date: Option<String>,
}

// ============================================================================
// Partial updates
// ============================================================================

/// Fields sent when a call's process phase changes.
#[derive(Debug, Serialize)]
pub struct CallPhasePatch<'a> {
  pub process_phase: Option<&'a ProcessPhase>,
}

/// Fields sent when a transaction's status changes.
#[derive(Debug, Serialize)]
pub struct TransactionStatusPatch<'a> {
  pub status: TransactionStatus,
  pub payment_date: Option<&'a str>,
}

// ============================================================================
// Mapper
// ============================================================================

/// Map a domain entity to its stored record.
pub fn to_raw<T: Cacheable>(entity: &T) -> serde_json::Result<RawRecord> {
  to_object(&entity.to_record())
}

/// Map a stored record to its domain entity.
pub fn to_domain<T: Cacheable>(raw: RawRecord) -> serde_json::Result<T> {
  let record: T::Record = serde_json::from_value(Value::Object(raw))?;
  Ok(T::from_record(record))
}

/// Map a whole fetch result; fails on the first malformed record.
pub fn to_domain_all<T: Cacheable>(raws: Vec<RawRecord>) -> serde_json::Result<Vec<T>> {
  raws.into_iter().map(to_domain).collect()
}

/// Stored record for an insert: the store assigns the id.
pub fn to_insert<T: Cacheable>(entity: &T) -> serde_json::Result<RawRecord> {
  let mut raw = to_raw(entity)?;
  raw.remove("id");
  let blank_created_at = match raw.get("created_at") {
    Some(Value::String(s)) => s.is_empty(),
    Some(Value::Null) => true,
    _ => false,
  };
  if T::collection().defaults_created_at() && blank_created_at {
    raw.remove("created_at");
  }
  Ok(raw)
}

/// Serialize any serde struct into a raw record.
pub fn to_object<S: Serialize>(value: &S) -> serde_json::Result<RawRecord> {
  match serde_json::to_value(value)? {
    Value::Object(map) => Ok(map),
    other => Err(<serde_json::Error as serde::ser::Error>::custom(format!(
      "expected a record object, got {other}"
    ))),
  }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<CallRow> for CallRecord {
  fn from(row: CallRow) -> Self {
    CallRecord {
      id: row.id,
      caller_name: row.caller_name,
      information: row.information,
      date_time: row.date_time,
      lawyer_name: row.lawyer_name,
      process_number: row.process_number,
      process_phase: row.process_phase,
      is_first_time: row.is_first_time,
      call_count: row.call_count,
      priority: row.priority,
      category: row.category,
    }
  }
}

impl From<&CallRecord> for CallRow {
  fn from(call: &CallRecord) -> Self {
    CallRow {
      id: call.id.clone(),
      caller_name: call.caller_name.clone(),
      information: call.information.clone(),
      date_time: call.date_time.clone(),
      lawyer_name: call.lawyer_name.clone(),
      process_number: call.process_number.clone(),
      process_phase: call.process_phase.clone(),
      is_first_time: call.is_first_time,
      call_count: call.call_count,
      priority: call.priority,
      category: call.category.clone(),
    }
  }
}

impl From<CustomerRow> for Customer {
  fn from(row: CustomerRow) -> Self {
    Customer {
      id: row.id,
      name: row.name,
      document: row.document,
      phone: row.phone,
      email: row.email,
      address: row.address,
      status: row.status,
      interview_notes: row.interview_notes,
      ai_interview_summary: row.ai_interview_summary,
      created_at: row.created_at,
    }
  }
}

impl From<&Customer> for CustomerRow {
  fn from(customer: &Customer) -> Self {
    CustomerRow {
      id: customer.id.clone(),
      name: customer.name.clone(),
      document: customer.document.clone(),
      phone: customer.phone.clone(),
      email: customer.email.clone(),
      address: customer.address.clone(),
      status: customer.status,
      interview_notes: customer.interview_notes.clone(),
      ai_interview_summary: customer.ai_interview_summary.clone(),
      created_at: customer.created_at.clone(),
    }
  }
}

impl From<ProcessRow> for LegalProcess {
  fn from(row: ProcessRow) -> Self {
    LegalProcess {
      id: row.id,
      process_number: row.process_number,
      title: row.title,
      customer_id: row.customer_id,
      lawyer_name: row.lawyer_name,
      phase: row.phase,
      description: row.description,
      initial_petition: row.initial_petition,
      decisions: row.decisions,
      sentence: row.sentence,
      honorary_value: row.honorary_value,
      start_date: row.start_date,
      created_at: row.created_at,
    }
  }
}

impl From<&LegalProcess> for ProcessRow {
  fn from(process: &LegalProcess) -> Self {
    ProcessRow {
      id: process.id.clone(),
      process_number: process.process_number.clone(),
      title: process.title.clone(),
      customer_id: process.customer_id.clone(),
      lawyer_name: process.lawyer_name.clone(),
      phase: process.phase.clone(),
      description: process.description.clone(),
      initial_petition: process.initial_petition.clone(),
      decisions: process.decisions.clone(),
      sentence: process.sentence.clone(),
      honorary_value: process.honorary_value,
      start_date: process.start_date.clone(),
      created_at: process.created_at.clone(),
    }
  }
}

impl From<TransactionRow> for FinancialTransaction {
  fn from(row: TransactionRow) -> Self {
    FinancialTransaction {
      id: row.id,
      customer_id: row.customer_id,
      description: row.description,
      amount: row.amount,
      kind: row.kind,
      category: row.category,
      status: row.status,
      due_date: row.due_date,
      payment_date: row.payment_date,
    }
  }
}

impl From<&FinancialTransaction> for TransactionRow {
  fn from(tx: &FinancialTransaction) -> Self {
    TransactionRow {
      id: tx.id.clone(),
      customer_id: tx.customer_id.clone(),
      description: tx.description.clone(),
      amount: tx.amount,
      kind: tx.kind,
      category: tx.category,
      status: tx.status,
      due_date: tx.due_date.clone(),
      payment_date: tx.payment_date.clone(),
    }
  }
}

// ============================================================================
// Cacheable implementations
// ============================================================================

impl Cacheable for CallRecord {
  type Record = CallRow;

  fn cache_key(&self) -> &str {
    &self.id
  }

  fn collection() -> Collection {
    Collection::CallRecords
  }

  fn to_record(&self) -> CallRow {
    CallRow::from(self)
  }

  fn from_record(record: CallRow) -> Self {
    record.into()
  }
}

impl Cacheable for Customer {
  type Record = CustomerRow;

  fn cache_key(&self) -> &str {
    &self.id
  }

  fn collection() -> Collection {
    Collection::Customers
  }

  fn to_record(&self) -> CustomerRow {
    CustomerRow::from(self)
  }

  fn from_record(record: CustomerRow) -> Self {
    record.into()
  }
}

impl Cacheable for LegalProcess {
  type Record = ProcessRow;

  fn cache_key(&self) -> &str {
    &self.id
  }

  fn collection() -> Collection {
    Collection::LegalProcesses
  }

  fn to_record(&self) -> ProcessRow {
    ProcessRow::from(self)
  }

  fn from_record(record: ProcessRow) -> Self {
    record.into()
  }
}

impl Cacheable for FinancialTransaction {
  type Record = TransactionRow;

  fn cache_key(&self) -> &str {
    &self.id
  }

  fn collection() -> Collection {
    Collection::FinancialTransactions
  }

  fn to_record(&self) -> TransactionRow {
    TransactionRow::from(self)
  }

  fn from_record(record: TransactionRow) -> Self {
    record.into()
  }
}
