//! Domain types held in the entity caches.
//!
//! Stored labels are Portuguese because that is what the hosted database holds;
//! variant names are English. The wire mapping lives in `records`.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Triage priority assigned to a call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Priority {
  #[serde(rename = "Baixa", alias = "Low", alias = "low")]
  Low,
  #[serde(rename = "Média", alias = "Media", alias = "Medium", alias = "medium")]
  Medium,
  #[serde(rename = "Alta", alias = "High", alias = "high")]
  High,
}

impl Priority {
  pub fn label(&self) -> &'static str {
    match self {
      Priority::Low => "Baixa",
      Priority::Medium => "Média",
      Priority::High => "Alta",
    }
  }
}

impl FromStr for Priority {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "low" | "baixa" => Ok(Priority::Low),
      "medium" | "med" | "média" | "media" => Ok(Priority::Medium),
      "high" | "alta" => Ok(Priority::High),
      other => Err(format!("unknown priority: {other}")),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CustomerStatus {
  #[serde(rename = "Lead")]
  Lead,
  #[serde(rename = "Ativo", alias = "Active")]
  Active,
}

impl CustomerStatus {
  pub fn label(&self) -> &'static str {
    match self {
      CustomerStatus::Lead => "Lead",
      CustomerStatus::Active => "Ativo",
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionType {
  #[serde(rename = "Entrada", alias = "Income")]
  Income,
  #[serde(rename = "Saída", alias = "Saida", alias = "Expense")]
  Expense,
}

impl TransactionType {
  pub fn label(&self) -> &'static str {
    match self {
      TransactionType::Income => "Entrada",
      TransactionType::Expense => "Saída",
    }
  }
}

impl FromStr for TransactionType {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "income" | "entrada" => Ok(TransactionType::Income),
      "expense" | "saída" | "saida" => Ok(TransactionType::Expense),
      other => Err(format!("unknown transaction type: {other}")),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionStatus {
  #[serde(rename = "Pago", alias = "Paid")]
  Paid,
  #[serde(rename = "Pendente", alias = "Pending")]
  Pending,
  #[serde(rename = "Atrasado", alias = "Overdue")]
  Overdue,
}

impl TransactionStatus {
  pub fn label(&self) -> &'static str {
    match self {
      TransactionStatus::Paid => "Pago",
      TransactionStatus::Pending => "Pendente",
      TransactionStatus::Overdue => "Atrasado",
    }
  }
}

impl FromStr for TransactionStatus {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "paid" | "pago" => Ok(TransactionStatus::Paid),
      "pending" | "pendente" => Ok(TransactionStatus::Pending),
      "overdue" | "atrasado" => Ok(TransactionStatus::Overdue),
      other => Err(format!("unknown transaction status: {other}")),
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TransactionCategory {
  #[serde(rename = "Honorários Iniciais")]
  InitialFees,
  #[serde(rename = "Honorários de Êxito")]
  SuccessFees,
  #[serde(rename = "Consultoria")]
  Consulting,
  #[serde(rename = "Marketing")]
  Marketing,
  #[serde(rename = "Custas")]
  CourtCosts,
  #[serde(rename = "Outros")]
  Other,
}

impl TransactionCategory {
  pub fn label(&self) -> &'static str {
    match self {
      TransactionCategory::InitialFees => "Honorários Iniciais",
      TransactionCategory::SuccessFees => "Honorários de Êxito",
      TransactionCategory::Consulting => "Consultoria",
      TransactionCategory::Marketing => "Marketing",
      TransactionCategory::CourtCosts => "Custas",
      TransactionCategory::Other => "Outros",
    }
  }
}

impl FromStr for TransactionCategory {
  type Err = String;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim().to_lowercase().as_str() {
      "initial-fees" | "honorários iniciais" => Ok(TransactionCategory::InitialFees),
      "success-fees" | "honorários de êxito" => Ok(TransactionCategory::SuccessFees),
      "consulting" | "consultoria" => Ok(TransactionCategory::Consulting),
      "marketing" => Ok(TransactionCategory::Marketing),
      "court-costs" | "custas" => Ok(TransactionCategory::CourtCosts),
      "other" | "outros" => Ok(TransactionCategory::Other),
      other => Err(format!("unknown transaction category: {other}")),
    }
  }
}

/// Stage of a legal process.
///
/// Any phase may follow any other. Stored values outside the known lifecycle
/// are kept verbatim in `Other`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum ProcessPhase {
  InitialPetition,
  Citation,
  Reply,
  MedicalExam,
  Hearing,
  Sentence,
  Appeal,
  Execution,
  Archived,
  Other(String),
}

impl ProcessPhase {
  /// Known phases in lifecycle order.
  pub const LIFECYCLE: [ProcessPhase; 9] = [
    ProcessPhase::InitialPetition,
    ProcessPhase::Citation,
    ProcessPhase::Reply,
    ProcessPhase::MedicalExam,
    ProcessPhase::Hearing,
    ProcessPhase::Sentence,
    ProcessPhase::Appeal,
    ProcessPhase::Execution,
    ProcessPhase::Archived,
  ];

  pub fn label(&self) -> &str {
    match self {
      ProcessPhase::InitialPetition => "Petição Inicial",
      ProcessPhase::Citation => "Citação INSS",
      ProcessPhase::Reply => "Réplica",
      ProcessPhase::MedicalExam => "Perícia Médica",
      ProcessPhase::Hearing => "Audiência",
      ProcessPhase::Sentence => "Sentença",
      ProcessPhase::Appeal => "Recurso (TRF)",
      ProcessPhase::Execution => "Execução / RPV",
      ProcessPhase::Archived => "Arquivado",
      ProcessPhase::Other(label) => label,
    }
  }
}

impl From<String> for ProcessPhase {
  fn from(value: String) -> Self {
    Self::LIFECYCLE
      .iter()
      .find(|phase| phase.label() == value)
      .cloned()
      .unwrap_or(ProcessPhase::Other(value))
  }
}

impl From<ProcessPhase> for String {
  fn from(phase: ProcessPhase) -> Self {
    match phase {
      ProcessPhase::Other(label) => label,
      known => known.label().to_string(),
    }
  }
}

impl FromStr for ProcessPhase {
  type Err = std::convert::Infallible;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let wanted = s.trim().to_lowercase();
    Ok(
      Self::LIFECYCLE
        .iter()
        .find(|phase| phase.label().to_lowercase() == wanted)
        .cloned()
        .unwrap_or_else(|| ProcessPhase::Other(s.trim().to_string())),
    )
  }
}

impl fmt::Display for ProcessPhase {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.pad(self.label())
  }
}

/// A logged incoming call.
#[derive(Debug, Clone, PartialEq)]
pub struct CallRecord {
  pub id: String,
  pub caller_name: String,
  pub information: String,
  /// ISO-8601 timestamp of the call
  pub date_time: String,
  /// Loose reference into the lawyer roster; may not resolve
  pub lawyer_name: String,
  /// Loose reference to a `LegalProcess::process_number`; may not resolve
  pub process_number: Option<String>,
  pub process_phase: Option<ProcessPhase>,
  pub is_first_time: bool,
  pub call_count: u32,
  pub priority: Priority,
  pub category: String,
}

/// Normalized form of a caller name used to count repeat calls.
pub fn caller_key(name: &str) -> String {
  name.trim().to_lowercase()
}

impl CallRecord {
  pub fn is_from(&self, caller: &str) -> bool {
    caller_key(&self.caller_name) == caller_key(caller)
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Customer {
  pub id: String,
  pub name: String,
  /// CPF or CNPJ
  pub document: String,
  pub phone: String,
  pub email: String,
  pub address: String,
  pub status: CustomerStatus,
  pub interview_notes: Option<String>,
  pub ai_interview_summary: Option<String>,
  pub created_at: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LegalProcess {
  pub id: String,
  pub process_number: String,
  pub title: String,
  pub customer_id: String,
  pub lawyer_name: String,
  pub phase: ProcessPhase,
  pub description: String,
  pub initial_petition: Option<String>,
  pub decisions: Option<Vec<String>>,
  pub sentence: Option<String>,
  pub honorary_value: Option<f64>,
  pub start_date: String,
  pub created_at: Option<String>,
}

impl LegalProcess {
  pub fn is_archived(&self) -> bool {
    self.phase == ProcessPhase::Archived
  }
}

#[derive(Debug, Clone, PartialEq)]
pub struct FinancialTransaction {
  pub id: String,
  pub customer_id: Option<String>,
  pub description: String,
  pub amount: f64,
  pub kind: TransactionType,
  pub category: TransactionCategory,
  pub status: TransactionStatus,
  pub due_date: String,
  /// Present exactly when `status` is `Paid`
  pub payment_date: Option<String>,
}

impl FinancialTransaction {
  pub fn is_paid(&self) -> bool {
    self.status == TransactionStatus::Paid
  }
}
