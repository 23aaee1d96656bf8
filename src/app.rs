use crate::ai::{self, Analyst, GeminiAnalyst};
use crate::commands::{CallNewArgs, Command, CustomerNewArgs, ProcessNewArgs, TxNewArgs};
use crate::config::{Config, StoreBackend};
use crate::model::{CustomerStatus, Roster};
use crate::render;
use crate::store::{PostgrestStore, RemoteStore, SqliteStore};
use crate::sync::{CallDraft, CustomerDraft, ProcessDraft, SyncCoordinator, TransactionDraft};
use crate::views::calls::{call_log, CallFilter};
use crate::views::customers::{case_load, find_customer, CustomerFilter};
use crate::views::dashboard::dashboard;
use crate::views::finance::{cash_totals, ledger, TransactionFilter};
use crate::views::lawyers::roster_stats;
use crate::views::processes::{filter_processes, group_by_specialty, ProcessFilter};
use crate::views::ViewFilter;
use chrono::Utc;
use color_eyre::{eyre::eyre, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};

/// Main application state
pub struct App {
  /// Lawyer roster from the configuration
  roster: Roster,

  /// Caches and remote writes
  sync: SyncCoordinator,

  /// Generative-text backend
  analyst: Arc<dyn Analyst>,

  /// Extra load attempts after a failed initial load
  retries: u32,
}

/// Open the store selected by the configuration, or the local database at
/// `sqlite_override` when given.
pub fn open_store(
  config: &Config,
  sqlite_override: Option<&Path>,
) -> Result<Arc<dyn RemoteStore>> {
  if let Some(path) = sqlite_override {
    info!(path = %path.display(), "using local store");
    return Ok(Arc::new(SqliteStore::open(Some(path))?));
  }

  match config.store.backend {
    StoreBackend::Supabase => Ok(Arc::new(PostgrestStore::new(config)?)),
    StoreBackend::Sqlite => {
      let path = config.sqlite_path();
      Ok(Arc::new(SqliteStore::open(path.as_deref())?))
    }
  }
}

impl App {
  pub fn new(config: Config, sqlite_override: Option<&Path>, retries: u32) -> Result<Self> {
    let store = open_store(&config, sqlite_override)?;
    let analyst = Arc::new(GeminiAnalyst::new(&config.ai)?);
    Ok(Self::with_parts(config.roster(), store, analyst, retries))
  }

  pub fn with_parts(
    roster: Roster,
    store: Arc<dyn RemoteStore>,
    analyst: Arc<dyn Analyst>,
    retries: u32,
  ) -> Self {
    Self {
      roster,
      sync: SyncCoordinator::new(store),
      analyst,
      retries,
    }
  }

  /// Initial load, retried as a whole batch up to `retries` more times.
  pub async fn load(&self) -> Result<()> {
    let mut result = self.sync.load_all().await;
    let mut attempt = 0;
    while result.is_err() && attempt < self.retries {
      attempt += 1;
      let state = self.sync.load_state();
      warn!(
        attempt,
        retries = self.retries,
        error = state.error().unwrap_or_default(),
        "retrying initial load"
      );
      result = self.sync.retry_load().await;
    }
    Ok(result?)
  }

  /// Load everything, run `command` and return its text output.
  pub async fn run(&self, command: Command) -> Result<String> {
    self.load().await?;
    if command.is_write() {
      info!(?command, "running write command");
    }
    self.execute(command).await
  }

  async fn execute(&self, command: Command) -> Result<String> {
    match command {
      Command::Dashboard => {
        let figures = dashboard(
          &self.sync.calls(),
          &self.sync.transactions(),
          Utc::now().date_naive(),
        );
        Ok(render::dashboard(&figures))
      }
      Command::Calls { search, priority } => {
        let calls = self.sync.calls();
        let filter = CallFilter { search, priority };
        Ok(render::call_list(&call_log(&calls, &filter)))
      }
      Command::CallNew(args) => self.new_call(args).await,
      Command::CallPhase { id, phase } => {
        let call = self.sync.update_call_phase(&id, phase).await?;
        Ok(render::call_line(&call))
      }
      Command::Customers { search, leads } => {
        let customers = self.sync.customers();
        let processes = self.sync.processes();
        let filter = CustomerFilter {
          search,
          status: leads.then_some(CustomerStatus::Lead),
        };
        let rows: Vec<_> = filter
          .apply(&customers)
          .into_iter()
          .map(|c| (c, case_load(&processes, &c.id)))
          .collect();
        Ok(render::customer_list(&rows))
      }
      Command::CustomerNew(args) => self.new_customer(args).await,
      Command::CustomerSummary { id } => {
        let customer = self
          .sync
          .customer(&id)
          .ok_or_else(|| eyre!("Customer {} not found", id))?;
        let notes = customer
          .interview_notes
          .as_deref()
          .filter(|n| !n.trim().is_empty())
          .ok_or_else(|| eyre!("Customer {} has no interview notes", id))?;
        let summary = self.analyst.summarize_interview(notes).await?;
        Ok(render::interview_summary(&customer, &summary))
      }
      Command::Processes { search, status } => {
        let processes = self.sync.processes();
        let customers = self.sync.customers();
        let filter = ProcessFilter { search, status };
        let matching = filter_processes(&processes, &customers, &filter);
        let groups = group_by_specialty(&matching, &self.roster);
        Ok(render::process_groups(&groups, &customers))
      }
      Command::ProcessNew(args) => self.new_process(args).await,
      Command::ProcessAnalysis { id } => {
        let process = self
          .sync
          .process(&id)
          .ok_or_else(|| eyre!("Process {} not found", id))?;
        let analysis = self.analyst.analyze_process(&process).await?;
        Ok(render::process_analysis(&process, &analysis))
      }
      Command::Finance { search, kind } => {
        let transactions = self.sync.transactions();
        let customers = self.sync.customers();
        let listed = ledger(&transactions, &TransactionFilter { search, kind });
        Ok(render::ledger(&listed, &customers, &cash_totals(&transactions)))
      }
      Command::TxNew(args) => self.new_transaction(args).await,
      Command::TxStatus { id, status } => {
        let tx = self.sync.update_transaction_status(&id, status).await?;
        let customers = self.sync.customers();
        Ok(render::ledger(&[&tx], &customers, &cash_totals(&self.sync.transactions())))
      }
      Command::Lawyers => {
        let stats = roster_stats(&self.roster, &self.sync.calls(), &self.sync.processes());
        Ok(render::lawyer_table(&stats))
      }
    }
  }

  async fn new_call(&self, args: CallNewArgs) -> Result<String> {
    if self.roster.find(&args.lawyer).is_none() {
      warn!(lawyer = %args.lawyer, "lawyer is not on the roster");
    }
    let triage = ai::triage_call(self.analyst.as_ref(), &args.info).await;
    let call = self
      .sync
      .create_call(CallDraft {
        caller_name: args.caller,
        information: args.info,
        lawyer_name: args.lawyer,
        process_number: args.process_number,
        process_phase: args.phase,
        priority: triage.priority,
        category: triage.category,
      })
      .await?;
    Ok(render::call_line(&call))
  }

  async fn new_customer(&self, args: CustomerNewArgs) -> Result<String> {
    let status = if args.lead {
      CustomerStatus::Lead
    } else {
      CustomerStatus::Active
    };
    let customer = self
      .sync
      .create_customer(CustomerDraft {
        name: args.name,
        document: args.document,
        phone: args.phone,
        email: args.email,
        address: args.address,
        status,
        interview_notes: args.notes,
      })
      .await?;
    let load = case_load(&self.sync.processes(), &customer.id);
    Ok(render::customer_list(&[(&customer, load)]))
  }

  async fn new_process(&self, args: ProcessNewArgs) -> Result<String> {
    let customers = self.sync.customers();
    if find_customer(&customers, &args.customer).is_none() {
      warn!(customer = %args.customer, "process customer is not cached");
    }
    let process = self
      .sync
      .create_process(ProcessDraft {
        process_number: args.number,
        title: args.title,
        customer_id: args.customer,
        lawyer_name: args.lawyer,
        phase: args.phase,
        description: args.description,
        initial_petition: args.petition,
        honorary_value: args.fee,
        start_date: args.start_date.unwrap_or_else(today),
      })
      .await?;
    let created = [&process];
    let groups = group_by_specialty(&created, &self.roster);
    Ok(render::process_groups(&groups, &customers))
  }

  async fn new_transaction(&self, args: TxNewArgs) -> Result<String> {
    let tx = self
      .sync
      .create_transaction(TransactionDraft {
        customer_id: args.customer.filter(|c| !c.trim().is_empty()),
        description: args.description,
        amount: args.amount,
        kind: args.kind,
        category: args.category,
        status: args.status,
        due_date: args.due.unwrap_or_else(today),
      })
      .await?;
    let customers = self.sync.customers();
    Ok(render::ledger(&[&tx], &customers, &cash_totals(&self.sync.transactions())))
  }
}

fn today() -> String {
  Utc::now().date_naive().to_string()
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::ai::{CallAnalysis, InterviewSummary, ProcessAnalysis, StrategicOption};
  use crate::error::AnalysisError;
  use crate::model::{
    Lawyer, LegalProcess, Priority, ProcessPhase, TransactionStatus, TransactionType,
  };
  use async_trait::async_trait;

  /// Analyst answering from fixed values; no key means every call fails.
  struct CannedAnalyst {
    available: bool,
  }

  #[async_trait]
  impl Analyst for CannedAnalyst {
    async fn analyze_call(&self, _: &str) -> Result<CallAnalysis, AnalysisError> {
      if !self.available {
        return Err(AnalysisError::MissingKey);
      }
      Ok(CallAnalysis {
        priority: Priority::High,
        category: "Aposentadoria".to_string(),
      })
    }

    async fn summarize_interview(&self, notes: &str) -> Result<InterviewSummary, AnalysisError> {
      if !self.available {
        return Err(AnalysisError::MissingKey);
      }
      Ok(InterviewSummary {
        summary: format!("Resumo: {notes}"),
        rights_found: vec!["Horas extras".to_string()],
        urgency_score: 8,
        conversion_pitch: "Prazo curto".to_string(),
      })
    }

    async fn analyze_process(
      &self,
      process: &LegalProcess,
    ) -> Result<ProcessAnalysis, AnalysisError> {
      if !self.available {
        return Err(AnalysisError::MissingKey);
      }
      Ok(ProcessAnalysis {
        situation_summary: format!("{} em andamento", process.title),
        risks: vec![],
        suggestions: vec!["Aguardar laudo".to_string()],
        strategic_options: vec![StrategicOption {
          label: "Acordo".to_string(),
          description: "Propor acordo".to_string(),
        }],
      })
    }
  }

  fn app(available: bool) -> App {
    let roster = Roster::new(
      vec![Lawyer {
        name: "Dr. André".to_string(),
        specialty: "Previdenciário".to_string(),
        oab: "OAB/SP 1".to_string(),
        email: String::new(),
        role: None,
        bio: None,
      }],
      "Estratégico",
    );
    let store = Arc::new(SqliteStore::open_in_memory().unwrap());
    App::with_parts(roster, store, Arc::new(CannedAnalyst { available }), 0)
  }

  fn call_new(caller: &str) -> Command {
    Command::CallNew(CallNewArgs {
      caller: caller.to_string(),
      info: "Pedido de aposentadoria".to_string(),
      lawyer: "Dr. André".to_string(),
      process_number: None,
      phase: None,
    })
  }

  #[tokio::test]
  async fn test_new_calls_use_triage_and_count_repeats() {
    let app = app(true);
    let first = app.run(call_new("Maria")).await.unwrap();
    assert!(first.contains("Aposentadoria"));
    assert!(first.contains("1ª ligação"));

    let second = app.run(call_new("maria ")).await.unwrap();
    assert!(second.contains("2ª ligação"));

    let calls = app.sync.calls();
    assert_eq!(calls.len(), 2);
    assert!(calls.iter().all(|c| c.priority == Priority::High));
  }

  #[tokio::test]
  async fn test_new_call_without_analyst_uses_default_triage() {
    let app = app(false);
    app.run(call_new("Maria")).await.unwrap();
    let call = &app.sync.calls()[0];
    assert_eq!(call.priority, Priority::Medium);
    assert_eq!(call.category, ai::UNCATEGORIZED);
  }

  #[tokio::test]
  async fn test_call_phase_round_trip() {
    let app = app(true);
    app.run(call_new("Maria")).await.unwrap();
    let id = app.sync.calls()[0].id.clone();

    app
      .run(Command::CallPhase {
        id: id.clone(),
        phase: Some(ProcessPhase::Hearing),
      })
      .await
      .unwrap();
    assert_eq!(app.sync.calls()[0].process_phase, Some(ProcessPhase::Hearing));

    let err = app
      .run(Command::CallPhase {
        id: "missing".to_string(),
        phase: None,
      })
      .await;
    assert!(err.is_err());
  }

  #[tokio::test]
  async fn test_paid_transaction_counts_as_revenue() {
    let app = app(true);
    app
      .run(Command::TxNew(TxNewArgs {
        description: "Honorários".to_string(),
        amount: 1500.0,
        kind: TransactionType::Income,
        category: crate::model::TransactionCategory::InitialFees,
        status: TransactionStatus::Paid,
        due: Some("2024-05-01".to_string()),
        customer: None,
      }))
      .await
      .unwrap();

    let tx = &app.sync.transactions()[0];
    assert!(tx.payment_date.is_some());

    let out = app
      .run(Command::Finance {
        search: String::new(),
        kind: None,
      })
      .await
      .unwrap();
    assert!(out.contains("Receita realizada: R$ 1.500,00"));
    assert!(out.contains("Geral / Administrativo"));
  }

  #[tokio::test]
  async fn test_customer_summary_requires_notes() {
    let app = app(true);
    app
      .run(Command::CustomerNew(CustomerNewArgs {
        name: "Joana".to_string(),
        document: "123".to_string(),
        phone: String::new(),
        email: String::new(),
        address: String::new(),
        lead: true,
        notes: None,
      }))
      .await
      .unwrap();
    let id = app.sync.customers()[0].id.clone();
    assert!(app.run(Command::CustomerSummary { id }).await.is_err());
  }

  #[tokio::test]
  async fn test_customer_summary_and_lead_listing() {
    let app = app(true);
    app
      .run(Command::CustomerNew(CustomerNewArgs {
        name: "Joana".to_string(),
        document: "123".to_string(),
        phone: String::new(),
        email: String::new(),
        address: String::new(),
        lead: true,
        notes: Some("Trabalhava sem registro".to_string()),
      }))
      .await
      .unwrap();
    let id = app.sync.customers()[0].id.clone();

    let out = app.run(Command::CustomerSummary { id }).await.unwrap();
    assert!(out.contains("Resumo: Trabalhava sem registro"));
    assert!(out.contains("Urgência: 8/10"));

    let leads = app
      .run(Command::Customers {
        search: String::new(),
        leads: true,
      })
      .await
      .unwrap();
    assert!(leads.contains("Joana"));
  }

  #[tokio::test]
  async fn test_process_listing_groups_and_analysis() {
    let app = app(true);
    app
      .run(Command::ProcessNew(ProcessNewArgs {
        number: "5001".to_string(),
        title: "Aposentadoria Especial".to_string(),
        customer: "nobody".to_string(),
        lawyer: "Dr. Desconhecido".to_string(),
        phase: ProcessPhase::InitialPetition,
        description: String::new(),
        petition: None,
        fee: Some(22500.0),
        start_date: None,
      }))
      .await
      .unwrap();

    let out = app
      .run(Command::Processes {
        search: "cliente geral".to_string(),
        status: crate::views::processes::ProcessStatus::Active,
      })
      .await
      .unwrap();
    assert!(out.contains("== Estratégico (1) =="));
    assert!(out.contains("R$ 22.500,00"));

    let id = app.sync.processes()[0].id.clone();
    let analysis = app.run(Command::ProcessAnalysis { id }).await.unwrap();
    assert!(analysis.contains("1. Acordo: Propor acordo"));
  }

  #[tokio::test]
  async fn test_process_analysis_failure_is_surfaced() {
    let app = app(false);
    app
      .run(Command::ProcessNew(ProcessNewArgs {
        number: "5002".to_string(),
        title: "BPC".to_string(),
        customer: "c".to_string(),
        lawyer: "Dr. André".to_string(),
        phase: ProcessPhase::Citation,
        description: String::new(),
        petition: None,
        fee: None,
        start_date: Some("2024-01-01".to_string()),
      }))
      .await
      .unwrap();
    let id = app.sync.processes()[0].id.clone();
    assert!(app.run(Command::ProcessAnalysis { id }).await.is_err());
  }

  #[tokio::test]
  async fn test_dashboard_and_lawyers_render() {
    let app = app(true);
    app.run(call_new("Maria")).await.unwrap();
    let dash = app.run(Command::Dashboard).await.unwrap();
    assert!(dash.contains("Atendimentos:        1"));
    assert!(dash.contains("Taxa de novos:       100%"));

    let lawyers = app.run(Command::Lawyers).await.unwrap();
    assert!(lawyers.contains("Dr. André"));
    assert!(lawyers.contains("ligações:   1"));
  }
}
