//! Sync coordinator: owns the entity caches and every remote read and write.

use chrono::Utc;
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::{error, info, warn};

use super::drafts::{CallDraft, CustomerDraft, ProcessDraft, TransactionDraft};
use super::state::LoadState;
use crate::cache::{Cacheable, EntityCache};
use crate::error::SyncError;
use crate::model::records::{self, CallPhasePatch, TransactionStatusPatch};
use crate::model::{
  now_timestamp, CallRecord, Customer, FinancialTransaction, LegalProcess, ProcessPhase,
  TransactionStatus,
};
use crate::store::{Collection, RawRecord, RemoteStore};

fn read<T>(lock: &RwLock<T>) -> RwLockReadGuard<'_, T> {
  lock.read().unwrap_or_else(PoisonError::into_inner)
}

fn write<T>(lock: &RwLock<T>) -> RwLockWriteGuard<'_, T> {
  lock.write().unwrap_or_else(PoisonError::into_inner)
}

/// Prior calls from one caller, as seen when a new call is submitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CallerHistory {
  pub prior_calls: usize,
}

impl CallerHistory {
  pub fn is_first_time(&self) -> bool {
    self.prior_calls == 0
  }

  pub fn next_call_count(&self) -> u32 {
    u32::try_from(self.prior_calls)
      .unwrap_or(u32::MAX)
      .saturating_add(1)
  }
}

struct Loaded {
  calls: Vec<CallRecord>,
  customers: Vec<Customer>,
  processes: Vec<LegalProcess>,
  transactions: Vec<FinancialTransaction>,
}

/// Reconciles the in-memory caches with the remote store.
///
/// Caches change only after the store acknowledges a write, and only inside
/// the synchronous tail of the operation, so cache updates land in
/// acknowledgment order. Locks are never held across an await.
pub struct SyncCoordinator {
  store: Arc<dyn RemoteStore>,
  state: RwLock<LoadState>,
  calls: RwLock<EntityCache<CallRecord>>,
  customers: RwLock<EntityCache<Customer>>,
  processes: RwLock<EntityCache<LegalProcess>>,
  transactions: RwLock<EntityCache<FinancialTransaction>>,
}

impl SyncCoordinator {
  pub fn new(store: Arc<dyn RemoteStore>) -> Self {
    Self {
      store,
      state: RwLock::new(LoadState::Idle),
      calls: RwLock::default(),
      customers: RwLock::default(),
      processes: RwLock::default(),
      transactions: RwLock::default(),
    }
  }

  // ==========================================================================
  // Initial load
  // ==========================================================================

  /// Fetch every collection concurrently and populate the caches.
  ///
  /// All-or-nothing: if any fetch or mapping fails, no cache is touched and
  /// the state becomes `Failed`.
  pub async fn load_all(&self) -> Result<(), SyncError> {
    *write(&self.state) = LoadState::Loading;
    info!("loading all collections");

    match self.fetch_everything().await {
      Ok(loaded) => {
        info!(
          calls = loaded.calls.len(),
          customers = loaded.customers.len(),
          processes = loaded.processes.len(),
          transactions = loaded.transactions.len(),
          "load complete"
        );
        write(&self.calls).replace_all(loaded.calls);
        write(&self.customers).replace_all(loaded.customers);
        write(&self.processes).replace_all(loaded.processes);
        write(&self.transactions).replace_all(loaded.transactions);
        *write(&self.state) = LoadState::Ready {
          loaded_at: Utc::now(),
        };
        Ok(())
      }
      Err(e) => {
        error!(error = %e, "load failed");
        *write(&self.state) = LoadState::Failed(e.to_string());
        Err(e)
      }
    }
  }

  /// Re-issue the whole load batch after a failure.
  pub async fn retry_load(&self) -> Result<(), SyncError> {
    warn!("retrying full load");
    self.load_all().await
  }

  async fn fetch_everything(&self) -> Result<Loaded, SyncError> {
    let store = &self.store;
    let (calls, customers, processes, transactions) = futures::try_join!(
      store.fetch_all(Collection::CallRecords),
      store.fetch_all(Collection::Customers),
      store.fetch_all(Collection::LegalProcesses),
      store.fetch_all(Collection::FinancialTransactions),
    )
    .map_err(SyncError::Load)?;

    let map_err = |e: serde_json::Error| SyncError::Load(e.into());
    Ok(Loaded {
      calls: records::to_domain_all(calls).map_err(map_err)?,
      customers: records::to_domain_all(customers).map_err(map_err)?,
      processes: records::to_domain_all(processes).map_err(map_err)?,
      transactions: records::to_domain_all(transactions).map_err(map_err)?,
    })
  }

  // ==========================================================================
  // Creation
  // ==========================================================================

  /// Repeat-call history for `caller_name` in the current cache.
  pub fn caller_history(&self, caller_name: &str) -> CallerHistory {
    let prior_calls = read(&self.calls)
      .iter()
      .filter(|c| c.is_from(caller_name))
      .count();
    CallerHistory { prior_calls }
  }

  /// Create a call, numbering it against the calls cached right now.
  ///
  /// Two submissions for the same caller that are both in flight see the
  /// same history and get the same count.
  pub async fn create_call(&self, draft: CallDraft) -> Result<CallRecord, SyncError> {
    let history = self.caller_history(&draft.caller_name);
    let call = CallRecord {
      id: String::new(),
      caller_name: draft.caller_name,
      information: draft.information,
      date_time: now_timestamp(),
      lawyer_name: draft.lawyer_name,
      process_number: draft.process_number,
      process_phase: draft.process_phase,
      is_first_time: history.is_first_time(),
      call_count: history.next_call_count(),
      priority: draft.priority,
      category: draft.category,
    };
    self.create(&self.calls, call).await
  }

  pub async fn create_customer(&self, draft: CustomerDraft) -> Result<Customer, SyncError> {
    let customer = Customer {
      id: String::new(),
      name: draft.name,
      document: draft.document,
      phone: draft.phone,
      email: draft.email,
      address: draft.address,
      status: draft.status,
      interview_notes: draft.interview_notes,
      ai_interview_summary: None,
      created_at: now_timestamp(),
    };
    self.create(&self.customers, customer).await
  }

  pub async fn create_process(&self, draft: ProcessDraft) -> Result<LegalProcess, SyncError> {
    let process = LegalProcess {
      id: String::new(),
      process_number: draft.process_number,
      title: draft.title,
      customer_id: draft.customer_id,
      lawyer_name: draft.lawyer_name,
      phase: draft.phase,
      description: draft.description,
      initial_petition: draft.initial_petition,
      decisions: None,
      sentence: None,
      honorary_value: draft.honorary_value,
      start_date: draft.start_date,
      created_at: None,
    };
    self.create(&self.processes, process).await
  }

  /// Create a transaction; a paid one is stamped with the current time.
  pub async fn create_transaction(
    &self,
    draft: TransactionDraft,
  ) -> Result<FinancialTransaction, SyncError> {
    let payment_date = (draft.status == TransactionStatus::Paid).then(now_timestamp);
    let tx = FinancialTransaction {
      id: String::new(),
      customer_id: draft.customer_id,
      description: draft.description,
      amount: draft.amount,
      kind: draft.kind,
      category: draft.category,
      status: draft.status,
      due_date: draft.due_date,
      payment_date,
    };
    self.create(&self.transactions, tx).await
  }

  /// Insert remotely, then put the stored version (with its store-assigned
  /// id) at the front of the cache. A rejected insert leaves the cache alone.
  async fn create<T: Cacheable>(
    &self,
    cache: &RwLock<EntityCache<T>>,
    entity: T,
  ) -> Result<T, SyncError> {
    let collection = T::collection();
    let payload = records::to_insert(&entity).map_err(|e| SyncError::write(collection, e))?;

    let stored = match self.store.insert(collection, payload).await {
      Ok(stored) => stored,
      Err(e) => {
        warn!(%collection, error = %e, "insert rejected");
        return Err(SyncError::write(collection, e));
      }
    };
    let created: T = records::to_domain(stored).map_err(|e| SyncError::write(collection, e))?;

    write(cache).prepend(created.clone());
    info!(%collection, id = created.cache_key(), "record created");
    Ok(created)
  }

  // ==========================================================================
  // Updates
  // ==========================================================================

  /// Set or clear the process phase of a call.
  pub async fn update_call_phase(
    &self,
    id: &str,
    phase: Option<ProcessPhase>,
  ) -> Result<CallRecord, SyncError> {
    let patch = records::to_object(&CallPhasePatch {
      process_phase: phase.as_ref(),
    })
    .map_err(|e| SyncError::write(Collection::CallRecords, e))?;

    self
      .update(&self.calls, id, patch, move |call| call.process_phase = phase)
      .await
  }

  /// Change a transaction's status; `payment_date` is set exactly when paid.
  pub async fn update_transaction_status(
    &self,
    id: &str,
    status: TransactionStatus,
  ) -> Result<FinancialTransaction, SyncError> {
    let payment_date = (status == TransactionStatus::Paid).then(now_timestamp);
    let patch = records::to_object(&TransactionStatusPatch {
      status,
      payment_date: payment_date.as_deref(),
    })
    .map_err(|e| SyncError::write(Collection::FinancialTransactions, e))?;

    self
      .update(&self.transactions, id, patch, move |tx| {
        tx.status = status;
        tx.payment_date = payment_date;
      })
      .await
  }

  /// Send `patch`, then apply the same change to the cached copy as it stands
  /// at acknowledgment time. Last writer wins against the local copy only.
  async fn update<T, F>(
    &self,
    cache: &RwLock<EntityCache<T>>,
    id: &str,
    patch: RawRecord,
    apply: F,
  ) -> Result<T, SyncError>
  where
    T: Cacheable,
    F: FnOnce(&mut T) + Send,
  {
    let collection = T::collection();
    let not_cached = || SyncError::NotCached {
      collection,
      id: id.to_string(),
    };

    if read(cache).get(id).is_none() {
      return Err(not_cached());
    }

    if let Err(e) = self.store.update(collection, id, patch).await {
      warn!(%collection, id, error = %e, "update rejected");
      return Err(SyncError::write(collection, e));
    }

    let mut cache = write(cache);
    let mut merged = cache.get(id).cloned().ok_or_else(not_cached)?;
    apply(&mut merged);
    cache.replace(id, merged.clone());
    info!(%collection, id, "record updated");
    Ok(merged)
  }

  // ==========================================================================
  // Snapshots
  // ==========================================================================

  pub fn load_state(&self) -> LoadState {
    read(&self.state).clone()
  }

  pub fn calls(&self) -> Vec<CallRecord> {
    read(&self.calls).snapshot()
  }

  pub fn customers(&self) -> Vec<Customer> {
    read(&self.customers).snapshot()
  }

  pub fn processes(&self) -> Vec<LegalProcess> {
    read(&self.processes).snapshot()
  }

  pub fn transactions(&self) -> Vec<FinancialTransaction> {
    read(&self.transactions).snapshot()
  }

  pub fn customer(&self, id: &str) -> Option<Customer> {
    read(&self.customers).get(id).cloned()
  }

  pub fn process(&self, id: &str) -> Option<LegalProcess> {
    read(&self.processes).get(id).cloned()
  }
}
