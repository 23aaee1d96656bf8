//! Optimistic synchronization between the entity caches and the remote store.

mod coordinator;
mod drafts;
mod state;

pub use coordinator::SyncCoordinator;
pub use drafts::{CallDraft, CustomerDraft, ProcessDraft, TransactionDraft};
