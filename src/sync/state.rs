//! Load progress of the coordinator's caches.

use chrono::{DateTime, Utc};

/// Progress of the initial load.
#[derive(Debug, Clone, PartialEq)]
pub enum LoadState {
  /// Load has not been started
  Idle,
  /// Fetches are in flight
  Loading,
  /// Every collection loaded
  Ready { loaded_at: DateTime<Utc> },
  /// At least one fetch failed; caches hold their pre-load contents
  Failed(String),
}

impl LoadState {
  pub fn is_ready(&self) -> bool {
    matches!(self, LoadState::Ready { .. })
  }

  pub fn error(&self) -> Option<&str> {
    match self {
      LoadState::Failed(e) => Some(e),
      _ => None,
    }
  }
}
