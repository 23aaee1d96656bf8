//! Failure taxonomy shared by the store, the sync coordinator and the analyst.

use thiserror::Error;

use crate::store::Collection;

/// Failure reported by a [`RemoteStore`](crate::store::RemoteStore) backend.
///
/// The coordinator never branches on the variant; they exist for logs and
/// error messages.
#[derive(Debug, Error)]
pub enum StoreError {
  #[error("request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("store answered {status}: {body}")]
  Status { status: u16, body: String },

  #[error("local database error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("malformed record: {0}")]
  Decode(#[from] serde_json::Error),

  #[error("no {collection} record with id {id}")]
  Missing { collection: Collection, id: String },

  #[error("insert into {0} returned no record")]
  NoRepresentation(Collection),

  #[error("invalid store url: {0}")]
  Url(#[from] url::ParseError),
}

/// Outcome of a coordinator operation that did not complete.
#[derive(Debug, Error)]
pub enum SyncError {
  /// One of the initial fetches failed; no cache was touched.
  #[error("initial load failed: {0}")]
  Load(#[source] StoreError),

  /// A create or update was rejected; the cache is unchanged.
  #[error("write to {collection} failed: {source}")]
  Write {
    collection: Collection,
    #[source]
    source: StoreError,
  },

  /// An update targeted a record the cache does not hold.
  #[error("no cached {collection} record with id {id}")]
  NotCached { collection: Collection, id: String },
}

impl SyncError {
  pub fn write(collection: Collection, source: impl Into<StoreError>) -> Self {
    SyncError::Write {
      collection,
      source: source.into(),
    }
  }
}

/// Failure of a call to the generative text service.
#[derive(Debug, Error)]
pub enum AnalysisError {
  #[error("no API key configured for the analysis service")]
  MissingKey,

  #[error("analysis request failed: {0}")]
  Transport(#[from] reqwest::Error),

  #[error("analysis service answered {status}: {body}")]
  Status { status: u16, body: String },

  #[error("analysis service returned no content")]
  Empty,

  #[error("analysis result could not be decoded: {0}")]
  Decode(#[from] serde_json::Error),
}
