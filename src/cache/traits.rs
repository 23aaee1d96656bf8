//! Core trait for entities held in an entity cache.

use serde::{de::DeserializeOwned, Serialize};

use crate::store::Collection;

/// Trait for entities that can be cached and synced with the store.
///
/// Implementors name their storage collection and the wire record they map
/// to; the mapping itself must be total and lossless in both directions.
pub trait Cacheable: Clone + Send + Sync + 'static {
  /// Serde shape of the stored record (snake_case field names).
  type Record: Serialize + DeserializeOwned;

  /// Unique, immutable identifier of this entity.
  fn cache_key(&self) -> &str;

  /// Storage collection for this entity type.
  fn collection() -> Collection;

  fn to_record(&self) -> Self::Record;

  fn from_record(record: Self::Record) -> Self;
}
