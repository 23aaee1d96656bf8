//! Ordered, id-keyed in-memory collection of one entity type.

use std::collections::HashSet;
use tracing::warn;

use super::traits::Cacheable;

/// In-memory source of truth for one entity type.
///
/// Order is presentation order: whatever the initial load delivered, with
/// newly created entities in front. Ids are unique within a cache.
#[derive(Debug, Clone)]
pub struct EntityCache<T: Cacheable> {
  entries: Vec<T>,
}

impl<T: Cacheable> Default for EntityCache<T> {
  fn default() -> Self {
    Self {
      entries: Vec::new(),
    }
  }
}

impl<T: Cacheable> EntityCache<T> {
  /// Replace the whole contents, keeping the given order.
  ///
  /// A repeated id keeps its first occurrence.
  pub fn replace_all(&mut self, entities: Vec<T>) {
    let mut entries: Vec<T> = Vec::with_capacity(entities.len());
    let mut seen: HashSet<String> = HashSet::with_capacity(entities.len());
    for entity in entities {
      if !seen.insert(entity.cache_key().to_string()) {
        warn!(
          collection = %T::collection(),
          id = entity.cache_key(),
          "dropping duplicate id from load"
        );
        continue;
      }
      entries.push(entity);
    }
    self.entries = entries;
  }

  /// Insert at the front. An existing entry with the same id is removed first.
  pub fn prepend(&mut self, entity: T) {
    if let Some(pos) = self.position(entity.cache_key()) {
      warn!(
        collection = %T::collection(),
        id = entity.cache_key(),
        "prepend replaced an entry with the same id"
      );
      self.entries.remove(pos);
    }
    self.entries.insert(0, entity);
  }

  /// Swap the entry with `id` in place. Returns false when `id` is absent.
  pub fn replace(&mut self, id: &str, entity: T) -> bool {
    match self.position(id) {
      Some(pos) => {
        self.entries[pos] = entity;
        true
      }
      None => false,
    }
  }

  pub fn get(&self, id: &str) -> Option<&T> {
    self.entries.iter().find(|e| e.cache_key() == id)
  }

  pub fn iter(&self) -> impl Iterator<Item = &T> {
    self.entries.iter()
  }

  #[cfg(test)]
  pub fn len(&self) -> usize {
    self.entries.len()
  }

  /// Copy of the current contents for readers outside the coordinator.
  pub fn snapshot(&self) -> Vec<T> {
    self.entries.clone()
  }

  fn position(&self, id: &str) -> Option<usize> {
    self.entries.iter().position(|e| e.cache_key() == id)
  }
}
