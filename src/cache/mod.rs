//! Per-entity-type in-memory caches.
//!
//! Each entity type gets one `EntityCache`, populated and mutated only by the
//! sync coordinator. Everything else reads snapshots.

mod entity_cache;
mod traits;

pub use entity_cache::EntityCache;
pub use traits::Cacheable;
