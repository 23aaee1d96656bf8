//! Local SQLite implementation of the store contract.
//!
//! Useful offline and for trying the tool without a hosted database. Records
//! are kept as JSON objects and ordered the same way the hosted store orders
//! them.

use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use rusqlite::{params, Connection, OptionalExtension};
use serde_json::Value;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tracing::debug;

use super::{sort_records, Collection, RawRecord, RemoteStore};
use crate::error::StoreError;
use crate::model::now_timestamp;

/// SQLite-backed store.
pub struct SqliteStore {
  conn: Mutex<Connection>,
}

impl SqliteStore {
  /// Open (or create) the database at `path`, or at the default location.
  pub fn open(path: Option<&Path>) -> Result<Self> {
    let path = match path {
      Some(p) => p.to_path_buf(),
      None => Self::default_path()?,
    };

    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
      if !parent.as_os_str().is_empty() {
        std::fs::create_dir_all(parent)
          .map_err(|e| eyre!("Failed to create database directory: {}", e))?;
      }
    }

    let conn = Connection::open(&path)
      .map_err(|e| eyre!("Failed to open database at {}: {}", path.display(), e))?;

    Self::from_connection(conn)
  }

  /// Throwaway database, gone when dropped.
  #[cfg(test)]
  pub fn open_in_memory() -> Result<Self> {
    let conn = Connection::open_in_memory()
      .map_err(|e| eyre!("Failed to open in-memory database: {}", e))?;
    Self::from_connection(conn)
  }

  fn from_connection(conn: Connection) -> Result<Self> {
    conn
      .execute_batch(SCHEMA)
      .map_err(|e| eyre!("Failed to run migrations: {}", e))?;
    Ok(Self {
      conn: Mutex::new(conn),
    })
  }

  /// Get the default database path.
  fn default_path() -> Result<PathBuf> {
    let data_dir = dirs::data_dir()
      .or_else(|| dirs::home_dir().map(|p| p.join(".local/share")))
      .ok_or_else(|| eyre!("Could not determine data directory"))?;

    Ok(data_dir.join("juriscall").join("juriscall.db"))
  }

  fn conn(&self) -> MutexGuard<'_, Connection> {
    self.conn.lock().unwrap_or_else(PoisonError::into_inner)
  }
}

const SCHEMA: &str = r#"
CREATE TABLE IF NOT EXISTS records (
    seq INTEGER PRIMARY KEY AUTOINCREMENT,
    collection TEXT NOT NULL,
    id TEXT NOT NULL,
    data TEXT NOT NULL,
    UNIQUE (collection, id)
);

CREATE INDEX IF NOT EXISTS idx_records_collection ON records(collection, seq);
"#;

#[async_trait]
impl RemoteStore for SqliteStore {
  async fn fetch_all(&self, collection: Collection) -> Result<Vec<RawRecord>, StoreError> {
    let conn = self.conn();
    let mut stmt = conn.prepare("SELECT data FROM records WHERE collection = ? ORDER BY seq")?;
    let rows = stmt.query_map(params![collection.table()], |row| row.get::<_, String>(0))?;

    let mut records = Vec::new();
    for data in rows {
      records.push(serde_json::from_str::<RawRecord>(&data?)?);
    }

    if let Some(order) = collection.sort_order() {
      sort_records(&mut records, order);
    }
    debug!(%collection, count = records.len(), "fetched local records");
    Ok(records)
  }

  async fn insert(
    &self,
    collection: Collection,
    mut record: RawRecord,
  ) -> Result<RawRecord, StoreError> {
    let id = uuid::Uuid::new_v4().to_string();
    record.insert("id".to_string(), Value::String(id.clone()));

    let missing_created_at = matches!(record.get("created_at"), None | Some(Value::Null));
    if collection.defaults_created_at() && missing_created_at {
      record.insert("created_at".to_string(), Value::String(now_timestamp()));
    }

    let data = serde_json::to_string(&record)?;
    self.conn().execute(
      "INSERT INTO records (collection, id, data) VALUES (?, ?, ?)",
      params![collection.table(), id, data],
    )?;

    debug!(%collection, id, "inserted local record");
    Ok(record)
  }

  async fn update(
    &self,
    collection: Collection,
    id: &str,
    fields: RawRecord,
  ) -> Result<(), StoreError> {
    let conn = self.conn();
    let data: Option<String> = conn
      .query_row(
        "SELECT data FROM records WHERE collection = ? AND id = ?",
        params![collection.table(), id],
        |row| row.get(0),
      )
      .optional()?;

    let Some(data) = data else {
      return Err(StoreError::Missing {
        collection,
        id: id.to_string(),
      });
    };

    let mut record: RawRecord = serde_json::from_str(&data)?;
    record.extend(fields);

    conn.execute(
      "UPDATE records SET data = ? WHERE collection = ? AND id = ?",
      params![serde_json::to_string(&record)?, collection.table(), id],
    )?;
    debug!(%collection, id, "updated local record");
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use serde_json::json;

  fn record(value: Value) -> RawRecord {
    value.as_object().cloned().unwrap()
  }

  #[tokio::test]
  async fn test_insert_assigns_id_and_fetch_orders_newest_first() {
    let store = SqliteStore::open_in_memory().unwrap();

    let first = store
      .insert(
        Collection::CallRecords,
        record(json!({"caller_name": "Ana", "date_time": "2024-05-01T09:00:00+00:00"})),
      )
      .await
      .unwrap();
    let second = store
      .insert(
        Collection::CallRecords,
        record(json!({"caller_name": "Bia", "date_time": "2024-05-03T09:00:00+00:00"})),
      )
      .await
      .unwrap();

    assert!(first["id"].as_str().is_some_and(|id| !id.is_empty()));
    assert_ne!(first["id"], second["id"]);

    let fetched = store.fetch_all(Collection::CallRecords).await.unwrap();
    let names: Vec<_> = fetched.iter().map(|r| r["caller_name"].clone()).collect();
    assert_eq!(names, vec![json!("Bia"), json!("Ana")]);
  }

  #[tokio::test]
  async fn test_insert_fills_created_at_for_customers_only() {
    let store = SqliteStore::open_in_memory().unwrap();
    let customer = store
      .insert(Collection::Customers, record(json!({"name": "Ana"})))
      .await
      .unwrap();
    assert!(customer["created_at"].is_string());

    let tx = store
      .insert(
        Collection::FinancialTransactions,
        record(json!({"description": "Custas"})),
      )
      .await
      .unwrap();
    assert!(!tx.contains_key("created_at"));
  }

  #[tokio::test]
  async fn test_update_merges_fields() {
    let store = SqliteStore::open_in_memory().unwrap();
    let stored = store
      .insert(
        Collection::FinancialTransactions,
        record(json!({"description": "Honorários", "status": "Pendente", "payment_date": null})),
      )
      .await
      .unwrap();
    let id = stored["id"].as_str().unwrap().to_string();

    store
      .update(
        Collection::FinancialTransactions,
        &id,
        record(json!({"status": "Pago", "payment_date": "2024-05-02T10:00:00+00:00"})),
      )
      .await
      .unwrap();

    let fetched = store
      .fetch_all(Collection::FinancialTransactions)
      .await
      .unwrap();
    assert_eq!(fetched[0]["status"], "Pago");
    assert_eq!(fetched[0]["description"], "Honorários");
  }

  #[tokio::test]
  async fn test_update_of_unknown_id_fails() {
    let store = SqliteStore::open_in_memory().unwrap();
    let err = store
      .update(Collection::CallRecords, "nope", RawRecord::new())
      .await
      .unwrap_err();
    assert!(matches!(err, StoreError::Missing { .. }));
  }

  #[tokio::test]
  async fn test_collections_are_isolated() {
    let store = SqliteStore::open_in_memory().unwrap();
    store
      .insert(Collection::Customers, record(json!({"name": "Ana"})))
      .await
      .unwrap();
    assert!(store
      .fetch_all(Collection::LegalProcesses)
      .await
      .unwrap()
      .is_empty());
  }
}
