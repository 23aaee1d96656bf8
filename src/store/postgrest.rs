use async_trait::async_trait;
use color_eyre::{eyre::eyre, Result};
use reqwest::header::{HeaderMap, HeaderValue, AUTHORIZATION};
use reqwest::Request;
use serde_json::Value;
use tracing::debug;
use url::Url;

use super::{Collection, RawRecord, RemoteStore};
use crate::config::Config;
use crate::error::StoreError;

/// Client for a hosted PostgREST endpoint (Supabase).
#[derive(Clone)]
pub struct PostgrestStore {
  http: reqwest::Client,
  base: Url,
}

impl PostgrestStore {
  pub fn new(config: &Config) -> Result<Self> {
    let key = Config::get_store_key()?;
    let url = config.store_url()?;
    Self::with_key(&url, &key)
  }

  pub fn with_key(url: &str, key: &str) -> Result<Self> {
    let base = rest_base(url).map_err(|e| eyre!("Invalid store url {}: {}", url, e))?;

    let mut headers = HeaderMap::new();
    let apikey =
      HeaderValue::from_str(key).map_err(|e| eyre!("Store key is not a valid header: {}", e))?;
    let bearer = HeaderValue::from_str(&format!("Bearer {}", key))
      .map_err(|e| eyre!("Store key is not a valid header: {}", e))?;
    headers.insert("apikey", apikey);
    headers.insert(AUTHORIZATION, bearer);

    let http = reqwest::Client::builder()
      .default_headers(headers)
      .build()
      .map_err(|e| eyre!("Failed to create HTTP client: {}", e))?;

    Ok(Self { http, base })
  }

  fn table_url(&self, collection: Collection) -> Result<Url, StoreError> {
    Ok(self.base.join(collection.table())?)
  }

  /// `GET {table}?select=*[&order={column}.{asc|desc}]`
  fn fetch_request(&self, collection: Collection) -> Result<Request, StoreError> {
    let mut url = self.table_url(collection)?;
    {
      let mut query = url.query_pairs_mut();
      query.append_pair("select", "*");
      if let Some(order) = collection.sort_order() {
        let direction = if order.descending { "desc" } else { "asc" };
        query.append_pair("order", &format!("{}.{}", order.column, direction));
      }
    }
    Ok(self.http.get(url).build()?)
  }

  /// `POST {table}` with a one-element array body, asking for the stored row back.
  fn insert_request(
    &self,
    collection: Collection,
    record: RawRecord,
  ) -> Result<Request, StoreError> {
    let url = self.table_url(collection)?;
    let body = Value::Array(vec![Value::Object(record)]);
    Ok(
      self
        .http
        .post(url)
        .header("Prefer", "return=representation")
        .json(&body)
        .build()?,
    )
  }

  /// `PATCH {table}?id=eq.{id}` with only the changed fields.
  fn update_request(
    &self,
    collection: Collection,
    id: &str,
    fields: RawRecord,
  ) -> Result<Request, StoreError> {
    let mut url = self.table_url(collection)?;
    url.query_pairs_mut().append_pair("id", &format!("eq.{}", id));
    Ok(self.http.patch(url).json(&Value::Object(fields)).build()?)
  }
}

/// `{url}/rest/v1/`, tolerant of a missing trailing slash on `url`.
fn rest_base(url: &str) -> Result<Url, url::ParseError> {
  let root = if url.ends_with('/') {
    url.to_string()
  } else {
    format!("{}/", url)
  };
  Url::parse(&root)?.join("rest/v1/")
}

/// The first row of an insert's representation.
fn first_row(collection: Collection, mut rows: Vec<RawRecord>) -> Result<RawRecord, StoreError> {
  if rows.is_empty() {
    return Err(StoreError::NoRepresentation(collection));
  }
  Ok(rows.swap_remove(0))
}

async fn check(response: reqwest::Response) -> Result<reqwest::Response, StoreError> {
  let status = response.status();
  if status.is_success() {
    return Ok(response);
  }
  let body = response.text().await.unwrap_or_default();
  Err(StoreError::Status {
    status: status.as_u16(),
    body,
  })
}

#[async_trait]
impl RemoteStore for PostgrestStore {
  async fn fetch_all(&self, collection: Collection) -> Result<Vec<RawRecord>, StoreError> {
    let request = self.fetch_request(collection)?;
    debug!(%collection, "fetching all records");
    let response = check(self.http.execute(request).await?).await?;
    let records: Vec<RawRecord> = response.json().await?;
    Ok(records)
  }

  async fn insert(
    &self,
    collection: Collection,
    record: RawRecord,
  ) -> Result<RawRecord, StoreError> {
    let request = self.insert_request(collection, record)?;
    debug!(%collection, "inserting record");
    let response = check(self.http.execute(request).await?).await?;
    first_row(collection, response.json().await?)
  }

  async fn update(
    &self,
    collection: Collection,
    id: &str,
    fields: RawRecord,
  ) -> Result<(), StoreError> {
    let request = self.update_request(collection, id, fields)?;
    debug!(%collection, id, "updating record");
    check(self.http.execute(request).await?).await?;
    Ok(())
  }
}
