//! Backend persistence client.
//!
//! The storefront's tables live in a hosted backend that exposes a
//! `PostgREST`-style HTTP interface. The only operation needed here is a single
//! row insert.

use std::fmt::{Display, Formatter, Result as FmtResult};

use async_trait::async_trait;
use mockall::automock;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Identifier assigned by the backend to an inserted row.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(String);

impl RecordId {
    /// Wrap a raw identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the raw identifier.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for RecordId {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        f.write_str(&self.0)
    }
}

/// Errors that can occur when talking to the backend.
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// An HTTP transport or serialization error occurred.
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend returned a non-2xx response or an unexpected body.
    #[error("unexpected response from backend: {0}")]
    UnexpectedResponse(String),

    /// The backend accepted the insert but did not echo a row id.
    #[error("backend did not return an id for the inserted row")]
    MissingId,
}

/// Generic row insert against a named collection.
#[automock]
#[async_trait]
pub trait PersistenceClient: Send + Sync {
    /// Insert `record` into `collection`, returning the new row's id.
    async fn insert(&self, collection: &str, record: Value) -> Result<RecordId, PersistenceError>;
}

/// Connection settings for [`RestClient`].
#[derive(Debug, Clone)]
pub struct RestConfig {
    /// Backend base URL, e.g. `"http://localhost:54321"`.
    pub base_url: String,

    /// Anonymous API key, sent as `apikey` and as a bearer token.
    pub api_key: Option<String>,
}

/// HTTP client for the backend's REST interface.
#[derive(Debug, Clone)]
pub struct RestClient {
    config: RestConfig,
    http: Client,
}

impl RestClient {
    /// Create a new client from the given configuration.
    #[must_use]
    pub fn new(config: RestConfig) -> Self {
        Self {
            config,
            http: Client::new(),
        }
    }

    fn collection_url(&self, collection: &str) -> String {
        format!(
            "{}/rest/v1/{collection}",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl PersistenceClient for RestClient {
    async fn insert(&self, collection: &str, record: Value) -> Result<RecordId, PersistenceError> {
        let mut request = self
            .http
            .post(self.collection_url(collection))
            .header("Prefer", "return=representation")
            .json(&record);

        if let Some(key) = &self.config.api_key {
            request = request.header("apikey", key).bearer_auth(key);
        }

        let response = request.send().await?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();

            return Err(PersistenceError::UnexpectedResponse(format!(
                "insert into {collection} failed with status {status}: {text}"
            )));
        }

        let rows: Vec<InsertedRow> = response.json().await?;

        rows.into_iter()
            .next()
            .map(|row| row.id.into())
            .ok_or(PersistenceError::MissingId)
    }
}

#[derive(Debug, Deserialize)]
struct InsertedRow {
    id: RawId,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum RawId {
    Text(String),
    Number(i64),
}

impl From<RawId> for RecordId {
    fn from(value: RawId) -> Self {
        match value {
            RawId::Text(id) => Self(id),
            RawId::Number(id) => Self(id.to_string()),
        }
    }
}
