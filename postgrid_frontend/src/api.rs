use std::time::Duration;

use reqwest::blocking::{Client, RequestBuilder};
use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use crate::normalize::normalize;

/// Origin of the hosted document store.
pub const DEFAULT_STORE_URL: &str =
    "https://realtime-database-882e1-default-rtdb.europe-west1.firebasedatabase.app";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("invalid base URL {url}: {reason}")]
    InvalidBaseUrl { url: String, reason: String },
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("store answered {status}: {reason}")]
    Status { status: u16, reason: String },
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Outcome of a request that reached the store. Non-2xx answers are a
/// `Failure`, not an error: callers branch on it.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerResult {
    Success { status: u16, data: Value },
    Failure { status: u16, reason: String },
}

impl ServerResult {
    pub fn is_ok(&self) -> bool {
        matches!(self, ServerResult::Success { .. })
    }

    pub fn status(&self) -> u16 {
        match self {
            ServerResult::Success { status, .. } | ServerResult::Failure { status, .. } => *status,
        }
    }

    /// Key the store assigned to a record created with `POST`.
    pub fn assigned_key(&self) -> Option<&str> {
        match self {
            ServerResult::Success { data, .. } => data.get("name").and_then(Value::as_str),
            ServerResult::Failure { .. } => None,
        }
    }

    pub fn failure_reason(&self) -> Option<&str> {
        match self {
            ServerResult::Success { .. } => None,
            ServerResult::Failure { reason, .. } => Some(reason),
        }
    }
}

#[derive(Clone)]
pub struct ApiClient {
    base_url: String,
    client: Client,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self, ClientError> {
        let base = sanitize_base_url(base_url.into())?;
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base,
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn set_base_url(&mut self, base_url: impl Into<String>) -> Result<(), ClientError> {
        self.base_url = sanitize_base_url(base_url.into())?;
        Ok(())
    }

    /// Reads a whole collection and normalizes it into records with ids.
    pub fn fetch_all<T: DeserializeOwned>(&self, resource: &str) -> Result<Vec<T>, ClientError> {
        let url = self.collection_url(resource)?;
        let response = self.client.get(url).send()?;
        let status = response.status();
        let text = response.text()?;
        if !status.is_success() {
            return Err(ClientError::Status {
                status: status.as_u16(),
                reason: failure_reason(status, &text),
            });
        }
        let raw: Value = serde_json::from_str(&text)?;
        Ok(normalize(raw)?)
    }

    pub fn create<B: Serialize + ?Sized>(
        &self,
        resource: &str,
        record: &B,
    ) -> Result<ServerResult, ClientError> {
        let url = self.collection_url(resource)?;
        self.execute(self.client.post(url).json(record))
    }

    pub fn update<B: Serialize + ?Sized>(
        &self,
        resource: &str,
        id: &str,
        record: &B,
    ) -> Result<ServerResult, ClientError> {
        let url = self.item_url(resource, id)?;
        self.execute(self.client.put(url).json(record))
    }

    pub fn remove(&self, resource: &str, id: &str) -> Result<ServerResult, ClientError> {
        let url = self.item_url(resource, id)?;
        self.execute(self.client.delete(url))
    }

    /// Downloads an arbitrary URL, used for record images.
    pub fn fetch_bytes(&self, url: &str) -> Result<Vec<u8>, ClientError> {
        let response = self.client.get(url).send()?.error_for_status()?;
        Ok(response.bytes()?.to_vec())
    }

    fn execute(&self, request: RequestBuilder) -> Result<ServerResult, ClientError> {
        let response = request.send()?;
        let status = response.status();
        let text = response.text()?;
        if status.is_success() {
            let data = if text.trim().is_empty() {
                Value::Null
            } else {
                serde_json::from_str(&text)?
            };
            Ok(ServerResult::Success {
                status: status.as_u16(),
                data,
            })
        } else {
            Ok(ServerResult::Failure {
                status: status.as_u16(),
                reason: failure_reason(status, &text),
            })
        }
    }

    pub fn collection_url(&self, resource: &str) -> Result<Url, ClientError> {
        self.url(&[&format!("{resource}.json")])
    }

    pub fn item_url(&self, resource: &str, id: &str) -> Result<Url, ClientError> {
        self.url(&[resource, &format!("{id}.json")])
    }

    fn url(&self, segments: &[&str]) -> Result<Url, ClientError> {
        let mut url = Url::parse(&self.base_url).map_err(|err| ClientError::InvalidBaseUrl {
            url: self.base_url.clone(),
            reason: err.to_string(),
        })?;
        url.path_segments_mut()
            .map_err(|_| ClientError::InvalidBaseUrl {
                url: self.base_url.clone(),
                reason: "URL cannot carry a path".into(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

fn sanitize_base_url(mut base: String) -> Result<String, ClientError> {
    base = base.trim().to_string();
    if !base.starts_with("http://") && !base.starts_with("https://") {
        base = format!("http://{base}");
    }
    // Remove trailing slash for consistency
    while base.ends_with('/') {
        base.pop();
    }
    // Validate once
    Url::parse(&base).map_err(|err| ClientError::InvalidBaseUrl {
        url: base.clone(),
        reason: err.to_string(),
    })?;
    Ok(base)
}

/// The store reports failures as `{"error": "..."}`; anything else falls back
/// to the body text or the status line.
fn failure_reason(status: StatusCode, body: &str) -> String {
    if let Ok(Value::Object(fields)) = serde_json::from_str::<Value>(body) {
        if let Some(Value::String(message)) = fields.get("error") {
            return message.clone();
        }
    }
    let trimmed = body.trim();
    if !trimmed.is_empty() && trimmed.len() <= 200 {
        return trimmed.to_string();
    }
    status
        .canonical_reason()
        .map(str::to_string)
        .unwrap_or_else(|| status.to_string())
}
