use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use anyhow::Result;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use bytes::Bytes;
use serde::Serialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};

use crate::config::StoreConfig;
use crate::document::{DocumentError, DocumentStore};

const JSON_SUFFIX: &str = ".json";

#[derive(Clone)]
pub struct AppState {
    pub store: DocumentStore,
}

pub(crate) type ApiResult<T> = Result<Json<T>, ApiError>;

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    NotFound(String),
    Internal(anyhow::Error),
}

impl ApiError {
    fn into_response_parts(self) -> (StatusCode, ErrorResponse) {
        match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, ErrorResponse { error: msg }),
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, ErrorResponse { error: msg }),
            ApiError::Internal(err) => {
                tracing::error!(error = ?err, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorResponse {
                        error: "internal server error".into(),
                    },
                )
            }
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = self.into_response_parts();
        (status, Json(body)).into_response()
    }
}

impl From<DocumentError> for ApiError {
    fn from(err: DocumentError) -> Self {
        ApiError::Internal(err.into())
    }
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

#[derive(Debug, Serialize)]
struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

/// Reply to a successful `POST`: the key the store assigned.
#[derive(Debug, Serialize)]
struct PushResponse {
    name: String,
}

pub fn router(store: DocumentStore) -> Router {
    Router::new()
        .route("/health", get(health_handler))
        .route("/:collection", get(list_collection).post(push_record))
        .route(
            "/:resource/:item",
            get(get_record).put(put_record).delete(delete_record),
        )
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(AppState { store })
}

/// Tries to bind to the given port on every interface, or finds the next
/// available port
pub async fn find_available_port(start_port: u16) -> Result<(TcpListener, u16)> {
    find_available_port_on(Ipv4Addr::UNSPECIFIED.into(), start_port).await
}

/// Same as [`find_available_port`], restricted to one local address.
pub async fn find_available_port_on(host: IpAddr, start_port: u16) -> Result<(TcpListener, u16)> {
    const MAX_PORT_ATTEMPTS: u16 = 100;

    for offset in 0..MAX_PORT_ATTEMPTS {
        let Some(port) = start_port.checked_add(offset) else {
            break;
        };
        let addr = SocketAddr::new(host, port);

        match TcpListener::bind(addr).await {
            Ok(listener) => {
                let bound = listener.local_addr()?.port();
                return Ok((listener, bound));
            }
            Err(e) => {
                if offset == 0 {
                    tracing::debug!(port, error = %e, "Port in use, trying next port");
                }
                continue;
            }
        }
    }

    anyhow::bail!(
        "Could not find available port in range {}-{}",
        start_port,
        start_port.saturating_add(MAX_PORT_ATTEMPTS - 1)
    )
}

pub async fn serve_http(config: StoreConfig, store: DocumentStore) -> Result<()> {
    let (listener, actual_port) = find_available_port(config.api_port).await?;
    if actual_port != config.api_port {
        tracing::warn!(
            requested_port = config.api_port,
            actual_port = actual_port,
            "Configured port was in use, bound to next available port"
        );
    }
    serve_listener(listener, store).await
}

/// Serves the store on an already bound listener.
pub async fn serve_listener(listener: TcpListener, store: DocumentStore) -> Result<()> {
    let addr = listener.local_addr()?;
    tracing::info!(?addr, "document store listening");
    axum::serve(listener, router(store).into_make_service()).await?;
    Ok(())
}

async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// Runs a store operation on the blocking pool. Mutations hold the document
/// lock while the snapshot file is rewritten.
async fn with_store<T, F>(state: &AppState, op: F) -> Result<T, ApiError>
where
    T: Send + 'static,
    F: FnOnce(&DocumentStore) -> Result<T, DocumentError> + Send + 'static,
{
    let store = state.store.clone();
    tokio::task::spawn_blocking(move || op(&store))
        .await
        .map_err(|err| ApiError::Internal(err.into()))?
        .map_err(ApiError::from)
}

async fn list_collection(
    State(state): State<AppState>,
    Path(collection): Path<String>,
) -> ApiResult<Value> {
    let resource = strip_json_suffix(&collection)?.to_string();
    let records = {
        let resource = resource.clone();
        with_store(&state, move |store| store.list(&resource)).await?
    };
    tracing::debug!(
        resource = %resource,
        count = records.as_ref().map_or(0, |r| r.len()),
        "collection read"
    );
    Ok(Json(match records {
        Some(records) => json!(records),
        None => Value::Null,
    }))
}

async fn push_record(
    State(state): State<AppState>,
    Path(collection): Path<String>,
    body: Bytes,
) -> ApiResult<PushResponse> {
    let resource = strip_json_suffix(&collection)?.to_string();
    let value = parse_body(&body)?;
    let name = {
        let resource = resource.clone();
        with_store(&state, move |store| store.push(&resource, value)).await?
    };
    tracing::info!(resource = %resource, key = %name, "record created");
    Ok(Json(PushResponse { name }))
}

async fn get_record(
    State(state): State<AppState>,
    Path((resource, item)): Path<(String, String)>,
) -> ApiResult<Value> {
    let key = strip_json_suffix(&item)?.to_string();
    let record = with_store(&state, move |store| store.get(&resource, &key)).await?;
    Ok(Json(record.unwrap_or(Value::Null)))
}

async fn put_record(
    State(state): State<AppState>,
    Path((resource, item)): Path<(String, String)>,
    body: Bytes,
) -> ApiResult<Value> {
    let key = strip_json_suffix(&item)?.to_string();
    let value = parse_body(&body)?;
    let (resource_name, key_name) = (resource.clone(), key.clone());
    let stored =
        with_store(&state, move |store| store.put(&resource_name, &key_name, value)).await?;
    tracing::info!(resource = %resource, key = %key, "record replaced");
    Ok(Json(stored))
}

async fn delete_record(
    State(state): State<AppState>,
    Path((resource, item)): Path<(String, String)>,
) -> ApiResult<Value> {
    let key = strip_json_suffix(&item)?.to_string();
    let (resource_name, key_name) = (resource.clone(), key.clone());
    let removed =
        with_store(&state, move |store| store.delete(&resource_name, &key_name)).await?;
    tracing::info!(resource = %resource, key = %key, removed, "record deleted");
    Ok(Json(Value::Null))
}

fn strip_json_suffix(segment: &str) -> Result<&str, ApiError> {
    match segment.strip_suffix(JSON_SUFFIX) {
        Some(name) if !name.is_empty() => Ok(name),
        _ => Err(ApiError::NotFound(format!(
            "{segment} is not a JSON resource path"
        ))),
    }
}

/// Bodies arrive with whatever content type the caller chose, so they are
/// parsed from raw bytes rather than through the `Json` extractor.
fn parse_body(body: &[u8]) -> Result<Value, ApiError> {
    serde_json::from_slice(body).map_err(|err| {
        ApiError::BadRequest(format!("Invalid data; couldn't parse JSON object: {err}"))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn loopback_binding_stays_local() {
        let (listener, port) = find_available_port_on(Ipv4Addr::LOCALHOST.into(), 0)
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("local addr");
        assert!(addr.ip().is_loopback());
        assert_ne!(port, 0);
        assert_eq!(port, addr.port());
    }

    #[test]
    fn json_suffix_is_required() {
        assert_eq!(strip_json_suffix("posts.json").expect("resource"), "posts");
        assert!(strip_json_suffix("posts").is_err());
        assert!(strip_json_suffix(".json").is_err());
    }

    #[test]
    fn body_must_be_json() {
        assert_eq!(
            parse_body(br#"{"title":"a"}"#).expect("json"),
            json!({"title": "a"})
        );
        assert!(matches!(
            parse_body(b"title=a"),
            Err(ApiError::BadRequest(_))
        ));
    }
}
