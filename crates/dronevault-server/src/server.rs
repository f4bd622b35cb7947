//! HTTP surface of the Drone secret extension
//!
//! - `POST /`: resolve `{"name", "path"}` and answer `{"name", "data", "pull_request"}`
//! - `GET /healthz`: liveness, no authentication

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::{header::AUTHORIZATION, HeaderMap, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use dronevault_core::{CancellationToken, ErrorKind, SecretRequest, SecretResolver};
use subtle::ConstantTimeEq;

/// Shared state for all handlers
pub struct AppState {
    resolver: SecretResolver,
    secret: String,
    /// Cancelled on shutdown to abort in-flight resolutions
    shutdown: CancellationToken,
}

impl AppState {
    pub fn new(resolver: SecretResolver, secret: impl Into<String>, shutdown: CancellationToken) -> Self {
        Self {
            resolver,
            secret: secret.into(),
            shutdown,
        }
    }
}

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", post(find_secret))
        .route("/healthz", get(healthz))
        .with_state(state)
}

async fn healthz() -> &'static str {
    "ok"
}

async fn find_secret(State(state): State<Arc<AppState>>, headers: HeaderMap, body: Bytes) -> Response {
    if !authorized(&headers, &state.secret) {
        tracing::warn!("rejected secret request with missing or invalid bearer token");
        return (StatusCode::UNAUTHORIZED, "invalid or missing bearer token").into_response();
    }

    let request: SecretRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(e) => {
            tracing::warn!(error = %e, "undecodable secret request");
            return (StatusCode::BAD_REQUEST, format!("invalid secret request: {}", e)).into_response();
        }
    };

    match state.resolver.resolve(Some(&request), &state.shutdown).await {
        Ok(secret) => Json(secret).into_response(),
        Err(err) => (status_for(err.kind()), err.to_string()).into_response(),
    }
}

/// HTTP status for a resolution failure
pub fn status_for(kind: ErrorKind) -> StatusCode {
    match kind {
        ErrorKind::InvalidRequest | ErrorKind::MalformedPath => StatusCode::BAD_REQUEST,
        ErrorKind::AmbiguousVault | ErrorKind::AmbiguousItem | ErrorKind::AmbiguousField => {
            StatusCode::CONFLICT
        }
        ErrorKind::VaultNotFound
        | ErrorKind::ItemNotFound
        | ErrorKind::SectionNotFound
        | ErrorKind::FieldNotFound => StatusCode::NOT_FOUND,
        ErrorKind::ItemFetchFailed | ErrorKind::StoreApi | ErrorKind::Transport => StatusCode::BAD_GATEWAY,
        ErrorKind::Cancelled => StatusCode::SERVICE_UNAVAILABLE,
    }
}

fn authorized(headers: &HeaderMap, secret: &str) -> bool {
    let token = headers
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split_once(' '))
        .filter(|(scheme, _)| scheme.eq_ignore_ascii_case("bearer"))
        .map(|(_, token)| token.trim());

    match token {
        Some(token) => token.as_bytes().ct_eq(secret.as_bytes()).into(),
        None => false,
    }
}
