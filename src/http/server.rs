//! HTTP server setup and route handlers.
//!
//! # Responsibilities
//! - Create the Axum router with all handlers
//! - Wire up middleware (tracing, timeout, request ID, panic guard)
//! - Authenticate callers before any data route runs
//! - Validate inbound queries, forward to the upstream, sanitize the result
//!
//! # Design Decisions
//! - Handlers are thin: validation, forwarding and sanitization live in
//!   their own modules and are exercised here as pure functions
//! - All data routes share one immutable AppState; no per-request config

use std::any::Any;
use std::sync::Arc;
use std::time::{Duration, Instant};

use axum::extract::{MatchedPath, RawPathParams, RawQuery, Request, State};
use axum::http::{header, StatusCode};
use axum::middleware::{self, Next};
use axum::response::Response;
use axum::routing::get;
use axum::Router;
use serde_json::json;
use tokio::net::TcpListener;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use url::form_urlencoded;

use crate::config::RuntimeConfig;
use crate::filters::{sanitize_cards_payload, sanitize_transactions_payload};
use crate::http::error::ApiError;
use crate::http::request::request_id_middleware;
use crate::http::response::{error_response, json_response};
use crate::observability::metrics;
use crate::openapi;
use crate::query::{
    build_cards_query, build_transactions_query, decode_path_token, parse_query_pairs,
    validate_token_path_param,
};
use crate::security::is_authorized_request;
use crate::upstream::UpstreamClient;

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RuntimeConfig>,
    pub upstream: UpstreamClient,
}

/// HTTP server for the read-only card proxy.
pub struct HttpServer {
    router: Router,
    config: Arc<RuntimeConfig>,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: RuntimeConfig) -> Self {
        let config = Arc::new(config);
        let router = build_router(config.clone());
        Self { router, config }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }
}

/// Build the Axum router with all middleware layers.
pub fn build_router(config: Arc<RuntimeConfig>) -> Router {
    let state = AppState {
        upstream: UpstreamClient::new(&config.upstream),
        config,
    };

    let data_routes = Router::new()
        .route("/cards", get(cards_list))
        .route("/cards/{token}", get(card_by_token))
        .route("/transactions", get(transactions_list))
        .route("/transactions/{token}", get(transaction_by_token))
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    Router::new()
        .route("/healthz", get(healthz))
        .route("/openapi.json", get(openapi_document))
        .merge(data_routes)
        .fallback(not_found)
        .method_not_allowed_fallback(method_not_allowed)
        .with_state(state.clone())
        .layer(TimeoutLayer::new(Duration::from_secs(
            state.config.listener.request_timeout_secs,
        )))
        .layer(middleware::from_fn(track_metrics))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CatchPanicLayer::custom(handle_panic))
}

/// Check the request credential against the configured token.
fn request_authorized(state: &AppState, request: &Request) -> bool {
    let authorization = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok());
    let token_param = request.uri().query().and_then(|query| {
        form_urlencoded::parse(query.as_bytes())
            .find(|(key, _)| key == "token")
            .map(|(_, value)| value.into_owned())
    });

    is_authorized_request(
        authorization,
        token_param.as_deref(),
        &state.config.worker_bearer_token,
    )
}

fn unauthorized() -> Response {
    error_response(
        StatusCode::UNAUTHORIZED,
        "unauthorized",
        "Missing or invalid bearer token.",
    )
}

/// Authenticate the caller before any data route runs.
///
/// Bearer header takes precedence over the `?token=` query parameter; a
/// rejected credential gets a 401 with no detail about why.
async fn auth_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    if request_authorized(&state, &request) {
        next.run(request).await
    } else {
        unauthorized()
    }
}

/// Record per-request counters and latency.
async fn track_metrics(
    matched_path: Option<MatchedPath>,
    request: Request,
    next: Next,
) -> Response {
    let start = Instant::now();
    let method = request.method().to_string();
    let route = matched_path
        .map(|path| path.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_string());

    let response = next.run(request).await;
    metrics::record_request(&method, response.status().as_u16(), &route, start);
    response
}

fn handle_panic(_panic: Box<dyn Any + Send + 'static>) -> Response {
    tracing::error!("Handler panicked");
    error_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        "internal_error",
        "Unexpected server error.",
    )
}

async fn healthz() -> Response {
    json_response(&json!({"status": "ok", "service": "card-proxy"}), StatusCode::OK)
}

async fn openapi_document() -> Response {
    json_response(&openapi::document(), StatusCode::OK)
}

/// Unknown paths are authenticated too, so routing happens only for
/// callers holding the credential.
async fn not_found(State(state): State<AppState>, request: Request) -> Response {
    if !request_authorized(&state, &request) {
        return unauthorized();
    }
    error_response(StatusCode::NOT_FOUND, "not_found", "Route not found.")
}

async fn method_not_allowed(State(state): State<AppState>, request: Request) -> Response {
    if !request_authorized(&state, &request) {
        return unauthorized();
    }
    error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        "method_not_allowed",
        "Use one of: GET.",
    )
}

async fn cards_list(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, ApiError> {
    let pairs = parse_query_pairs(raw_query.as_deref());
    let query = build_cards_query(&pairs)?;
    let payload = state.upstream.get(&format!("/cards{query}")).await?;
    Ok(json_response(&sanitize_cards_payload(&payload), StatusCode::OK))
}

async fn card_by_token(
    State(state): State<AppState>,
    params: RawPathParams,
) -> Result<Response, ApiError> {
    let token = path_token(&params, "card_token")?;
    let payload = state.upstream.get(&format!("/cards/{token}")).await?;
    Ok(json_response(&sanitize_cards_payload(&payload), StatusCode::OK))
}

async fn transactions_list(
    State(state): State<AppState>,
    RawQuery(raw_query): RawQuery,
) -> Result<Response, ApiError> {
    let pairs = parse_query_pairs(raw_query.as_deref());
    let query = build_transactions_query(&pairs)?;
    let payload = state.upstream.get(&format!("/transactions{query}")).await?;
    Ok(json_response(&sanitize_transactions_payload(&payload), StatusCode::OK))
}

async fn transaction_by_token(
    State(state): State<AppState>,
    params: RawPathParams,
) -> Result<Response, ApiError> {
    let token = path_token(&params, "transaction_token")?;

    if !state.config.enable_transaction_token_route {
        return Ok(error_response(
            StatusCode::NOT_IMPLEMENTED,
            "not_implemented",
            "GET /transactions/:token is disabled by default in v1 proxy settings.",
        ));
    }

    let payload = state.upstream.get(&format!("/transactions/{token}")).await?;
    Ok(json_response(&sanitize_transactions_payload(&payload), StatusCode::OK))
}

/// Decode and validate the `{token}` path capture.
fn path_token(params: &RawPathParams, field: &str) -> Result<String, ApiError> {
    let encoded = params
        .iter()
        .find(|(name, _)| *name == "token")
        .map(|(_, value)| value)
        .unwrap_or("");
    let token = decode_path_token(encoded, field)?;
    validate_token_path_param(&token, field)?;
    Ok(token)
}

/// Wait for shutdown signal (Ctrl+C).
async fn shutdown_signal() {
    tokio::signal::ctrl_c()
        .await
        .expect("Failed to install Ctrl+C handler");
    tracing::info!("Shutdown signal received");
}
