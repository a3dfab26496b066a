//! End-to-end route tests against a mock upstream.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::routing::get;
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use card_proxy::config::schema::{ListenerConfig, ObservabilityConfig, UpstreamConfig};
use card_proxy::{build_router, RuntimeConfig};

const WORKER_TOKEN: &str = "worker-test-token";
const CARD_TOKEN: &str = "7ef7d65c-9023-4da3-b113-3b8583fd7951";
const TRANSACTION_TOKEN: &str = "764fa5a3-2371-40f0-8cbb-9a2e1230d955";

/// Start a canned upstream and return its base URL.
async fn spawn_mock_upstream() -> String {
    let card = json!({
        "token": CARD_TOKEN,
        "last_four": "4142",
        "pan": "4111111111111111",
        "cvv": "123",
        "exp_month": "06",
        "exp_year": "2027",
        "state": "OPEN"
    });
    let transaction = json!({
        "token": TRANSACTION_TOKEN,
        "status": "SETTLING",
        "amount": -1000,
        "secret_note": "drop this"
    });

    let cards_list = card.clone();
    let card_detail = card.clone();
    let transactions_list = transaction.clone();
    let transaction_detail = transaction.clone();

    let router = Router::new()
        .route(
            "/cards",
            get(move || {
                let card = cards_list.clone();
                async move { axum::Json(json!({"data": [card], "has_more": false})) }
            }),
        )
        .route(
            "/cards/{token}",
            get(move || {
                let card = card_detail.clone();
                async move { axum::Json(card) }
            }),
        )
        .route(
            "/transactions",
            get(move || {
                let transaction = transactions_list.clone();
                async move { axum::Json(json!({"data": [transaction], "has_more": false})) }
            }),
        )
        .route(
            "/transactions/{token}",
            get(move || {
                let transaction = transaction_detail.clone();
                async move { axum::Json(transaction) }
            }),
        );

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

fn test_config(base_url: String, enable_transaction_token_route: bool) -> RuntimeConfig {
    RuntimeConfig {
        listener: ListenerConfig::default(),
        upstream: UpstreamConfig {
            api_key: "privacy-test-key".to_string(),
            base_url,
            timeout_ms: 2000,
        },
        worker_bearer_token: WORKER_TOKEN.to_string(),
        enable_transaction_token_route,
        observability: ObservabilityConfig::default(),
    }
}

async fn app(enable_transaction_token_route: bool) -> Router {
    let base_url = spawn_mock_upstream().await;
    build_router(Arc::new(test_config(base_url, enable_transaction_token_route)))
}

fn get_request(path: &str, bearer: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().uri(path);
    if let Some(token) = bearer {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_without_auth() {
    let response = app(false).await.oneshot(get_request("/healthz", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({"status": "ok", "service": "card-proxy"})
    );
}

#[tokio::test]
async fn test_openapi_without_auth() {
    let response = app(false)
        .await
        .oneshot(get_request("/openapi.json", None))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["openapi"], "3.1.0");
    assert!(body["paths"]["/cards"].is_object());
}

#[tokio::test]
async fn test_protected_route_without_token() {
    let response = app(false).await.oneshot(get_request("/cards", None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "unauthorized");
}

#[tokio::test]
async fn test_protected_route_with_wrong_token() {
    let response = app(false)
        .await
        .oneshot(get_request("/cards", Some("wrong-token")))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_cards_list_filters_sensitive_fields() {
    let response = app(false)
        .await
        .oneshot(get_request("/cards?page_size=10", Some(WORKER_TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "data": [{
                "token": CARD_TOKEN,
                "last_four": "4142",
                "state": "OPEN"
            }],
            "has_more": false
        })
    );
}

#[tokio::test]
async fn test_card_detail_filters_sensitive_fields() {
    let response = app(false)
        .await
        .oneshot(get_request(&format!("/cards/{CARD_TOKEN}"), Some(WORKER_TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["token"], CARD_TOKEN);
    assert!(body.get("pan").is_none());
    assert!(body.get("cvv").is_none());
    assert!(body.get("exp_month").is_none());
    assert!(body.get("exp_year").is_none());
}

#[tokio::test]
async fn test_transactions_list_filters_unknown_fields() {
    let response = app(false)
        .await
        .oneshot(get_request("/transactions", Some(WORKER_TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        body_json(response).await,
        json!({
            "data": [{
                "amount": -1000,
                "status": "SETTLING",
                "token": TRANSACTION_TOKEN
            }],
            "has_more": false
        })
    );
}

#[tokio::test]
async fn test_rejects_unknown_query_parameter() {
    let response = app(false)
        .await
        .oneshot(get_request("/cards?bad=true", Some(WORKER_TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "bad_request");
    assert_eq!(body["error"]["message"], "bad is not a valid parameter.");
}

#[tokio::test]
async fn test_rejects_out_of_range_page_size() {
    let response = app(false)
        .await
        .oneshot(get_request("/cards?page_size=9999", Some(WORKER_TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_rejects_non_uuid_card_token() {
    let response = app(false)
        .await
        .oneshot(get_request("/cards/not-a-uuid", Some(WORKER_TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body = body_json(response).await;
    assert_eq!(body["error"]["message"], "card_token must be a valid UUID v4.");
}

#[tokio::test]
async fn test_rejects_malformed_url_encoded_card_token() {
    let response = app(false)
        .await
        .oneshot(get_request("/cards/%ff%fe", Some(WORKER_TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_transaction_by_token_disabled_by_default() {
    let response = app(false)
        .await
        .oneshot(get_request(
            &format!("/transactions/{TRANSACTION_TOKEN}"),
            Some(WORKER_TOKEN),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_IMPLEMENTED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "not_implemented");
}

#[tokio::test]
async fn test_transaction_by_token_when_enabled() {
    let response = app(true)
        .await
        .oneshot(get_request(
            &format!("/transactions/{TRANSACTION_TOKEN}"),
            Some(WORKER_TOKEN),
        ))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = body_json(response).await;
    assert_eq!(body["token"], TRANSACTION_TOKEN);
    assert!(body.get("secret_note").is_none());
}

#[tokio::test]
async fn test_method_not_allowed_on_data_route() {
    let request = Request::builder()
        .method("POST")
        .uri("/cards")
        .header(header::AUTHORIZATION, format!("Bearer {WORKER_TOKEN}"))
        .body(Body::empty())
        .unwrap();
    let response = app(false).await.oneshot(request).await.unwrap();

    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "method_not_allowed");
}

#[tokio::test]
async fn test_unknown_route_is_404() {
    let response = app(false)
        .await
        .oneshot(get_request("/accounts", Some(WORKER_TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "not_found");
}

#[tokio::test]
async fn test_upstream_error_is_sanitized() {
    // An upstream that rate-limits every request.
    let router = Router::new().route(
        "/cards",
        get(|| async {
            (
                StatusCode::TOO_MANY_REQUESTS,
                axum::Json(json!({"message": "slow down"})),
            )
        }),
    );
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    let config = test_config(format!("http://{addr}"), false);
    let response = build_router(Arc::new(config))
        .oneshot(get_request("/cards", Some(WORKER_TOKEN)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    let body = body_json(response).await;
    assert_eq!(body["error"]["code"], "upstream_error");
    assert_eq!(body["error"]["message"], "Upstream rate limit reached.");
    // The upstream body is never echoed.
    assert_eq!(body["error"].as_object().unwrap().len(), 2);
}

#[tokio::test]
async fn test_response_carries_request_id() {
    let response = app(false).await.oneshot(get_request("/healthz", None)).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}
