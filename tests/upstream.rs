//! Integration tests for the CoinCap client against a local fake provider
//!
//! Each test binds an actix server on an ephemeral port that plays the role of
//! the market-data API, then points `CoinCapClient` at it.

use actix_web::{web, App, HttpRequest, HttpResponse, HttpServer};
use std::collections::HashMap;
use std::net::TcpListener;

use coindash::data::{CoinCapClient, FetchError};

const ASSETS_BODY: &str = r#"{
    "data": [
        {"id": "bitcoin", "rank": "1", "symbol": "BTC", "name": "Bitcoin",
         "priceUsd": "64000.5", "changePercent24Hr": "1.2", "marketCapUsd": "1260000000000"},
        {"id": "ethereum", "rank": "2", "symbol": "ETH", "name": "Ethereum",
         "priceUsd": "3100.25", "changePercent24Hr": "-0.8", "marketCapUsd": "372000000000"}
    ],
    "timestamp": 1717171717171
}"#;

async fn assets_ok(req: HttpRequest) -> HttpResponse {
    let query = web::Query::<HashMap<String, String>>::from_query(req.query_string())
        .map(|q| q.into_inner())
        .unwrap_or_default();
    if query.get("limit").map(String::as_str) != Some("100") {
        return HttpResponse::BadRequest().body("missing limit");
    }
    HttpResponse::Ok()
        .content_type("application/json")
        .body(ASSETS_BODY)
}

async fn assets_unavailable() -> HttpResponse {
    HttpResponse::ServiceUnavailable().body("down for maintenance")
}

async fn assets_garbage() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("text/html")
        .body("<html>not json</html>")
}

async fn assets_wrong_shape() -> HttpResponse {
    HttpResponse::Ok()
        .content_type("application/json")
        .body(r#"{"error": "rate limited"}"#)
}

/// Starts the fake provider and returns its base URL
fn start_fake_provider() -> String {
    let listener = TcpListener::bind("127.0.0.1:0").expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().expect("Listener should have an address");

    let server = HttpServer::new(|| {
        App::new()
            .route("/ok/assets", web::get().to(assets_ok))
            .route("/down/assets", web::get().to(assets_unavailable))
            .route("/garbage/assets", web::get().to(assets_garbage))
            .route("/shape/assets", web::get().to(assets_wrong_shape))
    })
    .workers(1)
    .listen(listener)
    .expect("Failed to listen")
    .run();
    actix_web::rt::spawn(server);

    format!("http://{}", addr)
}

#[actix_web::test]
async fn test_fetch_parses_assets() {
    let base = start_fake_provider();
    let client = CoinCapClient::with_base_url(format!("{}/ok/assets", base));

    let assets = client.fetch(100).await.expect("Fetch should succeed");

    assert_eq!(assets.len(), 2);
    assert_eq!(assets[0].id, "bitcoin");
    assert_eq!(assets[1].rank_number(), Some(2));
}

#[actix_web::test]
async fn test_non_success_status_is_upstream_error() {
    let base = start_fake_provider();
    let client = CoinCapClient::with_base_url(format!("{}/down/assets", base));

    let err = client.fetch(100).await.unwrap_err();
    assert!(matches!(err, FetchError::Upstream { status: 503 }));
}

#[actix_web::test]
async fn test_non_json_body_is_parse_error() {
    let base = start_fake_provider();
    let client = CoinCapClient::with_base_url(format!("{}/garbage/assets", base));

    let err = client.fetch(100).await.unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)));
}

#[actix_web::test]
async fn test_missing_data_key_is_parse_error() {
    let base = start_fake_provider();
    let client = CoinCapClient::with_base_url(format!("{}/shape/assets", base));

    let err = client.fetch(100).await.unwrap_err();
    assert!(matches!(err, FetchError::Parse(_)));
}

#[actix_web::test]
async fn test_unreachable_host_is_network_error() {
    // Bind then drop to get a port nothing listens on
    let port = TcpListener::bind("127.0.0.1:0")
        .and_then(|l| l.local_addr())
        .map(|a| a.port())
        .expect("Should get a free port");
    let client = CoinCapClient::with_base_url(format!("http://127.0.0.1:{}/assets", port));

    let err = client.fetch(100).await.unwrap_err();
    assert!(matches!(err, FetchError::Network(_)));
}
