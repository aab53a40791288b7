use super::*;
use axum::body::{to_bytes, Body};
use axum::http::Request;
use chrono::TimeZone;
use rust_decimal::Decimal;
use serde_json::{json, Value};
use stockwatch_catalog::CatalogError;
use stockwatch_core::{classify, Product, ProductStatus};
use stockwatch_db::MemoryStore;
use tower::ServiceExt;

fn make_product(id: &str, title: &str, inventory: i64) -> Product {
    let ts = Utc.with_ymd_and_hms(2026, 2, 1, 9, 30, 0).unwrap();
    Product {
        id: id.to_string(),
        title: title.to_string(),
        sku: format!("SKU-{id}"),
        price: Decimal::new(12_500, 2),
        compare_at_price: None,
        inventory,
        category: classify("", "", title),
        image_url: None,
        vendor: None,
        product_type: None,
        tags: None,
        status: ProductStatus::Active,
        created_at: ts,
        updated_at: ts,
    }
}

struct StubCatalog(Vec<Product>);

impl CatalogSource for StubCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        Ok(self.0.clone())
    }
}

struct DownCatalog;

impl CatalogSource for DownCatalog {
    async fn fetch_products(&self) -> Result<Vec<Product>, CatalogError> {
        Err(CatalogError::UnexpectedStatus {
            status: 503,
            url: "https://catalog.test/products".to_string(),
        })
    }
}

fn seeded_store() -> Arc<MemoryStore> {
    let store = MemoryStore::new();
    for product in [
        make_product("1", "Mesh Chair", 25),
        make_product("2", "Oak Desk", 4),
        make_product("3", "Floor Lamp", 0),
        make_product("4", "Filing Cabinet", 8),
    ] {
        store.insert_product(product);
    }
    Arc::new(store)
}

fn app_with<C: CatalogSource + 'static>(store: Arc<MemoryStore>, catalog: Option<C>) -> Router {
    build_app(AppState::new(store, catalog))
}

fn app(store: Arc<MemoryStore>) -> Router {
    app_with::<StubCatalog>(store, None)
}

async fn send(app: Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.oneshot(request).await.expect("response");
    let status = response.status();
    let body = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body bytes");
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("json parse")
    };
    (status, json)
}

fn get(uri: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .body(Body::empty())
        .expect("request")
}

fn post_json(uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

fn ids(json: &Value) -> Vec<&str> {
    json.as_array()
        .expect("array body")
        .iter()
        .map(|p| p["id"].as_str().expect("id"))
        .collect()
}

#[test]
fn normalize_threshold_falls_back_to_default() {
    assert_eq!(normalize_threshold(None), 10);
    assert_eq!(normalize_threshold(Some("abc")), 10);
    assert_eq!(normalize_threshold(Some("0")), 10);
    assert_eq!(normalize_threshold(Some("-4")), 10);
    assert_eq!(normalize_threshold(Some("5")), 5);
}

#[test]
fn normalize_limit_applies_defaults_and_bounds() {
    assert_eq!(normalize_limit(None), 50);
    assert_eq!(normalize_limit(Some("0")), 50);
    assert_eq!(normalize_limit(Some("1000")), 200);
    assert_eq!(normalize_limit(Some("25")), 25);
}

#[test]
fn api_error_codes_map_to_status() {
    let cases = [
        ("bad_request", StatusCode::BAD_REQUEST),
        ("not_found", StatusCode::NOT_FOUND),
        ("internal_error", StatusCode::INTERNAL_SERVER_ERROR),
        ("sync_failed", StatusCode::INTERNAL_SERVER_ERROR),
        ("upstream_unavailable", StatusCode::BAD_GATEWAY),
    ];
    for (code, status) in cases {
        let response = ApiError::new("req-1", code, "msg").into_response();
        assert_eq!(response.status(), status, "code {code}");
    }
}

#[tokio::test]
async fn health_reports_ok() {
    let (status, json) = send(app(seeded_store()), get("/api/v1/health")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"status": "ok", "database": "ok"}));
}

#[tokio::test]
async fn health_reports_degraded_store() {
    let store = seeded_store();
    store.set_unavailable(true);
    let (status, json) = send(app(store), get("/api/v1/health")).await;
    assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
    assert_eq!(json["database"], "unavailable");
}

#[tokio::test]
async fn request_id_is_echoed_or_generated() {
    let request = Request::builder()
        .uri("/api/v1/health")
        .header(REQUEST_ID_HEADER, "req-abc")
        .body(Body::empty())
        .expect("request");
    let response = app(seeded_store()).oneshot(request).await.expect("response");
    assert_eq!(
        response.headers().get(REQUEST_ID_HEADER).and_then(|v| v.to_str().ok()),
        Some("req-abc")
    );

    let response = app(seeded_store())
        .oneshot(get("/api/v1/health"))
        .await
        .expect("response");
    let generated = response
        .headers()
        .get(REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .expect("generated id");
    assert!(uuid::Uuid::parse_str(generated).is_ok());
}

#[tokio::test]
async fn products_lists_everything_sorted_by_title() {
    let (status, json) = send(app(seeded_store()), get("/api/v1/products")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json), vec!["4", "3", "1", "2"]);
    assert_eq!(json[0]["category"], "STORAGE");
    assert_eq!(json[0]["price"], "125.00");
}

#[tokio::test]
async fn products_filter_by_category() {
    let (status, json) = send(app(seeded_store()), get("/api/v1/products?category=SEATING")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ids(&json), vec!["1"]);
}

#[tokio::test]
async fn invalid_category_is_bad_request_envelope() {
    let request = Request::builder()
        .uri("/api/v1/products?category=sofas")
        .header(REQUEST_ID_HEADER, "req-cat")
        .body(Body::empty())
        .expect("request");
    let (status, json) = send(app(seeded_store()), request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");
    assert_eq!(json["error"]["message"], "unknown category: sofas");
    assert_eq!(json["meta"]["requestId"], "req-cat");
    assert!(json["meta"]["timestamp"].is_string());
}

#[tokio::test]
async fn low_stock_uses_default_for_bad_threshold() {
    for uri in [
        "/api/v1/products/low-stock",
        "/api/v1/products/low-stock?threshold=abc",
        "/api/v1/products/low-stock?threshold=-1",
    ] {
        let (status, json) = send(app(seeded_store()), get(uri)).await;
        assert_eq!(status, StatusCode::OK, "{uri}");
        assert_eq!(ids(&json), vec!["2", "4"], "{uri}");
    }

    let (_, json) = send(
        app(seeded_store()),
        get("/api/v1/products/low-stock?threshold=5"),
    )
    .await;
    assert_eq!(ids(&json), vec!["2"]);
}

#[tokio::test]
async fn store_failure_is_internal_error() {
    let store = seeded_store();
    store.set_unavailable(true);
    let (status, json) = send(app(store), get("/api/v1/products")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "internal_error");
}

#[tokio::test]
async fn stats_totals_match_store() {
    let (status, json) = send(app(seeded_store()), get("/api/v1/stats")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["totalProducts"], 4);
    assert_eq!(json["totalInventory"], 37);
    assert_eq!(json["lowStockItems"], 2);
    assert_eq!(json["outOfStockItems"], 1);
    assert_eq!(json["categoryBreakdown"].as_array().map(Vec::len), Some(7));
}

#[tokio::test]
async fn sync_reports_counts_and_opens_alerts() {
    let store = Arc::new(MemoryStore::new());
    let catalog = StubCatalog(vec![
        make_product("1", "Mesh Chair", 25),
        make_product("2", "Oak Desk", 7),
        make_product("3", "Floor Lamp", 0),
    ]);
    let (status, json) = send(
        app_with(Arc::clone(&store), Some(catalog)),
        post_json("/api/v1/sync", &json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);
    assert_eq!(json["productsCount"], 3);
    assert_eq!(json["alertsCount"], 2);

    let (_, alerts) = send(app(store), get("/api/v1/alerts")).await;
    let types: Vec<&str> = alerts
        .as_array()
        .expect("alerts")
        .iter()
        .map(|a| a["type"].as_str().expect("type"))
        .collect();
    // High severity sorts ahead of medium.
    assert_eq!(types, vec!["out_of_stock", "low_stock"]);
}

#[tokio::test]
async fn sync_with_unreachable_catalog_is_bad_gateway() {
    let store = seeded_store();
    let (status, json) = send(
        app_with(Arc::clone(&store), Some(DownCatalog)),
        post_json("/api/v1/sync", &json!({})),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(json["error"]["code"], "upstream_unavailable");
    assert!(store.alerts().is_empty());
}

#[tokio::test]
async fn sync_without_catalog_config_fails() {
    let (status, json) = send(
        app(seeded_store()),
        post_json("/api/v1/sync", &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "sync_failed");
}

#[tokio::test]
async fn sync_store_failure_is_sync_failed() {
    let store = Arc::new(MemoryStore::new());
    store.fail_commit_at(0);
    let catalog = StubCatalog(vec![make_product("1", "Oak Desk", 3)]);
    let (status, json) = send(
        app_with(store, Some(catalog)),
        post_json("/api/v1/sync", &json!({})),
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(json["error"]["code"], "sync_failed");
}

#[tokio::test]
async fn inventory_updates_follow_syncs() {
    let store = Arc::new(MemoryStore::new());
    for qty in [9, 6, 2] {
        let catalog = StubCatalog(vec![make_product("A", "Oak Desk", qty)]);
        let (status, _) = send(
            app_with(Arc::clone(&store), Some(catalog)),
            post_json("/api/v1/sync", &json!({})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
    }

    let (status, json) = send(app(Arc::clone(&store)), get("/api/v1/inventory-updates")).await;
    assert_eq!(status, StatusCode::OK);
    let updates = json.as_array().expect("updates");
    assert_eq!(updates.len(), 2);
    assert_eq!(updates[0]["previousQuantity"], 6);
    assert_eq!(updates[0]["newQuantity"], 2);

    let (_, json) = send(app(store), get("/api/v1/inventory-updates?limit=1")).await;
    assert_eq!(json.as_array().map(Vec::len), Some(1));
}

#[tokio::test]
async fn resolve_requires_alert_id() {
    for body in [json!({}), json!({"alertId": "   "})] {
        let (status, json) = send(
            app(seeded_store()),
            post_json("/api/v1/alerts/resolve", &body),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{body}");
        assert_eq!(json["error"]["code"], "bad_request");
    }
}

#[tokio::test]
async fn resolve_rejects_malformed_body() {
    let request = Request::builder()
        .method("POST")
        .uri("/api/v1/alerts/resolve")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .expect("request");
    let (status, json) = send(app(seeded_store()), request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "bad_request");
}

#[tokio::test]
async fn resolve_unknown_alert_is_not_found() {
    for id in [uuid::Uuid::new_v4().to_string(), "not-a-uuid".to_string()] {
        let (status, json) = send(
            app(seeded_store()),
            post_json("/api/v1/alerts/resolve", &json!({"alertId": &id})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND, "{id}");
        assert_eq!(json["error"]["code"], "not_found");
    }
}

#[tokio::test]
async fn resolve_closes_active_alert() {
    let store = seeded_store();
    let opened = AlertService::new(Arc::clone(&store))
        .check_inventory_levels()
        .await
        .expect("check");
    let target = opened[0].id;

    let (status, json) = send(
        app(Arc::clone(&store)),
        post_json(
            "/api/v1/alerts/resolve",
            &json!({"alertId": target.to_string()}),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["success"], true);

    let (_, active) = send(app(store), get("/api/v1/alerts")).await;
    let active_ids: Vec<&str> = active
        .as_array()
        .expect("alerts")
        .iter()
        .map(|a| a["id"].as_str().expect("id"))
        .collect();
    assert_eq!(active_ids.len(), opened.len() - 1);
    assert!(!active_ids.contains(&target.to_string().as_str()));
}
