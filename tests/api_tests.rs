use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use duplynx::{
    app_state::AppState,
    config::Config,
    dataset::SeedDataset,
    models::{MachineResponse, ReviewRecordResponse, TenantResponse},
    query::QueryService,
    registry::RegistryStore,
    router::build_router,
    startup,
    views::Views,
};
use serde_json::Value;
use tower::ServiceExt;

fn setup_test_router() -> Router {
    let store = RegistryStore::new();
    startup::seed_registry(&store, &SeedDataset::canonical()).unwrap();
    startup::ensure_canonical_tenant(&store).unwrap();

    let config = Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        assets_dir: concat!(env!("CARGO_MANIFEST_DIR"), "/web/static").into(),
        cors_allow_any: true,
    };

    build_router(AppState::new(
        QueryService::new(store),
        Views::new().unwrap(),
        config,
    ))
}

async fn get(router: Router, uri: &str) -> axum::response::Response {
    let request = Request::builder()
        .uri(uri)
        .method("GET")
        .body(Body::empty())
        .unwrap();
    router.oneshot(request).await.unwrap()
}

async fn body_bytes(response: axum::response::Response) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

#[tokio::test]
async fn test_list_tenants_includes_canonical_tenant() {
    let router = setup_test_router();

    let response = get(router, "/tenants").await;
    assert_eq!(response.status(), StatusCode::OK);

    let tenants: Vec<TenantResponse> = serde_json::from_slice(&body_bytes(response).await).unwrap();
    let orion = tenants
        .iter()
        .find(|t| t.slug == "orion-analytics")
        .expect("canonical tenant present");
    assert_eq!(orion.name, "Orion Analytics");
    assert_eq!(orion.machine_count, 3);
}

#[tokio::test]
async fn test_list_tenants_is_byte_identical_across_requests() {
    let router = setup_test_router();

    let first = body_bytes(get(router.clone(), "/tenants").await).await;
    let second = body_bytes(get(router, "/tenants").await).await;

    assert_eq!(first, second);
}

#[tokio::test]
async fn test_list_machines_for_canonical_tenant() {
    let router = setup_test_router();

    let response = get(router, "/tenants/orion-analytics/machines").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get("x-duplynx-tenant").unwrap(),
        "orion-analytics"
    );

    let body = body_bytes(response).await;
    let raw: Value = serde_json::from_slice(&body).unwrap();
    assert!(raw[0].get("displayName").is_some());

    let machines: Vec<MachineResponse> = serde_json::from_slice(&body).unwrap();
    assert!(!machines.is_empty());
    assert_eq!(machines[0].id, "orion-core-01");
    assert_eq!(machines[0].display_name, "Orion Core 01");
}

#[tokio::test]
async fn test_list_machines_unknown_tenant_is_not_found() {
    let router = setup_test_router();

    let response = get(router, "/tenants/unknown-tenant/machines").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"], "not_found");
}

#[tokio::test]
async fn test_list_machines_malformed_slug_is_bad_request() {
    let router = setup_test_router();

    let response = get(router, "/tenants/Not_A_Slug/machines").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_scope_header_mismatch_is_not_found() {
    let router = setup_test_router();

    let request = Request::builder()
        .uri("/tenants/orion-analytics/machines")
        .method("GET")
        .header("X-Duplynx-Tenant", "selene-research")
        .body(Body::empty())
        .unwrap();

    let response = router.oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_selected_machine_query_is_accepted() {
    let router = setup_test_router();

    let response = get(
        router,
        "/tenants/orion-analytics/machines?selected_machine=orion-laptop-01",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_review_records_for_machine() {
    let router = setup_test_router();

    let response = get(
        router.clone(),
        "/tenants/orion-analytics/machines/orion-core-01/reviews",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let records: Vec<ReviewRecordResponse> =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].hash, "hash-001");

    let response = get(
        router,
        "/tenants/orion-analytics/machines/orion-core-01/reviews/hash-001",
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK);
    let record: ReviewRecordResponse =
        serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(record.machine_id, "orion-core-01");
    assert_eq!(record.file_count, 3);
}

#[tokio::test]
async fn test_review_records_do_not_cross_tenants() {
    let router = setup_test_router();

    let response = get(
        router.clone(),
        "/tenants/selene-research/machines/orion-core-01/reviews",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = get(
        router,
        "/tenants/orion-analytics/machines/orion-laptop-01/reviews/hash-001",
    )
    .await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_root_page_embeds_stylesheet_and_tenant_name() {
    let router = setup_test_router();

    let response = get(router, "/").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("/static/app.css"));
    assert!(html.contains("Orion Analytics"));
    assert!(html.contains("Selene Research"));
}

#[tokio::test]
async fn test_board_page_renders_review_section_inside_main() {
    let router = setup_test_router();

    let response = get(router, "/tenants/orion-analytics/machines/orion-core-01/board").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = String::from_utf8(body_bytes(response).await).unwrap();
    let main_start = html.find("<main").unwrap();
    let main_end = html.find("</main>").unwrap();
    let main = &html[main_start..main_end];
    assert!(main.contains(r#"<section aria-label="Review""#));
    assert!(main.contains("Review</h2>"));
    assert!(main.contains(">hash-001</p>"));
    assert!(html.contains(r#"<html lang="en">"#));
}

#[tokio::test]
async fn test_board_page_unknown_machine_renders_scope_page() {
    let router = setup_test_router();

    let response = get(router, "/tenants/selene-research/machines/orion-core-01/board").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("Tenant scope conflict"));
}

#[tokio::test]
async fn test_healthz() {
    let router = setup_test_router();

    let response = get(router, "/healthz").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_bytes(response).await, b"ok");
}

#[tokio::test]
async fn test_static_stylesheet_is_served_with_cache_header() {
    let router = setup_test_router();

    let response = get(router.clone(), "/static/app.css").await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).unwrap(),
        "public, max-age=300"
    );

    let response = get(router, "/static/missing.css").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_repeated_query_parameter_is_json_bad_request() {
    let router = setup_test_router();

    let response = get(
        router,
        "/tenants/orion-analytics/machines?selected_machine=a&selected_machine=b",
    )
    .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let body: Value = serde_json::from_slice(&body_bytes(response).await).unwrap();
    assert_eq!(body["error"], "invalid_request");
}

#[tokio::test]
async fn test_board_page_malformed_slug_renders_html_bad_request() {
    let router = setup_test_router();

    let response = get(router, "/tenants/Orion_Analytics/machines/orion-core-01/board").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(response
        .headers()
        .get(header::CONTENT_TYPE)
        .unwrap()
        .to_str()
        .unwrap()
        .starts_with("text/html"));

    let html = String::from_utf8(body_bytes(response).await).unwrap();
    assert!(html.contains("Tenant scope conflict"));
    assert!(html.contains("malformed tenant slug"));
}

#[tokio::test]
async fn test_board_page_has_a_column_per_status() {
    let router = setup_test_router();

    let response = get(router, "/tenants/orion-analytics/machines/orion-archive-01/board").await;
    assert_eq!(response.status(), StatusCode::OK);

    let html = String::from_utf8(body_bytes(response).await).unwrap();
    for status in ["review", "action_needed", "resolved", "archived"] {
        assert!(html.contains(&format!(r#"data-status="{}""#, status)));
    }
    let action_needed = html.find(r#"data-status="action_needed""#).unwrap();
    let resolved = html.find(r#"data-status="resolved""#).unwrap();
    let column = &html[action_needed..resolved];
    assert!(column.contains("data-count>1</span>"));
    assert!(column.contains(">hash-002</p>"));
}
