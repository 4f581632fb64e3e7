use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode, header};
use shub_kernel::server::router::system_router;
use tower::ServiceExt;
use utoipa_axum::router::OpenApiRouter;

#[tokio::test]
async fn health_reports_up_and_is_never_cached() {
    let (app, _doc) = OpenApiRouter::<()>::new().merge(system_router()).split_for_parts();

    let request = Request::builder().uri("/health").body(Body::empty()).expect("request");
    let response = app.oneshot(request).await.expect("response");

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers().get(header::CACHE_CONTROL).and_then(|v| v.to_str().ok()),
        Some("no-store, no-cache, must-revalidate")
    );

    let bytes = to_bytes(response.into_body(), usize::MAX).await.expect("body");
    let body: serde_json::Value = serde_json::from_slice(&bytes).expect("json body");
    assert_eq!(body["status"], "up");
    assert!(!body["version"].as_str().unwrap_or_default().is_empty());
    assert!(body["uptime"].is_u64());
}
