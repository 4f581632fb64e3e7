use axum::extract::Request;
use axum::http::{HeaderValue, Method, header};
use axum::middleware::Next;
use axum::response::Response;
use tower_http::cors::{Any, CorsLayer};

/// Permissive CORS for the public `/api/*` surface.
///
/// The survey form is served from arbitrary origins during field studies, so
/// the API accepts cross-origin requests without credentials.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers(Any)
}

/// Forces `Content-Type: application/json` on every `/api/*` response.
///
/// Clients key their response handling off this header; a proxy or error
/// page sneaking in `text/html` must not defeat that check.
pub async fn force_json_responses(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(header::CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}
