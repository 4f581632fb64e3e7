use axum::http::{HeaderName, header};
use axum::{Json, response::IntoResponse};
use shub_derive::{api_handler, api_model};
use shub_domain::constants::SYSTEM_TAG;
use std::borrow::Cow;
use std::sync::LazyLock;
use std::time::Instant;

// Probes hit this endpoint constantly; keep responses out of caches.
const NO_CACHE_HEADERS: [(HeaderName, &str); 2] = [
    (header::CACHE_CONTROL, "no-store, no-cache, must-revalidate"),
    (header::PRAGMA, "no-cache"),
];

static START_TIME: LazyLock<Instant> = LazyLock::new(Instant::now);

/// Liveness report. The `Cow` fields are borrowed statics on the serialize
/// path; ownership only materializes when a client deserializes the body.
#[api_model]
struct HealthResponse {
    /// Service status
    status: Cow<'static, str>,
    /// Crate version
    version: Cow<'static, str>,
    /// Seconds since process start
    uptime: u64,
}

#[api_handler(
    get,
    path = "/health",
    responses((status = OK, description = "Healthcheck endpoint", body = HealthResponse)),
    tag = SYSTEM_TAG,
)]
pub(super) async fn health_handler() -> impl IntoResponse {
    let body = HealthResponse {
        status: Cow::Borrowed("up"),
        version: Cow::Borrowed(env!("CARGO_PKG_VERSION")),
        uptime: START_TIME.elapsed().as_secs(),
    };

    (NO_CACHE_HEADERS, Json(body))
}
