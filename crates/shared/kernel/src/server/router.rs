use super::health;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// System-level routes shared by every deployment (currently `/health`).
///
/// Generic over the state so slice tests can mount it next to their own
/// routers without constructing a full [`super::ApiState`].
pub fn system_router<S>() -> OpenApiRouter<S>
where
    S: Send + Sync + Clone + 'static,
{
    let router = OpenApiRouter::<S>::new();
    router.routes(routes!(health::health_handler))
}
