// routes.rs - router assembly for the three handler tiers

use axum::{
    http::{header, HeaderValue, Method},
    middleware::from_fn_with_state,
    routing::{get, post, put},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::handlers::{elevated, protected, public};
use crate::middleware::{require_admin, require_authenticated};
use crate::state::AppState;

pub fn app(state: AppState) -> Router {
    let mut router = Router::new()
        // Public
        .merge(public_routes())
        // Protected API (verified session)
        .merge(protected_routes(&state))
        // Admin API (verified session + admin)
        .merge(admin_routes(&state));

    if state.config.security.enable_cors {
        router = router.layer(cors_layer(&state.config.security));
    }
    if state.config.api.enable_request_logging {
        router = router.layer(TraceLayer::new_for_http());
    }

    router.with_state(state)
}

fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .route("/auth/status", get(public::auth_status))
        .route("/settings/:key", get(public::settings_get))
}

fn protected_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/api/me", get(protected::me_get))
        .route("/api/prompts", get(protected::prompts_get))
        .route("/api/favorites", get(protected::favorites_get))
        .route_layer(from_fn_with_state(state.clone(), require_authenticated))
}

fn admin_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        // Revenue dashboards
        .route("/api/admin/revenue-summary", get(elevated::revenue_summary))
        .route("/api/admin/revenue-summary/lifetime", get(elevated::revenue_lifetime))
        // Activity feed
        .route("/api/admin/activity/recent", get(elevated::activity_recent))
        // Feature flags and maintenance
        .route("/api/admin/settings/:key", put(elevated::settings_put))
        .route("/api/admin/maintenance/:script", post(elevated::maintenance_run))
        .route_layer(from_fn_with_state(state.clone(), require_admin))
}

/// Session cookies cross origins, so credentials are allowed and origins are
/// listed explicitly. A `*` entry falls back to a permissive, credential-less
/// policy.
fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring unparseable CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::OPTIONS])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
        .allow_credentials(true)
}
