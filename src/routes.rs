use axum::{
    http::{header, HeaderValue, Method},
    routing::get,
    Router,
};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::config::SecurityConfig;
use crate::handlers::{protected, public};
use crate::state::AppState;

/// Full application: routes plus global middleware
pub fn app(state: AppState, security: &SecurityConfig) -> Router {
    router(state).layer(
        ServiceBuilder::new()
            .layer(TraceLayer::new_for_http())
            .layer(cors_layer(security)),
    )
}

/// Routes without global middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(public::root))
        .route("/health", get(public::health))
        .merge(group_routes())
        .merge(lookup_routes())
        .with_state(state)
}

fn group_routes() -> Router<AppState> {
    Router::new()
        // Collection
        .route(
            "/groups",
            get(public::groups_list).post(protected::groups_create),
        )
        // Item
        .route(
            "/groups/:id",
            get(public::groups_show)
                .patch(protected::groups_update)
                .delete(protected::groups_delete),
        )
}

fn lookup_routes() -> Router<AppState> {
    Router::new()
        .route("/members", get(public::members_list))
        .route("/programs", get(public::programs_list))
        .route("/locations", get(public::locations_list))
}

fn cors_layer(security: &SecurityConfig) -> CorsLayer {
    if !security.enable_cors {
        return CorsLayer::new();
    }

    let origins: Vec<HeaderValue> = security
        .cors_origins
        .iter()
        .filter_map(|origin| HeaderValue::from_str(origin).ok())
        .collect();

    if origins.is_empty() || security.cors_origins.iter().any(|o| o == "*") {
        return CorsLayer::permissive();
    }

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods([Method::GET, Method::POST, Method::PATCH, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
