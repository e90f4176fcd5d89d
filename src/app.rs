// src/app.rs

use axum::{
    middleware as axum_middleware,
    routing::{get, post},
    Router,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{config::AppState, docs::ApiDoc, handlers, middleware::auth::auth_guard};

pub fn build_router(app_state: AppState) -> Router {
    // Public: credential exchange and reference data
    let public_routes = Router::new()
        .route("/auth/login", post(handlers::auth::login))
        .route("/branches", get(handlers::branches::list_branches))
        .route("/roles/{role}/permissions", get(handlers::rbac::role_defaults));

    // Everything below needs a live session
    let session_routes = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .route("/auth/refresh", post(handlers::auth::refresh))
        .route("/users/me", get(handlers::auth::get_me))
        .route("/users", get(handlers::users::list_users))
        .route("/access/me", get(handlers::rbac::my_access))
        .route("/access/check", post(handlers::rbac::check_permission))
        .route("/access/resources/{resource}", get(handlers::rbac::check_resource))
        .route("/leads", get(handlers::leads::list_leads))
        .route("/leads/visible", post(handlers::leads::filter_visible_leads))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    Router::new()
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api", public_routes.merge(session_routes))
        .with_state(app_state)
}
