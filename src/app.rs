use axum::{
    extract::Request,
    middleware::{self, Next},
    routing::{get, patch, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers;
use crate::middleware::{authenticate, guard};
use crate::state::AppState;

/// Roles allowed onto the privileged CRUD surface.
const ADMIN_ROLES: &[&str] = &["admin", "superadmin"];

/// Assemble the full router. Control flow per request:
/// authentication middleware -> role guard -> validation (extractors) ->
/// handler, with every failure rendered by the error normalizer.
pub fn app(state: AppState) -> Router {
    let admin_api = Router::new()
        .route("/users", get(handlers::users::list))
        .route(
            "/users/:id",
            get(handlers::users::get).delete(handlers::users::delete),
        )
        .route(
            "/departments",
            get(handlers::departments::list).post(handlers::departments::create),
        )
        .route(
            "/employees",
            get(handlers::employees::list).post(handlers::employees::create),
        )
        .route(
            "/employees/:id",
            patch(handlers::employees::update).delete(handlers::employees::delete),
        )
        .route(
            "/employees/:id/documents",
            post(handlers::employees::upload_document),
        )
        .route_layer(middleware::from_fn(|req: Request, next: Next| {
            guard::require_department_role(ADMIN_ROLES, req, next)
        }));

    let protected = Router::new()
        .route("/auth/logout", post(handlers::auth::logout))
        .merge(admin_api)
        .layer(middleware::from_fn_with_state(state.clone(), authenticate));

    let api = Router::new()
        .route("/", get(handlers::welcome))
        .route("/auth/register", post(handlers::auth::register))
        .route("/auth/login", post(handlers::auth::login))
        .merge(protected);

    Router::new()
        .route("/health", get(handlers::health))
        .nest("/api/v1", api)
        .fallback(handlers::route_not_found)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
