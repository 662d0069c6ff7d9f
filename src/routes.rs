// src/routes.rs

use axum::{
    Router,
    http::{Method, header},
    middleware,
    routing::{delete, get, post},
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::{
    auth::auth_middleware,
    handlers::{auth, comments, health},
    state::AppState,
};

/// Assembles the main application router.
///
/// * Public reads, token-protected writes.
/// * Applies global middleware (Trace, CORS).
/// * Injects global state (comment store, token store, config).
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE]);

    let public_routes = Router::new()
        .route("/posts/{post_uid}/comments", get(comments::list_comments))
        .route("/comments/{uid}", get(comments::get_comment))
        .route("/comments/{uid}/owner", get(comments::get_owner))
        .route("/auth/token", post(auth::issue_token));

    // Mutating routes require a token known to the token store.
    let protected_routes = Router::new()
        .route("/posts/{post_uid}/comments", post(comments::create_comment))
        .route(
            "/comments/{uid}",
            delete(comments::delete_comment).put(comments::update_comment),
        )
        .route("/comments/{uid}/content", delete(comments::remove_content))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .nest("/api", public_routes.merge(protected_routes))
        .route("/health", get(health::health))
        // Global Middleware (applied from outside in)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors),
        )
        .with_state(state)
}
