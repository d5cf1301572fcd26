//! Route table
//!
//! Public auth routes plus the protected API surface behind the session
//! guard middleware.

use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::auth::handlers as auth_handlers;
use crate::auth::middleware::mw_require_auth;
use crate::config::AppState;
use crate::handlers::{announcements, comments, files, tasks};

pub fn router(state: AppState) -> Router {
    let protected = Router::new()
        .route("/api/auth/me", get(auth_handlers::me))
        .route("/api/users", get(auth_handlers::list_users))
        .route("/api/tasks", get(tasks::list_tasks).post(tasks::create_task))
        .route(
            "/api/tasks/{id}",
            get(tasks::get_task).put(tasks::update_task),
        )
        .route(
            "/api/announcements",
            get(announcements::list_announcements).post(announcements::create_announcement),
        )
        .route("/api/files", get(files::list_files).post(files::create_file))
        .route("/api/comments/{task_id}", get(comments::get_task_comments))
        .route("/api/comments", post(comments::create_comment))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            mw_require_auth,
        ));

    Router::new()
        .route("/api/auth/register", post(auth_handlers::register))
        .route("/api/auth/login", post(auth_handlers::login))
        .route("/health", get(health_check))
        .merge(protected)
        .with_state(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

async fn health_check() -> &'static str {
    "OK"
}
