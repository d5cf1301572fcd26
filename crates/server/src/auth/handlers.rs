//! Auth handlers

use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::NewUser;
use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::{Error, Result};
use crate::handlers::Pagination;
use crate::models::User;

#[derive(Debug, Deserialize)]
pub struct RegisterRequest {
    pub username: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub skills: String,
    pub avatar: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
}

fn default_role() -> String {
    "user".to_string()
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub access_token: String,
    pub token_type: &'static str,
    pub user: User,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> Result<Json<AuthResponse>> {
    info!("POST /api/auth/register - {}", req.email);

    if req.username.trim().is_empty() {
        return Err(Error::Validation("username must not be empty".to_string()));
    }
    if req.email.trim().is_empty() || !req.email.contains('@') {
        return Err(Error::Validation("a valid email is required".to_string()));
    }
    if req.password.is_empty() {
        return Err(Error::Validation("password must not be empty".to_string()));
    }

    let user = state
        .auth
        .register(NewUser {
            username: req.username,
            email: req.email,
            password: req.password,
            role: req.role,
            department: req.department,
            skills: req.skills,
            avatar: req.avatar,
            location: req.location,
            phone: req.phone,
        })
        .await?;

    let access_token = state.tokens.issue(user.id)?;

    Ok(Json(AuthResponse {
        access_token,
        token_type: "bearer",
        user,
    }))
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<AuthResponse>> {
    info!("POST /api/auth/login - {}", req.email);

    let user = state
        .auth
        .verify_credentials(&req.email, &req.password)
        .await?;

    let access_token = state.tokens.issue(user.id)?;

    Ok(Json(AuthResponse {
        access_token,
        token_type: "bearer",
        user,
    }))
}

/// GET /api/auth/me
pub async fn me(State(state): State<AppState>, ctx: Ctx) -> Result<Json<User>> {
    let user = state
        .auth
        .user_by_id(ctx.user_id())
        .await?
        .ok_or(Error::AuthFailUserGone)?;

    Ok(Json(user))
}

/// GET /api/users
pub async fn list_users(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<User>>> {
    let users = state.auth.list_users(page.skip, page.limit).await?;
    Ok(Json(users))
}
