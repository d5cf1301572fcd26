use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::{Error, Result};
use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use tracing::debug;

/// Session guard: token must verify AND its subject must still resolve to
/// a live user before the request proceeds.
pub async fn mw_require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response> {
    debug!("MIDDLEWARE: require_auth");

    let auth_header = match req.headers().get(header::AUTHORIZATION) {
        Some(h) => h.to_str().map_err(|_| Error::AuthFailTokenWrongFormat)?,
        None => return Err(Error::AuthFailNoToken),
    };

    // Format: "Bearer <token>"
    let Some(token) = auth_header.strip_prefix("Bearer ") else {
        return Err(Error::AuthFailTokenWrongFormat);
    };

    let user_id = state.tokens.verify(token)?;

    let user = state
        .auth
        .user_by_id(user_id)
        .await?
        .filter(|u| u.is_active)
        .ok_or(Error::AuthFailUserGone)?;

    req.extensions_mut().insert(Ctx::new(user.id));

    Ok(next.run(req).await)
}
