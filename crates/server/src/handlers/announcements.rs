//! Announcement handlers

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::{Error, Result};
use crate::handlers::Pagination;
use crate::models::{Announcement, Priority};
use crate::store::NewAnnouncement;

#[derive(Debug, Deserialize)]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub pinned: bool,
}

/// GET /api/announcements
pub async fn list_announcements(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<Announcement>>> {
    let announcements = state
        .store
        .list_announcements(page.skip, page.limit)
        .await?;
    Ok(Json(announcements))
}

/// POST /api/announcements
pub async fn create_announcement(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(req): Json<CreateAnnouncementRequest>,
) -> Result<Json<Announcement>> {
    info!("POST /api/announcements - {}", req.title);

    if req.title.trim().is_empty() || req.content.trim().is_empty() {
        return Err(Error::Validation(
            "title and content must not be empty".to_string(),
        ));
    }

    let announcement = state
        .store
        .create_announcement(
            ctx.user_id(),
            NewAnnouncement {
                title: req.title,
                content: req.content,
                priority: req.priority,
                pinned: req.pinned,
            },
        )
        .await?;

    Ok(Json(announcement))
}
