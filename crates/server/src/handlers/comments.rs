//! Comment handlers

use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::{Error, Result};
use crate::models::Comment;
use crate::store::NewComment;

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub content: String,
    pub task_id: i64,
}

/// GET /api/comments/{task_id}
pub async fn get_task_comments(
    State(state): State<AppState>,
    Path(task_id): Path<i64>,
) -> Result<Json<Vec<Comment>>> {
    let comments = state.store.comments_for_task(task_id).await?;
    Ok(Json(comments))
}

/// POST /api/comments
pub async fn create_comment(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(req): Json<CreateCommentRequest>,
) -> Result<Json<Comment>> {
    info!("POST /api/comments - task {}", req.task_id);

    if req.content.trim().is_empty() {
        return Err(Error::Validation("content must not be empty".to_string()));
    }

    let comment = state
        .store
        .create_comment(
            ctx.user_id(),
            NewComment {
                content: req.content,
                task_id: req.task_id,
            },
        )
        .await?;

    Ok(Json(comment))
}
