//! File metadata handlers

use axum::extract::{Query, State};
use axum::Json;
use serde::Deserialize;
use tracing::info;

use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::{Error, Result};
use crate::handlers::Pagination;
use crate::models::FileRecord;
use crate::store::NewFile;

#[derive(Debug, Deserialize)]
pub struct CreateFileRequest {
    pub name: String,
    #[serde(default = "default_file_type")]
    pub file_type: String,
    pub size: Option<i64>,
    pub url: Option<String>,
    pub description: Option<String>,
}

fn default_file_type() -> String {
    "file".to_string()
}

/// GET /api/files
pub async fn list_files(
    State(state): State<AppState>,
    Query(page): Query<Pagination>,
) -> Result<Json<Vec<FileRecord>>> {
    let files = state.store.list_files(page.skip, page.limit).await?;
    Ok(Json(files))
}

/// POST /api/files
pub async fn create_file(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(req): Json<CreateFileRequest>,
) -> Result<Json<FileRecord>> {
    info!("POST /api/files - {}", req.name);

    if req.name.trim().is_empty() {
        return Err(Error::Validation("name must not be empty".to_string()));
    }

    let file = state
        .store
        .create_file(
            ctx.user_id(),
            NewFile {
                name: req.name,
                file_type: req.file_type,
                size: req.size,
                url: req.url,
                description: req.description,
            },
        )
        .await?;

    Ok(Json(file))
}
