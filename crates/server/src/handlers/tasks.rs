//! Task handlers

use axum::extract::{Path, Query, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use tracing::info;

use crate::config::AppState;
use crate::ctx::Ctx;
use crate::error::{Error, Result};
use crate::handlers::default_limit;
use crate::models::{Priority, Task, TaskStatus};
use crate::store::{NewTask, TaskFilter, TaskPatch};

#[derive(Debug, Deserialize)]
pub struct CreateTaskRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub priority: Priority,
    pub assignee_id: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
    #[serde(default)]
    pub tags: String,
}

/// Fields absent from the body are left unchanged
#[derive(Debug, Default, Deserialize)]
pub struct UpdateTaskRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee_id: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TaskListQuery {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

/// GET /api/tasks
pub async fn list_tasks(
    State(state): State<AppState>,
    Query(q): Query<TaskListQuery>,
) -> Result<Json<Vec<Task>>> {
    let tasks = state
        .store
        .list_tasks(TaskFilter {
            status: q.status,
            priority: q.priority,
            skip: q.skip,
            limit: q.limit,
        })
        .await?;
    Ok(Json(tasks))
}

/// POST /api/tasks
pub async fn create_task(
    State(state): State<AppState>,
    ctx: Ctx,
    Json(req): Json<CreateTaskRequest>,
) -> Result<Json<Task>> {
    info!("POST /api/tasks - {}", req.title);

    if req.title.trim().is_empty() {
        return Err(Error::Validation("title must not be empty".to_string()));
    }

    // Creator is the authenticated caller, whatever the body says
    let task = state
        .store
        .create_task(
            ctx.user_id(),
            NewTask {
                title: req.title,
                description: req.description,
                priority: req.priority,
                assignee_id: req.assignee_id,
                due_date: req.due_date,
                tags: req.tags,
            },
        )
        .await?;

    Ok(Json(task))
}

/// GET /api/tasks/{id}
pub async fn get_task(State(state): State<AppState>, Path(id): Path<i64>) -> Result<Json<Task>> {
    let task = state.store.task(id).await?;
    Ok(Json(task))
}

/// PUT /api/tasks/{id}
pub async fn update_task(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<UpdateTaskRequest>,
) -> Result<Json<Task>> {
    info!("PUT /api/tasks/{}", id);

    let task = state
        .store
        .update_task(
            id,
            TaskPatch {
                title: req.title,
                description: req.description,
                status: req.status,
                priority: req.priority,
                assignee_id: req.assignee_id,
                due_date: req.due_date,
                tags: req.tags,
            },
        )
        .await?;

    Ok(Json(task))
}
