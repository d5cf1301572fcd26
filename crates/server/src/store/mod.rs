//! SQLite-backed domain store
//!
//! Create/read/update/list operations for tasks, announcements, comments,
//! and file metadata. Ownership columns (creator, author, uploader) are
//! always stamped from the resolved caller identity, never taken from
//! request input.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::SqlitePool;
use tracing::info;

use crate::error::{Error, Result};
use crate::models::{Announcement, Comment, FileRecord, Priority, Task, TaskStatus};

/// Open the backing database, creating the file if missing
pub async fn connect(database_url: &str) -> Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new().connect_with(options).await?;
    Ok(pool)
}

#[derive(Debug, Clone, Default)]
pub struct NewTask {
    pub title: String,
    pub description: String,
    pub priority: Priority,
    pub assignee_id: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: String,
}

/// Partial task update; absent fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct TaskPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub assignee_id: Option<i64>,
    pub due_date: Option<DateTime<Utc>>,
    pub tags: Option<String>,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TaskFilter {
    pub status: Option<TaskStatus>,
    pub priority: Option<Priority>,
    pub skip: i64,
    pub limit: i64,
}

#[derive(Debug, Clone, Default)]
pub struct NewAnnouncement {
    pub title: String,
    pub content: String,
    pub priority: Priority,
    pub pinned: bool,
}

#[derive(Debug, Clone)]
pub struct NewComment {
    pub content: String,
    pub task_id: i64,
}

#[derive(Debug, Clone, Default)]
pub struct NewFile {
    pub name: String,
    pub file_type: String,
    pub size: Option<i64>,
    pub url: Option<String>,
    pub description: Option<String>,
}

/// Domain store over the shared pool
pub struct TeamStore {
    pool: SqlitePool,
}

impl TeamStore {
    /// Create the store and make sure the domain tables exist
    pub async fn new(pool: SqlitePool) -> Result<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS tasks (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                description TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL DEFAULT 'pending',
                priority TEXT NOT NULL DEFAULT 'medium',
                assignee_id INTEGER REFERENCES users(id),
                creator_id INTEGER NOT NULL REFERENCES users(id),
                due_date TEXT,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL,
                tags TEXT NOT NULL DEFAULT ''
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS announcements (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                title TEXT NOT NULL,
                content TEXT NOT NULL,
                author_id INTEGER NOT NULL REFERENCES users(id),
                priority TEXT NOT NULL DEFAULT 'medium',
                pinned INTEGER NOT NULL DEFAULT 0,
                created_at TEXT NOT NULL,
                updated_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS comments (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                content TEXT NOT NULL,
                author_id INTEGER NOT NULL REFERENCES users(id),
                task_id INTEGER NOT NULL REFERENCES tasks(id),
                created_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS files (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                name TEXT NOT NULL,
                file_type TEXT NOT NULL DEFAULT 'file',
                size INTEGER,
                url TEXT,
                description TEXT,
                uploader_id INTEGER NOT NULL REFERENCES users(id),
                uploaded_at TEXT NOT NULL
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    // ----- Tasks -----

    pub async fn create_task(&self, creator_id: i64, new: NewTask) -> Result<Task> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO tasks \
             (title, description, status, priority, assignee_id, creator_id, \
              due_date, created_at, updated_at, tags) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new.title)
        .bind(&new.description)
        .bind(TaskStatus::Pending)
        .bind(new.priority)
        .bind(new.assignee_id)
        .bind(creator_id)
        .bind(new.due_date)
        .bind(now)
        .bind(now)
        .bind(&new.tags)
        .execute(&self.pool)
        .await?;

        let task = self.task(result.last_insert_rowid()).await?;
        info!("[store] task #{} created by user {}", task.id, creator_id);
        Ok(task)
    }

    pub async fn task(&self, id: i64) -> Result<Task> {
        sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or(Error::NotFound("task"))
    }

    /// Apply only the fields present in the patch and refresh updated_at.
    /// Runs in a transaction so a failed write leaves the row untouched.
    pub async fn update_task(&self, id: i64, patch: TaskPatch) -> Result<Task> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?;
        if existing.is_none() {
            return Err(Error::NotFound("task"));
        }

        if let Some(title) = &patch.title {
            sqlx::query("UPDATE tasks SET title = ? WHERE id = ?")
                .bind(title)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        if let Some(description) = &patch.description {
            sqlx::query("UPDATE tasks SET description = ? WHERE id = ?")
                .bind(description)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        if let Some(status) = patch.status {
            sqlx::query("UPDATE tasks SET status = ? WHERE id = ?")
                .bind(status)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        if let Some(priority) = patch.priority {
            sqlx::query("UPDATE tasks SET priority = ? WHERE id = ?")
                .bind(priority)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        if let Some(assignee_id) = patch.assignee_id {
            sqlx::query("UPDATE tasks SET assignee_id = ? WHERE id = ?")
                .bind(assignee_id)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        if let Some(due_date) = patch.due_date {
            sqlx::query("UPDATE tasks SET due_date = ? WHERE id = ?")
                .bind(due_date)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }
        if let Some(tags) = &patch.tags {
            sqlx::query("UPDATE tasks SET tags = ? WHERE id = ?")
                .bind(tags)
                .bind(id)
                .execute(&mut *tx)
                .await?;
        }

        sqlx::query("UPDATE tasks SET updated_at = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(id)
            .execute(&mut *tx)
            .await?;

        let task: Task = sqlx::query_as("SELECT * FROM tasks WHERE id = ?")
            .bind(id)
            .fetch_one(&mut *tx)
            .await?;

        tx.commit().await?;

        Ok(task)
    }

    pub async fn list_tasks(&self, filter: TaskFilter) -> Result<Vec<Task>> {
        let tasks = sqlx::query_as(
            "SELECT * FROM tasks \
             WHERE (?1 IS NULL OR status = ?1) AND (?2 IS NULL OR priority = ?2) \
             ORDER BY id LIMIT ?3 OFFSET ?4",
        )
        .bind(filter.status)
        .bind(filter.priority)
        .bind(filter.limit)
        .bind(filter.skip)
        .fetch_all(&self.pool)
        .await?;
        Ok(tasks)
    }

    // ----- Announcements -----

    pub async fn create_announcement(
        &self,
        author_id: i64,
        new: NewAnnouncement,
    ) -> Result<Announcement> {
        let now = Utc::now();
        let result = sqlx::query(
            "INSERT INTO announcements \
             (title, content, author_id, priority, pinned, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new.title)
        .bind(&new.content)
        .bind(author_id)
        .bind(new.priority)
        .bind(new.pinned)
        .bind(now)
        .bind(now)
        .execute(&self.pool)
        .await?;

        let announcement = sqlx::query_as("SELECT * FROM announcements WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(&self.pool)
            .await?;
        Ok(announcement)
    }

    /// Pinned announcements come first, then newest-created first
    pub async fn list_announcements(&self, skip: i64, limit: i64) -> Result<Vec<Announcement>> {
        let announcements = sqlx::query_as(
            "SELECT * FROM announcements \
             ORDER BY pinned DESC, created_at DESC LIMIT ? OFFSET ?",
        )
        .bind(limit)
        .bind(skip)
        .fetch_all(&self.pool)
        .await?;
        Ok(announcements)
    }

    // ----- Comments -----

    pub async fn create_comment(&self, author_id: i64, new: NewComment) -> Result<Comment> {
        let result = sqlx::query(
            "INSERT INTO comments (content, author_id, task_id, created_at) VALUES (?, ?, ?, ?)",
        )
        .bind(&new.content)
        .bind(author_id)
        .bind(new.task_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let comment = sqlx::query_as("SELECT * FROM comments WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(&self.pool)
            .await?;
        Ok(comment)
    }

    /// Oldest-first within a task
    pub async fn comments_for_task(&self, task_id: i64) -> Result<Vec<Comment>> {
        let comments =
            sqlx::query_as("SELECT * FROM comments WHERE task_id = ? ORDER BY created_at ASC")
                .bind(task_id)
                .fetch_all(&self.pool)
                .await?;
        Ok(comments)
    }

    // ----- Files -----

    pub async fn create_file(&self, uploader_id: i64, new: NewFile) -> Result<FileRecord> {
        let result = sqlx::query(
            "INSERT INTO files \
             (name, file_type, size, url, description, uploader_id, uploaded_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&new.name)
        .bind(&new.file_type)
        .bind(new.size)
        .bind(&new.url)
        .bind(&new.description)
        .bind(uploader_id)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        let file = sqlx::query_as("SELECT * FROM files WHERE id = ?")
            .bind(result.last_insert_rowid())
            .fetch_one(&self.pool)
            .await?;
        Ok(file)
    }

    pub async fn list_files(&self, skip: i64, limit: i64) -> Result<Vec<FileRecord>> {
        let files = sqlx::query_as("SELECT * FROM files ORDER BY id LIMIT ? OFFSET ?")
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;
        Ok(files)
    }
}
