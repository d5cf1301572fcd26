//! Authentication Module
//!
//! Handles user registration, credential verification, and user lookup.
//! Bearer tokens themselves are issued and checked by [`token::TokenManager`].

pub mod handlers;
pub mod middleware;
pub mod token;

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{info, warn};

use crate::error::{Error, Result};
use crate::models::{User, UserStatus};

/// Registration input; the password arrives in plaintext and only its
/// bcrypt hash is ever stored.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: String,
    pub department: String,
    pub skills: String,
    pub avatar: Option<String>,
    pub location: Option<String>,
    pub phone: Option<String>,
}

/// Credential store over the shared pool
pub struct AuthManager {
    pool: SqlitePool,
}

impl AuthManager {
    /// Create the manager and make sure the users table exists
    pub async fn new(pool: SqlitePool) -> Result<Self> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                username TEXT NOT NULL UNIQUE,
                email TEXT NOT NULL UNIQUE,
                password_hash TEXT NOT NULL,
                role TEXT NOT NULL DEFAULT 'user',
                department TEXT NOT NULL DEFAULT '',
                status TEXT NOT NULL DEFAULT 'offline',
                avatar TEXT,
                joined_at TEXT NOT NULL,
                last_active TEXT NOT NULL,
                skills TEXT NOT NULL DEFAULT '',
                location TEXT,
                phone TEXT,
                is_active INTEGER NOT NULL DEFAULT 1
            )
            "#,
        )
        .execute(&pool)
        .await?;

        Ok(Self { pool })
    }

    /// Register a new user
    pub async fn register(&self, new: NewUser) -> Result<User> {
        if self.user_by_email(&new.email).await?.is_some() {
            return Err(Error::Conflict("email already registered".to_string()));
        }

        let existing: Option<(i64,)> = sqlx::query_as("SELECT id FROM users WHERE username = ?")
            .bind(&new.username)
            .fetch_optional(&self.pool)
            .await?;
        if existing.is_some() {
            return Err(Error::Conflict("username already taken".to_string()));
        }

        let password_hash = hash(&new.password, DEFAULT_COST)?;
        let now = Utc::now();

        // The UNIQUE constraints are the backstop for concurrent
        // registrations; a violation maps to Conflict in error.rs.
        let result = sqlx::query(
            "INSERT INTO users \
             (username, email, password_hash, role, department, status, avatar, \
              joined_at, last_active, skills, location, phone, is_active) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, 1)",
        )
        .bind(&new.username)
        .bind(&new.email)
        .bind(&password_hash)
        .bind(&new.role)
        .bind(&new.department)
        .bind(UserStatus::Offline)
        .bind(&new.avatar)
        .bind(now)
        .bind(now)
        .bind(&new.skills)
        .bind(&new.location)
        .bind(&new.phone)
        .execute(&self.pool)
        .await?;

        let user = self
            .user_by_id(result.last_insert_rowid())
            .await?
            .ok_or(Error::NotFound("user"))?;

        info!("[auth] user registered: {} ({})", user.username, user.email);

        Ok(user)
    }

    /// Check an email/password pair; on success the user goes online and
    /// last_active is refreshed.
    pub async fn verify_credentials(&self, email: &str, password: &str) -> Result<User> {
        let user: Option<User> =
            sqlx::query_as("SELECT * FROM users WHERE email = ? AND is_active = 1")
                .bind(email)
                .fetch_optional(&self.pool)
                .await?;

        let Some(user) = user else {
            warn!("[auth] login attempt for unknown email {}", email);
            return Err(Error::LoginFail);
        };

        // bcrypt::verify is constant-time against the stored hash
        if !verify(password, &user.password_hash)? {
            warn!("[auth] failed login attempt for {}", email);
            return Err(Error::LoginFail);
        }

        sqlx::query("UPDATE users SET last_active = ?, status = ? WHERE id = ?")
            .bind(Utc::now())
            .bind(UserStatus::Online)
            .bind(user.id)
            .execute(&self.pool)
            .await?;

        let user = self
            .user_by_id(user.id)
            .await?
            .ok_or(Error::NotFound("user"))?;

        info!("[auth] user logged in: {}", user.username);

        Ok(user)
    }

    /// Get user by id
    pub async fn user_by_id(&self, id: i64) -> Result<Option<User>> {
        let user = sqlx::query_as("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// Get user by email
    pub async fn user_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as("SELECT * FROM users WHERE email = ?")
            .bind(email)
            .fetch_optional(&self.pool)
            .await?;
        Ok(user)
    }

    /// List users for the team directory
    pub async fn list_users(&self, skip: i64, limit: i64) -> Result<Vec<User>> {
        let users = sqlx::query_as("SELECT * FROM users ORDER BY id LIMIT ? OFFSET ?")
            .bind(limit)
            .bind(skip)
            .fetch_all(&self.pool)
            .await?;
        Ok(users)
    }
}
