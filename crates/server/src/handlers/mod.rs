//! HTTP endpoint layer for the domain entities.
//!
//! Request DTOs live next to the handlers that consume them, the way the
//! auth handlers do.

pub mod announcements;
pub mod comments;
pub mod files;
pub mod tasks;

use serde::Deserialize;

/// skip/limit pagination query
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Pagination {
    #[serde(default)]
    pub skip: i64,
    #[serde(default = "default_limit")]
    pub limit: i64,
}

pub(crate) fn default_limit() -> i64 {
    100
}
