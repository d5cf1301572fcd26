use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    // Auth errors
    #[error("invalid email or password")]
    LoginFail,
    #[error("no auth token found")]
    AuthFailNoToken,
    #[error("auth token wrong format")]
    AuthFailTokenWrongFormat,
    #[error("invalid or expired token")]
    AuthFailInvalidToken,
    #[error("token subject no longer exists")]
    AuthFailUserGone,
    #[error("auth context missing")]
    AuthFailCtxNotInRequestExt,

    // Domain errors
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    Conflict(String),
    #[error("{0} not found")]
    NotFound(&'static str),

    // Generic
    #[error("internal error: {0}")]
    Internal(String),
}

pub type Result<T> = core::result::Result<T, Error>;

impl IntoResponse for Error {
    fn into_response(self) -> Response {
        let status = match &self {
            Error::LoginFail
            | Error::AuthFailNoToken
            | Error::AuthFailTokenWrongFormat
            | Error::AuthFailInvalidToken
            | Error::AuthFailUserGone => StatusCode::UNAUTHORIZED,
            Error::Validation(_) | Error::Conflict(_) => StatusCode::BAD_REQUEST,
            Error::NotFound(_) => StatusCode::NOT_FOUND,
            Error::AuthFailCtxNotInRequestExt | Error::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        };

        let body = Json(json!({
            "error": {
                "message": self.to_string()
            }
        }));

        (status, body).into_response()
    }
}

// Allow conversion from other errors (e.g., anyhow, sqlx) easiest via string
impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Internal(err.to_string())
    }
}

impl From<sqlx::Error> for Error {
    fn from(err: sqlx::Error) -> Self {
        // A lost uniqueness race must surface as a conflict, not a 500.
        if let sqlx::Error::Database(db) = &err {
            if db.is_unique_violation() {
                return Error::Conflict("record already exists".to_string());
            }
        }
        Error::Internal(err.to_string())
    }
}

impl From<bcrypt::BcryptError> for Error {
    fn from(err: bcrypt::BcryptError) -> Self {
        Error::Internal(err.to_string())
    }
}
