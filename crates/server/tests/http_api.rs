//! Router-level checks: auth flow, session guard, ownership stamping.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tempfile::{tempdir, TempDir};
use tower::ServiceExt;

use server::auth::token::TokenManager;
use server::auth::AuthManager;
use server::config::{AppState, ServerConfig};
use server::router::router;
use server::store::{self, TeamStore};

async fn test_app() -> (TempDir, axum::Router) {
    let dir = tempdir().unwrap();
    let url = format!("sqlite://{}", dir.path().join("api.db").display());

    let config = ServerConfig {
        database_url: url.clone(),
        port: 0,
        jwt_secret: "http-test-secret".to_string(),
        token_ttl_minutes: 30,
    };

    let pool = store::connect(&url).await.unwrap();
    let auth = Arc::new(AuthManager::new(pool.clone()).await.unwrap());
    let tokens = Arc::new(TokenManager::new(
        &config.jwt_secret,
        config.token_ttl_minutes,
    ));
    let team = Arc::new(TeamStore::new(pool).await.unwrap());

    let app = router(AppState {
        config,
        auth,
        tokens,
        store: team,
    });
    (dir, app)
}

fn json_request(method: &str, uri: &str, token: Option<&str>, body: Value) -> Request<Body> {
    let mut builder = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::from(body.to_string())).unwrap()
}

fn get_request(uri: &str, token: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    builder.body(Body::empty()).unwrap()
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

async fn register(app: &axum::Router, username: &str, email: &str) -> (String, i64) {
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({"username": username, "email": email, "password": "pw123"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    let token = body["access_token"].as_str().unwrap().to_string();
    let id = body["user"]["id"].as_i64().unwrap();
    (token, id)
}

#[tokio::test]
async fn register_login_me_roundtrip() {
    let (_dir, app) = test_app().await;

    let (token, id) = register(&app, "alice", "alice@x.com").await;

    let resp = app
        .clone()
        .oneshot(get_request("/api/auth/me", Some(&token)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let me = body_json(resp).await;
    assert_eq!(me["id"].as_i64().unwrap(), id);
    assert_eq!(me["username"], "alice");
    assert!(me.get("password_hash").is_none(), "hash must not serialize");

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": "alice@x.com", "password": "pw123"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let body = body_json(resp).await;
    assert_eq!(body["user"]["status"], "online");

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/login",
            None,
            json!({"email": "alice@x.com", "password": "nope"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn duplicate_email_registration_is_rejected() {
    let (_dir, app) = test_app().await;

    register(&app, "alice", "alice@x.com").await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/auth/register",
            None,
            json!({"username": "alice2", "email": "alice@x.com", "password": "pw123"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = body_json(resp).await;
    assert!(body["error"]["message"]
        .as_str()
        .unwrap()
        .contains("already registered"));
}

#[tokio::test]
async fn protected_routes_require_a_valid_token() {
    let (_dir, app) = test_app().await;

    let resp = app
        .clone()
        .oneshot(get_request("/api/auth/me", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let resp = app
        .clone()
        .oneshot(get_request("/api/tasks", Some("garbage")))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Signed with some other process's key
    let foreign = TokenManager::new("not-the-server-key", 30).issue(1).unwrap();
    let resp = app
        .clone()
        .oneshot(get_request("/api/tasks", Some(&foreign)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    // Valid signature but the subject user does not exist
    let orphan = TokenManager::new("http-test-secret", 30).issue(777).unwrap();
    let resp = app
        .clone()
        .oneshot(get_request("/api/tasks", Some(&orphan)))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn task_creator_is_stamped_from_the_caller() {
    let (_dir, app) = test_app().await;

    let (token, id) = register(&app, "bob", "bob@x.com").await;

    // A creator_id in the body is ignored
    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tasks",
            Some(&token),
            json!({"title": "write docs", "creator_id": 999}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let task = body_json(resp).await;
    assert_eq!(task["creator_id"].as_i64().unwrap(), id);
    assert_eq!(task["status"], "pending");
    assert_eq!(task["priority"], "medium");
}

#[tokio::test]
async fn put_applies_partial_updates() {
    let (_dir, app) = test_app().await;

    let (token, _id) = register(&app, "carol", "carol@x.com").await;

    let resp = app
        .clone()
        .oneshot(json_request(
            "POST",
            "/api/tasks",
            Some(&token),
            json!({"title": "fix flaky test", "description": "ci keeps failing", "priority": "high"}),
        ))
        .await
        .unwrap();
    let task = body_json(resp).await;
    let task_id = task["id"].as_i64().unwrap();

    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/tasks/{task_id}"),
            Some(&token),
            json!({"status": "completed"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let updated = body_json(resp).await;
    assert_eq!(updated["status"], "completed");
    assert_eq!(updated["title"], "fix flaky test");
    assert_eq!(updated["description"], "ci keeps failing");
    assert_eq!(updated["priority"], "high");

    // Unknown enum value never reaches the store
    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            &format!("/api/tasks/{task_id}"),
            Some(&token),
            json!({"status": "bogus"}),
        ))
        .await
        .unwrap();
    assert!(resp.status().is_client_error());

    // Missing task is a 404
    let resp = app
        .clone()
        .oneshot(json_request(
            "PUT",
            "/api/tasks/99999",
            Some(&token),
            json!({"status": "completed"}),
        ))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn health_is_public() {
    let (_dir, app) = test_app().await;

    let resp = app
        .clone()
        .oneshot(get_request("/health", None))
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
}
