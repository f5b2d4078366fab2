//! End-to-end tests: the real router over the in-memory store.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, HeaderMap, Method, Request, StatusCode};
use axum::Router;
use chrono::{DateTime, Utc};
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use server::store::MemoryStore;
use server::{auth, build_router, AppState, Settings};

fn app() -> Router {
    build_router(AppState::new(
        Arc::new(MemoryStore::new()),
        Settings::default(),
    ))
}

async fn send(
    app: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, Value) {
    let (status, _, bytes) = send_raw(app, method, path, token, body).await;
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn send_raw(
    app: &Router,
    method: Method,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
) -> (StatusCode, HeaderMap, Vec<u8>) {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    let request = match body {
        Some(value) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(value.to_string())),
        None => builder.body(Body::empty()),
    }
    .expect("request builds");

    let response = app.clone().oneshot(request).await.expect("router responds");
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = response
        .into_body()
        .collect()
        .await
        .expect("body collects")
        .to_bytes()
        .to_vec();
    (status, headers, bytes)
}

async fn register(app: &Router, username: &str, password: &str) -> String {
    let (status, body) = send(
        app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "username": username, "password": password })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "register failed: {body}");
    body["token"].as_str().expect("token in response").to_string()
}

async fn create_entry(app: &Router, token: &str, kind: &str, title: &str, body: &str) -> Value {
    let (status, entry) = send(
        app,
        Method::POST,
        "/api/entries",
        Some(token),
        Some(json!({ "kind": kind, "title": title, "body": body })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED, "create failed: {entry}");
    entry
}

#[tokio::test]
async fn register_then_login_returns_verifiable_token() {
    let app = app();
    let token = register(&app, "ann", "pw123456").await;
    let claims = auth::verify_token(&token, "devsecret").expect("register token verifies");
    assert_eq!(claims.username, "ann");

    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "ann", "password": "pw123456" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["username"], "ann");
    auth::verify_token(body["token"].as_str().unwrap(), "devsecret")
        .expect("login token verifies");
}

#[tokio::test]
async fn login_failures_are_indistinguishable() {
    let app = app();
    register(&app, "ann", "pw123456").await;

    let (wrong_pw_status, wrong_pw) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "ann", "password": "nope" })),
    )
    .await;
    let (unknown_status, unknown) = send(
        &app,
        Method::POST,
        "/api/auth/login",
        None,
        Some(json!({ "username": "bob", "password": "nope" })),
    )
    .await;

    assert_eq!(wrong_pw_status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_pw, unknown);
}

#[tokio::test]
async fn duplicate_username_conflicts() {
    let app = app();
    register(&app, "ann", "pw123456").await;
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/auth/register",
        None,
        Some(json!({ "username": "ann", "password": "other" })),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["error"], "username taken");
}

#[tokio::test]
async fn missing_credentials_are_bad_requests() {
    let app = app();
    for body in [
        json!({ "username": "ann" }),
        json!({ "password": "pw" }),
        json!({ "username": "", "password": "pw" }),
        json!({}),
    ] {
        let (status, response) =
            send(&app, Method::POST, "/api/auth/register", None, Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(response["error"].is_string());
    }
}

#[tokio::test]
async fn mutations_require_a_wellformed_bearer_token() {
    let app = app();
    let payload = json!({ "kind": "note", "body": "<p>x</p>" });

    // No header.
    let (status, body) = send(&app, Method::POST, "/api/entries", None, Some(payload.clone())).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "missing auth");

    // Garbage token (two parts, bad signature).
    let (status, body) = send(
        &app,
        Method::POST,
        "/api/entries",
        Some("not-a-token"),
        Some(payload.clone()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["error"], "invalid token");

    // Three space-separated parts is malformed.
    let request = Request::builder()
        .method(Method::POST)
        .uri("/api/entries")
        .header(header::AUTHORIZATION, "Bearer abc def")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();
    let response = app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn create_and_list_worked_example() {
    let app = app();
    let token = register(&app, "ann", "pw123456").await;

    let entry = create_entry(&app, &token, "note", "Hi", "<p>hello</p>").await;
    assert_eq!(entry["kind"], "note");
    assert_eq!(entry["title"], "Hi");
    assert_eq!(entry["body"], "<p>hello</p>");
    assert_eq!(entry["ownerName"], "ann");
    assert!(entry["id"].is_string());
    assert!(entry["createdAt"].is_string());

    let (status, listed) = send(&app, Method::GET, "/api/entries?kind=note", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(listed.as_array().unwrap().len(), 1);
    assert_eq!(listed[0]["id"], entry["id"]);
}

#[tokio::test]
async fn create_rejects_missing_kind_or_body() {
    let app = app();
    let token = register(&app, "ann", "pw123456").await;
    for body in [
        json!({ "kind": "note" }),
        json!({ "body": "<p>x</p>" }),
        json!({ "kind": "note", "body": "" }),
    ] {
        let (status, _) = send(&app, Method::POST, "/api/entries", Some(&token), Some(body)).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}

#[tokio::test]
async fn script_tags_never_reach_storage() {
    let app = app();
    let token = register(&app, "ann", "pw123456").await;

    let entry = create_entry(
        &app,
        &token,
        "note",
        "",
        "<p>fine</p><script>alert(1)</script>",
    )
    .await;
    assert!(!entry["body"].as_str().unwrap().contains("script"));

    let (_, listed) = send(&app, Method::GET, "/api/entries", None, None).await;
    assert!(!listed[0]["body"].as_str().unwrap().contains("script"));

    // A body that is nothing but script sanitizes to nothing and is rejected.
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/entries",
        Some(&token),
        Some(json!({ "kind": "note", "body": "<script>alert(1)</script>" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn list_pages_cap_at_limit_and_skip_exactly() {
    let app = app();
    let token = register(&app, "ann", "pw123456").await;
    create_entry(&app, &token, "note", "first", "<p>one</p>").await;
    tokio::time::sleep(std::time::Duration::from_millis(2)).await;
    create_entry(&app, &token, "note", "second", "<p>two</p>").await;

    let (status, page0) = send(
        &app,
        Method::GET,
        "/api/entries?kind=note&page=0&limit=1",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page0.as_array().unwrap().len(), 1);
    assert_eq!(page0[0]["title"], "second", "newest comes first");

    let (_, page1) = send(
        &app,
        Method::GET,
        "/api/entries?kind=note&page=1&limit=1",
        None,
        None,
    )
    .await;
    assert_eq!(page1.as_array().unwrap().len(), 1);
    assert_eq!(page1[0]["title"], "first");

    let (_, page2) = send(
        &app,
        Method::GET,
        "/api/entries?kind=note&page=2&limit=1",
        None,
        None,
    )
    .await;
    assert!(page2.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn search_is_case_insensitive_substring() {
    let app = app();
    let token = register(&app, "ann", "pw123456").await;
    create_entry(&app, &token, "note", "Hi", "<p>hello</p>").await;

    let (_, hits) = send(&app, Method::GET, "/api/entries?q=HEL", None, None).await;
    assert_eq!(hits.as_array().unwrap().len(), 1);

    let (_, title_hits) = send(&app, Method::GET, "/api/entries?q=hi", None, None).await;
    assert_eq!(title_hits.as_array().unwrap().len(), 1);

    let (_, misses) = send(&app, Method::GET, "/api/entries?q=xyz", None, None).await;
    assert!(misses.as_array().unwrap().is_empty());

    // LIKE metacharacters are literal text.
    let (_, meta) = send(&app, Method::GET, "/api/entries?q=%25", None, None).await;
    assert!(meta.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn unknown_kind_matches_nothing() {
    let app = app();
    let token = register(&app, "ann", "pw123456").await;
    create_entry(&app, &token, "note", "", "<p>hello</p>").await;
    let (status, listed) = send(&app, Method::GET, "/api/entries?kind=essay", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert!(listed.as_array().unwrap().is_empty());
}

#[tokio::test]
async fn only_the_owner_may_edit_or_delete() {
    let app = app();
    let owner = register(&app, "ann", "pw123456").await;
    let intruder = register(&app, "bob", "pw123456").await;
    let entry = create_entry(&app, &owner, "note", "mine", "<p>hello</p>").await;
    let id = entry["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/entries/{id}"),
        Some(&intruder),
        Some(json!({ "title": "stolen" })),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"], "not owner");

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/entries/{id}"),
        Some(&intruder),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/entries/{id}"),
        Some(&owner),
        Some(json!({ "title": "still mine" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "still mine");
}

#[tokio::test]
async fn edit_refreshes_updated_at_and_sanitizes() {
    let app = app();
    let token = register(&app, "ann", "pw123456").await;
    let entry = create_entry(&app, &token, "thought", "t", "<p>before</p>").await;
    let id = entry["id"].as_str().unwrap();
    let before: DateTime<Utc> = entry["updatedAt"].as_str().unwrap().parse().unwrap();

    tokio::time::sleep(std::time::Duration::from_millis(5)).await;
    let (status, updated) = send(
        &app,
        Method::PUT,
        &format!("/api/entries/{id}"),
        Some(&token),
        Some(json!({ "title": "", "body": "<p>after</p><script>x</script>" })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["title"], "", "empty title still replaces");
    assert_eq!(updated["body"], "<p>after</p>");
    assert_eq!(updated["kind"], "thought", "kind is immutable");

    let after: DateTime<Utc> = updated["updatedAt"].as_str().unwrap().parse().unwrap();
    assert!(after >= before);
    assert_eq!(updated["createdAt"], entry["createdAt"]);
}

#[tokio::test]
async fn edit_rejects_bodies_that_sanitize_to_nothing() {
    let app = app();
    let token = register(&app, "ann", "pw123456").await;
    let entry = create_entry(&app, &token, "note", "", "<p>keep me</p>").await;
    let id = entry["id"].as_str().unwrap();

    let (status, body) = send(
        &app,
        Method::PUT,
        &format!("/api/entries/{id}"),
        Some(&token),
        Some(json!({ "body": "<script>alert(1)</script>" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "body required");

    // The stored body is untouched, never blanked.
    let (_, listed) = send(&app, Method::GET, "/api/entries?kind=note", None, None).await;
    assert_eq!(listed[0]["body"], "<p>keep me</p>");
}

#[tokio::test]
async fn edit_of_unknown_or_mangled_id_is_not_found() {
    let app = app();
    let token = register(&app, "ann", "pw123456").await;
    for id in ["00000000-0000-0000-0000-000000000000", "not-a-uuid"] {
        let (status, _) = send(
            &app,
            Method::PUT,
            &format!("/api/entries/{id}"),
            Some(&token),
            Some(json!({ "title": "x" })),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}

#[tokio::test]
async fn delete_acks_once_then_404s() {
    let app = app();
    let token = register(&app, "ann", "pw123456").await;
    let entry = create_entry(&app, &token, "learning", "", "<p>bye</p>").await;
    let id = entry["id"].as_str().unwrap();

    let (status, ack) = send(
        &app,
        Method::DELETE,
        &format!("/api/entries/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(ack["ok"], true);

    let (status, _) = send(
        &app,
        Method::DELETE,
        &format!("/api/entries/{id}"),
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND, "delete is not idempotent");
}

#[tokio::test]
async fn images_roundtrip_as_raw_bytes() {
    let app = app();
    let token = register(&app, "ann", "pw123456").await;

    // 1x1 transparent PNG.
    let data = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";
    let (status, created) = send(
        &app,
        Method::POST,
        "/api/images-json",
        Some(&token),
        Some(json!({ "mime": "image/png", "data": data })),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    let url = created["url"].as_str().unwrap();
    assert_eq!(url, format!("/api/images/{}", created["id"].as_str().unwrap()));

    let (status, headers, bytes) = send_raw(&app, Method::GET, url, None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(headers[header::CONTENT_TYPE], "image/png");
    assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
}

#[tokio::test]
async fn image_upload_requires_auth_and_fields() {
    let app = app();
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/images-json",
        None,
        Some(json!({ "mime": "image/png", "data": "aGk=" })),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let token = register(&app, "ann", "pw123456").await;
    let (status, _) = send(
        &app,
        Method::POST,
        "/api/images-json",
        Some(&token),
        Some(json!({ "mime": "image/png" })),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = send(
        &app,
        Method::GET,
        "/api/images/00000000-0000-0000-0000-000000000000",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}
