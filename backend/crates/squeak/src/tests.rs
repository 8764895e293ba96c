//! Router-level tests over the in-memory store

use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::{HeaderMap, Method, Request, StatusCode, header};
use serde_json::{Value, json};
use tower::ServiceExt;

use crate::application::config::AuthConfig;
use crate::infra::memory::MemorySqueakStore;
use crate::presentation::router::squeak_router;

struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Value,
}

impl TestResponse {
    fn set_cookie(&self) -> Option<&str> {
        self.headers
            .get(header::SET_COOKIE)
            .and_then(|v| v.to_str().ok())
    }

    /// `name=value` part of Set-Cookie, ready to send back as Cookie
    fn cookie_pair(&self) -> String {
        let set_cookie = self.set_cookie().expect("response sets a cookie");
        set_cookie
            .split(';')
            .next()
            .unwrap_or_default()
            .to_string()
    }
}

fn app() -> Router {
    squeak_router(MemorySqueakStore::new(), AuthConfig::development())
}

async fn send(
    app: &Router,
    method: Method,
    uri: &str,
    body: Option<Value>,
    extra_header: Option<(header::HeaderName, String)>,
) -> TestResponse {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some((name, value)) = extra_header {
        builder = builder.header(name, value);
    }

    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body.to_string()))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let headers = response.headers().clone();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    TestResponse {
        status,
        headers,
        body,
    }
}

async fn register(app: &Router, username: &str, email: &str, password: &str) -> TestResponse {
    send(
        app,
        Method::POST,
        "/register",
        Some(json!({ "username": username, "email": email, "password": password })),
        None,
    )
    .await
}

async fn login(app: &Router, username: &str, password: &str) -> TestResponse {
    send(
        app,
        Method::POST,
        "/login",
        Some(json!({ "username": username, "password": password })),
        None,
    )
    .await
}

async fn post_as(app: &Router, username: &str, text: &str, cookie: Option<String>) -> TestResponse {
    send(
        app,
        Method::POST,
        &format!("/users/{}", username),
        Some(json!({ "text": text })),
        cookie.map(|c| (header::COOKIE, c)),
    )
    .await
}

async fn squeaks_of(app: &Router, username: &str) -> TestResponse {
    send(app, Method::GET, &format!("/users/{}", username), None, None).await
}

fn texts(body: &Value) -> Vec<String> {
    body.as_array()
        .expect("feed is an array")
        .iter()
        .map(|s| s["text"].as_str().unwrap().to_string())
        .collect()
}

#[tokio::test]
async fn test_register_login_post_scenario() {
    let app = app();

    let registered = register(&app, "Harrison", "h@example.com", "secret1").await;
    assert_eq!(registered.status, StatusCode::CREATED);
    assert_eq!(registered.body, json!({ "id": 1 }));

    let logged_in = login(&app, "Harrison", "secret1").await;
    assert_eq!(logged_in.status, StatusCode::OK);
    let set_cookie = logged_in.set_cookie().unwrap();
    assert!(set_cookie.starts_with("Authorization="));
    assert!(set_cookie.contains("HttpOnly"));
    assert!(set_cookie.contains("Max-Age=2592000"));
    assert_eq!(logged_in.body["username"], "Harrison");
    let cookie = logged_in.cookie_pair();

    let posted = post_as(&app, "Harrison", "Great, kid, don't get cocky.", Some(cookie)).await;
    assert_eq!(posted.status, StatusCode::ACCEPTED);
    assert_eq!(posted.body, json!({ "squeakCount": 1 }));

    let rejected = post_as(&app, "Harrison", "Great, kid, don't get cocky.", None).await;
    assert_eq!(rejected.status, StatusCode::UNAUTHORIZED);

    let feed = squeaks_of(&app, "Harrison").await;
    assert_eq!(feed.status, StatusCode::OK);
    assert_eq!(texts(&feed.body), ["Great, kid, don't get cocky."]);
}

#[tokio::test]
async fn test_duplicate_registration_names_fields() {
    let app = app();
    register(&app, "Mark", "m@example.com", "secret1").await;

    let dup_name = register(&app, "Mark", "other@example.com", "secret1").await;
    assert_eq!(dup_name.status, StatusCode::CONFLICT);
    assert_eq!(dup_name.body["details"]["fields"], json!(["username"]));

    let dup_both = register(&app, "Mark", "M@example.com", "secret1").await;
    assert_eq!(dup_both.status, StatusCode::CONFLICT);
    assert_eq!(
        dup_both.body["details"]["fields"],
        json!(["username", "email"])
    );

    let userbase = send(&app, Method::GET, "/userbase", None, None).await;
    assert_eq!(userbase.body.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_invalid_registration_payloads() {
    let app = app();

    let short_password = register(&app, "Mark", "m@example.com", "12345").await;
    assert_eq!(short_password.status, StatusCode::BAD_REQUEST);

    let bad_email = register(&app, "Mark", "not-an-email", "secret1").await;
    assert_eq!(bad_email.status, StatusCode::BAD_REQUEST);

    let bad_name = register(&app, "Han Solo", "hs@example.com", "secret1").await;
    assert_eq!(bad_name.status, StatusCode::BAD_REQUEST);

    let missing_field = send(
        &app,
        Method::POST,
        "/register",
        Some(json!({ "username": "Mark" })),
        None,
    )
    .await;
    assert_eq!(missing_field.status, StatusCode::BAD_REQUEST);

    let userbase = send(&app, Method::GET, "/userbase", None, None).await;
    assert_eq!(userbase.body, json!([]));
}

#[tokio::test]
async fn test_login_failures_are_indistinguishable() {
    let app = app();
    register(&app, "Harrison", "h@example.com", "secret1").await;

    let wrong_password = login(&app, "Harrison", "secret1x").await;
    let unknown_user = login(&app, "Luke", "secret1").await;

    assert_eq!(wrong_password.status, StatusCode::UNAUTHORIZED);
    assert_eq!(unknown_user.status, StatusCode::UNAUTHORIZED);
    assert_eq!(wrong_password.body, unknown_user.body);
    assert!(wrong_password.set_cookie().is_none());
    assert!(unknown_user.set_cookie().is_none());
}

#[tokio::test]
async fn test_token_for_one_user_cannot_post_as_another() {
    let app = app();
    register(&app, "Mark", "m@example.com", "secret1").await;
    register(&app, "Harrison", "h@example.com", "secret2").await;

    let mark_cookie = login(&app, "Mark", "secret1").await.cookie_pair();

    let forbidden = post_as(&app, "Harrison", "I don't believe it!", Some(mark_cookie)).await;
    assert_eq!(forbidden.status, StatusCode::FORBIDDEN);

    let feed = squeaks_of(&app, "Harrison").await;
    assert_eq!(feed.body, json!([]));
}

#[tokio::test]
async fn test_padded_path_resolves_like_the_feed() {
    let app = app();
    register(&app, "Harrison", "h@example.com", "secret1").await;
    let cookie = login(&app, "Harrison", "secret1").await.cookie_pair();

    let posted = post_as(&app, "%20Harrison", "I don't believe it!", Some(cookie.clone())).await;
    assert_eq!(posted.status, StatusCode::ACCEPTED);
    assert_eq!(posted.body, json!({ "squeakCount": 1 }));

    let feed = squeaks_of(&app, "%20Harrison").await;
    assert_eq!(texts(&feed.body), ["I don't believe it!"]);

    let invalid = post_as(&app, "%20", "I don't believe it!", Some(cookie)).await;
    assert_eq!(invalid.status, StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn test_bearer_header_is_accepted() {
    let app = app();
    register(&app, "Mark", "m@example.com", "secret1").await;
    let cookie = login(&app, "Mark", "secret1").await.cookie_pair();
    let token = cookie.trim_start_matches("Authorization=").to_string();

    let posted = send(
        &app,
        Method::POST,
        "/users/Mark",
        Some(json!({ "text": "I don't believe it!" })),
        Some((header::AUTHORIZATION, format!("Bearer {}", token))),
    )
    .await;
    assert_eq!(posted.status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_tampered_token_rejected() {
    let app = app();
    register(&app, "Mark", "m@example.com", "secret1").await;
    let cookie = login(&app, "Mark", "secret1").await.cookie_pair();

    let mut tampered = cookie.clone();
    let last = tampered.pop().unwrap();
    tampered.push(if last == 'A' { 'B' } else { 'A' });

    let rejected = post_as(&app, "Mark", "I don't believe it!", Some(tampered)).await;
    assert_eq!(rejected.status, StatusCode::UNAUTHORIZED);

    let garbage = post_as(
        &app,
        "Mark",
        "I don't believe it!",
        Some("Authorization=garbage".to_string()),
    )
    .await;
    assert_eq!(garbage.status, StatusCode::UNAUTHORIZED);
    assert_eq!(rejected.body, garbage.body);
}

#[tokio::test]
async fn test_expired_token_rejected() {
    use crate::application::token::TokenService;
    use chrono::{Duration, Utc};
    use std::sync::Arc;

    let config = AuthConfig::development();
    let tokens = TokenService::new(Arc::new(config.clone()));
    let app = squeak_router(MemorySqueakStore::new(), config);
    register(&app, "Mark", "m@example.com", "secret1").await;

    let stale = tokens
        .issue_at("Mark", Utc::now() - Duration::days(31))
        .unwrap();
    let fresh = tokens.issue("Mark").unwrap();

    let rejected = post_as(
        &app,
        "Mark",
        "I don't believe it!",
        Some(format!("Authorization={}", stale.token)),
    )
    .await;
    assert_eq!(rejected.status, StatusCode::UNAUTHORIZED);

    let accepted = post_as(
        &app,
        "Mark",
        "I don't believe it!",
        Some(format!("Authorization={}", fresh.token)),
    )
    .await;
    assert_eq!(accepted.status, StatusCode::ACCEPTED);
}

#[tokio::test]
async fn test_token_for_unknown_subject_rejected() {
    use crate::application::token::TokenService;
    use std::sync::Arc;

    let config = AuthConfig::development();
    let tokens = TokenService::new(Arc::new(config.clone()));
    let app = squeak_router(MemorySqueakStore::new(), config);

    let ghost = tokens.issue("Ghost").unwrap();
    let rejected = post_as(
        &app,
        "Ghost",
        "boo",
        Some(format!("Authorization={}", ghost.token)),
    )
    .await;
    assert_eq!(rejected.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_posts_keep_append_order() {
    let app = app();
    register(&app, "Harrison", "h@example.com", "secret1").await;
    let cookie = login(&app, "Harrison", "secret1").await.cookie_pair();

    for (i, text) in ["a", "b", "c"].into_iter().enumerate() {
        let posted = post_as(&app, "Harrison", text, Some(cookie.clone())).await;
        assert_eq!(posted.body["squeakCount"], json!(i + 1));
    }

    assert_eq!(texts(&squeaks_of(&app, "Harrison").await.body), ["a", "b", "c"]);
}

#[tokio::test]
async fn test_feed_of_unknown_user_is_not_found() {
    let app = app();
    let feed = squeaks_of(&app, "Nobody").await;
    assert_eq!(feed.status, StatusCode::NOT_FOUND);
    assert_eq!(feed.body["status"], 404);
}

#[tokio::test]
async fn test_userbase_lists_accounts_with_squeaks() {
    let app = app();
    register(&app, "Mark", "m@example.com", "secret1").await;
    register(&app, "Harrison", "h@example.com", "secret2").await;

    let mark = login(&app, "Mark", "secret1").await.cookie_pair();
    let harrison = login(&app, "Harrison", "secret2").await.cookie_pair();
    post_as(&app, "Mark", "I don't believe it!", Some(mark)).await;
    post_as(&app, "Harrison", "Laugh it up, fuzzball!", Some(harrison)).await;

    let userbase = send(&app, Method::GET, "/userbase", None, None).await;
    assert_eq!(userbase.status, StatusCode::OK);

    let entries = userbase.body.as_array().unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0]["id"], 1);
    assert_eq!(entries[0]["username"], "Mark");
    assert_eq!(texts(&entries[0]["squeaks"]), ["I don't believe it!"]);
    assert_eq!(entries[1]["username"], "Harrison");
    assert_eq!(texts(&entries[1]["squeaks"]), ["Laugh it up, fuzzball!"]);

    // Credentials never leave the store
    for entry in entries {
        assert!(entry.get("email").is_none());
        assert!(entry.get("password").is_none());
        assert!(entry.get("passwordHash").is_none());
    }
}

#[tokio::test]
async fn test_logout_clears_cookie() {
    let app = app();
    let response = send(&app, Method::POST, "/logout", None, None).await;

    assert_eq!(response.status, StatusCode::NO_CONTENT);
    let set_cookie = response.set_cookie().unwrap();
    assert!(set_cookie.starts_with("Authorization=;"));
    assert!(set_cookie.contains("Max-Age=0"));
}
