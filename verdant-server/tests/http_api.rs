//! HTTP surface tests
//!
//! Drives the assembled router with `tower::ServiceExt::oneshot`, so the
//! auth middleware, extractors and response envelopes are all in play.

mod common;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode, header};
use http_body_util::BodyExt;
use serde_json::Value;
use tower::ServiceExt;
use verdant_server::build_router;

const BOUNDARY: &str = "verdant-test-boundary";

async fn test_router() -> (tempfile::TempDir, Router) {
    let (dir, state) = common::test_state().await;
    (dir, build_router(state))
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn multipart_text(buf: &mut Vec<u8>, name: &str, value: &str) {
    buf.extend_from_slice(
        format!("--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
            .as_bytes(),
    );
}

fn multipart_file(buf: &mut Vec<u8>, name: &str, content: &[u8]) {
    buf.extend_from_slice(
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{name}.png\"\r\nContent-Type: application/octet-stream\r\n\r\n"
        )
        .as_bytes(),
    );
    buf.extend_from_slice(content);
    buf.extend_from_slice(b"\r\n");
}

/// A complete adult registration request body.
fn register_body(username: &str, dob: &str) -> Vec<u8> {
    let mut buf = Vec::new();
    multipart_text(&mut buf, "username", username);
    multipart_text(&mut buf, "email", &format!("{username}@example.com"));
    multipart_text(&mut buf, "password", "correct horse battery");
    multipart_text(&mut buf, "date_of_birth", dob);
    multipart_text(&mut buf, "reentry_code", "482913");
    multipart_file(&mut buf, "id_front", b"front image bytes");
    multipart_file(&mut buf, "id_back", b"back image bytes");
    buf.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    buf
}

fn register_request(body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/api/auth/register")
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(body))
        .unwrap()
}

#[tokio::test]
async fn health_is_public() {
    let (_dir, router) = test_router().await;

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn protected_routes_require_a_token() {
    let (_dir, router) = test_router().await;

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/transactions")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    let json = body_json(response).await;
    assert_eq!(json["code"], "E3001");
}

#[tokio::test]
async fn register_then_login_round_trip() {
    let (_dir, router) = test_router().await;

    let dob = common::born_years_ago(30).format("%Y-%m-%d").to_string();
    let response = router
        .clone()
        .oneshot(register_request(register_body("alice", &dob)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["status"], "pending");
    assert_eq!(json["requires_medical"], false);
    assert!(json["token"].as_str().is_some_and(|t| !t.is_empty()));

    // The fresh credentials work against the login endpoint.
    let login = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"username":"alice","password":"correct horse battery"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::OK);
    let login_json = body_json(login).await;
    let token = login_json["token"].as_str().unwrap().to_string();

    // And the token opens /api/auth/me.
    let me = router
        .oneshot(
            Request::builder()
                .uri("/api/auth/me")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(me.status(), StatusCode::OK);
    let me_json = body_json(me).await;
    assert_eq!(me_json["username"], "alice");
    assert_eq!(me_json["principal"], "member");
}

#[tokio::test]
async fn law_enforcement_registration_gets_policy_403() {
    let (_dir, router) = test_router().await;

    let dob = common::born_years_ago(30).format("%Y-%m-%d").to_string();
    let mut body = register_body("officer", &dob);
    // Splice the declaration in before the closing boundary.
    let closing = format!("--{BOUNDARY}--\r\n");
    body.truncate(body.len() - closing.len());
    multipart_text(&mut body, "law_enforcement", "true");
    body.extend_from_slice(closing.as_bytes());

    let response = router.oneshot(register_request(body)).await.unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    let json = body_json(response).await;
    assert_eq!(json["code"], "E2002");
}

#[tokio::test]
async fn wrong_password_is_rejected_uniformly() {
    let (_dir, router) = test_router().await;

    let dob = common::born_years_ago(30).format("%Y-%m-%d").to_string();
    router
        .clone()
        .oneshot(register_request(register_body("bob", &dob)))
        .await
        .unwrap();

    for body in [
        r#"{"username":"bob","password":"wrong"}"#,
        r#"{"username":"nobody","password":"wrong"}"#,
    ] {
        let response = router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(body))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }
}

#[tokio::test]
async fn admin_appends_a_note_over_http() {
    let (_dir, state) = common::test_state().await;
    let router = build_router(state.clone());

    // Seed a paid order directly; the HTTP part under test is the
    // admin side.
    let member = common::approved_member(&state, "noted").await;
    let tea = common::seed_product(state.pool(), "Tea Tin", 10.0, 10).await;
    common::seed_admin(state.pool(), "deskclerk").await;
    let created = verdant_server::transactions::create_transaction(
        state.pool(),
        member.member.id,
        &[shared::client::CartItemInput {
            product_id: tea.id,
            quantity: 1,
        }],
        shared::models::PaymentMethod::InApp,
    )
    .await
    .expect("create");

    let login = router
        .clone()
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/api/auth/admin/login")
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(
                    r#"{"username":"deskclerk","password":"admin password"}"#,
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(login.status(), StatusCode::OK);
    let token = body_json(login).await["token"].as_str().unwrap().to_string();

    let response = router
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!(
                    "/api/admin/transactions/{}/notes",
                    created.payment_code
                ))
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(r#"{"note":"customer called ahead"}"#))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["payment_code"], created.payment_code);
    assert_eq!(json["notes"], "customer called ahead");
}

#[tokio::test]
async fn member_token_cannot_reach_admin_routes() {
    let (_dir, router) = test_router().await;

    let dob = common::born_years_ago(30).format("%Y-%m-%d").to_string();
    let response = router
        .clone()
        .oneshot(register_request(register_body("carol", &dob)))
        .await
        .unwrap();
    let token = body_json(response).await["token"].as_str().unwrap().to_string();

    let response = router
        .oneshot(
            Request::builder()
                .uri("/api/admin/verifications")
                .header(header::AUTHORIZATION, format!("Bearer {token}"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}
