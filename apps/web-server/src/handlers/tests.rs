use std::sync::Arc;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use serde_json::{Value, json};

use quill_core::domain::User;
use quill_core::ports::TokenClaims;
use quill_infra::{JwtConfig, JwtTokenService};

use super::configure_routes;
use crate::state::AppState;

fn state() -> AppState {
    let tokens = JwtTokenService::new(JwtConfig {
        secret: "handler-test-secret".to_string(),
        issuer: "quill-test".to_string(),
        ..Default::default()
    })
    .unwrap();
    AppState::in_memory(Arc::new(tokens), 6)
}

fn bearer(state: &AppState, email: &str) -> String {
    let user = User::new(email, "Test Writer");
    format!("Bearer {}", state.tokens.generate_token(&user).unwrap())
}

/// Provision an administrator the way a provider token would, then sign in locally.
async fn admin_bearer(state: &AppState, email: &str) -> String {
    let claims = TokenClaims {
        email: email.to_string(),
        given_name: Some("Site Admin".to_string()),
        roles: vec!["admin".to_string()],
        from_provider: true,
        ..Default::default()
    };
    state.services.users.resolve_identity(&claims).await.unwrap();
    bearer(state, email)
}

macro_rules! app {
    ($state:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($state.clone()))
                .configure(configure_routes),
        )
        .await
    };
}

#[actix_rt::test]
async fn test_health() {
    let state = state();
    let app = app!(state);

    let res = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;

    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["storage"], "memory");
}

#[actix_rt::test]
async fn test_publishing_requires_a_token() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/user/create-post")
        .set_json(json!({ "title": "Hello", "content": "World content long enough" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["status"], 401);
}

#[actix_rt::test]
async fn test_publish_then_read_article() {
    let state = state();
    let app = app!(state);
    let token = bearer(&state, "writer@example.com");

    let req = test::TestRequest::post()
        .uri("/user/create-post")
        .insert_header(("Authorization", token.clone()))
        .set_json(json!({ "title": "Hello", "content": "World content long enough" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(res).await;
    assert_eq!(created["message"], "Article published");
    let id = created["data"]["id"].as_i64().unwrap();
    assert!(created["data"]["published_at"].is_string());

    let req = test::TestRequest::get()
        .uri(&format!("/user/article/{id}"))
        .insert_header(("Authorization", token))
        .to_request();
    let own: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(own["data"]["title"], "Hello");
    assert_eq!(own["data"]["can_edit"], true);
    assert_eq!(own["data"]["comment_count"], 0);

    let req = test::TestRequest::get()
        .uri(&format!("/user/article/{id}"))
        .to_request();
    let anonymous: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(anonymous["data"]["can_edit"], false);
}

#[actix_rt::test]
async fn test_invalid_post_lists_every_rule() {
    let state = state();
    let app = app!(state);
    let token = bearer(&state, "writer@example.com");

    let req = test::TestRequest::post()
        .uri("/user/create-post")
        .insert_header(("Authorization", token))
        .set_json(json!({ "title": " ", "content": "" }))
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert!(body["errors"].as_array().unwrap().len() >= 2);
}

#[actix_rt::test]
async fn test_article_search_and_paging() {
    let state = state();
    let app = app!(state);
    let token = bearer(&state, "writer@example.com");
    for (title, content) in [
        ("Rust ownership", "Borrowing explained in depth"),
        ("Gardening", "Tomatoes need plenty of sun"),
    ] {
        let req = test::TestRequest::post()
            .uri("/user/create-post")
            .insert_header(("Authorization", token.clone()))
            .set_json(json!({ "title": title, "content": content }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
    }

    let req = test::TestRequest::get().uri("/articles?q=RUST").to_request();
    let found: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(found["data"]["query"], "RUST");
    assert_eq!(found["data"]["results"]["total_items"], 1);
    assert_eq!(found["data"]["results"]["items"][0]["title"], "Rust ownership");

    let req = test::TestRequest::get().uri("/articles?q=cobol").to_request();
    let none: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(none["data"]["results"]["total_items"], 0);
    assert!(none["message"].is_string());

    let req = test::TestRequest::get().uri("/articles?page=-1").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let req = test::TestRequest::get().uri("/").to_request();
    let home: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(home["data"]["latest_posts"].as_array().unwrap().len(), 2);
}

#[actix_rt::test]
async fn test_admin_routes_require_admin_role() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::get()
        .uri("/admin")
        .insert_header(("Authorization", bearer(&state, "reader@example.com")))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/admin")
        .insert_header(("Authorization", admin_bearer(&state, "admin@example.com").await))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["data"]["users"], 2);
}

#[actix_rt::test]
async fn test_contact_message_moderation() {
    let state = state();
    let app = app!(state);
    let admin = admin_bearer(&state, "admin@example.com").await;

    let req = test::TestRequest::post()
        .uri("/contact")
        .set_json(json!({
            "name": "Jane Doe",
            "email": "jane@example.com",
            "subject": "Hello there",
            "content": "I enjoyed your latest article",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let sent: Value = test::read_body_json(res).await;
    let id = sent["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri(&format!("/admin/messages/{id}/read"))
        .insert_header(("Authorization", admin.clone()))
        .to_request();
    let read: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(read["data"]["read"], true);

    let req = test::TestRequest::get()
        .uri("/admin/messages?unread=true")
        .insert_header(("Authorization", admin.clone()))
        .to_request();
    let unread: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(unread["data"]["unread_count"], 0);
    assert_eq!(unread["data"]["messages"].as_array().unwrap().len(), 0);

    let req = test::TestRequest::delete()
        .uri("/admin/messages/9999")
        .insert_header(("Authorization", admin))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
}

#[actix_rt::test]
async fn test_only_author_may_delete_article() {
    let state = state();
    let app = app!(state);
    let author = bearer(&state, "writer@example.com");
    let stranger = bearer(&state, "other@example.com");

    let req = test::TestRequest::post()
        .uri("/user/create-post")
        .insert_header(("Authorization", author.clone()))
        .set_json(json!({ "title": "Mine", "content": "Only I may delete this" }))
        .to_request();
    let created: Value = test::call_and_read_body_json(&app, req).await;
    let id = created["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/user/article/{id}"))
        .insert_header(("Authorization", stranger))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::delete()
        .uri(&format!("/user/article/{id}"))
        .insert_header(("Authorization", author))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
}

#[actix_rt::test]
async fn test_local_register_login_and_me() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/api/auth/register")
        .set_json(json!({
            "email": "local@example.com",
            "name": "Local User",
            "password": "s3cret-password",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "local@example.com", "password": "s3cret-password" }))
        .to_request();
    let login: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(login["token_type"], "Bearer");
    let token = login["access_token"].as_str().unwrap();

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", format!("Bearer {token}")))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["data"]["email"], "local@example.com");
    assert_eq!(me["data"]["role"], "REGULAR_USER");

    let req = test::TestRequest::post()
        .uri("/api/auth/login")
        .set_json(json!({ "email": "local@example.com", "password": "wrong-password" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_rt::test]
async fn test_malformed_json_is_bad_request() {
    let state = state();
    let app = app!(state);

    let req = test::TestRequest::post()
        .uri("/contact")
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let res = test::call_service(&app, req).await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
}

#[actix_rt::test]
async fn test_locally_signed_admin_role_is_not_trusted() {
    let state = state();
    let app = app!(state);
    let mut forged = User::new("mallory@example.com", "Mallory Smith");
    forged.role = quill_core::domain::Role::Admin;
    let token = format!("Bearer {}", state.tokens.generate_token(&forged).unwrap());

    let req = test::TestRequest::get()
        .uri("/admin")
        .insert_header(("Authorization", token))
        .to_request();

    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
}

#[actix_rt::test]
async fn test_invalid_profile_update_writes_nothing() {
    let state = state();
    let app = app!(state);
    let token = bearer(&state, "writer@example.com");

    let req = test::TestRequest::put()
        .uri("/user/profile")
        .insert_header(("Authorization", token.clone()))
        .set_json(json!({ "name": "Renamed Person", "bio": "b".repeat(501) }))
        .to_request();
    assert_eq!(
        test::call_service(&app, req).await.status(),
        StatusCode::UNPROCESSABLE_ENTITY
    );

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", token))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["data"]["name"], "Test Writer");
}
