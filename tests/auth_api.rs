#[macro_use]
mod helpers;

use actix_web::{http::StatusCode, test};
use helpers::*;
use noteful::auth::JwtKeys;
use serde_json::{json, Value};

#[actix_web::test]
async fn health_check_is_public() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::get().uri("/").to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
}

#[actix_web::test]
async fn register_then_login_then_use_the_token() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({
            "username": "carol",
            "password": "correct horse",
            "fullname": " Carol Danvers ",
        }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    let user: Value = test::read_body_json(res).await;
    assert_eq!(user["username"], "carol");
    assert_eq!(user["fullname"], "Carol Danvers");
    assert!(user.get("password").is_none());

    let req = test::TestRequest::post()
        .uri("/login")
        .set_json(json!({ "username": "carol", "password": "correct horse" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    let token = body["authToken"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/notes")
        .insert_header(bearer(&token))
        .to_request();
    let notes: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(notes, json!([]));
}

#[actix_web::test]
async fn duplicate_usernames_are_rejected() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::post()
        .uri("/users")
        .set_json(json!({ "username": "alice", "password": "another-password" }))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["message"], "The username already exists");
}

#[actix_web::test]
async fn registration_validates_fields() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let cases = [
        (json!({ "password": "password123" }), "Missing username in request body"),
        (
            json!({ "username": " dave", "password": "password123" }),
            "Field: 'username' cannot start or end with whitespace",
        ),
        (
            json!({ "username": "dave", "password": "short" }),
            "Field: 'password' must be at least 8 characters long",
        ),
    ];
    for (body, message) in cases {
        let req = test::TestRequest::post()
            .uri("/users")
            .set_json(body)
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::BAD_REQUEST);
        let body: Value = test::read_body_json(res).await;
        assert_eq!(body["message"], message);
    }
}

#[actix_web::test]
async fn bad_credentials_are_unauthorized() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    for (username, password) in [("alice", "not-her-password"), ("nobody", ALICE_PASSWORD)] {
        let req = test::TestRequest::post()
            .uri("/login")
            .set_json(json!({ "username": username, "password": password }))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED, "{username}");
    }
}

#[actix_web::test]
async fn refresh_issues_a_working_token() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let req = test::TestRequest::post()
        .uri("/refresh")
        .insert_header(bearer(&fixture.alice_token))
        .to_request();
    let res = test::call_service(&app, req).await;
    assert_eq!(res.status(), StatusCode::OK);
    let body: Value = test::read_body_json(res).await;
    let token = body["authToken"].as_str().unwrap();

    let claims = JwtKeys::new(SECRET, 3600).verify(token).unwrap();
    assert_eq!(claims.sub, ALICE_ID);
    assert_eq!(claims.username, "alice");
}

#[actix_web::test]
async fn expired_or_foreign_tokens_are_rejected() {
    let fixture = Fixture::new();
    let app = app!(fixture);

    let expired = JwtKeys::new(SECRET, -3600).issue(ALICE_ID, "alice").unwrap();
    let foreign = JwtKeys::new("some-other-secret", 3600)
        .issue(ALICE_ID, "alice")
        .unwrap();

    for token in [expired, foreign] {
        let req = test::TestRequest::post()
            .uri("/refresh")
            .insert_header(bearer(&token))
            .to_request();
        let res = test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }
}
