mod common;

use actix_web::http::{StatusCode, header};
use actix_web::test;
use blogicum_server::app;
use common::{TestContext, location};
use serde_json::{Value, json};

#[actix_web::test]
async fn registration_issues_a_working_token() {
    let ctx = TestContext::new();
    let app = test::init_service(app(ctx.services.clone())).await;

    let req = test::TestRequest::post()
        .uri("/auth/registration/")
        .set_json(json!({"username": "ann", "email": "Ann@Example.com", "password": "correct horse"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["token_type"], "Bearer");
    assert_eq!(body["expires_in"], 24 * 3600);
    let token = body["access_token"].as_str().unwrap().to_string();

    let req = test::TestRequest::get()
        .uri("/edit_profile/")
        .insert_header((header::AUTHORIZATION, format!("Bearer {token}")))
        .to_request();
    let form: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(form["username"], "ann");
    assert_eq!(form["email"], "ann@example.com");

    let req = test::TestRequest::post()
        .uri("/auth/registration/")
        .set_json(json!({"username": "ann", "password": "another one"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
}

#[actix_web::test]
async fn registration_validates_fields() {
    let ctx = TestContext::new();
    let app = test::init_service(app(ctx.services.clone())).await;

    let req = test::TestRequest::post()
        .uri("/auth/registration/")
        .set_json(json!({"username": "no spaces", "password": "short"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["details"]["fields"]["username"].is_array());
    assert!(body["details"]["fields"]["password"].is_array());
}

#[actix_web::test]
async fn login_checks_the_password() {
    let ctx = TestContext::new();
    ctx.services
        .auth
        .register("ann".into(), String::new(), "correct horse".into())
        .await
        .unwrap();
    let app = test::init_service(app(ctx.services.clone())).await;

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_json(json!({"username": "ann", "password": "wrong horse"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);

    let req = test::TestRequest::post()
        .uri("/auth/login/")
        .set_json(json!({"username": "ann", "password": "correct horse"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn bad_token_counts_as_anonymous() {
    let ctx = TestContext::new();
    let app = test::init_service(app(ctx.services.clone())).await;

    let req = test::TestRequest::get()
        .uri("/edit_profile/")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=%2Fedit_profile%2F");

    let req = test::TestRequest::get()
        .uri("/")
        .insert_header((header::AUTHORIZATION, "Bearer not-a-jwt"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn token_of_a_deleted_user_is_ignored() {
    let ctx = TestContext::new();
    let ann = ctx.member("ann").await;
    ctx.repos.users.delete(ann.user.id).await.unwrap();
    let app = test::init_service(app(ctx.services.clone())).await;

    let req = test::TestRequest::get()
        .uri("/posts/create/")
        .insert_header(ann.auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(location(&resp).starts_with("/auth/login/"));
}

#[actix_web::test]
async fn profile_edit_renames_and_rejects_taken_names() {
    let ctx = TestContext::new();
    let ann = ctx.member("ann").await;
    ctx.member("bob").await;
    let app = test::init_service(app(ctx.services.clone())).await;

    let req = test::TestRequest::post()
        .uri("/edit_profile/")
        .insert_header(ann.auth())
        .set_json(json!({"username": "bob"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["details"]["fields"]["username"].is_array());

    let req = test::TestRequest::post()
        .uri("/edit_profile/")
        .insert_header(ann.auth())
        .set_json(json!({"username": "anna", "first_name": "Anna"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/anna/");

    let stored = ctx.repos.users.find_by_id(ann.user.id).await.unwrap().unwrap();
    assert_eq!(stored.username, "anna");
    assert_eq!(stored.first_name, "Anna");
}

#[actix_web::test]
async fn registration_rejects_bad_emails_before_storage() {
    let ctx = TestContext::new();
    let app = test::init_service(app(ctx.services.clone())).await;
    let long = format!("{}@example.com", "a".repeat(400));

    for email in ["not-an-email", long.as_str()] {
        let req = test::TestRequest::post()
            .uri("/auth/registration/")
            .set_json(json!({"username": "ann", "email": email, "password": "correct horse"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let body: Value = test::read_body_json(resp).await;
        assert!(body["details"]["fields"]["email"].is_array());
    }
    assert!(ctx.repos.users.find_by_username("ann").await.unwrap().is_none());
}
