mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use blogicum_server::app;
use chrono::{Duration, Utc};
use common::{TestContext, location};
use serde_json::{Value, json};

#[actix_web::test]
async fn anonymous_gets_404_for_unpublished_post() {
    let ctx = TestContext::new();
    let ann = ctx.member("ann").await;
    let travel = ctx.category("travel", true).await;
    let draft = ctx.post(&ann, &travel, |d| d.is_published = false).await;
    let app = test::init_service(app(ctx.services.clone())).await;

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/", draft.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/", draft.id))
        .insert_header(ann.auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["post"]["id"], draft.id);
    assert_eq!(body["post"]["author"]["username"], "ann");
    assert_eq!(body["comments"], json!([]));
}

#[actix_web::test]
async fn post_in_hidden_category_is_not_found() {
    let ctx = TestContext::new();
    let ann = ctx.member("ann").await;
    let hidden = ctx.category("hidden", false).await;
    let post = ctx.post(&ann, &hidden, |_| {}).await;
    let app = test::init_service(app(ctx.services.clone())).await;

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/", post.id))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn non_owner_edit_redirects_to_detail_without_changes() {
    let ctx = TestContext::new();
    let ann = ctx.member("ann").await;
    let bob = ctx.member("bob").await;
    let travel = ctx.category("travel", true).await;
    let post = ctx.post(&bob, &travel, |d| d.title = "Bob's".into()).await;
    let app = test::init_service(app(ctx.services.clone())).await;
    let detail = format!("/posts/{}/", post.id);

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header(ann.auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), detail);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header(ann.auth())
        .set_json(json!({"title": "Hijacked", "text": "x", "category": travel.id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), detail);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/delete/", post.id))
        .insert_header(ann.auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(location(&resp), detail);

    let stored = ctx.repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Bob's");
}

#[actix_web::test]
async fn owner_edits_and_deletes_own_post() {
    let ctx = TestContext::new();
    let ann = ctx.member("ann").await;
    let travel = ctx.category("travel", true).await;
    let post = ctx.post(&ann, &travel, |_| {}).await;
    let app = test::init_service(app(ctx.services.clone())).await;

    let req = test::TestRequest::get()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header(ann.auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["form"]["title"], "A post");
    assert_eq!(body["categories"][0]["slug"], "travel");

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header(ann.auth())
        .set_json(json!({"title": "Renamed", "text": "New body", "category": travel.id}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));
    let stored = ctx.repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Renamed");

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/delete/", post.id))
        .insert_header(ann.auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/ann/");
    assert!(ctx.repos.posts.find_by_id(post.id).await.unwrap().is_none());
}

#[actix_web::test]
async fn anonymous_create_redirects_to_login() {
    let ctx = TestContext::new();
    let app = test::init_service(app(ctx.services.clone())).await;

    let req = test::TestRequest::get().uri("/posts/create/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/auth/login/?next=%2Fposts%2Fcreate%2F");

    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .set_json(json!({"title": "t", "text": "x", "category": 1}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert!(location(&resp).starts_with("/auth/login/?next="));
}

#[actix_web::test]
async fn future_post_is_kept_out_of_the_home_feed() {
    let ctx = TestContext::new();
    let ann = ctx.member("ann").await;
    let travel = ctx.category("travel", true).await;
    let app = test::init_service(app(ctx.services.clone())).await;
    let next_year = Utc::now() + Duration::days(365);

    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .insert_header(ann.auth())
        .set_json(json!({
            "title": "Next year",
            "text": "Planned",
            "category": travel.id,
            "pub_date": next_year.to_rfc3339(),
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), "/profile/ann/");

    let req = test::TestRequest::get().uri("/").to_request();
    let home: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(home["total"], 0);

    let req = test::TestRequest::get()
        .uri("/profile/ann/")
        .insert_header(ann.auth())
        .to_request();
    let own: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(own["posts"]["total"], 1);
    assert_eq!(own["posts"]["items"][0]["title"], "Next year");
}

#[actix_web::test]
async fn invalid_post_form_lists_field_errors() {
    let ctx = TestContext::new();
    let ann = ctx.member("ann").await;
    let app = test::init_service(app(ctx.services.clone())).await;

    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .insert_header(ann.auth())
        .set_json(json!({"title": "", "category": 999}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["details"]["fields"]["title"].is_array());
    assert!(body["details"]["fields"]["text"].is_array());

    let req = test::TestRequest::post()
        .uri("/posts/create/")
        .insert_header(ann.auth())
        .set_json(json!({"title": "t", "text": "x", "category": 999}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["details"]["fields"]["category"].is_array());
}

#[actix_web::test]
async fn create_form_offers_categories_and_locations() {
    let ctx = TestContext::new();
    let ann = ctx.member("ann").await;
    ctx.category("travel", true).await;
    ctx.location("Moscow").await;
    let app = test::init_service(app(ctx.services.clone())).await;

    let req = test::TestRequest::get()
        .uri("/posts/create/")
        .insert_header(ann.auth())
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["form"], Value::Null);
    assert_eq!(body["categories"].as_array().map(Vec::len), Some(1));
    assert_eq!(body["locations"][0]["name"], "Moscow");
}

#[actix_web::test]
async fn ownership_is_checked_before_the_body_is_read() {
    let ctx = TestContext::new();
    let ann = ctx.member("ann").await;
    let bob = ctx.member("bob").await;
    let travel = ctx.category("travel", true).await;
    let post = ctx.post(&bob, &travel, |d| d.title = "Bob's".into()).await;
    let app = test::init_service(app(ctx.services.clone())).await;

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header(ann.auth())
        .set_form([("title", "Hijacked")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::FOUND);
    assert_eq!(location(&resp), format!("/posts/{}/", post.id));

    let req = test::TestRequest::post()
        .uri("/posts/9999/edit/")
        .insert_header(ann.auth())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::post()
        .uri(&format!("/posts/{}/edit/", post.id))
        .insert_header(bob.auth())
        .set_form([("title", "Form encoded")])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let stored = ctx.repos.posts.find_by_id(post.id).await.unwrap().unwrap();
    assert_eq!(stored.title, "Bob's");
}
