mod common;

use actix_web::http::StatusCode;
use actix_web::test;
use blogicum_server::app;
use chrono::{Duration, Utc};
use common::TestContext;
use serde_json::Value;

fn titles(page: &Value) -> Vec<String> {
    page["items"]
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|p| p["title"].as_str().map(str::to_string))
                .collect()
        })
        .unwrap_or_default()
}

#[actix_web::test]
async fn home_feed_shows_only_public_posts_newest_first() {
    let ctx = TestContext::new();
    let ann = ctx.member("ann").await;
    let travel = ctx.category("travel", true).await;
    let hidden = ctx.category("hidden", false).await;
    let now = Utc::now();

    ctx.post(&ann, &travel, |d| {
        d.title = "older".into();
        d.pub_date = now - Duration::days(2);
    })
    .await;
    let newer = ctx
        .post(&ann, &travel, |d| {
            d.title = "newer".into();
            d.pub_date = now - Duration::days(1);
        })
        .await;
    ctx.post(&ann, &travel, |d| {
        d.title = "draft".into();
        d.is_published = false;
    })
    .await;
    ctx.post(&ann, &travel, |d| {
        d.title = "scheduled".into();
        d.pub_date = now + Duration::days(30);
    })
    .await;
    ctx.post(&ann, &hidden, |d| d.title = "in hidden category".into())
        .await;
    ctx.services
        .comments
        .create_comment(newer.id, ann.user.id, "nice".into())
        .await
        .unwrap();

    let app = test::init_service(app(ctx.services.clone())).await;
    let req = test::TestRequest::get().uri("/").to_request();
    let page: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(titles(&page), ["newer", "older"]);
    assert_eq!(page["items"][0]["comment_count"], 1);
    assert_eq!(page["items"][0]["category"]["slug"], "travel");
    assert_eq!(page["items"][1]["comment_count"], 0);
}

#[actix_web::test]
async fn feeds_are_paginated_by_ten() {
    let ctx = TestContext::new();
    let ann = ctx.member("ann").await;
    let travel = ctx.category("travel", true).await;
    for n in 0..11 {
        ctx.post(&ann, &travel, |d| {
            d.title = format!("post {n}");
            d.pub_date = Utc::now() - Duration::hours(24 - n);
        })
        .await;
    }
    let app = test::init_service(app(ctx.services.clone())).await;

    let req = test::TestRequest::get().uri("/").to_request();
    let first: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(first["items"].as_array().map(Vec::len), Some(10));
    assert_eq!(first["num_pages"], 2);
    assert_eq!(first["has_next"], true);
    assert_eq!(first["items"][0]["title"], "post 10");

    let req = test::TestRequest::get().uri("/?page=2").to_request();
    let second: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(titles(&second), ["post 0"]);
    assert_eq!(second["has_previous"], true);

    for bad in ["/?page=3", "/?page=0", "/?page=last"] {
        let req = test::TestRequest::get().uri(bad).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{bad}");
    }
}

#[actix_web::test]
async fn category_feed_needs_a_published_category() {
    let ctx = TestContext::new();
    let ann = ctx.member("ann").await;
    let travel = ctx.category("travel", true).await;
    let food = ctx.category("food", true).await;
    let hidden = ctx.category("hidden", false).await;
    ctx.post(&ann, &travel, |d| d.title = "trip".into()).await;
    ctx.post(&ann, &food, |d| d.title = "soup".into()).await;
    ctx.post(&ann, &hidden, |_| {}).await;
    let app = test::init_service(app(ctx.services.clone())).await;

    let req = test::TestRequest::get().uri("/category/travel/").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["category"]["slug"], "travel");
    assert_eq!(titles(&body["posts"]), ["trip"]);

    for uri in ["/category/hidden/", "/category/missing/"] {
        let req = test::TestRequest::get().uri(uri).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{uri}");
    }
}

#[actix_web::test]
async fn profile_feed_shows_drafts_only_to_the_owner() {
    let ctx = TestContext::new();
    let ann = ctx.member("ann").await;
    let bob = ctx.member("bob").await;
    let travel = ctx.category("travel", true).await;
    ctx.post(&ann, &travel, |d| d.title = "public".into()).await;
    ctx.post(&ann, &travel, |d| {
        d.title = "private".into();
        d.is_published = false;
    })
    .await;
    ctx.post(&bob, &travel, |d| d.title = "bob's".into()).await;
    let app = test::init_service(app(ctx.services.clone())).await;

    let req = test::TestRequest::get()
        .uri("/profile/ann/")
        .insert_header(ann.auth())
        .to_request();
    let own: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(own["profile"]["username"], "ann");
    assert_eq!(own["posts"]["total"], 2);

    let req = test::TestRequest::get()
        .uri("/profile/ann/")
        .insert_header(bob.auth())
        .to_request();
    let theirs: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(titles(&theirs["posts"]), ["public"]);

    let req = test::TestRequest::get().uri("/profile/nobody/").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}
