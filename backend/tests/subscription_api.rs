//! Subscription flows over the in-memory store.

// Each integration crate uses a different subset of the harness.
#[allow(dead_code)]
mod support;

use actix_web::http::StatusCode;
use actix_web::test;
use serde_json::Value;

use support::{Harness, recipe_payload, send, sign_in_as};

#[actix_web::test]
async fn following_an_author_previews_their_newest_recipes() {
    let harness = Harness::new();
    let alice = harness.user("alice");
    let bob = harness.user("bob");
    let items = harness.ingredients(&[("oats", "g")]).await;
    let app = test::init_service(harness.app()).await;
    let alice_cookie = sign_in_as(&app, &alice).await;
    let bob_cookie = sign_in_as(&app, &bob).await;

    for name in ["porridge", "flapjack", "granola", "muesli"] {
        let (status, _) = send(
            &app,
            test::TestRequest::post()
                .uri("/api/v1/recipes")
                .set_json(recipe_payload(name, &[(&items[0], 80)])),
            Some(&alice_cookie),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, followed) = send(
        &app,
        test::TestRequest::post().uri(&format!("/api/v1/users/{}/subscribe?recipes_limit=2", alice.id)),
        Some(&bob_cookie),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(followed["username"], "alice");
    assert_eq!(followed["isSubscribed"], true);
    assert_eq!(followed["recipesCount"], 4);
    assert_eq!(followed["recipes"].as_array().map(Vec::len), Some(2));

    let (status, body) = send(
        &app,
        test::TestRequest::post().uri(&format!("/api/v1/users/{}/subscribe", alice.id)),
        Some(&bob_cookie),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "already_exists");

    let (status, page) = send(
        &app,
        test::TestRequest::get().uri("/api/v1/users/subscriptions"),
        Some(&bob_cookie),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["count"], 1);
    assert_eq!(page["next"], Value::Null);
    assert_eq!(page["results"][0]["recipes"].as_array().map(Vec::len), Some(3));

    let (_, recipes) = send(
        &app,
        test::TestRequest::get().uri(&format!("/api/v1/recipes?author={}", alice.id)),
        Some(&bob_cookie),
    )
    .await;
    assert_eq!(recipes["count"], 4);
    assert_eq!(recipes["results"][0]["author"]["isSubscribed"], true);

    let (status, _) = send(
        &app,
        test::TestRequest::delete().uri(&format!("/api/v1/users/{}/subscribe", alice.id)),
        Some(&bob_cookie),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (_, page) = send(
        &app,
        test::TestRequest::get().uri("/api/v1/users/subscriptions"),
        Some(&bob_cookie),
    )
    .await;
    assert_eq!(page["count"], 0);
}

#[actix_web::test]
async fn following_yourself_is_rejected() {
    let harness = Harness::new();
    let alice = harness.user("alice");
    let app = test::init_service(harness.app()).await;
    let cookie = sign_in_as(&app, &alice).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post().uri(&format!("/api/v1/users/{}/subscribe", alice.id)),
        Some(&cookie),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "invalid_operation");
}

#[actix_web::test]
async fn following_an_unknown_author_is_not_found() {
    let harness = Harness::new();
    let bob = harness.user("bob");
    let app = test::init_service(harness.app()).await;
    let cookie = sign_in_as(&app, &bob).await;

    let (status, body) = send(
        &app,
        test::TestRequest::post().uri(&format!(
            "/api/v1/users/{}/subscribe",
            recipe_backend::domain::UserId::random()
        )),
        Some(&cookie),
    )
    .await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "not_found");
}

#[actix_web::test]
async fn subscription_listing_requires_a_session() {
    let harness = Harness::new();
    let app = test::init_service(harness.app()).await;

    let (status, body) = send(
        &app,
        test::TestRequest::get().uri("/api/v1/users/subscriptions"),
        None,
    )
    .await;

    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "unauthorized");
}
