//! Tests for membership toggles and the shopping list download.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use rstest::rstest;
use serde_json::Value;

use super::*;
use crate::domain::fixtures::{ingredient, profile, recipe};
use crate::domain::{CartLine, Error, RecipeId, RecipeSummary, ShoppingList};
use crate::inbound::http::test_utils::{
    MockPorts, SIGN_IN_PATH, session_cookie, sign_in, test_session_middleware,
};

fn test_app(
    ports: MockPorts,
) -> App<
    impl actix_web::dev::ServiceFactory<
        actix_web::dev::ServiceRequest,
        Config = (),
        Response = actix_web::dev::ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(ports.into_state())
        .wrap(test_session_middleware())
        .route(SIGN_IN_PATH, web::post().to(sign_in))
        .service(
            web::scope("/api/v1")
                .service(download_shopping_cart)
                .service(add_favorite)
                .service(remove_favorite)
                .service(add_to_cart)
                .service(remove_from_cart),
        )
}

#[rstest]
#[case("favorite", MembershipKind::Favorite)]
#[case("shopping_cart", MembershipKind::ShoppingCart)]
#[actix_web::test]
async fn adding_answers_201_with_the_summary(#[case] segment: &str, #[case] kind: MembershipKind) {
    let user = profile("bob");
    let user_id = user.id;
    let stored = recipe(profile("alice").id);
    let target = stored.id;
    let summary = RecipeSummary::from(&stored);
    let mut ports = MockPorts::default();
    ports
        .memberships
        .expect_add()
        .withf(move |k, u, r| *k == kind && *u == user_id && *r == target)
        .times(1)
        .return_once(move |_, _, _| Ok(summary));
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = session_cookie(&app, user_id).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/recipes/{target}/{segment}"))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::CREATED);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["id"], target.to_string().as_str());
    assert_eq!(body["name"], "pancakes");
    assert_eq!(body["cookingTime"], 15);
}

#[actix_web::test]
async fn repeated_add_is_a_bad_request() {
    let user = profile("bob");
    let mut ports = MockPorts::default();
    ports
        .memberships
        .expect_add()
        .times(1)
        .return_once(|_, _, _| Err(Error::already_exists("recipe is already in favorites")));
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = session_cookie(&app, user.id).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::post()
            .uri(&format!("/api/v1/recipes/{}/favorite", RecipeId::random()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["code"], "already_exists");
}

#[actix_web::test]
async fn removing_answers_204() {
    let user = profile("bob");
    let mut ports = MockPorts::default();
    ports
        .memberships
        .expect_remove()
        .withf(|kind, _, _| *kind == MembershipKind::ShoppingCart)
        .times(1)
        .return_once(|_, _, _| Ok(()));
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = session_cookie(&app, user.id).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::delete()
            .uri(&format!("/api/v1/recipes/{}/shopping_cart", RecipeId::random()))
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NO_CONTENT);
}

#[rstest]
#[case("/api/v1/recipes/download_shopping_cart")]
#[case("/api/v1/recipes/3fa85f64-5717-4562-b3fc-2c963f66afa6/favorite")]
#[actix_web::test]
async fn anonymous_callers_are_unauthorised(#[case] uri: &str) {
    let app = actix_test::init_service(test_app(MockPorts::default())).await;
    let request = if uri.ends_with("favorite") {
        actix_test::TestRequest::post()
    } else {
        actix_test::TestRequest::get()
    };

    let response = actix_test::call_service(&app, request.uri(uri).to_request()).await;

    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn download_is_a_plain_text_attachment() {
    let user = profile("bob");
    let flour = ingredient("flour", "g");
    let egg = ingredient("egg", "pc");
    let line = |recipe_id, item: &crate::domain::Ingredient, amount| CartLine {
        recipe_id,
        ingredient_id: item.id,
        name: item.name.clone(),
        measurement_unit: item.measurement_unit.clone(),
        amount,
    };
    let (first, second) = (RecipeId::random(), RecipeId::random());
    let list = ShoppingList::aggregate([
        line(first, &flour, 200),
        line(first, &egg, 2),
        line(second, &flour, 100),
    ]);
    let mut ports = MockPorts::default();
    ports
        .shopping_list
        .expect_shopping_list()
        .times(1)
        .return_once(move |_| Ok(list));
    let app = actix_test::init_service(test_app(ports)).await;
    let cookie = session_cookie(&app, user.id).await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/recipes/download_shopping_cart")
            .cookie(cookie)
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let header_value = |name| {
        response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_owned)
    };
    assert_eq!(
        header_value(header::CONTENT_TYPE).as_deref(),
        Some("text/plain; charset=utf-8")
    );
    assert_eq!(
        header_value(header::CONTENT_DISPOSITION).as_deref(),
        Some("attachment; filename=\"shopping_list.txt\"")
    );
    let body = actix_test::read_body(response).await;
    assert_eq!(body, "Shopping list:\n\nflour (g) — 300\negg (pc) — 2\n");
}
