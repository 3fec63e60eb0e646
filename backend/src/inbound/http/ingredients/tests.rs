//! Tests for ingredient catalog handlers.

use actix_web::http::StatusCode;
use actix_web::{App, test as actix_test};
use serde_json::Value;

use super::*;
use crate::domain::Error;
use crate::domain::fixtures::ingredient;
use crate::inbound::http::test_utils::MockPorts;

#[actix_web::test]
async fn search_forwards_the_name_prefix() {
    let flour = ingredient("flour", "g");
    let expected_id = flour.id.to_string();
    let mut ports = MockPorts::default();
    ports
        .ingredients
        .expect_search()
        .withf(|prefix| prefix.as_deref() == Some("fl"))
        .times(1)
        .return_once(move |_| Ok(vec![flour]));
    let app = actix_test::init_service(
        App::new()
            .app_data(ports.into_state())
            .service(web::scope("/api/v1").service(search_ingredients)),
    )
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/ingredients?name=fl")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::OK);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(
        body,
        serde_json::json!([{ "id": expected_id, "name": "flour", "measurementUnit": "g" }])
    );
}

#[actix_web::test]
async fn unknown_ingredient_is_not_found() {
    let mut ports = MockPorts::default();
    ports
        .ingredients
        .expect_get()
        .times(1)
        .return_once(|_| Err(Error::not_found("ingredient not found")));
    let app = actix_test::init_service(
        App::new()
            .app_data(ports.into_state())
            .service(web::scope("/api/v1").service(get_ingredient)),
    )
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri(&format!("/api/v1/ingredients/{}", IngredientId::random()))
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn malformed_ingredient_id_is_a_bad_request() {
    let app = actix_test::init_service(
        App::new()
            .app_data(MockPorts::default().into_state())
            .service(web::scope("/api/v1").service(get_ingredient)),
    )
    .await;

    let response = actix_test::call_service(
        &app,
        actix_test::TestRequest::get()
            .uri("/api/v1/ingredients/flour")
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let body: Value = actix_test::read_body_json(response).await;
    assert_eq!(body["details"]["code"], "invalid_uuid");
}
