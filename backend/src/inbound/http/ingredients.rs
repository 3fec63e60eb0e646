//! Ingredient catalog HTTP handlers.
//!
//! ```text
//! GET /api/v1/ingredients?name=fl
//! GET /api/v1/ingredients/{id}
//! ```
//!
//! Both endpoints are public and unpaginated.

use actix_web::{get, web};
use serde::Deserialize;

use crate::domain::IngredientId;
use crate::inbound::http::ApiResult;
use crate::inbound::http::recipes_dto::IngredientBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_uuid};

/// Query parameters for `GET /ingredients`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct IngredientSearchParams {
    /// Case-insensitive name prefix.
    pub name: Option<String>,
}

/// Search the catalog by name prefix, ordered by name.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients",
    params(IngredientSearchParams),
    responses(
        (status = 200, description = "Matching ingredients", body = [IngredientBody]),
        (status = 503, description = "Catalog unavailable", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "searchIngredients",
    security([])
)]
#[get("/ingredients")]
pub async fn search_ingredients(
    state: web::Data<HttpState>,
    params: web::Query<IngredientSearchParams>,
) -> ApiResult<web::Json<Vec<IngredientBody>>> {
    let found = state.ingredients.search(params.into_inner().name).await?;
    Ok(web::Json(found.into_iter().map(IngredientBody::from).collect()))
}

/// Fetch one ingredient.
#[utoipa::path(
    get,
    path = "/api/v1/ingredients/{id}",
    params(("id" = String, Path, description = "Ingredient id")),
    responses(
        (status = 200, description = "Ingredient", body = IngredientBody),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Unknown ingredient", body = ErrorSchema)
    ),
    tags = ["ingredients"],
    operation_id = "getIngredient",
    security([])
)]
#[get("/ingredients/{id}")]
pub async fn get_ingredient(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<IngredientBody>> {
    let id = parse_uuid(&path, FieldName::new("id"))?;
    let ingredient = state.ingredients.get(IngredientId::from_uuid(id)).await?;
    Ok(web::Json(ingredient.into()))
}

#[cfg(test)]
mod tests;
