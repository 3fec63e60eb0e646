//! Recipe HTTP handlers.
//!
//! ```text
//! GET    /api/v1/recipes?page=1&limit=6&author={id}&is_favorited=1&is_in_shopping_cart=0
//! POST   /api/v1/recipes
//! GET    /api/v1/recipes/{id}
//! PATCH  /api/v1/recipes/{id}
//! DELETE /api/v1/recipes/{id}
//! GET    /api/v1/recipes/{id}/get-link
//! ```
//!
//! Reads are public; anonymous viewers see every relation flag as `false`.
//! Mutations need a signed-in caller and only the author may change or
//! delete a recipe.

use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use pagination::Paginated;
use serde::Deserialize;

use crate::domain::ports::RecipeListQuery;
use crate::domain::{RecipeId, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::recipes_dto::{RecipeBody, RecipeRequest, ShortLinkBody};
use crate::inbound::http::schemas::{ErrorSchema, RecipePageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{
    FieldName, parse_flag, parse_optional_uuid, parse_page_request, parse_uuid,
};

/// Query parameters for `GET /recipes`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecipeListParams {
    /// One-based page number.
    pub page: Option<String>,
    /// Page size, clamped to the configured ceiling.
    pub limit: Option<String>,
    /// Only recipes by this author id.
    pub author: Option<String>,
    /// `1`/`true` for the viewer's favorites; ignored when anonymous.
    pub is_favorited: Option<String>,
    /// `1`/`true` for the viewer's cart; ignored when anonymous.
    pub is_in_shopping_cart: Option<String>,
}

pub(crate) fn parse_recipe_id(raw: &str) -> Result<RecipeId, crate::domain::Error> {
    parse_uuid(raw, FieldName::new("id")).map(RecipeId::from_uuid)
}

fn parse_list_query(params: &RecipeListParams) -> Result<RecipeListQuery, crate::domain::Error> {
    Ok(RecipeListQuery {
        author: parse_optional_uuid(params.author.as_deref(), FieldName::new("author"))?
            .map(UserId::from_uuid),
        is_favorited: parse_flag(
            params.is_favorited.as_deref(),
            FieldName::new("is_favorited"),
        )?,
        is_in_shopping_cart: parse_flag(
            params.is_in_shopping_cart.as_deref(),
            FieldName::new("is_in_shopping_cart"),
        )?,
    })
}

/// List recipes newest first.
#[utoipa::path(
    get,
    path = "/api/v1/recipes",
    params(RecipeListParams),
    responses(
        (status = 200, description = "Page of recipes", body = RecipePageSchema),
        (status = 400, description = "Invalid filter or page", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "listRecipes",
    security([])
)]
#[get("/recipes")]
pub async fn list_recipes(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    params: web::Query<RecipeListParams>,
) -> ApiResult<web::Json<Paginated<RecipeBody>>> {
    let page = parse_page_request(
        params.page.as_deref(),
        params.limit.as_deref(),
        state.pages,
    )?;
    let query = parse_list_query(&params)?;
    let viewer = session.user_id()?;
    let views = state.recipes_query.list(viewer, query, page).await?;
    let envelope = Paginated::from_window(views.items, views.total, page, &request.full_url());
    Ok(web::Json(envelope.map(RecipeBody::from)))
}

/// Publish a recipe authored by the caller.
#[utoipa::path(
    post,
    path = "/api/v1/recipes",
    request_body = RecipeRequest,
    responses(
        (status = 201, description = "Recipe created", body = RecipeBody),
        (status = 400, description = "Field validation failed", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "createRecipe"
)]
#[post("/recipes")]
pub async fn create_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<HttpResponse> {
    let author = session.require_user_id()?;
    let draft = payload.into_inner().into_draft()?;
    let view = state.recipes.create(author, draft).await?;
    Ok(HttpResponse::Created().json(RecipeBody::from(view)))
}

/// Fetch one recipe.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Recipe", body = RecipeBody),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipe",
    security([])
)]
#[get("/recipes/{id}")]
pub async fn get_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<web::Json<RecipeBody>> {
    let id = parse_recipe_id(&path)?;
    let viewer = session.user_id()?;
    let view = state.recipes_query.get(viewer, id).await?;
    Ok(web::Json(view.into()))
}

/// Replace the supplied fields of a recipe.
///
/// A supplied ingredient list replaces every existing line at once.
#[utoipa::path(
    patch,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    request_body = RecipeRequest,
    responses(
        (status = 200, description = "Updated recipe", body = RecipeBody),
        (status = 400, description = "Field validation failed", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Caller is not the author", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "updateRecipe"
)]
#[patch("/recipes/{id}")]
pub async fn update_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    payload: web::Json<RecipeRequest>,
) -> ApiResult<web::Json<RecipeBody>> {
    let caller = session.require_user_id()?;
    let id = parse_recipe_id(&path)?;
    let draft = payload.into_inner().into_draft()?;
    let view = state.recipes.replace(caller, id, draft).await?;
    Ok(web::Json(view.into()))
}

/// Delete a recipe with its lines and memberships.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Recipe deleted"),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 403, description = "Caller is not the author", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "deleteRecipe"
)]
#[delete("/recipes/{id}")]
pub async fn delete_recipe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let caller = session.require_user_id()?;
    let id = parse_recipe_id(&path)?;
    state.recipes.delete(caller, id).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Absolute link to the recipe page.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/{id}/get-link",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 200, description = "Short link", body = ShortLinkBody),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["recipes"],
    operation_id = "getRecipeLink",
    security([])
)]
#[get("/recipes/{id}/get-link")]
pub async fn recipe_short_link(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<ShortLinkBody>> {
    let id = parse_recipe_id(&path)?;
    let short_link = state.recipes_query.short_link(id).await?;
    Ok(web::Json(ShortLinkBody { short_link }))
}

#[cfg(test)]
#[path = "recipes_tests.rs"]
mod tests;
