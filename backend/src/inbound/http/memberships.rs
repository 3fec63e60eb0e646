//! Favorite and shopping cart handlers plus the shopping list export.
//!
//! ```text
//! POST   /api/v1/recipes/{id}/favorite
//! DELETE /api/v1/recipes/{id}/favorite
//! POST   /api/v1/recipes/{id}/shopping_cart
//! DELETE /api/v1/recipes/{id}/shopping_cart
//! GET    /api/v1/recipes/download_shopping_cart
//! ```
//!
//! Register [`download_shopping_cart`] before the `/recipes/{id}` routes so
//! the literal segment is not parsed as a recipe id.

use actix_web::http::header::{self, ContentDisposition, DispositionParam, DispositionType};
use actix_web::{HttpResponse, delete, get, post, web};

use crate::domain::{MembershipKind, SHOPPING_LIST_FILENAME};
use crate::inbound::http::ApiResult;
use crate::inbound::http::recipes::parse_recipe_id;
use crate::inbound::http::recipes_dto::RecipeSummaryBody;
use crate::inbound::http::schemas::ErrorSchema;
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;

async fn add_member(
    state: &HttpState,
    session: &SessionContext,
    kind: MembershipKind,
    raw_id: &str,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let recipe = parse_recipe_id(raw_id)?;
    let summary = state.memberships.add(kind, user, recipe).await?;
    Ok(HttpResponse::Created().json(RecipeSummaryBody::from(summary)))
}

async fn remove_member(
    state: &HttpState,
    session: &SessionContext,
    kind: MembershipKind,
    raw_id: &str,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let recipe = parse_recipe_id(raw_id)?;
    state.memberships.remove(kind, user, recipe).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Add a recipe to the caller's favorites.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/favorite",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added", body = RecipeSummaryBody),
        (status = 400, description = "Already a favorite", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["memberships"],
    operation_id = "addFavorite"
)]
#[post("/recipes/{id}/favorite")]
pub async fn add_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    add_member(&state, &session, MembershipKind::Favorite, &path).await
}

/// Remove a recipe from the caller's favorites.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}/favorite",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Not a favorite", body = ErrorSchema)
    ),
    tags = ["memberships"],
    operation_id = "removeFavorite"
)]
#[delete("/recipes/{id}/favorite")]
pub async fn remove_favorite(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    remove_member(&state, &session, MembershipKind::Favorite, &path).await
}

/// Put a recipe in the caller's shopping cart.
#[utoipa::path(
    post,
    path = "/api/v1/recipes/{id}/shopping_cart",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 201, description = "Added", body = RecipeSummaryBody),
        (status = 400, description = "Already in the cart", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown recipe", body = ErrorSchema)
    ),
    tags = ["memberships"],
    operation_id = "addToShoppingCart"
)]
#[post("/recipes/{id}/shopping_cart")]
pub async fn add_to_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    add_member(&state, &session, MembershipKind::ShoppingCart, &path).await
}

/// Take a recipe out of the caller's shopping cart.
#[utoipa::path(
    delete,
    path = "/api/v1/recipes/{id}/shopping_cart",
    params(("id" = String, Path, description = "Recipe id")),
    responses(
        (status = 204, description = "Removed"),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Not in the cart", body = ErrorSchema)
    ),
    tags = ["memberships"],
    operation_id = "removeFromShoppingCart"
)]
#[delete("/recipes/{id}/shopping_cart")]
pub async fn remove_from_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    remove_member(&state, &session, MembershipKind::ShoppingCart, &path).await
}

/// Download the aggregated shopping list as a plain-text attachment.
#[utoipa::path(
    get,
    path = "/api/v1/recipes/download_shopping_cart",
    responses(
        (
            status = 200,
            description = "Shopping list",
            content_type = "text/plain",
            body = String,
            headers(("Content-Disposition" = String, description = "attachment; filename=\"shopping_list.txt\""))
        ),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["memberships"],
    operation_id = "downloadShoppingCart"
)]
#[get("/recipes/download_shopping_cart")]
pub async fn download_shopping_cart(
    state: web::Data<HttpState>,
    session: SessionContext,
) -> ApiResult<HttpResponse> {
    let user = session.require_user_id()?;
    let list = state.shopping_list.shopping_list(user).await?;
    Ok(HttpResponse::Ok()
        .content_type("text/plain; charset=utf-8")
        .insert_header((
            header::CONTENT_DISPOSITION,
            ContentDisposition {
                disposition: DispositionType::Attachment,
                parameters: vec![DispositionParam::Filename(SHOPPING_LIST_FILENAME.to_owned())],
            },
        ))
        .body(list.render_plain_text()))
}

#[cfg(test)]
#[path = "memberships_tests.rs"]
mod tests;
