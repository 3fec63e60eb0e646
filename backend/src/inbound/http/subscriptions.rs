//! Subscription HTTP handlers.
//!
//! ```text
//! POST   /api/v1/users/{id}/subscribe?recipes_limit=3
//! DELETE /api/v1/users/{id}/subscribe
//! GET    /api/v1/users/subscriptions?page=1&limit=6&recipes_limit=3
//! ```

use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use pagination::Paginated;
use serde::{Deserialize, Serialize};
use serde_json::json;
use utoipa::ToSchema;

use crate::domain::{Error, FollowedAuthor, RecipePreviewLimit, UserId};
use crate::inbound::http::ApiResult;
use crate::inbound::http::recipes_dto::{AuthorBody, RecipeSummaryBody};
use crate::inbound::http::schemas::{ErrorSchema, FollowedAuthorPageSchema};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::{FieldName, parse_page_request, parse_uuid};

/// A followed author with a preview of their newest recipes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct FollowedAuthorBody {
    #[serde(flatten)]
    pub author: AuthorBody,
    /// Newest first, at most `recipes_limit` entries.
    pub recipes: Vec<RecipeSummaryBody>,
    /// Every recipe the author has published.
    pub recipes_count: u64,
}

impl From<FollowedAuthor> for FollowedAuthorBody {
    fn from(followed: FollowedAuthor) -> Self {
        Self {
            author: AuthorBody::from_profile(followed.profile, true),
            recipes: followed
                .recipes
                .into_iter()
                .map(RecipeSummaryBody::from)
                .collect(),
            recipes_count: followed.recipes_count,
        }
    }
}

/// Preview size override accepted by subscribe.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PreviewParams {
    /// Recipes previewed per author; defaults to 3.
    pub recipes_limit: Option<String>,
}

/// Query parameters for `GET /users/subscriptions`.
#[derive(Debug, Default, Deserialize, utoipa::IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SubscriptionListParams {
    pub page: Option<String>,
    pub limit: Option<String>,
    /// Recipes previewed per author; defaults to 3.
    pub recipes_limit: Option<String>,
}

fn parse_preview(raw: Option<&str>) -> Result<RecipePreviewLimit, Error> {
    RecipePreviewLimit::parse(raw).map_err(|err| {
        Error::invalid_request(err.to_string()).with_details(json!({
            "field": "recipes_limit",
            "value": raw.unwrap_or_default(),
            "code": "invalid_recipes_limit",
        }))
    })
}

fn parse_author_id(raw: &str) -> Result<UserId, Error> {
    parse_uuid(raw, FieldName::new("id")).map(UserId::from_uuid)
}

/// Follow an author.
#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/subscribe",
    params(("id" = String, Path, description = "Author id"), PreviewParams),
    responses(
        (status = 201, description = "Now following", body = FollowedAuthorBody),
        (status = 400, description = "Already following, or following yourself", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Unknown author", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "subscribe"
)]
#[post("/users/{id}/subscribe")]
pub async fn subscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
    params: web::Query<PreviewParams>,
) -> ApiResult<HttpResponse> {
    let follower = session.require_user_id()?;
    let author = parse_author_id(&path)?;
    let preview = parse_preview(params.recipes_limit.as_deref())?;
    let followed = state
        .subscriptions
        .subscribe(follower, author, preview)
        .await?;
    Ok(HttpResponse::Created().json(FollowedAuthorBody::from(followed)))
}

/// Stop following an author.
#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/subscribe",
    params(("id" = String, Path, description = "Author id")),
    responses(
        (status = 204, description = "No longer following"),
        (status = 401, description = "Not signed in", body = ErrorSchema),
        (status = 404, description = "Not following, or unknown author", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "unsubscribe"
)]
#[delete("/users/{id}/subscribe")]
pub async fn unsubscribe(
    state: web::Data<HttpState>,
    session: SessionContext,
    path: web::Path<String>,
) -> ApiResult<HttpResponse> {
    let follower = session.require_user_id()?;
    let author = parse_author_id(&path)?;
    state.subscriptions.unsubscribe(follower, author).await?;
    Ok(HttpResponse::NoContent().finish())
}

/// Authors the caller follows, ordered by username.
#[utoipa::path(
    get,
    path = "/api/v1/users/subscriptions",
    params(SubscriptionListParams),
    responses(
        (status = 200, description = "Page of followed authors", body = FollowedAuthorPageSchema),
        (status = 400, description = "Invalid page or preview size", body = ErrorSchema),
        (status = 401, description = "Not signed in", body = ErrorSchema)
    ),
    tags = ["subscriptions"],
    operation_id = "listSubscriptions"
)]
#[get("/users/subscriptions")]
pub async fn list_subscriptions(
    state: web::Data<HttpState>,
    session: SessionContext,
    request: HttpRequest,
    params: web::Query<SubscriptionListParams>,
) -> ApiResult<web::Json<Paginated<FollowedAuthorBody>>> {
    let follower = session.require_user_id()?;
    let page = parse_page_request(
        params.page.as_deref(),
        params.limit.as_deref(),
        state.pages,
    )?;
    let preview = parse_preview(params.recipes_limit.as_deref())?;
    let followed = state
        .subscriptions_query
        .followed_authors(follower, preview, page)
        .await?;
    let envelope =
        Paginated::from_window(followed.items, followed.total, page, &request.full_url());
    Ok(web::Json(envelope.map(FollowedAuthorBody::from)))
}

#[cfg(test)]
#[path = "subscriptions_tests.rs"]
mod tests;
