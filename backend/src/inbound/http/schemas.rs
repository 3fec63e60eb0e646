//! OpenAPI schema definitions for types that do not derive `ToSchema`.
//!
//! Domain types stay framework-agnostic, and the `pagination` crate knows
//! nothing about utoipa, so their documented shapes are declared here.

use utoipa::ToSchema;

use crate::inbound::http::recipes_dto::RecipeBody;
use crate::inbound::http::subscriptions::FollowedAuthorBody;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = crate::domain::ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// No authenticated user on the session.
    #[schema(rename = "unauthorized")]
    Unauthorized,
    /// Only the author may change this resource.
    #[schema(rename = "forbidden")]
    Forbidden,
    #[schema(rename = "not_found")]
    NotFound,
    /// The favorite, cart entry or subscription is already present.
    #[schema(rename = "already_exists")]
    AlreadyExists,
    /// The operation is never allowed, such as following yourself.
    #[schema(rename = "invalid_operation")]
    InvalidOperation,
    /// The database is unreachable.
    #[schema(rename = "service_unavailable")]
    ServiceUnavailable,
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::domain::Error`].
#[derive(ToSchema)]
#[schema(as = crate::domain::Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    #[schema(example = "invalid_request")]
    code: ErrorCodeSchema,
    #[schema(example = "recipe validation failed")]
    message: String,
    /// Correlates the response with server logs.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Field-level problems, keyed by field name for validation failures.
    details: Option<serde_json::Value>,
}

/// Page of recipes.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct RecipePageSchema {
    count: u64,
    /// Absolute URL of the next page.
    next: Option<String>,
    previous: Option<String>,
    results: Vec<RecipeBody>,
}

/// Page of followed authors with recipe previews.
#[derive(ToSchema)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct FollowedAuthorPageSchema {
    count: u64,
    next: Option<String>,
    previous: Option<String>,
    results: Vec<FollowedAuthorBody>,
}
