//! Translation of driven port failures into domain errors.
//!
//! Connection failures become `service_unavailable` and query failures
//! `internal`. Port-specific variants are mapped here only when their
//! meaning does not depend on the calling operation.

use serde_json::json;

use super::ports::{
    IngredientCatalogError, MembershipRepositoryError, RecipeRepositoryError,
    SubscriptionRepositoryError, UserDirectoryError,
};
use super::{Error, RecipeId, UserId};

pub(super) fn recipe_not_found(id: RecipeId) -> Error {
    Error::not_found(format!("recipe {id} not found")).with_details(json!({
        "code": "recipe_not_found",
        "recipeId": id.to_string(),
    }))
}

pub(super) fn author_not_found(id: UserId) -> Error {
    Error::not_found(format!("user {id} not found")).with_details(json!({
        "code": "author_not_found",
        "authorId": id.to_string(),
    }))
}

pub(super) fn catalog(error: IngredientCatalogError) -> Error {
    match error {
        IngredientCatalogError::Connection { message } => {
            Error::service_unavailable(format!("ingredient catalog unavailable: {message}"))
        }
        IngredientCatalogError::Query { message } => {
            Error::internal(format!("ingredient catalog error: {message}"))
        }
    }
}

pub(super) fn recipes(error: RecipeRepositoryError) -> Error {
    match error {
        RecipeRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("recipe repository unavailable: {message}"))
        }
        RecipeRepositoryError::Query { message } => {
            Error::internal(format!("recipe repository error: {message}"))
        }
        RecipeRepositoryError::NotFound { recipe_id } => {
            Error::not_found(format!("recipe {recipe_id} not found")).with_details(json!({
                "code": "recipe_not_found",
                "recipeId": recipe_id,
            }))
        }
        RecipeRepositoryError::MissingReference { message } => {
            Error::invalid_request(format!("recipe references a missing row: {message}"))
                .with_details(json!({ "code": "missing_reference" }))
        }
    }
}

pub(super) fn memberships(error: MembershipRepositoryError) -> Error {
    match error {
        MembershipRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("membership repository unavailable: {message}"))
        }
        MembershipRepositoryError::Query { message } => {
            Error::internal(format!("membership repository error: {message}"))
        }
        MembershipRepositoryError::AlreadyMember { recipe_id } => {
            Error::already_exists(format!("recipe {recipe_id} is already a member"))
        }
        MembershipRepositoryError::MissingReference { message } => {
            Error::not_found(format!("membership target missing: {message}"))
        }
    }
}

pub(super) fn subscriptions(error: SubscriptionRepositoryError) -> Error {
    match error {
        SubscriptionRepositoryError::Connection { message } => {
            Error::service_unavailable(format!("subscription repository unavailable: {message}"))
        }
        SubscriptionRepositoryError::Query { message } => {
            Error::internal(format!("subscription repository error: {message}"))
        }
        SubscriptionRepositoryError::AlreadySubscribed { author_id } => {
            Error::already_exists(format!("already subscribed to {author_id}"))
                .with_details(json!({ "code": "already_subscribed", "authorId": author_id }))
        }
        SubscriptionRepositoryError::AuthorNotFound { author_id } => {
            Error::not_found(format!("user {author_id} not found"))
                .with_details(json!({ "code": "author_not_found", "authorId": author_id }))
        }
        SubscriptionRepositoryError::SelfSubscription => self_subscription(),
    }
}

pub(super) fn self_subscription() -> Error {
    Error::invalid_operation("users cannot subscribe to themselves")
        .with_details(json!({ "code": "self_subscription" }))
}

pub(super) fn users(error: UserDirectoryError) -> Error {
    match error {
        UserDirectoryError::Connection { message } => {
            Error::service_unavailable(format!("user directory unavailable: {message}"))
        }
        UserDirectoryError::Query { message } => {
            Error::internal(format!("user directory error: {message}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;
    use rstest::rstest;

    #[rstest]
    #[case(RecipeRepositoryError::connection("refused"), ErrorCode::ServiceUnavailable)]
    #[case(RecipeRepositoryError::query("syntax"), ErrorCode::InternalError)]
    #[case(RecipeRepositoryError::not_found("r"), ErrorCode::NotFound)]
    #[case(RecipeRepositoryError::missing_reference("fk"), ErrorCode::InvalidRequest)]
    fn recipe_errors_map_to_codes(#[case] error: RecipeRepositoryError, #[case] code: ErrorCode) {
        assert_eq!(recipes(error).code(), code);
    }

    #[rstest]
    fn racing_duplicate_subscription_is_already_exists() {
        let error = subscriptions(SubscriptionRepositoryError::already_subscribed("a"));
        assert_eq!(error.code(), ErrorCode::AlreadyExists);
        assert_eq!(
            error.details().and_then(|d| d.get("code")),
            Some(&json!("already_subscribed"))
        );
    }

    #[rstest]
    fn storage_self_edge_rejection_is_invalid_operation() {
        let error = subscriptions(SubscriptionRepositoryError::self_subscription());
        assert_eq!(error.code(), ErrorCode::InvalidOperation);
    }
}
