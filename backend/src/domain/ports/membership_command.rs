//! Driving port for favorite and shopping cart toggles.

use async_trait::async_trait;

use crate::domain::{Error, MembershipKind, RecipeId, RecipeSummary, UserId};

/// Toggle recipes in and out of a user's membership sets.
///
/// Adding twice fails with `already_exists`; removing a non-member fails
/// with `not_found`. Callers wanting retry safety treat those errors as
/// success.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipCommand: Send + Sync {
    /// Add `recipe` to the set, returning its short projection.
    async fn add(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<RecipeSummary, Error>;

    async fn remove(&self, kind: MembershipKind, user: UserId, recipe: RecipeId)
    -> Result<(), Error>;
}
