//! Port for per-user recipe membership sets (favorites, shopping cart).

use async_trait::async_trait;

use crate::domain::{MembershipKind, RecipeId, UserId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by membership repository adapters.
    pub enum MembershipRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "membership repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "membership repository query failed: {message}",
        /// The `(user, recipe)` pair is already a member.
        AlreadyMember { recipe_id: String } =>
            "recipe {recipe_id} is already a member",
        /// The user or recipe no longer exists.
        MissingReference { message: String } =>
            "membership references a missing row: {message}",
    }
}

/// Port for toggling and reading membership sets.
///
/// The `(user, recipe)` uniqueness rule is enforced by storage; a racing
/// duplicate insert surfaces as [`MembershipRepositoryError::AlreadyMember`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MembershipRepository: Send + Sync {
    async fn add(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), MembershipRepositoryError>;

    /// Returns `false` when the pair was not a member.
    async fn remove(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, MembershipRepositoryError>;

    async fn contains(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, MembershipRepositoryError>;

    /// Member recipe ids in insertion order.
    async fn recipe_ids(
        &self,
        kind: MembershipKind,
        user: UserId,
    ) -> Result<Vec<RecipeId>, MembershipRepositoryError>;
}
