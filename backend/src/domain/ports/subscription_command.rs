//! Driving port for follow and unfollow.

use async_trait::async_trait;

use crate::domain::{Error, FollowedAuthor, RecipePreviewLimit, UserId};

/// Subscribe to and unsubscribe from authors.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionCommand: Send + Sync {
    /// Follow `author`, returning the author with a recipe preview.
    ///
    /// # Errors
    ///
    /// Self-subscription fails with `invalid_operation` before any lookup.
    /// An unknown author yields `not_found` and an existing edge
    /// `already_exists`.
    async fn subscribe(
        &self,
        follower: UserId,
        author: UserId,
        preview: RecipePreviewLimit,
    ) -> Result<FollowedAuthor, Error>;

    async fn unsubscribe(&self, follower: UserId, author: UserId) -> Result<(), Error>;
}
