//! Driving port for the followed-authors feed.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Error, FollowedAuthor, Page, RecipePreviewLimit, UserId};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionQuery: Send + Sync {
    /// One page of the authors `follower` follows, ordered by username.
    /// Only authors on that page get up to `preview` of their newest recipes
    /// loaded.
    async fn followed_authors(
        &self,
        follower: UserId,
        preview: RecipePreviewLimit,
        page: PageRequest,
    ) -> Result<Page<FollowedAuthor>, Error>;
}
