//! Port for the directed follower graph.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Page, UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by subscription repository adapters.
    pub enum SubscriptionRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "subscription repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "subscription repository query failed: {message}",
        /// The edge already exists.
        AlreadySubscribed { author_id: String } =>
            "already subscribed to {author_id}",
        /// The followed author does not exist.
        AuthorNotFound { author_id: String } =>
            "author {author_id} not found",
        /// Storage rejected a self-edge.
        SelfSubscription =>
            "users cannot subscribe to themselves",
    }
}

/// Port for follow edges between users.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubscriptionRepository: Send + Sync {
    async fn subscribe(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<(), SubscriptionRepositoryError>;

    /// Returns `false` when no edge existed.
    async fn unsubscribe(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError>;

    async fn is_subscribed(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError>;

    /// One page of the authors `follower` follows, ordered by username.
    async fn followed_authors(
        &self,
        follower: UserId,
        page: PageRequest,
    ) -> Result<Page<UserProfile>, SubscriptionRepositoryError>;
}
