//! Subscription graph service.
//!
//! Follow edges are directed and self-edges are rejected before any state
//! is read. Followed authors are paged first; only authors on the requested
//! page are projected with a bounded preview of their newest recipes and
//! their total recipe count.

use std::sync::Arc;

use async_trait::async_trait;
use pagination::PageRequest;
use serde_json::json;

use super::port_errors;
use crate::domain::ports::{
    RecipeRepository, SubscriptionCommand, SubscriptionQuery, SubscriptionRepository,
    UserDirectory,
};
use crate::domain::{Error, FollowedAuthor, Page, RecipePreviewLimit, UserId, UserProfile};

/// Subscription service implementing the follow driving ports.
#[derive(Clone)]
pub struct SubscriptionService<S, U, R> {
    subscriptions: Arc<S>,
    users: Arc<U>,
    recipes: Arc<R>,
}

impl<S, U, R> SubscriptionService<S, U, R> {
    pub fn new(subscriptions: Arc<S>, users: Arc<U>, recipes: Arc<R>) -> Self {
        Self {
            subscriptions,
            users,
            recipes,
        }
    }
}

impl<S, U, R> SubscriptionService<S, U, R>
where
    S: SubscriptionRepository,
    U: UserDirectory,
    R: RecipeRepository,
{
    async fn author(&self, id: UserId) -> Result<UserProfile, Error> {
        self.users
            .find_by_id(id)
            .await
            .map_err(port_errors::users)?
            .ok_or_else(|| port_errors::author_not_found(id))
    }

    async fn with_preview(
        &self,
        profile: UserProfile,
        preview: RecipePreviewLimit,
    ) -> Result<FollowedAuthor, Error> {
        let recipes = if preview.get() == 0 {
            Vec::new()
        } else {
            self.recipes
                .summaries_by_author(profile.id, preview.get())
                .await
                .map_err(port_errors::recipes)?
        };
        let recipes_count = self
            .recipes
            .count_by_author(profile.id)
            .await
            .map_err(port_errors::recipes)?;
        Ok(FollowedAuthor {
            profile,
            recipes,
            recipes_count,
        })
    }
}

#[async_trait]
impl<S, U, R> SubscriptionCommand for SubscriptionService<S, U, R>
where
    S: SubscriptionRepository,
    U: UserDirectory,
    R: RecipeRepository,
{
    async fn subscribe(
        &self,
        follower: UserId,
        author: UserId,
        preview: RecipePreviewLimit,
    ) -> Result<FollowedAuthor, Error> {
        if follower == author {
            return Err(port_errors::self_subscription());
        }
        let profile = self.author(author).await?;
        self.subscriptions
            .subscribe(follower, author)
            .await
            .map_err(port_errors::subscriptions)?;
        self.with_preview(profile, preview).await
    }

    async fn unsubscribe(&self, follower: UserId, author: UserId) -> Result<(), Error> {
        self.author(author).await?;
        let removed = self
            .subscriptions
            .unsubscribe(follower, author)
            .await
            .map_err(port_errors::subscriptions)?;
        if removed {
            Ok(())
        } else {
            Err(
                Error::not_found(format!("not subscribed to {author}")).with_details(json!({
                    "code": "not_subscribed",
                    "authorId": author.to_string(),
                })),
            )
        }
    }
}

#[async_trait]
impl<S, U, R> SubscriptionQuery for SubscriptionService<S, U, R>
where
    S: SubscriptionRepository,
    U: UserDirectory,
    R: RecipeRepository,
{
    async fn followed_authors(
        &self,
        follower: UserId,
        preview: RecipePreviewLimit,
        page: PageRequest,
    ) -> Result<Page<FollowedAuthor>, Error> {
        let Page { items, total } = self
            .subscriptions
            .followed_authors(follower, page)
            .await
            .map_err(port_errors::subscriptions)?;
        let mut followed = Vec::with_capacity(items.len());
        for profile in items {
            followed.push(self.with_preview(profile, preview).await?);
        }
        Ok(Page::new(followed, total))
    }
}
