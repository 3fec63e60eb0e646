//! Driving port for recipe reads.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{Error, Page, RecipeId, RecipeView, UserId};

/// Client-facing list filters.
///
/// Membership filters only apply to authenticated viewers; anonymous viewers
/// get the unfiltered list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeListQuery {
    pub author: Option<UserId>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}

/// Recipe lookups projected for a (possibly anonymous) viewer.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeQuery: Send + Sync {
    async fn get(&self, viewer: Option<UserId>, id: RecipeId) -> Result<RecipeView, Error>;

    /// One page of matching recipes, newest first.
    async fn list(
        &self,
        viewer: Option<UserId>,
        query: RecipeListQuery,
        page: PageRequest,
    ) -> Result<Page<RecipeView>, Error>;

    /// Absolute link to the recipe's public page.
    async fn short_link(&self, id: RecipeId) -> Result<String, Error>;
}
