//! Driving port for recipe mutations.
//!
//! Every mutation is author-scoped: only the recipe's author may replace or
//! delete it.

use async_trait::async_trait;

use crate::domain::{Error, RecipeDraft, RecipeId, RecipeView, UserId};

/// Recipe create, replace and delete.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeCommand: Send + Sync {
    /// Validate and persist a new recipe authored by `author`.
    ///
    /// # Errors
    ///
    /// Returns `invalid_request` with per-field details when the draft is
    /// incomplete or references unknown ingredients.
    async fn create(&self, author: UserId, draft: RecipeDraft) -> Result<RecipeView, Error>;

    /// Replace the supplied fields of an existing recipe.
    ///
    /// # Errors
    ///
    /// Returns `not_found` for an unknown recipe, `forbidden` when `caller`
    /// is not the author and `invalid_request` for an invalid draft.
    async fn replace(
        &self,
        caller: UserId,
        id: RecipeId,
        draft: RecipeDraft,
    ) -> Result<RecipeView, Error>;

    /// Delete a recipe and everything that references it.
    async fn delete(&self, caller: UserId, id: RecipeId) -> Result<(), Error>;
}
