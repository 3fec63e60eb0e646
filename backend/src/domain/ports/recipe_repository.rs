//! Port for recipe persistence.
//!
//! Adapters store a recipe together with its ingredient lines. Creating a
//! recipe and replacing its lines are each a single all-or-nothing unit of
//! work: readers never observe a recipe without lines.

use async_trait::async_trait;
use pagination::PageRequest;

use crate::domain::{
    CartLine, NewRecipe, Page, Recipe, RecipeChanges, RecipeFilter, RecipeId, RecipeSummary,
    UserId,
};

use super::define_port_error;

define_port_error! {
    /// Errors raised by recipe repository adapters.
    pub enum RecipeRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "recipe repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "recipe repository query failed: {message}",
        /// The recipe to update does not exist.
        NotFound { recipe_id: String } =>
            "recipe {recipe_id} not found",
        /// A referenced author or ingredient disappeared mid-write.
        MissingReference { message: String } =>
            "recipe references a missing row: {message}",
    }
}

/// Port for recipe storage and retrieval.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait RecipeRepository: Send + Sync {
    /// Persist a recipe and its lines atomically, returning the stored
    /// recipe with resolved ingredients.
    async fn create(&self, recipe: NewRecipe) -> Result<Recipe, RecipeRepositoryError>;

    /// Apply `changes` in one transaction. When `changes.lines` is present
    /// every existing line is removed before the new set is inserted.
    async fn replace(
        &self,
        id: RecipeId,
        changes: RecipeChanges,
    ) -> Result<Recipe, RecipeRepositoryError>;

    /// Delete a recipe with its lines and memberships.
    ///
    /// Returns `false` when nothing was deleted.
    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError>;

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError>;

    /// The requested page of recipes matching `filter`, newest first, with
    /// the number of matches across all pages.
    async fn list(
        &self,
        filter: RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, RecipeRepositoryError>;

    /// Newest `limit` recipes by `author`.
    async fn summaries_by_author(
        &self,
        author: UserId,
        limit: u32,
    ) -> Result<Vec<RecipeSummary>, RecipeRepositoryError>;

    async fn count_by_author(&self, author: UserId) -> Result<u64, RecipeRepositoryError>;

    /// Ingredient lines of the given recipes, grouped by recipe in the order
    /// of `recipe_ids` and by position within each recipe.
    async fn cart_lines(
        &self,
        recipe_ids: Vec<RecipeId>,
    ) -> Result<Vec<CartLine>, RecipeRepositoryError>;
}
