//! Driving ports for the ingredient catalog.
//!
//! HTTP handlers read the catalog through [`IngredientQuery`]; the
//! `load-ingredients` binary feeds reference data through
//! [`IngredientImport`].

use async_trait::async_trait;

use crate::domain::{Error, ImportSummary, Ingredient, IngredientId, IngredientSpec};

/// Read access to catalog ingredients.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientQuery: Send + Sync {
    /// Fetch one ingredient, failing with `not_found` if it is unknown.
    async fn get(&self, id: IngredientId) -> Result<Ingredient, Error>;

    /// Case-insensitive name prefix search. `None` or a blank prefix lists
    /// every ingredient.
    async fn search(&self, name_prefix: Option<String>) -> Result<Vec<Ingredient>, Error>;
}

/// Bulk import of reference data.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientImport: Send + Sync {
    async fn import(&self, specs: Vec<IngredientSpec>) -> Result<ImportSummary, Error>;
}
