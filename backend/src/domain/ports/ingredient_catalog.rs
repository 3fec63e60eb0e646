//! Port for the read-mostly ingredient reference catalog.
//!
//! Ingredients are bulk-loaded reference data identified by their
//! `(name, measurement_unit)` pair. The rest of the system only reads them.

use async_trait::async_trait;

use crate::domain::{ImportSummary, Ingredient, IngredientId, IngredientSpec};

use super::define_port_error;

define_port_error! {
    /// Errors raised by ingredient catalog adapters.
    pub enum IngredientCatalogError {
        /// Catalog storage could not be reached.
        Connection { message: String } =>
            "ingredient catalog connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "ingredient catalog query failed: {message}",
    }
}

/// Port for ingredient catalog lookups and imports.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait IngredientCatalog: Send + Sync {
    /// Fetch one ingredient by id.
    async fn find_by_id(&self, id: IngredientId)
    -> Result<Option<Ingredient>, IngredientCatalogError>;

    /// Fetch every ingredient whose id is in `ids`. Unknown ids are skipped
    /// and no particular order is guaranteed.
    async fn find_many(
        &self,
        ids: Vec<IngredientId>,
    ) -> Result<Vec<Ingredient>, IngredientCatalogError>;

    /// Case-insensitive name prefix search ordered by name then unit.
    ///
    /// `None` lists the whole catalog.
    async fn search(
        &self,
        name_prefix: Option<String>,
    ) -> Result<Vec<Ingredient>, IngredientCatalogError>;

    /// Insert `(name, unit)` pairs, skipping pairs already present.
    async fn import(
        &self,
        specs: Vec<IngredientSpec>,
    ) -> Result<ImportSummary, IngredientCatalogError>;
}
