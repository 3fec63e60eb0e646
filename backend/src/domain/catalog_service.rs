//! Ingredient catalog service implementing the catalog driving ports.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use super::port_errors;
use crate::domain::ports::{IngredientCatalog, IngredientImport, IngredientQuery};
use crate::domain::{Error, ImportSummary, Ingredient, IngredientId, IngredientSpec};

/// Read and import access to the ingredient catalog.
#[derive(Clone)]
pub struct IngredientCatalogService<C> {
    catalog: Arc<C>,
}

impl<C> IngredientCatalogService<C> {
    pub fn new(catalog: Arc<C>) -> Self {
        Self { catalog }
    }
}

#[async_trait]
impl<C> IngredientQuery for IngredientCatalogService<C>
where
    C: IngredientCatalog,
{
    async fn get(&self, id: IngredientId) -> Result<Ingredient, Error> {
        self.catalog
            .find_by_id(id)
            .await
            .map_err(port_errors::catalog)?
            .ok_or_else(|| Error::not_found(format!("ingredient {id} not found")))
    }

    async fn search(&self, name_prefix: Option<String>) -> Result<Vec<Ingredient>, Error> {
        let prefix = name_prefix
            .map(|raw| raw.trim().to_owned())
            .filter(|trimmed| !trimmed.is_empty());
        self.catalog
            .search(prefix)
            .await
            .map_err(port_errors::catalog)
    }
}

#[async_trait]
impl<C> IngredientImport for IngredientCatalogService<C>
where
    C: IngredientCatalog,
{
    async fn import(&self, specs: Vec<IngredientSpec>) -> Result<ImportSummary, Error> {
        let total = specs.len();
        let mut seen = HashSet::with_capacity(total);
        let unique: Vec<IngredientSpec> = specs
            .into_iter()
            .filter(|spec| seen.insert(spec.clone()))
            .collect();
        let repeated = total - unique.len();

        let summary = self
            .catalog
            .import(unique)
            .await
            .map_err(port_errors::catalog)?;
        Ok(ImportSummary {
            inserted: summary.inserted,
            skipped: summary.skipped + repeated,
        })
    }
}
