//! PostgreSQL-backed `IngredientCatalog` implementation using Diesel ORM.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use tracing::info;
use uuid::Uuid;

use crate::domain::ports::{IngredientCatalog, IngredientCatalogError};
use crate::domain::{ImportSummary, Ingredient, IngredientId, IngredientSpec};

use super::error_mapping::{DieselFailure, classify, pool_error_message};
use super::models::{IngredientRow, NewIngredientRow};
use super::pool::{DbPool, PoolError};
use super::schema::ingredients;

/// Rows per INSERT; keeps bind parameters well under the PostgreSQL limit.
const IMPORT_CHUNK_SIZE: usize = 1_000;

diesel::define_sql_function! {
    /// SQL `lower(text)`.
    fn lower(value: diesel::sql_types::Text) -> diesel::sql_types::Text;
}

/// Diesel-backed ingredient catalog.
#[derive(Clone)]
pub struct DieselIngredientCatalog {
    pool: DbPool,
}

impl DieselIngredientCatalog {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> IngredientCatalogError {
    IngredientCatalogError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> IngredientCatalogError {
    match classify(&error) {
        DieselFailure::Connection(message) => IngredientCatalogError::connection(message),
        DieselFailure::Query(message) => IngredientCatalogError::query(message),
        DieselFailure::UniqueViolation { .. }
        | DieselFailure::ForeignKeyViolation { .. }
        | DieselFailure::CheckViolation { .. } => {
            IngredientCatalogError::query("ingredient constraint violated")
        }
    }
}

fn row_to_ingredient(row: IngredientRow) -> Ingredient {
    Ingredient {
        id: IngredientId::from_uuid(row.id),
        name: row.name,
        measurement_unit: row.measurement_unit,
    }
}

/// Lower-case LIKE pattern matching `prefix` literally.
fn prefix_pattern(prefix: &str) -> String {
    let mut pattern = String::with_capacity(prefix.len() + 1);
    for ch in prefix.to_lowercase().chars() {
        if matches!(ch, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

#[async_trait]
impl IngredientCatalog for DieselIngredientCatalog {
    async fn find_by_id(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, IngredientCatalogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<IngredientRow> = ingredients::table
            .find(*id.as_uuid())
            .select(IngredientRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_ingredient))
    }

    async fn find_many(
        &self,
        ids: Vec<IngredientId>,
    ) -> Result<Vec<Ingredient>, IngredientCatalogError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<IngredientRow> = ingredients::table
            .filter(ingredients::id.eq_any(uuids))
            .select(IngredientRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_ingredient).collect())
    }

    async fn search(
        &self,
        name_prefix: Option<String>,
    ) -> Result<Vec<Ingredient>, IngredientCatalogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut query = ingredients::table
            .select(IngredientRow::as_select())
            .order((ingredients::name, ingredients::measurement_unit))
            .into_boxed();
        if let Some(prefix) = name_prefix {
            query = query.filter(lower(ingredients::name).like(prefix_pattern(&prefix)));
        }
        let rows: Vec<IngredientRow> = query.load(&mut conn).await.map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_ingredient).collect())
    }

    async fn import(
        &self,
        specs: Vec<IngredientSpec>,
    ) -> Result<ImportSummary, IngredientCatalogError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut inserted = 0_usize;
        for chunk in specs.chunks(IMPORT_CHUNK_SIZE) {
            let rows: Vec<NewIngredientRow<'_>> = chunk
                .iter()
                .map(|spec| NewIngredientRow {
                    id: Uuid::new_v4(),
                    name: spec.name(),
                    measurement_unit: spec.measurement_unit(),
                })
                .collect();
            inserted += diesel::insert_into(ingredients::table)
                .values(&rows)
                .on_conflict((ingredients::name, ingredients::measurement_unit))
                .do_nothing()
                .execute(&mut conn)
                .await
                .map_err(map_diesel_error)?;
        }
        let summary = ImportSummary {
            inserted,
            skipped: specs.len().saturating_sub(inserted),
        };
        info!(
            inserted = summary.inserted,
            skipped = summary.skipped,
            "ingredient import finished"
        );
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("Flo", "flo%")]
    #[case("50%_mix", "50\\%\\_mix%")]
    #[case("a\\b", "a\\\\b%")]
    fn prefix_patterns_escape_like_wildcards(#[case] prefix: &str, #[case] expected: &str) {
        assert_eq!(prefix_pattern(prefix), expected);
    }

    #[rstest]
    fn constraint_violations_surface_as_query_errors() {
        let error = map_diesel_error(diesel::result::Error::NotFound);
        assert_eq!(error, IngredientCatalogError::query("record not found"));
    }
}
