//! PostgreSQL-backed `RecipeRepository` implementation using Diesel ORM.
//!
//! A recipe row and its ingredient lines are written in one transaction.
//! Replacing lines deletes the previous set and inserts the new one inside
//! the same transaction as the scalar update, so concurrent readers see
//! either the old or the new line set, never an empty one.

use std::collections::HashMap;

use async_trait::async_trait;
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::result::Error as DieselError;
use diesel_async::scoped_futures::ScopedFutureExt;
use diesel_async::{AsyncConnection, AsyncPgConnection, RunQueryDsl};
use pagination::PageRequest;
use uuid::Uuid;

use crate::domain::ports::{RecipeRepository, RecipeRepositoryError};
use crate::domain::{
    Amount, CartLine, CookingTime, Ingredient, IngredientId, IngredientLine, NewRecipe, Page,
    Recipe, RecipeChanges, RecipeFilter, RecipeId, RecipeIngredient, RecipeSummary, UserId,
};

use super::error_mapping::{DieselFailure, classify, pool_error_message};
use super::models::{NewRecipeIngredientRow, NewRecipeRow, RecipeLineRow, RecipeRow, RecipeUpdate};
use super::pool::{DbPool, PoolError};
use super::schema::{favorites, ingredients, recipe_ingredients, recipes, shopping_cart_entries};

/// Diesel-backed recipe repository.
#[derive(Clone)]
pub struct DieselRecipeRepository {
    pool: DbPool,
}

impl DieselRecipeRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> RecipeRepositoryError {
    RecipeRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: DieselError) -> RecipeRepositoryError {
    match classify(&error) {
        DieselFailure::Connection(message) => RecipeRepositoryError::connection(message),
        DieselFailure::Query(message) => RecipeRepositoryError::query(message),
        DieselFailure::ForeignKeyViolation { constraint } => {
            RecipeRepositoryError::missing_reference(
                constraint.unwrap_or_else(|| "foreign key".to_owned()),
            )
        }
        DieselFailure::UniqueViolation { .. } => {
            RecipeRepositoryError::query("duplicate ingredient line")
        }
        DieselFailure::CheckViolation { constraint } => RecipeRepositoryError::query(format!(
            "check constraint {} violated",
            constraint.as_deref().unwrap_or("unknown")
        )),
    }
}

fn stored_u32(value: i64, column: &str) -> Result<u32, RecipeRepositoryError> {
    u32::try_from(value)
        .map_err(|_| RecipeRepositoryError::query(format!("stored {column} out of range: {value}")))
}

fn line_rows(recipe_id: Uuid, lines: &[IngredientLine]) -> Vec<NewRecipeIngredientRow> {
    lines
        .iter()
        .zip(0_i32..)
        .map(|(line, position)| NewRecipeIngredientRow {
            recipe_id,
            ingredient_id: *line.ingredient_id.as_uuid(),
            amount: i64::from(line.amount.value()),
            position,
        })
        .collect()
}

async fn load_lines(
    conn: &mut AsyncPgConnection,
    recipe_ids: Vec<Uuid>,
) -> QueryResult<Vec<RecipeLineRow>> {
    recipe_ingredients::table
        .inner_join(ingredients::table)
        .filter(recipe_ingredients::recipe_id.eq_any(recipe_ids))
        .order((recipe_ingredients::recipe_id, recipe_ingredients::position))
        .select((
            recipe_ingredients::recipe_id,
            ingredients::id,
            ingredients::name,
            ingredients::measurement_unit,
            recipe_ingredients::amount,
        ))
        .load(conn)
        .await
}

async fn load_one(
    conn: &mut AsyncPgConnection,
    id: Uuid,
) -> QueryResult<Option<(RecipeRow, Vec<RecipeLineRow>)>> {
    let row: Option<RecipeRow> = recipes::table
        .find(id)
        .select(RecipeRow::as_select())
        .first(conn)
        .await
        .optional()?;
    match row {
        Some(row) => {
            let lines = load_lines(conn, vec![row.id]).await?;
            Ok(Some((row, lines)))
        }
        None => Ok(None),
    }
}

fn assemble(row: RecipeRow, lines: Vec<RecipeLineRow>) -> Result<Recipe, RecipeRepositoryError> {
    let cooking_time = CookingTime::new(row.cooking_time).ok_or_else(|| {
        RecipeRepositoryError::query(format!("stored cooking_time out of range: {}", row.cooking_time))
    })?;
    let ingredients = lines
        .into_iter()
        .map(|line| {
            let amount = Amount::new(line.amount).ok_or_else(|| {
                RecipeRepositoryError::query(format!("stored amount out of range: {}", line.amount))
            })?;
            Ok(RecipeIngredient {
                ingredient: Ingredient {
                    id: IngredientId::from_uuid(line.ingredient_id),
                    name: line.name,
                    measurement_unit: line.measurement_unit,
                },
                amount,
            })
        })
        .collect::<Result<Vec<_>, RecipeRepositoryError>>()?;

    Ok(Recipe {
        id: RecipeId::from_uuid(row.id),
        author: UserId::from_uuid(row.author_id),
        name: row.name,
        text: row.text,
        image: row.image,
        cooking_time,
        created_at: row.created_at,
        ingredients,
    })
}

fn assemble_many(
    rows: Vec<RecipeRow>,
    lines: Vec<RecipeLineRow>,
) -> Result<Vec<Recipe>, RecipeRepositoryError> {
    let mut grouped: HashMap<Uuid, Vec<RecipeLineRow>> = HashMap::new();
    for line in lines {
        grouped.entry(line.recipe_id).or_default().push(line);
    }
    rows.into_iter()
        .map(|row| {
            let lines = grouped.remove(&row.id).unwrap_or_default();
            assemble(row, lines)
        })
        .collect()
}

fn row_to_summary(row: RecipeRow) -> Result<RecipeSummary, RecipeRepositoryError> {
    let cooking_time = CookingTime::new(row.cooking_time).ok_or_else(|| {
        RecipeRepositoryError::query(format!("stored cooking_time out of range: {}", row.cooking_time))
    })?;
    Ok(RecipeSummary {
        id: RecipeId::from_uuid(row.id),
        name: row.name,
        image: row.image,
        cooking_time,
    })
}

#[async_trait]
impl RecipeRepository for DieselRecipeRepository {
    async fn create(&self, recipe: NewRecipe) -> Result<Recipe, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let id = *recipe.id.as_uuid();

        let stored = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let row = NewRecipeRow {
                        id,
                        author_id: *recipe.author.as_uuid(),
                        name: &recipe.name,
                        text: &recipe.text,
                        image: &recipe.image,
                        cooking_time: i64::from(recipe.cooking_time.minutes()),
                        created_at: recipe.created_at,
                    };
                    diesel::insert_into(recipes::table)
                        .values(&row)
                        .execute(conn)
                        .await?;
                    diesel::insert_into(recipe_ingredients::table)
                        .values(&line_rows(id, &recipe.lines))
                        .execute(conn)
                        .await?;
                    load_one(conn, id).await
                }
                .scope_boxed()
            })
            .await
            .map_err(map_diesel_error)?;

        let (row, lines) = stored.ok_or_else(|| {
            RecipeRepositoryError::query("recipe vanished inside its creating transaction")
        })?;
        assemble(row, lines)
    }

    async fn replace(
        &self,
        id: RecipeId,
        changes: RecipeChanges,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let recipe_id = *id.as_uuid();

        let stored = conn
            .transaction::<_, DieselError, _>(|conn| {
                async move {
                    let locked: Option<Uuid> = recipes::table
                        .find(recipe_id)
                        .select(recipes::id)
                        .for_update()
                        .first(conn)
                        .await
                        .optional()?;
                    if locked.is_none() {
                        return Err(DieselError::NotFound);
                    }

                    let update = RecipeUpdate {
                        name: changes.name.as_deref(),
                        text: changes.text.as_deref(),
                        image: changes.image.as_deref(),
                        cooking_time: changes
                            .cooking_time
                            .map(|time| i64::from(time.minutes())),
                    };
                    if !update.is_empty() {
                        diesel::update(recipes::table.find(recipe_id))
                            .set(&update)
                            .execute(conn)
                            .await?;
                    }

                    if let Some(lines) = changes.lines.as_deref() {
                        diesel::delete(
                            recipe_ingredients::table
                                .filter(recipe_ingredients::recipe_id.eq(recipe_id)),
                        )
                        .execute(conn)
                        .await?;
                        diesel::insert_into(recipe_ingredients::table)
                            .values(&line_rows(recipe_id, lines))
                            .execute(conn)
                            .await?;
                    }

                    load_one(conn, recipe_id).await
                }
                .scope_boxed()
            })
            .await
            .map_err(|error| match error {
                DieselError::NotFound => RecipeRepositoryError::not_found(id.to_string()),
                other => map_diesel_error(other),
            })?;

        let (row, lines) = stored.ok_or_else(|| RecipeRepositoryError::not_found(id.to_string()))?;
        assemble(row, lines)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(recipes::table.find(*id.as_uuid()))
            .execute(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(deleted > 0)
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let stored = load_one(&mut conn, *id.as_uuid())
            .await
            .map_err(map_diesel_error)?;
        stored.map(|(row, lines)| assemble(row, lines)).transpose()
    }

    async fn list(
        &self,
        filter: RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, RecipeRepositoryError> {
        let offset = window_bound(page.offset())?;
        let limit = i64::from(page.limit());
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let matches: i64 = filtered(filter)
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        let total = window_total(matches)?;

        let rows: Vec<RecipeRow> = filtered(filter)
            .select(RecipeRow::as_select())
            .order((recipes::created_at.desc(), recipes::id.desc()))
            .offset(offset)
            .limit(limit)
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        if rows.is_empty() {
            return Ok(Page::new(Vec::new(), total));
        }
        let ids: Vec<Uuid> = rows.iter().map(|row| row.id).collect();
        let lines = load_lines(&mut conn, ids)
            .await
            .map_err(map_diesel_error)?;
        Ok(Page::new(assemble_many(rows, lines)?, total))
    }

    async fn summaries_by_author(
        &self,
        author: UserId,
        limit: u32,
    ) -> Result<Vec<RecipeSummary>, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<RecipeRow> = recipes::table
            .filter(recipes::author_id.eq(*author.as_uuid()))
            .order((recipes::created_at.desc(), recipes::id.desc()))
            .limit(i64::from(limit))
            .select(RecipeRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        rows.into_iter().map(row_to_summary).collect()
    }

    async fn count_by_author(&self, author: UserId) -> Result<u64, RecipeRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let count: i64 = recipes::table
            .filter(recipes::author_id.eq(*author.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        u64::try_from(count)
            .map_err(|_| RecipeRepositoryError::query(format!("negative recipe count: {count}")))
    }

    async fn cart_lines(
        &self,
        recipe_ids: Vec<RecipeId>,
    ) -> Result<Vec<CartLine>, RecipeRepositoryError> {
        if recipe_ids.is_empty() {
            return Ok(Vec::new());
        }
        let order: HashMap<Uuid, usize> = recipe_ids
            .iter()
            .enumerate()
            .map(|(index, id)| (*id.as_uuid(), index))
            .collect();
        let uuids: Vec<Uuid> = order.keys().copied().collect();

        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let mut rows = load_lines(&mut conn, uuids)
            .await
            .map_err(map_diesel_error)?;
        rows.sort_by_key(|row| order.get(&row.recipe_id).copied().unwrap_or(usize::MAX));

        rows.into_iter()
            .map(|row| {
                Ok(CartLine {
                    recipe_id: RecipeId::from_uuid(row.recipe_id),
                    ingredient_id: IngredientId::from_uuid(row.ingredient_id),
                    name: row.name,
                    measurement_unit: row.measurement_unit,
                    amount: stored_u32(row.amount, "amount")?,
                })
            })
            .collect()
    }
}

/// Recipes matching every populated field of `filter`.
fn filtered(filter: RecipeFilter) -> recipes::BoxedQuery<'static, Pg> {
    let mut query = recipes::table.into_boxed();
    if let Some(author) = filter.author {
        query = query.filter(recipes::author_id.eq(*author.as_uuid()));
    }
    if let Some(user) = filter.favorited_by {
        query = query.filter(
            recipes::id.eq_any(
                favorites::table
                    .filter(favorites::user_id.eq(*user.as_uuid()))
                    .select(favorites::recipe_id),
            ),
        );
    }
    if let Some(user) = filter.in_cart_of {
        query = query.filter(
            recipes::id.eq_any(
                shopping_cart_entries::table
                    .filter(shopping_cart_entries::user_id.eq(*user.as_uuid()))
                    .select(shopping_cart_entries::recipe_id),
            ),
        );
    }
    query
}

fn window_bound(offset: usize) -> Result<i64, RecipeRepositoryError> {
    i64::try_from(offset)
        .map_err(|_| RecipeRepositoryError::query(format!("page offset {offset} out of range")))
}

fn window_total(count: i64) -> Result<usize, RecipeRepositoryError> {
    usize::try_from(count)
        .map_err(|_| RecipeRepositoryError::query(format!("invalid recipe count: {count}")))
}

#[cfg(test)]
mod tests {
    //! Row conversion and error mapping coverage; queries are exercised
    //! against a live database outside the unit test suite.
    use super::*;
    use chrono::Utc;
    use rstest::rstest;

    fn row(cooking_time: i64) -> RecipeRow {
        RecipeRow {
            id: Uuid::new_v4(),
            author_id: Uuid::new_v4(),
            name: "Pancakes".to_owned(),
            text: "Mix and fry.".to_owned(),
            image: "https://media.example.test/recipes/p.png".to_owned(),
            cooking_time,
            created_at: Utc::now(),
        }
    }

    fn line(recipe_id: Uuid, name: &str, amount: i64) -> RecipeLineRow {
        RecipeLineRow {
            recipe_id,
            ingredient_id: Uuid::new_v4(),
            name: name.to_owned(),
            measurement_unit: "g".to_owned(),
            amount,
        }
    }

    #[rstest]
    fn line_rows_record_positions_in_order() {
        let recipe_id = Uuid::new_v4();
        let lines = vec![
            IngredientLine {
                ingredient_id: IngredientId::random(),
                amount: Amount::new(5).expect("amount"),
            },
            IngredientLine {
                ingredient_id: IngredientId::random(),
                amount: Amount::new(7).expect("amount"),
            },
        ];
        let rows = line_rows(recipe_id, &lines);
        let positions: Vec<(i32, i64)> = rows.iter().map(|r| (r.position, r.amount)).collect();
        assert_eq!(positions, vec![(0, 5), (1, 7)]);
    }

    #[rstest]
    fn assemble_many_groups_lines_by_recipe() {
        let first = row(10);
        let second = row(20);
        let lines = vec![
            line(second.id, "sugar", 50),
            line(first.id, "flour", 200),
            line(first.id, "egg", 2),
        ];
        let recipes = assemble_many(vec![first, second], lines).expect("assembled");

        let names: Vec<Vec<&str>> = recipes
            .iter()
            .map(|recipe| {
                recipe
                    .ingredients
                    .iter()
                    .map(|i| i.ingredient.name.as_str())
                    .collect()
            })
            .collect();
        assert_eq!(names, vec![vec!["flour", "egg"], vec!["sugar"]]);
    }

    #[rstest]
    #[case(0)]
    #[case(-1)]
    fn invalid_stored_cooking_time_is_a_query_error(#[case] minutes: i64) {
        let error = assemble(row(minutes), Vec::new()).expect_err("out of range");
        assert!(matches!(error, RecipeRepositoryError::Query { .. }));
    }

    #[rstest]
    fn missing_rows_map_to_query_errors() {
        assert_eq!(
            map_diesel_error(DieselError::NotFound),
            RecipeRepositoryError::query("record not found")
        );
    }

    #[rstest]
    fn negative_match_count_is_a_query_error() {
        assert_eq!(window_total(7).expect("count"), 7);
        assert!(matches!(
            window_total(-1),
            Err(RecipeRepositoryError::Query { .. })
        ));
    }

    #[rstest]
    fn filters_are_pushed_into_the_where_clause() {
        let filter = RecipeFilter {
            author: Some(UserId::random()),
            favorited_by: Some(UserId::random()),
            in_cart_of: None,
        };
        let sql = diesel::debug_query::<Pg, _>(&filtered(filter).count()).to_string();
        assert!(sql.contains("\"recipes\".\"author_id\" = $1"), "{sql}");
        assert!(sql.contains("\"favorites\""), "{sql}");
        assert!(!sql.contains("shopping_cart_entries"), "{sql}");
    }
}
