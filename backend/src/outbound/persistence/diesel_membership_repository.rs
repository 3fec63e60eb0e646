//! PostgreSQL-backed `MembershipRepository` for favorites and the shopping
//! cart.
//!
//! Both sets live in structurally identical tables; [`with_membership_table`]
//! selects the table for a [`MembershipKind`] so each query is written once.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{MembershipRepository, MembershipRepositoryError};
use crate::domain::{MembershipKind, RecipeId, UserId};

use super::error_mapping::{DieselFailure, classify, pool_error_message};
use super::pool::{DbPool, PoolError};

/// Expand `$body` with `$table` bound to the schema module for `$kind`.
macro_rules! with_membership_table {
    ($kind:expr, |$table:ident| $body:expr) => {
        match $kind {
            MembershipKind::Favorite => {
                use super::schema::favorites as $table;
                $body
            }
            MembershipKind::ShoppingCart => {
                use super::schema::shopping_cart_entries as $table;
                $body
            }
        }
    };
}

/// Diesel-backed membership repository.
#[derive(Clone)]
pub struct DieselMembershipRepository {
    pool: DbPool,
}

impl DieselMembershipRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> MembershipRepositoryError {
    MembershipRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, recipe: RecipeId) -> MembershipRepositoryError {
    match classify(&error) {
        DieselFailure::Connection(message) => MembershipRepositoryError::connection(message),
        DieselFailure::Query(message) => MembershipRepositoryError::query(message),
        DieselFailure::UniqueViolation { .. } => {
            MembershipRepositoryError::already_member(recipe.to_string())
        }
        DieselFailure::ForeignKeyViolation { constraint } => {
            MembershipRepositoryError::missing_reference(
                constraint.unwrap_or_else(|| "foreign key".to_owned()),
            )
        }
        DieselFailure::CheckViolation { .. } => {
            MembershipRepositoryError::query("membership constraint violated")
        }
    }
}

#[async_trait]
impl MembershipRepository for DieselMembershipRepository {
    async fn add(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *user.as_uuid();
        let recipe_id = *recipe.as_uuid();
        with_membership_table!(kind, |table| {
            diesel::insert_into(table::table)
                .values((table::user_id.eq(user_id), table::recipe_id.eq(recipe_id)))
                .execute(&mut conn)
                .await
        })
        .map(|_| ())
        .map_err(|error| map_diesel_error(error, recipe))
    }

    async fn remove(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *user.as_uuid();
        let recipe_id = *recipe.as_uuid();
        let deleted = with_membership_table!(kind, |table| {
            diesel::delete(
                table::table
                    .filter(table::user_id.eq(user_id))
                    .filter(table::recipe_id.eq(recipe_id)),
            )
            .execute(&mut conn)
            .await
        })
        .map_err(|error| map_diesel_error(error, recipe))?;
        Ok(deleted > 0)
    }

    async fn contains(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *user.as_uuid();
        let recipe_id = *recipe.as_uuid();
        with_membership_table!(kind, |table| {
            diesel::select(diesel::dsl::exists(
                table::table
                    .filter(table::user_id.eq(user_id))
                    .filter(table::recipe_id.eq(recipe_id)),
            ))
            .get_result::<bool>(&mut conn)
            .await
        })
        .map_err(|error| map_diesel_error(error, recipe))
    }

    async fn recipe_ids(
        &self,
        kind: MembershipKind,
        user: UserId,
    ) -> Result<Vec<RecipeId>, MembershipRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let user_id = *user.as_uuid();
        let ids: Vec<Uuid> = with_membership_table!(kind, |table| {
            table::table
                .filter(table::user_id.eq(user_id))
                .order(table::id.asc())
                .select(table::recipe_id)
                .load::<Uuid>(&mut conn)
                .await
        })
        .map_err(|error| match classify(&error) {
            DieselFailure::Connection(message) => MembershipRepositoryError::connection(message),
            _ => MembershipRepositoryError::query("membership lookup failed"),
        })?;
        Ok(ids.into_iter().map(RecipeId::from_uuid).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    fn unique_violation() -> DieselError {
        DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("duplicate key value violates unique constraint".to_owned()),
        )
    }

    #[rstest]
    fn racing_duplicate_inserts_become_already_member() {
        let recipe = RecipeId::random();
        assert_eq!(
            map_diesel_error(unique_violation(), recipe),
            MembershipRepositoryError::already_member(recipe.to_string())
        );
    }
}
