//! PostgreSQL-backed read-only `UserDirectory`.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use uuid::Uuid;

use crate::domain::ports::{UserDirectory, UserDirectoryError};
use crate::domain::{UserId, UserProfile};

use super::error_mapping::{DieselFailure, classify, pool_error_message};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::users;

/// Diesel-backed user profile lookups.
#[derive(Clone)]
pub struct DieselUserDirectory {
    pool: DbPool,
}

impl DieselUserDirectory {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> UserDirectoryError {
    UserDirectoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error) -> UserDirectoryError {
    match classify(&error) {
        DieselFailure::Connection(message) => UserDirectoryError::connection(message),
        DieselFailure::Query(message) => UserDirectoryError::query(message),
        _ => UserDirectoryError::query("user lookup failed"),
    }
}

pub(super) fn row_to_profile(row: UserRow) -> UserProfile {
    UserProfile {
        id: UserId::from_uuid(row.id),
        email: row.email,
        username: row.username,
        first_name: row.first_name,
        last_name: row.last_name,
    }
}

#[async_trait]
impl UserDirectory for DieselUserDirectory {
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserProfile>, UserDirectoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row: Option<UserRow> = users::table
            .find(*id.as_uuid())
            .select(UserRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;
        Ok(row.map(row_to_profile))
    }

    async fn find_many(&self, ids: Vec<UserId>) -> Result<Vec<UserProfile>, UserDirectoryError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let uuids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let rows: Vec<UserRow> = users::table
            .filter(users::id.eq_any(uuids))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;
        Ok(rows.into_iter().map(row_to_profile).collect())
    }
}
