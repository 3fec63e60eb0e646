//! PostgreSQL-backed `SubscriptionRepository` implementation.

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use pagination::PageRequest;

use crate::domain::ports::{SubscriptionRepository, SubscriptionRepositoryError};
use crate::domain::{Page, UserId, UserProfile};

use super::diesel_user_directory::row_to_profile;
use super::error_mapping::{DieselFailure, classify, pool_error_message};
use super::models::UserRow;
use super::pool::{DbPool, PoolError};
use super::schema::{subscriptions, users};

/// Diesel-backed follow graph.
#[derive(Clone)]
pub struct DieselSubscriptionRepository {
    pool: DbPool,
}

impl DieselSubscriptionRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

fn map_pool_error(error: PoolError) -> SubscriptionRepositoryError {
    SubscriptionRepositoryError::connection(pool_error_message(error))
}

fn map_diesel_error(error: diesel::result::Error, author: UserId) -> SubscriptionRepositoryError {
    match classify(&error) {
        DieselFailure::Connection(message) => SubscriptionRepositoryError::connection(message),
        DieselFailure::Query(message) => SubscriptionRepositoryError::query(message),
        DieselFailure::UniqueViolation { .. } => {
            SubscriptionRepositoryError::already_subscribed(author.to_string())
        }
        DieselFailure::ForeignKeyViolation { .. } => {
            SubscriptionRepositoryError::author_not_found(author.to_string())
        }
        DieselFailure::CheckViolation { .. } => SubscriptionRepositoryError::self_subscription(),
    }
}

fn edge(
    follower: UserId,
    author: UserId,
) -> diesel::dsl::And<
    diesel::dsl::Eq<subscriptions::follower_id, uuid::Uuid>,
    diesel::dsl::Eq<subscriptions::author_id, uuid::Uuid>,
> {
    subscriptions::follower_id
        .eq(*follower.as_uuid())
        .and(subscriptions::author_id.eq(*author.as_uuid()))
}

#[async_trait]
impl SubscriptionRepository for DieselSubscriptionRepository {
    async fn subscribe(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<(), SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::insert_into(subscriptions::table)
            .values((
                subscriptions::follower_id.eq(*follower.as_uuid()),
                subscriptions::author_id.eq(*author.as_uuid()),
            ))
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|error| map_diesel_error(error, author))
    }

    async fn unsubscribe(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let deleted = diesel::delete(subscriptions::table.filter(edge(follower, author)))
            .execute(&mut conn)
            .await
            .map_err(|error| map_diesel_error(error, author))?;
        Ok(deleted > 0)
    }

    async fn is_subscribed(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        diesel::select(diesel::dsl::exists(
            subscriptions::table.filter(edge(follower, author)),
        ))
        .get_result::<bool>(&mut conn)
        .await
        .map_err(|error| map_diesel_error(error, author))
    }

    async fn followed_authors(
        &self,
        follower: UserId,
        page: PageRequest,
    ) -> Result<Page<UserProfile>, SubscriptionRepositoryError> {
        let offset = i64::try_from(page.offset()).map_err(|_| {
            SubscriptionRepositoryError::query(format!("page offset {} out of range", page.offset()))
        })?;
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let edges: i64 = subscriptions::table
            .filter(subscriptions::follower_id.eq(*follower.as_uuid()))
            .count()
            .get_result(&mut conn)
            .await
            .map_err(map_listing_error)?;
        let total = usize::try_from(edges).map_err(|_| {
            SubscriptionRepositoryError::query(format!("invalid subscription count: {edges}"))
        })?;
        let rows: Vec<UserRow> = users::table
            .filter(
                users::id.eq_any(
                    subscriptions::table
                        .filter(subscriptions::follower_id.eq(*follower.as_uuid()))
                        .select(subscriptions::author_id),
                ),
            )
            .order((users::username, users::id))
            .offset(offset)
            .limit(i64::from(page.limit()))
            .select(UserRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_listing_error)?;
        Ok(Page::new(
            rows.into_iter().map(row_to_profile).collect(),
            total,
        ))
    }
}

fn map_listing_error(error: diesel::result::Error) -> SubscriptionRepositoryError {
    match classify(&error) {
        DieselFailure::Connection(message) => SubscriptionRepositoryError::connection(message),
        _ => SubscriptionRepositoryError::query("followed authors lookup failed"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use diesel::result::{DatabaseErrorKind, Error as DieselError};
    use rstest::rstest;

    #[rstest]
    #[case(DatabaseErrorKind::UniqueViolation, "already_subscribed")]
    #[case(DatabaseErrorKind::ForeignKeyViolation, "author_not_found")]
    #[case(DatabaseErrorKind::CheckViolation, "self_subscription")]
    fn constraint_violations_map_to_graph_errors(
        #[case] kind: DatabaseErrorKind,
        #[case] expected: &str,
    ) {
        let author = UserId::random();
        let error = map_diesel_error(
            DieselError::DatabaseError(kind, Box::new("constraint".to_owned())),
            author,
        );
        let actual = match error {
            SubscriptionRepositoryError::AlreadySubscribed { .. } => "already_subscribed",
            SubscriptionRepositoryError::AuthorNotFound { .. } => "author_not_found",
            SubscriptionRepositoryError::SelfSubscription => "self_subscription",
            _ => "other",
        };
        assert_eq!(actual, expected);
    }

    #[rstest]
    fn listing_failures_hide_constraint_details() {
        let error = map_listing_error(DieselError::DatabaseError(
            DatabaseErrorKind::UniqueViolation,
            Box::new("constraint".to_owned()),
        ));
        assert_eq!(
            error,
            SubscriptionRepositoryError::query("followed authors lookup failed")
        );
    }
}
