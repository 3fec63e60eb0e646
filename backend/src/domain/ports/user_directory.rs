//! Read-only port onto the externally managed user store.

use async_trait::async_trait;

use crate::domain::{UserId, UserProfile};

use super::define_port_error;

define_port_error! {
    /// Errors raised by user directory adapters.
    pub enum UserDirectoryError {
        /// Directory connection could not be established.
        Connection { message: String } =>
            "user directory connection failed: {message}",
        /// Query failed during execution.
        Query { message: String } =>
            "user directory query failed: {message}",
    }
}

/// Port for resolving user profiles.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserDirectory: Send + Sync {
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserProfile>, UserDirectoryError>;

    /// Profiles for every known id in `ids`, in no particular order.
    async fn find_many(&self, ids: Vec<UserId>) -> Result<Vec<UserProfile>, UserDirectoryError>;
}
