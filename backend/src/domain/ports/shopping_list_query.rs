//! Driving port for shopping list export.

use async_trait::async_trait;

use crate::domain::{Error, ShoppingList, UserId};

/// Aggregate a user's shopping cart into a shopping list.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ShoppingListQuery: Send + Sync {
    async fn shopping_list(&self, user: UserId) -> Result<ShoppingList, Error>;
}
