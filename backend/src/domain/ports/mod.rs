//! Domain ports and supporting types for the hexagonal boundary.
//!
//! Driven ports (`*Repository`, [`IngredientCatalog`], [`UserDirectory`],
//! [`ImageStore`]) are implemented by outbound adapters. Driving ports
//! (`*Command`, `*Query`, [`IngredientImport`]) are implemented by domain
//! services and consumed by inbound adapters.

mod macros;
pub(crate) use macros::define_port_error;

mod image_store;
mod ingredient_catalog;
mod ingredient_query;
mod membership_command;
mod membership_repository;
mod recipe_command;
mod recipe_query;
mod recipe_repository;
mod shopping_list_query;
mod subscription_command;
mod subscription_query;
mod subscription_repository;
mod user_directory;

#[cfg(test)]
pub use image_store::MockImageStore;
pub use image_store::{ImageStore, ImageStoreError};
#[cfg(test)]
pub use ingredient_catalog::MockIngredientCatalog;
pub use ingredient_catalog::{IngredientCatalog, IngredientCatalogError};
#[cfg(test)]
pub use ingredient_query::{MockIngredientImport, MockIngredientQuery};
pub use ingredient_query::{IngredientImport, IngredientQuery};
#[cfg(test)]
pub use membership_command::MockMembershipCommand;
pub use membership_command::MembershipCommand;
#[cfg(test)]
pub use membership_repository::MockMembershipRepository;
pub use membership_repository::{MembershipRepository, MembershipRepositoryError};
#[cfg(test)]
pub use recipe_command::MockRecipeCommand;
pub use recipe_command::RecipeCommand;
#[cfg(test)]
pub use recipe_query::MockRecipeQuery;
pub use recipe_query::{RecipeListQuery, RecipeQuery};
#[cfg(test)]
pub use recipe_repository::MockRecipeRepository;
pub use recipe_repository::{RecipeRepository, RecipeRepositoryError};
#[cfg(test)]
pub use shopping_list_query::MockShoppingListQuery;
pub use shopping_list_query::ShoppingListQuery;
#[cfg(test)]
pub use subscription_command::MockSubscriptionCommand;
pub use subscription_command::SubscriptionCommand;
#[cfg(test)]
pub use subscription_query::MockSubscriptionQuery;
pub use subscription_query::SubscriptionQuery;
#[cfg(test)]
pub use subscription_repository::MockSubscriptionRepository;
pub use subscription_repository::{SubscriptionRepository, SubscriptionRepositoryError};
#[cfg(test)]
pub use user_directory::MockUserDirectory;
pub use user_directory::{UserDirectory, UserDirectoryError};
