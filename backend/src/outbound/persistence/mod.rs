//! PostgreSQL adapters for the driven ports, built on Diesel with
//! `diesel-async` and a `bb8` pool.
//!
//! Row structs (`models`) and table definitions (`schema`) stay private to
//! this module; adapters only translate rows into domain values and Diesel
//! failures into port errors.
//!
//! # Example
//!
//! ```ignore
//! use recipe_backend::outbound::persistence::{DbPool, DieselRecipeRepository, PoolConfig};
//!
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/recipes")).await?;
//! let recipes = DieselRecipeRepository::new(pool);
//! ```

mod diesel_ingredient_catalog;
mod diesel_membership_repository;
mod diesel_recipe_repository;
mod diesel_subscription_repository;
mod diesel_user_directory;
mod error_mapping;
mod migrations;
mod models;
mod pool;
mod schema;

pub use diesel_ingredient_catalog::DieselIngredientCatalog;
pub use diesel_membership_repository::DieselMembershipRepository;
pub use diesel_recipe_repository::DieselRecipeRepository;
pub use diesel_subscription_repository::DieselSubscriptionRepository;
pub use diesel_user_directory::DieselUserDirectory;
pub use migrations::{MigrationError, run_migrations};
pub use pool::{DbPool, PoolConfig, PoolError};
