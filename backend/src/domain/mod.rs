//! Domain primitives, aggregates and services.
//!
//! Purpose: define strongly typed recipe-sharing entities, the pure
//! algorithms over them (draft validation, shopping list aggregation) and the
//! services that implement the driving ports in [`ports`]. Nothing in this
//! module knows about HTTP or SQL.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Ingredient, Recipe, ShoppingList, FollowedAuthor: core entities and
//!   projections.
//! - Page: one store-windowed slice of an ordered listing.
//! - `*Service`: driving port implementations over injected driven ports.

pub mod error;
pub mod ingredient;
pub mod membership;
pub mod page;
pub mod ports;
pub mod recipe;
pub mod shopping_list;
pub mod subscription;
pub mod trace_id;
pub mod user;

mod catalog_service;
#[cfg(test)]
pub(crate) mod fixtures;
mod membership_service;
mod port_errors;
mod recipe_service;
mod shopping_list_service;
mod subscription_service;

pub use self::catalog_service::IngredientCatalogService;
pub use self::error::{Error, ErrorCode};
pub use self::ingredient::{
    ImportSummary, Ingredient, IngredientId, IngredientSpec, IngredientValidationError,
};
pub use self::membership::MembershipKind;
pub use self::page::Page;
pub use self::membership_service::MembershipService;
pub use self::recipe::{
    Amount, AuthorView, CookingTime, DraftMode, IngredientLine, NewRecipe, RECIPE_NAME_MAX,
    RawIngredientLine, Recipe, RecipeChanges, RecipeDraft, RecipeField, RecipeFilter, RecipeId,
    RecipeIngredient, RecipeSummary, RecipeValidationError, RecipeValidationReport, RecipeView,
    ValidatedDraft, validate_draft,
};
pub use self::recipe_service::RecipeService;
pub use self::shopping_list::{
    CartLine, SHOPPING_LIST_FILENAME, SHOPPING_LIST_HEADER, ShoppingList, ShoppingListItem,
};
pub use self::shopping_list_service::ShoppingListService;
pub use self::subscription::{
    DEFAULT_RECIPE_PREVIEW_LIMIT, FollowedAuthor, RecipePreviewLimit, RecipePreviewLimitError,
};
pub use self::subscription_service::SubscriptionService;
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};
pub use self::user::{UserId, UserProfile, UserValidationError};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use recipe_backend::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::forbidden("only the author may change this recipe"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
