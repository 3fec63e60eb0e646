//! Recipe aggregate: the recipe entity and its ingredient lines.
//!
//! A recipe owns an ordered, non-empty set of ingredient lines with no two
//! lines referencing the same ingredient. Lines are replaced wholesale on
//! update; they are never patched individually. Validation of incoming drafts
//! lives in [`validation`].

use std::fmt;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::{Ingredient, IngredientId, UserId, UserProfile};

pub mod validation;

pub use validation::{
    DraftMode, RawIngredientLine, RecipeDraft, RecipeField, RecipeValidationError,
    RecipeValidationReport, ValidatedDraft, validate_draft,
};

/// Maximum recipe name length in characters.
pub const RECIPE_NAME_MAX: usize = 200;

/// Identifier of a recipe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RecipeId(Uuid);

impl RecipeId {
    /// Wrap an existing UUID.
    pub fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Generate a fresh identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for RecipeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Cooking time in whole minutes, always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct CookingTime(u32);

impl CookingTime {
    /// Accept any integer in `1..=u32::MAX`.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::CookingTime;
    ///
    /// assert_eq!(CookingTime::new(15).map(|t| t.minutes()), Some(15));
    /// assert!(CookingTime::new(0).is_none());
    /// ```
    pub fn new(minutes: i64) -> Option<Self> {
        u32::try_from(minutes)
            .ok()
            .filter(|value| *value >= 1)
            .map(Self)
    }

    pub fn minutes(&self) -> u32 {
        self.0
    }
}

/// Quantity of one ingredient in a recipe, always at least one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Amount(u32);

impl Amount {
    /// Accept any integer in `1..=u32::MAX`.
    pub fn new(value: i64) -> Option<Self> {
        u32::try_from(value)
            .ok()
            .filter(|value| *value >= 1)
            .map(Self)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

/// Reference to a catalog ingredient with its amount, as written.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IngredientLine {
    pub ingredient_id: IngredientId,
    pub amount: Amount,
}

/// Ingredient line resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeIngredient {
    pub ingredient: Ingredient,
    pub amount: Amount,
}

/// Persisted recipe with its lines in insertion order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recipe {
    pub id: RecipeId,
    pub author: UserId,
    pub name: String,
    pub text: String,
    /// Stable reference returned by the image store.
    pub image: String,
    pub cooking_time: CookingTime,
    pub created_at: DateTime<Utc>,
    pub ingredients: Vec<RecipeIngredient>,
}

/// Short projection used by membership toggles and author previews.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeSummary {
    pub id: RecipeId,
    pub name: String,
    pub image: String,
    pub cooking_time: CookingTime,
}

impl From<&Recipe> for RecipeSummary {
    fn from(recipe: &Recipe) -> Self {
        Self {
            id: recipe.id,
            name: recipe.name.clone(),
            image: recipe.image.clone(),
            cooking_time: recipe.cooking_time,
        }
    }
}

/// Fully validated recipe handed to storage for creation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewRecipe {
    pub id: RecipeId,
    pub author: UserId,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: CookingTime,
    pub created_at: DateTime<Utc>,
    pub lines: Vec<IngredientLine>,
}

/// Validated replacement values. `None` leaves the stored value untouched;
/// `Some` lines replace the whole line set.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RecipeChanges {
    pub name: Option<String>,
    pub text: Option<String>,
    pub image: Option<String>,
    pub cooking_time: Option<CookingTime>,
    pub lines: Option<Vec<IngredientLine>>,
}

/// Storage-level list filter. Every populated field must match.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RecipeFilter {
    pub author: Option<UserId>,
    pub favorited_by: Option<UserId>,
    pub in_cart_of: Option<UserId>,
}

/// Author projection relative to the viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorView {
    pub profile: UserProfile,
    pub is_subscribed: bool,
}

/// Recipe as seen by a (possibly anonymous) viewer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeView {
    pub recipe: Recipe,
    pub author: AuthorView,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
}
