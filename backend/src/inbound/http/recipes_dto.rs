//! Recipe request and response payloads.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::domain::{
    AuthorView, Error, Ingredient, IngredientId, RawIngredientLine, RecipeDraft, RecipeIngredient,
    RecipeSummary, RecipeView, UserProfile,
};
use crate::inbound::http::validation::{FieldName, parse_uuid_at};

const INGREDIENTS: FieldName = FieldName::new("ingredients");

/// Catalog ingredient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientBody {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    pub id: String,
    #[schema(example = "flour")]
    pub name: String,
    #[schema(example = "g")]
    pub measurement_unit: String,
}

impl From<Ingredient> for IngredientBody {
    fn from(ingredient: Ingredient) -> Self {
        Self {
            id: ingredient.id.to_string(),
            name: ingredient.name,
            measurement_unit: ingredient.measurement_unit,
        }
    }
}

/// Ingredient line of a recipe.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeIngredientBody {
    pub id: String,
    pub name: String,
    pub measurement_unit: String,
    #[schema(minimum = 1)]
    pub amount: u32,
}

impl From<RecipeIngredient> for RecipeIngredientBody {
    fn from(line: RecipeIngredient) -> Self {
        Self {
            id: line.ingredient.id.to_string(),
            name: line.ingredient.name,
            measurement_unit: line.ingredient.measurement_unit,
            amount: line.amount.value(),
        }
    }
}

/// Public author profile as seen by the current viewer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthorBody {
    pub id: String,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
    /// Whether the viewer follows this author; always false when anonymous.
    pub is_subscribed: bool,
}

impl AuthorBody {
    pub(crate) fn from_profile(profile: UserProfile, is_subscribed: bool) -> Self {
        Self {
            id: profile.id.to_string(),
            email: profile.email,
            username: profile.username,
            first_name: profile.first_name,
            last_name: profile.last_name,
            is_subscribed,
        }
    }
}

impl From<AuthorView> for AuthorBody {
    fn from(view: AuthorView) -> Self {
        Self::from_profile(view.profile, view.is_subscribed)
    }
}

/// Full recipe projection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeBody {
    pub id: String,
    pub author: AuthorBody,
    pub ingredients: Vec<RecipeIngredientBody>,
    pub is_favorited: bool,
    pub is_in_shopping_cart: bool,
    pub name: String,
    /// Public URL of the stored image.
    pub image: String,
    pub text: String,
    /// Minutes.
    #[schema(minimum = 1)]
    pub cooking_time: u32,
}

impl From<RecipeView> for RecipeBody {
    fn from(view: RecipeView) -> Self {
        let RecipeView {
            recipe,
            author,
            is_favorited,
            is_in_shopping_cart,
        } = view;
        Self {
            id: recipe.id.to_string(),
            author: author.into(),
            ingredients: recipe
                .ingredients
                .into_iter()
                .map(RecipeIngredientBody::from)
                .collect(),
            is_favorited,
            is_in_shopping_cart,
            name: recipe.name,
            image: recipe.image,
            text: recipe.text,
            cooking_time: recipe.cooking_time.minutes(),
        }
    }
}

/// Short recipe projection used by memberships and subscription previews.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeSummaryBody {
    pub id: String,
    pub name: String,
    pub image: String,
    pub cooking_time: u32,
}

impl From<RecipeSummary> for RecipeSummaryBody {
    fn from(summary: RecipeSummary) -> Self {
        Self {
            id: summary.id.to_string(),
            name: summary.name,
            image: summary.image,
            cooking_time: summary.cooking_time.minutes(),
        }
    }
}

/// One requested ingredient line.
#[derive(Debug, Clone, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct IngredientAmountRequest {
    /// Catalog ingredient id.
    pub id: String,
    pub amount: i64,
}

/// Payload for creating or partially replacing a recipe.
///
/// Every field is optional on the wire; creation reports the missing ones
/// together, replacement leaves them unchanged.
#[derive(Debug, Clone, Default, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RecipeRequest {
    pub name: Option<String>,
    pub text: Option<String>,
    /// `data:image/<type>;base64,<data>`.
    pub image: Option<String>,
    pub cooking_time: Option<i64>,
    pub ingredients: Option<Vec<IngredientAmountRequest>>,
}

impl RecipeRequest {
    /// Convert the payload into a domain draft.
    ///
    /// Only malformed ingredient ids fail here; every other rule is checked
    /// by the domain so all field errors are reported together.
    pub(crate) fn into_draft(self) -> Result<RecipeDraft, Error> {
        let ingredients = self
            .ingredients
            .map(|lines| {
                lines
                    .into_iter()
                    .enumerate()
                    .map(|(index, line)| {
                        let id = parse_uuid_at(&line.id, INGREDIENTS, index)?;
                        Ok(RawIngredientLine {
                            ingredient_id: IngredientId::from_uuid(id),
                            amount: line.amount,
                        })
                    })
                    .collect::<Result<Vec<_>, Error>>()
            })
            .transpose()?;

        Ok(RecipeDraft {
            name: self.name,
            text: self.text,
            image: self.image,
            cooking_time: self.cooking_time,
            ingredients,
        })
    }
}

/// Absolute link to a recipe page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct ShortLinkBody {
    #[serde(rename = "short-link")]
    #[schema(example = "https://recipes.example/recipes/3fa85f64-5717-4562-b3fc-2c963f66afa6/")]
    pub short_link: String,
}
