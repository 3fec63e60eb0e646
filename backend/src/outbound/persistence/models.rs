//! Internal Diesel row structs for database operations.
//!
//! These types are implementation details of the persistence layer and must
//! never be exposed to the domain. Conversions into domain types live next
//! to the repositories that read them.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use super::schema::{ingredients, recipe_ingredients, recipes, users};

/// Row struct for reading user profiles.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = users)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct UserRow {
    pub id: Uuid,
    pub email: String,
    pub username: String,
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = ingredients)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct IngredientRow {
    pub id: Uuid,
    pub name: String,
    pub measurement_unit: String,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = ingredients)]
pub(crate) struct NewIngredientRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub measurement_unit: &'a str,
}

/// Row struct for reading recipe scalars.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = recipes)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct RecipeRow {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: String,
    pub text: String,
    pub image: String,
    pub cooking_time: i64,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipes)]
pub(crate) struct NewRecipeRow<'a> {
    pub id: Uuid,
    pub author_id: Uuid,
    pub name: &'a str,
    pub text: &'a str,
    pub image: &'a str,
    pub cooking_time: i64,
    pub created_at: DateTime<Utc>,
}

/// Partial recipe update. `None` fields are left untouched.
#[derive(Debug, Clone, Default, AsChangeset)]
#[diesel(table_name = recipes)]
pub(crate) struct RecipeUpdate<'a> {
    pub name: Option<&'a str>,
    pub text: Option<&'a str>,
    pub image: Option<&'a str>,
    pub cooking_time: Option<i64>,
}

impl RecipeUpdate<'_> {
    /// Diesel rejects empty changesets, so callers skip the UPDATE instead.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.text.is_none()
            && self.image.is_none()
            && self.cooking_time.is_none()
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = recipe_ingredients)]
pub(crate) struct NewRecipeIngredientRow {
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub amount: i64,
    pub position: i32,
}

/// One recipe line joined with its catalog entry.
#[derive(Debug, Clone, Queryable)]
pub(crate) struct RecipeLineRow {
    pub recipe_id: Uuid,
    pub ingredient_id: Uuid,
    pub name: String,
    pub measurement_unit: String,
    pub amount: i64,
}
