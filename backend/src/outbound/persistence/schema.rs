//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. They are used
//! by Diesel for compile-time query validation and type-safe SQL generation.
//! When a migration changes the schema, update this file alongside it
//! (`diesel print-schema` can regenerate it from a live database).

diesel::table! {
    /// Users managed by the external account surface. Read-only here.
    users (id) {
        id -> Uuid,
        email -> Varchar,
        username -> Varchar,
        first_name -> Varchar,
        last_name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ingredient reference catalog, unique on `(name, measurement_unit)`.
    ingredients (id) {
        id -> Uuid,
        name -> Varchar,
        measurement_unit -> Varchar,
    }
}

diesel::table! {
    /// Recipes with their scalar fields.
    recipes (id) {
        id -> Uuid,
        /// Owning user; deleting the user cascades to their recipes.
        author_id -> Uuid,
        name -> Varchar,
        text -> Text,
        /// Reference returned by the image store.
        image -> Text,
        /// Minutes, constrained to `1..=u32::MAX`.
        cooking_time -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Ingredient lines of a recipe, unique on `(recipe_id, ingredient_id)`.
    recipe_ingredients (recipe_id, ingredient_id) {
        recipe_id -> Uuid,
        ingredient_id -> Uuid,
        /// Constrained to `1..=u32::MAX`.
        amount -> Int8,
        /// Zero-based insertion order within the recipe.
        position -> Int4,
    }
}

diesel::table! {
    /// Favorite recipes per user. `id` preserves insertion order.
    favorites (id) {
        id -> Int8,
        user_id -> Uuid,
        recipe_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Shopping cart entries per user. `id` preserves insertion order.
    shopping_cart_entries (id) {
        id -> Int8,
        user_id -> Uuid,
        recipe_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Directed follow edges; self-edges are rejected by a CHECK constraint.
    subscriptions (id) {
        id -> Int8,
        follower_id -> Uuid,
        author_id -> Uuid,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(recipes -> users (author_id));
diesel::joinable!(recipe_ingredients -> recipes (recipe_id));
diesel::joinable!(recipe_ingredients -> ingredients (ingredient_id));
diesel::joinable!(favorites -> recipes (recipe_id));
diesel::joinable!(shopping_cart_entries -> recipes (recipe_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    ingredients,
    recipes,
    recipe_ingredients,
    favorites,
    shopping_cart_entries,
    subscriptions,
);
