//! Shared builders for domain service tests.

use chrono::{Duration, Utc};

use crate::domain::{
    Amount, CookingTime, Ingredient, IngredientId, Recipe, RecipeId, RecipeIngredient, UserId,
    UserProfile,
};

pub(crate) fn profile(username: &str) -> UserProfile {
    UserProfile {
        id: UserId::random(),
        email: format!("{username}@example.test"),
        username: username.to_owned(),
        first_name: username.to_owned(),
        last_name: "Tester".to_owned(),
    }
}

pub(crate) fn ingredient(name: &str, unit: &str) -> Ingredient {
    Ingredient {
        id: IngredientId::random(),
        name: name.to_owned(),
        measurement_unit: unit.to_owned(),
    }
}

/// A recipe by `author` created `age_minutes` ago with the given lines.
pub(crate) fn recipe_with(
    author: UserId,
    name: &str,
    age_minutes: i64,
    lines: Vec<(Ingredient, u32)>,
) -> Recipe {
    Recipe {
        id: RecipeId::random(),
        author,
        name: name.to_owned(),
        text: format!("How to make {name}."),
        image: format!("https://media.example.test/recipes/{name}.png"),
        cooking_time: CookingTime::new(15).expect("positive cooking time"),
        created_at: Utc::now() - Duration::minutes(age_minutes),
        ingredients: lines
            .into_iter()
            .map(|(ingredient, amount)| RecipeIngredient {
                ingredient,
                amount: Amount::new(i64::from(amount)).expect("positive amount"),
            })
            .collect(),
    }
}

pub(crate) fn recipe(author: UserId) -> Recipe {
    recipe_with(author, "pancakes", 0, vec![(ingredient("flour", "g"), 200)])
}
