//! Shopping list aggregation and plain-text rendering.
//!
//! The aggregate groups every ingredient line of the recipes in a cart by
//! ingredient identity (name and unit) and sums amounts exactly. Output order
//! is first-seen: cart entries in insertion order, then each recipe's lines in
//! position order.

use std::collections::{HashMap, HashSet};

use super::{IngredientId, RecipeId};

/// Header line of the exported shopping list.
pub const SHOPPING_LIST_HEADER: &str = "Shopping list:";

/// File name suggested to clients downloading the list.
pub const SHOPPING_LIST_FILENAME: &str = "shopping_list.txt";

/// One ingredient line of a recipe in the cart, resolved against the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CartLine {
    pub recipe_id: RecipeId,
    pub ingredient_id: IngredientId,
    pub name: String,
    pub measurement_unit: String,
    pub amount: u32,
}

/// Aggregated total for one ingredient identity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShoppingListItem {
    pub name: String,
    pub measurement_unit: String,
    pub total: u64,
}

/// Deduplicated, unit-merged shopping list.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShoppingList {
    items: Vec<ShoppingListItem>,
}

impl ShoppingList {
    /// Aggregate cart lines in the order supplied.
    ///
    /// A repeated `(recipe, ingredient)` pair is counted once.
    ///
    /// # Examples
    /// ```
    /// use recipe_backend::domain::{CartLine, IngredientId, RecipeId, ShoppingList};
    ///
    /// let flour = IngredientId::random();
    /// let line = |recipe_id, amount| CartLine {
    ///     recipe_id,
    ///     ingredient_id: flour,
    ///     name: "flour".to_owned(),
    ///     measurement_unit: "g".to_owned(),
    ///     amount,
    /// };
    /// let list = ShoppingList::aggregate([line(RecipeId::random(), 200), line(RecipeId::random(), 100)]);
    /// assert_eq!(list.items()[0].total, 300);
    /// ```
    pub fn aggregate(lines: impl IntoIterator<Item = CartLine>) -> Self {
        let mut counted: HashSet<(RecipeId, IngredientId)> = HashSet::new();
        let mut positions: HashMap<(String, String), usize> = HashMap::new();
        let mut items: Vec<ShoppingListItem> = Vec::new();

        for line in lines {
            if !counted.insert((line.recipe_id, line.ingredient_id)) {
                continue;
            }
            let key = (line.name, line.measurement_unit);
            match positions.get(&key) {
                Some(&index) => {
                    if let Some(item) = items.get_mut(index) {
                        item.total += u64::from(line.amount);
                    }
                }
                None => {
                    positions.insert(key.clone(), items.len());
                    let (name, measurement_unit) = key;
                    items.push(ShoppingListItem {
                        name,
                        measurement_unit,
                        total: u64::from(line.amount),
                    });
                }
            }
        }

        Self { items }
    }

    pub fn items(&self) -> &[ShoppingListItem] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Render the header, a blank line and one `name (unit) — total` line per item.
    pub fn render_plain_text(&self) -> String {
        let body: String = self
            .items
            .iter()
            .map(|item| format!("{} ({}) — {}\n", item.name, item.measurement_unit, item.total))
            .collect();
        format!("{SHOPPING_LIST_HEADER}\n\n{body}")
    }
}

#[cfg(test)]
mod tests {
    //! Aggregation and rendering regression coverage.
    use super::*;
    use rstest::{fixture, rstest};

    struct Catalog {
        flour: IngredientId,
        egg: IngredientId,
        sugar: IngredientId,
    }

    #[fixture]
    fn catalog() -> Catalog {
        Catalog {
            flour: IngredientId::random(),
            egg: IngredientId::random(),
            sugar: IngredientId::random(),
        }
    }

    fn line(recipe: RecipeId, id: IngredientId, name: &str, unit: &str, amount: u32) -> CartLine {
        CartLine {
            recipe_id: recipe,
            ingredient_id: id,
            name: name.to_owned(),
            measurement_unit: unit.to_owned(),
            amount,
        }
    }

    fn totals(list: &ShoppingList) -> Vec<(&str, &str, u64)> {
        list.items()
            .iter()
            .map(|item| (item.name.as_str(), item.measurement_unit.as_str(), item.total))
            .collect()
    }

    #[rstest]
    fn merges_lines_across_recipes_in_first_seen_order(catalog: Catalog) {
        let a = RecipeId::random();
        let b = RecipeId::random();
        let list = ShoppingList::aggregate([
            line(a, catalog.flour, "flour", "g", 200),
            line(a, catalog.egg, "egg", "pc", 2),
            line(b, catalog.flour, "flour", "g", 100),
            line(b, catalog.sugar, "sugar", "g", 50),
        ]);

        assert_eq!(
            totals(&list),
            vec![("flour", "g", 300), ("egg", "pc", 2), ("sugar", "g", 50)]
        );
    }

    #[rstest]
    fn empty_cart_yields_empty_list() {
        let list = ShoppingList::aggregate(Vec::new());
        assert!(list.is_empty());
        assert_eq!(list.render_plain_text(), "Shopping list:\n\n");
    }

    #[rstest]
    fn same_name_with_different_units_stays_separate() {
        let recipe = RecipeId::random();
        let list = ShoppingList::aggregate([
            line(recipe, IngredientId::random(), "milk", "ml", 200),
            line(recipe, IngredientId::random(), "milk", "cup", 1),
        ]);
        assert_eq!(totals(&list), vec![("milk", "ml", 200), ("milk", "cup", 1)]);
    }

    #[rstest]
    fn repeated_recipe_ingredient_rows_are_counted_once(catalog: Catalog) {
        let recipe = RecipeId::random();
        let list = ShoppingList::aggregate([
            line(recipe, catalog.flour, "flour", "g", 500),
            line(recipe, catalog.flour, "flour", "g", 500),
        ]);
        assert_eq!(totals(&list), vec![("flour", "g", 500)]);
    }

    #[rstest]
    fn sums_beyond_u32_without_overflow(catalog: Catalog) {
        let list = ShoppingList::aggregate([
            line(RecipeId::random(), catalog.flour, "flour", "g", u32::MAX),
            line(RecipeId::random(), catalog.flour, "flour", "g", u32::MAX),
        ]);
        assert_eq!(list.items()[0].total, 2 * u64::from(u32::MAX));
    }

    #[rstest]
    fn renders_one_line_per_item(catalog: Catalog) {
        let recipe = RecipeId::random();
        let list = ShoppingList::aggregate([
            line(recipe, catalog.flour, "flour", "g", 500),
            line(recipe, catalog.egg, "egg", "pc", 2),
        ]);
        assert_eq!(
            list.render_plain_text(),
            "Shopping list:\n\nflour (g) — 500\negg (pc) — 2\n"
        );
    }
}
