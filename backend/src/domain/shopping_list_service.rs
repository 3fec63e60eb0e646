//! Shopping list aggregation over a user's cart.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;

use super::port_errors;
use crate::domain::ports::{MembershipRepository, RecipeRepository, ShoppingListQuery};
use crate::domain::{Error, MembershipKind, RecipeId, ShoppingList, UserId};

/// Shopping list service implementing [`ShoppingListQuery`].
#[derive(Clone)]
pub struct ShoppingListService<R, M> {
    recipes: Arc<R>,
    memberships: Arc<M>,
}

impl<R, M> ShoppingListService<R, M> {
    pub fn new(recipes: Arc<R>, memberships: Arc<M>) -> Self {
        Self {
            recipes,
            memberships,
        }
    }
}

#[async_trait]
impl<R, M> ShoppingListQuery for ShoppingListService<R, M>
where
    R: RecipeRepository,
    M: MembershipRepository,
{
    async fn shopping_list(&self, user: UserId) -> Result<ShoppingList, Error> {
        let cart = self
            .memberships
            .recipe_ids(MembershipKind::ShoppingCart, user)
            .await
            .map_err(port_errors::memberships)?;
        if cart.is_empty() {
            return Ok(ShoppingList::default());
        }

        let order: HashMap<RecipeId, usize> = cart
            .iter()
            .enumerate()
            .map(|(index, id)| (*id, index))
            .collect();
        let mut lines = self
            .recipes
            .cart_lines(cart)
            .await
            .map_err(port_errors::recipes)?;
        // Stable: keeps per-recipe line positions intact.
        lines.sort_by_key(|line| order.get(&line.recipe_id).copied().unwrap_or(usize::MAX));

        Ok(ShoppingList::aggregate(lines))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{MockMembershipRepository, MockRecipeRepository};
    use crate::domain::{CartLine, IngredientId};

    fn line(recipe_id: RecipeId, ingredient_id: IngredientId, name: &str, amount: u32) -> CartLine {
        CartLine {
            recipe_id,
            ingredient_id,
            name: name.to_owned(),
            measurement_unit: "g".to_owned(),
            amount,
        }
    }

    fn service(
        recipes: MockRecipeRepository,
        memberships: MockMembershipRepository,
    ) -> ShoppingListService<MockRecipeRepository, MockMembershipRepository> {
        ShoppingListService::new(Arc::new(recipes), Arc::new(memberships))
    }

    #[tokio::test]
    async fn empty_cart_skips_the_line_lookup() {
        let mut memberships = MockMembershipRepository::new();
        memberships
            .expect_recipe_ids()
            .times(1)
            .return_once(|_, _| Ok(Vec::new()));

        let list = service(MockRecipeRepository::new(), memberships)
            .shopping_list(UserId::random())
            .await
            .expect("list");
        assert!(list.is_empty());
    }

    #[tokio::test]
    async fn lines_follow_cart_insertion_order() {
        let first = RecipeId::random();
        let second = RecipeId::random();
        let flour = IngredientId::random();
        let sugar = IngredientId::random();
        let mut memberships = MockMembershipRepository::new();
        memberships
            .expect_recipe_ids()
            .withf(|kind, _| *kind == MembershipKind::ShoppingCart)
            .times(1)
            .return_once(move |_, _| Ok(vec![first, second]));
        let mut recipes = MockRecipeRepository::new();
        recipes
            .expect_cart_lines()
            .withf(move |ids| ids == &vec![first, second])
            .times(1)
            .return_once(move |_| {
                Ok(vec![
                    line(second, sugar, "sugar", 50),
                    line(second, flour, "flour", 100),
                    line(first, flour, "flour", 200),
                ])
            });

        let list = service(recipes, memberships)
            .shopping_list(UserId::random())
            .await
            .expect("list");
        let names: Vec<(&str, u64)> = list
            .items()
            .iter()
            .map(|item| (item.name.as_str(), item.total))
            .collect();
        assert_eq!(names, vec![("flour", 300), ("sugar", 50)]);
    }
}
