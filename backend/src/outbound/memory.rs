//! In-process adapter implementing every driven port.
//!
//! Used when no database is configured and by the HTTP integration tests.
//! All state sits behind one mutex so each port call is atomic, and the
//! uniqueness and cascade rules mirror the PostgreSQL schema.

use std::collections::{HashMap, HashSet};
use std::sync::{Arc, Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use pagination::PageRequest;

use crate::domain::ports::{
    IngredientCatalog, IngredientCatalogError, MembershipRepository, MembershipRepositoryError,
    RecipeRepository, RecipeRepositoryError, SubscriptionRepository, SubscriptionRepositoryError,
    UserDirectory, UserDirectoryError,
};
use crate::domain::{
    CartLine, CookingTime, ImportSummary, Ingredient, IngredientId, IngredientLine,
    IngredientSpec, MembershipKind, NewRecipe, Page, Recipe, RecipeChanges, RecipeFilter,
    RecipeId, RecipeIngredient, RecipeSummary, UserId, UserProfile,
};

const POISONED: &str = "in-memory store lock poisoned";

#[derive(Debug, Clone)]
struct StoredRecipe {
    id: RecipeId,
    author: UserId,
    name: String,
    text: String,
    image: String,
    cooking_time: CookingTime,
    created_at: DateTime<Utc>,
    lines: Vec<IngredientLine>,
}

#[derive(Debug, Default)]
struct State {
    users: HashMap<UserId, UserProfile>,
    ingredients: HashMap<IngredientId, Ingredient>,
    ingredient_keys: HashSet<(String, String)>,
    recipes: HashMap<RecipeId, StoredRecipe>,
    // Insertion order doubles as the cart/favorites order.
    favorites: Vec<(UserId, RecipeId)>,
    cart: Vec<(UserId, RecipeId)>,
    subscriptions: HashSet<(UserId, UserId)>,
}

impl State {
    fn members(&self, kind: MembershipKind) -> &Vec<(UserId, RecipeId)> {
        match kind {
            MembershipKind::Favorite => &self.favorites,
            MembershipKind::ShoppingCart => &self.cart,
        }
    }

    fn members_mut(&mut self, kind: MembershipKind) -> &mut Vec<(UserId, RecipeId)> {
        match kind {
            MembershipKind::Favorite => &mut self.favorites,
            MembershipKind::ShoppingCart => &mut self.cart,
        }
    }

    fn is_member(&self, kind: MembershipKind, user: UserId, recipe: RecipeId) -> bool {
        self.members(kind).contains(&(user, recipe))
    }

    fn missing_ingredient(&self, lines: &[IngredientLine]) -> Option<IngredientId> {
        lines
            .iter()
            .map(|line| line.ingredient_id)
            .find(|id| !self.ingredients.contains_key(id))
    }

    fn resolve(&self, stored: &StoredRecipe) -> Result<Recipe, RecipeRepositoryError> {
        let ingredients = stored
            .lines
            .iter()
            .map(|line| {
                self.ingredients
                    .get(&line.ingredient_id)
                    .cloned()
                    .map(|ingredient| RecipeIngredient {
                        ingredient,
                        amount: line.amount,
                    })
                    .ok_or_else(|| {
                        RecipeRepositoryError::query(format!(
                            "recipe {} references unknown ingredient {}",
                            stored.id, line.ingredient_id
                        ))
                    })
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Recipe {
            id: stored.id,
            author: stored.author,
            name: stored.name.clone(),
            text: stored.text.clone(),
            image: stored.image.clone(),
            cooking_time: stored.cooking_time,
            created_at: stored.created_at,
            ingredients,
        })
    }

    fn newest_first<'a>(
        &'a self,
        keep: impl Fn(&StoredRecipe) -> bool,
    ) -> Vec<&'a StoredRecipe> {
        let mut recipes: Vec<&StoredRecipe> =
            self.recipes.values().filter(|recipe| keep(recipe)).collect();
        recipes.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.id.cmp(&a.id))
        });
        recipes
    }
}

/// Shared in-memory store. Clones see the same state.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: Arc<Mutex<State>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a user profile, replacing any profile with the same id.
    ///
    /// User accounts are owned by an external surface; this stands in for it.
    pub fn insert_user(&self, profile: UserProfile) -> Result<(), UserDirectoryError> {
        let mut state = self.lock(UserDirectoryError::connection)?;
        state.users.insert(profile.id, profile);
        Ok(())
    }

    fn lock<E>(&self, poisoned: impl FnOnce(&'static str) -> E) -> Result<MutexGuard<'_, State>, E> {
        self.state.lock().map_err(|_| poisoned(POISONED))
    }
}

#[async_trait]
impl IngredientCatalog for MemoryStore {
    async fn find_by_id(
        &self,
        id: IngredientId,
    ) -> Result<Option<Ingredient>, IngredientCatalogError> {
        let state = self.lock(IngredientCatalogError::connection)?;
        Ok(state.ingredients.get(&id).cloned())
    }

    async fn find_many(
        &self,
        ids: Vec<IngredientId>,
    ) -> Result<Vec<Ingredient>, IngredientCatalogError> {
        let state = self.lock(IngredientCatalogError::connection)?;
        let unique: HashSet<IngredientId> = ids.into_iter().collect();
        Ok(unique
            .into_iter()
            .filter_map(|id| state.ingredients.get(&id).cloned())
            .collect())
    }

    async fn search(
        &self,
        name_prefix: Option<String>,
    ) -> Result<Vec<Ingredient>, IngredientCatalogError> {
        let state = self.lock(IngredientCatalogError::connection)?;
        let prefix = name_prefix.map(|prefix| prefix.to_lowercase());
        let mut found: Vec<Ingredient> = state
            .ingredients
            .values()
            .filter(|ingredient| {
                prefix
                    .as_deref()
                    .is_none_or(|prefix| ingredient.name.to_lowercase().starts_with(prefix))
            })
            .cloned()
            .collect();
        found.sort_by(|a, b| {
            a.name
                .cmp(&b.name)
                .then_with(|| a.measurement_unit.cmp(&b.measurement_unit))
        });
        Ok(found)
    }

    async fn import(
        &self,
        specs: Vec<IngredientSpec>,
    ) -> Result<ImportSummary, IngredientCatalogError> {
        let mut state = self.lock(IngredientCatalogError::connection)?;
        let mut summary = ImportSummary::default();
        for spec in specs {
            let key = (spec.name().to_owned(), spec.measurement_unit().to_owned());
            if !state.ingredient_keys.insert(key) {
                summary.skipped += 1;
                continue;
            }
            let id = IngredientId::random();
            state.ingredients.insert(
                id,
                Ingredient {
                    id,
                    name: spec.name().to_owned(),
                    measurement_unit: spec.measurement_unit().to_owned(),
                },
            );
            summary.inserted += 1;
        }
        Ok(summary)
    }
}

#[async_trait]
impl RecipeRepository for MemoryStore {
    async fn create(&self, recipe: NewRecipe) -> Result<Recipe, RecipeRepositoryError> {
        let mut state = self.lock(RecipeRepositoryError::connection)?;
        if !state.users.contains_key(&recipe.author) {
            return Err(RecipeRepositoryError::missing_reference(format!(
                "author {} does not exist",
                recipe.author
            )));
        }
        if let Some(id) = state.missing_ingredient(&recipe.lines) {
            return Err(RecipeRepositoryError::missing_reference(format!(
                "ingredient {id} does not exist"
            )));
        }
        if state.recipes.contains_key(&recipe.id) {
            return Err(RecipeRepositoryError::query(format!(
                "recipe {} already exists",
                recipe.id
            )));
        }
        let stored = StoredRecipe {
            id: recipe.id,
            author: recipe.author,
            name: recipe.name,
            text: recipe.text,
            image: recipe.image,
            cooking_time: recipe.cooking_time,
            created_at: recipe.created_at,
            lines: recipe.lines,
        };
        let resolved = state.resolve(&stored)?;
        state.recipes.insert(stored.id, stored);
        Ok(resolved)
    }

    async fn replace(
        &self,
        id: RecipeId,
        changes: RecipeChanges,
    ) -> Result<Recipe, RecipeRepositoryError> {
        let mut state = self.lock(RecipeRepositoryError::connection)?;
        if let Some(missing) = changes
            .lines
            .as_deref()
            .and_then(|lines| state.missing_ingredient(lines))
        {
            return Err(RecipeRepositoryError::missing_reference(format!(
                "ingredient {missing} does not exist"
            )));
        }
        let Some(mut stored) = state.recipes.get(&id).cloned() else {
            return Err(RecipeRepositoryError::not_found(id.to_string()));
        };
        if let Some(name) = changes.name {
            stored.name = name;
        }
        if let Some(text) = changes.text {
            stored.text = text;
        }
        if let Some(image) = changes.image {
            stored.image = image;
        }
        if let Some(cooking_time) = changes.cooking_time {
            stored.cooking_time = cooking_time;
        }
        if let Some(lines) = changes.lines {
            stored.lines = lines;
        }
        let resolved = state.resolve(&stored)?;
        state.recipes.insert(id, stored);
        Ok(resolved)
    }

    async fn delete(&self, id: RecipeId) -> Result<bool, RecipeRepositoryError> {
        let mut state = self.lock(RecipeRepositoryError::connection)?;
        if state.recipes.remove(&id).is_none() {
            return Ok(false);
        }
        state.favorites.retain(|(_, recipe)| *recipe != id);
        state.cart.retain(|(_, recipe)| *recipe != id);
        Ok(true)
    }

    async fn find_by_id(&self, id: RecipeId) -> Result<Option<Recipe>, RecipeRepositoryError> {
        let state = self.lock(RecipeRepositoryError::connection)?;
        state
            .recipes
            .get(&id)
            .map(|stored| state.resolve(stored))
            .transpose()
    }

    async fn list(
        &self,
        filter: RecipeFilter,
        page: PageRequest,
    ) -> Result<Page<Recipe>, RecipeRepositoryError> {
        let state = self.lock(RecipeRepositoryError::connection)?;
        let matches = state.newest_first(|recipe| {
            filter.author.is_none_or(|author| recipe.author == author)
                && filter.favorited_by.is_none_or(|user| {
                    state.is_member(MembershipKind::Favorite, user, recipe.id)
                })
                && filter.in_cart_of.is_none_or(|user| {
                    state.is_member(MembershipKind::ShoppingCart, user, recipe.id)
                })
        });
        let window = Page::from_ordered(matches, page);
        let recipes = window
            .items
            .into_iter()
            .map(|stored| state.resolve(stored))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Page::new(recipes, window.total))
    }

    async fn summaries_by_author(
        &self,
        author: UserId,
        limit: u32,
    ) -> Result<Vec<RecipeSummary>, RecipeRepositoryError> {
        let state = self.lock(RecipeRepositoryError::connection)?;
        let take = usize::try_from(limit).unwrap_or(usize::MAX);
        Ok(state
            .newest_first(|recipe| recipe.author == author)
            .into_iter()
            .take(take)
            .map(|stored| RecipeSummary {
                id: stored.id,
                name: stored.name.clone(),
                image: stored.image.clone(),
                cooking_time: stored.cooking_time,
            })
            .collect())
    }

    async fn count_by_author(&self, author: UserId) -> Result<u64, RecipeRepositoryError> {
        let state = self.lock(RecipeRepositoryError::connection)?;
        let count = state
            .recipes
            .values()
            .filter(|recipe| recipe.author == author)
            .count();
        Ok(u64::try_from(count).unwrap_or(u64::MAX))
    }

    async fn cart_lines(
        &self,
        recipe_ids: Vec<RecipeId>,
    ) -> Result<Vec<CartLine>, RecipeRepositoryError> {
        let state = self.lock(RecipeRepositoryError::connection)?;
        let mut lines = Vec::new();
        for recipe_id in recipe_ids {
            let Some(stored) = state.recipes.get(&recipe_id) else {
                continue;
            };
            for recipe_line in state.resolve(stored)?.ingredients {
                lines.push(CartLine {
                    recipe_id,
                    ingredient_id: recipe_line.ingredient.id,
                    name: recipe_line.ingredient.name,
                    measurement_unit: recipe_line.ingredient.measurement_unit,
                    amount: recipe_line.amount.value(),
                });
            }
        }
        Ok(lines)
    }
}

#[async_trait]
impl MembershipRepository for MemoryStore {
    async fn add(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), MembershipRepositoryError> {
        let mut state = self.lock(MembershipRepositoryError::connection)?;
        if !state.recipes.contains_key(&recipe) {
            return Err(MembershipRepositoryError::missing_reference(format!(
                "recipe {recipe} does not exist"
            )));
        }
        if !state.users.contains_key(&user) {
            return Err(MembershipRepositoryError::missing_reference(format!(
                "user {user} does not exist"
            )));
        }
        if state.is_member(kind, user, recipe) {
            return Err(MembershipRepositoryError::already_member(recipe.to_string()));
        }
        state.members_mut(kind).push((user, recipe));
        Ok(())
    }

    async fn remove(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, MembershipRepositoryError> {
        let mut state = self.lock(MembershipRepositoryError::connection)?;
        let members = state.members_mut(kind);
        let before = members.len();
        members.retain(|entry| *entry != (user, recipe));
        Ok(members.len() < before)
    }

    async fn contains(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<bool, MembershipRepositoryError> {
        let state = self.lock(MembershipRepositoryError::connection)?;
        Ok(state.is_member(kind, user, recipe))
    }

    async fn recipe_ids(
        &self,
        kind: MembershipKind,
        user: UserId,
    ) -> Result<Vec<RecipeId>, MembershipRepositoryError> {
        let state = self.lock(MembershipRepositoryError::connection)?;
        Ok(state
            .members(kind)
            .iter()
            .filter(|(member, _)| *member == user)
            .map(|(_, recipe)| *recipe)
            .collect())
    }
}

#[async_trait]
impl SubscriptionRepository for MemoryStore {
    async fn subscribe(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<(), SubscriptionRepositoryError> {
        let mut state = self.lock(SubscriptionRepositoryError::connection)?;
        if follower == author {
            return Err(SubscriptionRepositoryError::self_subscription());
        }
        if !state.users.contains_key(&author) || !state.users.contains_key(&follower) {
            return Err(SubscriptionRepositoryError::author_not_found(author.to_string()));
        }
        if !state.subscriptions.insert((follower, author)) {
            return Err(SubscriptionRepositoryError::already_subscribed(
                author.to_string(),
            ));
        }
        Ok(())
    }

    async fn unsubscribe(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        let mut state = self.lock(SubscriptionRepositoryError::connection)?;
        Ok(state.subscriptions.remove(&(follower, author)))
    }

    async fn is_subscribed(
        &self,
        follower: UserId,
        author: UserId,
    ) -> Result<bool, SubscriptionRepositoryError> {
        let state = self.lock(SubscriptionRepositoryError::connection)?;
        Ok(state.subscriptions.contains(&(follower, author)))
    }

    async fn followed_authors(
        &self,
        follower: UserId,
        page: PageRequest,
    ) -> Result<Page<UserProfile>, SubscriptionRepositoryError> {
        let state = self.lock(SubscriptionRepositoryError::connection)?;
        let mut authors: Vec<UserProfile> = state
            .subscriptions
            .iter()
            .filter(|(who, _)| *who == follower)
            .filter_map(|(_, author)| state.users.get(author).cloned())
            .collect();
        authors.sort_by(|a, b| {
            a.username
                .cmp(&b.username)
                .then_with(|| a.id.as_uuid().cmp(b.id.as_uuid()))
        });
        Ok(Page::from_ordered(authors, page))
    }
}

#[async_trait]
impl UserDirectory for MemoryStore {
    async fn find_by_id(&self, id: UserId) -> Result<Option<UserProfile>, UserDirectoryError> {
        let state = self.lock(UserDirectoryError::connection)?;
        Ok(state.users.get(&id).cloned())
    }

    async fn find_many(&self, ids: Vec<UserId>) -> Result<Vec<UserProfile>, UserDirectoryError> {
        let state = self.lock(UserDirectoryError::connection)?;
        let unique: HashSet<UserId> = ids.into_iter().collect();
        Ok(unique
            .into_iter()
            .filter_map(|id| state.users.get(&id).cloned())
            .collect())
    }
}

#[cfg(test)]
#[path = "memory_tests.rs"]
mod tests;
