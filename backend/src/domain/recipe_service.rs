//! Recipe composition service.
//!
//! Implements [`RecipeCommand`] and [`RecipeQuery`]. A draft is validated in
//! full (structure, then catalog membership of every ingredient) before any
//! write, and the image payload is stored only once everything else passed.
//! A stored image that no recipe ends up referencing (failed write, replaced
//! or deleted recipe) is removed again. Replacing and deleting are
//! restricted to the recipe's author.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use pagination::PageRequest;

use super::port_errors;
use crate::domain::ports::{
    ImageStore, ImageStoreError, IngredientCatalog, MembershipRepository, RecipeCommand,
    RecipeListQuery, RecipeQuery, RecipeRepository, SubscriptionRepository, UserDirectory,
};
use crate::domain::{
    AuthorView, DraftMode, Error, IngredientId, MembershipKind, NewRecipe, Page, Recipe,
    RecipeChanges,
    RecipeDraft, RecipeFilter, RecipeId, RecipeValidationError, RecipeValidationReport,
    RecipeView, UserId, UserProfile, ValidatedDraft, validate_draft,
};

const DEFAULT_PUBLIC_BASE_URL: &str = "http://localhost:8080";

/// Recipe service implementing the recipe driving ports.
#[derive(Clone)]
pub struct RecipeService<R, C, I, U, M, S> {
    recipes: Arc<R>,
    catalog: Arc<C>,
    images: Arc<I>,
    users: Arc<U>,
    memberships: Arc<M>,
    subscriptions: Arc<S>,
    public_base_url: String,
}

impl<R, C, I, U, M, S> RecipeService<R, C, I, U, M, S> {
    /// Create a service over the given ports.
    pub fn new(
        recipes: Arc<R>,
        catalog: Arc<C>,
        images: Arc<I>,
        users: Arc<U>,
        memberships: Arc<M>,
        subscriptions: Arc<S>,
    ) -> Self {
        Self {
            recipes,
            catalog,
            images,
            users,
            memberships,
            subscriptions,
            public_base_url: DEFAULT_PUBLIC_BASE_URL.to_owned(),
        }
    }

    /// Origin used when building short links, e.g. `https://recipes.example`.
    pub fn with_public_base_url(mut self, url: impl Into<String>) -> Self {
        self.public_base_url = url.into().trim_end_matches('/').to_owned();
        self
    }
}

/// What a signed-in viewer has favorited, carted and followed.
#[derive(Default)]
struct ViewerRelations {
    favorites: HashSet<RecipeId>,
    cart: HashSet<RecipeId>,
    followed: HashSet<UserId>,
}

fn missing_author(recipe: &Recipe) -> Error {
    Error::internal(format!(
        "author {} of recipe {} is missing",
        recipe.author, recipe.id
    ))
}

impl<R, C, I, U, M, S> RecipeService<R, C, I, U, M, S>
where
    R: RecipeRepository,
    C: IngredientCatalog,
    I: ImageStore,
    U: UserDirectory,
    M: MembershipRepository,
    S: SubscriptionRepository,
{
    async fn load(&self, id: RecipeId) -> Result<Recipe, Error> {
        self.recipes
            .find_by_id(id)
            .await
            .map_err(port_errors::recipes)?
            .ok_or_else(|| port_errors::recipe_not_found(id))
    }

    async fn load_owned(&self, caller: UserId, id: RecipeId) -> Result<Recipe, Error> {
        let recipe = self.load(id).await?;
        if recipe.author != caller {
            return Err(Error::forbidden("only the author may change this recipe"));
        }
        Ok(recipe)
    }

    async fn check_draft(&self, draft: RecipeDraft, mode: DraftMode) -> Result<ValidatedDraft, Error> {
        let (mut validated, mut report) = validate_draft(draft, mode);

        if let Some(lines) = validated.lines.as_ref() {
            let ids: Vec<IngredientId> = lines.iter().map(|line| line.ingredient_id).collect();
            let known: HashSet<IngredientId> = self
                .catalog
                .find_many(ids)
                .await
                .map_err(port_errors::catalog)?
                .into_iter()
                .map(|ingredient| ingredient.id)
                .collect();
            for line in lines {
                if !known.contains(&line.ingredient_id) {
                    report.push(RecipeValidationError::UnknownIngredient {
                        ingredient_id: line.ingredient_id,
                    });
                }
            }
        }
        report.into_result()?;

        if let Some(payload) = validated.image.take() {
            validated.image = Some(self.store_image(payload).await?);
        }
        Ok(validated)
    }

    async fn store_image(&self, payload: String) -> Result<String, Error> {
        match self.images.store(payload).await {
            Ok(reference) => Ok(reference),
            Err(ImageStoreError::InvalidPayload { message }) => {
                Err(RecipeValidationReport::from(RecipeValidationError::InvalidImage {
                    reason: message,
                })
                .into())
            }
            Err(ImageStoreError::Storage { message }) => {
                Err(Error::internal(format!("image storage failed: {message}")))
            }
        }
    }

    /// Removal failures are logged by the adapter and never fail the request.
    async fn discard_image(&self, reference: String) {
        let _ = self.images.remove(reference).await;
    }

    async fn view_one(&self, viewer: Option<UserId>, recipe: Recipe) -> Result<RecipeView, Error> {
        let profile = self
            .users
            .find_by_id(recipe.author)
            .await
            .map_err(port_errors::users)?
            .ok_or_else(|| missing_author(&recipe))?;

        let Some(viewer) = viewer else {
            return Ok(RecipeView {
                author: AuthorView {
                    profile,
                    is_subscribed: false,
                },
                is_favorited: false,
                is_in_shopping_cart: false,
                recipe,
            });
        };

        let is_favorited = self
            .memberships
            .contains(MembershipKind::Favorite, viewer, recipe.id)
            .await
            .map_err(port_errors::memberships)?;
        let is_in_shopping_cart = self
            .memberships
            .contains(MembershipKind::ShoppingCart, viewer, recipe.id)
            .await
            .map_err(port_errors::memberships)?;
        let is_subscribed = if viewer == recipe.author {
            false
        } else {
            self.subscriptions
                .is_subscribed(viewer, recipe.author)
                .await
                .map_err(port_errors::subscriptions)?
        };

        Ok(RecipeView {
            author: AuthorView {
                profile,
                is_subscribed,
            },
            is_favorited,
            is_in_shopping_cart,
            recipe,
        })
    }

    /// Membership sets of `viewer` and which of `authors` they follow.
    async fn relations(
        &self,
        viewer: Option<UserId>,
        authors: &[UserId],
    ) -> Result<ViewerRelations, Error> {
        let Some(viewer) = viewer else {
            return Ok(ViewerRelations::default());
        };
        let favorites = self
            .memberships
            .recipe_ids(MembershipKind::Favorite, viewer)
            .await
            .map_err(port_errors::memberships)?;
        let cart = self
            .memberships
            .recipe_ids(MembershipKind::ShoppingCart, viewer)
            .await
            .map_err(port_errors::memberships)?;
        let mut followed = HashSet::new();
        for author in authors.iter().copied().filter(|author| *author != viewer) {
            if self
                .subscriptions
                .is_subscribed(viewer, author)
                .await
                .map_err(port_errors::subscriptions)?
            {
                followed.insert(author);
            }
        }
        Ok(ViewerRelations {
            favorites: favorites.into_iter().collect(),
            cart: cart.into_iter().collect(),
            followed,
        })
    }

    async fn view_many(
        &self,
        viewer: Option<UserId>,
        recipes: Vec<Recipe>,
    ) -> Result<Vec<RecipeView>, Error> {
        if recipes.is_empty() {
            return Ok(Vec::new());
        }

        let mut seen = HashSet::new();
        let author_ids: Vec<UserId> = recipes
            .iter()
            .map(|recipe| recipe.author)
            .filter(|author| seen.insert(*author))
            .collect();
        let relations = self.relations(viewer, &author_ids).await?;
        let profiles: HashMap<UserId, UserProfile> = self
            .users
            .find_many(author_ids)
            .await
            .map_err(port_errors::users)?
            .into_iter()
            .map(|profile| (profile.id, profile))
            .collect();

        recipes
            .into_iter()
            .map(|recipe| {
                let profile = profiles
                    .get(&recipe.author)
                    .cloned()
                    .ok_or_else(|| missing_author(&recipe))?;
                Ok(RecipeView {
                    author: AuthorView {
                        is_subscribed: relations.followed.contains(&profile.id),
                        profile,
                    },
                    is_favorited: relations.favorites.contains(&recipe.id),
                    is_in_shopping_cart: relations.cart.contains(&recipe.id),
                    recipe,
                })
            })
            .collect()
    }
}

#[async_trait]
impl<R, C, I, U, M, S> RecipeCommand for RecipeService<R, C, I, U, M, S>
where
    R: RecipeRepository,
    C: IngredientCatalog,
    I: ImageStore,
    U: UserDirectory,
    M: MembershipRepository,
    S: SubscriptionRepository,
{
    async fn create(&self, author: UserId, draft: RecipeDraft) -> Result<RecipeView, Error> {
        let validated = self.check_draft(draft, DraftMode::Create).await?;
        let ValidatedDraft {
            name: Some(name),
            text: Some(text),
            image: Some(image),
            cooking_time: Some(cooking_time),
            lines: Some(lines),
        } = validated
        else {
            return Err(Error::internal("validated recipe draft is incomplete"));
        };

        let stored_image = image.clone();
        let created = self
            .recipes
            .create(NewRecipe {
                id: RecipeId::random(),
                author,
                name,
                text,
                image,
                cooking_time,
                created_at: Utc::now(),
                lines,
            })
            .await;
        let recipe = match created {
            Ok(recipe) => recipe,
            Err(error) => {
                self.discard_image(stored_image).await;
                return Err(port_errors::recipes(error));
            }
        };
        self.view_one(Some(author), recipe).await
    }

    async fn replace(
        &self,
        caller: UserId,
        id: RecipeId,
        draft: RecipeDraft,
    ) -> Result<RecipeView, Error> {
        let existing = self.load_owned(caller, id).await?;
        let validated = self.check_draft(draft, DraftMode::Replace).await?;
        let stored_image = validated.image.clone();
        let changes = RecipeChanges {
            name: validated.name,
            text: validated.text,
            image: validated.image,
            cooking_time: validated.cooking_time,
            lines: validated.lines,
        };
        let recipe = match self.recipes.replace(id, changes).await {
            Ok(recipe) => recipe,
            Err(error) => {
                if let Some(reference) = stored_image {
                    self.discard_image(reference).await;
                }
                return Err(port_errors::recipes(error));
            }
        };
        if stored_image.is_some_and(|reference| reference != existing.image) {
            self.discard_image(existing.image).await;
        }
        self.view_one(Some(caller), recipe).await
    }

    async fn delete(&self, caller: UserId, id: RecipeId) -> Result<(), Error> {
        let existing = self.load_owned(caller, id).await?;
        let deleted = self
            .recipes
            .delete(id)
            .await
            .map_err(port_errors::recipes)?;
        if deleted {
            self.discard_image(existing.image).await;
            Ok(())
        } else {
            Err(port_errors::recipe_not_found(id))
        }
    }
}

#[async_trait]
impl<R, C, I, U, M, S> RecipeQuery for RecipeService<R, C, I, U, M, S>
where
    R: RecipeRepository,
    C: IngredientCatalog,
    I: ImageStore,
    U: UserDirectory,
    M: MembershipRepository,
    S: SubscriptionRepository,
{
    async fn get(&self, viewer: Option<UserId>, id: RecipeId) -> Result<RecipeView, Error> {
        let recipe = self.load(id).await?;
        self.view_one(viewer, recipe).await
    }

    async fn list(
        &self,
        viewer: Option<UserId>,
        query: RecipeListQuery,
        page: PageRequest,
    ) -> Result<Page<RecipeView>, Error> {
        let filter = RecipeFilter {
            author: query.author,
            favorited_by: viewer.filter(|_| query.is_favorited),
            in_cart_of: viewer.filter(|_| query.is_in_shopping_cart),
        };
        let Page { items, total } = self
            .recipes
            .list(filter, page)
            .await
            .map_err(port_errors::recipes)?;
        let views = self.view_many(viewer, items).await?;
        Ok(Page::new(views, total))
    }

    async fn short_link(&self, id: RecipeId) -> Result<String, Error> {
        let recipe = self.load(id).await?;
        Ok(format!("{}/recipes/{}/", self.public_base_url, recipe.id))
    }
}

#[cfg(test)]
#[path = "recipe_service_tests.rs"]
mod tests;
