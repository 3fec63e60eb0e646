//! Favorite and shopping cart toggles.
//!
//! Both membership sets share one implementation parameterised by
//! [`MembershipKind`]. Storage uniqueness is authoritative: a racing
//! duplicate insert reported by the repository becomes `already_exists`
//! exactly like a sequential one.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use super::port_errors;
use crate::domain::ports::{
    MembershipCommand, MembershipRepository, MembershipRepositoryError, RecipeRepository,
};
use crate::domain::{Error, MembershipKind, RecipeId, RecipeSummary, UserId};

/// Membership service implementing [`MembershipCommand`].
#[derive(Clone)]
pub struct MembershipService<R, M> {
    recipes: Arc<R>,
    memberships: Arc<M>,
}

impl<R, M> MembershipService<R, M> {
    pub fn new(recipes: Arc<R>, memberships: Arc<M>) -> Self {
        Self {
            recipes,
            memberships,
        }
    }
}

fn already_member(kind: MembershipKind, recipe: RecipeId) -> Error {
    Error::already_exists(kind.already_member_message()).with_details(json!({
        "code": kind.already_member_code(),
        "recipeId": recipe.to_string(),
    }))
}

fn not_member(kind: MembershipKind, recipe: RecipeId) -> Error {
    Error::not_found(kind.not_member_message()).with_details(json!({
        "code": kind.not_member_code(),
        "recipeId": recipe.to_string(),
    }))
}

impl<R, M> MembershipService<R, M>
where
    R: RecipeRepository,
    M: MembershipRepository,
{
    async fn summary(&self, id: RecipeId) -> Result<RecipeSummary, Error> {
        self.recipes
            .find_by_id(id)
            .await
            .map_err(port_errors::recipes)?
            .map(|recipe| RecipeSummary::from(&recipe))
            .ok_or_else(|| port_errors::recipe_not_found(id))
    }
}

#[async_trait]
impl<R, M> MembershipCommand for MembershipService<R, M>
where
    R: RecipeRepository,
    M: MembershipRepository,
{
    async fn add(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<RecipeSummary, Error> {
        let summary = self.summary(recipe).await?;
        match self.memberships.add(kind, user, recipe).await {
            Ok(()) => Ok(summary),
            Err(MembershipRepositoryError::AlreadyMember { .. }) => {
                Err(already_member(kind, recipe))
            }
            Err(MembershipRepositoryError::MissingReference { .. }) => {
                Err(port_errors::recipe_not_found(recipe))
            }
            Err(other) => Err(port_errors::memberships(other)),
        }
    }

    async fn remove(
        &self,
        kind: MembershipKind,
        user: UserId,
        recipe: RecipeId,
    ) -> Result<(), Error> {
        self.summary(recipe).await?;
        let removed = self
            .memberships
            .remove(kind, user, recipe)
            .await
            .map_err(port_errors::memberships)?;
        if removed {
            Ok(())
        } else {
            Err(not_member(kind, recipe))
        }
    }
}
