//! Shared HTTP adapter state.
//!
//! Handlers receive this state via `actix_web::web::Data` and only see the
//! driving ports, so they stay testable with mocks and free of I/O.

use std::sync::Arc;

use pagination::PagePolicy;

use crate::domain::ports::{
    ImageStore, IngredientCatalog, IngredientQuery, MembershipCommand, MembershipRepository,
    RecipeCommand, RecipeQuery, RecipeRepository, ShoppingListQuery, SubscriptionCommand,
    SubscriptionQuery, SubscriptionRepository, UserDirectory,
};
use crate::domain::{
    IngredientCatalogService, MembershipService, RecipeService, ShoppingListService,
    SubscriptionService,
};

/// Parameter object bundling every driving port used by handlers.
#[derive(Clone)]
pub struct HttpStatePorts {
    pub ingredients: Arc<dyn IngredientQuery>,
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
    pub memberships: Arc<dyn MembershipCommand>,
    pub shopping_list: Arc<dyn ShoppingListQuery>,
    pub subscriptions: Arc<dyn SubscriptionCommand>,
    pub subscriptions_query: Arc<dyn SubscriptionQuery>,
}

/// Driven adapters the domain services are assembled from.
pub struct DrivenAdapters<C, R, M, S, U, I> {
    pub catalog: Arc<C>,
    pub recipes: Arc<R>,
    pub memberships: Arc<M>,
    pub subscriptions: Arc<S>,
    pub users: Arc<U>,
    pub images: Arc<I>,
}

impl<C, R, M, S, U, I> DrivenAdapters<C, R, M, S, U, I>
where
    C: IngredientCatalog + 'static,
    R: RecipeRepository + 'static,
    M: MembershipRepository + 'static,
    S: SubscriptionRepository + 'static,
    U: UserDirectory + 'static,
    I: ImageStore + 'static,
{
    /// Build every domain service over these adapters.
    ///
    /// `public_base_url` is the origin used for recipe short links.
    pub fn into_ports(self, public_base_url: &str) -> HttpStatePorts {
        let Self {
            catalog,
            recipes,
            memberships,
            subscriptions,
            users,
            images,
        } = self;

        let recipe_service = Arc::new(
            RecipeService::new(
                recipes.clone(),
                catalog.clone(),
                images,
                users.clone(),
                memberships.clone(),
                subscriptions.clone(),
            )
            .with_public_base_url(public_base_url),
        );
        let subscription_service = Arc::new(SubscriptionService::new(
            subscriptions,
            users,
            recipes.clone(),
        ));

        HttpStatePorts {
            ingredients: Arc::new(IngredientCatalogService::new(catalog)),
            recipes: recipe_service.clone(),
            recipes_query: recipe_service,
            memberships: Arc::new(MembershipService::new(recipes.clone(), memberships.clone())),
            shopping_list: Arc::new(ShoppingListService::new(recipes, memberships)),
            subscriptions: subscription_service.clone(),
            subscriptions_query: subscription_service,
        }
    }
}

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub ingredients: Arc<dyn IngredientQuery>,
    pub recipes: Arc<dyn RecipeCommand>,
    pub recipes_query: Arc<dyn RecipeQuery>,
    pub memberships: Arc<dyn MembershipCommand>,
    pub shopping_list: Arc<dyn ShoppingListQuery>,
    pub subscriptions: Arc<dyn SubscriptionCommand>,
    pub subscriptions_query: Arc<dyn SubscriptionQuery>,
    /// Page size defaults and ceiling for listing endpoints.
    pub pages: PagePolicy,
}

impl HttpState {
    /// Construct state from a ports bundle and the listing page policy.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use pagination::PagePolicy;
    /// use recipe_backend::inbound::http::state::{DrivenAdapters, HttpState};
    /// use recipe_backend::outbound::images::FsImageStore;
    /// use recipe_backend::outbound::memory::MemoryStore;
    ///
    /// let store = Arc::new(MemoryStore::new());
    /// let ports = DrivenAdapters {
    ///     catalog: store.clone(),
    ///     recipes: store.clone(),
    ///     memberships: store.clone(),
    ///     subscriptions: store.clone(),
    ///     users: store,
    ///     images: Arc::new(FsImageStore::new("media", "http://localhost:8080/media")),
    /// }
    /// .into_ports("http://localhost:8080");
    /// let state = HttpState::new(ports, PagePolicy::default());
    /// assert_eq!(state.pages.default_limit(), 6);
    /// ```
    pub fn new(ports: HttpStatePorts, pages: PagePolicy) -> Self {
        let HttpStatePorts {
            ingredients,
            recipes,
            recipes_query,
            memberships,
            shopping_list,
            subscriptions,
            subscriptions_query,
        } = ports;
        Self {
            ingredients,
            recipes,
            recipes_query,
            memberships,
            shopping_list,
            subscriptions,
            subscriptions_query,
            pages,
        }
    }
}
