//! OpenAPI documentation for the REST API.
//!
//! Served by Swagger UI in debug builds and exported with
//! `cargo run --bin openapi-dump`.

use utoipa::openapi::security::{ApiKey, ApiKeyValue, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::inbound::http::recipes_dto::{
    AuthorBody, IngredientAmountRequest, IngredientBody, RecipeBody, RecipeIngredientBody,
    RecipeRequest, RecipeSummaryBody, ShortLinkBody,
};
use crate::inbound::http::schemas::{
    ErrorCodeSchema, ErrorSchema, FollowedAuthorPageSchema, RecipePageSchema,
};
use crate::inbound::http::subscriptions::FollowedAuthorBody;

/// Adds the session cookie security scheme.
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi
            .components
            .get_or_insert_with(utoipa::openapi::Components::default);

        components.add_security_scheme(
            "SessionCookie",
            SecurityScheme::ApiKey(ApiKey::Cookie(ApiKeyValue::with_description(
                "session",
                "Encrypted session cookie carrying the caller's user id.",
            ))),
        );
    }
}

/// OpenAPI document for the REST API.
#[derive(OpenApi)]
#[openapi(
    modifiers(&SecurityAddon),
    info(
        title = "Recipe sharing API",
        description = "Recipes, ingredient catalog, favorites, shopping cart and author subscriptions.",
        license(name = "MIT")
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    security(("SessionCookie" = [])),
    paths(
        crate::inbound::http::ingredients::search_ingredients,
        crate::inbound::http::ingredients::get_ingredient,
        crate::inbound::http::recipes::list_recipes,
        crate::inbound::http::recipes::create_recipe,
        crate::inbound::http::recipes::get_recipe,
        crate::inbound::http::recipes::update_recipe,
        crate::inbound::http::recipes::delete_recipe,
        crate::inbound::http::recipes::recipe_short_link,
        crate::inbound::http::memberships::add_favorite,
        crate::inbound::http::memberships::remove_favorite,
        crate::inbound::http::memberships::add_to_cart,
        crate::inbound::http::memberships::remove_from_cart,
        crate::inbound::http::memberships::download_shopping_cart,
        crate::inbound::http::subscriptions::subscribe,
        crate::inbound::http::subscriptions::unsubscribe,
        crate::inbound::http::subscriptions::list_subscriptions,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
    ),
    components(schemas(
        ErrorSchema,
        ErrorCodeSchema,
        IngredientBody,
        RecipeIngredientBody,
        AuthorBody,
        RecipeBody,
        RecipeSummaryBody,
        IngredientAmountRequest,
        RecipeRequest,
        ShortLinkBody,
        FollowedAuthorBody,
        RecipePageSchema,
        FollowedAuthorPageSchema,
    )),
    tags(
        (name = "ingredients", description = "Ingredient catalog"),
        (name = "recipes", description = "Recipe publishing and browsing"),
        (name = "memberships", description = "Favorites, shopping cart and shopping list export"),
        (name = "subscriptions", description = "Following authors"),
        (name = "health", description = "Orchestration probes")
    )
)]
pub struct ApiDoc;
