//! HTTP inbound adapter exposing the REST API under `/api/v1`.
//!
//! Handlers parse raw path and query values, resolve the caller from the
//! cookie session and delegate to the driving ports held in [`state`].

pub mod error;
pub mod health;
pub mod ingredients;
pub mod memberships;
pub mod recipes;
pub mod recipes_dto;
pub mod schemas;
pub mod session;
pub mod session_config;
pub mod state;
pub mod subscriptions;
#[cfg(test)]
pub mod test_utils;
pub mod validation;

pub use error::{ApiResult, json_config};

use actix_web::web;

/// Register every `/api/v1` handler on `cfg`.
///
/// The caller owns the scope so it can attach the session middleware and
/// shared state. The shopping list download is registered ahead of the
/// `/recipes/{id}` routes so its literal segment wins.
///
/// ```rust,no_run
/// use actix_web::{App, web};
/// use recipe_backend::inbound::http::{configure_api, json_config};
///
/// let app = App::new().service(
///     web::scope("/api/v1")
///         .app_data(json_config())
///         .configure(configure_api),
/// );
/// # drop(app);
/// ```
pub fn configure_api(cfg: &mut web::ServiceConfig) {
    cfg.service(memberships::download_shopping_cart)
        .service(ingredients::search_ingredients)
        .service(ingredients::get_ingredient)
        .service(recipes::list_recipes)
        .service(recipes::create_recipe)
        .service(recipes::recipe_short_link)
        .service(recipes::get_recipe)
        .service(recipes::update_recipe)
        .service(recipes::delete_recipe)
        .service(memberships::add_favorite)
        .service(memberships::remove_favorite)
        .service(memberships::add_to_cart)
        .service(memberships::remove_from_cart)
        .service(subscriptions::list_subscriptions)
        .service(subscriptions::subscribe)
        .service(subscriptions::unsubscribe);
}
