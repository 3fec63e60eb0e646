//! Test helpers for inbound HTTP components.

use std::sync::Arc;

use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{HttpResponse, test, web};
use pagination::PagePolicy;

use crate::domain::ports::{
    MockIngredientQuery, MockMembershipCommand, MockRecipeCommand, MockRecipeQuery,
    MockShoppingListQuery, MockSubscriptionCommand, MockSubscriptionQuery,
};
use crate::domain::{Error, UserId};
use crate::inbound::http::session::SessionContext;
use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
use crate::inbound::http::state::{HttpState, HttpStatePorts};

/// Build a session middleware configured for tests.
///
/// Generates a fresh key per invocation and names the cookie `session`
/// without the `Secure` flag so plain HTTP test requests carry it.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .build()
}

/// Driving port mocks; any call without an expectation fails the test.
#[derive(Default)]
pub struct MockPorts {
    pub ingredients: MockIngredientQuery,
    pub recipes: MockRecipeCommand,
    pub recipes_query: MockRecipeQuery,
    pub memberships: MockMembershipCommand,
    pub shopping_list: MockShoppingListQuery,
    pub subscriptions: MockSubscriptionCommand,
    pub subscriptions_query: MockSubscriptionQuery,
}

impl MockPorts {
    pub fn into_state(self) -> web::Data<HttpState> {
        web::Data::new(HttpState::new(
            HttpStatePorts {
                ingredients: Arc::new(self.ingredients),
                recipes: Arc::new(self.recipes),
                recipes_query: Arc::new(self.recipes_query),
                memberships: Arc::new(self.memberships),
                shopping_list: Arc::new(self.shopping_list),
                subscriptions: Arc::new(self.subscriptions),
                subscriptions_query: Arc::new(self.subscriptions_query),
            },
            PagePolicy::default(),
        ))
    }
}

/// Route stand-in for the upstream identity layer.
pub async fn sign_in(
    session: SessionContext,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let id = UserId::new(path.as_str())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(&id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// Mount at `/test/sign-in/{id}` before calling [`session_cookie`].
pub const SIGN_IN_PATH: &str = "/test/sign-in/{id}";

/// Sign `user` in through [`sign_in`] and return the session cookie.
pub async fn session_cookie<S>(app: &S, user: UserId) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/test/sign-in/{user}"))
            .to_request(),
    )
    .await;
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
        .expect("session cookie set")
}
