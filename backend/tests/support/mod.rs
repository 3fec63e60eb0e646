//! Shared harness for HTTP integration tests.
//!
//! Builds the full `/api/v1` surface over a [`MemoryStore`] with images
//! written to a temporary media root. A sign-in route stands in for the
//! upstream identity layer that places the caller id in the session.

use std::path::PathBuf;
use std::sync::Arc;

use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};
use pagination::PagePolicy;
use recipe_backend::Trace;
use recipe_backend::domain::ports::{IngredientImport, IngredientQuery};
use recipe_backend::domain::{
    Error, Ingredient, IngredientCatalogService, IngredientSpec, UserId, UserProfile,
};
use recipe_backend::inbound::http::session::SessionContext;
use recipe_backend::inbound::http::session_config::{SESSION_COOKIE_NAME, session_middleware};
use recipe_backend::inbound::http::state::{DrivenAdapters, HttpState};
use recipe_backend::inbound::http::{configure_api, json_config};
use recipe_backend::outbound::images::FsImageStore;
use recipe_backend::outbound::memory::MemoryStore;
use serde_json::{Value, json};
use tempfile::TempDir;

/// Smallest payload the image store accepts.
pub const PNG_PAYLOAD: &str = "data:image/png;base64,iVBORw0KGgo=";

pub struct Harness {
    pub store: Arc<MemoryStore>,
    pub state: web::Data<HttpState>,
    pub key: Key,
    media: TempDir,
}

impl Harness {
    pub fn new() -> Self {
        let media = tempfile::tempdir().expect("media dir");
        let store = Arc::new(MemoryStore::new());
        let ports = DrivenAdapters {
            catalog: store.clone(),
            recipes: store.clone(),
            memberships: store.clone(),
            subscriptions: store.clone(),
            users: store.clone(),
            images: Arc::new(FsImageStore::new(
                media.path(),
                "http://testserver/media",
            )),
        }
        .into_ports("http://testserver/");
        Self {
            store,
            state: web::Data::new(HttpState::new(ports, PagePolicy::default())),
            key: Key::generate(),
            media,
        }
    }

    /// Path of the file behind an image URL returned by the API.
    pub fn media_file(&self, url: &str) -> PathBuf {
        let relative = url
            .strip_prefix("http://testserver/media/")
            .expect("url under the media prefix");
        self.media.path().join(relative)
    }

    pub fn user(&self, username: &str) -> UserProfile {
        let profile = UserProfile {
            id: UserId::random(),
            email: format!("{username}@example.test"),
            username: username.to_owned(),
            first_name: username.to_owned(),
            last_name: "Tester".to_owned(),
        };
        self.store.insert_user(profile.clone()).expect("insert user");
        profile
    }

    /// Import `(name, unit)` pairs and return them in catalog order.
    pub async fn ingredients(&self, pairs: &[(&str, &str)]) -> Vec<Ingredient> {
        let catalog = IngredientCatalogService::new(self.store.clone());
        let specs = pairs
            .iter()
            .map(|(name, unit)| IngredientSpec::new(name, unit).expect("valid spec"))
            .collect();
        catalog.import(specs).await.expect("import");
        let mut found = Vec::with_capacity(pairs.len());
        for (name, unit) in pairs {
            let matches = catalog
                .search(Some((*name).to_owned()))
                .await
                .expect("search");
            found.extend(
                matches
                    .into_iter()
                    .filter(|item| item.name == *name && item.measurement_unit == *unit),
            );
        }
        found
    }

    pub fn app(
        &self,
    ) -> App<
        impl actix_web::dev::ServiceFactory<
            actix_web::dev::ServiceRequest,
            Config = (),
            Response = ServiceResponse,
            Error = actix_web::Error,
            InitError = (),
        > + use<>,
    > {
        App::new()
            .app_data(self.state.clone())
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session_middleware(self.key.clone(), false))
                    .app_data(json_config())
                    .route("/test/sign-in/{id}", web::post().to(sign_in))
                    .configure(configure_api),
            )
    }
}

async fn sign_in(session: SessionContext, path: web::Path<String>) -> Result<HttpResponse, Error> {
    let id = UserId::new(path.as_str()).map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_user(&id)?;
    Ok(HttpResponse::NoContent().finish())
}

pub async fn sign_in_as<S>(app: &S, user: &UserProfile) -> Cookie<'static>
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/api/v1/test/sign-in/{}", user.id))
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

/// Recipe payload using `lines` of `(ingredient, amount)`.
pub fn recipe_payload(name: &str, lines: &[(&Ingredient, i64)]) -> Value {
    json!({
        "name": name,
        "text": format!("How to make {name}."),
        "image": PNG_PAYLOAD,
        "cookingTime": 20,
        "ingredients": lines
            .iter()
            .map(|(item, amount)| json!({"id": item.id.to_string(), "amount": amount}))
            .collect::<Vec<_>>(),
    })
}

pub async fn send<S>(
    app: &S,
    request: test::TestRequest,
    cookie: Option<&Cookie<'static>>,
) -> (actix_web::http::StatusCode, Value)
where
    S: Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let request = match cookie {
        Some(cookie) => request.cookie(cookie.clone()),
        None => request,
    };
    let response = test::call_service(app, request.to_request()).await;
    let status = response.status();
    let bytes = test::read_body(response).await;
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or_else(|_| {
            Value::String(String::from_utf8_lossy(&bytes).into_owned())
        })
    };
    (status, body)
}
