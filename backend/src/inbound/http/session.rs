//! Caller identity read from the cookie session.
//!
//! This service does not authenticate anyone. An upstream identity layer
//! writes the caller's id under [`USER_ID_KEY`]; recipe reads accept an
//! anonymous viewer while every write needs a caller.

use actix_session::{Session, SessionExt};
use actix_web::dev::Payload;
use actix_web::{FromRequest, HttpRequest};
use std::future::{Ready, ready};
use tracing::warn;

use crate::domain::{Error, UserId};

/// Session entry holding the caller's id.
pub const USER_ID_KEY: &str = "user_id";

/// Extractor over the request's session.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Record `user_id` as the caller for later requests.
    pub fn persist_user(&self, user_id: &UserId) -> Result<(), Error> {
        self.0
            .insert(USER_ID_KEY, user_id.to_string())
            .map_err(|err| Error::internal(format!("session write failed: {err}")))
    }

    /// The viewer, or `None` when nobody is signed in.
    ///
    /// An unparsable stored id counts as anonymous.
    pub fn user_id(&self) -> Result<Option<UserId>, Error> {
        let stored = self
            .0
            .get::<String>(USER_ID_KEY)
            .map_err(|err| Error::internal(format!("session read failed: {err}")))?;
        Ok(stored.and_then(|raw| {
            UserId::new(&raw)
                .inspect_err(|err| warn!(error = %err, "ignoring malformed session user id"))
                .ok()
        }))
    }

    /// The caller of a write; `401` when nobody is signed in.
    pub fn require_user_id(&self) -> Result<UserId, Error> {
        self.user_id()?
            .ok_or_else(|| Error::unauthorized("sign in to change recipes or relations"))
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(Ok(Self(req.get_session())))
    }
}
