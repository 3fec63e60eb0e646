//! Domain [`Error`] as an actix-web response.
//!
//! Client mistakes keep their message and details. Relation conflicts
//! (`already_exists`) and refused operations (`invalid_operation`) answer
//! `400`, like malformed input. Server-side failures are logged in full and
//! answered with a fixed message, since adapter messages can carry hosts or
//! SQL. Every error response echoes the trace id header when one is known.

use std::borrow::Cow;

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError, web};
use tracing::error;

use crate::domain::{Error, ErrorCode, TRACE_ID_HEADER};

/// Handler result whose error renders through [`ResponseError`].
pub type ApiResult<T> = Result<T, Error>;

const INTERNAL_MESSAGE: &str = "Internal server error";
const UNAVAILABLE_MESSAGE: &str = "Service temporarily unavailable";

/// Body sent to the client: the error itself, or a stand-in for 5xx codes.
fn client_view(err: &Error) -> Cow<'_, Error> {
    let message = match err.code() {
        ErrorCode::InternalError => INTERNAL_MESSAGE,
        ErrorCode::ServiceUnavailable => UNAVAILABLE_MESSAGE,
        _ => return Cow::Borrowed(err),
    };
    let stand_in = Error::new(err.code(), message);
    Cow::Owned(match err.trace_id() {
        Some(id) => stand_in.with_trace_id(id),
        None => stand_in,
    })
}

impl ResponseError for Error {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest | ErrorCode::AlreadyExists | ErrorCode::InvalidOperation => {
                StatusCode::BAD_REQUEST
            }
            ErrorCode::Unauthorized => StatusCode::UNAUTHORIZED,
            ErrorCode::Forbidden => StatusCode::FORBIDDEN,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::ServiceUnavailable => StatusCode::SERVICE_UNAVAILABLE,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                trace_id = self.trace_id().unwrap_or("-"),
                code = ?self.code(),
                message = self.message(),
                "request failed"
            );
        }
        let mut response = HttpResponse::build(status);
        if let Some(id) = self.trace_id() {
            response.insert_header((TRACE_ID_HEADER, id.to_owned()));
        }
        response.json(client_view(self))
    }
}

impl From<actix_web::Error> for Error {
    fn from(err: actix_web::Error) -> Self {
        error!(error = %err, "framework error surfaced in a handler");
        Self::internal(INTERNAL_MESSAGE)
    }
}

/// JSON extractor settings that report malformed bodies as `invalid_request`.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        Error::invalid_request(format!("malformed JSON body: {err}")).into()
    })
}
