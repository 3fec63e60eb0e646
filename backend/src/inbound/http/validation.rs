//! Shared validation helpers for inbound HTTP adapters.
//!
//! Path and query parameters arrive as raw strings so malformed values map to
//! the domain error envelope instead of actix's default plain-text 400.

use pagination::{PagePolicy, PageRequest, PageRequestError};
use serde_json::json;
use uuid::Uuid;

use crate::domain::Error;

/// Validation error codes for HTTP request failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ErrorCode {
    InvalidUuid,
    InvalidFlag,
    InvalidPage,
    InvalidLimit,
}

impl ErrorCode {
    fn as_str(self) -> &'static str {
        match self {
            ErrorCode::InvalidUuid => "invalid_uuid",
            ErrorCode::InvalidFlag => "invalid_flag",
            ErrorCode::InvalidPage => "invalid_page",
            ErrorCode::InvalidLimit => "invalid_limit",
        }
    }
}

/// Newtype wrapper for HTTP field names to provide type safety.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct FieldName(&'static str);

impl FieldName {
    pub(crate) const fn new(name: &'static str) -> Self {
        Self(name)
    }

    fn as_str(&self) -> &str {
        self.0
    }
}

/// Builder for validation errors with field context.
struct ValidationError {
    field: String,
    message: String,
}

impl ValidationError {
    fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    fn with_value(self, code: ErrorCode, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }

    fn with_index(self, code: ErrorCode, index: usize, value: impl Into<String>) -> Error {
        Error::invalid_request(self.message).with_details(json!({
            "field": self.field,
            "index": index,
            "value": value.into(),
            "code": code.as_str(),
        }))
    }
}

pub(crate) fn invalid_uuid_error(field: FieldName, value: &str) -> Error {
    let field = field.as_str();
    ValidationError::new(field, format!("{field} must be a valid UUID"))
        .with_value(ErrorCode::InvalidUuid, value)
}

pub(crate) fn parse_uuid(value: &str, field: FieldName) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| invalid_uuid_error(field, value))
}

/// Parse one UUID out of a list field, reporting its position on failure.
pub(crate) fn parse_uuid_at(value: &str, field: FieldName, index: usize) -> Result<Uuid, Error> {
    Uuid::parse_str(value.trim()).map_err(|_| {
        let name = field.as_str();
        ValidationError::new(name, format!("{name} must contain valid UUIDs")).with_index(
            ErrorCode::InvalidUuid,
            index,
            value,
        )
    })
}

pub(crate) fn parse_optional_uuid(
    value: Option<&str>,
    field: FieldName,
) -> Result<Option<Uuid>, Error> {
    value.map(|raw| parse_uuid(raw, field)).transpose()
}

/// Parse a boolean filter flag; `1`/`true` and `0`/`false` are accepted.
///
/// An absent flag reads as `false`.
pub(crate) fn parse_flag(value: Option<&str>, field: FieldName) -> Result<bool, Error> {
    let Some(raw) = value else {
        return Ok(false);
    };
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" => Ok(true),
        "0" | "false" => Ok(false),
        _ => {
            let name = field.as_str();
            Err(
                ValidationError::new(name, format!("{name} must be one of 1, 0, true, false"))
                    .with_value(ErrorCode::InvalidFlag, raw),
            )
        }
    }
}

fn parse_positive(
    raw: Option<&str>,
    field: FieldName,
    code: ErrorCode,
) -> Result<Option<u32>, Error> {
    raw.map(|value| {
        value.trim().parse::<u32>().map_err(|_| {
            let name = field.as_str();
            ValidationError::new(name, format!("{name} must be a positive integer"))
                .with_value(code, value)
        })
    })
    .transpose()
}

/// Build a page request from raw `page` and `limit` query values.
pub(crate) fn parse_page_request(
    page: Option<&str>,
    limit: Option<&str>,
    policy: PagePolicy,
) -> Result<PageRequest, Error> {
    const PAGE: FieldName = FieldName::new("page");
    const LIMIT: FieldName = FieldName::new("limit");

    let page_number = parse_positive(page, PAGE, ErrorCode::InvalidPage)?;
    let page_size = parse_positive(limit, LIMIT, ErrorCode::InvalidLimit)?;
    PageRequest::new(page_number, page_size, policy).map_err(|err| {
        let (field, code, value) = match err {
            PageRequestError::InvalidPage => (PAGE, ErrorCode::InvalidPage, page),
            PageRequestError::InvalidLimit => (LIMIT, ErrorCode::InvalidLimit, limit),
        };
        ValidationError::new(field.as_str(), err.to_string())
            .with_value(code, value.unwrap_or_default())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode as DomainCode;
    use rstest::rstest;

    const FLAG: FieldName = FieldName::new("is_favorited");

    fn detail<'a>(err: &'a Error, key: &str) -> Option<&'a str> {
        err.details()
            .and_then(|details| details.get(key))
            .and_then(serde_json::Value::as_str)
    }

    #[rstest]
    #[case(None, false)]
    #[case(Some("1"), true)]
    #[case(Some("true"), true)]
    #[case(Some("TRUE"), true)]
    #[case(Some("0"), false)]
    #[case(Some("false"), false)]
    fn flags_accept_numeric_and_word_forms(#[case] raw: Option<&str>, #[case] expected: bool) {
        assert_eq!(parse_flag(raw, FLAG), Ok(expected));
    }

    #[rstest]
    fn unknown_flag_values_are_rejected() {
        let err = parse_flag(Some("yes"), FLAG).expect_err("invalid flag");
        assert_eq!(err.code(), DomainCode::InvalidRequest);
        assert_eq!(detail(&err, "field"), Some("is_favorited"));
        assert_eq!(detail(&err, "code"), Some("invalid_flag"));
    }

    #[rstest]
    fn malformed_uuid_reports_field_and_value() {
        let err = parse_uuid("nope", FieldName::new("id")).expect_err("invalid uuid");
        assert_eq!(detail(&err, "field"), Some("id"));
        assert_eq!(detail(&err, "value"), Some("nope"));
        assert_eq!(detail(&err, "code"), Some("invalid_uuid"));
    }

    #[rstest]
    fn page_request_defaults_and_clamps() {
        let policy = PagePolicy::new(6, 10);
        let defaults = parse_page_request(None, None, policy).expect("defaults");
        assert_eq!((defaults.page(), defaults.limit()), (1, 6));

        let clamped = parse_page_request(Some("2"), Some("500"), policy).expect("clamped");
        assert_eq!((clamped.page(), clamped.limit()), (2, 10));
    }

    #[rstest]
    #[case(Some("0"), None, "page", "invalid_page")]
    #[case(Some("-1"), None, "page", "invalid_page")]
    #[case(None, Some("0"), "limit", "invalid_limit")]
    #[case(None, Some("many"), "limit", "invalid_limit")]
    fn page_request_rejects_non_positive_values(
        #[case] page: Option<&str>,
        #[case] limit: Option<&str>,
        #[case] field: &str,
        #[case] code: &str,
    ) {
        let err = parse_page_request(page, limit, PagePolicy::default()).expect_err("rejected");
        assert_eq!(detail(&err, "field"), Some(field));
        assert_eq!(detail(&err, "code"), Some(code));
    }
}
