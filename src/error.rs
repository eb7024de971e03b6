//! Typed API errors and their classification.
//!
//! Every non-2xx response becomes an [`ApiError`], either decoded from the
//! server's error body or synthesized from the bare status code. The predicate
//! helpers accept any error and search its [`source`](StdError::source) chain, so
//! they keep working after the client has added context to an error.

use std::error::Error as StdError;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::transport::null_as_default;

/// Machine-readable error codes used by the SignalAds API.
pub mod codes {
    pub const INVALID_CREDENTIALS: &str = "INVALID_CREDENTIALS";
    pub const INVALID_PHONE_NUMBER: &str = "INVALID_PHONE_NUMBER";
    pub const INVALID_MESSAGE: &str = "INVALID_MESSAGE";
    pub const INSUFFICIENT_BALANCE: &str = "INSUFFICIENT_BALANCE";
    pub const RATE_LIMIT_EXCEEDED: &str = "RATE_LIMIT_EXCEEDED";
    pub const NOT_FOUND: &str = "NOT_FOUND";
    pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
    pub const FORBIDDEN: &str = "FORBIDDEN";
    pub const BAD_REQUEST: &str = "BAD_REQUEST";
    pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";
    pub const SERVICE_UNAVAILABLE: &str = "SERVICE_UNAVAILABLE";
    pub const INVALID_TEMPLATE: &str = "INVALID_TEMPLATE";
    pub const TEMPLATE_NOT_APPROVED: &str = "TEMPLATE_NOT_APPROVED";
    pub const INVALID_DOCUMENT: &str = "INVALID_DOCUMENT";
    pub const INVALID_VOICE_FORMAT: &str = "INVALID_VOICE_FORMAT";
}

const STATUS_BAD_REQUEST: u16 = 400;
const STATUS_UNAUTHORIZED: u16 = 401;
const STATUS_PAYMENT_REQUIRED: u16 = 402;
const STATUS_FORBIDDEN: u16 = 403;
const STATUS_NOT_FOUND: u16 = 404;
const STATUS_TOO_MANY_REQUESTS: u16 = 429;
const STATUS_INTERNAL_SERVER_ERROR: u16 = 500;
const STATUS_SERVICE_UNAVAILABLE: u16 = 503;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Structured error returned by the SignalAds API for non-2xx responses.
///
/// The same record is used when the server echoes an error as a regular payload.
/// Its [`Display`](fmt::Display) output prefers `message`, then `error_message`,
/// then `code` with `status_code`, then `status_code` alone.
pub struct ApiError {
    /// Machine-readable category, see [`codes`]. May be empty.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub code: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub message: String,
    /// HTTP status; backfilled from the response when the body omits it.
    #[serde(
        default,
        deserialize_with = "null_as_default",
        skip_serializing_if = "is_zero"
    )]
    pub status_code: u16,
    /// Alternate error text, sent by the server as `error`.
    #[serde(
        default,
        rename = "error",
        deserialize_with = "null_as_default",
        skip_serializing_if = "String::is_empty"
    )]
    pub error_message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Map<String, Value>>,
}

fn is_zero(value: &u16) -> bool {
    *value == 0
}

impl ApiError {
    pub fn new(code: impl Into<String>, message: impl Into<String>, status_code: u16) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            status_code,
            ..Default::default()
        }
    }

    /// Classify a non-2xx response.
    ///
    /// A body that decodes as an [`ApiError`] with at least one of `message`,
    /// `code` or `error` set is used as is (with `status_code` backfilled when
    /// zero). Anything else, including a well-formed body with all three empty,
    /// yields an error synthesized from `status`.
    pub fn from_response(status: u16, body: &[u8]) -> Self {
        if let Ok(mut decoded) = serde_json::from_slice::<ApiError>(body) {
            if decoded.has_text() {
                if decoded.status_code == 0 {
                    decoded.status_code = status;
                }
                return decoded;
            }
        }

        Self::new(
            code_for_status(status),
            format!(
                "API error: status {status}, body: {}",
                String::from_utf8_lossy(body)
            ),
            status,
        )
    }

    fn has_text(&self) -> bool {
        !self.message.is_empty() || !self.code.is_empty() || !self.error_message.is_empty()
    }

    pub fn invalid_credentials() -> Self {
        Self::new(
            codes::INVALID_CREDENTIALS,
            "Invalid API credentials",
            STATUS_UNAUTHORIZED,
        )
    }

    pub fn not_found() -> Self {
        Self::new(codes::NOT_FOUND, "Resource not found", STATUS_NOT_FOUND)
    }

    pub fn rate_limited() -> Self {
        Self::new(
            codes::RATE_LIMIT_EXCEEDED,
            "Rate limit exceeded",
            STATUS_TOO_MANY_REQUESTS,
        )
    }

    pub fn insufficient_balance() -> Self {
        Self::new(
            codes::INSUFFICIENT_BALANCE,
            "Insufficient balance",
            STATUS_PAYMENT_REQUIRED,
        )
    }

    pub fn invalid_phone_number() -> Self {
        Self::new(
            codes::INVALID_PHONE_NUMBER,
            "Invalid phone number",
            STATUS_BAD_REQUEST,
        )
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.message.is_empty() {
            f.write_str(&self.message)
        } else if !self.error_message.is_empty() {
            f.write_str(&self.error_message)
        } else if !self.code.is_empty() {
            write!(f, "API error [{}]: status {}", self.code, self.status_code)
        } else {
            write!(f, "API error: status {}", self.status_code)
        }
    }
}

impl StdError for ApiError {}

/// Fallback error code for a status with no usable error body.
pub fn code_for_status(status: u16) -> &'static str {
    match status {
        STATUS_BAD_REQUEST => codes::BAD_REQUEST,
        STATUS_UNAUTHORIZED => codes::INVALID_CREDENTIALS,
        STATUS_FORBIDDEN => codes::FORBIDDEN,
        STATUS_NOT_FOUND => codes::NOT_FOUND,
        STATUS_PAYMENT_REQUIRED => codes::INSUFFICIENT_BALANCE,
        STATUS_TOO_MANY_REQUESTS => codes::RATE_LIMIT_EXCEEDED,
        STATUS_INTERNAL_SERVER_ERROR => codes::INTERNAL_SERVER_ERROR,
        STATUS_SERVICE_UNAVAILABLE => codes::SERVICE_UNAVAILABLE,
        _ => "",
    }
}

/// Find the [`ApiError`] in `err` or anywhere in its source chain.
pub fn as_api_error<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a ApiError> {
    let mut current = Some(err);
    while let Some(err) = current {
        if let Some(api_error) = err.downcast_ref::<ApiError>() {
            return Some(api_error);
        }
        current = err.source();
    }
    None
}

pub fn is_api_error(err: &(dyn StdError + 'static)) -> bool {
    as_api_error(err).is_some()
}

/// HTTP status of the typed error, or `0` for other errors.
pub fn status_code_of(err: &(dyn StdError + 'static)) -> u16 {
    as_api_error(err).map_or(0, |api_error| api_error.status_code)
}

/// Error code of the typed error, or `""` for other errors.
pub fn error_code_of<'a>(err: &'a (dyn StdError + 'static)) -> &'a str {
    as_api_error(err).map_or("", |api_error| api_error.code.as_str())
}

pub fn has_error_code(err: &(dyn StdError + 'static), code: &str) -> bool {
    as_api_error(err).is_some_and(|api_error| api_error.code == code)
}

fn matches_category(err: &(dyn StdError + 'static), status: u16, code: &str) -> bool {
    as_api_error(err)
        .is_some_and(|api_error| api_error.status_code == status || api_error.code == code)
}

pub fn is_not_found(err: &(dyn StdError + 'static)) -> bool {
    matches_category(err, STATUS_NOT_FOUND, codes::NOT_FOUND)
}

pub fn is_unauthorized(err: &(dyn StdError + 'static)) -> bool {
    matches_category(err, STATUS_UNAUTHORIZED, codes::INVALID_CREDENTIALS)
}

pub fn is_rate_limited(err: &(dyn StdError + 'static)) -> bool {
    matches_category(err, STATUS_TOO_MANY_REQUESTS, codes::RATE_LIMIT_EXCEEDED)
}

pub fn is_insufficient_balance(err: &(dyn StdError + 'static)) -> bool {
    matches_category(err, STATUS_PAYMENT_REQUIRED, codes::INSUFFICIENT_BALANCE)
}

pub fn is_bad_request(err: &(dyn StdError + 'static)) -> bool {
    matches_category(err, STATUS_BAD_REQUEST, codes::BAD_REQUEST)
}

/// Convert any error into an [`ApiError`].
///
/// A typed error is returned unchanged; anything else becomes an error whose
/// message is the original error's text and whose status is `status_code`.
pub fn wrap_error(err: Option<&(dyn StdError + 'static)>, status_code: u16) -> Option<ApiError> {
    let err = err?;
    if let Some(api_error) = as_api_error(err) {
        return Some(api_error.clone());
    }
    Some(ApiError {
        message: err.to_string(),
        status_code,
        ..Default::default()
    })
}
