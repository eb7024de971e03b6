use crate::domain::validation::ValidationError;

#[derive(Clone, PartialEq, Eq, Hash)]
/// SignalAds API key, sent verbatim in the `X-API-Key` header.
///
/// Invariant: non-empty. The value is not trimmed.
pub struct ApiKey(String);

impl ApiKey {
    /// Header carrying the key on every request.
    pub const HEADER: &'static str = "X-API-Key";

    /// Create a validated [`ApiKey`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty {
                field: "api_key",
            });
        }
        Ok(Self(value))
    }

    /// Borrow the key as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

#[derive(Clone, PartialEq, Eq, Hash)]
/// SignalAds API secret, sent verbatim in the `X-API-Secret` header.
///
/// Invariant: non-empty. The value is not trimmed.
pub struct ApiSecret(String);

impl ApiSecret {
    /// Header carrying the secret on every request.
    pub const HEADER: &'static str = "X-API-Secret";

    /// Create a validated [`ApiSecret`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty {
                field: "api_secret",
            });
        }
        Ok(Self(value))
    }

    /// Borrow the secret as provided.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for ApiSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiSecret(***)")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
/// Message id returned by the send endpoints and accepted by `/messages/{id}/status`.
///
/// Invariant: non-empty. The id is inserted into the path verbatim.
pub struct MessageId(String);

impl MessageId {
    pub const FIELD: &'static str = "message_id";

    /// Create a validated [`MessageId`].
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let value = value.into();
        if value.is_empty() {
            return Err(ValidationError::Empty { field: Self::FIELD });
        }
        Ok(Self(value))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Path of the status endpoint for this message.
    pub fn status_path(&self) -> String {
        format!("/messages/{}/status", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
/// Money-like amount (cost, balance, credit).
///
/// The API returns these as JSON numbers or strings; the original token is kept
/// so `10.00` stays `"10.00"` instead of becoming `10.0`.
pub struct Money(String);

impl Money {
    pub(crate) fn from_token(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    /// Borrow the amount as it appeared on the wire.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Parse the amount as a float, if it is numeric.
    pub fn to_f64(&self) -> Option<f64> {
        self.0.trim().parse().ok()
    }
}

impl std::fmt::Display for Money {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}
