use chrono::{DateTime, Utc};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::value::Money;
use crate::transport::{null_as_default, timestamp};

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
/// Result of a single, template or voice send.
pub struct SendMessageResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub to: String,
    pub cost: Option<Money>,
    /// Send time as reported by the server (not parsed).
    #[serde(deserialize_with = "null_as_default")]
    pub sent_at: String,
    pub data: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct SendBulkMessageResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub total: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub success: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub failed: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub message_ids: Vec<String>,
    /// Per-recipient results, in request order when the server provides them.
    #[serde(deserialize_with = "null_as_default")]
    pub results: Vec<SendMessageResponse>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    pub data: Option<Map<String, Value>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
/// One entry of `GET /messages`.
pub struct Message {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub to: String,
    #[serde(deserialize_with = "null_as_default")]
    pub from: String,
    #[serde(deserialize_with = "null_as_default")]
    pub message: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    pub cost: Option<Money>,
    #[serde(deserialize_with = "timestamp::deserialize_optional")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "timestamp::deserialize_optional")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "timestamp::deserialize_optional")]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub error: String,
    #[serde(deserialize_with = "timestamp::deserialize_optional")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct ListMessagesResponse {
    #[serde(deserialize_with = "null_as_default")]
    pub messages: Vec<Message>,
    #[serde(deserialize_with = "null_as_default")]
    pub page: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub per_page: u32,
    #[serde(deserialize_with = "null_as_default")]
    pub total: u64,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
/// Delivery state of a sent message (`sent`, `delivered`, `failed`, `pending`, ...).
pub struct MessageStatus {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "null_as_default")]
    pub to: String,
    #[serde(deserialize_with = "timestamp::deserialize_optional")]
    pub sent_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "timestamp::deserialize_optional")]
    pub delivered_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "timestamp::deserialize_optional")]
    pub read_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub error: String,
    pub cost: Option<Money>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
/// Account information from `GET /user/info`.
pub struct UserInfo {
    #[serde(deserialize_with = "null_as_default")]
    pub id: String,
    #[serde(deserialize_with = "null_as_default")]
    pub username: String,
    #[serde(deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(deserialize_with = "null_as_default")]
    pub phone: String,
    pub balance: Option<Money>,
    pub credit: Option<Money>,
    #[serde(deserialize_with = "null_as_default")]
    pub status: String,
    #[serde(deserialize_with = "timestamp::deserialize_optional")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "timestamp::deserialize_optional")]
    pub updated_at: Option<DateTime<Utc>>,
    #[serde(deserialize_with = "null_as_default")]
    pub permissions: Vec<String>,
}
