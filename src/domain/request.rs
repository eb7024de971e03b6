use std::collections::BTreeMap;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::domain::validation::ValidationError;

/// Free-form parameters forwarded verbatim in the request body.
///
/// This is an escape hatch for API fields that have no typed counterpart here.
pub type ExtraParams = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
/// Body of `POST /send-message/single`.
pub struct SendMessageRequest {
    /// Recipient phone number (required).
    pub to: String,
    /// Message text (required).
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_link: Option<String>,
    /// Caption shown with `document_link`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub document_caption: Option<String>,
    /// Sender id or phone number.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<ExtraParams>,
}

impl SendMessageRequest {
    pub fn new(to: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            message: message.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        require("to", &self.to)?;
        require("message", &self.message)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
/// One entry of a bulk send.
pub struct BulkMessageItem {
    pub to: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<BTreeMap<String, String>>,
}

impl BulkMessageItem {
    pub fn new(to: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            message: message.into(),
            params: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
/// Body of `POST /send-message/bulk`.
pub struct SendBulkMessageRequest {
    pub messages: Vec<BulkMessageItem>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<ExtraParams>,
}

impl SendBulkMessageRequest {
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        if self.messages.is_empty() {
            return Err(ValidationError::Empty { field: "messages" });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
/// Body of `POST /send-message/template`.
pub struct SendTemplateMessageRequest {
    pub to: String,
    pub template_id: String,
    /// Values substituted into a dynamic template.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub template_params: Option<BTreeMap<String, String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<ExtraParams>,
}

impl SendTemplateMessageRequest {
    pub fn new(to: impl Into<String>, template_id: impl Into<String>) -> Self {
        Self {
            to: to.into(),
            template_id: template_id.into(),
            ..Default::default()
        }
    }

    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        require("to", &self.to)?;
        require("template_id", &self.template_id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
/// Body of `POST /send-message/voice`.
///
/// Either `message` (converted to speech) or `audio_url` must be set. When both
/// are present the server plays the audio file.
pub struct SendVoiceMessageRequest {
    pub to: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
    /// For example `male` or `female`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub voice_type: Option<String>,
    /// For example `fa` or `en`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub params: Option<ExtraParams>,
}

impl SendVoiceMessageRequest {
    pub(crate) fn validate(&self) -> Result<(), ValidationError> {
        require("to", &self.to)?;
        let has_audio = self.audio_url.as_deref().is_some_and(|url| !url.is_empty());
        if self.message.is_empty() && !has_audio {
            return Err(ValidationError::MissingVoiceContent);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
/// Paging for `GET /messages`. Zero means "server default" and is not sent.
pub struct PaginationParams {
    pub page: u32,
    pub per_page: u32,
}

impl PaginationParams {
    pub fn new(page: u32, per_page: u32) -> Self {
        Self { page, per_page }
    }

    pub(crate) fn to_query(self) -> BTreeMap<String, String> {
        let mut query = BTreeMap::new();
        if self.page > 0 {
            query.insert("page".to_owned(), self.page.to_string());
        }
        if self.per_page > 0 {
            query.insert("per_page".to_owned(), self.per_page.to_string());
        }
        query
    }
}

fn require(field: &'static str, value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Err(ValidationError::Empty { field });
    }
    Ok(())
}
