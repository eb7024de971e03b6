//! Messaging endpoints: single, bulk, template and voice sends, message listing and
//! status, and account info.
//!
//! Each method validates its required fields before anything is sent and wraps
//! pipeline failures with a short description of the operation.

use std::collections::BTreeMap;

use tracing::debug;

use crate::client::{CallContext, SignalAdsClient, SignalAdsError};
use crate::domain::{
    BulkMessageItem, ListMessagesResponse, MessageId, MessageStatus, PaginationParams,
    SendBulkMessageRequest, SendBulkMessageResponse, SendMessageRequest, SendMessageResponse,
    SendTemplateMessageRequest, SendVoiceMessageRequest, UserInfo,
};

const SEND_SINGLE_PATH: &str = "/send-message/single";
const SEND_BULK_PATH: &str = "/send-message/bulk";
const SEND_TEMPLATE_PATH: &str = "/send-message/template";
const SEND_VOICE_PATH: &str = "/send-message/voice";
const MESSAGES_PATH: &str = "/messages";
const USER_INFO_PATH: &str = "/user/info";

#[derive(Clone, Copy)]
/// Messaging operations, obtained from [`SignalAdsClient::messages`].
pub struct MessagesService<'a> {
    client: &'a SignalAdsClient,
}

impl<'a> MessagesService<'a> {
    pub(crate) fn new(client: &'a SignalAdsClient) -> Self {
        Self { client }
    }

    /// Send one SMS, optionally with a document link.
    ///
    /// Errors:
    /// - [`SignalAdsError::Validation`] when `to` or `message` is empty (nothing is sent),
    /// - otherwise any pipeline error, wrapped as "failed to send message".
    pub async fn send_single_message(
        &self,
        ctx: &CallContext,
        request: &SendMessageRequest,
    ) -> Result<SendMessageResponse, SignalAdsError> {
        request.validate()?;
        self.client
            .post(ctx, SEND_SINGLE_PATH, Some(request))
            .await
            .map_err(|err| err.context("failed to send message"))
    }

    /// Send a plain text message.
    pub async fn send_message(
        &self,
        ctx: &CallContext,
        to: impl Into<String>,
        message: impl Into<String>,
    ) -> Result<SendMessageResponse, SignalAdsError> {
        self.send_single_message(ctx, &SendMessageRequest::new(to, message))
            .await
    }

    pub async fn send_message_with_document(
        &self,
        ctx: &CallContext,
        to: impl Into<String>,
        message: impl Into<String>,
        document_link: impl Into<String>,
        caption: impl Into<String>,
    ) -> Result<SendMessageResponse, SignalAdsError> {
        let request = SendMessageRequest {
            document_link: non_empty(document_link.into()),
            document_caption: non_empty(caption.into()),
            ..SendMessageRequest::new(to, message)
        };
        self.send_single_message(ctx, &request).await
    }

    /// Send several messages in one request. At least one item is required.
    pub async fn send_bulk_messages(
        &self,
        ctx: &CallContext,
        request: &SendBulkMessageRequest,
    ) -> Result<SendBulkMessageResponse, SignalAdsError> {
        request.validate()?;
        debug!(count = request.messages.len(), "sending bulk messages");
        self.client
            .post(ctx, SEND_BULK_PATH, Some(request))
            .await
            .map_err(|err| err.context("failed to send bulk messages"))
    }

    pub async fn send_bulk_message(
        &self,
        ctx: &CallContext,
        messages: Vec<BulkMessageItem>,
        from: Option<String>,
    ) -> Result<SendBulkMessageResponse, SignalAdsError> {
        let request = SendBulkMessageRequest {
            messages,
            from,
            params: None,
        };
        self.send_bulk_messages(ctx, &request).await
    }

    /// Send a message built from a predefined template.
    pub async fn send_template_message(
        &self,
        ctx: &CallContext,
        request: &SendTemplateMessageRequest,
    ) -> Result<SendMessageResponse, SignalAdsError> {
        request.validate()?;
        self.client
            .post(ctx, SEND_TEMPLATE_PATH, Some(request))
            .await
            .map_err(|err| err.context("failed to send template message"))
    }

    pub async fn send_template(
        &self,
        ctx: &CallContext,
        to: impl Into<String>,
        template_id: impl Into<String>,
        params: Option<BTreeMap<String, String>>,
    ) -> Result<SendMessageResponse, SignalAdsError> {
        let request = SendTemplateMessageRequest {
            template_params: params,
            ..SendTemplateMessageRequest::new(to, template_id)
        };
        self.send_template_message(ctx, &request).await
    }

    /// Send a voice call, from text-to-speech or an audio file.
    pub async fn send_voice_message(
        &self,
        ctx: &CallContext,
        request: &SendVoiceMessageRequest,
    ) -> Result<SendMessageResponse, SignalAdsError> {
        request.validate()?;
        self.client
            .post(ctx, SEND_VOICE_PATH, Some(request))
            .await
            .map_err(|err| err.context("failed to send voice message"))
    }

    /// Send a text-to-speech voice message. Empty `voice_type`/`language` are omitted.
    pub async fn send_voice(
        &self,
        ctx: &CallContext,
        to: impl Into<String>,
        message: impl Into<String>,
        voice_type: impl Into<String>,
        language: impl Into<String>,
    ) -> Result<SendMessageResponse, SignalAdsError> {
        let request = SendVoiceMessageRequest {
            to: to.into(),
            message: message.into(),
            voice_type: non_empty(voice_type.into()),
            language: non_empty(language.into()),
            ..Default::default()
        };
        self.send_voice_message(ctx, &request).await
    }

    /// List sent messages. `page`/`per_page` are sent only when positive.
    pub async fn list_messages(
        &self,
        ctx: &CallContext,
        params: Option<&PaginationParams>,
    ) -> Result<ListMessagesResponse, SignalAdsError> {
        let query = params.map(|params| params.to_query()).unwrap_or_default();
        self.client
            .get(ctx, MESSAGES_PATH, Some(&query))
            .await
            .map_err(|err| err.context("failed to list messages"))
    }

    pub async fn get_message_status(
        &self,
        ctx: &CallContext,
        message_id: impl Into<String>,
    ) -> Result<MessageStatus, SignalAdsError> {
        let message_id = MessageId::new(message_id)?;
        self.client
            .get(ctx, &message_id.status_path(), None)
            .await
            .map_err(|err| err.context("failed to get message status"))
    }

    /// Account details and balance of the authenticated user.
    pub async fn get_user_info(&self, ctx: &CallContext) -> Result<UserInfo, SignalAdsError> {
        self.client
            .get(ctx, USER_INFO_PATH, None)
            .await
            .map_err(|err| err.context("failed to get user info"))
    }
}

fn non_empty(value: String) -> Option<String> {
    (!value.is_empty()).then_some(value)
}
