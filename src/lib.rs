//! Typed Rust client for the SignalAds SMS and voice messaging HTTP API.
//!
//! The crate is layered like this: a domain layer of request/response records, a
//! transport layer for HTTP and wire-format details, an error classifier turning
//! non-2xx responses into [`ApiError`] values, and a small client layer that ties
//! them together.
//!
//! ```rust,no_run
//! use signalads::{CallContext, Credentials, SignalAdsClient, error};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), signalads::SignalAdsError> {
//!     let client = SignalAdsClient::new(Credentials::new("api-key", "api-secret")?);
//!     let ctx = CallContext::background();
//!
//!     match client.messages().send_message(&ctx, "+989120000000", "hello").await {
//!         Ok(sent) => println!("sent {}", sent.id),
//!         Err(err) if error::is_insufficient_balance(&err) => println!("top up first"),
//!         Err(err) => return Err(err),
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod client;
pub mod domain;
pub mod error;
pub mod messages;
mod transport;

pub use client::{
    CallContext, ContextError, Credentials, DEFAULT_BASE_URL, DEFAULT_TIMEOUT, SignalAdsClient,
    SignalAdsClientBuilder, SignalAdsError,
};
pub use domain::{
    ApiKey, ApiSecret, BulkMessageItem, ExtraParams, ListMessagesResponse, Message, MessageId,
    MessageStatus, Money, PaginationParams, SendBulkMessageRequest, SendBulkMessageResponse,
    SendMessageRequest, SendMessageResponse, SendTemplateMessageRequest, SendVoiceMessageRequest,
    UserInfo, ValidationError,
};
pub use error::ApiError;
pub use messages::MessagesService;
pub use reqwest::Method;
pub use tokio_util::sync::CancellationToken;
