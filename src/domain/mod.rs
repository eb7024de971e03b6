//! Domain layer: request/response records and validated values (no I/O).

mod request;
mod response;
mod validation;
mod value;

pub use request::{
    BulkMessageItem, ExtraParams, PaginationParams, SendBulkMessageRequest, SendMessageRequest,
    SendTemplateMessageRequest, SendVoiceMessageRequest,
};
pub use response::{
    ListMessagesResponse, Message, MessageStatus, SendBulkMessageResponse, SendMessageResponse,
    UserInfo,
};
pub use validation::ValidationError;
pub use value::{ApiKey, ApiSecret, MessageId, Money};
