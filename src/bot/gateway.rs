use async_trait::async_trait;
use thiserror::Error;

/// A text message received from a chat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundMessage {
    pub chat_id: i64,
    pub text: String,
    pub first_name: Option<String>,
}

impl InboundMessage {
    /// Player identity for this chat: the chat id as a decimal string.
    pub fn telegram_id(&self) -> String {
        self.chat_id.to_string()
    }
}

/// One polled update. Updates without a text message still advance the offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundUpdate {
    pub update_id: i64,
    pub message: Option<InboundMessage>,
}

#[derive(Debug, Error)]
pub enum GatewayError {
    /// Transport failure. Never carries the request URL, which embeds the bot token.
    #[cfg(feature = "telegram")]
    #[error("http error: {0}")]
    Http(#[source] reqwest::Error),

    #[error("request timed out after {0}s")]
    Timeout(u64),

    /// The Bot API answered with `ok: false`.
    #[error("telegram api error: {0}")]
    Api(String),
}

/// Delivers inbound commands and outbound replies for chat identities.
#[async_trait]
pub trait MessagingGateway: Send + Sync {
    /// Wait for updates with an id of at least `offset`. Acknowledges everything
    /// below `offset`.
    async fn poll_updates(&self, offset: i64) -> Result<Vec<InboundUpdate>, GatewayError>;

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), GatewayError>;
}
