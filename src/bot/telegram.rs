//! Telegram Bot API transport.
//!
//! Uses `getUpdates` long polling for inbound messages and `sendMessage` for
//! replies. Every request is bounded by the configured request timeout, which
//! must exceed the long-poll wait.
use std::time::Duration;

use async_trait::async_trait;
use log::debug;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tokio::time::timeout;

use super::gateway::{GatewayError, InboundMessage, InboundUpdate, MessagingGateway};
use crate::config::TelegramConfig;
use crate::logutil::mask_secret;

#[derive(Debug, Deserialize)]
struct ApiResponse<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Update {
    update_id: i64,
    message: Option<Message>,
}

#[derive(Debug, Deserialize)]
struct Message {
    chat: Chat,
    from: Option<User>,
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct Chat {
    id: i64,
}

/// The bot's own account, as reported by `getMe`.
#[derive(Debug, Deserialize)]
pub struct User {
    pub first_name: String,
    #[serde(default)]
    pub username: Option<String>,
}

#[derive(Serialize)]
struct GetUpdatesParams<'a> {
    offset: i64,
    timeout: u64,
    allowed_updates: &'a [&'a str],
}

#[derive(Serialize)]
struct SendMessageParams<'a> {
    chat_id: i64,
    text: &'a str,
}

impl From<Update> for InboundUpdate {
    fn from(update: Update) -> Self {
        let message = update.message.and_then(|m| {
            m.text.map(|text| InboundMessage {
                chat_id: m.chat.id,
                text,
                first_name: m.from.map(|u| u.first_name),
            })
        });
        InboundUpdate {
            update_id: update.update_id,
            message,
        }
    }
}

fn transport_error(err: reqwest::Error) -> GatewayError {
    GatewayError::Http(err.without_url())
}

pub struct TelegramGateway {
    config: TelegramConfig,
    client: reqwest::Client,
}

impl TelegramGateway {
    pub fn new(config: TelegramConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base.trim_end_matches('/'),
            self.config.token,
            method
        )
    }

    async fn call<P, T>(&self, method: &str, params: &P) -> Result<T, GatewayError>
    where
        P: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let limit = self.config.request_timeout_secs;
        let request = self.client.post(self.method_url(method)).json(params).send();
        let response = timeout(Duration::from_secs(limit), request)
            .await
            .map_err(|_| GatewayError::Timeout(limit))?
            .map_err(transport_error)?;
        let body: ApiResponse<T> = response.json().await.map_err(transport_error)?;
        if !body.ok {
            return Err(GatewayError::Api(
                body.description
                    .unwrap_or_else(|| format!("{method} failed without description")),
            ));
        }
        body.result
            .ok_or_else(|| GatewayError::Api(format!("{method} returned no result")))
    }

    /// Check the token with `getMe`. Used once at startup.
    pub async fn verify(&self) -> Result<User, GatewayError> {
        debug!(
            "verifying bot token {}",
            mask_secret(&self.config.token)
        );
        self.call("getMe", &serde_json::json!({})).await
    }
}

#[async_trait]
impl MessagingGateway for TelegramGateway {
    async fn poll_updates(&self, offset: i64) -> Result<Vec<InboundUpdate>, GatewayError> {
        let params = GetUpdatesParams {
            offset,
            timeout: self.config.poll_timeout_secs,
            allowed_updates: &["message"],
        };
        let updates: Vec<Update> = self.call("getUpdates", &params).await?;
        Ok(updates.into_iter().map(InboundUpdate::from).collect())
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> Result<(), GatewayError> {
        let params = SendMessageParams { chat_id, text };
        let _sent: serde_json::Value = self.call("sendMessage", &params).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_with_text_becomes_message() {
        let raw = r#"{"ok":true,"result":[
            {"update_id":10,"message":{"message_id":1,"chat":{"id":42,"type":"private"},
             "from":{"id":42,"is_bot":false,"first_name":"Ada"},"text":"/profile"}},
            {"update_id":11,"message":{"message_id":2,"chat":{"id":43,"type":"private"}}},
            {"update_id":12}
        ]}"#;
        let body: ApiResponse<Vec<Update>> = serde_json::from_str(raw).unwrap();
        assert!(body.ok);
        let updates: Vec<InboundUpdate> = body
            .result
            .unwrap()
            .into_iter()
            .map(InboundUpdate::from)
            .collect();
        assert_eq!(updates.len(), 3);
        let first = updates[0].message.as_ref().unwrap();
        assert_eq!(first.chat_id, 42);
        assert_eq!(first.text, "/profile");
        assert_eq!(first.first_name.as_deref(), Some("Ada"));
        assert!(updates[1].message.is_none(), "no text, no message");
        assert_eq!(updates[2].update_id, 12);
    }

    #[tokio::test]
    async fn transport_errors_do_not_carry_the_token() {
        // Nothing listens on the discard port, so the connect fails fast.
        let gateway = TelegramGateway::new(TelegramConfig {
            token: "123456:SUPERSECRETTOKEN".into(),
            api_base: "http://127.0.0.1:9".into(),
            request_timeout_secs: 5,
            ..TelegramConfig::default()
        });
        let err = gateway.poll_updates(0).await.unwrap_err();
        let shown = format!("polling updates failed: {}", err);
        let debug = format!("{:?}", err);
        assert!(!shown.contains("SUPERSECRETTOKEN"), "{shown}");
        assert!(!debug.contains("SUPERSECRETTOKEN"), "{debug}");

        let err = gateway.verify().await.unwrap_err();
        assert!(!err.to_string().contains("SUPERSECRETTOKEN"));
    }

    #[test]
    fn method_url_joins_base_token_and_method() {
        let gateway = TelegramGateway::new(TelegramConfig {
            token: "123:abc".into(),
            api_base: "http://localhost:8081/".into(),
            ..TelegramConfig::default()
        });
        assert_eq!(
            gateway.method_url("getUpdates"),
            "http://localhost:8081/bot123:abc/getUpdates"
        );
    }
}
