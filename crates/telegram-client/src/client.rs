//! Telegram Bot API HTTP client.

use crate::error::TelegramError;
use crate::types::*;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, instrument, warn};

/// Default Bot API endpoint.
pub const DEFAULT_API_URL: &str = "https://api.telegram.org";

/// Telegram Bot API client.
#[derive(Clone)]
pub struct TelegramClient {
    client: Client,
    base_url: String,
    token: String,
}

impl TelegramClient {
    /// Create a new client against a specific API endpoint.
    pub fn new(
        base_url: impl Into<String>,
        token: impl Into<String>,
    ) -> Result<Self, TelegramError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            token: token.into(),
        })
    }

    fn method_url(&self, method: &str) -> String {
        format!("{}/bot{}/{}", self.base_url, self.token, method)
    }

    async fn unwrap_envelope<T: DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, TelegramError> {
        let envelope: ApiResponse<T> = response.json().await?;
        if envelope.ok {
            envelope.result.ok_or(TelegramError::Api {
                code: None,
                description: "ok response without result".into(),
            })
        } else {
            Err(TelegramError::Api {
                code: envelope.error_code,
                description: envelope
                    .description
                    .unwrap_or_else(|| "unknown error".into()),
            })
        }
    }

    async fn call_json<Req: serde::Serialize, T: DeserializeOwned>(
        &self,
        method: &str,
        request: &Req,
    ) -> Result<T, TelegramError> {
        let response = self
            .client
            .post(self.method_url(method))
            .json(request)
            .send()
            .await?;
        Self::unwrap_envelope(response).await
    }

    /// Fetch the bot's own identity.
    #[instrument(skip(self))]
    pub async fn get_me(&self) -> Result<User, TelegramError> {
        let response = self.client.get(self.method_url("getMe")).send().await?;
        Self::unwrap_envelope(response).await
    }

    /// Send a plain text message, optionally linked as a reply.
    #[instrument(skip(self, text))]
    pub async fn send_message(
        &self,
        chat_id: i64,
        text: &str,
        reply_to_message_id: Option<i64>,
    ) -> Result<Message, TelegramError> {
        let request = SendMessageRequest {
            chat_id,
            text: text.to_string(),
            reply_to_message_id,
        };
        let message: Message = self.call_json("sendMessage", &request).await?;
        debug!("Sent message {} to chat {}", message.message_id, chat_id);
        Ok(message)
    }

    /// Reply to a message with text.
    pub async fn reply(&self, original: &Message, text: &str) -> Result<Message, TelegramError> {
        self.send_message(original.chat.id, text, Some(original.message_id))
            .await
    }

    /// Send an audio file (shown with player controls, no reply link).
    #[instrument(skip(self, bytes))]
    pub async fn send_audio(
        &self,
        chat_id: i64,
        filename: &str,
        bytes: Vec<u8>,
    ) -> Result<Message, TelegramError> {
        let form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("audio", Part::bytes(bytes).file_name(filename.to_string()));

        let response = self
            .client
            .post(self.method_url("sendAudio"))
            .multipart(form)
            .send()
            .await?;
        Self::unwrap_envelope(response).await
    }

    /// Send a voice note, linked as a reply to an earlier message.
    ///
    /// The link is tolerant: the note is still delivered if the target
    /// message has since been deleted.
    #[instrument(skip(self, bytes))]
    pub async fn send_voice(
        &self,
        chat_id: i64,
        filename: &str,
        bytes: Vec<u8>,
        reply_to_message_id: Option<i64>,
    ) -> Result<Message, TelegramError> {
        let mut form = Form::new()
            .text("chat_id", chat_id.to_string())
            .part("voice", Part::bytes(bytes).file_name(filename.to_string()));

        if let Some(reply_to) = reply_to_message_id {
            form = form
                .text("reply_to_message_id", reply_to.to_string())
                .text("allow_sending_without_reply", "true");
        }

        let response = self
            .client
            .post(self.method_url("sendVoice"))
            .multipart(form)
            .send()
            .await?;
        Self::unwrap_envelope(response).await
    }

    /// Delete a message from a chat.
    #[instrument(skip(self))]
    pub async fn delete_message(
        &self,
        chat_id: i64,
        message_id: i64,
    ) -> Result<(), TelegramError> {
        let request = DeleteMessageRequest {
            chat_id,
            message_id,
        };
        let deleted: bool = self.call_json("deleteMessage", &request).await?;
        if !deleted {
            warn!("deleteMessage returned false for {}/{}", chat_id, message_id);
        }
        Ok(())
    }

    /// Publish the command menu.
    #[instrument(skip(self, commands))]
    pub async fn set_my_commands(
        &self,
        commands: &[BotCommand],
    ) -> Result<(), TelegramError> {
        let request = SetMyCommandsRequest {
            commands: commands.to_vec(),
        };
        let _: bool = self.call_json("setMyCommands", &request).await?;
        debug!("Registered {} bot commands", commands.len());
        Ok(())
    }

    /// Point the platform's webhook delivery at `url`.
    #[instrument(skip(self))]
    pub async fn set_webhook(&self, url: &str) -> Result<(), TelegramError> {
        let request = SetWebhookRequest {
            url: url.to_string(),
        };
        let _: bool = self.call_json("setWebhook", &request).await?;
        Ok(())
    }

    /// Remove any configured webhook (required before long polling).
    #[instrument(skip(self))]
    pub async fn delete_webhook(&self) -> Result<(), TelegramError> {
        let response = self
            .client
            .post(self.method_url("deleteWebhook"))
            .send()
            .await?;
        let _: bool = Self::unwrap_envelope(response).await?;
        Ok(())
    }

    /// Long-poll for pending updates.
    #[instrument(skip(self))]
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        timeout: Duration,
    ) -> Result<Vec<Update>, TelegramError> {
        let request = GetUpdatesRequest {
            offset,
            timeout: timeout.as_secs(),
        };
        let updates: Vec<Update> = self.call_json("getUpdates", &request).await?;
        debug!("Received {} updates", updates.len());
        Ok(updates)
    }
}
