//! Telegram Bot API delivery

use crate::config::NotifierConfig;
use crate::error::{JobHunterError, Result};
use crate::notify::Notifier;
use async_trait::async_trait;
use log::{debug, warn};
use serde::Serialize;
use std::time::Duration;

/// Telegram rejects longer messages; the limit counts UTF-16 code units
pub const MAX_MESSAGE_UNITS: usize = 4096;
const API_BASE: &str = "https://api.telegram.org";
const SEND_TIMEOUT: Duration = Duration::from_secs(10);

pub fn truncate_message(text: &str) -> String {
    let mut units = 0;
    text.chars()
        .take_while(|c| {
            units += c.len_utf16();
            units <= MAX_MESSAGE_UNITS
        })
        .collect()
}

#[derive(Debug, Serialize)]
struct SendMessage<'a> {
    chat_id: &'a str,
    text: &'a str,
    disable_web_page_preview: bool,
}

pub struct TelegramNotifier {
    client: reqwest::Client,
    api_base: String,
    token: String,
    chat_id: String,
}

impl TelegramNotifier {
    pub fn new(token: String, chat_id: String) -> Result<Self> {
        Ok(Self {
            client: reqwest::Client::builder().timeout(SEND_TIMEOUT).build()?,
            api_base: API_BASE.to_string(),
            token,
            chat_id,
        })
    }

    pub fn with_api_base(mut self, api_base: impl Into<String>) -> Self {
        self.api_base = api_base.into();
        self
    }

    /// Built when both the token and chat id environment variables are set
    pub fn from_env(settings: &NotifierConfig) -> Option<Result<Self>> {
        let token = std::env::var(&settings.bot_token_env).ok().filter(|t| !t.trim().is_empty());
        let chat_id = std::env::var(&settings.chat_id_env).ok().filter(|c| !c.trim().is_empty());
        match (token, chat_id) {
            (Some(token), Some(chat_id)) => Some(Self::new(token, chat_id)),
            _ => {
                debug!(
                    "Telegram disabled: {} or {} not set",
                    settings.bot_token_env, settings.chat_id_env
                );
                None
            }
        }
    }

    fn endpoint(&self) -> String {
        format!("{}/bot{}/sendMessage", self.api_base.trim_end_matches('/'), self.token)
    }

    async fn send(&self, text: &str) -> Result<()> {
        let text = truncate_message(text);
        let body = SendMessage {
            chat_id: &self.chat_id,
            text: &text,
            disable_web_page_preview: true,
        };

        // the request path carries the bot token
        let response = self
            .client
            .post(self.endpoint())
            .json(&body)
            .send()
            .await
            .map_err(|e| JobHunterError::Network(e.without_url().to_string()))?;
        let status = response.status();
        if status.is_success() {
            return Ok(());
        }

        let detail = response.text().await.unwrap_or_default();
        warn!("Telegram returned {}", status);
        Err(JobHunterError::Notifier(format!(
            "Telegram returned {}: {}",
            status,
            detail.chars().take(200).collect::<String>()
        )))
    }
}

#[async_trait]
impl Notifier for TelegramNotifier {
    fn name(&self) -> &str {
        "telegram"
    }

    async fn send_summary(&self, text: &str) -> Result<()> {
        self.send(text).await
    }

    async fn send_detail(&self, text: &str) -> Result<()> {
        self.send(text).await
    }
}
