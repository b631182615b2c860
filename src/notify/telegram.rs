//! Telegram delivery channel.

use async_trait::async_trait;
use reqwest::Client;

use crate::error::{AppError, Result};
use crate::models::TelegramConfig;

use super::MessageChannel;

const API_BASE: &str = "https://api.telegram.org";

/// Sends messages through the Telegram Bot API.
pub struct TelegramChannel {
    client: Client,
    api_base: String,
    token: String,
    chat_id: String,
}

impl TelegramChannel {
    pub fn new(config: &TelegramConfig) -> Result<Self> {
        Ok(Self {
            client: Client::builder().build()?,
            api_base: API_BASE.to_string(),
            token: config.bot_token.clone(),
            chat_id: config.chat_id.clone(),
        })
    }

    #[cfg(test)]
    fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.to_string();
        self
    }
}

#[async_trait]
impl MessageChannel for TelegramChannel {
    async fn send(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);
        let body = serde_json::json!({
            "chat_id": self.chat_id,
            "text": text,
            "parse_mode": "Markdown",
            "disable_web_page_preview": false,
        });

        let response = self.client.post(&url).json(&body).send().await?;
        if !response.status().is_success() {
            return Err(AppError::notify(format!(
                "telegram returned {}",
                response.status()
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{body_partial_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn channel(api_base: &str) -> TelegramChannel {
        TelegramChannel::new(&TelegramConfig {
            bot_token: "123:abc".into(),
            chat_id: "42".into(),
        })
        .unwrap()
        .with_api_base(api_base)
    }

    #[tokio::test]
    async fn test_send_posts_markdown_message() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/bot123:abc/sendMessage"))
            .and(body_partial_json(serde_json::json!({
                "chat_id": "42",
                "text": "*Title*\n\nbody",
                "parse_mode": "Markdown",
            })))
            .respond_with(ResponseTemplate::new(200).set_body_raw(r#"{"ok":true}"#, "application/json"))
            .expect(1)
            .mount(&server)
            .await;

        channel(&server.uri()).send("*Title*\n\nbody").await.unwrap();
    }

    #[tokio::test]
    async fn test_non_success_status_is_an_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(401))
            .mount(&server)
            .await;

        let result = channel(&server.uri()).send("hello").await;
        assert!(matches!(result, Err(AppError::Notify(_))));
    }
}
