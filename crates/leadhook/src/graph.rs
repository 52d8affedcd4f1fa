use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use tracing::debug;

use crate::{
    engine::ReplySender,
    error::{LeadhookError, Result},
    types::Platform,
};

const MENU_TITLE: &str = "Main menu";

/// Quick-reply options shown after a completed registration
const MENU_OPTIONS: [(&str, &str); 4] = [
    ("Start", "START"),
    ("About us", "ABOUT"),
    ("Register", "REGISTER"),
    ("Book a session", "BOOK"),
];

/// Client for the Graph API send-message endpoint.
pub struct GraphClient {
    client: Client,
    base_url: String,
    account_id: String,
    access_token: String,
}

impl GraphClient {
    pub fn new(client: Client, base_url: String, account_id: String, access_token: String) -> Self {
        Self { client, base_url, account_id, access_token }
    }

    fn messages_url(&self) -> String {
        format!("{}/{}/messages", self.base_url.trim_end_matches('/'), self.account_id)
    }

    async fn post_message(
        &self,
        platform: Platform,
        recipient_id: &str,
        message: serde_json::Value,
    ) -> Result<()> {
        let payload = json!({
            "messaging_product": platform.as_str(),
            "recipient": { "id": recipient_id },
            "message": message,
        });

        let response = self
            .client
            .post(self.messages_url())
            .query(&[("access_token", self.access_token.as_str())])
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LeadhookError::SendRejected {
                status: status.as_u16(),
                recipient_id: recipient_id.to_string(),
            });
        }

        debug!(recipient_id, status = status.as_u16(), "Sent message");
        Ok(())
    }
}

#[async_trait]
impl ReplySender for GraphClient {
    async fn send_text(&self, platform: Platform, recipient_id: &str, text: &str) -> Result<()> {
        self.post_message(platform, recipient_id, json!({ "text": text })).await
    }

    async fn send_menu(&self, platform: Platform, recipient_id: &str) -> Result<()> {
        let quick_replies: Vec<serde_json::Value> = MENU_OPTIONS
            .iter()
            .map(|(title, payload)| {
                json!({
                    "content_type": "text",
                    "title": title,
                    "payload": payload,
                })
            })
            .collect();

        self.post_message(
            platform,
            recipient_id,
            json!({ "text": MENU_TITLE, "quick_replies": quick_replies }),
        )
        .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages_url() {
        let client = GraphClient::new(
            Client::new(),
            "https://graph.facebook.com/v17.0".to_string(),
            "1784".to_string(),
            "token".to_string(),
        );
        assert_eq!(client.messages_url(), "https://graph.facebook.com/v17.0/1784/messages");
    }

    #[test]
    fn test_messages_url_trims_trailing_slash() {
        let client = GraphClient::new(
            Client::new(),
            "https://graph.facebook.com/v17.0/".to_string(),
            "1784".to_string(),
            "token".to_string(),
        );
        assert_eq!(client.messages_url(), "https://graph.facebook.com/v17.0/1784/messages");
    }
}
