use async_trait::async_trait;
use reqwest::Client;
use tracing::info;

use crate::{
    engine::LeadSink,
    error::{LeadhookError, Result},
    types::Lead,
};

/// Delivers completed leads to the sheet-ingestion webhook.
///
/// One POST per lead. Callers log failures and move on; nothing is retried
/// or queued for later delivery.
pub struct SheetNotifier {
    client: Client,
    webhook_url: String,
}

impl SheetNotifier {
    pub fn new(client: Client, webhook_url: String) -> Self {
        Self { client, webhook_url }
    }
}

#[async_trait]
impl LeadSink for SheetNotifier {
    async fn deliver(&self, lead: &Lead) -> Result<()> {
        let response = self.client.post(&self.webhook_url).json(lead).send().await?;

        let status = response.status();
        if !status.is_success() {
            return Err(LeadhookError::SheetRejected(status.as_u16()));
        }

        info!(
            platform = %lead.platform,
            sender_id = %lead.sender_id,
            "Delivered lead to sheet webhook"
        );
        Ok(())
    }
}
