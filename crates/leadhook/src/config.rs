use clap::Parser;
use eyre::Result;

use crate::http_client::parse_endpoint_url;

/// Runtime configuration, sourced from command-line flags or the
/// environment at process start.
#[derive(Parser, Debug, Clone)]
#[command(name = "leadhook", about = "Instagram/Messenger lead-capture webhook bot")]
pub struct AppConfig {
    /// Token expected during the Meta webhook verification handshake
    #[arg(long, env = "VERIFY_TOKEN")]
    pub verify_token: String,

    /// Page access token for the Graph send API
    #[arg(long, env = "PAGE_ACCESS_TOKEN")]
    pub page_access_token: String,

    /// Account id used as the send-API path segment
    #[arg(long, env = "IG_ACCOUNT_ID")]
    pub ig_account_id: String,

    /// Sheet-ingestion webhook URL receiving completed leads
    #[arg(long, env = "SHEET_WEBHOOK_URL")]
    pub sheet_webhook_url: String,

    /// Graph API base URL
    #[arg(long, env = "GRAPH_API_BASE", default_value = "https://graph.facebook.com/v17.0")]
    pub graph_api_base: String,

    /// Port the webhook server listens on
    #[arg(long, env = "PORT", default_value_t = 5000)]
    pub port: u16,

    /// Session inactivity expiry in seconds
    #[arg(long, env = "SESSION_TTL_SECS", default_value_t = 600)]
    pub session_ttl_secs: u64,

    /// Interval between background session sweeps in seconds
    #[arg(long, env = "SWEEP_INTERVAL_SECS", default_value_t = 60)]
    pub sweep_interval_secs: u64,
}

impl AppConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.verify_token.trim().is_empty() {
            return Err(eyre::eyre!("Verify token must not be empty"));
        }

        if self.page_access_token.trim().is_empty() {
            return Err(eyre::eyre!("Page access token must not be empty"));
        }

        if self.ig_account_id.trim().is_empty() {
            return Err(eyre::eyre!("Account id must not be empty"));
        }

        if self.session_ttl_secs < 1 || self.session_ttl_secs > 86_400 {
            return Err(eyre::eyre!("Session TTL must be between 1 second and 1 day"));
        }

        if self.sweep_interval_secs < 1 || self.sweep_interval_secs > 3_600 {
            return Err(eyre::eyre!("Sweep interval must be between 1 second and 1 hour"));
        }

        parse_endpoint_url(&self.sheet_webhook_url)
            .map_err(|e| eyre::eyre!("Invalid sheet webhook URL: {e}"))?;

        parse_endpoint_url(&self.graph_api_base)
            .map_err(|e| eyre::eyre!("Invalid Graph API base URL: {e}"))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_config() -> AppConfig {
        AppConfig {
            verify_token: "verify-me".to_string(),
            page_access_token: "page-token".to_string(),
            ig_account_id: "1784".to_string(),
            sheet_webhook_url: "https://script.google.com/macros/s/abc/exec".to_string(),
            graph_api_base: "https://graph.facebook.com/v17.0".to_string(),
            port: 5000,
            session_ttl_secs: 600,
            sweep_interval_secs: 60,
        }
    }

    #[test]
    fn test_valid_config_passes() {
        assert!(create_test_config().validate().is_ok());
    }

    #[test]
    fn test_empty_tokens_rejected() {
        let mut config = create_test_config();
        config.verify_token = "  ".to_string();
        assert!(config.validate().is_err());

        let mut config = create_test_config();
        config.page_access_token = String::new();
        assert!(config.validate().is_err());

        let mut config = create_test_config();
        config.ig_account_id = String::new();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_ttl_bounds() {
        let mut config = create_test_config();
        config.session_ttl_secs = 0;
        assert!(config.validate().is_err());

        config.session_ttl_secs = 86_401;
        assert!(config.validate().is_err());

        config.session_ttl_secs = 600;
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_sweep_interval_bounds() {
        let mut config = create_test_config();
        config.sweep_interval_secs = 0;
        assert!(config.validate().is_err());

        config.sweep_interval_secs = 3_601;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_malformed_urls_rejected() {
        let mut config = create_test_config();
        config.sheet_webhook_url = "not-a-url".to_string();
        assert!(config.validate().is_err());

        let mut config = create_test_config();
        config.graph_api_base = "ftp://graph.facebook.com".to_string();
        assert!(config.validate().is_err());
    }
}
