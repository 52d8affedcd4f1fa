//! Exercises a running webhook endpoint with sample platform payloads,
//! mirroring what Instagram and Messenger deliver.

use clap::{Parser, ValueEnum};
use eyre::Result;
use serde_json::{json, Value};
use tracing::info;

#[derive(Parser)]
#[command(name = "webhook-probe")]
#[command(about = "Send sample Instagram/Messenger webhook payloads", long_about = None)]
struct Cli {
    /// Webhook endpoint to target
    #[arg(long, default_value = "http://localhost:5000/webhook")]
    endpoint: String,

    /// Sender id carried by the sample payloads
    #[arg(long, default_value = "IG_USER_123")]
    sender: String,

    /// Message text carried by the sample payloads
    #[arg(long, default_value = "hello")]
    text: String,

    /// Only send the payload for this platform
    #[arg(long, value_enum)]
    platform: Option<ProbePlatform>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum ProbePlatform {
    Instagram,
    Messenger,
}

fn instagram_payload(sender: &str, text: &str) -> Value {
    json!({
        "object": "instagram",
        "entry": [
            {
                "id": "1234567890",
                "time": 1731200000u64,
                "changes": [
                    {
                        "value": {
                            "from": { "id": sender },
                            "message": { "text": text },
                            "id": "IG_MESSAGE_456"
                        },
                        "field": "messages"
                    }
                ]
            }
        ]
    })
}

fn messenger_payload(sender: &str, text: &str) -> Value {
    json!({
        "object": "page",
        "entry": [
            {
                "id": "PAGE_123456",
                "time": 1731200000u64,
                "messaging": [
                    {
                        "sender": { "id": sender },
                        "recipient": { "id": "PAGE_123456" },
                        "timestamp": 1731200000u64,
                        "message": { "mid": "MID.abc123", "text": text }
                    }
                ]
            }
        ]
    })
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();
    let client = reqwest::Client::new();

    let samples = [
        (ProbePlatform::Instagram, instagram_payload(&cli.sender, &cli.text)),
        (ProbePlatform::Messenger, messenger_payload(&cli.sender, &cli.text)),
    ];

    for (platform, payload) in samples {
        if cli.platform.is_some_and(|selected| selected != platform) {
            continue;
        }

        info!(platform = ?platform, endpoint = %cli.endpoint, "Sending sample payload");
        let response = client.post(&cli.endpoint).json(&payload).send().await?;
        let status = response.status();
        let body = response.text().await?;
        println!("{platform:?}: status {status}, response: {body}");
    }

    Ok(())
}
