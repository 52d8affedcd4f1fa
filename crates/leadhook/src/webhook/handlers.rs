use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use tracing::{error, info, warn};

use crate::metrics::{EVENTS_RECEIVED, PAYLOADS_IGNORED};

use super::{payload::extract_messages, state::AppState};

/// Query parameters of the Meta webhook verification handshake
#[derive(Debug, Deserialize)]
pub struct VerifyParams {
    #[serde(rename = "hub.mode")]
    pub mode: Option<String>,
    #[serde(rename = "hub.verify_token")]
    pub verify_token: Option<String>,
    #[serde(rename = "hub.challenge")]
    pub challenge: Option<String>,
}

/// Handle the GET verification handshake
pub async fn handle_verify(
    State(state): State<AppState>,
    Query(params): Query<VerifyParams>,
) -> impl IntoResponse {
    match verify_subscription(&params, &state.config.verify_token) {
        Some(challenge) => {
            info!("Webhook verified successfully");
            (StatusCode::OK, challenge)
        }
        None => {
            warn!(mode = ?params.mode, "Webhook verification failed");
            (StatusCode::FORBIDDEN, "Verification failed".to_string())
        }
    }
}

/// The challenge to echo when the subscription request carries the expected
/// mode and token; `None` means refuse with 403.
pub fn verify_subscription(params: &VerifyParams, expected_token: &str) -> Option<String> {
    if params.mode.as_deref() != Some("subscribe") {
        return None;
    }
    if params.verify_token.as_deref() != Some(expected_token) {
        return None;
    }
    params.challenge.clone()
}

/// Handle incoming webhook event payloads.
///
/// Always acknowledges with 200 so the platform does not retry; unknown
/// payload shapes are counted and otherwise ignored.
pub async fn handle_events(
    State(state): State<AppState>,
    Json(payload): Json<serde_json::Value>,
) -> impl IntoResponse {
    let messages = extract_messages(&payload);
    if messages.is_empty() {
        PAYLOADS_IGNORED.inc();
        return (StatusCode::OK, "EVENT_RECEIVED");
    }

    for message in messages {
        EVENTS_RECEIVED.with_label_values(&[message.platform.as_str()]).inc();
        info!(
            platform = %message.platform,
            sender_id = %message.sender_id,
            "Received message event"
        );
        if state.event_sender.send(message).await.is_err() {
            warn!("Processing queue closed, dropping message");
        }
    }

    (StatusCode::OK, "EVENT_RECEIVED")
}

/// Health check endpoint handler
pub async fn health_check() -> impl IntoResponse {
    "OK"
}

/// Prometheus metrics exposition handler
pub async fn metrics() -> impl IntoResponse {
    use prometheus::Encoder;

    let mut buffer = Vec::new();
    let encoder = prometheus::TextEncoder::new();
    if let Err(e) = encoder.encode(&prometheus::gather(), &mut buffer) {
        error!("Failed to encode metrics: {}", e);
        return (StatusCode::INTERNAL_SERVER_ERROR, String::new());
    }

    (StatusCode::OK, String::from_utf8(buffer).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(mode: &str, token: &str, challenge: &str) -> VerifyParams {
        VerifyParams {
            mode: Some(mode.to_string()),
            verify_token: Some(token.to_string()),
            challenge: Some(challenge.to_string()),
        }
    }

    #[test]
    fn test_verify_subscription_echoes_challenge() {
        let result = verify_subscription(&params("subscribe", "secret", "12345"), "secret");
        assert_eq!(result.as_deref(), Some("12345"));
    }

    #[test]
    fn test_verify_subscription_rejects_bad_token() {
        assert!(verify_subscription(&params("subscribe", "wrong", "12345"), "secret").is_none());
    }

    #[test]
    fn test_verify_subscription_rejects_bad_mode() {
        assert!(verify_subscription(&params("unsubscribe", "secret", "12345"), "secret").is_none());
    }

    #[test]
    fn test_verify_subscription_requires_all_params() {
        let empty = VerifyParams { mode: None, verify_token: None, challenge: None };
        assert!(verify_subscription(&empty, "secret").is_none());

        let no_challenge = VerifyParams {
            mode: Some("subscribe".to_string()),
            verify_token: Some("secret".to_string()),
            challenge: None,
        };
        assert!(verify_subscription(&no_challenge, "secret").is_none());
    }
}
