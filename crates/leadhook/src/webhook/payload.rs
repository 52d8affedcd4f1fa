//! Wire shapes delivered by the Meta webhook and their normalization.
//!
//! Instagram events arrive as `entry[].changes[].value` with the sender
//! under `value.from.id` (or nested inside the message) and the text under
//! `value.message.text`. Messenger events arrive as `entry[].messaging[]`
//! with `sender.id` and `message.text`. Everything else normalizes to
//! nothing and is acknowledged without further processing.

use serde::Deserialize;

use crate::types::{InboundMessage, Platform};

#[derive(Debug, Deserialize)]
struct Envelope {
    object: String,
    #[serde(default)]
    entry: Vec<Entry>,
}

#[derive(Debug, Deserialize)]
struct Entry {
    #[serde(default)]
    changes: Vec<Change>,
    #[serde(default)]
    messaging: Vec<MessagingEvent>,
}

#[derive(Debug, Deserialize)]
struct Change {
    value: Option<ChangeValue>,
}

#[derive(Debug, Deserialize)]
struct ChangeValue {
    from: Option<Actor>,
    message: Option<MessageBody>,
}

#[derive(Debug, Deserialize)]
struct MessagingEvent {
    sender: Option<Actor>,
    message: Option<MessageBody>,
}

#[derive(Debug, Deserialize)]
struct Actor {
    id: Option<String>,
}

#[derive(Debug, Deserialize)]
struct MessageBody {
    text: Option<String>,
    // Instagram nests the sender inside the message on some event shapes
    from: Option<Actor>,
}

/// Normalize a webhook payload into zero or more inbound messages.
///
/// Events without a sender id or without a text field are skipped. A text
/// field that is present but blank is forwarded as an empty string so the
/// conversation can re-prompt.
pub fn extract_messages(payload: &serde_json::Value) -> Vec<InboundMessage> {
    let envelope: Envelope = match serde_json::from_value(payload.clone()) {
        Ok(envelope) => envelope,
        Err(_) => return Vec::new(),
    };

    let platform = match envelope.object.as_str() {
        "instagram" => Platform::Instagram,
        "page" => Platform::Messenger,
        _ => return Vec::new(),
    };

    let mut messages = Vec::new();
    for entry in envelope.entry {
        match platform {
            Platform::Instagram => {
                for change in entry.changes {
                    let Some(value) = change.value else { continue };
                    let Some(message) = value.message else { continue };
                    let sender_id = message
                        .from
                        .as_ref()
                        .or(value.from.as_ref())
                        .and_then(|actor| actor.id.clone());
                    if let (Some(sender_id), Some(text)) = (sender_id, message.text) {
                        messages.push(InboundMessage {
                            platform,
                            sender_id,
                            text: text.trim().to_string(),
                        });
                    }
                }
            }
            Platform::Messenger => {
                for event in entry.messaging {
                    let sender_id = event.sender.and_then(|actor| actor.id);
                    let text = event.message.and_then(|message| message.text);
                    if let (Some(sender_id), Some(text)) = (sender_id, text) {
                        messages.push(InboundMessage {
                            platform,
                            sender_id,
                            text: text.trim().to_string(),
                        });
                    }
                }
            }
        }
    }

    messages
}
