use serde::Serialize;

/// Originating messaging platform for an inbound event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Instagram,
    Messenger,
}

impl Platform {
    /// Lowercase identifier, also used as the `messaging_product` tag on the
    /// Graph send API.
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Instagram => "instagram",
            Platform::Messenger => "messenger",
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Normalized inbound direct message, independent of the wire shape it
/// arrived in.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    pub platform: Platform,
    pub sender_id: String,
    pub text: String,
}

/// A completed (name, email) pair ready for delivery to the sheet webhook.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Lead {
    pub platform: Platform,
    pub sender_id: String,
    pub name: String,
    pub email: String,
}
