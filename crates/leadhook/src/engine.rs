use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error, warn};

use crate::{
    error::Result,
    metrics::{LEADS_CAPTURED, LEAD_DELIVERY_FAILURES, REPLIES_FAILED, REPLIES_SENT},
    session::{SessionStore, Transition},
    types::{InboundMessage, Lead, Platform},
};

pub const NAME_PROMPT: &str = "Welcome! Please tell me your name:";
pub const EMAIL_PROMPT: &str = "Thanks! Now please enter your email address:";
pub const EMAIL_REPROMPT: &str =
    "That doesn't look like an email address. Please enter a valid email:";
pub const CONFIRMATION: &str = "Your details have been registered successfully!";

/// Outbound reply transport for a messaging platform.
#[async_trait]
pub trait ReplySender: Send + Sync {
    async fn send_text(&self, platform: Platform, recipient_id: &str, text: &str) -> Result<()>;

    /// Send the quick-reply menu shown after a completed registration.
    async fn send_menu(&self, platform: Platform, recipient_id: &str) -> Result<()>;
}

/// Destination for completed leads.
#[async_trait]
pub trait LeadSink: Send + Sync {
    async fn deliver(&self, lead: &Lead) -> Result<()>;
}

/// Drives the scripted conversation for each normalized inbound message.
///
/// The session store, reply transport, and lead sink are injected so the
/// engine can be exercised without any live platform endpoints.
pub struct Engine {
    sessions: Arc<SessionStore>,
    replies: Arc<dyn ReplySender>,
    leads: Arc<dyn LeadSink>,
}

impl Engine {
    pub fn new(
        sessions: Arc<SessionStore>,
        replies: Arc<dyn ReplySender>,
        leads: Arc<dyn LeadSink>,
    ) -> Self {
        Self { sessions, replies, leads }
    }

    /// Consume one inbound message: sweep expired sessions, advance the
    /// sender's session, send exactly one scripted reply, and deliver the
    /// lead on completion.
    ///
    /// Nothing here is fatal. Outbound failures are logged and the engine
    /// keeps serving subsequent messages.
    pub async fn handle(&self, message: &InboundMessage) {
        self.sessions.sweep().await;

        let transition = self.sessions.advance(&message.sender_id, &message.text).await;
        debug!(
            platform = %message.platform,
            sender_id = %message.sender_id,
            transition = ?transition,
            "Advanced conversation"
        );

        let reply = match &transition {
            Transition::NameCaptured { .. } => EMAIL_PROMPT,
            Transition::NameRejected => NAME_PROMPT,
            Transition::EmailRejected => EMAIL_REPROMPT,
            Transition::Completed { .. } => CONFIRMATION,
        };
        self.send_reply(message, reply).await;

        if let Transition::Completed { name, email } = transition {
            if let Err(e) = self.replies.send_menu(message.platform, &message.sender_id).await {
                warn!(
                    sender_id = %message.sender_id,
                    error = %e,
                    "Failed to send follow-up menu"
                );
            }

            LEADS_CAPTURED.inc();
            let lead = Lead {
                platform: message.platform,
                sender_id: message.sender_id.clone(),
                name,
                email,
            };
            if let Err(e) = self.leads.deliver(&lead).await {
                LEAD_DELIVERY_FAILURES.inc();
                error!(
                    sender_id = %lead.sender_id,
                    error = %e,
                    "Failed to deliver lead to sheet webhook"
                );
            }
        }
    }

    async fn send_reply(&self, message: &InboundMessage, text: &str) {
        match self.replies.send_text(message.platform, &message.sender_id, text).await {
            Ok(()) => {
                REPLIES_SENT.with_label_values(&[message.platform.as_str()]).inc();
            }
            Err(e) => {
                REPLIES_FAILED.with_label_values(&[message.platform.as_str()]).inc();
                error!(
                    platform = %message.platform,
                    sender_id = %message.sender_id,
                    error = %e,
                    "Failed to send reply"
                );
            }
        }
    }
}
