use std::{
    collections::HashMap,
    sync::Arc,
    time::{Duration, Instant},
};

use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::metrics::SESSIONS_EXPIRED;

/// Conversation stage for a single sender.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    AwaitingName,
    AwaitingEmail,
    Done,
}

/// Per-sender conversation progress with an inactivity deadline.
#[derive(Debug, Clone)]
pub struct Session {
    pub stage: Stage,
    pub name: Option<String>,
    pub email: Option<String>,
    pub last_activity: Instant,
}

impl Session {
    fn new() -> Self {
        Self { stage: Stage::AwaitingName, name: None, email: None, last_activity: Instant::now() }
    }

    fn is_expired(&self, ttl: Duration) -> bool {
        self.last_activity.elapsed() >= ttl
    }
}

/// Result of consuming one inbound message against a sender's session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transition {
    /// Name accepted, now waiting for the email
    NameCaptured { name: String },
    /// Empty name input, stage unchanged
    NameRejected,
    /// Email accepted, session complete and removed
    Completed { name: String, email: String },
    /// Input without an `@`, stage unchanged
    EmailRejected,
}

/// In-memory session map with TTL expiry.
///
/// A single lock guards every read-modify-write, so two rapid messages from
/// the same sender serialize instead of interleaving mid-transition.
pub struct SessionStore {
    sessions: Mutex<HashMap<String, Session>>,
    ttl: Duration,
}

impl SessionStore {
    pub fn new(ttl: Duration) -> Self {
        Self { sessions: Mutex::new(HashMap::new()), ttl }
    }

    /// Snapshot of the sender's session, creating a fresh one if absent.
    /// An entry past its TTL counts as absent.
    pub async fn get_or_create(&self, sender_id: &str) -> Session {
        let mut sessions = self.sessions.lock().await;
        Self::live_entry(&mut sessions, sender_id, self.ttl).clone()
    }

    /// Consume one inbound message for this sender.
    ///
    /// The lock is held across the whole transition. Completed sessions are
    /// removed before returning, so the sender's next message starts a new
    /// conversation.
    pub async fn advance(&self, sender_id: &str, text: &str) -> Transition {
        let mut sessions = self.sessions.lock().await;
        let session = Self::live_entry(&mut sessions, sender_id, self.ttl);
        session.last_activity = Instant::now();

        match session.stage {
            Stage::AwaitingName => {
                let name = text.trim();
                if name.is_empty() {
                    return Transition::NameRejected;
                }
                session.name = Some(name.to_string());
                session.stage = Stage::AwaitingEmail;
                Transition::NameCaptured { name: name.to_string() }
            }
            Stage::AwaitingEmail => {
                let email = text.trim();
                if !email.contains('@') {
                    return Transition::EmailRejected;
                }
                session.email = Some(email.to_string());
                session.stage = Stage::Done;
                let name = session.name.clone().unwrap_or_default();
                sessions.remove(sender_id);
                Transition::Completed { name, email: email.to_string() }
            }
            Stage::Done => {
                // Completion removes the entry in the same critical section
                // that sets Done, so inbound messages only ever observe the
                // two collecting stages. Restart if an entry slips through.
                *session = Session::new();
                Transition::NameRejected
            }
        }
    }

    /// Remove sessions idle longer than the TTL. Returns how many were
    /// removed.
    pub async fn sweep(&self) -> usize {
        let mut sessions = self.sessions.lock().await;
        let initial_count = sessions.len();
        let ttl = self.ttl;

        sessions.retain(|sender_id, session| {
            if session.is_expired(ttl) {
                debug!(sender_id, "Sweeping expired session");
                false
            } else {
                true
            }
        });

        let removed = initial_count - sessions.len();
        if removed > 0 {
            SESSIONS_EXPIRED.inc_by(removed as u64);
            info!(removed, "Swept expired sessions");
        }
        removed
    }

    /// Number of live sessions.
    pub async fn len(&self) -> usize {
        self.sessions.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.lock().await.is_empty()
    }

    fn live_entry<'a>(
        sessions: &'a mut HashMap<String, Session>,
        sender_id: &str,
        ttl: Duration,
    ) -> &'a mut Session {
        let stale = sessions.get(sender_id).is_some_and(|s| s.is_expired(ttl));
        if stale {
            debug!(sender_id, "Replacing expired session");
            sessions.remove(sender_id);
        }
        sessions.entry(sender_id.to_string()).or_insert_with(Session::new)
    }
}

/// Background task that sweeps the store on a fixed interval.
pub async fn sweep_loop(store: Arc<SessionStore>, interval: Duration) {
    loop {
        store.sweep().await;
        tokio::time::sleep(interval).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with_ttl(ttl: Duration) -> SessionStore {
        SessionStore::new(ttl)
    }

    #[tokio::test]
    async fn fresh_session_starts_awaiting_name() {
        let store = store_with_ttl(Duration::from_secs(600));
        let session = store.get_or_create("ig:123").await;

        assert_eq!(session.stage, Stage::AwaitingName);
        assert!(session.name.is_none());
        assert!(session.email.is_none());
    }

    #[tokio::test]
    async fn name_advances_and_is_stored_verbatim() {
        let store = store_with_ttl(Duration::from_secs(600));

        let transition = store.advance("ig:123", "Sara").await;
        assert_eq!(transition, Transition::NameCaptured { name: "Sara".to_string() });

        let session = store.get_or_create("ig:123").await;
        assert_eq!(session.stage, Stage::AwaitingEmail);
        assert_eq!(session.name.as_deref(), Some("Sara"));
    }

    #[tokio::test]
    async fn empty_name_does_not_advance() {
        let store = store_with_ttl(Duration::from_secs(600));

        assert_eq!(store.advance("ig:123", "   ").await, Transition::NameRejected);

        let session = store.get_or_create("ig:123").await;
        assert_eq!(session.stage, Stage::AwaitingName);
        assert!(session.name.is_none());
    }

    #[tokio::test]
    async fn email_without_at_leaves_stage_unchanged() {
        let store = store_with_ttl(Duration::from_secs(600));
        store.advance("ig:123", "Sara").await;

        assert_eq!(store.advance("ig:123", "not-an-email").await, Transition::EmailRejected);

        let session = store.get_or_create("ig:123").await;
        assert_eq!(session.stage, Stage::AwaitingEmail);
        assert!(session.email.is_none());
    }

    #[tokio::test]
    async fn email_completes_and_removes_session() {
        let store = store_with_ttl(Duration::from_secs(600));
        store.advance("ig:123", "Sara").await;

        let transition = store.advance("ig:123", "sara@example.com").await;
        assert_eq!(
            transition,
            Transition::Completed {
                name: "Sara".to_string(),
                email: "sara@example.com".to_string()
            }
        );

        // Session removed on completion, so the next message starts over
        assert!(store.is_empty().await);
        let session = store.get_or_create("ig:123").await;
        assert_eq!(session.stage, Stage::AwaitingName);
    }

    #[tokio::test]
    async fn expired_session_is_swept() {
        let store = store_with_ttl(Duration::from_millis(50));
        store.advance("ig:123", "Sara").await;
        assert_eq!(store.len().await, 1);

        tokio::time::sleep(Duration::from_millis(80)).await;
        assert_eq!(store.sweep().await, 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn sweep_keeps_active_sessions() {
        let store = store_with_ttl(Duration::from_millis(100));
        store.advance("ig:old", "Sara").await;

        tokio::time::sleep(Duration::from_millis(130)).await;
        store.advance("ig:new", "Nora").await;

        assert_eq!(store.sweep().await, 1);
        assert_eq!(store.len().await, 1);
        let session = store.get_or_create("ig:new").await;
        assert_eq!(session.stage, Stage::AwaitingEmail);
    }

    #[tokio::test]
    async fn stale_sender_restarts_at_name_on_next_message() {
        let store = store_with_ttl(Duration::from_millis(50));
        store.advance("ig:123", "Sara").await;

        tokio::time::sleep(Duration::from_millis(80)).await;

        // No sweep ran, but the entry is past its TTL. The next message is
        // consumed as a name for a fresh conversation, not as an email.
        let transition = store.advance("ig:123", "Bob").await;
        assert_eq!(transition, Transition::NameCaptured { name: "Bob".to_string() });
    }
}
