use std::sync::Arc;

use tokio::sync::mpsc;

use crate::{config::AppConfig, types::InboundMessage};

/// Application state shared across webhook handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub event_sender: mpsc::Sender<InboundMessage>,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, event_sender: mpsc::Sender<InboundMessage>) -> Self {
        Self { config, event_sender }
    }
}
