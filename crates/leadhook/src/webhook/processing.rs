use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::info;

use crate::{engine::Engine, types::InboundMessage};

/// Background task to process queued inbound messages
pub async fn process_queue_loop(mut rx: mpsc::Receiver<InboundMessage>, engine: Arc<Engine>) {
    while let Some(message) = rx.recv().await {
        engine.handle(&message).await;
    }
    info!("Event queue closed, processing loop stopped");
}
