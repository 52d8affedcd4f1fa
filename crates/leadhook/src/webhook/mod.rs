// Public exports
pub mod server;
pub use server::start_webhook_server;

pub mod payload;
pub use payload::extract_messages;

// Internal modules
mod handlers;
mod processing;
mod state;
