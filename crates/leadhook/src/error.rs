use thiserror::Error;

#[derive(Error, Debug)]
pub enum LeadhookError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Send API returned status {status} for recipient {recipient_id}")]
    SendRejected { status: u16, recipient_id: String },

    #[error("Sheet webhook returned status {0}")]
    SheetRejected(u16),

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, LeadhookError>;
