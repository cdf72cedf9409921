//! Telegram client errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TelegramError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("API error {code:?}: {description}")]
    Api {
        code: Option<i64>,
        description: String,
    },
}

impl TelegramError {
    /// Whether the platform rejected the call because the bot lacks the
    /// required chat permission (e.g. deleting another user's message
    /// without admin rights).
    pub fn is_permission_denied(&self) -> bool {
        match self {
            TelegramError::Api { code, description } => {
                let desc = description.to_ascii_lowercase();
                matches!(code, Some(400) | Some(403))
                    && (desc.contains("not enough rights")
                        || desc.contains("can't be deleted"))
            }
            _ => false,
        }
    }
}
