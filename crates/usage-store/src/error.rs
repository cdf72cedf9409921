//! Usage store errors.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum UsageError {
    #[error("Storage error: {0}")]
    Storage(#[from] rusqlite::Error),
}
