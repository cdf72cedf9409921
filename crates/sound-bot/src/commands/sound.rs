//! Audio reply handler.
//!
//! Resolves the asset, sends it, then deletes the triggering command
//! message to keep the chat tidy. Deletion failures never undo or block
//! the send.

use crate::catalog::SoundCommand;
use std::io;
use std::path::PathBuf;
use telegram_client::{Message, TelegramClient, TelegramError};
use thiserror::Error;
use tracing::{debug, warn};

/// Distinguishable failure kinds of one sound invocation.
#[derive(Error, Debug)]
pub enum SoundError {
    #[error("sound asset missing: {0}")]
    MissingAsset(PathBuf),

    #[error("failed to read sound asset {path:?}: {source}")]
    ReadFault {
        path: PathBuf,
        source: io::Error,
    },

    #[error("send failed: {0}")]
    SendFault(TelegramError),

    #[error("missing rights to delete trigger message: {0}")]
    DeleteForbidden(TelegramError),
}

impl SoundError {
    /// User-facing reply for this failure.
    pub fn user_reply(&self) -> &'static str {
        match self {
            SoundError::MissingAsset(_) => "Sorry, this sound file is missing 😢",
            SoundError::ReadFault { .. } => "Sorry, there was an error playing this sound 😕",
            SoundError::SendFault(_) => "Sorry, something went wrong.",
            SoundError::DeleteForbidden(_) => {
                "I couldn't clean up the command message - please grant me admin rights."
            }
        }
    }
}

/// Play one sound in response to `message`.
///
/// If the triggering message is itself a reply, the sound goes out as a
/// voice note linked to that earlier message (delivered even if the
/// target is gone); otherwise it is sent as plain audio. A
/// `DeleteForbidden` error means the audio was already delivered.
/// Non-permission deletion faults bubble up as `TelegramError`.
pub async fn play(
    client: &TelegramClient,
    message: &Message,
    sound: &SoundCommand,
) -> Result<(), PlayError> {
    let bytes = match tokio::fs::read(&sound.path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(SoundError::MissingAsset(sound.path.clone()).into());
        }
        Err(e) => {
            return Err(SoundError::ReadFault {
                path: sound.path.clone(),
                source: e,
            }
            .into());
        }
    };

    let filename = sound
        .path
        .file_name()
        .and_then(|n| n.to_str())
        .map(str::to_string)
        .unwrap_or_else(|| format!("{}.mp3", sound.name));

    let sent = match message.reply_target_id() {
        Some(target) => {
            client
                .send_voice(message.chat.id, &filename, bytes, Some(target))
                .await
        }
        None => client.send_audio(message.chat.id, &filename, bytes).await,
    }
    .map_err(SoundError::SendFault)?;

    debug!(
        "Delivered /{} as message {} in chat {}",
        sound.name, sent.message_id, message.chat.id
    );

    match client
        .delete_message(message.chat.id, message.message_id)
        .await
    {
        Ok(()) => Ok(()),
        Err(e) if e.is_permission_denied() => {
            warn!("Cannot delete trigger message in chat {}: {}", message.chat.id, e);
            Err(SoundError::DeleteForbidden(e).into())
        }
        Err(e) => Err(PlayError::Unexpected(e)),
    }
}

/// Outcome of a play attempt: either a classified sound failure with a
/// canned user reply, or an unexpected fault for the outer boundary.
#[derive(Error, Debug)]
pub enum PlayError {
    #[error(transparent)]
    Sound(#[from] SoundError),

    #[error(transparent)]
    Unexpected(TelegramError),
}
