//! Update receiver with long polling.

use crate::client::TelegramClient;
use crate::types::Update;
use std::time::Duration;
use tokio::time::sleep;
use tokio_stream::Stream;
use tracing::{debug, error};

/// Update receiver that long-polls `getUpdates`.
///
/// Used in development mode; production deployments receive updates over
/// the webhook instead.
pub struct UpdateReceiver {
    client: TelegramClient,
    poll_timeout: Duration,
}

impl UpdateReceiver {
    /// Create a new update receiver.
    pub fn new(client: TelegramClient, poll_timeout: Duration) -> Self {
        Self {
            client,
            poll_timeout,
        }
    }

    /// Start receiving updates as an async stream.
    pub fn stream(self) -> impl Stream<Item = Update> {
        async_stream::stream! {
            let mut offset: Option<i64> = None;

            loop {
                match self.client.get_updates(offset, self.poll_timeout).await {
                    Ok(updates) => {
                        for update in updates {
                            offset = Some(update.update_id + 1);
                            debug!("Received update {}", update.update_id);
                            yield update;
                        }
                    }
                    Err(e) => {
                        error!("Poll error: {}", e);
                        // Back off on error
                        sleep(Duration::from_secs(5)).await;
                    }
                }
            }
        }
    }
}
