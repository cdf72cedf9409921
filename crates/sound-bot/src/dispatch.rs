//! Command dispatch.
//!
//! Maps inbound updates onto handlers. Unknown commands and messages
//! addressed to other bots are dropped without any side effect.

use crate::auth::AuthGate;
use crate::catalog::{SoundCatalog, SoundCommand};
use crate::commands::sound::{self, PlayError};
use crate::commands::{help, start, stats};
use crate::error::AppResult;
use std::sync::Arc;
use telegram_client::{Message, TelegramClient, Update};
use tracing::{debug, error, warn};
use usage_store::UsageStore;

const REPLY_UNEXPECTED: &str = "Sorry, something went wrong.";
const REPLY_STATS_DENIED: &str = "Sorry, you are not allowed to view stats.";

/// Command token extracted from message text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandToken {
    /// Command name without the leading slash or bot suffix.
    pub command: String,
    /// Explicit "@botname" addressing suffix, if present.
    pub bot_suffix: Option<String>,
}

impl CommandToken {
    /// Parse the leading slash-command of a message, if there is one.
    pub fn parse(text: &str) -> Option<Self> {
        let token = text.split_whitespace().next()?;
        let rest = token.strip_prefix('/')?;

        let (command, bot_suffix) = match rest.split_once('@') {
            Some((command, suffix)) => (command, Some(suffix.to_string())),
            None => (rest, None),
        };

        if command.is_empty() {
            return None;
        }

        Some(Self {
            command: command.to_string(),
            bot_suffix,
        })
    }

    /// In group chats shared with other bots an explicit suffix must name
    /// us; without a suffix every bot is addressed.
    pub fn is_addressed_to(&self, bot_username: &str) -> bool {
        match &self.bot_suffix {
            Some(suffix) => suffix.eq_ignore_ascii_case(bot_username),
            None => true,
        }
    }
}

enum Route<'a> {
    Start,
    Help,
    Stats,
    Sound(&'a SoundCommand),
}

/// Routes inbound updates to command handlers.
pub struct Dispatcher {
    client: TelegramClient,
    store: UsageStore,
    catalog: Arc<SoundCatalog>,
    auth: AuthGate,
    bot_username: String,
    help_text: String,
}

impl Dispatcher {
    pub fn new(
        client: TelegramClient,
        store: UsageStore,
        catalog: Arc<SoundCatalog>,
        auth: AuthGate,
        bot_username: impl Into<String>,
    ) -> Self {
        let help_text = help::build_help(&catalog);
        Self {
            client,
            store,
            catalog,
            auth,
            bot_username: bot_username.into(),
            help_text,
        }
    }

    /// Handle one inbound update. Faults never escape: anything the
    /// handlers don't classify is logged and answered with a generic
    /// message.
    pub async fn handle_update(&self, update: &Update) {
        let Some(message) = update.message.as_ref() else {
            return;
        };
        let Some(text) = message.text.as_deref() else {
            return;
        };
        let Some(token) = CommandToken::parse(text) else {
            return;
        };

        if !token.is_addressed_to(&self.bot_username) {
            debug!(
                "Ignoring /{} addressed to @{}",
                token.command,
                token.bot_suffix.as_deref().unwrap_or("")
            );
            return;
        }

        let Some(route) = self.route(&token.command) else {
            debug!("Ignoring unknown command /{}", token.command);
            return;
        };

        // Usage is recorded before the handler runs, so a failed play
        // still counts as an invocation. Tracking is best-effort.
        if let Err(e) = self.store.increment(&token.command).await {
            warn!("Failed to record usage for /{}: {}", token.command, e);
        }

        if let Err(e) = self.run(route, message).await {
            error!("Handler error for /{}: {}", token.command, e);
            let _ = self.client.reply(message, REPLY_UNEXPECTED).await;
        }
    }

    fn route(&self, command: &str) -> Option<Route<'_>> {
        match command {
            "start" => Some(Route::Start),
            "help" => Some(Route::Help),
            "stats" => Some(Route::Stats),
            _ => self.catalog.get(command).map(Route::Sound),
        }
    }

    async fn run(&self, route: Route<'_>, message: &Message) -> AppResult<()> {
        match route {
            Route::Start => {
                self.client.reply(message, start::WELCOME).await?;
            }
            Route::Help => {
                self.client.reply(message, &self.help_text).await?;
            }
            Route::Stats => {
                let authorized = message
                    .sender_id()
                    .map(|id| self.auth.is_authorized(id))
                    .unwrap_or(false);
                if !authorized {
                    self.client.reply(message, REPLY_STATS_DENIED).await?;
                    return Ok(());
                }

                let records = self.store.list_all().await?;
                self.client
                    .reply(message, &stats::format_stats(&records))
                    .await?;
            }
            Route::Sound(sound_cmd) => {
                match sound::play(&self.client, message, sound_cmd).await {
                    Ok(()) => {}
                    Err(PlayError::Sound(e)) => {
                        warn!("Sound /{} failed: {}", sound_cmd.name, e);
                        self.client.reply(message, e.user_reply()).await?;
                    }
                    Err(PlayError::Unexpected(e)) => return Err(e.into()),
                }
            }
        }
        Ok(())
    }
}
