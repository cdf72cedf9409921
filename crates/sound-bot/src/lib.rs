//! Telegram soundboard bot.
//!
//! Answers slash commands with pre-recorded audio clips, tracks command
//! usage in a durable store, and exposes operational metrics over HTTP.

pub mod auth;
pub mod catalog;
pub mod commands;
pub mod config;
pub mod dispatch;
pub mod error;
pub mod metrics;
pub mod server;

pub use auth::AuthGate;
pub use catalog::SoundCatalog;
pub use config::Config;
pub use dispatch::Dispatcher;
pub use error::{AppError, AppResult};
pub use metrics::{Metrics, MetricsSnapshot};
