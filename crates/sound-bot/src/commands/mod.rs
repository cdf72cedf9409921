//! Bot command handlers.

pub mod help;
pub mod sound;
pub mod start;
pub mod stats;

pub use sound::SoundError;
