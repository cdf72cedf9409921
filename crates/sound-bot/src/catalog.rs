//! Sound command catalog.
//!
//! The catalog is a startup snapshot of the asset directory. Files added
//! or removed afterwards are not picked up until restart.

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};
use telegram_client::BotCommand;
use tracing::{debug, info};

/// Supported audio extension.
const AUDIO_EXTENSION: &str = "mp3";

/// One available sound command.
#[derive(Debug, Clone)]
pub struct SoundCommand {
    /// Command name derived from the asset filename, underscore-normalized.
    pub name: String,
    /// Path of the audio asset.
    pub path: PathBuf,
    /// Title-cased label for help text.
    pub label: String,
}

/// Immutable set of sound commands discovered at startup.
pub struct SoundCatalog {
    sounds: BTreeMap<String, SoundCommand>,
}

impl SoundCatalog {
    /// Scan `asset_dir` for audio files, one command per file.
    ///
    /// An empty directory yields an empty catalog; only a missing or
    /// unreadable directory is an error.
    pub fn scan(asset_dir: impl AsRef<Path>) -> io::Result<Self> {
        let mut sounds = BTreeMap::new();

        for entry in std::fs::read_dir(asset_dir.as_ref())? {
            let entry = entry?;
            let path = entry.path();

            let is_audio = path
                .extension()
                .map(|ext| ext.eq_ignore_ascii_case(AUDIO_EXTENSION))
                .unwrap_or(false);
            if !is_audio {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                continue;
            };

            let name = command_name(stem);
            debug!("Registered sound /{} from {:?}", name, path);
            sounds.insert(
                name.clone(),
                SoundCommand {
                    label: title_case(&name),
                    name,
                    path,
                },
            );
        }

        info!(
            "Scanned {:?}: {} sound commands",
            asset_dir.as_ref(),
            sounds.len()
        );
        Ok(Self { sounds })
    }

    /// Look up a sound command by name.
    pub fn get(&self, name: &str) -> Option<&SoundCommand> {
        self.sounds.get(name)
    }

    pub fn len(&self) -> usize {
        self.sounds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sounds.is_empty()
    }

    /// Help lines for the sound commands, sorted ascending by name.
    pub fn help_lines(&self) -> Vec<String> {
        self.sounds
            .values()
            .map(|s| format!("/{} - {}", s.name, s.label))
            .collect()
    }

    /// Full command menu for `setMyCommands`: the static commands first,
    /// then every sound, sorted ascending.
    pub fn bot_commands(&self) -> Vec<BotCommand> {
        let mut commands = vec![
            BotCommand::new("start", "Start the bot"),
            BotCommand::new("help", "Show available commands"),
            BotCommand::new("stats", "Show command usage statistics"),
        ];
        commands.extend(
            self.sounds
                .values()
                .map(|s| BotCommand::new(s.name.clone(), format!("{} sound", s.label))),
        );
        commands
    }
}

/// Normalize a file stem into a command token.
fn command_name(stem: &str) -> String {
    stem.replace('-', "_")
}

/// "running_off" -> "Running Off".
fn title_case(name: &str) -> String {
    name.split('_')
        .filter(|w| !w.is_empty())
        .map(|w| {
            let mut chars = w.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}
