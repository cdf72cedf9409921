//! Help command - lists available commands.

use crate::catalog::SoundCatalog;

/// Build the full help text from the catalog snapshot.
pub fn build_help(catalog: &SoundCatalog) -> String {
    let mut text = String::from(
        "Available commands:\n\n\
         /start - Start the bot\n\
         /help - Show this help message\n\
         /stats - Show command usage statistics\n",
    );

    let lines = catalog.help_lines();
    if !lines.is_empty() {
        text.push_str("\nSound commands:\n");
        for line in lines {
            text.push_str(&line);
            text.push('\n');
        }
    }

    text.trim_end().to_string()
}
