//! Stats command - formats usage counters for chat.

/// Render the usage records (already sorted most-used first).
pub fn format_stats(records: &[(String, i64)]) -> String {
    if records.is_empty() {
        return "No commands have been used yet.".into();
    }

    let mut text = String::from("Command usage:\n");
    for (command, count) in records {
        text.push_str(&format!("/{}: {}\n", command, count));
    }
    text.trim_end().to_string()
}
