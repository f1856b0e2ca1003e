// Loads a shell history file into entries the engines can chew on
//
// Deliberately dumb: plain one-command-per-line files plus zsh's
// extended format (": 1700000000:0;git status"). Anything fancier
// belongs to a real history parser.

use crate::error::{MineError, Result};
use crate::models::HistoryEntry;
use chrono::{DateTime, Utc};
use regex::Regex;
use std::path::Path;
use std::sync::LazyLock;

// Lines this long are pasted blobs, not commands
const MAX_COMMAND_LENGTH: usize = 10_000;

// ": <epoch>:<duration>;<command>"
static ZSH_EXTENDED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^: *(\d+):\d+;(.*)$").expect("zsh extended history regex is valid")
});

/// Parse history text, keeping only the last `window` usable commands.
///
/// - Trims and collapses internal whitespace
/// - Drops blank lines, `#` comment lines and oversized lines
/// - Collapses consecutive duplicates
/// - Numbers the surviving entries from 1
pub fn parse_history(text: &str, window: usize) -> Vec<HistoryEntry> {
    let mut parsed: Vec<(String, Option<DateTime<Utc>>)> = Vec::new();

    for line in text.lines() {
        let (raw, timestamp) = split_line(line);
        let command = sanitize_command(raw);

        if command.is_empty() || command.starts_with('#') || command.len() > MAX_COMMAND_LENGTH {
            continue;
        }

        // Same as the previous line: keep the newer timestamp, drop the repeat
        if let Some(previous) = parsed.last_mut() {
            if previous.0 == command {
                previous.1 = previous.1.max(timestamp);
                continue;
            }
        }

        parsed.push((command, timestamp));
    }

    let skip = parsed.len().saturating_sub(window);

    parsed
        .into_iter()
        .skip(skip)
        .enumerate()
        .map(|(i, (command, timestamp))| HistoryEntry {
            command,
            timestamp,
            line_number: i + 1,
        })
        .collect()
}

/// Read and parse a history file
pub async fn load_history_file(path: &Path, window: usize) -> Result<Vec<HistoryEntry>> {
    let bytes = tokio::fs::read(path).await?;
    // Shell histories aren't always valid UTF-8 (zsh metafies some bytes)
    let text = String::from_utf8_lossy(&bytes);

    let entries = parse_history(&text, window);
    if entries.is_empty() {
        return Err(MineError::EmptyHistory(path.display().to_string()));
    }

    tracing::info!(
        path = %path.display(),
        entries = entries.len(),
        "loaded history"
    );

    Ok(entries)
}

fn split_line(line: &str) -> (&str, Option<DateTime<Utc>>) {
    match ZSH_EXTENDED.captures(line) {
        Some(caps) => {
            let timestamp = caps
                .get(1)
                .and_then(|m| m.as_str().parse::<i64>().ok())
                .and_then(|secs| DateTime::from_timestamp(secs, 0));
            let command = caps.get(2).map_or("", |m| m.as_str());
            (command, timestamp)
        }
        None => (line, None),
    }
}

/// - Removes null bytes
/// - Normalizes whitespace (runs of spaces to one)
fn sanitize_command(command: &str) -> String {
    command
        .replace('\0', "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
