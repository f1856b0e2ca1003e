/// Data models shared by the mining and search engines
///
/// Plain serializable data. Nothing in here holds state or handles.

use crate::error::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Separator used when a run of commands is folded into one sequence key
pub const SEQUENCE_SEPARATOR: &str = " && ";

/// One parsed command from the history file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub command: String,
    pub timestamp: Option<DateTime<Utc>>,
    pub line_number: usize, // 1-based, within the windowed history
}

impl HistoryEntry {
    pub fn new(command: impl Into<String>, line_number: usize) -> Self {
        Self {
            command: command.into(),
            timestamp: None,
            line_number,
        }
    }

    pub fn with_timestamp(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }
}

/// A repeated command (or command sequence) worth automating
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CommandPattern {
    pub pattern: String,
    pub frequency: usize,
    pub last_used: Option<DateTime<Utc>>,
    pub variations: Vec<String>, // near-duplicates folded into this one
}

impl CommandPattern {
    /// True when the pattern is a joined run of commands rather than one command
    pub fn is_sequence(&self) -> bool {
        self.pattern.contains(SEQUENCE_SEPARATOR)
    }

    /// Split a sequence pattern back into its steps
    pub fn steps(&self) -> Vec<&str> {
        self.pattern.split(SEQUENCE_SEPARATOR).collect()
    }
}

/// One ranked search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchResult {
    pub command: String,
    pub score: f64, // [0, 1], 3 decimals
    pub frequency: usize,
    pub line_number: usize, // most recent position
    pub last_used: Option<DateTime<Utc>>,
}

/// Pretty JSON for anything the CLI prints with --json
pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}
