/// berri-mine library
///
/// Mines shell history for repeated commands and sequences, and ranks
/// past commands against a free-text query. All local, all in memory.

pub mod config;
pub mod core;
pub mod error;
pub mod intelligence;
pub mod models;

// Re-exports for convenience
pub use config::{Config, MiningOptions, SearchOptions};
pub use crate::core::search_history;
pub use error::{MineError, Result};
pub use intelligence::analyze_patterns;
pub use models::{to_json, CommandPattern, HistoryEntry, SearchResult};
