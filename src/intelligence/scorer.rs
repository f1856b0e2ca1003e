/// Scoring for search relevance
///
/// Five independent signals, each in [0, 1], blended with fixed weights.
/// Each signal is its own function so it can be checked on its own.

use crate::core::distance::{length_gap, levenshtein};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;

/// Weight of the exact token overlap signal
pub const EXACT_WEIGHT: f64 = 0.50;
/// Weight of the typo-tolerant token overlap signal
pub const FUZZY_WEIGHT: f64 = 0.20;
/// Weight of the substring / prefix signal
pub const SUBSTRING_WEIGHT: f64 = 0.20;
/// Weight of how often the command was used
pub const FREQUENCY_WEIGHT: f64 = 0.05;
/// Weight of how recently the command was used
pub const RECENCY_WEIGHT: f64 = 0.05;

/// Tokens this many edits apart still count as a fuzzy match
pub const FUZZY_MAX_DISTANCE: usize = 2;
/// Anything scoring below this is dropped from results
pub const MIN_SCORE: f64 = 0.05;
/// Recency falls off linearly to zero over this many days
pub const RECENCY_WINDOW_DAYS: i64 = 30;

/// The five signals for one command against one query
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SubScores {
    pub exact: f64,
    pub fuzzy: f64,
    pub substring: f64,
    pub frequency: f64,
    pub recency: f64,
}

impl SubScores {
    /// Weighted blend, rounded to 3 decimals
    pub fn combined(&self) -> f64 {
        Scorer::round_score(
            self.exact * EXACT_WEIGHT
                + self.fuzzy * FUZZY_WEIGHT
                + self.substring * SUBSTRING_WEIGHT
                + self.frequency * FREQUENCY_WEIGHT
                + self.recency * RECENCY_WEIGHT,
        )
    }
}

/// Scorer for search relevance signals
pub struct Scorer;

impl Scorer {
    /// Fraction of query tokens that appear verbatim in the command
    pub fn exact_overlap(query_tokens: &[String], command_tokens: &HashSet<&str>) -> f64 {
        if query_tokens.is_empty() {
            return 0.0;
        }

        let hits = query_tokens
            .iter()
            .filter(|q| command_tokens.contains(q.as_str()))
            .count();

        hits as f64 / query_tokens.len() as f64
    }

    /// Of the query tokens that missed exactly, the fraction that are within
    /// a couple of edits of some command token. 1.0 when nothing missed.
    pub fn fuzzy_overlap(query_tokens: &[String], command_tokens: &HashSet<&str>) -> f64 {
        let missed: Vec<&String> = query_tokens
            .iter()
            .filter(|q| !command_tokens.contains(q.as_str()))
            .collect();

        if missed.is_empty() {
            return 1.0;
        }

        let close = missed
            .iter()
            .filter(|q| {
                command_tokens.iter().any(|c| {
                    length_gap(q, c) <= FUZZY_MAX_DISTANCE
                        && levenshtein(q, c) <= FUZZY_MAX_DISTANCE
                })
            })
            .count();

        close as f64 / missed.len() as f64
    }

    /// 1.0 if the whole query sits inside the command, otherwise the fraction
    /// of query tokens that prefix (or are prefixed by) a command token
    pub fn substring_score(
        query_lower: &str,
        command_lower: &str,
        query_tokens: &[String],
        command_tokens: &HashSet<&str>,
    ) -> f64 {
        if !query_lower.is_empty() && command_lower.contains(query_lower) {
            return 1.0;
        }
        if query_tokens.is_empty() {
            return 0.0;
        }

        let hits = query_tokens
            .iter()
            .filter(|q| {
                command_tokens
                    .iter()
                    .any(|c| c.starts_with(q.as_str()) || q.starts_with(c))
            })
            .count();

        hits as f64 / query_tokens.len() as f64
    }

    /// Log-scaled usage relative to the most used command
    pub fn frequency_score(frequency: usize, max_frequency: usize) -> f64 {
        if max_frequency <= 1 {
            return 0.0;
        }

        let score = (frequency as f64).ln_1p() / (max_frequency as f64).ln_1p();
        score.clamp(0.0, 1.0)
    }

    /// Linear decay from the newest timestamp in the dataset
    pub fn recency_score(
        timestamp: Option<DateTime<Utc>>,
        newest: Option<DateTime<Utc>>,
    ) -> f64 {
        let (Some(ts), Some(newest)) = (timestamp, newest) else {
            return 0.0;
        };

        if ts >= newest {
            return 1.0;
        }

        let window = Duration::days(RECENCY_WINDOW_DAYS).num_milliseconds() as f64;
        let age = (newest - ts).num_milliseconds() as f64;

        (1.0 - age / window).max(0.0)
    }

    pub fn round_score(score: f64) -> f64 {
        (score * 1000.0).round() / 1000.0
    }
}
