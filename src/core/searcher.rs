/// Command searcher with weighted relevance scoring
///
/// Finds the past commands that best match a free-text query. Each unique
/// command is scored on its own (in parallel), then ranked.

use crate::config::SearchOptions;
use crate::core::tokenizer::tokenize;
use crate::error::Result;
use crate::intelligence::scorer::{Scorer, SubScores, MIN_SCORE};
use crate::models::{HistoryEntry, SearchResult};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

// Everything we know about one distinct command string
#[derive(Debug)]
struct CommandStats {
    frequency: usize,
    last_used: Option<DateTime<Utc>>,
    line_number: usize,
}

/// Handles ranked command search
pub struct Searcher {
    options: SearchOptions,
}

impl Searcher {
    /// Create a new searcher instance
    pub fn new(options: SearchOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    /// Search history for the commands most relevant to `query`
    ///
    /// # Arguments
    /// * `entries` - Parsed history, oldest first
    /// * `query` - Free text, tokenized the same way commands are
    ///
    /// # Returns
    /// * Up to `max_results` hits, best first. Empty for a blank or
    ///   punctuation-only query.
    pub fn search(&self, entries: &[HistoryEntry], query: &str) -> Vec<SearchResult> {
        let query_tokens = tokenize(query);
        if query_tokens.is_empty() || entries.is_empty() {
            tracing::debug!("nothing to search (query tokens or entries empty)");
            return Vec::new();
        }

        let stats = Self::aggregate(entries);
        let max_frequency = stats.values().map(|s| s.frequency).max().unwrap_or(0);
        let newest = stats.values().filter_map(|s| s.last_used).max();
        let query_lower = query.trim().to_lowercase();

        let mut results: Vec<SearchResult> = stats
            .par_iter()
            .filter_map(|(command, stat)| {
                let scores = Self::score_command(
                    command,
                    stat,
                    &query_lower,
                    &query_tokens,
                    max_frequency,
                    newest,
                );
                let score = scores.combined();

                (score >= MIN_SCORE).then(|| SearchResult {
                    command: command.to_string(),
                    score,
                    frequency: stat.frequency,
                    line_number: stat.line_number,
                    last_used: stat.last_used,
                })
            })
            .collect();

        // Parallel collection order is arbitrary; the sort fully decides it
        results.sort_by(Self::rank);
        results.truncate(self.options.max_results);

        tracing::debug!(
            distinct = stats.len(),
            returned = results.len(),
            "search finished"
        );

        results
    }

    /// Fold duplicate command strings together
    fn aggregate(entries: &[HistoryEntry]) -> HashMap<&str, CommandStats> {
        let mut stats: HashMap<&str, CommandStats> = HashMap::new();

        for entry in entries {
            let stat = stats.entry(entry.command.as_str()).or_insert(CommandStats {
                frequency: 0,
                last_used: None,
                line_number: 0,
            });

            stat.frequency += 1;
            stat.line_number = stat.line_number.max(entry.line_number);
            stat.last_used = stat.last_used.max(entry.timestamp);
        }

        stats
    }

    fn score_command(
        command: &str,
        stat: &CommandStats,
        query_lower: &str,
        query_tokens: &[String],
        max_frequency: usize,
        newest: Option<DateTime<Utc>>,
    ) -> SubScores {
        let command_tokens = tokenize(command);
        let token_set: HashSet<&str> = command_tokens.iter().map(String::as_str).collect();
        let command_lower = command.to_lowercase();

        SubScores {
            exact: Scorer::exact_overlap(query_tokens, &token_set),
            fuzzy: Scorer::fuzzy_overlap(query_tokens, &token_set),
            substring: Scorer::substring_score(
                query_lower,
                &command_lower,
                query_tokens,
                &token_set,
            ),
            frequency: Scorer::frequency_score(stat.frequency, max_frequency),
            recency: Scorer::recency_score(stat.last_used, newest),
        }
    }

    // score desc, then frequency desc, then command text for stability
    fn rank(a: &SearchResult, b: &SearchResult) -> Ordering {
        b.score
            .partial_cmp(&a.score)
            .unwrap_or(Ordering::Equal)
            .then_with(|| b.frequency.cmp(&a.frequency))
            .then_with(|| a.command.cmp(&b.command))
    }
}

/// Search with just a result cap
pub fn search_history(
    entries: &[HistoryEntry],
    query: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>> {
    let searcher = Searcher::new(SearchOptions { max_results })?;
    Ok(searcher.search(entries, query))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MineError;
    use chrono::{Duration, TimeZone};

    fn entries(commands: &[&str]) -> Vec<HistoryEntry> {
        commands
            .iter()
            .enumerate()
            .map(|(i, cmd)| HistoryEntry::new(*cmd, i + 1))
            .collect()
    }

    fn setup() -> Vec<HistoryEntry> {
        entries(&[
            "npm install",
            "npm test",
            "cargo build",
            "git commit -m fix",
            "npm test",
            "git status",
            "cargo build --release",
            "npm test",
        ])
    }

    #[test]
    fn test_ranked_search() {
        let results = search_history(&setup(), "npm", 10).unwrap();

        assert!(results.len() >= 2);
        assert_eq!(results[0].command, "npm test");
        assert_eq!(results[0].frequency, 3);
        assert_eq!(results[0].line_number, 8);
        assert_eq!(results[1].command, "npm install");
    }

    #[test]
    fn test_typo_still_finds() {
        // "nmp" is two edits from "npm"
        let results = search_history(&setup(), "nmp", 10).unwrap();
        assert!(!results.is_empty());
        assert!(results[0].command.starts_with("npm"));
    }

    #[test]
    fn test_blank_query_returns_nothing() {
        assert!(search_history(&setup(), "", 10).unwrap().is_empty());
        assert!(search_history(&setup(), "   ", 10).unwrap().is_empty());
        assert!(search_history(&setup(), "-- | &&", 10).unwrap().is_empty());
    }

    #[test]
    fn test_empty_history_returns_nothing() {
        assert!(search_history(&[], "git", 10).unwrap().is_empty());
    }

    #[test]
    fn test_results_are_deduplicated() {
        let results = search_history(&setup(), "npm test", 10).unwrap();
        let unique: HashSet<&str> = results.iter().map(|r| r.command.as_str()).collect();
        assert_eq!(unique.len(), results.len());
    }

    #[test]
    fn test_unrelated_commands_are_dropped() {
        let results = search_history(&entries(&["ls", "pwd"]), "kubernetes", 10).unwrap();
        assert!(results.is_empty());
    }

    #[test]
    fn test_full_query_substring_beats_partial() {
        let results = search_history(&setup(), "cargo build --release", 10).unwrap();
        assert_eq!(results[0].command, "cargo build --release");
        assert_eq!(results[0].score, 0.925);
    }

    #[test]
    fn test_recent_wins_tie() {
        let newest = Utc.with_ymd_and_hms(2025, 11, 30, 9, 0, 0).unwrap();
        let history = vec![
            HistoryEntry::new("make deploy-staging", 1).with_timestamp(newest - Duration::days(20)),
            HistoryEntry::new("make deploy-prod", 2).with_timestamp(newest),
        ];

        let results = search_history(&history, "make deploy", 10).unwrap();
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].command, "make deploy-prod");
        assert!(results[0].score > results[1].score);
        assert_eq!(results[0].last_used, Some(newest));
    }

    #[test]
    fn test_max_results_caps_output() {
        let results = search_history(&setup(), "n", 1).unwrap();
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn test_zero_max_results_rejected() {
        assert!(matches!(
            search_history(&setup(), "npm", 0),
            Err(MineError::Config(_))
        ));
    }
}
