/// Main analyzer orchestrator
///
/// Holds a validated config and runs pattern mining or search over a
/// loaded history.

use crate::config::Config;
use crate::core::Searcher;
use crate::error::Result;
use crate::intelligence::PatternDetector;
use crate::models::{CommandPattern, HistoryEntry, SearchResult};
use serde::Serialize;

/// Main analyzer
pub struct Analyzer {
    pattern_detector: PatternDetector,
    searcher: Searcher,
}

impl Analyzer {
    /// Create a new analyzer. Fails if the config doesn't validate.
    pub fn new(config: &Config) -> Result<Self> {
        config.validate()?;

        Ok(Self {
            pattern_detector: PatternDetector::new(config.mining.clone())?,
            searcher: Searcher::new(config.search.clone())?,
        })
    }

    /// Run pattern mining over the whole history
    pub fn analyze(&self, entries: &[HistoryEntry]) -> AnalysisReport {
        let patterns = self.pattern_detector.detect_patterns(entries);

        AnalysisReport {
            entries_scanned: entries.len(),
            patterns_found: patterns.len(),
            sequences_found: patterns.iter().filter(|p| p.is_sequence()).count(),
            patterns,
        }
    }

    /// Find the past commands that best match `query`
    pub fn search(&self, entries: &[HistoryEntry], query: &str) -> Vec<SearchResult> {
        self.searcher.search(entries, query)
    }
}

/// Analysis report
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisReport {
    pub entries_scanned: usize,
    pub patterns_found: usize,
    pub sequences_found: usize,
    pub patterns: Vec<CommandPattern>,
}
