// Finds patterns in your command history
//
// Like when you always run "git add ." then "git commit" then "git push",
// or when you type "docker ps" and "docker ps -a" forty times a day.
//
// Three layers get counted into one table: single commands, runs of
// commands (sliding windows), and then near-duplicates get folded together.
// The same physical line counts once on its own and again inside every
// window that covers it. That layering is intentional.

use crate::config::MiningOptions;
use crate::core::distance::levenshtein_within;
use crate::error::Result;
use crate::models::{CommandPattern, HistoryEntry, SEQUENCE_SEPARATOR};
use chrono::{DateTime, Utc};
use rayon::prelude::*;
use std::cmp::Ordering;
use std::collections::{BTreeMap, HashMap};

// Scans shorter than this stay on the current thread
const PARALLEL_SCAN_MIN: usize = 512;

// Chars are binned by their low five bits for the cheap profile check
const PROFILE_BINS: usize = 32;

// One counted key: a raw command or a joined sequence
#[derive(Debug, Clone)]
struct KeyCount {
    key: String,
    count: usize,
    last_used: Option<DateTime<Utc>>,
}

// Key -> count table that remembers first-seen order, so ties while
// clustering always resolve the same way
#[derive(Debug, Default)]
struct CountTable {
    index: HashMap<String, usize>,
    keys: Vec<KeyCount>,
}

impl CountTable {
    fn record(&mut self, key: String, timestamp: Option<DateTime<Utc>>) {
        match self.index.get(&key) {
            Some(&i) => {
                let slot = &mut self.keys[i];
                slot.count += 1;
                slot.last_used = slot.last_used.max(timestamp);
            }
            None => {
                self.index.insert(key.clone(), self.keys.len());
                self.keys.push(KeyCount {
                    key,
                    count: 1,
                    last_used: timestamp,
                });
            }
        }
    }

    fn len(&self) -> usize {
        self.keys.len()
    }
}

// A key split into chars once, plus a per-bin char count. The bin-count
// difference never exceeds the edit distance, so it rejects most pairs
// before any distance table is built.
#[derive(Debug)]
struct PreparedKey {
    chars: Vec<char>,
    profile: [u32; PROFILE_BINS],
}

impl PreparedKey {
    fn new(key: &str) -> Self {
        let chars: Vec<char> = key.chars().collect();
        let mut profile = [0u32; PROFILE_BINS];
        for &c in &chars {
            profile[c as u32 as usize % PROFILE_BINS] += 1;
        }
        Self { chars, profile }
    }

    fn len(&self) -> usize {
        self.chars.len()
    }

    fn profile_gap(&self, other: &Self) -> usize {
        let (mut extra, mut missing) = (0usize, 0usize);
        for (&a, &b) in self.profile.iter().zip(other.profile.iter()) {
            if a > b {
                extra += (a - b) as usize;
            } else {
                missing += (b - a) as usize;
            }
        }
        extra.max(missing)
    }

    fn is_within(&self, other: &Self, threshold: usize) -> bool {
        self.len().abs_diff(other.len()) <= threshold
            && self.profile_gap(other) <= threshold
            && levenshtein_within(&self.chars, &other.chars, threshold).is_some()
    }
}

pub struct PatternDetector {
    options: MiningOptions,
}

impl PatternDetector {
    /// Build a detector. Nonsense options are rejected here, before any work.
    pub fn new(options: MiningOptions) -> Result<Self> {
        options.validate()?;
        Ok(Self { options })
    }

    // Main function - finds the top repeated commands and sequences
    pub fn detect_patterns(&self, entries: &[HistoryEntry]) -> Vec<CommandPattern> {
        if entries.is_empty() {
            return Vec::new();
        }

        let mut table = CountTable::default();
        self.count_commands(entries, &mut table);
        let exact_keys = table.len();

        self.count_sequences(entries, &mut table);
        tracing::debug!(
            entries = entries.len(),
            exact_keys,
            sequence_keys = table.len() - exact_keys,
            "counted history"
        );

        let clusters = self.cluster(table.keys);
        let cluster_count = clusters.len();

        let mut patterns: Vec<CommandPattern> = clusters
            .into_iter()
            .filter(|p| p.frequency >= self.options.min_frequency)
            .collect();

        patterns.sort_by(Self::rank);
        patterns.truncate(self.options.top);

        tracing::debug!(
            clusters = cluster_count,
            returned = patterns.len(),
            "pattern detection finished"
        );

        patterns
    }

    /// Plain per-command counts
    fn count_commands(&self, entries: &[HistoryEntry], table: &mut CountTable) {
        for entry in entries {
            table.record(entry.command.clone(), entry.timestamp);
        }
    }

    /// Count command runs using a sliding window per window size.
    /// A run's timestamp is the timestamp of its last command.
    fn count_sequences(&self, entries: &[HistoryEntry], table: &mut CountTable) {
        for window_size in self.options.min_sequence_length..=self.options.max_sequence_length {
            // windows() yields nothing when the history is shorter, no padding
            for window in entries.windows(window_size) {
                let key = window
                    .iter()
                    .map(|e| e.command.as_str())
                    .collect::<Vec<_>>()
                    .join(SEQUENCE_SEPARATOR);
                let last = window.last().and_then(|e| e.timestamp);

                table.record(key, last);
            }
        }
    }

    /// Greedy clustering: most frequent key first, absorbs every remaining
    /// key within `similarity_threshold` edits.
    fn cluster(&self, keys: Vec<KeyCount>) -> Vec<CommandPattern> {
        let threshold = self.options.similarity_threshold;

        // Stable sort keeps first-seen order among equal counts
        let mut order: Vec<usize> = (0..keys.len()).collect();
        order.sort_by(|&a, &b| keys[b].count.cmp(&keys[a].count));

        let mut rank = vec![0usize; keys.len()];
        for (pos, &i) in order.iter().enumerate() {
            rank[i] = pos;
        }

        // Split every key once up front; comparisons only ever read these
        let prepared: Vec<PreparedKey> = keys
            .par_iter()
            .map(|k| PreparedKey::new(&k.key))
            .collect();

        // Unclaimed keys grouped by char length, each group in visiting order
        let mut by_length: BTreeMap<usize, Vec<usize>> = BTreeMap::new();
        if threshold > 0 {
            for &i in &order {
                by_length.entry(prepared[i].len()).or_default().push(i);
            }
        }

        let mut consumed = vec![false; keys.len()];
        let mut patterns = Vec::new();
        let mut merged = 0usize;

        for &rep in &order {
            if consumed[rep] {
                continue;
            }
            consumed[rep] = true;

            let representative = &keys[rep];
            let mut pattern = CommandPattern {
                pattern: representative.key.clone(),
                frequency: representative.count,
                last_used: representative.last_used,
                variations: Vec::new(),
            };

            if threshold > 0 {
                let similar =
                    Self::similar_keys(rep, &prepared, &mut by_length, &consumed, &rank, threshold);

                for candidate in similar {
                    let variant = &keys[candidate];
                    pattern.frequency += variant.count;
                    pattern.last_used = pattern.last_used.max(variant.last_used);
                    pattern.variations.push(variant.key.clone());
                    consumed[candidate] = true;
                    merged += 1;
                }
            }

            patterns.push(pattern);
        }

        tracing::debug!(merged, "similar keys folded into clusters");

        patterns
    }

    /// Unclaimed keys within `threshold` edits of `rep`, in visiting order.
    ///
    /// Every key visited before `rep` is already claimed, so whatever is
    /// left in the length groups comes after it.
    fn similar_keys(
        rep: usize,
        prepared: &[PreparedKey],
        by_length: &mut BTreeMap<usize, Vec<usize>>,
        consumed: &[bool],
        rank: &[usize],
        threshold: usize,
    ) -> Vec<usize> {
        let len = prepared[rep].len();
        let lengths = len.saturating_sub(threshold)..=len.saturating_add(threshold);

        let mut candidates = Vec::new();
        for (_, group) in by_length.range_mut(lengths) {
            group.retain(|&i| !consumed[i]);
            candidates.extend_from_slice(group);
        }

        let representative = &prepared[rep];
        let close = |&i: &usize| representative.is_within(&prepared[i], threshold);

        let mut similar: Vec<usize> = if candidates.len() >= PARALLEL_SCAN_MIN {
            candidates.into_par_iter().filter(close).collect()
        } else {
            candidates.into_iter().filter(close).collect()
        };

        similar.sort_unstable_by_key(|&i| rank[i]);
        similar
    }

    // frequency desc, then most recently used (no timestamp = oldest),
    // then pattern text so equal rows don't shuffle between runs
    fn rank(a: &CommandPattern, b: &CommandPattern) -> Ordering {
        b.frequency
            .cmp(&a.frequency)
            .then_with(|| b.last_used.cmp(&a.last_used))
            .then_with(|| a.pattern.cmp(&b.pattern))
    }
}

/// Mine patterns with the given options
pub fn analyze_patterns(
    entries: &[HistoryEntry],
    options: &MiningOptions,
) -> Result<Vec<CommandPattern>> {
    let detector = PatternDetector::new(options.clone())?;
    Ok(detector.detect_patterns(entries))
}
