use berri_mine_lib::{analyze_patterns, search_history, HistoryEntry, MiningOptions};
use chrono::{DateTime, Utc};
use proptest::prelude::*;
use std::collections::HashSet;

// Small vocabulary so repeats, sequences and near-duplicates actually happen
const VOCABULARY: &[&str] = &[
    "git status",
    "git stash",
    "git push",
    "git pull",
    "npm test",
    "npm run build",
    "docker ps",
    "docker ps -a",
    "cargo build",
    "cargo build --release",
    "ls -la",
    "kubectl get pods",
];

fn arb_history() -> impl Strategy<Value = Vec<HistoryEntry>> {
    prop::collection::vec(
        (0..VOCABULARY.len(), prop::option::of(1_600_000_000i64..1_700_000_000i64)),
        0..60,
    )
    .prop_map(|picks| {
        picks
            .into_iter()
            .enumerate()
            .map(|(i, (word, secs))| HistoryEntry {
                command: VOCABULARY[word].to_string(),
                timestamp: secs.and_then(|s| DateTime::<Utc>::from_timestamp(s, 0)),
                line_number: i + 1,
            })
            .collect()
    })
}

fn arb_options() -> impl Strategy<Value = MiningOptions> {
    (1usize..6, 1usize..10, 0usize..5, 2usize..4, 0usize..3).prop_map(
        |(min_frequency, top, similarity_threshold, min_sequence_length, extra)| MiningOptions {
            min_frequency,
            top,
            similarity_threshold,
            min_sequence_length,
            max_sequence_length: min_sequence_length + extra,
        },
    )
}

proptest! {
    #[test]
    fn patterns_respect_floor_cap_and_order(entries in arb_history(), options in arb_options()) {
        let patterns = analyze_patterns(&entries, &options).unwrap();

        prop_assert!(patterns.len() <= options.top);

        for pattern in &patterns {
            prop_assert!(pattern.frequency >= options.min_frequency);
            prop_assert!(!pattern.variations.contains(&pattern.pattern));
        }

        for pair in patterns.windows(2) {
            prop_assert!(pair[0].frequency >= pair[1].frequency);
            if pair[0].frequency == pair[1].frequency {
                prop_assert!(pair[0].last_used >= pair[1].last_used);
            }
        }

        let unique: HashSet<&str> = patterns.iter().map(|p| p.pattern.as_str()).collect();
        prop_assert_eq!(unique.len(), patterns.len());
    }

    #[test]
    fn search_results_are_bounded_unique_and_ranked(
        entries in arb_history(),
        query in "[a-z -]{0,12}",
        max_results in 1usize..8,
    ) {
        let results = search_history(&entries, &query, max_results).unwrap();

        prop_assert!(results.len() <= max_results);

        for result in &results {
            prop_assert!(result.score >= 0.05 && result.score <= 1.0);
            let scaled = result.score * 1000.0;
            prop_assert!((scaled - scaled.round()).abs() < 1e-6);
        }

        for pair in results.windows(2) {
            prop_assert!(pair[0].score >= pair[1].score);
            if pair[0].score == pair[1].score {
                prop_assert!(pair[0].frequency >= pair[1].frequency);
            }
        }

        let unique: HashSet<&str> = results.iter().map(|r| r.command.as_str()).collect();
        prop_assert_eq!(unique.len(), results.len());
    }

    #[test]
    fn blank_queries_find_nothing(entries in arb_history(), spaces in " {0,6}") {
        prop_assert!(search_history(&entries, "", 10).unwrap().is_empty());
        prop_assert!(search_history(&entries, &spaces, 10).unwrap().is_empty());
    }
}
