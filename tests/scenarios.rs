use berri_mine_lib::{analyze_patterns, search_history, HistoryEntry, MiningOptions};

fn history(commands: &[&str]) -> Vec<HistoryEntry> {
    commands
        .iter()
        .enumerate()
        .map(|(i, cmd)| HistoryEntry::new(*cmd, i + 1))
        .collect()
}

fn repeat(command: &str, times: usize) -> Vec<&str> {
    std::iter::repeat(command).take(times).collect()
}

#[cfg(test)]
mod pattern_tests {
    use super::*;

    #[test]
    fn test_most_frequent_command_ranks_first() {
        let mut commands = repeat("git status", 5);
        commands.extend(repeat("npm test", 2));
        let options = MiningOptions {
            min_frequency: 1,
            ..Default::default()
        };

        let patterns = analyze_patterns(&history(&commands), &options).unwrap();

        assert!(patterns.iter().any(|p| p.pattern == "npm test"));
        assert_eq!(patterns[0].pattern, "git status");
        assert_eq!(patterns[0].frequency, 5);
    }

    #[test]
    fn test_repeated_workflow_becomes_sequence() {
        let mut commands = Vec::new();
        for _ in 0..3 {
            commands.extend(["git add .", "git commit -m fix", "git push"]);
        }
        let options = MiningOptions {
            min_frequency: 2,
            min_sequence_length: 2,
            max_sequence_length: 3,
            ..Default::default()
        };

        let patterns = analyze_patterns(&history(&commands), &options).unwrap();

        let workflow = patterns
            .iter()
            .find(|p| p.pattern == "git add . && git commit -m fix && git push")
            .expect("workflow sequence should be reported");
        assert!(workflow.frequency >= 2);
    }

    #[test]
    fn test_near_duplicates_merge_into_one() {
        let mut commands = repeat("docker ps", 3);
        commands.extend(repeat("docker ps -a", 3));
        let options = MiningOptions {
            similarity_threshold: 3,
            ..Default::default()
        };

        let patterns = analyze_patterns(&history(&commands), &options).unwrap();

        assert_eq!(patterns.len(), 1);
        assert_eq!(patterns[0].frequency, 6);
        assert_eq!(patterns[0].variations.len(), 1);
    }
}

#[cfg(test)]
mod search_tests {
    use super::*;

    fn git_history() -> Vec<HistoryEntry> {
        history(&[
            "git status",
            "git commit -m fix",
            "git status",
            "cargo check",
            "git status",
        ])
    }

    #[test]
    fn test_frequent_match_ranks_higher() {
        let results = search_history(&git_history(), "git", 10).unwrap();

        let status = results.iter().position(|r| r.command == "git status");
        let commit = results.iter().position(|r| r.command == "git commit -m fix");

        assert!(status.is_some());
        assert!(commit.is_some());
        assert!(status < commit);
    }

    #[test]
    fn test_typo_finds_command() {
        let results = search_history(&git_history(), "gti", 10).unwrap();
        assert!(results.iter().any(|r| r.command == "git status"));
    }

    #[test]
    fn test_max_results_is_respected() {
        let results = search_history(&git_history(), "git", 1).unwrap();
        assert_eq!(results.len(), 1);
    }
}
