/// Tokenizer for search queries and commands
///
/// Lowercases, then splits on whitespace and the punctuation that shows
/// up all over shell commands (paths, flags, pipes, quotes, brackets).

use regex::Regex;
use std::sync::LazyLock;

static SPLITTER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"[\s/\-_.=|;:&'"`<>(){}\[\]]+"#).expect("token splitter regex is valid")
});

/// Split text into lowercase tokens. Empty fragments are dropped.
pub fn tokenize(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();

    SPLITTER
        .split(&lowered)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
