/// Error types for berri-mine
///
/// The mining and search engines are pure, so almost everything here
/// comes from the edges: loading history, reading config, writing JSON.
/// Uses thiserror for ergonomic error handling.

use thiserror::Error;

/// Main error type for berri-mine operations
#[derive(Error, Debug)]
pub enum MineError {
    /// I/O errors (reading history or config files)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Options that make no sense (rejected before any work starts)
    #[error("Configuration error: {0}")]
    Config(String),

    /// Config file exists but isn't valid TOML
    #[error("Config parse error: {0}")]
    ConfigParse(#[from] toml::de::Error),

    /// Serialization/deserialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// History file had nothing usable in it
    #[error("No usable history in {0}")]
    EmptyHistory(String),
}

/// Result type alias for berri-mine operations
pub type Result<T> = std::result::Result<T, MineError>;

/// Convert MineError to a user-friendly error message
impl MineError {
    pub fn user_message(&self) -> String {
        match self {
            MineError::Io(e) => {
                format!("File system error. Check the path and permissions. Details: {}", e)
            }
            MineError::Config(msg) => {
                format!("Configuration issue: {}", msg)
            }
            MineError::ConfigParse(e) => {
                format!("Could not read config file. Details: {}", e)
            }
            MineError::Serialization(e) => {
                format!("Data format error: {}", e)
            }
            MineError::EmptyHistory(path) => {
                format!("'{}' doesn't contain any commands to look at", path)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_user_messages() {
        let err = MineError::EmptyHistory("~/.zsh_history".to_string());
        assert!(err.user_message().contains("~/.zsh_history"));

        let err = MineError::Config("top must be at least 1".to_string());
        assert!(err.user_message().contains("top must be at least 1"));
    }

    #[test]
    fn test_error_display() {
        let err = MineError::Config("max_results must be at least 1".to_string());
        let display = format!("{}", err);
        assert!(display.contains("Configuration error"));
    }

    #[test]
    fn test_json_error_converts() {
        let parse: std::result::Result<serde_json::Value, _> = serde_json::from_str("{");
        let err: MineError = parse.unwrap_err().into();
        assert!(matches!(err, MineError::Serialization(_)));
        assert!(err.user_message().starts_with("Data format error"));
    }

    #[test]
    fn test_toml_error_converts() {
        let parse: std::result::Result<toml::Value, _> = toml::from_str("top = ");
        let err: MineError = parse.unwrap_err().into();
        assert!(matches!(err, MineError::ConfigParse(_)));
    }
}
