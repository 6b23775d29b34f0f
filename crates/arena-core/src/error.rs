use thiserror::Error;

#[derive(Error, Debug)]
pub enum ArenaError {
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Problem not found: {0}")]
    NotFound(String),

    #[error("Language '{language}' is not supported by problem {problem_id}")]
    UnsupportedLanguage { problem_id: String, language: String },

    #[error("Invalid test case: {0}")]
    InvalidTestCase(String),

    #[error("An execution is already in progress")]
    Busy,

    #[error("Store error: {0}")]
    Store(String),
}

pub type Result<T> = std::result::Result<T, ArenaError>;

impl ArenaError {
    /// The message a user should see, without the category prefix where the
    /// payload already says everything.
    pub fn detail(&self) -> String {
        match self {
            ArenaError::Network(msg) | ArenaError::Store(msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detail_strips_network_prefix() {
        let err = ArenaError::Network("Network timeout".into());
        assert_eq!(err.to_string(), "Network error: Network timeout");
        assert_eq!(err.detail(), "Network timeout");
    }

    #[test]
    fn test_detail_keeps_context_for_not_found() {
        let err = ArenaError::NotFound("two-sum".into());
        assert_eq!(err.detail(), "Problem not found: two-sum");
    }
}
