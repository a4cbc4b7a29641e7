//! Domain error types

use thiserror::Error;

/// Domain-level errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Song request is empty")]
    EmptyRequest,

    #[error("Invalid model name: {0}")]
    InvalidModel(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_request_display() {
        assert_eq!(DomainError::EmptyRequest.to_string(), "Song request is empty");
    }

    #[test]
    fn test_invalid_model_display() {
        let error = DomainError::InvalidModel("  ".to_string());
        assert_eq!(error.to_string(), "Invalid model name:   ");
    }
}
