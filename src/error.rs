use thiserror::Error;

use crate::db::DbLockError;

/// Why a deck could not be loaded for a subtopic
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("{0}")]
    Lock(#[from] DbLockError),

    #[error("Request error: {0}")]
    Http(Box<reqwest::Error>),

    #[error("Deck backend returned HTTP {0}")]
    Status(u16),

    #[error("Subtopic {0} not found")]
    SubtopicNotFound(i64),

    #[error("Subtopic {0} has no flashcards")]
    EmptyDeck(i64),
}

impl From<reqwest::Error> for LoadError {
    fn from(error: reqwest::Error) -> Self {
        LoadError::Http(Box::new(error))
    }
}

impl LoadError {
    /// Missing or empty content, as opposed to an infrastructure failure
    pub fn is_missing(&self) -> bool {
        matches!(self, LoadError::SubtopicNotFound(_) | LoadError::EmptyDeck(_))
    }
}

/// Log a failure that the caller recovers from instead of propagating
pub trait LogOnError<T> {
    /// Warn with `context` and hand back `None` on error
    fn log_warn(self, context: &str) -> Option<T>;
}

impl<T, E: std::fmt::Display> LogOnError<T> for Result<T, E> {
    fn log_warn(self, context: &str) -> Option<T> {
        self.map_err(|e| tracing::warn!(error = %e, "{}", context)).ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_warn_keeps_value() {
        let result: Result<usize, LoadError> = Ok(6);
        assert_eq!(result.log_warn("Failed to load deck"), Some(6));
    }

    #[test]
    fn test_log_warn_swallows_load_error() {
        let result: Result<usize, LoadError> = Err(LoadError::EmptyDeck(4));
        assert_eq!(result.log_warn("Failed to load deck"), None);
    }

    #[test]
    fn test_missing_errors() {
        assert!(LoadError::SubtopicNotFound(1).is_missing());
        assert!(LoadError::EmptyDeck(1).is_missing());
        assert!(!LoadError::Status(500).is_missing());
    }
}
