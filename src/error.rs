//! Error types for census geography lookups
//!
//! Lookups fail with `InvalidArgument` or a not-found variant. Registry loads fail
//! with a `LoadError`, which is cached and handed back to every later lookup.

use thiserror::Error;

/// Main error type for registry lookups
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Lookup key has a type or shape the registry cannot dispatch on
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("No state found for lookup '{query}'")]
    StateNotFound { query: String },

    #[error("No county found for lookup '{query}' in state {state}")]
    CountyNotFound { query: String, state: String },

    /// A bundled resource could not be loaded; the registry never became ready
    #[error(transparent)]
    Load(#[from] LoadError),

    /// Key-value document could not be parsed back into a lookup
    #[error("malformed document: {0}")]
    Document(String),
}

impl Error {
    /// True for both the state and the county not-found variants
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::StateNotFound { .. } | Error::CountyNotFound { .. })
    }
}

/// Fatal, startup-only failure while building a registry
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to load {resource} (row {row}): {reason}")]
pub struct LoadError {
    /// Resource name, e.g. `state.txt`
    pub resource: &'static str,
    /// 1-based data row (the header is row 0)
    pub row: usize,
    pub reason: String,
}

impl LoadError {
    pub(crate) fn new(resource: &'static str, row: usize, reason: impl Into<String>) -> Self {
        Self {
            resource,
            row,
            reason: reason.into(),
        }
    }
}

/// Result type alias for registry operations
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_messages() {
        let err = Error::StateNotFound {
            query: "chimichanga".to_string(),
        };
        assert_eq!(err.to_string(), "No state found for lookup 'chimichanga'");
        assert!(err.is_not_found());

        let err = Error::CountyNotFound {
            query: "1000".to_string(),
            state: "South Carolina".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No county found for lookup '1000' in state South Carolina"
        );
        assert!(err.is_not_found());
    }

    #[test]
    fn test_load_error_is_transparent() {
        let err: Error = LoadError::new("state.txt", 3, "duplicate abbreviation 'AL'").into();
        assert_eq!(
            err.to_string(),
            "failed to load state.txt (row 3): duplicate abbreviation 'AL'"
        );
        assert!(!err.is_not_found());
    }
}
