// Ultralytics 🚀 AGPL-3.0 License - https://ultralytics.com/license

//! Error types for the social-distancing library.

use std::fmt;

/// Result type alias for social-distancing operations.
pub type Result<T> = std::result::Result<T, SocialError>;

/// Main error type for the social-distancing library.
///
/// Every variant describes input the caller should have rejected upstream.
/// Nothing is retried and no partial result is returned.
#[derive(Debug, Clone, PartialEq)]
pub enum SocialError {
    /// A person index does not address any entry of the scene.
    IndexOutOfRange {
        /// The offending index.
        index: usize,
        /// Number of people in the scene.
        len: usize,
    },
    /// A per-person sequence does not have one entry per person.
    LengthMismatch {
        /// Name of the mismatched sequence.
        field: &'static str,
        /// Number of people (length of `centers`).
        expected: usize,
        /// Actual length of the sequence.
        found: usize,
    },
    /// Depth estimates or depth scales are missing while sampling is requested.
    MissingUncertainty(String),
    /// Malformed per-person data (negative scale, non-finite value, self pair).
    InvalidInput(String),
    /// Invalid configuration provided.
    ConfigError(String),
}

impl fmt::Display for SocialError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::IndexOutOfRange { index, len } => {
                write!(f, "Index out of range: {index} (scene has {len} people)")
            }
            Self::LengthMismatch {
                field,
                expected,
                found,
            } => write!(
                f,
                "Length mismatch: '{field}' has {found} entries, expected {expected}"
            ),
            Self::MissingUncertainty(msg) => write!(f, "Missing uncertainty: {msg}"),
            Self::InvalidInput(msg) => write!(f, "Invalid input: {msg}"),
            Self::ConfigError(msg) => write!(f, "Config error: {msg}"),
        }
    }
}

impl std::error::Error for SocialError {}

/// Check that `index` addresses one of `len` people.
pub(crate) const fn check_index(index: usize, len: usize) -> Result<()> {
    if index < len {
        Ok(())
    } else {
        Err(SocialError::IndexOutOfRange { index, len })
    }
}

/// Check that a per-person sequence has exactly `expected` entries.
pub(crate) const fn check_len(field: &'static str, expected: usize, found: usize) -> Result<()> {
    if expected == found {
        Ok(())
    } else {
        Err(SocialError::LengthMismatch {
            field,
            expected,
            found,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SocialError::IndexOutOfRange { index: 4, len: 3 };
        assert_eq!(
            err.to_string(),
            "Index out of range: 4 (scene has 3 people)"
        );

        let err = SocialError::LengthMismatch {
            field: "angles",
            expected: 3,
            found: 2,
        };
        assert_eq!(
            err.to_string(),
            "Length mismatch: 'angles' has 2 entries, expected 3"
        );

        let err = SocialError::ConfigError("test".to_string());
        assert_eq!(err.to_string(), "Config error: test");
    }

    #[test]
    fn test_checks() {
        assert!(check_index(0, 1).is_ok());
        assert_eq!(
            check_index(1, 1),
            Err(SocialError::IndexOutOfRange { index: 1, len: 1 })
        );
        assert!(check_len("stds", 2, 2).is_ok());
        assert!(matches!(
            check_len("stds", 2, 0),
            Err(SocialError::LengthMismatch { field: "stds", .. })
        ));
    }
}
