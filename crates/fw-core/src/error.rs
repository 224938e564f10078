//! Error types for the fw-core crate.
//!
//! This module provides the [`ConfigError`] type for configuration-related
//! failures that can occur during loading, validation, and watch-target
//! resolution.

/// Errors that can occur during configuration loading and validation.
///
/// A `ConfigError` is fatal for the watch target it belongs to, but never for
/// the subsystem as a whole: a target that fails validation is reported and
/// skipped while the remaining targets continue to be watched.
///
/// # Examples
///
/// ```
/// use fw_core::ConfigError;
///
/// let error = ConfigError::EmptyDirectory { index: 2 };
/// assert!(error.to_string().contains("2"));
/// ```
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// A watch entry has an empty or unset `directory` field.
    #[error("watch entry {index} has an empty directory")]
    EmptyDirectory {
        /// Position of the offending entry in the configuration list.
        index: usize,
    },

    /// An include or ignore pattern failed to compile as a glob.
    #[error("invalid glob pattern '{pattern}': {reason}")]
    InvalidPattern {
        /// The pattern as written in the configuration.
        pattern: String,
        /// Explanation of why the pattern is invalid.
        reason: String,
    },

    /// A configuration option has an invalid value.
    #[error("invalid configuration option '{option}': {reason}")]
    InvalidOption {
        /// The name of the invalid option.
        option: String,
        /// Explanation of why the option is invalid.
        reason: String,
    },

    /// An I/O error occurred while reading configuration.
    #[error("failed to read configuration: {0}")]
    Io(#[from] std::io::Error),

    /// Failed to parse the configuration file.
    #[error("failed to parse configuration: {0}")]
    Parse(#[from] serde_json::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_directory_display() {
        let error = ConfigError::EmptyDirectory { index: 0 };
        assert_eq!(error.to_string(), "watch entry 0 has an empty directory");
    }

    #[test]
    fn test_invalid_pattern_display() {
        let error = ConfigError::InvalidPattern {
            pattern: "[".to_owned(),
            reason: "unclosed character class".to_owned(),
        };
        let msg = error.to_string();
        assert!(msg.contains('['));
        assert!(msg.contains("unclosed"));
    }

    #[test]
    fn test_invalid_option_display() {
        let error = ConfigError::InvalidOption {
            option: "clear_labels_after_ms".to_owned(),
            reason: "must be at least 100".to_owned(),
        };
        let msg = error.to_string();
        assert!(msg.contains("clear_labels_after_ms"));
        assert!(msg.contains("at least 100"));
    }
}
