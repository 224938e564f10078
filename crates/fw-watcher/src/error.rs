//! Error types for the fw-watcher crate.
//!
//! This module provides the [`WatchError`] type for errors that can occur
//! while setting up or running a directory watch.

use camino::Utf8PathBuf;

/// Errors that can occur during directory watching.
///
/// # Error Recovery Strategy
///
/// - **Notify errors** ([`WatchError::Notify`]): fatal for that watcher only;
///   other watchers continue.
/// - **Path not found** ([`WatchError::PathNotFound`]): setup-time failure,
///   fatal for that watch target only.
/// - **Channel closed** ([`WatchError::ChannelClosed`]): the consumer went
///   away; the watcher thread winds down.
/// - **Non-UTF-8 path** ([`WatchError::NonUtf8Path`]): recoverable, the
///   offending event is logged and skipped.
/// - **I/O errors** ([`WatchError::Io`]): fatal for that watcher only.
///
/// A failure in one watcher is caught at that watcher's boundary and logged;
/// it is never allowed to crash the consumer loop.
#[derive(Debug, thiserror::Error)]
pub enum WatchError {
    /// Failed to initialize or operate the notify watcher.
    #[error("notify watcher error: {0}")]
    Notify(#[from] notify::Error),

    /// The watch target directory does not exist at start time.
    ///
    /// This fails fast and is not retried; other watch targets continue.
    #[error("watch directory does not exist: {0}")]
    PathNotFound(Utf8PathBuf),

    /// The event channel was closed while the watcher was still running.
    #[error("event channel closed unexpectedly")]
    ChannelClosed,

    /// A notification carried a path that is not valid UTF-8.
    ///
    /// Paths are UTF-8 throughout this workspace; such events are logged
    /// and skipped.
    #[error("path is not valid UTF-8: {}", _0.display())]
    NonUtf8Path(std::path::PathBuf),

    /// An I/O error occurred during setup.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl WatchError {
    /// Creates a new [`WatchError::PathNotFound`] error.
    #[inline]
    pub fn path_not_found(path: impl Into<Utf8PathBuf>) -> Self {
        Self::PathNotFound(path.into())
    }

    /// Returns `true` if this error is recoverable (watching can continue).
    #[inline]
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::NonUtf8Path(_))
    }

    /// Returns `true` if this error is fatal for the watcher it occurred in.
    #[inline]
    #[must_use]
    pub const fn is_fatal(&self) -> bool {
        !self.is_recoverable()
    }

    /// Returns the path associated with this error, if any.
    #[must_use]
    pub fn path(&self) -> Option<&Utf8PathBuf> {
        match self {
            Self::PathNotFound(path) => Some(path),
            Self::Notify(_) | Self::ChannelClosed | Self::NonUtf8Path(_) | Self::Io(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_path_not_found_is_fatal() {
        let err = WatchError::path_not_found("/missing/dir");
        assert!(err.is_fatal());
        assert_eq!(err.path().map(|p| p.as_str()), Some("/missing/dir"));
        assert!(err.to_string().contains("/missing/dir"));
    }

    #[test]
    fn test_channel_closed_is_fatal() {
        let err = WatchError::ChannelClosed;
        assert!(err.is_fatal());
        assert!(err.path().is_none());
    }

    #[test]
    fn test_non_utf8_is_recoverable() {
        let err = WatchError::NonUtf8Path(PathBuf::from("odd"));
        assert!(err.is_recoverable());
        assert!(!err.is_fatal());
    }
}
