//! Include/exclude filtering for watch events.
//!
//! Events are filtered on the watcher thread, before classification and
//! before they reach the channel, so a busy but fully ignored directory
//! costs the consumer nothing.
//!
//! The native watch layer has no pattern support of its own, so this filter
//! is the authoritative implementation of the configured glob semantics.
//!
//! # Examples
//!
//! ```
//! use camino::Utf8Path;
//! use fw_watcher::{GlobFilter, PathFilter};
//!
//! let filter = GlobFilter::new(
//!     &["**".to_owned()],
//!     &["*.tmp".to_owned()],
//! ).unwrap();
//!
//! assert!(filter.matches(Utf8Path::new("/watch/notes.md")));
//! assert!(!filter.matches(Utf8Path::new("/watch/swap.tmp")));
//! ```

use camino::Utf8Path;
use fw_core::ConfigError;
use glob::Pattern;
use smallvec::SmallVec;

/// A predicate deciding which changed paths produce events.
///
/// Filters run on the blocking watcher thread, so implementations must be
/// [`Send`] and [`Sync`], and `'static` to be moved into the spawned task.
pub trait PathFilter: Send + Sync + 'static {
    /// Returns `true` if a change at `path` should become an event.
    fn matches(&self, path: &Utf8Path) -> bool;
}

/// A filter that accepts every path.
#[derive(Debug, Clone, Copy, Default)]
pub struct AcceptAll;

impl PathFilter for AcceptAll {
    #[inline]
    fn matches(&self, _path: &Utf8Path) -> bool {
        true
    }
}

/// Compiled include/exclude glob sets.
///
/// A path passes when at least one include pattern matches and no ignore
/// pattern does; ignores are applied after the include match. Each pattern
/// is tried against both the full path and the bare file name, so `*.tmp`
/// excludes temp files at any depth.
#[derive(Debug, Clone)]
pub struct GlobFilter {
    /// Include patterns; empty means nothing matches.
    includes: SmallVec<[Pattern; 4]>,

    /// Exclude patterns, applied after the include match.
    excludes: SmallVec<[Pattern; 4]>,
}

impl GlobFilter {
    /// Compiles include and ignore pattern lists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] for the first pattern that
    /// fails to compile.
    pub fn new(patterns: &[String], ignore_patterns: &[String]) -> Result<Self, ConfigError> {
        Ok(Self {
            includes: compile(patterns)?,
            excludes: compile(ignore_patterns)?,
        })
    }

    /// Returns `true` when any include pattern matches.
    ///
    /// Exposed separately from [`PathFilter::matches`] so rename events can
    /// check both endpoints against the ignore set: an ignore hit on either
    /// endpoint must veto the event even when the other endpoint is clean.
    #[must_use]
    pub fn is_included(&self, path: &Utf8Path) -> bool {
        Self::any_match(&self.includes, path)
    }

    /// Returns `true` when any ignore pattern matches.
    #[must_use]
    pub fn is_ignored(&self, path: &Utf8Path) -> bool {
        Self::any_match(&self.excludes, path)
    }

    fn any_match(patterns: &[Pattern], path: &Utf8Path) -> bool {
        let name = path.file_name().unwrap_or_else(|| path.as_str());
        patterns
            .iter()
            .any(|p| p.matches(path.as_str()) || p.matches(name))
    }
}

impl PathFilter for GlobFilter {
    fn matches(&self, path: &Utf8Path) -> bool {
        self.is_included(path) && !self.is_ignored(path)
    }
}

fn compile(patterns: &[String]) -> Result<SmallVec<[Pattern; 4]>, ConfigError> {
    patterns
        .iter()
        .map(|p| {
            Pattern::new(p).map_err(|e| ConfigError::InvalidPattern {
                pattern: p.clone(),
                reason: e.to_string(),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn filter(includes: &[&str], excludes: &[&str]) -> GlobFilter {
        let includes: Vec<String> = includes.iter().map(|s| (*s).to_owned()).collect();
        let excludes: Vec<String> = excludes.iter().map(|s| (*s).to_owned()).collect();
        GlobFilter::new(&includes, &excludes).unwrap()
    }

    #[test]
    fn test_accept_all() {
        assert!(AcceptAll.matches(Utf8Path::new("/anything/at/all")));
    }

    #[test]
    fn test_include_by_extension() {
        let f = filter(&["*.md"], &[]);
        assert!(f.matches(Utf8Path::new("/watch/readme.md")));
        assert!(f.matches(Utf8Path::new("/watch/deep/nested/readme.md")));
        assert!(!f.matches(Utf8Path::new("/watch/readme.txt")));
    }

    #[test]
    fn test_recursive_wildcard_matches_everything() {
        let f = filter(&["**"], &[]);
        assert!(f.matches(Utf8Path::new("/watch/a")));
        assert!(f.matches(Utf8Path::new("/watch/a/b/c.txt")));
    }

    #[test]
    fn test_ignore_applied_after_include() {
        let f = filter(&["**"], &["*.tmp"]);
        assert!(f.matches(Utf8Path::new("/watch/keep.txt")));
        assert!(!f.matches(Utf8Path::new("/watch/drop.tmp")));
        assert!(!f.matches(Utf8Path::new("/watch/deep/drop.tmp")));
    }

    #[test]
    fn test_empty_includes_match_nothing() {
        let f = filter(&[], &[]);
        assert!(!f.matches(Utf8Path::new("/watch/anything")));
    }

    #[test]
    fn test_ignore_directory_component() {
        let f = filter(&["**"], &["**/node_modules/**"]);
        assert!(!f.matches(Utf8Path::new("/watch/node_modules/pkg/index.js")));
        assert!(f.matches(Utf8Path::new("/watch/src/index.js")));
    }

    #[test]
    fn test_invalid_pattern_is_rejected() {
        let result = GlobFilter::new(&["[".to_owned()], &[]);
        assert!(matches!(result, Err(ConfigError::InvalidPattern { .. })));
    }
}
