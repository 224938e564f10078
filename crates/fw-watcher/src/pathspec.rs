//! Watch-target resolution.
//!
//! This module turns a raw [`WatchEntry`] from the configuration into a
//! canonical [`PathSpec`] ready for the watch layer: paths and patterns are
//! trimmed, environment/home shorthand is expanded, pattern sets are
//! de-duplicated, defaults are filled in, and the include/exclude globs are
//! compiled.
//!
//! Resolution is a pure transformation - it never touches the filesystem, so
//! a `PathSpec` for a directory that does not (yet) exist resolves fine and
//! only fails later at watch setup.

use camino::Utf8PathBuf;
use fw_core::{ConfigError, LabelTemplates, WatchEntry, DEFAULT_MAX_CONTENT_BYTES};
use rustc_hash::FxHashSet;

use crate::filter::GlobFilter;

/// A resolved watch target.
///
/// # Examples
///
/// ```
/// use fw_core::WatchEntry;
/// use fw_watcher::PathSpec;
///
/// let entry = WatchEntry {
///     directory: "/var/log ".to_owned(),
///     ignore_patterns: vec!["*.gz".to_owned(), " *.gz".to_owned()],
///     ..WatchEntry::default()
/// };
///
/// let spec = PathSpec::resolve(&entry, 0).unwrap();
/// assert_eq!(spec.directory, "/var/log");
/// assert_eq!(spec.patterns, vec!["**".to_owned()]);
/// assert_eq!(spec.ignore_patterns, vec!["*.gz".to_owned()]);
/// assert!(spec.recursive);
/// assert_eq!(spec.max_content_bytes, 65536);
/// ```
#[derive(Debug, Clone)]
pub struct PathSpec {
    /// Absolute, expanded watch directory.
    pub directory: Utf8PathBuf,

    /// De-duplicated include globs.
    pub patterns: Vec<String>,

    /// De-duplicated exclude globs, applied after the include match.
    pub ignore_patterns: Vec<String>,

    /// Whether the watch descends into subdirectories. The inverse of the
    /// configured `ignore_directories` flag; when `false`, folder events are
    /// also dropped.
    pub recursive: bool,

    /// Whether to sample content from changed files.
    pub read_content: bool,

    /// Cap on bytes sampled from a changed file.
    pub max_content_bytes: usize,

    /// Display templates for this target.
    pub labels: LabelTemplates,

    /// Compiled include/exclude filter.
    filter: GlobFilter,
}

impl PathSpec {
    /// Resolves one raw watch entry into canonical form.
    ///
    /// `index` is the entry's position in the configuration list and is used
    /// only for error reporting.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyDirectory`] when the directory is empty
    /// after trimming and expansion, and [`ConfigError::InvalidPattern`]
    /// when a glob fails to compile.
    pub fn resolve(entry: &WatchEntry, index: usize) -> Result<Self, ConfigError> {
        let directory = expand_path(&entry.directory);
        if directory.is_empty() {
            return Err(ConfigError::EmptyDirectory { index });
        }

        let recursive = !entry.ignore_directories;

        let patterns = match &entry.patterns {
            // "*" covers a flat watch; "**" crosses separators for the
            // recursive case.
            None => vec![if recursive { "**" } else { "*" }.to_owned()],
            Some(list) => expand_dedup(list),
        };
        let ignore_patterns = expand_dedup(&entry.ignore_patterns);

        let filter = GlobFilter::new(&patterns, &ignore_patterns)?;

        Ok(Self {
            directory: Utf8PathBuf::from(directory),
            patterns,
            ignore_patterns,
            recursive,
            read_content: entry.read_content,
            max_content_bytes: entry
                .max_content_bytes
                .unwrap_or(DEFAULT_MAX_CONTENT_BYTES),
            labels: entry.labels.clone(),
            filter,
        })
    }

    /// Returns the compiled include/exclude filter.
    #[inline]
    #[must_use]
    pub fn filter(&self) -> &GlobFilter {
        &self.filter
    }
}

/// Trims a raw path or pattern and expands `$VAR`, `${VAR}`, and a leading
/// `~`.
#[must_use]
pub fn expand_path(input: &str) -> String {
    let expanded = expand_vars(input.trim(), &|name| std::env::var(name).ok());
    let home = dirs::home_dir().map(|p| p.to_string_lossy().into_owned());
    expand_home(&expanded, home.as_deref())
}

/// Expands and de-duplicates a pattern list, dropping entries that are empty
/// after trimming. First occurrence wins; matching is order-independent.
fn expand_dedup(patterns: &[String]) -> Vec<String> {
    let mut seen = FxHashSet::default();
    let mut out = Vec::with_capacity(patterns.len());
    for pattern in patterns {
        let expanded = expand_path(pattern);
        if !expanded.is_empty() && seen.insert(expanded.clone()) {
            out.push(expanded);
        }
    }
    out
}

/// Substitutes `$NAME` and `${NAME}` via `lookup`. Unknown variables are left
/// verbatim.
fn expand_vars(input: &str, lookup: &dyn Fn(&str) -> Option<String>) -> String {
    let mut out = String::with_capacity(input.len());
    let mut rest = input;

    while let Some(pos) = rest.find('$') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        if let Some(braced) = after.strip_prefix('{') {
            if let Some(end) = braced.find('}') {
                let name = &braced[..end];
                match lookup(name) {
                    Some(value) => out.push_str(&value),
                    None => {
                        out.push_str("${");
                        out.push_str(name);
                        out.push('}');
                    }
                }
                rest = &braced[end + 1..];
            } else {
                // Unterminated brace, emit as-is.
                out.push('$');
                rest = after;
            }
            continue;
        }

        let name_end = after
            .find(|c: char| !(c.is_ascii_alphanumeric() || c == '_'))
            .unwrap_or(after.len());
        if name_end == 0 {
            out.push('$');
            rest = after;
            continue;
        }

        let name = &after[..name_end];
        match lookup(name) {
            Some(value) => out.push_str(&value),
            None => {
                out.push('$');
                out.push_str(name);
            }
        }
        rest = &after[name_end..];
    }

    out.push_str(rest);
    out
}

/// Replaces a leading `~` with the home directory, when known.
fn expand_home(input: &str, home: Option<&str>) -> String {
    match home {
        Some(home) if input == "~" => home.to_owned(),
        Some(home) => input
            .strip_prefix("~/")
            .map_or_else(|| input.to_owned(), |rest| format!("{home}/{rest}")),
        None => input.to_owned(),
    }
}
