//! Configuration structures for the fwbar file watcher.
//!
//! This module provides the raw configuration surface consumed by the
//! subsystem:
//!
//! - [`WatchEntry`] - one watch target as written by the user
//! - [`LabelTemplates`] / [`ActionTemplates`] - per-kind, per-action display
//!   templates
//! - [`WatcherConfig`] - the full configuration with process-wide tunables
//!
//! All types implement [`Default`] and deserialize with missing fields filled
//! in, so a minimal configuration only needs a `directory` per entry.

use camino::Utf8Path;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::types::{EntityKind, FileAction};

/// Default cap on bytes sampled from a changed file.
pub const DEFAULT_MAX_CONTENT_BYTES: usize = 65536;

/// Default debounce window in milliseconds.
pub const DEFAULT_DEBOUNCE_MS: u64 = 50;

/// Smallest accepted idle-clear interval in milliseconds.
pub const MIN_CLEAR_INTERVAL_MS: u64 = 100;

/// Display templates for the four actions of one entity kind.
///
/// An empty template hides the display element for that combination.
///
/// # Examples
///
/// ```
/// use fw_core::ActionTemplates;
///
/// let json = r#"{"created": "+ {name}"}"#;
/// let templates: ActionTemplates = serde_json::from_str(json).unwrap();
/// assert_eq!(templates.created, "+ {name}");
/// assert!(templates.deleted.is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActionTemplates {
    /// Template rendered for created paths.
    pub created: String,

    /// Template rendered for modified paths.
    pub modified: String,

    /// Template rendered for deleted paths.
    pub deleted: String,

    /// Template rendered for renamed paths.
    pub moved: String,
}

impl ActionTemplates {
    /// Returns the template for one action.
    #[inline]
    #[must_use]
    pub fn for_action(&self, action: FileAction) -> &str {
        match action {
            FileAction::Created => &self.created,
            FileAction::Modified => &self.modified,
            FileAction::Deleted => &self.deleted,
            FileAction::Moved => &self.moved,
        }
    }
}

/// Display templates keyed by entity kind, then action.
///
/// # Examples
///
/// ```
/// use fw_core::{EntityKind, FileAction, LabelTemplates};
///
/// let json = r#"{"file": {"created": "new file {name}"}}"#;
/// let labels: LabelTemplates = serde_json::from_str(json).unwrap();
/// assert_eq!(
///     labels.template_for(EntityKind::File, FileAction::Created),
///     "new file {name}"
/// );
/// assert_eq!(
///     labels.template_for(EntityKind::Folder, FileAction::Deleted),
///     ""
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelTemplates {
    /// Templates for regular files.
    pub file: ActionTemplates,

    /// Templates for directories.
    pub folder: ActionTemplates,
}

impl LabelTemplates {
    /// Returns the template registered for a (kind, action) pair.
    ///
    /// Falls back to an empty string when nothing is registered, which hides
    /// the display element for that combination.
    #[inline]
    #[must_use]
    pub fn template_for(&self, kind: EntityKind, action: FileAction) -> &str {
        match kind {
            EntityKind::File => self.file.for_action(action),
            EntityKind::Folder => self.folder.for_action(action),
        }
    }
}

/// One watch target as written in the configuration file.
///
/// This is the raw, unresolved form: paths may contain environment variables
/// and `~`, patterns may carry whitespace and duplicates. Resolution into a
/// canonical form happens in `fw-watcher`.
///
/// # Examples
///
/// ```
/// use fw_core::WatchEntry;
///
/// let json = r#"{"directory": "~/notes", "ignore_patterns": ["*.tmp"]}"#;
/// let entry: WatchEntry = serde_json::from_str(json).unwrap();
/// assert_eq!(entry.directory, "~/notes");
/// assert!(entry.patterns.is_none());
/// assert!(!entry.read_content);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatchEntry {
    /// Directory to watch. Required; environment/home shorthand is expanded
    /// during resolution.
    pub directory: String,

    /// Include globs. `None` means "all files" when not recursing into
    /// directories, or everything when recursing.
    pub patterns: Option<Vec<String>>,

    /// Exclude globs, applied after the include match.
    pub ignore_patterns: Vec<String>,

    /// When `true`, directory-type changes are not expanded into children
    /// and the watch is non-recursive.
    pub ignore_directories: bool,

    /// Whether to sample the content of changed files.
    pub read_content: bool,

    /// Cap on bytes sampled from a changed file. Defaults to
    /// [`DEFAULT_MAX_CONTENT_BYTES`] when unset.
    pub max_content_bytes: Option<usize>,

    /// Display templates for this target.
    pub labels: LabelTemplates,
}

/// Full configuration for the file-watcher subsystem.
///
/// # Examples
///
/// ```
/// use fw_core::WatcherConfig;
///
/// let json = r#"{"entries": [{"directory": "/tmp"}]}"#;
/// let config: WatcherConfig = serde_json::from_str(json).unwrap();
/// assert_eq!(config.debounce_ms, 50);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatcherConfig {
    /// Watch targets.
    pub entries: Vec<WatchEntry>,

    /// Truncate rendered text to this many characters, appending an
    /// ellipsis marker. `None` disables truncation.
    pub label_max_length: Option<usize>,

    /// Clear the displayed text this many milliseconds after the last
    /// rendered event. `None` disables idle clearing.
    pub clear_labels_after_ms: Option<u64>,

    /// Debounce window in milliseconds.
    pub debounce_ms: u64,
}

impl Default for WatcherConfig {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            label_max_length: None,
            clear_labels_after_ms: None,
            debounce_ms: DEFAULT_DEBOUNCE_MS,
        }
    }
}

impl WatcherConfig {
    /// Loads and validates a configuration from a JSON file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Io`] when the file cannot be read,
    /// [`ConfigError::Parse`] on malformed JSON, and any error
    /// [`WatcherConfig::validate`] reports.
    pub fn load(path: &Utf8Path) -> Result<Self, ConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Validates process-wide tunables and per-entry bounds.
    ///
    /// Checks that `label_max_length` is at least 1, that
    /// `clear_labels_after_ms` is at least [`MIN_CLEAR_INTERVAL_MS`], that
    /// `debounce_ms` is non-zero, and that any entry requesting content
    /// reads has a positive byte cap. Empty entry directories are reported
    /// here as well, before resolution is attempted.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.label_max_length == Some(0) {
            return Err(ConfigError::InvalidOption {
                option: "label_max_length".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }

        if let Some(ms) = self.clear_labels_after_ms {
            if ms < MIN_CLEAR_INTERVAL_MS {
                return Err(ConfigError::InvalidOption {
                    option: "clear_labels_after_ms".to_owned(),
                    reason: format!("must be at least {MIN_CLEAR_INTERVAL_MS}"),
                });
            }
        }

        if self.debounce_ms == 0 {
            return Err(ConfigError::InvalidOption {
                option: "debounce_ms".to_owned(),
                reason: "must be at least 1".to_owned(),
            });
        }

        for (index, entry) in self.entries.iter().enumerate() {
            if entry.directory.trim().is_empty() {
                return Err(ConfigError::EmptyDirectory { index });
            }
            if entry.read_content && entry.max_content_bytes == Some(0) {
                return Err(ConfigError::InvalidOption {
                    option: "max_content_bytes".to_owned(),
                    reason: "must be at least 1 when read_content is set".to_owned(),
                });
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_templates_for_action() {
        let templates = ActionTemplates {
            created: "c".to_owned(),
            modified: "m".to_owned(),
            deleted: "d".to_owned(),
            moved: "v".to_owned(),
        };
        assert_eq!(templates.for_action(FileAction::Created), "c");
        assert_eq!(templates.for_action(FileAction::Modified), "m");
        assert_eq!(templates.for_action(FileAction::Deleted), "d");
        assert_eq!(templates.for_action(FileAction::Moved), "v");
    }

    #[test]
    fn test_label_templates_fallback_is_empty() {
        let labels = LabelTemplates::default();
        assert_eq!(
            labels.template_for(EntityKind::Folder, FileAction::Moved),
            ""
        );
    }

    #[test]
    fn test_watch_entry_defaults() {
        let entry: WatchEntry = serde_json::from_str(r#"{"directory": "/tmp"}"#).unwrap();
        assert!(entry.patterns.is_none());
        assert!(entry.ignore_patterns.is_empty());
        assert!(!entry.ignore_directories);
        assert!(!entry.read_content);
        assert!(entry.max_content_bytes.is_none());
    }

    #[test]
    fn test_watcher_config_defaults() {
        let config = WatcherConfig::default();
        assert_eq!(config.debounce_ms, DEFAULT_DEBOUNCE_MS);
        assert!(config.label_max_length.is_none());
        assert!(config.clear_labels_after_ms.is_none());
    }

    #[test]
    fn test_config_roundtrip() {
        let json = r#"{
            "entries": [{
                "directory": "~/notes",
                "patterns": ["*.md"],
                "ignore_patterns": ["*.tmp"],
                "read_content": true,
                "max_content_bytes": 1024,
                "labels": {"file": {"modified": "{name} changed"}}
            }],
            "label_max_length": 40,
            "clear_labels_after_ms": 5000
        }"#;
        let config: WatcherConfig = serde_json::from_str(json).unwrap();
        assert!(config.validate().is_ok());

        let reparsed: WatcherConfig =
            serde_json::from_str(&serde_json::to_string(&config).unwrap()).unwrap();
        assert_eq!(config, reparsed);
    }

    #[test]
    fn test_validate_rejects_short_clear_interval() {
        let config = WatcherConfig {
            clear_labels_after_ms: Some(50),
            ..WatcherConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidOption { option, .. }) if option == "clear_labels_after_ms"
        ));
    }

    #[test]
    fn test_validate_rejects_zero_label_length() {
        let config = WatcherConfig {
            label_max_length: Some(0),
            ..WatcherConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_empty_directory() {
        let config = WatcherConfig {
            entries: vec![WatchEntry {
                directory: "   ".to_owned(),
                ..WatchEntry::default()
            }],
            ..WatcherConfig::default()
        };
        assert!(matches!(
            config.validate(),
            Err(ConfigError::EmptyDirectory { index: 0 })
        ));
    }

    #[test]
    fn test_validate_rejects_zero_content_cap_when_reading() {
        let config = WatcherConfig {
            entries: vec![WatchEntry {
                directory: "/tmp".to_owned(),
                read_content: true,
                max_content_bytes: Some(0),
                ..WatchEntry::default()
            }],
            ..WatcherConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_allows_zero_cap_without_reading() {
        // The cap is irrelevant when content reading is off.
        let config = WatcherConfig {
            entries: vec![WatchEntry {
                directory: "/tmp".to_owned(),
                max_content_bytes: Some(0),
                ..WatchEntry::default()
            }],
            ..WatcherConfig::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("fwbar.json");
        std::fs::write(
            &file,
            r#"{"entries": [{"directory": "/tmp"}], "debounce_ms": 75}"#,
        )
        .unwrap();

        let path = Utf8Path::from_path(&file).unwrap();
        let config = WatcherConfig::load(path).unwrap();
        assert_eq!(config.entries.len(), 1);
        assert_eq!(config.debounce_ms, 75);
    }

    #[test]
    fn test_load_missing_file() {
        let result = WatcherConfig::load(Utf8Path::new("/no/such/fwbar.json"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }

    #[test]
    fn test_load_rejects_malformed_json() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("fwbar.json");
        std::fs::write(&file, "{not json").unwrap();

        let path = Utf8Path::from_path(&file).unwrap();
        assert!(matches!(
            WatcherConfig::load(path),
            Err(ConfigError::Parse(_))
        ));
    }

    #[test]
    fn test_load_runs_validation() {
        let dir = tempfile::TempDir::new().unwrap();
        let file = dir.path().join("fwbar.json");
        std::fs::write(&file, r#"{"entries": [], "debounce_ms": 0}"#).unwrap();

        let path = Utf8Path::from_path(&file).unwrap();
        assert!(matches!(
            WatcherConfig::load(path),
            Err(ConfigError::InvalidOption { .. })
        ));
    }
}
