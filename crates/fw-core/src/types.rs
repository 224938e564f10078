//! Domain types for filesystem change events.
//!
//! This module provides the typed event model produced by the classifier and
//! consumed by the debouncer and label renderer:
//!
//! - [`EntityKind`] - whether a changed path is a file or a folder
//! - [`FileAction`] - what happened to it
//! - [`FileEntity`] - a changed path with its kind and optional content sample
//! - [`FsEvent`] - one classified change, immutable once constructed

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

/// Classification of a changed path.
///
/// The kind is taken from the notification backend when it reports one
/// (create and remove events usually carry it), otherwise it is decided by
/// re-stat'ing the path at classification time. Under the fallback, a path
/// that no longer resolves to a regular file reports as
/// [`Folder`](Self::Folder), matching best-effort semantics for rapidly
/// deleted paths.
///
/// # Examples
///
/// ```
/// use fw_core::EntityKind;
///
/// assert_eq!(EntityKind::File.as_str(), "file");
/// assert_eq!(EntityKind::Folder.as_str(), "folder");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityKind {
    /// A regular file.
    File,
    /// A directory (or a path that no longer resolves to a regular file).
    Folder,
}

impl EntityKind {
    /// Returns the lowercase name used in configuration and templates.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::File => "file",
            Self::Folder => "folder",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The action reported by a filesystem change notification.
///
/// # Examples
///
/// ```
/// use fw_core::FileAction;
///
/// assert_eq!(FileAction::Created.as_str(), "created");
/// assert_eq!(FileAction::Moved.to_string(), "moved");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FileAction {
    /// A path was created.
    Created,
    /// A path's content or metadata changed.
    Modified,
    /// A path was removed.
    Deleted,
    /// A path was renamed; the event carries both endpoints.
    Moved,
}

impl FileAction {
    /// Returns the lowercase name used in configuration and templates.
    #[inline]
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
            Self::Moved => "moved",
        }
    }
}

impl std::fmt::Display for FileAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A changed filesystem entity.
///
/// The entity name is always derived from the last path segment rather than
/// stored, so it can never drift out of sync with the path.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use fw_core::{EntityKind, FileEntity};
///
/// let entity = FileEntity::new(Utf8PathBuf::from("/tmp/a.txt"), EntityKind::File);
/// assert_eq!(entity.name(), "a.txt");
/// assert!(entity.content.is_empty());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileEntity {
    /// Absolute path of the entity.
    pub path: Utf8PathBuf,

    /// Whether the path resolved to a file or a folder at classification time.
    pub kind: EntityKind,

    /// Content sample read from the entity.
    ///
    /// Empty unless content reading was requested for the watch target and
    /// the read succeeded.
    pub content: String,
}

impl FileEntity {
    /// Creates an entity with empty content.
    #[inline]
    #[must_use]
    pub const fn new(path: Utf8PathBuf, kind: EntityKind) -> Self {
        Self {
            path,
            kind,
            content: String::new(),
        }
    }

    /// Creates an entity carrying a content sample.
    #[inline]
    #[must_use]
    pub const fn with_content(path: Utf8PathBuf, kind: EntityKind, content: String) -> Self {
        Self {
            path,
            kind,
            content,
        }
    }

    /// Returns the last path segment, or the whole path if it has none.
    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        self.path.file_name().unwrap_or_else(|| self.path.as_str())
    }

    /// Returns the entity path as a [`Utf8Path`].
    #[inline]
    #[must_use]
    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

/// One classified filesystem change event.
///
/// Constructed by the classifier on a watcher thread, handed through the
/// event channel by value, and consumed by the debouncer and renderer.
/// Immutable once constructed.
///
/// # Examples
///
/// ```
/// use camino::Utf8PathBuf;
/// use fw_core::{EntityKind, FileAction, FileEntity, FsEvent};
///
/// let event = FsEvent::new(
///     FileAction::Created,
///     FileEntity::new(Utf8PathBuf::from("/tmp/a.txt"), EntityKind::File),
/// );
/// assert_eq!(event.action, FileAction::Created);
/// assert!(event.destination.is_none());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FsEvent {
    /// What happened.
    pub action: FileAction,

    /// The entity the notification was raised for.
    pub source: FileEntity,

    /// The rename target. Present only when `action` is
    /// [`FileAction::Moved`].
    pub destination: Option<FileEntity>,
}

impl FsEvent {
    /// Creates an event with no destination.
    #[inline]
    #[must_use]
    pub const fn new(action: FileAction, source: FileEntity) -> Self {
        Self {
            action,
            source,
            destination: None,
        }
    }

    /// Creates a [`FileAction::Moved`] event with both endpoints.
    #[inline]
    #[must_use]
    pub const fn moved(source: FileEntity, destination: FileEntity) -> Self {
        Self {
            action: FileAction::Moved,
            source,
            destination: Some(destination),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_kind_as_str() {
        assert_eq!(EntityKind::File.as_str(), "file");
        assert_eq!(EntityKind::Folder.as_str(), "folder");
    }

    #[test]
    fn test_entity_kind_serialization() {
        assert_eq!(
            serde_json::to_string(&EntityKind::File).unwrap(),
            r#""file""#
        );
        assert_eq!(
            serde_json::to_string(&EntityKind::Folder).unwrap(),
            r#""folder""#
        );
    }

    #[test]
    fn test_file_action_as_str() {
        assert_eq!(FileAction::Created.as_str(), "created");
        assert_eq!(FileAction::Modified.as_str(), "modified");
        assert_eq!(FileAction::Deleted.as_str(), "deleted");
        assert_eq!(FileAction::Moved.as_str(), "moved");
    }

    #[test]
    fn test_file_action_deserialization() {
        let action: FileAction = serde_json::from_str(r#""moved""#).unwrap();
        assert_eq!(action, FileAction::Moved);
    }

    #[test]
    fn test_file_entity_name_is_derived() {
        let entity = FileEntity::new(Utf8PathBuf::from("/watch/dir/notes.md"), EntityKind::File);
        assert_eq!(entity.name(), "notes.md");

        let root = FileEntity::new(Utf8PathBuf::from("/"), EntityKind::Folder);
        assert_eq!(root.name(), "/");
    }

    #[test]
    fn test_fs_event_new_has_no_destination() {
        let event = FsEvent::new(
            FileAction::Deleted,
            FileEntity::new(Utf8PathBuf::from("/tmp/gone"), EntityKind::Folder),
        );
        assert!(event.destination.is_none());
    }

    #[test]
    fn test_fs_event_moved_carries_destination() {
        let event = FsEvent::moved(
            FileEntity::new(Utf8PathBuf::from("/tmp/old.txt"), EntityKind::File),
            FileEntity::new(Utf8PathBuf::from("/tmp/new.txt"), EntityKind::File),
        );
        assert_eq!(event.action, FileAction::Moved);
        assert_eq!(
            event.destination.as_ref().map(FileEntity::name),
            Some("new.txt")
        );
    }
}
