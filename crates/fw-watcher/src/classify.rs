//! Classification of raw notifications into typed events.
//!
//! A notify event is first flattened into one or more [`RawChange`]s (path,
//! action, optional rename target), then a [`Classifier`] turns each raw
//! change into an [`FsEvent`]: it decides the entity kind, optionally samples
//! file content, and builds the destination entity for renames.
//!
//! Entity kind comes from the backend's file/folder hint when the
//! notification carries one (create and remove events usually do), otherwise
//! from re-stat'ing the path at classification time. The re-stat fallback is
//! inherently racy for rapidly deleted or recreated paths; the race is
//! accepted and kept best-effort rather than compensated for. A
//! created/modified path that has already vanished is reported as deleted.

use std::io::Read;

use camino::{Utf8Path, Utf8PathBuf};
use fw_core::{EntityKind, FileAction, FileEntity, FsEvent};
use notify::event::{CreateKind, EventKind, ModifyKind, RemoveKind, RenameMode};
use smallvec::SmallVec;
use tracing::{debug, warn};

use crate::pathspec::PathSpec;

/// One raw change notification, flattened from a notify event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawChange {
    /// The primary path the notification was raised for.
    pub path: Utf8PathBuf,

    /// The reported action.
    pub action: FileAction,

    /// The rename target, present only for [`FileAction::Moved`].
    pub dest: Option<Utf8PathBuf>,

    /// The entity kind as reported by the backend, when it knows.
    ///
    /// Deletions cannot be re-stat'ed, so this hint is the only reliable
    /// kind source for them.
    pub kind_hint: Option<EntityKind>,
}

impl RawChange {
    /// Creates a raw change with no rename target and no kind hint.
    #[inline]
    #[must_use]
    pub const fn new(path: Utf8PathBuf, action: FileAction) -> Self {
        Self {
            path,
            action,
            dest: None,
            kind_hint: None,
        }
    }

    /// Creates a raw change carrying the backend's kind hint.
    #[inline]
    #[must_use]
    const fn hinted(path: Utf8PathBuf, action: FileAction, kind_hint: Option<EntityKind>) -> Self {
        Self {
            path,
            action,
            dest: None,
            kind_hint,
        }
    }

    /// Flattens a notify event into raw changes.
    ///
    /// Access events and events notify cannot attribute are dropped. A
    /// complete rename (both endpoints known) becomes one
    /// [`FileAction::Moved`] change; lone rename halves degrade to deleted
    /// or created since no counterpart path is available.
    #[must_use]
    pub fn from_notify(event: &notify::Event) -> SmallVec<[Self; 2]> {
        let mut out = SmallVec::new();

        match event.kind {
            EventKind::Create(kind) => {
                let hint = create_hint(kind);
                for path in utf8_paths(event) {
                    out.push(Self::hinted(path, FileAction::Created, hint));
                }
            }
            EventKind::Remove(kind) => {
                let hint = remove_hint(kind);
                for path in utf8_paths(event) {
                    out.push(Self::hinted(path, FileAction::Deleted, hint));
                }
            }
            EventKind::Modify(ModifyKind::Name(mode)) => {
                let mut paths = utf8_paths(event);
                match mode {
                    RenameMode::Both | RenameMode::Any if paths.len() >= 2 => {
                        let dest = paths.pop();
                        if let Some(source) = paths.pop() {
                            out.push(Self {
                                path: source,
                                action: FileAction::Moved,
                                dest,
                                kind_hint: None,
                            });
                        }
                    }
                    RenameMode::From => {
                        for path in paths {
                            out.push(Self::new(path, FileAction::Deleted));
                        }
                    }
                    RenameMode::To => {
                        for path in paths {
                            out.push(Self::new(path, FileAction::Created));
                        }
                    }
                    _ => {
                        for path in paths {
                            out.push(Self::new(path, FileAction::Modified));
                        }
                    }
                }
            }
            EventKind::Modify(_) => {
                for path in utf8_paths(event) {
                    out.push(Self::new(path, FileAction::Modified));
                }
            }
            EventKind::Access(_) | EventKind::Any | EventKind::Other => {}
        }

        out
    }
}

const fn create_hint(kind: CreateKind) -> Option<EntityKind> {
    match kind {
        CreateKind::File => Some(EntityKind::File),
        CreateKind::Folder => Some(EntityKind::Folder),
        CreateKind::Any | CreateKind::Other => None,
    }
}

const fn remove_hint(kind: RemoveKind) -> Option<EntityKind> {
    match kind {
        RemoveKind::File => Some(EntityKind::File),
        RemoveKind::Folder => Some(EntityKind::Folder),
        RemoveKind::Any | RemoveKind::Other => None,
    }
}

/// Converts event paths to UTF-8, logging and skipping any that are not.
fn utf8_paths(event: &notify::Event) -> SmallVec<[Utf8PathBuf; 2]> {
    event
        .paths
        .iter()
        .filter_map(|path| match Utf8PathBuf::try_from(path.clone()) {
            Ok(p) => Some(p),
            Err(e) => {
                warn!(
                    path = %e.as_path().display(),
                    "Skipping non-UTF-8 path in file event"
                );
                None
            }
        })
        .collect()
}

/// Turns raw changes into typed [`FsEvent`]s.
///
/// Content reads happen here, on the watcher thread, so a slow read can
/// never stall rendering of events from other watchers.
#[derive(Debug, Clone, Copy)]
pub struct Classifier {
    read_content: bool,
    max_content_bytes: usize,
}

impl Classifier {
    /// Creates a classifier with explicit settings.
    #[inline]
    #[must_use]
    pub const fn new(read_content: bool, max_content_bytes: usize) -> Self {
        Self {
            read_content,
            max_content_bytes,
        }
    }

    /// Creates a classifier from a resolved watch target.
    #[inline]
    #[must_use]
    pub const fn for_spec(spec: &PathSpec) -> Self {
        Self::new(spec.read_content, spec.max_content_bytes)
    }

    /// Classifies one raw change.
    ///
    /// The entity kind is the backend's hint when it carried one, otherwise
    /// it comes from re-stat'ing the path now: a path that resolves to a
    /// regular file is [`EntityKind::File`], anything else (including a path
    /// that no longer exists) is [`EntityKind::Folder`]. A created/modified
    /// path that has vanished is demoted to deleted. Content is sampled only
    /// from the source entity, only for files, and never for deletions; any
    /// read failure degrades to empty content.
    #[must_use]
    pub fn classify(&self, raw: RawChange) -> FsEvent {
        let mut action = raw.action;
        if matches!(action, FileAction::Created | FileAction::Modified) && !raw.path.exists() {
            // The path vanished between notification and classification.
            debug!(path = %raw.path, "path gone before classification, reporting deleted");
            action = FileAction::Deleted;
        }

        let kind = raw.kind_hint.unwrap_or_else(|| kind_of(&raw.path));
        let content = if self.read_content
            && kind == EntityKind::File
            && action != FileAction::Deleted
        {
            self.read_sample(&raw.path)
        } else {
            String::new()
        };
        let source = FileEntity::with_content(raw.path, kind, content);

        match (action, raw.dest) {
            (FileAction::Moved, Some(dest)) => {
                // The destination is never content-sampled; only the source
                // feeds the template binding.
                let dest_kind = kind_of(&dest);
                FsEvent::moved(source, FileEntity::new(dest, dest_kind))
            }
            (action, _) => FsEvent::new(action, source),
        }
    }

    /// Reads up to `max_content_bytes` from the file, lossily decoded.
    ///
    /// Failures (missing file, permission denied) are logged at debug level
    /// only and degrade to an empty string; they never fail the event.
    fn read_sample(&self, path: &Utf8Path) -> String {
        let mut buf = Vec::new();
        let result = std::fs::File::open(path).and_then(|file| {
            file.take(self.max_content_bytes as u64)
                .read_to_end(&mut buf)
        });

        match result {
            Ok(_) => String::from_utf8_lossy(&buf).into_owned(),
            Err(error) => {
                debug!(path = %path, %error, "content read failed, rendering empty content");
                String::new()
            }
        }
    }
}

fn kind_of(path: &Utf8Path) -> EntityKind {
    if path.is_file() {
        EntityKind::File
    } else {
        EntityKind::Folder
    }
}
