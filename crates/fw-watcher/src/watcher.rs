//! Directory watchers with async event streaming.
//!
//! This module bridges the synchronous `notify` crate to the tokio runtime.
//! Each [`DirectoryWatcher`] owns one blocking task running the native
//! watcher for one resolved [`PathSpec`]; filtering and classification happen
//! on that task, and finished [`WatchEvent`]s cross into async code over a
//! bounded mpsc channel via `blocking_send`. A [`WatcherPool`] starts one
//! watcher per spec and shuts them all down together.
//!
//! Backpressure is deliberate: when the channel is full the watcher thread
//! blocks, so a slow consumer throttles notification intake instead of
//! growing an unbounded queue.

use std::sync::Arc;
use std::time::Duration;

use camino::Utf8Path;
use fw_core::{EntityKind, FsEvent};
use notify::{RecursiveMode, Watcher};
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, trace, warn};

use crate::classify::{Classifier, RawChange};
use crate::error::WatchError;
use crate::filter::GlobFilter;
use crate::pathspec::PathSpec;

/// Default capacity of the shared event channel.
///
/// Sized for bursts (an editor save fanning out into dozens of events)
/// while keeping the backpressure point close to the producer.
pub const EVENT_CHANNEL_CAPACITY: usize = 256;

/// A classified event paired with the watch target that produced it.
///
/// The spec travels with the event so the consumer can reach the target's
/// label templates without a lookup.
#[derive(Debug, Clone)]
pub struct WatchEvent {
    /// The resolved watch target this event came from.
    pub spec: Arc<PathSpec>,

    /// The classified filesystem event.
    pub event: FsEvent,
}

/// A watcher for a single resolved watch target.
///
/// # Lifecycle
///
/// 1. **Start**: [`DirectoryWatcher::start`] validates the directory, then
///    spawns a blocking task running the notify watcher. Starting a watcher
///    that is already running is a no-op.
///
/// 2. **Events**: the blocking task filters, classifies, and forwards events
///    on the channel handed to `start`. Several watchers may share one
///    channel; events from one watcher keep their relative order, no order
///    holds across watchers.
///
/// 3. **Shutdown**: call [`DirectoryWatcher::stop`] for a bounded graceful
///    shutdown, or drop the watcher. Dropping signals the blocking task and
///    lets it wind down on its own.
pub struct DirectoryWatcher {
    /// The resolved watch target.
    spec: Arc<PathSpec>,

    /// Shutdown signal sender.
    ///
    /// Sending on this channel signals the blocking task to stop.
    /// Set to `None` while the watcher is stopped.
    shutdown_tx: Option<oneshot::Sender<()>>,

    /// Handle to the blocking watcher task.
    task_handle: Option<JoinHandle<Result<(), WatchError>>>,
}

impl std::fmt::Debug for DirectoryWatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DirectoryWatcher")
            .field("directory", &self.spec.directory)
            .field("is_running", &self.is_running())
            .finish_non_exhaustive()
    }
}

impl DirectoryWatcher {
    /// Creates a stopped watcher for one resolved watch target.
    #[must_use]
    pub const fn new(spec: Arc<PathSpec>) -> Self {
        Self {
            spec,
            shutdown_tx: None,
            task_handle: None,
        }
    }

    /// Starts watching, sending events on `event_tx`.
    ///
    /// The directory must exist at start time; it is canonicalized so log
    /// lines carry the real path. Calling `start` while the watcher is
    /// already running does nothing.
    ///
    /// # Errors
    ///
    /// Returns [`WatchError::PathNotFound`] if the directory does not exist
    /// and [`WatchError::Notify`] if the native watcher fails to initialize.
    #[allow(clippy::unused_async)] // Async for API consistency with stop()
    pub async fn start(&mut self, event_tx: mpsc::Sender<WatchEvent>) -> Result<(), WatchError> {
        if self.is_running() {
            debug!(directory = %self.spec.directory, "watcher already running");
            return Ok(());
        }

        if !self.spec.directory.exists() {
            return Err(WatchError::path_not_found(self.spec.directory.clone()));
        }

        let directory = self
            .spec
            .directory
            .canonicalize_utf8()
            .map_err(WatchError::Io)?;

        let (shutdown_tx, shutdown_rx) = oneshot::channel();

        let spec = Arc::clone(&self.spec);
        let task_handle = tokio::task::spawn_blocking(move || {
            run_watch_loop(spec, directory, event_tx, shutdown_rx)
        });

        self.shutdown_tx = Some(shutdown_tx);
        self.task_handle = Some(task_handle);
        Ok(())
    }

    /// Returns the directory being watched.
    #[must_use]
    pub fn directory(&self) -> &Utf8Path {
        &self.spec.directory
    }

    /// Returns `true` if the blocking task is still running.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.shutdown_tx.is_some() && self.task_handle.as_ref().is_some_and(|h| !h.is_finished())
    }

    /// Gracefully stops the watcher, waiting at most `timeout`.
    ///
    /// A watcher that fails to wind down within the timeout is detached and
    /// left to finish on its own; an error from the blocking task is logged,
    /// not returned, since at stop time there is nothing left to recover.
    /// Stopping a stopped watcher is a no-op.
    pub async fn stop(&mut self, timeout: Duration) {
        if let Some(tx) = self.shutdown_tx.take() {
            // Ignore error if receiver is already dropped
            let _ = tx.send(());
        }

        if let Some(handle) = self.task_handle.take() {
            match tokio::time::timeout(timeout, handle).await {
                Ok(Ok(Ok(()))) => {}
                Ok(Ok(Err(error))) => {
                    warn!(directory = %self.spec.directory, %error, "watcher exited with error");
                }
                Ok(Err(join_error)) => {
                    warn!(directory = %self.spec.directory, %join_error, "watcher task failed");
                }
                Err(_) => {
                    // A blocking task cannot be aborted; dropping the handle
                    // detaches it and the thread exits once the backend
                    // returns.
                    warn!(
                        directory = %self.spec.directory,
                        "watcher did not stop in time, detaching"
                    );
                }
            }
        }
    }
}

impl Drop for DirectoryWatcher {
    fn drop(&mut self) {
        // Send shutdown signal on drop
        if let Some(tx) = self.shutdown_tx.take() {
            let _ = tx.send(());
        }
        // Note: We don't await the task here since Drop is sync.
        // The task will stop when it receives the shutdown signal.
    }
}

/// The set of watchers for one configuration.
///
/// A target that fails to start is logged and skipped so one bad entry never
/// takes down the rest; starting fails only when no target could be watched
/// at all.
#[derive(Debug)]
pub struct WatcherPool {
    watchers: Vec<DirectoryWatcher>,
}

impl WatcherPool {
    /// Starts one watcher per spec, all sending on `event_tx`.
    ///
    /// # Errors
    ///
    /// Returns the last start error when specs were given but none of them
    /// could be watched.
    pub async fn start(
        specs: Vec<PathSpec>,
        event_tx: mpsc::Sender<WatchEvent>,
    ) -> Result<Self, WatchError> {
        let mut watchers = Vec::with_capacity(specs.len());
        let mut last_error = None;

        for spec in specs {
            let mut watcher = DirectoryWatcher::new(Arc::new(spec));
            match watcher.start(event_tx.clone()).await {
                Ok(()) => watchers.push(watcher),
                Err(error) => {
                    warn!(directory = %watcher.directory(), %error, "skipping watch target");
                    last_error = Some(error);
                }
            }
        }

        if watchers.is_empty() {
            if let Some(error) = last_error {
                return Err(error);
            }
        }

        Ok(Self { watchers })
    }

    /// Returns the number of running watchers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.watchers.len()
    }

    /// Returns `true` if no watcher was started.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.watchers.is_empty()
    }

    /// Stops every watcher, waiting at most `timeout` for each.
    pub async fn stop_all(mut self, timeout: Duration) {
        for watcher in &mut self.watchers {
            watcher.stop(timeout).await;
        }
    }
}

/// Applies the include/ignore globs to one raw change.
///
/// Any endpoint may satisfy the includes, so a rename into or out of the
/// matched set is still reported. An ignore hit on either endpoint vetoes
/// the whole event: an ignored path never surfaces, not even as the source
/// of a rename to a clean name.
fn event_passes(filter: &GlobFilter, raw: &RawChange) -> bool {
    let dest = raw.dest.as_deref();
    let included =
        filter.is_included(&raw.path) || dest.is_some_and(|d| filter.is_included(d));
    let ignored = filter.is_ignored(&raw.path) || dest.is_some_and(|d| filter.is_ignored(d));
    included && !ignored
}

/// Runs the notify watcher in a blocking context.
///
/// The notify callback does all per-event work: flatten, filter, classify,
/// and forward. The function itself only installs the watch and then parks
/// on the shutdown channel.
#[allow(clippy::needless_pass_by_value)] // Values must be owned for the blocking task lifetime
fn run_watch_loop(
    spec: Arc<PathSpec>,
    directory: camino::Utf8PathBuf,
    event_tx: mpsc::Sender<WatchEvent>,
    shutdown_rx: oneshot::Receiver<()>,
) -> Result<(), WatchError> {
    let classifier = Classifier::for_spec(&spec);
    let recursive = spec.recursive;

    let tx = event_tx;
    let handler_spec = Arc::clone(&spec);
    let mut watcher =
        notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
            let event = match res {
                Ok(event) => event,
                Err(error) => {
                    warn!(error = %error, "watch backend error");
                    return;
                }
            };

            for raw in RawChange::from_notify(&event) {
                if !event_passes(handler_spec.filter(), &raw) {
                    trace!(path = %raw.path, "Filtered out file event");
                    continue;
                }

                let fs_event = classifier.classify(raw);

                // A flat watch reports file changes only. The kind carries
                // the backend's hint, so a deleted file is not mistaken for
                // a folder just because the path no longer stats.
                if !recursive && fs_event.source.kind == EntityKind::Folder {
                    trace!(path = %fs_event.source.path, "dropping folder event on flat watch");
                    continue;
                }

                let envelope = WatchEvent {
                    spec: Arc::clone(&handler_spec),
                    event: fs_event,
                };

                // Send via blocking_send for sync context
                if tx.blocking_send(envelope).is_err() {
                    debug!("Event channel closed, stopping watcher");
                    break;
                }
            }
        })?;

    let mode = if recursive {
        RecursiveMode::Recursive
    } else {
        RecursiveMode::NonRecursive
    };

    watcher.watch(directory.as_std_path(), mode)?;

    info!(directory = %directory, recursive, "directory watcher started");

    // Block until shutdown signal is received
    // Using blocking_recv since we're in a sync context
    let _ = shutdown_rx.blocking_recv();

    info!(directory = %directory, "directory watcher stopped");

    Ok(())
}
