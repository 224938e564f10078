//! Directory watching, event classification, and filtering for fwbar.
//!
//! This crate turns native filesystem notifications into typed
//! [`FsEvent`](fw_core::FsEvent)s and hands them to a single consumer over a
//! bounded channel.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────┐
//! │              Blocking Thread per PathSpec (spawn_blocking)      │
//! │  ┌──────────────────┐   ┌────────────┐   ┌─────────────────┐   │
//! │  │ RecommendedWatcher│ ->│ GlobFilter │ ->│ Classifier      │   │
//! │  │ (notify)         │   │ (incl/excl)│   │ (kind, content) │   │
//! │  └──────────────────┘   └────────────┘   └────────┬────────┘   │
//! └───────────────────────────────────────────────────│────────────┘
//!                                       blocking_send │
//!                                                     ▼
//! ┌─────────────────────────────────────────────────────────────────┐
//! │                    Async Runtime (tokio)                        │
//! │  ┌──────────────────┐   ┌────────────────┐                      │
//! │  │ WatcherPool      │   │ mpsc::Receiver │ -> label pipeline    │
//! │  │ (shutdown ctrl)  │   │ (WatchEvent)   │                      │
//! │  └──────────────────┘   └────────────────┘                      │
//! └─────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Events from the same watcher preserve their relative order on the channel;
//! no ordering is guaranteed across watchers, and none is needed since each
//! event renders independently.
//!
//! # Usage
//!
//! ```no_run
//! use std::time::Duration;
//!
//! use fw_core::WatchEntry;
//! use fw_watcher::{PathSpec, WatcherPool, EVENT_CHANNEL_CAPACITY};
//! use tokio::sync::mpsc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let entry = WatchEntry {
//!         directory: "~/notes".to_owned(),
//!         ..WatchEntry::default()
//!     };
//!     let spec = PathSpec::resolve(&entry, 0)?;
//!
//!     let (tx, mut rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
//!     let pool = WatcherPool::start(vec![spec], tx).await?;
//!
//!     while let Some(event) = rx.recv().await {
//!         println!("{} {}", event.event.action, event.event.source.name());
//!     }
//!
//!     pool.stop_all(Duration::from_secs(2)).await;
//!     Ok(())
//! }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod classify;
pub mod error;
pub mod filter;
pub mod pathspec;
pub mod watcher;

// Re-export error types
pub use error::WatchError;

// Re-export resolution types
pub use pathspec::PathSpec;

// Re-export filter types
pub use filter::{AcceptAll, GlobFilter, PathFilter};

// Re-export classification types
pub use classify::{Classifier, RawChange};

// Re-export watcher types
pub use watcher::{DirectoryWatcher, WatchEvent, WatcherPool, EVENT_CHANNEL_CAPACITY};
