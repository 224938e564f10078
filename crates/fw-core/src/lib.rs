//! Core types, configuration, and errors for the fwbar file watcher.
//!
//! This crate provides the foundational types used across the workspace:
//!
//! - Configuration structures for watch targets and display tunables
//! - The [`ConfigError`] taxonomy for setup-time failures
//! - Domain types: [`EntityKind`], [`FileAction`], [`FileEntity`], [`FsEvent`]
//!
//! # Crate Dependencies
//!
//! ```text
//! fw-cli ──► fw-label ──► fw-core
//!        ├─► fw-watcher ──────►
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod config;
pub mod error;
pub mod types;

// Re-export configuration types
pub use config::{
    ActionTemplates, LabelTemplates, WatchEntry, WatcherConfig, DEFAULT_DEBOUNCE_MS,
    DEFAULT_MAX_CONTENT_BYTES, MIN_CLEAR_INTERVAL_MS,
};

// Re-export error types
pub use error::ConfigError;

// Re-export domain types
pub use types::{EntityKind, FileAction, FileEntity, FsEvent};
