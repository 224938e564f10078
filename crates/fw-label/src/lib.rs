//! Label rendering for fwbar: debouncing, templates, and reconciliation.
//!
//! This crate is the consumer side of the event channel. It turns
//! [`WatchEvent`](fw_watcher::WatchEvent)s into styled label parts and pushes
//! them onto a host-provided [`LabelSurface`], coalescing bursts with a
//! fixed-deadline [`Debouncer`] and hiding the label again after a quiet
//! period via [`IdleClear`].
//!
//! # Pipeline
//!
//! ```text
//! mpsc::Receiver<WatchEvent>
//!         │
//!         ▼
//!   ┌───────────┐ deadline ┌───────────────┐       ┌──────────────┐
//!   │ Debouncer │ ───────> │ LabelRenderer │ ────> │ LabelSurface │
//!   └───────────┘          │  template     │ parts │ (host UI)    │
//!         ▲                │  truncate     │       └──────────────┘
//!  IdleClear rearm         │  split        │
//!  (clear after quiet)     └───────────────┘
//! ```
//!
//! All of this state lives on one task inside [`LabelPipeline::run`]; there
//! are no locks and no shared mutability.
//!
//! # Usage
//!
//! ```no_run
//! use fw_core::WatcherConfig;
//! use fw_label::{LabelPipeline, LabelPart, LabelSurface};
//! use fw_watcher::EVENT_CHANNEL_CAPACITY;
//! use tokio::sync::mpsc;
//! use tokio_util::sync::CancellationToken;
//!
//! struct PrintSurface;
//!
//! impl LabelSurface for PrintSurface {
//!     fn set_part(&mut self, index: usize, part: &LabelPart) {
//!         println!("[{index}] {} ({})", part.text, part.class);
//!     }
//!     fn hide_part(&mut self, _index: usize) {}
//!     fn set_visible(&mut self, _visible: bool) {}
//! }
//!
//! # async fn example(config: WatcherConfig) {
//! let (_tx, rx) = mpsc::channel(EVENT_CHANNEL_CAPACITY);
//! let shutdown = CancellationToken::new();
//!
//! let pipeline = LabelPipeline::new(&config, PrintSurface);
//! pipeline.run(rx, shutdown).await;
//! # }
//! ```

#![deny(clippy::all)]
#![warn(missing_docs)]

pub mod debounce;
pub mod idle;
pub mod parts;
pub mod pipeline;
pub mod render;
pub mod template;

// Re-export timing types
pub use debounce::Debouncer;
pub use idle::IdleClear;

// Re-export rendering types
pub use parts::{split_label_parts, truncate_parts, LabelPart};
pub use render::{LabelRenderer, LabelSurface};
pub use template::{render_template, truncate_label};

// Re-export the consumer loop
pub use pipeline::LabelPipeline;
