//! The single-consumer render loop.
//!
//! One pipeline task owns the receiver, the debouncer, the idle timer, the
//! renderer, and the surface. Nothing here is shared or locked; watchers
//! influence the display only through the channel, and the `select!` loop
//! serializes events against both timers.
//!
//! Shutdown is via [`CancellationToken`]: the loop stops receiving, discards
//! anything still queued, disarms both timers, and clears the surface, so
//! nothing renders after `run` returns.

use fw_core::WatcherConfig;
use fw_watcher::WatchEvent;
use tokio::sync::mpsc;
use tokio::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::debounce::Debouncer;
use crate::idle::IdleClear;
use crate::render::{LabelRenderer, LabelSurface};

/// The render loop and the state it owns.
#[derive(Debug)]
pub struct LabelPipeline<S> {
    renderer: LabelRenderer,
    debouncer: Debouncer,
    idle: IdleClear,
    surface: S,
}

impl<S: LabelSurface> LabelPipeline<S> {
    /// Builds a pipeline from the shared display settings.
    #[must_use]
    pub fn new(config: &WatcherConfig, surface: S) -> Self {
        Self {
            renderer: LabelRenderer::new(config.label_max_length),
            debouncer: Debouncer::new(Duration::from_millis(config.debounce_ms)),
            idle: IdleClear::new(config.clear_labels_after_ms.map(Duration::from_millis)),
            surface,
        }
    }

    /// Runs the loop until cancellation or until every sender is gone.
    ///
    /// Returns the surface so the host can inspect or reuse it.
    pub async fn run(
        mut self,
        mut events: mpsc::Receiver<WatchEvent>,
        shutdown: CancellationToken,
    ) -> S {
        loop {
            tokio::select! {
                () = shutdown.cancelled() => {
                    debug!("label pipeline shutting down");
                    break;
                }

                received = events.recv() => match received {
                    Some(event) => self.debouncer.offer(event, Instant::now()),
                    None => {
                        debug!("all watchers gone, label pipeline stopping");
                        break;
                    }
                },

                () = sleep_until_opt(self.debouncer.deadline()) => {
                    let now = Instant::now();
                    if let Some(event) = self.debouncer.take_due(now) {
                        self.renderer.render(&event, &mut self.surface);
                        self.idle.rearm(now);
                    }
                }

                () = sleep_until_opt(self.idle.deadline()) => {
                    if self.idle.take_due(Instant::now()) {
                        self.renderer.clear(&mut self.surface);
                    }
                }
            }
        }

        // Discard anything still in flight; it must not render post-shutdown.
        events.close();
        while events.try_recv().is_ok() {}
        self.debouncer.clear();
        self.idle.disarm();
        self.renderer.clear(&mut self.surface);

        self.surface
    }
}

/// Sleeps until the deadline, or forever when there is none.
async fn sleep_until_opt(deadline: Option<Instant>) {
    match deadline {
        Some(deadline) => tokio::time::sleep_until(deadline).await,
        None => std::future::pending().await,
    }
}
