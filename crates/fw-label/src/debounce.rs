//! Consumer-side event debouncing.
//!
//! Bursts of filesystem events collapse to a single render: the first event
//! of a burst arms a deadline, later events overwrite the pending one without
//! touching the deadline, and whatever is pending when the deadline passes is
//! emitted. Keeping the deadline fixed bounds render latency under a
//! continuous stream of events; a debouncer that restarted its timer on every
//! event would starve the display for as long as the stream lasts.
//!
//! The type is a pure state machine over [`Instant`] so it can be driven by
//! the pipeline's `select!` loop and tested without waiting on real time.

use fw_watcher::WatchEvent;
use tokio::time::{Duration, Instant};

/// A single-slot, last-event-wins debouncer.
#[derive(Debug)]
pub struct Debouncer {
    interval: Duration,
    pending: Option<(WatchEvent, Instant)>,
}

impl Debouncer {
    /// Creates a debouncer with the given coalescing interval.
    #[must_use]
    pub const fn new(interval: Duration) -> Self {
        Self {
            interval,
            pending: None,
        }
    }

    /// Offers an event.
    ///
    /// When idle, the event becomes pending and the deadline is armed at
    /// `now + interval`. When already pending, the event replaces the
    /// pending one and the deadline stays where it is.
    pub fn offer(&mut self, event: WatchEvent, now: Instant) {
        match &mut self.pending {
            Some((slot, _)) => *slot = event,
            None => self.pending = Some((event, now + self.interval)),
        }
    }

    /// Returns the armed deadline, if an event is pending.
    #[must_use]
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|(_, deadline)| *deadline)
    }

    /// Returns `true` if an event is pending.
    #[must_use]
    pub const fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Takes the pending event if its deadline has passed.
    #[must_use]
    pub fn take_due(&mut self, now: Instant) -> Option<WatchEvent> {
        if self
            .pending
            .as_ref()
            .is_some_and(|(_, deadline)| *deadline <= now)
        {
            self.pending.take().map(|(event, _)| event)
        } else {
            None
        }
    }

    /// Drops any pending event and disarms the deadline.
    pub fn clear(&mut self) {
        self.pending = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use fw_core::{EntityKind, FileAction, FileEntity, FsEvent, WatchEntry};
    use fw_watcher::PathSpec;
    use std::sync::Arc;

    fn event(name: &str) -> WatchEvent {
        let entry = WatchEntry {
            directory: "/tmp".to_owned(),
            ..WatchEntry::default()
        };
        WatchEvent {
            spec: Arc::new(PathSpec::resolve(&entry, 0).expect("resolve")),
            event: FsEvent::new(
                FileAction::Created,
                FileEntity::new(Utf8PathBuf::from(format!("/tmp/{name}")), EntityKind::File),
            ),
        }
    }

    const INTERVAL: Duration = Duration::from_millis(50);

    #[test]
    fn test_idle_has_no_deadline() {
        let mut debouncer = Debouncer::new(INTERVAL);
        assert!(debouncer.deadline().is_none());
        assert!(!debouncer.is_pending());
        assert!(debouncer.take_due(Instant::now()).is_none());
    }

    #[test]
    fn test_single_event_due_after_interval() {
        let mut debouncer = Debouncer::new(INTERVAL);
        let start = Instant::now();

        debouncer.offer(event("a.txt"), start);
        assert_eq!(debouncer.deadline(), Some(start + INTERVAL));

        assert!(debouncer.take_due(start + INTERVAL / 2).is_none());

        let due = debouncer.take_due(start + INTERVAL).expect("due");
        assert_eq!(due.event.source.name(), "a.txt");
        assert!(!debouncer.is_pending());
    }

    #[test]
    fn test_burst_collapses_to_last_event() {
        let mut debouncer = Debouncer::new(INTERVAL);
        let start = Instant::now();

        debouncer.offer(event("first.txt"), start);
        debouncer.offer(event("second.txt"), start + Duration::from_millis(10));
        debouncer.offer(event("third.txt"), start + Duration::from_millis(20));

        let due = debouncer.take_due(start + INTERVAL).expect("due");
        assert_eq!(due.event.source.name(), "third.txt");
    }

    #[test]
    fn test_later_events_do_not_extend_deadline() {
        let mut debouncer = Debouncer::new(INTERVAL);
        let start = Instant::now();

        debouncer.offer(event("a.txt"), start);
        debouncer.offer(event("b.txt"), start + Duration::from_millis(49));

        // Still due at the original deadline.
        assert!(debouncer.take_due(start + INTERVAL).is_some());
    }

    #[test]
    fn test_next_burst_rearms() {
        let mut debouncer = Debouncer::new(INTERVAL);
        let start = Instant::now();

        debouncer.offer(event("a.txt"), start);
        let _ = debouncer.take_due(start + INTERVAL);

        let later = start + INTERVAL * 3;
        debouncer.offer(event("b.txt"), later);
        assert_eq!(debouncer.deadline(), Some(later + INTERVAL));
    }

    #[test]
    fn test_clear_drops_pending() {
        let mut debouncer = Debouncer::new(INTERVAL);
        let start = Instant::now();
        debouncer.offer(event("a.txt"), start);

        debouncer.clear();
        assert!(debouncer.take_due(start + INTERVAL * 2).is_none());
    }
}
