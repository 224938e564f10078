//! Label rendering and part reconciliation.
//!
//! [`LabelSurface`] is the seam to the host UI: anything that can show an
//! indexed row of styled text segments and toggle its own visibility can
//! display labels. [`LabelRenderer`] drives a surface by position, reusing
//! part slots across renders and hiding surplus slots instead of destroying
//! them, so the host never has to rebuild its widget row.

use tracing::trace;

use crate::parts::{split_label_parts, truncate_parts, LabelPart};
use crate::template::render_template;
use fw_watcher::WatchEvent;

/// The host-UI seam.
///
/// Part indices are stable within a render: index 0 is the leftmost segment.
/// `set_part` on an index that was previously hidden shows it again.
pub trait LabelSurface {
    /// Shows `part` at `index`.
    fn set_part(&mut self, index: usize, part: &LabelPart);

    /// Hides the slot at `index`, keeping it available for reuse.
    fn hide_part(&mut self, index: usize);

    /// Shows or hides the whole element.
    fn set_visible(&mut self, visible: bool);
}

/// Renders events onto a [`LabelSurface`].
///
/// An event whose template is empty (or renders to whitespace only) hides
/// the element for that render; the next non-empty render shows it again.
#[derive(Debug)]
pub struct LabelRenderer {
    max_length: Option<usize>,
    shown_parts: usize,
    visible: bool,
}

impl LabelRenderer {
    /// Creates a renderer; `max_length` of `None` disables truncation.
    ///
    /// The limit counts visible characters across all parts; icon markup
    /// never counts toward it and is never cut.
    #[must_use]
    pub const fn new(max_length: Option<usize>) -> Self {
        Self {
            max_length,
            shown_parts: 0,
            visible: false,
        }
    }

    /// Renders one event.
    ///
    /// Template lookup uses the event's entity kind and action against the
    /// originating watch target's templates.
    pub fn render<S: LabelSurface>(&mut self, event: &WatchEvent, surface: &mut S) {
        let template = event
            .spec
            .labels
            .template_for(event.event.source.kind, event.event.action);

        let text = render_template(template, &event.event);

        // Split before truncating so the length cap applies to visible
        // characters and can never cut through span markup.
        let mut parts = split_label_parts(&text);
        if let Some(max) = self.max_length {
            truncate_parts(&mut parts, max);
        }
        trace!(label = %text, parts = parts.len(), "rendering label");

        if parts.is_empty() {
            self.clear(surface);
            return;
        }

        for (index, part) in parts.iter().enumerate() {
            surface.set_part(index, part);
        }
        for index in parts.len()..self.shown_parts {
            surface.hide_part(index);
        }
        self.shown_parts = parts.len();

        if !self.visible {
            surface.set_visible(true);
            self.visible = true;
        }
    }

    /// Hides every shown part and the element itself.
    pub fn clear<S: LabelSurface>(&mut self, surface: &mut S) {
        for index in 0..self.shown_parts {
            surface.hide_part(index);
        }
        self.shown_parts = 0;

        if self.visible {
            surface.set_visible(false);
            self.visible = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use camino::Utf8PathBuf;
    use fw_core::{
        ActionTemplates, EntityKind, FileAction, FileEntity, FsEvent, LabelTemplates, WatchEntry,
    };
    use fw_watcher::PathSpec;
    use std::sync::Arc;

    /// Records surface calls for assertions.
    #[derive(Debug, Default)]
    struct TestSurface {
        parts: Vec<Option<LabelPart>>,
        visible: bool,
    }

    impl LabelSurface for TestSurface {
        fn set_part(&mut self, index: usize, part: &LabelPart) {
            if self.parts.len() <= index {
                self.parts.resize(index + 1, None);
            }
            self.parts[index] = Some(part.clone());
        }

        fn hide_part(&mut self, index: usize) {
            if let Some(slot) = self.parts.get_mut(index) {
                *slot = None;
            }
        }

        fn set_visible(&mut self, visible: bool) {
            self.visible = visible;
        }
    }

    fn spec_with_file_template(created: &str) -> Arc<PathSpec> {
        let entry = WatchEntry {
            directory: "/tmp".to_owned(),
            labels: LabelTemplates {
                file: ActionTemplates {
                    created: created.to_owned(),
                    ..ActionTemplates::default()
                },
                ..LabelTemplates::default()
            },
            ..WatchEntry::default()
        };
        Arc::new(PathSpec::resolve(&entry, 0).expect("resolve"))
    }

    fn created_event(spec: &Arc<PathSpec>, path: &str) -> WatchEvent {
        WatchEvent {
            spec: Arc::clone(spec),
            event: FsEvent::new(
                FileAction::Created,
                FileEntity::new(Utf8PathBuf::from(path), EntityKind::File),
            ),
        }
    }

    #[test]
    fn test_render_plain_template() {
        let spec = spec_with_file_template("{action} {name}");
        let mut renderer = LabelRenderer::new(None);
        let mut surface = TestSurface::default();

        renderer.render(&created_event(&spec, "/tmp/a.txt"), &mut surface);

        assert!(surface.visible);
        assert_eq!(surface.parts.len(), 1);
        let part = surface.parts[0].as_ref().expect("part shown");
        assert_eq!(part.text, "created a.txt");
        assert_eq!(part.class, "label");
    }

    #[test]
    fn test_render_truncates() {
        let spec = spec_with_file_template("{action} {name}");
        let mut renderer = LabelRenderer::new(Some(5));
        let mut surface = TestSurface::default();

        renderer.render(&created_event(&spec, "/tmp/a.txt"), &mut surface);

        let part = surface.parts[0].as_ref().expect("part shown");
        assert_eq!(part.text, "creat...");
    }

    #[test]
    fn test_truncation_preserves_icon_markup() {
        let spec = spec_with_file_template(r#"<span class="i">X</span> {name}"#);
        let mut renderer = LabelRenderer::new(Some(3));
        let mut surface = TestSurface::default();

        renderer.render(&created_event(&spec, "/tmp/a.txt"), &mut surface);

        // A raw character cap would slice into the span tag itself; the
        // icon must come through whole, with only the text part cut.
        let icon = surface.parts[0].as_ref().expect("icon part");
        assert_eq!(icon.text, "X");
        assert_eq!(icon.class, "icon i");

        let text = surface.parts[1].as_ref().expect("text part");
        assert_eq!(text.text, " a...");
        assert!(!text.text.contains("<span"));
    }

    #[test]
    fn test_surplus_parts_hidden_not_destroyed() {
        let spec_iconed = spec_with_file_template(r#"<span class="i">X</span> {name}"#);
        let spec_plain = spec_with_file_template("{name}");
        let mut renderer = LabelRenderer::new(None);
        let mut surface = TestSurface::default();

        renderer.render(&created_event(&spec_iconed, "/tmp/a.txt"), &mut surface);
        assert_eq!(surface.parts.iter().flatten().count(), 2);

        renderer.render(&created_event(&spec_plain, "/tmp/b.txt"), &mut surface);
        assert_eq!(surface.parts.iter().flatten().count(), 1);
        // The slot itself survives for reuse.
        assert_eq!(surface.parts.len(), 2);
        assert!(surface.visible);
    }

    #[test]
    fn test_empty_template_hides_element() {
        let spec = spec_with_file_template("{action} {name}");
        let empty = spec_with_file_template("");
        let mut renderer = LabelRenderer::new(None);
        let mut surface = TestSurface::default();

        renderer.render(&created_event(&spec, "/tmp/a.txt"), &mut surface);
        assert!(surface.visible);

        renderer.render(&created_event(&empty, "/tmp/a.txt"), &mut surface);
        assert!(!surface.visible);
        assert_eq!(surface.parts.iter().flatten().count(), 0);
    }

    #[test]
    fn test_clear_hides_everything() {
        let spec = spec_with_file_template("{name}");
        let mut renderer = LabelRenderer::new(None);
        let mut surface = TestSurface::default();

        renderer.render(&created_event(&spec, "/tmp/a.txt"), &mut surface);
        renderer.clear(&mut surface);

        assert!(!surface.visible);
        assert_eq!(surface.parts.iter().flatten().count(), 0);
    }

    #[test]
    fn test_clear_when_already_hidden_is_noop() {
        let mut renderer = LabelRenderer::new(None);
        let mut surface = TestSurface::default();
        renderer.clear(&mut surface);
        assert!(!surface.visible);
    }
}
