//! Label part splitting.
//!
//! A rendered label may embed icon markup of the form
//! `<span class="icon-name">X</span>`. The host surface styles icons and
//! plain text differently, so the label is segmented into [`LabelPart`]s
//! before it is handed over: span segments carry an `icon` class (plus the
//! custom class from the markup), plain segments carry `label`.

use std::sync::LazyLock;

use regex::Regex;
use smallvec::SmallVec;

use crate::template::truncate_label;

/// Class assigned to plain text segments.
const TEXT_CLASS: &str = "label";

/// Base class assigned to span segments.
const ICON_CLASS: &str = "icon";

static SPAN_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // the pattern is a string literal
    Regex::new(r#"<span(?:\s+class=(?:"([^"]*)"|'([^']*)'))?\s*>([^<]*)</span>"#)
        .expect("span pattern compiles")
});

/// One styled segment of a rendered label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelPart {
    /// The visible text of the segment.
    pub text: String,

    /// Style class for the host surface, `label` or `icon <custom>`.
    pub class: String,
}

impl LabelPart {
    fn text_part(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            class: TEXT_CLASS.to_owned(),
        }
    }

    fn icon_part(text: &str, custom_class: Option<&str>) -> Self {
        let class = match custom_class {
            Some(custom) if !custom.trim().is_empty() => format!("{ICON_CLASS} {custom}"),
            _ => ICON_CLASS.to_owned(),
        };
        Self {
            text: text.to_owned(),
            class,
        }
    }

    /// Returns `true` for icon segments.
    #[must_use]
    pub fn is_icon(&self) -> bool {
        self.class.starts_with(ICON_CLASS)
    }
}

/// Segments a rendered label on `<span>` markup.
///
/// Segments that are empty or whitespace-only are dropped; a label with no
/// markup yields a single `label` part, and an empty label yields none.
#[must_use]
pub fn split_label_parts(label: &str) -> SmallVec<[LabelPart; 4]> {
    let mut parts = SmallVec::new();
    let mut last = 0;

    for captures in SPAN_RE.captures_iter(label) {
        #[allow(clippy::expect_used)] // group 0 always exists on a match
        let whole = captures.get(0).expect("whole match");

        push_text(&mut parts, &label[last..whole.start()]);

        let custom = captures
            .get(1)
            .or_else(|| captures.get(2))
            .map(|m| m.as_str());
        let inner = captures.get(3).map_or("", |m| m.as_str());
        if !inner.trim().is_empty() {
            parts.push(LabelPart::icon_part(inner, custom));
        }

        last = whole.end();
    }

    push_text(&mut parts, &label[last..]);
    parts
}

fn push_text(parts: &mut SmallVec<[LabelPart; 4]>, text: &str) {
    if !text.trim().is_empty() {
        parts.push(LabelPart::text_part(text));
    }
}

/// Truncates the combined visible text of `parts` to at most `max`
/// characters, appending the marker to the part where the cut lands and
/// dropping everything after it.
///
/// Truncation happens after segmentation so a cut can never land inside
/// `<span>` markup; markup characters do not count toward `max`.
pub fn truncate_parts(parts: &mut SmallVec<[LabelPart; 4]>, max: usize) {
    let mut budget = max;
    for index in 0..parts.len() {
        let len = parts[index].text.chars().count();
        if len <= budget {
            budget -= len;
            continue;
        }
        parts[index].text = truncate_label(&parts[index].text, budget);
        parts.truncate(index + 1);
        return;
    }
}
