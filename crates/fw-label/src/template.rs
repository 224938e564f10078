//! Restricted label template evaluation.
//!
//! Templates come from user configuration, so evaluation is substitution
//! only: a fixed set of `{placeholder}` names is replaced from the event and
//! everything else passes through verbatim. There is no expression syntax
//! and no code execution.
//!
//! Supported placeholders:
//!
//! | Placeholder   | Value                                            |
//! |---------------|--------------------------------------------------|
//! | `{action}`    | `created`, `modified`, `deleted`, or `moved`     |
//! | `{path}`      | full path of the source entity                   |
//! | `{name}`      | last path segment of the source entity           |
//! | `{content}`   | sampled file content (empty unless enabled)      |
//! | `{dest_path}` | full path of the rename target, empty otherwise  |
//! | `{dest_name}` | last segment of the rename target, empty otherwise |

use fw_core::FsEvent;

/// Marker appended to a truncated label.
const TRUNCATION_MARKER: &str = "...";

/// Substitutes the supported placeholders in `template` from `event`.
///
/// Unknown placeholders and unbalanced braces are left verbatim.
#[must_use]
pub fn render_template(template: &str, event: &FsEvent) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(pos) = rest.find('{') {
        out.push_str(&rest[..pos]);
        let after = &rest[pos + 1..];

        let Some(end) = after.find('}') else {
            // No closing brace anywhere, keep the tail as-is.
            out.push('{');
            rest = after;
            continue;
        };

        let name = &after[..end];
        match lookup(name, event) {
            Some(value) => out.push_str(value),
            None => {
                out.push('{');
                out.push_str(name);
                out.push('}');
            }
        }
        rest = &after[end + 1..];
    }

    out.push_str(rest);
    out
}

fn lookup<'a>(name: &str, event: &'a FsEvent) -> Option<&'a str> {
    match name {
        "action" => Some(event.action.as_str()),
        "path" => Some(event.source.path.as_str()),
        "name" => Some(event.source.name()),
        "content" => Some(&event.source.content),
        "dest_path" => Some(
            event
                .destination
                .as_ref()
                .map_or("", |dest| dest.path.as_str()),
        ),
        "dest_name" => Some(event.destination.as_ref().map_or("", |dest| dest.name())),
        _ => None,
    }
}

/// Truncates `label` to at most `max` characters, appending `...` when
/// anything was cut. The result never exceeds `max + 3` characters.
///
/// Truncation is per `char`, so multi-byte text is never split mid-codepoint.
#[must_use]
pub fn truncate_label(label: &str, max: usize) -> String {
    if label.chars().count() <= max {
        return label.to_owned();
    }

    let mut out: String = label.chars().take(max).collect();
    out.push_str(TRUNCATION_MARKER);
    out
}
