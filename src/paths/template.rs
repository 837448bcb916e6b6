use std::ops::Range;

use crate::foundation::core::FrameIndex;

/// Character marking one digit of a frame-number field in a path template.
pub const PLACEHOLDER: char = '#';

/// Byte ranges of every maximal run of [`PLACEHOLDER`] in `template`, in order.
pub fn placeholder_runs(template: &str) -> Vec<Range<usize>> {
    let mut runs = Vec::new();
    let mut start: Option<usize> = None;
    for (idx, ch) in template.char_indices() {
        match (ch == PLACEHOLDER, start) {
            (true, None) => start = Some(idx),
            (false, Some(s)) => {
                runs.push(s..idx);
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push(s..template.len());
    }
    runs
}

/// Substitute every placeholder run in `template` with `frame`, zero-padded to the run's width.
///
/// `resolve_path("videos/####.png", FrameIndex(7))` yields `"videos/0007.png"`. A frame number
/// wider than its run widens the output instead of being truncated, and a template without
/// placeholders is returned unchanged.
pub fn resolve_path(template: &str, frame: FrameIndex) -> String {
    let runs = placeholder_runs(template);
    if runs.is_empty() {
        return template.to_owned();
    }

    let mut out = String::with_capacity(template.len() + 8);
    let mut cursor = 0usize;
    for run in runs {
        out.push_str(&template[cursor..run.start]);
        // PLACEHOLDER is ASCII, so byte length == run width.
        out.push_str(&frame.zero_padded(run.len()));
        cursor = run.end;
    }
    out.push_str(&template[cursor..]);
    out
}

#[cfg(test)]
#[path = "../../tests/unit/paths/template.rs"]
mod tests;
