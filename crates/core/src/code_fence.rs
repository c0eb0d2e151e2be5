//! Code fence tracking shared by the directive scanner and diagram extraction.
//!
//! Directive markers and diagram sources are only meaningful outside of
//! fenced code, so every line-oriented pass threads a [`FenceState`] through
//! [`advance_fence_state`].

/// Fence parsing phases tracked across lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FencePhase {
    /// Not currently inside a fence.
    #[default]
    Outside,
    /// Within fence contents.
    InsideFence,
}

/// Current fence state (phase, marker, indent, and length).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FenceState {
    /// Current fence phase.
    pub phase: FencePhase,
    /// Fence marker character (``` or ~~~).
    pub marker: Option<char>,
    /// Leading whitespace count captured at opening.
    pub indent: usize,
    /// Length of the opening fence (number of ` or ~ characters).
    pub length: usize,
}

/// What happened to the fence on the processed line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FenceEvent {
    /// Line did not open or close a fence.
    None,
    /// Line opened a fence; `info` is the trimmed info string (may be empty).
    Opened {
        /// Info string after the markers, e.g. `tikz` or `rust title="x"`.
        info: String,
    },
    /// Line closed the current fence.
    Closed,
}

/// Outcome of processing a single line for fence state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineParseOutcome {
    /// State to carry into the next line.
    pub next_state: FenceState,
    /// Whether the line belongs to a code fence (opener, body or closer).
    pub in_fence: bool,
    /// Fence transition observed on this line.
    pub event: FenceEvent,
}

/// Advance fence state based on a single line of text.
pub fn advance_fence_state(line: &str, state: FenceState) -> LineParseOutcome {
    let (visual_indent, byte_offset) = leading_whitespace_info(line);
    let after_indent = &line[byte_offset..];

    let mut next_state = state;
    let mut in_fence = matches!(state.phase, FencePhase::InsideFence);
    let mut event = FenceEvent::None;

    if matches!(state.phase, FencePhase::Outside) && visual_indent <= 3 {
        // CommonMark: fence opener must have 0-3 spaces of indentation
        if let Some((marker, length)) = detect_fence_marker_with_length(after_indent) {
            let info = after_indent[length..].trim();
            // Backtick fences may not carry backticks in their info string.
            if marker == '~' || !info.contains('`') {
                next_state = FenceState {
                    phase: FencePhase::InsideFence,
                    marker: Some(marker),
                    indent: visual_indent,
                    length,
                };
                in_fence = true;
                event = FenceEvent::Opened {
                    info: info.to_string(),
                };
            }
        }
    } else if matches!(state.phase, FencePhase::InsideFence)
        && visual_indent <= 3
        && is_closing_fence(after_indent)
        && let Some((marker, closer_len)) = detect_fence_marker_with_length(after_indent)
        && Some(marker) == state.marker
        && closer_len >= state.length
    {
        next_state = FenceState::default();
        in_fence = true;
        event = FenceEvent::Closed;
    }

    LineParseOutcome {
        next_state,
        in_fence,
        event,
    }
}

/// Returns (visual_columns, byte_offset) for leading whitespace.
/// Visual columns expand tabs to 4-column boundaries per CommonMark.
fn leading_whitespace_info(line: &str) -> (usize, usize) {
    let mut col = 0;
    let mut bytes = 0;
    for b in line.bytes() {
        match b {
            b' ' => {
                col += 1;
                bytes += 1;
            }
            b'\t' => {
                col += 4 - (col % 4);
                bytes += 1;
            }
            _ => break,
        }
    }
    (col, bytes)
}

fn detect_fence_marker_with_length(after_indent: &str) -> Option<(char, usize)> {
    let mut chars = after_indent.chars();
    let first = chars.next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let run_len = 1 + chars.take_while(|c| *c == first).count();
    if run_len >= 3 {
        Some((first, run_len))
    } else {
        None
    }
}

/// A closing fence has only fence markers followed by optional whitespace.
fn is_closing_fence(after_indent: &str) -> bool {
    let trimmed = after_indent.trim_end();
    let Some(first) = trimmed.chars().next() else {
        return false;
    };
    (first == '`' || first == '~') && trimmed.len() >= 3 && trimmed.chars().all(|c| c == first)
}

/// First word of a fence info string (`tikz` for "tikz scale=2").
pub fn info_language(info: &str) -> &str {
    info.split_whitespace().next().unwrap_or("")
}
