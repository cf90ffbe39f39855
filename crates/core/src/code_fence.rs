//! Code fence tracking for fence-aware formatting.
//!
//! Fences are detected on the trimmed line so that re-indenting a line can
//! never turn it into (or out of) a fence delimiter on the next run.

/// Fence parsing phases tracked across lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FencePhase {
    /// Not currently inside a fence.
    #[default]
    Outside,
    /// Within fence contents.
    InsideFence,
}

/// Current fence state (phase, marker and opener length).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FenceState {
    /// Current fence phase.
    pub phase: FencePhase,
    /// Fence marker character (``` or ~~~).
    pub marker: Option<char>,
    /// Length of the opening fence (number of ` or ~ characters).
    pub length: usize,
}

impl FenceState {
    /// Advance the state for one trimmed line.
    ///
    /// Returns true when the line belongs to a fence, either as a delimiter
    /// or as content, and must be left untouched.
    pub fn advance(&mut self, trimmed: &str) -> bool {
        match self.phase {
            FencePhase::Outside => {
                if let Some((marker, length)) = detect_fence_marker_with_length(trimmed) {
                    *self = FenceState {
                        phase: FencePhase::InsideFence,
                        marker: Some(marker),
                        length,
                    };
                    true
                } else {
                    false
                }
            }
            FencePhase::InsideFence => {
                if is_closing_fence(trimmed)
                    && let Some((marker, closer_len)) = detect_fence_marker_with_length(trimmed)
                    && Some(marker) == self.marker
                    && closer_len >= self.length
                {
                    *self = FenceState::default();
                }
                true
            }
        }
    }

    /// Whether a fence is currently open.
    pub fn is_inside(&self) -> bool {
        matches!(self.phase, FencePhase::InsideFence)
    }
}

fn detect_fence_marker_with_length(trimmed: &str) -> Option<(char, usize)> {
    let mut chars = trimmed.chars();
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
fn is_closing_fence(trimmed: &str) -> bool {
    let mut chars = trimmed.chars();
    let first = match chars.next() {
        Some(c) if c == '`' || c == '~' => c,
        _ => return false,
    };
    let mut count = 1;
    for c in chars.by_ref() {
        if c == first {
            count += 1;
        } else {
            return count >= 3 && c.is_whitespace() && chars.all(|c| c.is_whitespace());
        }
    }
    count >= 3
}
