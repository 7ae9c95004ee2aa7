//! Rope-backed document buffer.
//!
//! Positions are char offsets (Unicode scalar values). `replace` is the only
//! way to change the content of a live document, which keeps the buffer and
//! the [`LineIndex`](super::LineIndex) in lockstep.

use ropey::Rope;
use std::fmt;
use std::ops::Range;

use crate::error::EditError;

/// Document text owned by the edit coordinator.
#[derive(Debug, Clone, Default)]
pub struct Buffer {
    rope: Rope,
}

impl Buffer {
    pub fn new() -> Self {
        Self { rope: Rope::new() }
    }

    /// Create a buffer from a string slice
    pub fn from_text(s: &str) -> Self {
        Self {
            rope: Rope::from_str(s),
        }
    }

    /// Access the underlying Rope for rope-specific reads
    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    /// Total length in chars
    pub fn len(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Get character at offset, None if out of bounds
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.rope.get_char(offset)
    }

    /// Get slice of text as String. The range must lie inside the buffer.
    pub fn slice(&self, range: Range<usize>) -> String {
        debug_assert!(range.start <= range.end && range.end <= self.len());
        if range.start >= range.end {
            return String::new();
        }
        self.rope.slice(range).to_string()
    }

    /// Check that `range` addresses a valid span of the current content
    pub fn validate(&self, range: &Range<usize>) -> Result<(), EditError> {
        let len = self.len();
        if range.start > range.end || range.end > len {
            return Err(EditError::InvalidRange {
                start: range.start,
                end: range.end,
                len,
            });
        }
        Ok(())
    }

    /// Replace `range` with `text` and return the signed change in length.
    ///
    /// Out-of-bounds ranges are rejected without touching the content; they
    /// are never clamped.
    pub fn replace(&mut self, range: Range<usize>, text: &str) -> Result<isize, EditError> {
        self.validate(&range)?;

        let removed = range.end - range.start;
        if removed > 0 {
            self.rope.remove(range.clone());
        }
        let inserted = text.chars().count();
        if inserted > 0 {
            self.rope.insert(range.start, text);
        }

        Ok(inserted as isize - removed as isize)
    }

    /// Swap in entirely new content (document reload)
    pub fn reset(&mut self, text: &str) {
        self.rope = Rope::from_str(text);
    }

    /// Number of line breaks in the content
    pub fn newline_count(&self) -> usize {
        self.rope.chars().filter(|&c| c == '\n').count()
    }
}

impl fmt::Display for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for chunk in self.rope.chunks() {
            f.write_str(chunk)?;
        }
        Ok(())
    }
}
