//! Incrementally maintained line boundaries.
//!
//! The index stores one [`LineRange`] per logical line. Lengths include the
//! terminating `'\n'`, so the ranges tile the whole buffer with no gaps. An
//! edit touches only the lines it removes or creates; every later line is
//! shifted by the edit's length delta without rescanning the text.

use std::ops::{Range, RangeInclusive};

use ropey::Rope;
use serde::Serialize;

use super::Buffer;
use crate::error::ConsistencyViolation;

/// Start offset and length (newline included) of one line
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LineRange {
    pub start: usize,
    pub length: usize,
}

impl LineRange {
    pub const fn new(start: usize, length: usize) -> Self {
        Self { start, length }
    }

    /// Offset one past the last char of the line
    pub const fn end(&self) -> usize {
        self.start + self.length
    }

    pub const fn range(&self) -> Range<usize> {
        self.start..self.start + self.length
    }
}

/// Ordered, gap-free partition of a buffer into lines. Never empty.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineIndex {
    lines: Vec<LineRange>,
}

impl Default for LineIndex {
    fn default() -> Self {
        Self::new()
    }
}

impl LineIndex {
    /// Index of an empty buffer: a single zero-length line
    pub fn new() -> Self {
        Self {
            lines: vec![LineRange::new(0, 0)],
        }
    }

    /// Build the index by scanning `text` once
    pub fn from_text(text: &str) -> Self {
        Self::build(text.chars())
    }

    /// Build the index by scanning a rope once
    pub fn from_rope(rope: &Rope) -> Self {
        Self::build(rope.chars())
    }

    fn build<I>(chars: I) -> Self
    where
        I: IntoIterator<Item = char>,
    {
        let mut lines = Vec::new();
        let mut start = 0;
        let mut offset = 0;
        for ch in chars {
            offset += 1;
            if ch == '\n' {
                lines.push(LineRange::new(start, offset - start));
                start = offset;
            }
        }
        lines.push(LineRange::new(start, offset - start));
        Self { lines }
    }

    /// Number of lines (always >= 1)
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Always false; kept for API symmetry with `len`
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines(&self) -> &[LineRange] {
        &self.lines
    }

    pub fn line(&self, line: usize) -> Option<LineRange> {
        self.lines.get(line).copied()
    }

    /// Line containing `offset`. Offsets past the end map to the last line.
    pub fn line_at_offset(&self, offset: usize) -> usize {
        self.lines
            .partition_point(|l| l.start <= offset)
            .saturating_sub(1)
    }

    /// Char range covered by the lines `lines`, clamped to the index
    pub fn line_span(&self, lines: RangeInclusive<usize>) -> Range<usize> {
        let last = (*lines.end()).min(self.lines.len() - 1);
        let first = (*lines.start()).min(last);
        self.lines[first].start..self.lines[last].end()
    }

    /// Update the index after `edit` (pre-edit coordinates) was replaced by
    /// `inserted`. `buffer_len` is the buffer length after the replace.
    pub fn update(&mut self, edit: Range<usize>, inserted: &str, buffer_len: usize) {
        let inserted_len = inserted.chars().count();
        let delta = inserted_len as isize - (edit.end - edit.start) as isize;

        // A line whose start p has its line break at p - 1 inside the edit
        // (edit.start < p <= edit.end) no longer exists. Line 0 always stays.
        let first = self.lines.partition_point(|l| l.start <= edit.start);
        let last = self.lines.partition_point(|l| l.start <= edit.end);
        let removed = last - first;
        self.lines.drain(first..last);

        let new_lines: Vec<LineRange> = inserted
            .chars()
            .enumerate()
            .filter(|&(_, ch)| ch == '\n')
            .map(|(k, _)| LineRange::new(edit.start + k + 1, 0))
            .collect();
        let added = new_lines.len();
        self.lines.splice(first..first, new_lines);

        if delta != 0 {
            for line in &mut self.lines[first + added..] {
                line.start = line.start.saturating_add_signed(delta);
            }
        }

        // The line before the block plus every inserted line. Lines after the
        // block kept their content, so their lengths are still right.
        for i in first - 1..first + added {
            let end = self
                .lines
                .get(i + 1)
                .map_or(buffer_len, |next| next.start);
            self.lines[i].length = end - self.lines[i].start;
        }

        tracing::trace!(
            removed,
            added,
            delta,
            lines = self.lines.len(),
            "line index updated"
        );
    }

    /// Full O(n) verification of the index against `buffer`.
    ///
    /// The last line is measured independently by walking back from the end
    /// of the buffer to the final line break.
    pub fn check_consistency(&self, buffer: &Buffer) -> Result<(), ConsistencyViolation> {
        let first = self.lines[0];
        if first.start != 0 {
            return Err(ConsistencyViolation::FirstLineOffset(first.start));
        }

        let expected = buffer.newline_count() + 1;
        if self.lines.len() != expected {
            return Err(ConsistencyViolation::LineCount {
                expected,
                actual: self.lines.len(),
            });
        }

        for (i, pair) in self.lines.windows(2).enumerate() {
            if pair[0].end() != pair[1].start {
                return Err(ConsistencyViolation::Gap {
                    line: i,
                    end: pair[0].end(),
                    next_start: pair[1].start,
                });
            }
        }

        let len = buffer.len();
        let mut tail_start = len;
        let mut chars = buffer.rope().chars_at(len);
        while let Some(ch) = chars.prev() {
            if ch == '\n' {
                break;
            }
            tail_start -= 1;
        }

        let last = self.lines[self.lines.len() - 1];
        if last.start != tail_start || last.length != len - tail_start {
            return Err(ConsistencyViolation::LastLineLength {
                expected: len - tail_start,
                actual: last.length,
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edit(text: &str, range: Range<usize>, inserted: &str) -> (Buffer, LineIndex) {
        let mut buffer = Buffer::from_text(text);
        let mut index = LineIndex::from_text(text);
        buffer.replace(range.clone(), inserted).unwrap();
        index.update(range, inserted, buffer.len());
        index.check_consistency(&buffer).unwrap();
        (buffer, index)
    }

    fn ranges(index: &LineIndex) -> Vec<(usize, usize)> {
        index.lines().iter().map(|l| (l.start, l.length)).collect()
    }

    #[test]
    fn test_empty_buffer_has_one_line() {
        let index = LineIndex::from_text("");
        assert_eq!(ranges(&index), vec![(0, 0)]);
        assert_eq!(index, LineIndex::new());
    }

    #[test]
    fn test_build_trailing_newline_gives_empty_last_line() {
        let index = LineIndex::from_text("ab\ncd\n");
        assert_eq!(ranges(&index), vec![(0, 3), (3, 3), (6, 0)]);
    }

    #[test]
    fn test_insert_newline_at_end() {
        let (_, index) = edit("abc", 3..3, "\ndef");
        assert_eq!(ranges(&index), vec![(0, 4), (4, 3)]);
    }

    #[test]
    fn test_delete_spanning_two_breaks() {
        let (buffer, index) = edit("abc\ndef\nghi", 3..8, "");
        assert_eq!(buffer.to_string(), "abcghi");
        assert_eq!(ranges(&index), vec![(0, 6)]);
    }

    #[test]
    fn test_edit_within_line_only_changes_that_line() {
        let (_, index) = edit("one\ntwo\nthree", 5..6, "WWW");
        assert_eq!(ranges(&index), vec![(0, 4), (4, 6), (10, 5)]);
    }

    #[test]
    fn test_split_line_into_three() {
        let (buffer, index) = edit("hello world\nnext", 5..6, "\n\n");
        assert_eq!(buffer.to_string(), "hello\n\nworld\nnext");
        assert_eq!(ranges(&index), vec![(0, 6), (6, 1), (7, 6), (13, 4)]);
    }

    #[test]
    fn test_typing_at_end_tracks_buffer_length() {
        let (_, index) = edit("a\nb", 3..3, "cd");
        assert_eq!(ranges(&index), vec![(0, 2), (2, 3)]);
    }

    #[test]
    fn test_break_just_before_edit_is_kept() {
        // The '\n' at offset 3 sits right before the edit start
        let (_, index) = edit("abc\ndef", 4..5, "");
        assert_eq!(ranges(&index), vec![(0, 4), (4, 2)]);
    }

    #[test]
    fn test_break_as_last_replaced_char_is_removed() {
        let (buffer, index) = edit("abc\ndef", 2..4, "X");
        assert_eq!(buffer.to_string(), "abXdef");
        assert_eq!(ranges(&index), vec![(0, 6)]);
    }

    #[test]
    fn test_replace_everything_with_nothing() {
        let (_, index) = edit("a\nb\nc\n", 0..6, "");
        assert_eq!(ranges(&index), vec![(0, 0)]);
    }

    #[test]
    fn test_insert_into_empty_buffer() {
        let (_, index) = edit("", 0..0, "x\ny\n");
        assert_eq!(ranges(&index), vec![(0, 2), (2, 2), (4, 0)]);
    }

    #[test]
    fn test_line_at_offset() {
        let index = LineIndex::from_text("ab\ncd\nef");
        assert_eq!(index.line_at_offset(0), 0);
        assert_eq!(index.line_at_offset(2), 0);
        assert_eq!(index.line_at_offset(3), 1);
        assert_eq!(index.line_at_offset(8), 2);
        assert_eq!(index.line_at_offset(100), 2);
    }

    #[test]
    fn test_line_span() {
        let index = LineIndex::from_text("ab\ncd\nef");
        assert_eq!(index.line_span(0..=0), 0..3);
        assert_eq!(index.line_span(1..=2), 3..8);
        assert_eq!(index.line_span(1..=9), 3..8);
    }

    #[test]
    fn test_check_detects_gap() {
        let buffer = Buffer::from_text("ab\ncd");
        let mut index = LineIndex::from_text("ab\ncd");
        index.lines[0].length = 2;
        assert!(matches!(
            index.check_consistency(&buffer),
            Err(ConsistencyViolation::Gap { line: 0, .. })
        ));
    }

    #[test]
    fn test_check_detects_stale_tail() {
        let buffer = Buffer::from_text("ab\ncde");
        let index = LineIndex::from_text("ab\ncd");
        assert!(matches!(
            index.check_consistency(&buffer),
            Err(ConsistencyViolation::LastLineLength {
                expected: 3,
                actual: 2
            })
        ));
    }

    #[test]
    fn test_check_detects_missing_line() {
        let buffer = Buffer::from_text("ab\ncd\n");
        let index = LineIndex::from_text("ab\ncd");
        assert!(matches!(
            index.check_consistency(&buffer),
            Err(ConsistencyViolation::LineCount {
                expected: 3,
                actual: 2
            })
        ));
    }
}
