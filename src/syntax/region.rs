//! Rescan region computation.
//!
//! Inline constructs, headings and quotes never cross a line break, so the
//! lines an edit touched are enough for them. Fenced code blocks are the
//! exception: whether a line is code depends on how many fence lines come
//! before it anywhere in the document. [`FenceIndex`] keeps the fence lines
//! current incrementally so the region can be widened without a rescan.

use std::ops::Range;

use ropey::Rope;

use crate::text::{LineIndex, LineRange};

const FENCE: &str = "```";

/// Whether `line` starts with a code fence
pub fn is_fence_line(rope: &Rope, line: LineRange) -> bool {
    line.length >= FENCE.len()
        && rope
            .chars_at(line.start)
            .take(FENCE.len())
            .all(|c| c == '`')
}

/// Sorted start offsets of every fence line.
///
/// Fence lines toggle code on and off: with fences `f0 < f1 < ...`, an even
/// position opens a block and the following odd one closes it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FenceIndex {
    fences: Vec<usize>,
}

impl FenceIndex {
    /// Find every fence line in the document
    pub fn build(rope: &Rope, lines: &LineIndex) -> Self {
        let fences = lines
            .lines()
            .iter()
            .filter(|&&line| is_fence_line(rope, line))
            .map(|line| line.start)
            .collect();
        Self { fences }
    }

    pub fn fences(&self) -> &[usize] {
        &self.fences
    }

    /// Number of fences starting before `offset`
    pub fn count_before(&self, offset: usize) -> usize {
        self.fences.partition_point(|&f| f < offset)
    }

    /// Update after an edit.
    ///
    /// `old_span` covers the lines the edit touched in pre-edit coordinates,
    /// `new_lines` the corresponding lines after the edit. Returns true when
    /// the number of fences changed parity, which re-pairs every fence after
    /// the edit.
    pub fn update(
        &mut self,
        old_span: Range<usize>,
        delta: isize,
        rope: &Rope,
        lines: &LineIndex,
        new_lines: Range<usize>,
    ) -> bool {
        let first = self.count_before(old_span.start);
        let last = self.count_before(old_span.end);
        let removed = last - first;
        self.fences.drain(first..last);

        if delta != 0 {
            for fence in &mut self.fences[first..] {
                *fence = fence.saturating_add_signed(delta);
            }
        }

        let found: Vec<usize> = lines.lines()[new_lines]
            .iter()
            .filter(|&&line| is_fence_line(rope, line))
            .map(|line| line.start)
            .collect();
        let added = found.len();
        self.fences.splice(first..first, found);

        (removed + added) % 2 == 1
    }
}

/// Region to re-tokenize after an edit.
///
/// Starts as the lines holding `edit_start ..= edit_start + inserted_len`
/// (post-edit coordinates), then:
/// - moves back to the opening fence when the region starts inside a block;
/// - runs to the document end when the edit flipped fence pairing;
/// - otherwise, when a block is still open at the region end, runs to the end
///   of its closing fence line, or the document end if it is never closed.
pub fn rescan_region(
    lines: &LineIndex,
    fences: &FenceIndex,
    buffer_len: usize,
    edit_start: usize,
    inserted_len: usize,
    pairing_changed: bool,
) -> Range<usize> {
    let first = lines.line_at_offset(edit_start);
    let last = lines.line_at_offset(edit_start + inserted_len);
    let mut region = lines.line_span(first..=last);

    let before = fences.count_before(region.start);
    if before % 2 == 1 {
        region.start = fences.fences[before - 1];
    }

    if pairing_changed {
        region.end = buffer_len;
        return region;
    }

    let open = fences.count_before(region.end);
    if open % 2 == 1 {
        region.end = match fences.fences.get(open) {
            Some(&closer) => lines
                .line(lines.line_at_offset(closer))
                .map_or(buffer_len, |line| line.end()),
            None => buffer_len,
        };
    }

    region
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::Buffer;

    fn setup(text: &str) -> (Buffer, LineIndex, FenceIndex) {
        let buffer = Buffer::from_text(text);
        let lines = LineIndex::from_text(text);
        let fences = FenceIndex::build(buffer.rope(), &lines);
        (buffer, lines, fences)
    }

    #[test]
    fn test_build_finds_fence_lines() {
        let (_, _, fences) = setup("a\n```rust\nx\n```\n``not\n````\n");
        assert_eq!(fences.fences(), &[2, 12, 22]);
    }

    #[test]
    fn test_plain_edit_keeps_line_region() {
        let (buffer, lines, fences) = setup("one\ntwo\nthree");
        assert_eq!(rescan_region(&lines, &fences, buffer.len(), 5, 1, false), 4..8);
    }

    #[test]
    fn test_region_covers_inserted_lines() {
        let (buffer, lines, fences) = setup("one\ntwo\nthree\nfour");
        assert_eq!(rescan_region(&lines, &fences, buffer.len(), 2, 6, false), 0..14);
    }

    #[test]
    fn test_inside_closed_block_widens_to_both_fences() {
        let text = "p\n```\na\nb\n```\nq";
        let (buffer, lines, fences) = setup(text);
        // edit on line "b"
        assert_eq!(rescan_region(&lines, &fences, buffer.len(), 8, 1, false), 2..14);
    }

    #[test]
    fn test_inside_unclosed_block_runs_to_end() {
        let text = "intro\n```\ncode\nmore";
        let (buffer, lines, fences) = setup(text);
        let region = rescan_region(&lines, &fences, buffer.len(), 11, 1, false);
        assert_eq!(region, 6..text.len());
    }

    #[test]
    fn test_after_closed_block_is_not_widened() {
        let text = "```\na\n```\nafter";
        let (buffer, lines, fences) = setup(text);
        assert_eq!(rescan_region(&lines, &fences, buffer.len(), 11, 1, false), 10..15);
    }

    #[test]
    fn test_pairing_change_runs_to_end() {
        let text = "a\nb\nc";
        let (buffer, lines, fences) = setup(text);
        assert_eq!(rescan_region(&lines, &fences, buffer.len(), 0, 1, true), 0..5);
    }

    #[test]
    fn test_update_tracks_new_fence() {
        // "a\nb\n" → "a\n```\nb\n" by inserting "```\n" at 2
        let mut buffer = Buffer::from_text("a\nb\n");
        let mut lines = LineIndex::from_text("a\nb\n");
        let mut fences = FenceIndex::build(buffer.rope(), &lines);
        let old_span = lines.line_span(1..=1);

        let delta = buffer.replace(2..2, "```\n").unwrap();
        lines.update(2..2, "```\n", buffer.len());
        let changed = fences.update(old_span, delta, buffer.rope(), &lines, 1..3);

        assert!(changed);
        assert_eq!(fences, FenceIndex::build(buffer.rope(), &lines));
    }

    #[test]
    fn test_update_shifts_later_fences() {
        let mut buffer = Buffer::from_text("x\n```\ny\n```\n");
        let mut lines = LineIndex::from_text("x\n```\ny\n```\n");
        let mut fences = FenceIndex::build(buffer.rope(), &lines);
        let old_span = lines.line_span(0..=0);

        let delta = buffer.replace(0..1, "xyz").unwrap();
        lines.update(0..1, "xyz", buffer.len());
        let changed = fences.update(old_span, delta, buffer.rope(), &lines, 0..1);

        assert!(!changed);
        assert_eq!(fences.fences(), &[4, 10]);
    }
}
