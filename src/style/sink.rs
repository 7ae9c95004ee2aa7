//! Styled-text sink interface and an in-memory implementation

use std::ops::Range;

use serde::Serialize;

use super::AttributeSet;

/// Host-provided attributed-text storage, addressed in buffer char offsets.
///
/// The core only writes to a sink; it never reads attributes back.
pub trait StyledTextSink {
    /// Replace all attributes on `range` with `attributes`
    fn set_attributes(&mut self, attributes: &AttributeSet, range: Range<usize>);

    /// Overlay `attributes` on `range`, keeping keys they do not mention
    fn add_attributes(&mut self, attributes: &AttributeSet, range: Range<usize>);

    /// The text in `range` (pre-edit offsets) was replaced by `inserted_len`
    /// chars. Hosts whose storage already tracks its own text can ignore it.
    fn text_replaced(&mut self, _range: Range<usize>, _inserted_len: usize) {}
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Run {
    len: usize,
    attributes: AttributeSet,
}

/// One maximal span of identical attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StyledRun {
    pub range: Range<usize>,
    pub attributes: AttributeSet,
}

/// Attribute storage as a list of runs, like a rich-text widget would keep.
///
/// Inserted text inherits the attributes of the char before it (or after it
/// at offset 0), mirroring how platform text storages behave.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AttributedText {
    runs: Vec<Run>,
}

impl AttributedText {
    /// Storage for `len` chars with no attributes
    pub fn new(len: usize) -> Self {
        let mut text = Self { runs: Vec::new() };
        if len > 0 {
            text.runs.push(Run {
                len,
                attributes: AttributeSet::new(),
            });
        }
        text
    }

    pub fn len(&self) -> usize {
        self.runs.iter().map(|r| r.len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.runs.is_empty()
    }

    pub fn runs(&self) -> Vec<StyledRun> {
        let mut start = 0;
        self.runs
            .iter()
            .map(|run| {
                let range = start..start + run.len;
                start += run.len;
                StyledRun {
                    range,
                    attributes: run.attributes.clone(),
                }
            })
            .collect()
    }

    /// Attributes of the char at `offset`
    pub fn attributes_at(&self, offset: usize) -> Option<&AttributeSet> {
        let mut start = 0;
        for run in &self.runs {
            if offset < start + run.len {
                return Some(&run.attributes);
            }
            start += run.len;
        }
        None
    }

    /// Make `pos` a run boundary and return the index of the run starting
    /// there. Positions past the end pad the storage with an empty run.
    fn split_at(&mut self, pos: usize) -> usize {
        let mut start = 0;
        for i in 0..self.runs.len() {
            let len = self.runs[i].len;
            if pos == start {
                return i;
            }
            if pos < start + len {
                let head = pos - start;
                let tail = Run {
                    len: len - head,
                    attributes: self.runs[i].attributes.clone(),
                };
                self.runs[i].len = head;
                self.runs.insert(i + 1, tail);
                return i + 1;
            }
            start += len;
        }
        if pos > start {
            self.runs.push(Run {
                len: pos - start,
                attributes: AttributeSet::new(),
            });
        }
        self.runs.len()
    }

    fn coalesce(&mut self) {
        self.runs.retain(|r| r.len > 0);
        let mut merged: Vec<Run> = Vec::with_capacity(self.runs.len());
        for run in self.runs.drain(..) {
            match merged.last_mut() {
                Some(prev) if prev.attributes == run.attributes => prev.len += run.len,
                _ => merged.push(run),
            }
        }
        self.runs = merged;
    }
}

impl StyledTextSink for AttributedText {
    fn set_attributes(&mut self, attributes: &AttributeSet, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        self.runs.splice(
            first..last,
            [Run {
                len: range.end - range.start,
                attributes: attributes.clone(),
            }],
        );
        self.coalesce();
    }

    fn add_attributes(&mut self, attributes: &AttributeSet, range: Range<usize>) {
        if range.is_empty() {
            return;
        }
        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        for run in &mut self.runs[first..last] {
            run.attributes.merge(attributes);
        }
        self.coalesce();
    }

    fn text_replaced(&mut self, range: Range<usize>, inserted_len: usize) {
        let first = self.split_at(range.start);
        let last = self.split_at(range.end);
        self.runs.drain(first..last);

        if inserted_len > 0 {
            if first > 0 {
                self.runs[first - 1].len += inserted_len;
            } else if let Some(next) = self.runs.first_mut() {
                next.len += inserted_len;
            } else {
                self.runs.push(Run {
                    len: inserted_len,
                    attributes: AttributeSet::new(),
                });
            }
        }
        self.coalesce();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::FontWeight;

    fn bold() -> AttributeSet {
        AttributeSet::new().weight(FontWeight::Bold)
    }

    fn mono() -> AttributeSet {
        AttributeSet::new().monospace(true)
    }

    #[test]
    fn test_set_splits_runs() {
        let mut text = AttributedText::new(10);
        text.set_attributes(&bold(), 2..5);
        let runs = text.runs();
        assert_eq!(runs.len(), 3);
        assert_eq!(runs[0].range, 0..2);
        assert_eq!(runs[1].range, 2..5);
        assert_eq!(runs[1].attributes, bold());
        assert_eq!(runs[2].range, 5..10);
    }

    #[test]
    fn test_add_merges_and_set_replaces() {
        let mut text = AttributedText::new(6);
        text.set_attributes(&bold(), 0..6);
        text.add_attributes(&mono(), 3..6);
        assert_eq!(text.attributes_at(4), Some(&bold().merged(&mono())));

        text.set_attributes(&mono(), 0..6);
        assert_eq!(text.runs().len(), 1);
        assert_eq!(text.attributes_at(1), Some(&mono()));
    }

    #[test]
    fn test_adjacent_equal_runs_coalesce() {
        let mut text = AttributedText::new(6);
        text.set_attributes(&bold(), 0..3);
        text.set_attributes(&bold(), 3..6);
        assert_eq!(text.runs().len(), 1);
    }

    #[test]
    fn test_insert_inherits_previous_run() {
        let mut text = AttributedText::new(4);
        text.set_attributes(&bold(), 0..2);
        text.text_replaced(2..2, 3);
        assert_eq!(text.len(), 7);
        assert_eq!(text.runs()[0].range, 0..5);
        assert_eq!(text.attributes_at(4), Some(&bold()));
    }

    #[test]
    fn test_insert_at_start_inherits_following_run() {
        let mut text = AttributedText::new(2);
        text.set_attributes(&mono(), 0..2);
        text.text_replaced(0..0, 1);
        assert_eq!(text.len(), 3);
        assert_eq!(text.attributes_at(0), Some(&mono()));
    }

    #[test]
    fn test_delete_across_runs() {
        let mut text = AttributedText::new(9);
        text.set_attributes(&bold(), 3..6);
        text.text_replaced(2..7, 0);
        assert_eq!(text.len(), 4);
        assert_eq!(text.runs().len(), 1);
    }

    #[test]
    fn test_writes_past_end_pad_storage() {
        let mut text = AttributedText::new(0);
        text.add_attributes(&bold(), 2..4);
        assert_eq!(text.len(), 4);
        assert_eq!(text.attributes_at(0), Some(&AttributeSet::new()));
        assert_eq!(text.attributes_at(3), Some(&bold()));
    }
}
