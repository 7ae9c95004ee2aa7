//! Shared test helpers for integration tests
//!
//! Note: Functions may appear unused because each test file compiles separately.

#![allow(dead_code)]

use std::ops::Range;
use std::sync::Arc;

use livemark::style::{AttributeSet, AttributedText, StyledTextSink};
use livemark::syntax::SyntaxCatalog;
use livemark::text::{Buffer, LineIndex, LineRange};
use livemark::EditCoordinator;

/// Coordinator over `text` with the default catalog
pub fn test_coordinator(text: &str) -> EditCoordinator {
    EditCoordinator::new(text, Arc::new(SyntaxCatalog::default()))
}

/// Coordinator plus a fully styled in-memory sink
pub fn styled_coordinator(text: &str) -> (EditCoordinator, AttributedText) {
    let coordinator = test_coordinator(text);
    let mut sink = AttributedText::new(coordinator.len());
    coordinator
        .restyle_all(&mut sink)
        .expect("restyle on a fresh coordinator");
    (coordinator, sink)
}

/// Apply one edit to a buffer and its index the way the coordinator does
pub fn edit_index(text: &str, range: Range<usize>, inserted: &str) -> (Buffer, LineIndex) {
    let mut buffer = Buffer::from_text(text);
    let mut index = LineIndex::from_text(text);
    buffer
        .replace(range.clone(), inserted)
        .expect("edit range within buffer");
    index.update(range, inserted, buffer.len());
    (buffer, index)
}

/// `(start, length)` pairs for compact assertions
pub fn pairs(lines: &[LineRange]) -> Vec<(usize, usize)> {
    lines.iter().map(|l| (l.start, l.length)).collect()
}

/// Sink that only counts writes
#[derive(Debug, Default)]
pub struct CountingSink {
    pub sets: usize,
    pub adds: usize,
    pub replaced: usize,
    pub written: Vec<Range<usize>>,
}

impl StyledTextSink for CountingSink {
    fn set_attributes(&mut self, _attributes: &AttributeSet, range: Range<usize>) {
        self.sets += 1;
        self.written.push(range);
    }

    fn add_attributes(&mut self, _attributes: &AttributeSet, range: Range<usize>) {
        self.adds += 1;
        self.written.push(range);
    }

    fn text_replaced(&mut self, _range: Range<usize>, _inserted_len: usize) {
        self.replaced += 1;
    }
}
