//! Edit pipeline façade
//!
//! [`EditCoordinator`] owns the document and runs every edit through the same
//! fixed sequence: buffer replace, line index update, fence update, rescan
//! region, tokenize, apply styles. Nothing else may mutate the document, so
//! the buffer and its indexes can never drift apart.
//!
//! The coordinator is single-threaded (`!Sync`). Sinks are called while an
//! edit is in flight; a sink that calls back into the coordinator to start
//! another edit gets [`EditError::Reentrant`] instead of corrupting state.

use std::cell::{Cell, RefCell};
use std::ops::Range;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{ConsistencyViolation, EditError};
use crate::style::{StyleApplier, StyledTextSink};
use crate::syntax::{rescan_region, scan, FenceIndex, ScanRequest, ScanResult, SyntaxCatalog, Token};
use crate::text::{Buffer, LineIndex, LineRange};

/// One recorded replacement, as stored in edit-session files
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EditRecord {
    pub range: Range<usize>,
    pub text: String,
}

/// What a single edit did
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EditOutcome {
    /// Signed change in buffer length
    pub delta: isize,
    /// Generation after the edit
    pub generation: u64,
    /// Region that was re-tokenized and restyled
    pub rescan: Range<usize>,
    pub tokens: Vec<Token>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Idle,
    Editing,
}

/// Marks the coordinator busy for its lifetime; resets to idle on drop,
/// including during unwinding.
struct EditingGuard<'a> {
    phase: &'a Cell<Phase>,
}

impl<'a> EditingGuard<'a> {
    fn enter(phase: &'a Cell<Phase>) -> Result<Self, EditError> {
        if phase.get() == Phase::Editing {
            tracing::warn!("rejected re-entrant edit");
            return Err(EditError::Reentrant);
        }
        phase.set(Phase::Editing);
        Ok(Self { phase })
    }
}

impl Drop for EditingGuard<'_> {
    fn drop(&mut self) {
        self.phase.set(Phase::Idle);
    }
}

#[derive(Debug)]
struct Document {
    buffer: Buffer,
    lines: LineIndex,
    fences: FenceIndex,
}

impl Document {
    fn new(text: &str) -> Self {
        let buffer = Buffer::from_text(text);
        let lines = LineIndex::from_rope(buffer.rope());
        let fences = FenceIndex::build(buffer.rope(), &lines);
        Self {
            buffer,
            lines,
            fences,
        }
    }

    #[cfg(feature = "consistency-checks")]
    fn assert_consistent(&self, context: &str) {
        if let Err(violation) = self.lines.check_consistency(&self.buffer) {
            panic!("line index out of sync after {}: {}", context, violation);
        }
        debug_assert_eq!(
            self.fences,
            FenceIndex::build(self.buffer.rope(), &self.lines),
            "fence index out of sync after {}",
            context
        );
    }
}

/// Owns the document and drives restyling after every edit
pub struct EditCoordinator {
    phase: Cell<Phase>,
    document: RefCell<Document>,
    generation: Cell<u64>,
    selected: Cell<bool>,
    catalog: Arc<SyntaxCatalog>,
}

impl EditCoordinator {
    pub fn new(text: &str, catalog: Arc<SyntaxCatalog>) -> Self {
        let document = Document::new(text);
        tracing::debug!(
            len = document.buffer.len(),
            lines = document.lines.len(),
            "coordinator created"
        );
        Self {
            phase: Cell::new(Phase::Idle),
            document: RefCell::new(document),
            generation: Cell::new(0),
            selected: Cell::new(false),
            catalog,
        }
    }

    /// Replace `range` with `text`, then restyle the affected region on `sink`.
    ///
    /// An invalid range or a re-entrant call fails before anything is
    /// mutated.
    pub fn apply_edit(
        &self,
        range: Range<usize>,
        text: &str,
        sink: &mut dyn StyledTextSink,
    ) -> Result<EditOutcome, EditError> {
        let _guard = EditingGuard::enter(&self.phase)?;
        let inserted_len = text.chars().count();

        let (delta, pairing_changed) = {
            let mut doc = self.document.borrow_mut();
            if let Err(err) = doc.buffer.validate(&range) {
                tracing::warn!("rejected edit: {}", err);
                return Err(err);
            }

            let first = doc.lines.line_at_offset(range.start);
            let last = doc.lines.line_at_offset(range.end);
            let old_span = doc.lines.line_span(first..=last);

            let Document {
                buffer,
                lines,
                fences,
            } = &mut *doc;
            let delta = buffer.replace(range.clone(), text)?;
            self.bump_generation();
            lines.update(range.clone(), text, buffer.len());

            let new_first = lines.line_at_offset(range.start);
            let new_last = lines.line_at_offset(range.start + inserted_len);
            let pairing_changed =
                fences.update(old_span, delta, buffer.rope(), lines, new_first..new_last + 1);

            #[cfg(feature = "consistency-checks")]
            doc.assert_consistent("edit");

            (delta, pairing_changed)
        };

        sink.text_replaced(range.clone(), inserted_len);

        let (rescan, tokens) = {
            let doc = self.document.borrow();
            let rescan = rescan_region(
                &doc.lines,
                &doc.fences,
                doc.buffer.len(),
                range.start,
                inserted_len,
                pairing_changed,
            );
            let slice = doc.buffer.slice(rescan.clone());
            let tokens = scan(&slice, rescan.start, self.catalog.rules());
            (rescan, tokens)
        };

        StyleApplier::new(&self.catalog).apply(&tokens, rescan.clone(), sink, self.selected.get());

        tracing::debug!(
            start = range.start,
            end = range.end,
            inserted = inserted_len,
            delta,
            pairing_changed,
            rescan = ?rescan,
            tokens = tokens.len(),
            "applied edit"
        );

        Ok(EditOutcome {
            delta,
            generation: self.generation.get(),
            rescan,
            tokens,
        })
    }

    /// Apply a recorded edit session in order, stopping at the first failure
    pub fn replay(
        &self,
        records: &[EditRecord],
        sink: &mut dyn StyledTextSink,
    ) -> Result<Vec<EditOutcome>, EditError> {
        records
            .iter()
            .map(|record| self.apply_edit(record.range.clone(), &record.text, sink))
            .collect()
    }

    /// Swap in a whole new document. Styling is left to the caller
    /// (`restyle_all` or a background scan).
    pub fn reset(&self, text: &str) -> Result<(), EditError> {
        let _guard = EditingGuard::enter(&self.phase)?;
        *self.document.borrow_mut() = Document::new(text);
        self.bump_generation();
        tracing::debug!(
            len = text.len(),
            generation = self.generation.get(),
            "document reset"
        );
        Ok(())
    }

    /// Tokenize and style the entire document synchronously
    pub fn restyle_all(&self, sink: &mut dyn StyledTextSink) -> Result<Vec<Token>, EditError> {
        let _guard = EditingGuard::enter(&self.phase)?;
        let (len, tokens) = {
            let doc = self.document.borrow();
            let text = doc.buffer.to_string();
            (doc.buffer.len(), scan(&text, 0, self.catalog.rules()))
        };
        StyleApplier::new(&self.catalog).apply(&tokens, 0..len, sink, self.selected.get());
        tracing::debug!(len, tokens = tokens.len(), "restyled whole document");
        Ok(tokens)
    }

    /// Snapshot of the current document for a background scan
    pub fn full_scan_request(&self) -> ScanRequest {
        ScanRequest {
            generation: self.generation.get(),
            text: self.text(),
        }
    }

    /// Style the whole document from a background scan.
    ///
    /// Returns `Ok(false)` without touching the sink when the document has
    /// changed since the snapshot was taken.
    pub fn apply_full_scan(
        &self,
        result: ScanResult,
        sink: &mut dyn StyledTextSink,
    ) -> Result<bool, EditError> {
        let _guard = EditingGuard::enter(&self.phase)?;
        let current = self.generation.get();
        if result.generation != current {
            tracing::debug!(
                stale = result.generation,
                current,
                "discarding stale background scan"
            );
            return Ok(false);
        }

        let len = self.document.borrow().buffer.len();
        debug_assert_eq!(len, result.len);
        StyleApplier::new(&self.catalog).apply(&result.tokens, 0..len, sink, self.selected.get());
        tracing::debug!(
            generation = current,
            tokens = result.tokens.len(),
            "applied background scan"
        );
        Ok(true)
    }

    /// Full O(n) verification of the line index against the buffer
    pub fn check_consistency(&self) -> Result<(), ConsistencyViolation> {
        let doc = self.document.borrow();
        doc.lines.check_consistency(&doc.buffer)
    }

    pub fn line_ranges(&self) -> Vec<LineRange> {
        self.document.borrow().lines.lines().to_vec()
    }

    pub fn line_count(&self) -> usize {
        self.document.borrow().lines.len()
    }

    pub fn text(&self) -> String {
        self.document.borrow().buffer.to_string()
    }

    /// Buffer length in chars
    pub fn len(&self) -> usize {
        self.document.borrow().buffer.len()
    }

    pub fn is_empty(&self) -> bool {
        self.document.borrow().buffer.is_empty()
    }

    pub fn generation(&self) -> u64 {
        self.generation.get()
    }

    /// Whether subsequent styling uses the selected attribute variants
    pub fn set_selection_state(&self, selected: bool) {
        self.selected.set(selected);
    }

    pub fn is_selected(&self) -> bool {
        self.selected.get()
    }

    pub fn is_editing(&self) -> bool {
        self.phase.get() == Phase::Editing
    }

    pub fn catalog(&self) -> &Arc<SyntaxCatalog> {
        &self.catalog
    }

    fn bump_generation(&self) {
        self.generation.set(self.generation.get().wrapping_add(1));
    }
}
