//! Error types for the edit pipeline

use thiserror::Error;

/// Structural failures of a single edit. The document is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditError {
    /// Edit range reaches outside the current buffer
    #[error("edit range {start}..{end} is outside buffer of length {len}")]
    InvalidRange { start: usize, end: usize, len: usize },

    /// `apply_edit` was called while another edit was still running
    #[error("edit submitted while another edit is in progress")]
    Reentrant,
}

/// A broken line-index invariant. Always a programming defect.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConsistencyViolation {
    #[error("first line starts at {0}, expected 0")]
    FirstLineOffset(usize),

    #[error("line {line} ends at {end} but the next line starts at {next_start}")]
    Gap {
        line: usize,
        end: usize,
        next_start: usize,
    },

    #[error("index holds {actual} lines, buffer has {expected}")]
    LineCount { expected: usize, actual: usize },

    #[error("last line has length {actual}, buffer says {expected}")]
    LastLineLength { expected: usize, actual: usize },
}
