//! Visual attributes and how they reach the host's text storage

mod applier;
mod attributes;
mod sink;

pub use applier::StyleApplier;
pub use attributes::{AttributeKey, AttributeSet, AttributeValue, FontWeight, StyleVariant};
pub use sink::{AttributedText, StyledRun, StyledTextSink};
