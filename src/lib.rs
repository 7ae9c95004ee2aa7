//! livemark - incremental markdown styling for live text surfaces
//!
//! This crate keeps a line index and markdown styling in step with a text
//! buffer that is edited one replacement at a time, restyling only the
//! region each edit can affect.

pub mod cli;
pub mod config;
pub mod config_paths;
pub mod coordinator;
pub mod error;
pub mod style;
pub mod syntax;
pub mod text;
pub mod theme;
pub mod tracing;

// Re-export commonly used types
pub use config::EditorConfig;
pub use coordinator::{EditCoordinator, EditOutcome, EditRecord};
pub use error::{ConsistencyViolation, EditError};
pub use style::{AttributeSet, AttributedText, StyledTextSink};
pub use syntax::SyntaxCatalog;
pub use theme::Theme;
