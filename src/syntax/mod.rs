//! Markdown syntax matching
//!
//! Provides regex-based tokenizing of the live-styled markdown subset:
//! - A fixed rule catalog with theme-derived attributes
//! - Region-bounded scans producing delimiter/content ranges
//! - Rescan-region widening for fenced code blocks
//! - Background full-document scans in a worker thread
//!
//! ## Architecture
//!
//! ```text
//! Edit → LineIndex/FenceIndex update → rescan_region → scan(region)
//!      → StyleApplier::apply(tokens)
//!
//! Document load → ScanRequest(generation) → (worker thread)
//!              → ScanResult(generation) → applied only if still current
//! ```

mod catalog;
mod region;
mod token;
mod tokenizer;
mod worker;

pub use catalog::{
    SyntaxCatalog, SyntaxRule, BLOCKQUOTE_PATTERN, BOLD_ITALIC_PATTERN, BOLD_PATTERN,
    CODE_BLOCK_PATTERN, HEADING_PATTERN, INLINE_CODE_PATTERN, ITALIC_PATTERN,
    STRIKETHROUGH_PATTERN,
};
pub use region::{is_fence_line, rescan_region, FenceIndex};
pub use token::{SyntaxKind, Token};
pub use tokenizer::scan;
pub use worker::{run_full_scan, ScanRequest, ScanResult, ScanWorker};
