//! Located markdown matches

use std::ops::Range;

use serde::Serialize;

/// The closed set of markdown constructs styled live
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SyntaxKind {
    CodeBlock,
    Heading,
    Blockquote,
    InlineCode,
    BoldItalic,
    Bold,
    Italic,
    Strikethrough,
}

impl SyntaxKind {
    /// Code constructs hide any markup inside them
    pub fn is_code(self) -> bool {
        matches!(self, SyntaxKind::CodeBlock | SyntaxKind::InlineCode)
    }
}

/// One rule match split into delimiter and content ranges.
///
/// All ranges are char offsets in buffer coordinates and
/// `full == leading.start..trailing.end`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Token {
    pub kind: SyntaxKind,
    pub full: Range<usize>,
    pub leading: Range<usize>,
    pub content: Range<usize>,
    pub trailing: Range<usize>,
}

impl Token {
    pub fn new(
        kind: SyntaxKind,
        leading: Range<usize>,
        content: Range<usize>,
        trailing: Range<usize>,
    ) -> Self {
        Self {
            kind,
            full: leading.start..trailing.end,
            leading,
            content,
            trailing,
        }
    }

    /// Whether either delimiter overlaps `span`
    pub fn delimiters_overlap(&self, span: &Range<usize>) -> bool {
        overlaps(&self.leading, span) || overlaps(&self.trailing, span)
    }
}

fn overlaps(a: &Range<usize>, b: &Range<usize>) -> bool {
    a.start < b.end && b.start < a.end
}
