//! The fixed table of markdown rules
//!
//! Each rule pairs a matcher with the attributes for its content and its
//! delimiters. Matchers are built from constant patterns; only the colours
//! come from the theme.
//!
//! A matcher exposes its parts as capture triples `(leading)(content)(trailing)`.
//! Patterns with alternatives repeat the triple once per alternative and the
//! tokenizer uses whichever triple took part in the match.

use std::sync::OnceLock;

use regex::Regex;

use super::token::SyntaxKind;
use crate::style::{AttributeSet, FontWeight, StyleVariant};
use crate::theme::Theme;

/// Fenced block: a line starting with three backticks up to the next such line.
/// Lazy across the whole text, so it must see both fences to match.
pub const CODE_BLOCK_PATTERN: &str = r"(?ms)^(```[^\n]*\n)(.*?)(^```[^\n]*$)";
pub const HEADING_PATTERN: &str = r"(?m)^(#{1,6}[ \t]+)([^\n]*)()$";
pub const BLOCKQUOTE_PATTERN: &str = r"(?m)^( {0,3}>[ \t]?)([^\n]*)()$";
pub const INLINE_CODE_PATTERN: &str = r"(`)([^`\n]+)(`)";
pub const BOLD_ITALIC_PATTERN: &str = concat!(
    r"(\*\*\*)([^\s*](?:[^\n*]*[^\s*])?)(\*\*\*)",
    r"|\b(___)([^\s_](?:[^\n_]*[^\s_])?)(___)\b",
);
/// `*text*` is bold, chat style; single underscores are italic
pub const BOLD_PATTERN: &str = concat!(
    r"(\*\*)([^\s*](?:[^\n*]*[^\s*])?)(\*\*)",
    r"|\b(__)([^\s_](?:[^\n_]*[^\s_])?)(__)\b",
    r"|(\*)([^\s*](?:[^\n*]*[^\s*])?)(\*)",
);
pub const ITALIC_PATTERN: &str = r"\b(_)([^\s_](?:[^\n_]*[^\s_])?)(_)\b";
pub const STRIKETHROUGH_PATTERN: &str = concat!(
    r"(~~)([^\s~](?:[^\n~]*[^\s~])?)(~~)",
    r"|(~)([^\s~](?:[^\n~]*[^\s~])?)(~)",
);

/// Catalog order: outer constructs first, nested ones last
const PATTERNS: &[(SyntaxKind, &str)] = &[
    (SyntaxKind::CodeBlock, CODE_BLOCK_PATTERN),
    (SyntaxKind::Heading, HEADING_PATTERN),
    (SyntaxKind::Blockquote, BLOCKQUOTE_PATTERN),
    (SyntaxKind::InlineCode, INLINE_CODE_PATTERN),
    (SyntaxKind::BoldItalic, BOLD_ITALIC_PATTERN),
    (SyntaxKind::Bold, BOLD_PATTERN),
    (SyntaxKind::Italic, ITALIC_PATTERN),
    (SyntaxKind::Strikethrough, STRIKETHROUGH_PATTERN),
];

/// Heading content size relative to body text
const HEADING_SCALE_PERCENT: u16 = 125;

fn matchers() -> &'static [(SyntaxKind, Regex)] {
    static MATCHERS: OnceLock<Vec<(SyntaxKind, Regex)>> = OnceLock::new();
    MATCHERS.get_or_init(|| {
        PATTERNS
            .iter()
            .map(|&(kind, pattern)| {
                let regex = Regex::new(pattern).expect("built-in markdown pattern is valid");
                (kind, regex)
            })
            .collect()
    })
}

/// One markdown construct: how to find it and how to paint it
#[derive(Debug, Clone)]
pub struct SyntaxRule {
    pub kind: SyntaxKind,
    matcher: Regex,
    pub content: StyleVariant,
    pub delimiter: StyleVariant,
}

impl SyntaxRule {
    pub fn matcher(&self) -> &Regex {
        &self.matcher
    }

    /// Number of (leading, content, trailing) alternatives in the matcher
    pub fn triples(&self) -> usize {
        (self.matcher.captures_len() - 1) / 3
    }
}

/// Immutable rule table shared by every scan
#[derive(Debug, Clone)]
pub struct SyntaxCatalog {
    rules: Vec<SyntaxRule>,
    base: AttributeSet,
}

impl Default for SyntaxCatalog {
    fn default() -> Self {
        Self::with_theme(&Theme::default())
    }
}

impl SyntaxCatalog {
    /// Build the catalog with attribute sets derived from `theme`
    pub fn with_theme(theme: &Theme) -> Self {
        let md = &theme.markdown;
        let delimiter = StyleVariant::new(
            AttributeSet::new().foreground(md.delimiter),
            AttributeSet::new().foreground(md.delimiter_selected),
        );
        let code_delimiter = |background| {
            let code = AttributeSet::new().monospace(true).background(background);
            StyleVariant::new(
                delimiter.normal.merged(&code),
                delimiter.selected.merged(&code),
            )
        };

        let rules = matchers()
            .iter()
            .map(|(kind, matcher)| {
                let (content, delimiter) = match kind {
                    SyntaxKind::CodeBlock => (
                        AttributeSet::new()
                            .foreground(md.code_foreground)
                            .background(md.code_block_background)
                            .monospace(true)
                            .weight(FontWeight::Regular)
                            .italic(false)
                            .strikethrough(false),
                        code_delimiter(md.code_block_background),
                    ),
                    SyntaxKind::Heading => (
                        AttributeSet::new()
                            .foreground(md.heading)
                            .weight(FontWeight::Bold)
                            .font_scale(HEADING_SCALE_PERCENT),
                        delimiter.clone(),
                    ),
                    SyntaxKind::Blockquote => (
                        AttributeSet::new().foreground(md.quote).italic(true),
                        delimiter.clone(),
                    ),
                    SyntaxKind::InlineCode => (
                        AttributeSet::new()
                            .foreground(md.code_foreground)
                            .background(md.code_background)
                            .monospace(true),
                        code_delimiter(md.code_background),
                    ),
                    SyntaxKind::BoldItalic => (
                        AttributeSet::new()
                            .foreground(md.strong)
                            .weight(FontWeight::Bold)
                            .italic(true),
                        delimiter.clone(),
                    ),
                    SyntaxKind::Bold => (
                        AttributeSet::new()
                            .foreground(md.strong)
                            .weight(FontWeight::Bold),
                        delimiter.clone(),
                    ),
                    SyntaxKind::Italic => (
                        AttributeSet::new().foreground(md.emphasis).italic(true),
                        delimiter.clone(),
                    ),
                    SyntaxKind::Strikethrough => (
                        AttributeSet::new()
                            .foreground(md.strikethrough)
                            .strikethrough(true),
                        delimiter.clone(),
                    ),
                };
                SyntaxRule {
                    kind: *kind,
                    matcher: matcher.clone(),
                    content: StyleVariant::uniform(content),
                    delimiter,
                }
            })
            .collect();

        Self {
            rules,
            base: AttributeSet::new()
                .foreground(md.text)
                .weight(FontWeight::Regular),
        }
    }

    pub fn rules(&self) -> &[SyntaxRule] {
        &self.rules
    }

    pub fn rule(&self, kind: SyntaxKind) -> Option<&SyntaxRule> {
        self.rules.iter().find(|r| r.kind == kind)
    }

    /// Position of `kind` in application order
    pub fn order_of(&self, kind: SyntaxKind) -> usize {
        self.rules
            .iter()
            .position(|r| r.kind == kind)
            .unwrap_or(self.rules.len())
    }

    /// Paragraph-level attributes every styled region starts from
    pub fn base(&self) -> &AttributeSet {
        &self.base
    }

    /// Catalog restricted to the given kinds, keeping catalog order
    pub fn subset(&self, kinds: &[SyntaxKind]) -> Self {
        Self {
            rules: self
                .rules
                .iter()
                .filter(|r| kinds.contains(&r.kind))
                .cloned()
                .collect(),
            base: self.base.clone(),
        }
    }
}
