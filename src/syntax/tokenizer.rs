//! Rule matching over a bounded region of text

use std::ops::Range;

use regex::Captures;

use super::catalog::SyntaxRule;
use super::token::{SyntaxKind, Token};

/// Byte offset → char offset translation for one slice
enum CharMap {
    Ascii,
    Table(Vec<usize>),
}

impl CharMap {
    fn new(text: &str) -> Self {
        if text.is_ascii() {
            return CharMap::Ascii;
        }
        let mut table = vec![0; text.len() + 1];
        let mut count = 0;
        for (byte, _) in text.char_indices() {
            table[byte] = count;
            count += 1;
        }
        table[text.len()] = count;
        CharMap::Table(table)
    }

    fn char_offset(&self, byte: usize) -> usize {
        match self {
            CharMap::Ascii => byte,
            CharMap::Table(table) => table[byte],
        }
    }

    fn range(&self, base: usize, bytes: Range<usize>) -> Range<usize> {
        base + self.char_offset(bytes.start)..base + self.char_offset(bytes.end)
    }
}

/// Find every match of every rule in `text`, which starts at buffer offset
/// `base`.
///
/// Each rule scans the whole slice independently: matches are leftmost-first
/// and non-overlapping within a rule, and never extend past the slice.
/// Markup whose closing delimiter is missing simply produces no token.
/// Non-code tokens whose delimiters fall inside a code span or code block
/// are dropped. Tokens come out grouped by rule in the order of `rules`.
pub fn scan(text: &str, base: usize, rules: &[SyntaxRule]) -> Vec<Token> {
    let chars = CharMap::new(text);
    let mut tokens = Vec::new();

    for rule in rules {
        for caps in rule.matcher().captures_iter(text) {
            if let Some(token) = resolve(rule, &caps, &chars, base) {
                tokens.push(token);
            }
        }
    }

    drop_tokens_inside_code(&mut tokens);

    tracing::trace!(
        base,
        len = text.len(),
        tokens = tokens.len(),
        "scanned region"
    );
    tokens
}

/// Pick the first capture triple that took part in the match
fn resolve(rule: &SyntaxRule, caps: &Captures<'_>, chars: &CharMap, base: usize) -> Option<Token> {
    (0..rule.triples()).find_map(|t| {
        let leading = caps.get(3 * t + 1)?;
        let content = caps.get(3 * t + 2)?;
        let trailing = caps.get(3 * t + 3)?;
        Some(Token::new(
            rule.kind,
            chars.range(base, leading.range()),
            chars.range(base, content.range()),
            chars.range(base, trailing.range()),
        ))
    })
}

fn drop_tokens_inside_code(tokens: &mut Vec<Token>) {
    let mut blocks: Vec<Range<usize>> = Vec::new();
    let mut spans: Vec<Range<usize>> = Vec::new();
    for token in tokens.iter().filter(|t| t.kind.is_code()) {
        match token.kind {
            SyntaxKind::CodeBlock => blocks.push(token.full.clone()),
            _ => spans.push(token.full.clone()),
        }
    }
    if blocks.is_empty() && spans.is_empty() {
        return;
    }

    tokens.retain(|token| {
        if !token.kind.is_code() {
            return !blocks
                .iter()
                .chain(spans.iter())
                .any(|code| token.delimiters_overlap(code));
        }
        // code spans are only hidden by fenced blocks
        token.kind == SyntaxKind::CodeBlock
            || !blocks.iter().any(|b| token.delimiters_overlap(b))
    });
}
