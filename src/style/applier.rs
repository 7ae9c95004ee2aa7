//! Token → attribute writes

use std::cmp::Reverse;
use std::ops::Range;

use super::sink::StyledTextSink;
use crate::syntax::{SyntaxCatalog, SyntaxKind, Token};

/// Paints scanned tokens onto a sink using the catalog's attribute sets
#[derive(Debug, Clone, Copy)]
pub struct StyleApplier<'a> {
    catalog: &'a SyntaxCatalog,
}

impl<'a> StyleApplier<'a> {
    pub fn new(catalog: &'a SyntaxCatalog) -> Self {
        Self { catalog }
    }

    /// Restyle `region` from scratch.
    ///
    /// The region is reset to the base attributes, then tokens are layered on,
    /// each with both delimiters first and the content last. Line-scoped
    /// kinds go first in catalog order; inline kinds follow outermost first,
    /// so a span nested inside another is always written after it. Later
    /// writes win per key, so nested syntax overrides outer syntax only for
    /// the keys it sets.
    pub fn apply(
        &self,
        tokens: &[Token],
        region: Range<usize>,
        sink: &mut dyn StyledTextSink,
        selected: bool,
    ) {
        if region.is_empty() {
            return;
        }
        sink.set_attributes(self.catalog.base(), region.clone());

        let mut ordered: Vec<&Token> = tokens.iter().collect();
        ordered.sort_by_key(|t| self.application_key(t));

        let mut writes = 0usize;
        for token in ordered {
            let Some(rule) = self.catalog.rule(token.kind) else {
                continue;
            };
            let delimiter = rule.delimiter.pick(selected);
            let content = rule.content.pick(selected);

            for (attributes, range) in [
                (delimiter, &token.leading),
                (delimiter, &token.trailing),
                (content, &token.content),
            ] {
                let range = clip(range, &region);
                if !range.is_empty() {
                    sink.add_attributes(attributes, range);
                    writes += 1;
                }
            }
        }

        tracing::trace!(
            start = region.start,
            end = region.end,
            tokens = tokens.len(),
            writes,
            "applied styles"
        );
    }

    /// Sort key: block kinds by catalog position, then inline kinds by
    /// containment with catalog position breaking ties
    fn application_key(&self, token: &Token) -> (bool, usize, usize, Reverse<usize>, usize) {
        let order = self.catalog.order_of(token.kind);
        if is_line_scoped(token.kind) {
            (false, order, token.full.start, Reverse(token.full.end), 0)
        } else {
            (true, 0, token.full.start, Reverse(token.full.end), order)
        }
    }
}

fn is_line_scoped(kind: SyntaxKind) -> bool {
    matches!(
        kind,
        SyntaxKind::CodeBlock | SyntaxKind::Heading | SyntaxKind::Blockquote
    )
}

fn clip(range: &Range<usize>, region: &Range<usize>) -> Range<usize> {
    let start = range.start.max(region.start);
    let end = range.end.min(region.end);
    start..end.max(start)
}
