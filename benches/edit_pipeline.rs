//! Benchmarks for the per-keystroke edit pipeline
//!
//! Run with: cargo bench --bench edit_pipeline

mod support;

use std::sync::Arc;

use livemark::style::AttributedText;
use livemark::syntax::SyntaxCatalog;
use livemark::text::{Buffer, LineIndex};
use livemark::EditCoordinator;

#[global_allocator]
static ALLOC: divan::AllocProfiler = divan::AllocProfiler::system();

fn main() {
    divan::main();
}

fn setup(messages: usize) -> (EditCoordinator, AttributedText) {
    let text = support::make_document(messages);
    let coordinator = EditCoordinator::new(&text, Arc::new(SyntaxCatalog::default()));
    let mut sink = AttributedText::new(coordinator.len());
    coordinator
        .restyle_all(&mut sink)
        .expect("fresh coordinator is idle");
    (coordinator, sink)
}

// ============================================================================
// Line index only
// ============================================================================

#[divan::bench(args = [100, 1_000, 10_000])]
fn line_index_insert_char_middle(bencher: divan::Bencher, lines: usize) {
    let text = "foo bar baz\n".repeat(lines);
    bencher
        .with_inputs(|| (Buffer::from_text(&text), LineIndex::from_text(&text)))
        .bench_local_values(|(mut buffer, mut index)| {
            let pos = buffer.len() / 2;
            buffer.replace(pos..pos, "x").unwrap();
            index.update(pos..pos, divan::black_box("x"), buffer.len());
            index
        });
}

#[divan::bench(args = [100, 1_000, 10_000])]
fn line_index_insert_newline_start(bencher: divan::Bencher, lines: usize) {
    let text = "foo bar baz\n".repeat(lines);
    bencher
        .with_inputs(|| (Buffer::from_text(&text), LineIndex::from_text(&text)))
        .bench_local_values(|(mut buffer, mut index)| {
            buffer.replace(0..0, "\n").unwrap();
            index.update(0..0, divan::black_box("\n"), buffer.len());
            index
        });
}

#[divan::bench(args = [1_000, 10_000])]
fn line_index_rebuild(lines: usize) -> LineIndex {
    let text = "foo bar baz\n".repeat(lines);
    LineIndex::from_text(divan::black_box(&text))
}

// ============================================================================
// Full pipeline
// ============================================================================

#[divan::bench(args = [10, 100, 1_000])]
fn keystroke_in_paragraph(bencher: divan::Bencher, messages: usize) {
    bencher
        .with_inputs(|| setup(messages))
        .bench_local_values(|(coordinator, mut sink)| {
            let pos = coordinator.len() - 2;
            coordinator
                .apply_edit(pos..pos, divan::black_box("x"), &mut sink)
                .unwrap();
            (coordinator, sink)
        });
}

#[divan::bench(args = [10, 100, 1_000])]
fn keystroke_in_code_block(bencher: divan::Bencher, messages: usize) {
    let offset = support::SAMPLE_MESSAGE
        .find("println")
        .expect("sample has code");
    bencher
        .with_inputs(|| setup(messages))
        .bench_local_values(|(coordinator, mut sink)| {
            coordinator
                .apply_edit(offset..offset, divan::black_box("x"), &mut sink)
                .unwrap();
            (coordinator, sink)
        });
}

#[divan::bench(args = [10, 100])]
fn insert_fence_flips_pairing(bencher: divan::Bencher, messages: usize) {
    bencher
        .with_inputs(|| setup(messages))
        .bench_local_values(|(coordinator, mut sink)| {
            coordinator
                .apply_edit(0..0, divan::black_box("```\n"), &mut sink)
                .unwrap();
            (coordinator, sink)
        });
}

#[divan::bench(args = [10, 100, 1_000])]
fn restyle_all(bencher: divan::Bencher, messages: usize) {
    bencher
        .with_inputs(|| setup(messages))
        .bench_local_values(|(coordinator, mut sink)| {
            coordinator.restyle_all(&mut sink).unwrap();
            (coordinator, sink)
        });
}
