//! Shared helpers for benchmarks

/// One chat-style message exercising every styled construct
pub const SAMPLE_MESSAGE: &str = "## Summary\n\
> Quoted context from an earlier reply\n\
Use `cargo bench` with **care**, *emphasis* and _style_, not ~~this~~.\n\
```rust\n\
fn main() {\n\
    println!(\"hello\");\n\
}\n\
```\n\
Plain closing paragraph with no markup at all.\n";

/// A markdown document of roughly `messages` sample messages
#[allow(dead_code)]
pub fn make_document(messages: usize) -> String {
    SAMPLE_MESSAGE.repeat(messages)
}
