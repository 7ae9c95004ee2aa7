//! Document text and its line structure

mod buffer;
mod line_index;

pub use buffer::Buffer;
pub use line_index::{LineIndex, LineRange};
