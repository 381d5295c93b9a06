//! Layout tokenization: turning PDF pages into ordered text runs.

mod content;
mod options;
mod tokenizer;

pub use options::{ErrorMode, ParseOptions};
pub use tokenizer::Tokenizer;
