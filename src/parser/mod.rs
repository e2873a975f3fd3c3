//! Basic low-level character scanning and tokenizing.
mod buffered_byte_source;
pub mod byte_source;
mod in_memory_byte_source;
pub mod parsing_error;
pub mod scanner;
pub mod tokenizer;
pub mod utils;

pub use buffered_byte_source::{BufferedByteSource, StreamByteSource};
pub use byte_source::ByteSource;
pub use in_memory_byte_source::InMemoryByteSource;
pub use parsing_error::{ParsingError, ParsingErrorKind, Position};
pub use scanner::Scanner;
pub use tokenizer::{NexusTokenizer, Token};
