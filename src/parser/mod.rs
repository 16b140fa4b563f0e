pub mod lines;
pub mod text_processor;
pub mod title_page;
pub mod fountain_parser;
pub mod assembler;
pub mod structure_builder;
pub mod filter;
pub mod error;

pub use fountain_parser::FountainParser;
pub use error::{ParseError, ParseResult};
pub use text_processor::{classify_note, parse_inline};
