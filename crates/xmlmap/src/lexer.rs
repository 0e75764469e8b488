//! Lexical scanning support for the XML tokenizer

pub mod cursor;

pub use cursor::Cursor;
