//! XML document layer: DOM types, tokenizer, and writer
//!
//! The mapping engine treats this layer as an external collaborator: it
//! consumes and produces plain [`Element`] trees and never looks at raw
//! bytes itself.

pub mod model;
pub mod parser;
pub mod writer;

pub use model::{Content, Document, Element};
pub use parser::Parser;
pub use writer::{document_to_string, element_to_string, XML_DECLARATION};
