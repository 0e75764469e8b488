//! xmlmap - Declarative object/XML mapping
//!
//! Declare a model as an ordered set of typed fields and get parse
//! (XML to instance) and render (instance to XML) as exact inverses:
//! for an order-sensitive model, rendering a parsed instance reproduces
//! the input byte for byte.
//!
//! # Quick Start
//!
//! ```
//! use xmlmap::{Field, Model};
//! # fn main() -> Result<(), xmlmap::Error> {
//! let model = Model::new("Hello")
//!     .field(Field::string("recipient").tagname("recipient"))
//!     .field(Field::integer("size").tagname("size").default_value(42i64))
//!     .build();
//!
//! let hello = xmlmap::parse(
//!     &model,
//!     "<?xml version=\"1.0\" ?><Hello><recipient>world</recipient><size>3</size></Hello>",
//! )?;
//! assert_eq!(
//!     hello.render()?,
//!     "<?xml version=\"1.0\" ?><Hello><recipient>world</recipient><size>3</size></Hello>"
//! );
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub use error::{Error, ErrorKind, Pos, Result, Span};

pub mod lexer;
pub use lexer::Cursor;

pub mod xml;
pub use xml::{Content as XmlContent, Document as XmlDocument, Element as XmlElement};

pub mod value;
pub use value::{Array, Object, Value};

pub mod schema;
pub use schema::{find_list_names, Field, FieldDefault, FieldKind, Model};

pub mod instance;
pub use instance::{Instance, Slot};

pub mod parse;
pub use parse::{parse, parse_element};

pub mod render;
pub use render::render;

pub mod project;
pub use project::{flatten, promote_lists, render_json, to_projection};

pub mod generate;
pub use generate::{generate, guess_type, to_pascal_case, to_snake_case, PrimType};
