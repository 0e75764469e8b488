//! Schema generation from sample XML
//!
//! Given one representative document, infer a field schema (primitive
//! type guessing, repeated-tag list detection, duplicate-structure
//! folding) and emit declarative model-builder source: leaf models
//! first, the root model last.

pub mod case;
pub mod emit;
pub mod infer;

pub use case::{to_pascal_case, to_snake_case};
pub use infer::{guess_type, PrimType};

use crate::error::Result;
use crate::xml::parser::parse_str;

/// Generate model-builder source from sample XML text
pub fn generate(xml: &str) -> Result<String> {
    let doc = parse_str(xml)?;
    let inference = infer::infer(&doc);
    Ok(emit::emit(&inference))
}
