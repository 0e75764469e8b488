//! Schema descriptors: models and their declared fields
//!
//! A schema is plain data built once and shared behind an [`Arc`]: a
//! [`Model`] holds an ordered list of [`Field`] records, and the generic
//! parse/render engines dispatch on those records. No per-model code is
//! generated and nothing is discovered at runtime.
//!
//! [`Arc`]: std::sync::Arc

pub mod field;
pub mod model;

pub use field::{find_list_names, Field, FieldDefault, FieldKind};
pub use model::Model;
