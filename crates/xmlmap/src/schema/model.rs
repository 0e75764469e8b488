//! Model descriptors

use std::sync::Arc;

use crate::schema::field::Field;

/// A named, ordered collection of fields describing one XML element shape
///
/// Built once with the chained constructor methods and frozen behind an
/// [`Arc`] by [`build`](Self::build); every instance of the model shares
/// the same descriptor.
///
/// ```
/// use xmlmap::{Field, Model};
///
/// let hello = Model::new("Hello")
///     .field(Field::string("recipient").tagname("recipient"))
///     .build();
/// assert_eq!(hello.tag(), "Hello");
/// ```
#[derive(Clone, Debug)]
pub struct Model {
    name: String,
    tagname: Option<String>,
    order_sensitive: bool,
    fields: Vec<Field>,
}

impl Model {
    /// Start a model named `name`; the name doubles as the element tag
    /// unless overridden with [`tagname`](Self::tagname).
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            tagname: None,
            order_sensitive: true,
            fields: Vec::new(),
        }
    }

    /// Override the element tag this model matches and renders
    pub fn tagname(mut self, tag: impl Into<String>) -> Self {
        self.tagname = Some(tag.into());
        self
    }

    /// When false, rendering groups each list into one contiguous run in
    /// declared field order instead of replaying the parsed interleaving.
    pub fn order_sensitive(mut self, value: bool) -> Self {
        self.order_sensitive = value;
        self
    }

    /// Append a declared field
    pub fn field(mut self, field: Field) -> Self {
        self.fields.push(field);
        self
    }

    /// Freeze the descriptor for sharing
    pub fn build(self) -> Arc<Self> {
        Arc::new(self)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Effective element tag: the override, else the model name
    pub fn tag(&self) -> &str {
        self.tagname.as_deref().unwrap_or(&self.name)
    }

    pub fn is_order_sensitive(&self) -> bool {
        self.order_sensitive
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub(crate) fn field_index(&self, name: &str) -> Option<usize> {
        self.fields.iter().position(|f| f.name() == name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_defaults_to_name() {
        let model = Model::new("Block");
        assert_eq!(model.tag(), "Block");

        let model = Model::new("Block").tagname("BLOCK");
        assert_eq!(model.tag(), "BLOCK");
        assert_eq!(model.name(), "Block");
    }

    #[test]
    fn test_order_sensitive_default() {
        let model = Model::new("M");
        assert!(model.is_order_sensitive());
        assert!(!Model::new("M").order_sensitive(false).is_order_sensitive());
    }

    #[test]
    fn test_field_lookup() {
        let model = Model::new("M")
            .field(Field::string("a"))
            .field(Field::string("b"));
        assert_eq!(model.field_index("b"), Some(1));
        assert_eq!(model.field_index("c"), None);
    }
}
