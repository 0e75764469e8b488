//! Field declarations
//!
//! A [`Field`] describes how one value slot of a model maps onto XML:
//! what primitive or nested type it carries, whether it lives in an
//! attribute, a child element, or an inline run of repeated elements,
//! and what happens when it is absent (default value, default factory,
//! or a hard requirement).

use std::fmt;
use std::sync::Arc;

use crate::error::{Error, ErrorKind, Result};
use crate::instance::{Instance, Slot};
use crate::schema::model::Model;

/// The closed set of field variants
#[derive(Clone)]
pub enum FieldKind {
    /// Text content, kept byte-exact
    String,
    /// Base-10 signed integer
    Integer,
    /// Base-10 decimal number
    Float,
    /// Case-insensitive `true`/`false` on input, lowercase on output
    Boolean,
    /// Nested model, parsed and rendered by its own schema
    Model(Arc<Model>),
    /// Inline run of repeated elements described by an inner field
    /// template. Absence parses as an empty list even when the field is
    /// required; this leniency is deliberate and does not extend to
    /// scalar fields.
    List(Box<Field>),
}

impl FieldKind {
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::String | Self::Integer | Self::Float | Self::Boolean
        )
    }

    pub(crate) fn type_name(&self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
            Self::Model(_) => "model",
            Self::List(_) => "list",
        }
    }

    /// Convert primitive text into a slot value; `path` names the field
    /// in the error when the text does not convert.
    pub(crate) fn parse_scalar(&self, text: &str, path: &str) -> Result<Slot> {
        let invalid = || {
            Error::mapping(ErrorKind::InvalidValue {
                field: path.to_string(),
                expected: self.type_name(),
            })
        };
        match self {
            Self::String => Ok(Slot::Str(text.to_string())),
            Self::Integer => text
                .trim()
                .parse::<i64>()
                .map(Slot::Int)
                .map_err(|_| invalid()),
            Self::Float => text
                .trim()
                .parse::<f64>()
                .map(Slot::Float)
                .map_err(|_| invalid()),
            Self::Boolean => {
                let trimmed = text.trim();
                if trimmed.eq_ignore_ascii_case("true") {
                    Ok(Slot::Bool(true))
                } else if trimmed.eq_ignore_ascii_case("false") {
                    Ok(Slot::Bool(false))
                } else {
                    Err(invalid())
                }
            }
            Self::Model(_) | Self::List(_) => Err(invalid()),
        }
    }
}

impl fmt::Debug for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Model(m) => write!(f, "Model({})", m.name()),
            Self::List(inner) => write!(f, "List({:?})", inner.kind()),
            other => f.write_str(other.type_name()),
        }
    }
}

/// Where a field lives in the parent XML element
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Placement {
    /// XML attribute; `None` binds by the field name
    Attribute(Option<String>),
    /// Child element; `None` binds by the field name (primitives) or by
    /// the nested model's tag
    Element(Option<String>),
}

/// Default applied when a slot was never set
#[derive(Clone)]
pub enum FieldDefault {
    /// Static value
    Value(Slot),
    /// Zero-argument factory, materialized at the point of use
    Factory(Arc<dyn Fn() -> Slot + Send + Sync>),
}

impl FieldDefault {
    pub(crate) fn materialize(&self) -> Slot {
        match self {
            Self::Value(v) => v.clone(),
            Self::Factory(f) => f(),
        }
    }
}

impl fmt::Debug for FieldDefault {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Value(v) => write!(f, "Value({v:?})"),
            Self::Factory(_) => f.write_str("Factory(..)"),
        }
    }
}

/// One declared mapping between a model value slot and a location in XML
#[derive(Clone, Debug)]
pub struct Field {
    name: String,
    kind: FieldKind,
    placement: Placement,
    default: Option<FieldDefault>,
    required: bool,
}

impl Field {
    fn primitive(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            kind,
            placement: Placement::Attribute(None),
            default: None,
            required: true,
        }
    }

    /// Text field; binds an attribute named after the field unless
    /// [`tagname`](Self::tagname) or [`element`](Self::element) moves it
    /// into a child element.
    pub fn string(name: impl Into<String>) -> Self {
        Self::primitive(name, FieldKind::String)
    }

    /// Base-10 integer field
    pub fn integer(name: impl Into<String>) -> Self {
        Self::primitive(name, FieldKind::Integer)
    }

    /// Decimal number field
    pub fn float(name: impl Into<String>) -> Self {
        Self::primitive(name, FieldKind::Float)
    }

    /// Boolean field
    pub fn boolean(name: impl Into<String>) -> Self {
        Self::primitive(name, FieldKind::Boolean)
    }

    /// Nested model field; matches a child element tagged with the
    /// nested model's tag unless overridden with [`tagname`](Self::tagname).
    pub fn model(name: impl Into<String>, model: &Arc<Model>) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::Model(Arc::clone(model)),
            placement: Placement::Element(None),
            default: None,
            required: true,
        }
    }

    /// Inline list field; `item` is the template for every member.
    pub fn list(name: impl Into<String>, item: Field) -> Self {
        Self {
            name: name.into(),
            kind: FieldKind::List(Box::new(item)),
            placement: Placement::Element(None),
            default: None,
            required: true,
        }
    }

    /// Bind as a child element with the given tag
    pub fn tagname(mut self, tag: impl Into<String>) -> Self {
        self.placement = Placement::Element(Some(tag.into()));
        self
    }

    /// Bind as a child element tagged by the field name
    pub fn element(mut self) -> Self {
        self.placement = Placement::Element(None);
        self
    }

    /// Bind as an XML attribute with the given name
    pub fn attribute(mut self, name: impl Into<String>) -> Self {
        self.placement = Placement::Attribute(Some(name.into()));
        self
    }

    /// Absence is not an error; the field is simply omitted
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    /// Static default value
    pub fn default_value(mut self, value: impl Into<Slot>) -> Self {
        self.default = Some(FieldDefault::Value(value.into()));
        self
    }

    /// Factory default, called whenever the default is needed
    pub fn default_with(mut self, factory: impl Fn() -> Slot + Send + Sync + 'static) -> Self {
        self.default = Some(FieldDefault::Factory(Arc::new(factory)));
        self
    }

    /// Default a nested-model field to an instance built from the nested
    /// model's own defaults. No effect on other kinds.
    pub fn nested_default(mut self) -> Self {
        if let FieldKind::Model(model) = &self.kind {
            let model = Arc::clone(model);
            self.default = Some(FieldDefault::Factory(Arc::new(move || {
                Slot::Model(Instance::new(&model))
            })));
        }
        self
    }

    /// Default a list-of-models field to `count` instances built from the
    /// member model's own defaults. No effect on other kinds.
    pub fn nested_defaults(mut self, count: usize) -> Self {
        if let FieldKind::List(item) = &self.kind {
            if let FieldKind::Model(model) = item.kind() {
                let model = Arc::clone(model);
                self.default = Some(FieldDefault::Factory(Arc::new(move || {
                    Slot::List(
                        (0..count)
                            .map(|_| Slot::Model(Instance::new(&model)))
                            .collect(),
                    )
                })));
            }
        }
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> &FieldKind {
        &self.kind
    }

    pub fn is_required(&self) -> bool {
        self.required
    }

    pub fn is_attribute(&self) -> bool {
        matches!(self.placement, Placement::Attribute(_))
    }

    /// Resolved attribute name, for attribute-placed fields
    pub fn attribute_name(&self) -> &str {
        match &self.placement {
            Placement::Attribute(Some(name)) => name,
            _ => &self.name,
        }
    }

    /// Resolved element tag, for element-placed fields. Lists resolve to
    /// their member tag.
    pub fn element_tag(&self) -> Option<&str> {
        match &self.placement {
            Placement::Attribute(_) => None,
            Placement::Element(Some(tag)) => Some(tag),
            Placement::Element(None) => match &self.kind {
                FieldKind::Model(model) => Some(model.tag()),
                FieldKind::List(inner) => inner.element_tag(),
                _ => Some(&self.name),
            },
        }
    }

    pub(crate) fn default(&self) -> Option<&FieldDefault> {
        self.default.as_ref()
    }

    pub(crate) fn materialize_default(&self) -> Option<Slot> {
        self.default.as_ref().map(FieldDefault::materialize)
    }
}

/// Every list-designated path in a model tree, as (field name, member
/// element tag) pairs, discovered by walking the declared field graph in
/// depth-first declared order. The data is never consulted; this is what
/// lets the JSON projection keep single-member lists as sequences.
pub fn find_list_names(model: &Model) -> Vec<(String, String)> {
    let mut names = Vec::new();
    collect_list_names(model, &mut names);
    names
}

fn collect_list_names(model: &Model, names: &mut Vec<(String, String)>) {
    for field in model.fields() {
        match field.kind() {
            FieldKind::Model(nested) => collect_list_names(nested, names),
            FieldKind::List(inner) => {
                let tag = field.element_tag().unwrap_or(field.name());
                names.push((field.name().to_string(), tag.to_string()));
                if let FieldKind::Model(nested) = inner.kind() {
                    collect_list_names(nested, names);
                }
            }
            _ => {}
        }
    }
}
