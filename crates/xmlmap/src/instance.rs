//! Model instances
//!
//! An [`Instance`] is the dynamic value side of a [`Model`]: one optional
//! slot per declared field, plus the ordering record the parser captured
//! when the model is order-sensitive. Slots left unset fall back to the
//! field default at render time.

use std::sync::Arc;

use crate::error::{Error, ErrorKind, Result};
use crate::schema::model::Model;
use crate::value::Value;

/// A value held in one field slot
#[derive(Clone, Debug)]
pub enum Slot {
    Str(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Model(Instance),
    List(Vec<Slot>),
}

impl Slot {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_model(&self) -> Option<&Instance> {
        match self {
            Self::Model(instance) => Some(instance),
            _ => None,
        }
    }

    pub fn as_list(&self) -> Option<&[Slot]> {
        match self {
            Self::List(items) => Some(items),
            _ => None,
        }
    }
}

impl From<&str> for Slot {
    fn from(value: &str) -> Self {
        Self::Str(value.to_owned())
    }
}

impl From<String> for Slot {
    fn from(value: String) -> Self {
        Self::Str(value)
    }
}

impl From<i64> for Slot {
    fn from(value: i64) -> Self {
        Self::Int(value)
    }
}

impl From<f64> for Slot {
    fn from(value: f64) -> Self {
        Self::Float(value)
    }
}

impl From<bool> for Slot {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<Instance> for Slot {
    fn from(value: Instance) -> Self {
        Self::Model(value)
    }
}

impl From<Vec<Slot>> for Slot {
    fn from(value: Vec<Slot>) -> Self {
        Self::List(value)
    }
}

/// One recorded child position: which field consumed it, and which list
/// member it was (0 for scalar fields). Entries are kept in document
/// order so the renderer can replay the exact interleaving.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct OrderEntry {
    pub field: usize,
    pub item: usize,
}

/// A populated (or default-backed) instance of a model
#[derive(Clone, Debug)]
pub struct Instance {
    model: Arc<Model>,
    slots: Vec<Option<Slot>>,
    order: Option<Vec<OrderEntry>>,
}

impl Instance {
    /// Fresh instance with every slot unset; defaults materialize at
    /// render time.
    pub fn new(model: &Arc<Model>) -> Self {
        Self {
            model: Arc::clone(model),
            slots: vec![None; model.fields().len()],
            order: None,
        }
    }

    pub fn model(&self) -> &Arc<Model> {
        &self.model
    }

    /// Set a field by name
    pub fn set(&mut self, field: &str, value: impl Into<Slot>) -> Result<()> {
        match self.model.field_index(field) {
            Some(idx) => {
                self.set_slot(idx, value.into());
                Ok(())
            }
            None => Err(Error::mapping(ErrorKind::UnknownField {
                field: format!("{}.{field}", self.model.name()),
            })),
        }
    }

    /// Explicitly set value of a field, if any; defaults are not visible
    /// through this accessor.
    pub fn get(&self, field: &str) -> Option<&Slot> {
        let idx = self.model.field_index(field)?;
        self.slots.get(idx)?.as_ref()
    }

    /// Render to XML text (see [`crate::render::render`])
    pub fn render(&self) -> Result<String> {
        crate::render::render(self)
    }

    /// Render to JSON text (see [`crate::project::render_json`])
    pub fn render_json(&self, use_field_names: bool, flatten: bool) -> Result<String> {
        crate::project::render_json(self, use_field_names, flatten)
    }

    /// Project into a plain nested mapping (see [`crate::project::to_projection`])
    pub fn to_projection(&self, use_field_names: bool) -> Result<Value> {
        crate::project::to_projection(self, use_field_names)
    }

    pub(crate) fn set_slot(&mut self, idx: usize, value: Slot) {
        if let Some(slot) = self.slots.get_mut(idx) {
            *slot = Some(value);
        }
    }

    pub(crate) fn slot(&self, idx: usize) -> Option<&Slot> {
        self.slots.get(idx)?.as_ref()
    }

    pub(crate) fn set_order(&mut self, order: Vec<OrderEntry>) {
        self.order = Some(order);
    }

    pub(crate) fn order(&self) -> Option<&[OrderEntry]> {
        self.order.as_deref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::field::Field;

    #[test]
    fn test_set_and_get() -> Result<()> {
        let model = Model::new("M")
            .field(Field::string("name"))
            .field(Field::integer("size").tagname("Size"))
            .build();
        let mut instance = Instance::new(&model);
        assert!(instance.get("name").is_none());

        instance.set("name", "x")?;
        instance.set("size", 42i64)?;
        assert_eq!(instance.get("name").and_then(Slot::as_str), Some("x"));
        assert_eq!(instance.get("size").and_then(Slot::as_int), Some(42));
        Ok(())
    }

    #[test]
    fn test_set_unknown_field() {
        let model = Model::new("M").field(Field::string("name")).build();
        let mut instance = Instance::new(&model);
        let err = instance.set("nope", "x").unwrap_err();
        assert_eq!(
            err.kind(),
            &ErrorKind::UnknownField {
                field: "M.nope".to_string()
            }
        );
    }
}
