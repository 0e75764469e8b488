//! Model-level render engine: instances back to XML text
//!
//! Every render resolves each field to an effective value first: the
//! explicitly set slot, else the field default, else a hard error for
//! required fields. Attributes go onto the opening tag in declared order.
//! Children either replay the ordering record captured at parse time
//! (order-sensitive models) or follow declared field order with each
//! list rendered as one contiguous run.

use crate::error::{Error, ErrorKind, Result};
use crate::instance::{Instance, Slot};
use crate::schema::field::{Field, FieldKind};
use crate::xml::model::{Content, Element};
use crate::xml::writer::{element_to_string, XML_DECLARATION};

/// Render an instance to a complete XML document
///
/// The output starts with `<?xml version="1.0" ?>` and carries no
/// indentation and no trailing newline. For an order-sensitive instance
/// produced by [`parse`](crate::parse::parse) with every required field
/// present in the input, the result is byte-identical to that input.
pub fn render(instance: &Instance) -> Result<String> {
    let element = render_instance(instance, instance.model().tag(), instance.model().name())?;
    let mut output = String::from(XML_DECLARATION);
    output.push_str(&element_to_string(&element));
    Ok(output)
}

fn render_instance(instance: &Instance, tag: &str, path: &str) -> Result<Element> {
    let model = instance.model();
    let fields = model.fields();

    let mut effective: Vec<Option<Slot>> = Vec::with_capacity(fields.len());
    for (idx, field) in fields.iter().enumerate() {
        let value = match instance.slot(idx) {
            Some(slot) => Some(slot.clone()),
            None => match field.materialize_default() {
                Some(default) => Some(default),
                None if field.is_required() => {
                    return Err(Error::mapping(ErrorKind::MissingValue {
                        field: format!("{path}.{}", field.name()),
                    }));
                }
                None => None,
            },
        };
        effective.push(value);
    }

    let mut element = Element::new(tag);

    for (idx, field) in fields.iter().enumerate() {
        if !field.is_attribute() {
            continue;
        }
        if let Some(Some(slot)) = effective.get(idx) {
            element
                .attributes
                .insert(field.attribute_name().to_string(), render_scalar(slot));
        }
    }

    // item lists per field: one entry for a scalar, the members for a list
    let items: Vec<Vec<&Slot>> = effective
        .iter()
        .map(|value| match value {
            Some(Slot::List(members)) => members.iter().collect(),
            Some(slot) => vec![slot],
            None => Vec::new(),
        })
        .collect();
    let mut rendered: Vec<Vec<bool>> = items.iter().map(|v| vec![false; v.len()]).collect();

    if model.is_order_sensitive() {
        if let Some(order) = instance.order() {
            for entry in order {
                let Some(field) = fields.get(entry.field) else {
                    continue;
                };
                if field.is_attribute() {
                    continue;
                }
                let Some(slot) = items.get(entry.field).and_then(|v| v.get(entry.item)) else {
                    continue;
                };
                let child = render_child(field, slot, path)?;
                element.children.push(Content::Element(child));
                if let Some(flag) = rendered
                    .get_mut(entry.field)
                    .and_then(|v| v.get_mut(entry.item))
                {
                    *flag = true;
                }
            }
        }
    }

    // declared-order pass: everything the replay did not cover
    for (idx, field) in fields.iter().enumerate() {
        if field.is_attribute() {
            continue;
        }
        let (Some(field_items), Some(field_rendered)) = (items.get(idx), rendered.get(idx)) else {
            continue;
        };
        for (item, slot) in field_items.iter().enumerate() {
            if field_rendered.get(item).copied().unwrap_or(true) {
                continue;
            }
            let child = render_child(field, slot, path)?;
            element.children.push(Content::Element(child));
        }
    }

    Ok(element)
}

fn render_child(field: &Field, slot: &Slot, path: &str) -> Result<Element> {
    let fpath = format!("{path}.{}", field.name());
    let item_field = match field.kind() {
        FieldKind::List(item) => item.as_ref(),
        _ => field,
    };
    let Some(tag) = field.element_tag() else {
        // element-placed fields always resolve a tag; placate the type system
        return Err(Error::mapping(ErrorKind::MissingValue { field: fpath }));
    };

    match slot {
        Slot::Model(instance) => render_instance(instance, tag, &fpath),
        Slot::List(_) => Err(Error::mapping(ErrorKind::InvalidValue {
            field: fpath,
            expected: item_field.kind().type_name(),
        })),
        scalar => {
            let mut element = Element::new(tag);
            let text = render_scalar(scalar);
            if !text.is_empty() {
                element.children.push(Content::Text(text));
            }
            Ok(element)
        }
    }
}

fn render_scalar(slot: &Slot) -> String {
    match slot {
        Slot::Str(s) => s.clone(),
        Slot::Int(v) => v.to_string(),
        Slot::Float(v) => v.to_string(),
        Slot::Bool(v) => v.to_string(),
        Slot::Model(_) | Slot::List(_) => String::new(),
    }
}
