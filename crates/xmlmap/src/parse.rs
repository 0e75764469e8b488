//! Model-level parse engine: XML onto instances
//!
//! One pass over a single element: attributes are read first, then scalar
//! element fields claim the first unconsumed matching child each, then
//! list fields sweep up every remaining matching child. A child is
//! consumed at most once across all fields; children no field claims are
//! ignored, as is text sitting directly inside the element. The first
//! unmet required field aborts the whole parse — no partial instances.

use std::sync::Arc;

use crate::error::{Error, ErrorKind, Result};
use crate::instance::{Instance, OrderEntry, Slot};
use crate::schema::field::{Field, FieldKind};
use crate::schema::model::Model;
use crate::xml::model::Element;
use crate::xml::parser::parse_str;

/// Parse an XML document against a model
///
/// Fails with [`ErrorKind::TagMismatch`] when the root element's tag is
/// not the model's tag.
pub fn parse(model: &Arc<Model>, xml: &str) -> Result<Instance> {
    let doc = parse_str(xml)?;
    if doc.root.name != model.tag() {
        return Err(Error::mapping(ErrorKind::TagMismatch {
            expected: model.tag().to_string(),
            found: doc.root.name.clone(),
        }));
    }
    parse_element(model, &doc.root)
}

/// Parse an already-located DOM element against a model
///
/// The caller vouches for the element; its tag is not checked. This is
/// the entry point the engine itself uses for nested model fields.
pub fn parse_element(model: &Arc<Model>, element: &Element) -> Result<Instance> {
    parse_into(model, element, model.name())
}

fn parse_into(model: &Arc<Model>, element: &Element, path: &str) -> Result<Instance> {
    let mut instance = Instance::new(model);
    let children: Vec<&Element> = element.child_elements().collect();
    let mut consumed = vec![false; children.len()];
    // (document position, entry), sorted before storing
    let mut order: Vec<(usize, OrderEntry)> = Vec::new();

    for (idx, field) in model.fields().iter().enumerate() {
        if field.is_attribute() {
            parse_attribute(&mut instance, idx, field, element, path)?;
        }
    }

    for (idx, field) in model.fields().iter().enumerate() {
        if field.is_attribute() || matches!(field.kind(), FieldKind::List(_)) {
            continue;
        }
        parse_scalar_element(
            &mut instance,
            idx,
            field,
            &children,
            &mut consumed,
            &mut order,
            path,
        )?;
    }

    for (idx, field) in model.fields().iter().enumerate() {
        if let FieldKind::List(item) = field.kind() {
            parse_list(
                &mut instance,
                idx,
                field,
                item,
                &children,
                &mut consumed,
                &mut order,
                path,
            )?;
        }
    }

    if model.is_order_sensitive() {
        order.sort_by_key(|(pos, _)| *pos);
        instance.set_order(order.into_iter().map(|(_, entry)| entry).collect());
    }

    Ok(instance)
}

fn parse_attribute(
    instance: &mut Instance,
    idx: usize,
    field: &Field,
    element: &Element,
    path: &str,
) -> Result<()> {
    match element.attr(field.attribute_name()) {
        Some(text) => {
            let fpath = field_path(path, field);
            instance.set_slot(idx, field.kind().parse_scalar(text, &fpath)?);
            Ok(())
        }
        None if field.is_required() && field.default().is_none() => {
            Err(Error::mapping(ErrorKind::MissingAttribute {
                field: field_path(path, field),
            }))
        }
        None => Ok(()),
    }
}

fn parse_scalar_element(
    instance: &mut Instance,
    idx: usize,
    field: &Field,
    children: &[&Element],
    consumed: &mut [bool],
    order: &mut Vec<(usize, OrderEntry)>,
    path: &str,
) -> Result<()> {
    let Some(tag) = field.element_tag() else {
        return Ok(());
    };
    let found = children
        .iter()
        .enumerate()
        .find(|(pos, child)| !consumed.get(*pos).copied().unwrap_or(true) && child.name == tag);

    match found {
        Some((pos, child)) => {
            if let Some(flag) = consumed.get_mut(pos) {
                *flag = true;
            }
            let fpath = field_path(path, field);
            let slot = match field.kind() {
                FieldKind::Model(nested) => Slot::Model(parse_into(nested, child, &fpath)?),
                kind => kind.parse_scalar(&child.text(), &fpath)?,
            };
            instance.set_slot(idx, slot);
            order.push((pos, OrderEntry { field: idx, item: 0 }));
            Ok(())
        }
        None if field.is_required() && field.default().is_none() => {
            Err(Error::mapping(ErrorKind::MissingElement {
                field: field_path(path, field),
            }))
        }
        None => Ok(()),
    }
}

#[allow(clippy::too_many_arguments)]
fn parse_list(
    instance: &mut Instance,
    idx: usize,
    field: &Field,
    item: &Field,
    children: &[&Element],
    consumed: &mut [bool],
    order: &mut Vec<(usize, OrderEntry)>,
    path: &str,
) -> Result<()> {
    let Some(tag) = field.element_tag() else {
        return Ok(());
    };
    let fpath = field_path(path, field);
    let mut items = Vec::new();

    for (pos, child) in children.iter().enumerate() {
        if consumed.get(pos).copied().unwrap_or(true) || child.name != tag {
            continue;
        }
        if let Some(flag) = consumed.get_mut(pos) {
            *flag = true;
        }
        let slot = match item.kind() {
            FieldKind::Model(nested) => Slot::Model(parse_into(nested, child, &fpath)?),
            kind => kind.parse_scalar(&child.text(), &fpath)?,
        };
        order.push((
            pos,
            OrderEntry {
                field: idx,
                item: items.len(),
            },
        ));
        items.push(slot);
    }

    // An absent list is an empty list, never a missing-field failure.
    instance.set_slot(idx, Slot::List(items));
    Ok(())
}

fn field_path(path: &str, field: &Field) -> String {
    format!("{path}.{}", field.name())
}
