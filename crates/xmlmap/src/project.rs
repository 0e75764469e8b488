//! JSON projection of model instances
//!
//! Projection turns an instance into a plain nested mapping keyed by
//! element tags or by declared field names. List members are grouped the
//! way a schema-less XML-to-JSON conversion would group repeated tags:
//! several members become a sequence, a single member degrades to the
//! bare member value. The flatten step then collapses synthetic
//! single-key wrappers, and [`promote_lists`] restores the sequences the
//! degradation lost, driven by [`find_list_names`] walking the declared
//! schema rather than the data.

use crate::error::{Error, ErrorKind, Result};
use crate::instance::{Instance, Slot};
use crate::schema::field::{find_list_names, Field, FieldKind};
use crate::value::{Array, Object, Value};

/// Project an instance into a nested plain mapping
///
/// The result has a single root key: the model name when
/// `use_field_names` is set, the effective element tag otherwise.
/// Defaults materialize exactly as they would for an XML render, and a
/// required field with neither value nor default fails the projection.
pub fn to_projection(instance: &Instance, use_field_names: bool) -> Result<Value> {
    let model = instance.model();
    let key = if use_field_names {
        model.name()
    } else {
        model.tag()
    };
    let mut root = Object::new();
    root.insert(key, project_instance(instance, use_field_names, model.name())?);
    Ok(Value::Object(root))
}

fn project_instance(instance: &Instance, use_field_names: bool, path: &str) -> Result<Value> {
    let model = instance.model();
    let mut object = Object::new();

    for (idx, field) in model.fields().iter().enumerate() {
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
        let Some(slot) = value else {
            continue;
        };

        let key = if use_field_names {
            field.name()
        } else if field.is_attribute() {
            field.attribute_name()
        } else {
            field.element_tag().unwrap_or(field.name())
        };
        let fpath = format!("{path}.{}", field.name());

        if let FieldKind::List(item) = field.kind() {
            let members = match slot {
                Slot::List(members) => members,
                other => vec![other],
            };
            if members.is_empty() {
                // a repeated tag with zero occurrences leaves no key behind
                continue;
            }
            let mut projected = Vec::with_capacity(members.len());
            for member in &members {
                projected.push(project_slot(item, member, use_field_names, &fpath)?);
            }
            if projected.len() == 1 {
                // single member degrades to the bare value; promote_lists
                // recovers the sequence when asked to
                if let Some(single) = projected.pop() {
                    object.insert(key, single);
                }
            } else {
                object.insert(key, Value::Array(Array::from(projected)));
            }
        } else {
            object.insert(key, project_slot(field, &slot, use_field_names, &fpath)?);
        }
    }

    Ok(Value::Object(object))
}

fn project_slot(field: &Field, slot: &Slot, use_field_names: bool, path: &str) -> Result<Value> {
    match slot {
        Slot::Model(instance) => project_instance(instance, use_field_names, path),
        Slot::Str(s) => Ok(Value::String(s.clone())),
        Slot::Int(v) => Ok(Value::from(*v)),
        Slot::Float(v) => Ok(Value::Number(*v)),
        Slot::Bool(v) => Ok(Value::Bool(*v)),
        Slot::List(_) => Err(Error::mapping(ErrorKind::InvalidValue {
            field: path.to_string(),
            expected: field.kind().type_name(),
        })),
    }
}

/// Collapse synthetic single-key wrappers, in place
///
/// An entry whose value is a mapping holding exactly one key equal to
/// the entry's own key is unwrapped, repeatedly, then the walk recurses.
/// Only the equal-key case collapses: that is the wrapper a nested model
/// introduces around its sole content, and the only collapse that cannot
/// discard a data key.
pub fn flatten(value: &mut Value) {
    match value {
        Value::Object(object) => {
            let keys: Vec<String> = object.keys().cloned().collect();
            for key in keys {
                let Some(entry) = object.get_mut(&key) else {
                    continue;
                };
                loop {
                    let inner = match entry.as_object_mut() {
                        Some(inner) if inner.len() == 1 && inner.contains_key(&key) => {
                            inner.get_mut(&key).map(std::mem::take)
                        }
                        _ => None,
                    };
                    match inner {
                        Some(unwrapped) => *entry = unwrapped,
                        None => break,
                    }
                }
                flatten(entry);
            }
        }
        Value::Array(array) => {
            for member in array.iter_mut() {
                flatten(member);
            }
        }
        _ => {}
    }
}

/// Wrap bare values at list-designated keys into 1-element sequences, in
/// place; `keys` come from [`find_list_names`]. Applied anywhere in the
/// tree, so a single-member list that degraded to a bare mapping (or
/// scalar) projects as a sequence again.
pub fn promote_lists(value: &mut Value, keys: &[&str]) {
    match value {
        Value::Object(object) => {
            for (key, entry) in object.iter_mut() {
                if keys.contains(&key.as_str()) && !entry.is_array() {
                    let member = std::mem::take(entry);
                    *entry = Value::Array(Array::from(vec![member]));
                }
                promote_lists(entry, keys);
            }
        }
        Value::Array(array) => {
            for member in array.iter_mut() {
                promote_lists(member, keys);
            }
        }
        _ => {}
    }
}

/// Render an instance as JSON text
///
/// With `flatten` set, single-key wrappers collapse and every
/// list-designated path keeps sequence form regardless of member count.
pub fn render_json(instance: &Instance, use_field_names: bool, flatten_keys: bool) -> Result<String> {
    let mut value = to_projection(instance, use_field_names)?;
    if flatten_keys {
        flatten(&mut value);
        let names = find_list_names(instance.model());
        let keys: Vec<&str> = names
            .iter()
            .map(|(name, tag)| {
                if use_field_names {
                    name.as_str()
                } else {
                    tag.as_str()
                }
            })
            .collect();
        promote_lists(&mut value, &keys);
    }
    Ok(write_json(&value))
}

/// Serialize a projected value as JSON text, `", "`/`": "` separators
pub fn write_json(value: &Value) -> String {
    match value {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => {
            if n.is_finite() {
                n.to_string()
            } else {
                "null".to_string()
            }
        }
        Value::String(s) => format!("\"{}\"", escape_json(s)),
        Value::Array(arr) => {
            let items: Vec<String> = arr.iter().map(write_json).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(obj) => {
            let pairs: Vec<String> = obj
                .iter()
                .map(|(k, v)| format!("\"{}\": {}", escape_json(k), write_json(v)))
                .collect();
            format!("{{{}}}", pairs.join(", "))
        }
    }
}

fn escape_json(input: &str) -> String {
    let mut result = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '\\' => result.push_str("\\\\"),
            '"' => result.push_str("\\\""),
            '\n' => result.push_str("\\n"),
            '\r' => result.push_str("\\r"),
            '\t' => result.push_str("\\t"),
            c if c.is_control() => {
                result.push_str(&format!("\\u{:04x}", u32::from(c)));
            }
            c => result.push(c),
        }
    }
    result
}
