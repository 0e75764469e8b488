//! Schema inference from a sample document
//!
//! Leaf text is classified into a primitive type (integer before float,
//! so `123` stays an integer), repeated child tags become list fields,
//! and structurally identical elements fold into one shared model. The
//! fingerprint registry lives for a single inference, keyed by shape
//! (child tags, attribute names, member types) and never by the tag
//! name itself, so two differently named tags with the same shape share
//! one model definition.

use std::collections::HashSet;

use indexmap::IndexMap;

use crate::generate::case::{to_pascal_case, to_snake_case};
use crate::xml::model::{Document, Element};

/// Guessed primitive type for leaf text
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PrimType {
    String,
    Integer,
    Float,
    Boolean,
}

impl PrimType {
    pub(crate) fn ctor(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Integer => "integer",
            Self::Float => "float",
            Self::Boolean => "boolean",
        }
    }
}

/// Classify leaf text; never fails, ambiguity degrades to `String`
pub fn guess_type(text: &str) -> PrimType {
    let trimmed = text.trim();
    if trimmed.parse::<i64>().is_ok() {
        PrimType::Integer
    } else if trimmed.parse::<f64>().is_ok() {
        PrimType::Float
    } else if trimmed.eq_ignore_ascii_case("true") || trimmed.eq_ignore_ascii_case("false") {
        PrimType::Boolean
    } else {
        PrimType::String
    }
}

/// Most general type covering both guesses
fn unify(a: PrimType, b: PrimType) -> PrimType {
    use PrimType::{Float, Integer};
    if a == b {
        a
    } else if matches!((a, b), (Integer, Float) | (Float, Integer)) {
        Float
    } else {
        PrimType::String
    }
}

#[derive(Debug)]
pub(crate) enum GenFieldKind {
    Attr(PrimType),
    Scalar(PrimType),
    ScalarList(PrimType),
    ModelRef(usize),
    ModelList(usize),
}

#[derive(Debug)]
pub(crate) struct GenField {
    pub name: String,
    pub xml_name: String,
    pub kind: GenFieldKind,
}

#[derive(Debug)]
pub(crate) struct GenModel {
    pub name: String,
    pub tag: String,
    pub fields: Vec<GenField>,
}

/// Inferred schema: models in dependency order, root model last
#[derive(Debug)]
pub(crate) struct Inference {
    pub models: Vec<GenModel>,
    pub root: usize,
}

struct Ctx {
    models: Vec<GenModel>,
    by_shape: IndexMap<String, usize>,
    used_names: HashSet<String>,
}

pub(crate) fn infer(doc: &Document) -> Inference {
    let mut ctx = Ctx {
        models: Vec::new(),
        by_shape: IndexMap::new(),
        used_names: HashSet::new(),
    };
    let root = infer_model(&mut ctx, &doc.root.name, &[&doc.root]);
    Inference {
        models: ctx.models,
        root,
    }
}

fn infer_model<'a>(ctx: &mut Ctx, tag: &str, occurrences: &[&'a Element]) -> usize {
    // attributes, types unified across occurrences
    let mut attrs: IndexMap<String, PrimType> = IndexMap::new();
    for element in occurrences {
        for (name, value) in element.attributes.iter() {
            let ty = guess_type(value);
            attrs
                .entry(name.clone())
                .and_modify(|existing| *existing = unify(*existing, ty))
                .or_insert(ty);
        }
    }

    // child tag groups in first-seen order; a tag repeated inside any
    // single occurrence makes the field a list
    let mut groups: IndexMap<String, (Vec<&'a Element>, bool)> = IndexMap::new();
    for element in occurrences {
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for child in element.child_elements() {
            *counts.entry(child.name.as_str()).or_insert(0) += 1;
            groups
                .entry(child.name.clone())
                .or_insert_with(|| (Vec::new(), false))
                .0
                .push(child);
        }
        for (name, count) in counts {
            if count > 1 {
                if let Some(group) = groups.get_mut(name) {
                    group.1 = true;
                }
            }
        }
    }

    let mut fields: Vec<GenField> = attrs
        .iter()
        .map(|(name, ty)| GenField {
            name: to_snake_case(name),
            xml_name: name.clone(),
            kind: GenFieldKind::Attr(*ty),
        })
        .collect();

    // primitive fields first, nested models after, each in document order
    let mut model_fields = Vec::new();
    for (child_tag, (elements, is_list)) in &groups {
        let leaf = elements
            .iter()
            .all(|e| e.attributes.is_empty() && e.child_elements().next().is_none());
        if leaf {
            let ty = elements
                .iter()
                .map(|e| guess_type(&e.text()))
                .reduce(unify)
                .unwrap_or(PrimType::String);
            fields.push(GenField {
                name: to_snake_case(child_tag),
                xml_name: child_tag.clone(),
                kind: if *is_list {
                    GenFieldKind::ScalarList(ty)
                } else {
                    GenFieldKind::Scalar(ty)
                },
            });
        } else {
            let id = infer_model(ctx, child_tag, elements);
            model_fields.push(GenField {
                name: to_snake_case(child_tag),
                xml_name: child_tag.clone(),
                kind: if *is_list {
                    GenFieldKind::ModelList(id)
                } else {
                    GenFieldKind::ModelRef(id)
                },
            });
        }
    }
    fields.extend(model_fields);

    let shape = fingerprint(&fields);
    if let Some(&id) = ctx.by_shape.get(&shape) {
        return id;
    }

    let name = unique_name(ctx, to_pascal_case(tag));
    let id = ctx.models.len();
    ctx.models.push(GenModel {
        name,
        tag: tag.to_string(),
        fields,
    });
    ctx.by_shape.insert(shape, id);
    id
}

// Shape signature: sorted attribute and child entries with their types;
// nested models appear by their (already deduplicated) model id, which
// makes the fingerprint structural all the way down.
fn fingerprint(fields: &[GenField]) -> String {
    let mut parts: Vec<String> = fields
        .iter()
        .map(|field| match &field.kind {
            GenFieldKind::Attr(ty) => format!("@{}:{ty:?}", field.xml_name),
            GenFieldKind::Scalar(ty) => format!("{}:{ty:?}", field.xml_name),
            GenFieldKind::ScalarList(ty) => format!("{}:[{ty:?}]", field.xml_name),
            GenFieldKind::ModelRef(id) => format!("{}:#{id}", field.xml_name),
            GenFieldKind::ModelList(id) => format!("{}:[#{id}]", field.xml_name),
        })
        .collect();
    parts.sort();
    parts.join(";")
}

fn unique_name(ctx: &mut Ctx, candidate: String) -> String {
    let mut name = candidate.clone();
    let mut suffix = 2;
    while ctx.used_names.contains(&name) {
        name = format!("{candidate}{suffix}");
        suffix += 1;
    }
    ctx.used_names.insert(name.clone());
    name
}
