//! Deterministic source emission for inferred schemas
//!
//! Models come out in dependency order (leaves first, root last), one
//! builder chain per model. A tagname binding is emitted only when the
//! XML name differs from the case-converted identifier, mirroring how a
//! hand-written schema would look.

use std::collections::HashSet;

use crate::generate::case::to_snake_case;
use crate::generate::infer::{GenField, GenFieldKind, GenModel, Inference};

pub(crate) fn emit(inference: &Inference) -> String {
    let vars = var_names(&inference.models);

    let mut out = String::from("use xmlmap::{Field, Model};\n");
    for (id, model) in inference.models.iter().enumerate() {
        out.push('\n');
        out.push_str(&emit_model(model, id, inference, &vars));
    }
    out
}

fn var_names(models: &[GenModel]) -> Vec<String> {
    let mut used: HashSet<String> = HashSet::new();
    models
        .iter()
        .map(|model| {
            let base = to_snake_case(&model.name);
            let mut name = base.clone();
            let mut suffix = 2;
            while used.contains(&name) {
                name = format!("{base}_{suffix}");
                suffix += 1;
            }
            used.insert(name.clone());
            name
        })
        .collect()
}

fn emit_model(model: &GenModel, id: usize, inference: &Inference, vars: &[String]) -> String {
    let var = vars.get(id).map(String::as_str).unwrap_or("model");
    let mut lines = vec![format!("let {var} = Model::new(\"{}\")", model.name)];
    if model.tag != model.name {
        lines.push(format!("    .tagname(\"{}\")", model.tag));
    }
    for field in &model.fields {
        lines.push(format!("    .field({})", emit_field(field, inference, vars)));
    }
    lines.push("    .build();".to_string());
    let mut block = lines.join("\n");
    block.push('\n');
    block
}

fn emit_field(field: &GenField, inference: &Inference, vars: &[String]) -> String {
    match &field.kind {
        GenFieldKind::Attr(ty) => {
            let mut source = format!("Field::{}(\"{}\")", ty.ctor(), field.name);
            if field.xml_name != field.name {
                source.push_str(&format!(".attribute(\"{}\")", field.xml_name));
            }
            source
        }
        GenFieldKind::Scalar(ty) => format!(
            "Field::{}(\"{}\"){}",
            ty.ctor(),
            field.name,
            element_binding(&field.name, &field.xml_name)
        ),
        GenFieldKind::ScalarList(ty) => format!(
            "Field::list(\"{name}\", Field::{}(\"{name}\"){})",
            ty.ctor(),
            element_binding(&field.name, &field.xml_name),
            name = field.name,
        ),
        GenFieldKind::ModelRef(target) => format!(
            "Field::model(\"{}\", &{}){}",
            field.name,
            var_of(*target, vars),
            model_binding(field, *target, inference),
        ),
        GenFieldKind::ModelList(target) => format!(
            "Field::list(\"{name}\", Field::model(\"{name}\", &{}){})",
            var_of(*target, vars),
            model_binding(field, *target, inference),
            name = field.name,
        ),
    }
}

fn element_binding(name: &str, xml_name: &str) -> String {
    if xml_name == name {
        ".element()".to_string()
    } else {
        format!(".tagname(\"{xml_name}\")")
    }
}

// A folded model keeps the tag of its first occurrence; references from
// other tags need an explicit binding to keep matching their own tag.
fn model_binding(field: &GenField, target: usize, inference: &Inference) -> String {
    match inference.models.get(target) {
        Some(model) if model.tag == field.xml_name => String::new(),
        _ => format!(".tagname(\"{}\")", field.xml_name),
    }
}

fn var_of(id: usize, vars: &[String]) -> &str {
    vars.get(id).map(String::as_str).unwrap_or("model")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generate::infer::infer;
    use crate::xml::parser::parse_str;
    use crate::error::Result;

    #[test]
    fn test_emit_single_model() -> Result<()> {
        let doc = parse_str("<Data><Name>Jim</Name></Data>")?;
        let source = emit(&infer(&doc));
        assert_eq!(
            source,
            "use xmlmap::{Field, Model};\n\n\
             let data = Model::new(\"Data\")\n    \
             .field(Field::string(\"name\").tagname(\"Name\"))\n    \
             .build();\n"
        );
        Ok(())
    }

    #[test]
    fn test_emit_matching_tag_omits_binding() -> Result<()> {
        let doc = parse_str("<data><name>Jim</name></data>")?;
        let source = emit(&infer(&doc));
        assert!(source.contains("Field::string(\"name\").element()"));
        assert!(source.contains(".tagname(\"data\")"));
        Ok(())
    }

    #[test]
    fn test_emit_folded_reference_rebinds_tag() -> Result<()> {
        let doc = parse_str("<R><A><Name>x</Name></A><B><Name>y</Name></B></R>")?;
        let source = emit(&infer(&doc));
        assert!(source.contains("Field::model(\"a\", &a))"));
        assert!(source.contains("Field::model(\"b\", &a).tagname(\"B\")"));
        Ok(())
    }
}
