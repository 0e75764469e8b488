//! XML writer: [`Element`] trees back to text
//!
//! Output is deliberately rigid so that parse-then-render of canonical
//! input is byte-identical: a fixed declaration, no indentation, no
//! trailing newline, and self-closing tags written as `<Tag />`.

use crate::xml::model::{Content, Document, Element};

/// Fixed declaration prefixed to every rendered document
pub const XML_DECLARATION: &str = "<?xml version=\"1.0\" ?>";

/// Serialize a document, declaration included
pub fn document_to_string(doc: &Document) -> String {
    let mut output = String::from(XML_DECLARATION);
    write_element(&doc.root, &mut output);
    output
}

/// Serialize a single element without a declaration
pub fn element_to_string(element: &Element) -> String {
    let mut output = String::new();
    write_element(element, &mut output);
    output
}

fn write_element(element: &Element, output: &mut String) {
    output.push('<');
    output.push_str(&element.name);

    for (key, value) in element.attributes.iter() {
        output.push(' ');
        output.push_str(key);
        output.push_str("=\"");
        output.push_str(&escape_attr(value));
        output.push('"');
    }

    if element.children.is_empty() {
        output.push_str(" />");
        return;
    }

    output.push('>');
    for child in &element.children {
        match child {
            Content::Element(child) => write_element(child, output),
            Content::Text(text) => output.push_str(&escape_text(text)),
        }
    }
    output.push_str("</");
    output.push_str(&element.name);
    output.push('>');
}

fn escape_text(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
}

fn escape_attr(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::parser::parse_str;
    use crate::error::Result;

    #[test]
    fn test_write_self_closing() {
        let el = Element::new("Inner");
        assert_eq!(element_to_string(&el), "<Inner />");
    }

    #[test]
    fn test_write_attributes_self_closing() {
        let mut el = Element::new("SomeModel");
        el.attributes
            .insert("name".to_string(), "value".to_string());
        assert_eq!(element_to_string(&el), "<SomeModel name=\"value\" />");
    }

    #[test]
    fn test_write_text_child() {
        let mut el = Element::new("Name");
        el.children.push(Content::Text("x & y".to_string()));
        assert_eq!(element_to_string(&el), "<Name>x &amp; y</Name>");
    }

    #[test]
    fn test_write_document_declaration() {
        let doc = Document {
            root: Element::new("A"),
        };
        assert_eq!(document_to_string(&doc), "<?xml version=\"1.0\" ?><A />");
    }

    #[test]
    fn test_escape_roundtrip() -> Result<()> {
        let input = "<?xml version=\"1.0\" ?><A b=\"x &amp; &quot;y&quot;\">1 &lt; 2</A>";
        let doc = parse_str(input)?;
        assert_eq!(document_to_string(&doc), input);
        Ok(())
    }
}
