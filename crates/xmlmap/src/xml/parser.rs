//! XML tokenizer producing [`Element`] trees

use indexmap::IndexMap;

use crate::error::{Error, ErrorKind, Result, Span};
use crate::lexer::Cursor;
use crate::xml::model::{Content, Document, Element};

/// XML parser
#[derive(Debug)]
pub struct Parser<'a> {
    cursor: Cursor<'a>,
}

impl<'a> Parser<'a> {
    /// Create a new XML parser
    pub const fn new(input: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(input),
        }
    }

    /// Parse an XML document
    pub fn parse(&mut self) -> Result<Document> {
        self.cursor.skip_whitespace();
        let root = self.parse_element()?;
        self.cursor.skip_whitespace();

        if !self.cursor.is_eof() {
            return Err(self.error_here("trailing content after document element"));
        }

        Ok(Document { root })
    }

    fn parse_element(&mut self) -> Result<Element> {
        self.expect_byte(b'<')?;

        if self.cursor.current() == Some(b'?') {
            self.skip_processing_instruction()?;
            self.cursor.skip_whitespace();
            return self.parse_element();
        }

        if self.cursor.current() == Some(b'!') {
            self.skip_declaration_or_comment()?;
            self.cursor.skip_whitespace();
            return self.parse_element();
        }

        if self.cursor.current() == Some(b'/') {
            return Err(self.error_here("unexpected closing tag"));
        }

        let name = self.parse_name()?;
        let attributes = self.parse_attributes()?;

        if self.cursor.current() == Some(b'/') {
            self.cursor.advance();
            self.expect_byte(b'>')?;
            return Ok(Element {
                name,
                attributes,
                children: Vec::new(),
            });
        }

        self.expect_byte(b'>')?;
        let children = self.parse_children(&name)?;

        Ok(Element {
            name,
            attributes,
            children,
        })
    }

    fn parse_children(&mut self, open_name: &str) -> Result<Vec<Content>> {
        let mut children = Vec::new();

        loop {
            if self.cursor.is_eof() {
                return Err(self.error_here("unterminated element"));
            }

            if self.cursor.current() == Some(b'<') {
                if self.cursor.peek(1) == Some(b'/') {
                    self.cursor.advance_by(2);
                    let close_name = self.parse_name()?;
                    if close_name != open_name {
                        let pos = self.cursor.position();
                        return Err(Error::with_message(
                            ErrorKind::Expected {
                                expected: format!("</{open_name}>"),
                                found: format!("</{close_name}>"),
                            },
                            Span::new(pos, pos),
                            format!("mismatched closing tag </{close_name}>"),
                        ));
                    }
                    self.cursor.skip_whitespace();
                    self.expect_byte(b'>')?;
                    return Ok(children);
                }

                if self.cursor.peek_bytes(9) == Some(b"<![CDATA[".as_slice()) {
                    children.push(Content::Text(self.parse_cdata()?));
                    continue;
                }

                if self.cursor.peek(1) == Some(b'!') {
                    self.cursor.advance();
                    self.skip_declaration_or_comment()?;
                    continue;
                }

                if self.cursor.peek(1) == Some(b'?') {
                    self.cursor.advance();
                    self.skip_processing_instruction()?;
                    continue;
                }

                children.push(Content::Element(self.parse_element()?));
                continue;
            }

            if let Some(text) = self.parse_text()? {
                children.push(Content::Text(text));
            }
        }
    }

    fn parse_attributes(&mut self) -> Result<IndexMap<String, String>> {
        let mut attrs = IndexMap::new();

        loop {
            self.cursor.skip_whitespace();
            match self.cursor.current() {
                Some(b'/') | Some(b'>') => break,
                Some(_) => {}
                None => return Err(self.error_here("unexpected end of input")),
            }

            let name = self.parse_name()?;
            self.cursor.skip_whitespace();
            self.expect_byte(b'=')?;
            self.cursor.skip_whitespace();
            let value = self.parse_attribute_value()?;

            if attrs.contains_key(&name) {
                return Err(self.error_here("duplicate attribute"));
            }
            attrs.insert(name, value);
        }

        Ok(attrs)
    }

    fn parse_attribute_value(&mut self) -> Result<String> {
        let quote = match self.cursor.current() {
            Some(b'"') => b'"',
            Some(b'\'') => b'\'',
            _ => return Err(self.error_here("expected quoted attribute value")),
        };
        self.cursor.advance();

        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == quote {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance();
                let text = bytes_to_string(raw)?;
                return decode_entities(&text);
            }
            self.cursor.advance();
        }

        Err(self.error_here("unterminated attribute value"))
    }

    fn parse_text(&mut self) -> Result<Option<String>> {
        let start = self.cursor.pos();
        while let Some(b) = self.cursor.current() {
            if b == b'<' {
                break;
            }
            self.cursor.advance();
        }

        let raw = self.cursor.slice_from(start);
        let text = bytes_to_string(raw)?;
        let text = decode_entities(&text)?;

        if text.trim().is_empty() {
            Ok(None)
        } else {
            Ok(Some(text))
        }
    }

    // cursor is at "<![CDATA["; content is literal text, no entity decoding
    fn parse_cdata(&mut self) -> Result<String> {
        self.cursor.advance_by(9);
        let start = self.cursor.pos();
        while self.cursor.current().is_some() {
            if self.cursor.peek_bytes(3) == Some(b"]]>") {
                let raw = self.cursor.slice_from(start);
                self.cursor.advance_by(3);
                return bytes_to_string(raw);
            }
            self.cursor.advance();
        }
        Err(self.error_here("unterminated CDATA section"))
    }

    fn parse_name(&mut self) -> Result<String> {
        let start_pos = self.cursor.position();
        let start = self.cursor.pos();

        let Some(first) = self.cursor.current() else {
            return Err(self.error_here("expected name"));
        };
        if !is_name_start(first) {
            return Err(Error::at(
                ErrorKind::InvalidToken,
                start_pos.offset,
                start_pos.line,
                start_pos.col,
            ));
        }

        self.cursor.advance();
        while let Some(b) = self.cursor.current() {
            if is_name_char(b) {
                self.cursor.advance();
            } else {
                break;
            }
        }

        bytes_to_string(self.cursor.slice_from(start))
    }

    fn skip_declaration_or_comment(&mut self) -> Result<()> {
        // cursor currently at '!'
        if self.cursor.peek(1) == Some(b'-') && self.cursor.peek(2) == Some(b'-') {
            self.cursor.advance_by(3);
            return self.skip_until(b"-->");
        }
        self.skip_until(b">")
    }

    fn skip_processing_instruction(&mut self) -> Result<()> {
        // cursor currently at '?'
        self.cursor.advance();
        self.skip_until(b"?>")
    }

    fn skip_until(&mut self, pattern: &[u8]) -> Result<()> {
        while self.cursor.current().is_some() {
            if self.cursor.peek_bytes(pattern.len()) == Some(pattern) {
                self.cursor.advance_by(pattern.len());
                return Ok(());
            }
            self.cursor.advance();
        }
        Err(self.error_here("unterminated markup"))
    }

    fn expect_byte(&mut self, expected: u8) -> Result<()> {
        if self.cursor.consume(expected) {
            Ok(())
        } else {
            Err(self.error_here("unexpected token"))
        }
    }

    fn error_here(&self, message: &str) -> Error {
        let pos = self.cursor.position();
        Error::with_message(
            ErrorKind::InvalidToken,
            Span::new(pos, pos),
            message.to_string(),
        )
    }
}

/// Parse an XML document from text
pub fn parse_str(input: &str) -> Result<Document> {
    Parser::new(input.as_bytes()).parse()
}

fn bytes_to_string(bytes: &[u8]) -> Result<String> {
    std::str::from_utf8(bytes)
        .map(|s| s.to_string())
        .map_err(|_| {
            Error::with_message(ErrorKind::InvalidToken, Span::empty(), "invalid utf-8")
        })
}

fn is_name_start(b: u8) -> bool {
    matches!(b, b'A'..=b'Z' | b'a'..=b'z' | b'_' | b':')
}

fn is_name_char(b: u8) -> bool {
    is_name_start(b) || matches!(b, b'0'..=b'9' | b'-' | b'.')
}

fn decode_entities(input: &str) -> Result<String> {
    if !input.contains('&') {
        return Ok(input.to_string());
    }

    let mut result = String::with_capacity(input.len());
    let mut chars = input.chars();
    while let Some(ch) = chars.next() {
        if ch != '&' {
            result.push(ch);
            continue;
        }

        let mut entity = String::new();
        for next in chars.by_ref() {
            if next == ';' {
                break;
            }
            entity.push(next);
        }

        let decoded = match entity.as_str() {
            "amp" => Some('&'),
            "lt" => Some('<'),
            "gt" => Some('>'),
            "quot" => Some('"'),
            "apos" => Some('\''),
            _ => decode_numeric_entity(&entity),
        };

        match decoded {
            Some(ch) => result.push(ch),
            None => {
                return Err(Error::with_message(
                    ErrorKind::InvalidToken,
                    Span::empty(),
                    format!("invalid xml entity &{entity};"),
                ));
            }
        }
    }

    Ok(result)
}

fn decode_numeric_entity(entity: &str) -> Option<char> {
    if let Some(hex) = entity.strip_prefix("#x") {
        u32::from_str_radix(hex, 16).ok().and_then(char::from_u32)
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse::<u32>().ok().and_then(char::from_u32)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_element() -> Result<()> {
        let doc = parse_str("<root></root>")?;
        assert_eq!(doc.root.name, "root");
        assert!(doc.root.children.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_with_declaration() -> Result<()> {
        let doc = parse_str("<?xml version=\"1.0\" ?><root/>")?;
        assert_eq!(doc.root.name, "root");
        Ok(())
    }

    #[test]
    fn test_parse_with_attributes() -> Result<()> {
        let doc = parse_str("<root id=\"1\" name='test'></root>")?;
        assert_eq!(doc.root.attr("id"), Some("1"));
        assert_eq!(doc.root.attr("name"), Some("test"));
        Ok(())
    }

    #[test]
    fn test_parse_nested_text() -> Result<()> {
        let doc = parse_str("<root><child>text</child></root>")?;
        let child = doc.root.child_elements().next().unwrap();
        assert_eq!(child.name, "child");
        assert_eq!(child.text(), "text");
        Ok(())
    }

    #[test]
    fn test_parse_self_closing() -> Result<()> {
        let doc = parse_str("<root><child /></root>")?;
        let child = doc.root.child_elements().next().unwrap();
        assert_eq!(child.name, "child");
        assert!(child.is_empty());
        Ok(())
    }

    #[test]
    fn test_parse_entities() -> Result<()> {
        let doc = parse_str("<a b=\"x &amp; y\">1 &lt; 2 &#x41;</a>")?;
        assert_eq!(doc.root.attr("b"), Some("x & y"));
        assert_eq!(doc.root.text(), "1 < 2 A");
        Ok(())
    }

    #[test]
    fn test_parse_comment_and_cdata() -> Result<()> {
        let doc = parse_str("<a><!-- note --><![CDATA[<raw>]]></a>")?;
        assert_eq!(doc.root.text(), "<raw>");
        Ok(())
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let err = parse_str("<a><b></a></a>").unwrap_err();
        assert!(err.message().contains("mismatched closing tag"));
    }

    #[test]
    fn test_trailing_content() {
        assert!(parse_str("<a/><b/>").is_err());
    }
}
