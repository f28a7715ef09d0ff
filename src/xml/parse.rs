//! Well-formedness-checking parser producing an ordered [`Document`].

use std::borrow::Cow;

use quick_xml::Reader;
use quick_xml::events::{BytesDecl, BytesStart, Event};

use crate::error::ParseError;
use crate::model::{Attribute, Declaration, Document, Element, Node};

/// Parse `text` into a [`Document`].
///
/// Empty or whitespace-only text yields an empty document. Line-breaking
/// whitespace runs inside an element that holds only markup are indentation
/// and are dropped; all other character data, comments and CDATA sections are
/// kept in order, still escaped. Entity references are checked but not
/// decoded.
/// Processing instructions and DOCTYPE declarations are skipped.
///
/// # Errors
/// Returns [`ParseError`] for mismatched or unclosed tags, duplicate
/// attributes, malformed or unknown entity references, a raw `<` in an
/// attribute value, more than one root element, character data outside the root
/// element, or any other malformed markup.
pub fn parse(text: &str) -> Result<Document, ParseError> {
    let text = text.strip_prefix('\u{feff}').unwrap_or(text);
    let mut reader = Reader::from_str(text);
    reader.config_mut().check_end_names = true;

    let mut tree = TreeBuilder::default();
    loop {
        let offset = to_offset(reader.buffer_position());
        let event = reader
            .read_event()
            .map_err(|e| ParseError::at(text, to_offset(reader.error_position()), e.to_string()))?;
        let fail = |message: String| ParseError::at(text, offset, message);

        match event {
            Event::Decl(decl) => {
                if tree.started() {
                    return Err(fail("XML declaration must come first".to_owned()));
                }
                tree.declaration = Some(read_declaration(&decl).map_err(fail)?);
            }
            Event::Start(start) => {
                let element = read_element(&start, false).map_err(fail)?;
                tree.open(element).map_err(fail)?;
            }
            Event::Empty(start) => {
                let element = read_element(&start, true).map_err(fail)?;
                tree.attach(Node::Element(element)).map_err(fail)?;
            }
            Event::End(_) => tree.close().map_err(fail)?,
            Event::Text(content) => {
                if tree.stack.is_empty() && is_blank(&content) {
                    continue;
                }
                let content = utf8(&content).map_err(fail)?;
                check_references(&content).map_err(fail)?;
                tree.attach(Node::Text(content)).map_err(fail)?;
            }
            Event::CData(content) => {
                let content = utf8(&content).map_err(fail)?;
                tree.attach(Node::CData(content)).map_err(fail)?;
            }
            Event::Comment(content) => {
                let content = utf8(&content).map_err(fail)?;
                tree.attach(Node::Comment(content)).map_err(fail)?;
            }
            Event::Eof => break,
            _ => tracing::debug!(offset, "skipping processing instruction or doctype"),
        }
    }

    if let Some(open) = tree.stack.last() {
        return Err(ParseError::at(
            text,
            text.len(),
            format!("unexpected end of document: <{}> is not closed", open.name()),
        ));
    }
    Ok(Document {
        declaration: tree.declaration,
        nodes: tree.nodes,
    })
}

// ---------------------------------------------------------------------------
// TreeBuilder
// ---------------------------------------------------------------------------

#[derive(Default)]
struct TreeBuilder {
    declaration: Option<Declaration>,
    nodes: Vec<Node>,
    stack: Vec<Element>,
    has_root: bool,
}

impl TreeBuilder {
    fn started(&self) -> bool {
        !self.nodes.is_empty() || !self.stack.is_empty()
    }

    fn open(&mut self, element: Element) -> Result<(), String> {
        if self.stack.is_empty() {
            self.claim_root(element.name())?;
        }
        self.stack.push(element);
        Ok(())
    }

    fn close(&mut self) -> Result<(), String> {
        let mut element = self
            .stack
            .pop()
            .ok_or_else(|| "closing tag without a matching opening tag".to_owned())?;
        drop_indentation(&mut element);
        self.append(Node::Element(element));
        Ok(())
    }

    fn attach(&mut self, node: Node) -> Result<(), String> {
        if self.stack.is_empty() {
            match &node {
                Node::Element(element) => self.claim_root(element.name())?,
                Node::Text(_) | Node::CData(_) => {
                    return Err("character data outside the root element".to_owned());
                }
                Node::Comment(_) => {}
            }
        }
        self.append(node);
        Ok(())
    }

    fn claim_root(&mut self, name: &str) -> Result<(), String> {
        if self.has_root {
            return Err(format!("second root element <{name}>"));
        }
        self.has_root = true;
        Ok(())
    }

    fn append(&mut self, node: Node) {
        match self.stack.last_mut() {
            Some(parent) => parent.push_child(node),
            None => self.nodes.push(node),
        }
    }
}

// ---------------------------------------------------------------------------
// Event readers
// ---------------------------------------------------------------------------

fn read_element(start: &BytesStart<'_>, self_closing: bool) -> Result<Element, String> {
    let name = utf8(start.name().as_ref())?;
    let mut element = if self_closing {
        Element::empty(name)
    } else {
        Element::new(name)
    };
    for attr in start.attributes() {
        let attr = attr.map_err(|e| e.to_string())?;
        let attr = Attribute::new(utf8(attr.key.as_ref())?, utf8(&attr.value)?);
        if attr.value.contains('<') {
            return Err(format!("attribute `{}` contains a raw '<'", attr.name));
        }
        check_references(&attr.value).map_err(|e| format!("attribute `{}`: {e}", attr.name))?;
        element.set_attribute(attr.name, attr.value);
    }
    Ok(element)
}

/// Remove indentation from an element whose content is only markup.
///
/// Whitespace runs are kept when the element has no child elements or
/// comments, carries any other text or CDATA, or when a run has no line
/// break (`<b>a</b> <i>c</i>`).
fn drop_indentation(element: &mut Element) {
    let children = element.children_mut();
    let has_markup = children
        .iter()
        .any(|node| matches!(node, Node::Element(_) | Node::Comment(_)));
    let has_text = children.iter().any(|node| match node {
        Node::Text(text) => !is_blank(text.as_bytes()),
        Node::CData(_) => true,
        Node::Element(_) | Node::Comment(_) => false,
    });
    if has_markup && !has_text {
        children.retain(|node| !matches!(node, Node::Text(text) if is_line_break_run(text)));
    }
}

fn is_blank(bytes: &[u8]) -> bool {
    bytes.iter().all(u8::is_ascii_whitespace)
}

fn is_line_break_run(text: &str) -> bool {
    is_blank(text.as_bytes()) && text.contains(['\n', '\r'])
}

/// Reject `&` that does not start a well-formed, known reference.
fn check_references(raw: &str) -> Result<(), String> {
    quick_xml::escape::unescape(raw)
        .map(drop)
        .map_err(|e| format!("malformed entity reference: {e}"))
}

fn read_declaration(decl: &BytesDecl<'_>) -> Result<Declaration, String> {
    Ok(Declaration {
        version: declaration_field(decl.version())?,
        encoding: decl.encoding().map(declaration_field).transpose()?,
        standalone: decl.standalone().map(declaration_field).transpose()?,
    })
}

fn declaration_field<E: std::fmt::Display>(value: Result<Cow<'_, [u8]>, E>) -> Result<String, String> {
    utf8(&value.map_err(|e| e.to_string())?)
}

fn utf8(bytes: &[u8]) -> Result<String, String> {
    std::str::from_utf8(bytes)
        .map(str::to_owned)
        .map_err(|e| format!("invalid UTF-8: {e}"))
}

fn to_offset(position: impl TryInto<usize>) -> usize {
    position.try_into().unwrap_or(usize::MAX)
}
