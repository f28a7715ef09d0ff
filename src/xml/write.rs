//! Deterministic serializer for [`Document`].

use std::borrow::Cow;

use crate::model::{Declaration, Document, Element, Node};

/// Serializer settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WriteOptions {
    /// Spaces per nesting level; `0` writes everything on one line.
    pub indent: usize,
    /// Emit the `<?xml ...?>` line. A document without declaration metadata
    /// gets `version="1.0" encoding="UTF-8"`.
    pub declaration: bool,
}

impl Default for WriteOptions {
    fn default() -> Self {
        Self {
            indent: 2,
            declaration: true,
        }
    }
}

impl WriteOptions {
    /// Single-line output with a declaration.
    #[must_use]
    pub const fn compact() -> Self {
        Self {
            indent: 0,
            declaration: true,
        }
    }
}

/// Serialize `document`.
///
/// Top-level nodes are separated by newlines and the output has no trailing
/// newline. Elements holding text or CDATA are written inline so character
/// data round-trips exactly.
#[must_use]
pub fn write(document: &Document, options: &WriteOptions) -> String {
    let mut writer = Writer {
        out: String::new(),
        indent: options.indent,
    };
    if options.declaration {
        let default = Declaration::default();
        writer.declaration(document.declaration.as_ref().unwrap_or(&default));
    }
    for node in &document.nodes {
        if !writer.out.is_empty() {
            writer.out.push('\n');
        }
        writer.node(node, 0, false);
    }
    writer.out
}

struct Writer {
    out: String,
    indent: usize,
}

impl Writer {
    fn declaration(&mut self, decl: &Declaration) {
        self.out.push_str("<?xml version=\"");
        self.out.push_str(&decl.version);
        self.out.push('"');
        if let Some(encoding) = &decl.encoding {
            self.out.push_str(" encoding=\"");
            self.out.push_str(encoding);
            self.out.push('"');
        }
        if let Some(standalone) = &decl.standalone {
            self.out.push_str(" standalone=\"");
            self.out.push_str(standalone);
            self.out.push('"');
        }
        self.out.push_str("?>");
    }

    fn node(&mut self, node: &Node, depth: usize, inline: bool) {
        match node {
            Node::Element(element) => self.element(element, depth, inline),
            Node::Text(text) => self.out.push_str(text),
            Node::Comment(body) => {
                self.out.push_str("<!--");
                self.out.push_str(body);
                self.out.push_str("-->");
            }
            Node::CData(body) => {
                self.out.push_str("<![CDATA[");
                self.out.push_str(body);
                self.out.push_str("]]>");
            }
        }
    }

    fn element(&mut self, element: &Element, depth: usize, inline: bool) {
        self.out.push('<');
        self.out.push_str(element.name());
        for attr in element.attributes() {
            self.out.push(' ');
            self.out.push_str(&attr.name);
            self.out.push_str("=\"");
            self.out.push_str(&quote_safe(&attr.value));
            self.out.push('"');
        }

        let children = element.children();
        if children.is_empty() {
            if element.is_self_closing() {
                self.out.push_str("/>");
            } else {
                self.out.push_str("></");
                self.out.push_str(element.name());
                self.out.push('>');
            }
            return;
        }

        self.out.push('>');
        let inline = inline || self.indent == 0 || children.iter().any(Node::is_character_data);
        for child in children {
            if !inline {
                self.newline(depth + 1);
            }
            self.node(child, depth + 1, inline);
        }
        if !inline {
            self.newline(depth);
        }
        self.out.push_str("</");
        self.out.push_str(element.name());
        self.out.push('>');
    }

    fn newline(&mut self, depth: usize) {
        self.out.push('\n');
        self.out
            .extend(std::iter::repeat_n(' ', depth * self.indent));
    }
}

/// Values from single-quoted source attributes may hold a raw `"`.
fn quote_safe(value: &str) -> Cow<'_, str> {
    if value.contains('"') {
        Cow::Owned(value.replace('"', "&quot;"))
    } else {
        Cow::Borrowed(value)
    }
}
