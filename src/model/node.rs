//! Report tree nodes.
//!
//! A [`Node`] is a closed variant: every traversal matches all four kinds
//! explicitly. Attribute values and character data are stored in their
//! escaped (wire) form; the parser never decodes entity references and the
//! serializer never re-encodes them.

// ---------------------------------------------------------------------------
// Well-known names
// ---------------------------------------------------------------------------

/// Tag of a report section (one named test suite).
pub const SECTION_TAG: &str = "testsuite";

/// Tag of the report collection root.
pub const COLLECTION_TAG: &str = "testsuites";

/// Attribute that identifies a section within its parent.
pub const IDENTITY_ATTRIBUTE: &str = "name";

// ---------------------------------------------------------------------------
// Node
// ---------------------------------------------------------------------------

/// One node of a report tree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Node {
    /// An element with attributes and children.
    Element(Element),
    /// Character data, still entity-escaped.
    Text(String),
    /// Comment body (without `<!--`/`-->`).
    Comment(String),
    /// CDATA section body (without `<![CDATA[`/`]]>`).
    CData(String),
}

impl Node {
    /// The element, if this node is one.
    #[must_use]
    pub const fn as_element(&self) -> Option<&Element> {
        match self {
            Self::Element(element) => Some(element),
            Self::Text(_) | Self::Comment(_) | Self::CData(_) => None,
        }
    }

    /// The section element, if this node is a `<testsuite>`.
    #[must_use]
    pub fn as_section(&self) -> Option<&Element> {
        self.as_element().filter(|e| e.is_section())
    }

    /// `true` for text and CDATA nodes.
    #[must_use]
    pub const fn is_character_data(&self) -> bool {
        matches!(self, Self::Text(_) | Self::CData(_))
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Self::Element(element)
    }
}

// ---------------------------------------------------------------------------
// Attribute
// ---------------------------------------------------------------------------

/// A single `name="value"` pair.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Attribute {
    /// Attribute name, including any namespace prefix.
    pub name: String,
    /// Escaped attribute value.
    pub value: String,
}

impl Attribute {
    /// Create an attribute.
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

// ---------------------------------------------------------------------------
// Element
// ---------------------------------------------------------------------------

/// An element: tag name, ordered unique attributes, ordered children.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Element {
    name: String,
    attributes: Vec<Attribute>,
    children: Vec<Node>,
    self_closing: bool,
}

impl Element {
    /// Create an element written as `<name></name>` when it has no children.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
            self_closing: false,
        }
    }

    /// Create an element written as `<name/>` when it has no children.
    pub fn empty(name: impl Into<String>) -> Self {
        Self {
            self_closing: true,
            ..Self::new(name)
        }
    }

    /// Builder form of [`set_attribute`](Self::set_attribute).
    #[must_use]
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder form of [`push_child`](Self::push_child).
    #[must_use]
    pub fn with_child(mut self, child: impl Into<Node>) -> Self {
        self.push_child(child);
        self
    }

    /// The tag name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// `true` if the tag is `tag`, ignoring ASCII case.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.name.eq_ignore_ascii_case(tag)
    }

    /// `true` for `<testsuite>` elements.
    #[must_use]
    pub fn is_section(&self) -> bool {
        self.has_tag(SECTION_TAG)
    }

    /// `true` for `<testsuites>` elements.
    #[must_use]
    pub fn is_collection(&self) -> bool {
        self.has_tag(COLLECTION_TAG)
    }

    /// The value of the identity (`name`) attribute.
    #[must_use]
    pub fn identity(&self) -> Option<&str> {
        self.attribute(IDENTITY_ATTRIBUTE)
    }

    /// All attributes in insertion order.
    #[must_use]
    pub fn attributes(&self) -> &[Attribute] {
        &self.attributes
    }

    /// The value of attribute `name`.
    #[must_use]
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set attribute `name`: rewritten in place if present, appended otherwise.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        if let Some(existing) = self.attributes.iter_mut().find(|a| a.name == name) {
            existing.value = value;
        } else {
            self.attributes.push(Attribute { name, value });
        }
    }

    /// Child nodes in document order.
    #[must_use]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    /// Mutable access to the children.
    pub fn children_mut(&mut self) -> &mut Vec<Node> {
        &mut self.children
    }

    /// Append a child after all existing children.
    pub fn push_child(&mut self, child: impl Into<Node>) {
        self.children.push(child.into());
    }

    /// Immediate `<testsuite>` children.
    pub fn sections(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(Node::as_section)
    }

    /// `true` if a childless element should be written as `<name/>`.
    #[must_use]
    pub fn is_self_closing(&self) -> bool {
        self.self_closing && self.children.is_empty()
    }

    /// Take the attributes and children out, leaving the element empty.
    pub(crate) fn into_parts(self) -> (Vec<Attribute>, Vec<Node>) {
        (self.attributes, self.children)
    }
}
