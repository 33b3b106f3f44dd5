//! XML field extraction and emission
//!
//! Messages travel as the SOAP body element, e.g.
//!
//! ```xml
//! <resetRequest xmlns="urn://Ocpp/Cp/2015/10/">
//!   <type>Hard</type>
//! </resetRequest>
//! ```
//!
//! Fields are child elements matched by local name. Repeated child elements
//! form lists. Envelope and header handling belong to the SOAP binding.

use xmltree::{Element, Namespace, XMLNode};

use super::WireValue;
use crate::domain::{ParseError, ParseResult};

/// Namespace of messages handled by the charge point.
pub const CHARGE_POINT_NAMESPACE: &str = "urn://Ocpp/Cp/2015/10/";
/// Namespace of messages handled by the central system.
pub const CENTRAL_SYSTEM_NAMESPACE: &str = "urn://Ocpp/Cs/2015/10/";

fn child_elements<'a, 'n>(
    element: &'a Element,
    name: &'n str,
) -> impl Iterator<Item = &'a Element> + 'n
where
    'a: 'n,
{
    element.children.iter().filter_map(move |node| match node {
        XMLNode::Element(child) if child.name == name => Some(child),
        _ => None,
    })
}

fn text_of(element: &Element) -> String {
    element
        .children
        .iter()
        .filter_map(|node| match node {
            XMLNode::Text(text) | XMLNode::CData(text) => Some(text.as_str()),
            _ => None,
        })
        .collect()
}

/// Whitespace-only character data is dropped by the reader, so such text
/// goes out as a CDATA section.
fn text_node(text: String) -> XMLNode {
    if text.trim().is_empty() {
        XMLNode::CData(text)
    } else {
        XMLNode::Text(text)
    }
}

/// Read-only view of an XML element with field extraction helpers.
#[derive(Debug, Clone)]
pub struct XmlElement<'a> {
    element: &'a Element,
    path: String,
}

impl<'a> XmlElement<'a> {
    /// View a message body element. The local name must match; a namespace,
    /// when present, must be `namespace`.
    pub fn root(element: &'a Element, name: &str, namespace: &str) -> ParseResult<Self> {
        if element.name != name {
            return Err(ParseError::UnexpectedElement {
                expected: format!("<{}>", name),
                found: format!("<{}>", element.name),
            });
        }
        if let Some(actual) = element.namespace.as_deref() {
            if actual != namespace {
                return Err(ParseError::UnexpectedElement {
                    expected: format!("<{}> in namespace {}", name, namespace),
                    found: format!("<{}> in namespace {}", element.name, actual),
                });
            }
        }
        Ok(Self {
            element,
            path: String::new(),
        })
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn element(&self) -> &'a Element {
        self.element
    }

    fn path_of(&self, name: &str) -> String {
        if self.path.is_empty() {
            name.to_string()
        } else {
            format!("{}.{}", self.path, name)
        }
    }

    fn child(&self, name: &str) -> Option<&'a Element> {
        child_elements(self.element, name).next()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.child(name).is_some()
    }

    pub fn mandatory<T: WireValue>(&self, name: &str) -> ParseResult<T> {
        match self.child(name) {
            Some(child) => self.convert(name, child),
            None => Err(ParseError::missing(self.path_of(name), T::expected())),
        }
    }

    /// A present element that fails conversion is an error, never `None`.
    pub fn optional<T: WireValue>(&self, name: &str) -> ParseResult<Option<T>> {
        self.child(name)
            .map(|child| self.convert(name, child))
            .transpose()
    }

    fn convert<T: WireValue>(&self, name: &str, child: &Element) -> ParseResult<T> {
        let text = text_of(child);
        T::from_xml_text(&text).map_err(|m| ParseError::malformed(self.path_of(name), m))
    }

    pub fn mandatory_child(&self, name: &str) -> ParseResult<XmlElement<'a>> {
        match self.child(name) {
            Some(element) => Ok(XmlElement {
                element,
                path: self.path_of(name),
            }),
            None => Err(ParseError::missing(self.path_of(name), "element")),
        }
    }

    pub fn optional_child(&self, name: &str) -> Option<XmlElement<'a>> {
        self.child(name).map(|element| XmlElement {
            element,
            path: self.path_of(name),
        })
    }

    /// Values of all repeated `name` elements, in document order.
    pub fn list<T: WireValue>(&self, name: &str) -> ParseResult<Vec<T>> {
        let base = self.path_of(name);
        child_elements(self.element, name)
            .enumerate()
            .map(|(index, child)| {
                T::from_xml_text(&text_of(child))
                    .map_err(|m| ParseError::malformed(format!("{}[{}]", base, index), m))
            })
            .collect()
    }

    /// All repeated `name` elements, in document order.
    pub fn children(&self, name: &str) -> Vec<XmlElement<'a>> {
        let base = self.path_of(name);
        child_elements(self.element, name)
            .enumerate()
            .map(|(index, element)| XmlElement {
                element,
                path: format!("{}[{}]", base, index),
            })
            .collect()
    }
}

/// Builds a message element child by child.
#[derive(Debug)]
pub struct XmlBuilder {
    element: Element,
    namespace: String,
}

impl XmlBuilder {
    /// Body element declaring `namespace` as the default namespace.
    pub fn root(name: &str, namespace: &str) -> Self {
        let mut builder = Self::nested(name, namespace);
        let mut declarations = Namespace::empty();
        declarations.force_put("", namespace);
        builder.element.namespaces = Some(declarations);
        builder
    }

    /// Element inheriting the namespace of its parent.
    pub fn nested(name: &str, namespace: &str) -> Self {
        let mut element = Element::new(name);
        element.namespace = Some(namespace.to_string());
        Self {
            element,
            namespace: namespace.to_string(),
        }
    }

    fn text_element(&self, name: &str, text: String) -> Element {
        let mut child = Element::new(name);
        child.namespace = Some(self.namespace.clone());
        if !text.is_empty() {
            child.children.push(text_node(text));
        }
        child
    }

    pub fn field<T: WireValue>(mut self, name: &str, value: &T) -> Self {
        let child = self.text_element(name, value.to_xml_text());
        self.element.children.push(XMLNode::Element(child));
        self
    }

    pub fn optional<T: WireValue>(self, name: &str, value: Option<&T>) -> Self {
        match value {
            Some(value) => self.field(name, value),
            None => self,
        }
    }

    /// One `name` element per value.
    pub fn list<'v, T: WireValue + 'v>(
        mut self,
        name: &str,
        values: impl IntoIterator<Item = &'v T>,
    ) -> Self {
        for value in values {
            self = self.field(name, value);
        }
        self
    }

    /// Nested structure built with a child builder in the same namespace.
    pub fn child(mut self, name: &str, build: impl FnOnce(XmlBuilder) -> XmlBuilder) -> Self {
        let child = build(XmlBuilder::nested(name, &self.namespace)).build();
        self.element.children.push(XMLNode::Element(child));
        self
    }

    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    pub fn build(self) -> Element {
        self.element
    }
}

/// Read an XML document from text.
pub fn parse_document(text: &str) -> ParseResult<Element> {
    Element::parse(text.as_bytes()).map_err(|e| ParseError::InvalidDocument {
        format: "XML",
        reason: e.to_string(),
    })
}

/// Write an element as an XML document.
pub fn write_document(element: &Element) -> Result<String, xmltree::Error> {
    let mut buffer = Vec::new();
    element.write(&mut buffer)?;
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}
