//! Namespace-aware XML document tree.
//!
//! Documents are read with `quick-xml`'s namespace resolver into a small owned
//! tree. Each element keeps its resolved namespace URI, its local name and the
//! concatenated text of its direct text nodes.

mod accessor;

pub use accessor::{Namespaces, XmlFieldAccessor, XmlPath};

use quick_xml::events::Event;
use quick_xml::name::{Namespace, ResolveResult};
use quick_xml::reader::NsReader;
use tracing::trace;

use crate::error::ExtractionError;

/// Result type for XML parsing.
pub type Result<T> = std::result::Result<T, ExtractionError>;

/// An element with its resolved namespace, text and children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlElement {
    namespace: Option<String>,
    name: String,
    text: String,
    children: Vec<XmlElement>,
}

impl XmlElement {
    pub fn new(namespace: Option<&str>, name: impl Into<String>) -> Self {
        Self {
            namespace: namespace.map(str::to_string),
            name: name.into(),
            text: String::new(),
            children: Vec::new(),
        }
    }

    /// Resolved namespace URI, `None` for unqualified elements.
    pub fn namespace(&self) -> Option<&str> {
        self.namespace.as_deref()
    }

    /// Local name without prefix.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Raw (untrimmed) text content.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn children(&self) -> &[XmlElement] {
        &self.children
    }

    /// Whether this element has the given namespace and local name.
    pub fn is(&self, namespace: Option<&str>, name: &str) -> bool {
        self.name == name && self.namespace.as_deref() == namespace
    }

    /// All descendants in document order, excluding `self`.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants {
            stack: self.children.iter().rev().collect(),
        }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }
}

/// Pre-order iterator over an element's descendants.
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

/// A parsed, well-formed XML document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct XmlDocument {
    root: XmlElement,
}

impl XmlDocument {
    /// Parse a document from raw bytes.
    ///
    /// Text is decoded with the encoding named in the XML declaration (or BOM),
    /// falling back to UTF-8. Any syntax error, unbalanced tag, unbound prefix
    /// or missing root element is reported as
    /// [`ExtractionError::MalformedDocument`].
    pub fn parse(bytes: &[u8]) -> Result<Self> {
        let mut reader = NsReader::from_reader(bytes);
        let mut open: Vec<XmlElement> = Vec::new();
        let mut root: Option<XmlElement> = None;

        loop {
            let (namespace, event) = match reader.read_resolved_event() {
                Ok(resolved) => resolved,
                Err(e) => return Err(malformed(e.to_string())),
            };

            match event {
                Event::Start(start) => {
                    let namespace = resolve_namespace(namespace)?;
                    let name = local_name(start.local_name().as_ref())?;
                    open.push(XmlElement::new(namespace.as_deref(), name));
                }
                Event::Empty(start) => {
                    let namespace = resolve_namespace(namespace)?;
                    let name = local_name(start.local_name().as_ref())?;
                    attach(&mut open, &mut root, XmlElement::new(namespace.as_deref(), name))?;
                }
                Event::End(_) => {
                    let element = open
                        .pop()
                        .ok_or_else(|| malformed("closing tag without matching opening tag"))?;
                    attach(&mut open, &mut root, element)?;
                }
                Event::Text(text) => {
                    let content = text.unescape().map_err(|e| malformed(e.to_string()))?;
                    push_text(&mut open, &content)?;
                }
                Event::CData(cdata) => {
                    let content = reader
                        .decoder()
                        .decode(&cdata.into_inner())
                        .map_err(|e| malformed(e.to_string()))?
                        .into_owned();
                    push_text(&mut open, &content)?;
                }
                Event::Eof => break,
                // Declarations, comments, processing instructions and doctypes carry no data.
                _ => {}
            }
        }

        if let Some(unclosed) = open.last() {
            return Err(malformed(format!(
                "unexpected end of document, <{}> is not closed",
                unclosed.name
            )));
        }

        let root = root.ok_or_else(|| malformed("document has no root element"))?;
        trace!("Parsed XML document with root <{}>", root.name);
        Ok(Self { root })
    }

    pub fn root(&self) -> &XmlElement {
        &self.root
    }
}

fn malformed(reason: impl Into<String>) -> ExtractionError {
    ExtractionError::MalformedDocument(reason.into())
}

fn resolve_namespace(resolved: ResolveResult<'_>) -> Result<Option<String>> {
    match resolved {
        ResolveResult::Bound(Namespace(uri)) => Ok(Some(String::from_utf8_lossy(uri).into_owned())),
        ResolveResult::Unbound => Ok(None),
        ResolveResult::Unknown(prefix) => Err(malformed(format!(
            "unbound namespace prefix '{}'",
            String::from_utf8_lossy(&prefix)
        ))),
    }
}

fn local_name(raw: &[u8]) -> Result<String> {
    std::str::from_utf8(raw)
        .map(str::to_string)
        .map_err(|e| malformed(format!("element name is not valid UTF-8: {e}")))
}

fn attach(open: &mut [XmlElement], root: &mut Option<XmlElement>, element: XmlElement) -> Result<()> {
    match open.last_mut() {
        Some(parent) => parent.children.push(element),
        None if root.is_some() => {
            return Err(malformed(format!(
                "second root element <{}> after document end",
                element.name
            )));
        }
        None => *root = Some(element),
    }
    Ok(())
}

fn push_text(open: &mut [XmlElement], content: &str) -> Result<()> {
    match open.last_mut() {
        Some(parent) => parent.text.push_str(content),
        None if content.trim().is_empty() => {}
        None => return Err(malformed("text content outside of the root element")),
    }
    Ok(())
}
