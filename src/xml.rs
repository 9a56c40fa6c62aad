//! Minimal XML element tree built on quick-xml's event reader.
//!
//! EFetch documents are small (one request, a capped ID list), so the whole
//! response is materialised as an [`XmlNode`] tree and queried by element name.
//! Attributes, comments, processing instructions and the DOCTYPE are dropped.

use crate::error::{OptionExt, PubmedError, Result};
use quick_xml::events::{BytesStart, BytesText, Event};
use quick_xml::reader::Reader;

/// Ordered content of an element
#[derive(Debug, Clone, PartialEq)]
pub enum XmlContent {
    Text(String),
    Element(XmlNode),
}

/// A single XML element and everything inside it
#[derive(Debug, Clone, PartialEq)]
pub struct XmlNode {
    pub name: String,
    pub content: Vec<XmlContent>,
}

impl XmlNode {
    fn new(name: String) -> Self {
        Self {
            name,
            content: Vec::new(),
        }
    }

    /// Direct child elements, in document order
    pub fn children(&self) -> impl Iterator<Item = &XmlNode> {
        self.content.iter().filter_map(|c| match c {
            XmlContent::Element(node) => Some(node),
            XmlContent::Text(_) => None,
        })
    }

    /// Direct child elements named `name`
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlNode> {
        self.children().filter(move |n| n.name == name)
    }

    /// First direct child named `name`
    pub fn child(&self, name: &str) -> Option<&XmlNode> {
        self.children().find(|n| n.name == name)
    }

    /// All descendants named `name`, depth-first in document order
    pub fn descendants_named<'a>(&'a self, name: &str) -> Vec<&'a XmlNode> {
        let mut found = Vec::new();
        collect_named(self, name, &mut found);
        found
    }

    /// First descendant named `name`
    pub fn find(&self, name: &str) -> Option<&XmlNode> {
        self.children().find_map(|child| {
            if child.name == name {
                Some(child)
            } else {
                child.find(name)
            }
        })
    }

    /// Resolve a `/`-separated path: the first segment is searched among all
    /// descendants, every later segment among direct children.
    pub fn select(&self, path: &str) -> Option<&XmlNode> {
        let mut segments = path.split('/').filter(|s| !s.is_empty());
        let first = segments.next()?;
        segments.try_fold(self.find(first)?, |node, segment| node.child(segment))
    }

    /// All text inside this element with whitespace collapsed to single spaces
    pub fn text(&self) -> String {
        let mut raw = String::new();
        collect_text(self, &mut raw);
        raw.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    /// Non-empty text, or `None` when the element holds only whitespace
    pub fn non_empty_text(&self) -> Option<String> {
        Some(self.text()).filter(|t| !t.is_empty())
    }
}

fn collect_named<'a>(node: &'a XmlNode, name: &str, found: &mut Vec<&'a XmlNode>) {
    for child in node.children() {
        if child.name == name {
            found.push(child);
        }
        collect_named(child, name, found);
    }
}

/// Formatting elements that sit inside a word, e.g. `CD4<sup>+</sup>`
const INLINE_ELEMENTS: &[&str] = &["i", "b", "u", "sup", "sub", "em", "strong", "sc"];

fn collect_text(node: &XmlNode, out: &mut String) {
    for item in &node.content {
        match item {
            XmlContent::Text(t) => out.push_str(t),
            XmlContent::Element(child) if INLINE_ELEMENTS.contains(&child.name.as_str()) => {
                collect_text(child, out);
            }
            XmlContent::Element(child) => {
                // block boundaries separate words: "a</p><p>b" is "a b"
                out.push(' ');
                collect_text(child, out);
                out.push(' ');
            }
        }
    }
}

fn element_name(start: &BytesStart<'_>) -> String {
    String::from_utf8_lossy(start.name().as_ref()).into_owned()
}

fn decode_text(text: &BytesText<'_>) -> String {
    text.unescape()
        .map(|t| t.into_owned())
        .unwrap_or_else(|_| String::from_utf8_lossy(text).into_owned())
}

fn attach(stack: &mut [XmlNode], root: &mut Option<XmlNode>, node: XmlNode) -> Result<()> {
    match stack.last_mut() {
        Some(parent) => parent.content.push(XmlContent::Element(node)),
        None if root.is_none() => *root = Some(node),
        None => {
            return Err(PubmedError::Parse(format!(
                "unexpected second root element <{}>",
                node.name
            )))
        }
    }
    Ok(())
}

/// Parse `xml` into its root element.
///
/// # Errors
///
/// Returns error for malformed markup, unclosed elements, or a document
/// without a root element.
pub fn parse_document(xml: &str) -> Result<XmlNode> {
    let mut reader = Reader::from_str(xml);
    let mut stack: Vec<XmlNode> = Vec::new();
    let mut root: Option<XmlNode> = None;

    loop {
        match reader.read_event()? {
            Event::Start(e) => stack.push(XmlNode::new(element_name(&e))),
            Event::Empty(e) => attach(&mut stack, &mut root, XmlNode::new(element_name(&e)))?,
            Event::End(_) => {
                let node = stack.pop().ok_or_parse("closing tag without opening tag")?;
                attach(&mut stack, &mut root, node)?;
            }
            Event::Text(e) => {
                if let Some(current) = stack.last_mut() {
                    current.content.push(XmlContent::Text(decode_text(&e)));
                }
            }
            Event::CData(e) => {
                if let Some(current) = stack.last_mut() {
                    let text = String::from_utf8_lossy(&e.into_inner()).into_owned();
                    current.content.push(XmlContent::Text(text));
                }
            }
            Event::Eof => break,
            _ => {}
        }
    }

    if let Some(open) = stack.last() {
        return Err(PubmedError::Parse(format!("unclosed element <{}>", open.name)));
    }

    root.ok_or_parse("document has no root element")
}
