//! Tree to text, via `quick-xml`.
//!
//! Prefixes come from the `xmlns` declarations in scope. A namespace with no
//! declaration in scope falls back to its conventional OOXML prefix.

use super::arena::XmlDocument;
use super::namespaces::XMLNS;
use super::node::{XAttribute, XName, XmlNodeData};
use crate::error::{GraftError, Result};
use indextree::NodeId;
use quick_xml::events::{BytesCData, BytesDecl, BytesEnd, BytesPI, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::collections::HashMap;
use std::io::Cursor;

/// Namespace URI to prefix; the empty prefix is the default namespace.
type Scope = HashMap<String, String>;

pub fn serialize(doc: &XmlDocument) -> Result<String> {
    into_string(serialize_bytes(doc)?)
}

/// The whole document, with an XML declaration.
pub fn serialize_bytes(doc: &XmlDocument) -> Result<Vec<u8>> {
    let mut out = Serializer::new();
    out.emit(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;
    if let Some(root) = doc.root() {
        out.node(doc, root, &Scope::new(), None)?;
    }
    Ok(out.finish())
}

/// One node and everything below it, without an XML declaration.
///
/// Namespace declarations inherited from ancestors are written onto the
/// top element, so the output parses on its own.
pub fn serialize_subtree(doc: &XmlDocument, node: NodeId) -> Result<String> {
    let mut out = Serializer::new();
    let inherited = inherited_declarations(doc, node);
    out.node(doc, node, &Scope::new(), Some(inherited))?;
    into_string(out.finish())
}

pub(crate) fn is_xmlns_attr(attr: &XAttribute) -> bool {
    match &attr.name.namespace {
        Some(ns) => ns == XMLNS::NS,
        None => attr.name.local_name == "xmlns",
    }
}

/// `xmlns` attributes of the ancestors of `node` that `node` does not
/// redeclare itself. Nearer ancestors win.
fn inherited_declarations(doc: &XmlDocument, node: NodeId) -> Vec<XAttribute> {
    let mut found: Vec<XAttribute> = doc
        .get(node)
        .and_then(XmlNodeData::attributes)
        .map(|attrs| attrs.iter().filter(|a| is_xmlns_attr(a)).cloned().collect())
        .unwrap_or_default();
    let own = found.len();

    for ancestor in doc.ancestors(node).skip(1) {
        let Some(attrs) = doc.get(ancestor).and_then(XmlNodeData::attributes) else {
            continue;
        };
        for attr in attrs.iter().filter(|a| is_xmlns_attr(a)) {
            if !found.iter().any(|seen| seen.name == attr.name) {
                found.push(attr.clone());
            }
        }
    }
    found.split_off(own)
}

fn into_string(bytes: Vec<u8>) -> Result<String> {
    String::from_utf8(bytes).map_err(|e| GraftError::XmlWrite(e.to_string()))
}

struct Serializer {
    writer: Writer<Cursor<Vec<u8>>>,
}

impl Serializer {
    fn new() -> Self {
        Self {
            writer: Writer::new(Cursor::new(Vec::new())),
        }
    }

    fn finish(self) -> Vec<u8> {
        self.writer.into_inner().into_inner()
    }

    fn emit(&mut self, event: Event<'_>) -> Result<()> {
        self.writer
            .write_event(event)
            .map_err(|e| GraftError::XmlWrite(e.to_string()))
    }

    /// Writes `node`. `extra` holds declarations to add to the element's own
    /// attributes (used for the top of a subtree).
    fn node(&mut self, doc: &XmlDocument, node: NodeId, parent: &Scope, extra: Option<Vec<XAttribute>>) -> Result<()> {
        let Some(data) = doc.get(node) else {
            return Ok(());
        };
        match data {
            XmlNodeData::Element { name, attributes } => {
                let attributes = match extra {
                    Some(mut extra) if !extra.is_empty() => {
                        let mut all = attributes.clone();
                        all.append(&mut extra);
                        std::borrow::Cow::Owned(all)
                    }
                    _ => std::borrow::Cow::Borrowed(attributes.as_slice()),
                };
                self.element(doc, node, name, &attributes, parent)
            }
            XmlNodeData::Text(text) => self.emit(Event::Text(BytesText::new(text))),
            XmlNodeData::CData(text) => self.emit(Event::CData(BytesCData::new(text.as_str()))),
            XmlNodeData::Comment(text) => self.emit(Event::Comment(BytesText::new(text))),
            XmlNodeData::ProcessingInstruction { target, data } => {
                let content = if data.is_empty() {
                    target.clone()
                } else {
                    format!("{} {}", target, data)
                };
                self.emit(Event::PI(BytesPI::new(content.as_str())))
            }
        }
    }

    fn element(
        &mut self,
        doc: &XmlDocument,
        node: NodeId,
        name: &XName,
        attributes: &[XAttribute],
        parent: &Scope,
    ) -> Result<()> {
        let scope = declare(parent, attributes);
        let tag = element_tag(name, &scope);

        let mut start = BytesStart::new(tag.as_str());
        for attr in attributes {
            let key = attribute_key(&attr.name, &scope);
            start.push_attribute((key.as_str(), attr.value.as_str()));
        }

        let mut children = doc.children(node).peekable();
        if children.peek().is_none() {
            return self.emit(Event::Empty(start));
        }
        self.emit(Event::Start(start))?;
        for child in children {
            self.node(doc, child, &scope, None)?;
        }
        self.emit(Event::End(BytesEnd::new(tag.as_str())))
    }
}

/// `parent` plus the declarations among `attributes`.
fn declare(parent: &Scope, attributes: &[XAttribute]) -> Scope {
    let mut scope = parent.clone();
    for attr in attributes.iter().filter(|a| is_xmlns_attr(a)) {
        let prefix = if attr.name.namespace.is_some() {
            attr.name.local_name.clone()
        } else {
            String::new()
        };
        scope.insert(attr.value.clone(), prefix);
    }
    scope
}

fn element_tag(name: &XName, scope: &Scope) -> String {
    let Some(ns) = &name.namespace else {
        return name.local_name.clone();
    };
    let prefix = scope.get(ns).map(String::as_str).unwrap_or_else(|| conventional_prefix(ns));
    join(prefix, &name.local_name)
}

/// Attributes never take the default namespace.
fn attribute_key(name: &XName, scope: &Scope) -> String {
    let Some(ns) = &name.namespace else {
        return name.local_name.clone();
    };
    if ns == XMLNS::NS {
        return join("xmlns", &name.local_name);
    }
    let prefix = scope
        .get(ns)
        .map(String::as_str)
        .filter(|p| !p.is_empty())
        .unwrap_or_else(|| conventional_prefix(ns));
    join(prefix, &name.local_name)
}

fn join(prefix: &str, local_name: &str) -> String {
    if prefix.is_empty() {
        local_name.to_string()
    } else {
        format!("{}:{}", prefix, local_name)
    }
}

fn conventional_prefix(namespace: &str) -> &'static str {
    match namespace {
        "http://schemas.openxmlformats.org/spreadsheetml/2006/main" => "x",
        "http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" => "xdr",
        "http://schemas.openxmlformats.org/drawingml/2006/main" => "a",
        "http://schemas.openxmlformats.org/drawingml/2006/picture" => "pic",
        "http://schemas.openxmlformats.org/drawingml/2006/chart" => "c",
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships" => "r",
        "http://schemas.openxmlformats.org/markup-compatibility/2006" => "mc",
        "http://schemas.openxmlformats.org/package/2006/metadata/core-properties" => "cp",
        "http://purl.org/dc/elements/1.1/" => "dc",
        "http://purl.org/dc/terms/" => "dcterms",
        "http://www.w3.org/2001/XMLSchema-instance" => "xsi",
        "http://www.w3.org/XML/1998/namespace" => "xml",
        _ => "ns",
    }
}
