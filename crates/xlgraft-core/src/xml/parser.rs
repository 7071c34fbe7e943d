//! Text to tree, via `roxmltree`.

use super::arena::XmlDocument;
use super::namespaces::XMLNS;
use super::node::{XAttribute, XName, XmlNodeData};
use crate::error::{GraftError, Result};
use indextree::NodeId;

/// Parses a complete document. Namespace declarations are kept as `xmlns`
/// attributes on the element that makes them, so a written tree declares
/// the same prefixes in the same places.
pub fn parse(xml: &str) -> Result<XmlDocument> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..Default::default()
    };
    let source = roxmltree::Document::parse_with_options(xml, options).map_err(|e| GraftError::XmlParse {
        message: e.to_string(),
        location: format!("line {}", e.pos().row),
    })?;

    let mut doc = XmlDocument::new();
    let top = source.root_element();
    let root = doc.add_root(element_data(top));

    let mut pending: Vec<(roxmltree::Node<'_, '_>, NodeId)> =
        top.children().rev().map(|child| (child, root)).collect();
    while let Some((node, parent)) = pending.pop() {
        let Some(data) = node_data(node) else {
            continue;
        };
        let id = doc.add_child(parent, data);
        pending.extend(node.children().rev().map(|child| (child, id)));
    }
    Ok(doc)
}

/// Like [`parse`], for raw part bytes. A UTF-8 byte order mark is skipped.
pub fn parse_bytes(bytes: &[u8]) -> Result<XmlDocument> {
    let bytes = bytes.strip_prefix(&[0xEF, 0xBB, 0xBF]).unwrap_or(bytes);
    let text = std::str::from_utf8(bytes).map_err(|e| GraftError::XmlParse {
        message: e.to_string(),
        location: "input".to_string(),
    })?;
    parse(text)
}

fn node_data(node: roxmltree::Node<'_, '_>) -> Option<XmlNodeData> {
    match node.node_type() {
        roxmltree::NodeType::Element => Some(element_data(node)),
        roxmltree::NodeType::Text => node.text().map(XmlNodeData::text),
        roxmltree::NodeType::Comment => node.text().map(|t| XmlNodeData::Comment(t.to_string())),
        roxmltree::NodeType::PI => node.pi().map(|pi| XmlNodeData::ProcessingInstruction {
            target: pi.target.to_string(),
            data: pi.value.unwrap_or_default().to_string(),
        }),
        roxmltree::NodeType::Root => None,
    }
}

fn element_data(node: roxmltree::Node<'_, '_>) -> XmlNodeData {
    let tag = node.tag_name();
    let name = XName::new(tag.namespace().unwrap_or(""), tag.name());

    let mut attributes: Vec<XAttribute> = node
        .attributes()
        .map(|attr| XAttribute::new(XName::new(attr.namespace().unwrap_or(""), attr.name()), attr.value()))
        .collect();
    attributes.extend(own_declarations(node));

    XmlNodeData::element_with_attrs(name, attributes)
}

/// `xmlns` attributes for the namespaces `node` declares itself.
/// roxmltree reports every namespace in scope, so the parent's are
/// filtered out.
fn own_declarations(node: roxmltree::Node<'_, '_>) -> Vec<XAttribute> {
    let in_parent = |prefix: Option<&str>, uri: &str| {
        node.parent_element()
            .is_some_and(|p| p.namespaces().any(|ns| ns.name() == prefix && ns.uri() == uri))
    };

    node.namespaces()
        .filter(|ns| !in_parent(ns.name(), ns.uri()))
        .filter_map(|ns| match ns.name() {
            Some("xml") => None,
            Some(prefix) => Some(XAttribute::new(XName::new(XMLNS::NS, prefix), ns.uri())),
            None => Some(XAttribute::local("xmlns", ns.uri())),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::namespaces::XDR;

    #[test]
    fn parse_simple_xml() {
        let xml = r#"<root><child attr="value">text</child></root>"#;
        let doc = parse(xml).unwrap();

        let root = doc.root().unwrap();
        let child = doc.element_children(root).next().unwrap();
        assert_eq!(doc.attribute_local(child, "attr"), Some("value"));
        assert_eq!(doc.inner_text(child), "text");
    }

    #[test]
    fn parse_drawing_with_namespaces() {
        let xml = r#"<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing">
            <xdr:twoCellAnchor/>
        </xdr:wsDr>"#;

        let doc = parse(xml).unwrap();
        let root = doc.root().unwrap();
        assert_eq!(doc.get(root).unwrap().name(), Some(&XDR::wsDr()));
        assert_eq!(doc.elements_by_name(root, &XDR::twoCellAnchor()).count(), 1);
    }

    #[test]
    fn namespace_declarations_are_not_repeated_on_children() {
        let xml = r#"<a:root xmlns:a="urn:a"><a:child/></a:root>"#;
        let doc = parse(xml).unwrap();
        let root = doc.root().unwrap();
        let child = doc.element_children(root).next().unwrap();

        assert_eq!(doc.get(root).unwrap().attributes().unwrap().len(), 1);
        assert!(doc.get(child).unwrap().attributes().unwrap().is_empty());
    }

    #[test]
    fn parse_preserves_attribute_order() {
        let xml = r#"<root a="1" b="2" c="3" d="4"/>"#;
        let doc = parse(xml).unwrap();

        let root_id = doc.root().unwrap();
        let attrs = doc.get(root_id).unwrap().attributes().unwrap();

        let names: Vec<_> = attrs.iter().map(|a| a.name.local_name.as_str()).collect();
        assert_eq!(names, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn malformed_xml_is_an_error() {
        let err = parse("<root><unclosed></root>").err().unwrap();
        assert!(matches!(err, GraftError::XmlParse { .. }));
    }
}
