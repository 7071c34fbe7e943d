use crate::xml::namespaces::S;
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData};
use indextree::NodeId;
use std::collections::HashMap;

const XML_NS: &str = "http://www.w3.org/XML/1998/namespace";

/// Plain text of every `<si>` in a shared string part, in index order.
pub(crate) fn parse_shared_strings(doc: &XmlDocument) -> Vec<String> {
    let Some(root) = doc.root() else {
        return Vec::new();
    };
    doc.elements_by_name(root, &S::si())
        .map(|si| string_item_text(doc, si))
        .collect()
}

/// Text of an `<si>` or `<is>`: the direct `<t>` or the runs' `<t>`s.
/// Phonetic runs (`rPh`) are not part of the value.
pub(crate) fn string_item_text(doc: &XmlDocument, item: NodeId) -> String {
    let mut text = String::new();
    for child in doc.element_children(item) {
        let Some(name) = doc.get(child).and_then(|d| d.name()) else {
            continue;
        };
        if *name == S::t() {
            text.push_str(&doc.inner_text(child));
        } else if *name == S::r() {
            for t in doc.elements_by_name(child, &S::t()) {
                text.push_str(&doc.inner_text(t));
            }
        }
    }
    text
}

/// Shared strings collected while worksheets are written.
#[derive(Debug, Default)]
pub(crate) struct SharedStringTable {
    strings: Vec<String>,
    ids: HashMap<String, u32>,
    references: usize,
}

impl SharedStringTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn index(&mut self, value: &str) -> u32 {
        self.references += 1;
        if let Some(&id) = self.ids.get(value) {
            return id;
        }
        let id = self.strings.len() as u32;
        self.strings.push(value.to_string());
        self.ids.insert(value.to_string(), id);
        id
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub(crate) fn to_document(&self) -> XmlDocument {
        let mut doc = XmlDocument::new();
        let root = doc.add_root(XmlNodeData::element_with_attrs(
            S::sst(),
            vec![
                XAttribute::local("xmlns", S::NS),
                XAttribute::local("count", &self.references.to_string()),
                XAttribute::local("uniqueCount", &self.strings.len().to_string()),
            ],
        ));
        for value in &self.strings {
            let si = doc.add_element(root, S::si(), Vec::new());
            let t = text_element(&mut doc, si, value);
            doc.add_child(t, XmlNodeData::text(value));
        }
        doc
    }
}

/// A `<t>` element, marked `xml:space="preserve"` when edge whitespace
/// would otherwise be dropped.
pub(crate) fn text_element(doc: &mut XmlDocument, parent: NodeId, value: &str) -> NodeId {
    let attrs = if value.trim() != value {
        vec![XAttribute::new(XName::new(XML_NS, "space"), "preserve")]
    } else {
        Vec::new()
    };
    doc.add_element(parent, S::t(), attrs)
}
