use crate::error::{GraftError, Result};
use crate::xml::namespaces::PR;
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum TargetMode {
    #[default]
    Internal,
    External,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relationship {
    pub id: String,
    pub rel_type: String,
    pub target: String,
    #[serde(default)]
    pub target_mode: TargetMode,
}

impl Relationship {
    pub fn new(id: &str, rel_type: &str, target: &str) -> Self {
        Self {
            id: id.to_string(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode: TargetMode::Internal,
        }
    }

    pub fn external(id: &str, rel_type: &str, target: &str) -> Self {
        Self {
            id: id.to_string(),
            rel_type: rel_type.to_string(),
            target: target.to_string(),
            target_mode: TargetMode::External,
        }
    }

    pub fn is_external(&self) -> bool {
        self.target_mode == TargetMode::External
    }
}

/// Reads the `Relationship` entries of a `.rels` part.
pub fn parse_relationships(doc: &XmlDocument) -> Result<Vec<Relationship>> {
    let Some(root) = doc.root() else {
        return Ok(Vec::new());
    };

    let mut rels = Vec::new();
    for node in doc.elements_by_name(root, &PR::Relationship()) {
        let id = doc.attribute_local(node, "Id");
        let rel_type = doc.attribute_local(node, "Type");
        let target = doc.attribute_local(node, "Target");
        let (Some(id), Some(rel_type), Some(target)) = (id, rel_type, target) else {
            return Err(GraftError::InvalidRelationship {
                message: "relationship is missing Id, Type or Target".to_string(),
            });
        };

        let mut rel = Relationship::new(id, rel_type, target);
        if doc.attribute_local(node, "TargetMode") == Some("External") {
            rel.target_mode = TargetMode::External;
        }
        rels.push(rel);
    }
    Ok(rels)
}

pub fn relationships_document(rels: &[Relationship]) -> XmlDocument {
    let mut doc = XmlDocument::new();
    let root = doc.add_root(XmlNodeData::element_with_attrs(
        PR::Relationships(),
        vec![XAttribute::local("xmlns", PR::NS)],
    ));

    for rel in rels {
        let mut attrs = vec![
            XAttribute::local("Id", &rel.id),
            XAttribute::local("Type", &rel.rel_type),
            XAttribute::local("Target", &rel.target),
        ];
        if rel.is_external() {
            attrs.push(XAttribute::new(XName::local("TargetMode"), "External"));
        }
        doc.add_child(root, XmlNodeData::element_with_attrs(PR::Relationship(), attrs));
    }
    doc
}

/// Smallest `rIdN` not used by `rels`.
pub fn next_relationship_id(rels: &[Relationship]) -> String {
    let max = rels
        .iter()
        .filter_map(|r| r.id.strip_prefix("rId"))
        .filter_map(|n| n.parse::<u32>().ok())
        .max()
        .unwrap_or(0);
    format!("rId{}", max + 1)
}

pub mod relationship_types {
    pub const OFFICE_DOCUMENT: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";
    pub const CORE_PROPERTIES: &str =
        "http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties";
    pub const WORKSHEET: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet";
    pub const STYLES: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/styles";
    pub const SHARED_STRINGS: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/sharedStrings";
    pub const THEME: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme";
    pub const DRAWING: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/drawing";
    pub const IMAGE: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/image";
    pub const HYPERLINK: &str =
        "http://schemas.openxmlformats.org/officeDocument/2006/relationships/hyperlink";
}
