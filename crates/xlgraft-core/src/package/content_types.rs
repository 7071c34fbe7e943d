use crate::xml::namespaces::CT;
use crate::xml::{XAttribute, XmlDocument, XmlNodeData};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default)]
pub struct ContentTypes {
    defaults: BTreeMap<String, String>,
    overrides: BTreeMap<String, String>,
}

impl ContentTypes {
    pub fn new() -> Self {
        let mut types = Self::default();
        types.add_default("rels", content_type_values::RELATIONSHIPS);
        types.add_default("xml", content_type_values::XML);
        types
    }

    pub fn parse(doc: &XmlDocument) -> Self {
        let mut types = Self::default();
        let Some(root) = doc.root() else {
            return types;
        };

        for node in doc.elements_by_name(root, &CT::Default()) {
            if let (Some(ext), Some(ct)) = (
                doc.attribute_local(node, "Extension"),
                doc.attribute_local(node, "ContentType"),
            ) {
                types.add_default(ext, ct);
            }
        }
        for node in doc.elements_by_name(root, &CT::Override()) {
            if let (Some(part), Some(ct)) = (
                doc.attribute_local(node, "PartName"),
                doc.attribute_local(node, "ContentType"),
            ) {
                types.set_content_type(part, ct);
            }
        }
        types
    }

    pub fn to_document(&self) -> XmlDocument {
        let mut doc = XmlDocument::new();
        let root = doc.add_root(XmlNodeData::element_with_attrs(
            CT::Types(),
            vec![XAttribute::local("xmlns", CT::NS)],
        ));

        for (ext, ct) in &self.defaults {
            doc.add_child(
                root,
                XmlNodeData::element_with_attrs(
                    CT::Default(),
                    vec![
                        XAttribute::local("Extension", ext),
                        XAttribute::local("ContentType", ct),
                    ],
                ),
            );
        }
        for (part, ct) in &self.overrides {
            doc.add_child(
                root,
                XmlNodeData::element_with_attrs(
                    CT::Override(),
                    vec![
                        XAttribute::local("PartName", &format!("/{}", part)),
                        XAttribute::local("ContentType", ct),
                    ],
                ),
            );
        }
        doc
    }

    /// Content type of a part name (with or without the leading `/`).
    pub fn get_content_type(&self, path: &str) -> Option<&str> {
        let path = path.trim_start_matches('/');
        if let Some(ct) = self.overrides.get(path) {
            return Some(ct);
        }

        let ext = path.rsplit_once('.').map(|(_, ext)| ext.to_ascii_lowercase())?;
        self.defaults.get(&ext).map(|s| s.as_str())
    }

    pub fn set_content_type(&mut self, path: &str, content_type: &str) {
        self.overrides.insert(
            path.trim_start_matches('/').to_string(),
            content_type.to_string(),
        );
    }

    pub fn add_default(&mut self, extension: &str, content_type: &str) {
        self.defaults
            .insert(extension.to_ascii_lowercase(), content_type.to_string());
    }
}

pub mod content_type_values {
    pub const RELATIONSHIPS: &str = "application/vnd.openxmlformats-package.relationships+xml";
    pub const XML: &str = "application/xml";
    pub const WORKBOOK: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml";
    pub const WORKSHEET: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml";
    pub const STYLES: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.styles+xml";
    pub const SHARED_STRINGS: &str =
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sharedStrings+xml";
    pub const THEME: &str = "application/vnd.openxmlformats-officedocument.theme+xml";
    pub const DRAWING: &str = "application/vnd.openxmlformats-officedocument.drawing+xml";
    pub const CORE_PROPERTIES: &str = "application/vnd.openxmlformats-package.core-properties+xml";
}
