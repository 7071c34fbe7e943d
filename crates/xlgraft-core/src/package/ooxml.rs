use crate::error::{GraftError, Result};
use crate::xml::XmlDocument;
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use zip::read::ZipArchive;
use zip::write::ZipWriter;
use zip::CompressionMethod;

use super::content_types::ContentTypes;
use super::relationships::{parse_relationships, relationships_document, Relationship};

pub const CONTENT_TYPES_PART: &str = "[Content_Types].xml";

/// Zip container of named parts.
///
/// Part names never carry a leading `/`. `[Content_Types].xml` is always
/// written as the first zip entry.
pub struct OoxmlPackage {
    parts: BTreeMap<String, Vec<u8>>,
}

impl OoxmlPackage {
    pub fn new() -> Self {
        Self {
            parts: BTreeMap::new(),
        }
    }

    pub fn open(bytes: &[u8]) -> Result<Self> {
        let cursor = Cursor::new(bytes);
        let mut archive = ZipArchive::new(cursor)?;

        let mut parts = BTreeMap::new();

        for i in 0..archive.len() {
            let mut file = archive.by_index(i)?;
            if file.is_dir() {
                continue;
            }
            let name = file.name().trim_start_matches('/').to_string();
            let mut content = Vec::new();
            file.read_to_end(&mut content)?;
            parts.insert(name, content);
        }

        if !parts.contains_key(CONTENT_TYPES_PART) {
            return Err(GraftError::InvalidPackage {
                message: format!("{} is missing", CONTENT_TYPES_PART),
            });
        }

        Ok(Self { parts })
    }

    pub fn save(&self) -> Result<Vec<u8>> {
        let mut buffer = Cursor::new(Vec::new());
        let mut writer = ZipWriter::new(&mut buffer);
        let options: zip::write::FileOptions<'_, ()> =
            zip::write::FileOptions::default().compression_method(CompressionMethod::Deflated);

        let ordered = self
            .parts
            .get_key_value(CONTENT_TYPES_PART)
            .into_iter()
            .chain(self.parts.iter().filter(|(name, _)| *name != CONTENT_TYPES_PART));

        for (path, content) in ordered {
            writer.start_file(path.as_str(), options)?;
            writer.write_all(content)?;
        }

        writer.finish()?;
        Ok(buffer.into_inner())
    }

    pub fn get_part(&self, path: &str) -> Option<&[u8]> {
        self.parts.get(path).map(|v| v.as_slice())
    }

    pub fn get_xml_part(&self, path: &str) -> Result<XmlDocument> {
        let bytes = self.get_part(path).ok_or_else(|| GraftError::MissingPart {
            part_path: path.to_string(),
            document_type: "SpreadsheetML".to_string(),
        })?;
        crate::xml::parser::parse_bytes(bytes)
    }

    pub fn set_part(&mut self, path: &str, content: Vec<u8>) {
        self.parts.insert(path.to_string(), content);
    }

    pub fn put_xml_part(&mut self, path: &str, doc: &XmlDocument) -> Result<()> {
        let bytes = crate::xml::builder::serialize_bytes(doc)?;
        self.set_part(path, bytes);
        Ok(())
    }

    pub fn delete_part(&mut self, path: &str) {
        self.parts.remove(path);
    }

    pub fn has_part(&self, path: &str) -> bool {
        self.parts.contains_key(path)
    }

    pub fn part_names(&self) -> impl Iterator<Item = &String> {
        self.parts.keys()
    }

    pub fn content_types(&self) -> Result<ContentTypes> {
        Ok(ContentTypes::parse(&self.get_xml_part(CONTENT_TYPES_PART)?))
    }

    pub fn set_content_types(&mut self, types: &ContentTypes) -> Result<()> {
        self.put_xml_part(CONTENT_TYPES_PART, &types.to_document())
    }

    /// Relationships owned by `source_part`; an absent `.rels` part means none.
    /// Pass `""` for the package-level relationships.
    pub fn relationships(&self, source_part: &str) -> Result<Vec<Relationship>> {
        let rels_part = rels_part_name(source_part);
        if !self.has_part(&rels_part) {
            return Ok(Vec::new());
        }
        parse_relationships(&self.get_xml_part(&rels_part)?)
    }

    pub fn set_relationships(&mut self, source_part: &str, rels: &[Relationship]) -> Result<()> {
        let rels_part = rels_part_name(source_part);
        self.put_xml_part(&rels_part, &relationships_document(rels))
    }
}

impl Default for OoxmlPackage {
    fn default() -> Self {
        Self::new()
    }
}

/// `xl/worksheets/sheet1.xml` -> `xl/worksheets/_rels/sheet1.xml.rels`.
pub fn rels_part_name(source_part: &str) -> String {
    match source_part.rsplit_once('/') {
        Some((dir, name)) => format!("{}/_rels/{}.rels", dir, name),
        None if source_part.is_empty() => "_rels/.rels".to_string(),
        None => format!("_rels/{}.rels", source_part),
    }
}

/// Resolves a relationship target against the part that owns it.
///
/// Absolute targets (`/xl/media/image1.png`) are taken from the package root;
/// relative ones are joined to the source part's directory with `..` applied.
pub fn resolve_target(source_part: &str, target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }

    let mut segments: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

/// Inverse of [`resolve_target`]: the relative target from `source_part` to `part`.
pub fn relative_target(source_part: &str, part: &str) -> String {
    let source_dir: Vec<&str> = match source_part.rsplit_once('/') {
        Some((dir, _)) => dir.split('/').collect(),
        None => Vec::new(),
    };
    let target: Vec<&str> = part.split('/').collect();

    let common = source_dir
        .iter()
        .zip(target.iter())
        .take_while(|(a, b)| a == b)
        .count();

    let mut out: Vec<&str> = vec![".."; source_dir.len() - common];
    out.extend(&target[common..]);
    out.join("/")
}
