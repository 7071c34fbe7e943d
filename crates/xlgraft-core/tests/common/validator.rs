//! SpreadsheetML package validation.
//!
//! Checks a written `.xlsx` for the rules Excel refuses to open files over:
//!
//! 1. **Required parts**: `[Content_Types].xml`, `_rels/.rels` and the
//!    workbook part it points at.
//! 2. **Well-formedness**: every `.xml` and `.rels` part parses.
//! 3. **Relationships**: every internal target exists in the archive.
//! 4. **Content types**: every part has an Override or an extension Default.
//! 5. **Worksheet child order**: `sheetData`, `mergeCells`,
//!    `conditionalFormatting`, `hyperlinks`, `drawing` appear in schema order.
//! 6. **Workbook rules**: sheet names unique (case-insensitive), cell style
//!    indices inside `cellXfs`, conditional priorities unique per sheet.

use roxmltree::{Document, Node};
use std::collections::{BTreeMap, HashSet};
use std::io::Read;
use xlgraft_core::package::ooxml::rels_part_name;
use xlgraft_core::package::resolve_target;

#[derive(Debug, Clone)]
pub struct ValidationResult {
    pub is_valid: bool,
    pub errors: Vec<ValidationError>,
}

#[derive(Debug, Clone)]
pub struct ValidationError {
    pub path: String,
    pub message: String,
    pub error_type: ValidationErrorType,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ValidationErrorType {
    MissingPart,
    InvalidXml,
    BrokenRelationship,
    InvalidContentType,
    ElementOrderingViolation,
    SchemaViolation,
}

const S_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const REL_NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";
const CT_NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";
const OFFICE_DOCUMENT: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument";

/// Worksheet children this crate writes, in `CT_Worksheet` order.
const WORKSHEET_ORDER: [&str; 5] = [
    "sheetData",
    "mergeCells",
    "conditionalFormatting",
    "hyperlinks",
    "drawing",
];

struct Errors(Vec<ValidationError>);

impl Errors {
    fn push(&mut self, path: &str, error_type: ValidationErrorType, message: String) {
        self.0.push(ValidationError {
            path: path.to_string(),
            message,
            error_type,
        });
    }
}

/// Validate an `.xlsx` package from bytes.
pub fn validate_xlsx(bytes: &[u8]) -> ValidationResult {
    let mut errors = Errors(Vec::new());

    let parts = match read_parts(bytes) {
        Ok(parts) => parts,
        Err(message) => {
            errors.push("", ValidationErrorType::InvalidXml, message);
            return finish(errors);
        }
    };

    for required in ["[Content_Types].xml", "_rels/.rels"] {
        if !parts.contains_key(required) {
            errors.push(required, ValidationErrorType::MissingPart, format!("missing {}", required));
        }
    }

    let mut docs = BTreeMap::new();
    for (name, data) in &parts {
        if !(name.ends_with(".xml") || name.ends_with(".rels")) {
            continue;
        }
        match std::str::from_utf8(data) {
            Ok(text) => match Document::parse(text) {
                Ok(_) => {
                    docs.insert(name.clone(), text);
                }
                Err(e) => errors.push(name, ValidationErrorType::InvalidXml, e.to_string()),
            },
            Err(e) => errors.push(name, ValidationErrorType::InvalidXml, e.to_string()),
        }
    }

    check_content_types(&parts, &docs, &mut errors);
    check_relationships(&parts, &docs, &mut errors);

    let workbook_part = docs
        .get("_rels/.rels")
        .and_then(|text| Document::parse(text).ok())
        .and_then(|doc| {
            doc.root_element()
                .children()
                .filter(|n| n.has_tag_name((REL_NS, "Relationship")))
                .find(|n| n.attribute("Type") == Some(OFFICE_DOCUMENT))
                .and_then(|n| n.attribute("Target"))
                .map(|t| resolve_target("", t))
        });
    match workbook_part {
        Some(part) if docs.contains_key(&part) => check_workbook(&part, &docs, &mut errors),
        Some(part) => errors.push(&part, ValidationErrorType::MissingPart, "workbook part missing".into()),
        None => errors.push(
            "_rels/.rels",
            ValidationErrorType::BrokenRelationship,
            "no officeDocument relationship".into(),
        ),
    }

    finish(errors)
}

fn finish(errors: Errors) -> ValidationResult {
    ValidationResult {
        is_valid: errors.0.is_empty(),
        errors: errors.0,
    }
}

fn read_parts(bytes: &[u8]) -> Result<BTreeMap<String, Vec<u8>>, String> {
    let mut archive =
        zip::ZipArchive::new(std::io::Cursor::new(bytes)).map_err(|e| format!("invalid ZIP archive: {}", e))?;
    let mut parts = BTreeMap::new();
    for i in 0..archive.len() {
        let mut file = archive.by_index(i).map_err(|e| e.to_string())?;
        if file.is_dir() {
            continue;
        }
        let mut data = Vec::new();
        file.read_to_end(&mut data).map_err(|e| e.to_string())?;
        parts.insert(file.name().to_string(), data);
    }
    Ok(parts)
}

fn check_content_types(
    parts: &BTreeMap<String, Vec<u8>>,
    docs: &BTreeMap<String, &str>,
    errors: &mut Errors,
) {
    let Some(doc) = docs.get("[Content_Types].xml").and_then(|t| Document::parse(t).ok()) else {
        return;
    };
    let root = doc.root_element();
    let defaults: HashSet<String> = root
        .children()
        .filter(|n| n.has_tag_name((CT_NS, "Default")))
        .filter_map(|n| n.attribute("Extension"))
        .map(str::to_ascii_lowercase)
        .collect();
    let overrides: HashSet<&str> = root
        .children()
        .filter(|n| n.has_tag_name((CT_NS, "Override")))
        .filter_map(|n| n.attribute("PartName"))
        .map(|p| p.trim_start_matches('/'))
        .collect();

    for override_part in &overrides {
        if !parts.contains_key(*override_part) {
            errors.push(
                override_part,
                ValidationErrorType::InvalidContentType,
                "override for a part that does not exist".into(),
            );
        }
    }
    for name in parts.keys().filter(|n| n.as_str() != "[Content_Types].xml") {
        let extension = name.rsplit_once('.').map(|(_, e)| e.to_ascii_lowercase());
        let typed = overrides.contains(name.as_str())
            || extension.is_some_and(|e| defaults.contains(&e));
        if !typed {
            errors.push(name, ValidationErrorType::InvalidContentType, "part has no content type".into());
        }
    }
}

fn check_relationships(
    parts: &BTreeMap<String, Vec<u8>>,
    docs: &BTreeMap<String, &str>,
    errors: &mut Errors,
) {
    for (name, text) in docs.iter().filter(|(n, _)| n.ends_with(".rels")) {
        let Some(source) = source_of_rels(name) else {
            errors.push(name, ValidationErrorType::BrokenRelationship, "misplaced .rels part".into());
            continue;
        };
        if !source.is_empty() && !parts.contains_key(&source) {
            errors.push(name, ValidationErrorType::BrokenRelationship, format!("owner {} missing", source));
        }
        let Ok(doc) = Document::parse(text) else { continue };

        let mut ids = HashSet::new();
        for rel in doc.root_element().children().filter(|n| n.has_tag_name((REL_NS, "Relationship"))) {
            let id = rel.attribute("Id").unwrap_or_default();
            if !ids.insert(id.to_string()) {
                errors.push(name, ValidationErrorType::BrokenRelationship, format!("duplicate id {}", id));
            }
            if rel.attribute("TargetMode") == Some("External") {
                continue;
            }
            let target = resolve_target(&source, rel.attribute("Target").unwrap_or_default());
            if !parts.contains_key(&target) {
                errors.push(
                    name,
                    ValidationErrorType::BrokenRelationship,
                    format!("{} targets missing part {}", id, target),
                );
            }
        }
    }
}

/// `xl/worksheets/_rels/sheet1.xml.rels` -> `xl/worksheets/sheet1.xml`.
fn source_of_rels(rels: &str) -> Option<String> {
    if rels == "_rels/.rels" {
        return Some(String::new());
    }
    let (dir, file) = rels.rsplit_once("_rels/")?;
    let source = format!("{}{}", dir, file.strip_suffix(".rels")?);
    (rels_part_name(&source) == rels).then_some(source)
}

fn check_workbook(workbook_part: &str, docs: &BTreeMap<String, &str>, errors: &mut Errors) {
    let Some(doc) = docs.get(workbook_part).and_then(|t| Document::parse(t).ok()) else {
        return;
    };
    let rels = docs
        .get(&rels_part_name(workbook_part))
        .and_then(|t| Document::parse(t).ok());
    let targets: BTreeMap<String, String> = rels
        .as_ref()
        .map(|rels| {
            rels.root_element()
                .children()
                .filter(|n| n.has_tag_name((REL_NS, "Relationship")))
                .filter_map(|n| {
                    Some((
                        n.attribute("Id")?.to_string(),
                        resolve_target(workbook_part, n.attribute("Target")?),
                    ))
                })
                .collect()
        })
        .unwrap_or_default();

    let xf_count = targets
        .values()
        .find(|t| t.ends_with("styles.xml"))
        .and_then(|t| docs.get(t))
        .and_then(|t| Document::parse(t).ok())
        .and_then(|styles| {
            styles
                .descendants()
                .find(|n| n.has_tag_name((S_NS, "cellXfs")))
                .map(|xfs| xfs.children().filter(|n| n.has_tag_name((S_NS, "xf"))).count())
        })
        .unwrap_or(1);

    let mut names = HashSet::new();
    for sheet in doc.descendants().filter(|n| n.has_tag_name((S_NS, "sheet"))) {
        let name = sheet.attribute("name").unwrap_or_default();
        if name.is_empty() || name.chars().count() > 31 || !names.insert(name.to_lowercase()) {
            errors.push(workbook_part, ValidationErrorType::SchemaViolation, format!("bad sheet name '{}'", name));
        }
        let rid = sheet
            .attributes()
            .find(|a| a.name() == "id" && a.namespace().is_some())
            .map(|a| a.value().to_string());
        let Some(part) = rid.and_then(|id| targets.get(&id).cloned()) else {
            errors.push(workbook_part, ValidationErrorType::BrokenRelationship, format!("sheet '{}' has no part", name));
            continue;
        };
        if let Some(sheet_doc) = docs.get(&part).and_then(|t| Document::parse(t).ok()) {
            check_worksheet(&part, sheet_doc.root_element(), xf_count, errors);
        }
    }
}

fn check_worksheet(part: &str, root: Node<'_, '_>, xf_count: usize, errors: &mut Errors) {
    let mut last = 0;
    for child in root.children().filter(Node::is_element) {
        let Some(rank) = WORKSHEET_ORDER.iter().position(|n| child.has_tag_name((S_NS, *n))) else {
            continue;
        };
        if rank < last {
            errors.push(
                part,
                ValidationErrorType::ElementOrderingViolation,
                format!("<{}> after <{}>", WORKSHEET_ORDER[rank], WORKSHEET_ORDER[last]),
            );
        }
        last = last.max(rank);
    }

    for cell in root.descendants().filter(|n| n.has_tag_name((S_NS, "c"))) {
        if let Some(s) = cell.attribute("s") {
            match s.parse::<usize>() {
                Ok(index) if index < xf_count => {}
                _ => errors.push(part, ValidationErrorType::SchemaViolation, format!("cell style {} out of range", s)),
            }
        }
    }

    let mut priorities = HashSet::new();
    for rule in root.descendants().filter(|n| n.has_tag_name((S_NS, "cfRule"))) {
        let priority = rule.attribute("priority").unwrap_or_default();
        if !priorities.insert(priority.to_string()) {
            errors.push(part, ValidationErrorType::SchemaViolation, format!("duplicate cfRule priority {}", priority));
        }
    }
}

#[allow(dead_code)]
pub fn assert_valid(bytes: &[u8]) {
    let result = validate_xlsx(bytes);
    assert!(result.is_valid, "package failed validation: {:#?}", result.errors);
}
