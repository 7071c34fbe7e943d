//! Loads an `.xlsx` package into a [`Workbook`].

use super::cell::{Cell, CellValue, ErrorCode, Hyperlink};
use super::color::Theme;
use super::conditional::{CfRule, Condition, ConditionalFormatting, DifferentialFormat};
use super::drawing::Drawing;
use super::reference::{parse_sqref, CellRange, CellRef};
use super::shared_strings::{parse_shared_strings, string_item_text};
use super::sheet::Worksheet;
use super::style::StyleId;
use super::stylesheet::Stylesheet;
use super::workbook::Workbook;
use crate::error::{GraftError, Result};
use crate::package::relationships::relationship_types;
use crate::package::{resolve_target, OoxmlPackage, Relationship};
use crate::xml::namespaces::{R, S};
use crate::xml::XmlDocument;
use indextree::NodeId;

/// Everything a worksheet needs from the workbook-level parts.
struct ReadContext<'a> {
    package: &'a OoxmlPackage,
    shared_strings: Vec<String>,
    stylesheet: Stylesheet,
}

pub(crate) fn read_workbook(bytes: &[u8]) -> Result<Workbook> {
    let package = OoxmlPackage::open(bytes)?;

    let workbook_part = package
        .relationships("")?
        .iter()
        .find(|r| r.rel_type == relationship_types::OFFICE_DOCUMENT)
        .map(|r| resolve_target("", &r.target))
        .ok_or_else(|| GraftError::MissingPart {
            part_path: "xl/workbook.xml".to_string(),
            document_type: "SpreadsheetML".to_string(),
        })?;
    let workbook_doc = package.get_xml_part(&workbook_part)?;
    let workbook_rels = package.relationships(&workbook_part)?;
    let part_of = |rel_type: &str| {
        workbook_rels
            .iter()
            .find(|r| r.rel_type == rel_type && !r.is_external())
            .map(|r| resolve_target(&workbook_part, &r.target))
    };

    let mut workbook = Workbook::new();

    if let Some(bytes) = part_of(relationship_types::THEME).and_then(|p| package.get_part(&p)) {
        workbook.theme = Theme::parse(bytes)?;
    }

    let shared_strings = match part_of(relationship_types::SHARED_STRINGS) {
        Some(part) if package.has_part(&part) => parse_shared_strings(&package.get_xml_part(&part)?),
        _ => Vec::new(),
    };
    let stylesheet = match part_of(relationship_types::STYLES) {
        Some(part) if package.has_part(&part) => Stylesheet::parse(&package.get_xml_part(&part)?),
        _ => Stylesheet::default(),
    };

    let mut styles = stylesheet.cell_styles.iter();
    if let Some(default) = styles.next() {
        workbook.styles.set_default(default.clone());
    }
    for style in styles {
        workbook.styles.add(style.clone());
    }

    let context = ReadContext {
        package: &package,
        shared_strings,
        stylesheet,
    };

    let Some(root) = workbook_doc.root() else {
        return Ok(workbook);
    };
    let sheet_entries: Vec<(String, String)> = workbook_doc
        .first_element(root, &S::sheets())
        .map(|sheets| {
            workbook_doc
                .elements_by_name(sheets, &S::sheet())
                .filter_map(|s| {
                    let name = workbook_doc.attribute_local(s, "name")?.to_string();
                    let id = workbook_doc.attribute(s, &R::id())?.to_string();
                    Some((name, id))
                })
                .collect()
        })
        .unwrap_or_default();

    for (name, rel_id) in sheet_entries {
        let rel = workbook_rels
            .iter()
            .find(|r| r.id == rel_id)
            .ok_or_else(|| GraftError::InvalidRelationship {
                message: format!("sheet '{}' points at unknown relationship {}", name, rel_id),
            })?;
        if rel.rel_type != relationship_types::WORKSHEET {
            log::warn!("sheet '{}' is not a worksheet ({}), skipped", name, rel.rel_type);
            continue;
        }
        let part = resolve_target(&workbook_part, &rel.target);
        let sheet = read_worksheet(&context, &mut workbook, &name, &part)?;
        workbook.push_sheet(sheet)?;
    }

    log::debug!(
        "read workbook with {} sheet(s), {} style(s)",
        workbook.sheet_count(),
        workbook.styles.len()
    );
    Ok(workbook)
}

fn read_worksheet(
    context: &ReadContext<'_>,
    workbook: &mut Workbook,
    name: &str,
    part: &str,
) -> Result<Worksheet> {
    let doc = context.package.get_xml_part(part)?;
    let rels = context.package.relationships(part)?;
    let mut sheet = Worksheet::new(name);

    let Some(root) = doc.root() else {
        return Ok(sheet);
    };

    if let Some(data) = doc.first_element(root, &S::sheetData()) {
        read_sheet_data(context, workbook, &doc, data, &mut sheet)?;
    }

    if let Some(merges) = doc.first_element(root, &S::mergeCells()) {
        for merge in doc.elements_by_name(merges, &S::mergeCell()) {
            if let Some(reference) = doc.attribute_local(merge, "ref") {
                sheet.add_merged_region(CellRange::parse(reference)?);
            }
        }
    }

    for block in doc.elements_by_name(root, &S::conditionalFormatting()) {
        if let Some(entry) = read_conditional_block(context, &doc, block)? {
            sheet.conditional_formatting.push(entry);
        }
    }

    if let Some(links) = doc.first_element(root, &S::hyperlinks()) {
        for link in doc.elements_by_name(links, &S::hyperlink()) {
            read_hyperlink(&doc, link, &rels, &mut sheet)?;
        }
    }

    if let Some(drawing) = doc.first_element(root, &S::drawing()) {
        let rel = doc
            .attribute(drawing, &R::id())
            .and_then(|id| rels.iter().find(|r| r.id == id));
        match rel {
            Some(rel) if !rel.is_external() => {
                let drawing_part = resolve_target(part, &rel.target);
                sheet.drawing = Some(read_drawing(context.package, workbook, &drawing_part)?);
            }
            _ => log::warn!("sheet '{}' references a drawing that cannot be resolved", name),
        }
    }

    Ok(sheet)
}

fn read_sheet_data(
    context: &ReadContext<'_>,
    workbook: &Workbook,
    doc: &XmlDocument,
    data: NodeId,
    sheet: &mut Worksheet,
) -> Result<()> {
    let mut next_row = 0u32;
    for row_node in doc.elements_by_name(data, &S::row()) {
        let row_index = match doc.attribute_local(row_node, "r") {
            Some(r) => r.parse::<u32>().ok().and_then(|r| r.checked_sub(1)).ok_or_else(|| {
                GraftError::InvalidCellReference {
                    reference: r.to_string(),
                }
            })?,
            None => next_row,
        };
        next_row = row_index + 1;

        let row = sheet.create_row(row_index);
        if matches!(doc.attribute_local(row_node, "customHeight"), Some("1" | "true")) {
            row.height = doc.attribute_local(row_node, "ht").and_then(|h| h.parse().ok());
        }

        let mut next_col = 0u32;
        for cell_node in doc.elements_by_name(row_node, &S::c()) {
            let col = match doc.attribute_local(cell_node, "r") {
                Some(r) => CellRef::parse(r)?.col,
                None => next_col,
            };
            next_col = col + 1;

            let style = doc
                .attribute_local(cell_node, "s")
                .and_then(|s| s.parse::<u32>().ok())
                .filter(|&s| s != 0)
                .map(StyleId)
                .filter(|&id| workbook.styles.contains(id));

            let value = read_cell_value(context, doc, cell_node, CellRef::new(row_index, col));
            row.set_cell(
                col,
                Cell {
                    value,
                    style,
                    hyperlink: None,
                },
            );
        }
    }
    Ok(())
}

fn read_cell_value(context: &ReadContext<'_>, doc: &XmlDocument, cell: NodeId, at: CellRef) -> CellValue {
    let cell_type = doc.attribute_local(cell, "t").unwrap_or("n");
    let value_text = doc.first_element(cell, &S::v()).map(|v| doc.inner_text(v));

    if let Some(formula) = doc.first_element(cell, &S::f()) {
        let text = doc.inner_text(formula);
        if !text.trim().is_empty() {
            return CellValue::Formula(text);
        }
        // Dependent cells of a shared formula carry no text of their own.
        log::debug!("{}: shared formula dependent kept as its cached value", at);
    }

    match cell_type {
        "s" => value_text
            .and_then(|v| v.trim().parse::<usize>().ok())
            .and_then(|i| context.shared_strings.get(i).cloned())
            .map(CellValue::String)
            .unwrap_or_default(),
        "inlineStr" => doc
            .first_element(cell, &S::is())
            .map(|is| CellValue::String(string_item_text(doc, is)))
            .unwrap_or_default(),
        "str" => value_text.map(CellValue::String).unwrap_or_default(),
        "b" => value_text
            .map(|v| CellValue::Boolean(matches!(v.trim(), "1" | "true")))
            .unwrap_or_default(),
        "e" => value_text
            .and_then(|v| ErrorCode::parse(v.trim()))
            .map(CellValue::Error)
            .unwrap_or_default(),
        _ => value_text
            .and_then(|v| v.trim().parse::<f64>().ok())
            .map(CellValue::Number)
            .unwrap_or_default(),
    }
}

fn read_conditional_block(
    context: &ReadContext<'_>,
    doc: &XmlDocument,
    block: NodeId,
) -> Result<Option<ConditionalFormatting>> {
    let Some(sqref) = doc.attribute_local(block, "sqref") else {
        return Ok(None);
    };
    let ranges = parse_sqref(sqref)?;

    let rules = doc
        .elements_by_name(block, &S::cfRule())
        .map(|rule| {
            let formulas: Vec<String> = doc
                .elements_by_name(rule, &S::formula())
                .map(|f| doc.inner_text(f))
                .collect();
            let kind = doc.attribute_local(rule, "type").unwrap_or("");
            let condition = match kind {
                "expression" => Condition::Formula(formulas.into_iter().next().unwrap_or_default()),
                "cellIs" => Condition::CellIs {
                    operator: doc.attribute_local(rule, "operator").unwrap_or("equal").to_string(),
                    formulas,
                },
                other => Condition::Other {
                    kind: other.to_string(),
                    formulas,
                },
            };
            let format = doc
                .attribute_local(rule, "dxfId")
                .and_then(|id| id.parse::<usize>().ok())
                .and_then(|id| context.stylesheet.dxfs.get(id))
                .cloned()
                .unwrap_or_else(DifferentialFormat::default);
            CfRule {
                priority: doc
                    .attribute_local(rule, "priority")
                    .and_then(|p| p.parse().ok())
                    .unwrap_or(0),
                condition,
                stop_if_true: matches!(doc.attribute_local(rule, "stopIfTrue"), Some("1" | "true")),
                format,
            }
        })
        .collect();

    Ok(Some(ConditionalFormatting { ranges, rules }))
}

fn read_hyperlink(
    doc: &XmlDocument,
    link: NodeId,
    rels: &[Relationship],
    sheet: &mut Worksheet,
) -> Result<()> {
    let Some(reference) = doc.attribute_local(link, "ref") else {
        return Ok(());
    };
    let range = CellRange::parse(reference)?;

    let external = doc
        .attribute(link, &R::id())
        .and_then(|id| rels.iter().find(|r| r.id == id))
        .map(|r| r.target.clone());
    let (address, is_location) = match (external, doc.attribute_local(link, "location")) {
        (Some(target), Some(location)) => (format!("{}#{}", target, location), false),
        (Some(target), None) => (target, false),
        (None, Some(location)) => (location.to_string(), true),
        (None, None) => return Ok(()),
    };

    let mut hyperlink = Hyperlink::new(Hyperlink::classify(&address, is_location), &address);
    if let Some(label) = doc.attribute_local(link, "display") {
        hyperlink = hyperlink.with_label(label);
    }

    // The top-left cell always carries the link; other cells of the range
    // carry it only if they exist.
    sheet.create_row(range.first.row).create_cell(range.first.col);
    for row in sheet.rows.range_mut(range.first.row..=range.last.row).map(|(_, r)| r) {
        for cell in row.cells.range_mut(range.first.col..=range.last.col).map(|(_, c)| c) {
            cell.hyperlink = Some(hyperlink.clone());
        }
    }
    Ok(())
}

/// Loads a drawing part. Internal relationship targets are turned into
/// package part names and the media they point at is copied into the
/// workbook.
fn read_drawing(package: &OoxmlPackage, workbook: &mut Workbook, part: &str) -> Result<Drawing> {
    let tree = package.get_xml_part(part)?;
    let relationships: Vec<Relationship> = package
        .relationships(part)?
        .into_iter()
        .map(|mut rel| {
            if !rel.is_external() {
                rel.target = resolve_target(part, &rel.target);
            }
            rel
        })
        .collect();

    for media in relationships
        .iter()
        .filter(|r| r.rel_type == relationship_types::IMAGE && !r.is_external())
    {
        if workbook.media.contains_key(&media.target) {
            continue;
        }
        match package.get_part(&media.target) {
            Some(bytes) => {
                workbook.media.insert(media.target.clone(), bytes.to_vec());
            }
            None => log::warn!("{}: image part {} is missing", part, media.target),
        }
    }

    let mut drawing = Drawing::from_tree(tree, relationships)?;
    let dropped = drawing.remove_graphic_frames()?;
    if dropped > 0 {
        log::warn!("{}: dropped {} chart or graphic frame anchor(s)", part, dropped);
    }
    Ok(drawing)
}
