//! Serializes a [`Workbook`] into an `.xlsx` package.
//!
//! Part layout is fixed: `xl/workbook.xml`, `xl/worksheets/sheetN.xml`,
//! `xl/drawings/drawingN.xml`, the shared styles and strings, the theme
//! when one was loaded, and `docProps/core.xml`.

use super::cell::{Cell, CellValue, HyperlinkType};
use super::reference::{format_sqref, CellRef};
use super::shared_strings::SharedStringTable;
use super::sheet::Worksheet;
use super::stylesheet::StylesheetWriter;
use super::workbook::Workbook;
use super::conditional::Condition;
use super::drawing::PictureType;
use crate::error::Result;
use crate::package::content_types::content_type_values;
use crate::package::relationships::{next_relationship_id, relationship_types};
use crate::package::{relative_target, ContentTypes, OoxmlPackage, Relationship};
use crate::xml::namespaces::{CP, DC, DCTERMS, R, S, XMLNS, XSI};
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData};
use indextree::NodeId;

const WORKBOOK_PART: &str = "xl/workbook.xml";
const STYLES_PART: &str = "xl/styles.xml";
const SHARED_STRINGS_PART: &str = "xl/sharedStrings.xml";
const THEME_PART: &str = "xl/theme/theme1.xml";
const CORE_PART: &str = "docProps/core.xml";

/// Workbook-wide tables filled while the sheets are written.
struct WriteContext {
    strings: SharedStringTable,
    styles: StylesheetWriter,
    drawing_count: usize,
}

pub(crate) fn write_workbook(workbook: &Workbook) -> Result<Vec<u8>> {
    let mut package = OoxmlPackage::new();
    let mut types = ContentTypes::new();
    let mut workbook_rels: Vec<Relationship> = Vec::new();
    let mut context = WriteContext {
        strings: SharedStringTable::new(),
        styles: StylesheetWriter::new(),
        drawing_count: 0,
    };

    let mut sheet_ids = Vec::with_capacity(workbook.sheet_count());
    for (index, sheet) in workbook.sheets().iter().enumerate() {
        let part = format!("xl/worksheets/sheet{}.xml", index + 1);
        write_worksheet(&mut package, &mut types, &mut context, sheet, &part)?;
        types.set_content_type(&part, content_type_values::WORKSHEET);

        let id = next_relationship_id(&workbook_rels);
        workbook_rels.push(Relationship::new(
            &id,
            relationship_types::WORKSHEET,
            &relative_target(WORKBOOK_PART, &part),
        ));
        sheet_ids.push(id);
    }

    package.put_xml_part(STYLES_PART, &context.styles.to_document(&workbook.styles))?;
    types.set_content_type(STYLES_PART, content_type_values::STYLES);
    push_workbook_rel(&mut workbook_rels, relationship_types::STYLES, STYLES_PART);

    if !context.strings.is_empty() {
        package.put_xml_part(SHARED_STRINGS_PART, &context.strings.to_document())?;
        types.set_content_type(SHARED_STRINGS_PART, content_type_values::SHARED_STRINGS);
        push_workbook_rel(&mut workbook_rels, relationship_types::SHARED_STRINGS, SHARED_STRINGS_PART);
    }

    if let Some(raw) = &workbook.theme.raw {
        package.set_part(THEME_PART, raw.clone());
        types.set_content_type(THEME_PART, content_type_values::THEME);
        push_workbook_rel(&mut workbook_rels, relationship_types::THEME, THEME_PART);
    }

    for (part, bytes) in &workbook.media {
        package.set_part(part, bytes.clone());
        if let Some((_, extension)) = part.rsplit_once('.') {
            let content_type = PictureType::from_extension(extension)
                .map(PictureType::content_type)
                .unwrap_or("application/octet-stream");
            types.add_default(extension, content_type);
        }
    }

    package.put_xml_part(WORKBOOK_PART, &workbook_document(workbook, &sheet_ids))?;
    types.set_content_type(WORKBOOK_PART, content_type_values::WORKBOOK);
    package.set_relationships(WORKBOOK_PART, &workbook_rels)?;

    package.put_xml_part(CORE_PART, &core_properties_document())?;
    types.set_content_type(CORE_PART, content_type_values::CORE_PROPERTIES);
    package.set_relationships(
        "",
        &[
            Relationship::new("rId1", relationship_types::OFFICE_DOCUMENT, WORKBOOK_PART),
            Relationship::new("rId2", relationship_types::CORE_PROPERTIES, CORE_PART),
        ],
    )?;

    package.set_content_types(&types)?;
    log::debug!(
        "wrote workbook with {} sheet(s), {} part(s)",
        workbook.sheet_count(),
        package.part_names().count()
    );
    package.save()
}

fn push_workbook_rel(rels: &mut Vec<Relationship>, rel_type: &str, part: &str) {
    let id = next_relationship_id(rels);
    rels.push(Relationship::new(&id, rel_type, &relative_target(WORKBOOK_PART, part)));
}

fn root_element(name: XName, extra: Vec<XAttribute>) -> (XmlDocument, NodeId) {
    let mut attrs = vec![XAttribute::local("xmlns", S::NS)];
    attrs.extend(extra);
    let mut doc = XmlDocument::new();
    let root = doc.add_root(XmlNodeData::element_with_attrs(name, attrs));
    (doc, root)
}

fn r_namespace() -> XAttribute {
    XAttribute::new(XName::new(XMLNS::NS, "r"), R::NS)
}

fn workbook_document(workbook: &Workbook, sheet_ids: &[String]) -> XmlDocument {
    let (mut doc, root) = root_element(S::workbook(), vec![r_namespace()]);
    let sheets = doc.add_element(root, S::sheets(), Vec::new());
    for (index, (sheet, id)) in workbook.sheets().iter().zip(sheet_ids).enumerate() {
        doc.add_element(
            sheets,
            S::sheet(),
            vec![
                XAttribute::local("name", sheet.name()),
                XAttribute::local("sheetId", &(index + 1).to_string()),
                XAttribute::new(R::id(), id),
            ],
        );
    }
    // Formulas are stored without cached results.
    doc.add_element(
        root,
        S::calcPr(),
        vec![
            XAttribute::local("calcId", "191029"),
            XAttribute::local("fullCalcOnLoad", "1"),
        ],
    );
    doc
}

fn core_properties_document() -> XmlDocument {
    let mut doc = XmlDocument::new();
    let root = doc.add_root(XmlNodeData::element_with_attrs(
        CP::coreProperties(),
        vec![
            XAttribute::new(XName::new(XMLNS::NS, "cp"), CP::NS),
            XAttribute::new(XName::new(XMLNS::NS, "dc"), DC::NS),
            XAttribute::new(XName::new(XMLNS::NS, "dcterms"), DCTERMS::NS),
            XAttribute::new(XName::new(XMLNS::NS, "xsi"), XSI::NS),
        ],
    ));
    doc.add_text_element(root, DC::creator(), "xlgraft");

    let now = chrono::Utc::now().format("%Y-%m-%dT%H:%M:%SZ").to_string();
    for name in [DCTERMS::created(), DCTERMS::modified()] {
        let node = doc.add_element(
            root,
            name,
            vec![XAttribute::new(XName::new(XSI::NS, "type"), "dcterms:W3CDTF")],
        );
        doc.add_child(node, XmlNodeData::text(&now));
    }
    doc
}

fn write_worksheet(
    package: &mut OoxmlPackage,
    types: &mut ContentTypes,
    context: &mut WriteContext,
    sheet: &Worksheet,
    part: &str,
) -> Result<()> {
    let (mut doc, root) = root_element(S::worksheet(), vec![r_namespace()]);
    let mut rels: Vec<Relationship> = Vec::new();

    let data = doc.add_element(root, S::sheetData(), Vec::new());
    for (&row_index, row) in &sheet.rows {
        let mut attrs = vec![XAttribute::local("r", &(row_index + 1).to_string())];
        if let Some(height) = row.height {
            attrs.push(XAttribute::local("ht", &height.to_string()));
            attrs.push(XAttribute::local("customHeight", "1"));
        }
        let row_node = doc.add_element(data, S::row(), attrs);
        for (&col, cell) in &row.cells {
            write_cell(&mut doc, row_node, context, CellRef::new(row_index, col), cell);
        }
    }

    if !sheet.merged_regions.is_empty() {
        let merges = doc.add_element(
            root,
            S::mergeCells(),
            vec![XAttribute::local("count", &sheet.merged_regions.len().to_string())],
        );
        for range in &sheet.merged_regions {
            doc.add_element(merges, S::mergeCell(), vec![XAttribute::local("ref", &range.to_string())]);
        }
    }

    for entry in sheet.conditional_formatting.entries() {
        let block = doc.add_element(
            root,
            S::conditionalFormatting(),
            vec![XAttribute::local("sqref", &format_sqref(&entry.ranges))],
        );
        for rule in &entry.rules {
            let mut attrs = vec![XAttribute::local("type", rule.condition.kind())];
            if !rule.format.is_empty() {
                let dxf = context.styles.register_dxf(&rule.format);
                attrs.push(XAttribute::local("dxfId", &dxf.to_string()));
            }
            attrs.push(XAttribute::local("priority", &rule.priority.to_string()));
            if rule.stop_if_true {
                attrs.push(XAttribute::local("stopIfTrue", "1"));
            }
            match &rule.condition {
                Condition::Formula(_) => {}
                Condition::CellIs { operator, .. } => {
                    attrs.push(XAttribute::local("operator", operator));
                }
                Condition::Other { kind, .. } => {
                    log::warn!(
                        "sheet '{}': {} rule cannot be written and was dropped",
                        sheet.name(),
                        kind
                    );
                    continue;
                }
            }
            let rule_node = doc.add_element(block, S::cfRule(), attrs);
            for formula in rule.condition.formulas() {
                doc.add_text_element(rule_node, S::formula(), formula);
            }
        }
        if doc.element_children(block).next().is_none() {
            doc.remove_subtree(block);
        }
    }

    let links: Vec<(CellRef, &Cell)> = sheet
        .rows
        .iter()
        .flat_map(|(&r, row)| row.cells.iter().map(move |(&c, cell)| (CellRef::new(r, c), cell)))
        .filter(|(_, cell)| cell.hyperlink.is_some())
        .collect();
    if !links.is_empty() {
        let container = doc.add_element(root, S::hyperlinks(), Vec::new());
        for (at, cell) in links {
            let Some(link) = &cell.hyperlink else {
                continue;
            };
            let mut attrs = vec![XAttribute::local("ref", &at.to_string())];
            if link.kind == HyperlinkType::Document {
                attrs.push(XAttribute::local("location", &link.address));
            } else {
                let id = next_relationship_id(&rels);
                rels.push(Relationship::external(&id, relationship_types::HYPERLINK, &link.address));
                attrs.push(XAttribute::new(R::id(), &id));
            }
            if let Some(label) = &link.label {
                attrs.push(XAttribute::local("display", label));
            }
            doc.add_element(container, S::hyperlink(), attrs);
        }
    }

    if let Some(drawing) = sheet.drawing().filter(|d| !d.is_empty()) {
        context.drawing_count += 1;
        let drawing_part = format!("xl/drawings/drawing{}.xml", context.drawing_count);
        package.set_part(&drawing_part, drawing.to_xml_bytes()?);
        types.set_content_type(&drawing_part, content_type_values::DRAWING);

        let drawing_rels: Vec<Relationship> = drawing
            .relationships
            .iter()
            .map(|rel| {
                let mut rel = rel.clone();
                if !rel.is_external() {
                    rel.target = relative_target(&drawing_part, &rel.target);
                }
                rel
            })
            .collect();
        if !drawing_rels.is_empty() {
            package.set_relationships(&drawing_part, &drawing_rels)?;
        }

        let id = next_relationship_id(&rels);
        rels.push(Relationship::new(
            &id,
            relationship_types::DRAWING,
            &relative_target(part, &drawing_part),
        ));
        doc.add_element(root, S::drawing(), vec![XAttribute::new(R::id(), &id)]);
    }

    package.put_xml_part(part, &doc)?;
    if !rels.is_empty() {
        package.set_relationships(part, &rels)?;
    }
    Ok(())
}

fn write_cell(doc: &mut XmlDocument, row: NodeId, context: &mut WriteContext, at: CellRef, cell: &Cell) {
    let mut attrs = vec![XAttribute::local("r", &at.to_string())];
    if let Some(style) = cell.style.filter(|s| s.index() != 0) {
        attrs.push(XAttribute::local("s", &style.index().to_string()));
    }

    let value = match &cell.value {
        CellValue::Empty => None,
        CellValue::String(text) => {
            attrs.push(XAttribute::local("t", "s"));
            Some((S::v(), context.strings.index(text).to_string()))
        }
        CellValue::Number(n) => Some((S::v(), n.to_string())),
        CellValue::Boolean(b) => {
            attrs.push(XAttribute::local("t", "b"));
            Some((S::v(), if *b { "1" } else { "0" }.to_string()))
        }
        CellValue::Error(code) => {
            attrs.push(XAttribute::local("t", "e"));
            Some((S::v(), code.as_str().to_string()))
        }
        CellValue::Formula(formula) => Some((S::f(), formula.clone())),
    };

    let node = doc.add_element(row, S::c(), attrs);
    if let Some((name, text)) = value {
        doc.add_text_element(node, name, &text);
    }
}
