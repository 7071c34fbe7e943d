//! The `xl/styles.xml` part.
//!
//! Reading expands every `cellXfs` entry into a full [`CellStyle`] so the
//! pool index equals the xf index. Writing goes the other way: fonts, fills,
//! borders and number formats are deduplicated into their tables and every
//! pool slot gets exactly one xf, keeping `StyleId` stable across a save.

use super::color::{Color, Rgb};
use super::conditional::{BorderFormatting, DifferentialFormat, FontFormatting, PatternFormatting};
use super::style::{
    Alignment, Border, BorderEdge, BorderStyle, CellStyle, Fill, FillPattern, Font, NumberFormat,
    StylePool, Underline, FIRST_CUSTOM_NUM_FMT_ID,
};
use crate::xml::namespaces::S;
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData};
use indextree::NodeId;
use std::collections::{BTreeMap, HashMap};

/// Styles read from a workbook.
#[derive(Debug, Default)]
pub(crate) struct Stylesheet {
    pub cell_styles: Vec<CellStyle>,
    pub dxfs: Vec<DifferentialFormat>,
}

impl Stylesheet {
    pub(crate) fn parse(doc: &XmlDocument) -> Self {
        let Some(root) = doc.root() else {
            return Self::default();
        };

        let custom_formats: HashMap<u32, String> = section(doc, root, S::numFmts(), S::numFmt())
            .into_iter()
            .filter_map(|n| {
                let id = doc.attribute_local(n, "numFmtId")?.parse().ok()?;
                let code = doc.attribute_local(n, "formatCode")?.to_string();
                Some((id, code))
            })
            .collect();
        let number_format = |id: u32| match custom_formats.get(&id) {
            Some(code) => NumberFormat::Custom(code.clone()),
            None => NumberFormat::BuiltIn(id),
        };

        let fonts: Vec<Font> = section(doc, root, S::fonts(), S::font())
            .into_iter()
            .map(|n| parse_font(doc, n))
            .collect();
        let fills: Vec<Fill> = section(doc, root, S::fills(), S::fill())
            .into_iter()
            .map(|n| parse_fill(doc, n))
            .collect();
        let borders: Vec<Border> = section(doc, root, S::borders(), S::border())
            .into_iter()
            .map(|n| parse_border(doc, n))
            .collect();

        let index = |node: NodeId, attr: &str| -> usize {
            doc.attribute_local(node, attr)
                .and_then(|v| v.parse().ok())
                .unwrap_or(0)
        };

        let cell_styles = section(doc, root, S::cellXfs(), S::xf())
            .into_iter()
            .map(|xf| CellStyle {
                font: fonts.get(index(xf, "fontId")).cloned().unwrap_or_default(),
                fill: fills.get(index(xf, "fillId")).cloned().unwrap_or_default(),
                border: borders.get(index(xf, "borderId")).cloned().unwrap_or_default(),
                number_format: number_format(index(xf, "numFmtId") as u32),
                alignment: doc
                    .first_element(xf, &S::alignment())
                    .map(|a| parse_alignment(doc, a))
                    .unwrap_or_default(),
            })
            .collect();

        let dxfs = section(doc, root, S::dxfs(), S::dxf())
            .into_iter()
            .map(|dxf| DifferentialFormat {
                font: doc.first_element(dxf, &S::font()).map(|n| {
                    let font = parse_font(doc, n);
                    FontFormatting {
                        italic: font.italic,
                        bold: font.bold,
                        height: font.height,
                        underline: font.underline,
                        strikethrough: font.strikethrough,
                        color: font.color,
                    }
                }),
                border: doc.first_element(dxf, &S::border()).map(|n| {
                    let border = parse_border(doc, n);
                    BorderFormatting {
                        left: border.left,
                        right: border.right,
                        top: border.top,
                        bottom: border.bottom,
                    }
                }),
                pattern: doc.first_element(dxf, &S::fill()).map(|n| {
                    let fill = parse_fill(doc, n);
                    PatternFormatting {
                        background: fill.background,
                        foreground: fill.foreground,
                        pattern: fill.pattern,
                    }
                }),
                number_format: doc.first_element(dxf, &S::numFmt()).map(|n| {
                    match doc.attribute_local(n, "formatCode") {
                        Some(code) => NumberFormat::Custom(code.to_string()),
                        None => number_format(
                            doc.attribute_local(n, "numFmtId")
                                .and_then(|v| v.parse().ok())
                                .unwrap_or(0),
                        ),
                    }
                }),
            })
            .collect();

        Self { cell_styles, dxfs }
    }
}

/// Items of a `<fonts>`-style container directly under the root.
fn section(doc: &XmlDocument, root: NodeId, container: XName, item: XName) -> Vec<NodeId> {
    doc.first_element(root, &container)
        .map(|c| doc.elements_by_name(c, &item).collect())
        .unwrap_or_default()
}

pub(crate) fn parse_color(doc: &XmlDocument, node: NodeId) -> Option<Color> {
    if let Some(rgb) = doc.attribute_local(node, "rgb").and_then(Rgb::parse_hex) {
        return Some(Color::Rgb(rgb));
    }
    if let Some(index) = doc.attribute_local(node, "theme").and_then(|v| v.parse().ok()) {
        let tint = doc
            .attribute_local(node, "tint")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0.0);
        return Some(Color::Theme { index, tint });
    }
    if let Some(index) = doc.attribute_local(node, "indexed").and_then(|v| v.parse().ok()) {
        return Some(Color::Indexed(index));
    }
    match doc.attribute_local(node, "auto") {
        Some("1" | "true") => Some(Color::Auto),
        _ => None,
    }
}

/// `<b/>` and `<b val="1"/>` are on, `<b val="0"/>` and absence are off.
fn flag(doc: &XmlDocument, parent: NodeId, name: XName) -> bool {
    doc.first_element(parent, &name)
        .is_some_and(|n| !matches!(doc.attribute_local(n, "val"), Some("0" | "false")))
}

fn parse_font(doc: &XmlDocument, node: NodeId) -> Font {
    let val = |name: XName| {
        doc.first_element(node, &name)
            .and_then(|n| doc.attribute_local(n, "val"))
    };
    Font {
        name: val(S::name()).map(|s| s.to_string()),
        height: val(S::sz())
            .and_then(|v| v.parse::<f64>().ok())
            .map(|points| (points * 20.0).round() as u32),
        bold: flag(doc, node, S::b()),
        italic: flag(doc, node, S::i()),
        underline: doc
            .first_element(node, &S::u())
            .map(|u| Underline::parse(doc.attribute_local(u, "val")))
            .unwrap_or_default(),
        strikethrough: flag(doc, node, S::strike()),
        color: doc.first_element(node, &S::color()).and_then(|c| parse_color(doc, c)),
    }
}

fn parse_fill(doc: &XmlDocument, node: NodeId) -> Fill {
    let Some(pattern) = doc.first_element(node, &S::patternFill()) else {
        return Fill::default();
    };
    Fill {
        pattern: doc
            .attribute_local(pattern, "patternType")
            .map(FillPattern::parse)
            .unwrap_or_default(),
        foreground: doc.first_element(pattern, &S::fgColor()).and_then(|c| parse_color(doc, c)),
        background: doc.first_element(pattern, &S::bgColor()).and_then(|c| parse_color(doc, c)),
    }
}

fn parse_edge(doc: &XmlDocument, border: NodeId, name: XName) -> BorderEdge {
    let Some(edge) = doc.first_element(border, &name) else {
        return BorderEdge::default();
    };
    BorderEdge {
        style: doc
            .attribute_local(edge, "style")
            .map(BorderStyle::parse)
            .unwrap_or_default(),
        color: doc.first_element(edge, &S::color()).and_then(|c| parse_color(doc, c)),
    }
}

fn parse_border(doc: &XmlDocument, node: NodeId) -> Border {
    Border {
        left: parse_edge(doc, node, S::left()),
        right: parse_edge(doc, node, S::right()),
        top: parse_edge(doc, node, S::top()),
        bottom: parse_edge(doc, node, S::bottom()),
    }
}

fn parse_alignment(doc: &XmlDocument, node: NodeId) -> Alignment {
    let number = |attr: &str| {
        doc.attribute_local(node, attr)
            .and_then(|v| v.parse().ok())
            .unwrap_or(0)
    };
    Alignment {
        horizontal: doc.attribute_local(node, "horizontal").map(|s| s.to_string()),
        vertical: doc.attribute_local(node, "vertical").map(|s| s.to_string()),
        wrap_text: matches!(doc.attribute_local(node, "wrapText"), Some("1" | "true")),
        indent: number("indent"),
        text_rotation: number("textRotation"),
    }
}

/// Collects the differential formats worksheets reference while they are
/// written, then emits the whole styles part.
#[derive(Debug, Default)]
pub(crate) struct StylesheetWriter {
    dxfs: Vec<DifferentialFormat>,
    dxf_ids: HashMap<DifferentialFormat, u32>,
}

/// Deduplicating table of one style component.
struct Table<T> {
    items: Vec<T>,
    ids: HashMap<T, usize>,
}

impl<T: Clone + Eq + std::hash::Hash> Table<T> {
    fn with(initial: Vec<T>) -> Self {
        let ids = initial.iter().cloned().enumerate().map(|(i, t)| (t, i)).collect();
        Self { items: initial, ids }
    }

    fn id(&mut self, item: &T) -> usize {
        if let Some(&id) = self.ids.get(item) {
            return id;
        }
        self.items.push(item.clone());
        self.ids.insert(item.clone(), self.items.len() - 1);
        self.items.len() - 1
    }
}

impl StylesheetWriter {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Index of `format` in the written `dxfs` table.
    pub(crate) fn register_dxf(&mut self, format: &DifferentialFormat) -> u32 {
        if let Some(&id) = self.dxf_ids.get(format) {
            return id;
        }
        let id = self.dxfs.len() as u32;
        self.dxfs.push(format.clone());
        self.dxf_ids.insert(format.clone(), id);
        id
    }

    pub(crate) fn to_document(&self, pool: &StylePool) -> XmlDocument {
        let mut number_formats: BTreeMap<String, u32> = BTreeMap::new();
        let mut format_id = |format: &NumberFormat| match format {
            NumberFormat::BuiltIn(id) => *id,
            NumberFormat::Custom(code) => {
                let next = FIRST_CUSTOM_NUM_FMT_ID + number_formats.len() as u32;
                *number_formats.entry(code.clone()).or_insert(next)
            }
        };

        let default_font = pool
            .iter()
            .next()
            .map(|(_, s)| s.font.clone())
            .unwrap_or_default();
        let mut fonts = Table::with(vec![default_font]);
        let mut fills = Table::with(vec![
            Fill::default(),
            Fill {
                pattern: FillPattern::Gray125,
                ..Fill::default()
            },
        ]);
        let mut borders = Table::with(vec![Border::default()]);

        let xfs: Vec<(u32, usize, usize, usize, &Alignment)> = pool
            .iter()
            .map(|(_, style)| {
                (
                    format_id(&style.number_format),
                    fonts.id(&style.font),
                    fills.id(&style.fill),
                    borders.id(&style.border),
                    &style.alignment,
                )
            })
            .collect();
        let dxf_formats: Vec<Option<u32>> = self
            .dxfs
            .iter()
            .map(|d| d.number_format.as_ref().map(&mut format_id))
            .collect();

        let mut doc = XmlDocument::new();
        let root = doc.add_root(XmlNodeData::element_with_attrs(
            S::styleSheet(),
            vec![XAttribute::local("xmlns", S::NS)],
        ));

        if !number_formats.is_empty() {
            let container = doc.add_element(root, S::numFmts(), vec![count(number_formats.len())]);
            let mut ordered: Vec<(&String, &u32)> = number_formats.iter().collect();
            ordered.sort_by_key(|(_, id)| **id);
            for (code, id) in ordered {
                doc.add_element(
                    container,
                    S::numFmt(),
                    vec![
                        XAttribute::local("numFmtId", &id.to_string()),
                        XAttribute::local("formatCode", code),
                    ],
                );
            }
        }

        let container = doc.add_element(root, S::fonts(), vec![count(fonts.items.len())]);
        for (i, font) in fonts.items.iter().enumerate() {
            write_font(&mut doc, container, font, i == 0);
        }

        let container = doc.add_element(root, S::fills(), vec![count(fills.items.len())]);
        for fill in &fills.items {
            let node = doc.add_element(container, S::fill(), Vec::new());
            write_pattern(&mut doc, node, fill.pattern, fill.foreground.as_ref(), fill.background.as_ref(), true);
        }

        let container = doc.add_element(root, S::borders(), vec![count(borders.items.len())]);
        for border in &borders.items {
            write_border(&mut doc, container, border);
        }

        let container = doc.add_element(root, S::cellStyleXfs(), vec![count(1)]);
        doc.add_element(container, S::xf(), xf_attrs(0, 0, 0, 0));

        let container = doc.add_element(root, S::cellXfs(), vec![count(xfs.len())]);
        for (num_fmt, font, fill, border, alignment) in xfs {
            let mut attrs = xf_attrs(num_fmt, font, fill, border);
            attrs.push(XAttribute::local("xfId", "0"));
            for (applies, name) in [
                (num_fmt != 0, "applyNumberFormat"),
                (font != 0, "applyFont"),
                (fill != 0, "applyFill"),
                (border != 0, "applyBorder"),
                (*alignment != Alignment::default(), "applyAlignment"),
            ] {
                if applies {
                    attrs.push(XAttribute::local(name, "1"));
                }
            }
            let xf = doc.add_element(container, S::xf(), attrs);
            if *alignment != Alignment::default() {
                write_alignment(&mut doc, xf, alignment);
            }
        }

        let container = doc.add_element(root, S::cellStyles(), vec![count(1)]);
        doc.add_element(
            container,
            S::cellStyle(),
            vec![
                XAttribute::local("name", "Normal"),
                XAttribute::local("xfId", "0"),
                XAttribute::local("builtinId", "0"),
            ],
        );

        let container = doc.add_element(root, S::dxfs(), vec![count(self.dxfs.len())]);
        for (dxf, num_fmt_id) in self.dxfs.iter().zip(dxf_formats) {
            write_dxf(&mut doc, container, dxf, num_fmt_id);
        }

        doc
    }
}

fn count(n: usize) -> XAttribute {
    XAttribute::local("count", &n.to_string())
}

fn xf_attrs(num_fmt: u32, font: usize, fill: usize, border: usize) -> Vec<XAttribute> {
    vec![
        XAttribute::local("numFmtId", &num_fmt.to_string()),
        XAttribute::local("fontId", &font.to_string()),
        XAttribute::local("fillId", &fill.to_string()),
        XAttribute::local("borderId", &border.to_string()),
    ]
}

fn color_attrs(color: &Color) -> Vec<XAttribute> {
    match color {
        Color::Rgb(rgb) => vec![XAttribute::local("rgb", &rgb.to_argb_hex())],
        Color::Theme { index, tint } => {
            let mut attrs = vec![XAttribute::local("theme", &index.to_string())];
            if *tint != 0.0 {
                attrs.push(XAttribute::local("tint", &tint.to_string()));
            }
            attrs
        }
        Color::Indexed(index) => vec![XAttribute::local("indexed", &index.to_string())],
        Color::Auto => vec![XAttribute::local("auto", "1")],
    }
}

fn write_color(doc: &mut XmlDocument, parent: NodeId, name: XName, color: Option<&Color>) {
    if let Some(color) = color {
        doc.add_element(parent, name, color_attrs(color));
    }
}

struct FontParts<'a> {
    bold: bool,
    italic: bool,
    strikethrough: bool,
    underline: Underline,
    height: Option<u32>,
    color: Option<&'a Color>,
    name: Option<&'a str>,
}

fn write_font_parts(doc: &mut XmlDocument, parent: NodeId, parts: FontParts<'_>) {
    let font = doc.add_element(parent, S::font(), Vec::new());
    for (on, name) in [
        (parts.bold, S::b()),
        (parts.italic, S::i()),
        (parts.strikethrough, S::strike()),
    ] {
        if on {
            doc.add_element(font, name, Vec::new());
        }
    }
    match parts.underline {
        Underline::None => {}
        Underline::Single => {
            doc.add_element(font, S::u(), Vec::new());
        }
        other => {
            doc.add_element(font, S::u(), vec![XAttribute::local("val", other.as_str())]);
        }
    }
    if let Some(height) = parts.height {
        let points = height as f64 / 20.0;
        doc.add_element(font, S::sz(), vec![XAttribute::local("val", &points.to_string())]);
    }
    write_color(doc, font, S::color(), parts.color);
    if let Some(name) = parts.name {
        doc.add_element(font, S::name(), vec![XAttribute::local("val", name)]);
    }
}

/// Writes a cell font. The first font is the workbook default and Excel
/// needs it to carry a size and a face.
fn write_font(doc: &mut XmlDocument, parent: NodeId, font: &Font, is_default: bool) {
    let (height, name) = if is_default {
        (
            font.height.or(Some(220)),
            font.name.as_deref().or(Some("Calibri")),
        )
    } else {
        (font.height, font.name.as_deref())
    };
    write_font_parts(
        doc,
        parent,
        FontParts {
            bold: font.bold,
            italic: font.italic,
            strikethrough: font.strikethrough,
            underline: font.underline,
            height,
            color: font.color.as_ref(),
            name,
        },
    );
}

fn write_pattern(
    doc: &mut XmlDocument,
    fill: NodeId,
    pattern: FillPattern,
    foreground: Option<&Color>,
    background: Option<&Color>,
    always_type: bool,
) {
    let attrs = if always_type || pattern != FillPattern::None {
        vec![XAttribute::local("patternType", pattern.as_str())]
    } else {
        Vec::new()
    };
    let node = doc.add_element(fill, S::patternFill(), attrs);
    write_color(doc, node, S::fgColor(), foreground);
    write_color(doc, node, S::bgColor(), background);
}

fn write_edge(doc: &mut XmlDocument, border: NodeId, name: XName, edge: &BorderEdge) {
    let attrs = if edge.style == BorderStyle::None {
        Vec::new()
    } else {
        vec![XAttribute::local("style", edge.style.as_str())]
    };
    let node = doc.add_element(border, name, attrs);
    write_color(doc, node, S::color(), edge.color.as_ref());
}

fn write_edges(doc: &mut XmlDocument, border: NodeId, edges: [&BorderEdge; 4]) {
    let [left, right, top, bottom] = edges;
    write_edge(doc, border, S::left(), left);
    write_edge(doc, border, S::right(), right);
    write_edge(doc, border, S::top(), top);
    write_edge(doc, border, S::bottom(), bottom);
}

fn write_border(doc: &mut XmlDocument, parent: NodeId, border: &Border) {
    let node = doc.add_element(parent, S::border(), Vec::new());
    write_edges(doc, node, [&border.left, &border.right, &border.top, &border.bottom]);
    doc.add_element(node, S::diagonal(), Vec::new());
}

fn write_alignment(doc: &mut XmlDocument, xf: NodeId, alignment: &Alignment) {
    let mut attrs = Vec::new();
    if let Some(h) = &alignment.horizontal {
        attrs.push(XAttribute::local("horizontal", h));
    }
    if let Some(v) = &alignment.vertical {
        attrs.push(XAttribute::local("vertical", v));
    }
    if alignment.text_rotation != 0 {
        attrs.push(XAttribute::local("textRotation", &alignment.text_rotation.to_string()));
    }
    if alignment.wrap_text {
        attrs.push(XAttribute::local("wrapText", "1"));
    }
    if alignment.indent != 0 {
        attrs.push(XAttribute::local("indent", &alignment.indent.to_string()));
    }
    doc.add_element(xf, S::alignment(), attrs);
}

/// `dxf` children must come in schema order: font, numFmt, fill, border.
fn write_dxf(doc: &mut XmlDocument, parent: NodeId, dxf: &DifferentialFormat, num_fmt_id: Option<u32>) {
    let node = doc.add_element(parent, S::dxf(), Vec::new());

    if let Some(font) = &dxf.font {
        write_font_parts(
            doc,
            node,
            FontParts {
                bold: font.bold,
                italic: font.italic,
                strikethrough: font.strikethrough,
                underline: font.underline,
                height: font.height,
                color: font.color.as_ref(),
                name: None,
            },
        );
    }
    if let (Some(format), Some(id)) = (&dxf.number_format, num_fmt_id) {
        let mut attrs = vec![XAttribute::local("numFmtId", &id.to_string())];
        if let NumberFormat::Custom(code) = format {
            attrs.push(XAttribute::local("formatCode", code));
        }
        doc.add_element(node, S::numFmt(), attrs);
    }
    if let Some(pattern) = &dxf.pattern {
        let fill = doc.add_element(node, S::fill(), Vec::new());
        write_pattern(
            doc,
            fill,
            pattern.pattern,
            pattern.foreground.as_ref(),
            pattern.background.as_ref(),
            false,
        );
    }
    if let Some(border) = &dxf.border {
        let node = doc.add_element(node, S::border(), Vec::new());
        write_edges(doc, node, [&border.left, &border.right, &border.top, &border.bottom]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::xml::builder::serialize;
    use crate::xml::parser::parse;

    fn bold_red() -> CellStyle {
        CellStyle {
            font: Font {
                name: Some("Arial".into()),
                height: Some(240),
                bold: true,
                color: Some(Color::rgb(0xFFFF0000)),
                ..Font::default()
            },
            fill: Fill {
                pattern: FillPattern::Solid,
                foreground: Some(Color::Theme { index: 4, tint: -0.25 }),
                background: None,
            },
            number_format: NumberFormat::Custom("0.000".into()),
            ..CellStyle::default()
        }
    }

    #[test]
    fn styles_survive_a_write_and_read() {
        let mut pool = StylePool::new();
        let id = pool.add(bold_red());
        pool.add(bold_red());

        let xml = serialize(&StylesheetWriter::new().to_document(&pool)).unwrap();
        let read = Stylesheet::parse(&parse(&xml).unwrap());

        assert_eq!(read.cell_styles.len(), 3);
        assert_eq!(read.cell_styles[id.index() as usize], bold_red());
        assert_eq!(read.cell_styles[2], bold_red());
    }

    #[test]
    fn component_tables_are_deduplicated() {
        let mut pool = StylePool::new();
        pool.add(bold_red());
        pool.add(bold_red());
        let xml = serialize(&StylesheetWriter::new().to_document(&pool)).unwrap();

        assert!(xml.contains(r#"<fonts count="2">"#));
        assert!(xml.contains(r#"<fills count="3">"#));
        assert!(xml.contains(r#"<numFmt numFmtId="164" formatCode="0.000"/>"#));
        assert!(xml.contains(r#"<cellXfs count="3">"#));
        assert!(xml.contains(r#"patternType="gray125""#));
    }

    #[test]
    fn dxfs_are_shared_and_ordered() {
        let format = DifferentialFormat {
            font: Some(FontFormatting {
                italic: true,
                ..FontFormatting::default()
            }),
            pattern: Some(PatternFormatting {
                background: Some(Color::rgb(0xFF00FF00)),
                ..PatternFormatting::default()
            }),
            number_format: Some(NumberFormat::Custom("0%".into())),
            ..DifferentialFormat::default()
        };
        let mut writer = StylesheetWriter::new();
        assert_eq!(writer.register_dxf(&format), 0);
        assert_eq!(writer.register_dxf(&DifferentialFormat::default()), 1);
        assert_eq!(writer.register_dxf(&format), 0);

        let xml = serialize(&writer.to_document(&StylePool::new())).unwrap();
        let dxf = &xml[xml.find("<dxf>").unwrap()..];
        let font = dxf.find("<font><i/></font>").unwrap();
        let num_fmt = dxf.find(r#"<numFmt numFmtId="164" formatCode="0%"/>"#).unwrap();
        let fill = dxf.find("<fill><patternFill><bgColor").unwrap();
        assert!(font < num_fmt && num_fmt < fill);
        assert!(xml.contains(r#"<dxfs count="2">"#));

        let read = Stylesheet::parse(&parse(&xml).unwrap());
        assert_eq!(read.dxfs, vec![format, DifferentialFormat::default()]);
    }

    #[test]
    fn builtin_and_custom_formats_are_told_apart() {
        let xml = format!(
            r#"<styleSheet xmlns="{}">
              <numFmts count="1"><numFmt numFmtId="170" formatCode="yyyy"/></numFmts>
              <fonts count="1"><font><sz val="11"/><name val="Calibri"/><b val="0"/></font></fonts>
              <cellXfs count="3"><xf numFmtId="0"/><xf numFmtId="14"/><xf numFmtId="170"/></cellXfs>
            </styleSheet>"#,
            S::NS
        );
        let read = Stylesheet::parse(&parse(&xml).unwrap());
        assert_eq!(read.cell_styles[1].number_format, NumberFormat::BuiltIn(14));
        assert_eq!(read.cell_styles[2].number_format, NumberFormat::Custom("yyyy".into()));
        assert!(!read.cell_styles[0].font.bold);
        assert_eq!(read.cell_styles[0].font.height, Some(220));
    }
}
