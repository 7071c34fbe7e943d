#![allow(dead_code)]

pub mod validator;

pub use validator::{assert_valid, validate_xlsx, ValidationResult};

use xlgraft_core::sml::{
    BorderFormatting, CellRange, CellStyle, CfRule, ClientAnchor, Color, Condition, DifferentialFormat,
    FontFormatting, Hyperlink, HyperlinkType, PatternFormatting, PictureType, Theme,
};
use xlgraft_core::sml::style::{BorderEdge, BorderStyle, Fill, FillPattern, Font};
use xlgraft_core::{Workbook, Worksheet};

/// Smallest valid PNG: one transparent pixel.
pub const PIXEL_PNG: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44, 0x52,
    0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F, 0x15, 0xC4,
    0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00, 0x01, 0x00, 0x00,
    0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49, 0x45, 0x4E, 0x44, 0xAE,
    0x42, 0x60, 0x82,
];

pub fn range(text: &str) -> CellRange {
    CellRange::parse(text).unwrap()
}

pub fn bold_red() -> CellStyle {
    CellStyle {
        font: Font {
            bold: true,
            color: Some(Color::rgb(0xFFFF0000)),
            ..Font::default()
        },
        fill: Fill {
            pattern: FillPattern::Solid,
            foreground: Some(Color::theme(4)),
            background: None,
        },
        border: xlgraft_core::sml::style::Border {
            bottom: BorderEdge {
                style: BorderStyle::Thin,
                color: None,
            },
            ..Default::default()
        },
        ..CellStyle::default()
    }
}

/// A two-sheet workbook with every feature the copy engine carries.
pub fn sample_workbook() -> Workbook {
    let mut workbook = Workbook::new();
    workbook.theme = Theme::office();
    let style = workbook.styles.add(bold_red());
    let part = workbook.add_picture(PIXEL_PNG.to_vec(), PictureType::Png);

    let data = workbook.create_sheet("Data").unwrap();
    fill_data(data, style);
    let drawing = data.create_drawing();
    *drawing = shapes_drawing();
    drawing
        .create_picture(ClientAnchor::cells(10, 1, 12, 4), &part)
        .unwrap();

    let notes = workbook.create_sheet("Notes").unwrap();
    let cell = notes.create_row(0).create_cell(0);
    cell.value = xlgraft_core::sml::CellValue::String("see data".into());
    cell.hyperlink = Some(Hyperlink::new(HyperlinkType::Document, "Data!A1").with_label("see data"));
    let cell = notes.create_row(1).create_cell(0);
    cell.value = xlgraft_core::sml::CellValue::String("site".into());
    cell.hyperlink = Some(Hyperlink::new(HyperlinkType::Url, "https://example.com/"));

    workbook
}

fn fill_data(sheet: &mut Worksheet, style: xlgraft_core::sml::StyleId) {
    use xlgraft_core::sml::{Cell, CellValue, ErrorCode};

    let header = sheet.create_row(0);
    header.set_cell(0, Cell::new(CellValue::String("Item".into())).with_style(style));
    header.set_cell(1, Cell::new(CellValue::String("Qty".into())).with_style(style));
    header.set_cell(2, Cell::new(CellValue::String(" padded ".into())));

    for row in 1..=5u32 {
        let r = sheet.create_row(row);
        r.set_cell(0, Cell::new(CellValue::String(format!("item {}", row))));
        r.set_cell(1, Cell::new(CellValue::Number(row as f64 * 1.5)));
    }
    sheet.create_row(6).set_cell(1, Cell::new(CellValue::Formula("SUM(B2:B6)".into())));
    sheet.create_row(8).set_cell(3, Cell::new(CellValue::Boolean(true)));
    sheet.create_row(9).set_cell(3, Cell::new(CellValue::Error(ErrorCode::Div0)));
    sheet.create_row(10).set_cell(0, Cell::new(CellValue::Empty).with_style(style));
    sheet.create_row(10).height = Some(24.0);

    sheet.add_merged_region(range("A8:C8"));

    let cf = &mut sheet.conditional_formatting;
    let mut high = CfRule::formula("$B2>6").with_priority(3);
    high.format = DifferentialFormat {
        font: Some(FontFormatting {
            bold: true,
            color: Some(Color::theme(5)),
            ..FontFormatting::default()
        }),
        pattern: Some(PatternFormatting {
            background: Some(Color::rgb(0xFFFFFF00)),
            foreground: None,
            pattern: FillPattern::Solid,
        }),
        ..DifferentialFormat::default()
    };
    let mut low = CfRule::formula("$B2<3").with_priority(1);
    low.format.border = Some(BorderFormatting {
        top: BorderEdge {
            style: BorderStyle::Thick,
            color: Some(Color::theme(99)),
        },
        ..BorderFormatting::default()
    });
    cf.push(xlgraft_core::sml::ConditionalFormatting {
        ranges: vec![range("B2:B6")],
        rules: vec![high, low],
    });
    cf.push(xlgraft_core::sml::ConditionalFormatting {
        ranges: vec![range("A2:A6"), range("D2")],
        rules: vec![
            CfRule::formula("LEN($A2)>5").with_priority(2),
            CfRule {
                priority: 4,
                condition: Condition::CellIs {
                    operator: "greaterThan".into(),
                    formulas: vec!["10".into()],
                },
                stop_if_true: false,
                format: DifferentialFormat::default(),
            },
        ],
    });
}

pub const SHAPES_XML: &str = r#"<xdr:wsDr xmlns:xdr="http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing" xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">
  <xdr:twoCellAnchor>
    <xdr:from><xdr:col>0</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>12</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>
    <xdr:to><xdr:col>2</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>16</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to>
    <xdr:sp>
      <xdr:nvSpPr><xdr:cNvPr id="2" name="A"/><xdr:cNvSpPr/></xdr:nvSpPr>
      <xdr:spPr><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></xdr:spPr>
      <xdr:txBody><a:bodyPr/><a:p><a:r><a:t>Total: 10</a:t></a:r><a:r><a:t> of 10</a:t></a:r></a:p></xdr:txBody>
    </xdr:sp>
    <xdr:clientData/>
  </xdr:twoCellAnchor>
  <xdr:twoCellAnchor>
    <xdr:from><xdr:col>3</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>12</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>
    <xdr:to><xdr:col>5</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>16</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to>
    <xdr:sp>
      <xdr:nvSpPr><xdr:cNvPr id="3" name="B"/><xdr:cNvSpPr/></xdr:nvSpPr>
      <xdr:spPr><a:prstGeom prst="ellipse"><a:avLst/></a:prstGeom></xdr:spPr>
      <xdr:txBody><a:bodyPr/><a:p><a:r><a:t>Total: 20</a:t></a:r></a:p></xdr:txBody>
    </xdr:sp>
    <xdr:clientData/>
  </xdr:twoCellAnchor>
  <xdr:oneCellAnchor>
    <xdr:from><xdr:col>8</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>0</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>
    <xdr:ext cx="952500" cy="476250"/>
    <xdr:sp>
      <xdr:nvSpPr><xdr:cNvPr id="4" name="Pinned"/><xdr:cNvSpPr/></xdr:nvSpPr>
      <xdr:spPr/>
    </xdr:sp>
    <xdr:clientData/>
  </xdr:oneCellAnchor>
  <xdr:twoCellAnchor>
    <xdr:from><xdr:col>6</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>12</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:from>
    <xdr:to><xdr:col>8</xdr:col><xdr:colOff>0</xdr:colOff><xdr:row>16</xdr:row><xdr:rowOff>0</xdr:rowOff></xdr:to>
    <xdr:grpSp>
      <xdr:nvGrpSpPr><xdr:cNvPr id="5" name="C"/><xdr:cNvGrpSpPr/></xdr:nvGrpSpPr>
      <xdr:grpSpPr/>
      <xdr:sp>
        <xdr:nvSpPr><xdr:cNvPr id="6" name="C-inner"/><xdr:cNvSpPr/></xdr:nvSpPr>
        <xdr:spPr/>
        <xdr:txBody><a:bodyPr/><a:p><a:r><a:t>Total: 30</a:t></a:r></a:p></xdr:txBody>
      </xdr:sp>
    </xdr:grpSp>
    <xdr:clientData/>
  </xdr:twoCellAnchor>
</xdr:wsDr>"#;

/// Shapes A and B (two-cell, with text), a one-cell "Pinned" shape and a
/// two-cell group C, in that stacking order.
pub fn shapes_drawing() -> xlgraft_core::Drawing {
    let tree = xlgraft_core::xml::parser::parse(SHAPES_XML).unwrap();
    xlgraft_core::Drawing::from_tree(tree, Vec::new()).unwrap()
}
