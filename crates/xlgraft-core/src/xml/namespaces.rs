#![allow(non_snake_case)]

use super::node::XName;

pub mod S {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";

    pub fn workbook() -> XName { XName::new(NS, "workbook") }
    pub fn sheets() -> XName { XName::new(NS, "sheets") }
    pub fn sheet() -> XName { XName::new(NS, "sheet") }
    pub fn calcPr() -> XName { XName::new(NS, "calcPr") }
    pub fn worksheet() -> XName { XName::new(NS, "worksheet") }
    pub fn sheetData() -> XName { XName::new(NS, "sheetData") }
    pub fn row() -> XName { XName::new(NS, "row") }
    pub fn c() -> XName { XName::new(NS, "c") }
    pub fn v() -> XName { XName::new(NS, "v") }
    pub fn f() -> XName { XName::new(NS, "f") }
    pub fn is() -> XName { XName::new(NS, "is") }
    pub fn t() -> XName { XName::new(NS, "t") }
    pub fn r() -> XName { XName::new(NS, "r") }
    pub fn sst() -> XName { XName::new(NS, "sst") }
    pub fn si() -> XName { XName::new(NS, "si") }
    pub fn rPh() -> XName { XName::new(NS, "rPh") }
    pub fn mergeCells() -> XName { XName::new(NS, "mergeCells") }
    pub fn mergeCell() -> XName { XName::new(NS, "mergeCell") }
    pub fn conditionalFormatting() -> XName { XName::new(NS, "conditionalFormatting") }
    pub fn cfRule() -> XName { XName::new(NS, "cfRule") }
    pub fn formula() -> XName { XName::new(NS, "formula") }
    pub fn hyperlinks() -> XName { XName::new(NS, "hyperlinks") }
    pub fn hyperlink() -> XName { XName::new(NS, "hyperlink") }
    pub fn drawing() -> XName { XName::new(NS, "drawing") }
    pub fn styleSheet() -> XName { XName::new(NS, "styleSheet") }
    pub fn numFmts() -> XName { XName::new(NS, "numFmts") }
    pub fn numFmt() -> XName { XName::new(NS, "numFmt") }
    pub fn fonts() -> XName { XName::new(NS, "fonts") }
    pub fn font() -> XName { XName::new(NS, "font") }
    pub fn b() -> XName { XName::new(NS, "b") }
    pub fn i() -> XName { XName::new(NS, "i") }
    pub fn u() -> XName { XName::new(NS, "u") }
    pub fn strike() -> XName { XName::new(NS, "strike") }
    pub fn sz() -> XName { XName::new(NS, "sz") }
    pub fn color() -> XName { XName::new(NS, "color") }
    pub fn name() -> XName { XName::new(NS, "name") }
    pub fn fills() -> XName { XName::new(NS, "fills") }
    pub fn fill() -> XName { XName::new(NS, "fill") }
    pub fn patternFill() -> XName { XName::new(NS, "patternFill") }
    pub fn fgColor() -> XName { XName::new(NS, "fgColor") }
    pub fn bgColor() -> XName { XName::new(NS, "bgColor") }
    pub fn borders() -> XName { XName::new(NS, "borders") }
    pub fn border() -> XName { XName::new(NS, "border") }
    pub fn left() -> XName { XName::new(NS, "left") }
    pub fn right() -> XName { XName::new(NS, "right") }
    pub fn top() -> XName { XName::new(NS, "top") }
    pub fn bottom() -> XName { XName::new(NS, "bottom") }
    pub fn diagonal() -> XName { XName::new(NS, "diagonal") }
    pub fn cellStyleXfs() -> XName { XName::new(NS, "cellStyleXfs") }
    pub fn cellXfs() -> XName { XName::new(NS, "cellXfs") }
    pub fn xf() -> XName { XName::new(NS, "xf") }
    pub fn alignment() -> XName { XName::new(NS, "alignment") }
    pub fn dxfs() -> XName { XName::new(NS, "dxfs") }
    pub fn dxf() -> XName { XName::new(NS, "dxf") }
    pub fn cellStyles() -> XName { XName::new(NS, "cellStyles") }
    pub fn cellStyle() -> XName { XName::new(NS, "cellStyle") }
}

/// Spreadsheet drawing (`xdr:`) vocabulary.
pub mod XDR {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/spreadsheetDrawing";

    pub fn wsDr() -> XName { XName::new(NS, "wsDr") }
    pub fn twoCellAnchor() -> XName { XName::new(NS, "twoCellAnchor") }
    pub fn oneCellAnchor() -> XName { XName::new(NS, "oneCellAnchor") }
    pub fn absoluteAnchor() -> XName { XName::new(NS, "absoluteAnchor") }
    pub fn from() -> XName { XName::new(NS, "from") }
    pub fn to() -> XName { XName::new(NS, "to") }
    pub fn col() -> XName { XName::new(NS, "col") }
    pub fn colOff() -> XName { XName::new(NS, "colOff") }
    pub fn row() -> XName { XName::new(NS, "row") }
    pub fn rowOff() -> XName { XName::new(NS, "rowOff") }
    pub fn ext() -> XName { XName::new(NS, "ext") }
    pub fn pos() -> XName { XName::new(NS, "pos") }
    pub fn sp() -> XName { XName::new(NS, "sp") }
    pub fn grpSp() -> XName { XName::new(NS, "grpSp") }
    pub fn pic() -> XName { XName::new(NS, "pic") }
    pub fn cxnSp() -> XName { XName::new(NS, "cxnSp") }
    pub fn graphicFrame() -> XName { XName::new(NS, "graphicFrame") }
    pub fn nvSpPr() -> XName { XName::new(NS, "nvSpPr") }
    pub fn nvGrpSpPr() -> XName { XName::new(NS, "nvGrpSpPr") }
    pub fn nvPicPr() -> XName { XName::new(NS, "nvPicPr") }
    pub fn cNvPr() -> XName { XName::new(NS, "cNvPr") }
    pub fn cNvPicPr() -> XName { XName::new(NS, "cNvPicPr") }
    pub fn blipFill() -> XName { XName::new(NS, "blipFill") }
    pub fn spPr() -> XName { XName::new(NS, "spPr") }
    pub fn txBody() -> XName { XName::new(NS, "txBody") }
    pub fn clientData() -> XName { XName::new(NS, "clientData") }
}

pub mod A {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/drawingml/2006/main";

    pub fn p() -> XName { XName::new(NS, "p") }
    pub fn r() -> XName { XName::new(NS, "r") }
    pub fn t() -> XName { XName::new(NS, "t") }
    pub fn blip() -> XName { XName::new(NS, "blip") }
    pub fn stretch() -> XName { XName::new(NS, "stretch") }
    pub fn fillRect() -> XName { XName::new(NS, "fillRect") }
    pub fn prstGeom() -> XName { XName::new(NS, "prstGeom") }
    pub fn avLst() -> XName { XName::new(NS, "avLst") }
    pub fn xfrm() -> XName { XName::new(NS, "xfrm") }
    pub fn off() -> XName { XName::new(NS, "off") }
    pub fn ext() -> XName { XName::new(NS, "ext") }
    pub fn picLocks() -> XName { XName::new(NS, "picLocks") }
    pub fn theme() -> XName { XName::new(NS, "theme") }
    pub fn themeElements() -> XName { XName::new(NS, "themeElements") }
    pub fn clrScheme() -> XName { XName::new(NS, "clrScheme") }
    pub fn srgbClr() -> XName { XName::new(NS, "srgbClr") }
    pub fn sysClr() -> XName { XName::new(NS, "sysClr") }
}

pub mod R {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

    pub fn id() -> XName { XName::new(NS, "id") }
    pub fn embed() -> XName { XName::new(NS, "embed") }
    pub fn link() -> XName { XName::new(NS, "link") }
}

/// Package relationship parts (`_rels/*.rels`).
pub mod PR {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/package/2006/relationships";

    pub fn Relationships() -> XName { XName::new(NS, "Relationships") }
    pub fn Relationship() -> XName { XName::new(NS, "Relationship") }
}

/// `[Content_Types].xml`.
pub mod CT {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/package/2006/content-types";

    pub fn Types() -> XName { XName::new(NS, "Types") }
    pub fn Default() -> XName { XName::new(NS, "Default") }
    pub fn Override() -> XName { XName::new(NS, "Override") }
}

pub mod MC {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/markup-compatibility/2006";

    pub fn Ignorable() -> XName { XName::new(NS, "Ignorable") }
    pub fn AlternateContent() -> XName { XName::new(NS, "AlternateContent") }
    pub fn Choice() -> XName { XName::new(NS, "Choice") }
    pub fn Fallback() -> XName { XName::new(NS, "Fallback") }
}

pub mod XMLNS {
    pub const NS: &str = "http://www.w3.org/2000/xmlns/";
}

pub mod CP {
    use super::XName;
    pub const NS: &str = "http://schemas.openxmlformats.org/package/2006/metadata/core-properties";

    pub fn coreProperties() -> XName { XName::new(NS, "coreProperties") }
}

pub mod DC {
    use super::XName;
    pub const NS: &str = "http://purl.org/dc/elements/1.1/";

    pub fn creator() -> XName { XName::new(NS, "creator") }
}

pub mod DCTERMS {
    use super::XName;
    pub const NS: &str = "http://purl.org/dc/terms/";

    pub fn created() -> XName { XName::new(NS, "created") }
    pub fn modified() -> XName { XName::new(NS, "modified") }
}

pub mod XSI {
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema-instance";
}
