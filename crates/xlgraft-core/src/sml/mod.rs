pub mod cell;
pub mod color;
pub mod conditional;
pub mod copy;
pub mod drawing;
pub mod reference;
pub mod settings;
pub mod sheet;
pub mod style;
pub mod workbook;

mod reader;
mod shared_strings;
mod stylesheet;
mod writer;

pub use cell::{Cell, CellValue, ErrorCode, Hyperlink, HyperlinkType, Row};
pub use color::{resolve_color, Color, Rgb, Theme};
pub use conditional::{
    BorderFormatting, CfRule, Condition, ConditionalFormatting, DifferentialFormat, FontFormatting,
    PatternFormatting, SheetConditionalFormatting,
};
pub use copy::{copy_sheet_into, copy_workbook, CopyOutcome, CopyReport, SkipKind, Skipped, StyleRegistry};
pub use drawing::{
    Anchor, AnchorContent, AnchorSnapshot, ClientAnchor, Drawing, PictureInfo, PictureType, Placement,
    ShapeInfo, EMU_PER_PIXEL,
};
pub use reference::{CellRange, CellRef};
pub use settings::{CopySettings, StyleIdentity};
pub use sheet::Worksheet;
pub use style::{CellStyle, StyleId, StylePool};
pub use workbook::Workbook;
