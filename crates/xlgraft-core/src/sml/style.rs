//! Cell formatting descriptors and the per-workbook style pool.

use super::color::Color;
use serde::{Deserialize, Serialize};

/// Handle into a [`StylePool`]. Only meaningful for the pool that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct StyleId(pub(crate) u32);

impl StyleId {
    /// The pool's built-in default style (`cellXfs` index 0).
    pub const DEFAULT: StyleId = StyleId(0);

    pub fn index(self) -> u32 {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Underline {
    #[default]
    None,
    Single,
    Double,
    SingleAccounting,
    DoubleAccounting,
}

impl Underline {
    pub fn as_str(self) -> &'static str {
        match self {
            Underline::None => "none",
            Underline::Single => "single",
            Underline::Double => "double",
            Underline::SingleAccounting => "singleAccounting",
            Underline::DoubleAccounting => "doubleAccounting",
        }
    }

    /// `<u/>` without a value means single.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            None | Some("single") => Underline::Single,
            Some("double") => Underline::Double,
            Some("singleAccounting") => Underline::SingleAccounting,
            Some("doubleAccounting") => Underline::DoubleAccounting,
            Some(_) => Underline::None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum BorderStyle {
    #[default]
    None,
    Thin,
    Medium,
    Dashed,
    Dotted,
    Thick,
    Double,
    Hair,
    MediumDashed,
    DashDot,
    MediumDashDot,
    DashDotDot,
    MediumDashDotDot,
    SlantDashDot,
}

impl BorderStyle {
    pub fn as_str(self) -> &'static str {
        match self {
            BorderStyle::None => "none",
            BorderStyle::Thin => "thin",
            BorderStyle::Medium => "medium",
            BorderStyle::Dashed => "dashed",
            BorderStyle::Dotted => "dotted",
            BorderStyle::Thick => "thick",
            BorderStyle::Double => "double",
            BorderStyle::Hair => "hair",
            BorderStyle::MediumDashed => "mediumDashed",
            BorderStyle::DashDot => "dashDot",
            BorderStyle::MediumDashDot => "mediumDashDot",
            BorderStyle::DashDotDot => "dashDotDot",
            BorderStyle::MediumDashDotDot => "mediumDashDotDot",
            BorderStyle::SlantDashDot => "slantDashDot",
        }
    }

    pub fn parse(value: &str) -> Self {
        match value {
            "thin" => BorderStyle::Thin,
            "medium" => BorderStyle::Medium,
            "dashed" => BorderStyle::Dashed,
            "dotted" => BorderStyle::Dotted,
            "thick" => BorderStyle::Thick,
            "double" => BorderStyle::Double,
            "hair" => BorderStyle::Hair,
            "mediumDashed" => BorderStyle::MediumDashed,
            "dashDot" => BorderStyle::DashDot,
            "mediumDashDot" => BorderStyle::MediumDashDot,
            "dashDotDot" => BorderStyle::DashDotDot,
            "mediumDashDotDot" => BorderStyle::MediumDashDotDot,
            "slantDashDot" => BorderStyle::SlantDashDot,
            _ => BorderStyle::None,
        }
    }
}

/// `patternType` of a fill. `None` is the "no fill" value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum FillPattern {
    #[default]
    None,
    Solid,
    MediumGray,
    DarkGray,
    LightGray,
    DarkHorizontal,
    DarkVertical,
    DarkDown,
    DarkUp,
    DarkGrid,
    DarkTrellis,
    LightHorizontal,
    LightVertical,
    LightDown,
    LightUp,
    LightGrid,
    LightTrellis,
    Gray125,
    Gray0625,
}

impl FillPattern {
    const NAMES: [(FillPattern, &'static str); 19] = [
        (FillPattern::None, "none"),
        (FillPattern::Solid, "solid"),
        (FillPattern::MediumGray, "mediumGray"),
        (FillPattern::DarkGray, "darkGray"),
        (FillPattern::LightGray, "lightGray"),
        (FillPattern::DarkHorizontal, "darkHorizontal"),
        (FillPattern::DarkVertical, "darkVertical"),
        (FillPattern::DarkDown, "darkDown"),
        (FillPattern::DarkUp, "darkUp"),
        (FillPattern::DarkGrid, "darkGrid"),
        (FillPattern::DarkTrellis, "darkTrellis"),
        (FillPattern::LightHorizontal, "lightHorizontal"),
        (FillPattern::LightVertical, "lightVertical"),
        (FillPattern::LightDown, "lightDown"),
        (FillPattern::LightUp, "lightUp"),
        (FillPattern::LightGrid, "lightGrid"),
        (FillPattern::LightTrellis, "lightTrellis"),
        (FillPattern::Gray125, "gray125"),
        (FillPattern::Gray0625, "gray0625"),
    ];

    pub fn as_str(self) -> &'static str {
        Self::NAMES
            .iter()
            .find(|(p, _)| *p == self)
            .map(|(_, name)| *name)
            .unwrap_or("none")
    }

    pub fn parse(value: &str) -> Self {
        Self::NAMES
            .iter()
            .find(|(_, name)| *name == value)
            .map(|(p, _)| *p)
            .unwrap_or(FillPattern::None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Font {
    pub name: Option<String>,
    /// Height in twentieths of a point; `None` leaves the size unset.
    pub height: Option<u32>,
    pub bold: bool,
    pub italic: bool,
    pub underline: Underline,
    pub strikethrough: bool,
    pub color: Option<Color>,
}

impl Font {
    pub fn points(&self) -> Option<f64> {
        self.height.map(|h| h as f64 / 20.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Fill {
    pub pattern: FillPattern,
    pub foreground: Option<Color>,
    pub background: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BorderEdge {
    pub style: BorderStyle,
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Border {
    pub left: BorderEdge,
    pub right: BorderEdge,
    pub top: BorderEdge,
    pub bottom: BorderEdge,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Alignment {
    pub horizontal: Option<String>,
    pub vertical: Option<String>,
    pub wrap_text: bool,
    pub indent: u32,
    pub text_rotation: u32,
}

/// Number format. Built-in formats carry their id; custom ones carry the
/// format code and get an id (164+) when written.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NumberFormat {
    BuiltIn(u32),
    Custom(String),
}

impl Default for NumberFormat {
    fn default() -> Self {
        NumberFormat::BuiltIn(0)
    }
}

/// First id SpreadsheetML reserves for custom number formats.
pub const FIRST_CUSTOM_NUM_FMT_ID: u32 = 164;

/// A complete cell formatting descriptor.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct CellStyle {
    pub font: Font,
    pub fill: Fill,
    pub border: Border,
    pub number_format: NumberFormat,
    pub alignment: Alignment,
}

/// Styles owned by one workbook. Slot 0 is always the default style.
///
/// Styles are immutable once added; two slots may hold equal values.
#[derive(Debug, Clone, PartialEq)]
pub struct StylePool {
    styles: Vec<CellStyle>,
}

impl StylePool {
    pub fn new() -> Self {
        Self {
            styles: vec![CellStyle::default()],
        }
    }

    /// Appends a new style slot, even if an equal style already exists.
    pub fn add(&mut self, style: CellStyle) -> StyleId {
        self.styles.push(style);
        StyleId(self.styles.len() as u32 - 1)
    }

    /// Replaces the default style (used by the reader for `cellXfs[0]`).
    pub fn set_default(&mut self, style: CellStyle) {
        self.styles[0] = style;
    }

    pub fn get(&self, id: StyleId) -> Option<&CellStyle> {
        self.styles.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.styles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.styles.is_empty()
    }

    pub fn contains(&self, id: StyleId) -> bool {
        (id.0 as usize) < self.styles.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (StyleId, &CellStyle)> {
        self.styles
            .iter()
            .enumerate()
            .map(|(i, s)| (StyleId(i as u32), s))
    }
}

impl Default for StylePool {
    fn default() -> Self {
        Self::new()
    }
}
