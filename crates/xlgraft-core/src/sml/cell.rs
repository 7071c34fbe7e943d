use super::style::StyleId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCode {
    Null,
    Div0,
    Value,
    Ref,
    Name,
    Num,
    NA,
    GettingData,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            ErrorCode::Null => "#NULL!",
            ErrorCode::Div0 => "#DIV/0!",
            ErrorCode::Value => "#VALUE!",
            ErrorCode::Ref => "#REF!",
            ErrorCode::Name => "#NAME?",
            ErrorCode::Num => "#NUM!",
            ErrorCode::NA => "#N/A",
            ErrorCode::GettingData => "#GETTING_DATA",
        }
    }

    pub fn parse(text: &str) -> Option<Self> {
        let code = match text {
            "#NULL!" => ErrorCode::Null,
            "#DIV/0!" => ErrorCode::Div0,
            "#VALUE!" => ErrorCode::Value,
            "#REF!" => ErrorCode::Ref,
            "#NAME?" => ErrorCode::Name,
            "#NUM!" => ErrorCode::Num,
            "#N/A" => ErrorCode::NA,
            "#GETTING_DATA" => ErrorCode::GettingData,
            _ => return None,
        };
        Some(code)
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Value of a present cell.
///
/// `Empty` is a cell that exists (usually to carry a style) but holds
/// nothing; an absent cell is simply not in its row.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub enum CellValue {
    #[default]
    Empty,
    String(String),
    Number(f64),
    Boolean(bool),
    /// Formula text without the leading `=`. Never evaluated here.
    Formula(String),
    Error(ErrorCode),
}

impl CellValue {
    pub fn kind(&self) -> &'static str {
        match self {
            CellValue::Empty => "empty",
            CellValue::String(_) => "string",
            CellValue::Number(_) => "number",
            CellValue::Boolean(_) => "boolean",
            CellValue::Formula(_) => "formula",
            CellValue::Error(_) => "error",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HyperlinkType {
    Url,
    /// A location inside the workbook (`Sheet2!A1`).
    Document,
    Email,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hyperlink {
    pub kind: HyperlinkType,
    pub address: String,
    pub label: Option<String>,
}

impl Hyperlink {
    pub fn new(kind: HyperlinkType, address: &str) -> Self {
        Self {
            kind,
            address: address.to_string(),
            label: None,
        }
    }

    pub fn with_label(mut self, label: &str) -> Self {
        self.label = Some(label.to_string());
        self
    }

    /// Infers the link type from a stored address.
    pub fn classify(address: &str, is_location: bool) -> HyperlinkType {
        let lower = address.to_ascii_lowercase();
        if is_location {
            HyperlinkType::Document
        } else if lower.starts_with("mailto:") {
            HyperlinkType::Email
        } else if ["http://", "https://", "ftp://"]
            .iter()
            .any(|scheme| lower.starts_with(scheme))
        {
            HyperlinkType::Url
        } else {
            HyperlinkType::File
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Cell {
    pub value: CellValue,
    /// `None` means the workbook default style.
    pub style: Option<StyleId>,
    pub hyperlink: Option<Hyperlink>,
}

impl Cell {
    pub fn new(value: CellValue) -> Self {
        Self {
            value,
            ..Self::default()
        }
    }

    pub fn with_style(mut self, style: StyleId) -> Self {
        self.style = Some(style);
        self
    }
}

/// Sparse row; keys are 0-based column indices.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub cells: BTreeMap<u32, Cell>,
    /// Custom height in points.
    pub height: Option<f64>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn first_cell_num(&self) -> Option<u32> {
        self.cells.keys().next().copied()
    }

    pub fn last_cell_num(&self) -> Option<u32> {
        self.cells.keys().next_back().copied()
    }

    pub fn cell(&self, col: u32) -> Option<&Cell> {
        self.cells.get(&col)
    }

    pub fn cell_mut(&mut self, col: u32) -> Option<&mut Cell> {
        self.cells.get_mut(&col)
    }

    /// Returns the cell at `col`, creating an empty one if needed.
    pub fn create_cell(&mut self, col: u32) -> &mut Cell {
        self.cells.entry(col).or_default()
    }

    pub fn set_cell(&mut self, col: u32, cell: Cell) {
        self.cells.insert(col, cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_codes_round_trip() {
        for code in [
            ErrorCode::Null,
            ErrorCode::Div0,
            ErrorCode::Value,
            ErrorCode::Ref,
            ErrorCode::Name,
            ErrorCode::Num,
            ErrorCode::NA,
            ErrorCode::GettingData,
        ] {
            assert_eq!(ErrorCode::parse(code.as_str()), Some(code));
        }
        assert_eq!(ErrorCode::parse("#BOGUS"), None);
    }

    #[test]
    fn hyperlink_classification() {
        assert_eq!(Hyperlink::classify("Sheet2!A1", true), HyperlinkType::Document);
        assert_eq!(Hyperlink::classify("mailto:x@y.z", false), HyperlinkType::Email);
        assert_eq!(Hyperlink::classify("HTTPS://example.com", false), HyperlinkType::Url);
        assert_eq!(Hyperlink::classify("report.xlsx", false), HyperlinkType::File);
    }

    #[test]
    fn row_bounds_follow_present_cells() {
        let mut row = Row::new();
        assert_eq!(row.first_cell_num(), None);

        row.create_cell(4).value = CellValue::Number(1.0);
        row.set_cell(1, Cell::new(CellValue::Boolean(true)));

        assert_eq!(row.first_cell_num(), Some(1));
        assert_eq!(row.last_cell_num(), Some(4));
        assert!(row.cell(2).is_none());
    }
}
