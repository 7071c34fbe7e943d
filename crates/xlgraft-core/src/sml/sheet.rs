use super::cell::{Cell, Row};
use super::conditional::SheetConditionalFormatting;
use super::drawing::Drawing;
use super::reference::CellRange;
use crate::error::Result;
use std::collections::BTreeMap;

/// One worksheet. Rows and columns are 0-based and sparse.
#[derive(Debug, Default)]
pub struct Worksheet {
    pub name: String,
    pub rows: BTreeMap<u32, Row>,
    pub merged_regions: Vec<CellRange>,
    pub conditional_formatting: SheetConditionalFormatting,
    pub drawing: Option<Drawing>,
}

impl Worksheet {
    pub(crate) fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            ..Self::default()
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn first_row_num(&self) -> Option<u32> {
        self.rows.keys().next().copied()
    }

    pub fn last_row_num(&self) -> Option<u32> {
        self.rows.keys().next_back().copied()
    }

    pub fn row(&self, index: u32) -> Option<&Row> {
        self.rows.get(&index)
    }

    pub fn row_mut(&mut self, index: u32) -> Option<&mut Row> {
        self.rows.get_mut(&index)
    }

    /// Returns the row at `index`, creating an empty one if needed.
    pub fn create_row(&mut self, index: u32) -> &mut Row {
        self.rows.entry(index).or_default()
    }

    pub fn cell(&self, row: u32, col: u32) -> Option<&Cell> {
        self.row(row)?.cell(col)
    }

    pub fn cell_mut(&mut self, row: u32, col: u32) -> Option<&mut Cell> {
        self.row_mut(row)?.cell_mut(col)
    }

    /// Number of present cells across all rows.
    pub fn cell_count(&self) -> usize {
        self.rows.values().map(|r| r.cells.len()).sum()
    }

    /// Adds a merged region and returns its index.
    pub fn add_merged_region(&mut self, range: CellRange) -> usize {
        self.merged_regions.push(range);
        self.merged_regions.len() - 1
    }

    pub fn drawing(&self) -> Option<&Drawing> {
        self.drawing.as_ref()
    }

    pub fn drawing_mut(&mut self) -> Option<&mut Drawing> {
        self.drawing.as_mut()
    }

    /// The sheet's drawing, created empty if the sheet has none.
    pub fn create_drawing(&mut self) -> &mut Drawing {
        self.drawing.get_or_insert_with(Drawing::new)
    }

    /// Same content under a new name. The drawing is rebuilt from
    /// snapshots so no tree node is shared with `self`.
    pub(crate) fn duplicate(&self, name: &str) -> Result<Worksheet> {
        Ok(Worksheet {
            name: name.to_string(),
            rows: self.rows.clone(),
            merged_regions: self.merged_regions.clone(),
            conditional_formatting: self.conditional_formatting.clone(),
            drawing: self.drawing.as_ref().map(Drawing::duplicate).transpose()?,
        })
    }
}
