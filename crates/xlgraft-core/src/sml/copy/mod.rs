//! Structural copy of sheets between workbooks.
//!
//! Cells, styles, hyperlinks, merged regions, formula-based conditional
//! formatting and drawings are rebuilt on the destination side. Nothing in
//! the result refers back to the source workbook.

mod cell;
mod conditional;
mod report;
mod sheet;
mod style_registry;

pub use report::{CopyReport, SkipKind, Skipped};
pub use style_registry::StyleRegistry;

use crate::error::{GraftError, Result};
use crate::sml::settings::CopySettings;
use crate::sml::style::StyleId;
use crate::sml::workbook::{validate_sheet_name, Workbook};
use sheet::SheetCopier;

/// A copied workbook together with what the copy did.
#[derive(Debug)]
pub struct CopyOutcome {
    pub workbook: Workbook,
    pub report: CopyReport,
}

/// Copies every sheet of `source` into a new workbook, keeping sheet names
/// and order.
///
/// The destination starts with the source theme and default style. One
/// style registry spans all sheets.
pub fn copy_workbook(source: &Workbook, settings: &CopySettings) -> Result<CopyOutcome> {
    log::info!("copying workbook with {} sheet(s)", source.sheet_count());

    let mut workbook = Workbook::new();
    workbook.theme = source.theme.clone();
    if let Some(default) = source.styles.get(StyleId::DEFAULT) {
        workbook.styles.set_default(default.clone());
    }

    let mut report = CopyReport::new();
    let mut copier = SheetCopier::new(source, settings);
    for sheet in source.sheets() {
        let copy = copier.copy_sheet(sheet, sheet.name(), &mut workbook, &mut report)?;
        workbook.push_sheet(copy)?;
    }

    log::info!(
        "workbook copy done: {} cells, {} styles created, {} item(s) skipped",
        report.cells,
        report.styles_created,
        report.skipped.len()
    );
    Ok(CopyOutcome { workbook, report })
}

/// Copies the sheet at `sheet_index` of `source` into `destination` as a
/// new last sheet called `name`.
///
/// The name is checked before anything is added to `destination`.
pub fn copy_sheet_into(
    source: &Workbook,
    sheet_index: usize,
    destination: &mut Workbook,
    name: &str,
    settings: &CopySettings,
) -> Result<CopyReport> {
    let sheet = source.sheet_at(sheet_index).ok_or_else(|| GraftError::SheetNotFound {
        name: format!("#{}", sheet_index),
    })?;
    validate_sheet_name(name)?;
    if destination.sheet_index(name).is_some() {
        return Err(GraftError::DuplicateSheetName {
            name: name.to_string(),
        });
    }

    let mut report = CopyReport::new();
    let copy = SheetCopier::new(source, settings).copy_sheet(sheet, name, destination, &mut report)?;
    destination.push_sheet(copy)?;
    Ok(report)
}
