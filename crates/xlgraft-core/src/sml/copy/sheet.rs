use super::cell::{copy_cell, CellCopyContext};
use super::conditional::ConditionalCopy;
use super::report::{CopyReport, SkipKind};
use super::style_registry::StyleRegistry;
use crate::error::Result;
use crate::package::relationships::relationship_types;
use crate::sml::cell::Row;
use crate::sml::drawing::Drawing;
use crate::sml::settings::CopySettings;
use crate::sml::sheet::Worksheet;
use crate::sml::style::StyleId;
use crate::sml::workbook::{free_media_part, Workbook};
use std::collections::HashMap;

/// Copies sheets out of one source workbook.
///
/// The style registry and the media map live as long as the copier, so
/// every sheet copied through one copier shares destination styles and
/// media parts.
pub(crate) struct SheetCopier<'a> {
    source: &'a Workbook,
    settings: &'a CopySettings,
    registry: StyleRegistry,
    media: HashMap<String, String>,
}

impl<'a> SheetCopier<'a> {
    pub fn new(source: &'a Workbook, settings: &'a CopySettings) -> Self {
        Self {
            source,
            settings,
            registry: StyleRegistry::new(settings.style_identity),
            media: HashMap::new(),
        }
    }

    /// Builds a copy of `sheet` named `name`. Styles and media it needs are
    /// added to `destination`; the sheet itself is not.
    pub fn copy_sheet(
        &mut self,
        sheet: &Worksheet,
        name: &str,
        destination: &mut Workbook,
        report: &mut CopyReport,
    ) -> Result<Worksheet> {
        log::debug!("copying sheet '{}' as '{}'", sheet.name(), name);
        let created_before = self.registry.created();
        let mut copy = Worksheet::new(name);

        // Unstyled cells render with the workbook default, which may differ
        // between the two workbooks.
        let source_default = self.source.styles.get(StyleId::DEFAULT);
        let unstyled = (source_default != destination.styles.get(StyleId::DEFAULT)).then_some(StyleId::DEFAULT);
        let context = CellCopyContext {
            sheet: sheet.name(),
            source_styles: &self.source.styles,
            unstyled,
            settings: self.settings,
        };
        for (&index, row) in &sheet.rows {
            let mut target = Row::new();
            target.height = row.height;
            for (&col, cell) in &row.cells {
                let cell = copy_cell(cell, &context, &mut self.registry, &mut destination.styles, report);
                target.set_cell(col, cell);
            }
            copy.rows.insert(index, target);
            report.rows += 1;
        }

        if self.settings.copy_merged_regions {
            for region in &sheet.merged_regions {
                copy.add_merged_region(*region);
            }
            report.merged_regions += sheet.merged_regions.len();
        }

        if self.settings.copy_conditional_formatting {
            ConditionalCopy {
                sheet: sheet.name(),
                theme: &self.source.theme,
                settings: self.settings,
            }
            .copy_into(&sheet.conditional_formatting, &mut copy.conditional_formatting, report);
        }

        if self.settings.copy_drawings {
            if let Some(drawing) = &sheet.drawing {
                copy.drawing = Some(self.copy_drawing(sheet.name(), drawing, destination, report)?);
            }
        }

        report.styles_created += self.registry.created() - created_before;
        report.sheets += 1;
        self.settings.log(&format!(
            "copied sheet '{}' as '{}' ({} cells)",
            sheet.name(),
            name,
            copy.cell_count()
        ));
        Ok(copy)
    }

    /// Rebuilds `drawing` from snapshots and points its picture
    /// relationships at media parts in `destination`.
    fn copy_drawing(
        &mut self,
        sheet: &str,
        drawing: &Drawing,
        destination: &mut Workbook,
        report: &mut CopyReport,
    ) -> Result<Drawing> {
        let mut copy = drawing.duplicate()?;

        for rel in copy
            .relationships
            .iter_mut()
            .filter(|r| r.rel_type == relationship_types::IMAGE && !r.is_external())
        {
            if let Some(part) = self.media.get(&rel.target) {
                rel.target = part.clone();
                continue;
            }
            let Some(bytes) = self.source.media.get(&rel.target) else {
                report.skip(
                    self.settings,
                    sheet,
                    SkipKind::MissingMedia,
                    format!("{} ({})", rel.target, rel.id),
                );
                continue;
            };

            let extension = rel
                .target
                .rsplit_once('.')
                .map(|(_, ext)| ext.to_ascii_lowercase())
                .unwrap_or_else(|| "bin".to_string());
            let part = free_media_part(&destination.media, &extension);
            destination.media.insert(part.clone(), bytes.clone());
            self.media.insert(rel.target.clone(), part.clone());
            report.media += 1;
            rel.target = part;
        }

        report.anchors += copy.len();
        Ok(copy)
    }
}
