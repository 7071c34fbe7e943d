use super::report::{CopyReport, SkipKind};
use super::style_registry::StyleRegistry;
use crate::sml::cell::Cell;
use crate::sml::settings::CopySettings;
use crate::sml::style::{StyleId, StylePool};

/// Source-side inputs shared by every cell of a sheet copy.
pub(crate) struct CellCopyContext<'a> {
    pub sheet: &'a str,
    pub source_styles: &'a StylePool,
    /// Source style to give cells that have none.
    pub unstyled: Option<StyleId>,
    pub settings: &'a CopySettings,
}

/// Copies value, style and hyperlink. Formulas are copied as text and never
/// evaluated; an `Empty` source yields a present, empty cell.
pub(crate) fn copy_cell(
    source: &Cell,
    context: &CellCopyContext<'_>,
    registry: &mut StyleRegistry,
    destination_styles: &mut StylePool,
    report: &mut CopyReport,
) -> Cell {
    let style = registry.resolve(
        source.style.or(context.unstyled),
        context.source_styles,
        destination_styles,
    );
    if let (Some(id), None) = (source.style, style) {
        report.skip(
            context.settings,
            context.sheet,
            SkipKind::MissingStyle,
            format!("style #{} is not in the source pool", id.index()),
        );
    }

    let hyperlink = if context.settings.copy_hyperlinks {
        source.hyperlink.clone()
    } else {
        None
    };
    if hyperlink.is_some() {
        report.hyperlinks += 1;
    }

    report.cells += 1;
    Cell {
        value: source.value.clone(),
        style,
        hyperlink,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sml::cell::{CellValue, ErrorCode, Hyperlink, HyperlinkType};
    use crate::sml::settings::StyleIdentity;
    use crate::sml::style::CellStyle;

    fn copy_with(source: &Cell, settings: &CopySettings, pool: &StylePool) -> (Cell, CopyReport) {
        let context = CellCopyContext {
            sheet: "S",
            source_styles: pool,
            unstyled: None,
            settings,
        };
        let mut registry = StyleRegistry::new(StyleIdentity::Reference);
        let mut destination = StylePool::new();
        let mut report = CopyReport::new();
        let cell = copy_cell(source, &context, &mut registry, &mut destination, &mut report);
        (cell, report)
    }

    #[test]
    fn every_value_kind_is_copied() {
        let settings = CopySettings::new();
        let pool = StylePool::new();
        for value in [
            CellValue::Empty,
            CellValue::String("text".into()),
            CellValue::Number(-2.5),
            CellValue::Boolean(true),
            CellValue::Formula("SUM(A1:A3)".into()),
            CellValue::Error(ErrorCode::Div0),
        ] {
            let (copy, _) = copy_with(&Cell::new(value.clone()), &settings, &pool);
            assert_eq!(copy.value, value);
            assert_eq!(copy.style, None);
        }
    }

    #[test]
    fn hyperlinks_follow_settings() {
        let pool = StylePool::new();
        let mut source = Cell::new(CellValue::String("site".into()));
        source.hyperlink = Some(Hyperlink::new(HyperlinkType::Url, "https://example.com").with_label("site"));

        let (copy, report) = copy_with(&source, &CopySettings::new(), &pool);
        assert_eq!(copy.hyperlink, source.hyperlink);
        assert_eq!(report.hyperlinks, 1);

        let (copy, _) = copy_with(&source, &CopySettings::new().with_hyperlinks(false), &pool);
        assert_eq!(copy.hyperlink, None);
    }

    #[test]
    fn unknown_style_is_reported() {
        let mut pool = StylePool::new();
        pool.add(CellStyle::default());
        let source = Cell::new(CellValue::Number(1.0)).with_style(StyleId(7));

        let (copy, report) = copy_with(&source, &CopySettings::new(), &pool);
        assert_eq!(copy.style, None);
        assert_eq!(report.skipped_of(SkipKind::MissingStyle).count(), 1);
    }
}
