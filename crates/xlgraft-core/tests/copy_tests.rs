mod common;

use common::{assert_valid, bold_red, range, sample_workbook};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};
use xlgraft_core::sml::{
    CellStyle, CellValue, Color, Condition, HyperlinkType, Rgb, SkipKind, StyleId,
};
use xlgraft_core::{
    copy_sheet_into, copy_workbook, CopySettings, GraftError, MemorySink, StyleIdentity, Workbook,
};

#[test]
fn sample_workbook_is_valid_before_any_copy() {
    let bytes = sample_workbook().to_bytes().unwrap();
    assert_valid(&bytes);
}

#[test]
fn copied_workbook_is_valid_and_keeps_sheet_order() {
    let source = sample_workbook();
    let outcome = copy_workbook(&source, &CopySettings::new()).unwrap();

    let bytes = outcome.workbook.to_bytes().unwrap();
    assert_valid(&bytes);

    let back = Workbook::from_bytes(&bytes).unwrap();
    assert_eq!(back.sheet_names(), vec!["Data", "Notes"]);
}

#[test]
fn cell_values_survive_copy_and_reload() {
    let source = sample_workbook();
    let outcome = copy_workbook(&source, &CopySettings::new()).unwrap();
    let back = Workbook::from_bytes(&outcome.workbook.to_bytes().unwrap()).unwrap();
    let data = back.sheet("Data").unwrap();

    assert_eq!(data.cell(0, 0).unwrap().value, CellValue::String("Item".into()));
    assert_eq!(data.cell(0, 2).unwrap().value, CellValue::String(" padded ".into()));
    assert_eq!(data.cell(3, 1).unwrap().value, CellValue::Number(4.5));
    assert_eq!(data.cell(6, 1).unwrap().value, CellValue::Formula("SUM(B2:B6)".into()));
    assert_eq!(data.cell(8, 3).unwrap().value, CellValue::Boolean(true));
    assert_eq!(data.cell(9, 3).unwrap().value.kind(), "error");
    assert_eq!(data.row(10).unwrap().height, Some(24.0));
    assert_eq!(data.merged_regions, vec![range("A8:C8")]);
    assert!(data.cell(2, 2).is_none());
}

#[test]
fn copied_styles_carry_the_same_formatting() {
    let source = sample_workbook();
    let outcome = copy_workbook(&source, &CopySettings::new()).unwrap();
    let back = Workbook::from_bytes(&outcome.workbook.to_bytes().unwrap()).unwrap();
    let data = back.sheet("Data").unwrap();

    let header = data.cell(0, 0).unwrap().style.expect("header keeps a style");
    assert_eq!(back.styles.get(header), Some(&bold_red()));
    assert_eq!(data.cell(0, 1).unwrap().style, Some(header));
    assert_eq!(data.cell(0, 2).unwrap().style, None);

    // An empty cell that only carries a style is still written.
    let empty = data.cell(10, 0).unwrap();
    assert_eq!(empty.value, CellValue::Empty);
    assert_eq!(empty.style, Some(header));
}

#[test]
fn formula_rules_keep_relative_order() {
    let source = sample_workbook();
    let outcome = copy_workbook(&source, &CopySettings::new()).unwrap();
    let cf = &outcome.workbook.sheet("Data").unwrap().conditional_formatting;

    let rules = cf.rules_by_priority();
    let summary: Vec<(u32, &str)> = rules
        .iter()
        .map(|(_, rule)| match &rule.condition {
            Condition::Formula(f) => (rule.priority, f.as_str()),
            other => panic!("unexpected {:?}", other),
        })
        .collect();
    assert_eq!(summary, vec![(1, "$B2<3"), (2, "LEN($A2)>5"), (3, "$B2>6")]);
    assert_eq!(rules[1].0, &[range("A2:A6"), range("D2")][..]);
    assert_eq!(rules[0].0, &[range("B2:B6")][..]);
}

#[test]
fn rule_colors_are_resolved_against_the_source_theme() {
    let source = sample_workbook();
    let outcome = copy_workbook(&source, &CopySettings::new()).unwrap();
    let cf = &outcome.workbook.sheet("Data").unwrap().conditional_formatting;
    let rules = cf.rules_by_priority();

    let high = &rules[2].1.format;
    let font = high.font.as_ref().unwrap();
    assert!(font.bold);
    assert_eq!(font.color, Some(Color::Rgb(Rgb(0xFFC0504D))));
    let pattern = high.pattern.as_ref().unwrap();
    assert_eq!(pattern.background, Some(Color::rgb(0xFFFFFF00)));
    assert_eq!(pattern.foreground, None);

    // Theme slot 99 does not exist: the edge keeps its style but loses its color.
    let low = rules[0].1.format.border.as_ref().unwrap();
    assert_eq!(low.top.color, None);
    assert_eq!(low.top.style, xlgraft_core::sml::style::BorderStyle::Thick);
}

#[test]
fn rule_formats_survive_a_write() {
    let source = sample_workbook();
    let outcome = copy_workbook(&source, &CopySettings::new()).unwrap();
    let back = Workbook::from_bytes(&outcome.workbook.to_bytes().unwrap()).unwrap();
    let rules = back.sheet("Data").unwrap().conditional_formatting.rules_by_priority();

    assert_eq!(rules.len(), 3);
    let font = rules[2].1.format.font.as_ref().unwrap();
    assert_eq!(font.color, Some(Color::Rgb(Rgb(0xFFC0504D))));
}

#[test]
fn report_counts_what_was_copied() {
    let source = sample_workbook();
    let report = copy_workbook(&source, &CopySettings::new()).unwrap().report;

    assert_eq!(report.sheets, 2);
    assert_eq!(report.cells, 19);
    assert_eq!(report.merged_regions, 1);
    assert_eq!(report.hyperlinks, 2);
    assert_eq!(report.conditional_rules, 3);
    assert_eq!(report.anchors, 5);
    assert_eq!(report.media, 1);
    assert_eq!(report.styles_created, 1);

    assert_eq!(report.skipped_of(SkipKind::ConditionalRule).count(), 1);
    assert_eq!(report.skipped_of(SkipKind::UnresolvedColor).count(), 1);
    assert_eq!(report.skipped_of(SkipKind::MissingMedia).count(), 0);
    assert!(report.skipped.iter().all(|s| s.sheet == "Data"));

    let json: serde_json::Value = serde_json::from_str(&report.to_json()).unwrap();
    assert_eq!(json["cells"], 19);
    assert_eq!(json["skipped"][0]["kind"], "unresolved_color");
    assert_eq!(json["skipped"][1]["kind"], "conditional_rule");
}

#[test]
fn hyperlinks_and_labels_survive() {
    let source = sample_workbook();
    let outcome = copy_workbook(&source, &CopySettings::new()).unwrap();
    let back = Workbook::from_bytes(&outcome.workbook.to_bytes().unwrap()).unwrap();
    let notes = back.sheet("Notes").unwrap();

    let internal = notes.cell(0, 0).unwrap().hyperlink.as_ref().unwrap();
    assert_eq!(internal.kind, HyperlinkType::Document);
    assert_eq!(internal.address, "Data!A1");
    assert_eq!(internal.label.as_deref(), Some("see data"));

    let external = notes.cell(1, 0).unwrap().hyperlink.as_ref().unwrap();
    assert_eq!(external.kind, HyperlinkType::Url);
    assert_eq!(external.address, "https://example.com/");
}

#[test]
fn disabled_features_are_left_out() {
    let source = sample_workbook();
    let settings = CopySettings::new()
        .with_hyperlinks(false)
        .with_merged_regions(false)
        .with_conditional_formatting(false)
        .with_drawings(false);
    let outcome = copy_workbook(&source, &settings).unwrap();
    let data = outcome.workbook.sheet("Data").unwrap();

    assert!(data.merged_regions.is_empty());
    assert!(data.conditional_formatting.is_empty());
    assert!(data.drawing().is_none());
    assert!(outcome.workbook.media.is_empty());
    assert!(outcome.workbook.sheet("Notes").unwrap().cell(0, 0).unwrap().hyperlink.is_none());
    assert!(outcome.report.skipped.is_empty());
    assert_valid(&outcome.workbook.to_bytes().unwrap());
}

#[test]
fn picture_media_travels_with_the_drawing() {
    let source = sample_workbook();
    let outcome = copy_workbook(&source, &CopySettings::new()).unwrap();
    let back = Workbook::from_bytes(&outcome.workbook.to_bytes().unwrap()).unwrap();

    let drawing = back.sheet("Data").unwrap().drawing().unwrap();
    assert_eq!(drawing.names(), vec!["A", "B", "Pinned", "C", "Picture 7"]);
    let parts = drawing.media_parts();
    assert_eq!(parts.len(), 1);
    assert_eq!(back.media.get(parts[0]).map(Vec::as_slice), Some(common::PIXEL_PNG));
}

#[test]
fn structural_identity_merges_equal_styles() {
    let mut source = sample_workbook();
    let twin = source.styles.add(bold_red());
    source.sheet_mut("Notes").unwrap().cell_mut(0, 0).unwrap().style = Some(twin);

    let reference = copy_workbook(&source, &CopySettings::new()).unwrap();
    assert_eq!(reference.report.styles_created, 2);

    let structural = copy_workbook(
        &source,
        &CopySettings::new().with_style_identity(StyleIdentity::Structural),
    )
    .unwrap();
    assert_eq!(structural.report.styles_created, 1);
    let header = structural.workbook.sheet("Data").unwrap().cell(0, 0).unwrap().style;
    let note = structural.workbook.sheet("Notes").unwrap().cell(0, 0).unwrap().style;
    assert_eq!(header, note);
}

#[test]
fn copy_sheet_into_an_existing_workbook() {
    let source = sample_workbook();
    let mut destination = Workbook::new();
    let filler = destination.styles.add(bold_red());
    destination
        .create_sheet("Existing")
        .unwrap()
        .create_row(0)
        .create_cell(0)
        .style = Some(filler);

    let report = copy_sheet_into(&source, 0, &mut destination, "Imported", &CopySettings::new()).unwrap();

    assert_eq!(report.sheets, 1);
    assert_eq!(destination.sheet_names(), vec!["Existing", "Imported"]);
    let imported = destination.sheet("Imported").unwrap();
    let style = imported.cell(0, 0).unwrap().style.unwrap();
    assert_ne!(style, filler);
    assert_ne!(style, StyleId::DEFAULT);
    assert_eq!(destination.styles.get(style), Some(&bold_red()));
    assert_eq!(destination.media.len(), 1);

    assert_valid(&destination.to_bytes().unwrap());
}

#[test]
fn unstyled_cells_keep_the_source_default_style() {
    let mut source = Workbook::new();
    let mut default = CellStyle::default();
    default.font.name = Some("MS PGothic".to_string());
    source.styles.set_default(default);
    source.create_sheet("Jp").unwrap().create_row(0).create_cell(0).value = CellValue::String("x".into());
    let source = Workbook::from_bytes(&source.to_bytes().unwrap()).unwrap();
    assert_eq!(source.sheet("Jp").unwrap().cell(0, 0).unwrap().style, None);

    let mut destination = Workbook::new();
    let report = copy_sheet_into(&source, 0, &mut destination, "Jp", &CopySettings::new()).unwrap();

    let style = destination.sheet("Jp").unwrap().cell(0, 0).unwrap().style.unwrap();
    let font = &destination.styles.get(style).unwrap().font;
    assert_eq!(font.name.as_deref(), Some("MS PGothic"));
    assert_eq!(report.styles_created, 1);

    // Same default on both sides: nothing to carry.
    let mut twin = Workbook::new();
    twin.styles.set_default(source.styles.get(StyleId::DEFAULT).unwrap().clone());
    copy_sheet_into(&source, 0, &mut twin, "Jp", &CopySettings::new()).unwrap();
    assert_eq!(twin.sheet("Jp").unwrap().cell(0, 0).unwrap().style, None);
    assert_eq!(twin.styles.len(), 1);
}

#[test]
fn copy_sheet_into_rejects_bad_names_without_side_effects() {
    let source = sample_workbook();
    let mut destination = Workbook::new();
    destination.create_sheet("Taken").unwrap();
    let settings = CopySettings::new();

    let err = copy_sheet_into(&source, 0, &mut destination, "Taken", &settings).unwrap_err();
    assert!(matches!(err, GraftError::DuplicateSheetName { .. }));

    let err = copy_sheet_into(&source, 0, &mut destination, "bad/name", &settings).unwrap_err();
    assert!(matches!(err, GraftError::InvalidSheetName { .. }));

    let err = copy_sheet_into(&source, 7, &mut destination, "Fine", &settings).unwrap_err();
    assert!(matches!(err, GraftError::SheetNotFound { .. }));

    assert_eq!(destination.sheet_names(), vec!["Taken"]);
    assert_eq!(destination.styles.len(), 1);
    assert!(destination.media.is_empty());
}

#[test]
fn copied_sheet_is_independent_of_its_source() {
    let mut source = sample_workbook();
    let outcome = copy_workbook(&source, &CopySettings::new()).unwrap();

    let data = source.sheet_mut("Data").unwrap();
    data.cell_mut(0, 0).unwrap().value = CellValue::String("changed".into());
    data.drawing_mut().unwrap().set_hidden("A", true);

    let copy = outcome.workbook.sheet("Data").unwrap();
    assert_eq!(copy.cell(0, 0).unwrap().value, CellValue::String("Item".into()));
    let a = copy.drawing().unwrap().find_by_name("A").unwrap();
    assert_eq!(a.content.info().map(|i| i.hidden), Some(false));
}

#[test]
fn clone_sheet_picks_the_next_free_name() {
    let mut workbook = sample_workbook();

    let first = workbook.clone_sheet(0).unwrap().name().to_string();
    let second = workbook.clone_sheet(0).unwrap().name().to_string();

    assert_eq!(first, "Data (2)");
    assert_eq!(second, "Data (3)");
    assert_eq!(workbook.sheet_count(), 4);
    assert_valid(&workbook.to_bytes().unwrap());
}

#[test]
fn log_callback_sees_skipped_items() {
    let messages = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&messages);
    let settings = CopySettings::new().with_log_callback(move |m| sink.lock().unwrap().push(m.to_string()));

    copy_workbook(&sample_workbook(), &settings).unwrap();

    let messages = messages.lock().unwrap();
    assert!(messages.iter().any(|m| m.contains("ConditionalRule")));
    assert!(messages.iter().any(|m| m.contains("copied sheet 'Notes'")));
}

#[test]
fn write_to_memory_sink() {
    let outcome = copy_workbook(&sample_workbook(), &CopySettings::new()).unwrap();
    let mut sink = MemorySink::new();

    outcome.workbook.write_to(&mut sink, "copy.xlsx").unwrap();

    let bytes = sink.get("copy.xlsx").unwrap();
    assert_valid(bytes);
    assert_eq!(Workbook::from_bytes(bytes).unwrap().sheet_count(), 2);
}
