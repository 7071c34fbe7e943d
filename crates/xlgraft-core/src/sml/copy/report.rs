use crate::sml::settings::CopySettings;
use serde::{Deserialize, Serialize};
use std::fmt;

/// What a copy produced, and what it left behind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CopyReport {
    pub sheets: usize,
    pub rows: usize,
    pub cells: usize,
    pub styles_created: usize,
    pub merged_regions: usize,
    pub hyperlinks: usize,
    pub conditional_rules: usize,
    pub anchors: usize,
    pub media: usize,
    pub skipped: Vec<Skipped>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Skipped {
    pub sheet: String,
    pub kind: SkipKind,
    pub detail: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipKind {
    /// A conditional rule that is not formula based.
    ConditionalRule,
    /// A color that resolved to nothing against the source theme.
    UnresolvedColor,
    /// A cell style id the source pool does not contain.
    MissingStyle,
    /// An image relationship whose bytes are not in the source workbook.
    MissingMedia,
}

impl CopyReport {
    pub fn new() -> Self {
        Self {
            sheets: 0,
            rows: 0,
            cells: 0,
            styles_created: 0,
            merged_regions: 0,
            hyperlinks: 0,
            conditional_rules: 0,
            anchors: 0,
            media: 0,
            skipped: Vec::new(),
        }
    }

    pub fn to_json(&self) -> String {
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    pub fn skipped_of(&self, kind: SkipKind) -> impl Iterator<Item = &Skipped> {
        self.skipped.iter().filter(move |s| s.kind == kind)
    }

    /// Records a skipped item and reports it through `log` and the settings
    /// callback.
    pub(crate) fn skip(&mut self, settings: &CopySettings, sheet: &str, kind: SkipKind, detail: String) {
        let message = format!("sheet '{}': skipped {:?}: {}", sheet, kind, detail);
        log::warn!("{}", message);
        settings.log(&message);
        self.skipped.push(Skipped {
            sheet: sheet.to_string(),
            kind,
            detail,
        });
    }
}

impl Default for CopyReport {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for CopyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "{} sheet(s), {} row(s), {} cell(s), {} style(s) created",
            self.sheets, self.rows, self.cells, self.styles_created
        )?;
        writeln!(
            f,
            "{} merged region(s), {} hyperlink(s), {} conditional rule(s), {} anchor(s), {} media part(s)",
            self.merged_regions, self.hyperlinks, self.conditional_rules, self.anchors, self.media
        )?;
        for skipped in &self.skipped {
            writeln!(f, "skipped [{}] {:?}: {}", skipped.sheet, skipped.kind, skipped.detail)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn skip_reaches_the_callback() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let settings = CopySettings::new().with_log_callback(move |m| sink.lock().unwrap().push(m.to_string()));

        let mut report = CopyReport::new();
        report.skip(&settings, "Data", SkipKind::ConditionalRule, "colorScale rule".into());

        assert_eq!(report.skipped_of(SkipKind::ConditionalRule).count(), 1);
        assert_eq!(report.skipped_of(SkipKind::UnresolvedColor).count(), 0);
        let messages = seen.lock().unwrap();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].contains("colorScale rule"));
    }

    #[test]
    fn json_uses_snake_case_kinds() {
        let mut report = CopyReport::new();
        report.skip(&CopySettings::new(), "S", SkipKind::UnresolvedColor, "font color".into());
        let json = report.to_json();
        assert!(json.contains("\"unresolved_color\""));
        assert!(json.contains("\"styles_created\": 0"));
    }
}
