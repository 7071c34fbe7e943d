//! Rebuilds a sheet's conditional formatting on another sheet.
//!
//! Rules are recreated one at a time in ascending source priority, so the
//! destination's own priority counter reproduces the source ordering. Only
//! formula rules are carried. Number formats, strikethrough and the
//! stop-if-true flag are not copied.

use super::report::{CopyReport, SkipKind};
use crate::sml::color::{resolve_color, Color, Theme};
use crate::sml::conditional::{
    BorderFormatting, CfRule, Condition, DifferentialFormat, FontFormatting, PatternFormatting,
    SheetConditionalFormatting,
};
use crate::sml::settings::CopySettings;
use crate::sml::style::{BorderEdge, FillPattern};

pub(crate) struct ConditionalCopy<'a> {
    pub sheet: &'a str,
    pub theme: &'a Theme,
    pub settings: &'a CopySettings,
}

impl ConditionalCopy<'_> {
    /// Appends every formula rule of `source` to `destination`. Returns the
    /// number of rules created.
    pub fn copy_into(
        &self,
        source: &SheetConditionalFormatting,
        destination: &mut SheetConditionalFormatting,
        report: &mut CopyReport,
    ) -> usize {
        let mut created = 0;
        for (ranges, rule) in source.rules_by_priority() {
            let formula = match &rule.condition {
                Condition::Formula(formula) => formula,
                other => {
                    report.skip(
                        self.settings,
                        self.sheet,
                        SkipKind::ConditionalRule,
                        format!("{} rule with priority {}", other.kind(), rule.priority),
                    );
                    continue;
                }
            };

            let mut copy = CfRule::formula(formula);
            copy.format = self.copy_format(&rule.format, report);
            let priority = destination.add(ranges.to_vec(), copy);
            log::trace!(
                "sheet '{}': rule '{}' priority {} -> {}",
                self.sheet,
                formula,
                rule.priority,
                priority
            );
            created += 1;
        }
        report.conditional_rules += created;
        created
    }

    fn copy_format(&self, source: &DifferentialFormat, report: &mut CopyReport) -> DifferentialFormat {
        DifferentialFormat {
            font: source.font.as_ref().map(|f| self.copy_font(f, report)),
            border: source.border.as_ref().map(|b| self.copy_border(b, report)),
            pattern: source.pattern.as_ref().map(|p| self.copy_pattern(p, report)),
            number_format: None,
        }
    }

    fn copy_font(&self, source: &FontFormatting, report: &mut CopyReport) -> FontFormatting {
        FontFormatting {
            italic: source.italic,
            bold: source.bold,
            height: source.height,
            underline: source.underline,
            strikethrough: false,
            color: self.color(source.color.as_ref(), "font color", report),
        }
    }

    fn copy_border(&self, source: &BorderFormatting, report: &mut CopyReport) -> BorderFormatting {
        let mut edge = |edge: &BorderEdge, label: &str| BorderEdge {
            style: edge.style,
            color: self.color(edge.color.as_ref(), label, report),
        };
        BorderFormatting {
            left: edge(&source.left, "left border color"),
            right: edge(&source.right, "right border color"),
            top: edge(&source.top, "top border color"),
            bottom: edge(&source.bottom, "bottom border color"),
        }
    }

    fn copy_pattern(&self, source: &PatternFormatting, report: &mut CopyReport) -> PatternFormatting {
        let mut pattern = PatternFormatting {
            background: self.color(source.background.as_ref(), "fill background", report),
            foreground: self.color(source.foreground.as_ref(), "fill foreground", report),
            pattern: FillPattern::None,
        };
        if source.pattern != FillPattern::None {
            pattern.pattern = source.pattern;
        }
        pattern
    }

    /// Resolved RGB for `color`. A color that was set but resolves to
    /// nothing is reported and left unset.
    fn color(&self, color: Option<&Color>, label: &str, report: &mut CopyReport) -> Option<Color> {
        let source = color?;
        match resolve_color(Some(source), self.theme) {
            Some(rgb) => Some(Color::Rgb(rgb)),
            None => {
                report.skip(
                    self.settings,
                    self.sheet,
                    SkipKind::UnresolvedColor,
                    format!("{} {:?}", label, source),
                );
                None
            }
        }
    }
}
