//! Conditional formatting rules attached to a worksheet.

use super::color::Color;
use super::reference::CellRange;
use super::style::{BorderEdge, FillPattern, NumberFormat, Underline};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    /// `type="expression"`: the rule applies where the formula is true.
    Formula(String),
    /// `type="cellIs"` comparison against one or two formulas.
    CellIs { operator: String, formulas: Vec<String> },
    /// Any other rule type (color scales, data bars, top-N, ...), kept by name.
    Other { kind: String, formulas: Vec<String> },
}

impl Condition {
    pub fn kind(&self) -> &str {
        match self {
            Condition::Formula(_) => "expression",
            Condition::CellIs { .. } => "cellIs",
            Condition::Other { kind, .. } => kind,
        }
    }

    pub fn formulas(&self) -> Vec<&str> {
        match self {
            Condition::Formula(f) => vec![f.as_str()],
            Condition::CellIs { formulas, .. } | Condition::Other { formulas, .. } => {
                formulas.iter().map(|f| f.as_str()).collect()
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct FontFormatting {
    pub italic: bool,
    pub bold: bool,
    /// Twentieths of a point. `None` is the unset sentinel.
    pub height: Option<u32>,
    pub underline: Underline,
    pub strikethrough: bool,
    pub color: Option<Color>,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct BorderFormatting {
    pub left: BorderEdge,
    pub right: BorderEdge,
    pub top: BorderEdge,
    pub bottom: BorderEdge,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct PatternFormatting {
    pub background: Option<Color>,
    pub foreground: Option<Color>,
    /// `FillPattern::None` is the "no fill" sentinel.
    pub pattern: FillPattern,
}

/// The differential format a rule applies.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct DifferentialFormat {
    pub font: Option<FontFormatting>,
    pub border: Option<BorderFormatting>,
    pub pattern: Option<PatternFormatting>,
    pub number_format: Option<NumberFormat>,
}

impl DifferentialFormat {
    pub fn is_empty(&self) -> bool {
        self.font.is_none()
            && self.border.is_none()
            && self.pattern.is_none()
            && self.number_format.is_none()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CfRule {
    /// Lower values are evaluated first.
    pub priority: u32,
    pub condition: Condition,
    pub stop_if_true: bool,
    pub format: DifferentialFormat,
}

impl CfRule {
    pub fn formula(formula: &str) -> Self {
        Self {
            priority: 0,
            condition: Condition::Formula(formula.to_string()),
            stop_if_true: false,
            format: DifferentialFormat::default(),
        }
    }

    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = priority;
        self
    }

    pub fn is_formula(&self) -> bool {
        matches!(self.condition, Condition::Formula(_))
    }
}

/// One `<conditionalFormatting>` block: a region set and its rules.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConditionalFormatting {
    pub ranges: Vec<CellRange>,
    pub rules: Vec<CfRule>,
}

#[derive(Debug, Clone, PartialEq, Default)]
pub struct SheetConditionalFormatting {
    entries: Vec<ConditionalFormatting>,
}

impl SheetConditionalFormatting {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `rule` for `ranges` as a new block and gives it the next
    /// sheet-wide priority. Returns the assigned priority.
    pub fn add(&mut self, ranges: Vec<CellRange>, mut rule: CfRule) -> u32 {
        let priority = self.max_priority().map_or(1, |p| p + 1);
        rule.priority = priority;
        self.entries.push(ConditionalFormatting {
            ranges,
            rules: vec![rule],
        });
        priority
    }

    /// Appends a block as-is, keeping its priorities.
    pub fn push(&mut self, entry: ConditionalFormatting) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[ConditionalFormatting] {
        &self.entries
    }

    pub fn max_priority(&self) -> Option<u32> {
        self.rules().map(|(_, rule)| rule.priority).max()
    }

    /// Every (regions, rule) pair in document order.
    pub fn rules(&self) -> impl Iterator<Item = (&[CellRange], &CfRule)> {
        self.entries
            .iter()
            .flat_map(|e| e.rules.iter().map(move |r| (e.ranges.as_slice(), r)))
    }

    /// Every (regions, rule) pair, ascending by priority. Ties keep
    /// document order.
    pub fn rules_by_priority(&self) -> Vec<(&[CellRange], &CfRule)> {
        let mut pairs: Vec<_> = self.rules().collect();
        pairs.sort_by_key(|(_, rule)| rule.priority);
        pairs
    }

    pub fn rule_count(&self) -> usize {
        self.entries.iter().map(|e| e.rules.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_count() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn range(text: &str) -> Vec<CellRange> {
        vec![CellRange::parse(text).unwrap()]
    }

    #[test]
    fn add_assigns_increasing_priorities() {
        let mut cf = SheetConditionalFormatting::new();
        assert_eq!(cf.add(range("A1:A5"), CfRule::formula("A1>1")), 1);
        assert_eq!(cf.add(range("B1"), CfRule::formula("B1>1").with_priority(40)), 2);
        assert_eq!(cf.rule_count(), 2);
        assert_eq!(cf.entries().len(), 2);
    }

    #[test]
    fn flattening_is_per_rule_and_sorted() {
        let mut cf = SheetConditionalFormatting::new();
        cf.push(ConditionalFormatting {
            ranges: range("A1:A3"),
            rules: vec![
                CfRule::formula("A1=3").with_priority(3),
                CfRule::formula("A1=1").with_priority(1),
            ],
        });
        cf.push(ConditionalFormatting {
            ranges: range("C1"),
            rules: vec![CfRule::formula("C1=2").with_priority(2)],
        });

        let order: Vec<u32> = cf.rules_by_priority().iter().map(|(_, r)| r.priority).collect();
        assert_eq!(order, vec![1, 2, 3]);

        let (ranges, _) = cf.rules_by_priority()[1];
        assert_eq!(ranges, range("C1").as_slice());
        assert_eq!(cf.max_priority(), Some(3));
    }

    #[test]
    fn condition_kind_names() {
        assert_eq!(Condition::Formula("A1".into()).kind(), "expression");
        let between = Condition::CellIs {
            operator: "between".into(),
            formulas: vec!["1".into(), "5".into()],
        };
        assert_eq!(between.kind(), "cellIs");
        assert_eq!(between.formulas(), vec!["1", "5"]);
    }
}
