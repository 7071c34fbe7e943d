//! Shape stacking order.
//!
//! Removing an anchor element kills its nodes, so an anchor can never be
//! moved by detaching and re-inserting it. Every reorder therefore goes
//! through plain-data snapshots:
//!
//! 1. serialize each anchor to a self-contained XML fragment,
//! 2. parse every fragment into a fresh tree (all failures surface here),
//! 3. import each fresh anchor right before the anchor whose slot it takes,
//!    then remove that old anchor.
//!
//! Steps 1 and 2 do not touch the drawing, so an error leaves it as it was.
//! Other children of `xdr:wsDr` keep their place between the anchors.

use super::{Drawing, PlacementKind};
use crate::error::{GraftError, Result};
use crate::xml::builder::{is_xmlns_attr, serialize_subtree};
use crate::xml::parser::parse;
use crate::xml::XmlDocument;
use indextree::NodeId;

/// Self-contained copy of one anchor. Holds no tree references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnchorSnapshot {
    pub kind: PlacementKind,
    pub name: Option<String>,
    /// The anchor element with every namespace it uses declared on it.
    pub xml: String,
}

impl AnchorSnapshot {
    /// Parses the snapshot into a new, independent tree.
    pub fn to_tree(&self) -> Result<XmlDocument> {
        parse(&self.xml)
    }
}

impl Drawing {
    /// Snapshots every anchor, in render order.
    pub fn snapshot(&self) -> Result<Vec<AnchorSnapshot>> {
        self.anchors
            .iter()
            .map(|anchor| {
                Ok(AnchorSnapshot {
                    kind: anchor.placement.kind(),
                    name: anchor.name().map(|s| s.to_string()),
                    xml: serialize_subtree(&self.tree, anchor.node)?,
                })
            })
            .collect()
    }

    /// Permutes the two-cell anchors. `order[k]` is the index (among the
    /// two-cell anchors, in current order) of the anchor that ends up in
    /// the k-th two-cell slot. One-cell and absolute anchors keep their
    /// positions.
    pub fn reorder(&mut self, order: &[usize]) -> Result<()> {
        let slots: Vec<usize> = self
            .anchors
            .iter()
            .enumerate()
            .filter(|(_, a)| a.placement.kind() == PlacementKind::TwoCell)
            .map(|(i, _)| i)
            .collect();
        validate_permutation(order, slots.len())?;

        let skipped = self.anchors.len() - slots.len();
        if skipped > 0 {
            log::debug!("{} non two-cell anchor(s) keep their stacking slot", skipped);
        }

        let mut sequence: Vec<usize> = (0..self.anchors.len()).collect();
        for (slot, &source) in slots.iter().zip(order) {
            sequence[*slot] = slots[source];
        }
        self.rebuild(&sequence)
    }

    /// Reorders the two-cell anchors by name. Every named two-cell anchor
    /// must be listed exactly once.
    pub fn reorder_by_names(&mut self, names: &[&str]) -> Result<()> {
        let two_cell: Vec<Option<&str>> = self
            .anchors
            .iter()
            .filter(|a| a.placement.kind() == PlacementKind::TwoCell)
            .map(|a| a.name())
            .collect();

        let order = names
            .iter()
            .map(|name| {
                two_cell
                    .iter()
                    .position(|n| n == &Some(*name))
                    .ok_or_else(|| GraftError::ShapeNotFound {
                        name: name.to_string(),
                    })
            })
            .collect::<Result<Vec<_>>>()?;

        self.reorder(&order)
    }

    /// Reverses the stacking order of the two-cell anchors.
    pub fn reverse(&mut self) -> Result<()> {
        let count = self
            .anchors
            .iter()
            .filter(|a| a.placement.kind() == PlacementKind::TwoCell)
            .count();
        let order: Vec<usize> = (0..count).rev().collect();
        self.reorder(&order)
    }

    /// A structurally independent copy of this drawing.
    pub fn duplicate(&self) -> Result<Drawing> {
        let root = self.root()?;
        let root_data = self.tree.get(root).cloned().ok_or_else(|| GraftError::XmlParse {
            message: "drawing root is not live".to_string(),
            location: "drawing".to_string(),
        })?;

        let mut tree = XmlDocument::new();
        let new_root = tree.add_root(root_data);
        for child in self.tree.children(root) {
            tree.import_subtree(new_root, &self.tree, child);
        }

        Drawing::from_tree(tree, self.relationships.clone())
    }

    /// Refills the anchor slots with fresh copies of the current anchors,
    /// slot `k` taking anchor `sequence[k]`.
    fn rebuild(&mut self, sequence: &[usize]) -> Result<()> {
        let fragments: Vec<XmlDocument> = self
            .snapshot()?
            .iter()
            .map(AnchorSnapshot::to_tree)
            .collect::<Result<_>>()?;

        // Nothing below can fail.
        let slots: Vec<NodeId> = self.anchors.iter().map(|a| a.node).collect();
        for (&slot, &index) in slots.iter().zip(sequence) {
            if let Some(fragment) = fragments.get(index) {
                import_anchor_before(&mut self.tree, slot, fragment);
            }
            self.tree.remove_subtree(slot);
        }

        self.classify()
    }
}

fn validate_permutation(order: &[usize], len: usize) -> Result<()> {
    if order.len() != len {
        return Err(GraftError::InvalidPermutation {
            message: format!("expected {} positions, got {}", len, order.len()),
        });
    }
    let mut seen = vec![false; len];
    for &index in order {
        match seen.get_mut(index) {
            None => {
                return Err(GraftError::InvalidPermutation {
                    message: format!("position {} is out of range 0..{}", index, len),
                })
            }
            Some(true) => {
                return Err(GraftError::InvalidPermutation {
                    message: format!("position {} appears more than once", index),
                })
            }
            Some(slot) => *slot = true,
        }
    }
    Ok(())
}

/// Inserts the fragment's top element before `slot`, dropping namespace
/// declarations the document root already makes.
fn import_anchor_before(tree: &mut XmlDocument, slot: NodeId, fragment: &XmlDocument) {
    let Some(fragment_root) = fragment.root() else {
        return;
    };
    let Some(new_node) = tree.import_subtree_before(slot, fragment, fragment_root) else {
        return;
    };

    let declared: Vec<_> = tree
        .root()
        .and_then(|r| tree.get(r))
        .and_then(|d| d.attributes())
        .map(|attrs| attrs.iter().filter(|a| is_xmlns_attr(a)).cloned().collect())
        .unwrap_or_default();

    if let Some(attrs) = tree.get_mut(new_node).and_then(|d| d.attributes_mut()) {
        attrs.retain(|attr| !(is_xmlns_attr(attr) && declared.contains(attr)));
    }
}
