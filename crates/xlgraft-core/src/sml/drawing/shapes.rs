//! Per-shape edits: visibility, removal, text and pictures.

use super::{c_nv_pr, content_element, AnchorContent, Drawing, Placement, PlacementKind};
use crate::error::{GraftError, Result};
use crate::package::relationships::{next_relationship_id, relationship_types};
use crate::package::Relationship;
use crate::xml::namespaces::{A, R, XDR};
use crate::xml::parser::parse;
use crate::xml::XName;
use indextree::NodeId;
use quick_xml::escape::escape;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

/// English Metric Units per screen pixel at 96 dpi.
pub const EMU_PER_PIXEL: i64 = 9525;

/// Two-cell placement: top-left cell plus offset, bottom-right cell plus
/// offset. Offsets are EMUs and may be negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ClientAnchor {
    pub col1: u32,
    pub row1: u32,
    pub dx1: i64,
    pub dy1: i64,
    pub col2: u32,
    pub row2: u32,
    pub dx2: i64,
    pub dy2: i64,
}

impl ClientAnchor {
    pub fn cells(col1: u32, row1: u32, col2: u32, row2: u32) -> Self {
        Self {
            col1,
            row1,
            col2,
            row2,
            ..Self::default()
        }
    }

    /// Moves both corners `pixels` towards the inside of the cell range.
    pub fn inset_px(mut self, pixels: i64) -> Self {
        let emu = pixels * EMU_PER_PIXEL;
        self.dx1 = emu;
        self.dy1 = emu;
        self.dx2 = -emu;
        self.dy2 = -emu;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PictureType {
    Png,
    Jpeg,
    Gif,
    Bmp,
    Emf,
    Wmf,
}

impl PictureType {
    pub fn extension(self) -> &'static str {
        match self {
            PictureType::Png => "png",
            PictureType::Jpeg => "jpeg",
            PictureType::Gif => "gif",
            PictureType::Bmp => "bmp",
            PictureType::Emf => "emf",
            PictureType::Wmf => "wmf",
        }
    }

    pub fn content_type(self) -> &'static str {
        match self {
            PictureType::Png => "image/png",
            PictureType::Jpeg => "image/jpeg",
            PictureType::Gif => "image/gif",
            PictureType::Bmp => "image/bmp",
            PictureType::Emf => "image/x-emf",
            PictureType::Wmf => "image/x-wmf",
        }
    }

    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext.to_ascii_lowercase().as_str() {
            "png" => Some(PictureType::Png),
            "jpg" | "jpeg" => Some(PictureType::Jpeg),
            "gif" => Some(PictureType::Gif),
            "bmp" => Some(PictureType::Bmp),
            "emf" => Some(PictureType::Emf),
            "wmf" => Some(PictureType::Wmf),
            _ => None,
        }
    }

    /// Sniffs the common raster signatures.
    pub fn detect(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"\x89PNG\r\n\x1a\n") {
            Some(PictureType::Png)
        } else if bytes.starts_with(&[0xFF, 0xD8, 0xFF]) {
            Some(PictureType::Jpeg)
        } else if bytes.starts_with(b"GIF87a") || bytes.starts_with(b"GIF89a") {
            Some(PictureType::Gif)
        } else if bytes.starts_with(b"BM") {
            Some(PictureType::Bmp)
        } else {
            None
        }
    }
}

impl Drawing {
    /// Shows or hides the named shape, group or picture. Returns whether
    /// the shape exists.
    pub fn set_hidden(&mut self, name: &str, hidden: bool) -> bool {
        let Some(c_nv_pr) = self.named_c_nv_pr(name) else {
            return false;
        };
        let attr = XName::local("hidden");
        if hidden {
            self.tree.set_attribute(c_nv_pr, &attr, "1");
        } else {
            self.tree.remove_attribute(c_nv_pr, &attr);
        }
        self.refresh_info(name);
        true
    }

    /// Removes the first anchor holding a shape called `name`, looking at
    /// two-cell anchors first, then one-cell, then absolute ones.
    pub fn remove(&mut self, name: &str) -> Result<bool> {
        let target = [PlacementKind::TwoCell, PlacementKind::OneCell, PlacementKind::Absolute]
            .iter()
            .find_map(|kind| {
                self.anchors
                    .iter()
                    .find(|a| a.placement.kind() == *kind && a.name() == Some(name))
            })
            .map(|a| a.node);

        let Some(node) = target else {
            return Ok(false);
        };
        self.tree.remove_subtree(node);
        self.classify()?;
        Ok(true)
    }

    /// Replaces `search` with `replacement` inside every text run of the
    /// named simple shape. Returns how many runs changed; groups, pictures
    /// and unknown names are left alone.
    pub fn replace_text(&mut self, name: &str, search: &str, replacement: &str) -> usize {
        if search.is_empty() {
            return 0;
        }
        let Some(anchor) = self.find_by_name(name) else {
            return 0;
        };
        if !matches!(anchor.content, AnchorContent::Shape(_)) {
            return 0;
        }
        let Some(shape) = content_element(&self.tree, anchor.element) else {
            return 0;
        };

        let text_nodes: Vec<NodeId> = self
            .tree
            .descendants(shape)
            .filter(|&n| self.tree.get(n).and_then(|d| d.name()) == Some(&A::t()))
            .filter(|&n| {
                self.tree
                    .parent(n)
                    .and_then(|p| self.tree.get(p))
                    .and_then(|d| d.name())
                    == Some(&A::r())
            })
            .collect();

        let mut changed = 0;
        for node in text_nodes {
            let original = self.tree.inner_text(node);
            if original.contains(search) {
                self.tree.set_text(node, &original.replace(search, replacement));
                changed += 1;
            }
        }
        changed
    }

    /// Two-cell geometry of the named shape, for placing something on top of it.
    pub fn anchor_of(&self, name: &str) -> Option<ClientAnchor> {
        match self.find_by_name(name)?.placement {
            Placement::TwoCell { from, to } => Some(ClientAnchor {
                col1: from.col,
                row1: from.row,
                dx1: from.col_off,
                dy1: from.row_off,
                col2: to.col,
                row2: to.row,
                dx2: to.col_off,
                dy2: to.row_off,
            }),
            _ => None,
        }
    }

    /// Appends a picture of `media_part` (a workbook media part name) on
    /// top of every existing anchor. Returns the new picture's name.
    pub fn create_picture(&mut self, anchor: ClientAnchor, media_part: &str) -> Result<String> {
        let root = self.root()?;

        let rel_id = match self
            .relationships
            .iter()
            .find(|r| r.rel_type == relationship_types::IMAGE && r.target == media_part)
        {
            Some(rel) => rel.id.clone(),
            None => {
                let id = next_relationship_id(&self.relationships);
                self.relationships
                    .push(Relationship::new(&id, relationship_types::IMAGE, media_part));
                id
            }
        };

        let shape_id = self.next_shape_id();
        let name = format!("Picture {}", shape_id);
        let fragment = parse(&picture_anchor_xml(&anchor, shape_id, &name, &rel_id))?;
        let Some(fragment_root) = fragment.root() else {
            return Err(GraftError::XmlWrite("empty picture fragment".to_string()));
        };
        let node = self.tree.import_subtree(root, &fragment, fragment_root);
        if let Some(node) = node {
            strip_declared_namespaces(self, node);
        }

        self.classify()?;
        Ok(name)
    }

    /// One past the largest `cNvPr` id, or the smallest free id once the
    /// largest is `u32::MAX`.
    fn next_shape_id(&self) -> u32 {
        let Some(root) = self.tree.root() else {
            return 1;
        };
        let used: BTreeSet<u32> = self
            .tree
            .descendants(root)
            .filter(|&n| self.tree.get(n).and_then(|d| d.name()) == Some(&XDR::cNvPr()))
            .filter_map(|n| self.tree.attribute_local(n, "id")?.parse::<u32>().ok())
            .collect();
        match used.last() {
            None => 2,
            Some(&max) => max
                .checked_add(1)
                .unwrap_or_else(|| (1..).find(|id| !used.contains(id)).unwrap_or(max)),
        }
    }

    fn named_c_nv_pr(&self, name: &str) -> Option<NodeId> {
        let anchor = self.find_by_name(name)?;
        let object = content_element(&self.tree, anchor.element)?;
        c_nv_pr(&self.tree, object)
    }

    fn refresh_info(&mut self, name: &str) {
        let Some(index) = self.position(name) else {
            return;
        };
        let element = self.anchors[index].element;
        self.anchors[index].content = super::classify_content(&self.tree, element);
    }
}

fn strip_declared_namespaces(drawing: &mut Drawing, node: NodeId) {
    let declared: Vec<_> = drawing
        .tree
        .root()
        .and_then(|r| drawing.tree.get(r))
        .and_then(|d| d.attributes())
        .map(|attrs| attrs.to_vec())
        .unwrap_or_default();
    if let Some(attrs) = drawing.tree.get_mut(node).and_then(|d| d.attributes_mut()) {
        attrs.retain(|attr| {
            !(crate::xml::builder::is_xmlns_attr(attr) && declared.contains(attr))
        });
    }
}

fn anchor_point_xml(tag: &str, col: u32, col_off: i64, row: u32, row_off: i64) -> String {
    format!(
        "<xdr:{tag}><xdr:col>{col}</xdr:col><xdr:colOff>{col_off}</xdr:colOff>\
         <xdr:row>{row}</xdr:row><xdr:rowOff>{row_off}</xdr:rowOff></xdr:{tag}>"
    )
}

fn picture_anchor_xml(anchor: &ClientAnchor, id: u32, name: &str, rel_id: &str) -> String {
    format!(
        r#"<xdr:twoCellAnchor editAs="oneCell" xmlns:xdr="{xdr}" xmlns:a="{a}" xmlns:r="{r}">{from}{to}<xdr:pic><xdr:nvPicPr><xdr:cNvPr id="{id}" name="{name}"/><xdr:cNvPicPr><a:picLocks noChangeAspect="1"/></xdr:cNvPicPr></xdr:nvPicPr><xdr:blipFill><a:blip r:embed="{rel}"/><a:stretch><a:fillRect/></a:stretch></xdr:blipFill><xdr:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="0" cy="0"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></xdr:spPr></xdr:pic><xdr:clientData/></xdr:twoCellAnchor>"#,
        xdr = XDR::NS,
        a = A::NS,
        r = R::NS,
        from = anchor_point_xml("from", anchor.col1, anchor.dx1, anchor.row1, anchor.dy1),
        to = anchor_point_xml("to", anchor.col2, anchor.dx2, anchor.row2, anchor.dy2),
        id = id,
        name = escape(name),
        rel = escape(rel_id),
    )
}
