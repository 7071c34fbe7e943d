//! Worksheet drawings: the anchor layer of a sheet.
//!
//! A drawing keeps its `xdr:wsDr` part as an [`XmlDocument`] and a typed
//! view of the anchors in it. The view is rebuilt every time the tree's
//! anchor list changes, so callers can match on [`AnchorContent`] without
//! inspecting XML.
//!
//! Anchor order is render order: later anchors are drawn on top.

mod shapes;
mod zorder;

pub use shapes::{ClientAnchor, PictureType, EMU_PER_PIXEL};
pub use zorder::AnchorSnapshot;

use crate::error::{GraftError, Result};
use crate::package::Relationship;
use crate::xml::namespaces::{A, MC, R, XDR, XMLNS};
use crate::xml::{XAttribute, XName, XmlDocument, XmlNodeData};
use indextree::NodeId;
use serde::Serialize;

/// A cell corner plus an EMU offset into that cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct AnchorPoint {
    pub col: u32,
    pub col_off: i64,
    pub row: u32,
    pub row_off: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EmuSize {
    pub cx: i64,
    pub cy: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct EmuPoint {
    pub x: i64,
    pub y: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Placement {
    TwoCell { from: AnchorPoint, to: AnchorPoint },
    OneCell { from: AnchorPoint, ext: EmuSize },
    Absolute { pos: EmuPoint, ext: EmuSize },
}

impl Placement {
    pub fn kind(&self) -> PlacementKind {
        match self {
            Placement::TwoCell { .. } => PlacementKind::TwoCell,
            Placement::OneCell { .. } => PlacementKind::OneCell,
            Placement::Absolute { .. } => PlacementKind::Absolute,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum PlacementKind {
    TwoCell,
    OneCell,
    Absolute,
}

impl PlacementKind {
    pub fn element_name(self) -> XName {
        match self {
            PlacementKind::TwoCell => XDR::twoCellAnchor(),
            PlacementKind::OneCell => XDR::oneCellAnchor(),
            PlacementKind::Absolute => XDR::absoluteAnchor(),
        }
    }

    fn from_element(name: &XName) -> Option<Self> {
        if *name == XDR::twoCellAnchor() {
            Some(PlacementKind::TwoCell)
        } else if *name == XDR::oneCellAnchor() {
            Some(PlacementKind::OneCell)
        } else if *name == XDR::absoluteAnchor() {
            Some(PlacementKind::Absolute)
        } else {
            None
        }
    }
}

/// Non-visual properties shared by shapes, groups and pictures (`cNvPr`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShapeInfo {
    pub id: u32,
    pub name: String,
    pub hidden: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PictureInfo {
    pub shape: ShapeInfo,
    /// Relationship id of the embedded image (`a:blip/@r:embed`).
    pub embed: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum AnchorContent {
    Shape(ShapeInfo),
    ShapeGroup(ShapeInfo),
    Picture(PictureInfo),
    /// Connectors, graphic frames and anything else we do not model.
    Unsupported { element: String },
}

impl AnchorContent {
    pub fn info(&self) -> Option<&ShapeInfo> {
        match self {
            AnchorContent::Shape(info) | AnchorContent::ShapeGroup(info) => Some(info),
            AnchorContent::Picture(pic) => Some(&pic.shape),
            AnchorContent::Unsupported { .. } => None,
        }
    }

    pub fn name(&self) -> Option<&str> {
        self.info().map(|i| i.name.as_str())
    }

    pub fn kind(&self) -> &str {
        match self {
            AnchorContent::Shape(_) => "shape",
            AnchorContent::ShapeGroup(_) => "group",
            AnchorContent::Picture(_) => "picture",
            AnchorContent::Unsupported { element } => element,
        }
    }
}

/// Typed view of one anchor element in the drawing tree.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Anchor {
    /// The stacked element under `xdr:wsDr`: the anchor itself, or the
    /// `mc:AlternateContent` that wraps it.
    #[serde(skip)]
    pub node: NodeId,
    /// The `xdr:*Anchor` element. Same as `node` unless wrapped.
    #[serde(skip)]
    pub element: NodeId,
    pub placement: Placement,
    pub content: AnchorContent,
}

impl Anchor {
    pub fn name(&self) -> Option<&str> {
        self.content.name()
    }
}

pub struct Drawing {
    tree: XmlDocument,
    anchors: Vec<Anchor>,
    /// Relationships of the drawing part. Internal targets are package part
    /// names (`xl/media/image1.png`), not paths relative to the drawing.
    pub relationships: Vec<Relationship>,
}

impl std::fmt::Debug for Drawing {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Drawing")
            .field("anchors", &self.anchors)
            .field("relationships", &self.relationships)
            .finish()
    }
}

impl Drawing {
    /// An empty `xdr:wsDr`.
    pub fn new() -> Self {
        let mut tree = XmlDocument::new();
        tree.add_root(XmlNodeData::element_with_attrs(
            XDR::wsDr(),
            vec![
                XAttribute::new(XName::new(XMLNS::NS, "xdr"), XDR::NS),
                XAttribute::new(XName::new(XMLNS::NS, "a"), A::NS),
                XAttribute::new(XName::new(XMLNS::NS, "r"), R::NS),
            ],
        ));
        Self {
            tree,
            anchors: Vec::new(),
            relationships: Vec::new(),
        }
    }

    /// Wraps a parsed drawing part and classifies its anchors.
    pub fn from_tree(tree: XmlDocument, relationships: Vec<Relationship>) -> Result<Self> {
        let is_wsdr = tree
            .root()
            .and_then(|r| tree.get(r))
            .and_then(|d| d.name())
            .is_some_and(|n| *n == XDR::wsDr());
        if !is_wsdr {
            return Err(GraftError::XmlParse {
                message: "drawing root element is not xdr:wsDr".to_string(),
                location: "drawing".to_string(),
            });
        }

        let mut drawing = Self {
            tree,
            anchors: Vec::new(),
            relationships,
        };
        drawing.classify()?;
        Ok(drawing)
    }

    pub fn tree(&self) -> &XmlDocument {
        &self.tree
    }

    pub fn to_xml_bytes(&self) -> Result<Vec<u8>> {
        crate::xml::builder::serialize_bytes(&self.tree)
    }

    pub fn anchors(&self) -> &[Anchor] {
        &self.anchors
    }

    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }

    /// Names of the named anchors, in render order.
    pub fn names(&self) -> Vec<&str> {
        self.anchors.iter().filter_map(|a| a.name()).collect()
    }

    /// First shape, group or picture called `name`.
    pub fn find_by_name(&self, name: &str) -> Option<&Anchor> {
        self.anchors.iter().find(|a| a.name() == Some(name))
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.anchors.iter().position(|a| a.name() == Some(name))
    }

    /// Drops the anchors whose content is a graphic frame (charts).
    /// Returns how many were removed.
    pub(crate) fn remove_graphic_frames(&mut self) -> Result<usize> {
        let frames: Vec<NodeId> = self
            .anchors
            .iter()
            .filter(|a| matches!(&a.content, AnchorContent::Unsupported { element } if element == "graphicFrame"))
            .map(|a| a.node)
            .collect();
        for node in &frames {
            self.tree.remove_subtree(*node);
        }
        if !frames.is_empty() {
            self.classify()?;
        }
        Ok(frames.len())
    }

    /// Rebuilds the typed anchor list from the tree.
    fn classify(&mut self) -> Result<()> {
        let root = self.root()?;
        let mut anchors = Vec::new();

        for node in self.tree.element_children(root) {
            let Some((element, kind)) = anchor_element(&self.tree, node) else {
                continue;
            };
            let position = anchors.len();
            let placement = parse_placement(&self.tree, element, kind).ok_or_else(|| {
                GraftError::XmlParse {
                    message: "anchor is missing its position".to_string(),
                    location: format!("drawing anchor {}", position),
                }
            })?;
            let content = classify_content(&self.tree, element);
            anchors.push(Anchor {
                node,
                element,
                placement,
                content,
            });
        }

        self.anchors = anchors;
        Ok(())
    }

    fn root(&self) -> Result<NodeId> {
        self.tree.root().ok_or_else(|| GraftError::XmlParse {
            message: "drawing has no root element".to_string(),
            location: "drawing".to_string(),
        })
    }

    /// Picture relationship targets referenced by this drawing.
    pub fn media_parts(&self) -> Vec<&str> {
        self.relationships
            .iter()
            .filter(|r| r.rel_type == crate::package::relationships::relationship_types::IMAGE)
            .filter(|r| !r.is_external())
            .map(|r| r.target.as_str())
            .collect()
    }
}

impl Default for Drawing {
    fn default() -> Self {
        Self::new()
    }
}

fn placement_kind(doc: &XmlDocument, node: NodeId) -> Option<PlacementKind> {
    doc.get(node)?.name().and_then(PlacementKind::from_element)
}

/// The anchor element behind a child of `xdr:wsDr`. For
/// `mc:AlternateContent` that is the anchor of the first `mc:Choice`, or of
/// `mc:Fallback` when no choice holds one.
fn anchor_element(doc: &XmlDocument, node: NodeId) -> Option<(NodeId, PlacementKind)> {
    if let Some(kind) = placement_kind(doc, node) {
        return Some((node, kind));
    }
    if doc.get(node)?.name()? != &MC::AlternateContent() {
        return None;
    }
    let branches = doc
        .elements_by_name(node, &MC::Choice())
        .chain(doc.elements_by_name(node, &MC::Fallback()))
        .collect::<Vec<_>>();
    branches.into_iter().find_map(|branch| {
        doc.element_children(branch)
            .find_map(|child| placement_kind(doc, child).map(|kind| (child, kind)))
    })
}

fn child_named(doc: &XmlDocument, node: NodeId, name: &XName) -> Option<NodeId> {
    doc.first_element(node, name)
}

fn parse_i64(doc: &XmlDocument, node: NodeId) -> Option<i64> {
    doc.inner_text(node).trim().parse().ok()
}

fn parse_anchor_point(doc: &XmlDocument, node: NodeId) -> Option<AnchorPoint> {
    let field = |name: XName| child_named(doc, node, &name).and_then(|n| parse_i64(doc, n));
    Some(AnchorPoint {
        col: u32::try_from(field(XDR::col())?).ok()?,
        col_off: field(XDR::colOff()).unwrap_or(0),
        row: u32::try_from(field(XDR::row())?).ok()?,
        row_off: field(XDR::rowOff()).unwrap_or(0),
    })
}

fn parse_attr_i64(doc: &XmlDocument, node: NodeId, name: &str) -> Option<i64> {
    doc.attribute_local(node, name)?.trim().parse().ok()
}

fn parse_ext(doc: &XmlDocument, node: NodeId) -> Option<EmuSize> {
    let ext = child_named(doc, node, &XDR::ext())?;
    Some(EmuSize {
        cx: parse_attr_i64(doc, ext, "cx")?,
        cy: parse_attr_i64(doc, ext, "cy")?,
    })
}

fn parse_placement(doc: &XmlDocument, node: NodeId, kind: PlacementKind) -> Option<Placement> {
    match kind {
        PlacementKind::TwoCell => Some(Placement::TwoCell {
            from: parse_anchor_point(doc, child_named(doc, node, &XDR::from())?)?,
            to: parse_anchor_point(doc, child_named(doc, node, &XDR::to())?)?,
        }),
        PlacementKind::OneCell => Some(Placement::OneCell {
            from: parse_anchor_point(doc, child_named(doc, node, &XDR::from())?)?,
            ext: parse_ext(doc, node)?,
        }),
        PlacementKind::Absolute => {
            let pos = child_named(doc, node, &XDR::pos())?;
            Some(Placement::Absolute {
                pos: EmuPoint {
                    x: parse_attr_i64(doc, pos, "x")?,
                    y: parse_attr_i64(doc, pos, "y")?,
                },
                ext: parse_ext(doc, node)?,
            })
        }
    }
}

/// The object element of an anchor: the first child that is not geometry or
/// client data.
fn content_element(doc: &XmlDocument, anchor: NodeId) -> Option<NodeId> {
    let geometry = [XDR::from(), XDR::to(), XDR::pos(), XDR::ext(), XDR::clientData()];
    doc.element_children(anchor).find(|&child| {
        doc.get(child)
            .and_then(|d| d.name())
            .is_some_and(|n| !geometry.contains(n))
    })
}

/// The `cNvPr` element of a shape, group or picture element.
pub(crate) fn c_nv_pr(doc: &XmlDocument, object: NodeId) -> Option<NodeId> {
    let name = doc.get(object)?.name()?.clone();
    let nv = if name == XDR::sp() {
        XDR::nvSpPr()
    } else if name == XDR::grpSp() {
        XDR::nvGrpSpPr()
    } else if name == XDR::pic() {
        XDR::nvPicPr()
    } else {
        return None;
    };
    child_named(doc, child_named(doc, object, &nv)?, &XDR::cNvPr())
}

fn shape_info(doc: &XmlDocument, object: NodeId) -> Option<ShapeInfo> {
    let c_nv_pr = c_nv_pr(doc, object)?;
    Some(ShapeInfo {
        id: doc
            .attribute_local(c_nv_pr, "id")
            .and_then(|v| v.parse().ok())
            .unwrap_or(0),
        name: doc.attribute_local(c_nv_pr, "name").unwrap_or("").to_string(),
        hidden: matches!(doc.attribute_local(c_nv_pr, "hidden"), Some("1" | "true")),
    })
}

fn classify_content(doc: &XmlDocument, anchor: NodeId) -> AnchorContent {
    let Some(object) = content_element(doc, anchor) else {
        return AnchorContent::Unsupported {
            element: String::new(),
        };
    };
    let Some(name) = doc.get(object).and_then(|d| d.name()).cloned() else {
        return AnchorContent::Unsupported {
            element: String::new(),
        };
    };

    let unsupported = || AnchorContent::Unsupported {
        element: name.local_name.clone(),
    };

    if name == XDR::sp() {
        shape_info(doc, object).map(AnchorContent::Shape).unwrap_or_else(unsupported)
    } else if name == XDR::grpSp() {
        shape_info(doc, object)
            .map(AnchorContent::ShapeGroup)
            .unwrap_or_else(unsupported)
    } else if name == XDR::pic() {
        let Some(shape) = shape_info(doc, object) else {
            return unsupported();
        };
        let embed = child_named(doc, object, &XDR::blipFill())
            .and_then(|fill| child_named(doc, fill, &A::blip()))
            .and_then(|blip| doc.attribute(blip, &R::embed()))
            .map(|s| s.to_string());
        AnchorContent::Picture(PictureInfo { shape, embed })
    } else {
        unsupported()
    }
}
