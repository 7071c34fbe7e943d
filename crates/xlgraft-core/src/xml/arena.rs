use super::node::{XAttribute, XName, XmlNodeData};
use indextree::{Arena, NodeId};

/// Arena-backed XML tree.
///
/// Nodes are owned by the document. Removing a subtree kills its `NodeId`s:
/// `get` returns `None` for them afterwards, so a detached node can never be
/// re-attached. Moving content between positions means copying it into fresh
/// nodes (see [`XmlDocument::import_subtree`]).
#[derive(Default)]
pub struct XmlDocument {
    arena: Arena<XmlNodeData>,
    root: Option<NodeId>,
}

impl XmlDocument {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&XmlNodeData> {
        let node = self.arena.get(id)?;
        (!node.is_removed()).then(|| node.get())
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut XmlNodeData> {
        let node = self.arena.get_mut(id)?;
        if node.is_removed() {
            return None;
        }
        Some(node.get_mut())
    }

    /// True while `id` still belongs to the tree.
    pub fn is_live(&self, id: NodeId) -> bool {
        self.get(id).is_some()
    }

    /// Makes `data` the document element. A previous root is forgotten, not
    /// removed.
    pub fn add_root(&mut self, data: XmlNodeData) -> NodeId {
        let id = self.arena.new_node(data);
        self.root = Some(id);
        id
    }

    /// Appends `data` as the last child of `parent`.
    pub fn add_child(&mut self, parent: NodeId, data: XmlNodeData) -> NodeId {
        let id = self.arena.new_node(data);
        parent.append(id, &mut self.arena);
        id
    }

    pub fn add_element(&mut self, parent: NodeId, name: XName, attributes: Vec<XAttribute>) -> NodeId {
        self.add_child(parent, XmlNodeData::element_with_attrs(name, attributes))
    }

    /// Appends `<name>text</name>` under `parent`.
    pub fn add_text_element(&mut self, parent: NodeId, name: XName, text: &str) -> NodeId {
        let element = self.add_element(parent, name, Vec::new());
        self.add_child(element, XmlNodeData::text(text));
        element
    }

    /// Removes `node` and everything below it.
    pub fn remove_subtree(&mut self, node: NodeId) {
        if self.root == Some(node) {
            self.root = None;
        }
        node.remove_subtree(&mut self.arena);
    }

    /// Deep-copies `source_node` out of `source` and appends the copy under
    /// `parent`. Returns the id of the new top node, or `None` when
    /// `source_node` is dead.
    pub fn import_subtree(&mut self, parent: NodeId, source: &XmlDocument, source_node: NodeId) -> Option<NodeId> {
        let top = self.add_child(parent, source.get(source_node)?.clone());
        self.import_children(top, source, source_node);
        Some(top)
    }

    /// Like [`XmlDocument::import_subtree`], but places the copy directly
    /// before `sibling`.
    pub fn import_subtree_before(&mut self, sibling: NodeId, source: &XmlDocument, source_node: NodeId) -> Option<NodeId> {
        if !self.is_live(sibling) {
            return None;
        }
        let top = self.arena.new_node(source.get(source_node)?.clone());
        sibling.insert_before(top, &mut self.arena);
        self.import_children(top, source, source_node);
        Some(top)
    }

    fn import_children(&mut self, top: NodeId, source: &XmlDocument, source_node: NodeId) {
        // Explicit stack of (source, destination parent) pairs; drawing
        // groups can nest deeply.
        let mut pending: Vec<(NodeId, NodeId)> = source
            .children(source_node)
            .map(|child| (child, top))
            .collect::<Vec<_>>()
            .into_iter()
            .rev()
            .collect();
        while let Some((node, into)) = pending.pop() {
            let Some(data) = source.get(node) else {
                continue;
            };
            let copy = self.add_child(into, data.clone());
            let children: Vec<NodeId> = source.children(node).collect();
            pending.extend(children.into_iter().rev().map(|child| (child, copy)));
        }
    }

    pub fn set_attribute(&mut self, node: NodeId, name: &XName, value: &str) {
        let Some(attrs) = self.get_mut(node).and_then(XmlNodeData::attributes_mut) else {
            return;
        };
        match attrs.iter_mut().find(|a| &a.name == name) {
            Some(existing) => existing.value = value.to_string(),
            None => attrs.push(XAttribute::new(name.clone(), value)),
        }
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &XName) {
        if let Some(attrs) = self.get_mut(node).and_then(XmlNodeData::attributes_mut) {
            attrs.retain(|a| &a.name != name);
        }
    }

    fn find_attribute(&self, node: NodeId, matches: impl Fn(&XName) -> bool) -> Option<&str> {
        self.get(node)?
            .attributes()?
            .iter()
            .find(|a| matches(&a.name))
            .map(|a| a.value.as_str())
    }

    /// Attribute value by exact name.
    pub fn attribute(&self, node: NodeId, name: &XName) -> Option<&str> {
        self.find_attribute(node, |n| n == name)
    }

    /// Attribute value by local name, ignoring the namespace.
    pub fn attribute_local(&self, node: NodeId, local_name: &str) -> Option<&str> {
        self.find_attribute(node, |n| n.local_name == local_name)
    }

    pub fn children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        parent.children(&self.arena)
    }

    pub fn element_children(&self, parent: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.children(parent)
            .filter(move |&id| self.get(id).is_some_and(XmlNodeData::is_element))
    }

    /// `node` itself followed by everything below it, in document order.
    pub fn descendants(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.descendants(&self.arena)
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.parent()
    }

    /// `node` itself followed by its parent, grandparent and so on.
    pub fn ancestors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.ancestors(&self.arena)
    }

    /// Direct children of `parent` called `name`.
    pub fn elements_by_name<'a>(&'a self, parent: NodeId, name: &'a XName) -> impl Iterator<Item = NodeId> + 'a {
        self.children(parent)
            .filter(move |&id| self.get(id).and_then(XmlNodeData::name) == Some(name))
    }

    pub fn first_element(&self, parent: NodeId, name: &XName) -> Option<NodeId> {
        self.elements_by_name(parent, name).next()
    }

    /// First element called `name` at or below `node`.
    pub fn find_descendant(&self, node: NodeId, name: &XName) -> Option<NodeId> {
        self.descendants(node)
            .find(|&id| self.get(id).and_then(XmlNodeData::name) == Some(name))
    }

    /// Concatenated text of the direct text children of `node`.
    pub fn inner_text(&self, node: NodeId) -> String {
        self.children(node)
            .filter_map(|child| self.get(child).and_then(XmlNodeData::text_content))
            .collect()
    }

    /// Replaces all children of `node` with a single text node.
    pub fn set_text(&mut self, node: NodeId, content: &str) {
        let children: Vec<NodeId> = self.children(node).collect();
        for child in children {
            self.remove_subtree(child);
        }
        self.add_child(node, XmlNodeData::text(content));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn anchor_list() -> (XmlDocument, NodeId) {
        let mut doc = XmlDocument::new();
        let root = doc.add_root(XmlNodeData::element(XName::local("wsDr")));
        for name in ["A", "B"] {
            let anchor = doc.add_element(root, XName::local("twoCellAnchor"), Vec::new());
            let sp = doc.add_element(anchor, XName::local("sp"), Vec::new());
            doc.add_element(sp, XName::local("cNvPr"), vec![XAttribute::local("name", name)]);
            doc.add_text_element(sp, XName::local("t"), &format!("text {}", name));
        }
        (doc, root)
    }

    #[test]
    fn children_keep_insertion_order() {
        let (doc, root) = anchor_list();
        let names: Vec<_> = doc
            .element_children(root)
            .filter_map(|a| doc.find_descendant(a, &XName::local("cNvPr")))
            .filter_map(|n| doc.attribute_local(n, "name"))
            .collect();
        assert_eq!(names, vec!["A", "B"]);
    }

    #[test]
    fn set_attribute_replaces_in_place() {
        let (mut doc, root) = anchor_list();
        let c_nv_pr = doc.find_descendant(root, &XName::local("cNvPr")).unwrap();
        let hidden = XName::local("hidden");

        doc.set_attribute(c_nv_pr, &hidden, "0");
        doc.set_attribute(c_nv_pr, &hidden, "1");
        assert_eq!(doc.attribute(c_nv_pr, &hidden), Some("1"));
        assert_eq!(doc.get(c_nv_pr).unwrap().attributes().unwrap().len(), 2);

        doc.remove_attribute(c_nv_pr, &hidden);
        assert_eq!(doc.attribute_local(c_nv_pr, "hidden"), None);
    }

    #[test]
    fn removed_subtree_ids_are_dead() {
        let (mut doc, root) = anchor_list();
        let first = doc.element_children(root).next().unwrap();
        let inner: Vec<NodeId> = doc.descendants(first).collect();

        doc.remove_subtree(first);

        assert!(inner.iter().all(|&id| !doc.is_live(id)));
        assert_eq!(doc.element_children(root).count(), 1);
        assert_eq!(doc.ancestors(root).count(), 1);
    }

    #[test]
    fn import_subtree_creates_fresh_nodes() {
        let (source, src_root) = anchor_list();
        let anchor = source.element_children(src_root).nth(1).unwrap();

        let mut target = XmlDocument::new();
        let root = target.add_root(XmlNodeData::element(XName::local("wsDr")));
        let copy = target.import_subtree(root, &source, anchor).unwrap();

        let t = target.find_descendant(copy, &XName::local("t")).unwrap();
        assert_eq!(target.inner_text(t), "text B");
        assert_eq!(target.parent(copy), Some(root));

        target.set_text(t, "changed");
        let original = source.find_descendant(anchor, &XName::local("t")).unwrap();
        assert_eq!(source.inner_text(original), "text B");
        assert_eq!(
            target.descendants(copy).count(),
            source.descendants(anchor).count()
        );
    }

    #[test]
    fn import_before_keeps_sibling_position() {
        let (source, src_root) = anchor_list();
        let (mut target, root) = anchor_list();
        let anchor = source.element_children(src_root).nth(1).unwrap();
        let second = target.element_children(root).nth(1).unwrap();

        let copy = target.import_subtree_before(second, &source, anchor).unwrap();
        let order: Vec<NodeId> = target.element_children(root).collect();
        assert_eq!(order.len(), 3);
        assert_eq!(order[1], copy);
        assert_eq!(order[2], second);

        target.remove_subtree(second);
        assert_eq!(target.import_subtree_before(second, &source, anchor), None);
    }
}
