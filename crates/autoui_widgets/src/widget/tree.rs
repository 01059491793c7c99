//! Widget tree for hierarchical UI management.

use super::{ControlPath, WidgetFlags, WidgetId, WidgetNode};
use crate::layout::{PanelLayout, Rect};
use std::collections::HashMap;

/// Manages the widget hierarchy.
pub struct WidgetTree {
    /// Widgets indexed by ID.
    widgets: HashMap<WidgetId, WidgetNode>,
    /// Root widget IDs.
    roots: Vec<WidgetId>,
    /// Parent-child relationships.
    children: HashMap<WidgetId, Vec<WidgetId>>,
    /// ID counter for generating unique IDs.
    next_id: u64,
    /// Number of re-flow requests since creation.
    layout_requests: u64,
}

impl WidgetTree {
    /// Creates a new empty widget tree.
    #[must_use]
    pub fn new() -> Self {
        Self {
            widgets: HashMap::with_capacity(256),
            roots: Vec::with_capacity(16),
            children: HashMap::with_capacity(256),
            next_id: 1,
            layout_requests: 0,
        }
    }

    fn next_id(&mut self) -> WidgetId {
        let id = WidgetId::new(self.next_id);
        self.next_id += 1;
        id
    }

    /// Inserts a root widget and returns its ID.
    pub fn add_root(&mut self, mut node: WidgetNode) -> WidgetId {
        let id = self.next_id();
        node.id = id;
        node.parent = None;
        self.widgets.insert(id, node);
        self.roots.push(id);
        self.children.insert(id, Vec::new());
        id
    }

    /// Appends a child widget to a parent and returns its ID.
    pub fn add_child(&mut self, parent: WidgetId, mut node: WidgetNode) -> WidgetId {
        let id = self.next_id();
        node.id = id;
        node.parent = Some(parent);

        self.widgets.insert(id, node);
        self.children.entry(parent).or_default().push(id);
        self.children.insert(id, Vec::new());
        id
    }

    /// Removes a widget and all its children.
    pub fn remove(&mut self, id: WidgetId) {
        // Remove all children first
        if let Some(children) = self.children.remove(&id) {
            for child in children {
                self.remove(child);
            }
        }

        // Remove from parent's children list
        if let Some(node) = self.widgets.get(&id) {
            if let Some(parent) = node.parent {
                if let Some(siblings) = self.children.get_mut(&parent) {
                    siblings.retain(|&c| c != id);
                }
            }
        }

        // Remove from roots if it was a root
        self.roots.retain(|&r| r != id);

        self.widgets.remove(&id);
    }

    /// Gets a widget by ID.
    #[must_use]
    pub fn get(&self, id: WidgetId) -> Option<&WidgetNode> {
        self.widgets.get(&id)
    }

    /// Gets mutable access to a widget.
    #[must_use]
    pub fn get_mut(&mut self, id: WidgetId) -> Option<&mut WidgetNode> {
        self.widgets.get_mut(&id)
    }

    /// Returns the number of widgets in the tree.
    #[must_use]
    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    /// Returns true if the tree holds no widgets.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    /// Returns the children of a widget.
    #[must_use]
    pub fn children(&self, id: WidgetId) -> &[WidgetId] {
        self.children.get(&id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Returns the parent of a widget.
    #[must_use]
    pub fn parent(&self, id: WidgetId) -> Option<WidgetId> {
        self.widgets.get(&id).and_then(|n| n.parent)
    }

    /// Returns all root widgets.
    #[must_use]
    pub fn roots(&self) -> &[WidgetId] {
        &self.roots
    }

    /// Position of a widget among its siblings.
    #[must_use]
    pub fn sibling_index(&self, id: WidgetId) -> Option<usize> {
        let siblings = match self.parent(id) {
            Some(parent) => self.children(parent),
            None => &self.roots,
        };
        siblings.iter().position(|&s| s == id)
    }

    /// Follows a control path down from `from`.
    #[must_use]
    pub fn resolve_path(&self, from: WidgetId, path: &ControlPath) -> Option<WidgetId> {
        path.segments()
            .iter()
            .try_fold(from, |current, &index| self.children(current).get(index).copied())
    }

    /// Control path from `ancestor` down to `id`, if `ancestor` is above it.
    #[must_use]
    pub fn path_from(&self, ancestor: WidgetId, id: WidgetId) -> Option<ControlPath> {
        let mut segments = Vec::new();
        let mut current = id;
        while current != ancestor {
            segments.push(self.sibling_index(current)?);
            current = self.parent(current)?;
        }
        segments.reverse();
        Some(ControlPath::from(segments))
    }

    /// Returns all widget IDs in depth-first order.
    pub fn iter_dfs(&self) -> impl Iterator<Item = WidgetId> + '_ {
        WidgetDfsIterator {
            tree: self,
            stack: self.roots.iter().rev().copied().collect(),
        }
    }

    /// Returns `id` and all its descendants in depth-first order.
    pub fn descendants(&self, id: WidgetId) -> impl Iterator<Item = WidgetId> + '_ {
        WidgetDfsIterator {
            tree: self,
            stack: if self.widgets.contains_key(&id) { vec![id] } else { Vec::new() },
        }
    }

    /// Returns true if the widget and every ancestor are shown.
    #[must_use]
    pub fn is_visible(&self, id: WidgetId) -> bool {
        let mut current = Some(id);
        while let Some(cid) = current {
            match self.widgets.get(&cid) {
                Some(node) if node.is_shown() => current = node.parent,
                _ => return false,
            }
        }
        true
    }

    /// Deep-copies the subtree rooted at `source` under `new_parent`.
    ///
    /// Returns the id of the copy's root.
    pub fn clone_subtree(&mut self, source: WidgetId, new_parent: WidgetId) -> Option<WidgetId> {
        let node = self.widgets.get(&source)?.clone();
        let copy = self.add_child(new_parent, node);
        let children = self.children(source).to_vec();
        for child in children {
            self.clone_subtree(child, copy);
        }
        Some(copy)
    }

    /// Marks a widget as needing a layout pass.
    pub fn request_layout(&mut self, id: WidgetId) {
        if let Some(node) = self.widgets.get_mut(&id) {
            node.flags.set(WidgetFlags::DIRTY_LAYOUT);
            self.layout_requests += 1;
        }
    }

    /// Number of layout re-flow requests so far.
    #[must_use]
    pub fn layout_requests(&self) -> u64 {
        self.layout_requests
    }

    /// Positions `id` at `bounds` and lays out its shown descendants.
    pub fn reflow(&mut self, id: WidgetId, bounds: Rect) {
        let Some(node) = self.widgets.get_mut(&id) else {
            return;
        };
        node.rect = bounds;
        node.flags.clear(WidgetFlags::DIRTY_LAYOUT);
        let layout = node.layout.unwrap_or_else(PanelLayout::vertical);

        let shown: Vec<WidgetId> = self
            .children(id)
            .iter()
            .copied()
            .filter(|c| self.widgets.get(c).is_some_and(WidgetNode::is_shown))
            .collect();
        let sizing: Vec<_> = shown.iter().map(|c| self.widgets[c].sizing).collect();
        let rects = layout.arrange(bounds, &sizing);
        tracing::trace!(widget = %id, children = shown.len(), "reflow");

        for (child, rect) in shown.into_iter().zip(rects) {
            self.reflow(child, rect);
        }
    }
}

impl Default for WidgetTree {
    fn default() -> Self {
        Self::new()
    }
}

/// Depth-first iterator over widget tree.
struct WidgetDfsIterator<'a> {
    tree: &'a WidgetTree,
    stack: Vec<WidgetId>,
}

impl Iterator for WidgetDfsIterator<'_> {
    type Item = WidgetId;

    fn next(&mut self) -> Option<Self::Item> {
        let id = self.stack.pop()?;

        // Push children in reverse order so they're processed left-to-right
        if let Some(children) = self.tree.children.get(&id) {
            for &child in children.iter().rev() {
                self.stack.push(child);
            }
        }

        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::widget::ControlType;

    fn panel() -> WidgetNode {
        WidgetNode::new(ControlType::Panel)
    }

    #[test]
    fn test_tree_hierarchy() {
        let mut tree = WidgetTree::new();

        let root_id = tree.add_root(panel());
        tree.add_child(root_id, panel());
        tree.add_child(root_id, panel());

        assert_eq!(tree.children(root_id).len(), 2);
        assert_eq!(tree.roots().len(), 1);
    }

    #[test]
    fn test_control_paths_round_trip() {
        let mut tree = WidgetTree::new();
        let root = tree.add_root(panel());
        let a = tree.add_child(root, panel());
        let b = tree.add_child(root, panel());
        let leaf = tree.add_child(b, WidgetNode::new(ControlType::Button));

        let path = tree.path_from(root, leaf).unwrap();
        assert_eq!(path.segments(), &[1, 0]);
        assert_eq!(tree.resolve_path(root, &path), Some(leaf));
        assert_eq!(tree.path_from(a, leaf), None);
        assert_eq!(tree.resolve_path(root, &ControlPath::from(vec![0, 3])), None);
    }

    #[test]
    fn test_clone_subtree_copies_structure() {
        let mut tree = WidgetTree::new();
        let root = tree.add_root(panel());
        let source = tree.add_child(root, panel().named("row"));
        tree.add_child(source, WidgetNode::new(ControlType::Label));
        tree.add_child(source, WidgetNode::new(ControlType::Button));

        let copy = tree.clone_subtree(source, root).unwrap();

        assert_ne!(copy, source);
        assert_eq!(tree.get(copy).unwrap().name, "row");
        assert_eq!(tree.children(copy).len(), 2);
        assert_eq!(tree.descendants(root).count(), 7);
    }

    #[test]
    fn test_remove_detaches_subtree() {
        let mut tree = WidgetTree::new();
        let root = tree.add_root(panel());
        let child = tree.add_child(root, panel());
        tree.add_child(child, panel());

        tree.remove(child);

        assert_eq!(tree.len(), 1);
        assert!(tree.children(root).is_empty());
    }

    #[test]
    fn test_hidden_ancestor_hides_descendants() {
        let mut tree = WidgetTree::new();
        let root = tree.add_root(panel());
        let child = tree.add_child(root, WidgetNode::new(ControlType::Label));
        assert!(tree.is_visible(child));

        tree.get_mut(root).unwrap().flags.set(WidgetFlags::SUPPRESSED);
        assert!(!tree.is_visible(child));
    }

    #[test]
    fn test_reflow_skips_hidden_children() {
        let mut tree = WidgetTree::new();
        let root = tree.add_root(panel());
        let mut tall = WidgetNode::new(ControlType::Label);
        tall.sizing.preferred_height = 30.0;
        let hidden = tree.add_child(root, tall.clone());
        tree.get_mut(hidden).unwrap().flags.clear(WidgetFlags::VISIBLE);
        let shown = tree.add_child(root, tall);

        tree.request_layout(root);
        tree.reflow(root, Rect::new(0.0, 0.0, 100.0, 100.0));

        assert_eq!(tree.get(shown).unwrap().rect.y, 0.0);
        assert_eq!(tree.get(shown).unwrap().rect.height, 30.0);
        assert!(!tree.get(root).unwrap().flags.has(WidgetFlags::DIRTY_LAYOUT));
        assert_eq!(tree.layout_requests(), 1);
    }
}
