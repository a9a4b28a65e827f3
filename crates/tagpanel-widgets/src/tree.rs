//! Tree model for the file and album views
//!
//! Nodes live in an arena keyed by [`NodeId`]. A node only refers to its
//! domain object through an [`ObjectRef`]; the reverse link (object → node)
//! is the model's side-table, so every view holds at most one node per object
//! and removing a node always clears its entry.
//!
//! Selection, expansion and sort state are stored per node id, which is what
//! lets the reconciler rebind nodes to new objects without the user losing
//! their place.

use std::cmp::Ordering;
use std::collections::{HashMap, HashSet};

use tagpanel_core::{ObjectRef, Rgb};

use crate::theme::Icon;

/// Handle of a node inside one [`TreeModel`]. Never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Display state of one column of a node
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Cell {
    pub text: String,
    /// `None` uses the theme text color
    pub foreground: Option<Rgb>,
    /// `None` leaves the row background alone
    pub background: Option<Rgb>,
}

impl Cell {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            ..Default::default()
        }
    }
}

/// Active header sort
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub column: usize,
    pub ascending: bool,
    /// Compare [`TreeNode::length`] instead of the cell text
    pub numeric: bool,
}

/// Ordering between two sortable siblings for a given sort
pub type Comparator = fn(&TreeNode, &TreeNode, &SortSpec) -> Ordering;

/// Numeric on length for the duration column, case-insensitive text otherwise
pub fn default_comparator(a: &TreeNode, b: &TreeNode, order: &SortSpec) -> Ordering {
    if order.numeric {
        return a.length.cmp(&b.length);
    }
    let text = |node: &TreeNode| {
        node.cells
            .get(order.column)
            .map(|c| c.text.to_lowercase())
            .unwrap_or_default()
    };
    text(a).cmp(&text(b))
}

/// Modifier keys held during a selection click
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SelectModifiers {
    /// Shift key held (for range selection)
    pub shift: bool,
    /// Ctrl/Cmd key held (for toggle selection)
    pub ctrl: bool,
}

#[derive(Debug, Clone)]
pub struct TreeNode {
    /// Backing object; `None` once the node has been unbound
    pub object: Option<ObjectRef>,
    pub parent: Option<NodeId>,
    pub children: Vec<NodeId>,
    /// `None` keeps the node in place when its siblings are sorted
    pub comparator: Option<Comparator>,
    pub icon: Option<Icon>,
    pub cells: Vec<Cell>,
    pub bold: bool,
    pub hidden: bool,
    /// Duration in milliseconds, for numeric sorting
    pub length: u64,
}

impl TreeNode {
    fn new(object: ObjectRef, comparator: Option<Comparator>) -> Self {
        Self {
            object: Some(object),
            parent: None,
            children: Vec::new(),
            comparator,
            icon: None,
            cells: Vec::new(),
            bold: false,
            hidden: false,
            length: 0,
        }
    }

    pub fn is_sortable(&self) -> bool {
        self.comparator.is_some()
    }

    /// Text of the first column
    pub fn label(&self) -> &str {
        self.cells.first().map(|c| c.text.as_str()).unwrap_or("")
    }
}

/// A visible row: node plus indentation depth
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Row {
    pub node: NodeId,
    pub depth: usize,
}

/// Node arena plus per-view UI state
#[derive(Debug, Default)]
pub struct TreeModel {
    nodes: HashMap<NodeId, TreeNode>,
    roots: Vec<NodeId>,
    /// object → node side-table
    index: HashMap<ObjectRef, NodeId>,
    expanded: HashSet<NodeId>,
    selected: HashSet<NodeId>,
    anchor: Option<NodeId>,
    selection_changed: bool,
    selected_updated: bool,
    sort: Option<SortSpec>,
    /// Column whose right edge is being dragged
    resizing: Option<usize>,
    next_id: u64,
}

impl TreeModel {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn node(&self, id: NodeId) -> Option<&TreeNode> {
        self.nodes.get(&id)
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut TreeNode> {
        self.nodes.get_mut(&id)
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn object(&self, id: NodeId) -> Option<ObjectRef> {
        self.nodes.get(&id).and_then(|n| n.object)
    }

    pub fn roots(&self) -> &[NodeId] {
        &self.roots
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.nodes
            .get(&id)
            .map(|n| n.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|n| n.parent)
    }

    /// Node currently bound to `object`
    pub fn node_for(&self, object: ObjectRef) -> Option<NodeId> {
        self.index.get(&object).copied()
    }

    /// Create a detached node bound to `object`
    pub fn create_node(&mut self, object: ObjectRef, comparator: Option<Comparator>) -> NodeId {
        self.next_id += 1;
        let id = NodeId(self.next_id);
        self.nodes.insert(id, TreeNode::new(object, comparator));
        self.bind(id, object);
        id
    }

    /// Append detached nodes under `parent` (top level when `None`)
    pub fn attach(&mut self, parent: Option<NodeId>, children: &[NodeId]) {
        let end = match parent {
            Some(p) => self.children(p).len(),
            None => self.roots.len(),
        };
        self.insert_children(parent, end, children);
    }

    /// Insert detached nodes under `parent` starting at `index`, in order
    pub fn insert_children(&mut self, parent: Option<NodeId>, index: usize, children: &[NodeId]) {
        for child in children {
            if let Some(node) = self.nodes.get_mut(child) {
                node.parent = parent;
            }
        }
        let list = match parent {
            Some(p) => match self.nodes.get_mut(&p) {
                Some(node) => &mut node.children,
                None => return,
            },
            None => &mut self.roots,
        };
        let index = index.min(list.len());
        list.splice(index..index, children.iter().copied());
    }

    /// Create a node for `object` and append it under `parent`
    pub fn add_node(
        &mut self,
        parent: Option<NodeId>,
        object: ObjectRef,
        comparator: Option<Comparator>,
    ) -> NodeId {
        let id = self.create_node(object, comparator);
        self.attach(parent, &[id]);
        id
    }

    /// Point `node` at `object`, taking the object over from any other node
    pub fn bind(&mut self, node: NodeId, object: ObjectRef) {
        if !self.nodes.contains_key(&node) {
            return;
        }
        if let Some(previous) = self.index.insert(object, node) {
            if previous != node {
                if let Some(prev) = self.nodes.get_mut(&previous) {
                    prev.object = None;
                }
            }
        }
        let old = self
            .nodes
            .get_mut(&node)
            .and_then(|n| n.object.replace(object));
        if let Some(old) = old {
            if old != object && self.index.get(&old) == Some(&node) {
                self.index.remove(&old);
            }
        }
    }

    /// Drop the object link of `node`
    pub fn unbind(&mut self, node: NodeId) {
        let Some(object) = self.nodes.get_mut(&node).and_then(|n| n.object.take()) else {
            return;
        };
        if self.index.get(&object) == Some(&node) {
            self.index.remove(&object);
        }
    }

    /// Remove a node and its subtree, clearing links and UI state
    pub fn remove_node(&mut self, id: NodeId) {
        let Some(parent) = self.nodes.get(&id).map(|n| n.parent) else {
            return;
        };
        match parent {
            Some(p) => {
                if let Some(node) = self.nodes.get_mut(&p) {
                    node.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|c| *c != id),
        }
        self.drop_subtree(id);
    }

    /// Remove every child of `id`
    pub fn clear_children(&mut self, id: NodeId) {
        let children = match self.nodes.get_mut(&id) {
            Some(node) => std::mem::take(&mut node.children),
            None => return,
        };
        for child in children {
            self.drop_subtree(child);
        }
    }

    fn drop_subtree(&mut self, id: NodeId) {
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            self.unbind(current);
            let Some(node) = self.nodes.remove(&current) else {
                continue;
            };
            stack.extend(node.children);
            self.expanded.remove(&current);
            if self.selected.remove(&current) {
                self.selection_changed = true;
            }
            if self.anchor == Some(current) {
                self.anchor = None;
            }
        }
    }

    // --- visibility / expansion ---

    pub fn set_hidden(&mut self, id: NodeId, hidden: bool) {
        if let Some(node) = self.nodes.get_mut(&id) {
            node.hidden = hidden;
        }
    }

    pub fn is_hidden(&self, id: NodeId) -> bool {
        self.nodes.get(&id).map(|n| n.hidden).unwrap_or(false)
    }

    pub fn is_expanded(&self, id: NodeId) -> bool {
        self.expanded.contains(&id)
    }

    pub fn set_expanded(&mut self, id: NodeId, expanded: bool) {
        if !self.nodes.contains_key(&id) {
            return;
        }
        if expanded {
            self.expanded.insert(id);
        } else {
            self.expanded.remove(&id);
        }
    }

    pub fn toggle_expanded(&mut self, id: NodeId) {
        let expanded = self.is_expanded(id);
        self.set_expanded(id, !expanded);
    }

    /// Expand every node that has children
    pub fn expand_all(&mut self) {
        self.expanded = self
            .nodes
            .iter()
            .filter(|(_, n)| !n.children.is_empty())
            .map(|(id, _)| *id)
            .collect();
    }

    pub fn collapse_all(&mut self) {
        self.expanded.clear();
    }

    // --- selection ---

    pub fn is_selected(&self, id: NodeId) -> bool {
        self.selected.contains(&id)
    }

    pub fn has_selection(&self) -> bool {
        !self.selected.is_empty()
    }

    /// Select a single node (clears other selections)
    pub fn select(&mut self, id: NodeId) {
        if !self.nodes.contains_key(&id) {
            return;
        }
        if self.selected.len() != 1 || !self.selected.contains(&id) {
            self.selected.clear();
            self.selected.insert(id);
            self.selection_changed = true;
        }
        self.anchor = Some(id);
    }

    /// Add or remove one node (Ctrl+click)
    pub fn toggle_select(&mut self, id: NodeId) {
        if !self.nodes.contains_key(&id) {
            return;
        }
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
        self.anchor = Some(id);
        self.selection_changed = true;
    }

    /// Select every visible row between the anchor and `id` (Shift+click)
    pub fn select_range(&mut self, id: NodeId) {
        let Some(anchor) = self.anchor else {
            self.select(id);
            return;
        };
        let rows: Vec<NodeId> = self.visible_rows().into_iter().map(|r| r.node).collect();
        let anchor_idx = rows.iter().position(|n| *n == anchor);
        let target_idx = rows.iter().position(|n| *n == id);
        if let (Some(a), Some(t)) = (anchor_idx, target_idx) {
            let (start, end) = if a <= t { (a, t) } else { (t, a) };
            self.selected.extend(rows[start..=end].iter().copied());
            self.selection_changed = true;
        } else {
            self.select(id);
        }
    }

    pub fn handle_select(&mut self, id: NodeId, modifiers: SelectModifiers) {
        if modifiers.shift {
            self.select_range(id);
        } else if modifiers.ctrl {
            self.toggle_select(id);
        } else {
            self.select(id);
        }
    }

    /// Deselect one node
    pub fn deselect(&mut self, id: NodeId) {
        if self.selected.remove(&id) {
            self.selection_changed = true;
        }
    }

    pub fn clear_selection(&mut self) {
        if !self.selected.is_empty() {
            self.selected.clear();
            self.selection_changed = true;
        }
        self.anchor = None;
    }

    /// Selected nodes in tree (pre-)order
    pub fn selected_nodes(&self) -> Vec<NodeId> {
        if self.selected.is_empty() {
            return Vec::new();
        }
        self.preorder()
            .into_iter()
            .filter(|n| self.selected.contains(n))
            .collect()
    }

    /// Objects of the selected nodes, in tree order
    pub fn selected_objects(&self) -> Vec<ObjectRef> {
        self.selected_nodes()
            .into_iter()
            .filter_map(|n| self.object(n))
            .collect()
    }

    /// Whether the selection changed since the last call; resets the flag
    pub fn take_selection_changed(&mut self) -> bool {
        std::mem::take(&mut self.selection_changed)
    }

    /// Note that a node's display was recomputed
    pub fn mark_updated(&mut self, id: NodeId) {
        if self.selected.contains(&id) {
            self.selected_updated = true;
        }
    }

    /// Whether a selected node was updated since the last call; resets the flag
    pub fn take_selected_updated(&mut self) -> bool {
        std::mem::take(&mut self.selected_updated)
    }

    // --- column resizing ---

    pub fn start_column_resize(&mut self, column: usize) {
        self.resizing = Some(column);
    }

    pub fn end_column_resize(&mut self) {
        self.resizing = None;
    }

    pub fn resizing_column(&self) -> Option<usize> {
        self.resizing
    }

    // --- sorting ---

    pub fn sort_spec(&self) -> Option<SortSpec> {
        self.sort
    }

    /// Sort by `column`, toggling direction when it is already the sort column
    pub fn set_sort(&mut self, column: usize, numeric: bool) {
        let order = match self.sort {
            Some(s) if s.column == column => SortSpec {
                ascending: !s.ascending,
                ..s
            },
            _ => SortSpec {
                column,
                ascending: true,
                numeric,
            },
        };
        self.sort = Some(order);
        self.sort_all();
    }

    /// Re-apply the active sort to every sibling list
    pub fn sort_all(&mut self) {
        if self.sort.is_none() {
            return;
        }
        self.sort_roots();
        let parents: Vec<NodeId> = self.nodes.keys().copied().collect();
        for parent in parents {
            self.sort_children(parent);
        }
    }

    /// Re-apply the active sort to the top-level nodes
    pub fn sort_roots(&mut self) {
        let Some(order) = self.sort else {
            return;
        };
        let mut roots = std::mem::take(&mut self.roots);
        self.sort_siblings(&mut roots, &order);
        self.roots = roots;
    }

    /// Re-apply the active sort to the children of one node
    pub fn sort_children(&mut self, parent: NodeId) {
        let Some(order) = self.sort else {
            return;
        };
        let mut children = match self.nodes.get_mut(&parent) {
            Some(node) if node.children.len() > 1 => std::mem::take(&mut node.children),
            _ => return,
        };
        self.sort_siblings(&mut children, &order);
        if let Some(node) = self.nodes.get_mut(&parent) {
            node.children = children;
        }
    }

    /// Reorder the sortable entries among the slots they already occupy
    fn sort_siblings(&self, siblings: &mut [NodeId], order: &SortSpec) {
        let slots: Vec<usize> = siblings
            .iter()
            .enumerate()
            .filter(|(_, id)| self.nodes.get(id).map(TreeNode::is_sortable).unwrap_or(false))
            .map(|(i, _)| i)
            .collect();
        if slots.len() < 2 {
            return;
        }
        let mut sortable: Vec<NodeId> = slots.iter().map(|&i| siblings[i]).collect();
        sortable.sort_by(|a, b| {
            let (Some(na), Some(nb)) = (self.nodes.get(a), self.nodes.get(b)) else {
                return Ordering::Equal;
            };
            let ordering = match na.comparator {
                Some(cmp) => cmp(na, nb, order),
                None => Ordering::Equal,
            };
            if order.ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
        for (slot, id) in slots.into_iter().zip(sortable) {
            siblings[slot] = id;
        }
    }

    // --- traversal ---

    /// Every node, depth first, in display order
    pub fn preorder(&self) -> Vec<NodeId> {
        let mut out = Vec::with_capacity(self.nodes.len());
        let mut stack: Vec<NodeId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        out
    }

    /// Rows to render: hidden nodes skipped, collapsed subtrees folded
    pub fn visible_rows(&self) -> Vec<Row> {
        let mut rows = Vec::new();
        let mut stack: Vec<Row> = self
            .roots
            .iter()
            .rev()
            .map(|&node| Row { node, depth: 0 })
            .collect();
        while let Some(row) = stack.pop() {
            let Some(node) = self.nodes.get(&row.node) else {
                continue;
            };
            if node.hidden {
                continue;
            }
            rows.push(row);
            if self.expanded.contains(&row.node) {
                stack.extend(node.children.iter().rev().map(|&child| Row {
                    node: child,
                    depth: row.depth + 1,
                }));
            }
        }
        rows
    }

    /// Resolve a drop position to the node it lands on.
    ///
    /// Dropping at `index == child count` (past the last child) targets the
    /// parent itself; otherwise the child at `index`. No parent, no target.
    pub fn drop_target(&self, parent: Option<NodeId>, index: usize) -> Option<NodeId> {
        let parent = parent?;
        if !self.nodes.contains_key(&parent) {
            return None;
        }
        Some(self.children(parent).get(index).copied().unwrap_or(parent))
    }
}
