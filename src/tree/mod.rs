//! Arena-backed rooted tree.
//!
//! Nodes are addressed by a stable `NodeId` while labeling runs. Structural edits
//! (rerooting, pruning) happen before labeling and finish by compacting the arena,
//! so ids handed out before an edit must not be reused after it.

pub mod newick;

use crate::error::{Error, Result};
use crate::labeling::types::Labels;
use std::collections::HashSet;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

impl NodeId {
    pub fn index(self) -> usize {
        self.0
    }
}

#[derive(Debug, Clone)]
pub struct Node {
    /// Leaf name; internal nodes carry an optional support label instead.
    pub name: String,
    pub support: Option<String>,
    pub branch_length: Option<f64>,
    pub labels: Labels,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl Node {
    fn new(name: String, parent: Option<NodeId>) -> Self {
        Self {
            name,
            support: None,
            branch_length: None,
            labels: Labels::Leaf(Default::default()),
            parent,
            children: Vec::new(),
        }
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn is_leaf(&self) -> bool {
        self.children.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct Tree {
    nodes: Vec<Node>,
    root: NodeId,
}

impl Tree {
    /// Creates a tree holding a single unnamed root.
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::new(String::new(), None)],
            root: NodeId(0),
        }
    }

    /// Appends a node under `parent` and returns its id.
    pub fn add_child(&mut self, parent: NodeId, name: impl Into<String>, branch_length: Option<f64>) -> NodeId {
        let id = NodeId(self.nodes.len());
        let mut node = Node::new(name.into(), Some(parent));
        node.branch_length = branch_length;
        self.nodes.push(node);
        self.nodes[parent.0].children.push(id);
        self.nodes[parent.0].labels = Labels::Internal(Default::default());
        id
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True while the tree holds no named leaf, as after `Tree::new`.
    pub fn is_empty(&self) -> bool {
        self.leaves(self.root)
            .iter()
            .all(|&leaf| self.nodes[leaf.0].name.is_empty())
    }

    pub fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    pub fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id.0]
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes[id.0].parent
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        &self.nodes[id.0].children
    }

    pub fn is_leaf(&self, id: NodeId) -> bool {
        self.nodes[id.0].is_leaf()
    }

    /// Pre-order walk of the subtree rooted at `from`, children left to right.
    pub fn preorder(&self, from: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().rev().copied());
        }
        order
    }

    /// Post-order walk of the subtree rooted at `from`.
    pub fn postorder(&self, from: NodeId) -> Vec<NodeId> {
        let mut order = Vec::new();
        let mut stack = vec![from];
        while let Some(id) = stack.pop() {
            order.push(id);
            stack.extend(self.children(id).iter().copied());
        }
        order.reverse();
        order
    }

    /// Leaves under `from` in pre-order.
    pub fn leaves(&self, from: NodeId) -> Vec<NodeId> {
        self.preorder(from)
            .into_iter()
            .filter(|&id| self.is_leaf(id))
            .collect()
    }

    pub fn leaf_names(&self, from: NodeId) -> Vec<&str> {
        self.leaves(from)
            .into_iter()
            .map(|id| self.nodes[id.0].name.as_str())
            .collect()
    }

    /// Internal nodes of the whole tree in pre-order, root first.
    pub fn internal_nodes(&self) -> Vec<NodeId> {
        self.preorder(self.root)
            .into_iter()
            .filter(|&id| !self.is_leaf(id))
            .collect()
    }

    pub fn find_leaf(&self, name: &str) -> Option<NodeId> {
        self.leaves(self.root)
            .into_iter()
            .find(|&id| self.nodes[id.0].name == name)
    }

    /// Ancestors of `id` from its parent up to the root.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut path = Vec::new();
        let mut current = self.parent(id);
        while let Some(p) = current {
            path.push(p);
            current = self.parent(p);
        }
        path
    }

    /// Smallest node whose subtree contains every node in `ids`.
    pub fn common_ancestor(&self, ids: &[NodeId]) -> Option<NodeId> {
        let (first, rest) = ids.split_first()?;
        let mut lineage: Vec<NodeId> = std::iter::once(*first)
            .chain(self.ancestors(*first))
            .collect();

        for id in rest {
            let own: HashSet<NodeId> = std::iter::once(*id).chain(self.ancestors(*id)).collect();
            let keep = lineage.iter().position(|n| own.contains(n))?;
            lineage.drain(..keep);
        }
        lineage.first().copied()
    }

    /// True when the leaves under `id` are exactly the leaves of the whole tree
    /// matching `predicate`: no matching leaf outside, no non-matching leaf inside.
    pub fn is_monophyletic<F>(&self, id: NodeId, predicate: F) -> bool
    where
        F: Fn(&Node) -> bool,
    {
        let inside: HashSet<NodeId> = self.leaves(id).into_iter().collect();
        let matching: HashSet<NodeId> = self
            .leaves(self.root)
            .into_iter()
            .filter(|&leaf| predicate(&self.nodes[leaf.0]))
            .collect();
        !matching.is_empty() && inside == matching
    }

    /// Maximal subtrees whose leaves all match `predicate`, in pre-order.
    pub fn monophyletic_groups<F>(&self, predicate: F) -> Vec<NodeId>
    where
        F: Fn(&Node) -> bool,
    {
        let mut groups = Vec::new();
        let mut stack = vec![self.root];
        while let Some(id) = stack.pop() {
            if self.leaves(id).iter().all(|&leaf| predicate(&self.nodes[leaf.0])) {
                groups.push(id);
            } else {
                stack.extend(self.children(id).iter().rev().copied());
            }
        }
        groups
    }

    /// Two leaves whose common ancestor is `id`: the first leaf of the first
    /// child and the last leaf of the last child. A leaf stands for itself.
    pub fn representative_leaves(&self, id: NodeId) -> Vec<NodeId> {
        let children = self.children(id);
        match (children.first(), children.last()) {
            (Some(&first), Some(&last)) if first != last => {
                let left = self.leaves(first)[0];
                let right = *self.leaves(last).last().unwrap_or(&left);
                vec![left, right]
            }
            _ => vec![self.leaves(id)[0]],
        }
    }

    /// Names of `representative_leaves`, joined the way node-addressing
    /// datasets expect (`a|b`).
    pub fn node_key(&self, id: NodeId) -> String {
        self.representative_leaves(id)
            .into_iter()
            .map(|leaf| self.nodes[leaf.0].name.as_str())
            .collect::<Vec<_>>()
            .join("|")
    }

    pub fn rename_leaves<F>(&mut self, rename: F)
    where
        F: Fn(&str) -> String,
    {
        for node in self.nodes.iter_mut().filter(|n| n.children.is_empty()) {
            node.name = rename(&node.name);
        }
    }

    /// Reroots on one outgroup leaf, or on the common ancestor of two leaves.
    pub fn reroot(&mut self, outgroup: &[String]) -> Result<()> {
        let target = match outgroup {
            [leaf] => self
                .find_leaf(leaf)
                .ok_or_else(|| Error::UnknownLeaf(leaf.clone()))?,
            [a, b] => {
                let a_id = self.find_leaf(a).ok_or_else(|| Error::UnknownLeaf(a.clone()))?;
                let b_id = self.find_leaf(b).ok_or_else(|| Error::UnknownLeaf(b.clone()))?;
                self.common_ancestor(&[a_id, b_id])
                    .ok_or_else(|| Error::UnknownLeaf(b.clone()))?
            }
            other => return Err(Error::UnsupportedRoot(other.len())),
        };
        self.set_outgroup(target)
    }

    /// Places a new bifurcating root on the branch above `outgroup`.
    pub fn set_outgroup(&mut self, outgroup: NodeId) -> Result<()> {
        let Some(parent) = self.parent(outgroup) else {
            return Err(Error::OutgroupIsRoot(self.node_key(outgroup)));
        };

        // Edges along the path to the old root get reversed; each node takes
        // over the branch length of the edge it now hangs from.
        let path: Vec<NodeId> = std::iter::once(parent).chain(self.ancestors(parent)).collect();
        let lengths: Vec<Option<f64>> = path.iter().map(|&id| self.nodes[id.0].branch_length).collect();
        let old_root = self.root;

        let new_root = NodeId(self.nodes.len());
        let mut root_node = Node::new(String::new(), None);
        root_node.labels = Labels::Internal(Default::default());
        root_node.children = vec![outgroup, parent];
        self.nodes.push(root_node);

        self.nodes[parent.0].children.retain(|&c| c != outgroup);
        for (i, pair) in path.windows(2).enumerate() {
            let (child, up) = (pair[0], pair[1]);
            self.nodes[up.0].children.retain(|&c| c != child);
            self.nodes[child.0].children.push(up);
            self.nodes[up.0].parent = Some(child);
            self.nodes[up.0].branch_length = lengths[i];
        }

        let half = self.nodes[outgroup.0].branch_length.map(|len| len / 2.0);
        self.nodes[outgroup.0].parent = Some(new_root);
        self.nodes[outgroup.0].branch_length = half;
        self.nodes[parent.0].parent = Some(new_root);
        self.nodes[parent.0].branch_length = half;
        self.root = new_root;

        match self.nodes[old_root.0].children.len() {
            0 => self.detach(old_root),
            1 => self.collapse(old_root),
            _ => {}
        }
        self.compact();
        Ok(())
    }

    /// Removes every leaf matching `predicate`; returns how many were removed.
    pub fn prune_leaves<F>(&mut self, predicate: F) -> Result<usize>
    where
        F: Fn(&Node) -> bool,
    {
        let doomed: Vec<NodeId> = self
            .leaves(self.root)
            .into_iter()
            .filter(|&id| predicate(&self.nodes[id.0]))
            .collect();
        if doomed.is_empty() {
            return Ok(0);
        }
        if doomed.len() == self.leaves(self.root).len() {
            return Err(Error::EmptyTree);
        }

        for &leaf in &doomed {
            self.detach(leaf);
        }
        self.compact();
        Ok(doomed.len())
    }

    /// Replaces every internal node that has a single child by that child,
    /// summing branch lengths. Returns how many nodes were removed.
    fn collapse_unary(&mut self) -> usize {
        let unary: Vec<NodeId> = self
            .preorder(self.root)
            .into_iter()
            .filter(|&id| self.nodes[id.0].children.len() == 1)
            .collect();
        if unary.is_empty() {
            return 0;
        }
        for &id in &unary {
            self.collapse(id);
        }
        self.compact();
        unary.len()
    }

    /// Cuts `id` out of the tree, then removes or collapses ancestors left
    /// with zero or one child.
    fn detach(&mut self, id: NodeId) {
        let Some(parent) = self.parent(id) else {
            return;
        };
        self.nodes[parent.0].children.retain(|&c| c != id);
        self.nodes[id.0].parent = None;

        match self.nodes[parent.0].children.len() {
            0 => self.detach(parent),
            1 => self.collapse(parent),
            _ => {}
        }
    }

    /// Replaces a single-child node by its child, summing branch lengths.
    fn collapse(&mut self, id: NodeId) {
        let child = self.nodes[id.0].children[0];
        let length = match (self.nodes[id.0].branch_length, self.nodes[child.0].branch_length) {
            (Some(a), Some(b)) => Some(a + b),
            (a, b) => a.or(b),
        };

        match self.parent(id) {
            Some(parent) => {
                for slot in self.nodes[parent.0].children.iter_mut() {
                    if *slot == id {
                        *slot = child;
                    }
                }
                self.nodes[child.0].parent = Some(parent);
                self.nodes[child.0].branch_length = length;
            }
            None => {
                self.nodes[child.0].parent = None;
                self.nodes[child.0].branch_length = None;
                self.root = child;
            }
        }
        self.nodes[id.0].children.clear();
        self.nodes[id.0].parent = None;
    }

    /// Rebuilds the arena from the current root so that ids are dense and in
    /// pre-order. Nodes no longer reachable are dropped.
    fn compact(&mut self) {
        let order = self.preorder(self.root);
        let mut remap = vec![None; self.nodes.len()];
        for (new, old) in order.iter().enumerate() {
            remap[old.0] = Some(NodeId(new));
        }

        let mut nodes = Vec::with_capacity(order.len());
        for old in &order {
            let mut node = self.nodes[old.0].clone();
            node.parent = node.parent.and_then(|p| remap[p.0]);
            node.children = node.children.iter().filter_map(|c| remap[c.0]).collect();
            if node.children.is_empty() != node.labels.is_leaf() {
                node.labels = if node.children.is_empty() {
                    Labels::Leaf(Default::default())
                } else {
                    Labels::Internal(Default::default())
                };
            }
            nodes.push(node);
        }

        self.nodes = nodes;
        self.root = NodeId(0);
    }
}

impl Default for Tree {
    fn default() -> Self {
        Self::new()
    }
}
