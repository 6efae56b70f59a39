use super::{NodeId, Tree};
use crate::error::{Error, Result};
use bio::io::newick;
use std::fmt::Write as _;
use std::path::Path;
use tracing::debug;

/// Label `bio` gives to nodes that carry no name in the Newick text.
const UNNAMED: &str = "N/A";

impl Tree {
    pub fn from_newick(content: &str) -> Result<Self> {
        let parsed = newick::from_string(content.trim())?;
        Self::from_graph(parsed)
    }

    pub fn from_newick_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let parsed = newick::from_file(path)?;
        Self::from_graph(parsed)
    }

    /// Converts the petgraph-backed tree produced by `bio` into the arena.
    /// The parser adds the root first and every edge in reading order, so edge
    /// order reproduces the left-to-right child order of the Newick text.
    fn from_graph(parsed: bio::bio_types::phylogeny::Tree) -> Result<Self> {
        let graph = &parsed.g;
        if graph.node_count() == 0 {
            return Err(Error::EmptyTree);
        }

        let mut children: Vec<Vec<(usize, f32)>> = vec![Vec::new(); graph.node_count()];
        for edge in graph.raw_edges() {
            children[edge.source().index()].push((edge.target().index(), edge.weight));
        }

        let mut tree = Tree::new();
        let root = tree.root();
        let mut stack = vec![(0usize, root)];
        while let Some((graph_idx, node_id)) = stack.pop() {
            let label = graph.raw_nodes()[graph_idx].weight.as_str();
            for &(child_idx, weight) in &children[graph_idx] {
                let length = if weight.is_nan() { None } else { Some(weight as f64) };
                let child = tree.add_child(node_id, String::new(), length);
                stack.push((child_idx, child));
            }

            let node = tree.node_mut(node_id);
            if children[graph_idx].is_empty() {
                node.name = label.to_string();
            } else if label != UNNAMED {
                node.support = Some(label.to_string());
            }
        }

        let collapsed = tree.collapse_unary();
        if collapsed > 0 {
            debug!("Collapsed {} single-child nodes", collapsed);
        }
        Ok(tree)
    }

    /// Serializes the tree back to Newick: leaf names, internal support labels
    /// and branch lengths where known.
    pub fn to_newick(&self) -> String {
        let mut out = String::new();
        self.write_subtree(self.root(), &mut out);
        out.push(';');
        out
    }

    fn write_subtree(&self, id: NodeId, out: &mut String) {
        let node = self.node(id);
        if node.is_leaf() {
            out.push_str(&node.name);
        } else {
            out.push('(');
            for (i, &child) in node.children().iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                self.write_subtree(child, out);
            }
            out.push(')');
            if let Some(support) = &node.support {
                out.push_str(support);
            }
        }
        if id != self.root() {
            if let Some(length) = node.branch_length {
                let _ = write!(out, ":{}", length);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_keeps_child_order_and_lengths() {
        let tree = Tree::from_newick("((A:0.1,B:0.2)95:0.5,C:0.3);").unwrap();
        let root = tree.root();
        assert_eq!(tree.leaf_names(root), vec!["A", "B", "C"]);

        let a = tree.find_leaf("A").unwrap();
        let ab = tree.parent(a).unwrap();
        assert_eq!(tree.node(ab).support.as_deref(), Some("95"));
        assert!((tree.node(ab).branch_length.unwrap() - 0.5).abs() < 1e-6);
        assert!(tree.node(root).support.is_none());
        assert!(tree.node(a).labels.is_leaf());
        assert!(!tree.node(root).labels.is_leaf());
    }

    #[test]
    fn test_write_round_trips_topology() {
        let text = "((A:1,B:2)90:0.5,(C:1,D:1):0.25);";
        let tree = Tree::from_newick(text).unwrap();
        assert_eq!(tree.to_newick(), text);
    }

    #[test]
    fn test_unary_nodes_are_collapsed_on_read() {
        let tree = Tree::from_newick("((A:1):2,B:1);").unwrap();
        let root = tree.root();
        assert_eq!(tree.len(), 3);
        let a = tree.find_leaf("A").unwrap();
        assert_eq!(tree.parent(a), Some(root));
        assert!((tree.node(a).branch_length.unwrap() - 3.0).abs() < 1e-6);
        assert_eq!(tree.node_key(root), "A|B");
        assert_eq!(tree.to_newick(), "(A:3,B:1);");
    }

    #[test]
    fn test_parse_error_is_reported() {
        assert!(matches!(Tree::from_newick("((A,B);"), Err(Error::Newick(_))));
    }
}
