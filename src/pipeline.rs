//! End-to-end steps shared by the command-line subcommands.

use crate::config::AnnotationConfig;
use crate::error::Result;
use crate::labeling::{self, LabelingSummary};
use crate::layers::Layers;
use crate::metadata::Metadata;
use crate::tree::Tree;
use tracing::{debug, info};

/// Separator after which leaf names carry alignment coordinates.
const NAME_SUFFIX_SEPARATOR: char = '/';

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PreparationReport {
    pub pruned: usize,
    pub rerooted: bool,
}

/// Cuts every leaf name at its first `/`.
pub fn simplify_leaf_names(tree: &mut Tree) {
    tree.rename_leaves(|name| match name.split_once(NAME_SUFFIX_SEPARATOR) {
        Some((head, _)) => head.to_string(),
        None => name.to_string(),
    });
}

/// Simplifies names, reroots on `outgroup` when one is given and drops
/// predicted-structure leaves.
pub fn prepare_tree(tree: &mut Tree, outgroup: &[String], config: &AnnotationConfig) -> Result<PreparationReport> {
    simplify_leaf_names(tree);

    let rerooted = !outgroup.is_empty();
    if rerooted {
        tree.reroot(outgroup)?;
        info!("Rerooted tree on {}", outgroup.join(" + "));
    }

    let prefix = config.naming.predicted_prefix.as_str();
    let pruned = if prefix.is_empty() {
        0
    } else {
        tree.prune_leaves(|node| node.name.starts_with(prefix))?
    };
    if pruned > 0 {
        info!("Removed {} leaves starting with {}", pruned, prefix);
    }
    debug!("Prepared tree has {} nodes", tree.len());

    Ok(PreparationReport { pruned, rerooted })
}

/// Labels the prepared tree in place and builds its annotation layers.
pub fn annotate(tree: &mut Tree, metadata: &Metadata, config: &AnnotationConfig) -> (LabelingSummary, Layers) {
    let summary = labeling::label_tree(tree, metadata, config);
    let layers = Layers::build(tree, config);
    (summary, layers)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simplify_leaf_names() {
        let mut tree = Tree::from_newick("(Bact_a/1-300:1,HOMSAP000001_SMC1/5-900:1,Plain:1);").unwrap();
        simplify_leaf_names(&mut tree);
        let root = tree.root();
        assert_eq!(tree.leaf_names(root), vec!["Bact_a", "HOMSAP000001_SMC1", "Plain"]);
    }

    #[test]
    fn test_prepare_prunes_predicted_structures() {
        let mut tree = Tree::from_newick("((A:1,AF-P12345-F1/1-100:1):1,(B:1,C:1):1);").unwrap();
        let report = prepare_tree(&mut tree, &[], &AnnotationConfig::default()).unwrap();
        assert_eq!(report, PreparationReport { pruned: 1, rerooted: false });
        let root = tree.root();
        assert_eq!(tree.leaf_names(root), vec!["A", "B", "C"]);
        let a = tree.find_leaf("A").unwrap();
        assert_eq!(tree.parent(a), Some(root));
        assert_eq!(tree.node(a).branch_length, Some(2.0));
    }

    #[test]
    fn test_prepare_reroots_after_simplifying() {
        let mut tree = Tree::from_newick("((A/1-5:1,B/1-5:1):1,(C/1-5:1,D/1-5:1):1);").unwrap();
        let report = prepare_tree(&mut tree, &["D".to_string()], &AnnotationConfig::default()).unwrap();
        assert!(report.rerooted);
        let root = tree.root();
        assert!(tree.children(root).iter().any(|&c| tree.node(c).name == "D"));
    }

    #[test]
    fn test_prepare_rejects_unknown_outgroup() {
        let mut tree = Tree::from_newick("((A:1,B:1):1,C:1);").unwrap();
        assert!(prepare_tree(&mut tree, &["Z".to_string()], &AnnotationConfig::default()).is_err());
    }
}
