//! Builders for the four annotation layers drawn on top of a labeled tree.
//!
//! Every builder is a pure function of the labeled tree and the config. Nodes
//! are addressed by leaf name, or by two leaf names joined with `|` whose
//! common ancestor is the node.

pub mod branch_colors;
pub mod membership;
pub mod palette;
pub mod paralogs;
pub mod relabel;

pub use branch_colors::{BranchColor, BranchColorKind};
pub use membership::ComplexStrip;
pub use paralogs::ParalogMarker;
pub use relabel::NodeLabel;

use crate::config::AnnotationConfig;
use crate::tree::Tree;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize)]
pub struct Layers {
    pub branch_colors: Vec<BranchColor>,
    pub labels: Vec<NodeLabel>,
    pub paralogs: Vec<ParalogMarker>,
    pub memberships: Vec<ComplexStrip>,
}

impl Layers {
    pub fn build(tree: &Tree, config: &AnnotationConfig) -> Self {
        let layers = Layers {
            branch_colors: branch_colors::build(tree, config),
            labels: relabel::build(tree, config),
            paralogs: paralogs::build(tree),
            memberships: membership::build(tree, config),
        };
        info!(
            "Built layers: {} branch colors, {} labels, {} paralog markers, {} complex strips",
            layers.branch_colors.len(),
            layers.labels.len(),
            layers.paralogs.len(),
            layers.memberships.len()
        );
        layers
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::labeling::types::{Domain, InternalLabels, Labels, LeafLabels, Resolved};
    use crate::tree::NodeId;

    fn leaf(tree: &mut Tree, parent: NodeId, name: &str, labels: LeafLabels) -> NodeId {
        let id = tree.add_child(parent, name, Some(1.0));
        tree.node_mut(id).labels = Labels::Leaf(labels);
        id
    }

    fn prokaryote(domain: Domain, protein: &str, accession: &str) -> LeafLabels {
        LeafLabels {
            protein: Some(protein.to_string()),
            domain: Some(domain),
            phylum: Some("Firmicutes".to_string()),
            accession: Some(accession.to_string()),
            taxonomy: Some("d__Bacteria;p__Firmicutes;s__Bacillus subtilis".to_string()),
            species: Some("Bacillus subtilis".to_string()),
            ..Default::default()
        }
    }

    fn eukaryote(protein: &str) -> LeafLabels {
        LeafLabels {
            protein: Some(protein.to_string()),
            domain: Some(Domain::Eukaryota),
            species: Some("Homo sapiens".to_string()),
            rel_clade: Some("Opisthokonta".to_string()),
            ..Default::default()
        }
    }

    fn internal(tree: &mut Tree, id: NodeId, protein: Option<&str>, domain: Option<Domain>, clade: Option<&str>) {
        tree.node_mut(id).labels = Labels::Internal(InternalLabels {
            protein: Resolved::consensus(protein.map(str::to_string)),
            domain: Resolved::consensus(domain),
            clade: clade.map(str::to_string),
            rank: None,
        });
    }

    /// `((B1,B2),(E1,E2))` with a bacterial clade and a eukaryotic clade.
    fn two_domain_tree() -> Tree {
        let mut tree = Tree::new();
        let root = tree.root();
        let bact = tree.add_child(root, "", Some(1.0));
        let euk = tree.add_child(root, "", Some(1.0));
        leaf(&mut tree, bact, "B1", prokaryote(Domain::Bacteria, "SMC", "GCA_1"));
        leaf(&mut tree, bact, "B2", prokaryote(Domain::Bacteria, "SMC", "GCA_1"));
        leaf(&mut tree, euk, "E1", eukaryote("SMC2"));
        leaf(&mut tree, euk, "E2", eukaryote("SMC2"));
        internal(&mut tree, root, None, None, None);
        internal(&mut tree, bact, Some("SMC"), Some(Domain::Bacteria), Some("Firmicutes"));
        internal(&mut tree, euk, Some("SMC2"), Some(Domain::Eukaryota), None);
        tree
    }

    #[test]
    fn test_branch_colors_cover_maximal_groups() {
        let tree = two_domain_tree();
        let config = AnnotationConfig::default();
        let records = branch_colors::build(&tree, &config);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].node, "B1|B2");
        assert_eq!(records[0].domain, Domain::Bacteria);
        assert_eq!(records[0].color, "#0044AD");
        assert_eq!(records[1].node, "E1|E2");
        assert!(records.iter().all(|r| r.kind == BranchColorKind::Exact));
    }

    #[test]
    fn test_extended_branch_colors_follow_config() {
        let mut tree = two_domain_tree();
        let root = tree.root();
        internal(&mut tree, root, None, Some(Domain::Eukaryota), None);

        let mut config = AnnotationConfig::default();
        let records = branch_colors::build(&tree, &config);
        let extended: Vec<_> = records.iter().filter(|r| r.kind == BranchColorKind::Extended).collect();
        assert_eq!(extended.len(), 1);
        assert_eq!(extended[0].node, "B1|E2");
        assert_eq!(extended[0].domain, Domain::Eukaryota);

        config.extended_branch_colors = false;
        assert!(branch_colors::build(&tree, &config)
            .iter()
            .all(|r| r.kind == BranchColorKind::Exact));
    }

    #[test]
    fn test_relabel_leaves_and_internal_nodes() {
        let tree = two_domain_tree();
        let config = AnnotationConfig::default();
        let labels = relabel::build(&tree, &config);
        let find = |node: &str| labels.iter().find(|l| l.node == node).map(|l| l.label.as_str());

        assert_eq!(find("B1"), Some("Firmicutes_Bacillus_subtilis"));
        assert_eq!(find("E1"), Some("Opisthokonta_Homo_sapiens"));
        assert_eq!(find("B1|B2"), Some("Firmicutes_SMC"));
        assert_eq!(find("E1|E2"), Some("SMC2"));
        // The root has neither clade nor protein.
        assert_eq!(find("B1|E2"), None);
        assert_eq!(labels.len(), 6);
    }

    #[test]
    fn test_relabel_falls_back_to_leaf_name() {
        let mut tree = Tree::new();
        let root = tree.root();
        leaf(&mut tree, root, "Unknown_leaf", LeafLabels::default());
        leaf(&mut tree, root, "E1", eukaryote("SMC4"));
        let labels = relabel::build(&tree, &AnnotationConfig::default());
        assert_eq!(labels[0].label, "Unknown_leaf");
    }

    #[test]
    fn test_paralogs_share_one_color_per_accession() {
        let tree = two_domain_tree();
        let markers = paralogs::build(&tree);
        assert_eq!(markers.len(), 2);
        assert_eq!(markers[0].leaf, "B1");
        assert_eq!(markers[1].leaf, "B2");
        assert_eq!(markers[0].color, "#ff0000");
        assert_eq!(markers[0].color, markers[1].color);
    }

    #[test]
    fn test_paralogs_ignore_leaves_without_taxonomy() {
        let mut tree = two_domain_tree();
        let b2 = tree.find_leaf("B2").unwrap();
        tree.node_mut(b2).labels.as_leaf_mut().unwrap().taxonomy = None;
        assert!(paralogs::build(&tree).is_empty());
    }

    #[test]
    fn test_membership_strips_leaves_then_internal_nodes() {
        let tree = two_domain_tree();
        let strips = membership::build(&tree, &AnnotationConfig::default());
        let nodes: Vec<&str> = strips.iter().map(|s| s.node.as_str()).collect();
        assert_eq!(nodes, vec!["E1", "E2", "E1|E2"]);
        assert_eq!(strips[0].complex, None);
        assert_eq!(strips[2].complex.as_deref(), Some("Condensin"));
        assert_eq!(strips[2].color, "#ddcc77");
    }

    #[test]
    fn test_build_collects_every_layer() {
        let tree = two_domain_tree();
        let layers = Layers::build(&tree, &AnnotationConfig::default());
        assert_eq!(layers.branch_colors.len(), 2);
        assert_eq!(layers.labels.len(), 6);
        assert_eq!(layers.paralogs.len(), 2);
        assert_eq!(layers.memberships.len(), 3);
    }
}
