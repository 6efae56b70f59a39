use crate::config::AnnotationConfig;
use crate::labeling::types::Labels;
use crate::tree::Tree;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NodeLabel {
    pub node: String,
    pub label: String,
}

/// New display names: lineage plus species for leaves, clade and/or protein
/// for internal nodes that have either.
pub fn build(tree: &Tree, config: &AnnotationConfig) -> Vec<NodeLabel> {
    let mut records = Vec::new();
    for leaf in tree.leaves(tree.root()) {
        let node = tree.node(leaf);
        let Labels::Leaf(labels) = &node.labels else {
            continue;
        };
        let lineage = match labels.domain {
            Some(domain) if domain.is_prokaryote() => labels.phylum.as_deref(),
            _ => labels.rel_clade.as_deref(),
        };
        let species = labels
            .species
            .as_deref()
            .map(|s| s.replace(' ', &config.relabel_filler));

        let parts: Vec<&str> = [lineage, species.as_deref()]
            .into_iter()
            .flatten()
            .filter(|p| !p.is_empty())
            .collect();
        let label = if parts.is_empty() {
            node.name.clone()
        } else {
            parts.join("_")
        };
        records.push(NodeLabel {
            node: node.name.clone(),
            label,
        });
    }

    for id in tree.internal_nodes() {
        let Some(labels) = tree.node(id).labels.as_internal() else {
            continue;
        };
        let label = match (labels.clade.as_deref(), labels.protein.value()) {
            (Some(clade), Some(protein)) => format!("{}_{}", clade, protein),
            (None, Some(protein)) => protein.clone(),
            (Some(clade), None) => clade.to_string(),
            (None, None) => continue,
        };
        records.push(NodeLabel {
            node: tree.node_key(id),
            label,
        });
    }
    records
}
