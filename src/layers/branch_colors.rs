use crate::config::AnnotationConfig;
use crate::labeling::types::Domain;
use crate::tree::Tree;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BranchColorKind {
    /// Maximal subtree whose leaves all belong to the domain.
    Exact,
    /// Node carrying a domain label although some of its own leaves belong to
    /// another domain.
    Extended,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct BranchColor {
    /// One leaf name, or two joined by `|` addressing their common ancestor.
    pub node: String,
    pub domain: Domain,
    pub color: String,
    pub kind: BranchColorKind,
}

pub fn build(tree: &Tree, config: &AnnotationConfig) -> Vec<BranchColor> {
    let mut records = Vec::new();
    for domain in Domain::ALL {
        for group in tree.monophyletic_groups(|n| n.labels.domain() == Some(domain)) {
            records.push(BranchColor {
                node: tree.node_key(group),
                domain,
                color: config.domain_color(domain).to_string(),
                kind: BranchColorKind::Exact,
            });
        }
    }

    if config.extended_branch_colors {
        for id in tree.internal_nodes() {
            let Some(domain) = tree.node(id).labels.domain() else {
                continue;
            };
            let mixed = tree
                .leaves(id)
                .iter()
                .any(|&leaf| tree.node(leaf).labels.domain() != Some(domain));
            if mixed {
                records.push(BranchColor {
                    node: tree.node_key(id),
                    domain,
                    color: config.domain_color(domain).to_string(),
                    kind: BranchColorKind::Extended,
                });
            }
        }
    }
    records
}
