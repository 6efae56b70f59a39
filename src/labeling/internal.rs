use crate::config::AnnotationConfig;
use crate::labeling::types::{Domain, InternalLabels, Labels, Resolved};
use crate::taxonomy;
use crate::tree::{NodeId, Tree};
use serde::Serialize;
use std::collections::BTreeSet;
use tracing::debug;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InternalReport {
    pub nodes: usize,
    pub protein_repaired: usize,
    pub domain_repaired: usize,
    pub protein_unresolved: usize,
    pub domain_unresolved: usize,
}

/// Infers protein, domain and shared lineage for internal nodes from the
/// labeled leaves below them.
///
/// Pass one takes the consensus of each node's leaves. Pass two walks from the
/// root down and lets a node that is still unresolved borrow its parent's value
/// when at least one of its own leaves carries that value. Conflicting nodes
/// stay unresolved: their ancestors hold the same conflict.
pub struct InternalLabeler<'a> {
    config: &'a AnnotationConfig,
}

impl<'a> InternalLabeler<'a> {
    pub fn new(config: &'a AnnotationConfig) -> Self {
        Self { config }
    }

    pub fn label(&self, tree: &mut Tree) -> InternalReport {
        self.consensus_pass(tree);
        let (protein_repaired, domain_repaired) = self.repair_pass(tree);

        let mut report = InternalReport {
            protein_repaired,
            domain_repaired,
            ..Default::default()
        };
        for id in tree.internal_nodes() {
            if let Some(labels) = tree.node(id).labels.as_internal() {
                report.nodes += 1;
                report.protein_unresolved += labels.protein.is_unresolved() as usize;
                report.domain_unresolved += labels.domain.is_unresolved() as usize;
            }
        }
        debug!("Internal labeling: {:?}", report);
        report
    }

    /// Pass one: every internal node, root included, from its leaves only.
    pub fn consensus_pass(&self, tree: &mut Tree) {
        for id in tree.postorder(tree.root()) {
            if tree.is_leaf(id) {
                continue;
            }
            let labels = self.consensus_labels(tree, id);
            tree.node_mut(id).labels = Labels::Internal(labels);
        }
    }

    fn consensus_labels(&self, tree: &Tree, id: NodeId) -> InternalLabels {
        let leaves = tree.leaves(id);
        let proteins: Vec<Option<&str>> = leaves
            .iter()
            .map(|&leaf| tree.node(leaf).labels.protein())
            .collect();
        let domains: Vec<Option<Domain>> = leaves
            .iter()
            .map(|&leaf| tree.node(leaf).labels.domain())
            .collect();

        let mut labels = InternalLabels {
            protein: Resolved::consensus(self.protein_consensus(&proteins)),
            domain: Resolved::consensus(domain_consensus(&domains)),
            ..Default::default()
        };

        if let Some(domain) = labels.domain.value() {
            if domain.is_prokaryote() {
                let taxonomies: Vec<&str> = leaves
                    .iter()
                    .map(|&leaf| {
                        tree.node(leaf)
                            .labels
                            .as_leaf()
                            .and_then(|l| l.taxonomy.as_deref())
                            .unwrap_or("")
                    })
                    .collect();
                if let Some(shared) = taxonomy::lowest_shared_clade(&taxonomies) {
                    labels.clade = Some(shared.name);
                    labels.rank = Some(shared.rank);
                }
            }
        }
        labels
    }

    /// Consensus protein over a node's leaves; `None` entries are unknown
    /// leaves, not votes against.
    pub fn protein_consensus(&self, proteins: &[Option<&str>]) -> Option<String> {
        let distinct: BTreeSet<Option<&str>> = proteins.iter().copied().collect();
        let values: Vec<Option<&str>> = distinct.into_iter().collect();
        match values.as_slice() {
            [only] => only.map(str::to_string),
            // BTreeSet orders None first.
            [None, Some(known)] => Some(known.to_string()),
            [Some(a), Some(b)] => self.config.merged_label(a, b).map(str::to_string),
            _ => None,
        }
    }

    /// Pass two, root to tips. Returns how many protein and domain labels were
    /// borrowed from parents.
    pub fn repair_pass(&self, tree: &mut Tree) -> (usize, usize) {
        let mut repaired = (0, 0);
        let root = tree.root();
        for id in tree.preorder(root) {
            if id == root || tree.is_leaf(id) {
                continue;
            }
            let Some(parent) = tree.parent(id).and_then(|p| tree.node(p).labels.as_internal()) else {
                continue;
            };
            let parent_protein = parent.protein.value().cloned();
            let parent_domain = parent.domain.value().copied();
            let Some(current) = tree.node(id).labels.as_internal() else {
                continue;
            };

            let leaves = tree.leaves(id);
            let new_protein = match parent_protein {
                Some(protein) if current.protein.is_unresolved() => leaves
                    .iter()
                    .any(|&leaf| tree.node(leaf).labels.protein() == Some(protein.as_str()))
                    .then_some(protein),
                _ => None,
            };
            let new_domain = match parent_domain {
                Some(domain) if current.domain.is_unresolved() => leaves
                    .iter()
                    .any(|&leaf| tree.node(leaf).labels.domain() == Some(domain))
                    .then_some(domain),
                _ => None,
            };

            if let Some(labels) = tree.node_mut(id).labels.as_internal_mut() {
                if let Some(protein) = new_protein {
                    labels.protein = Resolved::Inherited(protein);
                    repaired.0 += 1;
                }
                if let Some(domain) = new_domain {
                    labels.domain = Resolved::Inherited(domain);
                    repaired.1 += 1;
                }
            }
        }
        repaired
    }
}

fn domain_consensus(domains: &[Option<Domain>]) -> Option<Domain> {
    let (first, rest) = domains.split_first()?;
    if rest.iter().all(|d| d == first) {
        *first
    } else {
        None
    }
}
