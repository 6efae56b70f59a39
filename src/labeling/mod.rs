//! Leaf and internal-node labeling.
//!
//! Leaves are labeled first from their names and the metadata tables; internal
//! nodes are then derived from the leaves in two passes. The internal passes
//! read only leaf labels and parent labels, so leaf labeling has to be
//! complete before they start.

pub mod internal;
pub mod leaves;
pub mod naming;
pub mod types;

pub use internal::{InternalLabeler, InternalReport};
pub use leaves::{Diagnostic, LabelReport, LeafLabeler};
pub use types::{Domain, InternalLabels, Labels, LeafLabels, Resolved};

use crate::config::AnnotationConfig;
use crate::metadata::Metadata;
use crate::tree::Tree;
use serde::Serialize;
use tracing::info;

#[derive(Debug, Clone, Default, Serialize)]
pub struct LabelingSummary {
    pub leaves: LabelReport,
    pub internal: InternalReport,
}

/// Labels every node of `tree` in place.
pub fn label_tree(tree: &mut Tree, metadata: &Metadata, config: &AnnotationConfig) -> LabelingSummary {
    let leaves = LeafLabeler::new(metadata, config).label(tree);
    let internal = InternalLabeler::new(config).label(tree);
    info!(
        "Labeled {} leaves ({} diagnostics) and {} internal nodes ({} without protein, {} without domain)",
        leaves.leaves,
        leaves.diagnostics.len(),
        internal.nodes,
        internal.protein_unresolved,
        internal.domain_unresolved
    );
    LabelingSummary { leaves, internal }
}
