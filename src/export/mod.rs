pub mod itol;

use crate::labeling::types::Labels;
use crate::labeling::Diagnostic;
use crate::tree::Tree;
use chrono::{DateTime, Utc};
use serde::ser::Serializer;
use serde::Serialize;
use std::io::Write;

/// Every node's labels, as written by the `labels` command.
#[derive(Debug, Serialize)]
pub struct LabelExport {
    pub tree: String,
    #[serde(serialize_with = "serialize_datetime")]
    pub created_at: DateTime<Utc>,
    pub tool_version: String,
    pub nodes: Vec<NodeExport>,
    pub diagnostics: Vec<Diagnostic>,
}

#[derive(Debug, Serialize)]
pub struct NodeExport {
    /// Leaf name, or `a|b` for the common ancestor of two leaves.
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub support: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub branch_length: Option<f64>,
    pub labels: Labels,
}

fn serialize_datetime<S>(date: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(&date.to_rfc3339())
}

impl LabelExport {
    /// Snapshot of a labeled tree in pre-order.
    pub fn new(tree_name: impl Into<String>, tree: &Tree, diagnostics: Vec<Diagnostic>) -> Self {
        let nodes = tree
            .preorder(tree.root())
            .into_iter()
            .map(|id| {
                let node = tree.node(id);
                NodeExport {
                    id: tree.node_key(id),
                    support: node.support.clone(),
                    branch_length: node.branch_length,
                    labels: node.labels.clone(),
                }
            })
            .collect();

        LabelExport {
            tree: tree_name.into(),
            created_at: Utc::now(),
            tool_version: env!("CARGO_PKG_VERSION").to_string(),
            nodes,
            diagnostics,
        }
    }

    pub fn write_json<W: Write>(&self, writer: W) -> crate::error::Result<()> {
        serde_json::to_writer_pretty(writer, self)?;
        Ok(())
    }
}
