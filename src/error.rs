//! Error types for tree preparation, metadata loading and dataset output.

use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to read table {}: {source}", path.display())]
    Table {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("Failed to parse Newick tree: {0}")]
    Newick(#[from] bio::io::newick::Error),

    #[error("Tree has no nodes")]
    EmptyTree,

    #[error("Leaf not found in tree: {0}")]
    UnknownLeaf(String),

    /// Rerooting takes one outgroup leaf or two leaves spanning the outgroup clade.
    #[error("Rerooting needs one or two leaf names, got {0}")]
    UnsupportedRoot(usize),

    #[error("Outgroup {0} is already the root of the tree")]
    OutgroupIsRoot(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),
}
