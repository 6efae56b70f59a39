use crate::taxonomy::Rank;
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub enum Domain {
    Bacteria,
    Archaea,
    Eukaryota,
}

impl Domain {
    /// Order in which domains are colored and listed in legends.
    pub const ALL: [Domain; 3] = [Domain::Bacteria, Domain::Archaea, Domain::Eukaryota];

    pub fn name(&self) -> &'static str {
        match self {
            Domain::Bacteria => "Bacteria",
            Domain::Archaea => "Archaea",
            Domain::Eukaryota => "Eukaryota",
        }
    }

    pub fn is_prokaryote(&self) -> bool {
        matches!(self, Domain::Bacteria | Domain::Archaea)
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Ground-truth attributes of a leaf, filled once by the leaf labeler.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LeafLabels {
    pub protein: Option<String>,
    pub domain: Option<Domain>,
    pub phylum: Option<String>,
    pub class: Option<String>,
    pub accession: Option<String>,
    /// Full `rank__value;...` lineage, set only when the accession resolved.
    pub taxonomy: Option<String>,
    pub species: Option<String>,
    pub rel_clade: Option<String>,
}

/// How an internal-node label was obtained.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", content = "value", rename_all = "snake_case")]
pub enum Resolved<T> {
    Unresolved,
    /// Agreed on by the descendant leaves.
    Consensus(T),
    /// Borrowed from the parent during the repair pass.
    Inherited(T),
}

impl<T> Resolved<T> {
    pub fn value(&self) -> Option<&T> {
        match self {
            Resolved::Unresolved => None,
            Resolved::Consensus(v) | Resolved::Inherited(v) => Some(v),
        }
    }

    pub fn is_unresolved(&self) -> bool {
        matches!(self, Resolved::Unresolved)
    }

    pub fn consensus(value: Option<T>) -> Self {
        value.map_or(Resolved::Unresolved, Resolved::Consensus)
    }
}

impl<T> Default for Resolved<T> {
    fn default() -> Self {
        Resolved::Unresolved
    }
}

/// Derived attributes of an internal node.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct InternalLabels {
    pub protein: Resolved<String>,
    pub domain: Resolved<Domain>,
    /// Lowest lineage shared by all prokaryotic descendants.
    pub clade: Option<String>,
    pub rank: Option<Rank>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Labels {
    Leaf(LeafLabels),
    Internal(InternalLabels),
}

impl Labels {
    pub fn is_leaf(&self) -> bool {
        matches!(self, Labels::Leaf(_))
    }

    pub fn protein(&self) -> Option<&str> {
        match self {
            Labels::Leaf(leaf) => leaf.protein.as_deref(),
            Labels::Internal(internal) => internal.protein.value().map(String::as_str),
        }
    }

    pub fn domain(&self) -> Option<Domain> {
        match self {
            Labels::Leaf(leaf) => leaf.domain,
            Labels::Internal(internal) => internal.domain.value().copied(),
        }
    }

    pub fn as_leaf(&self) -> Option<&LeafLabels> {
        match self {
            Labels::Leaf(leaf) => Some(leaf),
            Labels::Internal(_) => None,
        }
    }

    pub fn as_leaf_mut(&mut self) -> Option<&mut LeafLabels> {
        match self {
            Labels::Leaf(leaf) => Some(leaf),
            Labels::Internal(_) => None,
        }
    }

    pub fn as_internal(&self) -> Option<&InternalLabels> {
        match self {
            Labels::Internal(internal) => Some(internal),
            Labels::Leaf(_) => None,
        }
    }

    pub fn as_internal_mut(&mut self) -> Option<&mut InternalLabels> {
        match self {
            Labels::Internal(internal) => Some(internal),
            Labels::Leaf(_) => None,
        }
    }
}
