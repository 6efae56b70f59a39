use crate::layers::palette;
use crate::labeling::types::{Domain, Labels};
use crate::tree::{NodeId, Tree};
use serde::Serialize;
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParalogMarker {
    pub leaf: String,
    pub accession: String,
    pub color: String,
}

/// Marks leaves whose genome accession occurs more than once within a domain.
///
/// Only accessions that resolved in a lineage table count, so unplaced names
/// that happen to share an identifier are not reported. Each duplicated
/// accession gets its own color, assigned in accession order.
pub fn build(tree: &Tree) -> Vec<ParalogMarker> {
    let mut by_genome: BTreeMap<(&str, Domain), Vec<NodeId>> = BTreeMap::new();
    for leaf in tree.leaves(tree.root()) {
        let Labels::Leaf(labels) = &tree.node(leaf).labels else {
            continue;
        };
        if let (Some(domain), Some(accession), Some(_)) =
            (labels.domain, labels.accession.as_deref(), labels.taxonomy.as_ref())
        {
            by_genome.entry((accession, domain)).or_default().push(leaf);
        }
    }

    let duplicated: Vec<(&str, Vec<NodeId>)> = by_genome
        .into_iter()
        .filter(|(_, leaves)| leaves.len() > 1)
        .map(|((accession, _), leaves)| (accession, leaves))
        .collect();
    let colors = palette::hue_rotation(duplicated.len());

    duplicated
        .iter()
        .zip(colors)
        .flat_map(|((accession, leaves), color)| {
            leaves.iter().map(move |&leaf| ParalogMarker {
                leaf: tree.node(leaf).name.clone(),
                accession: accession.to_string(),
                color: color.clone(),
            })
        })
        .collect()
}
