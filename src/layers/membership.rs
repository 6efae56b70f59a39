use crate::config::AnnotationConfig;
use crate::tree::Tree;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComplexStrip {
    pub node: String,
    pub color: String,
    /// Set for internal nodes only; leaves carry just the color.
    pub complex: Option<String>,
}

pub fn build(tree: &Tree, config: &AnnotationConfig) -> Vec<ComplexStrip> {
    let mut records = Vec::new();
    for leaf in tree.leaves(tree.root()) {
        let node = tree.node(leaf);
        if let Some(member) = node.labels.protein().and_then(|p| config.complex_member(p)) {
            records.push(ComplexStrip {
                node: node.name.clone(),
                color: member.color.clone(),
                complex: None,
            });
        }
    }

    for id in tree.internal_nodes() {
        if let Some(member) = tree.node(id).labels.protein().and_then(|p| config.complex_member(p)) {
            records.push(ComplexStrip {
                node: tree.node_key(id),
                color: member.color.clone(),
                complex: Some(member.complex.clone()),
            });
        }
    }
    records
}
