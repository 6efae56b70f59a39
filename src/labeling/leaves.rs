use crate::config::AnnotationConfig;
use crate::labeling::naming::{LeafName, NamingScheme};
use crate::labeling::types::{Domain, LeafLabels, Labels};
use crate::metadata::Metadata;
use crate::taxonomy;
use crate::tree::Tree;
use serde::Serialize;
use std::fmt;
use tracing::{debug, warn};

/// Non-fatal problems found while labeling leaves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Diagnostic {
    /// Prokaryotic name without a `GB_`/`RS_` accession.
    MissingAccession { leaf: String },
    UnknownAccession { leaf: String, domain: Domain, accession: String },
    /// Name follows neither the prokaryotic nor the species-code convention.
    UnrecognizedName { leaf: String },
    UnknownSpeciesCode { leaf: String, code: String },
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Diagnostic::MissingAccession { leaf } => write!(f, "{}: no accession in leaf name", leaf),
            Diagnostic::UnknownAccession { leaf, domain, accession } => {
                write!(f, "{}: {} not found in metadata {}", leaf, accession, domain)
            }
            Diagnostic::UnrecognizedName { leaf } => {
                write!(f, "{}: name does not start with a species code", leaf)
            }
            Diagnostic::UnknownSpeciesCode { leaf, code } => {
                write!(f, "{}: species code {} not found in eukaryotic metadata", leaf, code)
            }
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct LabelReport {
    pub leaves: usize,
    pub diagnostics: Vec<Diagnostic>,
}

/// Assigns ground-truth labels to every leaf from its name and the metadata.
pub struct LeafLabeler<'a> {
    metadata: &'a Metadata,
    naming: NamingScheme,
}

impl<'a> LeafLabeler<'a> {
    pub fn new(metadata: &'a Metadata, config: &AnnotationConfig) -> Self {
        Self {
            metadata,
            naming: NamingScheme::new(&config.naming),
        }
    }

    pub fn label(&self, tree: &mut Tree) -> LabelReport {
        let mut report = LabelReport::default();
        for leaf in tree.leaves(tree.root()) {
            let node = tree.node_mut(leaf);
            let labels = self.label_leaf(&node.name, &mut report.diagnostics);
            node.labels = Labels::Leaf(labels);
            report.leaves += 1;
        }

        for diagnostic in &report.diagnostics {
            warn!("{}", diagnostic);
        }
        debug!(
            "Labeled {} leaves with {} diagnostics",
            report.leaves,
            report.diagnostics.len()
        );
        report
    }

    pub fn label_leaf(&self, name: &str, diagnostics: &mut Vec<Diagnostic>) -> LeafLabels {
        let parsed = self.naming.classify(name);
        let mut labels = LeafLabels {
            protein: self.metadata.proteins.family(name).map(str::to_string),
            domain: Some(parsed.domain()),
            ..Default::default()
        };

        match parsed {
            LeafName::Prokaryotic(domain, fields) => {
                labels.phylum = fields.phylum.map(str::to_string);
                labels.class = fields.class.map(str::to_string);
                let Some(accession) = fields.accession else {
                    diagnostics.push(Diagnostic::MissingAccession { leaf: name.to_string() });
                    return labels;
                };
                labels.accession = Some(accession.to_string());

                let lineage = self
                    .metadata
                    .lineages(domain)
                    .and_then(|table| table.get(accession));
                match lineage {
                    Some(taxonomy) => {
                        labels.species = Some(taxonomy::terminal_name(taxonomy).to_string());
                        labels.taxonomy = Some(taxonomy.to_string());
                    }
                    None => diagnostics.push(Diagnostic::UnknownAccession {
                        leaf: name.to_string(),
                        domain,
                        accession: accession.to_string(),
                    }),
                }
            }
            LeafName::Eukaryotic(fields) => {
                // The protein encoded in a eukaryotic name beats any membership list.
                if let Some(protein) = fields.protein {
                    labels.protein = Some(protein.to_string());
                }
                match self.metadata.eukaryota.get(fields.species_code) {
                    Some(record) => {
                        labels.species = Some(record.scientific_name.clone());
                        labels.rel_clade = Some(record.relevant_taxonomy.clone());
                    }
                    None => diagnostics.push(Diagnostic::UnknownSpeciesCode {
                        leaf: name.to_string(),
                        code: fields.species_code.to_string(),
                    }),
                }
            }
            LeafName::Unrecognized => {
                diagnostics.push(Diagnostic::UnrecognizedName { leaf: name.to_string() });
            }
        }
        labels
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::metadata::EukaryoteRecord;

    fn metadata() -> Metadata {
        let mut metadata = Metadata::default();
        metadata.archaea.insert(
            "GB_GCA_001940645.1",
            "d__Archaea;p__Asgardarchaeota;c__Heimdallarchaeia;o__O;f__F;g__G;s__G sp001940645",
        );
        metadata.eukaryota.insert(
            "HOMSAP",
            EukaryoteRecord {
                scientific_name: "Homo sapiens".to_string(),
                relevant_taxonomy: "Obazoa".to_string(),
            },
        );
        metadata.proteins.insert("Arch_Asgardarchaeota_Heimdallarchaeia_GB_GCA_001940645.1_MDVS01_5", "Nse1");
        metadata.proteins.insert("HOMSAP000001_SMC2", "Nse3");
        metadata
    }

    #[test]
    fn test_archaeal_leaf() {
        let metadata = metadata();
        let config = AnnotationConfig::default();
        let labeler = LeafLabeler::new(&metadata, &config);
        let mut diagnostics = Vec::new();
        let labels = labeler.label_leaf(
            "Arch_Asgardarchaeota_Heimdallarchaeia_GB_GCA_001940645.1_MDVS01_5",
            &mut diagnostics,
        );

        assert!(diagnostics.is_empty());
        assert_eq!(labels.domain, Some(Domain::Archaea));
        assert_eq!(labels.protein.as_deref(), Some("Nse1"));
        assert_eq!(labels.phylum.as_deref(), Some("Asgardarchaeota"));
        assert_eq!(labels.class.as_deref(), Some("Heimdallarchaeia"));
        assert_eq!(labels.accession.as_deref(), Some("GB_GCA_001940645.1"));
        assert_eq!(labels.species.as_deref(), Some("G sp001940645"));
        assert!(labels.taxonomy.unwrap().starts_with("d__Archaea"));
    }

    #[test]
    fn test_unknown_accession_is_reported() {
        let metadata = metadata();
        let config = AnnotationConfig::default();
        let labeler = LeafLabeler::new(&metadata, &config);
        let mut diagnostics = Vec::new();
        let labels = labeler.label_leaf("Bact_Foo_Bar_RS_GCF_999.1_x_1", &mut diagnostics);

        assert_eq!(labels.domain, Some(Domain::Bacteria));
        assert_eq!(labels.accession.as_deref(), Some("RS_GCF_999.1"));
        assert_eq!(labels.taxonomy, None);
        assert_eq!(labels.species, None);
        assert_eq!(
            diagnostics,
            vec![Diagnostic::UnknownAccession {
                leaf: "Bact_Foo_Bar_RS_GCF_999.1_x_1".to_string(),
                domain: Domain::Bacteria,
                accession: "RS_GCF_999.1".to_string(),
            }]
        );
    }

    #[test]
    fn test_eukaryotic_protein_overrides_membership() {
        let metadata = metadata();
        let config = AnnotationConfig::default();
        let labeler = LeafLabeler::new(&metadata, &config);
        let mut diagnostics = Vec::new();
        let labels = labeler.label_leaf("HOMSAP000001_SMC2", &mut diagnostics);

        assert!(diagnostics.is_empty());
        assert_eq!(labels.domain, Some(Domain::Eukaryota));
        assert_eq!(labels.protein.as_deref(), Some("SMC2"));
        assert_eq!(labels.species.as_deref(), Some("Homo sapiens"));
        assert_eq!(labels.rel_clade.as_deref(), Some("Obazoa"));
        assert_eq!(labels.accession, None);
    }

    #[test]
    fn test_eukaryotic_misses_are_reported() {
        let metadata = metadata();
        let config = AnnotationConfig::default();
        let labeler = LeafLabeler::new(&metadata, &config);
        let mut diagnostics = Vec::new();

        let unknown = labeler.label_leaf("DROMEL000123_SMC4", &mut diagnostics);
        assert_eq!(unknown.protein.as_deref(), Some("SMC4"));
        assert_eq!(unknown.species, None);

        let odd = labeler.label_leaf("weird_name", &mut diagnostics);
        assert_eq!(odd.domain, Some(Domain::Eukaryota));
        assert_eq!(odd.protein, None);

        assert_eq!(diagnostics.len(), 2);
        assert!(matches!(diagnostics[0], Diagnostic::UnknownSpeciesCode { ref code, .. } if code == "DROMEL"));
        assert!(matches!(diagnostics[1], Diagnostic::UnrecognizedName { .. }));
    }

    #[test]
    fn test_label_whole_tree() {
        let metadata = metadata();
        let config = AnnotationConfig::default();
        let mut tree = Tree::from_newick("(HOMSAP000001_SMC2,(Bact_A_B_noacc,weird));").unwrap();
        let report = LeafLabeler::new(&metadata, &config).label(&mut tree);

        assert_eq!(report.leaves, 3);
        assert_eq!(report.diagnostics.len(), 2);
        for leaf in tree.leaves(tree.root()) {
            assert!(tree.node(leaf).labels.domain().is_some());
        }
    }
}
