use crate::error::{Error, Result};
use crate::labeling::types::Domain;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Lookup tables and switches shared by the labelers and dataset builders.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnnotationConfig {
    pub domain_colors: DomainColors,
    pub complex_members: Vec<ComplexMember>,
    pub merged_pair: MergedPair,
    pub naming: NamingConfig,
    /// Replaces spaces in species names for the labels dataset.
    pub relabel_filler: String,
    /// Also color domain-labeled nodes whose leaves are not all of that domain.
    pub extended_branch_colors: bool,
    pub metadata: MetadataPaths,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DomainColors {
    pub bacteria: String,
    pub archaea: String,
    pub eukaryota: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplexMember {
    pub protein: String,
    pub complex: String,
    pub color: String,
}

/// Two protein families known to be interspersed in the phylogeny; a node
/// holding exactly these two gets the merged label.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MergedPair {
    pub first: String,
    pub second: String,
    pub label: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct NamingConfig {
    pub archaea_prefix: String,
    pub bacteria_prefix: String,
    /// Leaves from predicted structures, removed before labeling.
    pub predicted_prefix: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MetadataPaths {
    pub archaea: PathBuf,
    pub bacteria: PathBuf,
    pub eukaryota: PathBuf,
}

impl Default for DomainColors {
    fn default() -> Self {
        Self {
            bacteria: "#0044AD".to_string(),
            archaea: "#7F6000".to_string(),
            eukaryota: "#C90067".to_string(),
        }
    }
}

impl Default for MergedPair {
    fn default() -> Self {
        Self {
            first: "Scc1".to_string(),
            second: "Rec8".to_string(),
            label: "Scc1_Rec8".to_string(),
        }
    }
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            archaea_prefix: "Arch".to_string(),
            bacteria_prefix: "Bact".to_string(),
            predicted_prefix: "AF-".to_string(),
        }
    }
}

impl Default for MetadataPaths {
    fn default() -> Self {
        Self {
            archaea: PathBuf::from("../gtdb_selection/ar53_metadata_r207.qscore.family_representative.csv"),
            bacteria: PathBuf::from("../gtdb_selection/bac120_metadata_r207.qscore.family_representative.csv"),
            eukaryota: PathBuf::from("../euk5proteomes/Euk5FinalSet.adjust.busco.euk5_tree_abbrev.csv"),
        }
    }
}

fn default_complex_members() -> Vec<ComplexMember> {
    let table = [
        ("SMC2", "Condensin", "#ddcc77"),
        ("SMC4", "Condensin", "#ddcc77"),
        ("SMC3", "Cohesin", "#4477aa"),
        ("SMC1", "Cohesin", "#4477aa"),
        ("SMC5", "SMC5/6", "#aa3377"),
        ("SMC6", "SMC5/6", "#aa3377"),
        ("CAPH", "CondensinI", "#999933"),
        ("CAPH2", "CondensinII", "#117733"),
        ("Scc1", "Cohesin", "#4477aa"),
        ("Scc1_Rec8", "Cohesin", "#4477aa"),
        ("Rec8", "Cohesin", "#4477aa"),
        ("Nse4", "SMC5/6", "#aa3377"),
        ("Nse1", "SMC5/6", "#aa3377"),
        ("Nse3", "SMC5/6", "#aa3377"),
    ];
    table
        .iter()
        .map(|(protein, complex, color)| ComplexMember {
            protein: protein.to_string(),
            complex: complex.to_string(),
            color: color.to_string(),
        })
        .collect()
}

impl Default for AnnotationConfig {
    fn default() -> Self {
        Self {
            domain_colors: DomainColors::default(),
            complex_members: default_complex_members(),
            merged_pair: MergedPair::default(),
            naming: NamingConfig::default(),
            relabel_filler: "_".to_string(),
            extended_branch_colors: true,
            metadata: MetadataPaths::default(),
        }
    }
}

impl AnnotationConfig {
    /// Reads `path` when given; otherwise the per-user `config.toml`, falling
    /// back to built-in defaults when that file is absent.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        if let Some(path) = path {
            return Self::from_file(path);
        }
        match Self::user_config_path() {
            Some(user_path) if user_path.exists() => Self::from_file(&user_path),
            _ => Ok(Self::default()),
        }
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)?;
        Self::from_toml(&content)
            .map_err(|e| Error::Config(format!("{}: {}", path.display(), e)))
    }

    pub fn from_toml(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| Error::Config(e.to_string()))
    }

    pub fn user_config_path() -> Option<PathBuf> {
        ProjectDirs::from("org", "smcevolution", "smc-itol-tools")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    pub fn domain_color(&self, domain: Domain) -> &str {
        match domain {
            Domain::Bacteria => &self.domain_colors.bacteria,
            Domain::Archaea => &self.domain_colors.archaea,
            Domain::Eukaryota => &self.domain_colors.eukaryota,
        }
    }

    pub fn complex_member(&self, protein: &str) -> Option<&ComplexMember> {
        self.complex_members.iter().find(|m| m.protein == protein)
    }

    /// Distinct complexes with their strip color, in table order.
    pub fn complex_legend(&self) -> Vec<(&str, &str)> {
        let mut legend: Vec<(&str, &str)> = Vec::new();
        for member in &self.complex_members {
            if !legend.iter().any(|(complex, _)| *complex == member.complex) {
                legend.push((&member.complex, &member.color));
            }
        }
        legend
    }

    /// The merged label when `{a, b}` is the configured paralog pair.
    pub fn merged_label(&self, a: &str, b: &str) -> Option<&str> {
        let pair = &self.merged_pair;
        let hit = (a == pair.first && b == pair.second) || (a == pair.second && b == pair.first);
        hit.then_some(pair.label.as_str())
    }
}
