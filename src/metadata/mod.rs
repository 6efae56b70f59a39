//! Lineage tables, eukaryotic species metadata and protein membership lists.

use crate::error::{Error, Result};
use crate::labeling::types::Domain;
use serde::Deserialize;
use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

#[derive(Deserialize)]
struct LineageRow {
    accession: String,
    gtdb_taxonomy: String,
}

#[derive(Deserialize)]
struct EukaryoteRow {
    #[serde(rename = "Abbreviation")]
    abbreviation: String,
    #[serde(rename = "Scientific name")]
    scientific_name: String,
    #[serde(rename = "relevant taxonomy")]
    relevant_taxonomy: String,
}

fn delimiter_for(path: &Path) -> u8 {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some(ext) if ext.eq_ignore_ascii_case("tsv") => b'\t',
        _ => b',',
    }
}

fn table_reader<R: Read>(reader: R, delimiter: u8) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(delimiter)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader)
}

/// Accession → full GTDB lineage for one prokaryotic domain.
#[derive(Debug, Clone, Default)]
pub struct LineageTable {
    rows: HashMap<String, String>,
}

impl LineageTable {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let table = Self::from_reader(file, delimiter_for(path)).map_err(|source| Error::Table {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded {} lineages from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> csv::Result<Self> {
        let mut rows = HashMap::new();
        for row in table_reader(reader, delimiter).deserialize() {
            let row: LineageRow = row?;
            rows.insert(row.accession, row.gtdb_taxonomy);
        }
        Ok(Self { rows })
    }

    pub fn insert(&mut self, accession: impl Into<String>, taxonomy: impl Into<String>) {
        self.rows.insert(accession.into(), taxonomy.into());
    }

    pub fn get(&self, accession: &str) -> Option<&str> {
        self.rows.get(accession).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EukaryoteRecord {
    pub scientific_name: String,
    /// Coarse supergroup such as `Obazoa` or `Discoba`.
    pub relevant_taxonomy: String,
}

/// Six-letter species code → species metadata.
#[derive(Debug, Clone, Default)]
pub struct EukaryoteTable {
    rows: HashMap<String, EukaryoteRecord>,
}

impl EukaryoteTable {
    pub fn from_path(path: &Path) -> Result<Self> {
        let file = fs::File::open(path)?;
        let table = Self::from_reader(file, delimiter_for(path)).map_err(|source| Error::Table {
            path: path.to_path_buf(),
            source,
        })?;
        info!("Loaded {} eukaryotic species from {}", table.len(), path.display());
        Ok(table)
    }

    pub fn from_reader<R: Read>(reader: R, delimiter: u8) -> csv::Result<Self> {
        let mut rows = HashMap::new();
        for row in table_reader(reader, delimiter).deserialize() {
            let row: EukaryoteRow = row?;
            rows.insert(
                row.abbreviation,
                EukaryoteRecord {
                    scientific_name: row.scientific_name,
                    relevant_taxonomy: row.relevant_taxonomy,
                },
            );
        }
        Ok(Self { rows })
    }

    pub fn insert(&mut self, code: impl Into<String>, record: EukaryoteRecord) {
        self.rows.insert(code.into(), record);
    }

    pub fn get(&self, code: &str) -> Option<&EukaryoteRecord> {
        self.rows.get(code)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Leaf name → protein family, gathered from one list file per family.
#[derive(Debug, Clone, Default)]
pub struct ProteinMemberships {
    members: HashMap<String, String>,
}

impl ProteinMemberships {
    /// Family label encoded in a list file name: `clade.Nse1.txt` → `Nse1`.
    pub fn family_from_filename(path: &Path) -> Option<String> {
        let file_name = path.file_name()?.to_str()?;
        let parts: Vec<&str> = file_name.split('.').collect();
        match parts.len() {
            0 => None,
            1 => Some(parts[0].to_string()),
            n => Some(parts[n - 2].to_string()).filter(|s| !s.is_empty()),
        }
    }

    pub fn from_files(paths: &[PathBuf]) -> Result<Self> {
        let mut memberships = Self::default();
        if paths.is_empty() {
            info!("No protein membership lists provided");
        }
        for path in paths {
            let family = Self::family_from_filename(path).ok_or_else(|| {
                Error::Config(format!("cannot derive a family name from {}", path.display()))
            })?;
            let content = fs::read_to_string(path)?;
            let added = memberships.add_list(&family, &content);
            debug!("{} members of {} read from {}", added, family, path.display());
        }
        Ok(memberships)
    }

    /// Adds one family list (one leaf name per line); returns the member count.
    pub fn add_list(&mut self, family: &str, content: &str) -> usize {
        let mut added = 0;
        for line in content.lines().map(str::trim).filter(|l| !l.is_empty()) {
            self.members.insert(line.to_string(), family.to_string());
            added += 1;
        }
        added
    }

    pub fn insert(&mut self, leaf: impl Into<String>, family: impl Into<String>) {
        self.members.insert(leaf.into(), family.into());
    }

    pub fn family(&self, leaf: &str) -> Option<&str> {
        self.members.get(leaf).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// Everything the leaf labeler reads besides the tree itself.
#[derive(Debug, Clone, Default)]
pub struct Metadata {
    pub archaea: LineageTable,
    pub bacteria: LineageTable,
    pub eukaryota: EukaryoteTable,
    pub proteins: ProteinMemberships,
}

impl Metadata {
    pub fn load(archaea: &Path, bacteria: &Path, eukaryota: &Path, protein_lists: &[PathBuf]) -> Result<Self> {
        Ok(Self {
            archaea: LineageTable::from_path(archaea)?,
            bacteria: LineageTable::from_path(bacteria)?,
            eukaryota: EukaryoteTable::from_path(eukaryota)?,
            proteins: ProteinMemberships::from_files(protein_lists)?,
        })
    }

    pub fn lineages(&self, domain: Domain) -> Option<&LineageTable> {
        match domain {
            Domain::Archaea => Some(&self.archaea),
            Domain::Bacteria => Some(&self.bacteria),
            Domain::Eukaryota => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_lineage_table_ignores_extra_columns() {
        let csv = "accession,ambiguous_bases,gtdb_taxonomy\n\
                   GB_GCA_001940645.1,0,d__Archaea;p__Asgardarchaeota;c__Heimdallarchaeia\n\
                   RS_GCF_000009045.1,3,d__Bacteria;p__Firmicutes;c__Bacilli\n";
        let table = LineageTable::from_reader(csv.as_bytes(), b',').unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(
            table.get("RS_GCF_000009045.1"),
            Some("d__Bacteria;p__Firmicutes;c__Bacilli")
        );
        assert_eq!(table.get("GB_missing.1"), None);
    }

    #[test]
    fn test_eukaryote_table_from_tsv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("euk.tsv");
        let mut file = fs::File::create(&path).unwrap();
        writeln!(file, "Abbreviation\tScientific name\trelevant taxonomy\tBUSCO").unwrap();
        writeln!(file, "HOMSAP\tHomo sapiens\tObazoa\t99.1").unwrap();
        drop(file);

        let table = EukaryoteTable::from_path(&path).unwrap();
        let record = table.get("HOMSAP").unwrap();
        assert_eq!(record.scientific_name, "Homo sapiens");
        assert_eq!(record.relevant_taxonomy, "Obazoa");
    }

    #[test]
    fn test_missing_column_is_table_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.csv");
        fs::write(&path, "accession,other\nGB_X.1,1\n").unwrap();
        assert!(matches!(LineageTable::from_path(&path), Err(Error::Table { .. })));
    }

    #[test]
    fn test_family_from_filename() {
        let family = |p: &str| ProteinMemberships::family_from_filename(Path::new(p));
        assert_eq!(family("clade.Nse1.txt"), Some("Nse1".to_string()));
        assert_eq!(family("dir/clade.Kite_unknown_archaea.txt"), Some("Kite_unknown_archaea".to_string()));
        assert_eq!(family("SMC2.txt"), Some("SMC2".to_string()));
    }

    #[test]
    fn test_membership_lists_from_files() {
        let dir = tempfile::tempdir().unwrap();
        let nse1 = dir.path().join("clade.Nse1.txt");
        let nse3 = dir.path().join("clade.Nse3.txt");
        fs::write(&nse1, "Arch_A_B_GB_GCA_1.1_x_1\n\nBact_C_D_RS_GCF_2.1_y_2\n").unwrap();
        fs::write(&nse3, "  Bact_C_D_RS_GCF_2.1_y_2  \n").unwrap();

        let memberships = ProteinMemberships::from_files(&[nse1, nse3]).unwrap();
        assert_eq!(memberships.len(), 2);
        assert_eq!(memberships.family("Arch_A_B_GB_GCA_1.1_x_1"), Some("Nse1"));
        // Later lists win for the same leaf.
        assert_eq!(memberships.family("Bact_C_D_RS_GCF_2.1_y_2"), Some("Nse3"));
    }
}
