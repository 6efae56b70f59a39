//! Leaf naming conventions.
//!
//! Prokaryotic leaves look like
//! `Arch_<phylum>_<class>_GB_GCA_001940645.1_MDVS01000047.1_5`, eukaryotic
//! leaves like `HALSEO004537_Nse1` (six-letter species code, six digits,
//! protein name).

use crate::config::NamingConfig;
use crate::labeling::types::Domain;
use once_cell::sync::Lazy;
use regex::Regex;

static ACCESSION_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_((GB|RS)_[^.]+\.\d+)_").expect("valid accession regex"));
static SPECIES_CODE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([A-Za-z]{6})(\d{6})").expect("valid species code regex"));

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProkaryoticName<'a> {
    pub phylum: Option<&'a str>,
    pub class: Option<&'a str>,
    pub accession: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EukaryoticName<'a> {
    /// Six-letter species code keying the eukaryotic metadata table.
    pub species_code: &'a str,
    pub protein: Option<&'a str>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LeafName<'a> {
    Prokaryotic(Domain, ProkaryoticName<'a>),
    Eukaryotic(EukaryoticName<'a>),
    /// Eukaryote by elimination, but without the species-code convention.
    Unrecognized,
}

impl LeafName<'_> {
    pub fn domain(&self) -> Domain {
        match self {
            LeafName::Prokaryotic(domain, _) => *domain,
            LeafName::Eukaryotic(_) | LeafName::Unrecognized => Domain::Eukaryota,
        }
    }
}

/// Ordered prefix rules deciding which convention a leaf name follows.
#[derive(Debug, Clone)]
pub struct NamingScheme {
    rules: Vec<(String, Domain)>,
}

impl NamingScheme {
    pub fn new(config: &NamingConfig) -> Self {
        Self {
            rules: vec![
                (config.archaea_prefix.clone(), Domain::Archaea),
                (config.bacteria_prefix.clone(), Domain::Bacteria),
            ],
        }
    }

    pub fn classify<'a>(&self, name: &'a str) -> LeafName<'a> {
        for (prefix, domain) in &self.rules {
            if name.starts_with(prefix.as_str()) {
                return LeafName::Prokaryotic(*domain, parse_prokaryotic(name));
            }
        }
        match SPECIES_CODE_RE.captures(name) {
            Some(caps) => LeafName::Eukaryotic(EukaryoticName {
                species_code: caps.get(1).map_or("", |m| m.as_str()),
                protein: name.split('_').nth(1).filter(|p| !p.is_empty()),
            }),
            None => LeafName::Unrecognized,
        }
    }
}

fn parse_prokaryotic(name: &str) -> ProkaryoticName<'_> {
    let mut tokens = name.split('_').skip(1);
    ProkaryoticName {
        phylum: tokens.next().filter(|t| !t.is_empty()),
        class: tokens.next().filter(|t| !t.is_empty()),
        accession: ACCESSION_RE
            .captures(name)
            .and_then(|caps| caps.get(1))
            .map(|m| m.as_str()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scheme() -> NamingScheme {
        NamingScheme::new(&NamingConfig::default())
    }

    #[test]
    fn test_archaeal_name() {
        let name = "Arch_Asgardarchaeota_Heimdallarchaeia_GB_GCA_001940645.1_MDVS01000047.1_5";
        let parsed = scheme().classify(name);
        assert_eq!(parsed.domain(), Domain::Archaea);
        assert_eq!(
            parsed,
            LeafName::Prokaryotic(
                Domain::Archaea,
                ProkaryoticName {
                    phylum: Some("Asgardarchaeota"),
                    class: Some("Heimdallarchaeia"),
                    accession: Some("GB_GCA_001940645.1"),
                }
            )
        );
    }

    #[test]
    fn test_bacterial_refseq_name() {
        let parsed = scheme().classify("Bact_Firmicutes_Bacilli_RS_GCF_000009045.1_NC_000964.3_12");
        match parsed {
            LeafName::Prokaryotic(Domain::Bacteria, fields) => {
                assert_eq!(fields.phylum, Some("Firmicutes"));
                assert_eq!(fields.accession, Some("RS_GCF_000009045.1"));
            }
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_prokaryote_without_accession() {
        let parsed = scheme().classify("Bact_Foo_Bar_unplaced");
        match parsed {
            LeafName::Prokaryotic(_, fields) => assert_eq!(fields.accession, None),
            other => panic!("unexpected classification: {:?}", other),
        }
    }

    #[test]
    fn test_eukaryotic_name() {
        let parsed = scheme().classify("HALSEO004537_Nse1");
        assert_eq!(
            parsed,
            LeafName::Eukaryotic(EukaryoticName { species_code: "HALSEO", protein: Some("Nse1") })
        );
    }

    #[test]
    fn test_unrecognized_defaults_to_eukaryote() {
        let parsed = scheme().classify("XP_0012345");
        assert_eq!(parsed, LeafName::Unrecognized);
        assert_eq!(parsed.domain(), Domain::Eukaryota);
    }
}
