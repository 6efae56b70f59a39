//! Shared-lineage matching over GTDB-style taxonomy strings
//! (`d__Bacteria;p__Proteobacteria;...;s__Escherichia coli`).

use serde::Serialize;
use std::fmt;

pub const SEGMENT_SEPARATOR: char = ';';
pub const RANK_SEPARATOR: &str = "__";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Rank {
    Species,
    Genus,
    Family,
    Order,
    Class,
    Phylum,
    Domain,
}

impl Rank {
    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "s" => Some(Rank::Species),
            "g" => Some(Rank::Genus),
            "f" => Some(Rank::Family),
            "o" => Some(Rank::Order),
            "c" => Some(Rank::Class),
            "p" => Some(Rank::Phylum),
            "d" => Some(Rank::Domain),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Rank::Species => "species",
            Rank::Genus => "genus",
            Rank::Family => "family",
            Rank::Order => "order",
            Rank::Class => "class",
            Rank::Phylum => "phylum",
            Rank::Domain => "domain",
        }
    }
}

impl fmt::Display for Rank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// The most specific complete lineage segment shared by a set of taxonomies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SharedClade {
    pub rank: Rank,
    pub name: String,
}

/// Longest prefix shared by every input, compared character by character.
pub fn longest_common_prefix<S: AsRef<str>>(items: &[S]) -> String {
    let Some((first, rest)) = items.split_first() else {
        return String::new();
    };
    let mut prefix = first.as_ref();
    for item in rest {
        let end = prefix
            .char_indices()
            .zip(item.as_ref().chars())
            .find(|((_, a), b)| a != b)
            .map(|((idx, _), _)| idx)
            .unwrap_or_else(|| prefix.len().min(item.as_ref().len()));
        prefix = &prefix[..end];
        if prefix.is_empty() {
            break;
        }
    }
    prefix.to_string()
}

/// Shared lineage cut back to the last segment every input has in full.
///
/// A character prefix ending inside a segment (`...;c__Ba`) or on a bare rank
/// marker (`...;s__`) is trimmed to the previous segment boundary.
pub fn shared_lineage<S: AsRef<str>>(taxonomies: &[S]) -> String {
    let prefix = longest_common_prefix(taxonomies);
    let at_boundary = taxonomies.iter().all(|t| {
        let rest = &t.as_ref()[prefix.len()..];
        rest.is_empty() || rest.starts_with(SEGMENT_SEPARATOR)
    });

    let mut lineage = if at_boundary {
        prefix.as_str()
    } else {
        prefix
            .rfind(SEGMENT_SEPARATOR)
            .map_or("", |idx| &prefix[..idx])
    };
    lineage = lineage.trim_end_matches(SEGMENT_SEPARATOR);
    if lineage.ends_with(RANK_SEPARATOR) {
        lineage = lineage
            .rfind(SEGMENT_SEPARATOR)
            .map_or("", |idx| &lineage[..idx]);
    }
    lineage.to_string()
}

/// Splits one `rank__value` segment, rejecting unknown ranks and empty values.
pub fn parse_segment(segment: &str) -> Option<SharedClade> {
    let (code, value) = segment.split_once(RANK_SEPARATOR)?;
    let rank = Rank::from_code(code.trim())?;
    if value.is_empty() {
        return None;
    }
    Some(SharedClade {
        rank,
        name: value.to_string(),
    })
}

/// Lowest complete rank shared by all taxonomies, or `None` when they share
/// nothing usable (empty input, empty strings, malformed segments).
pub fn lowest_shared_clade<S: AsRef<str>>(taxonomies: &[S]) -> Option<SharedClade> {
    let lineage = shared_lineage(taxonomies);
    let lowest = lineage.rsplit(SEGMENT_SEPARATOR).next()?;
    parse_segment(lowest)
}

/// Value of the last segment of a lineage, i.e. the species name for a full
/// GTDB taxonomy.
pub fn terminal_name(taxonomy: &str) -> &str {
    taxonomy.rsplit(RANK_SEPARATOR).next().unwrap_or(taxonomy)
}

#[cfg(test)]
mod tests {
    use super::*;

    const ECOLI: &str = "d__Bacteria;p__Proteobacteria;c__Gammaproteobacteria;o__Enterobacterales;f__Enterobacteriaceae;g__Escherichia;s__Escherichia coli";
    const SALMONELLA: &str = "d__Bacteria;p__Proteobacteria;c__Gammaproteobacteria;o__Enterobacterales;f__Enterobacteriaceae;g__Salmonella;s__Salmonella enterica";

    #[test]
    fn test_character_prefix() {
        assert_eq!(longest_common_prefix(&["abcd", "abce", "abx"]), "ab");
        assert_eq!(longest_common_prefix(&["same", "same"]), "same");
        assert_eq!(longest_common_prefix(&["short", "shorter"]), "short");
        assert_eq!(longest_common_prefix::<&str>(&[]), "");
    }

    #[test]
    fn test_partial_segment_is_trimmed() {
        let taxa = ["d__Bacteria;p__Foo;c__Bar", "d__Bacteria;p__Foo;c__Baz"];
        assert_eq!(shared_lineage(&taxa), "d__Bacteria;p__Foo");
        assert_eq!(
            lowest_shared_clade(&taxa),
            Some(SharedClade { rank: Rank::Phylum, name: "Foo".to_string() })
        );
    }

    #[test]
    fn test_bare_rank_marker_is_trimmed() {
        let taxa = ["d__Archaea;p__X;c__A", "d__Archaea;p__X;c__B"];
        assert_eq!(shared_lineage(&taxa), "d__Archaea;p__X");
        assert_eq!(shared_lineage(&["d__A;s__", "d__A;s__"]), "d__A");
    }

    #[test]
    fn test_genus_level_match() {
        let clade = lowest_shared_clade(&[ECOLI, SALMONELLA]).unwrap();
        assert_eq!(clade.rank, Rank::Family);
        assert_eq!(clade.name, "Enterobacteriaceae");

        let same = lowest_shared_clade(&[ECOLI, ECOLI]).unwrap();
        assert_eq!(same.rank, Rank::Species);
        assert_eq!(same.name, "Escherichia coli");
    }

    #[test]
    fn test_nothing_shared() {
        assert_eq!(lowest_shared_clade::<&str>(&[]), None);
        assert_eq!(lowest_shared_clade(&["", ECOLI]), None);
        assert_eq!(lowest_shared_clade(&["d__Bacteria;p__A", "d__Archaea;p__A"]), None);
        assert_eq!(lowest_shared_clade(&["x__Odd", "x__Odd"]), None);
    }

    #[test]
    fn test_terminal_name() {
        assert_eq!(terminal_name(ECOLI), "Escherichia coli");
        assert_eq!(terminal_name("plain"), "plain");
    }
}
