use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Label an SMC gene tree and write iTOL datasets for it
    Annotate {
        #[command(flatten)]
        input: InputArgs,

        /// Directory receiving the reformatted tree and the datasets
        #[arg(short = 'o', long = "output-dir", default_value = ".")]
        output_dir: PathBuf,
    },

    /// Label an SMC gene tree and export every node's labels as JSON
    Labels {
        #[command(flatten)]
        input: InputArgs,

        /// Output JSON file (stdout when omitted)
        #[arg(short = 'o', long = "output")]
        output_file: Option<PathBuf>,
    },
}

#[derive(ClapArgs, Debug, Clone)]
pub struct InputArgs {
    /// Newick tree file
    #[arg(short = 't', long = "tree")]
    pub tree: PathBuf,

    /// Lineage table of archaeal genomes (accession, gtdb_taxonomy)
    #[arg(long)]
    pub archaea: Option<PathBuf>,

    /// Lineage table of bacterial genomes (accession, gtdb_taxonomy)
    #[arg(long)]
    pub bacteria: Option<PathBuf>,

    /// Eukaryotic species table (Abbreviation, Scientific name, relevant taxonomy)
    #[arg(long)]
    pub eukaryota: Option<PathBuf>,

    /// One outgroup leaf, or two leaves whose common ancestor becomes the outgroup
    #[arg(short = 'r', long = "root", num_args = 1..=2)]
    pub root: Vec<String>,

    /// Protein family lists, one leaf name per line (`<clade>.<family>.txt`)
    #[arg(short = 'p', long = "proteins", num_args = 1..)]
    pub proteins: Vec<PathBuf>,

    /// TOML configuration file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,
}
