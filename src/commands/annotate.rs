use crate::cli::InputArgs;
use crate::commands::load_input;
use anyhow::{Context, Result};
use smc_itol_tools::export::itol::{self, DatasetPaths};
use smc_itol_tools::pipeline;
use std::fs;
use std::path::PathBuf;
use tracing::info;

pub fn run(input: InputArgs, output_dir: PathBuf) -> Result<()> {
    let mut loaded = load_input(&input)?;

    fs::create_dir_all(&output_dir)
        .with_context(|| format!("Failed to create output directory {}", output_dir.display()))?;
    let reformatted = output_dir.join(format!("{}.reformatted", loaded.basename));
    fs::write(&reformatted, loaded.tree.to_newick())
        .with_context(|| format!("Failed to write {}", reformatted.display()))?;
    info!("Wrote prepared tree to {}", reformatted.display());

    let (summary, layers) = pipeline::annotate(&mut loaded.tree, &loaded.metadata, &loaded.config);

    let paths = DatasetPaths::new(&output_dir, &loaded.basename);
    itol::write_datasets(&paths, &layers, &loaded.config).context("Failed to write iTOL datasets")?;

    if !summary.leaves.diagnostics.is_empty() {
        info!(
            "{} leaves could not be fully labeled; see warnings above",
            summary.leaves.diagnostics.len()
        );
    }
    Ok(())
}
