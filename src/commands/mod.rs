pub mod annotate;
pub mod labels;

use crate::cli::InputArgs;
use crate::utils::progress_bar_builder::ProgressBarBuilder;
use anyhow::{Context, Result};
use smc_itol_tools::config::AnnotationConfig;
use smc_itol_tools::metadata::Metadata;
use smc_itol_tools::pipeline;
use smc_itol_tools::tree::Tree;
use std::path::Path;
use std::time::Duration;

/// A tree read, prepared and paired with the tables needed to label it.
pub(crate) struct LoadedInput {
    pub config: AnnotationConfig,
    pub tree: Tree,
    pub basename: String,
    pub metadata: Metadata,
}

pub(crate) fn load_input(input: &InputArgs) -> Result<LoadedInput> {
    let config = AnnotationConfig::load(input.config.as_deref()).context("Failed to load configuration")?;

    let progress = ProgressBarBuilder::new(format!("Reading {}", input.tree.display()))
        .with_tick(Duration::from_millis(120))
        .build()?;

    let mut tree = Tree::from_newick_file(&input.tree)
        .with_context(|| format!("Failed to read tree {}", input.tree.display()))?;
    pipeline::prepare_tree(&mut tree, &input.root, &config).context("Failed to prepare tree")?;

    progress.set_message("Loading metadata tables");
    let archaea = input.archaea.as_deref().unwrap_or(&config.metadata.archaea);
    let bacteria = input.bacteria.as_deref().unwrap_or(&config.metadata.bacteria);
    let eukaryota = input.eukaryota.as_deref().unwrap_or(&config.metadata.eukaryota);
    let metadata = Metadata::load(archaea, bacteria, eukaryota, &input.proteins).context("Failed to load metadata")?;
    progress.finish_and_clear();

    Ok(LoadedInput {
        basename: tree_basename(&input.tree),
        config,
        tree,
        metadata,
    })
}

fn tree_basename(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| "tree".to_string())
}
