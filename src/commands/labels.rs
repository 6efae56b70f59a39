use crate::cli::InputArgs;
use crate::commands::load_input;
use anyhow::{Context, Result};
use smc_itol_tools::export::LabelExport;
use smc_itol_tools::labeling;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;

pub fn run(input: InputArgs, output_file: Option<PathBuf>) -> Result<()> {
    let mut loaded = load_input(&input)?;
    let summary = labeling::label_tree(&mut loaded.tree, &loaded.metadata, &loaded.config);
    let export = LabelExport::new(&loaded.basename, &loaded.tree, summary.leaves.diagnostics);

    match output_file {
        Some(path) => {
            let file = File::create(&path).with_context(|| format!("Failed to create {}", path.display()))?;
            let mut writer = BufWriter::new(file);
            export.write_json(&mut writer).context("Failed to write label export")?;
            writer.flush()?;
        }
        None => {
            let stdout = io::stdout();
            let mut writer = stdout.lock();
            export.write_json(&mut writer).context("Failed to write label export")?;
            writeln!(writer)?;
        }
    }
    Ok(())
}
