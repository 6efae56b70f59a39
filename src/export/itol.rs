use crate::config::AnnotationConfig;
use crate::error::Result;
use crate::labeling::types::Domain;
use crate::layers::{BranchColor, BranchColorKind, ComplexStrip, Layers, NodeLabel, ParalogMarker};
use std::borrow::Cow;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use tracing::info;

const DOMAIN_SUFFIX: &str = "reformatted.iTOL_domain.dataset.txt";
const LABELS_SUFFIX: &str = "reformatted.iTOL_labels.dataset.txt";
const PARALOGS_SUFFIX: &str = "reformatted.iTOL_paralogshapes.dataset.txt";
const MEMBERSHIP_SUFFIX: &str = "reformatted.smc_complex_memberships.txt";

const PARALOG_COLOR: &str = "#AC3A6D";

/// Output locations of the four dataset files for one tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetPaths {
    pub domain: PathBuf,
    pub labels: PathBuf,
    pub paralogs: PathBuf,
    pub memberships: PathBuf,
}

impl DatasetPaths {
    pub fn new(output_dir: &Path, tree_basename: &str) -> Self {
        let path = |suffix: &str| output_dir.join(format!("{}.{}", tree_basename, suffix));
        Self {
            domain: path(DOMAIN_SUFFIX),
            labels: path(LABELS_SUFFIX),
            paralogs: path(PARALOGS_SUFFIX),
            memberships: path(MEMBERSHIP_SUFFIX),
        }
    }
}

/// Writes every layer to its dataset file, creating or truncating each one.
pub fn write_datasets(paths: &DatasetPaths, layers: &Layers, config: &AnnotationConfig) -> Result<()> {
    write_file(&paths.domain, |w| write_branch_colors(w, &layers.branch_colors, config))?;
    write_file(&paths.labels, |w| write_labels(w, &layers.labels, config))?;
    write_file(&paths.paralogs, |w| write_paralogs(w, &layers.paralogs))?;
    write_file(&paths.memberships, |w| write_memberships(w, &layers.memberships, config))?;
    info!("Wrote iTOL datasets next to {}", paths.domain.display());
    Ok(())
}

fn write_file<F>(path: &Path, write: F) -> Result<()>
where
    F: FnOnce(&mut BufWriter<File>) -> std::io::Result<()>,
{
    let mut writer = BufWriter::new(File::create(path)?);
    write(&mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Free-text field for a comma-separated row. Commas become `filler`.
fn field<'a>(value: &'a str, filler: &str) -> Cow<'a, str> {
    if value.contains(',') {
        Cow::Owned(value.replace(',', filler))
    } else {
        Cow::Borrowed(value)
    }
}

/// Domain legend order used by the branch style dataset.
const LEGEND_DOMAINS: [Domain; 3] = [Domain::Eukaryota, Domain::Archaea, Domain::Bacteria];

pub fn write_branch_colors<W: Write>(w: &mut W, records: &[BranchColor], config: &AnnotationConfig) -> std::io::Result<()> {
    let colors: Vec<&str> = LEGEND_DOMAINS.iter().map(|&d| config.domain_color(d)).collect();
    let names: Vec<&str> = LEGEND_DOMAINS.iter().map(Domain::name).collect();

    writeln!(w, "DATASET_STYLE")?;
    writeln!(w, "SEPARATOR COMMA")?;
    writeln!(w, "DATASET_LABEL,Domain")?;
    writeln!(w, "COLOR,#ffff00")?;
    writeln!(w, "LEGEND_TITLE,Domain")?;
    writeln!(w, "LEGEND_POSITION_X,100")?;
    writeln!(w, "LEGEND_POSITION_Y,100")?;
    writeln!(w, "LEGEND_HORIZONTAL,0")?;
    writeln!(w, "LEGEND_SHAPES,1,1,1")?;
    writeln!(w, "LEGEND_COLORS,{}", colors.join(","))?;
    writeln!(w, "LEGEND_LABELS,{}", names.join(","))?;
    writeln!(w, "LEGEND_SHAPE_SCALES,1,1,1")?;
    writeln!(w, "DATA")?;
    for record in records {
        let style = match record.kind {
            BranchColorKind::Exact => "normal",
            BranchColorKind::Extended => "dashed",
        };
        writeln!(w, "{},branch,clade,{},1,{}", record.node, record.color, style)?;
    }
    Ok(())
}

pub fn write_labels<W: Write>(w: &mut W, records: &[NodeLabel], config: &AnnotationConfig) -> std::io::Result<()> {
    writeln!(w, "LABELS")?;
    writeln!(w, "SEPARATOR COMMA")?;
    writeln!(w, "DATA")?;
    for record in records {
        writeln!(w, "{},{}", record.node, field(&record.label, &config.relabel_filler))?;
    }
    Ok(())
}

pub fn write_paralogs<W: Write>(w: &mut W, records: &[ParalogMarker]) -> std::io::Result<()> {
    writeln!(w, "DATASET_SYMBOL")?;
    writeln!(w, "SEPARATOR COMMA")?;
    writeln!(w, "DATASET_LABEL,Paralogs")?;
    writeln!(w, "COLOR,{}", PARALOG_COLOR)?;
    writeln!(w, "LEGEND_TITLE,Paralogs")?;
    writeln!(w, "LEGEND_POSITION_X,80")?;
    writeln!(w, "LEGEND_POSITION_Y,80")?;
    writeln!(w, "LEGEND_HORIZONTAL,0")?;
    writeln!(w, "LEGEND_SHAPES,3")?;
    writeln!(w, "LEGEND_COLORS,{}", PARALOG_COLOR)?;
    writeln!(w, "LEGEND_LABELS,paralog")?;
    writeln!(w, "LEGEND_SHAPE_SCALES,1")?;
    writeln!(w, "LEGEND_SHAPE_INVERT,0")?;
    writeln!(w, "MAXIMUM_SIZE,10")?;
    writeln!(w, "DATA")?;
    for record in records {
        writeln!(w, "{},3,1,{},1,0.8", record.leaf, record.color)?;
    }
    Ok(())
}

pub fn write_memberships<W: Write>(w: &mut W, records: &[ComplexStrip], config: &AnnotationConfig) -> std::io::Result<()> {
    let legend = config.complex_legend();
    let shapes = vec!["1"; legend.len()].join(",");
    let colors: Vec<&str> = legend.iter().map(|(_, color)| *color).collect();
    let names: Vec<&str> = legend.iter().map(|(complex, _)| *complex).collect();

    writeln!(w, "DATASET_COLORSTRIP")?;
    writeln!(w, "SEPARATOR COMMA")?;
    writeln!(w, "DATASET_LABEL,SMC_complex")?;
    writeln!(w, "COLOR,#8fce00")?;
    writeln!(w, "COLOR_BRANCHES,0")?;
    writeln!(w, "LEGEND_TITLE,SMC_complexes")?;
    writeln!(w, "LEGEND_POSITION_X,60")?;
    writeln!(w, "LEGEND_POSITION_Y,60")?;
    writeln!(w, "LEGEND_HORIZONTAL,0")?;
    writeln!(w, "LEGEND_SHAPES,{}", shapes)?;
    writeln!(w, "LEGEND_COLORS,{}", colors.join(","))?;
    writeln!(w, "LEGEND_LABELS,{}", names.join(","))?;
    writeln!(w, "LEGEND_SHAPE_SCALES,{}", shapes)?;
    writeln!(w, "STRIP_WIDTH,25")?;
    writeln!(w, "MARGIN,0")?;
    writeln!(w, "BORDER_WIDTH,1")?;
    writeln!(w, "BORDER_COLOR,#000000")?;
    writeln!(w, "COMPLETE_BORDER,1")?;
    writeln!(w, "SHOW_INTERNAL,0")?;
    writeln!(w, "SHOW_STRIP_LABELS,1")?;
    writeln!(w, "STRIP_LABEL_POSITION,center")?;
    writeln!(w, "STRIP_LABEL_SIZE_FACTOR,0.5")?;
    writeln!(w, "STRIP_LABEL_ROTATION,0")?;
    writeln!(w, "STRIP_LABEL_SHIFT,0")?;
    writeln!(w, "STRIP_LABEL_COLOR,#000000")?;
    writeln!(w, "SHOW_LABELS,0")?;
    writeln!(w, "DATA")?;
    for record in records {
        match &record.complex {
            Some(complex) => writeln!(
                w,
                "{},{},{}",
                record.node,
                record.color,
                field(complex, &config.relabel_filler)
            )?,
            None => writeln!(w, "{},{}", record.node, record.color)?,
        }
    }
    Ok(())
}
