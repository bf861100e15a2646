//! Dedup command - drop devel/train instances whose MR occurs in test

use super::super::output::log_info;
use crate::dataset::{Table, COMMA};
use crate::dedup::{remove_overlaps, suffixed_path, SplitReport, DEFAULT_SUFFIX};
use clap::Parser;
use std::path::Path;

/// Remove devel/train instances whose MR overlaps with test
#[derive(Parser, Debug)]
pub struct DedupArgs {
    /// Training set (CSV/TSV with an `mr` column)
    pub train: String,

    /// Development set
    pub devel: String,

    /// Test set (left untouched; `orig_mr` is used too when present)
    pub test: String,

    /// Suffix inserted before the extension of the filtered files
    #[arg(short, long, default_value = DEFAULT_SUFFIX)]
    pub suffix: String,
}

/// Filter devel and train and write them next to the inputs.
pub fn run(args: DedupArgs, quiet: bool) -> Result<(), String> {
    let read = |path: &str| Table::read(path).map_err(|e| format!("Failed to read {}: {}", path, e));
    let train = read(&args.train)?;
    let devel = read(&args.devel)?;
    let test = read(&args.test)?;

    let out = remove_overlaps(train, devel, &test).map_err(|e| e.to_string())?;
    log_info(&split_line("devel", &out.report.devel), quiet);
    log_info(&split_line("train", &out.report.train), quiet);

    for (table, input) in [(&out.devel, &args.devel), (&out.train, &args.train)] {
        let path = suffixed_path(Path::new(input), &args.suffix);
        log_info(&format!("Writing {}...", path.display()), quiet);
        table
            .write(&path, COMMA)
            .map_err(|e| format!("Failed to write {}: {}", path.display(), e))?;
    }
    Ok(())
}

fn split_line(name: &str, report: &SplitReport) -> String {
    format!(
        "{}: removing {} / {} instances ({} / {} distinct MRs overlap)",
        name, report.removed, report.total, report.overlapping_mrs, report.distinct_mrs
    )
}
