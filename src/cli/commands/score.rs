//! Score command - corpus-level SemErr for one or more output files

use super::super::output::{format_report, log_info, write_output};
use super::super::parser::FixTypeArg;
use super::super::utils::load_catalog;
use crate::dataset::{self, Dataset, COMMA, TAB};
use crate::eval::CorpusReport;
use crate::{Evaluator, StatsRecord};
use clap::Parser;
use serde::Serialize;

/// Score output files against their MRs
#[derive(Parser, Debug)]
pub struct ScoreArgs {
    /// CSV/TSV files with MR and output columns (plain text with --mrs)
    #[arg(required = true, value_name = "FILE")]
    pub files: Vec<String>,

    /// Write per-instance statistics as TSV (single input only)
    #[arg(short, long, value_name = "PATH")]
    pub dump: Option<String>,

    /// Write the dataset with corrected MRs as CSV (single input only)
    #[arg(short, long, value_name = "PATH")]
    pub fix: Option<String>,

    /// Error kinds the corrected MR is repaired for
    #[arg(short = 't', long = "fix-type", visible_alias = "type", value_enum, default_value_t = FixTypeArg::All)]
    pub fix_type: FixTypeArg,

    /// TGen-format MRs, one per line; inputs are then plain-text outputs
    #[arg(short, long, value_name = "PATH")]
    pub mrs: Option<String>,

    /// Pattern catalog TOML (defaults to the built-in E2E catalog)
    #[arg(short, long, value_name = "PATH")]
    pub patterns: Option<String>,

    /// Skip instances with unparsable MRs or unknown values instead of failing
    #[arg(long)]
    pub skip_invalid: bool,

    /// Print statistics as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Serialize)]
struct FileRecord<'a> {
    filename: &'a str,
    #[serde(flatten)]
    stats: StatsRecord,
}

/// Score every input file and print the report or summary.
pub fn run(args: ScoreArgs, quiet: bool) -> Result<(), String> {
    if args.files.len() > 1 && (args.dump.is_some() || args.fix.is_some()) {
        return Err("--dump and --fix need exactly one input file".to_string());
    }

    let catalog = load_catalog(args.patterns.as_deref())?;
    let evaluator = Evaluator::new(&catalog, args.fix_type.into());
    let mrs = match &args.mrs {
        Some(path) => Some(
            dataset::load_lines(path).map_err(|e| format!("Failed to read MRs {}: {}", path, e))?,
        ),
        None => None,
    };

    let mut reports = Vec::with_capacity(args.files.len());
    for file in &args.files {
        log_info(&format!("Scoring {}...", file), quiet);
        let data = load_dataset(file, mrs.as_ref())?;
        let report = evaluator
            .score_corpus(&data, args.skip_invalid)
            .map_err(|e| e.to_string())?;

        if args.files.len() == 1 {
            write_side_files(&args, &data, &report, quiet)?;
        }
        reports.push(report);
    }

    if let [report] = reports.as_slice() {
        let content = if args.json {
            json(&report.stats.to_record())? + "\n"
        } else {
            format_report(report)
        };
        return write_output(&content, None);
    }

    for report in &reports {
        log_info(&format_report(report), quiet);
    }
    if args.json {
        let records: Vec<FileRecord<'_>> = reports
            .iter()
            .map(|r| FileRecord {
                filename: &r.name,
                stats: r.stats.to_record(),
            })
            .collect();
        write_output(&(json(&records)? + "\n"), None)
    } else {
        let mut buf = Vec::new();
        dataset::summary_table(&reports)
            .write_to(&mut buf, COMMA)
            .map_err(|e| format!("Failed to write summary: {}", e))?;
        write_output(&String::from_utf8_lossy(&buf), None)
    }
}

fn load_dataset(file: &str, mrs: Option<&Vec<String>>) -> Result<Dataset, String> {
    let data = match mrs {
        Some(mrs) => {
            let texts = dataset::load_lines(file)
                .map_err(|e| format!("Failed to read file {}: {}", file, e))?;
            Dataset::from_mr_lines(file, mrs.clone(), texts)
        }
        None => Dataset::from_path(file),
    };
    data.map_err(|e| e.to_string())
}

fn write_side_files(
    args: &ScoreArgs,
    data: &Dataset,
    report: &CorpusReport,
    quiet: bool,
) -> Result<(), String> {
    if let Some(path) = &args.dump {
        log_info(&format!("Writing dump to {}...", path), quiet);
        dataset::dump_table(data, report)
            .and_then(|t| t.write(path, TAB))
            .map_err(|e| format!("Failed to write {}: {}", path, e))?;
    }
    if let Some(path) = &args.fix {
        log_info(&format!("Writing fixed dataset to {}...", path), quiet);
        dataset::fixed_table(data, report)
            .and_then(|t| t.write(path, COMMA))
            .map_err(|e| format!("Failed to write {}: {}", path, e))?;
    }
    Ok(())
}

fn json<T: Serialize>(value: &T) -> Result<String, String> {
    serde_json::to_string_pretty(value).map_err(|e| format!("Failed to serialize JSON: {}", e))
}
