//! Output formatting utilities for CLI commands

use crate::eval::CorpusReport;
use crate::Bucket;
use is_terminal::IsTerminal;
use std::fmt::Write as _;
use std::io::{self, Write};

/// Wrap `text` in an ANSI color code when stdout is a terminal.
pub fn color(code: &str, text: &str) -> String {
    if io::stdout().is_terminal() {
        format!("\x1b[{}m{}\x1b[0m", code, text)
    } else {
        text.to_string()
    }
}

/// Color code for a bucket label.
pub fn bucket_color(bucket: Bucket) -> &'static str {
    match bucket {
        Bucket::Ok => "32",
        Bucket::Added | Bucket::Missing => "33",
        Bucket::Mixed => "31",
    }
}

/// Log info message (respects quiet flag)
pub fn log_info(msg: &str, quiet: bool) {
    if !quiet {
        eprintln!("{}", msg);
    }
}

/// Write output to file or stdout
pub fn write_output(content: &str, path: Option<&str>) -> Result<(), String> {
    if let Some(path) = path {
        std::fs::write(path, content).map_err(|e| format!("Failed to write to {}: {}", path, e))?;
    } else {
        print!("{}", content);
        io::stdout()
            .flush()
            .map_err(|e| format!("Failed to flush stdout: {}", e))?;
    }
    Ok(())
}

/// Plain-text corpus report.
///
/// ```text
/// outputs.tsv
/// A:    12, M:    40, V:     3, R:     1, L:  3120
/// SemERR = 0.0179 [InsRate = 0.0038, DelRate = 0.0128, WVlRate = 0.0010]
/// InstOK :   550 /   630 = 0.8730
/// ...
/// ```
pub fn format_report(report: &CorpusReport) -> String {
    let s = &report.stats;
    let e = &s.errors;
    let mut out = String::new();

    let _ = writeln!(out, "{}", report.name);
    let _ = writeln!(
        out,
        "A: {:5}, M: {:5}, V: {:5}, R: {:5}, L: {:5}",
        e.added, e.missing, e.valerr, e.repeated, s.gold_slots
    );
    let _ = writeln!(
        out,
        "SemERR = {:.4} [InsRate = {:.4}, DelRate = {:.4}, WVlRate = {:.4}]",
        s.sem_err_rate(),
        s.insertion_rate(),
        s.deletion_rate(),
        s.substitution_rate()
    );
    for (label, bucket) in [
        ("InstOK ", Bucket::Ok),
        ("InstAdd", Bucket::Added),
        ("InstMis", Bucket::Missing),
        ("InstM+A", Bucket::Mixed),
    ] {
        let _ = writeln!(
            out,
            "{}: {:5} / {:5} = {:.4}",
            label,
            s.bucket_count(bucket),
            s.instances,
            s.bucket_rate(bucket)
        );
    }
    let _ = writeln!(
        out,
        "Fixed MR String identical to original in {} cases.",
        s.fixed_identical
    );
    if report.skipped > 0 {
        let _ = writeln!(out, "Skipped {} invalid instances.", report.skipped);
    }
    out
}
