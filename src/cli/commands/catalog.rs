//! Catalog command - validate a pattern catalog and list its slots

use super::super::output::{color, write_output};
use super::super::utils::load_catalog;
use crate::catalog::{PatternCatalog, SlotKind};
use clap::Parser;
use std::fmt::Write as _;

/// Validate and summarize a pattern catalog
#[derive(Parser, Debug)]
pub struct CatalogArgs {
    /// Pattern catalog TOML (defaults to the built-in E2E catalog)
    #[arg(short, long, value_name = "PATH")]
    pub patterns: Option<String>,
}

/// Compile the catalog and print one line per slot.
pub fn run(args: CatalogArgs, _quiet: bool) -> Result<(), String> {
    let catalog = load_catalog(args.patterns.as_deref())?;
    write_output(&summarize(&catalog), None)
}

fn summarize(catalog: &PatternCatalog) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{:<16} {:<12} {:>6}  {}", "SLOT", "KIND", "VALUES", "OUTPUT NAME");
    for slot in catalog.slots() {
        let kind = match slot.kind() {
            SlotKind::Verbatim => "verbatim",
            SlotKind::Categorical => "categorical",
        };
        let _ = writeln!(
            out,
            "{:<16} {:<12} {:>6}  {}",
            slot.name(),
            kind,
            catalog.value_count(slot.name()),
            catalog.output().display_slot(slot.name())
        );
    }
    let _ = writeln!(
        out,
        "{} {} slots compiled",
        color("32", "ok:"),
        catalog.slots().len()
    );
    out
}
