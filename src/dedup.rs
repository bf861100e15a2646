//! Removal of MRs shared between dataset splits.
//!
//! The test split is kept intact. Devel instances whose MR also appears in
//! test (`mr` or `orig_mr` column) are dropped; then train instances whose MR
//! appears in devel or test are dropped. MRs are compared after
//! delexicalizing `name` and `near`, ignoring item order.

use crate::da::{parse_mr, DialogueAct};
use crate::dataset::Table;
use crate::Result;
use std::collections::HashSet;
use std::path::{Path, PathBuf};

/// Slots whose values are replaced by placeholders before comparison.
pub const DELEX_SLOTS: &[&str] = &["name", "near"];

/// Default suffix inserted before the extension of filtered files.
pub const DEFAULT_SUFFIX: &str = ".no-ol";

/// Order-insensitive identity of a delexicalized MR.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MrKey(Vec<(String, String, String)>);

impl MrKey {
    /// Key of a parsed act.
    #[must_use]
    pub fn of(act: &DialogueAct) -> Self {
        let delex = act.delexicalized(DELEX_SLOTS);
        let mut items: Vec<_> = delex
            .items()
            .iter()
            .map(|i| (i.act.clone(), i.slot.clone(), i.value.clone()))
            .collect();
        items.sort();
        Self(items)
    }

    /// Parse a bracket-format MR and key it.
    pub fn parse(raw: &str) -> Result<Self> {
        Ok(Self::of(&parse_mr(raw)?))
    }
}

/// Overlap statistics of one filtered split.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SplitReport {
    /// Instances dropped.
    pub removed: usize,
    /// Instances before filtering.
    pub total: usize,
    /// Distinct MRs that overlap with the reference splits.
    pub overlapping_mrs: usize,
    /// Distinct MRs in the split.
    pub distinct_mrs: usize,
}

/// Result of filtering devel and train against test.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupReport {
    /// Devel split statistics.
    pub devel: SplitReport,
    /// Train split statistics.
    pub train: SplitReport,
}

/// Filtered tables, ready to be written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupOutput {
    /// Train rows that survive.
    pub train: Table,
    /// Devel rows that survive.
    pub devel: Table,
    /// Statistics.
    pub report: DedupReport,
}

fn keys(table: &Table, column: &str) -> Result<Vec<MrKey>> {
    table
        .column(column)?
        .into_iter()
        .map(MrKey::parse)
        .collect()
}

/// Drop rows of `table` whose key is in `reference`.
fn filter_split(table: &mut Table, reference: &HashSet<MrKey>) -> Result<(SplitReport, HashSet<MrKey>)> {
    let row_keys = keys(table, "mr")?;
    let distinct: HashSet<MrKey> = row_keys.iter().cloned().collect();
    let dropped: Vec<bool> = row_keys.iter().map(|k| reference.contains(k)).collect();

    let report = SplitReport {
        removed: dropped.iter().filter(|d| **d).count(),
        total: table.len(),
        overlapping_mrs: distinct.intersection(reference).count(),
        distinct_mrs: distinct.len(),
    };
    table.retain_indices(|i| !dropped[i]);
    Ok((report, distinct))
}

/// Filter devel and train against test (and train against devel).
pub fn remove_overlaps(train: Table, devel: Table, test: &Table) -> Result<DedupOutput> {
    let mut reference: HashSet<MrKey> = keys(test, "mr")?.into_iter().collect();
    if test.column_index("orig_mr").is_some() {
        reference.extend(keys(test, "orig_mr")?);
    }

    let mut devel = devel;
    let (devel_report, devel_keys) = filter_split(&mut devel, &reference)?;
    log::info!(
        "[dedup] devel: removing {} / {} instances, {} / {} distinct MRs",
        devel_report.removed,
        devel_report.total,
        devel_report.overlapping_mrs,
        devel_report.distinct_mrs
    );

    // all devel MRs count, including the dropped ones
    reference.extend(devel_keys);

    let mut train = train;
    let (train_report, _) = filter_split(&mut train, &reference)?;
    log::info!(
        "[dedup] train: removing {} / {} instances, {} / {} distinct MRs",
        train_report.removed,
        train_report.total,
        train_report.overlapping_mrs,
        train_report.distinct_mrs
    );

    Ok(DedupOutput {
        train,
        devel,
        report: DedupReport {
            devel: devel_report,
            train: train_report,
        },
    })
}

/// `data/devel.csv` + `.no-ol` → `data/devel.no-ol.csv`.
///
/// ```
/// use semerr::dedup::suffixed_path;
/// use std::path::Path;
///
/// assert_eq!(suffixed_path(Path::new("data/devel.csv"), ".no-ol"), Path::new("data/devel.no-ol.csv"));
/// assert_eq!(suffixed_path(Path::new("train"), ".no-ol"), Path::new("train.no-ol"));
/// ```
#[must_use]
pub fn suffixed_path(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match path.extension() {
        Some(ext) => format!("{}{}.{}", stem, suffix, ext.to_string_lossy()),
        None => format!("{}{}", stem, suffix),
    };
    path.with_file_name(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(column: &str, mrs: &[&str]) -> Table {
        let mut t = Table::new(vec![column.to_string(), "ref".to_string()]);
        for (i, mr) in mrs.iter().enumerate() {
            t.push_row(vec![mr.to_string(), format!("text {}", i)]).unwrap();
        }
        t
    }

    #[test]
    fn key_ignores_names_and_order() {
        let a = MrKey::parse("name[Aromi], food[French], near[Avalon]").unwrap();
        let b = MrKey::parse("food[French], near[Ranch], name[Cotto]").unwrap();
        let c = MrKey::parse("name[Aromi], food[Italian]").unwrap();
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn key_keeps_repeats() {
        let once = MrKey::parse("food[French]").unwrap();
        let twice = MrKey::parse("food[French], food[French]").unwrap();
        assert_ne!(once, twice);
    }

    #[test]
    fn devel_and_train_are_filtered() {
        let test = {
            let mut t = Table::new(vec!["mr".into(), "ref".into(), "orig_mr".into()]);
            t.push_row(vec!["name[A], food[French]".into(), "x".into(), "name[A], food[Indian]".into()])
                .unwrap();
            t
        };
        let devel = table(
            "mr",
            &["name[B], food[French]", "name[B], food[Chinese]", "name[C], food[Indian]"],
        );
        let train = table(
            "mr",
            &["name[D], food[Chinese]", "name[D], food[English]", "name[E], food[French]"],
        );

        let out = remove_overlaps(train, devel, &test).unwrap();

        assert_eq!(out.devel.column("mr").unwrap(), vec!["name[B], food[Chinese]"]);
        assert_eq!(out.report.devel.removed, 2);
        assert_eq!(out.report.devel.total, 3);
        assert_eq!(out.report.devel.overlapping_mrs, 2);
        assert_eq!(out.report.devel.distinct_mrs, 3);

        // Chinese matches devel, French matches test
        assert_eq!(out.train.column("mr").unwrap(), vec!["name[D], food[English]"]);
        assert_eq!(out.report.train.removed, 2);
        assert_eq!(out.report.train.overlapping_mrs, 2);
    }

    #[test]
    fn dropped_devel_mrs_still_filter_train() {
        let test = table("mr", &["food[French]"]);
        let devel = table("mr", &["food[French]"]);
        let train = table("mr", &["food[French]", "food[Indian]"]);
        let out = remove_overlaps(train, devel, &test).unwrap();
        assert!(out.devel.is_empty());
        assert_eq!(out.train.len(), 1);
    }

    #[test]
    fn missing_mr_column_fails() {
        let test = table("meaning", &["food[French]"]);
        let devel = table("mr", &[]);
        let train = table("mr", &[]);
        assert!(remove_overlaps(train, devel, &test).is_err());
    }
}
