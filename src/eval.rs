//! Per-instance pipeline and corpus scoring.
//!
//! ```text
//! text ──► Matcher ──► raw mentions ──► Disambiguator ──► extracted MR ──┐
//! MR string ──► parse ──► gold MR ─────────────┴────────────────────► Differ ──► Aggregator
//! ```
//!
//! With the `parallel` feature, instances of a corpus are scored across
//! threads with `rayon`; results keep input order and are folded with the
//! same associative reduction as the sequential path.

use crate::aggregate::{Bucket, CorpusStats};
use crate::catalog::PatternCatalog;
use crate::da::{serialize_mr, DialogueAct};
use crate::dataset::{Dataset, Instance, MrFormat};
use crate::diff::{diff_mrs, ErrorCounts, FixMode, SlotDiff};
use crate::disambiguate::{extracted_mr, resolve_mentions};
use crate::matcher::Matcher;
use crate::Result;
use semerr_core::{MeaningRepresentation, Mention};
use serde::Serialize;

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Outcome of checking one text against one MR.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct InstanceResult {
    /// Error totals.
    pub counts: ErrorCounts,
    /// Bucket of this instance.
    pub bucket: Bucket,
    /// Signed per-value discrepancies.
    pub diff: SlotDiff,
    /// Extracted MR after clamping and fix-mode repair.
    pub corrected: MeaningRepresentation,
    /// `corrected` in the bracket format.
    pub corrected_mr: String,
    /// Number of items in the gold MR.
    pub gold_slots: usize,
}

/// Intermediate results of the matching stages, for debugging.
#[derive(Debug, Clone, PartialEq)]
pub struct Explanation {
    /// Gold MR after canonicalization.
    pub gold: MeaningRepresentation,
    /// Every candidate mention, in emission order.
    pub raw: Vec<Mention>,
    /// Mentions surviving overlap resolution.
    pub retained: Vec<Mention>,
    /// MR folded from the retained mentions.
    pub extracted: MeaningRepresentation,
}

/// A scored dataset instance.
#[derive(Debug, Clone, PartialEq)]
pub struct ScoredInstance {
    /// Position in the dataset.
    pub index: usize,
    /// Input MR string (TGen input is re-rendered in the bracket format).
    pub orig_mr: String,
    /// Pipeline output.
    pub result: InstanceResult,
}

/// All results for one dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct CorpusReport {
    /// Dataset name.
    pub name: String,
    /// Scored instances in dataset order.
    pub instances: Vec<ScoredInstance>,
    /// Aggregated statistics.
    pub stats: CorpusStats,
    /// Instances left out because their MR was invalid.
    pub skipped: usize,
}

/// Runs the matching pipeline against a compiled catalog.
///
/// # Example
///
/// ```rust
/// use semerr::{da::parse_mr, Bucket, Evaluator, FixMode, PatternCatalog};
///
/// let evaluator = Evaluator::new(PatternCatalog::e2e(), FixMode::All);
/// let act = parse_mr("name[Aromi], eatType[pub]").unwrap();
///
/// let result = evaluator.evaluate(&act, "Aromi is a pub.").unwrap();
/// assert_eq!(result.bucket, Bucket::Ok);
/// assert_eq!(result.corrected_mr, "name[Aromi], eatType[pub]");
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Evaluator<'c> {
    catalog: &'c PatternCatalog,
    fix_mode: FixMode,
}

impl<'c> Evaluator<'c> {
    /// Create an evaluator.
    #[must_use]
    pub fn new(catalog: &'c PatternCatalog, fix_mode: FixMode) -> Self {
        Self { catalog, fix_mode }
    }

    /// The catalog in use.
    #[must_use]
    pub fn catalog(&self) -> &'c PatternCatalog {
        self.catalog
    }

    /// The fix mode in use.
    #[must_use]
    pub fn fix_mode(&self) -> FixMode {
        self.fix_mode
    }

    /// Run matching and overlap resolution, stopping before the diff.
    pub fn explain(&self, act: &DialogueAct, text: &str) -> Result<Explanation> {
        let gold = self.catalog.gold_mr(act)?;
        let raw = Matcher::new(self.catalog).find_mentions(text);
        let retained = resolve_mentions(&raw, &gold);
        let extracted = extracted_mr(&retained);
        Ok(Explanation {
            gold,
            raw,
            retained,
            extracted,
        })
    }

    /// Check one text against its MR.
    pub fn evaluate(&self, act: &DialogueAct, text: &str) -> Result<InstanceResult> {
        let Explanation {
            gold, extracted, ..
        } = self.explain(act, text)?;
        let outcome = diff_mrs(&gold, &extracted, self.fix_mode);
        let corrected_mr = serialize_mr(&outcome.corrected, self.catalog.output());

        Ok(InstanceResult {
            counts: outcome.counts,
            bucket: Bucket::classify(&outcome.counts),
            diff: outcome.diff,
            corrected: outcome.corrected,
            corrected_mr,
            gold_slots: act.len(),
        })
    }

    fn score_instance(
        &self,
        index: usize,
        instance: &Instance,
        format: MrFormat,
    ) -> Result<ScoredInstance> {
        let act = format.parse(&instance.mr)?;
        let orig_mr = match format {
            MrFormat::Bracket => instance.mr.clone(),
            MrFormat::Tgen => serialize_mr(&act.to_counts(), self.catalog.output()),
        };
        let result = self.evaluate(&act, &instance.text)?;
        Ok(ScoredInstance {
            index,
            orig_mr,
            result,
        })
    }

    /// Score every instance of a dataset.
    ///
    /// An instance whose MR fails to parse or names an unknown value aborts
    /// scoring with an error naming the instance, unless `skip_invalid` is set,
    /// in which case it is logged and excluded from every total.
    pub fn score_corpus(&self, dataset: &Dataset, skip_invalid: bool) -> Result<CorpusReport> {
        let indexed: Vec<(usize, &Instance)> = dataset.instances.iter().enumerate().collect();

        #[cfg(feature = "parallel")]
        let results: Vec<Result<ScoredInstance>> = indexed
            .par_iter()
            .map(|(i, inst)| self.score_instance(*i, inst, dataset.format))
            .collect();

        #[cfg(not(feature = "parallel"))]
        let results: Vec<Result<ScoredInstance>> = indexed
            .iter()
            .map(|(i, inst)| self.score_instance(*i, inst, dataset.format))
            .collect();

        let mut stats = CorpusStats::new();
        let mut instances = Vec::with_capacity(results.len());
        let mut skipped = 0;

        for (i, result) in results.into_iter().enumerate() {
            match result {
                Ok(scored) => {
                    stats.record(&scored.result.counts, scored.result.gold_slots);
                    if scored.result.corrected_mr == scored.orig_mr {
                        stats.record_fixed_identical();
                    }
                    instances.push(scored);
                }
                Err(e) if skip_invalid => {
                    log::warn!("[score] {}: instance {} skipped: {}", dataset.name, i + 1, e);
                    skipped += 1;
                }
                Err(e) => {
                    return Err(crate::Error::dataset(format!(
                        "{}: instance {}: {}",
                        dataset.name,
                        i + 1,
                        e
                    )))
                }
            }
        }

        log::info!(
            "[score] {}: {} instances scored, {} skipped, SemErr {:.4}",
            dataset.name,
            stats.instances,
            skipped,
            stats.sem_err_rate()
        );

        Ok(CorpusReport {
            name: dataset.name.clone(),
            instances,
            stats,
            skipped,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::da::parse_mr;
    use crate::Error;

    fn evaluator(mode: FixMode) -> Evaluator<'static> {
        Evaluator::new(PatternCatalog::e2e(), mode)
    }

    fn dataset(rows: &[(&str, &str)]) -> Dataset {
        Dataset {
            name: "test".into(),
            format: MrFormat::Bracket,
            mr_column: "mr".into(),
            text_column: "ref".into(),
            instances: rows
                .iter()
                .map(|(mr, text)| Instance {
                    mr: mr.to_string(),
                    text: text.to_string(),
                })
                .collect(),
        }
    }

    #[test]
    fn missing_area_is_reported() {
        let act = parse_mr("food[Italian], area[riverside]").unwrap();
        let result = evaluator(FixMode::All)
            .evaluate(&act, "It's an Italian place.")
            .unwrap();
        assert_eq!(
            result.counts,
            ErrorCounts {
                missing: 1,
                ..ErrorCounts::default()
            }
        );
        assert_eq!(result.bucket, Bucket::Missing);
        assert_eq!(result.diff.to_json(), r#"{"area":{"riverside":-1}}"#);
        assert_eq!(result.corrected_mr, "food[Italian]");
        assert_eq!(result.gold_slots, 2);
    }

    #[test]
    fn gold_preference_resolves_ambiguous_rating() {
        // "high customer rating" realizes both `high` and `5 out of 5`
        let act = parse_mr("customer rating[5 out of 5]").unwrap();
        let result = evaluator(FixMode::All)
            .evaluate(&act, "It has a high customer rating.")
            .unwrap();
        assert!(result.counts.is_clean());
        assert_eq!(result.corrected_mr, "customer rating[5 out of 5]");
    }

    #[test]
    fn unknown_gold_value_is_an_error() {
        let act = parse_mr("food[Korean]").unwrap();
        let err = evaluator(FixMode::All).evaluate(&act, "Korean food.").unwrap_err();
        assert!(matches!(err, Error::UnknownValue { .. }));
    }

    #[test]
    fn empty_text_misses_everything() {
        let act = parse_mr("name[Aromi], food[French]").unwrap();
        let result = evaluator(FixMode::All).evaluate(&act, "").unwrap();
        assert_eq!(result.counts.missing, 2);
        assert_eq!(result.corrected_mr, "");
    }

    #[test]
    fn empty_mr_adds_everything() {
        let result = evaluator(FixMode::All)
            .evaluate(&DialogueAct::new(), "Aromi is a pub.")
            .unwrap();
        assert_eq!(result.counts.added, 2);
        assert_eq!(result.gold_slots, 0);
    }

    #[test]
    fn explain_exposes_dropped_mentions() {
        let act = parse_mr("priceRange[more than £30]").unwrap();
        let explanation = evaluator(FixMode::All)
            .explain(&act, "It is not cheap.")
            .unwrap();
        assert_eq!(explanation.raw.len(), 4);
        assert_eq!(explanation.retained.len(), 1);
        assert_eq!(explanation.extracted.count("price_range", "more than £30"), 1);
    }

    #[test]
    fn ignore_added_repairs_mr() {
        let act = parse_mr("name[Aromi]").unwrap();
        let result = evaluator(FixMode::IgnoreAdded)
            .evaluate(&act, "Aromi is a pub by the river.")
            .unwrap();
        assert!(result.counts.is_clean());
        assert_eq!(result.corrected_mr, "name[Aromi]");

        let result = evaluator(FixMode::All)
            .evaluate(&act, "Aromi is a pub by the river.")
            .unwrap();
        assert_eq!(result.counts.added, 2);
        assert_eq!(result.corrected_mr, "name[Aromi], eatType[pub], area[riverside]");
    }

    #[test]
    fn corpus_scoring_counts_identical_fixes() {
        let ds = dataset(&[
            ("name[Aromi], eatType[pub]", "Aromi is a pub."),
            ("name[Cotto], food[French]", "Cotto."),
        ]);
        let report = evaluator(FixMode::All).score_corpus(&ds, false).unwrap();
        assert_eq!(report.stats.instances, 2);
        assert_eq!(report.stats.gold_slots, 4);
        assert_eq!(report.stats.errors.missing, 1);
        assert_eq!(report.stats.ok, 1);
        assert_eq!(report.stats.missing_only, 1);
        assert_eq!(report.stats.fixed_identical, 1);
        assert_eq!(report.instances[1].index, 1);
    }

    #[test]
    fn invalid_instance_aborts_or_is_skipped() {
        let ds = dataset(&[
            ("name[Aromi]", "Aromi."),
            ("name[Aromi", "Aromi."),
            ("food[Korean]", "Korean food."),
        ]);
        let err = evaluator(FixMode::All).score_corpus(&ds, false).unwrap_err();
        assert!(err.to_string().contains("instance 2"), "{}", err);

        let report = evaluator(FixMode::All).score_corpus(&ds, true).unwrap();
        assert_eq!(report.skipped, 2);
        assert_eq!(report.stats.instances, 1);
        assert_eq!(report.instances.len(), 1);
    }

    #[test]
    fn tgen_input_is_rendered_for_comparison() {
        let ds = Dataset {
            format: MrFormat::Tgen,
            ..dataset(&[("inform(name=Aromi,eat_type=pub)", "Aromi is a pub.")])
        };
        let report = evaluator(FixMode::All).score_corpus(&ds, false).unwrap();
        assert_eq!(report.instances[0].orig_mr, "name[Aromi], eatType[pub]");
        assert_eq!(report.stats.fixed_identical, 1);
    }
}
