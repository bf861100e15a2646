//! Corpus-level statistics.
//!
//! Each instance lands in exactly one [`Bucket`]; totals and bucket counts
//! are plain sums, so [`CorpusStats::merge`] is associative and commutative
//! and partial results from parallel workers can be combined in any order.

use crate::diff::ErrorCounts;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Per-instance outcome class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Bucket {
    /// No error of any kind.
    Ok,
    /// Only added (or repeated) information.
    Added,
    /// Only missing information.
    Missing,
    /// Added and missing together, or any value error.
    Mixed,
}

impl Bucket {
    /// Classify an instance by its error totals.
    ///
    /// ```
    /// use semerr::aggregate::Bucket;
    /// use semerr::diff::ErrorCounts;
    ///
    /// let repeated_only = ErrorCounts { repeated: 1, ..ErrorCounts::default() };
    /// assert_eq!(Bucket::classify(&repeated_only), Bucket::Added);
    /// ```
    #[must_use]
    pub fn classify(counts: &ErrorCounts) -> Self {
        let ErrorCounts {
            added: a,
            missing: m,
            valerr: v,
            repeated: r,
        } = *counts;
        if (a > 0 && m > 0) || v > 0 {
            Bucket::Mixed
        } else if a > 0 || r > 0 {
            Bucket::Added
        } else if m > 0 {
            Bucket::Missing
        } else {
            Bucket::Ok
        }
    }
}

impl fmt::Display for Bucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Bucket::Ok => "OK",
            Bucket::Added => "added",
            Bucket::Missing => "missing",
            Bucket::Mixed => "mixed",
        })
    }
}

/// Running totals over a corpus.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CorpusStats {
    /// Summed error totals.
    pub errors: ErrorCounts,
    /// Summed gold slot counts (the SemErr denominator).
    pub gold_slots: usize,
    /// Number of instances.
    pub instances: usize,
    /// Instances in [`Bucket::Ok`].
    pub ok: usize,
    /// Instances in [`Bucket::Added`].
    pub added_only: usize,
    /// Instances in [`Bucket::Missing`].
    pub missing_only: usize,
    /// Instances in [`Bucket::Mixed`].
    pub mixed: usize,
    /// Instances whose corrected MR string equals the input MR string.
    pub fixed_identical: usize,
}

impl CorpusStats {
    /// Empty totals.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Account for one instance; returns its bucket.
    pub fn record(&mut self, counts: &ErrorCounts, gold_slots: usize) -> Bucket {
        let bucket = Bucket::classify(counts);
        self.errors += *counts;
        self.gold_slots += gold_slots;
        self.instances += 1;
        match bucket {
            Bucket::Ok => self.ok += 1,
            Bucket::Added => self.added_only += 1,
            Bucket::Missing => self.missing_only += 1,
            Bucket::Mixed => self.mixed += 1,
        }
        bucket
    }

    /// Count one corrected MR identical to its input.
    pub fn record_fixed_identical(&mut self) {
        self.fixed_identical += 1;
    }

    /// Combine two partial results.
    #[must_use]
    pub fn merge(mut self, other: &CorpusStats) -> Self {
        self.errors += other.errors;
        self.gold_slots += other.gold_slots;
        self.instances += other.instances;
        self.ok += other.ok;
        self.added_only += other.added_only;
        self.missing_only += other.missing_only;
        self.mixed += other.mixed;
        self.fixed_identical += other.fixed_identical;
        self
    }

    fn per_slot(&self, n: usize) -> f64 {
        if self.gold_slots == 0 {
            0.0
        } else {
            n as f64 / self.gold_slots as f64
        }
    }

    fn per_instance(&self, n: usize) -> f64 {
        if self.instances == 0 {
            0.0
        } else {
            n as f64 / self.instances as f64
        }
    }

    /// (A + M + V + R) / gold slots; 0 for an empty denominator.
    #[must_use]
    pub fn sem_err_rate(&self) -> f64 {
        self.per_slot(self.errors.total())
    }

    /// Added / gold slots.
    #[must_use]
    pub fn insertion_rate(&self) -> f64 {
        self.per_slot(self.errors.added)
    }

    /// Missing / gold slots.
    #[must_use]
    pub fn deletion_rate(&self) -> f64 {
        self.per_slot(self.errors.missing)
    }

    /// Value errors / gold slots.
    #[must_use]
    pub fn substitution_rate(&self) -> f64 {
        self.per_slot(self.errors.valerr)
    }

    /// Fraction of instances in `bucket`.
    #[must_use]
    pub fn bucket_rate(&self, bucket: Bucket) -> f64 {
        self.per_instance(self.bucket_count(bucket))
    }

    /// Number of instances in `bucket`.
    #[must_use]
    pub fn bucket_count(&self, bucket: Bucket) -> usize {
        match bucket {
            Bucket::Ok => self.ok,
            Bucket::Added => self.added_only,
            Bucket::Missing => self.missing_only,
            Bucket::Mixed => self.mixed,
        }
    }

    /// Flat record for tabular/JSON export.
    #[must_use]
    pub fn to_record(&self) -> StatsRecord {
        StatsRecord {
            added_count: self.errors.added,
            missing_count: self.errors.missing,
            val_err_count: self.errors.valerr,
            repeated_count: self.errors.repeated,
            total_gold_slot_count: self.gold_slots,
            total_instances: self.instances,
            inst_ok_rate: self.bucket_rate(Bucket::Ok),
            inst_add_rate: self.bucket_rate(Bucket::Added),
            inst_miss_rate: self.bucket_rate(Bucket::Missing),
            inst_mixed_rate: self.bucket_rate(Bucket::Mixed),
            sem_err_rate: self.sem_err_rate(),
        }
    }
}

impl<'a> std::iter::Sum<&'a CorpusStats> for CorpusStats {
    fn sum<I: Iterator<Item = &'a CorpusStats>>(iter: I) -> Self {
        iter.fold(CorpusStats::new(), |acc, s| acc.merge(s))
    }
}

/// Flat corpus statistics, serialized with camelCase keys.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StatsRecord {
    /// Σ added
    pub added_count: usize,
    /// Σ missing
    pub missing_count: usize,
    /// Σ value errors
    pub val_err_count: usize,
    /// Σ repeated
    pub repeated_count: usize,
    /// Σ gold slot count
    pub total_gold_slot_count: usize,
    /// Number of instances
    pub total_instances: usize,
    /// Fraction of OK instances
    pub inst_ok_rate: f64,
    /// Fraction of added-only instances
    pub inst_add_rate: f64,
    /// Fraction of missing-only instances
    pub inst_miss_rate: f64,
    /// Fraction of mixed instances
    pub inst_mixed_rate: f64,
    /// SemErr
    pub sem_err_rate: f64,
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn arb_instance() -> impl Strategy<Value = (ErrorCounts, usize)> {
        ((0usize..3, 0usize..3, 0usize..3, 0usize..3), 0usize..8).prop_map(
            |((added, missing, valerr, repeated), gold)| {
                (
                    ErrorCounts {
                        added,
                        missing,
                        valerr,
                        repeated,
                    },
                    gold,
                )
            },
        )
    }

    fn fold(instances: &[(ErrorCounts, usize)]) -> CorpusStats {
        let mut stats = CorpusStats::new();
        for (counts, gold) in instances {
            stats.record(counts, *gold);
        }
        stats
    }

    proptest! {
        #[test]
        fn merge_matches_direct_aggregation(
            xs in prop::collection::vec(arb_instance(), 0..10),
            ys in prop::collection::vec(arb_instance(), 0..10),
        ) {
            let merged = fold(&xs).merge(&fold(&ys));
            let all: Vec<_> = xs.iter().chain(ys.iter()).copied().collect();
            prop_assert_eq!(merged, fold(&all));
        }

        #[test]
        fn merge_is_associative(
            xs in prop::collection::vec(arb_instance(), 0..6),
            ys in prop::collection::vec(arb_instance(), 0..6),
            zs in prop::collection::vec(arb_instance(), 0..6),
        ) {
            let (a, b, c) = (fold(&xs), fold(&ys), fold(&zs));
            prop_assert_eq!(a.merge(&b).merge(&c), a.merge(&b.merge(&c)));
        }

        #[test]
        fn buckets_partition_instances(xs in prop::collection::vec(arb_instance(), 0..20)) {
            let stats = fold(&xs);
            prop_assert_eq!(
                stats.ok + stats.added_only + stats.missing_only + stats.mixed,
                stats.instances
            );
        }
    }
}
