//! # semerr
//!
//! Semantic error scoring for data-to-text NLG.
//!
//! Given a meaning representation (MR) and a generated text, `semerr` finds
//! every slot value the text realizes and reports how the text departs from
//! the MR: added, missing, substituted (value error) and repeated
//! information, together with a corrected MR that matches the text.
//!
//! - **Catalog**: slot vocabulary and regex realizations, loaded from TOML
//! - **Matching**: raw candidate mentions with character spans
//! - **Disambiguation**: one interpretation per span, gold MR breaks ties
//! - **Diff**: added / missing / valerr / repeated plus a signed per-value diff
//! - **Aggregation**: SemErr and per-instance buckets over a corpus
//!
//! ## Quick Start
//!
//! ```rust
//! use semerr::{da::parse_mr, Evaluator, FixMode, PatternCatalog};
//!
//! let evaluator = Evaluator::new(PatternCatalog::e2e(), FixMode::All);
//! let mr = parse_mr("name[The Eagle], food[Italian], area[riverside]").unwrap();
//!
//! let result = evaluator.evaluate(&mr, "The Eagle serves Italian food.").unwrap();
//! assert_eq!(result.counts.missing, 1);
//! assert_eq!(result.diff.to_json(), r#"{"area":{"riverside":-1}}"#);
//! assert_eq!(result.corrected_mr, "name[The Eagle], food[Italian]");
//! ```
//!
//! ## Corpus scoring
//!
//! ```rust,no_run
//! use semerr::{dataset::Dataset, Evaluator, FixMode, PatternCatalog};
//!
//! let dataset = Dataset::from_path("outputs.tsv")?;
//! let report = Evaluator::new(PatternCatalog::e2e(), FixMode::All).score_corpus(&dataset, false)?;
//! println!("SemErr = {:.4}", report.stats.sem_err_rate());
//! # Ok::<(), semerr::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Adds |
//! |---------|---------|------|
//! | `cli` | yes | command implementations for the `semerr` binary (`clap`) |
//! | `parallel` | no | multi-threaded corpus scoring (`rayon`) |

#![warn(missing_docs)]

pub mod aggregate;
pub mod catalog;
pub mod da;
pub mod dataset;
pub mod dedup;
pub mod diff;
pub mod disambiguate;
mod error;
pub mod eval;
pub mod matcher;

#[cfg(feature = "cli")]
pub mod cli;

pub use aggregate::{Bucket, CorpusStats, StatsRecord};
pub use catalog::PatternCatalog;
pub use da::{ActItem, DialogueAct};
pub use diff::{diff_mrs, DiffOutcome, ErrorCounts, FixMode, SlotDiff};
pub use disambiguate::{extracted_mr, resolve_mentions};
pub use error::{Error, Result};
pub use eval::{CorpusReport, Evaluator, Explanation, InstanceResult};
pub use matcher::Matcher;

pub use semerr_core::{MeaningRepresentation, Mention, Span};
