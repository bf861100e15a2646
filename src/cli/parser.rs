//! CLI argument parsing and structure definitions

use super::commands;
use crate::FixMode;
use clap::{Parser, Subcommand, ValueEnum};

/// Semantic error scoring for data-to-text NLG outputs
#[derive(Parser)]
#[command(name = "semerr")]
#[command(
    author,
    version,
    about = "Semantic error scoring for data-to-text NLG outputs",
    long_about = r#"
semerr - slot-level semantic accuracy for E2E-style restaurant descriptions

For every (MR, text) pair the text is scanned for realizations of each slot
value. The values found are compared with the MR and counted as:

  added     a slot the MR does not have
  missing   an MR slot the text does not mention
  valerr    the right slot with a different value
  repeated  a value mentioned more often than the MR has it

SemERR = (added + missing + valerr + repeated) / MR slots

EXAMPLES:
  semerr score outputs.tsv
  semerr score -d dump.tsv -f fixed.csv outputs.csv
  semerr score --mrs test-das.txt system-a.txt system-b.txt > summary.csv
  semerr check --mr "name[Aromi], eatType[pub]" Aromi is a pub.
  semerr dedup train.csv devel.csv test.csv
  semerr catalog --patterns my-catalog.toml
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Command to run
    #[command(subcommand)]
    pub command: Commands,

    /// Debug logging on stderr
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    pub verbose: bool,

    /// Errors only; no status messages
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

/// Subcommands of `semerr`
#[derive(Subcommand)]
pub enum Commands {
    /// Score one or more output files against their MRs
    #[command(visible_alias = "s")]
    Score(commands::ScoreArgs),

    /// Check a single text against an MR
    #[command(visible_alias = "c")]
    Check(commands::CheckArgs),

    /// Remove devel/train instances whose MR overlaps with test
    Dedup(commands::DedupArgs),

    /// Validate and summarize a pattern catalog
    Catalog(commands::CatalogArgs),
}

/// Which error kinds the corrected MR is repaired for
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum FixTypeArg {
    /// Repair added, missing and wrong values
    #[default]
    All,
    /// Repair missing slots only; added content is left out of the corrected MR
    #[value(alias = "ignore-added")]
    Missing,
    /// Repair added slots only; missing slots are restored in the corrected MR
    #[value(alias = "ignore-missing")]
    Added,
}

impl From<FixTypeArg> for FixMode {
    fn from(arg: FixTypeArg) -> Self {
        match arg {
            FixTypeArg::All => FixMode::All,
            FixTypeArg::Missing => FixMode::IgnoreAdded,
            FixTypeArg::Added => FixMode::IgnoreMissing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn score_flags() {
        let cli = Cli::parse_from([
            "semerr", "score", "-d", "dump.tsv", "-t", "missing", "--skip-invalid", "out.csv",
        ]);
        match cli.command {
            Commands::Score(args) => {
                assert_eq!(args.files, vec!["out.csv"]);
                assert_eq!(args.dump.as_deref(), Some("dump.tsv"));
                assert_eq!(args.fix_type, FixTypeArg::Missing);
                assert!(args.skip_invalid);
                assert!(args.mrs.is_none());
            }
            _ => panic!("expected score"),
        }
    }

    #[test]
    fn fix_type_aliases() {
        let cli = Cli::parse_from(["semerr", "score", "--fix-type", "ignore-missing", "a.tsv"]);
        match cli.command {
            Commands::Score(args) => assert_eq!(FixMode::from(args.fix_type), FixMode::IgnoreMissing),
            _ => panic!("expected score"),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::parse_from(["semerr", "catalog", "-q"]);
        assert!(cli.quiet);
        assert!(!cli.verbose);
    }

    #[test]
    fn score_needs_a_file() {
        assert!(Cli::try_parse_from(["semerr", "score"]).is_err());
    }

    #[test]
    fn check_collects_trailing_words() {
        let cli = Cli::parse_from(["semerr", "check", "--mr", "name[Aromi]", "Aromi", "is", "nice."]);
        match cli.command {
            Commands::Check(args) => {
                assert_eq!(args.mr, "name[Aromi]");
                assert_eq!(args.text.join(" "), "Aromi is nice.");
            }
            _ => panic!("expected check"),
        }
    }
}
