//! Check command - score a single text against an MR

use super::super::output::{bucket_color, color, write_output};
use super::super::parser::FixTypeArg;
use super::super::utils::{get_input_text, load_catalog};
use crate::catalog::OutputConfig;
use crate::da::{parse_mr, parse_tgen, serialize_mr};
use crate::eval::Explanation;
use crate::Evaluator;
use clap::Parser;
use std::fmt::Write as _;

/// Check a single text against an MR
#[derive(Parser, Debug)]
pub struct CheckArgs {
    /// MR in the bracket format, e.g. "name[Aromi], eatType[pub]"
    #[arg(short, long)]
    pub mr: String,

    /// Parse --mr as a TGen dialogue act, e.g. "inform(name=Aromi)"
    #[arg(long)]
    pub tgen: bool,

    /// Text to check (read from stdin when omitted)
    #[arg(trailing_var_arg = true)]
    pub text: Vec<String>,

    /// Error kinds the corrected MR is repaired for
    #[arg(short = 't', long = "fix-type", value_enum, default_value_t = FixTypeArg::All)]
    pub fix_type: FixTypeArg,

    /// Pattern catalog TOML (defaults to the built-in E2E catalog)
    #[arg(short, long, value_name = "PATH")]
    pub patterns: Option<String>,

    /// Show raw and retained mentions
    #[arg(short, long)]
    pub explain: bool,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

/// Check one text and print counts, diff and corrected MR.
pub fn run(args: CheckArgs, _quiet: bool) -> Result<(), String> {
    let catalog = load_catalog(args.patterns.as_deref())?;
    let evaluator = Evaluator::new(&catalog, args.fix_type.into());

    let act = if args.tgen {
        parse_tgen(&args.mr)
    } else {
        parse_mr(&args.mr)
    }
    .map_err(|e| e.to_string())?;
    let text = get_input_text(&args.text)?;

    let result = evaluator.evaluate(&act, &text).map_err(|e| e.to_string())?;

    if args.json {
        let json = serde_json::to_string_pretty(&result)
            .map_err(|e| format!("Failed to serialize JSON: {}", e))?;
        return write_output(&(json + "\n"), None);
    }

    let mut out = String::new();
    if args.explain {
        let explanation = evaluator.explain(&act, &text).map_err(|e| e.to_string())?;
        out.push_str(&format_explanation(&explanation, catalog.output()));
    }
    let _ = writeln!(
        out,
        "{}  [{}]",
        result.counts,
        color(bucket_color(result.bucket), &result.bucket.to_string())
    );
    let _ = writeln!(out, "diff:  {}", result.diff.to_json());
    let _ = writeln!(out, "fixed: {}", result.corrected_mr);
    write_output(&out, None)
}

fn format_explanation(explanation: &Explanation, output: &OutputConfig) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "{}", color("1", "Mentions:"));
    for mention in &explanation.raw {
        let kept = explanation.retained.contains(mention);
        let mark = if kept {
            color("32", "+")
        } else {
            color("2", "-")
        };
        let _ = writeln!(out, "  {} {}", mark, mention);
    }
    let _ = writeln!(
        out,
        "{} {}",
        color("1", "Gold:     "),
        serialize_mr(&explanation.gold, output)
    );
    let _ = writeln!(
        out,
        "{} {}",
        color("1", "Extracted:"),
        serialize_mr(&explanation.extracted, output)
    );
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{FixMode, PatternCatalog};

    #[test]
    fn explanation_marks_dropped_mentions() {
        let evaluator = Evaluator::new(PatternCatalog::e2e(), FixMode::All);
        let act = parse_mr("priceRange[more than £30]").unwrap();
        let explanation = evaluator.explain(&act, "It is not cheap.").unwrap();
        let text = format_explanation(&explanation, evaluator.catalog().output());
        assert_eq!(
            text.lines().filter(|l| l.starts_with("  ")).count(),
            explanation.raw.len()
        );
        assert!(text.lines().any(|l| l.starts_with("  -")));
        assert!(text.lines().any(|l| l.starts_with("  +")));
    }
}
