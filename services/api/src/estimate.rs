use crate::infra::{estimation_service, load_registry};
use clap::Args;
use recovery_estimator::error::AppError;
use recovery_estimator::estimation::{
    parse_cohort, CohortEstimate, OutcomeEstimate, RawPatientInput, RuleRegistry,
    ESTIMATE_DISCLAIMER,
};
use std::fmt::Write as _;
use std::fs::File;
use std::path::PathBuf;

#[derive(Args, Debug)]
pub(crate) struct EstimateArgs {
    /// Patient age in whole years
    #[arg(long)]
    pub(crate) age: String,
    /// Patient sex (female or male)
    #[arg(long)]
    pub(crate) gender: String,
    /// Pre-injury mobility (independent, stick, frame, limited)
    #[arg(long)]
    pub(crate) mobility: String,
    /// Ruleset JSON file. Defaults to the built-in seed table.
    #[arg(long)]
    pub(crate) ruleset: Option<PathBuf>,
    /// Print the estimate as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct CohortArgs {
    /// Cohort CSV export with age, sex and mobility columns
    #[arg(long)]
    pub(crate) input: PathBuf,
    /// Ruleset JSON file. Defaults to the built-in seed table.
    #[arg(long)]
    pub(crate) ruleset: Option<PathBuf>,
}

#[derive(Args, Debug, Default)]
pub(crate) struct RulesArgs {
    /// Ruleset JSON file. Defaults to the built-in seed table.
    #[arg(long)]
    pub(crate) ruleset: Option<PathBuf>,
}

pub(crate) fn run_estimate(args: EstimateArgs) -> Result<(), AppError> {
    let EstimateArgs {
        age,
        gender,
        mobility,
        ruleset,
        json,
    } = args;

    let service = estimation_service(load_registry(ruleset.as_deref())?);
    let estimate = service.estimate(&RawPatientInput::new(age, gender, mobility))?;

    if json {
        let rendered = serde_json::to_string_pretty(&estimate).map_err(std::io::Error::from)?;
        println!("{rendered}");
    } else {
        print!("{}", render_estimate(&estimate));
    }

    Ok(())
}

pub(crate) fn run_cohort(args: CohortArgs) -> Result<(), AppError> {
    let CohortArgs { input, ruleset } = args;

    let service = estimation_service(load_registry(ruleset.as_deref())?);
    let cohort = parse_cohort(File::open(&input)?)?;
    let results = service.estimate_cohort(&cohort);

    print!("{}", render_cohort(&results, cohort.skipped));
    Ok(())
}

pub(crate) fn run_rules(args: RulesArgs) -> Result<(), AppError> {
    let registry = load_registry(args.ruleset.as_deref())?;
    print!("{}", render_rules(&registry));
    Ok(())
}

fn render_estimate(estimate: &OutcomeEstimate) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Estimated outlook (ruleset {})",
        estimate.ruleset_version()
    );
    for line in estimate.display_lines() {
        let _ = writeln!(output, "  {:<30} {}", line.label, line.value);
    }
    for warning in estimate.warnings() {
        let _ = writeln!(output, "  ! {}", warning.message);
    }
    let _ = writeln!(output);
    let _ = writeln!(output, "{ESTIMATE_DISCLAIMER}");
    output
}

fn render_cohort(results: &[CohortEstimate], skipped: usize) -> String {
    let mut output = String::new();
    let mut rejected = 0usize;

    for result in results {
        match &result.outcome {
            Ok(estimate) => {
                let summary = estimate
                    .display_lines()
                    .into_iter()
                    .map(|line| line.value)
                    .collect::<Vec<_>>()
                    .join(" | ");
                let _ = writeln!(output, "row {:>4}: {summary}", result.line);
            }
            Err(error) => {
                rejected += 1;
                let _ = writeln!(output, "row {:>4}: rejected ({error})", result.line);
            }
        }
    }

    let _ = writeln!(
        output,
        "{} rows estimated, {rejected} rejected, {skipped} skipped for missing fields",
        results.len() - rejected
    );
    output
}

fn render_rules(registry: &RuleRegistry) -> String {
    let mut output = String::new();
    let _ = writeln!(
        output,
        "Ruleset {} (published {}, {} rules)",
        registry.version(),
        registry.published_on(),
        registry.len()
    );

    for rule in registry.rules() {
        let dimensions = rule
            .contributions
            .keys()
            .map(|dimension| dimension.key())
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(
            output,
            "  [{:>3}] {:<32} -> {dimensions}",
            rule.priority, rule.id
        );
    }
    output
}
