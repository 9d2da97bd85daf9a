use crate::estimate::{run_cohort, run_estimate, run_rules, CohortArgs, EstimateArgs, RulesArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use recovery_estimator::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Hip Fracture Recovery Estimator",
    about = "Estimate hip fracture recovery outcomes from a versioned rule table",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Estimate recovery outcomes for a single patient profile
    Estimate(EstimateArgs),
    /// Estimate recovery outcomes for every row of a cohort CSV export
    Cohort(CohortArgs),
    /// Print the active scoring ruleset
    Rules(RulesArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Estimate(args) => run_estimate(args),
        Command::Cohort(args) => run_cohort(args),
        Command::Rules(args) => run_rules(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_estimate_flags() {
        let cli = Cli::try_parse_from([
            "recovery-estimator-api",
            "estimate",
            "--age",
            "82",
            "--gender",
            "female",
            "--mobility",
            "limited",
            "--json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Estimate(args)) => {
                assert_eq!(args.age, "82");
                assert_eq!(args.gender, "female");
                assert_eq!(args.mobility, "limited");
                assert!(args.json);
                assert!(args.ruleset.is_none());
            }
            other => panic!("expected estimate command, got {other:?}"),
        }
    }

    #[test]
    fn defaults_to_serve() {
        let cli = Cli::try_parse_from(["recovery-estimator-api"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
