use crate::commands::{run_batch, run_schema, run_score, BatchArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use ford_score::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "FORD Score",
    about = "Estimate non-home discharge risk for orthopedic trauma patients",
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
    /// Score a single patient from command-line values
    Score(ScoreArgs),
    /// Score every row of a patient CSV export
    Batch(BatchArgs),
    /// Print the input form schema as JSON
    Schema,
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
        Command::Score(args) => run_score(args),
        Command::Batch(args) => run_batch(args),
        Command::Schema => run_schema(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_subcommand_means_serve() {
        let cli = Cli::try_parse_from(["ford-score-api"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn score_flags_use_kebab_case() {
        let cli = Cli::try_parse_from([
            "ford-score-api",
            "score",
            "--age",
            "70",
            "--fracture-site",
            "Hip/Femur",
            "--weight-lb",
            "300",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.age, Some(70.0));
                assert_eq!(args.fracture_site.as_deref(), Some("Hip/Femur"));
                assert_eq!(args.weight_lb, Some(300.0));
                assert!(args.json);
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn batch_requires_a_path() {
        assert!(Cli::try_parse_from(["ford-score-api", "batch"]).is_err());
    }
}
