use crate::report::{run_compare, run_score, CompareArgs, ScoreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use gitproof::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "GitProof",
    about = "Score GitHub profiles and serve the GitProof analysis API",
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
    /// Score a single upstream profile payload read from disk
    Score(ScoreArgs),
    /// Compare two upstream profile payloads head-to-head
    Compare(CompareArgs),
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
        Command::Score(args) => run_score(args).await,
        Command::Compare(args) => run_compare(args).await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_to_serve_without_subcommand() {
        let cli = Cli::try_parse_from(["gitproof"]).expect("parses");
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_score_arguments() {
        let cli = Cli::try_parse_from([
            "gitproof",
            "score",
            "--input",
            "octo.json",
            "--as-of",
            "2024-01-01T00:00:00Z",
            "--json",
        ])
        .expect("parses");

        match cli.command {
            Some(Command::Score(args)) => {
                assert_eq!(args.input.to_str(), Some("octo.json"));
                assert!(args.as_of.is_some());
                assert!(args.json);
            }
            other => panic!("expected score command, got {other:?}"),
        }
    }

    #[test]
    fn rejects_malformed_as_of() {
        let result = Cli::try_parse_from([
            "gitproof",
            "compare",
            "--first",
            "a.json",
            "--second",
            "b.json",
            "--as-of",
            "yesterday",
        ]);
        assert!(result.is_err());
    }
}
