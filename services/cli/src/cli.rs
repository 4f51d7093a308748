use crate::demo::{run_demo, DemoArgs};
use crate::scramble::{run_inspect, run_scramble, InspectArgs, ScrambleArgs};
use clap::{Parser, Subcommand};
use team_scrambler::config::AppConfig;
use team_scrambler::error::AppError;
use team_scrambler::telemetry;
use tracing::debug;

#[derive(Parser, Debug)]
#[command(
    name = "Team Scrambler",
    about = "Split a roster into balanced teams and report how even the split is",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scramble a roster into balanced teams (default command)
    Scramble(ScrambleArgs),
    /// Summarise the fields and values found in a roster
    Inspect(InspectArgs),
    /// Walk through scrambling, manual edits, and re-scoring on the bundled roster
    Demo(DemoArgs),
}

pub(crate) fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    debug!(environment = ?config.environment, "configuration loaded");

    let command = cli
        .command
        .unwrap_or_else(|| Command::Scramble(ScrambleArgs::default()));

    match command {
        Command::Scramble(args) => run_scramble(args, &config),
        Command::Inspect(args) => run_inspect(args),
        Command::Demo(args) => run_demo(args, &config),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scramble_flags_parse() {
        let cli = Cli::try_parse_from([
            "team-scrambler",
            "scramble",
            "--teams",
            "3",
            "--balance",
            "gender",
            "--balance",
            "entity",
            "--seed",
            "9",
            "--json",
        ])
        .expect("arguments parse");

        match cli.command {
            Some(Command::Scramble(args)) => {
                assert_eq!(args.teams, Some(3));
                assert_eq!(args.balance, vec!["gender", "entity"]);
                assert_eq!(args.seed, Some(9));
                assert!(args.json);
            }
            other => panic!("expected scramble command, got {other:?}"),
        }
    }

    #[test]
    fn teams_and_team_size_are_mutually_exclusive() {
        let result = Cli::try_parse_from([
            "team-scrambler",
            "scramble",
            "--teams",
            "3",
            "--team-size",
            "4",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn command_is_optional() {
        let cli = Cli::try_parse_from(["team-scrambler"]).expect("arguments parse");
        assert!(cli.command.is_none());
    }
}
