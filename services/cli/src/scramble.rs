use crate::infra::{load_roster, resolve_balance, rng_from_seed};
use crate::render::{board_json, render_board, render_quality, render_roster, render_source};
use clap::Args;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use team_scrambler::config::AppConfig;
use team_scrambler::error::AppError;
use team_scrambler::teams::export::write_csv;
use team_scrambler::teams::TeamBoard;
use tracing::info;

#[derive(Args, Debug, Default)]
pub(crate) struct ScrambleArgs {
    /// Roster CSV to read (defaults to the bundled example roster)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
    /// Number of teams to create
    #[arg(long, conflicts_with = "team_size")]
    pub(crate) teams: Option<usize>,
    /// Target members per team; the team count is derived
    #[arg(long)]
    pub(crate) team_size: Option<usize>,
    /// Field to balance on; repeat for several (defaults to every field)
    #[arg(long = "balance")]
    pub(crate) balance: Vec<String>,
    /// Seed for a reproducible scramble
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Write the teams as CSV to this path
    #[arg(long)]
    pub(crate) export: Option<PathBuf>,
    /// Print teams and quality as JSON instead of text
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug, Default)]
pub(crate) struct InspectArgs {
    /// Roster CSV to read (defaults to the bundled example roster)
    #[arg(long)]
    pub(crate) input: Option<PathBuf>,
}

pub(crate) fn run_scramble(args: ScrambleArgs, config: &AppConfig) -> Result<(), AppError> {
    let ScrambleArgs {
        input,
        teams,
        team_size,
        balance,
        seed,
        export,
        json,
    } = args;

    let roster = load_roster(input.as_deref())?;
    let balance = resolve_balance(&roster, &balance);
    let sizing = config.scrambler.sizing(balance, teams, team_size);
    let mut rng = rng_from_seed(seed);

    let board = TeamBoard::scramble_with_rng(
        &roster.individuals,
        roster.fields.clone(),
        &sizing,
        &mut rng,
    );
    info!(
        individuals = roster.len(),
        groups = board.groups().len(),
        "roster scrambled"
    );

    if let Some(path) = export {
        let file = File::create(&path)?;
        write_csv(board.groups(), board.fields(), BufWriter::new(file))?;
        info!(path = %path.display(), "teams exported");
    }

    if json {
        println!("{}", board_json(&board)?);
        return Ok(());
    }

    render_source(input.as_deref(), &roster);
    render_board(&board);
    render_quality(&board.quality());
    Ok(())
}

pub(crate) fn run_inspect(args: InspectArgs) -> Result<(), AppError> {
    let roster = load_roster(args.input.as_deref())?;
    render_source(args.input.as_deref(), &roster);
    render_roster(&roster);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use team_scrambler::config::{AppEnvironment, ScramblerDefaults, TelemetryConfig};

    fn config() -> AppConfig {
        AppConfig {
            environment: AppEnvironment::Test,
            scrambler: ScramblerDefaults::default(),
            telemetry: TelemetryConfig {
                log_level: "info".to_string(),
            },
        }
    }

    #[test]
    fn scramble_writes_requested_export() {
        let path = std::env::temp_dir().join(format!(
            "team-scrambler-export-{}.csv",
            std::process::id()
        ));
        let args = ScrambleArgs {
            teams: Some(4),
            seed: Some(3),
            export: Some(path.clone()),
            json: true,
            ..ScrambleArgs::default()
        };

        run_scramble(args, &config()).expect("scramble succeeds");
        let written = std::fs::read_to_string(&path).expect("export written");
        std::fs::remove_file(&path).ok();

        let lines: Vec<&str> = written.lines().collect();
        assert_eq!(lines.len(), 21);
        assert_eq!(
            lines[0],
            "\"name\",\"gender\",\"entity\",\"mancom\",\"team\""
        );
    }

    #[test]
    fn missing_input_file_is_an_error() {
        let args = ScrambleArgs {
            input: Some(PathBuf::from("./no-such-roster.csv")),
            ..ScrambleArgs::default()
        };
        let error = run_scramble(args, &config()).expect_err("missing file");
        assert!(matches!(error, AppError::Roster(_)));
    }

    #[test]
    fn inspect_reads_bundled_roster() {
        run_inspect(InspectArgs::default()).expect("inspect succeeds");
    }
}
