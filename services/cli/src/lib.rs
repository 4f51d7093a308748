mod cli;
mod demo;
mod infra;
mod render;
mod scramble;

use team_scrambler::error::AppError;

pub fn run() -> Result<(), AppError> {
    cli::run()
}
