use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::Path;
use team_scrambler::roster::{Roster, RosterImportError, RosterImporter};
use tracing::warn;

const EXAMPLE_ROSTER: &str = include_str!("../data/example.csv");

/// Parses the roster bundled with the binary. Called explicitly by commands
/// that run without `--input`.
pub(crate) fn example_roster() -> Result<Roster, RosterImportError> {
    RosterImporter::from_csv_str(EXAMPLE_ROSTER)
}

/// Roster from `input` when given, otherwise the bundled example.
pub(crate) fn load_roster(input: Option<&Path>) -> Result<Roster, RosterImportError> {
    match input {
        Some(path) => RosterImporter::from_path(path),
        None => example_roster(),
    }
}

/// Balance keys to use for `roster`. An empty request means every field;
/// keys the roster does not have are dropped with a warning.
pub(crate) fn resolve_balance(roster: &Roster, requested: &[String]) -> Vec<String> {
    let available = roster.field_keys();
    if requested.is_empty() {
        return available;
    }

    requested
        .iter()
        .filter(|key| {
            let known = available.contains(key);
            if !known {
                warn!(field = %key, "ignoring unknown balance field");
            }
            known
        })
        .cloned()
        .collect()
}

pub(crate) fn rng_from_seed(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}
