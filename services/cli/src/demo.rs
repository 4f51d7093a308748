use crate::infra::{example_roster, rng_from_seed};
use crate::render::{render_board, render_quality};
use clap::Args;
use team_scrambler::config::AppConfig;
use team_scrambler::error::AppError;
use team_scrambler::roster::Roster;
use team_scrambler::teams::{BoardError, TeamBoard};

const RELOCATED_TEAM_NAME: &str = "Relocated crew";

#[derive(Args, Debug, Default)]
pub(crate) struct DemoArgs {
    /// Seed for a reproducible scramble
    #[arg(long)]
    pub(crate) seed: Option<u64>,
    /// Number of teams (defaults to the configured sizing)
    #[arg(long)]
    pub(crate) teams: Option<usize>,
}

/// Outcome of the scripted manual edits.
#[derive(Debug)]
struct DemoEdit {
    member: String,
    from: String,
    to: String,
    tag: String,
}

pub(crate) fn run_demo(args: DemoArgs, config: &AppConfig) -> Result<(), AppError> {
    let DemoArgs { seed, teams } = args;

    println!("Team scrambler demo");
    let roster = corrected_roster(example_roster()?);
    println!("Roster: bundled example ({} people)", roster.len());

    let sizing = config.scrambler.sizing(roster.field_keys(), teams, None);
    let mut rng = rng_from_seed(seed);
    let mut board = TeamBoard::scramble_with_rng(
        &roster.individuals,
        roster.fields.clone(),
        &sizing,
        &mut rng,
    );

    render_board(&board);
    let before = board.quality();
    render_quality(&before);

    let Some(edit) = apply_manual_edits(&mut board)? else {
        println!("\nFewer than two teams; skipping manual edits.");
        return Ok(());
    };

    println!(
        "\nMoved {} from {} to {}, renamed the destination and switched its tag to {}",
        edit.member, edit.from, edit.to, edit.tag
    );

    render_board(&board);
    let after = board.quality();
    render_quality(&after);
    println!(
        "\nOverall balance went from {}% to {}%",
        before.percent(),
        after.percent()
    );
    Ok(())
}

/// Applies a single-field correction to the first roster entry so the demo
/// also exercises roster edits.
fn corrected_roster(roster: Roster) -> Roster {
    let Some(first) = roster.individuals.first() else {
        return roster;
    };
    let corrected = first.with_criterion("mancom", "true");
    roster.with_individual(corrected)
}

/// Moves the first member of the first team into the second team, then
/// renames and retags the second team. `None` when there is nothing to move.
fn apply_manual_edits(board: &mut TeamBoard) -> Result<Option<DemoEdit>, BoardError> {
    let [first, second, ..] = board.groups() else {
        return Ok(None);
    };
    let Some(member) = first.members.first() else {
        return Ok(None);
    };

    let (from_id, to_id) = (first.id.clone(), second.id.clone());
    let (from, to) = (first.name.clone(), second.name.clone());
    let (member_id, member_name) = (member.id.clone(), member.display_name.clone());

    board.move_member(&member_id, &from_id, &to_id)?;
    board.rename(&to_id, RELOCATED_TEAM_NAME)?;
    let tag = board.cycle_tag(&to_id)?.to_string();

    Ok(Some(DemoEdit {
        member: member_name,
        from,
        to,
        tag,
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use team_scrambler::teams::{SizingConfig, TEAM_TAGS};

    fn scrambled(teams: usize) -> TeamBoard {
        let roster = example_roster().expect("bundled roster is valid");
        TeamBoard::scramble_with_rng(
            &roster.individuals,
            roster.fields.clone(),
            &SizingConfig::team_count(teams, roster.field_keys()),
            &mut StdRng::seed_from_u64(21),
        )
    }

    #[test]
    fn manual_edits_move_rename_and_retag() {
        let mut board = scrambled(4);
        let sizes_before: Vec<usize> = board.groups().iter().map(|group| group.len()).collect();

        let edit = apply_manual_edits(&mut board)
            .expect("edits apply")
            .expect("two teams available");

        let groups = board.groups();
        assert_eq!(groups[0].len(), sizes_before[0] - 1);
        assert_eq!(groups[1].len(), sizes_before[1] + 1);
        assert_eq!(groups[1].name, RELOCATED_TEAM_NAME);
        assert_eq!(groups[1].tag, TEAM_TAGS[2]);
        assert_eq!(edit.tag, TEAM_TAGS[2]);
        assert_eq!(edit.from, "Group 1");
        assert_eq!(edit.to, "Group 2");
    }

    #[test]
    fn single_team_skips_manual_edits() {
        let mut board = scrambled(1);
        let edit = apply_manual_edits(&mut board).expect("no board error");
        assert!(edit.is_none());
    }

    #[test]
    fn roster_correction_updates_first_entry() {
        let roster = corrected_roster(example_roster().expect("bundled roster is valid"));
        assert_eq!(roster.individuals[0].value("mancom"), Some("true"));
    }
}
