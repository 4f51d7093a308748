use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use team_scrambler::roster::Roster;
use team_scrambler::teams::{FieldDistribution, FieldQuality, Group, QualityReport, TeamBoard};

#[derive(Serialize)]
struct BoardView<'a> {
    balance_fields: &'a [String],
    groups: &'a [Group],
    quality: QualityReport,
}

pub(crate) fn board_json(board: &TeamBoard) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(&BoardView {
        balance_fields: board.balance_fields(),
        groups: board.groups(),
        quality: board.quality(),
    })
}

pub(crate) fn render_source(input: Option<&Path>, roster: &Roster) {
    match input {
        Some(path) => println!("Roster: {} ({} people)", path.display(), roster.len()),
        None => println!("Roster: bundled example ({} people)", roster.len()),
    }
}

pub(crate) fn render_board(board: &TeamBoard) {
    if board.groups().is_empty() {
        println!("\nNo individuals to scramble");
        return;
    }

    for group in board.groups() {
        println!("\n{} {} ({} members)", group.tag, group.name, group.len());
        for member in &group.members {
            println!("  - {}", member.display_name);
        }
        for metric in &group.metrics {
            println!("  {}", metric_line(metric));
        }
    }
}

pub(crate) fn render_quality(report: &QualityReport) {
    println!(
        "\nBalance quality: {}% ({})",
        report.percent(),
        report.level().label()
    );
    for field in &report.criteria {
        println!("- {}", quality_line(field));
    }
    if report.has_limited() {
        println!("Some fields cannot be balanced perfectly with this roster.");
    }
}

pub(crate) fn render_roster(roster: &Roster) {
    if roster.is_empty() {
        println!("No individuals found");
        return;
    }

    for field in &roster.fields {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        let mut missing = 0;
        for individual in &roster.individuals {
            match individual.value(&field.key) {
                Some(value) => *counts.entry(value).or_insert(0) += 1,
                None => missing += 1,
            }
        }

        println!("\n{} ({}, {} values)", field.label, field.key, counts.len());
        for (value, count) in &counts {
            println!("  - {value}: {count}");
        }
        if missing > 0 {
            println!("  - (missing): {missing}");
        }
    }
}

fn metric_line(metric: &FieldDistribution) -> String {
    let values: Vec<String> = metric
        .counts
        .iter()
        .map(|(value, count)| format!("{value} {count} ({:.0}%)", metric.ratio(value) * 100.0))
        .collect();
    format!("{}: {}", metric.label, values.join(", "))
}

fn quality_line(field: &FieldQuality) -> String {
    let mut line = format!(
        "{} [{}]: {}% ({})",
        field.label,
        field.mode.label(),
        field.percent(),
        field.level().label()
    );
    if field.limited {
        line.push_str(" - limited by data");
    }
    line
}
