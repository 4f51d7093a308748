use super::domain::{CategoricalField, Group, Individual};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QualityMode {
    /// Few distinct values: each value's share per group against its global share.
    Ratio,
    /// More distinct values than groups: breadth of values present per group.
    Diversity,
}

impl QualityMode {
    pub const fn label(self) -> &'static str {
        match self {
            Self::Ratio => "Ratio",
            Self::Diversity => "Diversity",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BalanceLevel {
    Good,
    Fair,
    Poor,
}

impl BalanceLevel {
    pub fn from_score(score: f64) -> Self {
        if score >= 0.8 {
            Self::Good
        } else if score >= 0.55 {
            Self::Fair
        } else {
            Self::Poor
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Good => "Good",
            Self::Fair => "Fair",
            Self::Poor => "Poor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldQuality {
    pub key: String,
    pub label: String,
    pub mode: QualityMode,
    pub score: f64,
    /// The data makes a perfect score unreachable for this field.
    pub limited: bool,
}

impl FieldQuality {
    pub fn percent(&self) -> u8 {
        to_percent(self.score)
    }

    pub fn level(&self) -> BalanceLevel {
        BalanceLevel::from_score(self.score)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityReport {
    pub criteria: Vec<FieldQuality>,
    pub overall: f64,
}

impl QualityReport {
    fn vacuous() -> Self {
        Self {
            criteria: Vec::new(),
            overall: 1.0,
        }
    }

    pub fn percent(&self) -> u8 {
        to_percent(self.overall)
    }

    pub fn level(&self) -> BalanceLevel {
        BalanceLevel::from_score(self.overall)
    }

    pub fn has_limited(&self) -> bool {
        self.criteria.iter().any(|field| field.limited)
    }

    pub fn field(&self, key: &str) -> Option<&FieldQuality> {
        self.criteria.iter().find(|field| field.key == key)
    }
}

fn to_percent(score: f64) -> u8 {
    (score.clamp(0.0, 1.0) * 100.0).round() as u8
}

/// Scores how evenly each balanced field is spread across `groups`.
///
/// Group members are the source of truth, so the report stays correct after
/// members are moved by hand. Fields are reported in `all_fields` order. The
/// result is deterministic for identical input.
pub fn score(
    groups: &[Group],
    balance_fields: &[String],
    all_fields: &[CategoricalField],
) -> QualityReport {
    if groups.is_empty() || balance_fields.is_empty() {
        return QualityReport::vacuous();
    }

    let population: Vec<&Individual> = groups.iter().flat_map(|group| &group.members).collect();
    if population.is_empty() {
        return QualityReport::vacuous();
    }

    let criteria: Vec<FieldQuality> = all_fields
        .iter()
        .filter(|field| balance_fields.contains(&field.key))
        .map(|field| score_field(field, groups, &population))
        .collect();

    let overall = if criteria.is_empty() {
        1.0
    } else {
        criteria.iter().map(|field| field.score).sum::<f64>() / criteria.len() as f64
    };

    QualityReport { criteria, overall }
}

fn score_field(
    field: &CategoricalField,
    groups: &[Group],
    population: &[&Individual],
) -> FieldQuality {
    let global = tally(population.iter().copied(), &field.key);
    let distinct = global.len();

    let (mode, score, limited) = if distinct == 0 {
        (QualityMode::Ratio, 1.0, false)
    } else if distinct > groups.len() {
        let (score, limited) = diversity_score(&field.key, groups, distinct);
        (QualityMode::Diversity, score, limited)
    } else {
        let (score, limited) = ratio_score(&field.key, groups, &global, population.len());
        (QualityMode::Ratio, score, limited)
    };

    debug!(field = %field.key, ?mode, score, limited, distinct, "scored field");

    FieldQuality {
        key: field.key.clone(),
        label: field.label.clone(),
        mode,
        score,
        limited,
    }
}

fn tally<'a>(members: impl Iterator<Item = &'a Individual>, key: &str) -> BTreeMap<String, usize> {
    let mut counts = BTreeMap::new();
    for member in members {
        if let Some(value) = member.value_key(key) {
            *counts.entry(value).or_insert(0) += 1;
        }
    }
    counts
}

/// Weighted mean-absolute-deviation score, normalised between the most even
/// integer split and everything landing in a single group.
fn ratio_score(
    key: &str,
    groups: &[Group],
    global: &BTreeMap<String, usize>,
    population: usize,
) -> (f64, bool) {
    let group_count = groups.len();
    let groups_f = group_count as f64;
    let n = population as f64;
    let avg_size = n / groups_f;

    let group_tallies: Vec<(usize, BTreeMap<String, usize>)> = groups
        .iter()
        .map(|group| (group.len(), tally(group.members.iter(), key)))
        .collect();

    let mut weighted_excess = 0.0;
    let mut weighted_range = 0.0;
    let mut limited = false;

    for (value, &count) in global {
        let share = count as f64 / n;
        if count < group_count {
            limited = true;
        }

        let observed_mad = group_tallies
            .iter()
            .map(|(size, counts)| {
                let in_group = counts.get(value).copied().unwrap_or(0);
                let ratio = if *size > 0 {
                    in_group as f64 / *size as f64
                } else {
                    0.0
                };
                (ratio - share).abs()
            })
            .sum::<f64>()
            / groups_f;

        let floor = (count / group_count) as f64;
        let remainder = (count % group_count) as f64;
        let best_mad = (remainder * ((floor + 1.0) / avg_size - share).abs()
            + (groups_f - remainder) * (floor / avg_size - share).abs())
            / groups_f;

        let worst_mad = 2.0 * share * (groups_f - 1.0) / groups_f;

        weighted_excess += share * (observed_mad - best_mad).max(0.0);
        weighted_range += share * (worst_mad - best_mad);
    }

    let score = if weighted_range > 0.0 {
        (1.0 - weighted_excess / weighted_range).max(0.0)
    } else {
        1.0
    };

    (score, limited)
}

/// Fraction of all distinct values visible in each group, normalised between
/// one value per group and as many as the group size allows.
fn diversity_score(key: &str, groups: &[Group], distinct: usize) -> (f64, bool) {
    let v = distinct as f64;
    let worst = 1.0 / v;
    let mut observed_sum = 0.0;
    let mut best_sum = 0.0;
    let mut limited = false;

    for group in groups {
        let present: BTreeSet<String> = group
            .members
            .iter()
            .filter_map(|member| member.value_key(key))
            .collect();
        observed_sum += present.len() as f64 / v;

        let reachable = distinct.min(group.len());
        best_sum += reachable as f64 / v;
        if reachable < distinct {
            limited = true;
        }
    }

    let groups_f = groups.len() as f64;
    let observed = observed_sum / groups_f;
    let best = best_sum / groups_f;

    let score = if best > worst {
        ((observed - worst) / (best - worst)).max(0.0)
    } else {
        1.0
    };

    (score, limited)
}
