mod assign;
mod board;
mod domain;
pub mod export;
mod metrics;
mod quality;

pub use assign::{assign, assign_with_rng};
pub use board::{BoardError, TeamBoard};
pub use domain::{
    next_tag, CategoricalField, FieldDistribution, Group, GroupId, GroupSizing, Individual,
    IndividualId, SizingConfig, TEAM_TAGS,
};
pub use metrics::compute_distributions;
pub use quality::{score, BalanceLevel, FieldQuality, QualityMode, QualityReport};
