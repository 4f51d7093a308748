use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use uuid::Uuid;

/// Visual tags handed out round-robin to freshly created groups.
pub const TEAM_TAGS: [&str; 20] = [
    "🦁", "🐯", "🦊", "🐺", "🦝", "🐻", "🐼", "🐨", "🦄", "🐲", "🦅", "🦉", "🦋", "🐬", "🐙", "🦈",
    "🌵", "⚡", "🔥", "🌊",
];

/// Tag that follows `current` in [`TEAM_TAGS`]. Unknown tags restart the cycle.
pub fn next_tag(current: &str) -> &'static str {
    let next = TEAM_TAGS
        .iter()
        .position(|tag| *tag == current)
        .map_or(0, |idx| (idx + 1) % TEAM_TAGS.len());
    TEAM_TAGS[next]
}

/// Balancing key for a raw criterion value: trimmed, lowercased, `None` when blank.
pub(crate) fn value_key(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_lowercase())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct IndividualId(pub String);

impl IndividualId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for IndividualId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One person (or entity) to be placed into a group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Individual {
    pub id: IndividualId,
    pub display_name: String,
    #[serde(default)]
    pub criteria: BTreeMap<String, String>,
}

impl Individual {
    pub fn new(display_name: impl Into<String>) -> Self {
        Self {
            id: IndividualId::generate(),
            display_name: display_name.into(),
            criteria: BTreeMap::new(),
        }
    }

    /// Trimmed value for `key`; blank and absent both read as missing.
    pub fn value(&self, key: &str) -> Option<&str> {
        self.criteria
            .get(key)
            .map(|value| value.trim())
            .filter(|value| !value.is_empty())
    }

    pub(crate) fn value_key(&self, key: &str) -> Option<String> {
        self.criteria.get(key).and_then(|value| value_key(value))
    }

    /// Copy of this individual with `key` set to `value`. The id is kept.
    pub fn with_criterion(&self, key: impl Into<String>, value: impl Into<String>) -> Self {
        let mut edited = self.clone();
        edited.criteria.insert(key.into(), value.into());
        edited
    }

    pub fn with_display_name(&self, display_name: impl Into<String>) -> Self {
        Self {
            display_name: display_name.into(),
            ..self.clone()
        }
    }
}

/// Metadata for one categorical column.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoricalField {
    pub key: String,
    pub label: String,
    #[serde(default)]
    pub values: Vec<String>,
}

impl CategoricalField {
    pub fn new(key: impl Into<String>, label: impl Into<String>, values: Vec<String>) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            values,
        }
    }

    /// Declared casing for a balancing key, if the field lists one.
    pub(crate) fn declared_value(&self, key: &str) -> Option<&str> {
        self.values
            .iter()
            .map(String::as_str)
            .find(|value| value_key(value).as_deref() == Some(key))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "mode", content = "value")]
pub enum GroupSizing {
    /// Fixed number of groups.
    TeamCount(usize),
    /// Fixed number of members per group; the count is derived.
    TeamSize(usize),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SizingConfig {
    pub sizing: GroupSizing,
    #[serde(default)]
    pub balance_fields: Vec<String>,
}

impl SizingConfig {
    pub fn team_count(count: usize, balance_fields: Vec<String>) -> Self {
        Self {
            sizing: GroupSizing::TeamCount(count),
            balance_fields,
        }
    }

    pub fn team_size(size: usize, balance_fields: Vec<String>) -> Self {
        Self {
            sizing: GroupSizing::TeamSize(size),
            balance_fields,
        }
    }

    /// Number of groups for a population of `population` individuals.
    /// Out-of-range settings are clamped so the result is always at least 1.
    pub fn group_count(&self, population: usize) -> usize {
        match self.sizing {
            GroupSizing::TeamCount(count) => count.min(population).max(1),
            GroupSizing::TeamSize(size) => population.div_ceil(size.max(1)).max(1),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct GroupId(pub String);

impl GroupId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }
}

impl fmt::Display for GroupId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Per-group value counts and ratios for one balanced field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDistribution {
    pub key: String,
    pub label: String,
    pub counts: BTreeMap<String, usize>,
    pub ratios: BTreeMap<String, f64>,
}

impl FieldDistribution {
    pub fn count(&self, value: &str) -> usize {
        self.counts.get(value).copied().unwrap_or(0)
    }

    pub fn ratio(&self, value: &str) -> f64 {
        self.ratios.get(value).copied().unwrap_or(0.0)
    }

    pub fn total(&self) -> usize {
        self.counts.values().sum()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub name: String,
    pub tag: String,
    pub members: Vec<Individual>,
    pub metrics: Vec<FieldDistribution>,
}

impl Group {
    /// Empty group at position `index` (0-based) with its default name and tag.
    pub fn numbered(index: usize) -> Self {
        Self {
            id: GroupId::generate(),
            name: format!("Group {}", index + 1),
            tag: TEAM_TAGS[index % TEAM_TAGS.len()].to_string(),
            members: Vec::new(),
            metrics: Vec::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn metric(&self, key: &str) -> Option<&FieldDistribution> {
        self.metrics.iter().find(|metric| metric.key == key)
    }

    pub fn contains(&self, id: &IndividualId) -> bool {
        self.members.iter().any(|member| &member.id == id)
    }
}
