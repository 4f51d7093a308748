mod mapping;
mod normalizer;
mod parser;

use crate::teams::{CategoricalField, Individual, IndividualId};
use mapping::{is_name_column, NameColumns};
use std::collections::{BTreeMap, BTreeSet};
use std::io::Read;
use std::path::Path;
use tracing::{info, warn};

#[derive(Debug)]
pub enum RosterImportError {
    Io(std::io::Error),
    Csv(csv::Error),
    MissingNameColumn,
}

impl std::fmt::Display for RosterImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RosterImportError::Io(err) => write!(f, "failed to read roster: {}", err),
            RosterImportError::Csv(err) => write!(f, "invalid roster CSV data: {}", err),
            RosterImportError::MissingNameColumn => write!(
                f,
                "roster must contain at least one name column \
                 (firstName, lastName, displayName, name, fullName, or email)"
            ),
        }
    }
}

impl std::error::Error for RosterImportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RosterImportError::Io(err) => Some(err),
            RosterImportError::Csv(err) => Some(err),
            RosterImportError::MissingNameColumn => None,
        }
    }
}

impl From<std::io::Error> for RosterImportError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<csv::Error> for RosterImportError {
    fn from(err: csv::Error) -> Self {
        Self::Csv(err)
    }
}

/// Typed population plus the categorical columns found alongside it.
#[derive(Debug, Clone, Default)]
pub struct Roster {
    pub individuals: Vec<Individual>,
    pub fields: Vec<CategoricalField>,
}

impl Roster {
    pub fn len(&self) -> usize {
        self.individuals.len()
    }

    pub fn is_empty(&self) -> bool {
        self.individuals.is_empty()
    }

    pub fn field_keys(&self) -> Vec<String> {
        self.fields.iter().map(|field| field.key.clone()).collect()
    }

    pub fn individual(&self, id: &IndividualId) -> Option<&Individual> {
        self.individuals.iter().find(|individual| &individual.id == id)
    }

    /// New roster with the individual sharing `updated`'s id replaced.
    /// Field value lists are rebuilt so they reflect the edit.
    pub fn with_individual(&self, updated: Individual) -> Self {
        let individuals: Vec<Individual> = self
            .individuals
            .iter()
            .map(|individual| {
                if individual.id == updated.id {
                    updated.clone()
                } else {
                    individual.clone()
                }
            })
            .collect();

        let fields = self
            .fields
            .iter()
            .map(|field| CategoricalField {
                values: distinct_values(&individuals, &field.key),
                ..field.clone()
            })
            .collect();

        Self {
            individuals,
            fields,
        }
    }
}

fn distinct_values(individuals: &[Individual], key: &str) -> Vec<String> {
    individuals
        .iter()
        .filter_map(|individual| individual.value(key))
        .map(str::to_string)
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub struct RosterImporter;

impl RosterImporter {
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Roster, RosterImportError> {
        let file = std::fs::File::open(path)?;
        Self::from_reader(file)
    }

    pub fn from_csv_str(text: &str) -> Result<Roster, RosterImportError> {
        Self::from_reader(text.as_bytes())
    }

    pub fn from_reader<R: Read>(reader: R) -> Result<Roster, RosterImportError> {
        let table = parser::parse_table(reader)?;
        if table.rows.is_empty() {
            return Ok(Roster::default());
        }

        let names = NameColumns::from_headers(&table.headers);
        if names.is_empty() {
            return Err(RosterImportError::MissingNameColumn);
        }

        let criteria_columns: Vec<(usize, &String)> = table
            .headers
            .iter()
            .enumerate()
            .filter(|(_, header)| !is_name_column(header))
            .collect();

        let mut individuals = Vec::with_capacity(table.rows.len());
        for (idx, row) in table.rows.iter().enumerate() {
            let display_name = names.display_name(row).unwrap_or_else(|| {
                warn!(row = idx + 1, "roster row has no name; using fallback label");
                format!("Person {}", idx + 1)
            });

            let criteria: BTreeMap<String, String> = criteria_columns
                .iter()
                .map(|&(column, header)| {
                    let value = row.get(column).map(|cell| cell.trim()).unwrap_or("");
                    (header.clone(), value.to_string())
                })
                .collect();

            individuals.push(Individual {
                id: IndividualId::generate(),
                display_name,
                criteria,
            });
        }

        let fields: Vec<CategoricalField> = criteria_columns
            .iter()
            .map(|&(_, header)| CategoricalField {
                key: header.clone(),
                label: normalizer::to_label(header),
                values: distinct_values(&individuals, header),
            })
            .collect();

        info!(
            individuals = individuals.len(),
            fields = fields.len(),
            "roster imported"
        );

        Ok(Roster {
            individuals,
            fields,
        })
    }
}
