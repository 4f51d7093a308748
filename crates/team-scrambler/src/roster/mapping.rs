use std::collections::{HashMap, HashSet};
use std::sync::OnceLock;

static NAME_COLUMNS: OnceLock<HashSet<&'static str>> = OnceLock::new();

fn name_columns() -> &'static HashSet<&'static str> {
    NAME_COLUMNS.get_or_init(|| {
        [
            "firstname",
            "lastname",
            "displayname",
            "name",
            "fullname",
            "email",
        ]
        .into_iter()
        .collect()
    })
}

/// Whether a header holds identity data rather than a balancing criterion.
pub(crate) fn is_name_column(header: &str) -> bool {
    name_columns().contains(header.to_lowercase().as_str())
}

/// Column positions of the recognised name headers for one file.
#[derive(Debug, Default)]
pub(crate) struct NameColumns {
    positions: HashMap<String, usize>,
}

impl NameColumns {
    pub(crate) fn from_headers(headers: &[String]) -> Self {
        let mut positions = HashMap::new();
        for (idx, header) in headers.iter().enumerate() {
            if is_name_column(header) {
                positions.entry(header.to_lowercase()).or_insert(idx);
            }
        }
        Self { positions }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    fn cell<'a>(&self, row: &'a [String], column: &str) -> &'a str {
        self.positions
            .get(column)
            .and_then(|&idx| row.get(idx))
            .map(|value| value.trim())
            .unwrap_or("")
    }

    /// Display name for a row: `displayName`, then `firstName lastName`, then
    /// `name`/`fullName`, then `email`. `None` when every candidate is blank.
    pub(crate) fn display_name(&self, row: &[String]) -> Option<String> {
        let display = self.cell(row, "displayname");
        if !display.is_empty() {
            return Some(display.to_string());
        }

        let parts: Vec<&str> = [self.cell(row, "firstname"), self.cell(row, "lastname")]
            .into_iter()
            .filter(|part| !part.is_empty())
            .collect();
        if !parts.is_empty() {
            return Some(parts.join(" "));
        }

        ["name", "fullname", "email"]
            .into_iter()
            .map(|column| self.cell(row, column))
            .find(|value| !value.is_empty())
            .map(str::to_string)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn strings(values: &[&str]) -> Vec<String> {
        values.iter().map(|value| value.to_string()).collect()
    }

    #[test]
    fn name_columns_match_case_insensitively() {
        assert!(is_name_column("FirstName"));
        assert!(is_name_column("EMAIL"));
        assert!(!is_name_column("gender"));
    }

    #[test]
    fn display_name_priority() {
        let headers = strings(&["email", "firstName", "lastName", "displayName"]);
        let columns = NameColumns::from_headers(&headers);

        let explicit = strings(&["a@x.io", "Alice", "Martin", "Ali"]);
        assert_eq!(columns.display_name(&explicit).as_deref(), Some("Ali"));

        let split = strings(&["a@x.io", "Alice", "", ""]);
        assert_eq!(columns.display_name(&split).as_deref(), Some("Alice"));

        let email_only = strings(&["a@x.io", "", "", ""]);
        assert_eq!(columns.display_name(&email_only).as_deref(), Some("a@x.io"));

        let blank = strings(&["", "", "", ""]);
        assert_eq!(columns.display_name(&blank), None);
    }
}
