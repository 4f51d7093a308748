use super::normalizer::clean_header;
use std::io::Read;

/// Header row plus trimmed data rows of a roster CSV.
#[derive(Debug)]
pub(crate) struct RawTable {
    pub(crate) headers: Vec<String>,
    pub(crate) rows: Vec<Vec<String>>,
}

pub(crate) fn parse_table<R: Read>(reader: R) -> Result<RawTable, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader
        .headers()?
        .iter()
        .map(clean_header)
        .collect::<Vec<_>>();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        rows.push(record.iter().map(str::to_string).collect());
    }

    Ok(RawTable { headers, rows })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn cells_are_trimmed_and_blank_rows_skipped() {
        let table = parse_table(Cursor::new(
            "firstName , gender\n  Alice ,  female  \n,\n Bob ,male\n",
        ))
        .expect("parse");

        assert_eq!(table.headers, vec!["firstName", "gender"]);
        assert_eq!(table.rows.len(), 2);
        assert_eq!(table.rows[0], vec!["Alice", "female"]);
    }

    #[test]
    fn ragged_rows_are_rejected() {
        let error = parse_table(Cursor::new("name,gender\nAlice,female,extra\n"))
            .expect_err("ragged row");
        assert!(matches!(error.kind(), csv::ErrorKind::UnequalLengths { .. }));
    }
}
