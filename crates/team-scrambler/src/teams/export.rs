use super::domain::{CategoricalField, Group};
use std::io::Write;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write team export: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush team export: {0}")]
    Io(#[from] std::io::Error),
    #[error("team export is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Writes one row per member: `name`, every field key in `fields` order, then
/// the group name. All cells are quoted and original value casing is kept.
/// Rows are joined with `\n`; the last row has no terminator.
pub fn write_csv<W: Write>(
    groups: &[Group],
    fields: &[CategoricalField],
    mut writer: W,
) -> Result<(), ExportError> {
    let mut csv_writer = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Always)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(Vec::new());

    let mut header = Vec::with_capacity(fields.len() + 2);
    header.push("name");
    header.extend(fields.iter().map(|field| field.key.as_str()));
    header.push("team");
    csv_writer.write_record(&header)?;

    for group in groups {
        for member in &group.members {
            let mut row = Vec::with_capacity(fields.len() + 2);
            row.push(member.display_name.as_str());
            row.extend(fields.iter().map(|field| {
                member
                    .criteria
                    .get(&field.key)
                    .map(String::as_str)
                    .unwrap_or("")
            }));
            row.push(group.name.as_str());
            csv_writer.write_record(&row)?;
        }
    }

    let mut bytes = csv_writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    if bytes.last() == Some(&b'\n') {
        bytes.pop();
    }

    writer.write_all(&bytes)?;
    writer.flush()?;
    Ok(())
}

pub fn to_csv_string(groups: &[Group], fields: &[CategoricalField]) -> Result<String, ExportError> {
    let mut buffer = Vec::new();
    write_csv(groups, fields, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}
