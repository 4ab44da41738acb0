//! Export projection to escaped delimited-text rows.
//!
//! Escaping happens once, in [`escape_field`], and the same escaped strings
//! are used for the CSV file and for inline display. The CSV writer is
//! therefore configured never to quote on its own.

use std::io::Write;

use tracing::debug;

use crate::errors::ExportError;
use crate::record::{FieldValue, Record, fields};

/// Export columns in output order: (header, source field).
pub const EXPORT_COLUMNS: [(&str, &str); 19] = [
    ("Phone Number", fields::PHONE_NUMBER),
    ("City", fields::CITY),
    ("Clicked Link", fields::USER_CLICKED_LINK),
    ("Demo Started", fields::FREE_DEMO_STARTED),
    ("Demo Ended", fields::FREE_DEMO_ENDED),
    ("Registration", fields::USER_REGISTRATION_COMPLETE),
    ("Source", fields::SOURCE),
    ("School Name", fields::SCHOOL_NAME),
    ("Persona", fields::PERSONA),
    ("Current Stage", fields::SORTING_STAGE),
    ("Level 1 Trial Starts", fields::LEVEL1_TRIAL_STARTS),
    ("Level 3 Trial Starts", fields::LEVEL3_TRIAL_STARTS),
    ("Activity Type", fields::ACTIVITY_TYPE),
    ("Current Lesson ID", fields::CURRENT_LESSON_ID),
    ("Current Lesson Sequence", fields::CURRENT_LESSON_SEQUENCE),
    ("Question Number", fields::QUESTION_NUMBER),
    ("Acceptable Messages", fields::ACCEPTABLE_MESSAGES),
    ("Last Message", fields::LAST_MESSAGE),
    ("Last Message Time", fields::LAST_MESSAGE_TIME),
];

/// Escape a field value. Null and absent values become empty strings.
pub fn escape_field(value: Option<&FieldValue>) -> String {
    match value {
        None | Some(FieldValue::Null) => String::new(),
        Some(value) => escape_str(&value.to_string()),
    }
}

/// Quote the string if it contains a comma or a double quote, doubling
/// every internal quote. Anything else is returned unchanged.
pub fn escape_str(value: &str) -> String {
    if value.contains(',') || value.contains('"') {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// One exported record: escaped values under their column headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRow {
    cells: Vec<(&'static str, String)>,
}

impl ExportRow {
    pub fn from_record(record: &Record) -> Self {
        let cells = EXPORT_COLUMNS
            .iter()
            .map(|(header, field)| (*header, escape_field(record.get(field))))
            .collect();
        Self { cells }
    }

    pub fn get(&self, header: &str) -> Option<&str> {
        self.cells
            .iter()
            .find(|(h, _)| *h == header)
            .map(|(_, v)| v.as_str())
    }

    pub fn headers(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.cells.iter().map(|(h, _)| *h)
    }

    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(_, v)| v.as_str())
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

/// Project records into export rows, one per record, in input order.
pub fn to_export_rows(records: &[Record]) -> Vec<ExportRow> {
    records.iter().map(ExportRow::from_record).collect()
}

/// Write a header line and one line per row. Returns the rows written.
pub fn write_csv<W: Write>(rows: &[ExportRow], writer: W) -> Result<usize, ExportError> {
    let mut csv = csv::WriterBuilder::new()
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    csv.write_record(EXPORT_COLUMNS.iter().map(|(header, _)| *header))?;
    for row in rows {
        csv.write_record(row.values())?;
    }
    csv.flush().map_err(ExportError::Flush)?;

    debug!(rows = rows.len(), "wrote csv rows");
    Ok(rows.len())
}
