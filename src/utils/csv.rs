//! CSV parsing and report export
//!
//! The import side reads header-keyed rows into untyped maps; validation of
//! the individual rows happens in the import service. The export side writes
//! the attendee report consumed by event staff.

use std::collections::HashMap;
use std::io::Read;

use csv::{ReaderBuilder, WriterBuilder};

use crate::models::attendee::Attendee;
use crate::utils::errors::BadgeBuddyError;
use crate::utils::helpers::format_timestamp;

/// Untyped key-value row as read from a CSV file
pub type RawRow = HashMap<String, String>;

/// Parse CSV text into raw header-keyed rows.
///
/// Header names are matched case-insensitively and extra columns are kept,
/// so exports from arbitrary registration tools can be fed in unchanged.
/// Empty lines are skipped.
pub fn parse_rows<R: Read>(reader: R) -> Result<Vec<RawRow>, BadgeBuddyError> {
    let mut csv_reader = ReaderBuilder::new()
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(reader);

    let headers: Vec<String> = csv_reader
        .headers()?
        .iter()
        .map(|header| header.trim().to_lowercase())
        .collect();

    let mut rows = Vec::new();
    for record in csv_reader.records() {
        let record = record?;
        if record.iter().all(|field| field.trim().is_empty()) {
            continue;
        }

        let mut row = RawRow::new();
        for (header, field) in headers.iter().zip(record.iter()) {
            row.insert(header.clone(), field.to_string());
        }
        rows.push(row);
    }

    Ok(rows)
}

/// Render the attendee report as CSV
pub fn export_attendees(attendees: &[Attendee]) -> Result<String, BadgeBuddyError> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());

    writer.write_record([
        "Name",
        "Email",
        "Organization",
        "Check-in Status",
        "Check-in Time",
        "Email Sent",
    ])?;

    for attendee in attendees {
        let check_in_time = attendee
            .check_in_time
            .map(format_timestamp)
            .unwrap_or_default();

        writer.write_record([
            attendee.name.as_str(),
            attendee.email.as_str(),
            attendee.organization.as_deref().unwrap_or(""),
            if attendee.checked_in { "Checked In" } else { "Not Checked In" },
            check_in_time.as_str(),
            if attendee.email_sent { "Yes" } else { "No" },
        ])?;
    }

    let bytes = writer
        .into_inner()
        .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}
