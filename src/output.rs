//! Output formatting for CLI display and export.
//!
//! Provides the [`PrettyPrint`] trait for human-readable output and CSV
//! export of change records.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde_json::Value;

use crate::error::Result;
use crate::pagination::Record;
use crate::{AccountDetail, ProjectInfo};

/// Trait for human-readable key-value output.
///
/// Implemented by entity types to provide formatted output
/// suitable for terminal display when `--json` is not specified.
pub trait PrettyPrint {
    /// Returns a formatted string for terminal display.
    fn pretty_print(&self) -> String;
}

impl PrettyPrint for ProjectInfo {
    fn pretty_print(&self) -> String {
        let name = self.display_name();
        let divider = "─".repeat(name.chars().count().max(30));

        let mut lines = vec![format!("Project: {}", name), divider];

        if let Some(ref parent) = self.parent {
            lines.push(format!("Parent:         {}", parent));
        }

        if let Some(ref description) = self.description {
            lines.push(format!("Description:    {}", description));
        }

        let state = self
            .state
            .map(|s| format!("{:?}", s))
            .unwrap_or_else(|| "-".to_string());
        lines.push(format!("State:          {}", state));

        lines.join("\n")
    }
}

impl PrettyPrint for AccountDetail {
    fn pretty_print(&self) -> String {
        let header = format!("Account #{}", self.account_id);
        let divider = "─".repeat(header.len().max(30));

        let mut lines = vec![header, divider];

        if let Some(ref name) = self.name {
            lines.push(format!("Name:           {}", name));
        }

        if let Some(ref username) = self.username {
            lines.push(format!("Username:       {}", username));
        }

        if let Some(ref email) = self.email {
            lines.push(format!("Email:          {}", email));
        }

        if let Some(ref registered) = self.registered_on {
            lines.push(format!("Registered:     {}", registered));
        }

        lines.join("\n")
    }
}

/// Column names: every key in order of first appearance.
fn columns(records: &[Record]) -> Vec<&str> {
    let mut columns: Vec<&str> = Vec::new();
    for key in records.iter().flat_map(|record| record.keys()) {
        if !columns.contains(&key.as_str()) {
            columns.push(key);
        }
    }
    columns
}

fn cell(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(text)) => text.clone(),
        Some(other) => other.to_string(),
    }
}

/// Write records as CSV with a header row.
///
/// Missing fields produce empty cells; nested values are written as JSON.
pub fn write_records_csv<W: Write>(writer: W, records: &[Record]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    let columns = columns(records);

    if columns.is_empty() {
        wtr.flush()?;
        return Ok(());
    }

    wtr.write_record(&columns)?;
    for record in records {
        wtr.write_record(columns.iter().map(|column| cell(record.get(*column))))?;
    }
    wtr.flush()?;
    Ok(())
}

/// Write records to a CSV file.
pub fn export_csv(path: &Path, records: &[Record]) -> Result<()> {
    let file = File::create(path)?;
    write_records_csv(file, records)
}
