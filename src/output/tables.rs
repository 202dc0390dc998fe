//! CSV and JSON writers, and the batch input reader

use crate::{BatchError, Result};
use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

/// Column the batch driver reads usernames from
pub const USERNAME_COLUMN: &str = "username";

/// Writes `rows` as a CSV table with a header row
pub fn write_csv<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Writes `rows` as a pretty-printed JSON array with four-space indentation
pub fn write_json<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let file = File::create(path)?;
    let mut out = BufWriter::new(file);

    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
    let mut serializer = serde_json::Serializer::with_formatter(&mut out, formatter);
    rows.serialize(&mut serializer)?;

    out.flush()?;
    Ok(())
}

/// Reads the `username` column of a CSV table, skipping blank cells
pub fn read_usernames(path: &Path) -> std::result::Result<Vec<String>, BatchError> {
    let mut reader = csv::Reader::from_path(path)?;

    let column = reader
        .headers()?
        .iter()
        .position(|h| h.trim() == USERNAME_COLUMN)
        .ok_or_else(|| BatchError::MissingUsernameColumn(path.to_path_buf()))?;

    let mut usernames = Vec::new();
    for record in reader.records() {
        let record = record?;
        if let Some(name) = record.get(column).map(str::trim) {
            if !name.is_empty() {
                usernames.push(name.to_string());
            }
        }
    }

    Ok(usernames)
}
