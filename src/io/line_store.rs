//! Line-oriented file helpers
//!
//! Stores are plain text files read and written as whole lists of lines.
//! Count files hold a single integer: the ordinal the next appended block will
//! display in its header.
//!
//! # Durability
//!
//! Rewrites truncate the file in place and write the new contents; there is no
//! temp-file-and-rename step. A crash mid-rewrite can leave a truncated store,
//! and a crash between a store write and its count write leaves the count out
//! of step. Both are accepted for single-process, small-scale use.

use crate::types::StoreError;
use std::fs::{File, OpenOptions};
use std::io::{BufRead, BufReader, BufWriter, Write};
use std::path::Path;

/// Count reported when a count file is missing or unreadable
pub const DEFAULT_COUNT: u64 = 1;

/// Strip leading and trailing whitespace
///
/// All-whitespace input yields an empty string.
pub fn trim(s: &str) -> &str {
    s.trim()
}

/// Read every line of a file, without line terminators
///
/// # Errors
///
/// Returns `FileUnavailable` if the file cannot be opened and `IoError` if a
/// read fails part-way.
pub fn read_lines(path: &Path) -> Result<Vec<String>, StoreError> {
    let file = File::open(path).map_err(|e| StoreError::file_unavailable(path, e))?;
    let reader = BufReader::new(file);

    let mut lines = Vec::new();
    for line in reader.lines() {
        lines.push(line?);
    }
    Ok(lines)
}

/// Replace a file's contents with `lines`, each terminated by `\n`
pub fn write_lines(path: &Path, lines: &[String]) -> Result<(), StoreError> {
    let file = File::create(path).map_err(|e| StoreError::file_unavailable(path, e))?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

/// Append `lines` to a file, creating it if needed
pub fn append_lines(path: &Path, lines: &[String]) -> Result<(), StoreError> {
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| StoreError::file_unavailable(path, e))?;
    let mut writer = BufWriter::new(file);
    for line in lines {
        writeln!(writer, "{}", line)?;
    }
    writer.flush()?;
    Ok(())
}

/// Read the integer held by a count file
///
/// A missing, unreadable, or non-numeric count file reads as [`DEFAULT_COUNT`].
pub fn read_count(path: &Path) -> u64 {
    std::fs::read_to_string(path)
        .ok()
        .and_then(|content| trim(&content).parse().ok())
        .unwrap_or(DEFAULT_COUNT)
}

/// Overwrite a count file with `count` (no trailing newline)
pub fn write_count(path: &Path, count: u64) -> Result<(), StoreError> {
    std::fs::write(path, count.to_string()).map_err(|e| StoreError::file_unavailable(path, e))
}

/// Decrease the integer held by a count file by one
///
/// Returns the new value, or `None` when the count file does not exist, in
/// which case nothing is written. The value never drops below zero.
pub fn decrement_count(path: &Path) -> Result<Option<u64>, StoreError> {
    if !path.exists() {
        return Ok(None);
    }
    let count = read_count(path).saturating_sub(1);
    write_count(path, count)?;
    Ok(Some(count))
}
