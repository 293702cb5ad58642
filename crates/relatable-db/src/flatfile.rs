//! Delimited flat-file import and export of frames.
//!
//! The format is header-first, one record per line. Cells are quoted with
//! double quotes when they contain the delimiter, a quote, or a line
//! break, with embedded quotes doubled. Reading parses unquoted cells into
//! typed values (empty cell is NULL); quoted cells always stay text.

use std::fs;
use std::path::Path;

use relatable_core::frame::Frame;
use relatable_core::value::Value;
use tracing::debug;

use crate::error::{Result, TableError};

/// Reads a delimited file into a frame: header line for column names,
/// every following non-empty line a row.
pub fn read_frame(path: &Path, delimiter: char) -> Result<Frame> {
    let text = fs::read_to_string(path)?;
    let mut lines = text.lines().enumerate();

    let (_, header) = lines.next().ok_or_else(|| TableError::Flatfile {
        path: path.to_path_buf(),
        line: 1,
        message: String::from("missing header line"),
    })?;
    let columns = split_record(header, delimiter)
        .map_err(|message| TableError::Flatfile {
            path: path.to_path_buf(),
            line: 1,
            message,
        })?
        .into_iter()
        .map(|(cell, _)| cell)
        .collect::<Vec<String>>();

    let mut frame = Frame::new(columns);
    for (index, line) in lines {
        if line.is_empty() {
            continue;
        }
        let cells = split_record(line, delimiter).map_err(|message| TableError::Flatfile {
            path: path.to_path_buf(),
            line: index + 1,
            message,
        })?;
        if cells.len() != frame.width() {
            return Err(TableError::Flatfile {
                path: path.to_path_buf(),
                line: index + 1,
                message: format!(
                    "expected {} cells, got {}",
                    frame.width(),
                    cells.len()
                ),
            });
        }
        let row = cells
            .into_iter()
            .map(|(cell, quoted)| {
                if quoted {
                    Value::Text(cell)
                } else {
                    Value::parse(&cell)
                }
            })
            .collect();
        frame.push_row(row)?;
    }

    debug!(path = %path.display(), rows = frame.len(), "flat file read");
    Ok(frame)
}

/// Writes a frame as a delimited file: header line, then one record per
/// row, NULL as an empty cell.
pub fn write_frame(path: &Path, frame: &Frame, delimiter: char) -> Result<()> {
    let mut out = String::new();
    let header: Vec<String> = frame
        .columns()
        .iter()
        .map(|c| quote_cell(c, delimiter))
        .collect();
    out.push_str(&header.join(&delimiter.to_string()));
    out.push('\n');

    for row in frame.rows() {
        let cells: Vec<String> = row
            .iter()
            .map(|v| quote_cell(&v.to_string(), delimiter))
            .collect();
        out.push_str(&cells.join(&delimiter.to_string()));
        out.push('\n');
    }

    fs::write(path, out)?;
    debug!(path = %path.display(), rows = frame.len(), "flat file written");
    Ok(())
}

/// Splits one record line into cells, tracking which were quoted.
fn split_record(line: &str, delimiter: char) -> std::result::Result<Vec<(String, bool)>, String> {
    let mut cells = Vec::new();
    let mut current = String::new();
    let mut quoted = false;
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if in_quotes {
            if c == '"' {
                if chars.peek() == Some(&'"') {
                    chars.next();
                    current.push('"');
                } else {
                    in_quotes = false;
                }
            } else {
                current.push(c);
            }
        } else if c == '"' && current.is_empty() {
            in_quotes = true;
            quoted = true;
        } else if c == delimiter {
            cells.push((std::mem::take(&mut current), quoted));
            quoted = false;
        } else {
            current.push(c);
        }
    }

    if in_quotes {
        return Err(String::from("unclosed quote"));
    }
    cells.push((current, quoted));
    Ok(cells)
}

fn quote_cell(cell: &str, delimiter: char) -> String {
    if cell.contains(delimiter) || cell.contains('"') || cell.contains('\n') || cell.contains('\r')
    {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        String::from(cell)
    }
}
