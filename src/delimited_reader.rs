use std::path::Path;

use anyhow::Result;
use log::debug;

use crate::file_utils::FileManager;

// @module: Permissive character-level delimited-text reader

/// Reads a previously exported delimited table back into row records.
///
/// The reader walks the input character by character rather than line by
/// line: a quoted field may legally contain the field separator or even the
/// record terminator, so a line-oriented split would tear such fields apart.
/// A field is complete only when the quote characters seen in it balance
/// out to an even count.
#[derive(Debug, Clone)]
pub struct DelimitedReader {
    separator: char,
}

impl DelimitedReader {
    pub fn new(separator: char) -> Self {
        DelimitedReader { separator }
    }

    pub fn separator(&self) -> char {
        self.separator
    }

    /// Read a delimited file into rows. The file is expected to be UTF-8,
    /// optionally with a byte-order marker.
    pub fn read_file<P: AsRef<Path>>(&self, path: P) -> Result<Vec<Vec<String>>> {
        let content = FileManager::read_to_string(path)?;
        Ok(self.read_str(&content))
    }

    /// Parse delimited content into rows of unquoted fields.
    ///
    /// A separator or newline lands inside a field whenever the field's
    /// running quote count is odd; it is then kept verbatim instead of
    /// acting as a delimiter. Carriage returns are dropped, empty lines
    /// produce no rows, a trailing separator before the record terminator
    /// yields an empty final field, and a non-empty buffer at end of input
    /// is flushed as the final field of the final row.
    pub fn read_str(&self, content: &str) -> Vec<Vec<String>> {
        let mut rows: Vec<Vec<String>> = Vec::new();
        let mut row: Vec<String> = Vec::new();
        let mut buffer = String::new();
        let mut quote_count: usize = 0;

        for character in content.chars() {
            if character == '\u{feff}' || character == '\r' {
                continue;
            }

            if character == self.separator {
                if quote_count % 2 == 0 {
                    row.push(unquote_field(&buffer));
                    buffer.clear();
                    quote_count = 0;
                } else {
                    buffer.push(character);
                }
            } else if character == '\n' {
                if quote_count % 2 == 0 {
                    // An empty buffer still completes a field when the row
                    // already has members: `a;b;` ends in an empty cell.
                    // Only a bare empty line produces nothing.
                    if !buffer.is_empty() || !row.is_empty() {
                        row.push(unquote_field(&buffer));
                        buffer.clear();
                        quote_count = 0;
                        rows.push(std::mem::take(&mut row));
                    }
                } else {
                    buffer.push(character);
                }
            } else {
                if character == '"' {
                    quote_count += 1;
                }
                buffer.push(character);
            }
        }

        // Flush whatever is left at end of input
        if !buffer.is_empty() {
            if quote_count % 2 == 0 {
                row.push(unquote_field(&buffer));
            } else {
                // Unbalanced quotes at EOF: keep the raw buffer as-is
                row.push(buffer);
            }
        }
        if !row.is_empty() {
            rows.push(row);
        }

        debug!("Read {} delimited rows", rows.len());

        rows
    }
}

/// Strip delimited-text escaping from one completed field: one surrounding
/// quote pair is removed, doubled internal quotes collapse to single ones.
///
/// Known limitations, preserved from the original exporter's counterpart:
/// a field with four or more consecutive doubled-quote pairs can miscount
/// and close prematurely, and a cell whose text is itself entirely
/// quote-wrapped but contains no separator loses its surrounding pair on
/// re-import (the exporter only quotes cells that contain the separator,
/// so such a cell arrives here unescaped and the pair is stripped).
pub fn unquote_field(field: &str) -> String {
    let trimmed = if field.len() >= 2 && field.starts_with('"') && field.ends_with('"') {
        &field[1..field.len() - 1]
    } else {
        field
    };

    trimmed.replace("\"\"", "\"")
}
