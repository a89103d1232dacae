/*!
 * Error types for the dubtab application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur while reading a subtitle script
#[derive(Error, Debug)]
pub enum ScriptError {
    /// The script format could not be recognized
    #[error("Unknown script format")]
    UnknownFormat,

    /// The script does not follow the grammar of its detected format
    #[error("File does not match the {0} format")]
    GrammarMismatch(String),
}

/// Errors that can occur while handling delimited tables
#[derive(Error, Debug)]
pub enum TableError {
    /// A re-imported table does not have the expected column count
    #[error("Unexpected column count: expected {expected}, row {row} has {found}")]
    ColumnCount {
        /// Expected number of columns
        expected: usize,
        /// 1-based row index of the offending row
        row: usize,
        /// Number of columns actually found
        found: usize,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from script parsing
    #[error("Script error: {0}")]
    Script(#[from] ScriptError),

    /// Error from table handling
    #[error("Table error: {0}")]
    Table(#[from] TableError),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::File(error.to_string())
    }
}
