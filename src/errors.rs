/*!
 * Error types for the mdprep application.
 *
 * This module contains custom error types for different parts of the
 * application, using the thiserror crate for ergonomic error definitions.
 *
 * Fatal errors (schema, dictionary, sheet I/O) abort the run; a row whose
 * narrative cannot be matched is not an error at all and is represented as
 * an unresolved value by the resolvers.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use thiserror::Error;

/// Errors that can occur when loading or using dictionary files
#[derive(Error, Debug)]
pub enum DictionaryError {
    /// Error when the dictionary file cannot be read
    #[error("Failed to read dictionary file '{path}': {source}")]
    Unreadable {
        /// Path of the dictionary file
        path: String,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Error when a translation table misses its canonical-language column
    #[error("Translation table is missing the canonical column '{0}'")]
    MissingCanonicalColumn(String),
}

/// Errors that can occur when working with tabular sheets
#[derive(Error, Debug)]
pub enum SheetError {
    /// Error when a required column is absent from a sheet's header
    #[error("Required column '{column}' not found in sheet '{sheet}'")]
    MissingColumn {
        /// Column that was looked up
        column: String,
        /// Sheet (file) the lookup ran against
        sheet: String,
    },

    /// Error when a sheet file cannot be read or parsed
    #[error("Failed to load sheet '{path}': {message}")]
    LoadFailed {
        /// Path of the sheet file
        path: String,
        /// Description of the failure
        message: String,
    },

    /// Error when the model sheet has fewer rows than the expected layout
    #[error("Model sheet must have at least {expected} rows (header + descriptive row), found {found}")]
    TooFewRows {
        /// Minimum number of rows required
        expected: usize,
        /// Number of rows actually present
        found: usize,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from dictionary loading
    #[error("Dictionary error: {0}")]
    Dictionary(#[from] DictionaryError),

    /// Error from sheet handling
    #[error("Sheet error: {0}")]
    Sheet(#[from] SheetError),

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
