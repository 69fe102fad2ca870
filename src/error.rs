//! Error types for GIRO batch encoding and decoding.

use thiserror::Error;

/// Result type alias for codec operations
pub type Result<T> = std::result::Result<T, GiroError>;

/// Errors that can occur while encoding or decoding a batch.
#[derive(Error, Debug)]
pub enum GiroError {
    /// Field value does not fully match its validation pattern
    #[error("Field {field}: value {value:?} does not match /{pattern}/")]
    Validation {
        field: &'static str,
        pattern: String,
        value: String,
    },

    /// Pattern-validated field was left unset
    #[error("Field {field}: value is required")]
    MissingValue { field: &'static str },

    /// Encoded value or decoded segment has the wrong length
    #[error("Field {field}: expected width {expected}, got {actual}")]
    Width {
        field: &'static str,
        expected: usize,
        actual: usize,
    },

    /// Segment cannot be read back as its declared type
    #[error("Field {field}: cannot parse {value:?}: {reason}")]
    InvalidField {
        field: &'static str,
        value: String,
        reason: String,
    },

    /// Value supplied for a field is of a different kind than the field
    #[error("Field {field}: expected a {expected} value")]
    TypeMismatch {
        field: &'static str,
        expected: &'static str,
    },

    /// Detail carries a payment type that is neither credit nor debit
    #[error("Detail {index}: unknown payment type {payment_type:?}")]
    Classification { index: usize, payment_type: String },

    /// Batch holds more details than allowed
    #[error("Too many transactions in batch: {count} exceeds limit of {max}")]
    Capacity { count: usize, max: usize },

    /// Byte stream does not have the shape of a batch
    #[error("Malformed batch: {0}")]
    Structure(String),

    /// Stored account hash total differs from the recomputed one
    #[error("Account hash total mismatch: stored {stored}, computed {computed}")]
    HashMismatch { stored: u64, computed: u64 },

    /// Aggregate does not fit its numeric type
    #[error("Arithmetic overflow computing {0}")]
    Overflow(&'static str),

    /// Failed to read or write a batch file
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// CSV output error
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Missing input file argument
    #[error("Missing input file argument. Usage: giro-batch <batch-file> [--no-verify]")]
    MissingArgument,
}
