//! Errors raised while ingesting store records or exporting reports.

/// Error raised at the ingestion or export boundary.
///
/// The allocation engine itself is a pure computation and does not fail;
/// everything that can go wrong happens while reading records in or
/// writing reports out.
#[derive(thiserror::Error, Debug)]
pub enum ReportError {
    /// I/O error while reading a record file or writing an export.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// Malformed JSON in a record collection.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    /// CSV error during export.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    /// A date value was present but is not a valid calendar date.
    #[error("Invalid date '{value}'")]
    Date {
        /// The offending raw value.
        value: String,
    },
}
