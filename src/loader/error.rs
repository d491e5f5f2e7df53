/// Errors that can occur while loading a measurement log
#[derive(Debug, thiserror::Error)]
pub enum LoaderError {
    /// I/O error opening or reading the log
    #[error("Failed to read file: {0}")]
    IoError(#[from] std::io::Error),

    /// CSV decoding error
    #[error("CSV parsing error: {0}")]
    CsvError(#[from] csv::Error),

    /// Requested column is not in the header row
    #[error("Column not found: '{column}' (available: {})", .available.join(", "))]
    ColumnNotFound {
        column: String,
        available: Vec<String>,
    },

    /// Requested column name appears more than once in the header row
    #[error("Ambiguous column: '{column}' appears {count} times in the header row")]
    AmbiguousColumn { column: String, count: usize },

    /// First field of a row is not a Unix timestamp
    #[error("Malformed timestamp on line {line}: '{value}'")]
    MalformedTimestamp { line: u64, value: String },

    /// Requested column holds text that is not a number
    #[error("Malformed value for column '{column}' on line {line}: '{value}'")]
    MalformedValue {
        line: u64,
        column: String,
        value: String,
    },

    /// Header row has no columns at all
    #[error("Missing timestamp column: header row is empty")]
    MissingTimestampColumn,
}
