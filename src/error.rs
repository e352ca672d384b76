use thiserror::Error;

// ---------------------------------------------------------------------------
// Error taxonomy
// ---------------------------------------------------------------------------

/// Errors raised while loading or interpreting a dataset.
///
/// Load errors (`MissingColumn`, `InvalidValue`, `UnsupportedFormat`) are
/// fatal at startup. `UnknownMetric` is a configuration error: the dataset
/// contains a metric key the label mapping does not know.
#[derive(Debug, Error, PartialEq)]
pub enum DashboardError {
    #[error("missing required column '{0}'")]
    MissingColumn(String),

    #[error("row {row}, column '{column}': '{value}' is not a valid {expected}")]
    InvalidValue {
        row: usize,
        column: String,
        value: String,
        expected: &'static str,
    },

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error("metric '{0}' has no display label")]
    UnknownMetric(String),
}
