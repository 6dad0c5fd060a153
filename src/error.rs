//! Error types for dotbar operations.

use thiserror::Error;

/// Result type alias using [`ChartError`].
pub type Result<T> = std::result::Result<T, ChartError>;

/// Everything that can stop a chart from being produced.
#[derive(Error, Debug)]
pub enum ChartError {
    /// Invalid or missing column selection, or a structurally invalid setting.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A selected value column holds something that is not a number.
    #[error("Non-numeric value '{value}' in column '{column}' at row {row}")]
    DataType {
        column: String,
        /// 1-based data row (header excluded).
        row: usize,
        value: String,
    },

    /// The selections matched no usable rows.
    #[error("The selected columns contain no data to plot")]
    EmptyResult,

    /// Malformed input table.
    #[error("Invalid dataset: {0}")]
    Dataset(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("PNG encoding error: {0}")]
    Image(#[from] image::ImageError),

    /// Drawing backend failure.
    #[error("Rendering error: {0}")]
    Render(String),
}

impl ChartError {
    pub(crate) fn config(msg: impl Into<String>) -> Self {
        ChartError::Configuration(msg.into())
    }

    /// True for errors the user fixes by changing selections or settings.
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            ChartError::Configuration(_) | ChartError::DataType { .. } | ChartError::EmptyResult
        )
    }
}
