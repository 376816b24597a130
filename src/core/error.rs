use thiserror::Error;

#[derive(Debug, Error, PartialEq)]
pub enum StatsError {
    #[error("Cannot parse config: {0}")]
    ConfigParsingError(String),
    #[error("IO error: {0}")]
    IoError(String),
    #[error("Arrow error: {0}")]
    ArrowError(String),
    #[error("Table error: {0}")]
    TableError(String),
    #[error("Column '{column}' missing in table '{table}'")]
    MissingColumn { table: String, column: String },
    #[error("Render error: {0}")]
    RenderError(String),
}

impl StatsError {
    pub fn missing_column(table: &str, column: &str) -> Self {
        StatsError::MissingColumn {
            table: table.to_string(),
            column: column.to_string(),
        }
    }
}

impl From<std::io::Error> for StatsError {
    fn from(err: std::io::Error) -> Self {
        StatsError::IoError(err.to_string())
    }
}

impl From<arrow::error::ArrowError> for StatsError {
    fn from(err: arrow::error::ArrowError) -> Self {
        StatsError::ArrowError(err.to_string())
    }
}

impl From<png::EncodingError> for StatsError {
    fn from(err: png::EncodingError) -> Self {
        StatsError::RenderError(err.to_string())
    }
}

impl<E: std::error::Error + Send + Sync> From<plotters::drawing::DrawingAreaErrorKind<E>>
    for StatsError
{
    fn from(err: plotters::drawing::DrawingAreaErrorKind<E>) -> Self {
        StatsError::RenderError(err.to_string())
    }
}
