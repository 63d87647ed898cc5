use thiserror::Error;

/// Failures surfaced by the table-metadata and metrics provider.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EstimateError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Provider request failed: {0}")]
    Transport(String),
    #[error("No datapoints returned for {metric} on {scope}")]
    NoData { scope: String, metric: String },
}

impl EstimateError {
    pub fn is_no_data(&self) -> bool {
        matches!(self, Self::NoData { .. })
    }
}
