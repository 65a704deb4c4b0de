use thiserror::Error;

/// Failure while obtaining or decoding a dataset.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("GET {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("invalid JSON payload: {0}")]
    Json(#[from] serde_json::Error),

    /// The payload parsed but is not an array of objects.
    #[error("unexpected dataset shape: {0}")]
    Shape(String),

    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),

    #[error(transparent)]
    Decode(#[from] anyhow::Error),
}

/// Errors surfaced by [`crate::DatasetFilter`] operations.
#[derive(Debug, Error)]
pub enum FilterError {
    #[error("dataset is not loaded")]
    Uninitialized,

    #[error("attribute '{attribute}': {reason}")]
    InvalidAttribute { attribute: String, reason: String },

    #[error("range bound {value} is not a finite number")]
    InvalidBound { value: f64 },

    #[error("load failed: {0}")]
    Load(#[from] LoadError),
}

impl FilterError {
    pub(crate) fn invalid_attribute(attribute: &str, reason: impl Into<String>) -> Self {
        FilterError::InvalidAttribute {
            attribute: attribute.to_string(),
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FilterError>;
