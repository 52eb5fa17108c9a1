// src/error.rs
use arrow::error::ArrowError;
use reqwest::StatusCode;
use thiserror::Error;
use url::Url;

/// Everything `FredConnector` can fail with.
#[derive(Debug, Error)]
pub enum ConnectorError {
    /// The pipe has no usable `fred.series_id`. Raised before any I/O.
    #[error("no series ID was set for pipe `{pipe}`")]
    Configuration { pipe: String },

    /// Download or parse of the CSV body failed. Never retried.
    #[error("fetching {url} failed: {source}")]
    Fetch {
        url: Url,
        #[source]
        source: FetchError,
    },

    /// A settings or parameter document could not be loaded.
    #[error("invalid connector settings: {0}")]
    Settings(String),
}

/// Detail carried by [`ConnectorError::Fetch`].
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[source] reqwest::Error),

    #[error("non-success status {status}")]
    Status { status: StatusCode },

    #[error("reading body: {0}")]
    Body(#[source] reqwest::Error),

    #[error("CSV parse error: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed table: {0}")]
    Schema(String),

    #[error(transparent)]
    Arrow(#[from] ArrowError),
}

impl FetchError {
    /// HTTP status of the failed response, if the server answered at all.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            FetchError::Status { status } => Some(*status),
            FetchError::Request(e) | FetchError::Body(e) => e.status(),
            _ => None,
        }
    }
}

impl From<serde_yaml::Error> for ConnectorError {
    fn from(e: serde_yaml::Error) -> Self {
        ConnectorError::Settings(format!("YAML: {e}"))
    }
}

impl From<serde_json::Error> for ConnectorError {
    fn from(e: serde_json::Error) -> Self {
        ConnectorError::Settings(format!("JSON: {e}"))
    }
}

impl From<url::ParseError> for ConnectorError {
    fn from(e: url::ParseError) -> Self {
        ConnectorError::Settings(format!("base URL: {e}"))
    }
}

pub type Result<T> = std::result::Result<T, ConnectorError>;
