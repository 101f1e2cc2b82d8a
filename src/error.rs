use thiserror::Error;
pub use url::ParseError as UrlParseError;

/// Error types for the Go board settings client.
#[derive(Error, Debug)]
pub enum PanelError {
    /// The device answered with an `is_ok: false` envelope.
    #[error("API error: {0}")]
    ApiError(String),

    /// The device answered with a status code the endpoint does not define.
    #[error("Unexpected status code: {0}")]
    UnexpectedStatus(http::StatusCode),

    /// No valid online-go account is stored on the device.
    #[error("Not authorized with online-go")]
    NotAuthorized,

    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Error parsing URL.
    #[error("URL parse error: {0}")]
    UrlParseError(#[from] UrlParseError),

    /// The API endpoint/path string is invalid.
    #[error("Invalid endpoint: {0}")]
    InvalidEndpoint(String),

    /// Error serializing or deserializing JSON.
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    /// Input rejected before any request was sent.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Invalid client configuration.
    #[error("Invalid configuration: {0}")]
    ConfigurationError(String),
}

/// Result type for device API operations.
pub type PanelResult<T> = Result<T, PanelError>;
