//! Fetch error types.

/// Error type for fetch operations.
#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("Transport error for {url}: {message}")]
    Transport { url: String, message: String },

    /// The server answered with a non-success status.
    #[error("HTTP error: {status} for {url}")]
    Status { status: u16, url: String },

    /// The body was not valid JSON of the expected shape.
    #[error("Parse error for {url}: {message}")]
    Parse { url: String, message: String },
}

impl FetchError {
    /// Short machine-readable kind, used in logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Transport { .. } => "transport",
            Self::Status { .. } => "status",
            Self::Parse { .. } => "parse",
        }
    }

    /// Whether this is a parse failure rather than a network failure.
    pub fn is_parse(&self) -> bool {
        matches!(self, Self::Parse { .. })
    }
}
