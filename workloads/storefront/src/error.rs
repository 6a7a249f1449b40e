//! Page load error types.

use shop_data::FetchError;
use shop_dom::SelectorError;
use shop_executor::WorkloadError;

/// Error while writing into the document.
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("Container '{selector}' not found")]
    MissingContainer { selector: String },

    #[error("Invalid selector: {0}")]
    Selector(#[from] SelectorError),
}

/// Error raised by one unit of a page load.
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Render(#[from] RenderError),

    #[error("Workload error: {0}")]
    Workload(#[from] WorkloadError),
}

impl LoadError {
    /// Short machine-readable kind, used in logs and error markers.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Fetch(e) if e.is_parse() => "parse",
            Self::Fetch(_) => "fetch",
            Self::Render(RenderError::MissingContainer { .. }) => "missing-container",
            Self::Render(RenderError::Selector(_)) => "selector",
            Self::Workload(_) => "workload",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kinds() {
        let parse = LoadError::from(FetchError::Parse {
            url: "u".to_string(),
            message: "m".to_string(),
        });
        assert_eq!(parse.kind(), "parse");

        let status = LoadError::from(FetchError::Status {
            status: 500,
            url: "u".to_string(),
        });
        assert_eq!(status.kind(), "fetch");
        assert_eq!(status.to_string(), "HTTP error: 500 for u");

        let missing = LoadError::from(RenderError::MissingContainer {
            selector: "#all-products .container".to_string(),
        });
        assert_eq!(missing.kind(), "missing-container");
    }
}
