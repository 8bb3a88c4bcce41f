use thiserror::Error;

pub type Result<T> = std::result::Result<T, SerpApiError>;

/// Error string SerpApi returns inside a 200 body when the engine simply had nothing.
const EMPTY_RESULTS_MARKER: &str = "hasn't returned any results";

#[derive(Debug, Error)]
pub enum SerpApiError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    /// The engine ran but had nothing for the query. Reported in a 2xx body.
    #[error("No results: {0}")]
    NoResults(String),

    /// Any other in-body `error` (bad key, exhausted quota, bad location).
    #[error("Search failed: {0}")]
    Search(String),
}

impl SerpApiError {
    /// Classify an in-body `error` message.
    pub fn from_body_message(message: &str) -> Self {
        if message.contains(EMPTY_RESULTS_MARKER) {
            SerpApiError::NoResults(message.to_string())
        } else {
            SerpApiError::Search(message.to_string())
        }
    }

    /// True when the search succeeded with an empty result set.
    pub fn is_no_results(&self) -> bool {
        matches!(self, SerpApiError::NoResults(_))
    }
}

impl From<reqwest::Error> for SerpApiError {
    fn from(err: reqwest::Error) -> Self {
        SerpApiError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for SerpApiError {
    fn from(err: serde_json::Error) -> Self {
        SerpApiError::Parse(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_results_message_is_no_results() {
        let err = SerpApiError::from_body_message(
            "Google hasn't returned any results for this query.",
        );
        assert!(err.is_no_results());
    }

    #[test]
    fn other_messages_are_search_failures() {
        let err = SerpApiError::from_body_message("Invalid API key.");
        assert!(matches!(err, SerpApiError::Search(ref m) if m == "Invalid API key."));
        assert!(!err.is_no_results());
    }
}
