use reqwest::StatusCode;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("listing request to {url} returned status: {status}")]
    ListingStatus { url: String, status: StatusCode },

    #[error("response is not a bucket listing: {0}")]
    InvalidListing(#[from] serde_json::Error),

    #[error("invalid api base url: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("api base url cannot take path segments: {0}")]
    NotABase(String),

    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}
