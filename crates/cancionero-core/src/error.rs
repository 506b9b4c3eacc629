use thiserror::Error;

/// Fatal catalog-load failures.  Only the index is load-bearing: a body
/// resource that fails to fetch degrades that one song to an empty body and
/// never produces one of these.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("song index request failed: {0}")]
    IndexFetch(#[from] reqwest::Error),

    #[error("song index request returned HTTP {0}")]
    IndexStatus(reqwest::StatusCode),

    #[error("song index is not valid JSON: {0}")]
    IndexParse(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, LoadError>;
