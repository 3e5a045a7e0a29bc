use thiserror::Error;

/// Failures of the CMS client adapter. None of them are retried.
#[derive(Debug, Error)]
pub enum CmsError {
    #[error("remote unavailable: {0}")]
    RemoteUnavailable(String),
    #[error("malformed response: {0}")]
    MalformedResponse(String),
    #[error("invalid endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),
    #[error("no `{type_name}` document with uid `{uid}`")]
    NotFound { type_name: String, uid: String },
}

impl From<reqwest::Error> for CmsError {
    fn from(value: reqwest::Error) -> Self {
        Self::RemoteUnavailable(value.to_string())
    }
}

impl From<serde_json::Error> for CmsError {
    fn from(value: serde_json::Error) -> Self {
        Self::MalformedResponse(value.to_string())
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum NormalizeError {
    #[error("document has no uid")]
    MissingUid,
    #[error("document `{0}` has no data")]
    MissingData(String),
}

#[derive(Debug, Error)]
pub enum LoadMoreError {
    #[error("no more posts to load")]
    Exhausted,
    #[error("a request for more posts is already running")]
    InFlight,
    #[error("failed to fetch more posts: {0}")]
    Remote(String),
    #[error("unexpected answer while fetching more posts: {0}")]
    Malformed(String),
}

impl From<reqwest::Error> for LoadMoreError {
    fn from(value: reqwest::Error) -> Self {
        Self::Remote(value.to_string())
    }
}

impl From<serde_json::Error> for LoadMoreError {
    fn from(value: serde_json::Error) -> Self {
        Self::Malformed(value.to_string())
    }
}

impl From<NormalizeError> for LoadMoreError {
    fn from(value: NormalizeError) -> Self {
        Self::Malformed(value.to_string())
    }
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error(transparent)]
    Cms(#[from] CmsError),
    #[error(transparent)]
    Normalize(#[from] NormalizeError),
    #[error("page store: {0}")]
    Io(#[from] std::io::Error),
    #[error("page store: {0}")]
    Json(#[from] serde_json::Error),
}
