use thiserror::Error;

/// Failure to turn an accepted video into a song record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExtractError {
    #[error("video \"{title}\" has neither an id nor a contentDetails.videoId")]
    MissingVideoId { title: String },
}

/// A matching rule list loaded from configuration is unusable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RulesError {
    #[error("{list} contains an empty entry")]
    EmptyEntry { list: &'static str },

    #[error("music_category_id must not be empty")]
    EmptyCategory,
}

/// Failure while paging through the liked-videos listing.
#[derive(Error, Debug)]
pub enum FetchError {
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing failed: {0}")]
    Url(#[from] url::ParseError),

    #[error("API returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
}

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing failed: {0}")]
    Json(#[from] serde_json::Error),

    #[error("URL parsing failed: {0}")]
    Url(#[from] url::ParseError),

    #[error("client secrets file has neither an \"installed\" nor a \"web\" section")]
    MalformedSecrets,

    #[error("token endpoint rejected the request: {0}")]
    TokenRejected(String),

    #[error("authorization failed: {0}")]
    Consent(String),
}
