//! Error types for the submission pipeline

/// Longest diagnostic excerpt carried into a status message
pub const EXCERPT_LIMIT: usize = 300;

/// Endpoint configuration problems, detected before any network I/O
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigError {
    #[error("backend endpoint is not configured")]
    MissingEndpoint,

    #[error("backend endpoint still holds the placeholder value: {0}")]
    PlaceholderEndpoint(String),

    #[error("backend endpoint is not a valid URL ({url}): {source}")]
    InvalidEndpoint {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("backend endpoint must use https, got {scheme}: {url}")]
    InsecureEndpoint { url: String, scheme: String },

    #[error("invalid value for {key}: {value}")]
    InvalidValue { key: &'static str, value: String },
}

/// The host container could not hand over its integration
#[derive(Debug, thiserror::Error)]
pub enum HostError {
    #[error("host container is unavailable: {0}")]
    Unavailable(String),

    #[error("invalid init data: {0}")]
    InvalidInitData(String),
}

/// Failure of the HTTP request itself (no usable response)
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to build request: {0}")]
    Build(String),

    #[error("request failed")]
    Send(#[source] reqwest::Error),

    #[error("failed to read response body")]
    Body(#[source] reqwest::Error),

    #[error("{0}")]
    Other(String),
}

/// Why one submission attempt did not succeed
#[derive(Debug, thiserror::Error)]
pub enum SubmitError {
    #[error("Cannot submit: Telegram user information is missing.")]
    MissingIdentity,

    #[error("Backend API URL is not configured correctly: {0}")]
    Config(#[from] ConfigError),

    #[error("Attachment {file_name} is {size} bytes (limit {limit} bytes)")]
    AttachmentTooLarge {
        file_name: String,
        size: u64,
        limit: u64,
    },

    #[error("Submission already in progress")]
    Busy,

    #[error("{0}")]
    Transport(#[from] TransportError),

    #[error("Received non-JSON response (Content-Type: {content_type}). Body: {body}")]
    Protocol { content_type: String, body: String },

    #[error("{message}")]
    Rejected { status: u16, message: String },
}

impl SubmitError {
    /// Errors raised by the network layer rather than by the pipeline's own checks
    pub fn is_unexpected(&self) -> bool {
        matches!(self, SubmitError::Transport(_))
    }

    /// Message shown in the status log, with the cause chain appended for unexpected errors
    pub fn user_message(&self) -> String {
        let mut message = format!("Submission Error: {}", self);
        if let SubmitError::Transport(inner) = self {
            let chain = cause_chain(inner);
            if !chain.is_empty() {
                message.push_str("\nCause: ");
                message.push_str(&excerpt(&chain, EXCERPT_LIMIT));
            }
        }
        message
    }
}

/// Joins the `source()` chain below `err` with `": "`
pub fn cause_chain(err: &dyn std::error::Error) -> String {
    let mut parts = Vec::new();
    let mut current = err.source();
    while let Some(source) = current {
        parts.push(source.to_string());
        current = source.source();
    }
    parts.join(": ")
}

/// Cuts `text` to at most `limit` characters, marking the cut with an ellipsis
pub fn excerpt(text: &str, limit: usize) -> String {
    match text.char_indices().nth(limit) {
        Some((idx, _)) => format!("{}…", &text[..idx]),
        None => text.to_string(),
    }
}
