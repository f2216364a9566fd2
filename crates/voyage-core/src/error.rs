use thiserror::Error;

/// A failure reported by the API itself, classified by status code.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    #[error("bad request (400): {detail}")]
    BadRequest { detail: String },

    #[error("unauthorized (401): {detail}")]
    Unauthorized { detail: String },

    #[error("malformed request (422): {detail}")]
    MalformedRequest { detail: String },

    #[error("rate limit reached (429): {detail}")]
    RateLimited { detail: String },

    #[error("server error ({status}){}", detail_suffix(.detail))]
    ServerError { status: u16, detail: Option<String> },
}

fn detail_suffix(detail: &Option<String>) -> String {
    detail.as_deref().map(|d| format!(": {d}")).unwrap_or_default()
}

impl ApiError {
    pub const fn status(&self) -> u16 {
        match self {
            Self::BadRequest { .. } => 400,
            Self::Unauthorized { .. } => 401,
            Self::MalformedRequest { .. } => 422,
            Self::RateLimited { .. } => 429,
            Self::ServerError { status, .. } => *status,
        }
    }

    /// Whether another attempt may be made within the same call's budget.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::RateLimited { .. } | Self::ServerError { .. })
    }

    pub fn detail(&self) -> Option<&str> {
        match self {
            Self::BadRequest { detail }
            | Self::Unauthorized { detail }
            | Self::MalformedRequest { detail }
            | Self::RateLimited { detail } => Some(detail.as_str()),
            Self::ServerError { detail, .. } => detail.as_deref(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("invalid base64 embedding: {0}")]
    Base64(String),

    #[error("packed embedding is {len} bytes, not a multiple of the {width}-byte element width")]
    Misaligned { len: usize, width: usize },

    #[error("embedding has {actual} values, expected {expected}")]
    DimensionMismatch { expected: usize, actual: usize },
}

#[derive(Debug, Error)]
pub enum VoyageError {
    #[error("configuration error: {0}")]
    Config(String),

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A response body that parsed as JSON but whose embeddings could not be
    /// unpacked: malformed base64, a byte length that is not a whole number of
    /// elements, or a wrong vector length. Callers grouping failures as
    /// serialization errors should treat this variant as one.
    #[error("embedding decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("voyage api error: {0}")]
    Api(#[from] ApiError),

    #[error("gave up after {attempts} attempts, last error: {last}")]
    RetriesExhausted { attempts: usize, last: ApiError },
}

impl VoyageError {
    /// The classified API error behind this failure, if any.
    pub const fn api_error(&self) -> Option<&ApiError> {
        match self {
            Self::Api(err) | Self::RetriesExhausted { last: err, .. } => Some(err),
            _ => None,
        }
    }
}
