use serde::Deserialize;

use crate::error::{ApiError, VoyageError};

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

/// Maps a failed response (status >= 400) to a typed API error.
///
/// 4xx bodies must be JSON; an unparseable 4xx body is a fatal serialization
/// error, while a missing or null `detail` reads as empty. 5xx bodies are read
/// best-effort and a missing or malformed detail is simply dropped.
pub fn classify(status: u16, body: &[u8]) -> Result<ApiError, VoyageError> {
    let detail = if (400..500).contains(&status) {
        Some(
            serde_json::from_slice::<ErrorBody>(body)?
                .detail
                .unwrap_or_default(),
        )
    } else {
        serde_json::from_slice::<ErrorBody>(body)
            .ok()
            .and_then(|b| b.detail)
    };

    let err = match (status, detail) {
        (400, Some(detail)) => ApiError::BadRequest { detail },
        (401, Some(detail)) => ApiError::Unauthorized { detail },
        (422, Some(detail)) => ApiError::MalformedRequest { detail },
        (429, Some(detail)) => ApiError::RateLimited { detail },
        (status, detail) => ApiError::ServerError { status, detail },
    };
    Ok(err)
}
