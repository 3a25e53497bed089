use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Access denied: {0}")]
    AccessDenied(String),

    #[error("Unauthorized - please log in again")]
    Unauthorized,

    #[error("Resource not found: {0}")]
    NotFound(String),

    #[error("Server error: {0}")]
    ServerError(String),

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),
}

/// Maximum length in bytes for server error bodies carried in messages
const MAX_ERROR_BODY_LENGTH: usize = 500;

impl ApiError {
    /// Truncate a response body to avoid logging excessive data.
    /// The cut backs up to a char boundary, since a fixed byte offset can
    /// land inside a multibyte code point.
    fn truncate_body(body: &str) -> String {
        if body.len() <= MAX_ERROR_BODY_LENGTH {
            return body.to_string();
        }
        let mut cut = MAX_ERROR_BODY_LENGTH;
        while !body.is_char_boundary(cut) {
            cut -= 1;
        }
        format!(
            "{}... (truncated, {} total bytes)",
            &body[..cut],
            body.len()
        )
    }

    pub fn from_status(status: reqwest::StatusCode, body: &str) -> Self {
        let truncated = Self::truncate_body(body);
        match status.as_u16() {
            401 => ApiError::Unauthorized,
            403 => ApiError::AccessDenied(truncated),
            404 => ApiError::NotFound(truncated),
            500..=599 => ApiError::ServerError(truncated),
            // 429 lands here too: this client never retries, so throttling
            // is surfaced like any other unexpected status
            _ => ApiError::InvalidResponse(format!("Status {}: {}", status, truncated)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status_mapping() {
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::UNAUTHORIZED, ""),
            ApiError::Unauthorized
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::NOT_FOUND, "missing"),
            ApiError::NotFound(_)
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, "boom"),
            ApiError::ServerError(_)
        ));
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::IM_A_TEAPOT, ""),
            ApiError::InvalidResponse(_)
        ));
        // No retry machinery, so throttling falls in the generic bucket
        assert!(matches!(
            ApiError::from_status(reqwest::StatusCode::TOO_MANY_REQUESTS, "slow down"),
            ApiError::InvalidResponse(_)
        ));
    }

    #[test]
    fn test_long_bodies_are_truncated() {
        let body = "x".repeat(2000);
        let err = ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body);
        let msg = err.to_string();
        assert!(msg.contains("truncated"));
        assert!(msg.len() < body.len());
    }

    #[test]
    fn test_truncate_multibyte_body() {
        // 600 bytes of 3-byte code points; byte 500 is mid-character, so the
        // cut must back up to a boundary instead of panicking
        let body = "\u{4e2d}".repeat(200);
        let err = ApiError::from_status(reqwest::StatusCode::INTERNAL_SERVER_ERROR, &body);
        let msg = err.to_string();
        assert!(msg.contains("truncated, 600 total bytes"));
        assert!(msg.contains('\u{4e2d}'));
    }
}
