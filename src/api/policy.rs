//! Classification of failed responses.
//!
//! Kept as a pure function (status + path in, action out) so the
//! forced-logout rule can be tested without a live server. The side effects
//! themselves live in `ApiClient::force_logout`.

use reqwest::StatusCode;

/// Paths excluded from the forced-logout rule.
///
/// A 401 from these endpoints means the login attempt itself was rejected,
/// not that a stored credential went stale. Without the exclusion, a failed
/// login would trigger a logout-redirect loop.
///
/// Exact-match only. If the server ever introduces versioned or
/// parameterized auth paths this list silently stops excluding them.
const AUTH_PATHS: [&str; 2] = ["/login/", "/register/"];

/// What to do with a failed response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureAction {
    /// Reject the error to the caller with no side effects.
    Propagate,
    /// Clear the stored credential, notify the UI layer, and let it send
    /// the user back to the login view. The error is still rejected to the
    /// caller afterwards.
    ForceLogout,
}

/// Classify a failed response by status and request path.
pub fn classify(status: StatusCode, path: &str) -> FailureAction {
    if status == StatusCode::UNAUTHORIZED && !AUTH_PATHS.contains(&path) {
        FailureAction::ForceLogout
    } else {
        FailureAction::Propagate
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_401_on_data_path_forces_logout() {
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, "/notes/"),
            FailureAction::ForceLogout
        );
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, "/notes/42/"),
            FailureAction::ForceLogout
        );
    }

    #[test]
    fn test_401_on_auth_paths_propagates() {
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, "/login/"),
            FailureAction::Propagate
        );
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, "/register/"),
            FailureAction::Propagate
        );
    }

    #[test]
    fn test_non_401_errors_propagate() {
        assert_eq!(
            classify(StatusCode::INTERNAL_SERVER_ERROR, "/notes/"),
            FailureAction::Propagate
        );
        assert_eq!(
            classify(StatusCode::NOT_FOUND, "/notes/42/"),
            FailureAction::Propagate
        );
        assert_eq!(
            classify(StatusCode::BAD_REQUEST, "/login/"),
            FailureAction::Propagate
        );
    }

    #[test]
    fn test_exclusion_is_exact_match() {
        // Documented brittleness: a versioned auth path is not excluded
        assert_eq!(
            classify(StatusCode::UNAUTHORIZED, "/v2/login/"),
            FailureAction::ForceLogout
        );
    }
}
