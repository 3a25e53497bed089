//! Routes and the navigation guard.
//!
//! Every view change goes through `resolve`, which gates routes that
//! require authentication on the presence of a stored token. The guard is
//! stateless per navigation attempt: token present allows, token absent
//! redirects to login, open routes always pass.

use anyhow::Result;
use tracing::{debug, warn};

use crate::auth::TokenStore;

/// The client's views, mirroring the server's route table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Root,
    Login,
    Register,
    Notes,
}

impl Route {
    /// Path for this route, for logging and display.
    pub fn path(&self) -> &'static str {
        match self {
            Route::Root => "/",
            Route::Login => "/login",
            Route::Register => "/register",
            Route::Notes => "/notes",
        }
    }

    /// Get the display title for this route.
    pub fn title(&self) -> &'static str {
        match self {
            Route::Root | Route::Login => "Login",
            Route::Register => "Register",
            Route::Notes => "Notes",
        }
    }

    /// Whether the route is reachable only with a stored credential.
    pub fn requires_auth(&self) -> bool {
        matches!(self, Route::Notes)
    }
}

/// Outcome of a navigation attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    /// Mount the requested view.
    Allow(Route),
    /// Land on this view instead of the requested one.
    Redirect(Route),
}

/// Decide whether navigation to `target` may proceed.
///
/// For a protected route with no stored token the store is also cleared,
/// so a half-deleted credential left behind by an earlier failure cannot
/// linger. A store read failure propagates to the caller.
pub fn resolve(target: Route, store: &dyn TokenStore) -> Result<Resolution> {
    if !target.requires_auth() {
        return Ok(Resolution::Allow(target));
    }

    match store.get()? {
        Some(_) => {
            debug!(path = target.path(), "Navigation allowed");
            Ok(Resolution::Allow(target))
        }
        None => {
            debug!(path = target.path(), "No credential, redirecting to login");
            if let Err(e) = store.clear() {
                warn!(error = %e, "Failed to clear stale credential");
            }
            Ok(Resolution::Redirect(Route::Login))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::MemoryTokenStore;

    #[test]
    fn test_protected_route_with_token_allows() {
        let store = MemoryTokenStore::with_token("tok");
        assert_eq!(
            resolve(Route::Notes, &store).unwrap(),
            Resolution::Allow(Route::Notes)
        );
        // Token untouched
        assert_eq!(store.get().unwrap(), Some("tok".to_string()));
    }

    #[test]
    fn test_protected_route_without_token_redirects() {
        let store = MemoryTokenStore::new();
        assert_eq!(
            resolve(Route::Notes, &store).unwrap(),
            Resolution::Redirect(Route::Login)
        );
    }

    #[test]
    fn test_open_routes_always_allow() {
        let empty = MemoryTokenStore::new();
        let full = MemoryTokenStore::with_token("tok");
        for route in [Route::Root, Route::Login, Route::Register] {
            assert_eq!(resolve(route, &empty).unwrap(), Resolution::Allow(route));
            assert_eq!(resolve(route, &full).unwrap(), Resolution::Allow(route));
        }
    }

    #[test]
    fn test_redirect_clears_stale_credential() {
        // A store can report no credential while still holding residue from
        // an interrupted delete; the guard clears it defensively. With the
        // in-memory store this is observable as clear() being a no-op, so
        // assert the post-state only.
        let store = MemoryTokenStore::new();
        resolve(Route::Notes, &store).unwrap();
        assert_eq!(store.get().unwrap(), None);
    }
}
