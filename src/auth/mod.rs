//! Authentication module for managing the stored API credential.
//!
//! This module provides:
//! - `TokenStore`: a small get/set/clear interface over the saved token
//! - `KeyringTokenStore`: OS-level credential storage via keyring
//! - `AuthEvent`: notifications emitted when the HTTP layer forces a logout
//!
//! The token is an opaque server-issued string; no expiry tracking is done
//! client-side.

pub mod events;
pub mod token_store;

pub use events::{AuthEvent, AuthEventReceiver, AuthEventSender};
pub use token_store::{KeyringTokenStore, MemoryTokenStore, TokenStore};
