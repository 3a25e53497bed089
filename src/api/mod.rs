//! REST API client module for the notes service.
//!
//! This module provides the `ApiClient` for authenticating and managing
//! notes, plus the cross-cutting request/response pipeline: every outbound
//! call picks up the stored bearer token, and a 401 on a non-auth endpoint
//! clears the credential and notifies the UI layer.

pub mod client;
pub mod error;
pub mod policy;

pub use client::{ApiClient, TokenResponse};
pub use error::ApiError;
pub use policy::{classify, FailureAction};
