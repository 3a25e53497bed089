use tokio::sync::mpsc;

/// Notifications emitted by the API client when it detects that the stored
/// credential is no longer accepted.
///
/// The HTTP layer only clears the store and emits the event; displaying the
/// notification and navigating back to the login view are left to the UI
/// layer consuming the channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthEvent {
    /// The server returned 401 for an authenticated endpoint. The request
    /// path is included for logging.
    SessionExpired { path: String },
}

pub type AuthEventSender = mpsc::UnboundedSender<AuthEvent>;
pub type AuthEventReceiver = mpsc::UnboundedReceiver<AuthEvent>;

/// Create the auth event channel. Unbounded so the sender never blocks the
/// request path.
pub fn channel() -> (AuthEventSender, AuthEventReceiver) {
    mpsc::unbounded_channel()
}
