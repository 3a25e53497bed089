//! Application state management for Jotter.
//!
//! This module contains the core `App` struct that manages all application
//! state: the current route, form and editor state, the loaded notes, and
//! the auth event channel that the API client uses to force a logout.

use std::sync::Arc;

use anyhow::Result;
use tracing::{error, info, warn};

use crate::api::{ApiClient, ApiError};
use crate::auth::{AuthEvent, AuthEventReceiver, TokenStore};
use crate::config::Config;
use crate::models::{Note, NoteDraft};
use crate::router::{self, Resolution, Route};
use crate::utils::contains_ignore_case;

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for username input.
/// Usernames are typically email addresses, 50 chars covers most.
const MAX_USERNAME_LENGTH: usize = 50;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for a note title in the editor
const MAX_TITLE_LENGTH: usize = 120;

/// Number of rows to scroll on page up/down
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    Searching,
    EditingNote,
    ConfirmingDelete,
    ConfirmingQuit,
    ShowingHelp,
    Quitting,
}

/// Login/register form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormFocus {
    Username,
    Password,
    Button,
}

/// Note editor focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditorFocus {
    Title,
    Content,
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub config: Config,
    pub api: ApiClient,
    store: Arc<dyn TokenStore>,
    auth_rx: AuthEventReceiver,

    // Navigation
    pub route: Route,
    pub state: AppState,

    // Login/register form state
    pub form_username: String,
    pub form_password: String,
    pub form_focus: FormFocus,
    pub form_error: Option<String>,

    // Notes view state
    pub notes: Vec<Note>,
    pub note_selection: usize,
    pub search_query: String,

    // Note editor state
    pub editor_title: String,
    pub editor_content: String,
    pub editor_focus: EditorFocus,
    pub editing_id: Option<i64>,

    // Status message shown in the status bar
    pub status_message: Option<String>,
}

impl App {
    /// Create a new application instance
    pub fn new(
        config: Config,
        api: ApiClient,
        store: Arc<dyn TokenStore>,
        auth_rx: AuthEventReceiver,
    ) -> Self {
        let form_username = config.last_username.clone().unwrap_or_default();

        Self {
            config,
            api,
            store,
            auth_rx,
            route: Route::Root,
            state: AppState::Normal,
            form_username,
            form_password: String::new(),
            form_focus: FormFocus::Username,
            form_error: None,
            notes: Vec::new(),
            note_selection: 0,
            search_query: String::new(),
            editor_title: String::new(),
            editor_content: String::new(),
            editor_focus: EditorFocus::Title,
            editing_id: None,
            status_message: None,
        }
    }

    // =========================================================================
    // Navigation
    // =========================================================================

    /// Navigate to a route through the guard. Protected routes require a
    /// stored credential; without one the guard redirects to login.
    pub fn navigate(&mut self, target: Route) -> Result<()> {
        let destination = match router::resolve(target, self.store.as_ref())? {
            Resolution::Allow(route) => route,
            Resolution::Redirect(route) => {
                info!(
                    requested = target.path(),
                    landed = route.path(),
                    "Navigation redirected"
                );
                route
            }
        };

        self.route = destination;
        if matches!(destination, Route::Root | Route::Login | Route::Register) {
            self.reset_form();
        }
        Ok(())
    }

    fn reset_form(&mut self) {
        self.form_focus = if self.form_username.is_empty() {
            FormFocus::Username
        } else {
            FormFocus::Password
        };
        self.form_password.clear();
        self.form_error = None;
    }

    /// Drain pending auth events from the API client. A forced logout lands
    /// the user on the login view with a notification.
    pub fn poll_auth_events(&mut self) {
        while let Ok(event) = self.auth_rx.try_recv() {
            match event {
                AuthEvent::SessionExpired { path } => {
                    warn!(path = %path, "Session expired event received");
                    self.notes.clear();
                    self.status_message =
                        Some("Session expired - please log in again".to_string());
                    if let Err(e) = self.navigate(Route::Login) {
                        error!(error = %e, "Failed to navigate to login");
                    }
                }
            }
        }
    }

    // =========================================================================
    // Authentication
    // =========================================================================

    /// Attempt login with the credentials from the form
    pub async fn attempt_login(&mut self) -> Result<()> {
        let username = self.form_username.clone();
        let password = self.form_password.clone();

        if username.is_empty() || password.is_empty() {
            self.form_error = Some("Username and password required".to_string());
            return Err(anyhow::anyhow!("Username and password required"));
        }

        self.form_error = None;

        match self.api.login(&username, &password).await {
            Ok(response) => {
                self.finish_authentication(username, &response.token).await?;
                info!("Login successful");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Login failed");
                self.form_error = Some(auth_error_message(&e));
                Err(e)
            }
        }
    }

    /// Attempt account creation with the credentials from the form
    pub async fn attempt_register(&mut self) -> Result<()> {
        let username = self.form_username.clone();
        let password = self.form_password.clone();

        if username.is_empty() || password.is_empty() {
            self.form_error = Some("Username and password required".to_string());
            return Err(anyhow::anyhow!("Username and password required"));
        }

        self.form_error = None;

        match self.api.register(&username, &password).await {
            Ok(response) => {
                self.finish_authentication(username, &response.token).await?;
                info!("Registration successful");
                Ok(())
            }
            Err(e) => {
                error!(error = %e, "Registration failed");
                self.form_error = Some(auth_error_message(&e));
                Err(e)
            }
        }
    }

    /// Shared tail of login and register: persist the token, remember the
    /// username, and land on the notes view.
    async fn finish_authentication(&mut self, username: String, token: &str) -> Result<()> {
        self.store.set(token)?;

        self.config.last_username = Some(username);
        if let Err(e) = self.config.save() {
            warn!(error = %e, "Failed to save config");
        }

        self.form_password.clear();
        self.status_message = None;
        self.navigate(Route::Notes)?;
        self.refresh_notes().await;
        Ok(())
    }

    /// Explicit logout: clear the credential and return to login
    pub fn logout(&mut self) {
        if let Err(e) = self.store.clear() {
            warn!(error = %e, "Failed to clear stored token");
        }
        self.notes.clear();
        self.status_message = Some("Logged out".to_string());
        if let Err(e) = self.navigate(Route::Login) {
            error!(error = %e, "Failed to navigate to login");
        }
        info!("Logged out");
    }

    // =========================================================================
    // Notes
    // =========================================================================

    /// Reload the notes list from the server
    pub async fn refresh_notes(&mut self) {
        match self.api.list_notes().await {
            Ok(notes) => {
                info!(count = notes.len(), "Notes loaded");
                self.notes = notes;
                self.clamp_selection();
            }
            Err(e) => {
                error!(error = %e, "Failed to load notes");
                // A 401 already triggered the forced logout through the
                // event channel; anything else is surfaced here.
                if !is_unauthorized(&e) {
                    self.status_message = Some(format!("Failed to load notes: {}", e));
                }
            }
        }
    }

    /// Notes matching the current search query, in server order
    pub fn filtered_notes(&self) -> Vec<&Note> {
        if self.search_query.is_empty() {
            return self.notes.iter().collect();
        }
        self.notes
            .iter()
            .filter(|n| {
                contains_ignore_case(n.display_title(), &self.search_query)
                    || contains_ignore_case(n.body(), &self.search_query)
            })
            .collect()
    }

    /// The currently selected note, honoring the search filter
    pub fn selected_note(&self) -> Option<&Note> {
        self.filtered_notes().get(self.note_selection).copied()
    }

    fn clamp_selection(&mut self) {
        let len = self.filtered_notes().len();
        if len == 0 {
            self.note_selection = 0;
        } else if self.note_selection >= len {
            self.note_selection = len - 1;
        }
    }

    pub fn select_next(&mut self, step: usize) {
        let len = self.filtered_notes().len();
        if len > 0 {
            self.note_selection = (self.note_selection + step).min(len - 1);
        }
    }

    pub fn select_prev(&mut self, step: usize) {
        self.note_selection = self.note_selection.saturating_sub(step);
    }

    pub fn set_search_query(&mut self, query: String) {
        self.search_query = query;
        self.clamp_selection();
    }

    // =========================================================================
    // Note editor
    // =========================================================================

    /// Open the editor on a new, empty note
    pub fn start_new_note(&mut self) {
        self.editing_id = None;
        self.editor_title.clear();
        self.editor_content.clear();
        self.editor_focus = EditorFocus::Title;
        self.state = AppState::EditingNote;
    }

    /// Open the editor on the selected note
    pub fn start_edit_selected(&mut self) {
        let selected = self
            .selected_note()
            .map(|n| (n.id, n.title.clone().unwrap_or_default(), n.body().to_string()));
        if let Some((id, title, body)) = selected {
            self.editing_id = Some(id);
            self.editor_title = title;
            self.editor_content = body;
            self.editor_focus = EditorFocus::Content;
            self.state = AppState::EditingNote;
        }
    }

    /// Save the editor contents: update when an id is set, create otherwise
    pub async fn save_note(&mut self) {
        let draft = NoteDraft {
            title: self.editor_title.clone(),
            content: self.editor_content.clone(),
        };

        let result = match self.editing_id {
            Some(id) => self.api.update_note(id, &draft).await,
            None => self.api.create_note(&draft).await,
        };

        match result {
            Ok(saved) => {
                match self.notes.iter_mut().find(|n| n.id == saved.id) {
                    Some(existing) => *existing = saved,
                    None => self.notes.push(saved),
                }
                self.state = AppState::Normal;
                self.status_message = Some("Note saved".to_string());
            }
            Err(e) => {
                error!(error = %e, "Failed to save note");
                if !is_unauthorized(&e) {
                    self.status_message = Some(format!("Failed to save note: {}", e));
                }
                // Stay in the editor so the draft is not lost
            }
        }
    }

    /// Ask for confirmation before deleting the selected note
    pub fn request_delete(&mut self) {
        if self.selected_note().is_some() {
            self.state = AppState::ConfirmingDelete;
        }
    }

    /// Delete the selected note after confirmation
    pub async fn delete_selected(&mut self) {
        let Some(id) = self.selected_note().map(|n| n.id) else {
            self.state = AppState::Normal;
            return;
        };

        match self.api.delete_note(id).await {
            Ok(()) => {
                self.notes.retain(|n| n.id != id);
                self.clamp_selection();
                self.status_message = Some("Note deleted".to_string());
            }
            Err(e) => {
                error!(error = %e, note_id = id, "Failed to delete note");
                if !is_unauthorized(&e) {
                    self.status_message = Some(format!("Failed to delete note: {}", e));
                }
            }
        }
        self.state = AppState::Normal;
    }
}

// ============================================================================
// Helpers
// ============================================================================

/// True when an error chain bottoms out in a 401
fn is_unauthorized(e: &anyhow::Error) -> bool {
    matches!(e.downcast_ref::<ApiError>(), Some(ApiError::Unauthorized))
}

/// User-friendly message for a failed login or registration attempt
fn auth_error_message(e: &anyhow::Error) -> String {
    match e.downcast_ref::<ApiError>() {
        Some(ApiError::Unauthorized) => "Invalid username or password".to_string(),
        Some(ApiError::NetworkError(_)) => {
            "Unable to connect to server. Check your internet connection.".to_string()
        }
        Some(ApiError::ServerError(_)) => {
            "The server had a problem. Please try again later.".to_string()
        }
        _ => format!("Request failed: {}", e),
    }
}

/// Check if a character is valid for text input (printable, not control)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

pub fn can_add_username_char(current_len: usize, c: char) -> bool {
    current_len < MAX_USERNAME_LENGTH && is_valid_input_char(c)
}

pub fn can_add_password_char(current_len: usize, c: char) -> bool {
    current_len < MAX_PASSWORD_LENGTH && is_valid_input_char(c)
}

pub fn can_add_title_char(current_len: usize, c: char) -> bool {
    current_len < MAX_TITLE_LENGTH && is_valid_input_char(c)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: i64, title: &str, content: &str) -> Note {
        serde_json::from_value(serde_json::json!({
            "id": id,
            "title": title,
            "content": content,
        }))
        .unwrap()
    }

    fn test_app_with_notes(notes: Vec<Note>) -> App {
        let store: Arc<dyn TokenStore> =
            Arc::new(crate::auth::MemoryTokenStore::with_token("tok"));
        let (tx, rx) = crate::auth::events::channel();
        let api = ApiClient::new("https://notes.example.com".to_string(), store.clone(), tx)
            .unwrap();
        let mut app = App::new(Config::default(), api, store, rx);
        app.notes = notes;
        app
    }

    #[test]
    fn test_filtered_notes_matches_title_and_body() {
        let mut app = test_app_with_notes(vec![
            note(1, "Groceries", "milk and eggs"),
            note(2, "Ideas", "a note about groceries"),
            note(3, "Travel", "pack passport"),
        ]);

        app.set_search_query("groceries".to_string());
        let hits: Vec<i64> = app.filtered_notes().iter().map(|n| n.id).collect();
        assert_eq!(hits, vec![1, 2]);

        app.set_search_query(String::new());
        assert_eq!(app.filtered_notes().len(), 3);
    }

    #[test]
    fn test_selection_clamps_when_filter_narrows() {
        let mut app = test_app_with_notes(vec![
            note(1, "Alpha", ""),
            note(2, "Beta", ""),
            note(3, "Gamma", ""),
        ]);
        app.note_selection = 2;

        app.set_search_query("beta".to_string());
        assert_eq!(app.selected_note().unwrap().id, 2);
    }

    #[test]
    fn test_select_navigation_bounds() {
        let mut app = test_app_with_notes(vec![note(1, "A", ""), note(2, "B", "")]);

        app.select_prev(1);
        assert_eq!(app.note_selection, 0);

        app.select_next(PAGE_SCROLL_SIZE);
        assert_eq!(app.note_selection, 1);
    }

    #[test]
    fn test_auth_error_messages() {
        let unauthorized: anyhow::Error = ApiError::Unauthorized.into();
        assert_eq!(auth_error_message(&unauthorized), "Invalid username or password");

        let server: anyhow::Error = ApiError::ServerError("oops".to_string()).into();
        assert!(auth_error_message(&server).contains("try again later"));

        let other = anyhow::anyhow!("something else");
        assert!(auth_error_message(&other).contains("Request failed"));
    }

    #[test]
    fn test_input_length_limits() {
        assert!(can_add_username_char(0, 'a'));
        assert!(!can_add_username_char(MAX_USERNAME_LENGTH, 'a'));
        assert!(!can_add_password_char(MAX_PASSWORD_LENGTH, 'x'));
        assert!(!can_add_username_char(0, '\n'));
    }

    #[test]
    fn test_start_edit_populates_editor() {
        let mut app = test_app_with_notes(vec![note(5, "Title", "Body text")]);
        app.start_edit_selected();

        assert_eq!(app.state, AppState::EditingNote);
        assert_eq!(app.editing_id, Some(5));
        assert_eq!(app.editor_title, "Title");
        assert_eq!(app.editor_content, "Body text");
    }

    #[test]
    fn test_start_new_note_clears_editor() {
        let mut app = test_app_with_notes(vec![note(5, "Title", "Body")]);
        app.start_edit_selected();
        app.state = AppState::Normal;

        app.start_new_note();
        assert_eq!(app.editing_id, None);
        assert!(app.editor_title.is_empty());
        assert!(app.editor_content.is_empty());
    }
}
