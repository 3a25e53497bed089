//! Keyboard event handling.
//!
//! `handle_input` dispatches on overlay state first, then on the current
//! route. Returns `Ok(true)` when the application should exit.

use anyhow::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

use crate::app::{
    can_add_password_char, can_add_title_char, can_add_username_char, App, AppState,
    EditorFocus, FormFocus, PAGE_SCROLL_SIZE,
};
use crate::router::Route;

pub async fn handle_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Overlays take input priority over the route views
    match app.state {
        AppState::EditingNote => return handle_editor_input(app, key).await,
        AppState::ConfirmingDelete => return handle_delete_confirm_input(app, key).await,
        AppState::ConfirmingQuit => return handle_quit_confirm_input(app, key),
        AppState::ShowingHelp => {
            // Any key dismisses help
            app.state = AppState::Normal;
            return Ok(false);
        }
        AppState::Searching => return handle_search_input(app, key),
        AppState::Normal | AppState::Quitting => {}
    }

    match app.route {
        Route::Root | Route::Login | Route::Register => handle_auth_form_input(app, key).await,
        Route::Notes => handle_notes_input(app, key).await,
    }
}

// ============================================================================
// Login / Register form
// ============================================================================

async fn handle_auth_form_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    // Switch between the login and register views
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('r') => {
                app.navigate(Route::Register)?;
                return Ok(false);
            }
            KeyCode::Char('l') => {
                app.navigate(Route::Login)?;
                return Ok(false);
            }
            _ => {}
        }
    }

    match key.code {
        KeyCode::Esc => {
            // Quit from the auth views
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Down | KeyCode::Tab => {
            app.form_focus = match app.form_focus {
                FormFocus::Username => FormFocus::Password,
                FormFocus::Password => FormFocus::Button,
                FormFocus::Button => FormFocus::Username,
            };
        }
        KeyCode::Up | KeyCode::BackTab => {
            app.form_focus = match app.form_focus {
                FormFocus::Username => FormFocus::Button,
                FormFocus::Password => FormFocus::Username,
                FormFocus::Button => FormFocus::Password,
            };
        }
        KeyCode::Enter => match app.form_focus {
            FormFocus::Username => {
                app.form_focus = FormFocus::Password;
            }
            FormFocus::Password => {
                app.form_focus = FormFocus::Button;
            }
            FormFocus::Button => {
                // On failure form_error is set for inline display
                let _ = match app.route {
                    Route::Register => app.attempt_register().await,
                    _ => app.attempt_login().await,
                };
            }
        },
        KeyCode::Backspace => match app.form_focus {
            FormFocus::Username => {
                app.form_username.pop();
            }
            FormFocus::Password => {
                app.form_password.pop();
            }
            FormFocus::Button => {}
        },
        KeyCode::Char(c) => match app.form_focus {
            FormFocus::Username => {
                if can_add_username_char(app.form_username.len(), c) {
                    app.form_username.push(c);
                }
            }
            FormFocus::Password => {
                if can_add_password_char(app.form_password.len(), c) {
                    app.form_password.push(c);
                }
            }
            FormFocus::Button => {}
        },
        _ => {}
    }
    Ok(false)
}

// ============================================================================
// Notes view
// ============================================================================

async fn handle_notes_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => {
            app.state = AppState::ConfirmingQuit;
        }
        KeyCode::Char('j') | KeyCode::Down => app.select_next(1),
        KeyCode::Char('k') | KeyCode::Up => app.select_prev(1),
        KeyCode::PageDown => app.select_next(PAGE_SCROLL_SIZE),
        KeyCode::PageUp => app.select_prev(PAGE_SCROLL_SIZE),
        KeyCode::Char('n') => app.start_new_note(),
        KeyCode::Char('e') | KeyCode::Enter => app.start_edit_selected(),
        KeyCode::Char('d') => app.request_delete(),
        KeyCode::Char('r') => {
            app.status_message = None;
            app.refresh_notes().await;
        }
        KeyCode::Char('/') => {
            app.state = AppState::Searching;
        }
        KeyCode::Char('L') => app.logout(),
        KeyCode::Char('?') => {
            app.state = AppState::ShowingHelp;
        }
        _ => {}
    }
    Ok(false)
}

fn handle_search_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Esc => {
            app.set_search_query(String::new());
            app.state = AppState::Normal;
        }
        KeyCode::Enter => {
            app.state = AppState::Normal;
        }
        KeyCode::Backspace => {
            let mut query = app.search_query.clone();
            query.pop();
            app.set_search_query(query);
        }
        KeyCode::Char(c) if !c.is_control() => {
            let mut query = app.search_query.clone();
            query.push(c);
            app.set_search_query(query);
        }
        _ => {}
    }
    Ok(false)
}

// ============================================================================
// Overlays
// ============================================================================

async fn handle_editor_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('s') {
        app.save_note().await;
        return Ok(false);
    }

    match key.code {
        KeyCode::Esc => {
            // Discard the draft
            app.state = AppState::Normal;
        }
        KeyCode::Tab => {
            app.editor_focus = match app.editor_focus {
                EditorFocus::Title => EditorFocus::Content,
                EditorFocus::Content => EditorFocus::Title,
            };
        }
        KeyCode::Enter => match app.editor_focus {
            EditorFocus::Title => app.editor_focus = EditorFocus::Content,
            EditorFocus::Content => app.editor_content.push('\n'),
        },
        KeyCode::Backspace => match app.editor_focus {
            EditorFocus::Title => {
                app.editor_title.pop();
            }
            EditorFocus::Content => {
                app.editor_content.pop();
            }
        },
        KeyCode::Char(c) => match app.editor_focus {
            EditorFocus::Title => {
                if can_add_title_char(app.editor_title.len(), c) {
                    app.editor_title.push(c);
                }
            }
            EditorFocus::Content => {
                if !c.is_control() {
                    app.editor_content.push(c);
                }
            }
        },
        _ => {}
    }
    Ok(false)
}

async fn handle_delete_confirm_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.delete_selected().await;
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.state = AppState::Normal;
        }
        _ => {}
    }
    Ok(false)
}

fn handle_quit_confirm_input(app: &mut App, key: KeyEvent) -> Result<bool> {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => {
            app.state = AppState::Quitting;
            return Ok(true);
        }
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
            app.state = AppState::Normal;
        }
        _ => {}
    }
    Ok(false)
}
