//! Jotter - a terminal client for a remote notes service.
//!
//! This application provides a fast, keyboard-driven interface for
//! logging in, registering, and managing notes stored on a remote server.

mod api;
mod app;
mod auth;
mod config;
mod models;
mod router;
mod ui;
mod utils;

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use api::ApiClient;
use app::{App, AppState};
use auth::{KeyringTokenStore, TokenStore};
use config::Config;
use router::Route;
use ui::input::handle_input;
use ui::render::render;

/// Timeout for polling terminal events (in milliseconds)
const EVENT_POLL_TIMEOUT_MS: u64 = 100;

/// Initialize the tracing subscriber for logging
fn init_tracing() {
    // Use RUST_LOG env var to control log level (e.g., RUST_LOG=debug)
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(io::stderr))
        .with(filter)
        .init();
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file if present (silently ignore if not found)
    let _ = dotenvy::dotenv();

    init_tracing();
    info!("Jotter starting");

    let config = Config::load().unwrap_or_default();

    let store: Arc<dyn TokenStore> = Arc::new(KeyringTokenStore::new());
    let (auth_tx, auth_rx) = auth::events::channel();
    let api = ApiClient::new(config.resolved_api_base_url(), store.clone(), auth_tx)?;

    let mut app = App::new(config, api, store, auth_rx);

    // Head straight for the notes view; the guard lands us on login when no
    // credential is stored.
    app.navigate(Route::Notes)?;
    if app.route == Route::Notes {
        app.refresh_notes().await;
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_app(&mut terminal, &mut app).await;

    // Restore terminal
    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    info!("Jotter shutting down");
    Ok(())
}

async fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| render(f, app))?;

        // Poll with timeout so auth events are picked up between keystrokes
        if event::poll(Duration::from_millis(EVENT_POLL_TIMEOUT_MS))? {
            if let Event::Key(key) = event::read()? {
                // Ctrl+C to quit
                if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL)
                {
                    return Ok(());
                }

                if handle_input(app, key).await? {
                    return Ok(());
                }
            }
        }

        // A 401 on any call may have forced a logout
        app.poll_auth_events();

        if matches!(app.state, AppState::Quitting) {
            return Ok(());
        }
    }
}
