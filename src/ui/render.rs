use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

use crate::app::{App, AppState, EditorFocus, FormFocus};
use crate::router::Route;
use crate::utils::{format_timestamp, truncate};

use super::styles;

pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Title bar
            Constraint::Min(10),   // Main content
            Constraint::Length(2), // Status bar
        ])
        .split(frame.area());

    render_title_bar(frame, app, chunks[0]);

    match app.route {
        Route::Root | Route::Login => render_auth_form(frame, app, chunks[1], "Login"),
        Route::Register => render_auth_form(frame, app, chunks[1], "Register"),
        Route::Notes => render_notes(frame, app, chunks[1]),
    }

    render_status_bar(frame, app, chunks[2]);

    // Render overlays
    if matches!(app.state, AppState::EditingNote) {
        render_editor_overlay(frame, app);
    }

    if matches!(app.state, AppState::ConfirmingDelete) {
        render_delete_overlay(frame, app);
    }

    if matches!(app.state, AppState::ShowingHelp) {
        render_help_overlay(frame);
    }

    if matches!(app.state, AppState::ConfirmingQuit) {
        render_quit_overlay(frame);
    }
}

fn render_title_bar(frame: &mut Frame, app: &App, area: Rect) {
    let title = "  Jotter";
    let route = format!("{} ({})  ", app.route.title(), app.route.path());

    let title_line = Line::from(vec![
        Span::styled(title, styles::title_style()),
        Span::raw(" ".repeat(
            (area.width as usize).saturating_sub(title.len() + route.len()),
        )),
        Span::styled(route, styles::muted_style()),
    ]);

    let block = Block::default()
        .borders(Borders::BOTTOM)
        .border_style(styles::muted_style());

    frame.render_widget(Paragraph::new(title_line).block(block), area);
}

// ============================================================================
// Login / Register
// ============================================================================

fn render_auth_form(frame: &mut Frame, app: &App, area: Rect, action: &str) {
    let height = if app.form_error.is_some() { 12 } else { 10 };
    let dialog = centered_rect_fixed(46, height, area);

    let mut lines = vec![];

    lines.push(Line::from(Span::styled(
        format!("      Jotter :: {}", action),
        styles::title_style(),
    )));
    lines.push(Line::from(""));

    lines.push(field_line(
        "Username",
        &app.form_username,
        app.form_focus == FormFocus::Username,
    ));

    let masked: String = "*".repeat(app.form_password.chars().count().min(16));
    lines.push(field_line(
        "Password",
        &masked,
        app.form_focus == FormFocus::Password,
    ));

    lines.push(Line::from(""));
    let button_focused = app.form_focus == FormFocus::Button;
    let label = if button_focused {
        format!(" ▶ {} ◀ ", action)
    } else {
        format!("   {}   ", action)
    };
    let button_style = if button_focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    lines.push(Line::from(vec![
        Span::raw("            ["),
        Span::styled(label, button_style),
        Span::raw("]"),
    ]));

    lines.push(Line::from(""));
    let other = if action == "Login" {
        "Ctrl+R: go to register"
    } else {
        "Ctrl+L: go to login"
    };
    lines.push(Line::from(Span::styled(
        format!("      {}", other),
        styles::muted_style(),
    )));

    if let Some(ref error) = app.form_error {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(
            format!(" {}", error),
            styles::error_style(),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Clear, dialog);
    frame.render_widget(Paragraph::new(lines).block(block), dialog);
}

fn field_line<'a>(label: &'a str, value: &str, focused: bool) -> Line<'a> {
    let style = if focused {
        styles::selected_style()
    } else {
        styles::list_item_style()
    };
    let display = format!("{:<24}", truncate(value, 24));
    let cursor = if focused { "▌" } else { "" };
    Line::from(vec![
        Span::raw("  "),
        Span::styled(format!("{}: [", label), styles::muted_style()),
        Span::styled(format!("{}{}", display, cursor), style),
        Span::styled("]", styles::muted_style()),
    ])
}

// ============================================================================
// Notes
// ============================================================================

fn render_notes(frame: &mut Frame, app: &App, area: Rect) {
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(40), Constraint::Percentage(60)])
        .split(area);

    render_notes_list(frame, app, chunks[0]);
    render_note_detail(frame, app, chunks[1]);
}

fn render_notes_list(frame: &mut Frame, app: &App, area: Rect) {
    let notes = app.filtered_notes();

    let title = if app.state == AppState::Searching || !app.search_query.is_empty() {
        format!(" Notes /{} ", app.search_query)
    } else {
        format!(" Notes ({}) ", notes.len())
    };

    let mut lines: Vec<Line> = Vec::new();
    let inner_height = area.height.saturating_sub(2) as usize;

    // Keep the selection in view
    let offset = app.note_selection.saturating_sub(inner_height.saturating_sub(1));

    for (i, note) in notes.iter().enumerate().skip(offset).take(inner_height) {
        let selected = i == app.note_selection;
        let style = if selected {
            styles::selected_style()
        } else {
            styles::list_item_style()
        };
        let marker = if selected { "▶ " } else { "  " };
        let label = truncate(note.display_title(), area.width.saturating_sub(6) as usize);
        lines.push(Line::from(Span::styled(format!("{}{}", marker, label), style)));
    }

    if notes.is_empty() {
        let hint = if app.search_query.is_empty() {
            "No notes yet - press [n] to create one"
        } else {
            "No notes match the filter"
        };
        lines.push(Line::from(Span::styled(hint, styles::muted_style())));
    }

    let block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_note_detail(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines: Vec<Line> = Vec::new();

    if let Some(note) = app.selected_note() {
        lines.push(Line::from(Span::styled(
            note.display_title().to_string(),
            styles::title_style(),
        )));
        if let Some(ts) = note.last_touched() {
            lines.push(Line::from(Span::styled(
                format!("Last updated {}", format_timestamp(ts)),
                styles::muted_style(),
            )));
        }
        lines.push(Line::from(""));
        for text_line in note.body().lines() {
            lines.push(Line::from(text_line.to_string()));
        }
    } else {
        lines.push(Line::from(Span::styled(
            "Select a note to view it",
            styles::muted_style(),
        )));
    }

    let block = Block::default()
        .title(" Detail ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(false));

    frame.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

// ============================================================================
// Overlays
// ============================================================================

fn render_editor_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_percent(70, 70, frame.area());
    frame.render_widget(Clear, area);

    let title = if app.editing_id.is_some() {
        " Edit Note "
    } else {
        " New Note "
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(3)])
        .split(area);

    let title_block = Block::default()
        .title(format!("{}- Title ", title))
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.editor_focus == EditorFocus::Title));
    let title_cursor = if app.editor_focus == EditorFocus::Title { "▌" } else { "" };
    frame.render_widget(
        Paragraph::new(format!("{}{}", app.editor_title, title_cursor)).block(title_block),
        chunks[0],
    );

    let content_block = Block::default()
        .title(" Content (Ctrl+S save, Esc cancel) ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(app.editor_focus == EditorFocus::Content));
    let content_cursor = if app.editor_focus == EditorFocus::Content { "▌" } else { "" };
    frame.render_widget(
        Paragraph::new(format!("{}{}", app.editor_content, content_cursor))
            .block(content_block)
            .wrap(Wrap { trim: false }),
        chunks[1],
    );
}

fn render_delete_overlay(frame: &mut Frame, app: &App) {
    let area = centered_rect_fixed(44, 7, frame.area());
    frame.render_widget(Clear, area);

    let name = app
        .selected_note()
        .map(|n| truncate(n.display_title(), 30))
        .unwrap_or_default();

    let lines = vec![
        Line::from(""),
        Line::from(Span::styled(
            format!("  Delete \"{}\"?", name),
            styles::error_style(),
        )),
        Line::from(""),
        Line::from(vec![
            Span::raw("  "),
            Span::styled("[y]", styles::help_key_style()),
            Span::styled(" delete   ", styles::help_desc_style()),
            Span::styled("[n/Esc]", styles::help_key_style()),
            Span::styled(" cancel", styles::help_desc_style()),
        ]),
    ];

    let block = Block::default()
        .title(" Confirm ")
        .borders(Borders::ALL)
        .border_style(styles::error_style());

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_help_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(48, 16, frame.area());
    frame.render_widget(Clear, area);

    let entries = [
        ("j/k, ↑/↓", "move selection"),
        ("n", "new note"),
        ("e, Enter", "edit selected note"),
        ("d", "delete selected note"),
        ("r", "refresh from server"),
        ("/", "filter notes"),
        ("L", "log out"),
        ("?", "toggle this help"),
        ("q", "quit"),
    ];

    let mut lines = vec![Line::from("")];
    for (key, desc) in entries {
        lines.push(Line::from(vec![
            Span::raw("   "),
            Span::styled(format!("{:<10}", key), styles::help_key_style()),
            Span::styled(desc, styles::help_desc_style()),
        ]));
    }

    let block = Block::default()
        .title(" Help ")
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_quit_overlay(frame: &mut Frame) {
    let area = centered_rect_fixed(36, 5, frame.area());
    frame.render_widget(Clear, area);

    let lines = vec![
        Line::from(""),
        Line::from(vec![
            Span::raw("  Quit? "),
            Span::styled("[y]", styles::help_key_style()),
            Span::raw(" yes  "),
            Span::styled("[n/Esc]", styles::help_key_style()),
            Span::raw(" no"),
        ]),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(styles::border_style(true));

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let hint = match app.route {
        Route::Root | Route::Login | Route::Register => {
            "Tab: next field | Enter: submit | Esc: quit"
        }
        Route::Notes => "n: new | e: edit | d: delete | /: filter | ?: help | q: quit",
    };

    let message = app.status_message.as_deref().unwrap_or(hint);
    let style = if app.status_message.is_some() {
        Style::default().patch(styles::status_bar_style()).fg(styles::ACCENT)
    } else {
        styles::status_bar_style()
    };

    let line = Line::from(Span::styled(format!(" {}", message), style));
    frame.render_widget(
        Paragraph::new(line).style(styles::status_bar_style()),
        area,
    );
}

// ============================================================================
// Layout helpers
// ============================================================================

fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let w = width.min(area.width);
    let h = height.min(area.height);
    Rect {
        x: area.x + (area.width - w) / 2,
        y: area.y + (area.height - h) / 2,
        width: w,
        height: h,
    }
}

fn centered_rect_percent(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let w = area.width * percent_x / 100;
    let h = area.height * percent_y / 100;
    centered_rect_fixed(w, h, area)
}
