use crate::application::{App, AppMode, Control, Screen};
use crate::domain::SubmissionResult;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

pub fn render_ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(3),
        ])
        .split(f.area());

    render_header(f, app, chunks[0]);
    render_form(f, app, chunks[1]);
    render_status_bar(f, app, chunks[2]);

    if matches!(app.mode, AppMode::Help) {
        render_help_popup(f, app.help_scroll);
    }
}

fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let session = if app.session.is_signed_in() { "signed in" } else { "no session" };
    let header = Paragraph::new(format!(
        "backoffice | {} | {} | {}",
        app.screen.title(),
        session,
        app.client.base_url()
    ))
    .style(Style::default().fg(Color::Cyan));
    f.render_widget(header, area);
}

fn render_form(f: &mut Frame, app: &App, area: Rect) {
    let controls = app.screen.controls();
    let focused = app.focused();
    let mut lines = Vec::with_capacity(controls.len() + 2);

    for control in controls {
        let is_focused = *control == focused;
        lines.push(render_control(app, *control, is_focused));
    }

    lines.push(Line::from(""));
    if let Some(outcome) = screen_outcome(app) {
        let style = if outcome.is_success() {
            Style::default().fg(Color::Green)
        } else {
            Style::default().fg(Color::Red)
        };
        lines.push(Line::from(Span::styled(outcome.message().to_string(), style)));
    }

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(app.screen.title()),
    );
    f.render_widget(form, area);
}

fn render_control(app: &App, control: Control, is_focused: bool) -> Line<'static> {
    let label_style = if is_focused {
        Style::default().bg(Color::LightBlue).fg(Color::Black)
    } else {
        Style::default().fg(Color::Yellow)
    };

    if control == Control::Submit {
        let label = match app.screen {
            Screen::Login => "[ Log in ]",
            Screen::Products => "[ Add Product ]",
            Screen::Accounts => "[ Create account ]",
        };
        return Line::from(Span::styled(label, label_style.add_modifier(Modifier::BOLD)));
    }

    let editing = is_focused && matches!(app.mode, AppMode::Editing);
    let raw = if editing { app.input.clone() } else { app.control_value(control) };
    let value = if control.is_secret() {
        "*".repeat(raw.chars().count())
    } else {
        raw
    };
    let value_style = if editing {
        Style::default().fg(Color::Green)
    } else {
        Style::default()
    };

    Line::from(vec![
        Span::styled(format!("{:<30}", control.label()), label_style),
        Span::raw(" "),
        Span::styled(value, value_style),
    ])
}

fn screen_outcome(app: &App) -> Option<&SubmissionResult> {
    match app.screen {
        Screen::Login => None,
        Screen::Products => app.product_form.outcome(),
        Screen::Accounts => app.account_form.outcome(),
    }
}

fn render_status_bar(f: &mut Frame, app: &App, area: Rect) {
    let text = match app.mode {
        AppMode::Normal => match &app.status_message {
            Some(status) => status.clone(),
            None => "↑↓/Tab: move | Enter: edit/select | Ctrl+S: submit | F2: next screen | Ctrl+X: sign out | F1/?: help | q: quit".to_string(),
        },
        AppMode::Editing => format!("Editing {} (Enter to keep, Esc to cancel)", app.focused().label()),
        AppMode::Help => "↑↓/jk: scroll | Home: top | Esc/q: close help".to_string(),
    };

    let status = Paragraph::new(text)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .style(match app.mode {
            AppMode::Normal => Style::default(),
            AppMode::Editing => Style::default().fg(Color::Green),
            AppMode::Help => Style::default().fg(Color::Cyan),
        });
    f.render_widget(status, area);
}

fn render_help_popup(f: &mut Frame, scroll: usize) {
    let area = f.area();
    let popup_area = Rect {
        x: area.width / 10,
        y: area.height / 10,
        width: area.width * 4 / 5,
        height: area.height * 4 / 5,
    };

    f.render_widget(Clear, popup_area);

    let help_lines: Vec<&str> = HELP_TEXT.lines().collect();
    let visible_height = popup_area.height.saturating_sub(2) as usize;

    let start_line = scroll.min(help_lines.len().saturating_sub(visible_height));
    let end_line = (start_line + visible_height).min(help_lines.len());

    let visible_text = help_lines[start_line..end_line].join("\n");

    let help_widget = Paragraph::new(visible_text)
        .block(Block::default()
            .borders(Borders::ALL)
            .title(format!("backoffice Help (Line {}/{})", start_line + 1, help_lines.len()))
            .style(Style::default().fg(Color::Cyan)))
        .style(Style::default().fg(Color::White));

    f.render_widget(help_widget, popup_area);
}

const HELP_TEXT: &str = r#"BACKOFFICE CONSOLE

=== SCREENS ===
Login           Paste a session token issued by the API
Add New Product Create a product (multipart upload, optional image)
Create Account  Register a user or admin account
F2              Switch between the product and account forms

=== FORM CONTROLS ===
↑↓ / j k / Tab  Move between fields
Enter           Edit the focused text field
                Cycle Status (draft/published) and Role (user/admin)
                Toggle the privacy policy checkbox
                Press the submit button
Esc             Cancel an edit / clear the status line

=== PRODUCT IMAGE ===
Enter a file path and press Enter to attach it.
Submitting an empty path removes the attachment.

=== SUBMITTING ===
Ctrl+S          Submit the current form
                Product errors show the server message when there is one
                Account passwords must match before anything is sent

=== SESSION ===
Ctrl+X          Sign out and forget the stored token
                If the API answers 401 the token is dropped and you are
                sent back to the Login screen

q               Quit (outside of editing)"#;
