use crate::application::{App, AppMode};
use crossterm::event::{KeyCode, KeyModifiers};

pub struct InputHandler;

impl InputHandler {
    pub fn handle_key_event(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        match app.mode {
            AppMode::Normal => Self::handle_normal_mode(app, key, modifiers),
            AppMode::Editing => Self::handle_editing_mode(app, key),
            AppMode::Help => Self::handle_help_mode(app, key),
        }
    }

    fn handle_normal_mode(app: &mut App, key: KeyCode, modifiers: KeyModifiers) {
        if modifiers.contains(KeyModifiers::CONTROL) {
            match key {
                KeyCode::Char('s') => {
                    app.submit_current();
                    return;
                }
                KeyCode::Char('x') => {
                    app.sign_out();
                    return;
                }
                _ => {}
            }
        }

        match key {
            KeyCode::Up | KeyCode::Char('k') | KeyCode::BackTab => {
                app.focus_previous();
            }
            KeyCode::Down | KeyCode::Char('j') | KeyCode::Tab => {
                app.focus_next();
            }
            KeyCode::Enter => {
                app.status_message = None;
                app.activate();
            }
            KeyCode::F(2) => {
                app.next_screen();
            }
            KeyCode::F(1) | KeyCode::Char('?') => {
                app.mode = AppMode::Help;
                app.help_scroll = 0;
            }
            KeyCode::Esc => {
                app.status_message = None;
            }
            KeyCode::Char('q') => {
                // Will be handled by main loop
            }
            _ => {}
        }
    }

    fn handle_editing_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Enter => {
                app.finish_editing();
            }
            KeyCode::Esc => {
                app.cancel_editing();
            }
            KeyCode::Backspace => {
                app.delete_before_cursor();
            }
            KeyCode::Delete => {
                app.delete_at_cursor();
            }
            KeyCode::Left => {
                if app.cursor_position > 0 {
                    app.cursor_position -= 1;
                }
            }
            KeyCode::Right => {
                if app.cursor_position < app.input.chars().count() {
                    app.cursor_position += 1;
                }
            }
            KeyCode::Home => {
                app.cursor_position = 0;
            }
            KeyCode::End => {
                app.cursor_position = app.input.chars().count();
            }
            KeyCode::Char(c) => {
                app.insert_char(c);
            }
            _ => {}
        }
    }

    fn handle_help_mode(app: &mut App, key: KeyCode) {
        match key {
            KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?') | KeyCode::Char('q') => {
                app.mode = AppMode::Normal;
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if app.help_scroll > 0 {
                    app.help_scroll -= 1;
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                app.help_scroll += 1;
            }
            KeyCode::Home => {
                app.help_scroll = 0;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::{Control, Screen};
    use crate::domain::ProductField;
    use crate::infrastructure::http::testing::RecordingTransport;
    use crate::infrastructure::{ApiClient, MemoryTokenStore, SessionContext};
    use serde_json::json;
    use std::rc::Rc;

    fn signed_in_app() -> (App, RecordingTransport) {
        let session = Rc::new(SessionContext::new(MemoryTokenStore::with_token("abc"), "/login"));
        let transport = RecordingTransport::new();
        let client = ApiClient::with_transport("http://localhost:5000/api", transport.clone(), session);
        (App::new(client), transport)
    }

    fn press(app: &mut App, key: KeyCode) {
        InputHandler::handle_key_event(app, key, KeyModifiers::NONE);
    }

    #[test]
    fn test_typing_into_a_field() {
        let (mut app, _) = signed_in_app();
        press(&mut app, KeyCode::Down);
        assert_eq!(app.focused(), Control::Product(ProductField::Name));

        press(&mut app, KeyCode::Enter);
        assert_eq!(app.mode, AppMode::Editing);

        for c in "Widgex".chars() {
            press(&mut app, KeyCode::Char(c));
        }
        press(&mut app, KeyCode::Backspace);
        press(&mut app, KeyCode::Char('t'));
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.mode, AppMode::Normal);
        assert_eq!(app.product_form.draft.name, "Widget");
    }

    #[test]
    fn test_escape_cancels_edit() {
        let (mut app, _) = signed_in_app();
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Enter);
        press(&mut app, KeyCode::Char('x'));
        press(&mut app, KeyCode::Esc);

        assert_eq!(app.mode, AppMode::Normal);
        assert!(app.product_form.draft.name.is_empty());
    }

    #[test]
    fn test_ctrl_s_submits_current_form() {
        let (mut app, transport) = signed_in_app();
        transport.respond_json(201, json!({ "message": "Created" }));

        InputHandler::handle_key_event(&mut app, KeyCode::Char('s'), KeyModifiers::CONTROL);

        assert_eq!(transport.request_count(), 1);
        assert_eq!(app.status_message.as_deref(), Some("Created"));
    }

    #[test]
    fn test_f2_switches_screen() {
        let (mut app, _) = signed_in_app();
        press(&mut app, KeyCode::F(2));
        assert_eq!(app.screen, Screen::Accounts);
    }

    #[test]
    fn test_help_mode() {
        let (mut app, _) = signed_in_app();
        press(&mut app, KeyCode::F(1));
        assert_eq!(app.mode, AppMode::Help);

        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Down);
        press(&mut app, KeyCode::Up);
        assert_eq!(app.help_scroll, 1);

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.mode, AppMode::Normal);
    }

    #[test]
    fn test_ctrl_x_signs_out() {
        let (mut app, _) = signed_in_app();
        InputHandler::handle_key_event(&mut app, KeyCode::Char('x'), KeyModifiers::CONTROL);

        assert_eq!(app.screen, Screen::Login);
        assert!(app.session.token().is_none());
    }
}
