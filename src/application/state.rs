//! Application state for the terminal console.
//!
//! Holds the API client, both forms, and the UI state (screen, focus,
//! input buffer) the presentation layer renders.

use super::account_form::AccountForm;
use super::product_form::ProductForm;
use crate::domain::{AccountField, FileAttachment, ProductField};
use crate::infrastructure::{ApiClient, SessionContext, SessionEvent};
use std::path::Path;
use std::rc::Rc;
use std::sync::mpsc::Receiver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    /// Token entry, shown when there is no session
    Login,
    /// Add new product
    Products,
    /// Create account
    Accounts,
}

impl Screen {
    pub fn title(&self) -> &'static str {
        match self {
            Screen::Login => "Login",
            Screen::Products => "Add New Product",
            Screen::Accounts => "Create Account",
        }
    }

    /// Next form screen. Login is only reached through the session.
    pub fn next(&self) -> Self {
        match self {
            Screen::Login | Screen::Accounts => Screen::Products,
            Screen::Products => Screen::Accounts,
        }
    }

    pub fn controls(&self) -> &'static [Control] {
        match self {
            Screen::Login => &[Control::Token, Control::Submit],
            Screen::Products => &[
                Control::ProductImage,
                Control::Product(ProductField::Name),
                Control::Product(ProductField::Price),
                Control::Product(ProductField::ShortDescription),
                Control::Product(ProductField::FullDescription),
                Control::Product(ProductField::StockQuantity),
                Control::Product(ProductField::Category),
                Control::Product(ProductField::Status),
                Control::Submit,
            ],
            Screen::Accounts => &[
                Control::Account(AccountField::Username),
                Control::Account(AccountField::Email),
                Control::Account(AccountField::Password),
                Control::Account(AccountField::ConfirmPassword),
                Control::Account(AccountField::Role),
                Control::PrivacyPolicy,
                Control::Submit,
            ],
        }
    }
}

/// A focusable element of a screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Control {
    Token,
    ProductImage,
    Product(ProductField),
    Account(AccountField),
    PrivacyPolicy,
    Submit,
}

impl Control {
    pub fn label(&self) -> &'static str {
        match self {
            Control::Token => "Session token",
            Control::ProductImage => "Product Image",
            Control::Product(ProductField::Name) => "Product Name",
            Control::Product(ProductField::Price) => "Product Price",
            Control::Product(ProductField::ShortDescription) => "Short Description",
            Control::Product(ProductField::FullDescription) => "Full Description",
            Control::Product(ProductField::StockQuantity) => "Stock Quantity",
            Control::Product(ProductField::Category) => "Category",
            Control::Product(ProductField::Status) => "Status",
            Control::Account(AccountField::Username) => "Username",
            Control::Account(AccountField::Email) => "Email",
            Control::Account(AccountField::Password) => "Password",
            Control::Account(AccountField::ConfirmPassword) => "Confirm password",
            Control::Account(AccountField::Role) => "Role",
            Control::PrivacyPolicy => "I agree to the privacy policy",
            Control::Submit => "Submit",
        }
    }

    pub fn is_secret(&self) -> bool {
        matches!(
            self,
            Control::Token
                | Control::Account(AccountField::Password)
                | Control::Account(AccountField::ConfirmPassword)
        )
    }

    fn is_text(&self) -> bool {
        !matches!(
            self,
            Control::Product(ProductField::Status)
                | Control::Account(AccountField::Role)
                | Control::PrivacyPolicy
                | Control::Submit
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppMode {
    /// Moving between controls
    Normal,
    /// Typing into the focused text control
    Editing,
    /// Key reference popup
    Help,
}

pub struct App {
    pub client: ApiClient,
    pub session: Rc<SessionContext>,
    session_events: Receiver<SessionEvent>,
    pub screen: Screen,
    pub mode: AppMode,
    /// Index of the focused control on the current screen
    pub focus: usize,
    /// Input buffer while editing
    pub input: String,
    /// Cursor position within the input buffer, in characters
    pub cursor_position: usize,
    pub token_input: String,
    pub product_form: ProductForm,
    pub account_form: AccountForm,
    /// Temporary status message to display
    pub status_message: Option<String>,
    pub help_scroll: usize,
}

impl App {
    pub fn new(client: ApiClient) -> Self {
        let session = Rc::clone(client.session());
        let session_events = session.subscribe();
        let screen = if session.is_signed_in() {
            Screen::Products
        } else {
            Screen::Login
        };

        Self {
            client,
            session,
            session_events,
            screen,
            mode: AppMode::Normal,
            focus: 0,
            input: String::new(),
            cursor_position: 0,
            token_input: String::new(),
            product_form: ProductForm::new(),
            account_form: AccountForm::new(),
            status_message: None,
            help_scroll: 0,
        }
    }

    pub fn focused(&self) -> Control {
        let controls = self.screen.controls();
        controls[self.focus.min(controls.len() - 1)]
    }

    pub fn focus_next(&mut self) {
        self.focus = (self.focus + 1) % self.screen.controls().len();
    }

    pub fn focus_previous(&mut self) {
        let len = self.screen.controls().len();
        self.focus = (self.focus + len - 1) % len;
    }

    pub fn go_to(&mut self, screen: Screen) {
        self.screen = screen;
        self.focus = 0;
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn next_screen(&mut self) {
        self.go_to(self.screen.next());
        self.status_message = None;
    }

    /// Current display value of a control.
    pub fn control_value(&self, control: Control) -> String {
        match control {
            Control::Token => self.token_input.clone(),
            Control::ProductImage => self
                .product_form
                .draft
                .image
                .as_ref()
                .map(|image| image.file_name.clone())
                .unwrap_or_default(),
            Control::Product(field) => self.product_form.draft.field(field),
            Control::Account(field) => self.account_form.draft.field(field),
            Control::PrivacyPolicy => {
                let checkbox = if self.account_form.draft.accepted_privacy_policy { "[x]" } else { "[ ]" };
                checkbox.to_string()
            }
            Control::Submit => String::new(),
        }
    }

    /// Enter on the focused control: edit text, cycle a select, toggle, or submit.
    pub fn activate(&mut self) {
        match self.focused() {
            Control::Product(ProductField::Status) => {
                let next = self.product_form.draft.status.next();
                self.product_form.set_field(ProductField::Status, next.as_str());
            }
            Control::Account(AccountField::Role) => {
                let next = self.account_form.draft.role.next();
                self.account_form.set_field(AccountField::Role, next.as_str());
            }
            Control::PrivacyPolicy => self.account_form.toggle_privacy_policy(),
            Control::Submit => self.submit_current(),
            control if control.is_text() => self.start_editing(),
            _ => {}
        }
    }

    pub fn start_editing(&mut self) {
        let control = self.focused();
        if !control.is_text() {
            return;
        }
        self.mode = AppMode::Editing;
        self.input = match control {
            // The image control takes a path, not the current file name.
            Control::ProductImage => String::new(),
            other => self.control_value(other),
        };
        self.cursor_position = self.input.chars().count();
    }

    pub fn finish_editing(&mut self) {
        let value = std::mem::take(&mut self.input);
        match self.focused() {
            Control::Token => self.token_input = value,
            Control::ProductImage => self.attach_image(value.trim()),
            Control::Product(field) => self.product_form.set_field(field, value),
            Control::Account(field) => self.account_form.set_field(field, value),
            _ => {}
        }
        self.mode = AppMode::Normal;
        self.cursor_position = 0;
    }

    pub fn cancel_editing(&mut self) {
        self.mode = AppMode::Normal;
        self.input.clear();
        self.cursor_position = 0;
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_offset(self.cursor_position);
        self.input.insert(at, c);
        self.cursor_position += 1;
    }

    pub fn delete_before_cursor(&mut self) {
        if self.cursor_position > 0 {
            let at = self.byte_offset(self.cursor_position - 1);
            self.input.remove(at);
            self.cursor_position -= 1;
        }
    }

    pub fn delete_at_cursor(&mut self) {
        if self.cursor_position < self.input.chars().count() {
            let at = self.byte_offset(self.cursor_position);
            self.input.remove(at);
        }
    }

    fn byte_offset(&self, char_index: usize) -> usize {
        self.input
            .char_indices()
            .nth(char_index)
            .map(|(offset, _)| offset)
            .unwrap_or(self.input.len())
    }

    fn attach_image(&mut self, path: &str) {
        if path.is_empty() {
            self.product_form.set_image(None);
            self.status_message = Some("Image removed".to_string());
            return;
        }
        match FileAttachment::from_path(Path::new(path)) {
            Ok(image) => {
                self.status_message = Some(format!("Attached {}", image.file_name));
                self.product_form.set_image(Some(image));
            }
            Err(e) => {
                tracing::warn!(%path, error = %e, "could not read image");
                self.status_message = Some(format!("Could not read {}: {}", path, e));
            }
        }
    }

    /// Submits the form on the current screen.
    pub fn submit_current(&mut self) {
        match self.screen {
            Screen::Login => self.sign_in(),
            Screen::Products => {
                let outcome = self.product_form.submit(&self.client);
                self.status_message = Some(outcome.message().to_string());
            }
            Screen::Accounts => {
                let outcome = self.account_form.submit(&self.client);
                self.status_message = Some(outcome.message().to_string());
            }
        }
        self.process_session_events();
    }

    fn sign_in(&mut self) {
        let token = self.token_input.trim().to_string();
        if token.is_empty() {
            self.status_message = Some("Enter a session token first".to_string());
            return;
        }
        match self.session.sign_in(&token) {
            Ok(()) => self.token_input.clear(),
            Err(e) => self.status_message = Some(format!("Could not store token: {}", e)),
        }
    }

    pub fn sign_out(&mut self) {
        if let Err(e) = self.session.sign_out() {
            self.status_message = Some(format!("Could not clear token: {}", e));
        }
        self.process_session_events();
    }

    /// Applies session events published since the last call.
    pub fn process_session_events(&mut self) {
        let events: Vec<SessionEvent> = self.session_events.try_iter().collect();
        for event in events {
            match event {
                SessionEvent::SignedIn => {
                    self.go_to(Screen::Products);
                    self.status_message = Some("Signed in".to_string());
                }
                SessionEvent::SignedOut => {
                    self.go_to(Screen::Login);
                    self.status_message = Some("Signed out".to_string());
                }
                SessionEvent::Expired { notice, redirect_to } => {
                    tracing::info!(%redirect_to, "returning to login");
                    self.go_to(Screen::Login);
                    self.status_message = Some(notice);
                }
            }
        }
    }
}
