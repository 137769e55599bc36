//! Account creation form.

use crate::domain::{AccountDraft, AccountField, MessageResponse, RegistrationPayload, Role, SubmissionResult};
use crate::infrastructure::ApiClient;

pub const REGISTER_PATH: &str = "/auth/register";
pub const PASSWORD_MISMATCH_NOTICE: &str = "Passwords do not match!";
pub const REGISTRATION_FAILED_NOTICE: &str = "An error occurred. Please try again.";

#[derive(Debug, Clone, Default)]
pub struct AccountForm {
    pub draft: AccountDraft,
    outcome: Option<SubmissionResult>,
}

impl AccountForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_field(&mut self, field: AccountField, value: impl Into<String>) {
        let value = value.into();
        match field {
            AccountField::Username => self.draft.username = value,
            AccountField::Email => self.draft.email = value,
            AccountField::Password => self.draft.password = value,
            AccountField::ConfirmPassword => self.draft.confirm_password = value,
            AccountField::Role => match value.parse::<Role>() {
                Ok(role) => self.draft.role = role,
                Err(e) => tracing::warn!(error = %e, "keeping previous role"),
            },
        }
    }

    pub fn toggle_privacy_policy(&mut self) {
        self.draft.accepted_privacy_policy = !self.draft.accepted_privacy_policy;
    }

    pub fn outcome(&self) -> Option<&SubmissionResult> {
        self.outcome.as_ref()
    }

    /// The message to show the user after the last submission.
    pub fn notice(&self) -> Option<&str> {
        self.outcome.as_ref().map(SubmissionResult::message)
    }

    /// Registers the account. A password mismatch stops before any request.
    pub fn submit(&mut self, client: &ApiClient) -> &SubmissionResult {
        if !self.draft.passwords_match() {
            return self
                .outcome
                .insert(SubmissionResult::Failure(PASSWORD_MISMATCH_NOTICE.to_string()));
        }

        let payload = RegistrationPayload::from(&self.draft);
        let outcome = match client.post_json(REGISTER_PATH, &payload) {
            Ok(response) => {
                let message = response
                    .json::<MessageResponse>()
                    .ok()
                    .and_then(|body| body.message)
                    .unwrap_or_default();
                tracing::info!(username = %payload.username, role = %payload.role, "account registered");
                SubmissionResult::Success(message)
            }
            Err(e) => {
                tracing::error!(error = %e, username = %payload.username, "error registering user");
                SubmissionResult::Failure(REGISTRATION_FAILED_NOTICE.to_string())
            }
        };
        self.outcome.insert(outcome)
    }
}
