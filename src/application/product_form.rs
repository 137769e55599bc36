//! Product creation form.

use crate::domain::{
    ApiError, FileAttachment, MessageResponse, ProductDraft, ProductField, ProductPayload,
    ProductStatus, SubmissionResult,
};
use crate::infrastructure::{ApiClient, ApiRequest, ApiResponse};

pub const PRODUCTS_PATH: &str = "/products";
pub const GENERIC_FAILURE_MESSAGE: &str = "Something went wrong";

/// Draft input plus the outcome of the last submission.
///
/// The outcome is either a success or an error message, never both.
#[derive(Debug, Clone, Default)]
pub struct ProductForm {
    pub draft: ProductDraft,
    outcome: Option<SubmissionResult>,
}

impl ProductForm {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces a single field of the draft.
    pub fn set_field(&mut self, field: ProductField, value: impl Into<String>) {
        let value = value.into();
        match field {
            ProductField::Name => self.draft.name = value,
            ProductField::Price => self.draft.price = value,
            ProductField::ShortDescription => self.draft.short_description = value,
            ProductField::FullDescription => self.draft.full_description = value,
            ProductField::StockQuantity => self.draft.stock_quantity = value,
            ProductField::Category => self.draft.category = value,
            ProductField::Status => match value.parse::<ProductStatus>() {
                Ok(status) => self.draft.status = status,
                Err(e) => tracing::warn!(error = %e, "keeping previous product status"),
            },
        }
    }

    pub fn set_image(&mut self, image: Option<FileAttachment>) {
        self.draft.image = image;
    }

    pub fn outcome(&self) -> Option<&SubmissionResult> {
        self.outcome.as_ref()
    }

    pub fn error(&self) -> Option<&str> {
        match &self.outcome {
            Some(SubmissionResult::Failure(message)) => Some(message),
            _ => None,
        }
    }

    pub fn success(&self) -> Option<&str> {
        match &self.outcome {
            Some(SubmissionResult::Success(message)) => Some(message),
            _ => None,
        }
    }

    /// Sends the draft as a multipart form and records the outcome.
    pub fn submit(&mut self, client: &ApiClient) -> &SubmissionResult {
        let form = ProductPayload::from_draft(&self.draft).to_form();
        let mut request = ApiRequest::post(PRODUCTS_PATH).multipart(form);
        if let Some(token) = client.session().token() {
            request = request.bearer(&token);
        }

        let result = client.dispatch(request);
        self.outcome.insert(Self::outcome_from(result))
    }

    fn outcome_from(result: Result<ApiResponse, ApiError>) -> SubmissionResult {
        match result {
            Ok(response) => {
                let message = response
                    .json::<MessageResponse>()
                    .ok()
                    .and_then(|body| body.message)
                    .unwrap_or_default();
                tracing::info!(%message, "product created");
                SubmissionResult::Success(message)
            }
            Err(e) => {
                tracing::warn!(error = %e, "product creation failed");
                let message = e.server_message().unwrap_or(GENERIC_FAILURE_MESSAGE);
                SubmissionResult::Failure(message.to_string())
            }
        }
    }
}
