use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Draft,
    Published,
}

impl ProductStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductStatus::Draft => "draft",
            ProductStatus::Published => "published",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            ProductStatus::Draft => ProductStatus::Published,
            ProductStatus::Published => ProductStatus::Draft,
        }
    }
}

impl FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(ProductStatus::Draft),
            "published" => Ok(ProductStatus::Published),
            other => Err(format!("unknown product status: {}", other)),
        }
    }
}

impl fmt::Display for ProductStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    pub fn next(&self) -> Self {
        match self {
            Role::User => Role::Admin,
            Role::Admin => Role::User,
        }
    }
}

impl FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Role::User),
            "admin" => Ok(Role::Admin),
            other => Err(format!("unknown role: {}", other)),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A binary file picked for upload.
#[derive(Debug, Clone, PartialEq)]
pub struct FileAttachment {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl FileAttachment {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        let file_name = file_name.into();
        let content_type = guess_content_type(&file_name).to_string();
        Self { file_name, content_type, bytes }
    }

    /// Reads a file from disk, guessing its MIME type from the extension.
    pub fn from_path(path: &Path) -> std::io::Result<Self> {
        let bytes = std::fs::read(path)?;
        let file_name = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "upload".to_string());
        Ok(Self::new(file_name, bytes))
    }
}

fn guess_content_type(file_name: &str) -> &'static str {
    let extension = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match extension.as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}

/// Editable text fields of the product form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProductField {
    Name,
    Price,
    ShortDescription,
    FullDescription,
    StockQuantity,
    Category,
    Status,
}

/// Raw product form input, as typed by the user.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub price: String,
    pub image: Option<FileAttachment>,
    pub short_description: String,
    pub full_description: String,
    pub stock_quantity: String,
    pub category: String,
    pub status: ProductStatus,
}

impl ProductDraft {
    pub fn field(&self, field: ProductField) -> String {
        match field {
            ProductField::Name => self.name.clone(),
            ProductField::Price => self.price.clone(),
            ProductField::ShortDescription => self.short_description.clone(),
            ProductField::FullDescription => self.full_description.clone(),
            ProductField::StockQuantity => self.stock_quantity.clone(),
            ProductField::Category => self.category.clone(),
            ProductField::Status => self.status.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccountField {
    Username,
    Email,
    Password,
    ConfirmPassword,
    Role,
}

/// Raw account form input. Only [`RegistrationPayload`] goes over the wire.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AccountDraft {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub role: Role,
    pub accepted_privacy_policy: bool,
}

impl AccountDraft {
    pub fn field(&self, field: AccountField) -> String {
        match field {
            AccountField::Username => self.username.clone(),
            AccountField::Email => self.email.clone(),
            AccountField::Password => self.password.clone(),
            AccountField::ConfirmPassword => self.confirm_password.clone(),
            AccountField::Role => self.role.to_string(),
        }
    }

    pub fn passwords_match(&self) -> bool {
        self.password == self.confirm_password
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RegistrationPayload {
    pub username: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

impl From<&AccountDraft> for RegistrationPayload {
    fn from(draft: &AccountDraft) -> Self {
        Self {
            username: draft.username.clone(),
            email: draft.email.clone(),
            password: draft.password.clone(),
            role: draft.role,
        }
    }
}

/// Body of a successful API response.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MessageResponse {
    #[serde(default)]
    pub message: Option<String>,
}

/// Outcome of the last submission of a form.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionResult {
    Success(String),
    Failure(String),
}

impl SubmissionResult {
    pub fn message(&self) -> &str {
        match self {
            SubmissionResult::Success(message) | SubmissionResult::Failure(message) => message,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, SubmissionResult::Success(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_and_role_parsing() {
        assert_eq!("published".parse::<ProductStatus>(), Ok(ProductStatus::Published));
        assert!("archived".parse::<ProductStatus>().is_err());
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("root".parse::<Role>().is_err());
        assert_eq!(ProductStatus::default(), ProductStatus::Draft);
        assert_eq!(Role::default(), Role::User);
    }

    #[test]
    fn test_select_cycling() {
        assert_eq!(ProductStatus::Draft.next(), ProductStatus::Published);
        assert_eq!(ProductStatus::Published.next(), ProductStatus::Draft);
        assert_eq!(Role::User.next().next(), Role::User);
    }

    #[test]
    fn test_attachment_content_type() {
        assert_eq!(FileAttachment::new("photo.JPG", vec![]).content_type, "image/jpeg");
        assert_eq!(FileAttachment::new("logo.png", vec![]).content_type, "image/png");
        assert_eq!(FileAttachment::new("notes", vec![]).content_type, "application/octet-stream");
    }

    #[test]
    fn test_attachment_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("widget.webp");
        std::fs::write(&path, b"RIFF").unwrap();

        let file = FileAttachment::from_path(&path).unwrap();
        assert_eq!(file.file_name, "widget.webp");
        assert_eq!(file.content_type, "image/webp");
        assert_eq!(file.bytes, b"RIFF");
    }

    #[test]
    fn test_registration_payload_omits_local_fields() {
        let draft = AccountDraft {
            username: "ada".to_string(),
            email: "ada@example.com".to_string(),
            password: "secret".to_string(),
            confirm_password: "secret".to_string(),
            role: Role::Admin,
            accepted_privacy_policy: true,
        };
        let json = serde_json::to_value(RegistrationPayload::from(&draft)).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "username": "ada",
                "email": "ada@example.com",
                "password": "secret",
                "role": "admin"
            })
        );
    }

    #[test]
    fn test_message_response_tolerates_missing_message() {
        let parsed: MessageResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.message.is_none());
    }
}
