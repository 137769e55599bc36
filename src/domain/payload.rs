//! Wire payloads built from form drafts.
//!
//! Numeric fields are typed as free text in the forms and parsed leniently
//! here: the longest numeric prefix wins and anything without one becomes
//! `NaN`. Nothing is rejected before the request goes out.

use super::models::{FileAttachment, ProductDraft, ProductStatus};

/// Body part value of a multipart form.
#[derive(Debug, Clone, PartialEq)]
pub enum PartValue {
    Text(String),
    File(FileAttachment),
}

#[derive(Debug, Clone, PartialEq)]
pub struct FormPart {
    pub name: String,
    pub value: PartValue,
}

/// An ordered multipart body, independent of any HTTP library.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    pub parts: Vec<FormPart>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: &str, value: impl Into<String>) -> Self {
        self.parts.push(FormPart {
            name: name.to_string(),
            value: PartValue::Text(value.into()),
        });
        self
    }

    pub fn file(mut self, name: &str, file: FileAttachment) -> Self {
        self.parts.push(FormPart {
            name: name.to_string(),
            value: PartValue::File(file),
        });
        self
    }

    pub fn get(&self, name: &str) -> Option<&PartValue> {
        self.parts.iter().find(|part| part.name == name).map(|part| &part.value)
    }

    pub fn get_text(&self, name: &str) -> Option<&str> {
        match self.get(name) {
            Some(PartValue::Text(value)) => Some(value),
            _ => None,
        }
    }

    pub fn names(&self) -> Vec<&str> {
        self.parts.iter().map(|part| part.name.as_str()).collect()
    }
}

/// Product creation request, with numeric fields already parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductPayload {
    pub name: String,
    pub price: f64,
    pub short_description: String,
    pub full_description: String,
    pub stock_quantity: f64,
    pub category: String,
    pub status: ProductStatus,
    pub image: Option<FileAttachment>,
}

impl ProductPayload {
    pub fn from_draft(draft: &ProductDraft) -> Self {
        Self {
            name: draft.name.clone(),
            price: parse_leading_float(&draft.price),
            short_description: draft.short_description.clone(),
            full_description: draft.full_description.clone(),
            stock_quantity: parse_leading_int(&draft.stock_quantity),
            category: draft.category.clone(),
            status: draft.status,
            image: draft.image.clone(),
        }
    }

    /// Encodes the payload. The `image` part is only present when a file is held.
    pub fn to_form(&self) -> MultipartForm {
        let form = MultipartForm::new()
            .text("name", self.name.as_str())
            .text("price", format_number(self.price))
            .text("shortDescription", self.short_description.as_str())
            .text("fullDescription", self.full_description.as_str())
            .text("stockQuantity", format_number(self.stock_quantity))
            .text("category", self.category.as_str())
            .text("status", self.status.as_str());

        match &self.image {
            Some(image) => form.file("image", image.clone()),
            None => form,
        }
    }
}

fn format_number(value: f64) -> String {
    if value == 0.0 {
        // Covers -0 as well.
        "0".to_string()
    } else if value.is_infinite() {
        let text = if value > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else {
        value.to_string()
    }
}

/// Parses the longest leading decimal number, e.g. `"19.99 EUR"` -> 19.99.
///
/// Returns `NaN` when the input does not start with a number.
pub fn parse_leading_float(input: &str) -> f64 {
    let s = input.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    if s[end..].starts_with("Infinity") {
        return if s.starts_with('-') { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let int_digits = end - int_start;

    let mut frac_digits = 0;
    if end < bytes.len() && bytes[end] == b'.' {
        let dot = end;
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            frac_digits += 1;
        }
        if int_digits == 0 && frac_digits == 0 {
            end = dot;
        }
    }
    if int_digits + frac_digits == 0 {
        return f64::NAN;
    }

    if end < bytes.len() && (bytes[end] == b'e' || bytes[end] == b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let exp_digits = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits {
            end = exp_end;
        }
    }

    s[..end].parse::<f64>().unwrap_or(f64::NAN)
}

/// Parses a leading integer the way a browser's `parseInt` does: optional
/// sign, `0x` switches to hex, then the longest digit run, e.g. `"5 boxes"` -> 5.
///
/// Runs too long for `u64` keep their magnitude as a float. Returns `NaN`
/// when there are no leading digits.
pub fn parse_leading_int(input: &str) -> f64 {
    let s = input.trim_start();
    let (negative, rest) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };
    let (radix, digits) = match rest.get(..2) {
        Some("0x") | Some("0X") => (16, &rest[2..]),
        _ => (10, rest),
    };

    let len = digits.chars().take_while(|c| c.is_digit(radix)).count();
    if len == 0 {
        return f64::NAN;
    }
    let digits = &digits[..len];

    let magnitude = match u64::from_str_radix(digits, radix) {
        Ok(value) => value as f64,
        Err(_) if radix == 10 => digits.parse::<f64>().unwrap_or(f64::NAN),
        Err(_) => digits
            .chars()
            .filter_map(|c| c.to_digit(16))
            .fold(0.0, |acc, d| acc * 16.0 + f64::from(d)),
    };
    if negative { -magnitude } else { magnitude }
}
