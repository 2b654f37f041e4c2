//! Contact form input and validation.

use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

use folio_core::{Error, FieldErrors, Result};

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)]
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("valid email regex")
});

/// A contact or booking enquiry, posted to the backend as JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContactForm {
    /// Submitter's name.
    pub name: String,
    /// Reply address.
    pub email: String,
    /// Phone number, free-form.
    pub phone: String,
    /// Optional subject line.
    #[serde(default)]
    pub subject: String,
    /// Enquiry text.
    pub message: String,
}

impl ContactForm {
    /// Creates a form without a subject.
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            subject: String::new(),
            message: message.into(),
        }
    }

    /// Sets the subject.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = subject.into();
        self
    }

    /// Check every field, collecting all problems.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] with one message per invalid field.
    pub fn validate(&self) -> Result<()> {
        let mut errors = FieldErrors::new();

        if self.name.trim().is_empty() {
            errors.insert("name", "Name is required");
        }
        if self.email.trim().is_empty() {
            errors.insert("email", "Email is required");
        } else if !EMAIL_RE.is_match(&self.email) {
            errors.insert("email", "Please enter a valid email address");
        }
        if self.phone.trim().is_empty() {
            errors.insert("phone", "Phone is required");
        }
        if self.message.trim().is_empty() {
            errors.insert("message", "Message is required");
        }

        errors.into_result()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;

    fn valid() -> ContactForm {
        ContactForm::new("Ama", "ama@example.com", "+94 77 123 4567", "Book me")
    }

    fn field_errors(form: &ContactForm) -> FieldErrors {
        match form.validate() {
            Err(Error::Validation(errors)) => errors,
            other => panic!("expected validation error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_form() {
        assert!(valid().validate().is_ok());
        assert!(valid().with_subject("Wedding").validate().is_ok());
    }

    #[test]
    fn test_missing_fields_reported_per_field() {
        let errors = field_errors(&ContactForm::default());
        assert_eq!(errors.len(), 4);
        assert_eq!(errors.get("name"), Some("Name is required"));
        assert_eq!(errors.get("email"), Some("Email is required"));
        assert_eq!(errors.get("phone"), Some("Phone is required"));
        assert_eq!(errors.get("message"), Some("Message is required"));
        assert!(errors.get("subject").is_none());
    }

    #[test]
    fn test_malformed_email() {
        for email in ["ama", "ama@example", "ama @example.com", "@example.com"] {
            let form = ContactForm {
                email: email.into(),
                ..valid()
            };
            let errors = field_errors(&form);
            assert_eq!(
                errors.get("email"),
                Some("Please enter a valid email address"),
                "{email}"
            );
        }
    }

    #[test]
    fn test_whitespace_only_is_missing() {
        let form = ContactForm {
            name: "   ".into(),
            ..valid()
        };
        assert_eq!(field_errors(&form).get("name"), Some("Name is required"));
    }

    #[test]
    fn test_serializes_all_fields() {
        let json = serde_json::to_value(valid()).unwrap();
        assert_eq!(json["subject"], "");
        assert_eq!(json["message"], "Book me");
    }
}
