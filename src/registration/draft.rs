//! In-progress registration data

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contact {
    pub name: String,
    pub email: String,
    pub phone: String,
}

/// Free-text fields of the wizard
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    Name,
    Email,
    Phone,
    Message,
}

impl DraftField {
    /// Fields shown on the contact step, in display order
    pub fn contact_fields() -> &'static [DraftField] {
        &[DraftField::Name, DraftField::Email, DraftField::Phone]
    }

    pub fn label(&self) -> &'static str {
        match self {
            DraftField::Name => "Full Name",
            DraftField::Email => "Email Address",
            DraftField::Phone => "Phone Number",
            DraftField::Message => "Additional questions or comments (optional)",
        }
    }
}

/// Contact details, course answers and an optional message
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrationDraft {
    pub contact: Contact,
    /// Question key -> selected option
    pub answers: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub message: String,
}

impl RegistrationDraft {
    pub fn field(&self, field: DraftField) -> &str {
        match field {
            DraftField::Name => &self.contact.name,
            DraftField::Email => &self.contact.email,
            DraftField::Phone => &self.contact.phone,
            DraftField::Message => &self.message,
        }
    }

    pub(crate) fn set(&mut self, field: DraftField, value: String) {
        match field {
            DraftField::Name => self.contact.name = value,
            DraftField::Email => self.contact.email = value,
            DraftField::Phone => self.contact.phone = value,
            DraftField::Message => self.message = value,
        }
    }

    /// The message, if one was written
    pub fn message(&self) -> Option<&str> {
        let trimmed = self.message.trim();
        (!trimmed.is_empty()).then_some(trimmed)
    }

    pub fn answer(&self, key: &str) -> Option<&str> {
        self.answers.get(key).map(String::as_str)
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}
