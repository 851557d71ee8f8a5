//! Contact field checks shared by the registration wizard and the call-back form
//!
//! The baseline policy only checks that a field is present. `Strict` adds
//! format checks for email addresses and phone numbers.

use regex::Regex;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s.]+$").unwrap());

// Digits with optional leading +, spaces, dots, dashes and parentheses
static PHONE_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 ().-]{4,}[0-9]$").unwrap());

/// How strictly contact details are checked before a step may advance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContactPolicy {
    #[default]
    Presence,
    Strict,
}

impl ContactPolicy {
    pub fn from_strict(strict: bool) -> Self {
        if strict {
            ContactPolicy::Strict
        } else {
            ContactPolicy::Presence
        }
    }

    pub fn accepts_name(&self, value: &str) -> bool {
        self.accepts_text(value)
    }

    /// Required free text such as a name or a call-back topic
    pub fn accepts_text(&self, value: &str) -> bool {
        match self {
            ContactPolicy::Presence => is_filled(value),
            ContactPolicy::Strict => !value.trim().is_empty(),
        }
    }

    pub fn accepts_email(&self, value: &str) -> bool {
        match self {
            ContactPolicy::Presence => is_filled(value),
            ContactPolicy::Strict => is_valid_email(value),
        }
    }

    pub fn accepts_phone(&self, value: &str) -> bool {
        match self {
            ContactPolicy::Presence => is_filled(value),
            ContactPolicy::Strict => is_valid_phone(value),
        }
    }
}

/// Any input counts, whitespace included. Trimming is left to `Strict`.
pub fn is_filled(value: &str) -> bool {
    !value.is_empty()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_PATTERN.is_match(value.trim())
}

pub fn is_valid_phone(value: &str) -> bool {
    let value = value.trim();
    let digits = value.chars().filter(|c| c.is_ascii_digit()).count();
    PHONE_PATTERN.is_match(value) && (6..=15).contains(&digits)
}
