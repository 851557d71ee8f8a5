//! Course registration: the two-step wizard and its draft

pub mod draft;
pub mod wizard;

pub use draft::{Contact, DraftField, RegistrationDraft};
pub use wizard::{WizardEvent, WizardSettings, WizardState, WizardStep};
