//! Registration wizard state and logic

use chrono::Utc;
use std::time::{Duration, Instant};

use crate::catalog::{Course, CourseId, Question};
use crate::outbox::{Enquiry, Envelope, Receipt, Submission, SubmissionError};
use crate::registration::draft::{DraftField, RegistrationDraft};
use crate::timer::ScopedTimer;
use crate::validation::ContactPolicy;

/// Wizard step enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WizardStep {
    #[default]
    Contact,
    Questions,
    Submitting,
    Submitted,
}

impl WizardStep {
    /// Step shown in "Step n of 2"
    pub fn step_number(&self) -> u8 {
        match self {
            WizardStep::Contact => 1,
            WizardStep::Questions | WizardStep::Submitting | WizardStep::Submitted => 2,
        }
    }

    /// Fixed; does not depend on the course's question count
    pub fn total_steps() -> u8 {
        2
    }

    pub fn title(&self) -> &'static str {
        match self {
            WizardStep::Contact => "Personal Information",
            WizardStep::Questions => "Course-Specific Questions",
            WizardStep::Submitting => "Sending Registration",
            WizardStep::Submitted => "Registration Successful",
        }
    }

    /// Steps in which the visitor may still edit the draft
    pub fn is_editable(&self) -> bool {
        matches!(self, WizardStep::Contact | WizardStep::Questions)
    }
}

/// Notifications for the hosting screen
#[derive(Debug, Clone, PartialEq)]
pub enum WizardEvent {
    /// Fired once per successful submission
    Submitted {
        course: CourseId,
        draft: RegistrationDraft,
        receipt: Receipt,
    },
    /// Delivery failed; the visitor is back on step 2 with the draft intact
    SubmissionFailed { course: CourseId, reason: String },
    /// Auto-close after success
    Closed { course: CourseId },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WizardSettings {
    pub auto_close: Duration,
    pub policy: ContactPolicy,
}

impl Default for WizardSettings {
    fn default() -> Self {
        Self {
            auto_close: Duration::from_millis(3000),
            policy: ContactPolicy::Presence,
        }
    }
}

/// Wizard runtime state
///
/// The wizard is the only writer of its draft; the host reads it through
/// accessors and drives it through the transition methods.
#[derive(Debug, Clone, Default)]
pub struct WizardState {
    visible: bool,
    step: WizardStep,
    course: Option<Course>,
    questions: Vec<Question>,
    draft: RegistrationDraft,
    last_error: Option<String>,
    settings: WizardSettings,
    auto_close: ScopedTimer,
    // Monotonic across open/close so outcomes of an old session never match
    attempts: u64,
    pending: Option<u64>,
}

impl WizardState {
    pub fn new(settings: WizardSettings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    /// Open for a course. Always starts at step 1 with an empty draft; the
    /// schema is fixed until the next open.
    pub fn open(&mut self, course: Course, questions: Vec<Question>) {
        self.auto_close.cancel();
        tracing::info!(course = %course.id, questions = questions.len(), "registration wizard opened");
        self.visible = true;
        self.step = WizardStep::Contact;
        self.course = Some(course);
        self.questions = questions;
        self.draft = RegistrationDraft::default();
        self.last_error = None;
        self.pending = None;
    }

    /// Cancel from any state. Data is dropped on the next `open`.
    pub fn close(&mut self) {
        if !self.visible {
            return;
        }
        self.auto_close.cancel();
        if self.pending.take().is_some() {
            tracing::info!("wizard closed while a submission was in flight");
        }
        self.visible = false;
        tracing::debug!(step = ?self.step, "registration wizard closed");
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    pub fn step(&self) -> WizardStep {
        self.step
    }

    pub fn current_step(&self) -> u8 {
        self.step.step_number()
    }

    pub fn course(&self) -> Option<&Course> {
        self.course.as_ref()
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn draft(&self) -> &RegistrationDraft {
        &self.draft
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn is_submitted(&self) -> bool {
        self.step == WizardStep::Submitted
    }

    /// Fraction of the progress bar to fill
    pub fn progress(&self) -> f64 {
        f64::from(self.current_step()) / f64::from(WizardStep::total_steps())
    }

    pub fn set_field(&mut self, field: DraftField, value: impl Into<String>) {
        if !self.visible || !self.step.is_editable() {
            return;
        }
        self.draft.set(field, value.into());
    }

    /// Select an option for a question of the active schema. Options that
    /// are not part of that question are rejected.
    pub fn select_option(&mut self, key: &str, option: &str) -> bool {
        if !self.visible || !self.step.is_editable() {
            return false;
        }
        let Some(question) = self.questions.iter().find(|q| q.key == key) else {
            tracing::debug!(key, "unknown question key");
            return false;
        };
        if !question.has_option(option) {
            tracing::debug!(key, option, "option not offered for question");
            return false;
        }
        self.draft.answers.insert(key.to_string(), option.to_string());
        true
    }

    /// Contact fields that currently block step 1
    pub fn missing_contact_fields(&self) -> Vec<DraftField> {
        let contact = &self.draft.contact;
        let policy = self.settings.policy;
        let mut missing = Vec::new();
        if !policy.accepts_name(&contact.name) {
            missing.push(DraftField::Name);
        }
        if !policy.accepts_email(&contact.email) {
            missing.push(DraftField::Email);
        }
        if !policy.accepts_phone(&contact.phone) {
            missing.push(DraftField::Phone);
        }
        missing
    }

    /// Questions still lacking a valid answer
    pub fn unanswered(&self) -> Vec<&Question> {
        self.questions
            .iter()
            .filter(|q| {
                !self
                    .draft
                    .answer(&q.key)
                    .is_some_and(|a| !a.is_empty() && q.has_option(a))
            })
            .collect()
    }

    pub fn is_step1_valid(&self) -> bool {
        self.missing_contact_fields().is_empty()
    }

    /// Vacuously true for a course without questions. The message is never
    /// required.
    pub fn is_step2_valid(&self) -> bool {
        self.unanswered().is_empty()
    }

    /// Contact -> Questions, if the contact step is complete
    pub fn next(&mut self) -> bool {
        if !self.visible || self.step != WizardStep::Contact {
            return false;
        }
        if !self.is_step1_valid() {
            tracing::debug!(missing = ?self.missing_contact_fields(), "next blocked");
            return false;
        }
        self.step = WizardStep::Questions;
        true
    }

    /// Questions -> Contact, keeping everything entered
    pub fn back(&mut self) {
        if self.visible && self.step == WizardStep::Questions {
            self.step = WizardStep::Contact;
        }
    }

    /// Start a submission. The returned envelope must be dispatched by the
    /// host and its outcome fed back through `resolve`.
    pub fn submit(&mut self) -> Option<Submission> {
        if !self.visible || self.step != WizardStep::Questions {
            return None;
        }
        if !self.is_step2_valid() {
            tracing::debug!(unanswered = self.unanswered().len(), "submit blocked");
            return None;
        }
        let course = self.course.clone()?;

        self.attempts += 1;
        self.pending = Some(self.attempts);
        self.step = WizardStep::Submitting;
        self.last_error = None;

        let envelope = Envelope::new(
            Enquiry::Registration {
                course: course.id.clone(),
                title: course.title.clone(),
                draft: self.draft.clone(),
            },
            Utc::now(),
        );
        tracing::info!(course = %course.id, key = %envelope.idempotency_key, "registration submitted");
        Some(Submission {
            attempt: self.attempts,
            envelope,
        })
    }

    /// Apply the delivery outcome of `attempt`. Outcomes that arrive after a
    /// close or reopen are dropped.
    pub fn resolve(
        &mut self,
        attempt: u64,
        outcome: Result<Receipt, SubmissionError>,
        now: Instant,
    ) -> Option<WizardEvent> {
        if self.pending != Some(attempt) {
            tracing::debug!(attempt, "ignoring stale submission outcome");
            return None;
        }
        self.pending = None;
        let course = self.course.as_ref()?.id.clone();

        match outcome {
            Ok(receipt) => {
                self.step = WizardStep::Submitted;
                self.auto_close.arm(now, self.settings.auto_close);
                Some(WizardEvent::Submitted {
                    course,
                    draft: self.draft.clone(),
                    receipt,
                })
            }
            Err(e) => {
                let reason = e.to_string();
                tracing::warn!(course = %course, "registration not delivered: {}", reason);
                self.step = WizardStep::Questions;
                self.last_error = Some(reason.clone());
                Some(WizardEvent::SubmissionFailed { course, reason })
            }
        }
    }

    /// Drive the auto-close timer
    pub fn tick(&mut self, now: Instant) -> Option<WizardEvent> {
        if !self.auto_close.fire_if_due(now) || !self.is_submitted() {
            return None;
        }
        let course = self.course.as_ref()?.id.clone();
        self.draft = RegistrationDraft::default();
        self.step = WizardStep::Contact;
        self.visible = false;
        tracing::debug!(course = %course, "registration wizard auto-closed");
        Some(WizardEvent::Closed { course })
    }

    /// Time until auto-close, for the success screen
    pub fn closes_in(&self, now: Instant) -> Option<Duration> {
        self.auto_close.remaining(now)
    }
}
