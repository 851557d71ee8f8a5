//! "Book a free consultation" call-back form

use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

use crate::outbox::{Enquiry, Envelope, Receipt, Submission, SubmissionError};
use crate::timer::ScopedTimer;
use crate::validation::ContactPolicy;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CallbackDraft {
    pub name: String,
    pub phone: String,
    #[serde(default)]
    pub message: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CallbackField {
    Name,
    Phone,
    Message,
}

impl CallbackField {
    pub fn all() -> &'static [CallbackField] {
        &[CallbackField::Name, CallbackField::Phone, CallbackField::Message]
    }

    pub fn label(&self) -> &'static str {
        match self {
            CallbackField::Name => "Your Name",
            CallbackField::Phone => "Phone Number",
            CallbackField::Message => "What would you like to discuss?",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallbackPhase {
    #[default]
    Editing,
    Submitting,
    Submitted,
}

/// Call-back form state
#[derive(Debug, Clone)]
pub struct CallbackForm {
    visible: bool,
    phase: CallbackPhase,
    draft: CallbackDraft,
    last_error: Option<String>,
    policy: ContactPolicy,
    auto_close: Duration,
    timer: ScopedTimer,
    attempts: u64,
    pending: Option<u64>,
}

impl CallbackForm {
    pub fn new(policy: ContactPolicy, auto_close: Duration) -> Self {
        Self {
            visible: false,
            phase: CallbackPhase::Editing,
            draft: CallbackDraft::default(),
            last_error: None,
            policy,
            auto_close,
            timer: ScopedTimer::new(),
            attempts: 0,
            pending: None,
        }
    }

    pub fn is_open(&self) -> bool {
        self.visible
    }

    pub fn phase(&self) -> CallbackPhase {
        self.phase
    }

    pub fn draft(&self) -> &CallbackDraft {
        &self.draft
    }

    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    pub fn field(&self, field: CallbackField) -> &str {
        match field {
            CallbackField::Name => &self.draft.name,
            CallbackField::Phone => &self.draft.phone,
            CallbackField::Message => &self.draft.message,
        }
    }

    /// Always opens empty
    pub fn open(&mut self) {
        self.timer.cancel();
        self.visible = true;
        self.phase = CallbackPhase::Editing;
        self.draft = CallbackDraft::default();
        self.last_error = None;
        self.pending = None;
        tracing::debug!("call-back form opened");
    }

    pub fn close(&mut self) {
        self.timer.cancel();
        self.visible = false;
        self.pending = None;
        tracing::debug!("call-back form closed");
    }

    pub fn set_field(&mut self, field: CallbackField, value: impl Into<String>) {
        if !self.visible || self.phase != CallbackPhase::Editing {
            return;
        }
        let value = value.into();
        match field {
            CallbackField::Name => self.draft.name = value,
            CallbackField::Phone => self.draft.phone = value,
            CallbackField::Message => self.draft.message = value,
        }
    }

    /// Required fields that are still empty, in display order
    pub fn missing_fields(&self) -> Vec<CallbackField> {
        CallbackField::all()
            .iter()
            .copied()
            .filter(|field| match field {
                CallbackField::Name => !self.policy.accepts_name(&self.draft.name),
                CallbackField::Phone => !self.policy.accepts_phone(&self.draft.phone),
                CallbackField::Message => !self.policy.accepts_text(&self.draft.message),
            })
            .collect()
    }

    /// Name, phone and topic are all required
    pub fn is_valid(&self) -> bool {
        self.missing_fields().is_empty()
    }

    pub fn submit(&mut self) -> Option<Submission> {
        if !self.visible || self.phase != CallbackPhase::Editing {
            return None;
        }
        if !self.is_valid() {
            tracing::debug!(missing = ?self.missing_fields(), "call-back submit blocked");
            return None;
        }
        self.attempts += 1;
        self.pending = Some(self.attempts);
        self.phase = CallbackPhase::Submitting;
        self.last_error = None;

        let envelope = Envelope::new(
            Enquiry::Callback {
                draft: self.draft.clone(),
            },
            Utc::now(),
        );
        Some(Submission {
            attempt: self.attempts,
            envelope,
        })
    }

    /// Apply a delivery outcome. Returns false for outcomes of a stale attempt.
    pub fn resolve(
        &mut self,
        attempt: u64,
        outcome: Result<Receipt, SubmissionError>,
        now: Instant,
    ) -> bool {
        if self.pending != Some(attempt) {
            tracing::debug!(attempt, "ignoring stale call-back outcome");
            return false;
        }
        self.pending = None;
        match outcome {
            Ok(receipt) => {
                tracing::info!(key = %receipt.idempotency_key, "call-back request accepted");
                self.phase = CallbackPhase::Submitted;
                self.timer.arm(now, self.auto_close);
            }
            Err(e) => {
                self.phase = CallbackPhase::Editing;
                self.last_error = Some(e.to_string());
            }
        }
        true
    }

    /// Auto-close after a successful request. Returns true when the form closed.
    pub fn tick(&mut self, now: Instant) -> bool {
        if !self.timer.fire_if_due(now) || self.phase != CallbackPhase::Submitted {
            return false;
        }
        self.visible = false;
        self.phase = CallbackPhase::Editing;
        self.draft = CallbackDraft::default();
        tracing::debug!("call-back form auto-closed");
        true
    }
}
