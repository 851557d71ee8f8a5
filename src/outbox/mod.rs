//! Enquiry delivery
//!
//! Forms hand an `Envelope` to a `Dispatcher`, which runs the configured
//! sink on the tokio blocking pool. The UI loop polls the returned
//! `PendingDelivery` without blocking, the same way background update checks
//! report back through a channel.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use thiserror::Error;
use tokio::sync::oneshot::{self, error::TryRecvError};

use crate::callback::CallbackDraft;
use crate::catalog::CourseId;
use crate::registration::RegistrationDraft;

/// What a visitor asked for
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Enquiry {
    Registration {
        course: CourseId,
        title: String,
        draft: RegistrationDraft,
    },
    Callback {
        draft: CallbackDraft,
    },
}

impl Enquiry {
    pub fn kind(&self) -> &'static str {
        match self {
            Enquiry::Registration { .. } => "registration",
            Enquiry::Callback { .. } => "callback",
        }
    }

    /// Course slug, or "callback" for call-back requests
    pub fn subject(&self) -> &str {
        match self {
            Enquiry::Registration { course, .. } => course.as_str(),
            Enquiry::Callback { .. } => "callback",
        }
    }

    /// The contact detail a reply goes to
    pub fn reply_to(&self) -> &str {
        match self {
            Enquiry::Registration { draft, .. } => &draft.contact.email,
            Enquiry::Callback { draft } => &draft.phone,
        }
    }
}

/// An enquiry stamped for delivery
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope {
    pub idempotency_key: String,
    pub submitted_at: DateTime<Utc>,
    #[serde(flatten)]
    pub enquiry: Enquiry,
}

impl Envelope {
    pub fn new(enquiry: Enquiry, submitted_at: DateTime<Utc>) -> Self {
        let idempotency_key = format!(
            "{}:{}:{}:{}",
            enquiry.kind(),
            enquiry.subject(),
            enquiry.reply_to().trim().to_lowercase(),
            submitted_at.timestamp_millis()
        );
        Self {
            idempotency_key,
            submitted_at,
            enquiry,
        }
    }
}

/// A dispatched envelope tagged with the form attempt that produced it
#[derive(Debug, Clone)]
pub struct Submission {
    pub attempt: u64,
    pub envelope: Envelope,
}

/// Acknowledgement from a sink
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Receipt {
    pub idempotency_key: String,
    /// The sink had already accepted this key; nothing new was recorded
    pub duplicate: bool,
}

/// Delivery failures. All of them leave the form's data intact so the
/// visitor can retry.
#[derive(Debug, Error)]
pub enum SubmissionError {
    #[error("could not write outbox: {0}")]
    Io(#[from] std::io::Error),
    #[error("could not encode enquiry: {0}")]
    Encode(#[from] serde_json::Error),
    #[error("enquiry rejected: {0}")]
    Rejected(String),
    #[error("delivery worker stopped before answering")]
    Disconnected,
}

pub trait EnquirySink: Send + Sync {
    fn name(&self) -> &'static str;

    fn deliver(&self, envelope: &Envelope) -> Result<Receipt, SubmissionError>;
}

/// Records enquiries in the log only
#[derive(Debug, Default)]
pub struct LogSink;

impl EnquirySink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    fn deliver(&self, envelope: &Envelope) -> Result<Receipt, SubmissionError> {
        let payload = serde_json::to_string(&envelope.enquiry)?;
        tracing::info!(
            key = %envelope.idempotency_key,
            kind = envelope.enquiry.kind(),
            %payload,
            "enquiry received"
        );
        Ok(Receipt {
            idempotency_key: envelope.idempotency_key.clone(),
            duplicate: false,
        })
    }
}

/// Appends envelopes as JSON lines. Keys already present are acknowledged
/// without a second write.
#[derive(Debug)]
pub struct FileOutbox {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileOutbox {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn contains_key(&self, key: &str) -> Result<bool, SubmissionError> {
        if !self.path.exists() {
            return Ok(false);
        }
        let contents = fs::read_to_string(&self.path)?;
        for (lineno, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match serde_json::from_str::<Envelope>(line) {
                Ok(existing) if existing.idempotency_key == key => return Ok(true),
                Ok(_) => {}
                Err(e) => tracing::warn!(
                    path = %self.path.display(),
                    line = lineno + 1,
                    "skipping unreadable outbox line: {}",
                    e
                ),
            }
        }
        Ok(false)
    }
}

impl EnquirySink for FileOutbox {
    fn name(&self) -> &'static str {
        "outbox"
    }

    fn deliver(&self, envelope: &Envelope) -> Result<Receipt, SubmissionError> {
        let _guard = self.lock.lock().unwrap_or_else(|e| e.into_inner());

        let key = envelope.idempotency_key.clone();
        if self.contains_key(&key)? {
            tracing::info!(key = %key, "duplicate enquiry ignored");
            return Ok(Receipt {
                idempotency_key: key,
                duplicate: true,
            });
        }

        let line = serde_json::to_string(envelope)?;
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        writeln!(file, "{}", line)?;

        tracing::info!(key = %key, path = %self.path.display(), "enquiry written to outbox");
        Ok(Receipt {
            idempotency_key: key,
            duplicate: false,
        })
    }
}

/// Runs sink deliveries off the UI thread
#[derive(Clone)]
pub struct Dispatcher {
    sink: Arc<dyn EnquirySink>,
    handle: tokio::runtime::Handle,
}

impl Dispatcher {
    pub fn new(sink: Arc<dyn EnquirySink>, handle: tokio::runtime::Handle) -> Self {
        Self { sink, handle }
    }

    pub fn sink_name(&self) -> &'static str {
        self.sink.name()
    }

    pub fn dispatch(&self, envelope: Envelope) -> PendingDelivery {
        let (tx, rx) = oneshot::channel();
        let sink = Arc::clone(&self.sink);
        tracing::debug!(key = %envelope.idempotency_key, sink = sink.name(), "dispatching enquiry");
        self.handle.spawn_blocking(move || {
            let result = sink.deliver(&envelope);
            if let Err(e) = &result {
                tracing::warn!(key = %envelope.idempotency_key, "delivery failed: {}", e);
            }
            // The form may have been closed meanwhile; nobody is listening then
            let _ = tx.send(result);
        });
        PendingDelivery { rx }
    }
}

/// Handle to an in-flight delivery
#[derive(Debug)]
pub struct PendingDelivery {
    rx: oneshot::Receiver<Result<Receipt, SubmissionError>>,
}

impl PendingDelivery {
    /// Non-blocking check, called once per UI tick
    pub fn poll(&mut self) -> Option<Result<Receipt, SubmissionError>> {
        match self.rx.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Closed) => Some(Err(SubmissionError::Disconnected)),
        }
    }

    pub async fn wait(self) -> Result<Receipt, SubmissionError> {
        self.rx.await.unwrap_or(Err(SubmissionError::Disconnected))
    }
}
