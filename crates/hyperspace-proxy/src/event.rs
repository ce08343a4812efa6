//! Load progress events

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize)]
pub struct LoadEvent {
    /// Identifies the load operation the event belongs to
    pub load_id: Uuid,
    pub at: DateTime<Utc>,
    pub kind: LoadEventKind,
}

impl LoadEvent {
    pub fn new(load_id: Uuid, kind: LoadEventKind) -> Self {
        Self {
            load_id,
            at: Utc::now(),
            kind,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum LoadEventKind {
    Started {
        target: String,
        descriptors: usize,
    },
    /// Internal page served without touching the chain
    LocalPage {
        target: String,
    },
    AttemptStarted {
        attempt: usize,
        descriptor: String,
        request_url: String,
    },
    AttemptSucceeded {
        attempt: usize,
        descriptor: String,
    },
    AttemptFailed {
        attempt: usize,
        descriptor: String,
        reason: String,
    },
    Exhausted {
        target: String,
        attempts: usize,
    },
    Cancelled {
        target: String,
    },
}

impl LoadEventKind {
    /// Terminal log line for this event
    pub fn message(&self) -> String {
        match self {
            LoadEventKind::Started {
                target,
                descriptors,
            } => format!(
                "[PROXY] Initializing proxy chain ({} services) for {}",
                descriptors, target
            ),
            LoadEventKind::LocalPage { target } => format!("[LOCAL] Serving {}", target),
            LoadEventKind::AttemptStarted {
                attempt,
                descriptor,
                ..
            } => format!("[PROXY] Attempt {}: Testing {}...", attempt, descriptor),
            LoadEventKind::AttemptSucceeded {
                attempt,
                descriptor,
            } => format!("[SUCCESS] {} delivered content (attempt {})", descriptor, attempt),
            LoadEventKind::AttemptFailed {
                descriptor, reason, ..
            } => format!("[FAILED] {}: {}", descriptor, reason),
            LoadEventKind::Exhausted { target, attempts } => format!(
                "[PROXY] All proxy methods exhausted after {} attempts, showing alternatives for {}",
                attempts, target
            ),
            LoadEventKind::Cancelled { target } => {
                format!("[ABORT] Superseded load of {}", target)
            }
        }
    }
}
