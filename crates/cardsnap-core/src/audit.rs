//! Append-only security event log
//!
//! Every security-relevant transition records an entry here. Entries are
//! never mutated or deleted; the only clearing path is a full data wipe,
//! which appends its own `DataWipe` record after the clear.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of a security event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuditEvent {
    #[serde(rename = "LOGIN_SUCCESS")]
    LoginSuccess,
    #[serde(rename = "LOGIN_FAILED")]
    LoginFailed,
    #[serde(rename = "DATA_WIPE")]
    DataWipe,
    #[serde(rename = "SETTINGS_CHANGE")]
    SettingsChange,
    #[serde(rename = "FAKE_VAULT_ACCESS")]
    DuressAccess,
}

impl std::fmt::Display for AuditEvent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AuditEvent::LoginSuccess => "LOGIN_SUCCESS",
            AuditEvent::LoginFailed => "LOGIN_FAILED",
            AuditEvent::DataWipe => "DATA_WIPE",
            AuditEvent::SettingsChange => "SETTINGS_CHANGE",
            AuditEvent::DuressAccess => "FAKE_VAULT_ACCESS",
        };
        f.write_str(s)
    }
}

/// A single audit log entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditRecord {
    /// Unique record identifier
    pub id: Uuid,
    /// Unix epoch milliseconds at which the transition committed
    pub timestamp: u64,
    /// Event kind
    pub event: AuditEvent,
    /// Human-readable detail
    pub details: String,
}

/// Ordered collection of audit records
///
/// Insertion order equals the order in which transitions committed, so the
/// sequence is chronological by construction.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuditLog {
    entries: Vec<AuditRecord>,
}

impl AuditLog {
    /// Create an empty log
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record
    pub fn record(&mut self, event: AuditEvent, details: impl Into<String>, now_ms: u64) {
        self.entries.push(AuditRecord {
            id: Uuid::new_v4(),
            timestamp: now_ms,
            event,
            details: details.into(),
        });
    }

    /// The full ordered sequence
    pub fn entries(&self) -> &[AuditRecord] {
        &self.entries
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the log is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Most recent record
    pub fn last(&self) -> Option<&AuditRecord> {
        self.entries.last()
    }

    /// Number of records of the given kind
    pub fn count_of(&self, event: AuditEvent) -> usize {
        self.entries.iter().filter(|r| r.event == event).count()
    }

    /// Erase all records. Only the wipe path may call this; the wipe then
    /// appends the single surviving `DataWipe` record.
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}
