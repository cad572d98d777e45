//! CardSnap Core - Shared types, audit log, and the crypto boundary
//!
//! This crate provides the foundational types for the CardSnap secure
//! card vault: the item model, security settings, the append-only audit
//! log, and the authenticated-encryption boundary used for all persisted
//! blobs.

pub mod audit;
pub mod crypto;
pub mod error;
pub mod fixtures;
pub mod settings;
pub mod types;

pub use audit::{AuditEvent, AuditLog, AuditRecord};
pub use crypto::VaultCipher;
pub use error::{CoreError, Result};
pub use settings::{SecuritySettings, UserSettings};
pub use types::{mask_card_number, parse_expiry, Card, CardCategory, CardFields};

/// Blob format version
pub const VERSION: u32 = 1;

/// Failed PIN submissions before self-destruct fires
pub const MAX_FAILED_ATTEMPTS: u32 = 5;

/// Default idle time before auto-lock, in milliseconds
pub const DEFAULT_AUTO_LOCK_TIMEOUT_MS: u64 = 60_000;

/// Recommended cadence for the auto-lock polling check, in milliseconds
pub const POLL_INTERVAL_MS: u64 = 5_000;

/// Free-tier scan allowance before premium is required
pub const MAX_FREE_SCANS: u32 = 5;

/// Cards expiring within this many days are surfaced on the dashboard
pub const EXPIRY_WARNING_DAYS: i64 = 90;
