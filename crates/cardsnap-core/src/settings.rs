//! Security configuration and user settings
//!
//! `SecuritySettings` owns the credential pair and the lock behavior
//! flags; `UserSettings` is the full persisted settings blob, including
//! the audit log.

use serde::{Deserialize, Serialize};

use crate::audit::AuditLog;
use crate::error::{CoreError, Result};
use crate::DEFAULT_AUTO_LOCK_TIMEOUT_MS;

/// Required PIN length
pub const PIN_LENGTH: usize = 4;

/// Security configuration, persisted encrypted inside the settings blob
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecuritySettings {
    /// PIN unlocking the real vault
    pub real_pin: String,
    /// Duress PIN unlocking the decoy vault
    pub duress_pin: String,
    /// Whether biometric unlock is offered
    pub biometric_enabled: bool,
    /// Whether idle auto-lock is active
    pub auto_lock_enabled: bool,
    /// Idle time before auto-lock, in milliseconds
    pub auto_lock_timeout_ms: u64,
    /// Wipe everything after repeated failed attempts
    pub self_destruct_enabled: bool,
    /// Disguise the lock screen as a calculator
    pub stealth_mode: bool,
    /// Blur the screen when the app is backgrounded
    pub screen_protection: bool,
}

impl Default for SecuritySettings {
    fn default() -> Self {
        Self {
            real_pin: "1234".to_string(),
            duress_pin: "0000".to_string(),
            biometric_enabled: false,
            auto_lock_enabled: true,
            auto_lock_timeout_ms: DEFAULT_AUTO_LOCK_TIMEOUT_MS,
            self_destruct_enabled: true,
            stealth_mode: false,
            screen_protection: true,
        }
    }
}

impl SecuritySettings {
    /// Validate the credential pair
    ///
    /// Equal real and duress PINs would make the duress vault unreachable,
    /// since the real PIN is always matched first.
    pub fn validate(&self) -> Result<()> {
        validate_pin(&self.real_pin)?;
        validate_pin(&self.duress_pin)?;
        if self.real_pin == self.duress_pin {
            return Err(CoreError::InvalidSettings(
                "real and duress PINs must differ".to_string(),
            ));
        }
        Ok(())
    }
}

fn validate_pin(pin: &str) -> Result<()> {
    if pin.len() != PIN_LENGTH || !pin.chars().all(|c| c.is_ascii_digit()) {
        return Err(CoreError::InvalidSettings(format!(
            "PIN must be exactly {} digits",
            PIN_LENGTH
        )));
    }
    Ok(())
}

/// The full settings blob: premium state, scan accounting, security
/// configuration, and the audit log
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UserSettings {
    /// Whether the premium tier has been purchased
    pub is_premium: bool,
    /// Number of scans performed (free-tier accounting)
    pub scan_count: u32,
    /// Security configuration
    pub security: SecuritySettings,
    /// Append-only security event log
    pub logs: AuditLog,
}
