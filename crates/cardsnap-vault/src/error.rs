//! Error types for the vault session core

use thiserror::Error;

use crate::billing::PurchaseError;
use crate::extract::ExtractionError;

/// Result type alias for vault operations
pub type Result<T> = std::result::Result<T, VaultError>;

/// Errors that can occur in vault operations
#[derive(Debug, Error)]
pub enum VaultError {
    /// Core library error
    #[error("Core error: {0}")]
    Core(#[from] cardsnap_core::CoreError),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// The session is locked
    #[error("Vault is locked - authenticate first")]
    NotUnlocked,

    /// The operation is not available to a duress session
    #[error("Operation not permitted in a decoy session")]
    DuressRestricted,

    /// Card not found in the active store
    #[error("Card not found: {0}")]
    CardNotFound(String),

    /// Free-tier scan allowance exhausted
    #[error("Free scan limit reached - premium required")]
    ScanLimitReached,

    /// External extraction collaborator failed; the caller may retry
    #[error("Extraction failed: {0}")]
    Extraction(#[from] ExtractionError),

    /// External purchase collaborator failed; no state was changed
    #[error("Purchase failed: {0}")]
    Purchase(#[from] PurchaseError),
}

impl From<serde_json::Error> for VaultError {
    fn from(e: serde_json::Error) -> Self {
        VaultError::Serialization(e.to_string())
    }
}
