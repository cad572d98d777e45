//! Purchase collaborator
//!
//! The billing flow is external: the vault awaits a single
//! success-or-failure result. Premium is only granted after a successful
//! purchase; a failure or cancellation changes nothing.

use async_trait::async_trait;
use thiserror::Error;

/// Why a purchase produced no entitlement
#[derive(Debug, Error)]
pub enum PurchaseError {
    /// The payment was declined by the provider
    #[error("Payment declined")]
    Declined,

    /// The user abandoned the flow
    #[error("Purchase cancelled")]
    Cancelled,

    /// Provider-side failure
    #[error("Billing provider error: {0}")]
    Provider(String),
}

/// Trait for billing backends
#[async_trait]
pub trait PurchaseProvider: Send + Sync {
    /// Run the purchase flow to completion
    async fn purchase(&self) -> Result<(), PurchaseError>;
}

/// Provider with a fixed outcome, for demos and tests
pub struct StaticProvider {
    approve: bool,
}

impl StaticProvider {
    /// Always approve
    pub fn approving() -> Self {
        Self { approve: true }
    }

    /// Always decline
    pub fn declining() -> Self {
        Self { approve: false }
    }
}

#[async_trait]
impl PurchaseProvider for StaticProvider {
    async fn purchase(&self) -> Result<(), PurchaseError> {
        if self.approve {
            Ok(())
        } else {
            Err(PurchaseError::Declined)
        }
    }
}
