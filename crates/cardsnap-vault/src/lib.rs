//! CardSnap Vault - Session security core
//!
//! This crate owns the vault security state machine:
//! - PIN authentication with real and duress ("fake vault") sessions
//! - Idle and background auto-lock
//! - Failed-attempt tracking and self-destruct
//! - Encrypted blob persistence with strict duress isolation
//! - The append-only audit trail around all of it
//!
//! ALL access to vault contents MUST go through [`VaultController`].
//!
//! # Security Model
//!
//! - Blobs are encrypted at rest with ChaCha20-Poly1305
//! - The cipher key is derived from a per-install device secret via Argon2id
//! - A duress session is served a fixed decoy fixture and can never read or
//!   write the real blobs
//! - Repeated failures wipe the entire byte store, device secret included

pub mod billing;
pub mod clock;
pub mod controller;
pub mod error;
pub mod extract;
pub mod keystore;
pub mod persist;
pub mod session;
pub mod store;
pub mod timer;

pub use billing::{PurchaseError, PurchaseProvider};
pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{PinOutcome, VaultController, VaultStatus};
pub use error::{Result, VaultError};
pub use extract::{CardExtractor, ExtractionError};
pub use keystore::DeviceKeystore;
pub use persist::{BlobStore, FileBlobStore, MemoryBlobStore, ITEMS_BLOB, SETTINGS_BLOB};
pub use session::{Session, SessionMode, SessionState, UnlockOutcome};
pub use store::VaultStore;
pub use timer::LockTimer;
