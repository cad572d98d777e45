//! Device keystore
//!
//! Holds the random per-install device secret and KDF salt from which the
//! blob cipher key is derived. The record is created on first run and
//! destroyed by a wipe, after which a fresh secret is generated and all
//! pre-wipe ciphertext becomes unrecoverable.
//!
//! The settings blob must be readable while the session is still locked
//! (PIN checks need the stored credentials), which is why the cipher is
//! keyed by a device secret rather than by the PIN itself.

use rand::RngCore;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

use cardsnap_core::types::hex_bytes_32;
use cardsnap_core::{VaultCipher, VERSION};

use crate::error::Result;
use crate::persist::BlobStore;

/// Blob name for the keystore record
pub const DEVICE_KEY_BLOB: &str = "device-key";

/// Persisted keystore record (stored as plaintext JSON)
#[derive(Serialize, Deserialize)]
struct DeviceKeyRecord {
    /// Random device secret
    #[serde(with = "hex_bytes_32")]
    secret: [u8; 32],
    /// Salt for Argon2id key derivation
    #[serde(with = "hex_bytes_32")]
    kdf_salt: [u8; 32],
    /// Version for future migrations
    version: u32,
}

/// Per-install key material for the blob cipher
///
/// Secret and salt are zeroized when the keystore is dropped.
pub struct DeviceKeystore {
    secret: [u8; 32],
    kdf_salt: [u8; 32],
}

impl Zeroize for DeviceKeystore {
    fn zeroize(&mut self) {
        self.secret.zeroize();
        self.kdf_salt.zeroize();
    }
}

impl Drop for DeviceKeystore {
    fn drop(&mut self) {
        self.zeroize();
    }
}

impl DeviceKeystore {
    /// Load the keystore record, creating a fresh one when absent or
    /// unreadable
    pub fn load_or_create(store: &mut dyn BlobStore) -> Result<Self> {
        if let Some(bytes) = store.get(DEVICE_KEY_BLOB)? {
            if let Ok(record) = serde_json::from_slice::<DeviceKeyRecord>(&bytes) {
                return Ok(Self {
                    secret: record.secret,
                    kdf_salt: record.kdf_salt,
                });
            }
            tracing::warn!("device key record unreadable, regenerating");
        }

        let mut secret = [0u8; 32];
        let mut kdf_salt = [0u8; 32];
        rand::rngs::OsRng.fill_bytes(&mut secret);
        rand::rngs::OsRng.fill_bytes(&mut kdf_salt);

        let record = DeviceKeyRecord {
            secret,
            kdf_salt,
            version: VERSION,
        };
        store.set(DEVICE_KEY_BLOB, &serde_json::to_vec(&record)?)?;

        Ok(Self { secret, kdf_salt })
    }

    /// Derive the blob cipher from the device secret
    pub fn cipher(&self) -> Result<VaultCipher> {
        Ok(VaultCipher::derive(&self.secret, &self.kdf_salt)?)
    }
}
