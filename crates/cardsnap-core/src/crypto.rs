//! Authenticated encryption boundary for persisted blobs
//!
//! All persisted vault data goes through [`VaultCipher`]: ChaCha20-Poly1305
//! with a key derived via Argon2id from the device secret. The stored form
//! is a 12-byte random nonce followed by the ciphertext and its 16-byte
//! authentication tag.
//!
//! Decryption never fails loudly across this boundary: `open` returns
//! `None` for anything malformed, truncated, or tampered, and callers fall
//! back to defaults.

use argon2::Argon2;
use chacha20poly1305::{
    aead::{Aead, KeyInit},
    ChaCha20Poly1305, Nonce,
};
use rand::RngCore;
use serde::{de::DeserializeOwned, Serialize};
use zeroize::Zeroize;

use crate::error::{CoreError, Result};

/// Size of the nonce for ChaCha20-Poly1305
const NONCE_SIZE: usize = 12;

/// Blob cipher holding the derived encryption key
///
/// The key is zeroized when the cipher is dropped.
pub struct VaultCipher {
    key: [u8; 32],
}

impl VaultCipher {
    /// Create a cipher from a raw 32-byte key
    pub fn new(key: [u8; 32]) -> Self {
        Self { key }
    }

    /// Derive a cipher key from a secret and salt using Argon2id
    pub fn derive(secret: &[u8], salt: &[u8; 32]) -> Result<Self> {
        let mut key = [0u8; 32];
        Argon2::default()
            .hash_password_into(secret, salt, &mut key)
            .map_err(|e| CoreError::Crypto(format!("Key derivation failed: {}", e)))?;
        Ok(Self { key })
    }

    /// Encrypt raw bytes, producing `nonce || ciphertext || tag`
    pub fn seal_bytes(&self, plaintext: &[u8]) -> Result<Vec<u8>> {
        let mut nonce_bytes = [0u8; NONCE_SIZE];
        rand::rngs::OsRng.fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from_slice(&nonce_bytes);

        let cipher = ChaCha20Poly1305::new_from_slice(&self.key)
            .map_err(|e| CoreError::Crypto(format!("Invalid key: {}", e)))?;
        let ciphertext = cipher
            .encrypt(nonce, plaintext)
            .map_err(|e| CoreError::Crypto(format!("Encryption failed: {}", e)))?;

        let mut blob = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        blob.extend_from_slice(&nonce_bytes);
        blob.extend_from_slice(&ciphertext);
        Ok(blob)
    }

    /// Decrypt a blob produced by [`seal_bytes`](Self::seal_bytes)
    ///
    /// Returns `None` for short, tampered, or wrong-key blobs.
    pub fn open_bytes(&self, blob: &[u8]) -> Option<Vec<u8>> {
        if blob.len() < NONCE_SIZE {
            return None;
        }
        let nonce = Nonce::from_slice(&blob[..NONCE_SIZE]);
        let cipher = ChaCha20Poly1305::new_from_slice(&self.key).ok()?;
        cipher.decrypt(nonce, &blob[NONCE_SIZE..]).ok()
    }

    /// Serialize a value as JSON and encrypt it
    pub fn seal<T: Serialize + ?Sized>(&self, value: &T) -> Result<Vec<u8>> {
        let plaintext = serde_json::to_vec(value)?;
        self.seal_bytes(&plaintext)
    }

    /// Decrypt and deserialize a value
    ///
    /// Returns `None` when decryption or deserialization fails.
    pub fn open<T: DeserializeOwned>(&self, blob: &[u8]) -> Option<T> {
        let plaintext = self.open_bytes(blob)?;
        serde_json::from_slice(&plaintext).ok()
    }
}

impl Drop for VaultCipher {
    fn drop(&mut self) {
        self.key.zeroize();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cipher() -> VaultCipher {
        VaultCipher::new([42u8; 32])
    }

    #[test]
    fn test_round_trip() {
        let cipher = test_cipher();
        let blob = cipher.seal_bytes(b"hello vault").unwrap();
        assert_eq!(cipher.open_bytes(&blob).unwrap(), b"hello vault");
    }

    #[test]
    fn test_wrong_key_returns_none() {
        let blob = test_cipher().seal_bytes(b"secret").unwrap();
        let other = VaultCipher::new([99u8; 32]);
        assert!(other.open_bytes(&blob).is_none());
    }

    #[test]
    fn test_tampered_returns_none() {
        let cipher = test_cipher();
        let mut blob = cipher.seal_bytes(b"secret").unwrap();
        let last = blob.len() - 1;
        blob[last] ^= 0x01;
        assert!(cipher.open_bytes(&blob).is_none());
    }

    #[test]
    fn test_truncated_returns_none() {
        let cipher = test_cipher();
        let blob = cipher.seal_bytes(b"secret").unwrap();
        assert!(cipher.open_bytes(&blob[..4]).is_none());
        assert!(cipher.open_bytes(&[]).is_none());
    }

    #[test]
    fn test_nonce_is_fresh_per_seal() {
        let cipher = test_cipher();
        let a = cipher.seal_bytes(b"same input").unwrap();
        let b = cipher.seal_bytes(b"same input").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_typed_round_trip() {
        let cipher = test_cipher();
        let value = vec!["a".to_string(), "b".to_string()];
        let blob = cipher.seal(&value).unwrap();
        let back: Vec<String> = cipher.open(&blob).unwrap();
        assert_eq!(back, value);
    }

    #[test]
    fn test_derive_is_deterministic() {
        let salt = [7u8; 32];
        let a = VaultCipher::derive(b"device-secret", &salt).unwrap();
        let b = VaultCipher::derive(b"device-secret", &salt).unwrap();
        let blob = a.seal_bytes(b"x").unwrap();
        assert!(b.open_bytes(&blob).is_some());

        let c = VaultCipher::derive(b"other-secret", &salt).unwrap();
        assert!(c.open_bytes(&blob).is_none());
    }
}
