//! # Cursor Codec
//!
//! Cursor wire format: `nonceHex_cipherHex`.
//!
//! - `nonceHex`: hex of a random 96-bit AES-GCM nonce
//! - `cipherHex`: hex of the AES-256-GCM sealed JSON array of sort-key values
//!
//! The associated data is the [`CursorBinding`] of the query, so a cursor
//! only opens for the filter and sort that produced it.

use std::fmt;

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use rand::RngCore;
use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::errors::{QueryError, QueryResult};
use crate::filter::FilterExpr;
use crate::sort::SortSpec;

/// Nonce length for AES-GCM
const NONCE_LEN: usize = 12;

/// Key length for AES-256
pub const CURSOR_KEY_LEN: usize = 32;

/// SHA-256 fingerprint of a filter and sort specification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorBinding([u8; 32]);

impl CursorBinding {
    /// Fingerprint the query a cursor belongs to
    pub fn new(filter: &FilterExpr, sort: &SortSpec) -> QueryResult<Self> {
        let encoded = serde_json::to_vec(&(filter, sort))
            .map_err(|e| QueryError::validation(format!("Unserializable query: {}", e)))?;
        Ok(Self(Sha256::digest(&encoded).into()))
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

/// Seals and opens pagination cursors
#[derive(Clone)]
pub struct CursorCodec {
    key: [u8; CURSOR_KEY_LEN],
}

impl fmt::Debug for CursorCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CursorCodec").finish_non_exhaustive()
    }
}

impl CursorCodec {
    /// From existing key material
    pub fn new(key: [u8; CURSOR_KEY_LEN]) -> Self {
        Self { key }
    }

    /// From a 64 character hex key
    pub fn from_hex(key_hex: &str) -> QueryResult<Self> {
        let bytes = hex::decode(key_hex.trim())
            .map_err(|e| QueryError::validation(format!("Cursor key is not hex: {}", e)))?;
        let key: [u8; CURSOR_KEY_LEN] = bytes.try_into().map_err(|_| {
            QueryError::validation(format!(
                "Cursor key must be {} bytes ({} hex characters)",
                CURSOR_KEY_LEN,
                CURSOR_KEY_LEN * 2
            ))
        })?;
        Ok(Self::new(key))
    }

    /// Generate a random key, hex encoded
    pub fn generate_key_hex() -> String {
        let mut key = [0u8; CURSOR_KEY_LEN];
        rand::thread_rng().fill_bytes(&mut key);
        hex::encode(key)
    }

    fn cipher(&self) -> QueryResult<Aes256Gcm> {
        Aes256Gcm::new_from_slice(&self.key)
            .map_err(|e| QueryError::validation(format!("Failed to create cipher: {}", e)))
    }

    /// Seal the sort-key values of the last document on a page
    pub fn encode(&self, values: &[Value], binding: &CursorBinding) -> QueryResult<String> {
        let plaintext = serde_json::to_vec(values)
            .map_err(|e| QueryError::validation(format!("Unserializable sort values: {}", e)))?;

        let mut nonce_bytes = [0u8; NONCE_LEN];
        rand::thread_rng().fill_bytes(&mut nonce_bytes);
        let nonce = Nonce::from(nonce_bytes);

        let ciphertext = self
            .cipher()?
            .encrypt(
                &nonce,
                Payload {
                    msg: &plaintext,
                    aad: binding.as_bytes(),
                },
            )
            .map_err(|e| QueryError::validation(format!("Encryption failed: {}", e)))?;

        Ok(format!(
            "{}_{}",
            hex::encode(nonce_bytes),
            hex::encode(ciphertext)
        ))
    }

    /// Open a cursor, expecting one value per sort key
    pub fn decode(
        &self,
        token: &str,
        binding: &CursorBinding,
        expected_values: usize,
    ) -> QueryResult<Vec<Value>> {
        let (nonce_hex, cipher_hex) = token
            .split_once('_')
            .ok_or_else(|| QueryError::cursor("missing separator"))?;

        let nonce_bytes: [u8; NONCE_LEN] = hex::decode(nonce_hex)
            .map_err(|_| QueryError::cursor("nonce is not hex"))?
            .try_into()
            .map_err(|_| QueryError::cursor("invalid nonce length"))?;
        let ciphertext =
            hex::decode(cipher_hex).map_err(|_| QueryError::cursor("payload is not hex"))?;

        let plaintext = self
            .cipher()?
            .decrypt(
                &Nonce::from(nonce_bytes),
                Payload {
                    msg: &ciphertext,
                    aad: binding.as_bytes(),
                },
            )
            .map_err(|_| {
                tracing::warn!("rejected cursor that does not open for this query");
                QueryError::cursor("cursor was not issued for this query")
            })?;

        let values: Vec<Value> = serde_json::from_slice(&plaintext)
            .map_err(|_| QueryError::cursor("payload is not a value list"))?;
        if values.len() != expected_values {
            return Err(QueryError::cursor(format!(
                "expected {} sort values, found {}",
                expected_values,
                values.len()
            )));
        }
        Ok(values)
    }
}
