//! Deterministic passphrase-to-address derivation.

use std::borrow::Cow;

use curve25519_dalek::MontgomeryPoint;
use sha2::{Digest, Sha256};

use super::AccountId;

/// Derives the Curve25519 public key for a passphrase.
///
/// Process:
/// 1. Normalize the passphrase to raw bytes (hex-decode if it already is a
///    hex string, otherwise take its UTF-8 bytes)
/// 2. Hash the bytes with SHA-256 to obtain the 32-byte seed
/// 3. Clamp the seed and multiply the Curve25519 base point (X25519 keygen)
///
/// Pure: the same passphrase always yields the same key, so workers can
/// call this concurrently without any shared state.
#[inline]
pub fn derive_public_key(passphrase: &str) -> [u8; 32] {
    let seed: [u8; 32] = Sha256::digest(normalize(passphrase).as_ref()).into();
    MontgomeryPoint::mul_base_clamped(seed).to_bytes()
}

/// Derives the numeric account id for a passphrase.
///
/// The public key is hashed again with SHA-256 and the first 8 bytes of the
/// digest are read as a little-endian u64, matching the network's
/// full-hash-to-id convention. Getting the byte order wrong here produces
/// valid-looking but unusable addresses.
#[inline]
pub fn derive_account_id(passphrase: &str) -> AccountId {
    let hash = Sha256::digest(derive_public_key(passphrase));
    let mut raw = [0u8; 8];
    raw.copy_from_slice(&hash[..8]);
    AccountId::new(u64::from_le_bytes(raw))
}

/// Derives the display address for a passphrase.
#[inline]
pub fn derive_address(passphrase: &str) -> String {
    derive_account_id(passphrase).to_address()
}

/// A passphrase that already is an even-length hex string is interpreted as
/// the bytes it encodes; anything else contributes its UTF-8 bytes. BIP-39
/// phrases contain spaces and always take the UTF-8 path.
fn normalize(passphrase: &str) -> Cow<'_, [u8]> {
    if !passphrase.is_empty()
        && passphrase.len() % 2 == 0
        && passphrase.bytes().all(|b| b.is_ascii_hexdigit())
    {
        if let Ok(bytes) = hex::decode(passphrase) {
            return Cow::Owned(bytes);
        }
    }
    Cow::Borrowed(passphrase.as_bytes())
}
