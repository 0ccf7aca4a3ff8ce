//! Cryptographic operations for Signum account derivation.
//!
//! This module provides:
//! - The passphrase → seed → Curve25519 public key → account id pipeline
//! - Reed-Solomon display encoding of account ids

mod address;
mod keys;

pub use address::{AccountId, ADDRESS_LEN, ALPHABET};
pub use keys::{derive_account_id, derive_address, derive_public_key};
