//! # signum_vanity
//!
//! Signum vanity address generator: brute-forces random BIP-39 passphrases
//! until the derived account address matches an operator-supplied mask.
//!
//! ## Architecture
//!
//! - `crypto`: passphrase → account id derivation and address encoding
//! - `matcher`: mask grammar validation and compiled matching
//! - `mnemonic`: random phrase sources
//! - `worker`: parallel search, coordination and stats reporting
//! - `config`: runtime configuration

pub mod config;
pub mod crypto;
pub mod matcher;
pub mod mnemonic;
pub mod worker;

pub use config::Config;
pub use crypto::{derive_account_id, derive_address, derive_public_key, AccountId};
pub use matcher::{Mask, MaskError};
pub use mnemonic::{Dictionary, MnemonicSource, PhraseSource, WordCount};
pub use worker::{SearchPool, SearchResult, WorkerError};
