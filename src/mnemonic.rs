//! Random passphrase generation.
//!
//! Workers receive their phrase source at construction, so the search loop
//! only ever sees the [`PhraseSource`] trait. The production implementation
//! draws fresh BIP-39 mnemonics; tests substitute deterministic or failing
//! sources.

use std::fmt;
use std::str::FromStr;

use bip39::{Language, Mnemonic};

/// Error produced by a phrase source.
#[derive(Debug, thiserror::Error)]
pub enum PhraseError {
    #[error("mnemonic generation failed: {0}")]
    Mnemonic(#[from] bip39::Error),
}

/// A source of random candidate passphrases.
///
/// Each call returns a fresh phrase; no state is shared across calls.
pub trait PhraseSource: Send {
    fn generate(&self) -> Result<String, PhraseError>;
}

/// Mnemonic length in words, mapped to BIP-39 entropy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WordCount {
    #[default]
    Words12,
    Words15,
    Words18,
    Words21,
    Words24,
}

impl WordCount {
    /// Number of words in the phrase.
    pub fn words(self) -> usize {
        match self {
            WordCount::Words12 => 12,
            WordCount::Words15 => 15,
            WordCount::Words18 => 18,
            WordCount::Words21 => 21,
            WordCount::Words24 => 24,
        }
    }

    /// Entropy encoded by the phrase, in bits.
    pub fn entropy_bits(self) -> usize {
        // 11 bits per word minus the checksum word share
        self.words() / 3 * 32
    }
}

impl FromStr for WordCount {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "12" => Ok(WordCount::Words12),
            "15" => Ok(WordCount::Words15),
            "18" => Ok(WordCount::Words18),
            "21" => Ok(WordCount::Words21),
            "24" => Ok(WordCount::Words24),
            _ => Err(format!("mnemonic length must be 12, 15, 18, 21 or 24, got: {s}")),
        }
    }
}

impl fmt::Display for WordCount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.words())
    }
}

/// BIP-39 dictionary language, keyed by the short codes the CLI accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Dictionary {
    #[default]
    En,
    Fr,
    It,
    Ja,
    Ko,
    Es,
    Cs,
    Pt,
}

impl Dictionary {
    /// Returns the corresponding BIP-39 wordlist.
    pub fn language(self) -> Language {
        match self {
            Dictionary::En => Language::English,
            Dictionary::Fr => Language::French,
            Dictionary::It => Language::Italian,
            Dictionary::Ja => Language::Japanese,
            Dictionary::Ko => Language::Korean,
            Dictionary::Es => Language::Spanish,
            Dictionary::Cs => Language::Czech,
            Dictionary::Pt => Language::Portuguese,
        }
    }
}

impl FromStr for Dictionary {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "en" => Ok(Dictionary::En),
            "fr" => Ok(Dictionary::Fr),
            "it" => Ok(Dictionary::It),
            "ja" => Ok(Dictionary::Ja),
            "ko" => Ok(Dictionary::Ko),
            "es" => Ok(Dictionary::Es),
            "cs" => Ok(Dictionary::Cs),
            "pt" => Ok(Dictionary::Pt),
            _ => Err(format!("unknown dictionary language: {s}")),
        }
    }
}

impl fmt::Display for Dictionary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let code = match self {
            Dictionary::En => "en",
            Dictionary::Fr => "fr",
            Dictionary::It => "it",
            Dictionary::Ja => "ja",
            Dictionary::Ko => "ko",
            Dictionary::Es => "es",
            Dictionary::Cs => "cs",
            Dictionary::Pt => "pt",
        };
        write!(f, "{code}")
    }
}

/// Phrase source backed by random BIP-39 mnemonic generation.
#[derive(Debug, Clone, Copy)]
pub struct MnemonicSource {
    language: Language,
    word_count: WordCount,
}

impl MnemonicSource {
    /// Creates a source producing `word_count`-word phrases from the given
    /// dictionary.
    pub fn new(dictionary: Dictionary, word_count: WordCount) -> Self {
        Self {
            language: dictionary.language(),
            word_count,
        }
    }
}

impl PhraseSource for MnemonicSource {
    fn generate(&self) -> Result<String, PhraseError> {
        let mnemonic = Mnemonic::generate_in_with(
            &mut rand::thread_rng(),
            self.language,
            self.word_count.words(),
        )?;
        Ok(mnemonic.to_string())
    }
}
