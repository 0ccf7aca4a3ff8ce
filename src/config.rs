//! Runtime configuration for the vanity address generator.

use clap::Parser;

use crate::matcher::{Mask, MaskError};
use crate::mnemonic::{Dictionary, MnemonicSource, WordCount};

/// Signum Vanity Address Generator
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Address mask to search for. Must follow the address shape
    /// S-XXXX-XXXX-XXXX-XXXXX; 0, O, 1 and I are not allowed. Wildcards:
    /// '?' any character, '#' digits 2-9, '@' any letter or digit.
    #[arg(short, long, default_value = "S-????-????-????-?????")]
    pub mask: String,

    /// Salt appended to every generated mnemonic phrase
    #[arg(short, long, default_value = "")]
    pub salt: String,

    /// Mnemonic length in words: 12, 15, 18, 21 or 24
    #[arg(short = 'l', long = "length", default_value = "12")]
    pub length: WordCount,

    /// BIP-39 dictionary language: en, fr, it, ja, ko, es, cs or pt
    #[arg(short = 'd', long = "dict", default_value = "en")]
    pub dict: Dictionary,

    /// Number of worker threads (default: number of CPU cores)
    #[arg(short = 'w', long)]
    pub workers: Option<usize>,

    /// Progress report interval in seconds
    #[arg(short = 'r', long, default_value = "1")]
    pub report_interval: u64,
}

impl Config {
    /// Returns the number of workers, defaulting to CPU count.
    pub fn worker_count(&self) -> usize {
        self.workers.unwrap_or_else(num_cpus::get)
    }

    /// Validates and compiles the mask. Fails before any worker is spawned.
    pub fn compile_mask(&self) -> Result<Mask, MaskError> {
        Mask::compile(&self.mask)
    }

    /// Builds the phrase source described by the dictionary and length
    /// arguments.
    pub fn phrase_source(&self) -> MnemonicSource {
        MnemonicSource::new(self.dict, self.length)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_test_config(mask: &str) -> Config {
        Config {
            mask: mask.into(),
            salt: String::new(),
            length: WordCount::Words12,
            dict: Dictionary::En,
            workers: None,
            report_interval: 1,
        }
    }

    #[test]
    fn test_default_mask_compiles() {
        let config = make_test_config("S-????-????-????-?????");
        assert!(config.compile_mask().is_ok());
    }

    #[test]
    fn test_invalid_mask_rejected() {
        let config = make_test_config("S-1111-????-????-?????");
        assert!(config.compile_mask().is_err());
    }

    #[test]
    fn test_worker_count_default() {
        let config = make_test_config("S-????-????-????-?????");
        assert!(config.worker_count() >= 1);
        let config = Config {
            workers: Some(3),
            ..config
        };
        assert_eq!(config.worker_count(), 3);
    }

    #[test]
    fn test_cli_parsing() {
        let config =
            Config::parse_from(["signum_vanity", "-m", "s-ab??-????-????-?????", "-l", "24", "-d", "ja"]);
        assert_eq!(config.length, WordCount::Words24);
        assert_eq!(config.dict, Dictionary::Ja);
        assert_eq!(config.compile_mask().unwrap().as_str(), "S-AB??-????-????-?????");
    }
}
