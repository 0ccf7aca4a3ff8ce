//! Mask grammar validation and compilation.

use crate::crypto::{ADDRESS_LEN, ALPHABET};

/// Mask positions that hold a structural separator (`S-XXXX-XXXX-XXXX-XXXXX`).
const SEPARATOR_POSITIONS: [usize; 4] = [1, 6, 11, 16];

/// First character of the last group. It carries the top base-32 digit of a
/// 64-bit id and therefore never exceeds `H`.
const RESTRICTED_POSITION: usize = 17;

#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    #[error("mask must be {ADDRESS_LEN} characters long (S-XXXX-XXXX-XXXX-XXXXX), got {0}")]
    WrongLength(usize),
    #[error("mask must start with the address prefix 'S'")]
    BadPrefix,
    #[error("expected a '-' or '+' separator at position {0}")]
    BadSeparator(usize),
    #[error("invalid character '{ch}' at position {pos} (allowed: 2-9, A-Z without I/O, wildcards ? # @)")]
    BadCharacter { ch: char, pos: usize },
    #[error("'{ch}' at position {pos} can never match: the first character of the last group is limited to 2-9 and A-H")]
    UnreachableCharacter { ch: char, pos: usize },
}

/// Matcher for a single address position.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum CharMatcher {
    /// Literal character, including the `S` prefix and group separators
    Exact(u8),
    /// `?` wildcard
    Any,
    /// `#` wildcard: digits 2-9
    Digit,
    /// `@` wildcard: any letter or digit
    Alnum,
}

impl CharMatcher {
    #[inline]
    fn matches(self, b: u8) -> bool {
        match self {
            CharMatcher::Exact(e) => b == e,
            CharMatcher::Any => true,
            CharMatcher::Digit => (b'2'..=b'9').contains(&b),
            CharMatcher::Alnum => b.is_ascii_alphanumeric(),
        }
    }

    /// Fraction of the position's character space this matcher accepts,
    /// used for the difficulty estimate.
    fn selectivity(self, space: f64) -> f64 {
        match self {
            CharMatcher::Exact(_) => 1.0 / space,
            CharMatcher::Digit => 8.0 / space,
            CharMatcher::Any | CharMatcher::Alnum => 1.0,
        }
    }
}

/// A validated, compiled address mask.
///
/// Compiled once at startup and shared read-only by every worker. Matching
/// is anchored at the start of the candidate address and covers the
/// pattern's length; since the grammar forces a full-length mask, an
/// accepted candidate matches the entire address.
#[derive(Debug, Clone)]
pub struct Mask {
    raw: String,
    matchers: Vec<CharMatcher>,
}

impl Mask {
    /// Validates a raw mask against the address grammar and compiles it.
    ///
    /// The mask is uppercased first; separators accept `-` or `+` and both
    /// compile to an exact match on the address's `-`.
    pub fn compile(raw: &str) -> Result<Self, MaskError> {
        let raw = raw.to_ascii_uppercase();
        if raw.len() != ADDRESS_LEN || !raw.is_ascii() {
            return Err(MaskError::WrongLength(raw.chars().count()));
        }

        let mut matchers = Vec::with_capacity(ADDRESS_LEN);
        for (pos, b) in raw.bytes().enumerate() {
            let matcher = if pos == 0 {
                if b != b'S' {
                    return Err(MaskError::BadPrefix);
                }
                CharMatcher::Exact(b'S')
            } else if SEPARATOR_POSITIONS.contains(&pos) {
                if b != b'-' && b != b'+' {
                    return Err(MaskError::BadSeparator(pos));
                }
                CharMatcher::Exact(b'-')
            } else {
                match b {
                    b'?' => CharMatcher::Any,
                    b'#' => CharMatcher::Digit,
                    b'@' => CharMatcher::Alnum,
                    _ if ALPHABET.contains(&b) => {
                        if pos == RESTRICTED_POSITION && !ALPHABET[..16].contains(&b) {
                            return Err(MaskError::UnreachableCharacter { ch: b as char, pos });
                        }
                        CharMatcher::Exact(b)
                    }
                    _ => return Err(MaskError::BadCharacter { ch: b as char, pos }),
                }
            };
            matchers.push(matcher);
        }

        Ok(Self { raw, matchers })
    }

    /// Returns the normalized mask string.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// Tests a candidate address, anchored at the start for the pattern's
    /// length.
    #[inline]
    pub fn matches(&self, address: &str) -> bool {
        let bytes = address.as_bytes();
        if bytes.len() < self.matchers.len() {
            return false;
        }
        self.matchers.iter().zip(bytes).all(|(m, &b)| m.matches(b))
    }

    /// Expected number of attempts before a uniformly random address matches.
    pub fn estimated_difficulty(&self) -> f64 {
        let mut probability = 1.0;
        for (pos, matcher) in self.matchers.iter().enumerate() {
            if pos == 0 || SEPARATOR_POSITIONS.contains(&pos) {
                continue;
            }
            let space = if pos == RESTRICTED_POSITION { 16.0 } else { 32.0 };
            probability *= matcher.selectivity(space);
        }
        1.0 / probability
    }

    /// Human-readable difficulty estimate.
    pub fn difficulty_description(&self) -> String {
        let attempts = self.estimated_difficulty();
        match attempts {
            a if a <= 1_000.0 => "Very Easy (< 1 second)".into(),
            a if a <= 100_000.0 => "Easy (seconds)".into(),
            a if a <= 10_000_000.0 => "Medium (minutes)".into(),
            a if a <= 1_000_000_000.0 => "Hard (hours)".into(),
            _ => "Very Hard (days or more)".into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::derive_address;

    const FULL_WILDCARD: &str = "S-????-????-????-?????";

    #[test]
    fn test_full_wildcard_accepts_any_derived_address() {
        let mask = Mask::compile(FULL_WILDCARD).unwrap();
        for phrase in ["alpha", "bravo charlie", "correct horse battery staple"] {
            assert!(mask.matches(&derive_address(phrase)));
        }
    }

    #[test]
    fn test_literal_match() {
        // "abandon ... about" derives S-GV4B-LDFN-UA33-AW48P
        let mask = Mask::compile("S-GV4B-????-????-?????").unwrap();
        assert!(mask.matches("S-GV4B-LDFN-UA33-AW48P"));
        assert!(!mask.matches("S-WQFQ-W64L-HT3P-C9YNM"));
    }

    #[test]
    fn test_digit_wildcard() {
        let mask = Mask::compile("S-#???-????-????-?????").unwrap();
        assert!(mask.matches("S-2222-2222-2222-22222"));
        assert!(mask.matches("S-9AAA-2222-2222-22222"));
        assert!(!mask.matches("S-A222-2222-2222-22222"));
    }

    #[test]
    fn test_alnum_wildcard() {
        let mask = Mask::compile("S-@@@@-????-????-?????").unwrap();
        assert!(mask.matches("S-2B9Z-2222-2222-22222"));
        assert!(!mask.matches("S----2-2222-2222-22222"));
    }

    #[test]
    fn test_plus_separator() {
        let mask = Mask::compile("S+????+????+????+?????").unwrap();
        assert!(mask.matches("S-2222-2222-2222-22222"));
    }

    #[test]
    fn test_lowercase_mask_is_normalized() {
        let mask = Mask::compile("s-gv4b-????-????-?????").unwrap();
        assert_eq!(mask.as_str(), "S-GV4B-????-????-?????");
        assert!(mask.matches("S-GV4B-LDFN-UA33-AW48P"));
    }

    #[test]
    fn test_short_candidate_rejected() {
        let mask = Mask::compile(FULL_WILDCARD).unwrap();
        assert!(!mask.matches("S-2222"));
    }

    #[test]
    fn test_reject_wrong_length() {
        assert!(matches!(
            Mask::compile("S-????"),
            Err(MaskError::WrongLength(6))
        ));
    }

    #[test]
    fn test_reject_bad_prefix() {
        assert!(matches!(
            Mask::compile("X-????-????-????-?????"),
            Err(MaskError::BadPrefix)
        ));
    }

    #[test]
    fn test_reject_ambiguous_characters() {
        // 1, 0, O and I are not part of the address alphabet
        for mask in [
            "S-1???-????-????-?????",
            "S-0???-????-????-?????",
            "S-O???-????-????-?????",
            "S-I???-????-????-?????",
        ] {
            assert!(matches!(
                Mask::compile(mask),
                Err(MaskError::BadCharacter { .. })
            ));
        }
    }

    #[test]
    fn test_reject_missing_separator() {
        assert!(matches!(
            Mask::compile("S?????-????-????-?????"),
            Err(MaskError::BadSeparator(1))
        ));
    }

    #[test]
    fn test_reject_misplaced_separator() {
        // a dash inside a group is not a valid group character
        assert!(matches!(
            Mask::compile("S-???-?????-????-?????"),
            Err(MaskError::BadCharacter { ch: '-', pos: 5 })
        ));
    }

    #[test]
    fn test_restricted_position() {
        assert!(Mask::compile("S-????-????-????-H????").is_ok());
        assert!(matches!(
            Mask::compile("S-????-????-????-Z????"),
            Err(MaskError::UnreachableCharacter { pos: 17, .. })
        ));
        // wildcards stay legal there
        assert!(Mask::compile("S-????-????-????-#????").is_ok());
    }

    #[test]
    fn test_difficulty() {
        assert_eq!(Mask::compile(FULL_WILDCARD).unwrap().estimated_difficulty(), 1.0);
        let mask = Mask::compile("S-AB??-????-????-?????").unwrap();
        assert_eq!(mask.estimated_difficulty(), 1024.0);
        let mask = Mask::compile("S-####-????-????-?????").unwrap();
        assert_eq!(mask.estimated_difficulty(), 256.0);
    }
}
