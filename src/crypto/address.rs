//! Signum account id and Reed-Solomon address encoding.

use std::fmt;

/// The 32-character address alphabet. Excludes `0`, `O`, `1` and `I` to
/// avoid visually ambiguous addresses.
pub const ALPHABET: &[u8; 32] = b"23456789ABCDEFGHJKLMNPQRSTUVWXYZ";

/// Display length of an encoded address, prefix and dashes included
/// (`S-XXXX-XXXX-XXXX-XXXXX`).
pub const ADDRESS_LEN: usize = 22;

// GF(32) exponent/log tables and codeword layout of the NXT/Burst
// Reed-Solomon codec.
const GEXP: [u8; 32] = [
    1, 2, 4, 8, 16, 5, 10, 20, 13, 26, 17, 7, 14, 28, 29, 31, 27, 19, 3, 6, 12, 24, 21, 15, 30,
    25, 23, 11, 22, 9, 18, 1,
];
const GLOG: [u8; 32] = [
    0, 0, 1, 18, 2, 5, 19, 11, 3, 29, 6, 27, 20, 8, 12, 23, 4, 10, 30, 17, 7, 22, 28, 26, 21, 25,
    9, 16, 13, 14, 24, 15,
];
const CWMAP: [usize; 17] = [3, 2, 1, 0, 7, 6, 5, 4, 13, 14, 15, 16, 12, 8, 9, 10, 11];

const BASE32_LEN: usize = 13;

/// A Signum account id (64-bit numeric identifier derived from a public key).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct AccountId(u64);

impl AccountId {
    /// Creates an account id from its numeric value.
    #[inline]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the numeric value.
    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    /// Encodes the id as a display address: `S-` followed by 17 alphabet
    /// symbols in four dash-separated groups (4-4-4-5).
    ///
    /// The id is split into 13 base-32 digits (little-endian); four parity
    /// symbols are appended so that single-character typos are detectable
    /// by wallets. Encode-only: this tool never parses addresses back.
    pub fn to_address(&self) -> String {
        let mut codeword = [0u8; 17];
        let mut v = self.0;
        for digit in codeword.iter_mut().take(BASE32_LEN) {
            *digit = (v & 31) as u8;
            v >>= 5;
        }

        let mut p = [0u8; 4];
        for i in (0..BASE32_LEN).rev() {
            let fb = codeword[i] ^ p[3];
            p[3] = p[2] ^ gmult(30, fb);
            p[2] = p[1] ^ gmult(6, fb);
            p[1] = p[0] ^ gmult(9, fb);
            p[0] = gmult(17, fb);
        }
        codeword[BASE32_LEN..].copy_from_slice(&p);

        let mut out = String::with_capacity(ADDRESS_LEN);
        out.push_str("S-");
        for (i, &pos) in CWMAP.iter().enumerate() {
            out.push(ALPHABET[codeword[pos] as usize] as char);
            if matches!(i, 3 | 7 | 11) {
                out.push('-');
            }
        }
        out
    }
}

#[inline]
fn gmult(a: u8, b: u8) -> u8 {
    if a == 0 || b == 0 {
        return 0;
    }
    let idx = (GLOG[a as usize] as usize + GLOG[b as usize] as usize) % 31;
    GEXP[idx]
}

impl fmt::Debug for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "AccountId({})", self.0)
    }
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_address())
    }
}
