//! Checksum value type: a fixed-length base-36 digest.

use std::fmt;
use std::str::FromStr;

use crate::error::ChecksumError;

/// Number of characters in every digest.
pub const DIGEST_LEN: usize = 13;

/// Marker alphabet, in digit order.
pub const ALPHABET: &[u8; 36] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Immutable digest embedded in a file name. Always lowercase, always `DIGEST_LEN` chars.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Checksum(String);

impl Checksum {
    /// Parse a digest, accepting either case. Anything but exactly
    /// `DIGEST_LEN` alphanumeric ASCII chars is a `Parse` error.
    pub fn parse(s: &str) -> Result<Self, ChecksumError> {
        if !is_digest(s) {
            return Err(ChecksumError::Parse(s.to_string()));
        }
        Ok(Checksum(s.to_ascii_lowercase()))
    }

    /// Render `value` in base 36, left-padded with `0` to `DIGEST_LEN`.
    /// Returns `None` if the value needs more than `DIGEST_LEN` digits.
    pub fn from_u64(value: u64) -> Option<Self> {
        let rendered = base36(value);
        if rendered.len() > DIGEST_LEN {
            return None;
        }
        Some(Checksum(format!("{:0>width$}", rendered, width = DIGEST_LEN)))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Checksum {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for Checksum {
    type Err = ChecksumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Checksum::parse(s)
    }
}

impl AsRef<str> for Checksum {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// True if `s` has the exact shape of a digest (length and alphabet, any case).
pub fn is_digest(s: &str) -> bool {
    s.len() == DIGEST_LEN && s.bytes().all(|b| b.is_ascii_alphanumeric())
}

fn base36(mut n: u64) -> String {
    if n == 0 {
        return "0".to_string();
    }
    let mut out = Vec::with_capacity(DIGEST_LEN);
    while n > 0 {
        out.push(ALPHABET[(n % 36) as usize]);
        n /= 36;
    }
    out.iter().rev().map(|&b| char::from(b)).collect()
}
