//! Digest computation for a single file.
//!
//! The marker digest is SHA-256 truncated to its first 64 bits and rendered
//! in base 36. Truncation trades collision resistance for a short marker:
//! it detects accidental modification, it is not a cryptographic guarantee.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::Path;

use crate::checksum::Checksum;
use crate::error::ChecksumError;

const BUF_SIZE: usize = 64 * 1024;

/// Number of leading SHA-256 bytes kept: a quarter of the 32-byte output.
const QUARTER: usize = 8;

/// Computes the checksum of one file's contents.
pub trait Digester: Send + Sync {
    fn compute_digest(&self, path: &Path) -> Result<Checksum, ChecksumError>;
}

/// SHA-256, first quarter, base 36, zero-padded to 13 chars.
#[derive(Debug, Clone, Copy, Default)]
pub struct QuarterSha256Base36;

impl Digester for QuarterSha256Base36 {
    fn compute_digest(&self, path: &Path) -> Result<Checksum, ChecksumError> {
        let mut f = File::open(path).map_err(|e| ChecksumError::io(path, e))?;
        let mut hasher = Sha256::new();
        let mut buf = vec![0u8; BUF_SIZE];
        loop {
            let n = f.read(&mut buf).map_err(|e| ChecksumError::io(path, e))?;
            if n == 0 {
                break;
            }
            hasher.update(&buf[..n]);
        }
        let digest = hasher.finalize();
        let checksum = quarter_to_checksum(&digest[..QUARTER]).ok_or_else(|| {
            ChecksumError::Encoding {
                path: path.to_path_buf(),
                rendered: format!("{:02x?}", &digest[..QUARTER]),
            }
        })?;
        tracing::debug!(path = %path.display(), %checksum, "digest computed");
        Ok(checksum)
    }
}

fn quarter_to_checksum(quarter: &[u8]) -> Option<Checksum> {
    let bytes: [u8; QUARTER] = quarter.try_into().ok()?;
    Checksum::from_u64(u64::from_be_bytes(bytes))
}

/// Digest of an in-memory buffer, same algorithm as [`QuarterSha256Base36`].
pub fn digest_bytes(data: &[u8]) -> Option<Checksum> {
    let digest = Sha256::digest(data);
    quarter_to_checksum(&digest[..QUARTER])
}
