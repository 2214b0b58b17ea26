// src/crawl/hasher.rs
// =============================================================================
// Content digests for duplicate image detection.
//
// Two images are "the same" when their bytes hash to the same digest. SHA-256
// is far stronger than needed, but it is fixed-size, deterministic and has no
// practical accidental collisions.
// =============================================================================

use sha2::{Digest as _, Sha256};
use std::fmt;

/// A fixed-size content digest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Digest([u8; 32]);

// Lower-case hex, like `sha256sum` prints it
impl fmt::Display for Digest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in &self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

// Computes digests of raw bytes. Identical input must give identical output.
pub trait ContentHasher: Send + Sync {
    fn digest(&self, bytes: &[u8]) -> Digest;
}

/// The default hasher: SHA-256.
#[derive(Debug, Clone, Copy, Default)]
pub struct Sha256Hasher;

impl ContentHasher for Sha256Hasher {
    fn digest(&self, bytes: &[u8]) -> Digest {
        Digest(Sha256::digest(bytes).into())
    }
}
