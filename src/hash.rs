//! BLAKE3 digests recorded in the lockfile

use std::path::Path;

use blake3::Hasher;

use crate::error::{Result, RevlockError};

/// Hash prefix for BLAKE3 hashes
pub const HASH_PREFIX: &str = "blake3:";

/// Digest of an in-memory buffer
pub fn hash_bytes(bytes: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(bytes);
    format!("{}{}", HASH_PREFIX, hasher.finalize().to_hex())
}

/// Digest of a file's contents
pub fn hash_file(path: &Path) -> Result<String> {
    let bytes = std::fs::read(path).map_err(|e| RevlockError::IoError {
        message: format!("Failed to read {}: {}", path.display(), e),
    })?;
    Ok(hash_bytes(&bytes))
}
