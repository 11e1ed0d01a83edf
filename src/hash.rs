//! BLAKE3 digests of bundle archives

use std::fs::File;
use std::io::{self, BufReader};
use std::path::Path;

use blake3::Hasher;

use crate::error::{self, Result};

/// Hash prefix for BLAKE3 digests
pub const HASH_PREFIX: &str = "blake3:";

/// Digest of a bundle archive's bytes, as `blake3:<hex>`
pub fn bundle_digest(path: &Path) -> Result<String> {
    let file = File::open(path)
        .map_err(|e| error::fs::read_failed(path.display().to_string(), e.to_string()))?;

    let mut reader = BufReader::new(file);
    let mut hasher = Hasher::new();
    io::copy(&mut reader, &mut hasher)
        .map_err(|e| error::fs::read_failed(path.display().to_string(), e.to_string()))?;

    Ok(format!("{HASH_PREFIX}{}", hasher.finalize().to_hex()))
}
