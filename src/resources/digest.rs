//! SHA-256 content digests.
use anyhow::{Context as _, Result};
use sha2::{Digest, Sha256};
use std::io::Read as _;
use std::path::Path;

/// Compute the lowercase hex SHA-256 digest of the file at `path`.
///
/// The file is streamed, so large staged files are not read into memory.
///
/// # Errors
///
/// Returns an error if the file cannot be opened or read.
pub fn file_digest(path: &Path) -> Result<String> {
    let mut file =
        std::fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut hasher = Sha256::new();
    let mut buf = [0u8; 8192];
    loop {
        let n = file
            .read(&mut buf)
            .with_context(|| format!("read {}", path.display()))?;
        if n == 0 {
            break;
        }
        hasher.update(buf.get(..n).unwrap_or_default());
    }
    Ok(format!("{:x}", hasher.finalize()))
}
