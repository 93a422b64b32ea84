//! SHA-256 content hashing for backing-store files.

use std::path::Path;

use sha2::{Digest, Sha256};
use tokio::{fs::File, io::AsyncReadExt};
use tracing::debug;

use crate::error::{PageError, PageOutcome};

const READ_CHUNK: usize = 8192;

/// Streams `path` through SHA-256 and returns the lowercase hex digest.
pub async fn sha256_file(path: &Path) -> PageOutcome<String> {
    if tokio::fs::metadata(path).await?.is_dir() {
        return Err(PageError::NotAFile(path.to_path_buf()));
    }

    let mut file = File::open(path).await?;
    let mut hasher = Sha256::new();
    let mut buffer = vec![0u8; READ_CHUNK];
    let mut total: u64 = 0;

    loop {
        let n = file.read(&mut buffer).await?;
        if n == 0 {
            break;
        }
        hasher.update(&buffer[..n]);
        total += n as u64;
    }

    debug!(
        marker = "DIGEST_COMPLETE",
        operation_type = "sha256_file",
        bytes = total,
        "Hashed {}",
        path.display()
    );

    Ok(format!("{:x}", hasher.finalize()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn known_content_digest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("abc.txt");
        tokio::fs::write(&path, b"abc").await.unwrap();

        let digest = sha256_file(&path).await.unwrap();

        assert_eq!(
            digest,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn empty_file_digest() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("empty");
        tokio::fs::write(&path, b"").await.unwrap();

        let digest = sha256_file(&path).await.unwrap();

        assert_eq!(
            digest,
            "e3b0c44298fc1c149afbf4c8996fb92427ae41e4649b934ca495991b7852b855"
        );
    }

    #[tokio::test]
    async fn directory_is_rejected() {
        let temp_dir = TempDir::new().unwrap();

        let err = sha256_file(temp_dir.path()).await.unwrap_err();

        assert!(matches!(err, PageError::NotAFile(_)));
    }
}
