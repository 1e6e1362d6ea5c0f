use anyhow::{Context, Result};
use std::fs::File;
use std::io::Read;
use std::path::Path;
use xxhash_rust::xxh3::{Xxh3, xxh3_128};

/// Default read-chunk size for streaming large files (64 MiB).
pub const DEFAULT_CHUNK_SIZE: usize = 64 * 1024 * 1024;

/// Files at or below this size are read whole instead of streamed.
const WHOLE_READ_LIMIT: u64 = 1_048_576; // 1MB

/// Computes the XXH3 128-bit digest of raw bytes as 32 lowercase hex chars.
#[must_use]
pub fn hash_bytes(data: &[u8]) -> String {
    let hash = xxh3_128(data);
    format!("{hash:032x}")
}

/// Computes the content digest of a file.
///
/// Small files are read whole; larger files are streamed through the hasher
/// in `chunk_size` blocks so memory use stays independent of file size.
///
/// # Errors
/// Returns an error if the file cannot be opened or read.
pub fn hash_file(path: &Path, chunk_size: usize) -> Result<String> {
    let file =
        File::open(path).with_context(|| format!("Failed to open file: {}", path.display()))?;
    let metadata = file
        .metadata()
        .with_context(|| format!("Failed to get metadata for: {}", path.display()))?;

    if metadata.len() == 0 {
        return Ok(hash_bytes(b""));
    }

    if metadata.len() <= WHOLE_READ_LIMIT {
        let content = std::fs::read(path)
            .with_context(|| format!("Failed to read file: {}", path.display()))?;
        return Ok(hash_bytes(&content));
    }

    hash_reader_chunked(file, chunk_size)
        .with_context(|| format!("Failed to hash file: {}", path.display()))
}

/// Streams a reader through the hasher in bounded chunks.
fn hash_reader_chunked(mut file: File, chunk_size: usize) -> Result<String> {
    let mut hasher = Xxh3::new();
    let mut buffer = vec![0u8; chunk_size.clamp(4096, DEFAULT_CHUNK_SIZE)];

    loop {
        let bytes_read = file.read(&mut buffer)?;
        if bytes_read == 0 {
            break;
        }
        hasher.update(&buffer[..bytes_read]);
    }

    let hash = hasher.digest128();
    Ok(format!("{hash:032x}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_hash_bytes() {
        let data = b"Hello, World!";
        let hash1 = hash_bytes(data);
        let hash2 = hash_bytes(data);
        assert_eq!(hash1, hash2);
        assert_eq!(hash1.len(), 32);

        let different_data = b"Different data";
        let hash3 = hash_bytes(different_data);
        assert_ne!(hash1, hash3);
    }

    #[test]
    fn test_hash_file() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("test.txt");
        std::fs::write(&file_path, "Test content for hashing")?;

        let hash = hash_file(&file_path, DEFAULT_CHUNK_SIZE)?;
        assert_eq!(hash.len(), 32);

        let hash2 = hash_file(&file_path, DEFAULT_CHUNK_SIZE)?;
        assert_eq!(hash, hash2);

        Ok(())
    }

    #[test]
    fn test_chunked_matches_whole_read() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("large.bin");
        // Above WHOLE_READ_LIMIT so the streaming path is taken
        let content: Vec<u8> = (0..2_000_000u32).map(|i| (i % 251) as u8).collect();
        std::fs::write(&file_path, &content)?;

        let streamed = hash_file(&file_path, 4096)?;
        assert_eq!(streamed, hash_bytes(&content));

        Ok(())
    }

    #[test]
    fn test_hash_empty_file() -> Result<()> {
        let dir = tempdir()?;
        let file_path = dir.path().join("empty");
        std::fs::write(&file_path, "")?;

        let hash = hash_file(&file_path, DEFAULT_CHUNK_SIZE)?;
        assert_eq!(hash, hash_bytes(b""));

        Ok(())
    }

    #[test]
    fn test_hash_missing_file() {
        let result = hash_file(Path::new("/nonexistent/definitely/missing"), 4096);
        assert!(result.is_err());
    }
}
