//! Atomic filesystem operations.
//!
//! All atomic writes follow this pattern:
//! 1. Write content to a temporary file in the same directory
//! 2. Sync the file to disk (fsync)
//! 3. Rename it over the target
//!
//! `rename()` is atomic on POSIX when source and destination share a
//! filesystem, and replaces an existing destination on Windows as well.
//! On crash a temporary file named `.{filename}.tmp` may remain.
//!
//! These helpers return plain `io::Result`; callers attach the context
//! (artifact store, report path) that decides the user-facing error kind.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// Atomically write bytes to a file, creating parent directories as needed.
///
/// ```no_run
/// use listings::fs::atomic_write;
/// use std::path::Path;
///
/// atomic_write(Path::new("artifacts/raw.csv/aliases.json"), b"{}")?;
/// # Ok::<(), std::io::Error>(())
/// ```
pub fn atomic_write<P: AsRef<Path>>(path: P, content: &[u8]) -> io::Result<()> {
    let path = path.as_ref();
    ensure_parent(path)?;

    let temp_path = generate_temp_path(path)?;
    write_and_sync(&temp_path, content)?;
    replace(&temp_path, path)
}

/// Atomically write a string to a file.
pub fn atomic_write_file<P: AsRef<Path>>(path: P, content: &str) -> io::Result<()> {
    atomic_write(path, content.as_bytes())
}

/// Atomically copy `source` to `destination`.
///
/// The destination is never observed partially written, which matters for
/// content-addressed blobs that other runs may read concurrently.
pub fn atomic_copy<P: AsRef<Path>, Q: AsRef<Path>>(source: P, destination: Q) -> io::Result<()> {
    let source = source.as_ref();
    let destination = destination.as_ref();
    ensure_parent(destination)?;

    let temp_path = generate_temp_path(destination)?;
    if let Err(e) = fs::copy(source, &temp_path) {
        let _ = fs::remove_file(&temp_path);
        return Err(e);
    }
    File::open(&temp_path)?.sync_all()?;
    replace(&temp_path, destination)
}

fn ensure_parent(path: &Path) -> io::Result<()> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() && !parent.exists() => {
            fs::create_dir_all(parent)
        }
        _ => Ok(()),
    }
}

/// Generate a temporary file path in the same directory as the target.
fn generate_temp_path(target: &Path) -> io::Result<PathBuf> {
    let parent = target.parent().unwrap_or(Path::new("."));
    let filename = target
        .file_name()
        .and_then(|n| n.to_str())
        .ok_or_else(|| {
            io::Error::new(
                io::ErrorKind::InvalidInput,
                format!("invalid file path '{}'", target.display()),
            )
        })?;

    Ok(parent.join(format!(".{}.tmp", filename)))
}

fn write_and_sync(path: &Path, content: &[u8]) -> io::Result<()> {
    let mut file = File::create(path)?;

    let written = file.write_all(content).and_then(|()| file.sync_all());
    if written.is_err() {
        let _ = fs::remove_file(path);
    }
    written
}

fn replace(source: &Path, target: &Path) -> io::Result<()> {
    if let Err(e) = fs::rename(source, target) {
        let _ = fs::remove_file(source);
        return Err(e);
    }

    // Persist the directory entry as well.
    if let Some(parent) = target.parent() {
        if let Ok(dir) = File::open(parent) {
            let _ = dir.sync_all();
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_atomic_write_new_file() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("manifest.json");

        atomic_write(&file_path, b"{\"version\":1}").unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "{\"version\":1}");
    }

    #[test]
    fn test_atomic_write_replace_existing() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("aliases.json");

        fs::write(&file_path, "{\"latest\":1}").unwrap();
        atomic_write_file(&file_path, "{\"latest\":2}").unwrap();

        let content = fs::read_to_string(&file_path).unwrap();
        assert_eq!(content, "{\"latest\":2}");
    }

    #[test]
    fn test_atomic_write_creates_parent_dirs() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir
            .path()
            .join("artifacts")
            .join("raw.csv")
            .join("v1")
            .join("manifest.json");

        atomic_write(&file_path, b"{}").unwrap();

        assert!(file_path.exists());
    }

    #[test]
    fn test_atomic_write_temp_file_cleanup() {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("report.json");

        atomic_write(&file_path, b"content").unwrap();

        assert!(!temp_dir.path().join(".report.json.tmp").exists());
    }

    #[test]
    fn test_atomic_copy() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("clean_sample.csv");
        let dest = temp_dir.path().join("blobs").join("ab").join("abcdef");

        fs::write(&source, "id,price\n1,100\n").unwrap();
        atomic_copy(&source, &dest).unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "id,price\n1,100\n");
        assert!(source.exists());
    }

    #[test]
    fn test_atomic_copy_missing_source_fails() {
        let temp_dir = TempDir::new().unwrap();
        let source = temp_dir.path().join("nope.csv");
        let dest = temp_dir.path().join("copy.csv");

        assert!(atomic_copy(&source, &dest).is_err());
        assert!(!dest.exists());
        assert!(!temp_dir.path().join(".copy.csv.tmp").exists());
    }

    #[test]
    fn test_generate_temp_path() {
        let target = Path::new("/some/path/file.csv");
        let temp = generate_temp_path(target).unwrap();

        assert_eq!(temp, Path::new("/some/path/.file.csv.tmp"));
    }
}
