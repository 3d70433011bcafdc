//! Filesystem utilities: atomic replacement and the data directory lock.

use std::fs::{self, File, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::time::{SystemTime, UNIX_EPOCH};

use fs2::FileExt;
use tracing::{debug, trace};

use crate::error::{BookVerseError, Result};

/// Name of the lock file kept inside the data directory.
pub const LOCK_FILE_NAME: &str = ".bookverse.lock";

/// Atomically rename a file, with fallback for platforms where rename fails if target exists.
///
/// On some platforms (notably Windows), `fs::rename` fails if the destination already exists.
/// This function handles that case by removing the destination first and retrying.
///
/// If the rename ultimately fails, the temp file is cleaned up.
pub fn rename_with_fallback(temp_path: &Path, destination: &Path) -> io::Result<()> {
    if let Err(initial_err) = fs::rename(temp_path, destination) {
        let _ = fs::remove_file(destination);
        fs::rename(temp_path, destination).map_err(|retry_err| {
            let _ = fs::remove_file(temp_path);
            io::Error::new(
                retry_err.kind(),
                format!(
                    "Atomic rename failed (initial: {}, retry: {})",
                    initial_err, retry_err
                ),
            )
        })?;
    }
    Ok(())
}

/// Replace `path` with `data` via a synced temp file in the same directory.
///
/// Either the new contents land completely or the previous file is left as it was.
pub fn write_atomic(path: &Path, data: &[u8]) -> Result<()> {
    let parent = path
        .parent()
        .ok_or_else(|| BookVerseError::Io(format!("Invalid store path: {}", path.display())))?;

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_err(|e| BookVerseError::Io(format!("System time error: {}", e)))?
        .as_nanos();
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .ok_or_else(|| BookVerseError::Io(format!("Invalid store filename: {}", path.display())))?;
    let temp_path = parent.join(format!(".{}.{}.tmp", filename, nanos));

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(&temp_path)
        .map_err(|e| BookVerseError::Io(format!("Temp file create failed: {}", e)))?;
    let written = file.write_all(data).and_then(|_| file.sync_all());
    if let Err(e) = written {
        let _ = fs::remove_file(&temp_path);
        return Err(BookVerseError::Io(format!("Temp file write failed: {}", e)));
    }

    rename_with_fallback(&temp_path, path)
        .map_err(|e| BookVerseError::Io(format!("Atomic rename failed: {}", e)))?;
    trace!(path = %path.display(), bytes = data.len(), "Replaced store file");
    Ok(())
}

/// Exclusive advisory lock on a data directory.
///
/// Held for the duration of one load-mutate-write sequence and released on drop.
#[derive(Debug)]
pub struct StoreLock {
    file: File,
    path: PathBuf,
}

impl StoreLock {
    /// Block until the directory lock is acquired, creating the directory if needed.
    pub fn acquire(data_dir: &Path) -> Result<Self> {
        if !data_dir.exists() {
            fs::create_dir_all(data_dir).map_err(|e| {
                BookVerseError::Io(format!(
                    "Failed to create data directory {}: {}",
                    data_dir.display(),
                    e
                ))
            })?;
            debug!(path = %data_dir.display(), "Created data directory");
        }

        let path = data_dir.join(LOCK_FILE_NAME);
        let file = OpenOptions::new()
            .create(true)
            .truncate(false)
            .write(true)
            .open(&path)
            .map_err(|e| {
                BookVerseError::Io(format!("Failed to open lock file {}: {}", path.display(), e))
            })?;
        file.lock_exclusive().map_err(|e| {
            BookVerseError::Io(format!("Failed to lock {}: {}", path.display(), e))
        })?;
        trace!(path = %path.display(), "Acquired store lock");
        Ok(Self { file, path })
    }
}

impl Drop for StoreLock {
    fn drop(&mut self) {
        if let Err(e) = FileExt::unlock(&self.file) {
            debug!(path = %self.path.display(), error = %e, "Failed to release store lock");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_rename_new_file() {
        let dir = tempdir().unwrap();
        let temp = dir.path().join("temp.txt");
        let dest = dir.path().join("dest.txt");

        File::create(&temp).unwrap().write_all(b"test").unwrap();

        rename_with_fallback(&temp, &dest).unwrap();

        assert!(!temp.exists());
        assert_eq!(fs::read_to_string(&dest).unwrap(), "test");
    }

    #[test]
    fn test_write_atomic_overwrites_existing() {
        let dir = tempdir().unwrap();
        let dest = dir.path().join("books.txt");
        fs::write(&dest, "old\n").unwrap();

        write_atomic(&dest, b"new\n").unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "new\n");
        let leftovers: Vec<_> = fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_name().to_string_lossy().ends_with(".tmp"))
            .collect();
        assert!(leftovers.is_empty());
    }

    #[test]
    fn test_lock_creates_directory_and_releases() {
        let dir = tempdir().unwrap();
        let data_dir = dir.path().join("nested").join("data");

        {
            let _lock = StoreLock::acquire(&data_dir).unwrap();
            assert!(data_dir.join(LOCK_FILE_NAME).exists());
        }

        // Re-acquiring after drop must not block.
        let _again = StoreLock::acquire(&data_dir).unwrap();
    }
}
