//! Whole-file access to one delimited store.
//!
//! A `TextTable` knows the path of its file and the lock of the data
//! directory it lives in. Reads never take the lock; every write does.

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::codec::Record;
use crate::error::{BookVerseError, Result};
use crate::fs::{write_atomic, StoreLock};

/// One record-per-line text file.
#[derive(Debug, Clone)]
pub struct TextTable<R> {
    data_dir: PathBuf,
    path: PathBuf,
    _record: PhantomData<fn() -> R>,
}

impl<R: Record> TextTable<R> {
    pub fn new(data_dir: &Path, file_name: &str) -> Self {
        Self {
            data_dir: data_dir.to_path_buf(),
            path: data_dir.join(file_name),
            _record: PhantomData,
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Take the data directory lock.
    pub fn lock(&self) -> Result<StoreLock> {
        StoreLock::acquire(&self.data_dir)
    }

    /// Read every record in file order. A missing file is an empty table.
    pub fn load_all(&self) -> Result<Vec<R>> {
        let Some(contents) = self.read_contents()? else {
            return Ok(Vec::new());
        };

        let mut records = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let record = R::decode(line).map_err(|e| e.at_line(index + 1))?;
            records.push(record);
        }
        debug!(store = R::STORE, count = records.len(), "Loaded store");
        Ok(records)
    }

    /// Like [`TextTable::load_all`], but lines that fail to decode are
    /// logged and skipped instead of failing the load.
    pub fn load_lenient(&self) -> Result<Vec<R>> {
        let Some(contents) = self.read_contents()? else {
            return Ok(Vec::new());
        };

        let mut records = Vec::new();
        for (index, line) in contents.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            match R::decode(line) {
                Ok(record) => records.push(record),
                Err(err) => {
                    warn!(store = R::STORE, line = index + 1, error = %err, "Skipping undecodable line")
                }
            }
        }
        debug!(store = R::STORE, count = records.len(), "Loaded store leniently");
        Ok(records)
    }

    fn read_contents(&self) -> Result<Option<String>> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => Ok(Some(contents)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                debug!(store = R::STORE, path = %self.path.display(), "Store absent, treating as empty");
                Ok(None)
            }
            Err(e) => Err(BookVerseError::Io(format!(
                "Failed to read {}: {}",
                self.path.display(),
                e
            ))),
        }
    }

    /// Append one record, taking the directory lock.
    pub fn append(&self, record: &R) -> Result<()> {
        let _lock = self.lock()?;
        self.append_locked(record)
    }

    /// Append one record. Caller must hold the directory lock.
    pub fn append_locked(&self, record: &R) -> Result<()> {
        let line = record.encode()?;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| {
                BookVerseError::Io(format!("Failed to open {}: {}", self.path.display(), e))
            })?;
        writeln!(file, "{}", line).map_err(|e| {
            BookVerseError::Io(format!("Failed to append to {}: {}", self.path.display(), e))
        })?;
        file.sync_data()?;
        info!(store = R::STORE, "Appended record");
        Ok(())
    }

    /// Replace the whole file with `records`, taking the directory lock.
    pub fn overwrite_all(&self, records: &[R]) -> Result<()> {
        let _lock = self.lock()?;
        self.overwrite_locked(records)
    }

    /// Replace the whole file. Caller must hold the directory lock.
    ///
    /// Every record is encoded before anything touches the disk, so an
    /// unencodable record leaves the store as it was.
    pub fn overwrite_locked(&self, records: &[R]) -> Result<()> {
        let mut buffer = String::new();
        for record in records {
            buffer.push_str(&record.encode()?);
            buffer.push('\n');
        }
        if !self.data_dir.exists() {
            fs::create_dir_all(&self.data_dir)?;
        }
        write_atomic(&self.path, buffer.as_bytes())?;
        info!(store = R::STORE, count = records.len(), "Rewrote store");
        Ok(())
    }

    /// Load, let `mutate` edit the records, and write them back as one
    /// locked critical section.
    ///
    /// `mutate` returns whether it changed anything; unchanged tables are
    /// not rewritten. Its value `T` is passed through.
    pub fn update<T>(&self, mutate: impl FnOnce(&mut Vec<R>) -> Result<(bool, T)>) -> Result<T> {
        let _lock = self.lock()?;
        self.update_locked(mutate)
    }

    /// [`TextTable::update`] for callers already holding the directory lock.
    pub fn update_locked<T>(
        &self,
        mutate: impl FnOnce(&mut Vec<R>) -> Result<(bool, T)>,
    ) -> Result<T> {
        let mut records = self.load_all()?;
        let (changed, value) = mutate(&mut records)?;
        if changed {
            self.overwrite_locked(&records)?;
        }
        Ok(value)
    }
}
