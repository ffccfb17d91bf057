use crate::error::MemoryError;
use log::{debug, warn};
use std::collections::BTreeMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

/// Key the client's own vote is remembered under.
pub const VOTE_KEY: &str = "voteData";

/// Durable per-client key/value storage.
pub trait VoteMemory: Send {
    fn get(&self, key: &str) -> Result<Option<String>, MemoryError>;

    fn set(&mut self, key: &str, value: String) -> Result<(), MemoryError>;

    fn remove(&mut self, key: &str) -> Result<(), MemoryError>;
}

/// Key/value entries kept in a single JSON object on disk.
pub struct FileVoteMemory {
    path: PathBuf,
    entries: BTreeMap<String, String>,
}

impl FileVoteMemory {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, MemoryError> {
        let path = path.into();
        let entries = match fs::read_to_string(&path) {
            Ok(contents) if contents.trim().is_empty() => BTreeMap::new(),
            Ok(contents) => match serde_json::from_str(&contents) {
                Ok(entries) => entries,
                Err(e) => {
                    warn!("Ignoring unreadable vote memory at {}: {}", path.display(), e);
                    BTreeMap::new()
                }
            },
            Err(e) if e.kind() == ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(e.into()),
        };

        debug!("Opened vote memory at {} ({} entries)", path.display(), entries.len());
        Ok(Self { path, entries })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<(), MemoryError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.path, serde_json::to_string_pretty(&self.entries)?)?;
        Ok(())
    }
}

impl VoteMemory for FileVoteMemory {
    fn get(&self, key: &str) -> Result<Option<String>, MemoryError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), MemoryError> {
        self.entries.insert(key.to_string(), value);
        self.flush()
    }

    fn remove(&mut self, key: &str) -> Result<(), MemoryError> {
        if self.entries.remove(key).is_some() {
            self.flush()?;
        }
        Ok(())
    }
}

/// Non-persistent memory for exercising the app without touching disk.
#[cfg(test)]
#[derive(Default)]
pub struct InMemoryVoteMemory {
    pub entries: std::collections::HashMap<String, String>,
}

#[cfg(test)]
impl VoteMemory for InMemoryVoteMemory {
    fn get(&self, key: &str) -> Result<Option<String>, MemoryError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: String) -> Result<(), MemoryError> {
        self.entries.insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), MemoryError> {
        self.entries.remove(key);
        Ok(())
    }
}
