//! Where the persisted ledger state lives between sessions.

use std::{
    fs,
    path::{Path, PathBuf},
};

use crate::{LedgerState, ResultEngine};

/// Backend that stores the `{activeDate, cashBookByDate}` document.
pub trait StateStorage {
    /// Saved state, or `None` when nothing was saved yet.
    fn load(&self) -> ResultEngine<Option<LedgerState>>;

    fn save(&mut self, state: &LedgerState) -> ResultEngine<()>;
}

/// JSON document on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl StateStorage for JsonFileStorage {
    fn load(&self) -> ResultEngine<Option<LedgerState>> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(err) => return Err(err.into()),
        };
        Ok(Some(serde_json::from_str(&content)?))
    }

    fn save(&mut self, state: &LedgerState) -> ResultEngine<()> {
        if let Some(parent) = self.path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent)?;
        }
        let payload = serde_json::to_string_pretty(state)?;
        fs::write(&self.path, payload)?;
        Ok(())
    }
}

/// Keeps the serialized document in memory; handy for tests and sessions
/// that should not touch the disk.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    document: Option<String>,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// The last serialized document.
    pub fn document(&self) -> Option<&str> {
        self.document.as_deref()
    }

    /// How many times the state was written.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl StateStorage for MemoryStorage {
    fn load(&self) -> ResultEngine<Option<LedgerState>> {
        match &self.document {
            Some(document) => Ok(Some(serde_json::from_str(document)?)),
            None => Ok(None),
        }
    }

    fn save(&mut self, state: &LedgerState) -> ResultEngine<()> {
        self.document = Some(serde_json::to_string(state)?);
        self.saves += 1;
        Ok(())
    }
}
