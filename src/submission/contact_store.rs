use crate::error::StoreError;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::RwLock;

/// Durable storage for the one value kept across sessions: the backend's contact id.
pub trait ContactStore: Send + Sync {
    fn save_contact_id(&self, contact_id: &str) -> Result<(), StoreError>;

    fn load_contact_id(&self) -> Result<Option<String>, StoreError>;
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct StoredContact {
    contact_id: String,
}

/// Keeps the contact id in a small JSON file.
#[derive(Debug, Clone)]
pub struct FileContactStore {
    path: PathBuf,
}

impl FileContactStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, e: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.display().to_string(),
            message: e.to_string(),
        }
    }
}

impl ContactStore for FileContactStore {
    fn save_contact_id(&self, contact_id: &str) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| self.io_error(e))?;
        }
        let stored = StoredContact {
            contact_id: contact_id.to_string(),
        };
        let json = serde_json::to_string(&stored).map_err(|e| StoreError::Corrupt {
            path: self.path.display().to_string(),
            message: e.to_string(),
        })?;
        fs::write(&self.path, json).map_err(|e| self.io_error(e))
    }

    fn load_contact_id(&self) -> Result<Option<String>, StoreError> {
        let content = match fs::read_to_string(&self.path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(self.io_error(e)),
        };
        let stored: StoredContact =
            serde_json::from_str(&content).map_err(|e| StoreError::Corrupt {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;
        Ok(Some(stored.contact_id))
    }
}

/// In-process store, for tests and sessions without durable storage.
#[derive(Debug, Default)]
pub struct MemoryContactStore {
    contact_id: RwLock<Option<String>>,
}

impl MemoryContactStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ContactStore for MemoryContactStore {
    fn save_contact_id(&self, contact_id: &str) -> Result<(), StoreError> {
        let mut slot = self.contact_id.write().unwrap_or_else(|e| e.into_inner());
        *slot = Some(contact_id.to_string());
        Ok(())
    }

    fn load_contact_id(&self) -> Result<Option<String>, StoreError> {
        let slot = self.contact_id.read().unwrap_or_else(|e| e.into_inner());
        Ok(slot.clone())
    }
}
