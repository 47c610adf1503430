//! Storage backends for persisted documents
//!
//! Features:
//! - One text document per store (JSON)
//! - Atomic file writes (tmp → save)
//! - LocalStorage on web, files on native, memory for tests

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use crate::error::StorageError;

/// Where a store keeps its serialized document
pub trait ProgressBackend {
    /// Stored document, `Ok(None)` when nothing was saved yet
    fn read(&self) -> Result<Option<String>, StorageError>;
    /// Replace the stored document
    fn write(&mut self, data: &str) -> Result<(), StorageError>;
}

/// In-memory slot; clones share the same slot
#[derive(Debug, Clone, Default)]
pub struct MemoryBackend {
    slot: Rc<RefCell<Option<String>>>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Backend pre-filled with `data`
    pub fn with_data(data: &str) -> Self {
        Self {
            slot: Rc::new(RefCell::new(Some(data.to_string()))),
        }
    }

    pub fn contents(&self) -> Option<String> {
        self.slot.borrow().clone()
    }
}

impl ProgressBackend for MemoryBackend {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Ok(self.slot.borrow().clone())
    }

    fn write(&mut self, data: &str) -> Result<(), StorageError> {
        *self.slot.borrow_mut() = Some(data.to_string());
        Ok(())
    }
}

/// JSON file on disk, written via a temp file and rename
#[derive(Debug, Clone)]
pub struct FileBackend {
    path: PathBuf,
}

impl FileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `progress.json` next to the executable, or in the working directory
    pub fn beside_executable(file_name: &str) -> Self {
        if let Ok(exe) = std::env::current_exe() {
            if let Some(dir) = exe.parent() {
                return Self::new(dir.join(file_name));
            }
        }
        Self::new(file_name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tmp_path(&self) -> PathBuf {
        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        PathBuf::from(tmp)
    }
}

impl ProgressBackend for FileBackend {
    fn read(&self) -> Result<Option<String>, StorageError> {
        match std::fs::read_to_string(&self.path) {
            Ok(data) => Ok(Some(data)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    fn write(&mut self, data: &str) -> Result<(), StorageError> {
        let tmp = self.tmp_path();
        std::fs::write(&tmp, data)?;
        std::fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

/// Browser LocalStorage entry
#[cfg(target_arch = "wasm32")]
#[derive(Debug, Clone)]
pub struct LocalStorageBackend {
    key: String,
}

#[cfg(target_arch = "wasm32")]
impl LocalStorageBackend {
    pub fn new(key: &str) -> Self {
        Self {
            key: key.to_string(),
        }
    }

    fn storage() -> Result<web_sys::Storage, StorageError> {
        web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten()
            .ok_or_else(|| StorageError::Unavailable("LocalStorage".to_string()))
    }
}

#[cfg(target_arch = "wasm32")]
impl ProgressBackend for LocalStorageBackend {
    fn read(&self) -> Result<Option<String>, StorageError> {
        Self::storage()?
            .get_item(&self.key)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }

    fn write(&mut self, data: &str) -> Result<(), StorageError> {
        Self::storage()?
            .set_item(&self.key, data)
            .map_err(|e| StorageError::Unavailable(format!("{e:?}")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_memory_clones_share_slot() {
        let backend = MemoryBackend::new();
        let mut writer = backend.clone();
        assert_eq!(backend.read().unwrap(), None);
        writer.write("{}").unwrap();
        assert_eq!(backend.contents().as_deref(), Some("{}"));
    }

    #[test]
    fn test_file_roundtrip_and_missing_file() {
        let dir = std::env::temp_dir().join(format!("mini_arcade_fs_{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let mut backend = FileBackend::new(dir.join("progress.json"));
        assert_eq!(backend.read().unwrap(), None);

        backend.write(r#"{"trace":{}}"#).unwrap();
        assert_eq!(backend.read().unwrap().as_deref(), Some(r#"{"trace":{}}"#));
        assert!(!backend.tmp_path().exists());

        std::fs::remove_dir_all(&dir).unwrap();
    }
}
