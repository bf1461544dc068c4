//! Key/value preference storage
//!
//! The controller only needs one slot (the last used tile layer), but the
//! port is a plain string store so applications can share it.

use crate::{prelude::HashMap, MapError, Result};
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Persistent string preferences
pub trait PreferenceStore {
    fn get(&self, key: &str) -> Option<String>;

    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

impl<S: PreferenceStore + ?Sized> PreferenceStore for Box<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        (**self).set(key, value)
    }
}

/// Preferences that live as long as the process
#[derive(Debug, Clone, Default)]
pub struct MemoryPreferences {
    values: HashMap<String, String>,
}

impl MemoryPreferences {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(mut self, key: &str, value: &str) -> Self {
        self.values.insert(key.to_string(), value.to_string());
        self
    }
}

impl PreferenceStore for MemoryPreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Preferences kept in a JSON object on disk
///
/// The file is read once on open and rewritten in full on every `set`.
#[derive(Debug)]
pub struct JsonFilePreferences {
    path: PathBuf,
    values: serde_json::Map<String, serde_json::Value>,
}

impl JsonFilePreferences {
    /// Opens the file, starting empty when it does not exist yet
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let values = match fs::read_to_string(&path) {
            Ok(content) if content.trim().is_empty() => serde_json::Map::new(),
            Ok(content) => serde_json::from_str(&content).map_err(|e| {
                MapError::Preferences(format!("{} is not a JSON object: {}", path.display(), e))
            })?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => serde_json::Map::new(),
            Err(e) => return Err(e.into()),
        };

        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let content = serde_json::to_string_pretty(&self.values)?;
        fs::write(&self.path, content)?;
        Ok(())
    }
}

impl PreferenceStore for JsonFilePreferences {
    /// Non-string values written by other tools are ignored
    fn get(&self, key: &str) -> Option<String> {
        self.values
            .get(key)
            .and_then(|v| v.as_str())
            .map(str::to_string)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.values
            .insert(key.to_string(), serde_json::Value::String(value.to_string()));
        self.flush()
    }
}

/// Browser `localStorage`
#[cfg(feature = "wasm")]
pub struct LocalStoragePreferences {
    storage: web_sys::Storage,
}

#[cfg(feature = "wasm")]
impl LocalStoragePreferences {
    /// Binds to the current window's storage
    pub fn from_window() -> Result<Self> {
        let window = web_sys::window()
            .ok_or_else(|| MapError::Preferences("no window available".to_string()))?;
        let storage = window
            .local_storage()
            .map_err(|e| MapError::Preferences(format!("localStorage unavailable: {:?}", e)))?
            .ok_or_else(|| MapError::Preferences("localStorage disabled".to_string()))?;
        Ok(Self { storage })
    }
}

#[cfg(feature = "wasm")]
impl PreferenceStore for LocalStoragePreferences {
    fn get(&self, key: &str) -> Option<String> {
        self.storage.get_item(key).ok().flatten()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.storage
            .set_item(key, value)
            .map_err(|e| MapError::Preferences(format!("failed to write '{}': {:?}", key, e)))
    }
}
