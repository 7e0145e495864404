use std::{
    collections::BTreeMap,
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use tracing::debug;

use super::get_data_file_path;
use crate::core::LectioError;

pub const STORE_FILE: &str = "storage.json";

/// String key-value store backed by one JSON file. Every write is flushed to disk.
#[derive(Debug)]
pub struct LocalStore {
    items: BTreeMap<String, String>,
    file_path: PathBuf,
}

impl LocalStore {
    pub fn open_default() -> Result<Self, LectioError> {
        Self::open(get_data_file_path(STORE_FILE))
    }

    pub fn open(file_path: impl Into<PathBuf>) -> Result<Self, LectioError> {
        let file_path = file_path.into();

        let items = if file_path.exists() {
            let content = fs::read_to_string(&file_path)?;
            if content.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str::<BTreeMap<String, String>>(&content).map_err(|e| {
                    LectioError::Custom(format!(
                        "Failed to parse store {}: {}",
                        file_path.display(),
                        e
                    ))
                })?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self { items, file_path })
    }

    pub fn path(&self) -> &Path {
        &self.file_path
    }

    pub fn get_item(&self, key: &str) -> Option<&str> {
        self.items.get(key).map(String::as_str)
    }

    pub fn set_item(&mut self, key: &str, value: impl Into<String>) -> Result<(), LectioError> {
        self.items.insert(key.to_string(), value.into());
        self.save()
    }

    pub fn remove_item(&mut self, key: &str) -> Result<bool, LectioError> {
        if self.items.remove(key).is_some() {
            self.save()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn save(&self) -> Result<(), LectioError> {
        if let Some(parent) = self.file_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(&self.items)?;
        fs::write(&self.file_path, content)?;
        debug!(path = %self.file_path.display(), keys = self.items.len(), "store written");
        Ok(())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub(crate) fn temp_store_path() -> PathBuf {
        std::env::temp_dir()
            .join(format!("lectio-test-{}", uuid::Uuid::new_v4()))
            .join(STORE_FILE)
    }

    #[test]
    fn test_missing_file_opens_empty() {
        let store = LocalStore::open(temp_store_path()).unwrap();
        assert_eq!(store.get_item("theme"), None);
    }

    #[test]
    fn test_values_survive_reopen() {
        let path = temp_store_path();

        let mut store = LocalStore::open(&path).unwrap();
        store.set_item("theme", "dark").unwrap();
        store.set_item("other", "value").unwrap();
        assert!(store.remove_item("other").unwrap());
        assert!(!store.remove_item("other").unwrap());

        let reopened = LocalStore::open(&path).unwrap();
        assert_eq!(reopened.get_item("theme"), Some("dark"));
        assert_eq!(reopened.get_item("other"), None);

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_corrupt_file_is_an_error() {
        let path = temp_store_path();
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "not json").unwrap();

        assert!(LocalStore::open(&path).is_err());

        let _ = fs::remove_dir_all(path.parent().unwrap());
    }
}
