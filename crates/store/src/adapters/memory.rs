//! In-memory [`TextStorage`] for tests and ephemeral sessions

use std::collections::BTreeMap;
use std::sync::{PoisonError, RwLock};

use crate::error::StoreError;
use crate::ports::TextStorage;

#[derive(Debug, Default)]
pub struct MemoryStorage {
    collections: RwLock<BTreeMap<String, BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl TextStorage for MemoryStorage {
    fn write(&self, collection: &str, name: &str, contents: &str) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        collections
            .entry(collection.to_string())
            .or_default()
            .insert(name.to_string(), contents.to_string());
        Ok(())
    }

    fn read(&self, collection: &str, name: &str) -> Result<String, StoreError> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        collections
            .get(collection)
            .and_then(|resources| resources.get(name))
            .cloned()
            .ok_or_else(|| StoreError::not_found(collection, name))
    }

    fn list(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Ok(collections
            .get(collection)
            .map(|resources| resources.keys().cloned().collect())
            .unwrap_or_default())
    }

    fn exists(&self, collection: &str, name: &str) -> bool {
        let collections = self
            .collections
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        collections
            .get(collection)
            .is_some_and(|resources| resources.contains_key(name))
    }

    fn remove(&self, collection: &str, name: &str) -> Result<(), StoreError> {
        let mut collections = self
            .collections
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(resources) = collections.get_mut(collection) {
            resources.remove(name);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_list_remove_cycle() {
        let storage = MemoryStorage::new();
        storage.write("items", "rope", "{}").expect("write");
        storage.write("items", "axe", "{}").expect("write");

        assert!(storage.exists("items", "rope"));
        assert_eq!(storage.read("items", "rope").expect("read"), "{}");
        assert_eq!(storage.list("items").expect("list"), vec!["axe", "rope"]);

        storage.remove("items", "rope").expect("remove");
        assert!(!storage.exists("items", "rope"));
        assert!(matches!(
            storage.read("items", "rope"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_unwritten_collection_lists_empty() {
        let storage = MemoryStorage::new();
        assert!(storage.list("maps").expect("list").is_empty());
    }
}
