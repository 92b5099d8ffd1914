//! Filesystem-backed [`TextStorage`]
//!
//! Resources live at `<root>/<collection>/<name>.json`. Collections are
//! plain directories created on first write.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::error::StoreError;
use crate::ports::TextStorage;

#[derive(Debug, Clone)]
pub struct FsStorage {
    root: PathBuf,
}

impl FsStorage {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn resource_path(&self, collection: &str, name: &str) -> Result<PathBuf, StoreError> {
        check_component(collection)?;
        check_component(name)?;
        Ok(self.root.join(collection).join(format!("{}.json", name)))
    }
}

/// Names become single path components; separators would escape the root.
fn check_component(component: &str) -> Result<(), StoreError> {
    if component.is_empty() || component.contains(['/', '\\']) || component.contains("..") {
        return Err(StoreError::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("invalid resource name component: {:?}", component),
        )));
    }
    Ok(())
}

impl TextStorage for FsStorage {
    fn write(&self, collection: &str, name: &str, contents: &str) -> Result<(), StoreError> {
        let path = self.resource_path(collection, name)?;
        fs::create_dir_all(self.root.join(collection))?;
        fs::write(path, contents)?;
        Ok(())
    }

    fn read(&self, collection: &str, name: &str) -> Result<String, StoreError> {
        let path = self.resource_path(collection, name)?;
        match fs::read_to_string(path) {
            Ok(contents) => Ok(contents),
            Err(error) if error.kind() == io::ErrorKind::NotFound => {
                Err(StoreError::not_found(collection, name))
            }
            Err(error) => Err(error.into()),
        }
    }

    fn list(&self, collection: &str) -> Result<Vec<String>, StoreError> {
        check_component(collection)?;
        let dir = self.root.join(collection);
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            // A collection never written to lists as empty.
            Err(error) if error.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(error) => return Err(error.into()),
        };

        let mut names = Vec::new();
        for entry in entries {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                if let Some(stem) = path.file_stem().and_then(|s| s.to_str()) {
                    names.push(stem.to_string());
                }
            }
        }
        names.sort();
        Ok(names)
    }

    fn exists(&self, collection: &str, name: &str) -> bool {
        self.resource_path(collection, name)
            .map(|path| path.is_file())
            .unwrap_or(false)
    }

    fn remove(&self, collection: &str, name: &str) -> Result<(), StoreError> {
        let path = self.resource_path(collection, name)?;
        match fs::remove_file(path) {
            Ok(()) => Ok(()),
            Err(error) if error.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(error) => Err(error.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_read_list_remove_cycle() {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = FsStorage::new(dir.path());

        storage.write("items", "rope", "{}").expect("write");
        storage.write("items", "axe", "{}").expect("write");
        assert!(storage.exists("items", "rope"));
        assert_eq!(storage.read("items", "rope").expect("read"), "{}");
        assert_eq!(storage.list("items").expect("list"), vec!["axe", "rope"]);

        storage.remove("items", "rope").expect("remove");
        assert!(!storage.exists("items", "rope"));
        // Removing again is a no-op.
        storage.remove("items", "rope").expect("second remove");
    }

    #[test]
    fn test_missing_resource_is_not_found() {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = FsStorage::new(dir.path());
        assert!(matches!(
            storage.read("items", "ghost"),
            Err(StoreError::NotFound { .. })
        ));
    }

    #[test]
    fn test_unwritten_collection_lists_empty() {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = FsStorage::new(dir.path());
        assert!(storage.list("traders").expect("list").is_empty());
    }

    #[test]
    fn test_path_escaping_names_are_rejected() {
        let dir = tempfile::tempdir().expect("temp dir");
        let storage = FsStorage::new(dir.path());
        assert!(storage.write("items", "../escape", "{}").is_err());
        assert!(storage.write("a/b", "rope", "{}").is_err());
        assert!(!storage.exists("items", "../escape"));
    }
}
