//! Load and save the group tree document
//!
//! The whole tree is written after every mutation. A missing data file is not
//! an error: it yields an empty tree and nothing is written until the first
//! mutation.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

use crate::constants::paths::{APP_DIR, DATA_FILENAME};
use crate::tree::GroupTree;

/// Storage backend for the group tree
pub trait DocumentStore {
    fn load(&self) -> Result<GroupTree>;
    fn save(&self, tree: &GroupTree) -> Result<()>;
}

/// JSON file with two-space indentation, UTF-8 written verbatim
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `<data_dir>/kuusoo/data.json`, falling back to the working directory
    pub fn default_path() -> PathBuf {
        let mut path = dirs::data_dir().unwrap_or_else(|| PathBuf::from("."));
        path.push(APP_DIR);
        path.push(DATA_FILENAME);
        path
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DocumentStore for JsonFileStore {
    fn load(&self) -> Result<GroupTree> {
        if !self.path.exists() {
            warn!(path = %self.path.display(), "Data file not found, starting with an empty tree");
            return Ok(GroupTree::default());
        }

        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read data from {:?}", self.path))?;
        let tree: GroupTree = serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse JSON from {:?}", self.path))?;

        info!(path = %self.path.display(), main_groups = tree.main_groups.len(), "Loaded group tree");
        Ok(tree)
    }

    fn save(&self, tree: &GroupTree) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create data directory {:?}", parent))?;
        }

        let json = serde_json::to_string_pretty(tree).context("Failed to serialize group tree")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write data to {:?}", self.path))?;

        info!(path = %self.path.display(), "Saved group tree");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_file_returns_empty_tree() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("data.json"));
        let tree = store.load().unwrap();
        assert!(tree.main_groups.is_empty());
        // Nothing written on load
        assert!(!store.path().exists());
    }

    #[test]
    fn test_save_creates_parent_and_reloads() {
        let dir = TempDir::new().unwrap();
        let store = JsonFileStore::new(dir.path().join("save").join("data.json"));

        let mut tree = GroupTree::default();
        tree.add_main_group("書籍").unwrap();
        tree.add_sub_group(0, "Novels").unwrap();
        store.save(&tree).unwrap();

        let contents = fs::read_to_string(store.path()).unwrap();
        // Two-space indentation, non-ASCII kept verbatim
        assert!(contents.starts_with("{\n  \"mainGroups\""));
        assert!(contents.contains("書籍"));

        assert_eq!(store.load().unwrap(), tree);
    }

    #[test]
    fn test_load_invalid_json_is_an_error() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("data.json");
        fs::write(&path, "{ not json").unwrap();
        let err = JsonFileStore::new(&path).load().unwrap_err();
        assert!(format!("{err:#}").contains("Failed to parse JSON"));
    }

    #[test]
    fn test_save_into_unwritable_location_fails() {
        let dir = TempDir::new().unwrap();
        // A regular file where the parent directory should be
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "").unwrap();
        let store = JsonFileStore::new(blocker.join("data.json"));
        assert!(store.save(&GroupTree::default()).is_err());
    }
}
