//! Main group → sub-group → file hierarchy
//!
//! Pure in-memory rules: id assignment, sibling name uniqueness and index
//! validation. Saving after each mutation is the organizer's job.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::constants::SIZE_SUFFIX;

/// Which level of the hierarchy an error or lookup refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    MainGroup,
    SubGroup,
    File,
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::MainGroup => f.write_str("main group"),
            Level::SubGroup => f.write_str("sub-group"),
            Level::File => f.write_str("file"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TreeError {
    #[error("{level} '{name}' already exists")]
    DuplicateName { level: Level, name: String },

    #[error("{level} index {index} is out of range ({len} present)")]
    IndexOutOfRange { level: Level, index: usize, len: usize },

    #[error("no {level} named '{name}'")]
    NotFound { level: Level, name: String },

    #[error("no {level} id left to assign")]
    IdExhausted { level: Level },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub id: u32,
    pub name: String,
    /// Byte count followed by `B`, e.g. `"1024B"`
    pub size: String,
    pub path: String,
}

impl FileEntry {
    pub fn format_size(bytes: u64) -> String {
        format!("{bytes}{SIZE_SUFFIX}")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubGroup {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub files: Vec<FileEntry>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MainGroup {
    pub id: u32,
    pub name: String,
    #[serde(default)]
    pub sub_groups: Vec<SubGroup>,
}

/// The persisted document: `{"mainGroups": [...]}`
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GroupTree {
    #[serde(default)]
    pub main_groups: Vec<MainGroup>,
}

/// `max(ids) + 1`, or 1 for an empty sibling list
fn next_id(level: Level, ids: impl Iterator<Item = u32>) -> Result<u32, TreeError> {
    match ids.max() {
        None => Ok(1),
        Some(max) => max.checked_add(1).ok_or(TreeError::IdExhausted { level }),
    }
}

fn check_index(level: Level, index: usize, len: usize) -> Result<(), TreeError> {
    if index < len {
        Ok(())
    } else {
        Err(TreeError::IndexOutOfRange { level, index, len })
    }
}

impl SubGroup {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            files: Vec::new(),
        }
    }

    pub fn has_file(&self, name: &str) -> bool {
        self.files.iter().any(|f| f.name == name)
    }

    pub fn next_file_id(&self) -> Result<u32, TreeError> {
        next_id(Level::File, self.files.iter().map(|f| f.id))
    }

    /// Append a file entry unless a sibling already uses `name`
    pub fn push_file(
        &mut self,
        name: impl Into<String>,
        bytes: u64,
        path: impl Into<String>,
    ) -> Result<&FileEntry, TreeError> {
        let name = name.into();
        if self.has_file(&name) {
            return Err(TreeError::DuplicateName {
                level: Level::File,
                name,
            });
        }
        let entry = FileEntry {
            id: self.next_file_id()?,
            name,
            size: FileEntry::format_size(bytes),
            path: path.into(),
        };
        self.files.push(entry);
        Ok(&self.files[self.files.len() - 1])
    }
}

impl MainGroup {
    pub fn new(id: u32, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            sub_groups: Vec::new(),
        }
    }
}

impl GroupTree {
    pub fn main_group(&self, main_index: usize) -> Result<&MainGroup, TreeError> {
        check_index(Level::MainGroup, main_index, self.main_groups.len())?;
        Ok(&self.main_groups[main_index])
    }

    pub fn main_group_mut(&mut self, main_index: usize) -> Result<&mut MainGroup, TreeError> {
        check_index(Level::MainGroup, main_index, self.main_groups.len())?;
        Ok(&mut self.main_groups[main_index])
    }

    pub fn sub_group(&self, main_index: usize, sub_index: usize) -> Result<&SubGroup, TreeError> {
        let main = self.main_group(main_index)?;
        check_index(Level::SubGroup, sub_index, main.sub_groups.len())?;
        Ok(&main.sub_groups[sub_index])
    }

    pub fn sub_group_mut(
        &mut self,
        main_index: usize,
        sub_index: usize,
    ) -> Result<&mut SubGroup, TreeError> {
        let main = self.main_group_mut(main_index)?;
        check_index(Level::SubGroup, sub_index, main.sub_groups.len())?;
        Ok(&mut main.sub_groups[sub_index])
    }

    pub fn main_index_of(&self, id: u32) -> Option<usize> {
        self.main_groups.iter().position(|g| g.id == id)
    }

    pub fn sub_index_of(&self, main_index: usize, id: u32) -> Option<usize> {
        self.main_groups
            .get(main_index)?
            .sub_groups
            .iter()
            .position(|g| g.id == id)
    }

    pub fn file_index_of(&self, main_index: usize, sub_index: usize, id: u32) -> Option<usize> {
        self.sub_group(main_index, sub_index)
            .ok()?
            .files
            .iter()
            .position(|f| f.id == id)
    }

    /// Append a main group; returns its id
    pub fn add_main_group(&mut self, name: &str) -> Result<u32, TreeError> {
        if self.main_groups.iter().any(|g| g.name == name) {
            return Err(TreeError::DuplicateName {
                level: Level::MainGroup,
                name: name.to_string(),
            });
        }
        let id = next_id(Level::MainGroup, self.main_groups.iter().map(|g| g.id))?;
        self.main_groups.push(MainGroup::new(id, name));
        Ok(id)
    }

    /// Append a sub-group to `main_groups[main_index]`; returns its id
    pub fn add_sub_group(&mut self, main_index: usize, name: &str) -> Result<u32, TreeError> {
        let main = self.main_group_mut(main_index)?;
        if main.sub_groups.iter().any(|g| g.name == name) {
            return Err(TreeError::DuplicateName {
                level: Level::SubGroup,
                name: name.to_string(),
            });
        }
        let id = next_id(Level::SubGroup, main.sub_groups.iter().map(|g| g.id))?;
        main.sub_groups.push(SubGroup::new(id, name));
        Ok(id)
    }

    pub fn delete_main_group(&mut self, main_index: usize) -> Result<MainGroup, TreeError> {
        check_index(Level::MainGroup, main_index, self.main_groups.len())?;
        Ok(self.main_groups.remove(main_index))
    }

    pub fn delete_sub_group(
        &mut self,
        main_index: usize,
        sub_index: usize,
    ) -> Result<SubGroup, TreeError> {
        let main = self.main_group_mut(main_index)?;
        check_index(Level::SubGroup, sub_index, main.sub_groups.len())?;
        Ok(main.sub_groups.remove(sub_index))
    }

    /// Remove the file called `file_name` from the given sub-group
    pub fn delete_file(
        &mut self,
        main_index: usize,
        sub_index: usize,
        file_name: &str,
    ) -> Result<FileEntry, TreeError> {
        let sub = self.sub_group_mut(main_index, sub_index)?;
        let position = sub
            .files
            .iter()
            .position(|f| f.name == file_name)
            .ok_or_else(|| TreeError::NotFound {
                level: Level::File,
                name: file_name.to_string(),
            })?;
        Ok(sub.files.remove(position))
    }
}
