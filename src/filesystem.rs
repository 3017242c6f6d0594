//! Filesystem queries used when adding files

use anyhow::{Context, Result};
use std::io;
use std::path::{Path, PathBuf};
use tracing::info;

/// What the organizer needs to know about a path
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FileStat {
    pub is_file: bool,
    pub len: u64,
}

pub trait FileStats {
    fn stat(&self, path: &Path) -> io::Result<FileStat>;
}

/// Stats backed by `std::fs::metadata` (follows symlinks)
#[derive(Debug, Default, Clone, Copy)]
pub struct StdFileStats;

impl FileStats for StdFileStats {
    fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let meta = std::fs::metadata(path)?;
        Ok(FileStat {
            is_file: meta.is_file(),
            len: meta.len(),
        })
    }
}

/// Final path component used as the file entry name; `None` if it is
/// missing or not valid UTF-8
pub fn display_name(path: &Path) -> Option<String> {
    path.file_name()?.to_str().map(str::to_owned)
}

/// Resolve `path` against the working directory without touching the disk
pub fn absolute_path(path: &Path) -> io::Result<PathBuf> {
    std::path::absolute(path)
}

/// Open `path` with the desktop's default application
pub fn open_with_default_app(path: &Path) -> Result<()> {
    open::that(path).with_context(|| format!("Failed to open {:?}", path))?;
    info!(path = %path.display(), "Opened file with default application");
    Ok(())
}
