//! Group tree bound to its store
//!
//! Every successful mutation is followed by a full save. When a group-level
//! save fails the mutation stays applied in memory and the error is returned;
//! when a file batch fails to save, every entry that batch added is removed
//! again so memory matches the last saved document.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use tracing::{error, info, warn, Span};

use crate::filesystem::{absolute_path, display_name, FileStats};
use crate::persistence::DocumentStore;
use crate::tree::{FileEntry, GroupTree, MainGroup, SubGroup, TreeError};

#[derive(Debug, thiserror::Error)]
pub enum OrganizerError {
    #[error(transparent)]
    Tree(#[from] TreeError),

    /// The in-memory change is kept; disk holds the previous document
    #[error("failed to save groups: {0:#}")]
    Persistence(anyhow::Error),
}

/// Why one path of a file batch was skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BatchWarning {
    Duplicate { name: String, path: PathBuf },
    NotAFile { path: PathBuf },
    Unreadable { path: PathBuf, reason: String },
    NoFileName { path: PathBuf },
    /// Stored paths must round-trip through the JSON document unchanged
    NotUtf8 { path: PathBuf },
    /// The tree refused the entry (no id left)
    Rejected { path: PathBuf, reason: String },
}

impl fmt::Display for BatchWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatchWarning::Duplicate { name, .. } => {
                write!(f, "File '{name}' already exists, choose another file")
            }
            BatchWarning::NotAFile { path } => {
                write!(f, "'{}' is not a regular file", path.display())
            }
            BatchWarning::Unreadable { path, reason } => {
                write!(f, "Cannot read '{}': {reason}", path.display())
            }
            BatchWarning::NoFileName { path } => {
                write!(f, "'{}' has no file name", path.display())
            }
            BatchWarning::NotUtf8 { path } => {
                write!(f, "'{}' is not a valid UTF-8 path", path.display())
            }
            BatchWarning::Rejected { path, reason } => {
                write!(f, "Cannot add '{}': {reason}", path.display())
            }
        }
    }
}

/// Result of adding a batch of paths to one sub-group
#[derive(Debug, Default)]
pub struct BatchReport {
    /// Entries added by this batch (removed again if `save_error` is set)
    pub added: Vec<FileEntry>,
    pub warnings: Vec<BatchWarning>,
    /// Save failure that rolled the batch back
    pub save_error: Option<anyhow::Error>,
}

impl BatchReport {
    pub fn is_rolled_back(&self) -> bool {
        self.save_error.is_some()
    }

    /// Number of entries that are now persisted
    pub fn saved_count(&self) -> usize {
        if self.is_rolled_back() {
            0
        } else {
            self.added.len()
        }
    }
}

/// Where a batch of paths came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BatchSource {
    /// Paths the user picked or typed: name checked first, then the file
    Picked,
    /// Drag-and-drop payload: anything but a regular file is ignored first
    Dropped,
}

pub struct Organizer<S, P> {
    tree: GroupTree,
    store: S,
    stats: P,
    span: Span,
}

impl<S: DocumentStore, P: FileStats> Organizer<S, P> {
    pub fn new(tree: GroupTree, store: S, stats: P, span: Span) -> Self {
        Self {
            tree,
            store,
            stats,
            span,
        }
    }

    /// Load the tree from `store`
    pub fn load(store: S, stats: P, span: Span) -> Result<Self> {
        let tree = {
            let _guard = span.enter();
            store.load()?
        };
        Ok(Self::new(tree, store, stats, span))
    }

    pub fn tree(&self) -> &GroupTree {
        &self.tree
    }

    fn persist(&self) -> Result<(), OrganizerError> {
        self.store.save(&self.tree).map_err(|err| {
            error!(error = ?err, "Failed to save group tree, memory and disk now differ");
            OrganizerError::Persistence(err)
        })
    }

    pub fn add_main_group(&mut self, name: &str) -> Result<u32, OrganizerError> {
        let _guard = self.span.clone().entered();
        let id = self.tree.add_main_group(name).inspect_err(|err| {
            warn!(name = %name, error = %err, "Rejected main group");
        })?;
        info!(name = %name, id, "Added main group");
        self.persist()?;
        Ok(id)
    }

    pub fn add_sub_group(&mut self, main_index: usize, name: &str) -> Result<u32, OrganizerError> {
        let _guard = self.span.clone().entered();
        let id = self.tree.add_sub_group(main_index, name).inspect_err(|err| {
            warn!(main_index, name = %name, error = %err, "Rejected sub-group");
        })?;
        info!(main_index, name = %name, id, "Added sub-group");
        self.persist()?;
        Ok(id)
    }

    pub fn delete_main_group(&mut self, main_index: usize) -> Result<MainGroup, OrganizerError> {
        let _guard = self.span.clone().entered();
        let removed = self.tree.delete_main_group(main_index)?;
        info!(main_index, name = %removed.name, "Deleted main group");
        self.persist()?;
        Ok(removed)
    }

    pub fn delete_sub_group(
        &mut self,
        main_index: usize,
        sub_index: usize,
    ) -> Result<SubGroup, OrganizerError> {
        let _guard = self.span.clone().entered();
        let removed = self.tree.delete_sub_group(main_index, sub_index)?;
        info!(main_index, sub_index, name = %removed.name, "Deleted sub-group");
        self.persist()?;
        Ok(removed)
    }

    pub fn delete_file(
        &mut self,
        main_index: usize,
        sub_index: usize,
        file_name: &str,
    ) -> Result<FileEntry, OrganizerError> {
        let _guard = self.span.clone().entered();
        let removed = self.tree.delete_file(main_index, sub_index, file_name)?;
        info!(main_index, sub_index, name = %file_name, "Deleted file");
        self.persist()?;
        Ok(removed)
    }

    /// Add picked paths to a sub-group; duplicates are skipped with a warning
    pub fn add_files(
        &mut self,
        main_index: usize,
        sub_index: usize,
        paths: &[PathBuf],
    ) -> Result<BatchReport, OrganizerError> {
        self.add_batch(main_index, sub_index, paths, BatchSource::Picked)
    }

    /// Add a drag-and-drop payload; directories and missing paths are skipped
    pub fn handle_dropped_paths(
        &mut self,
        main_index: usize,
        sub_index: usize,
        paths: &[PathBuf],
    ) -> Result<BatchReport, OrganizerError> {
        self.add_batch(main_index, sub_index, paths, BatchSource::Dropped)
    }

    fn add_batch(
        &mut self,
        main_index: usize,
        sub_index: usize,
        paths: &[PathBuf],
        source: BatchSource,
    ) -> Result<BatchReport, OrganizerError> {
        let _guard = self.span.clone().entered();
        let mut report = BatchReport::default();
        let sub = self.tree.sub_group_mut(main_index, sub_index)?;

        for path in paths {
            let added = resolve(path).and_then(|resolved| {
                let (name, len) = admit(sub, &self.stats, Path::new(&resolved), source)?;
                sub.push_file(name, len, resolved)
                    .cloned()
                    .map_err(|err| BatchWarning::Rejected {
                        path: path.clone(),
                        reason: err.to_string(),
                    })
            });
            match added {
                Ok(entry) => {
                    info!(name = %entry.name, id = entry.id, size = %entry.size, path = %entry.path, "Added file");
                    report.added.push(entry);
                }
                Err(warning) => {
                    warn!(path = %path.display(), "{warning}");
                    report.warnings.push(warning);
                }
            }
        }

        if report.added.is_empty() {
            return Ok(report);
        }

        if let Err(err) = self.store.save(&self.tree) {
            error!(error = ?err, count = report.added.len(), "Failed to save file batch, rolling back");
            let sub = self.tree.sub_group_mut(main_index, sub_index)?;
            sub.files
                .retain(|f| !report.added.iter().any(|added| added.id == f.id));
            report.save_error = Some(err);
        } else {
            info!(count = report.added.len(), skipped = report.warnings.len(), "Saved file batch");
        }
        Ok(report)
    }
}

/// Absolute UTF-8 form of a batch path, as stored in `FileEntry::path`
fn resolve(path: &Path) -> Result<String, BatchWarning> {
    let absolute = absolute_path(path).map_err(|err| BatchWarning::Unreadable {
        path: path.to_path_buf(),
        reason: err.to_string(),
    })?;
    absolute
        .into_os_string()
        .into_string()
        .map_err(|_| BatchWarning::NotUtf8 {
            path: path.to_path_buf(),
        })
}

/// Validate one path of a batch against the target sub-group
fn admit<P: FileStats>(
    sub: &SubGroup,
    stats: &P,
    path: &Path,
    source: BatchSource,
) -> Result<(String, u64), BatchWarning> {
    let stat = |path: &Path| {
        stats.stat(path).map_err(|err| BatchWarning::Unreadable {
            path: path.to_path_buf(),
            reason: err.to_string(),
        })
    };
    let name_of = |path: &Path| {
        display_name(path).ok_or_else(|| BatchWarning::NoFileName {
            path: path.to_path_buf(),
        })
    };
    let check_duplicate = |name: String| {
        if sub.has_file(&name) {
            Err(BatchWarning::Duplicate {
                name,
                path: path.to_path_buf(),
            })
        } else {
            Ok(name)
        }
    };

    match source {
        BatchSource::Picked => {
            let name = check_duplicate(name_of(path)?)?;
            let stat = stat(path)?;
            if !stat.is_file {
                return Err(BatchWarning::NotAFile {
                    path: path.to_path_buf(),
                });
            }
            Ok((name, stat.len))
        }
        BatchSource::Dropped => {
            let stat = match stats.stat(path) {
                Ok(stat) if stat.is_file => stat,
                _ => {
                    return Err(BatchWarning::NotAFile {
                        path: path.to_path_buf(),
                    });
                }
            };
            let name = check_duplicate(name_of(path)?)?;
            Ok((name, stat.len))
        }
    }
}
