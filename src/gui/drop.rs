//! Hover feedback for drag-and-drop onto the file list

use std::path::PathBuf;

use crate::filesystem::FileStats;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropAcceptance {
    Accept,
    /// No sub-group is selected to receive the files
    NoTarget,
    /// Nothing in the payload is a regular file
    NotFiles,
}

/// Decide whether a hovered payload would be accepted
///
/// Paths the platform does not expose while hovering count as acceptable;
/// the drop itself re-checks every path.
pub fn drop_acceptance<P: FileStats>(
    paths: &[Option<PathBuf>],
    has_target: bool,
    stats: &P,
) -> DropAcceptance {
    if !has_target {
        return DropAcceptance::NoTarget;
    }
    if paths.is_empty() || paths.iter().any(Option::is_none) {
        return DropAcceptance::Accept;
    }

    let any_file = paths
        .iter()
        .flatten()
        .any(|path| stats.stat(path).map(|stat| stat.is_file).unwrap_or(false));
    if any_file {
        DropAcceptance::Accept
    } else {
        DropAcceptance::NotFiles
    }
}

/// Where a completed drop goes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropRoute {
    /// Add to the sub-group with these main/sub ids
    Add { main: u32, sub: u32 },
    /// A dialog or notice is open; the drop is refused with a warning
    Busy,
    NoTarget,
}

pub fn route_drop(modal_open: bool, target: Option<(u32, u32)>) -> DropRoute {
    match (modal_open, target) {
        (true, _) => DropRoute::Busy,
        (false, Some((main, sub))) => DropRoute::Add { main, sub },
        (false, None) => DropRoute::NoTarget,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filesystem::StdFileStats;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_no_target_wins() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "x").unwrap();
        assert_eq!(
            drop_acceptance(&[Some(file)], false, &StdFileStats),
            DropAcceptance::NoTarget
        );
    }

    #[test]
    fn test_directory_only_payload_is_rejected() {
        let dir = TempDir::new().unwrap();
        assert_eq!(
            drop_acceptance(&[Some(dir.path().to_path_buf())], true, &StdFileStats),
            DropAcceptance::NotFiles
        );
    }

    #[test]
    fn test_mixed_payload_is_accepted() {
        let dir = TempDir::new().unwrap();
        let file = dir.path().join("a.txt");
        fs::write(&file, "x").unwrap();
        let paths = [Some(dir.path().to_path_buf()), Some(file)];
        assert_eq!(drop_acceptance(&paths, true, &StdFileStats), DropAcceptance::Accept);
    }

    #[test]
    fn test_unknown_paths_are_accepted() {
        assert_eq!(drop_acceptance(&[None], true, &StdFileStats), DropAcceptance::Accept);
    }

    #[test]
    fn test_route_drop() {
        assert_eq!(route_drop(false, Some((1, 2))), DropRoute::Add { main: 1, sub: 2 });
        assert_eq!(route_drop(false, None), DropRoute::NoTarget);
        // An open dialog refuses the drop even with a target selected
        assert_eq!(route_drop(true, Some((1, 2))), DropRoute::Busy);
        assert_eq!(route_drop(true, None), DropRoute::Busy);
    }
}
