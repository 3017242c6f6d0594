//! Keeps the main-group, sub-group and file views in step with the tree
//!
//! Selections are stored as ids, so deleting an unselected sibling leaves the
//! current selection alone. After any structural change `reconcile` drops
//! selections whose entity is gone and selects index 0 of any level whose
//! parent is non-empty and has nothing selected.

use tracing::debug;

use crate::tree::{FileEntry, GroupTree, MainGroup, SubGroup};

/// One visible list row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Row {
    pub id: u32,
    pub name: String,
    pub selected: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewSync {
    main: Option<u32>,
    sub: Option<u32>,
    file: Option<u32>,
}

impl ViewSync {
    /// Start with the first main group (and its first sub-group) selected
    pub fn new(tree: &GroupTree) -> Self {
        let mut sync = Self::default();
        sync.reconcile(tree);
        sync
    }

    pub fn main_index(&self, tree: &GroupTree) -> Option<usize> {
        tree.main_index_of(self.main?)
    }

    /// Main and sub index together, the target for file operations
    pub fn sub_path(&self, tree: &GroupTree) -> Option<(usize, usize)> {
        let main = self.main_index(tree)?;
        Some((main, tree.sub_index_of(main, self.sub?)?))
    }

    pub fn selected_main<'t>(&self, tree: &'t GroupTree) -> Option<&'t MainGroup> {
        tree.main_groups.get(self.main_index(tree)?)
    }

    pub fn selected_sub<'t>(&self, tree: &'t GroupTree) -> Option<&'t SubGroup> {
        let (main, sub) = self.sub_path(tree)?;
        tree.sub_group(main, sub).ok()
    }

    pub fn selected_file<'t>(&self, tree: &'t GroupTree) -> Option<&'t FileEntry> {
        let id = self.file?;
        self.selected_sub(tree)?.files.iter().find(|f| f.id == id)
    }

    /// Select `mainGroups[index]`; refills sub-groups and clears the files
    pub fn select_main(&mut self, tree: &GroupTree, index: usize) {
        let Some(group) = tree.main_groups.get(index) else {
            debug!(index, "Ignoring selection of missing main group");
            return;
        };
        if self.main == Some(group.id) {
            return;
        }
        debug!(index, id = group.id, "Selected main group");
        self.main = Some(group.id);
        self.sub = None;
        self.file = None;
        self.reconcile(tree);
    }

    /// Select `subGroups[index]` of the selected main group; refills files
    pub fn select_sub(&mut self, tree: &GroupTree, index: usize) {
        let Some(group) = self
            .selected_main(tree)
            .and_then(|main| main.sub_groups.get(index))
        else {
            debug!(index, "Ignoring selection of missing sub-group");
            return;
        };
        if self.sub == Some(group.id) {
            return;
        }
        debug!(index, id = group.id, "Selected sub-group");
        self.sub = Some(group.id);
        self.file = None;
    }

    pub fn select_file(&mut self, tree: &GroupTree, index: usize) {
        if let Some(file) = self.selected_sub(tree).and_then(|sub| sub.files.get(index)) {
            self.file = Some(file.id);
        }
    }

    /// Re-establish the invariants after the tree changed
    pub fn reconcile(&mut self, tree: &GroupTree) {
        if self.main_index(tree).is_none() {
            self.main = tree.main_groups.first().map(|g| g.id);
            self.sub = None;
            self.file = None;
        }
        let Some(main) = self.selected_main(tree) else {
            return;
        };

        if !main.sub_groups.iter().any(|g| Some(g.id) == self.sub) {
            self.sub = main.sub_groups.first().map(|g| g.id);
            self.file = None;
        }
        if self.selected_file(tree).is_none() {
            self.file = None;
        }
    }

    pub fn main_rows(&self, tree: &GroupTree) -> Vec<Row> {
        tree.main_groups
            .iter()
            .map(|g| Row {
                id: g.id,
                name: g.name.clone(),
                selected: self.main == Some(g.id),
            })
            .collect()
    }

    pub fn sub_rows(&self, tree: &GroupTree) -> Vec<Row> {
        self.selected_main(tree)
            .map(|main| {
                main.sub_groups
                    .iter()
                    .map(|g| Row {
                        id: g.id,
                        name: g.name.clone(),
                        selected: self.sub == Some(g.id),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    pub fn file_rows(&self, tree: &GroupTree) -> Vec<Row> {
        self.selected_sub(tree)
            .map(|sub| {
                sub.files
                    .iter()
                    .map(|f| Row {
                        id: f.id,
                        name: f.name.clone(),
                        selected: self.file == Some(f.id),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names(rows: &[Row]) -> Vec<&str> {
        rows.iter().map(|r| r.name.as_str()).collect()
    }

    fn sample_tree() -> GroupTree {
        let mut tree = GroupTree::default();
        tree.add_main_group("Books").unwrap();
        tree.add_main_group("Music").unwrap();
        tree.add_sub_group(0, "Novels").unwrap();
        tree.add_sub_group(0, "Poetry").unwrap();
        tree.add_sub_group(1, "Jazz").unwrap();
        let novels = tree.sub_group_mut(0, 0).unwrap();
        novels.push_file("a.txt", 1, "/a.txt").unwrap();
        let poetry = tree.sub_group_mut(0, 1).unwrap();
        poetry.push_file("b.txt", 1, "/b.txt").unwrap();
        poetry.push_file("c.txt", 1, "/c.txt").unwrap();
        tree
    }

    #[test]
    fn test_startup_selects_first_path() {
        let tree = sample_tree();
        let sync = ViewSync::new(&tree);
        assert_eq!(sync.sub_path(&tree), Some((0, 0)));
        assert_eq!(names(&sync.sub_rows(&tree)), vec!["Novels", "Poetry"]);
        assert_eq!(names(&sync.file_rows(&tree)), vec!["a.txt"]);
    }

    #[test]
    fn test_empty_tree_has_empty_views() {
        let tree = GroupTree::default();
        let sync = ViewSync::new(&tree);
        assert_eq!(sync.main_index(&tree), None);
        assert!(sync.main_rows(&tree).is_empty());
        assert!(sync.sub_rows(&tree).is_empty());
        assert!(sync.file_rows(&tree).is_empty());
    }

    #[test]
    fn test_select_main_refills_sub_view() {
        let tree = sample_tree();
        let mut sync = ViewSync::new(&tree);
        sync.select_main(&tree, 1);
        assert_eq!(names(&sync.sub_rows(&tree)), vec!["Jazz"]);
        assert_eq!(sync.sub_path(&tree).map(|(_, sub)| sub), Some(0));
        assert!(sync.file_rows(&tree).is_empty());
    }

    #[test]
    fn test_select_sub_refills_file_view() {
        let tree = sample_tree();
        let mut sync = ViewSync::new(&tree);
        sync.select_file(&tree, 0);
        sync.select_sub(&tree, 1);
        assert_eq!(names(&sync.file_rows(&tree)), vec!["b.txt", "c.txt"]);
        assert!(sync.file_rows(&tree).iter().all(|r| !r.selected));
    }

    #[test]
    fn test_out_of_range_selection_is_ignored() {
        let tree = sample_tree();
        let mut sync = ViewSync::new(&tree);
        sync.select_main(&tree, 9);
        sync.select_sub(&tree, 9);
        assert_eq!(sync.sub_path(&tree), Some((0, 0)));
    }

    #[test]
    fn test_first_sub_group_auto_selected_after_add() {
        let mut tree = GroupTree::default();
        tree.add_main_group("Books").unwrap();
        let mut sync = ViewSync::new(&tree);
        assert_eq!(sync.sub_path(&tree), None);

        tree.add_sub_group(0, "Novels").unwrap();
        sync.reconcile(&tree);
        assert_eq!(sync.sub_path(&tree).map(|(_, sub)| sub), Some(0));
    }

    #[test]
    fn test_deleting_selected_main_selects_first_remaining() {
        let mut tree = sample_tree();
        let mut sync = ViewSync::new(&tree);
        sync.select_main(&tree, 1);
        tree.delete_main_group(1).unwrap();
        sync.reconcile(&tree);
        assert_eq!(sync.main_index(&tree), Some(0));
        assert_eq!(names(&sync.sub_rows(&tree)), vec!["Novels", "Poetry"]);
        assert_eq!(sync.sub_path(&tree).map(|(_, sub)| sub), Some(0));
    }

    #[test]
    fn test_deleting_last_main_clears_views() {
        let mut tree = GroupTree::default();
        tree.add_main_group("Only").unwrap();
        tree.add_sub_group(0, "x").unwrap();
        let mut sync = ViewSync::new(&tree);
        tree.delete_main_group(0).unwrap();
        sync.reconcile(&tree);
        assert_eq!(sync.main_index(&tree), None);
        assert!(sync.sub_rows(&tree).is_empty());
        assert!(sync.file_rows(&tree).is_empty());
    }

    #[test]
    fn test_deleting_unselected_sibling_keeps_selection() {
        let mut tree = sample_tree();
        let mut sync = ViewSync::new(&tree);
        sync.select_sub(&tree, 1);
        tree.delete_sub_group(0, 0).unwrap();
        sync.reconcile(&tree);
        // Poetry shifted to index 0 but is still the selected sub-group
        assert_eq!(sync.selected_sub(&tree).map(|s| s.name.as_str()), Some("Poetry"));
        assert_eq!(names(&sync.file_rows(&tree)), vec!["b.txt", "c.txt"]);
    }

    #[test]
    fn test_deleting_selected_file_clears_file_selection() {
        let mut tree = sample_tree();
        let mut sync = ViewSync::new(&tree);
        sync.select_file(&tree, 0);
        assert_eq!(sync.selected_file(&tree).map(|f| f.name.as_str()), Some("a.txt"));
        tree.delete_file(0, 0, "a.txt").unwrap();
        sync.reconcile(&tree);
        assert_eq!(sync.selected_file(&tree), None);
        assert_eq!(sync.sub_path(&tree).map(|(_, sub)| sub), Some(0));
    }

    #[test]
    fn test_row_selection_flags() {
        let tree = sample_tree();
        let sync = ViewSync::new(&tree);
        let rows = sync.main_rows(&tree);
        assert!(rows[0].selected);
        assert!(!rows[1].selected);
    }
}
