//! Which nodes or edges of a scene are selected.
//!
//! The scene keeps one [`ItemSelection`] per item kind. Entries are stable
//! item indices, so iteration is always in ascending index order, the same
//! order the scene enumerates its items in.

use std::collections::BTreeSet;

use slint::VecModel;

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ItemSelection {
    ids: BTreeSet<usize>,
}

impl ItemSelection {
    pub fn new() -> Self {
        Self::default()
    }

    /// A click on `id`. With `toggle` (Shift held) the item flips in or out
    /// of the selection, otherwise it becomes the only selected item.
    pub fn click(&mut self, id: usize, toggle: bool) {
        if !toggle {
            self.ids = BTreeSet::from([id]);
        } else if !self.ids.remove(&id) {
            self.ids.insert(id);
        }
    }

    pub fn set(&mut self, ids: impl IntoIterator<Item = usize>) {
        self.ids = ids.into_iter().collect();
    }

    /// Add to the selection, as an extending rubber band does.
    pub fn extend(&mut self, ids: impl IntoIterator<Item = usize>) {
        self.ids.extend(ids);
    }

    /// Drop an item that was removed or became inert. Returns whether it
    /// was selected.
    pub fn remove(&mut self, id: usize) -> bool {
        self.ids.remove(&id)
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }

    pub fn contains(&self, id: usize) -> bool {
        self.ids.contains(&id)
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.ids.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    /// Mirror the selection into a Slint model. Indices that do not fit an
    /// `i32` are left out.
    pub fn sync_to_model(&self, model: &VecModel<i32>) {
        let rows: Vec<i32> = self.iter().filter_map(|id| i32::try_from(id).ok()).collect();
        model.set_vec(rows);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slint::Model;

    #[test]
    fn test_click_replaces_and_toggle_flips() {
        let mut selection = ItemSelection::new();
        selection.click(4, false);
        selection.click(7, true);
        assert_eq!(selection.to_vec(), vec![4, 7]);

        selection.click(4, true);
        assert_eq!(selection.to_vec(), vec![7]);

        selection.click(2, false);
        assert_eq!(selection.to_vec(), vec![2]);
    }

    #[test]
    fn test_iteration_follows_index_order() {
        let mut selection = ItemSelection::new();
        selection.set([30, 2, 11, 2]);
        assert_eq!(selection.to_vec(), vec![2, 11, 30]);
        assert_eq!(selection.len(), 3);
    }

    #[test]
    fn test_extend_keeps_existing_entries() {
        let mut selection = ItemSelection::new();
        selection.set([5]);
        selection.extend([1, 5, 8]);
        assert_eq!(selection.to_vec(), vec![1, 5, 8]);
    }

    #[test]
    fn test_remove_reports_membership() {
        let mut selection = ItemSelection::new();
        selection.set([0, 3]);
        assert!(selection.remove(3));
        assert!(!selection.remove(3));
        assert!(selection.contains(0));
        selection.clear();
        assert!(selection.is_empty());
    }

    #[test]
    fn test_sync_to_model_overwrites_rows() {
        let mut selection = ItemSelection::new();
        selection.set([9, 2, 5]);
        let model = VecModel::from(vec![100, 200, 300, 400]);
        selection.sync_to_model(&model);
        assert_eq!(model.iter().collect::<Vec<_>>(), vec![2, 5, 9]);

        ItemSelection::new().sync_to_model(&model);
        assert_eq!(model.row_count(), 0);
    }
}
