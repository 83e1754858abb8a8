//! Row selection for the currently loaded page.

use std::collections::BTreeSet;

use crate::record::Record;
use crate::types::RecordId;

/// Which rows of the visible page are selected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionModel {
    selected: BTreeSet<RecordId>,
}

impl SelectionModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Flip a single row.
    pub fn toggle(&mut self, id: RecordId) {
        if !self.selected.remove(&id) {
            self.selected.insert(id);
        }
    }

    /// Select-all checkbox over the visible `ids`.
    ///
    /// Clears the selection when every visible id is already selected,
    /// otherwise selects exactly the visible ids. Calling it twice in a row
    /// therefore leaves nothing selected.
    pub fn select_all(&mut self, ids: &[RecordId]) {
        if ids.iter().all(|id| self.selected.contains(id)) {
            self.selected.clear();
        } else {
            self.selected = ids.iter().copied().collect();
        }
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    pub fn is_selected(&self, id: RecordId) -> bool {
        self.selected.contains(&id)
    }

    pub fn selected_ids(&self) -> &BTreeSet<RecordId> {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    /// Selected records among `items`, in page order.
    pub fn selected_records(&self, items: &[Record]) -> Vec<Record> {
        items
            .iter()
            .filter(|r| r.id().is_some_and(|id| self.selected.contains(&id)))
            .cloned()
            .collect()
    }

    /// Drop selected ids that are not in `visible`.
    pub fn retain_visible(&mut self, visible: &[RecordId]) {
        self.selected.retain(|id| visible.contains(id));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn ids(raw: &[i64]) -> Vec<RecordId> {
        raw.iter().copied().map(RecordId::new).collect()
    }

    #[test]
    fn select_all_twice_clears() {
        let page = ids(&[1, 2, 3]);
        let mut selection = SelectionModel::new();

        selection.select_all(&page);
        assert_eq!(selection.len(), 3);

        selection.select_all(&page);
        assert!(selection.is_empty());
    }

    #[test]
    fn select_all_with_partial_selection_selects_everything() {
        let page = ids(&[1, 2, 3]);
        let mut selection = SelectionModel::new();
        selection.toggle(RecordId::new(2));

        selection.select_all(&page);
        assert_eq!(selection.selected_ids().len(), 3);
    }

    #[test]
    fn toggle_flips_membership() {
        let mut selection = SelectionModel::new();
        selection.toggle(RecordId::new(5));
        assert!(selection.is_selected(RecordId::new(5)));
        selection.toggle(RecordId::new(5));
        assert!(!selection.is_selected(RecordId::new(5)));
    }

    #[test]
    fn retain_visible_prunes_stale_ids() {
        let mut selection = SelectionModel::new();
        selection.select_all(&ids(&[1, 2, 3]));
        selection.retain_visible(&ids(&[3, 4]));
        assert_eq!(selection.selected_ids().iter().copied().collect::<Vec<_>>(), ids(&[3]));
    }

    #[test]
    fn selected_records_follow_page_order() {
        let items: Vec<Record> = [json!({"id": 1}), json!({"id": 2}), json!({"id": 3})]
            .into_iter()
            .filter_map(Record::from_value)
            .collect();

        let mut selection = SelectionModel::new();
        selection.toggle(RecordId::new(3));
        selection.toggle(RecordId::new(1));

        let picked = selection.selected_records(&items);
        assert_eq!(picked.len(), 2);
        assert_eq!(picked[0].id(), Some(RecordId::new(1)));
        assert_eq!(picked[1].id(), Some(RecordId::new(3)));
    }
}
