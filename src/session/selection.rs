//! Detail selection

use crate::catalog::ItemId;

/// Which item, if any, is open in the detail view
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Selection {
    selected: Option<ItemId>,
}

impl Selection {
    /// Show `id` in detail, replacing whatever was open
    pub fn select(&mut self, id: ItemId) {
        self.selected = Some(id);
    }

    pub fn dismiss(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<ItemId> {
        self.selected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transitions() {
        let mut selection = Selection::default();
        assert_eq!(selection.selected(), None);

        selection.select(ItemId(1));
        assert_eq!(selection.selected(), Some(ItemId(1)));

        selection.select(ItemId(2));
        assert_eq!(selection.selected(), Some(ItemId(2)));

        selection.dismiss();
        assert_eq!(selection.selected(), None);
    }
}
