use std::collections::HashSet;
use std::hash::Hash;

use crate::content::ItemKey;

/// Set of units whose pronunciation guide is currently shown. Everything not
/// in the set renders masked.
#[derive(Debug, Clone)]
pub struct RevealSet<K> {
    keys: HashSet<K>,
}

impl<K: Eq + Hash> Default for RevealSet<K> {
    fn default() -> Self {
        Self {
            keys: HashSet::new(),
        }
    }
}

impl<K: Copy + Eq + Hash> RevealSet<K> {
    pub fn is_revealed(&self, key: K) -> bool {
        self.keys.contains(&key)
    }

    /// Flip one unit and return whether it is now revealed.
    pub fn toggle(&mut self, key: K) -> bool {
        if self.keys.remove(&key) {
            false
        } else {
            self.keys.insert(key);
            true
        }
    }

    pub fn clear(&mut self) {
        self.keys.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }

    pub fn len(&self) -> usize {
        self.keys.len()
    }
}

/// Per-list view state: the cursor row, the single expanded card and the
/// revealed pronunciation guides.
///
/// At most one card is expanded at a time. Reveal flags are independent of
/// expansion and survive category and level changes because they are keyed by
/// category and id.
#[derive(Debug, Clone, Default)]
pub struct ListState {
    cursor: usize,
    expanded: Option<ItemKey>,
    revealed: RevealSet<ItemKey>,
}

impl ListState {
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn expanded(&self) -> Option<ItemKey> {
        self.expanded
    }

    pub fn is_expanded(&self, key: ItemKey) -> bool {
        self.expanded == Some(key)
    }

    /// Select a card: collapse it if it is the expanded one, otherwise make it
    /// the only expanded card.
    pub fn toggle_expanded(&mut self, key: ItemKey) {
        if self.expanded == Some(key) {
            self.expanded = None;
        } else {
            self.expanded = Some(key);
        }
    }

    pub fn collapse(&mut self) {
        self.expanded = None;
    }

    pub fn is_revealed(&self, key: ItemKey) -> bool {
        self.revealed.is_revealed(key)
    }

    pub fn toggle_reveal(&mut self, key: ItemKey) -> bool {
        self.revealed.toggle(key)
    }

    pub fn revealed(&self) -> &RevealSet<ItemKey> {
        &self.revealed
    }

    /// Called when the filters change and a different list is shown.
    pub fn reset_selection(&mut self) {
        self.cursor = 0;
        self.expanded = None;
    }

    pub fn move_cursor(&mut self, offset: isize, len: usize) {
        if len == 0 {
            self.cursor = 0;
            return;
        }
        let last = len as isize - 1;
        self.cursor = (self.cursor as isize + offset).clamp(0, last) as usize;
    }

    pub fn select_first(&mut self) {
        self.cursor = 0;
    }

    pub fn select_last(&mut self, len: usize) {
        self.cursor = len.saturating_sub(1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;

    fn key(id: i64) -> ItemKey {
        ItemKey {
            category: Category::Vocabulary,
            id,
        }
    }

    #[test]
    fn cursor_stays_in_bounds() {
        let mut state = ListState::default();
        state.move_cursor(5, 3);
        assert_eq!(state.cursor(), 2);
        state.move_cursor(-10, 3);
        assert_eq!(state.cursor(), 0);
        state.select_last(4);
        assert_eq!(state.cursor(), 3);
        state.move_cursor(1, 0);
        assert_eq!(state.cursor(), 0);
    }

    #[test]
    fn reset_keeps_reveals() {
        let mut state = ListState::default();
        state.toggle_reveal(key(1));
        state.toggle_expanded(key(1));
        state.move_cursor(1, 2);
        state.reset_selection();
        assert_eq!(state.cursor(), 0);
        assert_eq!(state.expanded(), None);
        assert!(state.is_revealed(key(1)));
    }

    #[test]
    fn reveal_toggle_reports_new_state() {
        let mut set = RevealSet::default();
        assert!(set.toggle(3));
        assert!(set.is_revealed(3));
        assert!(!set.toggle(3));
        assert!(set.is_empty());
    }
}
