//! Bulk-selection state for table rows.

/// Tri-state of the "select all" header checkbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderCheck {
    All,
    Some,
    None,
}

/// Selected row keys in the order they were selected.
///
/// Selection persists across page changes; callers read it with
/// [`SelectionSet::ids`] to drive bulk actions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionSet<K> {
    selected: Vec<K>,
}

impl<K> Default for SelectionSet<K> {
    fn default() -> Self {
        Self {
            selected: Vec::new(),
        }
    }
}

impl<K: Clone + PartialEq> SelectionSet<K> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start from keys the caller already has selected.
    pub fn with_ids(ids: impl IntoIterator<Item = K>) -> Self {
        let mut set = Self::new();
        for id in ids {
            if !set.is_selected(&id) {
                set.selected.push(id);
            }
        }
        set
    }

    pub fn ids(&self) -> &[K] {
        &self.selected
    }

    pub fn len(&self) -> usize {
        self.selected.len()
    }

    pub fn is_empty(&self) -> bool {
        self.selected.is_empty()
    }

    pub fn is_selected(&self, key: &K) -> bool {
        self.selected.contains(key)
    }

    pub fn clear(&mut self) {
        self.selected.clear();
    }

    /// Add the key if absent, remove it if present.
    /// Returns whether the key is selected afterwards.
    pub fn toggle_one(&mut self, key: K) -> bool {
        if let Some(pos) = self.selected.iter().position(|k| k == &key) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(key);
            true
        }
    }

    /// Select every visible key, or deselect them all if they already are.
    ///
    /// Only `visible` is considered; keys selected on other pages are left
    /// alone. Returns whether the visible keys are selected afterwards.
    pub fn toggle_all<'a, I>(&mut self, visible: I) -> bool
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let visible: Vec<&K> = visible.into_iter().collect();
        let present = visible.iter().filter(|k| self.is_selected(k)).count();

        if present < visible.len() {
            for key in visible {
                if !self.is_selected(key) {
                    self.selected.push(key.clone());
                }
            }
            true
        } else {
            self.selected.retain(|k| !visible.contains(&k));
            false
        }
    }

    /// Header checkbox state for the visible keys.
    pub fn header_check<'a, I>(&self, visible: I) -> HeaderCheck
    where
        I: IntoIterator<Item = &'a K>,
        K: 'a,
    {
        let mut total = 0;
        let mut present = 0;
        for key in visible {
            total += 1;
            if self.is_selected(key) {
                present += 1;
            }
        }
        match present {
            0 => HeaderCheck::None,
            n if n == total => HeaderCheck::All,
            _ => HeaderCheck::Some,
        }
    }
}
