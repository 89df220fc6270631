use std::collections::BTreeSet;

/// Photo indices marked for the next batch. Iteration is always ascending so
/// fan-out order is deterministic.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectionSet {
    indices: BTreeSet<usize>,
}

impl SelectionSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// No bounds check; callers own index validity.
    pub fn toggle(&mut self, index: usize) {
        if !self.indices.remove(&index) {
            self.indices.insert(index);
        }
    }

    pub fn clear(&mut self) {
        self.indices.clear();
    }

    pub fn contains(&self, index: usize) -> bool {
        self.indices.contains(&index)
    }

    pub fn len(&self) -> usize {
        self.indices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indices.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = usize> + '_ {
        self.indices.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<usize> {
        self.iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn double_toggle_is_noop() {
        let mut sel = SelectionSet::new();
        sel.toggle(1);
        let before = sel.clone();
        sel.toggle(4);
        sel.toggle(4);
        assert_eq!(sel, before);

        sel.toggle(1);
        assert!(sel.is_empty());
    }

    #[test]
    fn iterates_ascending_regardless_of_insert_order() {
        let mut sel = SelectionSet::new();
        for idx in [7, 2, 9, 0] {
            sel.toggle(idx);
        }
        assert_eq!(sel.to_vec(), vec![0, 2, 7, 9]);
        assert_eq!(sel.len(), 4);
        assert!(sel.contains(9));
        assert!(!sel.contains(3));
    }

    #[test]
    fn clear_empties() {
        let mut sel = SelectionSet::new();
        sel.toggle(3);
        sel.clear();
        assert!(sel.is_empty());
        assert!(!sel.contains(3));
    }
}
