//! Insertion-ordered entity pools with deferred removal
//!
//! Collision scans only mark entities; the pool is compacted once, after the
//! scan, so nothing is skipped or matched twice while iterating.

/// Owning container for one entity kind
#[derive(Debug, Clone)]
pub struct Pool<T> {
    items: Vec<T>,
    marked: Vec<bool>,
}

impl<T> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Pool<T> {
    pub fn new() -> Self {
        Self {
            items: Vec::new(),
            marked: Vec::new(),
        }
    }

    pub fn push(&mut self, item: T) {
        self.items.push(item);
        self.marked.push(false);
    }

    pub fn extend(&mut self, items: impl IntoIterator<Item = T>) {
        for item in items {
            self.push(item);
        }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, T> {
        self.items.iter_mut()
    }

    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Flag an entity for removal at the next `compact`. Idempotent.
    pub fn mark(&mut self, index: usize) {
        if let Some(flag) = self.marked.get_mut(index) {
            *flag = true;
        }
    }

    pub fn is_marked(&self, index: usize) -> bool {
        self.marked.get(index).copied().unwrap_or(false)
    }

    /// Entities not yet marked for removal, with their indices
    pub fn live(&self) -> impl Iterator<Item = (usize, &T)> {
        self.items
            .iter()
            .enumerate()
            .filter(|(i, _)| !self.marked[*i])
    }

    /// Drop every marked entity, preserving the order of the rest.
    /// Returns how many were removed.
    pub fn compact(&mut self) -> usize {
        let before = self.items.len();
        let mut flags = std::mem::take(&mut self.marked).into_iter();
        self.items.retain(|_| !flags.next().unwrap_or(false));
        self.marked = vec![false; self.items.len()];
        before - self.items.len()
    }

    /// Mark every entity matching the predicate, then compact
    pub fn remove_where(&mut self, mut pred: impl FnMut(&T) -> bool) -> usize {
        for (item, flag) in self.items.iter().zip(self.marked.iter_mut()) {
            if pred(item) {
                *flag = true;
            }
        }
        self.compact()
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.marked.clear();
    }
}

impl<'a, T> IntoIterator for &'a Pool<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl<T> FromIterator<T> for Pool<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut pool = Self::new();
        pool.extend(iter);
        pool
    }
}
