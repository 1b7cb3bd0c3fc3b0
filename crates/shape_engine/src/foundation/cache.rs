//! Single-entry memoization guarded by a dirty flag

/// A value derived from mutable inputs, recomputed only after invalidation
///
/// The owner calls [`Cached::invalidate`] whenever one of the inputs changes
/// and [`Cached::get_or_update`] when it needs the value. The recompute
/// counter lets callers observe that a read did not trigger work.
#[derive(Debug, Clone)]
pub struct Cached<T> {
    value: T,
    dirty: bool,
    recomputes: u64,
}

impl<T: Clone> Cached<T> {
    /// Create a clean cache holding `value`
    pub fn new(value: T) -> Self {
        Self {
            value,
            dirty: false,
            recomputes: 0,
        }
    }

    /// Mark the cached value as stale
    pub fn invalidate(&mut self) {
        self.dirty = true;
    }

    /// Whether the next read will recompute
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Overwrite the value and mark it clean without counting a recompute
    pub fn reset(&mut self, value: T) {
        self.value = value;
        self.dirty = false;
    }

    /// Return the value, running `compute` first if the cache is dirty
    pub fn get_or_update(&mut self, compute: impl FnOnce() -> T) -> T {
        if self.dirty {
            self.value = compute();
            self.dirty = false;
            self.recomputes += 1;
        }
        self.value.clone()
    }

    /// Last computed value, possibly stale
    pub fn peek(&self) -> &T {
        &self.value
    }

    /// Number of times `compute` has run
    pub fn recompute_count(&self) -> u64 {
        self.recomputes
    }
}

impl<T: Clone + Default> Default for Cached<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_cache_does_not_recompute() {
        let mut cache = Cached::new(7);
        let value = cache.get_or_update(|| panic!("clean cache must not recompute"));
        assert_eq!(value, 7);
        assert_eq!(cache.recompute_count(), 0);
    }

    #[test]
    fn test_invalidate_triggers_single_recompute() {
        let mut cache = Cached::new(0);
        cache.invalidate();
        assert!(cache.is_dirty());

        assert_eq!(cache.get_or_update(|| 42), 42);
        assert_eq!(cache.get_or_update(|| 99), 42);
        assert_eq!(cache.recompute_count(), 1);
        assert!(!cache.is_dirty());
    }

    #[test]
    fn test_reset_clears_dirty_flag() {
        let mut cache = Cached::new(1);
        cache.invalidate();
        cache.reset(5);

        assert!(!cache.is_dirty());
        assert_eq!(*cache.peek(), 5);
        assert_eq!(cache.recompute_count(), 0);
    }
}
