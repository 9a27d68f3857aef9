//! Guard predicates for controlling transitions.
//!
//! Guards are pure boolean functions over a machine's context. A guarded
//! transition is only taken when its guard passes; otherwise the event is
//! ignored and the machine stays where it is.

use std::fmt;
use std::sync::Arc;

/// Pure predicate that decides whether a transition may run.
///
/// # Example
///
/// ```rust
/// use paged_fetch::core::Guard;
///
/// struct Counter {
///     value: u32,
/// }
///
/// let above_one = Guard::new(|c: &Counter| c.value > 1);
///
/// assert!(above_one.check(&Counter { value: 2 }));
/// assert!(!above_one.check(&Counter { value: 1 }));
/// ```
pub struct Guard<T> {
    predicate: Arc<dyn Fn(&T) -> bool + Send + Sync>,
}

impl<T> Guard<T> {
    /// Create a guard from a pure predicate function.
    pub fn new<F>(predicate: F) -> Self
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        Guard {
            predicate: Arc::new(predicate),
        }
    }

    /// A guard that always passes.
    pub fn always() -> Self {
        Self::new(|_| true)
    }

    /// Check the guard against a context value.
    pub fn check(&self, value: &T) -> bool {
        (self.predicate)(value)
    }
}

impl<T> Clone for Guard<T> {
    fn clone(&self) -> Self {
        Self {
            predicate: Arc::clone(&self.predicate),
        }
    }
}

impl<T> fmt::Debug for Guard<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Guard").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Pages {
        current: u32,
        total: u32,
    }

    #[test]
    fn guard_allows_matching_values() {
        let guard = Guard::new(|p: &Pages| p.current > 1);

        assert!(guard.check(&Pages { current: 2, total: 0 }));
        assert!(!guard.check(&Pages { current: 1, total: 0 }));
    }

    #[test]
    fn always_passes() {
        let guard = Guard::<Pages>::always();
        assert!(guard.check(&Pages { current: 1, total: 1 }));
    }

    #[test]
    fn cloned_guard_shares_predicate() {
        let guard = Guard::new(|p: &Pages| p.current < p.total);
        let cloned = guard.clone();
        let pages = Pages { current: 1, total: 2 };

        assert_eq!(guard.check(&pages), cloned.check(&pages));
    }
}
