//! Allocation of integer ids that are unique for as long as the registry lives.
//!
//! [`IdRegistry`] is an ordinary value: build one, share it by reference or
//! inside an `Arc`, and every clone of that reference sees the same set of
//! ids. Code that really wants one registry per process uses [`global`].

mod error;
pub mod event_kind;
mod process_wide;

use std::collections::BTreeSet;

use log::trace;

use crate::locks::Mutex;

pub use error::RegisterError;
pub use event_kind::EventKind;
pub use process_wide::{global, is_registered, register_id};

/// Integer token handed out by the registry.
pub type UniqueId = i32;

/// `Ok` carries the freshly registered id.
pub type RegisterResult = Result<UniqueId, RegisterError>;

/// Thread-safe set of registered ids.
///
/// Ids are never released. Once `register_id` returned a value, no later call
/// on the same registry returns it again.
pub struct IdRegistry {
    // Ordered so `snapshot` comes out sorted; membership is all the
    // allocator itself needs.
    allocated: Mutex<BTreeSet<UniqueId>>,
}

impl IdRegistry {
    pub const fn new() -> Self {
        Self {
            allocated: Mutex::new(BTreeSet::new()),
        }
    }

    /// A registry where `ids` count as registered from the start.
    ///
    /// Useful to keep well-known ids out of every future allocation.
    pub fn with_reserved(ids: impl IntoIterator<Item = UniqueId>) -> Self {
        Self {
            allocated: Mutex::new(ids.into_iter().collect()),
        }
    }

    /// Registers and returns the largest id in `[min, max]` that is still free.
    ///
    /// Fails with [`RegisterError::InvalidRange`] when `min > max` and with
    /// [`RegisterError::RangeExhausted`] when every id in the range is taken.
    /// A failed call leaves the registry untouched.
    pub fn register_id(&self, min: UniqueId, max: UniqueId) -> RegisterResult {
        if min > max {
            return Err(RegisterError::InvalidRange { min, max });
        }

        // Scan and insert under one guard, otherwise two callers could pick
        // the same free id before either of them records it.
        let mut allocated = self.allocated.lock();
        let id = (min..=max)
            .rev()
            .find(|id| !allocated.contains(id))
            .ok_or(RegisterError::RangeExhausted { min, max })?;
        allocated.insert(id);
        drop(allocated);

        trace!("registered id {} from range [{}, {}]", id, min, max);
        Ok(id)
    }

    /// Has `id` been returned by [`register_id`](Self::register_id) (or reserved)?
    pub fn is_registered(&self, id: UniqueId) -> bool {
        self.allocated.lock().contains(&id)
    }

    pub fn len(&self) -> usize {
        self.allocated.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.allocated.lock().is_empty()
    }

    /// All registered ids in ascending order, copied out under the lock.
    pub fn snapshot(&self) -> Vec<UniqueId> {
        self.allocated.lock().iter().copied().collect()
    }
}

impl Default for IdRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[test]
fn descending_tie_break() {
    let registry = IdRegistry::new();
    assert_eq!(registry.register_id(1, 10), Ok(10));
    assert_eq!(registry.register_id(1, 10), Ok(9));
    assert_eq!(registry.register_id(1, 10), Ok(8));
    assert_eq!(registry.snapshot(), vec![8, 9, 10]);
}

#[test]
fn single_value_range_exhausts() {
    let registry = IdRegistry::new();
    assert_eq!(registry.register_id(1, 1), Ok(1));
    assert_eq!(
        registry.register_id(1, 1),
        Err(RegisterError::RangeExhausted { min: 1, max: 1 })
    );
    assert_eq!(registry.len(), 1);
}

#[test]
fn invalid_range_leaves_registry_untouched() {
    let registry = IdRegistry::new();
    assert_eq!(registry.register_id(3, 3), Ok(3));

    assert_eq!(
        registry.register_id(5, 1),
        Err(RegisterError::InvalidRange { min: 5, max: 1 })
    );
    for id in 1..=5 {
        assert_eq!(registry.is_registered(id), id == 3, "id = {}", id);
    }
    assert_eq!(registry.len(), 1);
}

#[test]
fn query_consistency() {
    let registry = IdRegistry::new();
    assert!(registry.is_empty());

    let id = registry.register_id(-20, -10).unwrap();
    assert_eq!(id, -10);
    assert!(registry.is_registered(id));

    assert!(!registry.is_registered(-11));
    assert!(!registry.is_registered(0));
    assert!(!registry.is_registered(i32::MIN));
}

#[test]
fn overlapping_ranges_skip_taken_ids() {
    let registry = IdRegistry::new();
    assert_eq!(registry.register_id(0, 5), Ok(5));
    assert_eq!(registry.register_id(3, 5), Ok(4));
    assert_eq!(registry.register_id(0, 4), Ok(3));
    assert_eq!(registry.register_id(4, 5), Err(RegisterError::RangeExhausted { min: 4, max: 5 }));
    assert_eq!(registry.register_id(0, 100), Ok(100));
}

#[test]
fn reserved_ids_are_never_handed_out() {
    let registry = IdRegistry::with_reserved([10, 8]);
    assert!(registry.is_registered(10));
    assert_eq!(registry.register_id(1, 10), Ok(9));
    assert_eq!(registry.register_id(1, 10), Ok(7));
    assert_eq!(registry.snapshot(), vec![7, 8, 9, 10]);
}

#[test]
fn extreme_bounds_do_not_overflow() {
    let registry = IdRegistry::new();
    assert_eq!(registry.register_id(i32::MAX, i32::MAX), Ok(i32::MAX));
    assert_eq!(registry.register_id(i32::MIN, i32::MIN), Ok(i32::MIN));
    assert_eq!(
        registry.register_id(i32::MIN, i32::MIN),
        Err(RegisterError::RangeExhausted { min: i32::MIN, max: i32::MIN })
    );
    assert_eq!(registry.register_id(i32::MAX - 1, i32::MAX), Ok(i32::MAX - 1));
}

#[test]
fn concurrent_callers_never_share_an_id() {
    use std::thread;

    const THREADS: usize = 8;
    const PER_THREAD: usize = 250;

    let registry = IdRegistry::new();
    let mut ids: Vec<UniqueId> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                s.spawn(|| {
                    (0..PER_THREAD)
                        .map(|_| registry.register_id(0, 10_000).unwrap())
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().flat_map(|h| h.join().unwrap()).collect()
    });

    ids.sort_unstable();
    ids.dedup();
    assert_eq!(ids.len(), THREADS * PER_THREAD);
    assert!(ids.iter().all(|id| (0..=10_000).contains(id)));

    // The scan is descending, so the top of the range is used up first.
    let expected: Vec<UniqueId> = (10_000 - (THREADS * PER_THREAD) as i32 + 1..=10_000).collect();
    assert_eq!(ids, expected);
}

#[test]
fn contention_over_small_range() {
    use std::sync::Barrier;
    use std::thread;

    // N callers, M + 1 ids: exactly M + 1 winners and N - M - 1 losers.
    const N: usize = 32;
    const M: UniqueId = 9;

    let registry = IdRegistry::new();
    let barrier = Barrier::new(N);
    let results: Vec<RegisterResult> = thread::scope(|s| {
        let handles: Vec<_> = (0..N)
            .map(|_| {
                s.spawn(|| {
                    barrier.wait();
                    registry.register_id(0, M)
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let mut won: Vec<UniqueId> = results.iter().filter_map(|r| r.ok()).collect();
    let lost = results
        .iter()
        .filter(|r| **r == Err(RegisterError::RangeExhausted { min: 0, max: M }))
        .count();

    won.sort_unstable();
    assert_eq!(won, (0..=M).collect::<Vec<_>>());
    assert_eq!(lost, N - M as usize - 1);
}
