use super::{IdRegistry, RegisterResult, UniqueId};

// Built by a const constructor, so the registry exists before main runs and
// there is no first-use initialization to race on. It is never dropped.
static GLOBAL: IdRegistry = IdRegistry::new();

/// The process-wide registry.
///
/// Prefer passing an [`IdRegistry`] to the code that needs one. This accessor
/// is for ids that must be unique across the whole program without anyone
/// owning the registry, like [`EventKind`](super::EventKind)s.
pub fn global() -> &'static IdRegistry {
    &GLOBAL
}

/// [`IdRegistry::register_id`] on the [`global`] registry.
pub fn register_id(min: UniqueId, max: UniqueId) -> RegisterResult {
    GLOBAL.register_id(min, max)
}

/// [`IdRegistry::is_registered`] on the [`global`] registry.
pub fn is_registered(id: UniqueId) -> bool {
    GLOBAL.is_registered(id)
}

// Tests in this binary share the global registry, so each one keeps to a
// range nobody else uses.

#[test]
fn every_thread_sees_the_same_registry() {
    use std::thread;

    let here = global() as *const IdRegistry as usize;
    let there = thread::spawn(|| global() as *const IdRegistry as usize)
        .join()
        .unwrap();
    assert_eq!(here, there);
}

#[test]
fn free_functions_use_the_global_registry() {
    use std::thread;

    let ids: Vec<UniqueId> = thread::scope(|s| {
        let handles: Vec<_> = (0..4)
            .map(|_| s.spawn(|| register_id(-5_003, -5_000).unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    let mut sorted = ids.clone();
    sorted.sort_unstable();
    assert_eq!(sorted, vec![-5_003, -5_002, -5_001, -5_000]);
    assert!(ids.iter().all(|&id| is_registered(id) && global().is_registered(id)));
    assert!(register_id(-5_003, -5_000).is_err());
    assert!(!is_registered(-5_004));
}
