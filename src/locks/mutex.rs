use atomic_wait::{wait, wake_one};
use std::cell::UnsafeCell;
use std::ops::{Deref, DerefMut};
use std::sync::atomic::AtomicU32;
use std::sync::atomic::Ordering::{Acquire, Relaxed, Release};

const UNLOCKED: u32 = 0;
const LOCKED: u32 = 1;
const CONTENDED: u32 = 2;

/// Mutual exclusion lock that sleeps on a futex when contended.
///
/// There is no poisoning. If a thread panics while it holds the guard, the
/// guard is still dropped during unwinding and the lock is released, so the
/// data stays reachable for everybody else.
pub struct Mutex<T> {
    /// 0: unlocked
    /// 1: locked, no other threads waiting
    /// 2: locked, other threads may be waiting
    state: AtomicU32,
    value: UnsafeCell<T>,
}

unsafe impl<T> Sync for Mutex<T> where T: Send {}

pub struct MutexGuard<'a, T> {
    mutex: &'a Mutex<T>,
}

unsafe impl<T> Sync for MutexGuard<'_, T> where T: Sync {}

impl<T> Deref for MutexGuard<'_, T> {
    type Target = T;
    fn deref(&self) -> &T {
        // Safety: the guard exists, so this thread holds the lock.
        unsafe { &*self.mutex.value.get() }
    }
}

impl<T> DerefMut for MutexGuard<'_, T> {
    fn deref_mut(&mut self) -> &mut T {
        // Safety: the guard exists, so this thread holds the lock.
        unsafe { &mut *self.mutex.value.get() }
    }
}

impl<T> Mutex<T> {
    pub const fn new(value: T) -> Self {
        Self {
            state: AtomicU32::new(UNLOCKED),
            value: UnsafeCell::new(value),
        }
    }

    #[inline]
    pub fn lock(&self) -> MutexGuard<'_, T> {
        if self
            .state
            .compare_exchange(UNLOCKED, LOCKED, Acquire, Relaxed)
            .is_err()
        {
            lock_contended(&self.state);
        }
        MutexGuard { mutex: self }
    }

    /// Consumes the lock and returns the protected value.
    ///
    /// Owning the mutex means nobody can hold a guard, so no atomics are needed.
    pub fn into_inner(self) -> T {
        self.value.into_inner()
    }
}

#[cold]
fn lock_contended(state: &AtomicU32) {
    let mut spin_count = 0;

    // Plain loads keep the cache line shared while the holder finishes.
    // Only spin when nobody is sleeping yet; a 2 means spinning already
    // failed for somebody else.
    while state.load(Relaxed) == LOCKED && spin_count < 100 {
        spin_count += 1;
        std::hint::spin_loop();
    }

    if state
        .compare_exchange(UNLOCKED, LOCKED, Acquire, Relaxed)
        .is_ok()
    {
        return;
    }

    // From here on we can't tell if others are waiting, so we always leave
    // the state at 2 and let the unlocking side issue a wake.
    while state.swap(CONTENDED, Acquire) != UNLOCKED {
        wait(state, CONTENDED);
    }
}

impl<T> Drop for MutexGuard<'_, T> {
    fn drop(&mut self) {
        if self.mutex.state.swap(UNLOCKED, Release) == CONTENDED {
            wake_one(&self.mutex.state);
        }
    }
}

#[test]
fn uncontended_lock_unlock() {
    let m = Mutex::new(0);

    // Keep the compiler from optimizing the lock away.
    std::hint::black_box(&m);

    for _ in 0..100_000 {
        *m.lock() += 1;
    }
    assert_eq!(m.into_inner(), 100_000);
}

#[test]
fn contended_increments_are_not_lost() {
    use std::thread;

    let m = Mutex::new(0);
    std::hint::black_box(&m);
    thread::scope(|s| {
        for _ in 0..4 {
            s.spawn(|| {
                for _ in 0..200_000 {
                    *m.lock() += 1;
                }
            });
        }
    });

    let value = *m.lock();
    assert!(value == 200_000 * 4, "value = {}", value);
}

#[test]
fn panic_while_locked_releases_the_lock() {
    use std::thread;

    let m = Mutex::new(Vec::<i32>::new());
    thread::scope(|s| {
        let result = s
            .spawn(|| {
                let mut guard = m.lock();
                guard.push(1);
                panic!("holder panicked");
            })
            .join();
        assert!(result.is_err());
    });

    // No poisoning: the guard was dropped during unwinding.
    m.lock().push(2);
    assert_eq!(*m.lock(), vec![1, 2]);
}
