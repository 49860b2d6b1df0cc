use std::cell::Cell;
use std::fmt;
use std::ops::Deref;
use std::ptr::NonNull;

struct SharedData<T> {
    ref_count: Cell<usize>,
    data: T,
}

/// Shared ownership of a heap value with a plain, non-atomic reference count.
///
/// This is the cheap single-threaded sibling of `Arc`. The count is a `Cell`,
/// so cloning and dropping are ordinary increments and decrements. Holding a
/// `NonNull` makes the type neither `Send` nor `Sync`, which is what keeps
/// those non-atomic updates on one thread.
///
/// There is no null state; use `Option<BasicShared<T>>` for that.
pub struct BasicShared<T> {
    ptr: NonNull<SharedData<T>>,
}

impl<T> BasicShared<T> {
    pub fn new(data: T) -> BasicShared<T> {
        BasicShared {
            ptr: NonNull::from(Box::leak(Box::new(SharedData {
                ref_count: Cell::new(1),
                data,
            }))),
        }
    }

    fn inner(&self) -> &SharedData<T> {
        // Safety: the allocation lives as long as any BasicShared points to it.
        unsafe { self.ptr.as_ref() }
    }

    /// Number of `BasicShared`s pointing at this value.
    pub fn ref_count(this: &Self) -> usize {
        this.inner().ref_count.get()
    }

    /// Do both pointers share one allocation?
    pub fn ptr_eq(this: &Self, other: &Self) -> bool {
        this.ptr == other.ptr
    }

    // Associated function rather than a method, so it can't be confused
    // with a `get_mut` on the pointee reached through Deref.
    pub fn get_mut(this: &mut Self) -> Option<&mut T> {
        if Self::ref_count(this) == 1 {
            // Safety: we are the only owner and `this` is borrowed mutably.
            unsafe { Some(&mut this.ptr.as_mut().data) }
        } else {
            None
        }
    }

    /// Takes the value out if `this` is the only owner, otherwise gives it back.
    pub fn try_unwrap(this: Self) -> Result<T, Self> {
        if Self::ref_count(&this) != 1 {
            return Err(this);
        }
        let ptr = this.ptr;
        std::mem::forget(this);
        // Safety: the count was 1 and `this` is forgotten, so nobody else
        // can reach the allocation that came from Box::leak in `new`.
        let boxed = unsafe { Box::from_raw(ptr.as_ptr()) };
        Ok(boxed.data)
    }
}

impl<T> Deref for BasicShared<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.inner().data
    }
}

impl<T> Clone for BasicShared<T> {
    fn clone(&self) -> Self {
        let count = &self.inner().ref_count;
        // Leaking clones in a loop is the only way to get here.
        if count.get() == usize::MAX {
            std::process::abort();
        }
        count.set(count.get() + 1);
        BasicShared { ptr: self.ptr }
    }
}

impl<T> Drop for BasicShared<T> {
    fn drop(&mut self) {
        let count = &self.inner().ref_count;
        let left = count.get() - 1;
        count.set(left);
        if left == 0 {
            unsafe {
                // Reverses the Box::leak in `new`.
                drop(Box::from_raw(self.ptr.as_ptr()));
            }
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for BasicShared<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(&**self, f)
    }
}

impl<T: PartialEq> PartialEq for BasicShared<T> {
    fn eq(&self, other: &Self) -> bool {
        **self == **other
    }
}

#[test]
fn drops_once_after_last_owner() {
    thread_local! {
        static NUM_DROPS: Cell<usize> = Cell::new(0);
    }

    struct DetectDrop;

    impl Drop for DetectDrop {
        fn drop(&mut self) {
            NUM_DROPS.with(|n| n.set(n.get() + 1));
        }
    }

    let x = BasicShared::new(("hello", DetectDrop));
    let y = x.clone();
    assert!(BasicShared::ptr_eq(&x, &y));
    assert_eq!(BasicShared::ref_count(&x), 2);
    assert_eq!(y.0, "hello");

    drop(x);
    assert_eq!(NUM_DROPS.with(Cell::get), 0);
    assert_eq!(BasicShared::ref_count(&y), 1);

    drop(y);
    assert_eq!(NUM_DROPS.with(Cell::get), 1);
}

#[test]
fn get_mut_only_when_unique() {
    let mut a = BasicShared::new(vec![1, 2]);
    BasicShared::get_mut(&mut a).unwrap().push(3);

    let b = a.clone();
    assert!(BasicShared::get_mut(&mut a).is_none());
    assert_eq!(*b, vec![1, 2, 3]);

    drop(b);
    assert!(BasicShared::get_mut(&mut a).is_some());
}

#[test]
fn try_unwrap_returns_the_value_or_the_pointer() {
    let a = BasicShared::new(String::from("only"));
    let b = a.clone();

    let a = BasicShared::try_unwrap(a).unwrap_err();
    assert_eq!(BasicShared::ref_count(&a), 2);

    drop(b);
    assert_eq!(BasicShared::try_unwrap(a).unwrap(), "only");
}

#[test]
fn null_is_an_option() {
    let mut slot: Option<BasicShared<i32>> = None;
    assert!(slot.is_none());
    slot = Some(BasicShared::new(7));
    assert_eq!(slot.as_deref(), Some(&7));
}
