use std::fmt::{Display, Formatter};

use log::debug;

use super::{global, IdRegistry, RegisterError, UniqueId};

/// Id of a dynamically registered event or message kind.
///
/// Ids below [`EventKind::USER`] belong to built-in kinds and are never
/// handed out here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct EventKind(UniqueId);

impl EventKind {
    /// First id available to registered kinds.
    pub const USER: UniqueId = 1000;
    /// Last id available to registered kinds.
    pub const MAX_USER: UniqueId = 65535;

    /// Registers a new kind in `registry`.
    ///
    /// When `hint` is inside the user range and still free, that exact id is
    /// taken. Otherwise the largest free id of the user range is used.
    pub fn register(registry: &IdRegistry, hint: Option<UniqueId>) -> Result<Self, RegisterError> {
        if let Some(hint) = hint {
            if (Self::USER..=Self::MAX_USER).contains(&hint) {
                // A single-value range either gives us the hint or tells us
                // it's taken, atomically.
                if let Ok(id) = registry.register_id(hint, hint) {
                    debug!("registered event kind {} (hint honoured)", id);
                    return Ok(EventKind(id));
                }
            }
        }

        let id = registry.register_id(Self::USER, Self::MAX_USER)?;
        debug!("registered event kind {}", id);
        Ok(EventKind(id))
    }

    /// [`register`](Self::register) against the process-wide registry.
    pub fn register_global(hint: Option<UniqueId>) -> Result<Self, RegisterError> {
        Self::register(global(), hint)
    }

    pub fn id(self) -> UniqueId {
        self.0
    }
}

impl From<EventKind> for UniqueId {
    fn from(kind: EventKind) -> Self {
        kind.0
    }
}

impl Display for EventKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "EventKind({})", self.0)
    }
}

#[test]
fn without_hint_starts_at_the_top() {
    let registry = IdRegistry::new();
    let a = EventKind::register(&registry, None).unwrap();
    let b = EventKind::register(&registry, None).unwrap();
    assert_eq!(a.id(), EventKind::MAX_USER);
    assert_eq!(b.id(), EventKind::MAX_USER - 1);
    assert_eq!(UniqueId::from(b), 65534);
}

#[test]
fn free_hint_is_honoured_taken_hint_falls_back() {
    let registry = IdRegistry::new();
    let first = EventKind::register(&registry, Some(2000)).unwrap();
    assert_eq!(first.id(), 2000);

    let second = EventKind::register(&registry, Some(2000)).unwrap();
    assert_eq!(second.id(), EventKind::MAX_USER);
}

#[test]
fn hint_outside_user_range_is_ignored() {
    let registry = IdRegistry::new();
    let kind = EventKind::register(&registry, Some(12)).unwrap();
    assert_eq!(kind.id(), EventKind::MAX_USER);
    assert!(!registry.is_registered(12));
}

#[test]
fn exhausted_user_range_is_an_error() {
    let registry = IdRegistry::with_reserved(EventKind::USER..=EventKind::MAX_USER);
    assert_eq!(
        EventKind::register(&registry, Some(EventKind::USER)),
        Err(RegisterError::RangeExhausted {
            min: EventKind::USER,
            max: EventKind::MAX_USER,
        })
    );
}

#[test]
fn global_kinds_are_distinct() {
    let a = EventKind::register_global(None).unwrap();
    let b = EventKind::register_global(None).unwrap();
    assert_ne!(a, b);
    assert!(global().is_registered(a.id()));
    assert!(global().is_registered(b.id()));
}
