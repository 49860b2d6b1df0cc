use std::error::Error;
use std::fmt::{Display, Formatter};

use super::UniqueId;

/// Why [`IdRegistry::register_id`](super::IdRegistry::register_id) handed out no id.
///
/// Both cases are ordinary outcomes, not bugs. Nothing was inserted into the
/// registry when either of them is returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterError {
    /// `min` was greater than `max`.
    InvalidRange { min: UniqueId, max: UniqueId },
    /// Every id in `[min, max]` is already registered.
    RangeExhausted { min: UniqueId, max: UniqueId },
}

impl RegisterError {
    /// The `(min, max)` pair of the failed request.
    pub fn range(&self) -> (UniqueId, UniqueId) {
        match *self {
            RegisterError::InvalidRange { min, max } => (min, max),
            RegisterError::RangeExhausted { min, max } => (min, max),
        }
    }
}

impl Display for RegisterError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            RegisterError::InvalidRange { min, max } => {
                write!(f, "invalid id range: min {} is greater than max {}", min, max)
            }
            RegisterError::RangeExhausted { min, max } => {
                write!(f, "no free id left in range [{}, {}]", min, max)
            }
        }
    }
}

impl Error for RegisterError {}

#[test]
fn display_names_the_range() {
    let e = RegisterError::InvalidRange { min: 5, max: 1 };
    assert_eq!(e.to_string(), "invalid id range: min 5 is greater than max 1");
    assert_eq!(e.range(), (5, 1));

    let e = RegisterError::RangeExhausted { min: -3, max: 7 };
    assert_eq!(e.to_string(), "no free id left in range [-3, 7]");
    assert_eq!(e.range(), (-3, 7));
}
