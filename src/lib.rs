//! Process-unique integer ids and the small utilities that travel with them.
//!
//! The core is [`registry::IdRegistry`]: a lock-protected set of allocated ids
//! that hands out the largest free value of a requested range. Everything else
//! in the crate is supporting material:
//!
//! - [`locks`] holds the futex based mutex the registry is built on.
//! - [`shared`] holds a single-threaded reference-counted pointer.
//! - [`editing`] holds the quantity-editor and selection-model capabilities.

pub mod editing;
pub mod locks;
pub mod registry;
pub mod shared;

pub use registry::{global, EventKind, IdRegistry, RegisterError, RegisterResult, UniqueId};
