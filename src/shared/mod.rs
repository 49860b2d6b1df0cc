pub mod basic;

pub use basic::BasicShared;
