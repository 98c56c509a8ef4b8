//! Deterministic scalar noise used to drive every visual effect.
//!
//! All functions here are pure: identical inputs give identical outputs on every call. There is
//! deliberately no generator state anywhere in this module.

pub(crate) mod field;

pub use field::{hash01, hash11, noise01, noise11};
