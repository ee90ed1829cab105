//! Filesystem helpers shared by the catalog cache and the mapping store.

pub mod atomic;
pub(crate) mod lock;
