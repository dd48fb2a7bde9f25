//! # admin-surface-store
//!
//! Key-value persistence for admin surface configuration blobs.
//!
//! The [`ConfigStore`] trait is the only seam the engine talks to. Writes
//! replace a whole blob, there are no cross-key transactions and concurrent
//! writers race last-write-wins.

pub mod blob;
pub mod error;
pub mod json_file;
pub mod keys;
pub mod memory;
pub mod traits;

pub use blob::{load_blob, save_blob};
pub use error::StoreError;
pub use json_file::JsonFileStore;
pub use memory::MemoryStore;
pub use traits::ConfigStore;
