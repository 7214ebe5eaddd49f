//! Shared infrastructure utilities for Reframe.
//!
//! Cross-cutting helpers that several crates need but that don't belong in
//! the domain-pure `reframe-types` crate:
//!
//! - **`atomic_write`**: Crash-safe file persistence (temp + rename)
//! - **`private_dir`**: Owner-only data directories

pub mod atomic_write;
pub mod private_dir;

pub use atomic_write::{
    AtomicWriteOptions, FileSyncPolicy, ParentDirSyncPolicy, PersistMode, atomic_write,
    atomic_write_with_options, recover_bak_file,
};
pub use private_dir::ensure_private_dir;
