//! Filesystem utilities for the artifact store and run directories.
//!
//! Manifests, alias tables and blobs are always replaced atomically so a
//! crashed publish never leaves a half-written version behind.

pub mod atomic;

pub use atomic::{atomic_copy, atomic_write, atomic_write_file};
