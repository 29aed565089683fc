//! Watcher service: responsibility and boundaries
//!
//! This module only drives the CLI side of the crate: it reports the current
//! facade state once, or rotates the simulated host and logs the normalized
//! change events. It MUST NOT contain any detection or normalization logic;
//! that belongs to `crate::orientation`.

mod report;
mod rotate;
mod r#trait;

pub use self::r#trait::{create_watcher, WatcherTrait};
