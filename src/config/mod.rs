//! Configuration loading.

mod manifest;

pub use manifest::{Manifest, MANIFEST_FILENAME, MANIFEST_TEMPLATE};
