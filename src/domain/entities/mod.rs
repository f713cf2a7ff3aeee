//! Domain Entities
//!
//! - `Entry` - one source-directory to output-directory mapping
//! - `Manifest` - source identity to artifact path mapping

mod entry;
mod manifest;

pub use entry::{Entry, ManifestLocation, DEFAULT_MANIFEST_FILENAME};
pub use manifest::Manifest;
