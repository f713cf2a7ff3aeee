//! Domain Services
//!
//! - `TreeReconciler` - forward/reverse passes between a source and output tree
//! - `ManifestStore` - shared manifest bound to its repository
//! - `CancelToken` - cooperative cancellation checked between I/O operations

mod cancel;
mod manifest_store;
mod reconciler;

pub use cancel::CancelToken;
pub use manifest_store::ManifestStore;
pub use reconciler::{relative_key, ReconcileReport, TreeReconciler};
