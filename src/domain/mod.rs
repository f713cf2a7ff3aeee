//! Domain Layer
//!
//! Core of Stylesync: the naming transform, the manifest mapping and the tree
//! reconciliation rules.
//!
//! ## Structure
//!
//! - `entities/` - Core domain entities (Entry, Manifest)
//! - `value_objects/` - Immutable value types (FilenameTemplate, FileMatcher, ContentHash)
//! - `services/` - Domain services (TreeReconciler, ManifestStore, CancelToken)
//! - `ports/` - Interface definitions for infrastructure
//!
//! All I/O goes through the traits in `ports/`.

pub mod entities;
pub mod ports;
pub mod services;
pub mod value_objects;
