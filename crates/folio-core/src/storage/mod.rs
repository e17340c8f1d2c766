//! Storage layer
//!
//! Handles content document persistence and the change log.
//!
//! ## Architecture
//!
//! - **content.json**: the whole document, pretty JSON, atomic writes
//! - **changelog.json**: capped newest-first audit trail of applied updates
//!
//! Loading the document always merges over the starter defaults, so a
//! partial file never reaches consumers.

pub mod changelog;
pub mod error;
pub mod persistence;

pub use changelog::{ChangeLog, ChangeRecord, CHANGELOG_CAP};
pub use error::{StorageError, StorageResult};
pub use persistence::ContentPersistence;
