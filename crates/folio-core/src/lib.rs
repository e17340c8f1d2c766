//! folio core library
//!
//! This crate provides the core functionality for folio, a local-first
//! content store for a personal portfolio site (page content,
//! certificates, projects, blog posts, social links, skills).
//!
//! # Architecture
//!
//! A single JSON document is the source of truth. Every mutation is a
//! typed [`Update`] flowing through one pipeline: synchronous subscriber
//! notification, a FIFO queue, a pure applier, atomic persistence, a
//! capped change log, and a best-effort broadcast to other contexts.
//!
//! # Quick Start
//!
//! ```text
//! let mut store = ContentStore::open()?;
//!
//! // Create a certificate
//! store.emit(Update::Certificate(CollectionOp::Create {
//!     draft: CertificateDraft { name: "Rust 101".into(), ..Default::default() },
//! }));
//!
//! // Follow changes
//! let sub = store.subscribe(Topic::Certificates, |envelope| {
//!     println!("certificates changed: {}", envelope.update.action());
//! });
//! store.unsubscribe(sub);
//! ```
//!
//! # Modules
//!
//! - `store`: unified store interface (main entry point)
//! - `document`: the root document, defaults, and merge-on-load
//! - `models`: entity records and their draft/patch companions
//! - `update`: the typed mutation vocabulary and envelopes
//! - `apply`: the pure update applier
//! - `events`: the in-process event bus
//! - `storage`: persistence and the change log
//! - `sync`: cross-context broadcast (hub + pulse files)
//! - `config`: application configuration

pub mod apply;
pub mod config;
pub mod document;
pub mod events;
pub mod models;
pub mod storage;
pub mod store;
pub mod sync;
pub mod update;

pub use apply::apply_update;
pub use config::Config;
pub use document::{merge_with_defaults, Document, SiteContent, StoredDocument, VISITOR_LOG_CAP};
pub use events::{EventBus, SubscriptionId, Topic};
pub use models::{
    BlogPost, BlogPostDraft, BlogPostPatch, Certificate, CertificateDraft, CertificatePatch,
    Entity, EntityId, FieldValue, PageFields, Project, ProjectDraft, ProjectPatch, Security,
    SkillGroups, SocialLink, SocialLinkDraft, SocialLinkPatch, VisitorEntry,
};
pub use storage::{ChangeLog, ChangeRecord, ContentPersistence, StorageError, CHANGELOG_CAP};
pub use store::ContentStore;
pub use sync::{PeerHandle, PulseWatcher, SyncHub};
pub use update::{CollectionOp, SkillOp, Update, UpdateEnvelope};
