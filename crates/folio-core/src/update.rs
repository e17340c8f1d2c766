//! Update vocabulary
//!
//! Every mutation of the content document is one variant of [`Update`].
//! The enum is serde-tagged on `event` (and collection operations on
//! `action`), so a serialized update reads like
//! `{"event":"certificate_updated","action":"create","draft":{...}}`.
//!
//! An [`UpdateEnvelope`] wraps an update with its id, timestamp, the
//! originating store, and the requesting agent before it enters the
//! queue or crosses to another context.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::document::Document;
use crate::events::Topic;
use crate::models::{
    BlogPostDraft, BlogPostPatch, CertificateDraft, CertificatePatch, EntityId, PageFields,
    ProjectDraft, ProjectPatch, SocialLinkDraft, SocialLinkPatch, VisitorEntry,
};

/// An operation on one entity collection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum CollectionOp<D, P> {
    /// Append a new entity; the applier assigns id and timestamps
    Create { draft: D },
    /// Shallow-merge a patch into the entity with this id.
    /// A missing id is a silent no-op.
    Update { id: EntityId, patch: P },
    /// Remove the entity with this id. A missing id is a silent no-op.
    Delete { id: EntityId },
    /// Set the display flag. A missing id is a silent no-op.
    ToggleStatus { id: EntityId, active: bool },
}

impl<D, P> CollectionOp<D, P> {
    pub fn action(&self) -> &'static str {
        match self {
            CollectionOp::Create { .. } => "create",
            CollectionOp::Update { .. } => "update",
            CollectionOp::Delete { .. } => "delete",
            CollectionOp::ToggleStatus { .. } => "toggle_status",
        }
    }
}

/// An operation on the skill groups
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum SkillOp {
    /// Append a skill to an existing category (duplicates are skipped;
    /// a missing category is a silent no-op)
    AddSkill { category: String, skill: String },
    RemoveSkill { category: String, skill: String },
    /// Replace one skill entry in place
    UpdateSkill {
        category: String,
        from: String,
        to: String,
    },
    /// Create an empty category (existing categories are left alone)
    AddCategory { category: String },
    RemoveCategory { category: String },
}

impl SkillOp {
    pub fn action(&self) -> &'static str {
        match self {
            SkillOp::AddSkill { .. } => "add_skill",
            SkillOp::RemoveSkill { .. } => "remove_skill",
            SkillOp::UpdateSkill { .. } => "update_skill",
            SkillOp::AddCategory { .. } => "add_category",
            SkillOp::RemoveCategory { .. } => "remove_category",
        }
    }
}

/// A typed mutation of the content document
///
/// One variant per event; the compiler enforces that the applier handles
/// every kind of mutation.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event")]
pub enum Update {
    #[serde(rename = "certificate_updated")]
    Certificate(CollectionOp<CertificateDraft, CertificatePatch>),
    #[serde(rename = "project_updated")]
    Project(CollectionOp<ProjectDraft, ProjectPatch>),
    #[serde(rename = "blog_updated")]
    BlogPost(CollectionOp<BlogPostDraft, BlogPostPatch>),
    #[serde(rename = "social_updated")]
    SocialLink(CollectionOp<SocialLinkDraft, SocialLinkPatch>),
    #[serde(rename = "skill_updated")]
    Skills(SkillOp),
    /// Page-level shallow merge into site content
    #[serde(rename = "site_content_updated")]
    SiteContent { pages: BTreeMap<String, PageFields> },
    /// Append one visit to the capped visitor log
    #[serde(rename = "visitor_logged")]
    Visitor(VisitorEntry),
    /// Replace the whole document (bulk restore / collection setters)
    #[serde(rename = "document_replaced")]
    Replace(Document),
}

impl Update {
    /// The bus topic this update is delivered on
    pub fn topic(&self) -> Topic {
        match self {
            Update::Certificate(_) => Topic::Certificates,
            Update::Project(_) => Topic::Projects,
            Update::BlogPost(_) => Topic::BlogPosts,
            Update::SocialLink(_) => Topic::SocialLinks,
            Update::Skills(_) => Topic::Skills,
            Update::SiteContent { .. } => Topic::SiteContent,
            Update::Visitor(_) => Topic::Visitors,
            Update::Replace(_) => Topic::Document,
        }
    }

    /// The serialized event name (matches the serde tag)
    pub fn event(&self) -> &'static str {
        match self {
            Update::Certificate(_) => "certificate_updated",
            Update::Project(_) => "project_updated",
            Update::BlogPost(_) => "blog_updated",
            Update::SocialLink(_) => "social_updated",
            Update::Skills(_) => "skill_updated",
            Update::SiteContent { .. } => "site_content_updated",
            Update::Visitor(_) => "visitor_logged",
            Update::Replace(_) => "document_replaced",
        }
    }

    /// The action within the event, for change log records
    pub fn action(&self) -> &'static str {
        match self {
            Update::Certificate(op) => op.action(),
            Update::Project(op) => op.action(),
            Update::BlogPost(op) => op.action(),
            Update::SocialLink(op) => op.action(),
            Update::Skills(op) => op.action(),
            Update::SiteContent { .. } => "merge",
            Update::Visitor(_) => "append",
            Update::Replace(_) => "replace",
        }
    }
}

/// An update enriched with identity and provenance before queueing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEnvelope {
    /// Unique id of this envelope
    pub id: Uuid,
    /// When the update was emitted; the applier stamps entity
    /// timestamps from this value
    pub recorded_at: DateTime<Utc>,
    /// The store instance that emitted the update. Receivers drop
    /// envelopes carrying their own origin.
    pub origin: Uuid,
    /// Requesting agent string, recorded in the change log
    #[serde(default)]
    pub agent: String,
    pub update: Update,
}

impl UpdateEnvelope {
    pub fn new(origin: Uuid, agent: impl Into<String>, update: Update) -> Self {
        Self {
            id: Uuid::new_v4(),
            recorded_at: Utc::now(),
            origin,
            agent: agent.into(),
            update,
        }
    }

    /// Encode to JSON for pulse files
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    /// Decode from JSON
    pub fn decode(raw: &str) -> serde_json::Result<Self> {
        serde_json::from_str(raw)
    }
}
