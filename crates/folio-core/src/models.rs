//! Data models for folio
//!
//! Defines the records stored in the content document: the four entity
//! collections (certificates, projects, blog posts, social links), site
//! content field values, skill groups, the security record, and visitor
//! log entries.
//!
//! Every entity type comes with a `Draft` (creation payload) and a `Patch`
//! (partial update payload). Ids and timestamps are never supplied by
//! callers; the update applier assigns them.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Identifier for an entity within its collection
pub type EntityId = u64;

/// Skill category name -> ordered list of skill entries
pub type SkillGroups = BTreeMap<String, Vec<String>>;

/// A single site content field: either one string or an ordered list
/// (e.g. the rotating descriptions on the home page).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    List(Vec<String>),
}

impl FieldValue {
    pub fn text(value: impl Into<String>) -> Self {
        FieldValue::Text(value.into())
    }

    pub fn list<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        FieldValue::List(values.into_iter().map(Into::into).collect())
    }

    /// The string value, if this field holds one
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            FieldValue::List(_) => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::Text(s.to_string())
    }
}

/// Field name -> value for one page of site content
pub type PageFields = BTreeMap<String, FieldValue>;

/// Common behavior of records in an entity collection
///
/// The applier works against this trait so create/update/delete/toggle
/// are implemented once for all four collections.
pub trait Entity {
    type Draft: Clone;
    type Patch: Clone;

    /// Build a new entity from a draft; `at` becomes both timestamps
    fn create(id: EntityId, at: DateTime<Utc>, draft: Self::Draft) -> Self;

    fn id(&self) -> EntityId;

    /// Shallow-merge a patch: `Some` fields overwrite, `None` fields keep
    fn apply_patch(&mut self, patch: Self::Patch);

    /// Set the display flag (`is_visible` / `is_active`)
    fn set_active(&mut self, active: bool);

    /// Refresh `updated_at`
    fn touch(&mut self, at: DateTime<Utc>);
}

// ==================== Certificate ====================

/// A certification or course completion shown on the site
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Certificate {
    /// Unique within the certificates collection
    pub id: EntityId,
    pub name: String,
    pub issuer: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub issued_on: Option<NaiveDate>,
    #[serde(default)]
    pub credential_url: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: String,
    pub is_visible: bool,
    /// Set by the applier at creation, never by callers
    pub created_at: DateTime<Utc>,
    /// Refreshed by the applier on every mutation
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificateDraft {
    pub name: String,
    pub issuer: String,
    pub description: String,
    pub issued_on: Option<NaiveDate>,
    pub credential_url: Option<String>,
    pub tags: Vec<String>,
    pub category: String,
    pub is_visible: bool,
}

impl Default for CertificateDraft {
    fn default() -> Self {
        Self {
            name: String::new(),
            issuer: String::new(),
            description: String::new(),
            issued_on: None,
            credential_url: None,
            tags: Vec::new(),
            category: String::new(),
            is_visible: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct CertificatePatch {
    pub name: Option<String>,
    pub issuer: Option<String>,
    pub description: Option<String>,
    pub issued_on: Option<NaiveDate>,
    pub credential_url: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub is_visible: Option<bool>,
}

impl Entity for Certificate {
    type Draft = CertificateDraft;
    type Patch = CertificatePatch;

    fn create(id: EntityId, at: DateTime<Utc>, draft: CertificateDraft) -> Self {
        Self {
            id,
            name: draft.name,
            issuer: draft.issuer,
            description: draft.description,
            issued_on: draft.issued_on,
            credential_url: draft.credential_url,
            tags: draft.tags,
            category: draft.category,
            is_visible: draft.is_visible,
            created_at: at,
            updated_at: at,
        }
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn apply_patch(&mut self, patch: CertificatePatch) {
        if let Some(v) = patch.name {
            self.name = v;
        }
        if let Some(v) = patch.issuer {
            self.issuer = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.issued_on {
            self.issued_on = Some(v);
        }
        if let Some(v) = patch.credential_url {
            self.credential_url = Some(v);
        }
        if let Some(v) = patch.tags {
            self.tags = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.is_visible {
            self.is_visible = v;
        }
    }

    fn set_active(&mut self, active: bool) {
        self.is_visible = active;
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

// ==================== Project ====================

/// A portfolio project
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Project {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub repo_url: Option<String>,
    #[serde(default)]
    pub demo_url: Option<String>,
    #[serde(default)]
    pub started_on: Option<NaiveDate>,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectDraft {
    pub title: String,
    pub description: String,
    pub tags: Vec<String>,
    pub category: String,
    pub repo_url: Option<String>,
    pub demo_url: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub is_visible: bool,
}

impl Default for ProjectDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            description: String::new(),
            tags: Vec::new(),
            category: String::new(),
            repo_url: None,
            demo_url: None,
            started_on: None,
            is_visible: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct ProjectPatch {
    pub title: Option<String>,
    pub description: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub repo_url: Option<String>,
    pub demo_url: Option<String>,
    pub started_on: Option<NaiveDate>,
    pub is_visible: Option<bool>,
}

impl Entity for Project {
    type Draft = ProjectDraft;
    type Patch = ProjectPatch;

    fn create(id: EntityId, at: DateTime<Utc>, draft: ProjectDraft) -> Self {
        Self {
            id,
            title: draft.title,
            description: draft.description,
            tags: draft.tags,
            category: draft.category,
            repo_url: draft.repo_url,
            demo_url: draft.demo_url,
            started_on: draft.started_on,
            is_visible: draft.is_visible,
            created_at: at,
            updated_at: at,
        }
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn apply_patch(&mut self, patch: ProjectPatch) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.description {
            self.description = v;
        }
        if let Some(v) = patch.tags {
            self.tags = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.repo_url {
            self.repo_url = Some(v);
        }
        if let Some(v) = patch.demo_url {
            self.demo_url = Some(v);
        }
        if let Some(v) = patch.started_on {
            self.started_on = Some(v);
        }
        if let Some(v) = patch.is_visible {
            self.is_visible = v;
        }
    }

    fn set_active(&mut self, active: bool) {
        self.is_visible = active;
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

// ==================== BlogPost ====================

/// A blog post (markdown body, rendered elsewhere)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct BlogPost {
    pub id: EntityId,
    pub title: String,
    #[serde(default)]
    pub summary: String,
    #[serde(default)]
    pub body: String,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub published_on: Option<NaiveDate>,
    pub is_visible: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPostDraft {
    pub title: String,
    pub summary: String,
    pub body: String,
    pub tags: Vec<String>,
    pub category: String,
    pub published_on: Option<NaiveDate>,
    pub is_visible: bool,
}

impl Default for BlogPostDraft {
    fn default() -> Self {
        Self {
            title: String::new(),
            summary: String::new(),
            body: String::new(),
            tags: Vec::new(),
            category: String::new(),
            published_on: None,
            is_visible: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct BlogPostPatch {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub body: Option<String>,
    pub tags: Option<Vec<String>>,
    pub category: Option<String>,
    pub published_on: Option<NaiveDate>,
    pub is_visible: Option<bool>,
}

impl Entity for BlogPost {
    type Draft = BlogPostDraft;
    type Patch = BlogPostPatch;

    fn create(id: EntityId, at: DateTime<Utc>, draft: BlogPostDraft) -> Self {
        Self {
            id,
            title: draft.title,
            summary: draft.summary,
            body: draft.body,
            tags: draft.tags,
            category: draft.category,
            published_on: draft.published_on,
            is_visible: draft.is_visible,
            created_at: at,
            updated_at: at,
        }
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn apply_patch(&mut self, patch: BlogPostPatch) {
        if let Some(v) = patch.title {
            self.title = v;
        }
        if let Some(v) = patch.summary {
            self.summary = v;
        }
        if let Some(v) = patch.body {
            self.body = v;
        }
        if let Some(v) = patch.tags {
            self.tags = v;
        }
        if let Some(v) = patch.category {
            self.category = v;
        }
        if let Some(v) = patch.published_on {
            self.published_on = Some(v);
        }
        if let Some(v) = patch.is_visible {
            self.is_visible = v;
        }
    }

    fn set_active(&mut self, active: bool) {
        self.is_visible = active;
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

// ==================== SocialLink ====================

/// A social/profile link shown in the site footer
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SocialLink {
    pub id: EntityId,
    pub platform: String,
    pub url: String,
    #[serde(default)]
    pub label: Option<String>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinkDraft {
    pub platform: String,
    pub url: String,
    pub label: Option<String>,
    pub is_active: bool,
}

impl Default for SocialLinkDraft {
    fn default() -> Self {
        Self {
            platform: String::new(),
            url: String::new(),
            label: None,
            is_active: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase", default)]
pub struct SocialLinkPatch {
    pub platform: Option<String>,
    pub url: Option<String>,
    pub label: Option<String>,
    pub is_active: Option<bool>,
}

impl Entity for SocialLink {
    type Draft = SocialLinkDraft;
    type Patch = SocialLinkPatch;

    fn create(id: EntityId, at: DateTime<Utc>, draft: SocialLinkDraft) -> Self {
        Self {
            id,
            platform: draft.platform,
            url: draft.url,
            label: draft.label,
            is_active: draft.is_active,
            created_at: at,
            updated_at: at,
        }
    }

    fn id(&self) -> EntityId {
        self.id
    }

    fn apply_patch(&mut self, patch: SocialLinkPatch) {
        if let Some(v) = patch.platform {
            self.platform = v;
        }
        if let Some(v) = patch.url {
            self.url = v;
        }
        if let Some(v) = patch.label {
            self.label = Some(v);
        }
        if let Some(v) = patch.is_active {
            self.is_active = v;
        }
    }

    fn set_active(&mut self, active: bool) {
        self.is_active = active;
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

// ==================== Security / visitors ====================

/// Admin settings carried in the document
///
/// This is document data, not an authentication mechanism.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Security {
    pub admin_secret: String,
    #[serde(default)]
    pub failed_attempts: u32,
    #[serde(default)]
    pub last_login: Option<DateTime<Utc>>,
}

impl Default for Security {
    fn default() -> Self {
        Self {
            admin_secret: "change-me".to_string(),
            failed_attempts: 0,
            last_login: None,
        }
    }
}

/// One recorded site visit
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct VisitorEntry {
    pub recorded_at: DateTime<Utc>,
    pub path: String,
    #[serde(default)]
    pub referrer: Option<String>,
    #[serde(default)]
    pub agent: String,
}

impl VisitorEntry {
    pub fn new(path: impl Into<String>, agent: impl Into<String>) -> Self {
        Self {
            recorded_at: Utc::now(),
            path: path.into(),
            referrer: None,
            agent: agent.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(secs: i64) -> DateTime<Utc> {
        DateTime::from_timestamp(secs, 0).unwrap()
    }

    #[test]
    fn test_certificate_create() {
        let draft = CertificateDraft {
            name: "Rustacean Certification".to_string(),
            issuer: "Rust Foundation".to_string(),
            ..Default::default()
        };
        let cert = Certificate::create(7, at(100), draft);

        assert_eq!(cert.id, 7);
        assert_eq!(cert.name, "Rustacean Certification");
        assert!(cert.is_visible);
        assert_eq!(cert.created_at, cert.updated_at);
    }

    #[test]
    fn test_certificate_patch_shallow_merge() {
        let mut cert = Certificate::create(1, at(100), CertificateDraft::default());
        cert.apply_patch(CertificatePatch {
            name: Some("Updated".to_string()),
            ..Default::default()
        });

        assert_eq!(cert.name, "Updated");
        // Untouched fields keep their values
        assert!(cert.is_visible);
        assert!(cert.issued_on.is_none());
    }

    #[test]
    fn test_project_toggle() {
        let mut project = Project::create(1, at(100), ProjectDraft::default());
        assert!(project.is_visible);

        project.set_active(false);
        project.touch(at(200));

        assert!(!project.is_visible);
        assert!(project.updated_at > project.created_at);
    }

    #[test]
    fn test_social_link_set_active_maps_to_is_active() {
        let mut link = SocialLink::create(1, at(100), SocialLinkDraft::default());
        link.set_active(false);
        assert!(!link.is_active);
    }

    #[test]
    fn test_field_value_untagged_serialization() {
        let text = FieldValue::text("Hello");
        let list = FieldValue::list(["a", "b"]);

        assert_eq!(serde_json::to_string(&text).unwrap(), "\"Hello\"");
        assert_eq!(serde_json::to_string(&list).unwrap(), "[\"a\",\"b\"]");

        let parsed: FieldValue = serde_json::from_str("\"Hello\"").unwrap();
        assert_eq!(parsed, text);
        let parsed: FieldValue = serde_json::from_str("[\"a\",\"b\"]").unwrap();
        assert_eq!(parsed, list);
    }

    #[test]
    fn test_certificate_serialization_camel_case() {
        let cert = Certificate::create(1, at(100), CertificateDraft::default());
        let json = serde_json::to_string(&cert).unwrap();
        assert!(json.contains("\"isVisible\""));
        assert!(json.contains("\"createdAt\""));

        let parsed: Certificate = serde_json::from_str(&json).unwrap();
        assert_eq!(parsed, cert);
    }

    #[test]
    fn test_blog_post_partial_deserialization() {
        // Stored posts may predate newer fields
        let json = r#"{
            "id": 3,
            "title": "First post",
            "isVisible": true,
            "createdAt": "2024-01-01T00:00:00Z",
            "updatedAt": "2024-01-01T00:00:00Z"
        }"#;
        let post: BlogPost = serde_json::from_str(json).unwrap();
        assert_eq!(post.id, 3);
        assert!(post.summary.is_empty());
        assert!(post.published_on.is_none());
    }

    #[test]
    fn test_security_default() {
        let security = Security::default();
        assert_eq!(security.failed_attempts, 0);
        assert!(security.last_login.is_none());
    }
}
