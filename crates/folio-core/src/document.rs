//! The content document
//!
//! A single root object holds everything the site renders: page content,
//! the four entity collections, skill groups, the security record, and
//! the visitor log. It is persisted as one JSON file and mutated through
//! the update applier.
//!
//! Loading always goes through [`merge_with_defaults`], so a partial or
//! older document is structurally complete after the merge: consumers
//! never have to null-check top-level fields.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::models::{
    BlogPost, BlogPostDraft, Certificate, CertificateDraft, Entity, FieldValue, PageFields,
    Project, ProjectDraft, Security, SkillGroups, SocialLink, SocialLinkDraft, VisitorEntry,
};

/// Maximum number of visitor log entries kept in the document
pub const VISITOR_LOG_CAP: usize = 1000;

/// Well-known page names in site content
pub mod pages {
    pub const HOME: &str = "home";
    pub const ABOUT: &str = "about";
    pub const CONTACT: &str = "contact";
}

/// Page name -> field map for every page of the site
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(transparent)]
pub struct SiteContent(pub BTreeMap<String, PageFields>);

impl SiteContent {
    pub fn page(&self, name: &str) -> Option<&PageFields> {
        self.0.get(name)
    }

    pub fn field(&self, page: &str, field: &str) -> Option<&FieldValue> {
        self.0.get(page).and_then(|fields| fields.get(field))
    }

    /// Set one field, creating the page if needed
    pub fn set_field(&mut self, page: &str, field: &str, value: FieldValue) {
        self.0
            .entry(page.to_string())
            .or_default()
            .insert(field.to_string(), value);
    }

    /// Page-level shallow merge: each incoming page replaces the page of
    /// the same name wholesale
    pub fn merge_pages(&mut self, pages: BTreeMap<String, PageFields>) {
        for (name, fields) in pages {
            self.0.insert(name, fields);
        }
    }

    pub fn page_names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

/// The root content document
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub site_content: SiteContent,
    pub certificates: Vec<Certificate>,
    pub projects: Vec<Project>,
    pub blog_posts: Vec<BlogPost>,
    pub social_links: Vec<SocialLink>,
    pub skills: SkillGroups,
    pub security: Security,
    /// Newest first, capped at [`VISITOR_LOG_CAP`]
    pub visitor_logs: Vec<VisitorEntry>,
}

impl Document {
    /// The canonical seeded document, used when nothing is persisted yet
    /// and as the base layer for [`merge_with_defaults`].
    pub fn starter() -> Self {
        let now = Utc::now();

        let mut site_content = SiteContent::default();
        site_content.set_field(pages::HOME, "title", FieldValue::text("Hi, I build things."));
        site_content.set_field(
            pages::HOME,
            "tagline",
            FieldValue::text("Software engineer and lifelong tinkerer"),
        );
        site_content.set_field(
            pages::HOME,
            "descriptions",
            FieldValue::list([
                "I design and ship backend systems.",
                "I write about what I learn along the way.",
                "I collect certificates like stamps.",
            ]),
        );
        site_content.set_field(
            pages::ABOUT,
            "headline",
            FieldValue::text("About me"),
        );
        site_content.set_field(
            pages::ABOUT,
            "bio",
            FieldValue::text(
                "A developer who enjoys taking systems apart to see how they work, \
                 then writing up the interesting parts.",
            ),
        );
        site_content.set_field(pages::ABOUT, "location", FieldValue::text("Somewhere remote"));
        site_content.set_field(pages::CONTACT, "heading", FieldValue::text("Get in touch"));
        site_content.set_field(
            pages::CONTACT,
            "email",
            FieldValue::text("hello@example.com"),
        );

        let certificates = vec![
            Certificate::create(
                1,
                now,
                CertificateDraft {
                    name: "Cloud Practitioner".to_string(),
                    issuer: "Amazon Web Services".to_string(),
                    description: "Foundational cloud certification".to_string(),
                    issued_on: NaiveDate::from_ymd_opt(2023, 5, 12),
                    category: "cloud".to_string(),
                    tags: vec!["aws".to_string(), "cloud".to_string()],
                    ..Default::default()
                },
            ),
            Certificate::create(
                2,
                now,
                CertificateDraft {
                    name: "Responsive Web Design".to_string(),
                    issuer: "freeCodeCamp".to_string(),
                    description: "HTML/CSS fundamentals".to_string(),
                    issued_on: NaiveDate::from_ymd_opt(2022, 11, 3),
                    category: "web".to_string(),
                    tags: vec!["css".to_string(), "html".to_string()],
                    ..Default::default()
                },
            ),
        ];

        let projects = vec![
            Project::create(
                1,
                now,
                ProjectDraft {
                    title: "Home lab dashboard".to_string(),
                    description: "Single-page overview of everything running in the rack"
                        .to_string(),
                    tags: vec!["monitoring".to_string(), "self-hosted".to_string()],
                    category: "infrastructure".to_string(),
                    repo_url: Some("https://github.com/example/homelab-dash".to_string()),
                    ..Default::default()
                },
            ),
            Project::create(
                2,
                now,
                ProjectDraft {
                    title: "Recipe scraper".to_string(),
                    description: "Turns any cooking blog into a two-line recipe".to_string(),
                    tags: vec!["scraping".to_string()],
                    category: "tools".to_string(),
                    ..Default::default()
                },
            ),
        ];

        let blog_posts = vec![BlogPost::create(
            1,
            now,
            BlogPostDraft {
                title: "Hello, world".to_string(),
                summary: "Why this site exists".to_string(),
                body: "# Hello\n\nThis site is my corner of the internet.".to_string(),
                tags: vec!["meta".to_string()],
                category: "general".to_string(),
                published_on: NaiveDate::from_ymd_opt(2024, 1, 15),
                ..Default::default()
            },
        )];

        let social_links = vec![
            SocialLink::create(
                1,
                now,
                SocialLinkDraft {
                    platform: "github".to_string(),
                    url: "https://github.com/example".to_string(),
                    ..Default::default()
                },
            ),
            SocialLink::create(
                2,
                now,
                SocialLinkDraft {
                    platform: "linkedin".to_string(),
                    url: "https://linkedin.com/in/example".to_string(),
                    ..Default::default()
                },
            ),
            SocialLink::create(
                3,
                now,
                SocialLinkDraft {
                    platform: "mastodon".to_string(),
                    url: "https://hachyderm.io/@example".to_string(),
                    label: Some("@example".to_string()),
                    ..Default::default()
                },
            ),
        ];

        let mut skills = SkillGroups::new();
        skills.insert(
            "languages".to_string(),
            vec![
                "Rust".to_string(),
                "TypeScript".to_string(),
                "Python".to_string(),
            ],
        );
        skills.insert(
            "tooling".to_string(),
            vec!["Docker".to_string(), "PostgreSQL".to_string()],
        );

        Self {
            site_content,
            certificates,
            projects,
            blog_posts,
            social_links,
            skills,
            security: Security::default(),
            visitor_logs: Vec::new(),
        }
    }
}

/// A document as read back from storage: every top-level field optional,
/// so partial or older files deserialize without error.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredDocument {
    pub site_content: Option<SiteContent>,
    pub certificates: Option<Vec<Certificate>>,
    pub projects: Option<Vec<Project>>,
    pub blog_posts: Option<Vec<BlogPost>>,
    pub social_links: Option<Vec<SocialLink>>,
    pub skills: Option<SkillGroups>,
    pub security: Option<StoredSecurity>,
    pub visitor_logs: Option<Vec<VisitorEntry>>,
}

/// Partial security record for field-by-field merging
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct StoredSecurity {
    pub admin_secret: Option<String>,
    pub failed_attempts: Option<u32>,
    pub last_login: Option<DateTime<Utc>>,
}

/// Merge a stored document over the starter defaults.
///
/// Merge policy:
/// - shallow merge at the root: a present stored field replaces the
///   default, an absent one falls back to the default verbatim;
/// - `siteContent`: page-level union, with explicit field-level merges
///   for the `home` and `about` pages (defaults first, stored overrides);
/// - `security`: field-by-field merge over the default record;
/// - array collections and `skills` are replace-not-merge: stored
///   contents are never unioned with default entries.
pub fn merge_with_defaults(stored: StoredDocument) -> Document {
    let mut doc = Document::starter();

    if let Some(content) = stored.site_content {
        doc.site_content = merge_site_content(&doc.site_content, content);
    }
    if let Some(items) = stored.certificates {
        doc.certificates = items;
    }
    if let Some(items) = stored.projects {
        doc.projects = items;
    }
    if let Some(items) = stored.blog_posts {
        doc.blog_posts = items;
    }
    if let Some(items) = stored.social_links {
        doc.social_links = items;
    }
    if let Some(skills) = stored.skills {
        doc.skills = skills;
    }
    if let Some(security) = stored.security {
        if let Some(v) = security.admin_secret {
            doc.security.admin_secret = v;
        }
        if let Some(v) = security.failed_attempts {
            doc.security.failed_attempts = v;
        }
        if let Some(v) = security.last_login {
            doc.security.last_login = Some(v);
        }
    }
    if let Some(mut logs) = stored.visitor_logs {
        logs.truncate(VISITOR_LOG_CAP);
        doc.visitor_logs = logs;
    }

    doc
}

fn merge_site_content(defaults: &SiteContent, stored: SiteContent) -> SiteContent {
    let mut merged = defaults.0.clone();
    for (name, fields) in stored.0 {
        if name == pages::HOME || name == pages::ABOUT {
            // Field-level merge: defaults first, stored values override
            merged.entry(name).or_default().extend(fields);
        } else {
            // Stored page replaces the default page wholesale
            merged.insert(name, fields);
        }
    }
    SiteContent(merged)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starter_shape() {
        let doc = Document::starter();

        assert_eq!(doc.certificates.len(), 2);
        assert_eq!(doc.projects.len(), 2);
        assert_eq!(doc.blog_posts.len(), 1);
        assert_eq!(doc.social_links.len(), 3);
        assert_eq!(doc.skills.len(), 2);
        assert!(doc.visitor_logs.is_empty());
        assert!(doc.site_content.page(pages::HOME).is_some());
        assert!(doc.site_content.page(pages::ABOUT).is_some());
    }

    #[test]
    fn test_starter_ids_unique_per_collection() {
        let doc = Document::starter();

        let mut ids: Vec<_> = doc.certificates.iter().map(|c| c.id).collect();
        ids.dedup();
        assert_eq!(ids.len(), doc.certificates.len());
    }

    #[test]
    fn test_merge_empty_is_structurally_complete() {
        let merged = merge_with_defaults(StoredDocument::default());
        let starter = Document::starter();

        // Every top-level field the factory defines is present
        assert_eq!(merged.certificates.len(), starter.certificates.len());
        assert_eq!(merged.skills.len(), starter.skills.len());
        assert_eq!(
            merged.site_content.page_names().count(),
            starter.site_content.page_names().count()
        );
        assert_eq!(merged.security.admin_secret, starter.security.admin_secret);
    }

    #[test]
    fn test_merge_parses_empty_json_object() {
        let stored: StoredDocument = serde_json::from_str("{}").unwrap();
        let merged = merge_with_defaults(stored);
        assert_eq!(merged.certificates.len(), 2);
    }

    #[test]
    fn test_arrays_replace_not_merge() {
        let starter = Document::starter();
        let one = starter.certificates[0].clone();

        let stored = StoredDocument {
            certificates: Some(vec![one.clone()]),
            ..Default::default()
        };
        let merged = merge_with_defaults(stored);

        // The stored array is taken exactly; defaults are not unioned in
        assert_eq!(merged.certificates, vec![one]);
    }

    #[test]
    fn test_empty_stored_array_wins_over_defaults() {
        let stored = StoredDocument {
            certificates: Some(Vec::new()),
            ..Default::default()
        };
        let merged = merge_with_defaults(stored);
        assert!(merged.certificates.is_empty());
    }

    #[test]
    fn test_home_page_field_merge() {
        let mut content = SiteContent::default();
        content.set_field(pages::HOME, "title", FieldValue::text("Custom title"));

        let stored = StoredDocument {
            site_content: Some(content),
            ..Default::default()
        };
        let merged = merge_with_defaults(stored);

        // Stored field overrides the default
        assert_eq!(
            merged.site_content.field(pages::HOME, "title"),
            Some(&FieldValue::text("Custom title"))
        );
        // Default fields the stored page lacked are still present
        assert!(merged.site_content.field(pages::HOME, "descriptions").is_some());
    }

    #[test]
    fn test_non_home_page_replaced_wholesale() {
        let mut content = SiteContent::default();
        content.set_field(pages::CONTACT, "heading", FieldValue::text("Say hi"));

        let stored = StoredDocument {
            site_content: Some(content),
            ..Default::default()
        };
        let merged = merge_with_defaults(stored);

        let contact = merged.site_content.page(pages::CONTACT).unwrap();
        assert_eq!(contact.len(), 1);
        assert!(contact.get("email").is_none());
    }

    #[test]
    fn test_security_field_merge() {
        let stored = StoredDocument {
            security: Some(StoredSecurity {
                failed_attempts: Some(3),
                ..Default::default()
            }),
            ..Default::default()
        };
        let merged = merge_with_defaults(stored);

        assert_eq!(merged.security.failed_attempts, 3);
        // Missing fields keep their defaults
        assert_eq!(merged.security.admin_secret, Security::default().admin_secret);
    }

    #[test]
    fn test_visitor_logs_capped_at_load() {
        let logs: Vec<_> = (0..VISITOR_LOG_CAP + 50)
            .map(|i| VisitorEntry::new(format!("/page/{i}"), "test"))
            .collect();

        let stored = StoredDocument {
            visitor_logs: Some(logs),
            ..Default::default()
        };
        let merged = merge_with_defaults(stored);

        assert_eq!(merged.visitor_logs.len(), VISITOR_LOG_CAP);
        // Newest-first order means the front entries survive
        assert_eq!(merged.visitor_logs[0].path, "/page/0");
    }

    #[test]
    fn test_document_round_trip() {
        let doc = Document::starter();
        let json = serde_json::to_string_pretty(&doc).unwrap();
        assert!(json.contains("\"siteContent\""));
        assert!(json.contains("\"blogPosts\""));

        let stored: StoredDocument = serde_json::from_str(&json).unwrap();
        let merged = merge_with_defaults(stored);
        assert_eq!(merged, doc);
    }
}
