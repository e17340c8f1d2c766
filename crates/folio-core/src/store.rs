//! Unified content store
//!
//! The `ContentStore` owns the document and everything around it: the
//! event bus, the FIFO update queue, persistence, the change log, and
//! the broadcast wiring. It is a constructed value, not a global, so
//! independent stores never share state.
//!
//! ## Write path
//!
//! Every mutation flows through [`ContentStore::emit`]:
//!
//! 1. subscribers are notified synchronously, in registration order;
//! 2. the envelope joins the FIFO queue;
//! 3. the drain loop applies it, persists the document, appends a change
//!    record, and broadcasts it to other contexts.
//!
//! Envelopes are applied in exact enqueue order, never reordered or
//! coalesced. Failures inside the drain loop (persistence, change log,
//! broadcast) are logged and swallowed; the emit caller never sees them.
//!
//! ## Usage
//!
//! ```ignore
//! let mut store = ContentStore::open()?;
//!
//! store.emit(Update::Certificate(CollectionOp::Create {
//!     draft: CertificateDraft { name: "Rust 101".into(), ..Default::default() },
//! }));
//!
//! let certs = store.certificates();
//! ```

use std::collections::VecDeque;

use anyhow::{Context, Result};
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::apply::apply_update;
use crate::config::Config;
use crate::document::{Document, SiteContent};
use crate::events::{EventBus, SubscriptionId, Topic};
use crate::models::{
    BlogPost, Certificate, Project, SkillGroups, SocialLink, VisitorEntry,
};
use crate::storage::{ChangeLog, ChangeRecord, ContentPersistence};
use crate::sync::{pulse, PeerHandle, SyncHub};
use crate::update::{Update, UpdateEnvelope};

struct HubSeat {
    hub: SyncHub,
    peer: PeerHandle,
}

/// The content store: document, queue, bus, change log, broadcast
pub struct ContentStore {
    config: Config,
    persistence: ContentPersistence,
    document: Document,
    bus: EventBus,
    queue: VecDeque<UpdateEnvelope>,
    draining: bool,
    changelog: ChangeLog,
    /// Identifies this store instance in envelopes it emits
    origin: Uuid,
    agent: String,
    hub: Option<HubSeat>,
}

impl ContentStore {
    /// Open the store with configuration from the default location
    pub fn open() -> Result<Self> {
        let config = Config::load().context("Failed to load configuration")?;
        Self::open_with_config(config)
    }

    /// Open the store with a specific configuration
    ///
    /// On first run the starter document is seeded and persisted; on
    /// subsequent runs the stored document is loaded and merged over the
    /// defaults.
    pub fn open_with_config(config: Config) -> Result<Self> {
        let persistence = ContentPersistence::new(config.clone());
        let document = persistence
            .load_or_seed()
            .context("Failed to load or seed content document")?;
        let changelog = ChangeLog::with_path(config.changelog_path());
        let agent = config
            .agent
            .clone()
            .unwrap_or_else(|| format!("folio/{}", env!("CARGO_PKG_VERSION")));

        Ok(Self {
            config,
            persistence,
            document,
            bus: EventBus::new(),
            queue: VecDeque::new(),
            draining: false,
            changelog,
            origin: Uuid::new_v4(),
            agent,
            hub: None,
        })
    }

    /// Get the configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The id this store stamps on envelopes it emits
    pub fn origin(&self) -> Uuid {
        self.origin
    }

    // ==================== Reads ====================

    /// The current document
    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn site_content(&self) -> &SiteContent {
        &self.document.site_content
    }

    pub fn certificates(&self) -> &[Certificate] {
        &self.document.certificates
    }

    pub fn projects(&self) -> &[Project] {
        &self.document.projects
    }

    pub fn blog_posts(&self) -> &[BlogPost] {
        &self.document.blog_posts
    }

    pub fn social_links(&self) -> &[SocialLink] {
        &self.document.social_links
    }

    pub fn skills(&self) -> &SkillGroups {
        &self.document.skills
    }

    pub fn visitor_logs(&self) -> &[VisitorEntry] {
        &self.document.visitor_logs
    }

    /// The audit trail, newest first
    pub fn changelog(&self) -> &[ChangeRecord] {
        self.changelog.records()
    }

    // ==================== Writes ====================

    /// Emit an update: notify subscribers, queue, apply, persist,
    /// log, broadcast. Returns the envelope id.
    pub fn emit(&mut self, update: Update) -> Uuid {
        let envelope = UpdateEnvelope::new(self.origin, self.agent.clone(), update);
        let id = envelope.id;
        debug!(event = envelope.update.event(), action = envelope.update.action(), "emit");

        self.bus.notify(&envelope);
        self.queue.push_back(envelope);
        self.drain();
        id
    }

    /// Replace the whole document (bulk import / restore)
    ///
    /// Goes through the same pipeline as every other update, so it is
    /// persisted, logged, and broadcast like any mutation.
    pub fn replace_document(&mut self, document: Document) -> Uuid {
        self.emit(Update::Replace(document))
    }

    /// Record one site visit in the capped visitor log
    pub fn record_visit(&mut self, entry: VisitorEntry) -> Uuid {
        self.emit(Update::Visitor(entry))
    }

    /// Replace the certificates collection wholesale
    pub fn save_certificates(&mut self, certificates: Vec<Certificate>) -> Uuid {
        let mut doc = self.document.clone();
        doc.certificates = certificates;
        self.replace_document(doc)
    }

    /// Replace the projects collection wholesale
    pub fn save_projects(&mut self, projects: Vec<Project>) -> Uuid {
        let mut doc = self.document.clone();
        doc.projects = projects;
        self.replace_document(doc)
    }

    /// Replace the blog posts collection wholesale
    pub fn save_blog_posts(&mut self, blog_posts: Vec<BlogPost>) -> Uuid {
        let mut doc = self.document.clone();
        doc.blog_posts = blog_posts;
        self.replace_document(doc)
    }

    /// Replace the social links collection wholesale
    pub fn save_social_links(&mut self, social_links: Vec<SocialLink>) -> Uuid {
        let mut doc = self.document.clone();
        doc.social_links = social_links;
        self.replace_document(doc)
    }

    /// Replace the skill groups wholesale
    pub fn save_skills(&mut self, skills: SkillGroups) -> Uuid {
        let mut doc = self.document.clone();
        doc.skills = skills;
        self.replace_document(doc)
    }

    /// Replace the site content wholesale
    pub fn save_site_content(&mut self, site_content: SiteContent) -> Uuid {
        let mut doc = self.document.clone();
        doc.site_content = site_content;
        self.replace_document(doc)
    }

    // ==================== Subscriptions ====================

    /// Subscribe to one topic; handlers run synchronously on emit, in
    /// registration order
    pub fn subscribe(
        &mut self,
        topic: Topic,
        handler: impl FnMut(&UpdateEnvelope) + Send + 'static,
    ) -> SubscriptionId {
        self.bus.subscribe(topic, handler)
    }

    /// Listen to every update regardless of topic
    pub fn add_listener(
        &mut self,
        handler: impl FnMut(&UpdateEnvelope) + Send + 'static,
    ) -> SubscriptionId {
        self.bus.add_listener(handler)
    }

    /// Remove exactly the handler behind `id`
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.bus.unsubscribe(id)
    }

    // ==================== Cross-context sync ====================

    /// Attach this store to an in-process hub
    ///
    /// While attached, emitted updates are published to the hub instead
    /// of the pulse directory; updates from other peers are absorbed via
    /// [`ContentStore::poll_remote`].
    pub fn attach_hub(&mut self, hub: &SyncHub) {
        let peer = hub.attach();
        self.hub = Some(HubSeat {
            hub: hub.clone(),
            peer,
        });
    }

    /// Detach from the hub, falling back to pulse files
    pub fn detach_hub(&mut self) {
        if let Some(seat) = self.hub.take() {
            seat.hub.detach(seat.peer.id);
        }
    }

    /// Absorb updates other peers published on the hub
    ///
    /// Returns how many envelopes were absorbed.
    pub fn poll_remote(&mut self) -> usize {
        let pending = match &self.hub {
            Some(seat) => seat.peer.drain(),
            None => return 0,
        };

        let mut absorbed = 0;
        for envelope in pending {
            if self.absorb_remote(&envelope) {
                absorbed += 1;
            }
        }
        absorbed
    }

    /// Absorb one envelope received from another context
    ///
    /// Reloads the persisted document (the writer already saved it) and
    /// re-notifies local subscribers. Envelopes this store emitted
    /// itself are dropped, so broadcast echoes cannot loop.
    pub fn absorb_remote(&mut self, envelope: &UpdateEnvelope) -> bool {
        if envelope.origin == self.origin {
            return false;
        }

        match self.persistence.load() {
            Ok(Some(doc)) => self.document = doc,
            Ok(None) => {}
            Err(err) => {
                warn!(%err, "failed to reload document for remote update");
            }
        }

        self.bus.notify(envelope);
        true
    }

    // ==================== Internals ====================

    /// Apply queued envelopes one at a time, in enqueue order.
    ///
    /// Idempotent: a call while a drain is already in progress is a
    /// no-op; the running loop picks up whatever was queued meanwhile.
    fn drain(&mut self) {
        if self.draining {
            return;
        }
        self.draining = true;

        while let Some(envelope) = self.queue.pop_front() {
            apply_update(&mut self.document, &envelope);

            if let Err(err) = self.persistence.save(&self.document) {
                error!(%err, "failed to persist content document");
            }

            if let Err(err) = self.changelog.append(ChangeRecord::for_envelope(&envelope)) {
                warn!(%err, "failed to append change record");
            }

            self.broadcast(&envelope);
        }

        self.draining = false;
    }

    fn broadcast(&self, envelope: &UpdateEnvelope) {
        if let Some(seat) = &self.hub {
            seat.hub.publish(seat.peer.id, envelope);
        } else if self.config.pulse_sync {
            if let Err(err) = pulse::write_pulse(&self.config.pulse_dir(), envelope) {
                warn!(%err, "failed to write sync pulse");
            }
        }
    }
}

impl Drop for ContentStore {
    fn drop(&mut self) {
        self.detach_hub();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{CertificateDraft, CertificatePatch};
    use crate::update::CollectionOp;
    use std::sync::{Arc, Mutex};
    use tempfile::TempDir;

    fn test_config(temp_dir: &TempDir) -> Config {
        Config {
            data_dir: temp_dir.path().to_path_buf(),
            agent: None,
            pulse_sync: false,
        }
    }

    fn create_certificate(name: &str) -> Update {
        Update::Certificate(CollectionOp::Create {
            draft: CertificateDraft {
                name: name.to_string(),
                ..Default::default()
            },
        })
    }

    fn rename_certificate(id: u64, name: &str) -> Update {
        Update::Certificate(CollectionOp::Update {
            id,
            patch: CertificatePatch {
                name: Some(name.to_string()),
                ..Default::default()
            },
        })
    }

    #[test]
    fn test_open_seeds_starter_document() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let store = ContentStore::open_with_config(config.clone()).unwrap();

        assert!(config.document_path().exists());
        assert_eq!(store.certificates().len(), 2);
    }

    #[test]
    fn test_repeated_reads_are_equal() {
        let temp_dir = TempDir::new().unwrap();
        let store = ContentStore::open_with_config(test_config(&temp_dir)).unwrap();

        let first = store.document().clone();
        let second = store.document().clone();
        assert_eq!(first, second);
    }

    #[test]
    fn test_document_stable_across_reopens() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        let first = {
            let store = ContentStore::open_with_config(config.clone()).unwrap();
            store.document().clone()
        };
        let second = {
            let store = ContentStore::open_with_config(config).unwrap();
            store.document().clone()
        };

        assert_eq!(first, second);
    }

    #[test]
    fn test_create_update_delete_round_trip() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ContentStore::open_with_config(test_config(&temp_dir)).unwrap();

        store.emit(create_certificate("Temp"));
        let id = store.certificates().last().unwrap().id;

        store.emit(rename_certificate(id, "Renamed"));
        let cert = store.certificates().iter().find(|c| c.id == id).unwrap();
        assert_eq!(cert.name, "Renamed");
        assert!(cert.updated_at > cert.created_at);

        store.emit(Update::Certificate(CollectionOp::Delete { id }));
        assert!(store.certificates().iter().all(|c| c.id != id));
    }

    #[test]
    fn test_fifo_application_order() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ContentStore::open_with_config(test_config(&temp_dir)).unwrap();

        store.emit(create_certificate("Original"));
        let id = store.certificates().last().unwrap().id;

        // Two updates to the same field: the later emit wins
        store.emit(rename_certificate(id, "First"));
        store.emit(rename_certificate(id, "Second"));

        let cert = store.certificates().iter().find(|c| c.id == id).unwrap();
        assert_eq!(cert.name, "Second");
    }

    #[test]
    fn test_update_missing_id_is_noop() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ContentStore::open_with_config(test_config(&temp_dir)).unwrap();

        let before = store.document().clone();
        store.emit(rename_certificate(9999, "Ghost"));
        assert_eq!(*store.document(), before);
    }

    #[test]
    fn test_subscriber_isolation() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ContentStore::open_with_config(test_config(&temp_dir)).unwrap();
        let seen = Arc::new(Mutex::new(0));

        store.subscribe(Topic::Certificates, |_| panic!("bad subscriber"));
        {
            let seen = Arc::clone(&seen);
            store.subscribe(Topic::Certificates, move |_| {
                *seen.lock().unwrap() += 1;
            });
        }

        store.emit(create_certificate("One"));
        store.emit(create_certificate("Two"));

        assert_eq!(*seen.lock().unwrap(), 2);
    }

    #[test]
    fn test_unsubscribe_removes_only_that_handler() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ContentStore::open_with_config(test_config(&temp_dir)).unwrap();
        let seen = Arc::new(Mutex::new(Vec::new()));

        let first = {
            let seen = Arc::clone(&seen);
            store.subscribe(Topic::Certificates, move |_| {
                seen.lock().unwrap().push("a");
            })
        };
        {
            let seen = Arc::clone(&seen);
            store.subscribe(Topic::Certificates, move |_| {
                seen.lock().unwrap().push("b");
            });
        }

        assert!(store.unsubscribe(first));
        store.emit(create_certificate("X"));

        assert_eq!(*seen.lock().unwrap(), vec!["b"]);
    }

    #[test]
    fn test_subscribers_see_envelope_before_persist_effects() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ContentStore::open_with_config(test_config(&temp_dir)).unwrap();
        let events = Arc::new(Mutex::new(Vec::new()));

        {
            let events = Arc::clone(&events);
            store.add_listener(move |envelope| {
                events
                    .lock()
                    .unwrap()
                    .push(envelope.update.event().to_string());
            });
        }

        store.emit(create_certificate("X"));
        store.emit(Update::Skills(crate::update::SkillOp::AddCategory {
            category: "databases".to_string(),
        }));

        assert_eq!(
            *events.lock().unwrap(),
            vec!["certificate_updated", "skill_updated"]
        );
    }

    #[test]
    fn test_visits_recorded_newest_first() {
        // The 1000-entry cap itself is covered by the applier tests;
        // here we check the store path keeps newest-first order.
        let temp_dir = TempDir::new().unwrap();
        let mut store = ContentStore::open_with_config(test_config(&temp_dir)).unwrap();

        for i in 0..5 {
            store.record_visit(VisitorEntry::new(format!("/page/{i}"), "test"));
        }

        assert_eq!(store.visitor_logs().len(), 5);
        assert_eq!(store.visitor_logs()[0].path, "/page/4");
        assert_eq!(store.visitor_logs().last().unwrap().path, "/page/0");
    }

    #[test]
    fn test_certificate_end_to_end() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ContentStore::open_with_config(test_config(&temp_dir)).unwrap();
        assert_eq!(store.certificates().len(), 2);

        store.emit(create_certificate("X"));
        assert_eq!(store.certificates().len(), 3);

        let created = store.certificates().last().unwrap().clone();
        assert_eq!(created.id, 3);
        assert_eq!(created.created_at, created.updated_at);

        store.emit(Update::Certificate(CollectionOp::ToggleStatus {
            id: created.id,
            active: false,
        }));

        let toggled = store
            .certificates()
            .iter()
            .find(|c| c.id == created.id)
            .unwrap();
        assert!(!toggled.is_visible);
        assert!(toggled.updated_at > toggled.created_at);
    }

    #[test]
    fn test_emits_persist_across_reopen() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);

        {
            let mut store = ContentStore::open_with_config(config.clone()).unwrap();
            store.emit(create_certificate("Durable"));
        }

        let store = ContentStore::open_with_config(config).unwrap();
        assert!(store.certificates().iter().any(|c| c.name == "Durable"));
    }

    #[test]
    fn test_changelog_records_every_update() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ContentStore::open_with_config(test_config(&temp_dir)).unwrap();

        store.emit(create_certificate("X"));
        store.record_visit(VisitorEntry::new("/", "test"));

        let records = store.changelog();
        assert_eq!(records.len(), 2);
        // Newest first
        assert_eq!(records[0].event, "visitor_logged");
        assert_eq!(records[1].event, "certificate_updated");
        assert_eq!(records[1].action, "create");
    }

    #[test]
    fn test_replace_document_is_logged_and_notified() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ContentStore::open_with_config(test_config(&temp_dir)).unwrap();
        let seen = Arc::new(Mutex::new(0));

        {
            let seen = Arc::clone(&seen);
            store.subscribe(Topic::Document, move |_| {
                *seen.lock().unwrap() += 1;
            });
        }

        let mut doc = store.document().clone();
        doc.certificates.clear();
        store.replace_document(doc);

        assert!(store.certificates().is_empty());
        assert_eq!(*seen.lock().unwrap(), 1);
        assert_eq!(store.changelog()[0].event, "document_replaced");
    }

    #[test]
    fn test_save_collection_wrappers() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ContentStore::open_with_config(test_config(&temp_dir)).unwrap();

        store.save_certificates(Vec::new());
        assert!(store.certificates().is_empty());

        let mut skills = SkillGroups::new();
        skills.insert("only".to_string(), vec!["one".to_string()]);
        store.save_skills(skills);
        assert_eq!(store.skills().len(), 1);
    }

    #[test]
    fn test_hub_fan_out_between_stores() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        let hub = SyncHub::new();

        let mut writer = ContentStore::open_with_config(config.clone()).unwrap();
        let mut reader = ContentStore::open_with_config(config).unwrap();
        writer.attach_hub(&hub);
        reader.attach_hub(&hub);

        let seen = Arc::new(Mutex::new(0));
        {
            let seen = Arc::clone(&seen);
            reader.subscribe(Topic::Certificates, move |_| {
                *seen.lock().unwrap() += 1;
            });
        }

        writer.emit(create_certificate("Shared"));

        assert_eq!(reader.poll_remote(), 1);
        assert!(reader.certificates().iter().any(|c| c.name == "Shared"));
        assert_eq!(*seen.lock().unwrap(), 1);

        // The writer has nothing to absorb from its own emit
        assert_eq!(writer.poll_remote(), 0);
    }

    #[test]
    fn test_absorb_remote_ignores_own_origin() {
        let temp_dir = TempDir::new().unwrap();
        let mut store = ContentStore::open_with_config(test_config(&temp_dir)).unwrap();

        let envelope = UpdateEnvelope::new(store.origin(), "test", create_certificate("Echo"));
        assert!(!store.absorb_remote(&envelope));

        let foreign = UpdateEnvelope::new(Uuid::new_v4(), "test", create_certificate("Other"));
        assert!(store.absorb_remote(&foreign));
    }

    #[test]
    fn test_pulse_written_when_no_hub() {
        let temp_dir = TempDir::new().unwrap();
        let mut config = test_config(&temp_dir);
        config.pulse_sync = true;

        let mut store = ContentStore::open_with_config(config.clone()).unwrap();
        store.emit(create_certificate("Pulsed"));

        let pulses = std::fs::read_dir(config.pulse_dir()).unwrap().count();
        assert_eq!(pulses, 1);
    }

    #[test]
    fn test_corrupt_document_self_heals_on_open() {
        let temp_dir = TempDir::new().unwrap();
        let config = test_config(&temp_dir);
        std::fs::write(config.document_path(), "{broken").unwrap();

        let store = ContentStore::open_with_config(config.clone()).unwrap();
        assert_eq!(store.certificates().len(), 2);

        let backup = config.document_path().with_file_name("content.json.corrupt");
        assert!(backup.exists());
    }
}
