//! In-process event bus
//!
//! Maps topics to ordered subscriber lists. Notification is synchronous
//! and runs on the caller's turn, in registration order. A panicking
//! subscriber is isolated: the panic is caught and logged, and the
//! remaining subscribers still run.
//!
//! The bus is a plain owned value, not a module-level global, so
//! independent stores (and tests) never share listener registries.

use std::collections::HashMap;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};

use tracing::warn;

use crate::update::UpdateEnvelope;

/// The event streams a subscriber can follow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    Certificates,
    Projects,
    BlogPosts,
    SocialLinks,
    Skills,
    SiteContent,
    Visitors,
    /// Whole-document replacements
    Document,
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Topic::Certificates => "certificates",
            Topic::Projects => "projects",
            Topic::BlogPosts => "blog_posts",
            Topic::SocialLinks => "social_links",
            Topic::Skills => "skills",
            Topic::SiteContent => "site_content",
            Topic::Visitors => "visitors",
            Topic::Document => "document",
        };
        f.write_str(name)
    }
}

/// Token returned from subscribe/add_listener; pass to `unsubscribe`
/// to remove exactly that handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Handler = Box<dyn FnMut(&UpdateEnvelope) + Send>;

/// Topic-keyed subscriber registry
#[derive(Default)]
pub struct EventBus {
    next_id: u64,
    topics: HashMap<Topic, Vec<(SubscriptionId, Handler)>>,
    /// All-topics listeners, notified after topic subscribers
    listeners: Vec<(SubscriptionId, Handler)>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a handler for one topic. Handlers for a topic run in
    /// registration order on every notify.
    pub fn subscribe(
        &mut self,
        topic: Topic,
        handler: impl FnMut(&UpdateEnvelope) + Send + 'static,
    ) -> SubscriptionId {
        let id = self.allocate_id();
        self.topics
            .entry(topic)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Register a handler invoked for every envelope regardless of topic
    pub fn add_listener(
        &mut self,
        handler: impl FnMut(&UpdateEnvelope) + Send + 'static,
    ) -> SubscriptionId {
        let id = self.allocate_id();
        self.listeners.push((id, Box::new(handler)));
        id
    }

    /// Remove exactly the handler behind `id`. Returns whether a handler
    /// was removed; other handlers on the same topic are untouched.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for handlers in self.topics.values_mut() {
            if let Some(pos) = handlers.iter().position(|(hid, _)| *hid == id) {
                handlers.remove(pos);
                return true;
            }
        }
        if let Some(pos) = self.listeners.iter().position(|(hid, _)| *hid == id) {
            self.listeners.remove(pos);
            return true;
        }
        false
    }

    /// Invoke every handler registered for the envelope's topic, then
    /// every all-topics listener, synchronously and in registration
    /// order. A panicking handler is logged and skipped; notify itself
    /// never panics because of a handler.
    pub fn notify(&mut self, envelope: &UpdateEnvelope) {
        let topic = envelope.update.topic();

        if let Some(handlers) = self.topics.get_mut(&topic) {
            for (id, handler) in handlers.iter_mut() {
                if catch_unwind(AssertUnwindSafe(|| handler(envelope))).is_err() {
                    warn!(subscription = id.0, %topic, "subscriber panicked during notify");
                }
            }
        }

        for (id, handler) in self.listeners.iter_mut() {
            if catch_unwind(AssertUnwindSafe(|| handler(envelope))).is_err() {
                warn!(subscription = id.0, %topic, "listener panicked during notify");
            }
        }
    }

    /// Number of handlers registered for a topic
    pub fn subscriber_count(&self, topic: Topic) -> usize {
        self.topics.get(&topic).map_or(0, Vec::len)
    }

    /// Number of all-topics listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn allocate_id(&mut self) -> SubscriptionId {
        self.next_id += 1;
        SubscriptionId(self.next_id)
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("topics", &self.topics.len())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}
