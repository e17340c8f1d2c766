//! In-process sync hub
//!
//! Fans a published envelope out to every attached peer except the
//! sender. This is the primary broadcast path when several stores share
//! one process; stores in other processes fall back to pulse files.
//!
//! Delivery is best-effort: there is no acknowledgment, retry, or
//! sequencing between peers. A peer that detaches (or drops its handle)
//! simply stops receiving.

use std::sync::{Arc, Mutex, MutexGuard};

use crossbeam_channel::{unbounded, Receiver, Sender};

use crate::update::UpdateEnvelope;

/// Identifier for an attached peer
pub type PeerId = u64;

#[derive(Default)]
struct HubInner {
    next_peer: PeerId,
    peers: Vec<(PeerId, Sender<UpdateEnvelope>)>,
}

/// Shared fan-out hub; clone handles freely
#[derive(Clone, Default)]
pub struct SyncHub {
    inner: Arc<Mutex<HubInner>>,
}

impl SyncHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Attach a new peer and get its receiving handle
    pub fn attach(&self) -> PeerHandle {
        let (tx, rx) = unbounded();
        let mut inner = self.lock();
        inner.next_peer += 1;
        let id = inner.next_peer;
        inner.peers.push((id, tx));
        PeerHandle { id, receiver: rx }
    }

    /// Detach a peer; it receives nothing further
    pub fn detach(&self, peer: PeerId) {
        self.lock().peers.retain(|(id, _)| *id != peer);
    }

    /// Publish an envelope to every peer except the sender
    ///
    /// Returns the number of peers the envelope was delivered to. Peers
    /// whose handle was dropped are pruned.
    pub fn publish(&self, from: PeerId, envelope: &UpdateEnvelope) -> usize {
        let mut inner = self.lock();
        let mut delivered = 0;
        inner.peers.retain(|(id, tx)| {
            if *id == from {
                return true;
            }
            match tx.send(envelope.clone()) {
                Ok(()) => {
                    delivered += 1;
                    true
                }
                // Receiver dropped without detaching
                Err(_) => false,
            }
        });
        delivered
    }

    /// Number of currently attached peers
    pub fn peer_count(&self) -> usize {
        self.lock().peers.len()
    }

    fn lock(&self) -> MutexGuard<'_, HubInner> {
        // A poisoned hub is still structurally sound; keep going
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Receiving side of a hub attachment
pub struct PeerHandle {
    pub id: PeerId,
    receiver: Receiver<UpdateEnvelope>,
}

impl PeerHandle {
    /// Take one pending envelope, if any
    pub fn try_recv(&self) -> Option<UpdateEnvelope> {
        self.receiver.try_recv().ok()
    }

    /// Take all pending envelopes, in the order they were published
    pub fn drain(&self) -> Vec<UpdateEnvelope> {
        let mut pending = Vec::new();
        while let Ok(envelope) = self.receiver.try_recv() {
            pending.push(envelope);
        }
        pending
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::update::{SkillOp, Update};
    use uuid::Uuid;

    fn envelope(category: &str) -> UpdateEnvelope {
        UpdateEnvelope::new(
            Uuid::new_v4(),
            "test",
            Update::Skills(SkillOp::AddCategory {
                category: category.to_string(),
            }),
        )
    }

    #[test]
    fn test_publish_skips_sender() {
        let hub = SyncHub::new();
        let alice = hub.attach();
        let bob = hub.attach();
        let carol = hub.attach();

        let delivered = hub.publish(alice.id, &envelope("databases"));
        assert_eq!(delivered, 2);

        assert!(alice.try_recv().is_none());
        assert!(bob.try_recv().is_some());
        assert!(carol.try_recv().is_some());
    }

    #[test]
    fn test_detach_stops_delivery() {
        let hub = SyncHub::new();
        let alice = hub.attach();
        let bob = hub.attach();
        assert_eq!(hub.peer_count(), 2);

        hub.detach(bob.id);
        assert_eq!(hub.peer_count(), 1);

        let delivered = hub.publish(alice.id, &envelope("databases"));
        assert_eq!(delivered, 0);
        assert!(bob.try_recv().is_none());
    }

    #[test]
    fn test_drain_preserves_publish_order() {
        let hub = SyncHub::new();
        let alice = hub.attach();
        let bob = hub.attach();

        hub.publish(alice.id, &envelope("one"));
        hub.publish(alice.id, &envelope("two"));
        hub.publish(alice.id, &envelope("three"));

        let pending = bob.drain();
        let categories: Vec<_> = pending
            .iter()
            .map(|e| match &e.update {
                Update::Skills(SkillOp::AddCategory { category }) => category.clone(),
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(categories, vec!["one", "two", "three"]);
        assert!(bob.try_recv().is_none());
    }

    #[test]
    fn test_dropped_handle_is_pruned() {
        let hub = SyncHub::new();
        let alice = hub.attach();
        {
            let _bob = hub.attach();
        }
        assert_eq!(hub.peer_count(), 2);

        hub.publish(alice.id, &envelope("databases"));
        assert_eq!(hub.peer_count(), 1);
    }
}
