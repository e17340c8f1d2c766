//! Cross-context broadcast
//!
//! Propagates a persisted update to other stores so every context
//! eventually converges on the same document.
//!
//! ## Paths
//!
//! 1. Same process: a shared [`SyncHub`] fans the envelope out to every
//!    other attached store.
//! 2. Other processes: a short-lived pulse file is written next to the
//!    document; a [`PulseWatcher`] in the other process picks it up.
//!
//! Either way the receiver re-reads the persisted document and
//! re-notifies its own subscribers. Delivery is best-effort with no
//! acknowledgment or ordering guarantee between contexts.

pub mod hub;
pub mod pulse;

pub use hub::{PeerHandle, PeerId, SyncHub};
pub use pulse::{write_pulse, PulseWatcher, PULSE_TTL};
