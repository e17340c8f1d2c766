//! Watch command handler
//!
//! Follows the pulse directory and absorbs updates written by other
//! folio processes, printing each one as it lands.

use anyhow::Result;
use tracing::debug;

use folio_core::{ContentStore, PulseWatcher};

use crate::output::Output;

/// Follow updates until interrupted
pub fn run(store: &mut ContentStore, output: &Output) -> Result<()> {
    let dir = store.config().pulse_dir();

    let (tx, rx) = crossbeam_channel::unbounded();
    let _watcher = PulseWatcher::spawn(dir, move |envelope| {
        let _ = tx.send(envelope);
    })?;

    output.message("Watching for updates (Ctrl-C to stop)...");

    loop {
        let envelope = rx.recv()?;
        if !store.absorb_remote(&envelope) {
            debug!(id = %envelope.id, "skipping own pulse");
            continue;
        }

        if output.is_json() {
            println!("{}", envelope.encode()?);
        } else {
            output.message(&format!(
                "[{}] {} {} from {}",
                envelope.recorded_at.format("%H:%M:%S"),
                envelope.update.event(),
                envelope.update.action(),
                envelope.agent
            ));
        }
    }
}
