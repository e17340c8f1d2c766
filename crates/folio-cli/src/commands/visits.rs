//! Visitor log command handlers

use anyhow::Result;
use clap::Subcommand;

use folio_core::{ContentStore, VisitorEntry};

use crate::output::Output;

#[derive(Subcommand)]
pub enum VisitCommands {
    /// Show recent visits
    #[command(alias = "ls")]
    List {
        /// Maximum entries to show
        #[arg(short, long, default_value_t = 20)]
        limit: usize,
    },
    /// Record one visit
    Record {
        /// Visited path
        path: String,
        /// Referrer, if any
        #[arg(short, long)]
        referrer: Option<String>,
    },
}

pub fn handle(command: VisitCommands, store: &mut ContentStore, output: &Output) -> Result<()> {
    match command {
        VisitCommands::List { limit } => {
            let visits = store.visitor_logs();
            let shown = &visits[..visits.len().min(limit)];
            output.print_visits(shown);
            Ok(())
        }
        VisitCommands::Record { path, referrer } => {
            let mut entry = VisitorEntry::new(path.clone(), "folio-cli");
            entry.referrer = referrer;
            store.record_visit(entry);
            output.success(&format!("Recorded visit to {}", path));
            Ok(())
        }
    }
}
