//! Certificate command handlers

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Subcommand;

use folio_core::{CertificateDraft, CertificatePatch, CollectionOp, ContentStore, Update};

use crate::output::Output;

#[derive(Subcommand)]
pub enum CertificateCommands {
    /// Create a new certificate
    #[command(alias = "add")]
    Create {
        /// Certificate name
        name: String,
        /// Issuing organization
        #[arg(short, long, default_value = "")]
        issuer: String,
        /// Longer description
        #[arg(short, long)]
        description: Option<String>,
        /// Issue date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        /// Credential URL
        #[arg(long)]
        url: Option<String>,
        /// Tags to add
        #[arg(short, long)]
        tag: Vec<String>,
        /// Category
        #[arg(short, long)]
        category: Option<String>,
        /// Create hidden from the site
        #[arg(long)]
        hidden: bool,
    },
    /// List certificates
    #[command(alias = "ls")]
    List,
    /// Edit a certificate (only the given fields change)
    Edit {
        /// Certificate id
        id: u64,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        issuer: Option<String>,
        #[arg(long)]
        description: Option<String>,
        /// Issue date (YYYY-MM-DD)
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        url: Option<String>,
        /// Replace all tags
        #[arg(long)]
        tag: Option<Vec<String>>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a certificate
    #[command(alias = "rm")]
    Delete {
        /// Certificate id
        id: u64,
    },
    /// Flip a certificate's visibility
    Toggle {
        /// Certificate id
        id: u64,
    },
}

pub fn handle(
    command: CertificateCommands,
    store: &mut ContentStore,
    output: &Output,
) -> Result<()> {
    match command {
        CertificateCommands::Create {
            name,
            issuer,
            description,
            date,
            url,
            tag,
            category,
            hidden,
        } => {
            let draft = CertificateDraft {
                name,
                issuer,
                description: description.unwrap_or_default(),
                issued_on: date,
                credential_url: url,
                tags: tag,
                category: category.unwrap_or_default(),
                is_visible: !hidden,
            };
            store.emit(Update::Certificate(CollectionOp::Create { draft }));

            // Creates append, so the new entity is last
            let created = store
                .certificates()
                .last()
                .expect("created certificate should exist");
            output.success(&format!("Created certificate {}: {}", created.id, created.name));
            Ok(())
        }
        CertificateCommands::List => {
            output.print_certificates(store.certificates());
            Ok(())
        }
        CertificateCommands::Edit {
            id,
            name,
            issuer,
            description,
            date,
            url,
            tag,
            category,
        } => {
            if !store.certificates().iter().any(|c| c.id == id) {
                bail!("No certificate with id {}", id);
            }

            let patch = CertificatePatch {
                name,
                issuer,
                description,
                issued_on: date,
                credential_url: url,
                tags: tag,
                category,
                is_visible: None,
            };
            store.emit(Update::Certificate(CollectionOp::Update { id, patch }));
            output.success(&format!("Updated certificate {}", id));
            Ok(())
        }
        CertificateCommands::Delete { id } => {
            if !store.certificates().iter().any(|c| c.id == id) {
                bail!("No certificate with id {}", id);
            }
            store.emit(Update::Certificate(
                CollectionOp::<CertificateDraft, CertificatePatch>::Delete { id },
            ));
            output.success(&format!("Deleted certificate {}", id));
            Ok(())
        }
        CertificateCommands::Toggle { id } => {
            let Some(cert) = store.certificates().iter().find(|c| c.id == id) else {
                bail!("No certificate with id {}", id);
            };
            let active = !cert.is_visible;
            store.emit(Update::Certificate(
                CollectionOp::<CertificateDraft, CertificatePatch>::ToggleStatus { id, active },
            ));
            output.success(&format!(
                "Certificate {} is now {}",
                id,
                if active { "visible" } else { "hidden" }
            ));
            Ok(())
        }
    }
}
