//! Social link command handlers

use anyhow::{bail, Result};
use clap::Subcommand;

use folio_core::{CollectionOp, ContentStore, SocialLinkDraft, SocialLinkPatch, Update};

use crate::output::Output;

#[derive(Subcommand)]
pub enum SocialCommands {
    /// Add a social link
    #[command(alias = "add")]
    Create {
        /// Platform name (github, mastodon, ...)
        platform: String,
        /// Profile URL
        url: String,
        /// Display label
        #[arg(short, long)]
        label: Option<String>,
        /// Create disabled
        #[arg(long)]
        disabled: bool,
    },
    /// List social links
    #[command(alias = "ls")]
    List,
    /// Edit a social link (only the given fields change)
    Edit {
        /// Link id
        id: u64,
        #[arg(long)]
        platform: Option<String>,
        #[arg(long)]
        url: Option<String>,
        #[arg(long)]
        label: Option<String>,
    },
    /// Delete a social link
    #[command(alias = "rm")]
    Delete {
        /// Link id
        id: u64,
    },
    /// Flip a social link on or off
    Toggle {
        /// Link id
        id: u64,
    },
}

pub fn handle(command: SocialCommands, store: &mut ContentStore, output: &Output) -> Result<()> {
    match command {
        SocialCommands::Create {
            platform,
            url,
            label,
            disabled,
        } => {
            let draft = SocialLinkDraft {
                platform,
                url,
                label,
                is_active: !disabled,
            };
            store.emit(Update::SocialLink(CollectionOp::Create { draft }));

            let created = store
                .social_links()
                .last()
                .expect("created link should exist");
            output.success(&format!(
                "Created social link {}: {}",
                created.id, created.platform
            ));
            Ok(())
        }
        SocialCommands::List => {
            output.print_socials(store.social_links());
            Ok(())
        }
        SocialCommands::Edit {
            id,
            platform,
            url,
            label,
        } => {
            if !store.social_links().iter().any(|l| l.id == id) {
                bail!("No social link with id {}", id);
            }

            let patch = SocialLinkPatch {
                platform,
                url,
                label,
                is_active: None,
            };
            store.emit(Update::SocialLink(CollectionOp::Update { id, patch }));
            output.success(&format!("Updated social link {}", id));
            Ok(())
        }
        SocialCommands::Delete { id } => {
            if !store.social_links().iter().any(|l| l.id == id) {
                bail!("No social link with id {}", id);
            }
            store.emit(Update::SocialLink(
                CollectionOp::<SocialLinkDraft, SocialLinkPatch>::Delete { id },
            ));
            output.success(&format!("Deleted social link {}", id));
            Ok(())
        }
        SocialCommands::Toggle { id } => {
            let Some(link) = store.social_links().iter().find(|l| l.id == id) else {
                bail!("No social link with id {}", id);
            };
            let active = !link.is_active;
            store.emit(Update::SocialLink(
                CollectionOp::<SocialLinkDraft, SocialLinkPatch>::ToggleStatus { id, active },
            ));
            output.success(&format!(
                "Social link {} is now {}",
                id,
                if active { "active" } else { "disabled" }
            ));
            Ok(())
        }
    }
}
