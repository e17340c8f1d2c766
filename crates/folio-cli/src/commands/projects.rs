//! Project command handlers

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Subcommand;

use folio_core::{CollectionOp, ContentStore, ProjectDraft, ProjectPatch, Update};

use crate::output::Output;

#[derive(Subcommand)]
pub enum ProjectCommands {
    /// Create a new project
    #[command(alias = "add")]
    Create {
        /// Project title
        title: String,
        /// Short description
        #[arg(short, long, default_value = "")]
        description: String,
        /// Repository URL
        #[arg(long)]
        repo: Option<String>,
        /// Live demo URL
        #[arg(long)]
        demo: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        started: Option<NaiveDate>,
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
    /// List projects
    #[command(alias = "ls")]
    List,
    /// Edit a project (only the given fields change)
    Edit {
        /// Project id
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        repo: Option<String>,
        #[arg(long)]
        demo: Option<String>,
        /// Start date (YYYY-MM-DD)
        #[arg(long)]
        started: Option<NaiveDate>,
        /// Replace all tags
        #[arg(long)]
        tag: Option<Vec<String>>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a project
    #[command(alias = "rm")]
    Delete {
        /// Project id
        id: u64,
    },
    /// Flip a project's visibility
    Toggle {
        /// Project id
        id: u64,
    },
}

pub fn handle(command: ProjectCommands, store: &mut ContentStore, output: &Output) -> Result<()> {
    match command {
        ProjectCommands::Create {
            title,
            description,
            repo,
            demo,
            started,
            tag,
            category,
            hidden,
        } => {
            let draft = ProjectDraft {
                title,
                description,
                tags: tag,
                category: category.unwrap_or_default(),
                repo_url: repo,
                demo_url: demo,
                started_on: started,
                is_visible: !hidden,
            };
            store.emit(Update::Project(CollectionOp::Create { draft }));

            let created = store.projects().last().expect("created project should exist");
            output.success(&format!("Created project {}: {}", created.id, created.title));
            Ok(())
        }
        ProjectCommands::List => {
            output.print_projects(store.projects());
            Ok(())
        }
        ProjectCommands::Edit {
            id,
            title,
            description,
            repo,
            demo,
            started,
            tag,
            category,
        } => {
            if !store.projects().iter().any(|p| p.id == id) {
                bail!("No project with id {}", id);
            }

            let patch = ProjectPatch {
                title,
                description,
                tags: tag,
                category,
                repo_url: repo,
                demo_url: demo,
                started_on: started,
                is_visible: None,
            };
            store.emit(Update::Project(CollectionOp::Update { id, patch }));
            output.success(&format!("Updated project {}", id));
            Ok(())
        }
        ProjectCommands::Delete { id } => {
            if !store.projects().iter().any(|p| p.id == id) {
                bail!("No project with id {}", id);
            }
            store.emit(Update::Project(
                CollectionOp::<ProjectDraft, ProjectPatch>::Delete { id },
            ));
            output.success(&format!("Deleted project {}", id));
            Ok(())
        }
        ProjectCommands::Toggle { id } => {
            let Some(project) = store.projects().iter().find(|p| p.id == id) else {
                bail!("No project with id {}", id);
            };
            let active = !project.is_visible;
            store.emit(Update::Project(
                CollectionOp::<ProjectDraft, ProjectPatch>::ToggleStatus { id, active },
            ));
            output.success(&format!(
                "Project {} is now {}",
                id,
                if active { "visible" } else { "hidden" }
            ));
            Ok(())
        }
    }
}
