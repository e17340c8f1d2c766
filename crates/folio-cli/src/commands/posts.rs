//! Blog post command handlers

use anyhow::{bail, Result};
use chrono::NaiveDate;
use clap::Subcommand;

use folio_core::{BlogPostDraft, BlogPostPatch, CollectionOp, ContentStore, Update};

use crate::output::Output;

#[derive(Subcommand)]
pub enum PostCommands {
    /// Create a new blog post
    #[command(alias = "add")]
    Create {
        /// Post title
        title: String,
        /// One-line summary
        #[arg(short, long, default_value = "")]
        summary: String,
        /// Post body (markdown)
        #[arg(short, long, default_value = "")]
        body: String,
        /// Publication date (YYYY-MM-DD); omit for a draft
        #[arg(long)]
        published: Option<NaiveDate>,
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
    /// List blog posts
    #[command(alias = "ls")]
    List,
    /// Edit a post (only the given fields change)
    Edit {
        /// Post id
        id: u64,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        summary: Option<String>,
        #[arg(long)]
        body: Option<String>,
        /// Publication date (YYYY-MM-DD)
        #[arg(long)]
        published: Option<NaiveDate>,
        /// Replace all tags
        #[arg(long)]
        tag: Option<Vec<String>>,
        #[arg(long)]
        category: Option<String>,
    },
    /// Delete a post
    #[command(alias = "rm")]
    Delete {
        /// Post id
        id: u64,
    },
    /// Flip a post's visibility
    Toggle {
        /// Post id
        id: u64,
    },
}

pub fn handle(command: PostCommands, store: &mut ContentStore, output: &Output) -> Result<()> {
    match command {
        PostCommands::Create {
            title,
            summary,
            body,
            published,
            tag,
            category,
            hidden,
        } => {
            let draft = BlogPostDraft {
                title,
                summary,
                body,
                tags: tag,
                category: category.unwrap_or_default(),
                published_on: published,
                is_visible: !hidden,
            };
            store.emit(Update::BlogPost(CollectionOp::Create { draft }));

            let created = store.blog_posts().last().expect("created post should exist");
            output.success(&format!("Created post {}: {}", created.id, created.title));
            Ok(())
        }
        PostCommands::List => {
            output.print_posts(store.blog_posts());
            Ok(())
        }
        PostCommands::Edit {
            id,
            title,
            summary,
            body,
            published,
            tag,
            category,
        } => {
            if !store.blog_posts().iter().any(|p| p.id == id) {
                bail!("No post with id {}", id);
            }

            let patch = BlogPostPatch {
                title,
                summary,
                body,
                tags: tag,
                category,
                published_on: published,
                is_visible: None,
            };
            store.emit(Update::BlogPost(CollectionOp::Update { id, patch }));
            output.success(&format!("Updated post {}", id));
            Ok(())
        }
        PostCommands::Delete { id } => {
            if !store.blog_posts().iter().any(|p| p.id == id) {
                bail!("No post with id {}", id);
            }
            store.emit(Update::BlogPost(
                CollectionOp::<BlogPostDraft, BlogPostPatch>::Delete { id },
            ));
            output.success(&format!("Deleted post {}", id));
            Ok(())
        }
        PostCommands::Toggle { id } => {
            let Some(post) = store.blog_posts().iter().find(|p| p.id == id) else {
                bail!("No post with id {}", id);
            };
            let active = !post.is_visible;
            store.emit(Update::BlogPost(
                CollectionOp::<BlogPostDraft, BlogPostPatch>::ToggleStatus { id, active },
            ));
            output.success(&format!(
                "Post {} is now {}",
                id,
                if active { "visible" } else { "hidden" }
            ));
            Ok(())
        }
    }
}
