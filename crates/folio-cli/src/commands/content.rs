//! Site content command handlers

use std::collections::BTreeMap;

use anyhow::{bail, Result};
use clap::Subcommand;

use folio_core::{ContentStore, FieldValue, Update};

use crate::output::Output;

#[derive(Subcommand)]
pub enum ContentCommands {
    /// Show site content (all pages, or one)
    Show {
        /// Page name (home, about, contact, ...)
        page: Option<String>,
    },
    /// Set one field on a page
    Set {
        /// Page name
        page: String,
        /// Field name
        field: String,
        /// New value
        value: String,
        /// Treat the value as a comma-separated list
        #[arg(long)]
        list: bool,
    },
}

pub fn handle(command: ContentCommands, store: &mut ContentStore, output: &Output) -> Result<()> {
    match command {
        ContentCommands::Show { page } => show(store, page, output),
        ContentCommands::Set {
            page,
            field,
            value,
            list,
        } => set(store, page, field, value, list, output),
    }
}

fn show(store: &ContentStore, page: Option<String>, output: &Output) -> Result<()> {
    let content = store.site_content();

    if output.is_json() {
        match &page {
            Some(name) => {
                let Some(fields) = content.page(name) else {
                    bail!("No page named '{}'", name);
                };
                println!("{}", serde_json::to_string_pretty(fields)?);
            }
            None => println!("{}", serde_json::to_string_pretty(content)?),
        }
        return Ok(());
    }

    let pages: Vec<&str> = match &page {
        Some(name) => {
            if content.page(name).is_none() {
                bail!("No page named '{}'", name);
            }
            vec![name.as_str()]
        }
        None => content.page_names().collect(),
    };

    for name in pages {
        if output.is_quiet() {
            println!("{}", name);
            continue;
        }
        println!("[{}]", name);
        if let Some(fields) = content.page(name) {
            for (field, value) in fields {
                match value {
                    FieldValue::Text(text) => println!("  {} = {}", field, text),
                    FieldValue::List(items) => println!("  {} = [{}]", field, items.join(", ")),
                }
            }
        }
        println!();
    }

    Ok(())
}

fn set(
    store: &mut ContentStore,
    page: String,
    field: String,
    value: String,
    list: bool,
    output: &Output,
) -> Result<()> {
    let parsed = if list {
        FieldValue::list(value.split(',').map(str::trim))
    } else {
        FieldValue::text(value)
    };

    // The update merges at page level, so carry the page's other fields
    let mut fields = store
        .site_content()
        .page(&page)
        .cloned()
        .unwrap_or_default();
    fields.insert(field.clone(), parsed);

    let mut pages = BTreeMap::new();
    pages.insert(page.clone(), fields);
    store.emit(Update::SiteContent { pages });

    output.success(&format!("Set {}.{}", page, field));
    Ok(())
}
