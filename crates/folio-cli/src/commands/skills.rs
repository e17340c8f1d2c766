//! Skill command handlers

use anyhow::{bail, Result};
use clap::Subcommand;

use folio_core::{ContentStore, SkillOp, Update};

use crate::output::Output;

#[derive(Subcommand)]
pub enum SkillCommands {
    /// List skill groups
    #[command(alias = "ls")]
    List,
    /// Add a skill to an existing category
    Add {
        /// Category name
        category: String,
        /// Skill entry
        skill: String,
    },
    /// Remove a skill from a category
    #[command(alias = "rm")]
    Remove {
        /// Category name
        category: String,
        /// Skill entry
        skill: String,
    },
    /// Rename one skill entry in place
    Rename {
        /// Category name
        category: String,
        /// Current entry
        from: String,
        /// New entry
        to: String,
    },
    /// Create an empty category
    AddCategory {
        /// Category name
        category: String,
    },
    /// Remove a category and everything in it
    RemoveCategory {
        /// Category name
        category: String,
    },
}

pub fn handle(command: SkillCommands, store: &mut ContentStore, output: &Output) -> Result<()> {
    match command {
        SkillCommands::List => {
            output.print_skills(store.skills());
            Ok(())
        }
        SkillCommands::Add { category, skill } => {
            if !store.skills().contains_key(&category) {
                bail!(
                    "No category named '{}'. Create it first with `folio skill add-category`.",
                    category
                );
            }
            store.emit(Update::Skills(SkillOp::AddSkill {
                category: category.clone(),
                skill: skill.clone(),
            }));
            output.success(&format!("Added '{}' to {}", skill, category));
            Ok(())
        }
        SkillCommands::Remove { category, skill } => {
            if !store.skills().contains_key(&category) {
                bail!("No category named '{}'", category);
            }
            store.emit(Update::Skills(SkillOp::RemoveSkill {
                category: category.clone(),
                skill: skill.clone(),
            }));
            output.success(&format!("Removed '{}' from {}", skill, category));
            Ok(())
        }
        SkillCommands::Rename { category, from, to } => {
            let entries = store
                .skills()
                .get(&category)
                .ok_or_else(|| anyhow::anyhow!("No category named '{}'", category))?;
            if !entries.contains(&from) {
                bail!("No skill '{}' in {}", from, category);
            }
            store.emit(Update::Skills(SkillOp::UpdateSkill {
                category: category.clone(),
                from: from.clone(),
                to: to.clone(),
            }));
            output.success(&format!("Renamed '{}' to '{}' in {}", from, to, category));
            Ok(())
        }
        SkillCommands::AddCategory { category } => {
            store.emit(Update::Skills(SkillOp::AddCategory {
                category: category.clone(),
            }));
            output.success(&format!("Added category '{}'", category));
            Ok(())
        }
        SkillCommands::RemoveCategory { category } => {
            if !store.skills().contains_key(&category) {
                bail!("No category named '{}'", category);
            }
            store.emit(Update::Skills(SkillOp::RemoveCategory {
                category: category.clone(),
            }));
            output.success(&format!("Removed category '{}'", category));
            Ok(())
        }
    }
}
