//! Config command handlers

use anyhow::{bail, Context, Result};

use folio_core::Config;

use crate::output::{Output, OutputFormat};

/// Show current configuration
pub fn show(output: &Output) -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "data_dir": config.data_dir,
                    "agent": config.agent,
                    "pulse_sync": config.pulse_sync,
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", config.data_dir.display());
        }
        OutputFormat::Human => {
            println!("Configuration:");
            println!("  data_dir:   {}", config.data_dir.display());
            println!(
                "  agent:      {}",
                config.agent.as_deref().unwrap_or("(not set)")
            );
            println!("  pulse_sync: {}", config.pulse_sync);
            println!();
            println!("Config file: {}", Config::config_file_path().display());
        }
    }

    Ok(())
}

/// Set a configuration value
pub fn set(key: String, value: String, output: &Output) -> Result<()> {
    let mut config = Config::load().context("Failed to load configuration")?;

    match key.as_str() {
        "data_dir" => {
            config.data_dir = value.clone().into();
        }
        "agent" => {
            config.agent = if value.is_empty() || value == "none" {
                None
            } else {
                Some(value.clone())
            };
        }
        "pulse_sync" => {
            config.pulse_sync = value
                .parse()
                .context("Invalid value for pulse_sync. Use 'true' or 'false'.")?;
        }
        _ => {
            bail!(
                "Unknown configuration key: '{}'\n\
                 Valid keys: data_dir, agent, pulse_sync",
                key
            );
        }
    }

    config.save().context("Failed to save configuration")?;

    output.success(&format!("Set {} = {}", key, value));

    Ok(())
}
