//! Configuration view and validation commands (`funnel config`).

use anyhow::Result;

use funnel::config::{FunnelConfig, FunnelToml};

use super::super::ConfigCommands;

pub fn cmd_config(config: &FunnelConfig, command: Option<ConfigCommands>) -> Result<()> {
    let config_path = config.config_path();

    match command {
        None | Some(ConfigCommands::Show) => {
            println!();
            println!("Funnel Configuration");
            println!("====================");
            println!();

            if config_path.exists() {
                println!("Config file: {}", config_path.display());
            } else {
                println!("No funnel.toml found. Showing defaults:");
            }
            println!();

            let toml = &config.toml;
            println!("[export]");
            println!("  file_name = \"{}\"", toml.export.file_name);
            println!();
            println!("[view]");
            println!("  columns = [{}]", quoted_list(&toml.view.columns));
            println!();
            println!("[logging]");
            println!("  level = \"{}\"", toml.logging.level);
            println!();

            println!("Effective export target: {}", config.export_target());
            println!("Effective log filter: {}", config.log_filter());
            println!();

            if !config_path.exists() {
                println!("Run 'funnel config init' to create a funnel.toml file.");
                println!();
            }
        }
        Some(ConfigCommands::Validate) => {
            println!();
            println!("Validating configuration...");
            println!();

            if !config_path.exists() {
                println!("No funnel.toml found. Using defaults (valid).");
                return Ok(());
            }

            let warnings = config.validate();
            if warnings.is_empty() {
                println!("Configuration is valid.");
            } else {
                println!("Configuration warnings:");
                for warning in warnings {
                    println!("  - {}", warning);
                }
            }
            println!();
        }
        Some(ConfigCommands::Init) => {
            if config_path.exists() {
                println!("funnel.toml already exists at {}", config_path.display());
                println!("Delete it first if you want to recreate it.");
                return Ok(());
            }

            if !config.funnel_dir.exists() {
                std::fs::create_dir_all(&config.funnel_dir)?;
            }

            FunnelToml::default().save(&config_path)?;

            println!("Created funnel.toml at {}", config_path.display());
            println!();
            println!("You can now customize:");
            println!("  - [export] file_name");
            println!("  - [view] columns");
            println!("  - [logging] level");
            println!();
        }
    }

    Ok(())
}

fn quoted_list(values: &[String]) -> String {
    values
        .iter()
        .map(|v| format!("\"{}\"", v))
        .collect::<Vec<_>>()
        .join(", ")
}
