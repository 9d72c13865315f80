use std::path::Path;

use serde::Serialize;
use spotter_core::config::ClientConfig;
use spotter_core::util::normalize_text_option;

use crate::cli::ConfigCommands;
use crate::config_file::{effective_config, load_from_path, redact_secret, save_to_path};
use crate::error::CliError;

#[derive(Debug, Serialize)]
pub struct ConfigSummary {
    pub path: String,
    pub sync_code: String,
    pub backend: &'static str,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: String,
    pub giphy_api_key: String,
}

pub fn run_config(command: ConfigCommands, config_path: &Path) -> Result<(), CliError> {
    match command {
        ConfigCommands::Init {
            sync_code,
            supabase_url,
            supabase_anon_key,
            giphy_api_key,
        } => {
            let existing = load_from_path(config_path)?;
            let updates = ConfigUpdates {
                sync_code,
                supabase_url,
                supabase_anon_key,
                giphy_api_key,
            };
            let config = merge_config(existing, updates);
            save_to_path(&config, config_path)?;
            println!("Config written to {}", config_path.display());
            if !config.remote_configured() {
                println!(
                    "No Supabase project configured; sessions stay in the local database (local-only mode)."
                );
            }
            Ok(())
        }
        ConfigCommands::Show { json } => {
            let summary = summarize(&effective_config(config_path)?, config_path);
            if json {
                println!("{}", serde_json::to_string_pretty(&summary)?);
            } else {
                println!("config:            {}", summary.path);
                println!("sync_code:         {}", summary.sync_code);
                println!("backend:           {}", summary.backend);
                println!(
                    "supabase_url:      {}",
                    summary.supabase_url.as_deref().unwrap_or("(not set)")
                );
                println!("supabase_anon_key: {}", summary.supabase_anon_key);
                println!("giphy_api_key:     {}", summary.giphy_api_key);
            }
            Ok(())
        }
    }
}

/// Values passed to `config init`; absent ones keep the stored value
#[derive(Debug, Default)]
pub struct ConfigUpdates {
    pub sync_code: Option<String>,
    pub supabase_url: Option<String>,
    pub supabase_anon_key: Option<String>,
    pub giphy_api_key: Option<String>,
}

pub fn merge_config(existing: ClientConfig, updates: ConfigUpdates) -> ClientConfig {
    ClientConfig {
        sync_code: normalize_text_option(updates.sync_code).unwrap_or(existing.sync_code),
        supabase_url: normalize_text_option(updates.supabase_url).or(existing.supabase_url),
        supabase_anon_key: normalize_text_option(updates.supabase_anon_key)
            .or(existing.supabase_anon_key),
        giphy_api_key: normalize_text_option(updates.giphy_api_key).or(existing.giphy_api_key),
    }
}

pub fn summarize(config: &ClientConfig, path: &Path) -> ConfigSummary {
    ConfigSummary {
        path: path.display().to_string(),
        sync_code: config.sync_code.clone(),
        backend: if config.remote_configured() {
            "supabase"
        } else {
            "local"
        },
        supabase_url: config.supabase_url.clone(),
        supabase_anon_key: redact_secret(config.supabase_anon_key.as_deref()),
        giphy_api_key: redact_secret(config.giphy_api_key.as_deref()),
    }
}
