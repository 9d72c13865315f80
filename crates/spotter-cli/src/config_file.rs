//! Persistent CLI configuration.

use std::path::{Path, PathBuf};

use spotter_core::config::ClientConfig;

use crate::error::CliError;

const CONFIG_FILE_NAME: &str = "cli-config.json";

pub fn default_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("spotter")
        .join(CONFIG_FILE_NAME)
}

pub fn resolve_config_path(cli_config_path: Option<PathBuf>) -> PathBuf {
    cli_config_path
        .or_else(|| std::env::var_os("SPOTTER_CONFIG").map(PathBuf::from))
        .unwrap_or_else(default_config_path)
}

/// Read the config file; a missing file yields the defaults
pub fn load_from_path(path: &Path) -> Result<ClientConfig, CliError> {
    if !path.exists() {
        return Ok(ClientConfig::default());
    }

    let raw = std::fs::read_to_string(path).map_err(|error| {
        CliError::Config(format!(
            "Failed to read config at {}: {error}",
            path.display()
        ))
    })?;
    let config = serde_json::from_str::<ClientConfig>(&raw).map_err(|error| {
        CliError::Config(format!(
            "Failed to parse config at {}: {error}",
            path.display()
        ))
    })?;
    config
        .normalized()
        .map_err(|error| CliError::Config(error.to_string()))
}

pub fn save_to_path(config: &ClientConfig, path: &Path) -> Result<(), CliError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|error| {
            CliError::Config(format!(
                "Failed to create config directory {}: {error}",
                parent.display()
            ))
        })?;
    }

    let normalized = config
        .clone()
        .normalized()
        .map_err(|error| CliError::Config(error.to_string()))?;
    let serialized = serde_json::to_string_pretty(&normalized)?;
    std::fs::write(path, serialized).map_err(|error| {
        CliError::Config(format!(
            "Failed to write config at {}: {error}",
            path.display()
        ))
    })
}

/// The config file with environment overrides applied
pub fn effective_config(path: &Path) -> Result<ClientConfig, CliError> {
    load_from_path(path)?
        .with_env_overrides()
        .normalized()
        .map_err(|error| CliError::Config(error.to_string()))
}

/// Show only the first few characters of a key
pub fn redact_secret(value: Option<&str>) -> String {
    match value {
        None => "(not set)".to_string(),
        Some(value) if value.chars().count() <= 8 => "********".to_string(),
        Some(value) => format!("{}********", value.chars().take(4).collect::<String>()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_yields_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let config = load_from_path(&dir.path().join("absent.json")).unwrap();
        assert_eq!(config, ClientConfig::default());
    }

    #[test]
    fn config_roundtrip_normalizes_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(CONFIG_FILE_NAME);

        let config = ClientConfig {
            sync_code: " CREW ".to_string(),
            supabase_url: Some(" https://project.supabase.co/ ".to_string()),
            supabase_anon_key: Some(" anon-key ".to_string()),
            giphy_api_key: Some("  ".to_string()),
        };
        save_to_path(&config, &path).unwrap();

        let loaded = load_from_path(&path).unwrap();
        assert_eq!(loaded.sync_code, "CREW");
        assert_eq!(
            loaded.supabase_url.as_deref(),
            Some("https://project.supabase.co")
        );
        assert_eq!(loaded.supabase_anon_key.as_deref(), Some("anon-key"));
        assert_eq!(loaded.giphy_api_key, None);
    }

    #[test]
    fn unreadable_config_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, r#"{"sync_code": 7}"#).unwrap();
        assert!(matches!(load_from_path(&path), Err(CliError::Config(_))));
    }

    #[test]
    fn redact_secret_hides_most_of_the_key() {
        assert_eq!(redact_secret(None), "(not set)");
        assert_eq!(redact_secret(Some("short")), "********");
        assert_eq!(redact_secret(Some("eyJhbGciOiJIUzI1NiJ9")), "eyJh********");
    }
}
