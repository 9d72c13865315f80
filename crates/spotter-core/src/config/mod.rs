//! Client configuration shared by every front end.
//!
//! Values come from a config file (see the CLI) and can be overridden by
//! environment variables. Only public keys belong here: the Supabase anon key
//! and a Giphy API key are both meant to ship with clients.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::models::DEFAULT_SYNC_CODE;
use crate::util::{is_http_url, normalize_text_option};

pub const SYNC_CODE_ENV: &str = "SPOTTER_SYNC_CODE";
pub const SUPABASE_URL_ENV: &str = "SUPABASE_URL";
pub const SUPABASE_ANON_KEY_ENV: &str = "SUPABASE_ANON_KEY";
pub const GIPHY_API_KEY_ENV: &str = "GIPHY_API_KEY";

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct ClientConfig {
    #[serde(default = "default_sync_code")]
    pub sync_code: String,
    #[serde(default)]
    pub supabase_url: Option<String>,
    #[serde(default)]
    pub supabase_anon_key: Option<String>,
    #[serde(default)]
    pub giphy_api_key: Option<String>,
}

fn default_sync_code() -> String {
    DEFAULT_SYNC_CODE.to_string()
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            sync_code: default_sync_code(),
            supabase_url: None,
            supabase_anon_key: None,
            giphy_api_key: None,
        }
    }
}

impl ClientConfig {
    /// Apply overrides from the process environment
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from `lookup`; blank values are ignored
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| normalize_text_option(lookup(key));
        if let Some(sync_code) = get(SYNC_CODE_ENV) {
            self.sync_code = sync_code;
        }
        if let Some(url) = get(SUPABASE_URL_ENV) {
            self.supabase_url = Some(url);
        }
        if let Some(key) = get(SUPABASE_ANON_KEY_ENV) {
            self.supabase_anon_key = Some(key);
        }
        if let Some(key) = get(GIPHY_API_KEY_ENV) {
            self.giphy_api_key = Some(key);
        }
        self
    }

    /// Trim every value, drop blanks and validate the Supabase URL
    pub fn normalized(self) -> Result<Self> {
        let sync_code =
            normalize_text_option(Some(self.sync_code)).unwrap_or_else(default_sync_code);
        let supabase_url = match normalize_text_option(self.supabase_url) {
            Some(url) if is_http_url(&url) => Some(url.trim_end_matches('/').to_string()),
            Some(url) => {
                return Err(Error::InvalidInput(format!(
                    "supabase_url must include http:// or https://, got {url}"
                )))
            }
            None => None,
        };

        Ok(Self {
            sync_code,
            supabase_url,
            supabase_anon_key: normalize_text_option(self.supabase_anon_key),
            giphy_api_key: normalize_text_option(self.giphy_api_key),
        })
    }

    /// Whether the hosted record store can be used
    pub fn remote_configured(&self) -> bool {
        self.remote_credentials().is_some()
    }

    /// URL and anon key of the hosted record store, when both are set
    pub fn remote_credentials(&self) -> Option<(&str, &str)> {
        match (self.supabase_url.as_deref(), self.supabase_anon_key.as_deref()) {
            (Some(url), Some(key)) if !url.trim().is_empty() && !key.trim().is_empty() => {
                Some((url, key))
            }
            _ => None,
        }
    }
}
