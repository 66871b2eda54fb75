use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_SETTINGS_FILE: &str = "events.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClientSettings {
    pub catalog_url: String,
    pub ipinfo_url: String,
    pub ipinfo_token: String,
    pub geocoding_url: String,
    pub geocoding_api_key: Option<String>,
    pub request_timeout_secs: u64,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            catalog_url: "http://127.0.0.1:3001".into(),
            ipinfo_url: "https://ipinfo.io".into(),
            ipinfo_token: String::new(),
            geocoding_url: "https://maps.googleapis.com/maps/api/geocode/json".into(),
            geocoding_api_key: None,
            request_timeout_secs: 15,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    catalog_url: Option<String>,
    ipinfo_url: Option<String>,
    ipinfo_token: Option<String>,
    geocoding_url: Option<String>,
    geocoding_api_key: Option<String>,
    request_timeout_secs: Option<u64>,
}

impl ClientSettings {
    pub fn http_client(&self) -> anyhow::Result<Client> {
        Client::builder()
            .timeout(Duration::from_secs(self.request_timeout_secs))
            .build()
            .context("failed to build HTTP client")
    }

    fn apply_file(&mut self, file: FileSettings) {
        if let Some(v) = file.catalog_url {
            self.catalog_url = v;
        }
        if let Some(v) = file.ipinfo_url {
            self.ipinfo_url = v;
        }
        if let Some(v) = file.ipinfo_token {
            self.ipinfo_token = v;
        }
        if let Some(v) = file.geocoding_url {
            self.geocoding_url = v;
        }
        if let Some(v) = file.geocoding_api_key {
            self.geocoding_api_key = Some(v);
        }
        if let Some(v) = file.request_timeout_secs {
            self.request_timeout_secs = v;
        }
    }

    fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(v) = lookup("CATALOG_URL") {
            self.catalog_url = v;
        }
        if let Some(v) = lookup("APP__CATALOG_URL") {
            self.catalog_url = v;
        }

        if let Some(v) = lookup("IPINFO_URL") {
            self.ipinfo_url = v;
        }
        if let Some(v) = lookup("IPINFO_TOKEN") {
            self.ipinfo_token = v;
        }
        if let Some(v) = lookup("APP__IPINFO_TOKEN") {
            self.ipinfo_token = v;
        }

        if let Some(v) = lookup("GEOCODING_URL") {
            self.geocoding_url = v;
        }
        if let Some(v) = lookup("GOOGLE_GEOCODING_API_KEY") {
            self.geocoding_api_key = Some(v);
        }
        if let Some(v) = lookup("APP__GEOCODING_API_KEY") {
            self.geocoding_api_key = Some(v);
        }

        if let Some(v) = lookup("APP__REQUEST_TIMEOUT_SECS") {
            if let Ok(parsed) = v.parse::<u64>() {
                self.request_timeout_secs = parsed;
            }
        }
    }

    /// An empty key counts as "not configured".
    fn normalize(mut self) -> Self {
        self.geocoding_api_key = self
            .geocoding_api_key
            .map(|key| key.trim().to_string())
            .filter(|key| !key.is_empty());
        self.catalog_url = self.catalog_url.trim_end_matches('/').to_string();
        self
    }
}

/// Defaults, then `events.toml` in the working directory, then environment.
pub fn load_settings() -> ClientSettings {
    load_settings_from(Path::new(DEFAULT_SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(
    path: &Path,
    lookup: impl Fn(&str) -> Option<String>,
) -> ClientSettings {
    let mut settings = ClientSettings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => settings.apply_file(file_cfg),
            Err(error) => warn!(path = %path.display(), %error, "ignoring unreadable settings file"),
        }
    }

    settings.apply_env(lookup);
    settings.normalize()
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
