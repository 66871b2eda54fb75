use std::{fs, path::Path, time::Duration};

use anyhow::Context;
use reqwest::Client;
use serde::Deserialize;
use tracing::warn;

pub const DEFAULT_SETTINGS_FILE: &str = "proxy.toml";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub bind_addr: String,
    pub ticketmaster_api_key: String,
    pub ticketmaster_base_url: String,
    pub upstream_timeout_secs: u64,
    pub page_size: u32,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            bind_addr: "127.0.0.1:3001".into(),
            ticketmaster_api_key: String::new(),
            ticketmaster_base_url: "https://app.ticketmaster.com/discovery/v2".into(),
            upstream_timeout_secs: 15,
            page_size: 20,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct FileSettings {
    bind_addr: Option<String>,
    ticketmaster_api_key: Option<String>,
    ticketmaster_base_url: Option<String>,
    upstream_timeout_secs: Option<u64>,
    page_size: Option<u32>,
}

impl Settings {
    pub fn upstream_client(&self) -> anyhow::Result<Client> {
        Client::builder()
            .timeout(Duration::from_secs(self.upstream_timeout_secs))
            .build()
            .context("failed to build upstream HTTP client")
    }
}

pub fn load_settings() -> Settings {
    load_settings_from(Path::new(DEFAULT_SETTINGS_FILE), |key| std::env::var(key).ok())
}

pub fn load_settings_from(path: &Path, lookup: impl Fn(&str) -> Option<String>) -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string(path) {
        match toml::from_str::<FileSettings>(&raw) {
            Ok(file_cfg) => {
                if let Some(v) = file_cfg.bind_addr {
                    settings.bind_addr = v;
                }
                if let Some(v) = file_cfg.ticketmaster_api_key {
                    settings.ticketmaster_api_key = v;
                }
                if let Some(v) = file_cfg.ticketmaster_base_url {
                    settings.ticketmaster_base_url = v;
                }
                if let Some(v) = file_cfg.upstream_timeout_secs {
                    settings.upstream_timeout_secs = v;
                }
                if let Some(v) = file_cfg.page_size {
                    settings.page_size = v;
                }
            }
            Err(error) => warn!(path = %path.display(), %error, "ignoring unreadable settings file"),
        }
    }

    if let Some(v) = lookup("PROXY_BIND") {
        settings.bind_addr = v;
    }
    if let Some(v) = lookup("APP__BIND_ADDR") {
        settings.bind_addr = v;
    }

    if let Some(v) = lookup("TM_API_KEY") {
        settings.ticketmaster_api_key = v;
    }
    if let Some(v) = lookup("APP__TM_API_KEY") {
        settings.ticketmaster_api_key = v;
    }

    if let Some(v) = lookup("TICKETMASTER_BASE_URL") {
        settings.ticketmaster_base_url = v;
    }

    if let Some(v) = lookup("APP__UPSTREAM_TIMEOUT_SECS") {
        if let Ok(parsed) = v.parse::<u64>() {
            settings.upstream_timeout_secs = parsed;
        }
    }
    if let Some(v) = lookup("APP__PAGE_SIZE") {
        if let Ok(parsed) = v.parse::<u32>() {
            settings.page_size = parsed;
        }
    }

    settings.ticketmaster_base_url = settings
        .ticketmaster_base_url
        .trim_end_matches('/')
        .to_string();
    settings
}

#[cfg(test)]
#[path = "tests/config_tests.rs"]
mod tests;
