use std::{collections::HashMap, fs};

use serde::Deserialize;

const DEFAULT_API_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub api_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            api_base_url: DEFAULT_API_BASE_URL.into(),
        }
    }
}

/// Defaults, overridden by `client.toml` in the working directory (read
/// best-effort), overridden by environment variables.
pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("client.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            if let Some(v) = file_cfg.get("api_base_url") {
                settings.api_base_url = v.clone();
            }
        }
    }

    if let Ok(v) = std::env::var("API_BASE_URL") {
        settings.api_base_url = v;
    }
    if let Ok(v) = std::env::var("APP__API_BASE_URL") {
        settings.api_base_url = v;
    }

    settings
}

/// Endpoint paths are joined by plain concatenation, so the base must not
/// end with a slash. An empty value falls back to the default.
pub fn normalize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        return Settings::default().api_base_url;
    }
    trimmed.to_string()
}
