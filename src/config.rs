use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::warn;
use url::Url;

/// Application configuration
#[derive(Serialize, Deserialize, Clone, Debug, Default)]
#[serde(default)]
pub struct Config {
    pub relay: RelayConfig,
    pub location: LocationConfig,
    pub ui: UiConfig,
}

/// Relay service used to fetch pages
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct RelayConfig {
    /// Endpoint that returns the raw body of the page named in `query_param`
    pub endpoint: String,
    /// Query parameter carrying the percent-encoded target URL
    pub query_param: String,
    /// Request timeout in seconds; unset means wait indefinitely
    pub timeout_secs: Option<u64>,
}

/// Shareable location links
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct LocationConfig {
    /// Base of the link copied by the share action; `?url=` is appended
    pub share_base: String,
}

/// UI behavior configuration
#[derive(Serialize, Deserialize, Clone, Debug)]
#[serde(default)]
pub struct UiConfig {
    pub dark_mode: bool,
    /// egui zoom factor
    pub zoom: f32,
}

impl Default for RelayConfig {
    fn default() -> Self {
        RelayConfig {
            endpoint: "https://api.allorigins.win/raw".to_string(),
            query_param: "url".to_string(),
            timeout_secs: None,
        }
    }
}

impl Default for LocationConfig {
    fn default() -> Self {
        LocationConfig {
            share_base: "https://relayview.app/".to_string(),
        }
    }
}

impl Default for UiConfig {
    fn default() -> Self {
        UiConfig {
            dark_mode: false,
            zoom: 1.0,
        }
    }
}

impl LocationConfig {
    /// Parsed share base, falling back to the default when the configured one is malformed.
    pub fn share_base_url(&self) -> Option<Url> {
        Url::parse(&self.share_base)
            .or_else(|e| {
                warn!("invalid share_base {:?}: {}", self.share_base, e);
                Url::parse(&LocationConfig::default().share_base)
            })
            .ok()
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "relayview")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Load configuration from file, or return defaults if it is missing or invalid
    pub fn load() -> Self {
        match Self::config_path() {
            Some(path) if path.exists() => Self::load_from(&path),
            _ => Config::default(),
        }
    }

    fn load_from(path: &Path) -> Self {
        let contents = match fs::read_to_string(path) {
            Ok(contents) => contents,
            Err(e) => {
                warn!("failed to read {}: {}; using defaults", path.display(), e);
                return Config::default();
            }
        };
        toml::from_str(&contents).unwrap_or_else(|e| {
            warn!("failed to parse {}: {}; using defaults", path.display(), e);
            Config::default()
        })
    }

    /// Save configuration to file
    pub fn save(&self) -> anyhow::Result<()> {
        let path = Self::config_path()
            .ok_or_else(|| anyhow::anyhow!("could not determine config directory"))?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml::to_string_pretty(self)?)?;
        Ok(())
    }

    /// Create a default config file if it doesn't exist
    pub fn create_default() -> anyhow::Result<()> {
        match Self::config_path() {
            Some(path) if !path.exists() => Config::default().save(),
            _ => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.relay.endpoint, "https://api.allorigins.win/raw");
        assert_eq!(config.relay.query_param, "url");
        assert_eq!(config.relay.timeout_secs, None);
        assert_eq!(config.ui.zoom, 1.0);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let config: Config = toml::from_str(
            "[relay]\nendpoint = \"https://relay.example.net/get\"\ntimeout_secs = 20\n",
        )
        .expect("parse");
        assert_eq!(config.relay.endpoint, "https://relay.example.net/get");
        assert_eq!(config.relay.timeout_secs, Some(20));
        assert_eq!(config.relay.query_param, "url");
        assert_eq!(config.location.share_base, "https://relayview.app/");
    }

    #[test]
    fn test_config_serialization() {
        let config = Config::default();
        let toml_str = toml::to_string(&config).expect("Failed to serialize");
        let deserialized: Config = toml::from_str(&toml_str).expect("Failed to deserialize");
        assert_eq!(config.relay.endpoint, deserialized.relay.endpoint);
    }

    #[test]
    fn test_malformed_share_base_falls_back() {
        let location = LocationConfig {
            share_base: "::nope".to_string(),
        };
        assert_eq!(
            location.share_base_url().map(String::from).as_deref(),
            Some("https://relayview.app/")
        );
    }
}
