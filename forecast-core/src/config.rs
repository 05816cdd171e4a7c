use anyhow::{Context, Result, anyhow};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::{collections::HashMap, fs, path::PathBuf, time::Duration};

use crate::{
    model::{MAX_SAMPLE_COUNT, TimeBasis},
    provider::ProviderId,
};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// Configuration for a single provider (e.g., API key).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub api_key: String,
}

/// Top-level configuration stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    /// Optional default provider id, e.g. "openweather".
    pub default_provider: Option<String>,

    /// Place used by `forecast show` when none is given.
    pub default_place: Option<String>,

    /// Number of 3-hour samples to request; the provider caps it at 40.
    pub sample_count: Option<u32>,

    /// Clock for dates, hours and the day/night icon: "city" (default) or "utc".
    #[serde(default)]
    pub time_basis: TimeBasis,

    pub timeout_secs: Option<u64>,

    /// Example TOML:
    /// [providers.openweather]
    /// api_key = "..."
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

impl Config {
    /// Return the default provider as a strongly-typed ProviderId.
    pub fn default_provider_id(&self) -> Result<ProviderId> {
        let s = self.default_provider.as_ref().ok_or_else(|| {
            anyhow::anyhow!(
                "No default provider configured.\n\
                 Hint: run `forecast configure <provider>` (e.g. `forecast configure openweather`) first."
            )
        })?;

        ProviderId::try_from(s.as_str())
    }

    pub fn provider_config(&self, id: ProviderId) -> Option<&ProviderConfig> {
        self.providers.get(id.as_str())
    }

    /// Store default provider as string.
    pub fn set_default_provider(&mut self, id: ProviderId) {
        self.default_provider = Some(id.as_str().to_string());
    }

    pub fn sample_count(&self) -> u32 {
        self.sample_count.unwrap_or(MAX_SAMPLE_COUNT).clamp(1, MAX_SAMPLE_COUNT)
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(DEFAULT_TIMEOUT_SECS))
    }

    /// Load config from disk, or return an empty default if it doesn't exist yet.
    ///
    /// API keys from the environment take precedence over stored ones.
    pub fn load() -> Result<Self> {
        let path = Self::config_file_path()?;
        let mut cfg = if path.exists() {
            let contents = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read config file: {}", path.display()))?;
            Self::from_toml(&contents)
                .with_context(|| format!("Failed to parse config file: {}", path.display()))?
        } else {
            tracing::debug!(path = %path.display(), "no config file yet, using defaults");
            Self::default()
        };

        cfg.apply_env_overrides(|name| std::env::var(name).ok());
        Ok(cfg)
    }

    pub fn from_toml(contents: &str) -> Result<Self> {
        Ok(toml::from_str(contents)?)
    }

    /// Save config to disk, creating parent directories as needed.
    pub fn save(&self) -> Result<()> {
        let path = Self::config_file_path()?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let toml =
            toml::to_string_pretty(self).context("Failed to serialize configuration to TOML")?;

        fs::write(&path, toml)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;

        tracing::info!(path = %path.display(), "saved configuration");
        Ok(())
    }

    /// Path to the config file.
    pub fn config_file_path() -> Result<PathBuf> {
        let dirs = ProjectDirs::from("dev", "forecast", "forecast-cli")
            .ok_or_else(|| anyhow!("Could not determine platform config directory"))?;

        Ok(dirs.config_dir().join("config.toml"))
    }

    /// Replace stored API keys with non-empty values from `lookup`.
    ///
    /// An overridden provider becomes the default when none is set.
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        for id in ProviderId::all() {
            if let Some(key) = lookup(id.api_key_env()).filter(|k| !k.trim().is_empty()) {
                tracing::debug!(provider = %id, var = id.api_key_env(), "API key taken from environment");
                self.upsert_provider_api_key(*id, key);
            }
        }
    }

    /// Convenience helper: set/replace a provider API key and optionally set default provider.
    pub fn upsert_provider_api_key(&mut self, provider_id: ProviderId, api_key: String) {
        self.providers.insert(provider_id.as_str().to_string(), ProviderConfig { api_key });

        if self.default_provider.is_none() {
            self.default_provider = Some(provider_id.to_string());
        }
    }

    /// Returns API key for a provider, if present.
    pub fn provider_api_key(&self, provider_id: ProviderId) -> Option<&str> {
        self.provider_config(provider_id).map(|cfg| cfg.api_key.as_str())
    }

    pub fn is_provider_configured(&self, provider_id: ProviderId) -> bool {
        self.provider_api_key(provider_id).is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::ProviderId;

    #[test]
    fn default_provider_id_errors_when_not_set() {
        let cfg = Config::default();
        let err = cfg.default_provider_id().unwrap_err();

        assert!(err.to_string().contains("No default provider configured"));
    }

    #[test]
    fn set_api_key_and_default_for_provider() {
        let mut cfg = Config::default();

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OPEN_KEY".into());

        let default = cfg.default_provider_id().expect("default provider must exist");
        assert_eq!(default, ProviderId::OpenWeather);

        let key = cfg.provider_api_key(ProviderId::OpenWeather);
        assert_eq!(key, Some("OPEN_KEY"));
        assert!(cfg.is_provider_configured(ProviderId::OpenWeather));
    }

    #[test]
    fn upsert_replaces_key_without_touching_default() {
        let mut cfg = Config::default();
        cfg.default_provider = Some("openweather".into());

        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "OLD".into());
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "NEW".into());

        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("NEW"));
        assert_eq!(cfg.default_provider.as_deref(), Some("openweather"));
    }

    #[test]
    fn parses_full_toml() {
        let cfg = Config::from_toml(
            r#"
            default_provider = "openweather"
            default_place = "Oakland,CA,USA"
            sample_count = 16
            time_basis = "utc"
            timeout_secs = 3

            [providers.openweather]
            api_key = "abc"
            "#,
        )
        .expect("valid config");

        assert_eq!(cfg.default_provider_id().unwrap(), ProviderId::OpenWeather);
        assert_eq!(cfg.default_place.as_deref(), Some("Oakland,CA,USA"));
        assert_eq!(cfg.sample_count(), 16);
        assert_eq!(cfg.time_basis, TimeBasis::Utc);
        assert_eq!(cfg.timeout(), Duration::from_secs(3));
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("abc"));
    }

    #[test]
    fn empty_toml_uses_defaults() {
        let cfg = Config::from_toml("").expect("empty config is valid");
        assert_eq!(cfg.sample_count(), MAX_SAMPLE_COUNT);
        assert_eq!(cfg.time_basis, TimeBasis::City);
        assert_eq!(cfg.timeout(), Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert!(cfg.providers.is_empty());
    }

    #[test]
    fn sample_count_is_clamped() {
        let cfg = Config { sample_count: Some(120), ..Config::default() };
        assert_eq!(cfg.sample_count(), MAX_SAMPLE_COUNT);
    }

    #[test]
    fn toml_roundtrip_keeps_keys() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "KEY".into());
        cfg.default_place = Some("Berlin".into());

        let text = toml::to_string_pretty(&cfg).unwrap();
        let back = Config::from_toml(&text).unwrap();

        assert_eq!(back.provider_api_key(ProviderId::OpenWeather), Some("KEY"));
        assert_eq!(back.default_place.as_deref(), Some("Berlin"));
    }

    #[test]
    fn env_override_replaces_stored_key() {
        let mut cfg = Config::default();
        cfg.upsert_provider_api_key(ProviderId::OpenWeather, "STORED".into());

        cfg.apply_env_overrides(|name| (name == "OPENWEATHER_API_KEY").then(|| "FROM_ENV".to_string()));
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("FROM_ENV"));

        cfg.apply_env_overrides(|_| Some("  ".to_string()));
        assert_eq!(cfg.provider_api_key(ProviderId::OpenWeather), Some("FROM_ENV"));
    }
}
