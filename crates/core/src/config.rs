//! Configuration file parsing for .textpro.toml

use anyhow::{bail, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const CONFIG_FILENAME: &str = ".textpro.toml";

const DAY_MS: u64 = 24 * 60 * 60 * 1000;

/// Shortest delay between ticks; zero would make the poller spin.
pub const MIN_TICK_INTERVAL_MS: u64 = 1;

/// Main configuration structure for .textpro.toml
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextProConfig {
    #[serde(default)]
    pub product: ProductConfig,

    #[serde(default)]
    pub endpoints: EndpointsConfig,

    #[serde(default)]
    pub timing: TimingConfig,

    #[serde(default)]
    pub instance: InstanceConfig,

    #[serde(default)]
    pub storage: StorageConfig,
}

/// Identifiers an activation response must carry to count for this product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProductConfig {
    #[serde(default = "default_store_id")]
    pub store_id: u64,

    #[serde(default = "default_product_id")]
    pub product_id: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EndpointsConfig {
    /// Body-less liveness probe
    #[serde(default = "default_ping_url")]
    pub ping: String,

    #[serde(default = "default_activate_url")]
    pub activate: String,

    #[serde(default = "default_validate_url")]
    pub validate: String,

    #[serde(default = "default_deactivate_url")]
    pub deactivate: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Production,
    Development,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimingConfig {
    /// Delay between connectivity ticks
    #[serde(default = "default_tick_interval_ms")]
    pub tick_interval_ms: u64,

    /// Selects the default offline limit
    #[serde(default)]
    pub environment: Environment,

    /// Overrides the environment's offline limit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offline_limit_ms: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InstanceConfig {
    /// Leading part of the instance name sent on activation
    #[serde(default = "default_name_prefix")]
    pub name_prefix: String,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct StorageConfig {
    /// State file location (default: <config dir>/textpro/state.json)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBuf>,
}

// Default functions
fn default_store_id() -> u64 {
    157343
}

fn default_product_id() -> u64 {
    463516
}

fn default_ping_url() -> String {
    "https://api.lemonsqueezy.com/ping".to_string()
}

fn default_activate_url() -> String {
    "https://api.lemonsqueezy.com/v1/licenses/activate".to_string()
}

fn default_validate_url() -> String {
    "https://api.lemonsqueezy.com/v1/licenses/validate".to_string()
}

fn default_deactivate_url() -> String {
    "https://api.lemonsqueezy.com/v1/licenses/deactivate".to_string()
}

fn default_tick_interval_ms() -> u64 {
    5000
}

fn default_name_prefix() -> String {
    "textpro".to_string()
}

impl Default for TextProConfig {
    fn default() -> Self {
        Self {
            product: ProductConfig::default(),
            endpoints: EndpointsConfig::default(),
            timing: TimingConfig::default(),
            instance: InstanceConfig::default(),
            storage: StorageConfig::default(),
        }
    }
}

impl Default for ProductConfig {
    fn default() -> Self {
        Self {
            store_id: default_store_id(),
            product_id: default_product_id(),
        }
    }
}

impl Default for EndpointsConfig {
    fn default() -> Self {
        Self {
            ping: default_ping_url(),
            activate: default_activate_url(),
            validate: default_validate_url(),
            deactivate: default_deactivate_url(),
        }
    }
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: default_tick_interval_ms(),
            environment: Environment::default(),
            offline_limit_ms: None,
        }
    }
}

impl Default for InstanceConfig {
    fn default() -> Self {
        Self {
            name_prefix: default_name_prefix(),
        }
    }
}

impl Environment {
    pub fn default_offline_limit(self) -> Duration {
        match self {
            Environment::Production => Duration::from_millis(7 * DAY_MS),
            Environment::Development => Duration::from_secs(30),
        }
    }
}

impl TimingConfig {
    /// Delay between ticks, never below `MIN_TICK_INTERVAL_MS`.
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms.max(MIN_TICK_INTERVAL_MS))
    }

    /// Maximum tolerated time since the last successful probe.
    pub fn offline_limit(&self) -> Duration {
        match self.offline_limit_ms {
            Some(ms) => Duration::from_millis(ms),
            None => self.environment.default_offline_limit(),
        }
    }
}

impl TextProConfig {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: TextProConfig = toml::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects settings the engine cannot run with.
    pub fn validate(&self) -> Result<()> {
        if self.timing.tick_interval_ms < MIN_TICK_INTERVAL_MS {
            bail!(
                "timing.tick_interval_ms must be at least {} (got {})",
                MIN_TICK_INTERVAL_MS,
                self.timing.tick_interval_ms
            );
        }
        Ok(())
    }

    /// Find and load .textpro.toml from the given directory or its ancestors
    pub fn find_and_load(start_dir: &Path) -> Result<Self> {
        let mut current = start_dir;

        loop {
            let config_path = current.join(CONFIG_FILENAME);
            if config_path.exists() {
                return Self::from_file(&config_path);
            }

            match current.parent() {
                Some(parent) => current = parent,
                None => break,
            }
        }

        Ok(Self::default())
    }

    /// Save configuration to a file
    pub fn save(&self, path: &Path) -> Result<()> {
        let contents = toml::to_string_pretty(self)?;
        std::fs::write(path, contents)?;
        Ok(())
    }
}
