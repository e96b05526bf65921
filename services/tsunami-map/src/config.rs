//! Service configuration.
//!
//! Loaded from a YAML file, then overridden by `TSUNAMI_*` environment
//! variables. Every section is optional.

use std::path::{Path, PathBuf};

use advisory_common::{DuplicatePolicy, TreatmentTable};
use advisory_pipeline::{LabelConfig, Mode, PipelineConfig};
use advisory_source::LiveSourceConfig;
use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

/// Top-level service configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MapConfig {
    /// Source used at startup
    #[serde(default)]
    pub mode: Mode,

    /// Boundary GeoJSON for forecast regions
    #[serde(default = "default_regions_path")]
    pub regions_path: PathBuf,

    /// Optional JSON `areas` array replacing the built-in fixture
    #[serde(default)]
    pub fixture_path: Option<PathBuf>,

    #[serde(default)]
    pub live: LiveSourceConfig,

    #[serde(default)]
    pub treatments: TreatmentTable,

    #[serde(default)]
    pub labels: LabelConfig,

    #[serde(default)]
    pub registry: RegistryConfig,

    #[serde(default)]
    pub server: ServerConfig,

    /// Re-render the current mode this often; 0 disables polling
    #[serde(default)]
    pub poll_interval_secs: u64,

    #[serde(default)]
    pub logging: LoggingConfig,
}

fn default_regions_path() -> PathBuf {
    PathBuf::from("data/tsunami_regions.geojson")
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistryConfig {
    /// Fail at startup if two boundary features share a name
    #[serde(default)]
    pub reject_duplicates: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_listen")]
    pub listen: String,
}

fn default_listen() -> String {
    "0.0.0.0:8080".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_level")]
    pub level: String,
}

fn default_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_level(),
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            mode: Mode::default(),
            regions_path: default_regions_path(),
            fixture_path: None,
            live: LiveSourceConfig::default(),
            treatments: TreatmentTable::default(),
            labels: LabelConfig::default(),
            registry: RegistryConfig::default(),
            server: ServerConfig::default(),
            poll_interval_secs: 0,
            logging: LoggingConfig::default(),
        }
    }
}

impl MapConfig {
    /// Parse configuration from a YAML string.
    pub fn from_yaml(yaml: &str) -> Result<Self> {
        let config: MapConfig =
            serde_yaml::from_str(yaml).context("Failed to parse map configuration")?;
        Ok(config)
    }

    /// Load configuration from a YAML file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        Self::from_yaml(&content).with_context(|| format!("Invalid config: {}", path.display()))
    }

    /// Apply `TSUNAMI_*` overrides from the process environment.
    pub fn apply_env(&mut self) -> Result<()> {
        self.apply_overrides(|key| std::env::var(key).ok())
    }

    /// Apply overrides from a variable lookup.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        if let Some(mode) = lookup("TSUNAMI_MODE") {
            self.mode = mode
                .parse()
                .map_err(|e: String| anyhow::anyhow!(e))
                .context("Invalid TSUNAMI_MODE")?;
        }
        if let Some(path) = lookup("TSUNAMI_REGIONS_PATH") {
            self.regions_path = PathBuf::from(path);
        }
        if let Some(path) = lookup("TSUNAMI_FIXTURE_PATH") {
            self.fixture_path = Some(PathBuf::from(path));
        }
        if let Some(url) = lookup("TSUNAMI_LIVE_URL") {
            self.live.url = url;
        }
        if let Some(listen) = lookup("TSUNAMI_LISTEN") {
            self.server.listen = listen;
        }
        if let Some(secs) = lookup("TSUNAMI_POLL_INTERVAL_SECS") {
            self.poll_interval_secs = secs
                .parse()
                .with_context(|| format!("Invalid TSUNAMI_POLL_INTERVAL_SECS: {}", secs))?;
        }
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if let Err(e) = self.treatments.validate() {
            bail!("Invalid treatments: {}", e);
        }
        if self.live.url.trim().is_empty() {
            bail!("live.url must not be empty");
        }
        if self.live.timeout_secs == 0 {
            bail!("live.timeout_secs must be greater than zero");
        }
        Ok(())
    }

    pub fn duplicate_policy(&self) -> DuplicatePolicy {
        if self.registry.reject_duplicates {
            DuplicatePolicy::Reject
        } else {
            DuplicatePolicy::FirstMatchWins
        }
    }

    pub fn pipeline_config(&self) -> PipelineConfig {
        PipelineConfig {
            treatments: self.treatments.clone(),
            labels: self.labels.clone(),
        }
    }
}
