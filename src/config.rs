use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::generator::ContentSource;
use crate::generator::remote::{self, GeminiSource};
use crate::session::rules::GameRules;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    #[serde(default = "default_start_level")]
    pub start_level: u32,
    #[serde(default = "default_level_seconds")]
    pub level_seconds: u32,
    #[serde(default = "default_initial_batch")]
    pub initial_batch: usize,
    #[serde(default = "default_refill_batch")]
    pub refill_batch: usize,
    #[serde(default = "default_low_water")]
    pub low_water: usize,
    #[serde(default = "default_feedback_ms")]
    pub feedback_ms: u64,
    #[serde(default = "default_reveal_ms")]
    pub reveal_ms: u64,
    #[serde(default = "default_time_bonus_seconds")]
    pub time_bonus_seconds: u32,
    #[serde(default = "default_reveal_uses")]
    pub reveal_uses: u32,
    #[serde(default = "default_time_extension_uses")]
    pub time_extension_uses: u32,
    #[serde(default = "default_remote_enabled")]
    pub remote_enabled: bool,
    #[serde(default = "default_remote_timeout_ms")]
    pub remote_timeout_ms: u64,
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
}

fn default_theme() -> String {
    "warehouse".to_string()
}
fn default_start_level() -> u32 {
    1
}
fn default_level_seconds() -> u32 {
    60
}
fn default_initial_batch() -> usize {
    8
}
fn default_refill_batch() -> usize {
    5
}
fn default_low_water() -> usize {
    5
}
fn default_feedback_ms() -> u64 {
    1200
}
fn default_reveal_ms() -> u64 {
    1000
}
fn default_time_bonus_seconds() -> u32 {
    15
}
fn default_reveal_uses() -> u32 {
    3
}
fn default_time_extension_uses() -> u32 {
    1
}
fn default_remote_enabled() -> bool {
    true
}
fn default_remote_timeout_ms() -> u64 {
    800
}
fn default_request_timeout_secs() -> u64 {
    10
}
fn default_model() -> String {
    remote::DEFAULT_MODEL.to_string()
}
fn default_endpoint() -> String {
    remote::DEFAULT_ENDPOINT.to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            start_level: default_start_level(),
            level_seconds: default_level_seconds(),
            initial_batch: default_initial_batch(),
            refill_batch: default_refill_batch(),
            low_water: default_low_water(),
            feedback_ms: default_feedback_ms(),
            reveal_ms: default_reveal_ms(),
            time_bonus_seconds: default_time_bonus_seconds(),
            reveal_uses: default_reveal_uses(),
            time_extension_uses: default_time_extension_uses(),
            remote_enabled: default_remote_enabled(),
            remote_timeout_ms: default_remote_timeout_ms(),
            request_timeout_secs: default_request_timeout_secs(),
            model: default_model(),
            endpoint: default_endpoint(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if path.exists() {
            let content = fs::read_to_string(path)?;
            let mut config: Config = toml::from_str(&content)?;
            config.normalize();
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("returnsleuth")
            .join("config.toml")
    }

    /// Replace values that would stall or break a session with defaults.
    pub fn normalize(&mut self) {
        if self.start_level == 0 {
            self.start_level = default_start_level();
        }
        if self.level_seconds == 0 {
            self.level_seconds = default_level_seconds();
        }
        if self.initial_batch == 0 {
            self.initial_batch = default_initial_batch();
        }
        if self.refill_batch == 0 {
            self.refill_batch = default_refill_batch();
        }
        if self.remote_timeout_ms == 0 {
            self.remote_timeout_ms = default_remote_timeout_ms();
        }
        if self.model.trim().is_empty() {
            self.model = default_model();
        }
        if self.endpoint.trim().is_empty() {
            self.endpoint = default_endpoint();
        }
    }

    pub fn rules(&self) -> GameRules {
        GameRules {
            level_seconds: self.level_seconds,
            initial_batch: self.initial_batch,
            refill_batch: self.refill_batch,
            low_water: self.low_water,
            remote_timeout: Duration::from_millis(self.remote_timeout_ms),
            feedback: Duration::from_millis(self.feedback_ms),
            reveal_display: Duration::from_millis(self.reveal_ms),
            time_bonus_seconds: self.time_bonus_seconds,
            reveal_uses: self.reveal_uses,
            time_extension_uses: self.time_extension_uses,
            ..GameRules::default()
        }
    }

    /// The external content source, if enabled and a credential is set.
    pub fn content_source(&self, api_key: Option<String>) -> Option<Arc<dyn ContentSource>> {
        if !self.remote_enabled {
            tracing::info!("content source disabled by config");
            return None;
        }
        let Some(api_key) = api_key else {
            tracing::info!("no content source credential, using the local catalog only");
            return None;
        };
        Some(Arc::new(GeminiSource::new(
            api_key,
            &self.model,
            &self.endpoint,
            Duration::from_secs(self.request_timeout_secs),
        )))
    }
}
