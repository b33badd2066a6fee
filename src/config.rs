//! Configuration: retry surface plus the static instance table.
//!
//! Loaded from `~/.config/redial/config.toml` (created with defaults on
//! first use) or from an explicit path for test harnesses.

use std::collections::{BTreeSet, HashMap};
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::resolver::StaticResolver;
use crate::retry::{Backoff, ClassifyRules, RetryPolicy};

fn default_retryable_status_codes() -> BTreeSet<u16> {
    BTreeSet::from([500])
}

fn default_max_attempts() -> u32 {
    3
}

fn default_retry_transport_errors() -> bool {
    true
}

/// Everything the call executor can be configured with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RedialConfig {
    /// Status codes treated as transient (retried under policy).
    #[serde(default = "default_retryable_status_codes")]
    pub retryable_status_codes: BTreeSet<u16>,
    /// Maximum attempts per call, including the first. Must be >= 1.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,
    /// Whether timeouts and connection failures count as transient.
    #[serde(default = "default_retry_transport_errors")]
    pub retry_transport_errors: bool,
    /// Delay strategy between attempts.
    #[serde(default)]
    pub backoff: Backoff,
    /// Static instance table: service name -> base URLs.
    #[serde(default)]
    pub instances: HashMap<String, Vec<String>>,
}

impl Default for RedialConfig {
    fn default() -> Self {
        Self {
            retryable_status_codes: default_retryable_status_codes(),
            max_attempts: default_max_attempts(),
            retry_transport_errors: default_retry_transport_errors(),
            backoff: Backoff::default(),
            instances: HashMap::new(),
        }
    }
}

impl RedialConfig {
    /// Rejects values the executor refuses to run with.
    pub fn validate(&self) -> Result<()> {
        if self.max_attempts < 1 {
            anyhow::bail!("max_attempts must be >= 1");
        }
        Ok(())
    }

    pub fn policy(&self) -> RetryPolicy {
        RetryPolicy {
            max_attempts: self.max_attempts,
            backoff: self.backoff,
        }
    }

    pub fn rules(&self) -> ClassifyRules {
        ClassifyRules {
            retryable_status_codes: self.retryable_status_codes.clone(),
            retry_transport_errors: self.retry_transport_errors,
        }
    }

    /// Builds the resolver from the instance table, parsing every address.
    pub fn resolver(&self) -> Result<StaticResolver> {
        StaticResolver::from_table(&self.instances).context("invalid instance table")
    }
}

pub fn config_path() -> Result<PathBuf> {
    let xdg_dirs = xdg::BaseDirectories::with_prefix("redial")?;
    Ok(xdg_dirs.place_config_file("config.toml")?)
}

/// Load configuration from disk, creating a default file if none exists.
pub fn load_or_init() -> Result<RedialConfig> {
    let path = config_path()?;
    if !path.exists() {
        let default_cfg = RedialConfig::default();
        let toml = toml::to_string_pretty(&default_cfg)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&path, toml)?;
        tracing::info!("created default config at {}", path.display());
        return Ok(default_cfg);
    }
    load_from(&path)
}

/// Load and validate configuration from an explicit path.
pub fn load_from(path: &Path) -> Result<RedialConfig> {
    let data = fs::read_to_string(path)
        .with_context(|| format!("reading {}", path.display()))?;
    let cfg: RedialConfig = toml::from_str(&data)?;
    cfg.validate()?;
    Ok(cfg)
}
