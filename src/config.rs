//! Engine configuration.
//!
//! Loaded once at startup from a YAML file, from environment variables, or
//! left at defaults. Every tunable of the engine flows through here.
//!
//! Environment variables:
//!   ORGCHART_TEAM_VIEW                show only the viewer's team (default: true)
//!   ORGCHART_TEAM_DEPTH               `direct` or `full` (default: direct)
//!   ORGCHART_BLUE_COLLAR_DOMAIN       mail domain of blue-collar accounts
//!   ORGCHART_IDENTITY_CACHE_CAPACITY  normalization cache bound (default: 1000)

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{OrgChartError, Result};
use crate::scope::TeamDepth;

pub const DEFAULT_BLUE_COLLAR_DOMAIN: &str = "assaabloy.com";
pub const DEFAULT_IDENTITY_CACHE_CAPACITY: usize = 1000;

const ENV_TEAM_VIEW: &str = "ORGCHART_TEAM_VIEW";
const ENV_TEAM_DEPTH: &str = "ORGCHART_TEAM_DEPTH";
const ENV_BLUE_COLLAR_DOMAIN: &str = "ORGCHART_BLUE_COLLAR_DOMAIN";
const ENV_IDENTITY_CACHE_CAPACITY: &str = "ORGCHART_IDENTITY_CACHE_CAPACITY";

/// "My team" view settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TeamViewConfig {
    /// Filter the chart down to the viewer's team when a viewer id is known.
    pub enabled: bool,
    pub depth: TeamDepth,
}

impl Default for TeamViewConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            depth: TeamDepth::DirectReports,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub team_view: TeamViewConfig,
    /// Accounts shaped `<digits>@<domain>` are blue-collar workers.
    pub blue_collar_domain: String,
    pub identity_cache_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            team_view: TeamViewConfig::default(),
            blue_collar_domain: DEFAULT_BLUE_COLLAR_DOMAIN.to_string(),
            identity_cache_capacity: DEFAULT_IDENTITY_CACHE_CAPACITY,
        }
    }
}

impl EngineConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_yaml_str(&raw)
    }

    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Defaults overridden by whatever `lookup` yields for the `ORGCHART_*` keys.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(value) = lookup(ENV_TEAM_VIEW) {
            config.team_view.enabled = parse_bool(&value);
        }
        if let Some(value) = lookup(ENV_TEAM_DEPTH) {
            config.team_view.depth = value
                .parse()
                .map_err(|reason: String| OrgChartError::invalid_config(ENV_TEAM_DEPTH, reason))?;
        }
        if let Some(value) = lookup(ENV_BLUE_COLLAR_DOMAIN) {
            config.blue_collar_domain = value.trim().to_string();
        }
        if let Some(value) = lookup(ENV_IDENTITY_CACHE_CAPACITY) {
            config.identity_cache_capacity = value.trim().parse().map_err(|_| {
                OrgChartError::invalid_config(
                    ENV_IDENTITY_CACHE_CAPACITY,
                    format!("'{}' is not a positive integer", value),
                )
            })?;
        }

        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.identity_cache_capacity < 2 {
            return Err(OrgChartError::invalid_config(
                "identity_cache_capacity",
                "must be at least 2",
            ));
        }
        if self.blue_collar_domain.trim().is_empty() {
            return Err(OrgChartError::invalid_config(
                "blue_collar_domain",
                "must not be empty",
            ));
        }
        Ok(())
    }

    pub fn with_team_depth(mut self, depth: TeamDepth) -> Self {
        self.team_view.depth = depth;
        self
    }

    pub fn with_team_view(mut self, enabled: bool) -> Self {
        self.team_view.enabled = enabled;
        self
    }

    pub fn with_blue_collar_domain(mut self, domain: impl Into<String>) -> Self {
        self.blue_collar_domain = domain.into();
        self
    }
}

fn parse_bool(value: &str) -> bool {
    matches!(value.trim().to_lowercase().as_str(), "true" | "1" | "yes")
}
