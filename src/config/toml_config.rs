use crate::config::DiscoveryConfig;
use crate::utils::error::{MarketError, Result};
use crate::utils::validation::Validate;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;

static ENV_VAR_PATTERN: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\$\{([^}]+)\}").ok());

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TomlConfig {
    pub api: ApiConfig,
    pub output: Option<OutputConfig>,
    pub discovery: Option<DiscoverySection>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_seconds: Option<u64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    pub path: Option<String>,
    pub format: Option<String>,
}

/// Default criteria for runs that don't pass them on the command line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DiscoverySection {
    pub sort: Option<String>,
    pub governorate: Option<String>,
}

impl TomlConfig {
    /// Reads and parses a TOML file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| MarketError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// `${VAR}` becomes the variable's value; unset variables stay as written.
    fn substitute_env_vars(content: &str) -> String {
        let Some(re) = ENV_VAR_PATTERN.as_ref() else {
            return content.to_string();
        };
        re.replace_all(content, |caps: &regex::Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| format!("${{{}}}", var_name))
        })
        .into_owned()
    }

    pub fn into_discovery_config(self) -> DiscoveryConfig {
        let mut config = DiscoveryConfig {
            api_base_url: self.api.base_url,
            ..DiscoveryConfig::default()
        };
        if let Some(timeout) = self.api.timeout_seconds {
            config.request_timeout_secs = timeout;
        }
        if let Some(output) = self.output {
            if let Some(path) = output.path {
                config.output_path = path;
            }
            if let Some(format) = output.format {
                config.output_format = format;
            }
        }
        if let Some(discovery) = self.discovery {
            if let Some(sort) = discovery.sort {
                config.sort = sort;
            }
            if let Some(governorate) = discovery.governorate {
                config.governorate = governorate;
            }
        }
        config
    }
}

impl Validate for TomlConfig {
    fn validate(&self) -> Result<()> {
        self.clone().into_discovery_config().validate()
    }
}
