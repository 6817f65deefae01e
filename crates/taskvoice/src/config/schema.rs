use std::time::Duration;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::secrets::{self, SecretError};

pub const DEFAULT_API_BASE_URL: &str = "https://app.asana.com/api/1.0";
pub const DEFAULT_TOKEN_ENV_VAR: &str = "ASANA_ACCESS_TOKEN";

pub const ENV_DEFAULT_WORKSPACE_ID: &str = "ASANA_DEFAULT_WORKSPACE_ID";
pub const ENV_ACCESS_TOKEN_FILE: &str = "ASANA_ACCESS_TOKEN_FILE";
pub const ENV_API_BASE_URL: &str = "ASANA_API_BASE_URL";
pub const ENV_IDENTITY_CACHE_TTL: &str = "TASKVOICE_IDENTITY_CACHE_TTL_SECS";

/// Runtime configuration for the skill.
///
/// Everything here is opaque to the pipeline except `default_workspace_id`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct SkillConfig {
    /// Workspace used for every task. When unset, the user's first workspace.
    #[serde(default)]
    pub default_workspace_id: Option<String>,

    /// Service token given inline. Prefer the file or env var forms.
    #[serde(default, skip_serializing)]
    pub access_token: Option<String>,

    #[serde(default)]
    pub access_token_file: Option<String>,

    #[serde(default = "default_token_env_var")]
    pub access_token_env_var: Option<String>,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    #[serde(default = "default_connect_timeout")]
    pub connect_timeout_secs: u64,

    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Opt-in identity cache TTL. `None` resolves the user on every request.
    #[serde(default)]
    pub identity_cache_ttl_secs: Option<u64>,
}

fn default_token_env_var() -> Option<String> {
    Some(DEFAULT_TOKEN_ENV_VAR.to_string())
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_connect_timeout() -> u64 {
    10
}

fn default_request_timeout() -> u64 {
    30
}

impl Default for SkillConfig {
    fn default() -> Self {
        Self {
            default_workspace_id: None,
            access_token: None,
            access_token_file: None,
            access_token_env_var: default_token_env_var(),
            api_base_url: default_api_base_url(),
            connect_timeout_secs: default_connect_timeout(),
            request_timeout_secs: default_request_timeout(),
            identity_cache_ttl_secs: None,
        }
    }
}

impl SkillConfig {
    /// Builds a config from the process environment.
    ///
    /// The service token itself is not read here; it stays behind
    /// `access_token_env_var` until [`SkillConfig::service_token`] is called.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = Self {
            default_workspace_id: env_non_empty(ENV_DEFAULT_WORKSPACE_ID),
            access_token_file: env_non_empty(ENV_ACCESS_TOKEN_FILE),
            ..Self::default()
        };

        if let Some(url) = env_non_empty(ENV_API_BASE_URL) {
            config.api_base_url = url;
        }

        if let Some(raw) = env_non_empty(ENV_IDENTITY_CACHE_TTL) {
            let ttl = raw.trim().parse::<u64>().map_err(|e| ConfigError::InvalidEnvVar {
                name: ENV_IDENTITY_CACHE_TTL.to_string(),
                reason: e.to_string(),
            })?;
            config.identity_cache_ttl_secs = Some(ttl);
        }

        Ok(config)
    }

    /// The configured default workspace, ignoring blank values.
    pub fn default_workspace(&self) -> Option<&str> {
        self.default_workspace_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }

    /// Resolves the fallback service credential, if one is configured.
    pub fn service_token(&self) -> Result<Option<SecretString>, SecretError> {
        secrets::resolve_secret_optional(
            self.access_token.as_deref(),
            self.access_token_file.as_deref(),
            self.access_token_env_var.as_deref(),
        )
    }

    pub fn connect_timeout(&self) -> Duration {
        Duration::from_secs(self.connect_timeout_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn identity_cache_ttl(&self) -> Option<Duration> {
        self.identity_cache_ttl_secs
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs)
    }
}

fn env_non_empty(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}
