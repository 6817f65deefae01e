use std::path::Path;

use reqwest::Url;

use crate::config::schema::SkillConfig;
use crate::error::ConfigError;

pub fn load_config<P: AsRef<Path>>(path: P) -> Result<SkillConfig, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;

    load_config_from_str(&content)
}

pub fn load_config_from_str(content: &str) -> Result<SkillConfig, ConfigError> {
    let config: SkillConfig = serde_json::from_str(content)?;

    validate_config(&config)?;

    Ok(config)
}

fn validate_config(config: &SkillConfig) -> Result<(), ConfigError> {
    let url = Url::parse(&config.api_base_url).map_err(|e| ConfigError::Validation {
        message: format!("apiBaseUrl '{}' is not a valid URL: {}", config.api_base_url, e),
    })?;
    if url.scheme() != "https" && url.scheme() != "http" {
        return Err(ConfigError::Validation {
            message: format!("apiBaseUrl must use http or https, got '{}'", url.scheme()),
        });
    }

    if config.connect_timeout_secs == 0 {
        return Err(ConfigError::Validation {
            message: "connectTimeoutSecs must be greater than zero".to_string(),
        });
    }
    if config.request_timeout_secs == 0 {
        return Err(ConfigError::Validation {
            message: "requestTimeoutSecs must be greater than zero".to_string(),
        });
    }

    if let Some(id) = &config.default_workspace_id {
        if !id.trim().is_empty() && id.trim().contains('/') {
            return Err(ConfigError::Validation {
                message: format!("defaultWorkspaceId '{}' must not contain '/'", id),
            });
        }
    }

    Ok(())
}
