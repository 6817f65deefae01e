use crate::config::SkillConfig;

#[derive(Debug, Clone, Default)]
pub struct PipelineConfig {
    pub default_workspace_id: Option<String>,
}

impl PipelineConfig {
    pub fn from_config(config: &SkillConfig) -> Self {
        Self {
            default_workspace_id: config.default_workspace().map(str::to_string),
        }
    }

    pub fn with_default_workspace(workspace_id: impl Into<String>) -> Self {
        Self {
            default_workspace_id: Some(workspace_id.into()),
        }
    }
}
