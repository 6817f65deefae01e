pub mod loader;
pub mod schema;

pub use loader::{load_config, load_config_from_str};
pub use schema::{SkillConfig, DEFAULT_API_BASE_URL, DEFAULT_TOKEN_ENV_VAR};
