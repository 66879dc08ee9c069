use super::{default_global_config_path, ConfigError, Settings};

/// Settings file is optional; env overrides alone can carry a deployment.
pub fn load_settings() -> Result<Settings, ConfigError> {
    let path = default_global_config_path()?;
    let mut settings = if path.exists() {
        Settings::from_path(&path)?
    } else {
        Settings::default()
    };
    settings.apply_env_overrides();
    settings.validate()?;
    Ok(settings)
}
