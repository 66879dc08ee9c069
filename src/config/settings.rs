use crate::config::{default_state_root, ConfigError};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

fn default_redirect_uri() -> String {
    "http://localhost:8501".to_string()
}

fn default_login_base() -> String {
    "https://login.microsoftonline.com".to_string()
}

fn default_graph_base() -> String {
    "https://graph.microsoft.com".to_string()
}

/// Connection settings for the three external services: the identity
/// provider, the agent runtime, and the workflow endpoints.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Settings {
    #[serde(default)]
    pub client_id: String,
    #[serde(default)]
    pub client_secret: String,
    /// Directory users authenticate against.
    #[serde(default)]
    pub user_tenant_id: String,
    /// Directory that owns the agent runtime resources.
    #[serde(default)]
    pub service_tenant_id: String,
    #[serde(default)]
    pub agent_endpoint: String,
    #[serde(default = "default_redirect_uri")]
    pub redirect_uri: String,
    #[serde(default)]
    pub tenant_lookup_url: String,
    #[serde(default)]
    pub submission_url: String,
    #[serde(default = "default_login_base")]
    pub login_base: String,
    #[serde(default = "default_graph_base")]
    pub graph_base: String,
    #[serde(default)]
    pub state_root: Option<PathBuf>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            client_id: String::new(),
            client_secret: String::new(),
            user_tenant_id: String::new(),
            service_tenant_id: String::new(),
            agent_endpoint: String::new(),
            redirect_uri: default_redirect_uri(),
            tenant_lookup_url: String::new(),
            submission_url: String::new(),
            login_base: default_login_base(),
            graph_base: default_graph_base(),
            state_root: None,
        }
    }
}

impl Settings {
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_yaml::from_str(&raw).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }

    /// `ONBOARD_*` environment variables win over the settings file.
    pub fn apply_env_overrides(&mut self) {
        let overrides: [(&str, &mut String); 10] = [
            ("ONBOARD_CLIENT_ID", &mut self.client_id),
            ("ONBOARD_CLIENT_SECRET", &mut self.client_secret),
            ("ONBOARD_USER_TENANT_ID", &mut self.user_tenant_id),
            ("ONBOARD_SERVICE_TENANT_ID", &mut self.service_tenant_id),
            ("ONBOARD_AGENT_ENDPOINT", &mut self.agent_endpoint),
            ("ONBOARD_REDIRECT_URI", &mut self.redirect_uri),
            ("ONBOARD_TENANT_LOOKUP_URL", &mut self.tenant_lookup_url),
            ("ONBOARD_SUBMISSION_URL", &mut self.submission_url),
            ("ONBOARD_LOGIN_BASE", &mut self.login_base),
            ("ONBOARD_GRAPH_BASE", &mut self.graph_base),
        ];
        for (key, slot) in overrides {
            if let Some(value) = env_value(key) {
                *slot = value;
            }
        }
        if let Some(value) = env_value("ONBOARD_STATE_ROOT") {
            self.state_root = Some(PathBuf::from(value));
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let required: [(&str, &str); 7] = [
            ("client_id", &self.client_id),
            ("client_secret", &self.client_secret),
            ("user_tenant_id", &self.user_tenant_id),
            ("service_tenant_id", &self.service_tenant_id),
            ("agent_endpoint", &self.agent_endpoint),
            ("tenant_lookup_url", &self.tenant_lookup_url),
            ("submission_url", &self.submission_url),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::Settings(format!("{name} must be set")));
            }
        }
        Ok(())
    }

    pub fn resolve_state_root(&self) -> Result<PathBuf, ConfigError> {
        match &self.state_root {
            Some(root) => Ok(root.clone()),
            None => default_state_root(),
        }
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .filter(|value| !value.trim().is_empty())
}
