use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Environment variable that overrides the configured server URL.
pub const SERVER_URL_ENV: &str = "FINPLAY_SERVER_URL";

const APP_DIR: &str = "finplay";
const CONFIG_FILE: &str = "config.json";

/// Client settings persisted as JSON in the user's config directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientConfig {
    pub server_url: String,
    /// Sent to the server in the client descriptor
    pub client_name: String,
    pub device_name: String,
    /// Stable per install; generated on first load
    pub device_id: String,
    pub client_version: String,
    pub request_timeout_secs: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            server_url: "http://localhost:8096".to_string(),
            client_name: "finplay".to_string(),
            device_name: "finplay".to_string(),
            device_id: new_device_id(),
            client_version: env!("CARGO_PKG_VERSION").to_string(),
            request_timeout_secs: 30,
        }
    }
}

impl ClientConfig {
    /// `<config dir>/finplay/config.json`, when the platform has a config dir.
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join(APP_DIR).join(CONFIG_FILE))
    }

    /// Loads from the default location. With no file, the defaults are
    /// written out so the generated device id survives the next launch.
    /// `FINPLAY_SERVER_URL` wins over the file.
    pub fn load() -> Result<Self> {
        let mut config = match Self::default_path() {
            Some(path) if path.exists() => Self::load_from(&path)?,
            Some(path) => {
                debug!("no config file found, writing defaults");
                let config = Self::default();
                if let Err(e) = config.save_to(&path) {
                    warn!(
                        error = %format!("{e:#}"),
                        "could not persist default config"
                    );
                }
                config
            }
            None => {
                debug!("no config directory, using defaults");
                Self::default()
            }
        };
        config.apply_env_override();
        Ok(config)
    }

    /// Reads a config file. Missing fields take their defaults; a file that
    /// is not valid JSON is an error. A file without a device id gets the
    /// freshly generated one written back.
    pub fn load_from(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).with_context(|| {
            format!("failed to read config at {}", path.display())
        })?;
        let value = serde_json::from_str::<serde_json::Value>(&content)
            .with_context(|| format!("invalid config at {}", path.display()))?;
        let has_device_id = value
            .get("device_id")
            .and_then(serde_json::Value::as_str)
            .is_some_and(|id| !id.trim().is_empty());
        let mut config = serde_json::from_value::<ClientConfig>(value)
            .with_context(|| format!("invalid config at {}", path.display()))?;

        if !has_device_id {
            config.device_id = new_device_id();
            if let Err(e) = config.save_to(path) {
                warn!(error = %format!("{e:#}"), "could not persist device id");
            }
        }
        info!(
            path = %path.display(),
            server = %config.server_url,
            "loaded client config"
        );
        Ok(config)
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::default_path()
            .context("platform has no config directory")?;
        self.save_to(&path)
    }

    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!("failed to create {}", parent.display())
            })?;
        }
        let content = serde_json::to_string_pretty(self)?;
        std::fs::write(path, content).with_context(|| {
            format!("failed to write config to {}", path.display())
        })?;
        Ok(())
    }

    fn apply_env_override(&mut self) {
        if let Ok(server_url) = std::env::var(SERVER_URL_ENV)
            && !server_url.trim().is_empty()
        {
            debug!(
                server = %server_url,
                "server URL overridden from environment"
            );
            self.server_url = server_url;
        }
    }
}

fn new_device_id() -> String {
    uuid::Uuid::new_v4().simple().to_string()
}
