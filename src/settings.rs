//! Client settings
//!
//! Defaults, then `Settings.toml` in the working directory, then the one in
//! `FIDO_CLIENT_CONFIG_DIR`, then environment variables. A `.env` file in the
//! working directory is read into the environment first.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Settings file looked up in the working directory and in the config dir
pub const SETTINGS_FILE: &str = "Settings.toml";

/// Directory holding a higher-priority `Settings.toml`
pub const CONFIG_DIR_ENV: &str = "FIDO_CLIENT_CONFIG_DIR";

#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct ClientSettings {
    pub server: ServerSettings,
    pub endpoints: EndpointSettings,
    pub http: HttpSettings,
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ServerSettings {
    pub base_url: String,
}

/// Relying-party paths, relative to `server.base_url`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct EndpointSettings {
    pub registration_options: String,
    pub registration_submit: String,
    pub login_options: String,
    pub login_submit: String,
    pub user_id_lookup: String,
    /// Ask the server for platform-attached authenticators only
    pub platform_only: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct HttpSettings {
    pub connect_timeout_seconds: u64,
    /// Whole-request deadline, body included
    pub request_timeout_seconds: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct LoggingSettings {
    pub level: String,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            base_url: "https://fido2.apps.praphull.com".to_string(),
        }
    }
}

impl Default for EndpointSettings {
    fn default() -> Self {
        Self {
            registration_options: "/auth/fido2/attestation/options".to_string(),
            registration_submit: "/auth/fido2/register".to_string(),
            login_options: "/auth/fido2/assertion/options".to_string(),
            login_submit: "/auth/fido2/login".to_string(),
            user_id_lookup: "/auth/fido2/user/id".to_string(),
            platform_only: true,
        }
    }
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_seconds: 40,
            request_timeout_seconds: 30,
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

impl ClientSettings {
    /// Load settings from configuration files and environment variables,
    /// then initialize logging at the configured level
    ///
    /// A logger already installed by the host application is left in place.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - A settings file cannot be read or parsed
    /// - The resulting settings are invalid
    pub fn load() -> Result<Self> {
        Self::load_env_file();

        let config_dir = std::env::var(CONFIG_DIR_ENV).ok().map(PathBuf::from);
        let (mut settings, sources) =
            Self::load_base_settings(Path::new(SETTINGS_FILE), config_dir.as_deref())?;
        settings.apply_env_overrides();
        settings.validate()?;
        let _ = settings.init_logging();

        for source in &sources {
            log::info!("Loaded settings from {}", source.display());
        }
        Ok(settings)
    }

    /// Load base settings from TOML file(s) or use defaults
    /// Settings are loaded with the following priority (highest to lowest):
    /// 1. Environment variables (applied separately after loading base settings)
    /// 2. Settings.toml in `FIDO_CLIENT_CONFIG_DIR` (if specified and exists)
    /// 3. Settings.toml in current directory (if exists)
    /// 4. Default settings
    ///
    /// Returns the settings and the files they were read from.
    ///
    /// # Errors
    ///
    /// Returns an error if a settings file exists but cannot be read or parsed.
    pub fn load_base_settings(
        local_file: &Path,
        config_dir: Option<&Path>,
    ) -> Result<(Self, Vec<PathBuf>)> {
        let mut settings = Self::default();
        let mut sources = Vec::new();

        if local_file.exists() {
            settings = Self::read_file(local_file)?;
            sources.push(local_file.to_path_buf());
        }

        if let Some(dir) = config_dir {
            let dir_file = dir.join(SETTINGS_FILE);
            if dir_file.exists() {
                // Replaces the local file wholesale
                settings = Self::read_file(&dir_file)?;
                sources.push(dir_file);
            }
        }

        Ok((settings, sources))
    }

    fn read_file(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        basic_toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Apply environment variable overrides
    pub fn apply_env_overrides(&mut self) {
        if let Ok(base_url) = std::env::var("FIDO_BASE_URL") {
            self.server.base_url = base_url;
        }
        Self::apply_numeric_env_override(
            "FIDO_CONNECT_TIMEOUT_SECONDS",
            &mut self.http.connect_timeout_seconds,
        );
        Self::apply_numeric_env_override(
            "FIDO_REQUEST_TIMEOUT_SECONDS",
            &mut self.http.request_timeout_seconds,
        );
        if let Ok(platform_only) = std::env::var("FIDO_PLATFORM_ONLY") {
            if let Ok(platform_only) = platform_only.parse::<bool>() {
                self.endpoints.platform_only = platform_only;
            }
        }
        if let Ok(log_level) = std::env::var("RUST_LOG") {
            self.logging.level = log_level;
        }
    }

    fn apply_numeric_env_override(env_var: &str, target: &mut u64) {
        if let Ok(value_str) = std::env::var(env_var) {
            if let Ok(value) = value_str.parse::<u64>() {
                *target = value;
            }
        }
    }

    /// Check that the base URL parses and timeouts are non-zero
    ///
    /// # Errors
    ///
    /// Returns an error describing the first invalid value.
    pub fn validate(&self) -> Result<()> {
        self.base_url()?;
        if self.http.connect_timeout_seconds == 0 || self.http.request_timeout_seconds == 0 {
            anyhow::bail!("HTTP timeouts must be greater than zero");
        }
        Ok(())
    }

    /// The relying-party origin as a parsed URL
    ///
    /// # Errors
    ///
    /// Returns an error if `server.base_url` is not an absolute URL.
    pub fn base_url(&self) -> Result<url::Url> {
        url::Url::parse(&self.server.base_url)
            .with_context(|| format!("Invalid base_url: {}", self.server.base_url))
    }

    /// Install `env_logger` at the configured level
    ///
    /// Returns `false` when another logger is already installed.
    #[must_use]
    pub fn init_logging(&self) -> bool {
        match env_logger::Builder::new()
            .parse_filters(&self.logging.level)
            .try_init()
        {
            Ok(()) => true,
            Err(e) => {
                log::debug!("Keeping the existing logger: {e}");
                false
            }
        }
    }

    /// Load environment variables from .env file
    fn load_env_file() {
        if let Ok(contents) = std::fs::read_to_string(".env") {
            for line in contents.lines() {
                if let Some((key, value)) = line.split_once('=') {
                    std::env::set_var(key.trim(), value.trim());
                }
            }
        }
    }
}
