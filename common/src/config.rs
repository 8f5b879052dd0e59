//! # Configuration
//!
//! * [`SwitchConfig`]: which switches to inspect (`switch_config.json`).
//! * [`Credentials`]: how to log in (`credentials.json`). Password and enable
//!   secret are never read from disk; the binary prompts for them.
//! * [`Config`]: runtime options, built once at startup and passed down.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::error::ConfigError;
use crate::utils::retry::RetryPolicy;

pub const DEFAULT_SSH_PORT: u16 = 22;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct SwitchConfig {
    pub access_switch: String,
    #[serde(default)]
    pub core_switch: Option<String>,
    #[serde(default)]
    pub excluded_ports: Vec<String>,
}

impl SwitchConfig {
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let cfg: SwitchConfig = read_json(path)?;
        if cfg.access_switch.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "`access_switch` must not be empty".to_string(),
            ));
        }
        Ok(cfg)
    }

    /// The core switch used for ARP lookups, if one is configured.
    pub fn core_host(&self) -> Option<&str> {
        self.core_switch
            .as_deref()
            .map(str::trim)
            .filter(|host| !host.is_empty())
    }

    pub fn is_excluded(&self, port: &str) -> bool {
        self.excluded_ports.iter().any(|excluded| excluded == port)
    }
}

#[derive(Clone, Deserialize)]
pub struct Credentials {
    /// Netmiko-style device type, e.g. `cisco_ios`. Sessions refuse types
    /// whose CLI does not behave like IOS.
    pub device_type: String,
    pub username: String,
    #[serde(default, skip_deserializing)]
    pub password: String,
    #[serde(default, skip_deserializing)]
    pub secret: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

fn default_port() -> u16 {
    DEFAULT_SSH_PORT
}

impl Credentials {
    pub fn new(device_type: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            device_type: device_type.into(),
            username: username.into(),
            password: String::new(),
            secret: String::new(),
            port: DEFAULT_SSH_PORT,
        }
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let creds: Credentials = read_json(path)?;
        if creds.username.trim().is_empty() {
            return Err(ConfigError::Invalid("`username` must not be empty".to_string()));
        }
        Ok(creds)
    }

    pub fn with_secrets(mut self, password: String, secret: String) -> Self {
        self.password = password;
        self.secret = secret;
        self
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("device_type", &self.device_type)
            .field("username", &self.username)
            .field("password", &"<redacted>")
            .field("secret", &"<redacted>")
            .field("port", &self.port)
            .finish()
    }
}

/// Runtime options for one run.
#[derive(Debug, Clone)]
pub struct Config {
    /// 0 prints everything, 1 hides banners, 2 prints the table only.
    pub quiet: u8,
    /// Directory the CSV report is written to.
    pub output_dir: PathBuf,
    /// Skip writing the CSV report.
    pub no_csv: bool,
    /// How long a single command may stay silent before it is abandoned.
    pub command_timeout: Duration,
    /// Policy for re-reading an empty MAC address table.
    pub mac_retry: RetryPolicy,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            quiet: 0,
            output_dir: PathBuf::from("."),
            no_csv: false,
            command_timeout: Duration::from_secs(30),
            mac_retry: RetryPolicy::default(),
        }
    }
}

fn read_json<T: DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let raw = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    serde_json::from_str(&raw).map_err(|source| ConfigError::Json {
        path: path.to_path_buf(),
        source,
    })
}
