/*
 * Copyright (c) 2024. Govcraft
 *
 * Licensed under either of
 *   * Apache License, Version 2.0 (the "License");
 *     you may not use this file except in compliance with the License.
 *     You may obtain a copy of the License at http://www.apache.org/licenses/LICENSE-2.0
 *   * MIT license: http://opensource.org/licenses/MIT
 *
 * Unless required by applicable law or agreed to in writing, software
 * distributed under the License is distributed on an "AS IS" BASIS,
 * WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
 * See the applicable License for the specific language governing permissions and
 * limitations under that License.
 */

use std::path::PathBuf;

use lazy_static::lazy_static;
use serde::{Deserialize, Serialize};

/// Prefix for the XDG directories the messenger reads and writes.
pub(crate) const XDG_PREFIX: &str = "thread-messenger";

/// Configuration for the thread messenger.
///
/// Loaded from TOML in XDG-compliant directories. Every section and field has a
/// default, so a partial file only overrides what it names.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MessengerConfig {
    /// Control log configuration
    pub logging: LoggingConfig,
    /// Tracing subscriber configuration
    pub tracing: TracingConfig,
    /// Path configuration
    pub paths: PathsConfig,
    /// Behavioral configuration switches
    pub behavior: BehaviorConfig,
}

/// Control log line configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Include the emitting thread id in every line
    pub display_thread_id: bool,
    /// Prefix used when a logger is created without one
    pub default_prefix: String,
    /// Prefix of the messenger's own logger
    pub messenger_prefix: String,
    /// Prefix of channel loggers, followed by ` - <channel name>`
    pub channel_prefix: String,
}

/// Tracing subscriber configuration used by [`init_tracing`](crate::init_tracing)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TracingConfig {
    /// Filter directive, e.g. `info` or `thread_messenger=trace`
    pub level: String,
    /// Log file name inside the log directory
    pub log_file: String,
}

/// Path configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// Directory for log files; the XDG data directory when unset
    pub log_directory: Option<PathBuf>,
}

/// Behavioral configuration switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BehaviorConfig {
    /// Emit control log lines at all
    pub enable_logging: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            display_thread_id: true,
            default_prefix: "default".to_string(),
            messenger_prefix: "Messenger".to_string(),
            channel_prefix: "Channel".to_string(),
        }
    }
}

impl Default for TracingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            log_file: "messenger.log".to_string(),
        }
    }
}

impl Default for BehaviorConfig {
    fn default() -> Self {
        Self {
            enable_logging: true,
        }
    }
}

impl MessengerConfig {
    /// Parses a configuration from TOML text.
    pub fn from_toml_str(source: &str) -> anyhow::Result<Self> {
        Ok(toml::from_str(source)?)
    }

    /// Resolves the log directory, falling back to `$XDG_DATA_HOME/thread-messenger/logs`.
    pub fn log_directory(&self) -> anyhow::Result<PathBuf> {
        match &self.paths.log_directory {
            Some(path) => Ok(path.clone()),
            None => {
                let xdg_dirs = xdg::BaseDirectories::with_prefix(XDG_PREFIX)?;
                Ok(xdg_dirs.get_data_home().join("logs"))
            }
        }
    }

    /// Load configuration from XDG-compliant locations
    ///
    /// Looks for `thread-messenger/config.toml` under `$XDG_CONFIG_HOME` and then
    /// `$XDG_CONFIG_DIRS`. If no file is found, returns the default configuration.
    /// If a file exists but is malformed, logs an error and uses defaults.
    pub fn load() -> Self {
        use tracing::{error, info};

        let xdg_dirs = match xdg::BaseDirectories::with_prefix(XDG_PREFIX) {
            Ok(dirs) => dirs,
            Err(e) => {
                error!("Failed to initialize XDG directories: {}", e);
                return Self::default();
            }
        };

        let Some(path) = xdg_dirs.find_config_file("config.toml") else {
            info!("No configuration file found, using defaults");
            return Self::default();
        };

        info!("Loading configuration from: {}", path.display());
        match std::fs::read_to_string(&path) {
            Ok(config_str) => match Self::from_toml_str(&config_str) {
                Ok(config) => {
                    info!("Successfully loaded configuration");
                    config
                }
                Err(e) => {
                    error!("Failed to parse configuration file {}: {}", path.display(), e);
                    Self::default()
                }
            },
            Err(e) => {
                error!("Failed to read configuration file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

lazy_static! {
    /// Global configuration instance loaded from XDG-compliant locations
    pub static ref CONFIG: MessengerConfig = MessengerConfig::load();
}
