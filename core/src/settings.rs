//! Configuration layer: typed settings with layered precedence
//! (default → file → environment → CLI flag).
//!
//! The file and environment layers are merged by the `config` crate into an
//! all-optional [`RawSettings`]. Command-line overrides are applied on top,
//! then [`Settings::from_raw`] fills in defaults and validates. The result is
//! immutable and passed by reference to everything that needs it.

use std::{
    path::{Path, PathBuf},
    time::Duration,
};

use config::{builder::DefaultState, Config, ConfigBuilder, Environment, File, Source};
use serde::Deserialize;
use thiserror::Error;
use tracing::level_filters::LevelFilter;

pub const ENV_PREFIX: &str = "HASSIO";
pub const CONFIG_BASENAME: &str = ".homeassistant";
pub const DEFAULT_ENDPOINT: &str = "hassio";
pub const DEFAULT_LOG_LEVEL: LevelFilter = LevelFilter::WARN;
pub const DEFAULT_AUTH_HEADER: &str = "Authorization";
pub const DEFAULT_AUTH_SCHEME: &str = "Bearer";

/// Extensions tried after `$HOME/.homeassistant`, in order.
const CONFIG_EXTENSIONS: [&str; 7] = ["yaml", "yml", "json", "toml", "ini", "ron", "json5"];

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to build configuration: {0}")]
    Build(#[from] config::ConfigError),
    #[error("error while finding home directory")]
    HomeDirectory,
    #[error("invalid configuration for `{key}`: {reason}")]
    Invalid { key: &'static str, reason: String },
}

impl LoadError {
    fn invalid(key: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            key,
            reason: reason.into(),
        }
    }
}

/// Values as read from the file and environment layers.
#[derive(Debug, Default, Clone, Deserialize)]
pub struct RawSettings {
    pub endpoint: Option<String>,
    pub api_token: Option<String>,
    pub log_level: Option<String>,
    pub auth_header: Option<String>,
    pub auth_scheme: Option<String>,
    pub timeout: Option<u64>,
}

/// Values given explicitly on the command line.
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub endpoint: Option<String>,
    pub api_token: Option<String>,
    pub log_level: Option<String>,
    pub timeout: Option<u64>,
}

impl RawSettings {
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(endpoint) = overrides.endpoint.as_ref() {
            self.endpoint = Some(endpoint.clone());
        }
        if let Some(token) = overrides.api_token.as_ref() {
            self.api_token = Some(token.clone());
        }
        if let Some(level) = overrides.log_level.as_ref() {
            self.log_level = Some(level.clone());
        }
        if let Some(timeout) = overrides.timeout {
            self.timeout = Some(timeout);
        }
    }
}

/// How the API token is presented to the supervisor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthHeader {
    pub name: String,
    /// Prepended to the token with a single space; empty sends the bare token.
    pub scheme: String,
}

impl AuthHeader {
    pub fn value(&self, token: &str) -> String {
        if self.scheme.is_empty() {
            token.to_string()
        } else {
            format!("{} {token}", self.scheme)
        }
    }
}

impl Default for AuthHeader {
    fn default() -> Self {
        Self {
            name: DEFAULT_AUTH_HEADER.to_string(),
            scheme: DEFAULT_AUTH_SCHEME.to_string(),
        }
    }
}

/// What happened to the config file layer while loading.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ConfigFileStatus {
    /// The file was found and merged.
    Loaded,
    /// No file exists at the configured location.
    #[default]
    NotFound,
    /// The file exists but could not be parsed or deserialized; settings were
    /// resolved from the environment and flags alone.
    Rejected(String),
}

/// Effective, immutable configuration for one process.
#[derive(Debug, Clone)]
pub struct Settings {
    pub endpoint: String,
    pub api_token: Option<String>,
    pub log_level: LevelFilter,
    /// The log level string as configured, kept when it failed to parse.
    pub unrecognised_log_level: Option<String>,
    pub auth: AuthHeader,
    pub timeout: Option<Duration>,
    pub config_file: PathBuf,
    pub config_status: ConfigFileStatus,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_token: None,
            log_level: DEFAULT_LOG_LEVEL,
            unrecognised_log_level: None,
            auth: AuthHeader::default(),
            timeout: None,
            config_file: PathBuf::from(CONFIG_BASENAME),
            config_status: ConfigFileStatus::NotFound,
        }
    }
}

impl Settings {
    pub fn from_raw(raw: RawSettings, config_file: PathBuf) -> Result<Self, LoadError> {
        let (log_level, unrecognised_log_level) = match raw.log_level {
            None => (DEFAULT_LOG_LEVEL, None),
            Some(level) => match parse_log_level(&level) {
                Some(parsed) => (parsed, None),
                None => (DEFAULT_LOG_LEVEL, Some(level)),
            },
        };

        let auth = AuthHeader {
            name: raw
                .auth_header
                .unwrap_or_else(|| DEFAULT_AUTH_HEADER.to_string()),
            scheme: raw
                .auth_scheme
                .unwrap_or_else(|| DEFAULT_AUTH_SCHEME.to_string())
                .trim()
                .to_string(),
        };
        if !is_header_name(&auth.name) {
            return Err(LoadError::invalid(
                "auth_header",
                format!("`{}` is not a valid HTTP header name", auth.name),
            ));
        }

        Ok(Self {
            endpoint: raw.endpoint.unwrap_or_else(|| DEFAULT_ENDPOINT.to_string()),
            api_token: raw.api_token.filter(|token| !token.is_empty()),
            log_level,
            unrecognised_log_level,
            auth,
            timeout: raw.timeout.filter(|&secs| secs > 0).map(Duration::from_secs),
            config_file,
            config_status: ConfigFileStatus::NotFound,
        })
    }
}

/// `$HOME/.homeassistant`, without an extension; see [`find_config_file`].
pub fn default_config_file() -> Result<PathBuf, LoadError> {
    dirs::home_dir()
        .map(|home| home.join(CONFIG_BASENAME))
        .ok_or(LoadError::HomeDirectory)
}

/// First existing `<base>.<ext>` for the extensions `config` can parse.
pub fn find_config_file(base: &Path) -> Option<PathBuf> {
    CONFIG_EXTENSIONS
        .iter()
        .map(|ext| base.with_extension(ext))
        .find(|candidate| candidate.is_file())
}

/// Load settings from the config file, the process environment and
/// command-line overrides.
///
/// A missing file is skipped. A file that fails to parse is reported through
/// [`Settings::config_status`] and the remaining layers still apply.
pub fn load(config_file: Option<&Path>, overrides: &Overrides) -> Result<Settings, LoadError> {
    let (path, found) = match config_file {
        Some(path) => (path.to_path_buf(), path.is_file().then(|| path.to_path_buf())),
        None => {
            let base = default_config_file()?;
            let found = find_config_file(&base);
            (base, found)
        }
    };

    let file = found.as_deref().map(File::from);
    let (mut raw, config_status) = collect_layers(file, Environment::with_prefix(ENV_PREFIX))?;
    raw.apply_overrides(overrides);
    Ok(Settings {
        config_status,
        ..Settings::from_raw(raw, found.unwrap_or(path))?
    })
}

/// Merge the file layer under the environment layer.
///
/// When the merge fails and a file was given, the environment is collected
/// again on its own so a broken file cannot block flags and variables.
pub(crate) fn collect_layers<S>(
    file: Option<S>,
    env: Environment,
) -> Result<(RawSettings, ConfigFileStatus), LoadError>
where
    S: Source + Send + Sync + 'static,
{
    let Some(file) = file else {
        let raw = collect(Config::builder().add_source(env))?;
        return Ok((raw, ConfigFileStatus::NotFound));
    };

    match collect(Config::builder().add_source(file).add_source(env.clone())) {
        Ok(raw) => Ok((raw, ConfigFileStatus::Loaded)),
        Err(err) => {
            let raw = collect(Config::builder().add_source(env))?;
            Ok((raw, ConfigFileStatus::Rejected(err.to_string())))
        }
    }
}

pub(crate) fn collect(builder: ConfigBuilder<DefaultState>) -> Result<RawSettings, LoadError> {
    Ok(builder.build()?.try_deserialize()?)
}

/// Accepts the usual tracing level names plus `warning`, `fatal` and `panic`.
pub fn parse_log_level(value: &str) -> Option<LevelFilter> {
    match value.trim().to_ascii_lowercase().as_str() {
        "trace" => Some(LevelFilter::TRACE),
        "debug" => Some(LevelFilter::DEBUG),
        "info" => Some(LevelFilter::INFO),
        "warn" | "warning" => Some(LevelFilter::WARN),
        "error" | "fatal" | "panic" => Some(LevelFilter::ERROR),
        "off" => Some(LevelFilter::OFF),
        _ => None,
    }
}

fn is_header_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b))
}
