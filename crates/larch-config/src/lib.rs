use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Once};

use thiserror::Error;
use tracing_subscriber::fmt::writer::BoxMakeWriter;
use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

mod schema;

pub use schema::{json_schema, json_schema_string};

/// File names probed by [`load_for_workspace`], in order.
pub const CONFIG_FILE_NAMES: &[&str] = &["larch.toml", ".larch.toml"];

pub const DEFAULT_MODEL_CLASS: &str = "Illuminate\\Database\\Eloquent\\Model";
pub const DEFAULT_RELATION_CLASS: &str = "Illuminate\\Database\\Eloquent\\Relations\\Relation";

/// Top-level `larch.toml`.
///
/// ```toml
/// [logging]
/// level = "debug"
///
/// [eloquent]
/// model_class = "App\\Models\\BaseModel"
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LarchConfig {
    /// Global logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Class names the Eloquent rules key off.
    #[serde(default)]
    pub eloquent: EloquentConfig,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct EloquentConfig {
    /// Base class every model extends (directly or transitively).
    #[serde(default = "EloquentConfig::default_model_class")]
    pub model_class: String,

    /// Base class of every relation object.
    #[serde(default = "EloquentConfig::default_relation_class")]
    pub relation_class: String,
}

impl EloquentConfig {
    fn default_model_class() -> String {
        DEFAULT_MODEL_CLASS.to_owned()
    }

    fn default_relation_class() -> String {
        DEFAULT_RELATION_CLASS.to_owned()
    }

    fn normalize(&mut self) {
        for name in [&mut self.model_class, &mut self.relation_class] {
            let trimmed = name.trim().trim_start_matches('\\');
            if trimmed.len() != name.len() {
                *name = trimmed.to_owned();
            }
        }
    }
}

impl Default for EloquentConfig {
    fn default() -> Self {
        Self {
            model_class: Self::default_model_class(),
            relation_class: Self::default_relation_class(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Logging level for all Larch crates.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,

    /// Append logs to the given file path instead of stderr.
    ///
    /// If the file cannot be opened, logs go to stderr.
    #[serde(default)]
    #[schemars(with = "Option<String>")]
    pub file: Option<PathBuf>,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    /// `EnvFilter` directives for `level`.
    ///
    /// A bare level name applies to Larch's own targets while everything else
    /// stays at `warn`; any other value is used as a directive string as is.
    pub(crate) fn directives(&self) -> String {
        let level = self.level.trim();
        let bare = match level.to_ascii_lowercase().as_str() {
            "" => Self::default_level(),
            "warning" => "warn".to_owned(),
            name @ ("off" | "error" | "warn" | "info" | "debug" | "trace") => name.to_owned(),
            _ => return level.to_owned(),
        };
        format!("warn,larch={bare}")
    }

    /// The effective filter: the configured directives followed by any from
    /// `RUST_LOG`.
    ///
    /// Unparseable directives fall back to the default level.
    pub fn env_filter(&self) -> EnvFilter {
        let mut directives = self.directives();
        if let Some(env) = std::env::var("RUST_LOG")
            .ok()
            .filter(|value| !value.trim().is_empty())
        {
            directives.push(',');
            directives.push_str(env.trim());
        }
        EnvFilter::try_new(&directives)
            .unwrap_or_else(|_| EnvFilter::new(LoggingConfig::default().directives()))
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
            file: None,
        }
    }
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // Keep just the message; the default `Display` embeds a source snippet.
        ConfigError::Toml(err.message().to_owned())
    }
}

impl LarchConfig {
    /// Load a config file from TOML.
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::load_from_str(&text)
    }

    /// Load a config from a TOML string.
    pub fn load_from_str(text: &str) -> Result<Self, ConfigError> {
        let mut config: LarchConfig = toml::from_str(text)?;
        config.eloquent.normalize();
        Ok(config)
    }
}

/// Load the config for a workspace root.
///
/// Returns the default config and `None` when no config file exists.
pub fn load_for_workspace(root: &Path) -> Result<(LarchConfig, Option<PathBuf>), ConfigError> {
    let Some(path) = CONFIG_FILE_NAMES
        .iter()
        .map(|name| root.join(name))
        .find(|candidate| candidate.is_file())
    else {
        return Ok((LarchConfig::default(), None));
    };

    let config = LarchConfig::load_from_path(&path)?;
    tracing::debug!(
        target: "larch.config",
        path = %path.display(),
        "loaded workspace config"
    );
    Ok((config, Some(path)))
}

static TRACING_INIT: Once = Once::new();

/// Initializes structured `tracing` logging.
///
/// Safe to call multiple times; only the first call installs a global
/// subscriber.
pub fn init_tracing(config: &LoggingConfig) {
    TRACING_INIT.call_once(|| {
        let filter = config.env_filter();

        let file = config.file.as_ref().and_then(|path| {
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .ok()
        });

        let make_writer = match file {
            Some(file) => BoxMakeWriter::new(Arc::new(file)),
            None => BoxMakeWriter::new(std::io::stderr),
        };

        let layer: Box<dyn tracing_subscriber::Layer<_> + Send + Sync> = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(make_writer)
                .with_ansi(false)
                .boxed()
        };

        let _ = tracing_subscriber::registry()
            .with(filter)
            .with(layer)
            .try_init();
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logging(level: &str) -> LoggingConfig {
        LoggingConfig {
            level: level.to_owned(),
            ..LoggingConfig::default()
        }
    }

    #[test]
    fn bare_levels_apply_to_larch_targets() {
        assert_eq!(logging(" WARNING ").directives(), "warn,larch=warn");
        assert_eq!(logging("Debug").directives(), "warn,larch=debug");
        assert_eq!(logging("").directives(), "warn,larch=info");
    }

    #[test]
    fn directive_strings_pass_through() {
        assert_eq!(
            logging("larch.rules=trace").directives(),
            "larch.rules=trace"
        );
    }

    #[test]
    fn toml_errors_do_not_echo_source() {
        let err = LarchConfig::load_from_str("[logging]\nlevel = 3\n").unwrap_err();
        let ConfigError::Toml(message) = err else {
            panic!("expected a toml error, got {err:?}");
        };
        assert!(!message.contains("level = 3"), "{message}");
    }
}
