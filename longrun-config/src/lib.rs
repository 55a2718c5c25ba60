//! Loader for `longrun.yaml` with environment overlays.
//!
//! Sources, lowest to highest precedence: the YAML file (optional),
//! inline snippets, then `LONGRUN__`-prefixed variables using `__` as the
//! nesting separator (`LONGRUN__TIMING__THINK_DELAY_MS=300`). After merging,
//! `${VAR}` placeholders in string values are expanded. Every section has
//! defaults, so an empty configuration reproduces the stock chat.
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::{path::Path, path::PathBuf, time::Duration};

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

pub const DEFAULT_CONFIG_FILE: &str = "longrun.yaml";

#[derive(Debug, Default, Deserialize)]
pub struct LongrunConfig {
    #[serde(default)]
    pub version: Option<String>,
    #[serde(default)]
    pub timing: TimingConfig,
    #[serde(default)]
    pub script: ScriptConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Reveal pacing in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    pub think_delay_ms: u64,
    pub reveal_delay_ms: u64,
    pub word_interval_ms: u64,
    pub settle_delay_ms: u64,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            think_delay_ms: 500,
            reveal_delay_ms: 100,
            word_interval_ms: 80,
            settle_delay_ms: 200,
        }
    }
}

impl TimingConfig {
    pub fn think_delay(&self) -> Duration {
        Duration::from_millis(self.think_delay_ms)
    }

    pub fn reveal_delay(&self) -> Duration {
        Duration::from_millis(self.reveal_delay_ms)
    }

    pub fn word_interval(&self) -> Duration {
        Duration::from_millis(self.word_interval_ms)
    }

    pub fn settle_delay(&self) -> Duration {
        Duration::from_millis(self.settle_delay_ms)
    }
}

/// Optional overrides of the built-in script. Unset fields keep the defaults.
#[derive(Debug, Default, Deserialize)]
pub struct ScriptConfig {
    #[serde(default)]
    pub heading: Option<String>,
    #[serde(default)]
    pub suggestions: Option<Vec<String>>,
    #[serde(default)]
    pub responses: Option<Vec<String>>,
    #[serde(default)]
    pub product_link: Option<ProductLinkConfig>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProductLinkConfig {
    pub label: String,
    pub url: String,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormatSetting {
    #[default]
    Text,
    Json,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub dir: Option<PathBuf>,
    pub format: LogFormatSetting,
    pub filter: Option<String>,
    pub stderr: bool,
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => break,
                    };
                    if expanded == cur {
                        break;
                    }
                    cur = expanded;
                }
                *s = cur;
            }
        }
        Value::Array(arr) => arr.iter_mut().for_each(expand_env_in_value),
        Value::Object(obj) => obj.values_mut().for_each(expand_env_in_value),
        _ => {}
    }
}

/// Builder hiding the `config` crate wiring.
pub struct LongrunConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
}

impl Default for LongrunConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl LongrunConfigLoader {
    /// Start from defaults plus `LONGRUN__` environment overrides.
    ///
    /// ```
    /// use longrun_config::LongrunConfigLoader;
    ///
    /// let cfg = LongrunConfigLoader::new().load().expect("defaults load");
    /// assert_eq!(cfg.timing.think_delay_ms, 500);
    /// assert!(cfg.script.responses.is_none());
    /// ```
    pub fn new() -> Self {
        let builder = Config::builder();
        Self { builder }
    }

    /// Attach a file that must exist; format is inferred from the suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that is skipped when absent.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Merge an inline YAML snippet.
    ///
    /// ```
    /// use longrun_config::{LogFormatSetting, LongrunConfigLoader};
    ///
    /// let cfg = LongrunConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// version: "1"
    /// timing:
    ///   word_interval_ms: 40
    /// logging:
    ///   format: json
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.version.as_deref(), Some("1"));
    /// assert_eq!(cfg.timing.word_interval_ms, 40);
    /// assert_eq!(cfg.timing.settle_delay_ms, 200);
    /// assert_eq!(cfg.logging.format, LogFormatSetting::Json);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Merge every source, expand `${VAR}` placeholders and deserialize.
    ///
    /// Environment overrides are added last so they beat any file.
    pub fn load(self) -> Result<LongrunConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(
                Environment::with_prefix("LONGRUN")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        expand_env_in_value(&mut v);

        serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))
    }
}
