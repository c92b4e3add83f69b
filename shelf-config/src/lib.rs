//! Loader for workspace configuration with YAML + environment overlays.
//!
//! Sources are merged in order: the optional/required YAML file, inline YAML
//! snippets, then `SHELF__<section>__<key>` environment variables. String
//! values may reference `${VAR}`; references are expanded recursively (up to
//! a fixed depth) after merging. Every field has a default, so an empty
//! document yields [`ShelfConfig::default`].
use config::{Config, ConfigError, Environment, File};
use serde::Deserialize;
use serde_json::Value;
use std::path::Path;

const MAXIMUM_ENV_EXPANSION_DEPTH: usize = 8;

/// Desktop browser identification; many servers reject unidentified clients.
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/91.0.4472.124 Safari/537.36";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ShelfConfig {
    pub version: Option<String>,
    pub fetch: FetchConfig,
    pub extract: ExtractConfig,
    pub sanitize: SanitizeConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FetchConfig {
    pub timeout_secs: u64,
    pub user_agent: String,
    pub max_body_bytes: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 10,
            user_agent: DEFAULT_USER_AGENT.into(),
            max_body_bytes: 4 * 1024 * 1024,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ExtractConfig {
    /// Minimum text length the top-scoring container must reach.
    pub min_content_length: usize,
    pub max_top_candidates: usize,
    pub title_max_chars: usize,
    pub description_max_chars: usize,
}

impl Default for ExtractConfig {
    fn default() -> Self {
        Self {
            min_content_length: 250,
            max_top_candidates: 5,
            title_max_chars: 200,
            description_max_chars: 500,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct SanitizeConfig {
    /// Hostnames whose `iframe` embeds survive sanitization.
    pub iframe_hosts: Vec<String>,
}

impl Default for SanitizeConfig {
    fn default() -> Self {
        Self {
            iframe_hosts: vec![
                "www.youtube.com".into(),
                "youtube.com".into(),
                "www.youtube-nocookie.com".into(),
                "player.vimeo.com".into(),
            ],
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// `text` or `json`.
    pub format: String,
    pub filter: String,
    pub dir: Option<String>,
    pub stderr: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: "text".into(),
            filter: "info".into(),
            dir: None,
            stderr: false,
        }
    }
}

fn expand_env_in_value(v: &mut Value) {
    match v {
        Value::String(s) => {
            if s.contains('$') {
                let mut cur = std::mem::take(s);
                for _ in 0..MAXIMUM_ENV_EXPANSION_DEPTH {
                    let expanded = match shellexpand::env(&cur) {
                        Ok(cow) => cow.into_owned(),
                        Err(_) => cur.clone(),
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

/// Non-string leaves of [`ShelfConfig`], as dotted paths.
const TYPED_LEAVES: &[&str] = &[
    "fetch.timeout_secs",
    "fetch.max_body_bytes",
    "extract.min_content_length",
    "extract.max_top_candidates",
    "extract.title_max_chars",
    "extract.description_max_chars",
    "logging.stderr",
];

/// Environment values arrive as strings: parse them back at typed leaves so
/// `SHELF__FETCH__TIMEOUT_SECS=5` deserializes. Scalars anywhere else become
/// strings, so `SHELF__LOGGING__DIR=2024` or `version: 1` stay valid.
fn coerce_scalars(v: &mut Value, path: &str) {
    let typed = TYPED_LEAVES.contains(&path);
    match v {
        Value::Object(obj) => obj.iter_mut().for_each(|(k, child)| {
            let child_path = if path.is_empty() {
                k.clone()
            } else {
                format!("{path}.{k}")
            };
            coerce_scalars(child, &child_path);
        }),
        Value::Array(arr) => arr.iter_mut().for_each(|child| coerce_scalars(child, path)),
        Value::String(s) if typed => {
            let s = s.trim();
            if let Ok(n) = s.parse::<u64>() {
                *v = Value::from(n);
            } else if let Ok(b) = s.parse::<bool>() {
                *v = Value::Bool(b);
            }
        }
        Value::Number(_) | Value::Bool(_) if !typed => *v = Value::String(v.to_string()),
        _ => {}
    }
}

/// Builder hides the `config` crate wiring (YAML + env overrides).
pub struct ShelfConfigLoader {
    builder: config::ConfigBuilder<config::builder::DefaultState>,
    env_prefix: String,
}

impl Default for ShelfConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

impl ShelfConfigLoader {
    /// Start with sensible defaults: no file, `SHELF__` env overrides.
    ///
    /// ```
    /// use shelf_config::ShelfConfigLoader;
    ///
    /// let config = ShelfConfigLoader::new()
    ///     .with_yaml_str("version: '1'")
    ///     .load()
    ///     .expect("valid config");
    ///
    /// assert_eq!(config.version.as_deref(), Some("1"));
    /// assert_eq!(config.fetch.timeout_secs, 10);
    /// ```
    pub fn new() -> Self {
        Self::with_env_prefix("SHELF")
    }

    /// Same as [`ShelfConfigLoader::new`] with a custom environment prefix.
    pub fn with_env_prefix(prefix: &str) -> Self {
        Self {
            builder: Config::builder(),
            env_prefix: prefix.to_string(),
        }
    }

    /// Attach a YAML/TOML/JSON file; the `config` crate infers format by suffix.
    pub fn with_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(true));
        self
    }

    /// Attach a file that may be absent, for deployments configured purely
    /// through the environment.
    pub fn with_optional_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.builder = self
            .builder
            .add_source(File::from(path.as_ref()).required(false));
        self
    }

    /// Allow tests/CLI to merge inline YAML snippets.
    ///
    /// ```
    /// use shelf_config::ShelfConfigLoader;
    ///
    /// let cfg = ShelfConfigLoader::new()
    ///     .with_yaml_str(
    ///         r#"
    /// fetch:
    ///   timeout_secs: 3
    /// sanitize:
    ///   iframe_hosts: ["player.vimeo.com"]
    /// "#,
    ///     )
    ///     .load()
    ///     .unwrap();
    ///
    /// assert_eq!(cfg.fetch.timeout_secs, 3);
    /// assert_eq!(cfg.sanitize.iframe_hosts, vec!["player.vimeo.com".to_string()]);
    /// assert_eq!(cfg.extract.min_content_length, 250);
    /// ```
    pub fn with_yaml_str(mut self, yaml: &str) -> Self {
        self.builder = self
            .builder
            .add_source(File::from_str(yaml, config::FileFormat::Yaml));
        self
    }

    /// Consume the builder and deserialize the merged sources into strongly typed config.
    ///
    /// ```
    /// use shelf_config::ShelfConfigLoader;
    ///
    /// unsafe { std::env::set_var("SHELF_DOC_UA", "doc-agent/1.0"); }
    ///
    /// let config = ShelfConfigLoader::new()
    ///     .with_yaml_str(r#"
    /// fetch:
    ///   user_agent: "${SHELF_DOC_UA}"
    /// "#)
    ///     .load()
    ///     .expect("valid configuration");
    ///
    /// assert_eq!(config.fetch.user_agent, "doc-agent/1.0");
    ///
    /// unsafe { std::env::remove_var("SHELF_DOC_UA"); }
    /// ```
    pub fn load(self) -> Result<ShelfConfig, ConfigError> {
        let cfg = self
            .builder
            .add_source(Environment::with_prefix(&self.env_prefix).separator("__"))
            .build()?;

        let mut v: Value = cfg.try_deserialize()?;
        if v.is_null() {
            v = Value::Object(Default::default());
        }
        expand_env_in_value(&mut v);
        coerce_scalars(&mut v, "");

        let typed: ShelfConfig =
            serde_json::from_value(v).map_err(|e| ConfigError::Message(e.to_string()))?;

        Ok(typed)
    }
}
