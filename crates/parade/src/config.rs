//! Configuration file loading.
//!
//! Configuration is an external collaborator of the parser: it is consulted
//! after the argument vector has been resolved, never during parsing.
//! [`ConfigFactory::load`] walks the application's search paths, loads every
//! file it finds with the provider matching the file extension, and merges
//! the results key by key, later paths winning.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::debug;

/// Flat top-level configuration: one [`Value`] per key.
pub type ConfigMap = HashMap<String, Value>;

/// Errors raised while loading configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The file extension maps to no known provider.
    #[error("Unknown config file extension: {0}")]
    UnsupportedFormat(String),

    /// The file exists but could not be read.
    #[error("failed to read config file {path}")]
    Io {
        /// The offending file.
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The file could not be parsed.
    #[error("failed to parse config file {path}: {detail}")]
    Parse {
        /// The offending file.
        path: PathBuf,
        /// What the provider complained about.
        detail: String,
    },
}

/// The merged result of a configuration search.
#[derive(Debug, Default)]
pub struct LoadedConfig {
    /// Merged top-level values.
    pub values: ConfigMap,
    /// The files that contributed, in merge order.
    pub files: Vec<PathBuf>,
}

/// Loads one configuration file name across a list of search paths.
pub struct ConfigFactory;

impl ConfigFactory {
    /// Looks for `file_name` in each search path in order and merges every
    /// hit. Missing files are skipped; unreadable or unparsable ones fail.
    pub fn load(file_name: &str, search_paths: &[PathBuf]) -> Result<LoadedConfig, ConfigError> {
        let mut loaded = LoadedConfig::default();
        for dir in search_paths {
            let path = dir.join(file_name);
            if !path.is_file() {
                continue;
            }
            let values = load_file(&path)?;
            debug!(path = %path.display(), keys = values.len(), "merged config file");
            loaded.values.extend(values);
            loaded.files.push(path);
        }
        Ok(loaded)
    }
}

fn load_file(path: &Path) -> Result<ConfigMap, ConfigError> {
    let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    match ext {
        "yml" | "yaml" => parse_yaml(path, &text),
        "json" => parse_json(path, &text),
        "ini" => Ok(parse_ini(&text)),
        other => Err(ConfigError::UnsupportedFormat(format!(".{other}"))),
    }
}

fn parse_yaml(path: &Path, text: &str) -> Result<ConfigMap, ConfigError> {
    let value: Value = serde_yaml::from_str(text).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })?;
    into_map(path, value)
}

fn parse_json(path: &Path, text: &str) -> Result<ConfigMap, ConfigError> {
    let value: Value = serde_json::from_str(text).map_err(|err| ConfigError::Parse {
        path: path.to_path_buf(),
        detail: err.to_string(),
    })?;
    into_map(path, value)
}

fn into_map(path: &Path, value: Value) -> Result<ConfigMap, ConfigError> {
    match value {
        Value::Object(map) => Ok(map.into_iter().collect()),
        // An empty file parses as null; treat it as an empty config.
        Value::Null => Ok(ConfigMap::new()),
        _ => Err(ConfigError::Parse {
            path: path.to_path_buf(),
            detail: "top level must be a mapping".to_string(),
        }),
    }
}

/// Parses the INI dialect the framework has always accepted: `[section]`
/// headers, `key = value` pairs, `#`/`;` comments anywhere in a line.
/// Pairs before the first section header are dropped.
fn parse_ini(text: &str) -> ConfigMap {
    let mut config = ConfigMap::new();
    let mut section: Option<(String, serde_json::Map<String, Value>)> = None;

    for line in text.lines() {
        let line = match line.find(['#', ';']) {
            Some(i) => &line[..i],
            None => line,
        };
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        if let Some(name) = line.strip_prefix('[').and_then(|l| l.strip_suffix(']')) {
            if let Some((name, values)) = section.take() {
                config.insert(name, Value::Object(values));
            }
            section = Some((name.to_string(), serde_json::Map::new()));
            continue;
        }
        if let (Some((_, values)), Some((key, value))) = (section.as_mut(), line.split_once('=')) {
            values.insert(
                key.trim().to_string(),
                Value::String(value.trim().to_string()),
            );
        }
    }
    if let Some((name, values)) = section.take() {
        config.insert(name, Value::Object(values));
    }
    config
}
