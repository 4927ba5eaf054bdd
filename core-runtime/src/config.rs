//! # Line-Oriented Configuration
//!
//! Configuration files are plain text, one directive per line:
//!
//! - `# comment` - ignored
//! - `NAME=VALUE` - a key/value pair; the first `=` splits name from value
//! - `-OPTION` - a boolean toggle; present means enabled
//!
//! Any other line, including a blank one, is a hard parse error. Keys the
//! caller never asked for are kept but harmless; a [`ConfigSpec`] supplies
//! defaults and declares which keys must be present after defaults apply.
//!
//! ## Usage
//!
//! ```
//! use core_runtime::config::{ConfigMap, ConfigSpec};
//!
//! let spec = ConfigSpec::new()
//!     .required("APP_ID")
//!     .with_default("CACHE_PATH", "auth.cache");
//!
//! let config = ConfigMap::parse("APP_ID=42\n-USE_CACHE\n", &spec).unwrap();
//! assert_eq!(config.get("APP_ID"), Some("42"));
//! assert_eq!(config.get("CACHE_PATH"), Some("auth.cache"));
//! assert!(config.is_option_set("USE_CACHE"));
//! ```

use crate::error::{Error, Result};
use std::collections::{HashMap, HashSet};
use std::path::Path;
use tracing::debug;

/// Declares the keys a consumer expects from a configuration file.
///
/// A `ConfigSpec` is advisory for lookups but binding for validation: every
/// `required` key must resolve to a value once defaults are applied.
#[derive(Debug, Clone, Default)]
pub struct ConfigSpec {
    required: Vec<String>,
    defaults: Vec<(String, String)>,
}

impl ConfigSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks `key` as mandatory; parsing fails if it is absent.
    pub fn required(mut self, key: impl Into<String>) -> Self {
        self.required.push(key.into());
        self
    }

    /// Supplies a fallback value used when the file does not set `key`.
    pub fn with_default(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.defaults.push((key.into(), value.into()));
        self
    }
}

/// Parsed configuration: key/value pairs plus enabled option toggles.
#[derive(Debug, Clone, Default)]
pub struct ConfigMap {
    values: HashMap<String, String>,
    options: HashSet<String>,
}

impl ConfigMap {
    /// Parses configuration text against `spec`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when a line matches no directive form or a
    /// required key is missing after defaults are applied. The message names
    /// the offending line number.
    pub fn parse(input: &str, spec: &ConfigSpec) -> Result<Self> {
        let mut values = HashMap::new();
        let mut options = HashSet::new();

        for (index, raw_line) in input.lines().enumerate() {
            let line_number = index + 1;
            let line = raw_line.strip_suffix('\r').unwrap_or(raw_line);

            if let Some(label) = line.strip_prefix('#') {
                debug!(line = line_number, comment = label, "Skipping comment");
                continue;
            }

            if let Some(label) = line.strip_prefix('-') {
                if label.is_empty() {
                    return Err(Error::Config(format!(
                        "Line {}: option toggle has no label",
                        line_number
                    )));
                }
                options.insert(label.to_string());
                continue;
            }

            match line.split_once('=') {
                Some((name, value)) if !name.is_empty() => {
                    values.insert(name.to_string(), value.to_string());
                }
                _ => {
                    return Err(Error::Config(format!(
                        "Line {}: expected 'NAME=VALUE', '-OPTION', or '# comment', got {:?}",
                        line_number, line
                    )));
                }
            }
        }

        for (key, default) in &spec.defaults {
            values
                .entry(key.clone())
                .or_insert_with(|| default.clone());
        }

        for key in &spec.required {
            if !values.contains_key(key) {
                return Err(Error::Config(format!(
                    "Required configuration key {:?} is missing",
                    key
                )));
            }
        }

        Ok(Self { values, options })
    }

    /// Reads and parses the file at `path`.
    pub fn load(path: impl AsRef<Path>, spec: &ConfigSpec) -> Result<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            Error::Config(format!(
                "Failed to read configuration file {}: {}",
                path.display(),
                e
            ))
        })?;
        Self::parse(&text, spec)
    }

    /// Looks up the value for `key`, defaults included.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.values.get(key).map(String::as_str)
    }

    /// Whether the `-LABEL` toggle appeared in the file.
    pub fn is_option_set(&self, label: &str) -> bool {
        self.options.contains(label)
    }
}
