//! Raw, section-oriented access to configuration data.
//!
//! [`ConfigArray`] wraps a configuration document (a JSON object whose
//! top-level keys are sections such as `sys`, `url` and `router`) and offers
//! lookups by section and by `section.key`, projections onto a subset of
//! sections, and typed extraction of a single section.
//!
//! # Examples
//!
//! ```
//! use cross_rs_core::config_array::ConfigArray;
//!
//! let config = ConfigArray::from_toml_str(r#"
//!     [url]
//!     type = 2
//!     dot = "/"
//! "#).unwrap();
//!
//! assert_eq!(config.get_key("url", "type"), Some(&serde_json::json!(2)));
//! assert!(config.get_key("url", "missing").is_none());
//! ```

use std::path::Path;

use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::{CrossError, CrossResult};
use crate::settings::Settings;
use crate::settings_loader::{read_config_file, toml_str_to_json};

/// A read-only view over a configuration document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ConfigArray {
    data: Map<String, Value>,
}

impl ConfigArray {
    /// Wraps an existing JSON object.
    pub const fn new(data: Map<String, Value>) -> Self {
        Self { data }
    }

    /// Wraps a JSON value, which must be an object.
    pub fn from_value(value: Value) -> CrossResult<Self> {
        match value {
            Value::Object(data) => Ok(Self { data }),
            other => Err(CrossError::ConfigurationError(format!(
                "Configuration root must be a table, found {}",
                type_name(&other)
            ))),
        }
    }

    /// Parses a TOML document.
    pub fn from_toml_str(toml_str: &str) -> CrossResult<Self> {
        Self::from_value(toml_str_to_json(toml_str)?)
    }

    /// Reads and parses a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> CrossResult<Self> {
        Self::from_toml_str(&read_config_file(path.as_ref(), "TOML")?)
    }

    /// Parses a JSON document.
    pub fn from_json_str(json_str: &str) -> CrossResult<Self> {
        let value = serde_json::from_str(json_str)
            .map_err(|e| CrossError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;
        Self::from_value(value)
    }

    /// Builds an accessor over typed settings.
    pub fn from_settings(settings: &Settings) -> CrossResult<Self> {
        let value = serde_json::to_value(settings).map_err(|e| {
            CrossError::ConfigurationError(format!("Failed to serialize settings: {e}"))
        })?;
        Self::from_value(value)
    }

    /// Returns a whole section, or `None` if it is not configured.
    pub fn get(&self, section: &str) -> Option<&Value> {
        self.data.get(section)
    }

    /// Returns a single key of a section, or `None` if either is absent.
    pub fn get_key(&self, section: &str, key: &str) -> Option<&Value> {
        self.data.get(section).and_then(|s| s.get(key))
    }

    /// Returns a new document holding only the listed sections that exist.
    ///
    /// Sections appear in the order they are listed.
    #[must_use]
    pub fn pick(&self, sections: &[&str]) -> Self {
        let data = sections
            .iter()
            .filter_map(|name| {
                self.data
                    .get(*name)
                    .map(|value| ((*name).to_string(), value.clone()))
            })
            .collect();
        Self { data }
    }

    /// Returns a new document with the listed sections removed.
    #[must_use]
    pub fn except(&self, sections: &[&str]) -> Self {
        let data = self
            .data
            .iter()
            .filter(|(name, _)| !sections.contains(&name.as_str()))
            .map(|(name, value)| (name.clone(), value.clone()))
            .collect();
        Self { data }
    }

    /// Returns the whole document.
    pub const fn all(&self) -> &Map<String, Value> {
        &self.data
    }

    /// Deserializes one section into a typed value.
    ///
    /// A missing section deserializes from an empty table, so types with
    /// `#[serde(default)]` come back with their defaults.
    pub fn section_as<T: DeserializeOwned>(&self, section: &str) -> CrossResult<T> {
        let value = self
            .data
            .get(section)
            .cloned()
            .unwrap_or_else(|| Value::Object(Map::new()));
        serde_json::from_value(value).map_err(|e| {
            CrossError::ConfigurationError(format!("Invalid '{section}' section: {e}"))
        })
    }

    /// Deserializes the whole document into [`Settings`].
    pub fn to_settings(&self) -> CrossResult<Settings> {
        crate::settings_loader::from_json_str(&Value::Object(self.data.clone()).to_string())
    }

    /// Returns the number of sections.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if there are no sections.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

const fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "a table",
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::settings::UrlSettings;

    fn sample() -> ConfigArray {
        ConfigArray::from_value(json!({
            "sys": {"site_url": "http://example.com", "display": "HTML"},
            "url": {"type": 3, "dot": "-"},
            "router": {"hi": "main"}
        }))
        .unwrap()
    }

    #[test]
    fn test_get_section() {
        let config = sample();
        assert_eq!(config.get("router"), Some(&json!({"hi": "main"})));
        assert!(config.get("missing").is_none());
    }

    #[test]
    fn test_get_key() {
        let config = sample();
        assert_eq!(
            config.get_key("sys", "site_url"),
            Some(&json!("http://example.com"))
        );
        assert!(config.get_key("sys", "nope").is_none());
        assert!(config.get_key("nope", "site_url").is_none());
    }

    #[test]
    fn test_pick_keeps_listed_order() {
        let picked = sample().pick(&["url", "missing", "sys"]);
        let keys: Vec<_> = picked.all().keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["url", "sys"]);
    }

    #[test]
    fn test_except_leaves_source_untouched() {
        let config = sample();
        let rest = config.except(&["router", "url"]);
        assert_eq!(rest.len(), 1);
        assert!(rest.get("sys").is_some());
        assert_eq!(config.len(), 3);
    }

    #[test]
    fn test_section_as_typed() {
        let url: UrlSettings = sample().section_as("url").unwrap();
        assert_eq!(url.url_type, 3);
        assert_eq!(url.dot, "-");
        assert_eq!(url.index, "index.php");
    }

    #[test]
    fn test_section_as_missing_uses_defaults() {
        let url: UrlSettings = ConfigArray::default().section_as("url").unwrap();
        assert_eq!(url, UrlSettings::default());
    }

    #[test]
    fn test_section_as_mismatch() {
        let config = ConfigArray::from_value(json!({"url": {"type": "x"}})).unwrap();
        let result: CrossResult<UrlSettings> = config.section_as("url");
        assert!(matches!(result, Err(CrossError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_value_rejects_non_object() {
        let result = ConfigArray::from_value(json!([1, 2]));
        assert!(matches!(result, Err(CrossError::ConfigurationError(_))));
    }

    #[test]
    fn test_settings_round_trip() {
        let mut settings = Settings::default();
        settings.url.url_type = 4;
        let config = ConfigArray::from_settings(&settings).unwrap();
        assert_eq!(config.get_key("url", "type"), Some(&json!(4)));
        assert_eq!(config.to_settings().unwrap().url.url_type, 4);
    }

    #[test]
    fn test_from_toml_str() {
        let config = ConfigArray::from_toml_str("[sys]\nstatic_url = \"/assets\"\n").unwrap();
        assert_eq!(config.get_key("sys", "static_url"), Some(&json!("/assets")));
    }
}
