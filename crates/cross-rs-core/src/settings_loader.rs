//! Settings loading from configuration files.
//!
//! This module loads [`Settings`] from TOML or JSON files and applies
//! environment variable overrides.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `CROSS_SECRET_KEY` | `secret_key` |
//! | `CROSS_DEBUG` | `debug` |
//! | `CROSS_LOG_LEVEL` | `log_level` |
//! | `CROSS_SITE_URL` | `sys.site_url` |
//! | `CROSS_STATIC_URL` | `sys.static_url` |
//! | `CROSS_URL_TYPE` | `url.type` |
//! | `CROSS_URL_EXT` | `url.ext` |
//! | `CROSS_URL_REWRITE` | `url.rewrite` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use cross_rs_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/app.toml").unwrap();
//! let settings = settings_loader::from_toml_file_with_env("config/app.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::CrossError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any fields not present in the TOML keep their default values.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, CrossError> {
    let json_value = toml_str_to_json(toml_str)?;
    from_json_value(json_value, "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, CrossError> {
    from_toml_str(&read_config_file(path.as_ref(), "TOML")?)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, CrossError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
pub fn from_json_str(json_str: &str) -> Result<Settings, CrossError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| CrossError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;
    from_json_value(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, CrossError> {
    from_json_str(&read_config_file(path.as_ref(), "JSON")?)
}

/// Loads settings from a JSON file and then applies environment variable overrides.
pub fn from_json_file_with_env(path: impl AsRef<Path>) -> Result<Settings, CrossError> {
    let mut settings = from_json_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies environment variable overrides to a settings struct.
///
/// Boolean variables accept `true`, `1` or `yes` (case-insensitive) as true.
/// `CROSS_URL_TYPE` is ignored unless it parses as an integer.
pub fn apply_env_overrides(settings: &mut Settings) {
    if let Ok(val) = std::env::var("CROSS_SECRET_KEY") {
        settings.secret_key = val;
    }

    if let Ok(val) = std::env::var("CROSS_DEBUG") {
        settings.debug = parse_bool(&val);
    }

    if let Ok(val) = std::env::var("CROSS_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Ok(val) = std::env::var("CROSS_SITE_URL") {
        settings.sys.site_url = val;
    }

    if let Ok(val) = std::env::var("CROSS_STATIC_URL") {
        settings.sys.static_url = val;
    }

    if let Ok(val) = std::env::var("CROSS_URL_TYPE") {
        if let Ok(url_type) = val.trim().parse::<i64>() {
            settings.url.url_type = url_type;
        }
    }

    if let Ok(val) = std::env::var("CROSS_URL_EXT") {
        settings.url.ext = val;
    }

    if let Ok(val) = std::env::var("CROSS_URL_REWRITE") {
        settings.url.rewrite = parse_bool(&val);
    }
}

// ============================================================
// Helpers
// ============================================================

/// Parses a TOML document into a `serde_json::Value`.
pub(crate) fn toml_str_to_json(toml_str: &str) -> Result<serde_json::Value, CrossError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| CrossError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;
    Ok(toml_to_json(toml_value))
}

/// Reads a configuration file into a string.
pub(crate) fn read_config_file(path: &Path, format: &str) -> Result<String, CrossError> {
    std::fs::read_to_string(path).map_err(|e| {
        CrossError::ConfigurationError(format!(
            "Failed to read {format} file '{}': {e}",
            path.display()
        ))
    })
}

/// Merges a parsed document over the default settings and deserializes it.
fn from_json_value(value: serde_json::Value, format: &str) -> Result<Settings, CrossError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        CrossError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, value);
    serde_json::from_value(merged).map_err(|e| {
        CrossError::ConfigurationError(format!("Failed to deserialize settings from {format}: {e}"))
    })
}

fn parse_bool(val: &str) -> bool {
    matches!(val.to_lowercase().as_str(), "true" | "1" | "yes")
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::settings::RouterEntry;

    // ── TOML loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_str_basic() {
        let toml = r#"
            secret_key = "my-secret-key"
            debug = false

            [sys]
            site_url = "http://example.com"
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.secret_key, "my-secret-key");
        assert!(!settings.debug);
        assert_eq!(settings.sys.site_url, "http://example.com");
        // Defaults preserved within a partially specified section
        assert_eq!(settings.sys.static_url, "/static");
        assert_eq!(settings.url.index, "index.php");
    }

    #[test]
    fn test_from_toml_str_url_section() {
        let toml = r#"
            [url]
            type = 3
            dot = "-"
            ext = ".html"
            rewrite = true
        "#;

        let settings = from_toml_str(toml).unwrap();
        assert_eq!(settings.url.url_type, 3);
        assert_eq!(settings.url.dot, "-");
        assert_eq!(settings.url.ext, ".html");
        assert!(settings.url.rewrite);
        assert_eq!(settings.url.index, "index.php");
    }

    #[test]
    fn test_from_toml_str_router_keeps_order() {
        let toml = r#"
            [router]
            hi = "main"
            about = "page"

            [router.article]
            read = "detail"
        "#;

        let settings = from_toml_str(toml).unwrap();
        let keys: Vec<_> = settings.router.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["hi", "about", "article"]);
        assert_eq!(
            settings.router.get("hi"),
            Some(&RouterEntry::Controller("main".to_string()))
        );
        let Some(RouterEntry::Actions(actions)) = settings.router.get("article") else {
            panic!("expected an action map");
        };
        assert_eq!(actions.get("read").map(String::as_str), Some("detail"));
    }

    #[test]
    fn test_from_toml_str_empty() {
        let settings = from_toml_str("").unwrap();
        assert!(settings.debug);
        assert!(settings.secret_key.is_empty());
        assert_eq!(settings.url.url_type, 1);
    }

    #[test]
    fn test_from_toml_str_invalid() {
        let result = from_toml_str("[[invalid toml content");
        assert!(matches!(result, Err(CrossError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_toml_str_wrong_type() {
        let result = from_toml_str("[url]\ntype = \"one\"");
        assert!(matches!(result, Err(CrossError::ConfigurationError(_))));
    }

    // ── JSON loading ────────────────────────────────────────────────

    #[test]
    fn test_from_json_str_basic() {
        let json = r#"{
            "secret_key": "json-secret",
            "log_level": "debug",
            "url": {"type": 2, "index": "app.php"}
        }"#;

        let settings = from_json_str(json).unwrap();
        assert_eq!(settings.secret_key, "json-secret");
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.url.url_type, 2);
        assert_eq!(settings.url.index, "app.php");
        assert_eq!(settings.url.dot, "/");
    }

    #[test]
    fn test_from_json_str_empty_object() {
        let settings = from_json_str("{}").unwrap();
        assert!(settings.debug);
        assert!(settings.router.is_empty());
    }

    #[test]
    fn test_from_json_str_invalid() {
        let result = from_json_str("{invalid json");
        assert!(result.is_err());
    }

    // ── File loading ────────────────────────────────────────────────

    #[test]
    fn test_from_toml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.toml");
        std::fs::write(&path, "secret_key = \"file-secret\"\ndebug = false\n").unwrap();

        let settings = from_toml_file(&path).unwrap();
        assert_eq!(settings.secret_key, "file-secret");
        assert!(!settings.debug);
    }

    #[test]
    fn test_from_json_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app.json");
        std::fs::write(&path, r#"{"secret_key": "json-file-secret"}"#).unwrap();

        let settings = from_json_file(&path).unwrap();
        assert_eq!(settings.secret_key, "json-file-secret");
    }

    #[test]
    fn test_from_toml_file_missing() {
        let result = from_toml_file("/nonexistent/path/app.toml");
        assert!(matches!(result, Err(CrossError::ConfigurationError(_))));
    }

    #[test]
    fn test_from_json_file_missing() {
        let result = from_json_file("/nonexistent/path/app.json");
        assert!(result.is_err());
    }

    // ── Environment variable overrides ──────────────────────────────

    #[test]
    fn test_apply_env_overrides_static_url() {
        let mut settings = Settings::default();
        std::env::set_var("CROSS_STATIC_URL", "http://cdn.example.com");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.sys.static_url, "http://cdn.example.com");
        std::env::remove_var("CROSS_STATIC_URL");
    }

    #[test]
    fn test_apply_env_overrides_url_type() {
        let mut settings = Settings::default();
        std::env::set_var("CROSS_URL_TYPE", "4");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.url.url_type, 4);
        std::env::remove_var("CROSS_URL_TYPE");
    }

    #[test]
    fn test_apply_env_overrides_url_ext_and_rewrite() {
        let mut settings = Settings::default();
        std::env::set_var("CROSS_URL_EXT", ".htm");
        std::env::set_var("CROSS_URL_REWRITE", "YES");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.url.ext, ".htm");
        assert!(settings.url.rewrite);
        std::env::remove_var("CROSS_URL_EXT");
        std::env::remove_var("CROSS_URL_REWRITE");
    }

    #[test]
    fn test_apply_env_overrides_log_level() {
        let mut settings = Settings::default();
        std::env::set_var("CROSS_LOG_LEVEL", "debug");
        apply_env_overrides(&mut settings);
        assert_eq!(settings.log_level, "debug");
        std::env::remove_var("CROSS_LOG_LEVEL");
    }

    #[test]
    fn test_from_env() {
        std::env::set_var("CROSS_SECRET_KEY", "from-env-secret");
        std::env::set_var("CROSS_DEBUG", "false");
        let settings = from_env();
        assert_eq!(settings.secret_key, "from-env-secret");
        assert!(!settings.debug);
        std::env::remove_var("CROSS_SECRET_KEY");
        std::env::remove_var("CROSS_DEBUG");
    }

    #[test]
    fn test_toml_with_env_override() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("app_env.toml");
        std::fs::write(&path, "[sys]\nsite_url = \"http://toml.example.com\"\n").unwrap();

        std::env::set_var("CROSS_SITE_URL", "http://env.example.com");
        let settings = from_toml_file_with_env(&path).unwrap();
        assert_eq!(settings.sys.site_url, "http://env.example.com");
        std::env::remove_var("CROSS_SITE_URL");
    }

    // ── Helpers ─────────────────────────────────────────────────────

    #[test]
    fn test_parse_bool() {
        assert!(parse_bool("true"));
        assert!(parse_bool("1"));
        assert!(parse_bool("Yes"));
        assert!(!parse_bool("off"));
    }

    #[test]
    fn test_merge_json_nested() {
        let base = serde_json::json!({"outer": {"a": 1, "b": 2}});
        let over = serde_json::json!({"outer": {"b": 3}});
        let merged = merge_json(base, over);
        assert_eq!(merged["outer"]["a"], 1);
        assert_eq!(merged["outer"]["b"], 3);
    }

    #[test]
    fn test_merge_json_array_override() {
        let base = serde_json::json!({"list": [1, 2, 3]});
        let over = serde_json::json!({"list": [4, 5]});
        let merged = merge_json(base, over);
        assert_eq!(merged["list"], serde_json::json!([4, 5]));
    }
}
