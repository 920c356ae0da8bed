//! Settings system for the cross-rs framework.
//!
//! [`Settings`] holds all framework configuration grouped by section (`sys`,
//! `url`, `router`), and [`LazySettings`] is a globally-accessible, lazily
//! configured instance for hosts that want one.

use std::collections::HashMap;
use std::sync::OnceLock;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Site-wide settings (the `sys` section).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SysSettings {
    /// Base URL prepended to every generated link.
    pub site_url: String,
    /// Base URL for static resources.
    pub static_url: String,
    /// Default display method: `HTML`, `JSON` or `XML`.
    pub display: String,
    /// Action rendered when none is given.
    pub default_action: String,
    /// Template directory used when none is set on the view.
    pub default_tpl_dir: String,
    /// Switch to the `spider`/`mobile` template directory based on the user agent.
    pub auto_switch_tpl: bool,
    /// Root directory holding the template directories.
    pub tpl_base_path: String,
}

impl Default for SysSettings {
    fn default() -> Self {
        Self {
            site_url: String::new(),
            static_url: "/static".to_string(),
            display: "HTML".to_string(),
            default_action: "index".to_string(),
            default_tpl_dir: "default".to_string(),
            auto_switch_tpl: false,
            tpl_base_path: "templates".to_string(),
        }
    }
}

/// Link formatting settings (the `url` section).
///
/// `url_type` is kept as the raw configured integer; link building rejects
/// values outside `1..=4`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct UrlSettings {
    /// Suffix appended to generated links (e.g. `.html`).
    pub ext: String,
    /// URL style selector, `1` through `4`.
    #[serde(rename = "type")]
    pub url_type: i64,
    /// Entry script name (e.g. `index.php`).
    pub index: String,
    /// Delimiter joining controller, action and parameter segments.
    pub dot: String,
    /// Whether the server rewrites paths so the entry script can be omitted.
    pub rewrite: bool,
}

impl Default for UrlSettings {
    fn default() -> Self {
        Self {
            ext: String::new(),
            url_type: 1,
            index: "index.php".to_string(),
            dot: "/".to_string(),
            rewrite: false,
        }
    }
}

/// One entry of the `router` section.
///
/// Either a public name for a controller, or a map of public action names to
/// internal action names for the controller used as the key.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RouterEntry {
    /// `public-name = "internal-controller"`.
    Controller(String),
    /// `[router.public-controller]` with `public-action = "internal-action"`.
    Actions(IndexMap<String, String>),
}

/// The complete set of framework settings.
///
/// # Examples
///
/// ```
/// use cross_rs_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.url.index, "index.php");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Whether debug mode is enabled.
    pub debug: bool,
    /// The secret key used to secure link parameters.
    pub secret_key: String,
    /// Retired secret keys still accepted when reading secured parameters.
    pub secret_key_fallbacks: Vec<String>,
    /// The log level (e.g. "info", "debug", "warn").
    pub log_level: String,
    /// Site-wide settings.
    pub sys: SysSettings,
    /// Link formatting settings.
    pub url: UrlSettings,
    /// Controller and action aliases, in declaration order.
    pub router: IndexMap<String, RouterEntry>,
    /// Custom settings that don't fit into the above sections.
    pub extra: HashMap<String, serde_json::Value>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            secret_key: String::new(),
            secret_key_fallbacks: Vec::new(),
            log_level: "info".to_string(),
            sys: SysSettings::default(),
            url: UrlSettings::default(),
            router: IndexMap::new(),
            extra: HashMap::new(),
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup to set the
/// settings, then use [`get`](LazySettings::get) to access them.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings. Must be called exactly once.
    ///
    /// # Panics
    ///
    /// Panics if settings have already been configured.
    pub fn configure(&self, settings: Settings) {
        self.inner
            .set(settings)
            .expect("Settings have already been configured");
    }

    /// Returns a reference to the configured settings.
    ///
    /// # Panics
    ///
    /// Panics if settings have not been configured.
    pub fn get(&self) -> &Settings {
        self.inner
            .get()
            .expect("Settings have not been configured. Call SETTINGS.configure() first.")
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();
