//! The view: templates, layers, and display methods.
//!
//! A [`View`] renders one response. An action's output is produced by one of
//! the display methods (a template named after the action, `JSON`, or `XML`)
//! and then wrapped in a *layer*: the outer template `<layer>.layer.html`,
//! which receives the rendered output as `content`.
//!
//! Templates live under `<tpl_base_path>/<tpl_dir>/` and are rendered with
//! [`tera`]. Output is not auto-escaped; templates escape untrusted values
//! with the `escape` filter.

use std::error::Error as _;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use http::HeaderMap;
use serde::Serialize;
use serde_json::{Map, Value};

use cross_rs_core::settings::Settings;
use cross_rs_core::{CrossError, CrossResult};
use cross_rs_http::urls::link::{LinkBuilder, LinkParams};
use cross_rs_http::Response;

use crate::agent;
use crate::resources::{Resources, DEFAULT_LOCATION};
use crate::xml;

/// File suffix of action templates.
pub const TPL_EXT: &str = ".tpl.html";

/// File suffix of layer templates.
pub const LAYER_EXT: &str = ".layer.html";

/// Layer used when none is set.
pub const DEFAULT_LAYER: &str = "default";

/// Template directory used when neither the view nor `sys` names one.
pub const DEFAULT_TPL_DIR: &str = "default";

/// Root element of `XML` display output.
pub const XML_ROOT: &str = "root";

/// Renders templates and layers for one response.
///
/// # Examples
///
/// ```
/// use std::sync::Arc;
///
/// use cross_rs_core::Settings;
/// use cross_rs_views::View;
///
/// let mut settings = Settings::default();
/// settings.sys.static_url = "http://static.example.com/".to_string();
///
/// let view = View::from_settings(Arc::new(settings)).unwrap();
/// assert_eq!(view.res("css/site.css", true), "http://static.example.com/css/site.css");
/// ```
#[derive(Debug)]
pub struct View {
    settings: Arc<Settings>,
    links: LinkBuilder,
    action: Option<String>,
    tpl_base_path: Option<PathBuf>,
    tpl_dir: Option<String>,
    request_headers: HeaderMap,
    vars: Map<String, Value>,
    resources: Resources,
    response: Response,
}

impl View {
    /// Creates a view that builds links with `links`.
    ///
    /// The `static_url` layer variable is preset from `sys.static_url`.
    pub fn new(settings: Arc<Settings>, links: LinkBuilder) -> Self {
        let mut vars = Map::new();
        vars.insert(
            "static_url".to_string(),
            Value::String(settings.sys.static_url.clone()),
        );

        Self {
            settings,
            links,
            action: None,
            tpl_base_path: None,
            tpl_dir: None,
            request_headers: HeaderMap::new(),
            vars,
            resources: Resources::new(),
            response: Response::new(),
        }
    }

    /// Creates a view with a link builder derived from `settings`.
    pub fn from_settings(settings: Arc<Settings>) -> CrossResult<Self> {
        let links = LinkBuilder::from_settings(&settings)?;
        Ok(Self::new(settings, links))
    }

    /// Returns the settings this view was created with.
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    // ── Layer variables ──────────────────────────────────────────────

    /// Sets a layer variable.
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.vars.insert(name.into(), value.into());
        self
    }

    /// Merges several layer variables, replacing existing ones.
    pub fn set_many(&mut self, vars: Map<String, Value>) -> &mut Self {
        self.vars.extend(vars);
        self
    }

    /// Returns a layer variable.
    pub fn var(&self, name: &str) -> Option<&Value> {
        self.vars.get(name)
    }

    /// Returns all layer variables.
    pub const fn vars(&self) -> &Map<String, Value> {
        &self.vars
    }

    // ── Request state ────────────────────────────────────────────────

    /// Sets the action being rendered.
    pub fn set_action(&mut self, action: impl Into<String>) {
        self.action = Some(action.into());
    }

    /// Returns the action being rendered.
    pub fn action(&self) -> Option<&str> {
        self.action.as_deref()
    }

    /// Sets the request headers used for template directory switching.
    pub fn set_request_headers(&mut self, headers: HeaderMap) {
        self.request_headers = headers;
    }

    /// Returns the response state.
    pub const fn response(&self) -> &Response {
        &self.response
    }

    /// Returns the response state for modification.
    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    // ── URLs ─────────────────────────────────────────────────────────

    /// Expands a resource path into a URL under `sys.static_url`, or under
    /// `sys.site_url` when `use_static_url` is `false`.
    pub fn res(&self, path: &str, use_static_url: bool) -> String {
        let base = if use_static_url {
            &self.settings.sys.static_url
        } else {
            &self.settings.sys.site_url
        };
        format!("{}/{path}", base.trim_end_matches('/'))
    }

    /// Returns the base URL of generated links.
    pub fn link_base(&self) -> &str {
        self.links.base()
    }

    /// Replaces the base URL of generated links.
    pub fn set_link_base(&mut self, base: impl Into<String>) {
        self.links.set_base(base);
    }

    /// Builds a link; see [`LinkBuilder::link`].
    pub fn link(&self, controller: Option<&str>, params: Option<&LinkParams>) -> CrossResult<String> {
        self.links.link(controller, params)
    }

    /// Builds a link with secured parameters; see [`LinkBuilder::secure_link`].
    pub fn secure_link(
        &self,
        controller: Option<&str>,
        params: Option<&LinkParams>,
    ) -> CrossResult<String> {
        self.links.secure_link(controller, params)
    }

    // ── Template paths ───────────────────────────────────────────────

    /// Returns the root directory holding the template directories.
    pub fn tpl_base_path(&self) -> PathBuf {
        self.tpl_base_path
            .clone()
            .unwrap_or_else(|| PathBuf::from(&self.settings.sys.tpl_base_path))
    }

    /// Overrides the template root directory.
    pub fn set_tpl_base_path(&mut self, path: impl Into<PathBuf>) {
        self.tpl_base_path = Some(path.into());
    }

    /// Returns the template directory name.
    ///
    /// With `sys.auto_switch_tpl` set, crawlers get `spider` and mobile
    /// browsers get `mobile` regardless of the configured directory.
    pub fn tpl_dir(&self) -> String {
        if self.settings.sys.auto_switch_tpl {
            let user_agent = agent::user_agent(&self.request_headers);
            if let Some(robot) = agent::is_robot(user_agent) {
                tracing::debug!(robot, "serving spider templates");
                return "spider".to_string();
            }
            if agent::is_mobile(user_agent, &self.request_headers) {
                return "mobile".to_string();
            }
        }

        if let Some(dir) = &self.tpl_dir {
            return dir.clone();
        }
        if self.settings.sys.default_tpl_dir.is_empty() {
            DEFAULT_TPL_DIR.to_string()
        } else {
            self.settings.sys.default_tpl_dir.clone()
        }
    }

    /// Overrides the template directory name.
    pub fn set_tpl_dir(&mut self, dir: impl Into<String>) {
        self.tpl_dir = Some(dir.into());
    }

    /// Returns the directory templates are loaded from.
    pub fn tpl_path(&self) -> PathBuf {
        self.tpl_base_path().join(self.tpl_dir())
    }

    /// Returns the file of the template `name`.
    pub fn tpl(&self, name: &str) -> PathBuf {
        self.tpl_path().join(format!("{name}{TPL_EXT}"))
    }

    // ── Rendering ────────────────────────────────────────────────────

    /// Renders the template `name` with `data` and the layer variables.
    pub fn render_tpl<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> CrossResult<String> {
        let path = self.tpl(name);
        let mut context = self.layer_context();
        context.insert("data", data);
        render_file(&path, &context)
    }

    /// Serializes `data` as JSON and selects the `json` layer and content type.
    pub fn json<T: Serialize + ?Sized>(&mut self, data: &T) -> CrossResult<String> {
        let body = serde_json::to_string(data)
            .map_err(|e| CrossError::SerializationError(e.to_string()))?;
        self.set("layer", "json");
        self.response.set_content_type("json");
        Ok(body)
    }

    /// Serializes `data` as XML under `root` and selects the `xml` layer and
    /// content type.
    pub fn xml<T: Serialize + ?Sized>(&mut self, data: &T, root: &str) -> CrossResult<String> {
        let value = serde_json::to_value(data)
            .map_err(|e| CrossError::SerializationError(e.to_string()))?;
        let body = xml::to_xml(root, &value)?;
        self.set("layer", "xml");
        self.response.set_content_type("xml");
        Ok(body)
    }

    /// Wraps rendered output in the current layer.
    ///
    /// The layer is the `layer` variable, or [`DEFAULT_LAYER`].
    pub fn load_layer(&self, content: &str) -> CrossResult<String> {
        let layer = self
            .vars
            .get("layer")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_LAYER);
        let path = self.tpl_path().join(format!("{layer}{LAYER_EXT}"));

        let mut context = self.layer_context();
        context.insert("content", content);
        render_file(&path, &context)
    }

    /// Renders `data` with a display method and wraps it in the layer.
    ///
    /// Without an explicit `method`, a non-`HTML` `sys.display` is used,
    /// then the current action. An empty method falls back to
    /// `sys.default_action`. `JSON` and `XML` (in any case) serialize
    /// `data`; any other method renders the template of that name.
    pub fn display<T: Serialize + ?Sized>(
        &mut self,
        data: &T,
        method: Option<&str>,
    ) -> CrossResult<http::Response<String>> {
        let mut method = match method {
            Some(method) => method.to_string(),
            None => self.default_method(),
        };
        if method.is_empty() {
            method.clone_from(&self.settings.sys.default_action);
        }

        tracing::debug!(%method, "display");

        let content = if method.eq_ignore_ascii_case("JSON") {
            self.json(data)?
        } else if method.eq_ignore_ascii_case("XML") {
            self.xml(data, XML_ROOT)?
        } else {
            self.render_tpl(&method, data)?
        };

        let page = self.load_layer(&content)?;
        Ok(self.response.output(page))
    }

    fn default_method(&self) -> String {
        let display = &self.settings.sys.display;
        if !display.is_empty() && !display.eq_ignore_ascii_case("HTML") {
            display.to_ascii_uppercase()
        } else {
            self.action.clone().unwrap_or_default()
        }
    }

    /// Layer variables plus the rendered resource tags under `resources`.
    fn layer_context(&self) -> tera::Context {
        let mut context = tera::Context::new();
        for (name, value) in &self.vars {
            context.insert(name.as_str(), value);
        }

        let mut resources = Map::new();
        for location in [DEFAULT_LOCATION, "footer"] {
            resources.insert(location.to_string(), Value::String(self.load_res(location)));
        }
        context.insert("resources", &resources);
        context
    }

    // ── Resources ────────────────────────────────────────────────────

    /// Queues a script or stylesheet at `location`.
    ///
    /// With `convert`, `url` is a static path expanded through [`res`](Self::res).
    pub fn add_res(&mut self, url: impl Into<String>, location: &str, convert: bool) {
        self.resources.add(url, location, convert);
    }

    /// Renders the tags for the resources queued at `location`.
    pub fn load_res(&self, location: &str) -> String {
        self.resources.render(location, |path| self.res(path, true))
    }
}

/// Reads and renders one template file.
fn render_file(path: &Path, context: &tera::Context) -> CrossResult<String> {
    if !path.exists() {
        return Err(CrossError::TemplateDoesNotExist(format!(
            "{} not found",
            path.display()
        )));
    }

    let source = std::fs::read_to_string(path).map_err(|e| {
        CrossError::TemplateDoesNotExist(format!(
            "Error reading template '{}': {e}",
            path.display()
        ))
    })?;

    tracing::debug!(template = %path.display(), "rendering template");
    tera::Tera::one_off(&source, context, false).map_err(|e| template_error(path, &e))
}

fn template_error(path: &Path, err: &tera::Error) -> CrossError {
    let mut message = format!("{}: {err}", path.display());
    let mut source = err.source();
    while let Some(cause) = source {
        message.push_str(": ");
        message.push_str(&cause.to_string());
        source = cause.source();
    }
    CrossError::TemplateError(message)
}

#[cfg(test)]
mod tests {
    use http::header::USER_AGENT;
    use http::HeaderValue;

    use super::*;

    fn view_with(configure: impl FnOnce(&mut Settings)) -> View {
        let mut settings = Settings::default();
        configure(&mut settings);
        View::from_settings(Arc::new(settings)).unwrap()
    }

    #[test]
    fn test_static_url_preset() {
        let view = view_with(|s| s.sys.static_url = "/assets".to_string());
        assert_eq!(view.var("static_url"), Some(&Value::from("/assets")));
    }

    #[test]
    fn test_set_and_set_many() {
        let mut view = view_with(|_| {});
        view.set("title", "Home").set("count", 3);

        let mut more = Map::new();
        more.insert("title".to_string(), Value::from("News"));
        more.insert("layer".to_string(), Value::from("admin"));
        view.set_many(more);

        assert_eq!(view.var("title"), Some(&Value::from("News")));
        assert_eq!(view.var("count"), Some(&Value::from(3)));
        assert_eq!(view.var("layer"), Some(&Value::from("admin")));
    }

    #[test]
    fn test_res() {
        let view = view_with(|s| {
            s.sys.static_url = "http://static.example.com//".to_string();
            s.sys.site_url = "http://example.com".to_string();
        });
        assert_eq!(view.res("js/a.js", true), "http://static.example.com/js/a.js");
        assert_eq!(view.res("js/a.js", false), "http://example.com/js/a.js");
    }

    #[test]
    fn test_link_base_defaults_to_site_url() {
        let mut view = view_with(|s| s.sys.site_url = "http://example.com".to_string());
        assert_eq!(view.link_base(), "http://example.com");
        assert_eq!(view.link(Some("news"), None).unwrap(), "http://example.com/?/news");

        view.set_link_base("http://m.example.com");
        assert_eq!(view.link(Some("news"), None).unwrap(), "http://m.example.com/?/news");
    }

    #[test]
    fn test_tpl_paths() {
        let mut view = view_with(|s| s.sys.tpl_base_path = "/srv/tpl".to_string());
        assert_eq!(view.tpl_path(), PathBuf::from("/srv/tpl/default"));
        assert_eq!(view.tpl("index"), PathBuf::from("/srv/tpl/default/index.tpl.html"));

        view.set_tpl_dir("blue");
        view.set_tpl_base_path("/other");
        assert_eq!(view.tpl("index"), PathBuf::from("/other/blue/index.tpl.html"));
    }

    #[test]
    fn test_tpl_dir_falls_back_to_default() {
        let view = view_with(|s| s.sys.default_tpl_dir = String::new());
        assert_eq!(view.tpl_dir(), DEFAULT_TPL_DIR);
    }

    #[test]
    fn test_tpl_dir_auto_switch() {
        let mut view = view_with(|s| s.sys.auto_switch_tpl = true);
        assert_eq!(view.tpl_dir(), "default");

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("Googlebot/2.1"));
        view.set_request_headers(headers);
        assert_eq!(view.tpl_dir(), "spider");

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("Mozilla/5.0 (iPhone; CPU iPhone OS 17_0)"));
        view.set_request_headers(headers);
        assert_eq!(view.tpl_dir(), "mobile");
    }

    #[test]
    fn test_auto_switch_disabled_ignores_agent() {
        let mut view = view_with(|_| {});
        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, HeaderValue::from_static("Googlebot/2.1"));
        view.set_request_headers(headers);
        assert_eq!(view.tpl_dir(), "default");
    }

    #[test]
    fn test_default_method() {
        let mut view = view_with(|_| {});
        assert_eq!(view.default_method(), "");
        view.set_action("show");
        assert_eq!(view.default_method(), "show");

        let view = view_with(|s| s.sys.display = "json".to_string());
        assert_eq!(view.default_method(), "JSON");
    }

    #[test]
    fn test_json_sets_layer_and_content_type() {
        let mut view = view_with(|_| {});
        let body = view.json(&serde_json::json!({"id": 5})).unwrap();
        assert_eq!(body, r#"{"id":5}"#);
        assert_eq!(view.var("layer"), Some(&Value::from("json")));
        assert_eq!(view.response().content_type(), "application/json");
    }

    #[test]
    fn test_xml_sets_layer_and_content_type() {
        let mut view = view_with(|_| {});
        let body = view.xml(&serde_json::json!({"id": 5}), XML_ROOT).unwrap();
        assert!(body.ends_with("<root><id>5</id></root>\n"));
        assert_eq!(view.var("layer"), Some(&Value::from("xml")));
        assert_eq!(view.response().content_type(), "text/xml");
    }

    #[test]
    fn test_missing_template() {
        let view = view_with(|s| s.sys.tpl_base_path = "/nonexistent".to_string());
        assert!(matches!(
            view.render_tpl("index", &()),
            Err(CrossError::TemplateDoesNotExist(_))
        ));
        assert!(matches!(
            view.load_layer("x"),
            Err(CrossError::TemplateDoesNotExist(_))
        ));
    }

    #[test]
    fn test_load_res_converts_through_static_url() {
        let mut view = view_with(|s| s.sys.static_url = "/static/".to_string());
        view.add_res("js/app.js", "footer", true);
        assert_eq!(
            view.load_res("footer"),
            "<script type=\"text/javascript\" src=\"/static/js/app.js\"></script>\n"
        );
        assert_eq!(view.load_res(DEFAULT_LOCATION), "");
    }
}
