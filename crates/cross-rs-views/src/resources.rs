//! Per-view lists of script and stylesheet resources.
//!
//! Resources are queued under a location name (`"header"`, `"footer"`, ...)
//! while a view is prepared and emitted as tags when the layer asks for them.

use std::collections::HashMap;

use cross_rs_http::mime;

/// The location used when none is given.
pub const DEFAULT_LOCATION: &str = "header";

/// A queued resource.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resource {
    /// The resource URL or static path.
    pub url: String,
    /// Whether `url` is a static path to be expanded into a full URL.
    pub convert: bool,
}

/// Resources grouped by location, each kept in insertion order.
#[derive(Debug, Clone, Default)]
pub struct Resources {
    locations: HashMap<String, Vec<Resource>>,
}

impl Resources {
    /// Creates an empty resource list.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a resource at `location`.
    pub fn add(&mut self, url: impl Into<String>, location: &str, convert: bool) {
        self.locations
            .entry(location.to_string())
            .or_default()
            .push(Resource {
                url: url.into(),
                convert,
            });
    }

    /// Returns the resources queued at `location`.
    pub fn get(&self, location: &str) -> &[Resource] {
        self.locations.get(location).map(Vec::as_slice).unwrap_or_default()
    }

    /// Renders the tags for every resource at `location`.
    ///
    /// Resources flagged for conversion are passed through `expand` first.
    /// Only `.js` and `.css` resources produce tags.
    pub fn render<F>(&self, location: &str, expand: F) -> String
    where
        F: Fn(&str) -> String,
    {
        let mut html = String::new();
        for resource in self.get(location) {
            let url = if resource.convert {
                expand(&resource.url)
            } else {
                resource.url.clone()
            };
            if let Some(tag) = tag_for(&resource.url, &url) {
                html.push_str(&tag);
                html.push('\n');
            }
        }
        html
    }
}

/// Formats the tag for a resource, choosing the tag by the extension of `path`.
pub fn tag_for(path: &str, url: &str) -> Option<String> {
    let ext = mime::extension_of(path)?.to_ascii_lowercase();
    match ext.as_str() {
        "js" => Some(format!(r#"<script type="text/javascript" src="{url}"></script>"#)),
        "css" => Some(format!(
            r#"<link rel="stylesheet" type="text/css" href="{url}"/>"#
        )),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn expand(path: &str) -> String {
        format!("/static/{path}")
    }

    #[test]
    fn test_render_in_order() {
        let mut res = Resources::new();
        res.add("css/site.css", DEFAULT_LOCATION, true);
        res.add("js/app.js", DEFAULT_LOCATION, true);

        assert_eq!(
            res.render(DEFAULT_LOCATION, expand),
            "<link rel=\"stylesheet\" type=\"text/css\" href=\"/static/css/site.css\"/>\n\
             <script type=\"text/javascript\" src=\"/static/js/app.js\"></script>\n"
        );
    }

    #[test]
    fn test_render_without_conversion() {
        let mut res = Resources::new();
        res.add("https://cdn.example.com/lib.JS", "footer", false);
        assert_eq!(
            res.render("footer", expand),
            "<script type=\"text/javascript\" src=\"https://cdn.example.com/lib.JS\"></script>\n"
        );
    }

    #[test]
    fn test_render_skips_other_types() {
        let mut res = Resources::new();
        res.add("img/logo.png", DEFAULT_LOCATION, true);
        res.add("README", DEFAULT_LOCATION, true);
        assert_eq!(res.render(DEFAULT_LOCATION, expand), "");
        assert_eq!(res.get(DEFAULT_LOCATION).len(), 2);
    }

    #[test]
    fn test_unknown_location_is_empty() {
        let res = Resources::new();
        assert!(res.get("footer").is_empty());
        assert_eq!(res.render("footer", expand), "");
    }
}
