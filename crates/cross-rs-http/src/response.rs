//! HTTP response plumbing.
//!
//! [`Response`] accumulates a status code, a content type (chosen by a short
//! key through the [`mime`](crate::mime) table) and extra headers for one
//! request, then renders the final [`http::Response`] with
//! [`Response::output`]. The host server is responsible for sending it.

use http::header::{HeaderName, CONTENT_TYPE, LOCATION, WWW_AUTHENTICATE};
use http::{HeaderMap, HeaderValue, StatusCode};

use cross_rs_core::{CrossError, CrossResult};

use crate::mime;

/// Returns the canonical reason phrase for a status code.
///
/// # Examples
///
/// ```
/// use cross_rs_http::response::status_description;
///
/// assert_eq!(status_description(http::StatusCode::NOT_FOUND), "Not Found");
/// ```
pub fn status_description(status: StatusCode) -> &'static str {
    status.canonical_reason().unwrap_or("Unknown Status")
}

/// Response state for one request.
///
/// # Examples
///
/// ```
/// use cross_rs_http::Response;
///
/// let mut response = Response::new();
/// response.set_content_type("json");
/// let rendered = response.output(r#"{"ok":true}"#);
/// assert_eq!(rendered.headers()["content-type"], "application/json;charset=utf-8");
/// ```
#[derive(Debug, Clone)]
pub struct Response {
    status: StatusCode,
    content_type: &'static str,
    headers: HeaderMap,
}

impl Default for Response {
    fn default() -> Self {
        Self::new()
    }
}

impl Response {
    /// Creates a `200 OK`, `text/html` response.
    pub fn new() -> Self {
        Self {
            status: StatusCode::OK,
            content_type: mime::DEFAULT_MIME,
            headers: HeaderMap::new(),
        }
    }

    /// Sets the content type by extension key (`"json"`, `"xml"`, ...).
    ///
    /// Unknown keys select `text/html`.
    pub fn set_content_type(&mut self, key: &str) {
        self.content_type = mime::from_extension_or_default(key);
    }

    /// Returns the content type.
    pub const fn content_type(&self) -> &'static str {
        self.content_type
    }

    /// Sets the status code.
    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    /// Sets the status code from its numeric value.
    pub fn set_status_code(&mut self, code: u16) -> CrossResult<()> {
        self.status = StatusCode::from_u16(code)
            .map_err(|_| CrossError::InvalidArgument(format!("Invalid status code: {code}")))?;
        Ok(())
    }

    /// Returns the status code.
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Adds a header, keeping any previous values of the same name.
    pub fn add_header(&mut self, name: &str, value: &str) -> CrossResult<()> {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| CrossError::BadRequest(format!("Invalid header name '{name}': {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| CrossError::BadRequest(format!("Invalid header value for '{name}': {e}")))?;
        self.headers.append(name, value);
        Ok(())
    }

    /// Returns the extra headers.
    pub const fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns the `Content-Type` header value.
    pub fn full_content_type(&self) -> String {
        format!("{};charset=utf-8", self.content_type)
    }

    /// Renders the final response.
    ///
    /// An empty body is replaced by the status description.
    pub fn output(&self, contents: impl Into<String>) -> http::Response<String> {
        let mut body = contents.into();
        if body.is_empty() {
            body = status_description(self.status).to_string();
        }

        let mut response = http::Response::new(body);
        *response.status_mut() = self.status;

        let headers = response.headers_mut();
        if let Ok(value) = HeaderValue::from_str(&self.full_content_type()) {
            headers.insert(CONTENT_TYPE, value);
        }
        for (name, value) in &self.headers {
            headers.append(name, value.clone());
        }

        tracing::debug!(status = self.status.as_u16(), content_type = self.content_type, "response rendered");
        response
    }

    /// Renders a `401 Unauthorized` basic-auth challenge.
    pub fn basic_auth(realm: &str) -> CrossResult<http::Response<String>> {
        let challenge = HeaderValue::from_str(&format!("Basic realm=\"{realm}\""))
            .map_err(|e| CrossError::BadRequest(format!("Invalid realm '{realm}': {e}")))?;

        let mut response = Self::new();
        response.set_status(StatusCode::UNAUTHORIZED);
        response.headers.insert(WWW_AUTHENTICATE, challenge);
        Ok(response.output("Auth Failed"))
    }

    /// Renders a `302 Found` redirect to `url`.
    pub fn redirect(url: &str) -> CrossResult<http::Response<String>> {
        let location = HeaderValue::from_str(url)
            .map_err(|e| CrossError::BadRequest(format!("Invalid redirect target '{url}': {e}")))?;

        let mut response = Self::new();
        response.set_status(StatusCode::FOUND);
        response.headers.insert(LOCATION, location);
        Ok(response.output(""))
    }
}
